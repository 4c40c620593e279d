use serde::Serialize;
use thiserror::Error;
use time::Date;

/// Coarse classification callers map to presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    EmptyList,
    InvalidInput,
    Conflict,
    Timeout,
    Internal,
}

#[derive(Debug, Error)]
pub enum StorageError {
    // Food
    #[error("food not found")]
    FoodNotFound,
    #[error("invalid food")]
    InvalidFood,
    #[error("food is used in journal")]
    FoodInUse,
    #[error("food list is empty")]
    FoodEmptyList,

    // Bundle
    #[error("bundle not found")]
    BundleNotFound,
    #[error("invalid bundle")]
    InvalidBundle,
    #[error("bundle refers to unknown food: {0}")]
    InvalidBundleFood(String),
    #[error("bundle list is empty")]
    BundleEmptyList,

    // Journal
    #[error("invalid journal entry")]
    InvalidJournal,
    #[error("journal refers to unknown food: {0}")]
    JournalInvalidFood(String),
    #[error("journal copy destination is not empty")]
    JournalCopyDestinationNotEmpty,
    #[error("journal report is empty")]
    JournalReportEmpty,
    #[error("{0} is not a start of week")]
    NotStartOfWeek(Date),
    #[error("invalid period")]
    InvalidPeriod,

    // Weight
    #[error("invalid weight")]
    InvalidWeight,
    #[error("weight list is empty")]
    WeightEmptyList,

    // Activity
    #[error("invalid activity")]
    InvalidActivity,
    #[error("activity not found")]
    ActivityNotFound,
    #[error("activity list is empty")]
    ActivityEmptyList,

    // UserSettings
    #[error("invalid user settings")]
    InvalidUserSettings,
    #[error("user settings not found")]
    UserSettingsNotFound,

    #[error("storage operation timed out")]
    Timeout,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl StorageError {
    pub fn kind(&self) -> ErrorKind {
        use StorageError::*;
        match self {
            FoodNotFound | BundleNotFound | ActivityNotFound | UserSettingsNotFound => {
                ErrorKind::NotFound
            }
            FoodEmptyList | BundleEmptyList | JournalReportEmpty | WeightEmptyList
            | ActivityEmptyList => ErrorKind::EmptyList,
            InvalidFood | InvalidBundle | InvalidBundleFood(_) | InvalidJournal
            | JournalInvalidFood(_) | NotStartOfWeek(_) | InvalidPeriod | InvalidWeight
            | InvalidActivity | InvalidUserSettings => ErrorKind::InvalidInput,
            FoodInUse | JournalCopyDestinationNotEmpty => ErrorKind::Conflict,
            Timeout => ErrorKind::Timeout,
            Internal(_) => ErrorKind::Internal,
        }
    }

    /// Text safe to show to an end user; store failures are never exposed.
    pub fn public_message(&self) -> String {
        match self.kind() {
            ErrorKind::Internal | ErrorKind::Timeout => "internal error".to_string(),
            _ => self.to_string(),
        }
    }
}
