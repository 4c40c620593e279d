use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::Date;

use crate::day_format;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Food {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub brand: String,
    pub cal100: f64,
    pub prot100: f64,
    pub fat100: f64,
    pub carb100: f64,
    #[serde(default)]
    pub comment: String,
}

impl Food {
    pub fn validate(&self) -> bool {
        !self.key.is_empty()
            && !self.name.is_empty()
            && [self.cal100, self.prot100, self.fat100, self.carb100]
                .iter()
                .all(|v| v.is_finite() && *v >= 0.0)
    }
}

/// Meal slot of a day. The discriminant is the persisted value and the
/// report ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Meal {
    Breakfast = 0,
    BeforeLunch = 1,
    Lunch = 2,
    AfternoonSnack = 3,
    BeforeDinner = 4,
    Dinner = 5,
    Snack = 6,
}

impl Meal {
    pub const ALL: [Meal; 7] = [
        Meal::Breakfast,
        Meal::BeforeLunch,
        Meal::Lunch,
        Meal::AfternoonSnack,
        Meal::BeforeDinner,
        Meal::Dinner,
        Meal::Snack,
    ];

    pub fn as_i64(self) -> i64 {
        self as i64
    }

    /// Unknown values fall back to `Snack`.
    pub fn from_i64(v: i64) -> Self {
        Self::ALL
            .into_iter()
            .find(|m| m.as_i64() == v)
            .unwrap_or(Meal::Snack)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Meal::Breakfast => "breakfast",
            Meal::BeforeLunch => "before_lunch",
            Meal::Lunch => "lunch",
            Meal::AfternoonSnack => "afternoon_snack",
            Meal::BeforeDinner => "before_dinner",
            Meal::Dinner => "dinner",
            Meal::Snack => "snack",
        }
    }
}

impl From<i64> for Meal {
    fn from(v: i64) -> Self {
        Meal::from_i64(v)
    }
}

impl fmt::Display for Meal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bundle {
    pub key: String,
    /// food key -> weight in grams
    pub items: BTreeMap<String, f64>,
}

impl Bundle {
    pub fn validate(&self) -> bool {
        !self.key.is_empty()
            && !self.items.is_empty()
            && self
                .items
                .iter()
                .all(|(k, w)| !k.is_empty() && w.is_finite() && *w > 0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    #[serde(with = "day_format")]
    pub timestamp: Date,
    pub meal: Meal,
    pub food_key: String,
    pub food_weight: f64,
}

impl JournalEntry {
    pub fn validate(&self) -> bool {
        !self.food_key.is_empty() && self.food_weight.is_finite() && self.food_weight > 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Weight {
    #[serde(with = "day_format")]
    pub timestamp: Date,
    pub value: f64,
}

impl Weight {
    pub fn validate(&self) -> bool {
        self.value.is_finite() && self.value > 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Activity {
    #[serde(with = "day_format")]
    pub timestamp: Date,
    pub active_cal: f64,
}

impl Activity {
    pub fn validate(&self) -> bool {
        self.active_cal.is_finite() && self.active_cal >= 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    pub cal_limit: f64,
    #[serde(default)]
    pub default_active_cal: f64,
}

impl UserSettings {
    pub fn validate(&self) -> bool {
        self.cal_limit.is_finite()
            && self.cal_limit > 0.0
            && self.default_active_cal.is_finite()
            && self.default_active_cal >= 0.0
    }
}
