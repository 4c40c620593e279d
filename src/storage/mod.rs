//! Engine surface shared by every front end.
//!
//! Each domain module contributes one async trait; [`Storage`] is their
//! union, so callers hold a single `Arc<dyn Storage>` and get the whole
//! catalog / bundle / journal / report / measurement / settings / backup API.

mod sqlite;

pub use sqlite::SqliteStorage;

#[cfg(test)]
pub(crate) use sqlite::test_support;

pub use crate::bundles::services::BundleStorage;
pub use crate::food::services::FoodStorage;
pub use crate::journal::services::JournalStorage;
pub use crate::maintenance::services::MaintenanceStorage;
pub use crate::measurements::services::MeasurementStorage;
pub use crate::reports::services::ReportStorage;
pub use crate::settings::services::SettingsStorage;

pub trait Storage:
    FoodStorage
    + BundleStorage
    + JournalStorage
    + ReportStorage
    + MeasurementStorage
    + SettingsStorage
    + MaintenanceStorage
{
}

impl<T> Storage for T where
    T: FoodStorage
        + BundleStorage
        + JournalStorage
        + ReportStorage
        + MeasurementStorage
        + SettingsStorage
        + MaintenanceStorage
{
}
