pub mod app;
pub mod bundles;
pub mod config;
pub mod error;
pub mod extractors;
pub mod food;
pub mod journal;
pub mod maintenance;
pub mod measurements;
pub mod models;
pub mod reports;
pub mod response;
pub mod settings;
pub mod state;
pub mod storage;

// Calendar days travel as `YYYY-MM-DD` everywhere: JSON bodies, query strings, backups.
time::serde::format_description!(day_format, Date, "[year]-[month]-[day]");
