use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::Date;

/// Which weekday opens a week for week-level journal operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

impl WeekStart {
    fn days_since_start(self, date: Date) -> u8 {
        match self {
            WeekStart::Monday => date.weekday().number_days_from_monday(),
            WeekStart::Sunday => date.weekday().number_days_from_sunday(),
        }
    }

    pub fn is_start_of_week(self, date: Date) -> bool {
        self.days_since_start(date) == 0
    }
}

impl FromStr for WeekStart {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monday" | "mon" => Ok(WeekStart::Monday),
            "sunday" | "sun" => Ok(WeekStart::Sunday),
            other => anyhow::bail!("unknown week start: {other}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn monday_anchor() {
        // 2024-01-01 is a Monday
        let ws = WeekStart::Monday;
        assert!(ws.is_start_of_week(date!(2024 - 01 - 01)));
        assert!(!ws.is_start_of_week(date!(2024 - 01 - 07)));
        assert!(!ws.is_start_of_week(date!(2024 - 01 - 03)));
    }

    #[test]
    fn sunday_anchor() {
        let ws = WeekStart::Sunday;
        assert!(ws.is_start_of_week(date!(2024 - 01 - 07)));
        assert!(!ws.is_start_of_week(date!(2024 - 01 - 01)));
        assert!(ws.is_start_of_week(date!(2023 - 12 - 31)));
    }

    #[test]
    fn parse() {
        assert_eq!("Sunday".parse::<WeekStart>().unwrap(), WeekStart::Sunday);
        assert_eq!("mon".parse::<WeekStart>().unwrap(), WeekStart::Monday);
        assert!("friday".parse::<WeekStart>().is_err());
    }
}
