//! Daily calorie norms by the Mifflin–St Jeor equation.

use serde::{Deserialize, Serialize};

const DEFICIT_SLOW: f64 = 250.0;
const DEFICIT_FAST: f64 = 500.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    High,
    Extreme,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::High,
        ActivityLevel::Extreme,
    ];

    pub fn factor(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::High => 1.725,
            ActivityLevel::Extreme => 1.9,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyNorm {
    pub level: ActivityLevel,
    pub factor: f64,
    pub maintain: f64,
    pub slow_loss: f64,
    pub fast_loss: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyNorms {
    pub bmr: f64,
    pub levels: Vec<DailyNorm>,
}

/// Weight in kg, height in cm, age in years. None unless all are positive.
pub fn calc_daily_norms(gender: Gender, weight: f64, height: f64, age: f64) -> Option<DailyNorms> {
    if ![weight, height, age].iter().all(|v| v.is_finite() && *v > 0.0) {
        return None;
    }

    let base = 10.0 * weight + 6.25 * height - 5.0 * age;
    let bmr = match gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
    };

    let levels = ActivityLevel::ALL
        .into_iter()
        .map(|level| {
            let maintain = bmr * level.factor();
            DailyNorm {
                level,
                factor: level.factor(),
                maintain,
                slow_loss: maintain - DEFICIT_SLOW,
                fast_loss: maintain - DEFICIT_FAST,
            }
        })
        .collect();

    Some(DailyNorms { bmr, levels })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn male_norms() {
        let n = calc_daily_norms(Gender::Male, 80.0, 180.0, 30.0).unwrap();
        // 800 + 1125 - 150 + 5
        assert_eq!(n.bmr, 1780.0);
        assert_eq!(n.levels.len(), 5);
        assert!((n.levels[0].maintain - 2136.0).abs() < 1e-9);
        assert!((n.levels[0].slow_loss - 1886.0).abs() < 1e-9);
        assert!((n.levels[0].fast_loss - 1636.0).abs() < 1e-9);
        assert!((n.levels[4].maintain - 3382.0).abs() < 1e-9);
    }

    #[test]
    fn female_norms() {
        let n = calc_daily_norms(Gender::Female, 60.0, 165.0, 25.0).unwrap();
        // 600 + 1031.25 - 125 - 161
        assert_eq!(n.bmr, 1345.25);
    }

    #[test]
    fn rejects_non_positive_inputs() {
        assert!(calc_daily_norms(Gender::Male, 0.0, 180.0, 30.0).is_none());
        assert!(calc_daily_norms(Gender::Male, 80.0, -1.0, 30.0).is_none());
        assert!(calc_daily_norms(Gender::Female, 80.0, 180.0, f64::NAN).is_none());
    }

    #[test]
    fn gender_deserializes_lowercase() {
        assert_eq!(serde_json::from_str::<Gender>("\"female\"").unwrap(), Gender::Female);
        assert!(serde_json::from_str::<Gender>("\"x\"").is_err());
    }
}
