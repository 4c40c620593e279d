use serde::Deserialize;
use time::Date;

use crate::day_format;
use crate::models::Meal;

#[derive(Debug, Deserialize)]
pub struct DeleteJournalRequest {
    #[serde(with = "day_format")]
    pub timestamp: Date,
    pub meal: Meal,
    pub food_key: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteMealRequest {
    #[serde(with = "day_format")]
    pub timestamp: Date,
    pub meal: Meal,
}

#[derive(Debug, Deserialize)]
pub struct ExpandBundleRequest {
    #[serde(with = "day_format")]
    pub timestamp: Date,
    pub meal: Meal,
    pub bundle_key: String,
}

#[derive(Debug, Deserialize)]
pub struct CopyJournalRequest {
    #[serde(with = "day_format")]
    pub from: Date,
    pub from_meal: Meal,
    #[serde(with = "day_format")]
    pub to: Date,
    pub to_meal: Meal,
}

#[derive(Debug, Deserialize)]
pub struct CopyWeekRequest {
    #[serde(with = "day_format")]
    pub from: Date,
    #[serde(with = "day_format")]
    pub to: Date,
}
