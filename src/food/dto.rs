use serde::Deserialize;

use crate::models::Food;

/// Food as submitted by the edit form; `key` is assigned server-side for new foods.
#[derive(Debug, Deserialize)]
pub struct FoodForm {
    #[serde(default)]
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

impl FoodForm {
    pub fn into_food(self, key: String) -> Food {
        Food {
            key,
            name: self.name,
            brand: self.brand,
            cal100: self.cal100,
            prot100: self.prot100,
            fat100: self.fat100,
            carb100: self.carb100,
            comment: self.comment,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SetFoodRequest {
    pub food: FoodForm,
    #[serde(default)]
    pub is_edit: bool,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct SetCommentRequest {
    pub comment: String,
}
