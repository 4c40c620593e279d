use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::Serialize;

use crate::models::{Food, JournalEntry};

/// Energy in kcal and macros in grams.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Nutrition {
    pub cal: f64,
    pub prot: f64,
    pub fat: f64,
    pub carb: f64,
}

impl Nutrition {
    pub fn per_100g(food: &Food) -> Self {
        Self {
            cal: food.cal100,
            prot: food.prot100,
            fat: food.fat100,
            carb: food.carb100,
        }
    }

    /// Scales per-100g values to `grams`.
    pub fn for_weight(self, grams: f64) -> Self {
        self.scale(grams / 100.0)
    }

    pub fn scale(self, k: f64) -> Self {
        Self {
            cal: self.cal * k,
            prot: self.prot * k,
            fat: self.fat * k,
            carb: self.carb * k,
        }
    }

    pub fn pfc(&self) -> Option<PfcRatio> {
        PfcRatio::of(self)
    }
}

impl Add for Nutrition {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            cal: self.cal + rhs.cal,
            prot: self.prot + rhs.prot,
            fat: self.fat + rhs.fat,
            carb: self.carb + rhs.carb,
        }
    }
}

impl AddAssign for Nutrition {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for Nutrition {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl<'a> Sum<&'a Nutrition> for Nutrition {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

pub fn compute_entry_nutrition(entry: &JournalEntry, food: &Food) -> Nutrition {
    Nutrition::per_100g(food).for_weight(entry.food_weight)
}

/// Share of protein, fat and carbohydrate in the macro mass, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PfcRatio {
    pub prot: f64,
    pub fat: f64,
    pub carb: f64,
}

impl PfcRatio {
    /// None when there are no macros to split.
    pub fn of(n: &Nutrition) -> Option<Self> {
        let sum = n.prot + n.fat + n.carb;
        if sum.is_nan() || sum <= 0.0 {
            return None;
        }
        Some(Self {
            prot: n.prot / sum * 100.0,
            fat: n.fat / sum * 100.0,
            carb: n.carb / sum * 100.0,
        })
    }
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Meal;
    use time::macros::date;

    const EPS: f64 = 1e-9;

    fn egg() -> Food {
        Food {
            key: "egg".into(),
            name: "Egg".into(),
            brand: String::new(),
            cal100: 155.0,
            prot100: 13.0,
            fat100: 11.0,
            carb100: 1.1,
            comment: String::new(),
        }
    }

    fn entry(weight: f64) -> JournalEntry {
        JournalEntry {
            timestamp: date!(2024 - 01 - 01),
            meal: Meal::Breakfast,
            food_key: "egg".into(),
            food_weight: weight,
        }
    }

    #[test]
    fn hundred_grams_is_identity() {
        let n = compute_entry_nutrition(&entry(100.0), &egg());
        assert_eq!(n, Nutrition { cal: 155.0, prot: 13.0, fat: 11.0, carb: 1.1 });
    }

    #[test]
    fn linear_in_weight() {
        let food = egg();
        let a = compute_entry_nutrition(&entry(40.0), &food);
        let b = compute_entry_nutrition(&entry(60.0), &food);
        let whole = compute_entry_nutrition(&entry(100.0), &food);
        let sum = a + b;
        assert!((sum.cal - whole.cal).abs() < EPS);
        assert!((sum.prot - whole.prot).abs() < EPS);
        assert!((sum.fat - whole.fat).abs() < EPS);
        assert!((sum.carb - whole.carb).abs() < EPS);

        let double = compute_entry_nutrition(&entry(200.0), &food);
        assert!((double.cal - 2.0 * whole.cal).abs() < EPS);
    }

    #[test]
    fn sum_of_parts() {
        let parts = [
            Nutrition { cal: 1.0, prot: 2.0, fat: 3.0, carb: 4.0 },
            Nutrition { cal: 10.0, prot: 20.0, fat: 30.0, carb: 40.0 },
        ];
        let total: Nutrition = parts.iter().sum();
        assert_eq!(total, Nutrition { cal: 11.0, prot: 22.0, fat: 33.0, carb: 44.0 });
    }

    #[test]
    fn pfc_split() {
        let n = Nutrition { cal: 100.0, prot: 20.0, fat: 30.0, carb: 50.0 };
        let pfc = n.pfc().unwrap();
        assert!((pfc.prot - 20.0).abs() < EPS);
        assert!((pfc.fat - 30.0).abs() < EPS);
        assert!((pfc.carb - 50.0).abs() < EPS);

        assert!(Nutrition::default().pfc().is_none());
        assert!(Nutrition { cal: 50.0, ..Default::default() }.pfc().is_none());
    }

    #[test]
    fn mean_values() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[100.0, 200.0]), Some(150.0));
    }
}
