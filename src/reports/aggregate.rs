//! Pure folding of joined journal/food rows into reports.

use serde::Serialize;
use time::Date;

use super::nutrition::{compute_entry_nutrition, Nutrition, PfcRatio};
use crate::day_format;
use crate::models::{Activity, Food, JournalEntry, Meal, UserSettings};

/// A journal entry joined with its food.
#[derive(Debug, Clone)]
pub struct ReportLine {
    pub entry: JournalEntry,
    pub food: Food,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportItem {
    pub food_key: String,
    pub food_name: String,
    pub food_brand: String,
    pub food_weight: f64,
    #[serde(flatten)]
    pub nutrition: Nutrition,
}

impl From<&ReportLine> for ReportItem {
    fn from(line: &ReportLine) -> Self {
        ReportItem {
            food_key: line.entry.food_key.clone(),
            food_name: line.food.name.clone(),
            food_brand: line.food.brand.clone(),
            food_weight: line.entry.food_weight,
            nutrition: compute_entry_nutrition(&line.entry, &line.food),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealReport {
    #[serde(with = "day_format")]
    pub timestamp: Date,
    pub meal: Meal,
    pub items: Vec<ReportItem>,
    pub total: Nutrition,
    pub day_total: Nutrition,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealGroup {
    pub meal: Meal,
    pub items: Vec<ReportItem>,
    pub subtotal: Nutrition,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayReport {
    #[serde(with = "day_format")]
    pub timestamp: Date,
    pub meals: Vec<MealGroup>,
    pub total: Nutrition,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodReport {
    #[serde(with = "day_format")]
    pub from: Date,
    #[serde(with = "day_format")]
    pub to: Date,
    pub days: Vec<DayReport>,
    pub total: Nutrition,
    pub pfc: Option<PfcRatio>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayStats {
    #[serde(with = "day_format")]
    pub timestamp: Date,
    pub total: Nutrition,
    /// `total.cal - cal_limit`; positive is a surplus.
    pub delta: Option<f64>,
    /// Logged activity of the day, else the user's default.
    pub active_cal: Option<f64>,
    /// `cal_limit + active_cal - total.cal`; what is left to eat.
    pub budget_delta: Option<f64>,
    pub has_entries: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodStats {
    #[serde(with = "day_format")]
    pub from: Date,
    #[serde(with = "day_format")]
    pub to: Date,
    pub cal_limit: Option<f64>,
    pub days: Vec<DayStats>,
    pub total: Nutrition,
    /// Mean over days that have entries.
    pub average: Nutrition,
    pub average_pfc: Option<PfcRatio>,
}

/// Meal report for one slot; `day` holds every line of that day.
pub fn meal_report(timestamp: Date, meal: Meal, day: &[ReportLine]) -> Option<MealReport> {
    let items: Vec<ReportItem> = day
        .iter()
        .filter(|l| l.entry.meal == meal)
        .map(ReportItem::from)
        .collect();
    if items.is_empty() {
        return None;
    }
    Some(MealReport {
        timestamp,
        meal,
        total: items.iter().map(|i| i.nutrition).sum(),
        day_total: day.iter().map(|l| compute_entry_nutrition(&l.entry, &l.food)).sum(),
        items,
    })
}

/// Expects `lines` ordered by date, then meal.
pub fn period_report(from: Date, to: Date, lines: &[ReportLine]) -> Option<PeriodReport> {
    if lines.is_empty() {
        return None;
    }

    let mut days: Vec<DayReport> = Vec::new();
    for line in lines {
        let item = ReportItem::from(line);
        let ts = line.entry.timestamp;
        let meal = line.entry.meal;

        if days.last().map(|d| d.timestamp) != Some(ts) {
            days.push(DayReport {
                timestamp: ts,
                meals: Vec::new(),
                total: Nutrition::default(),
            });
        }
        let Some(day) = days.last_mut() else { continue };
        day.total += item.nutrition;

        if day.meals.last().map(|g| g.meal) != Some(meal) {
            day.meals.push(MealGroup {
                meal,
                items: Vec::new(),
                subtotal: Nutrition::default(),
            });
        }
        if let Some(group) = day.meals.last_mut() {
            group.subtotal += item.nutrition;
            group.items.push(item);
        }
    }

    let total: Nutrition = days.iter().map(|d| d.total).sum();
    Some(PeriodReport {
        from,
        to,
        days,
        total,
        pfc: total.pfc(),
    })
}

/// One row per calendar day in `[from, to]`, including empty days.
/// Expects `lines` and `activities` ordered by date.
pub fn period_stats(
    from: Date,
    to: Date,
    lines: &[ReportLine],
    activities: &[Activity],
    settings: Option<&UserSettings>,
) -> PeriodStats {
    let cal_limit = settings.map(|s| s.cal_limit);
    let mut lines = lines.iter().peekable();
    let mut activities = activities.iter().peekable();

    let mut days = Vec::new();
    let mut next = Some(from);
    while let Some(day) = next.filter(|d| *d <= to) {
        let mut total = Nutrition::default();
        let mut has_entries = false;
        while let Some(line) = lines.next_if(|l| l.entry.timestamp <= day) {
            if line.entry.timestamp == day {
                total += compute_entry_nutrition(&line.entry, &line.food);
                has_entries = true;
            }
        }

        let mut active_cal = settings.map(|s| s.default_active_cal);
        while let Some(activity) = activities.next_if(|a| a.timestamp <= day) {
            if activity.timestamp == day {
                active_cal = Some(activity.active_cal);
            }
        }

        days.push(DayStats {
            timestamp: day,
            total,
            delta: cal_limit.map(|limit| total.cal - limit),
            active_cal,
            budget_delta: cal_limit
                .zip(active_cal)
                .map(|(limit, active)| limit + active - total.cal),
            has_entries,
        });
        next = day.next_day();
    }

    let total: Nutrition = days.iter().map(|d| d.total).sum();
    let filled = days.iter().filter(|d| d.has_entries).count();
    let average = if filled > 0 {
        total.scale(1.0 / filled as f64)
    } else {
        Nutrition::default()
    };

    PeriodStats {
        from,
        to,
        cal_limit,
        days,
        total,
        average,
        average_pfc: average.pfc(),
    }
}
