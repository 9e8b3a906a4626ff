use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One menu slot: a (day_of_week, meal_type) pair with its dish list,
/// price and remaining portion count.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MenuItem {
    pub id: Uuid,
    /// 1 = Monday .. 7 = Sunday
    pub day_of_week: i32,
    pub meal_type: String,
    /// Free-text dish composition, e.g. "Omelette, porridge, tea"
    pub dishes: String,
    pub price_cents: i64,
    pub available_quantity: i32,
}

/// Body for PUT /admin/menu (create or replace the slot for a day+meal pair).
#[derive(Debug, Deserialize)]
pub struct UpsertMenuItemRequest {
    pub day_of_week: Option<i32>,
    pub meal_type: Option<String>,
    pub dishes: Option<String>,
    pub price_cents: Option<i64>,
    pub available_quantity: Option<i32>,
}

/// Body for POST /cook/issue-meal — decrement the physical portion counter.
#[derive(Debug, Deserialize)]
pub struct IssueMealRequest {
    pub meal_id: Option<String>,
    pub quantity: Option<i32>,
}

#[derive(Debug, Default, Serialize)]
pub struct DayMenu {
    pub breakfast: Vec<MenuItem>,
    pub lunch: Vec<MenuItem>,
}

/// Group menu rows into the weekly shape: day 1..7 → {breakfast, lunch}.
/// Every day is present even when it has no items.
pub fn group_week(items: Vec<MenuItem>) -> BTreeMap<i32, DayMenu> {
    let mut week: BTreeMap<i32, DayMenu> = (1..=7).map(|d| (d, DayMenu::default())).collect();
    for item in items {
        let slot = week.entry(item.day_of_week).or_default();
        match item.meal_type.as_str() {
            "breakfast" => slot.breakfast.push(item),
            "lunch" => slot.lunch.push(item),
            _ => {}
        }
    }
    week
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(day: i32, meal_type: &str) -> MenuItem {
        MenuItem {
            id: Uuid::new_v4(),
            day_of_week: day,
            meal_type: meal_type.to_string(),
            dishes: "Omelette, porridge, tea".to_string(),
            price_cents: 15_000,
            available_quantity: 40,
        }
    }

    #[test]
    fn all_seven_days_are_present_even_when_empty() {
        let week = group_week(vec![]);
        assert_eq!(week.len(), 7);
        for day in 1..=7 {
            let slot = &week[&day];
            assert!(slot.breakfast.is_empty());
            assert!(slot.lunch.is_empty());
        }
    }

    #[test]
    fn items_land_in_their_day_and_meal_slot() {
        let week = group_week(vec![item(1, "breakfast"), item(1, "lunch"), item(3, "lunch")]);
        assert_eq!(week[&1].breakfast.len(), 1);
        assert_eq!(week[&1].lunch.len(), 1);
        assert_eq!(week[&3].breakfast.len(), 0);
        assert_eq!(week[&3].lunch.len(), 1);
        assert_eq!(week[&2].breakfast.len(), 0);
    }
}
