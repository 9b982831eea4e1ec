use std::collections::BTreeSet;

use time::Month;
use tracing::info;

use super::repo_types::{MealSlot, PlannedMeal};
use crate::{date_key::DateKey, meals::repo_types::MealId};

/// Day-by-day meal assignments. Holds at most one entry per `(date, slot)`.
#[derive(Debug, Default)]
pub struct DayPlanIndex {
    entries: Vec<PlannedMeal>,
}

impl DayPlanIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries for `date`, in the order they were first assigned.
    pub fn planned_for(&self, date: DateKey) -> Vec<&PlannedMeal> {
        self.entries.iter().filter(|pm| pm.date == date).collect()
    }

    pub fn slot(&self, date: DateKey, slot: MealSlot) -> Option<&PlannedMeal> {
        self.entries
            .iter()
            .find(|pm| pm.date == date && pm.meal_type == slot)
    }

    /// Puts `meal_id` into the slot. An occupied slot is overwritten in place
    /// and the meal it held is returned.
    pub fn assign(&mut self, date: DateKey, slot: MealSlot, meal_id: MealId) -> Option<MealId> {
        if let Some(existing) = self
            .entries
            .iter_mut()
            .find(|pm| pm.date == date && pm.meal_type == slot)
        {
            let previous = std::mem::replace(&mut existing.meal_id, meal_id);
            info!(%date, %slot, meal_id = %existing.meal_id, previous = %previous, "slot reassigned");
            return Some(previous);
        }

        info!(%date, %slot, meal_id = %meal_id, "meal planned");
        self.entries.push(PlannedMeal {
            date,
            meal_type: slot,
            meal_id,
        });
        None
    }

    pub fn unassign(&mut self, date: DateKey, slot: MealSlot) -> Option<PlannedMeal> {
        let pos = self
            .entries
            .iter()
            .position(|pm| pm.date == date && pm.meal_type == slot)?;
        let removed = self.entries.remove(pos);
        info!(%date, %slot, meal_id = %removed.meal_id, "slot cleared");
        Some(removed)
    }

    /// Days of the month with at least one assignment, ascending.
    pub fn days_with_meals(&self, year: i32, month: Month) -> Vec<DateKey> {
        self.entries
            .iter()
            .map(|pm| pm.date)
            .filter(|d| d.in_month(year, month))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn day(d: time::Date) -> DateKey {
        DateKey::from(d)
    }

    #[test]
    fn planned_for_filters_by_day_in_insertion_order() {
        let mut plan = DayPlanIndex::new();
        let monday = day(date!(2024 - 03 - 04));
        let tuesday = day(date!(2024 - 03 - 05));
        plan.assign(tuesday, MealSlot::Dinner, "m3".into());
        plan.assign(monday, MealSlot::Lunch, "m1".into());
        plan.assign(tuesday, MealSlot::Breakfast, "m2".into());

        let ids: Vec<_> = plan
            .planned_for(tuesday)
            .iter()
            .map(|pm| pm.meal_id.as_str().to_string())
            .collect();
        assert_eq!(ids, vec!["m3", "m2"]);
        assert!(plan.planned_for(day(date!(2024 - 03 - 06))).is_empty());
    }

    #[test]
    fn assign_replaces_an_occupied_slot() {
        let mut plan = DayPlanIndex::new();
        let d = day(date!(2024 - 03 - 05));
        assert_eq!(plan.assign(d, MealSlot::Lunch, "m1".into()), None);
        assert_eq!(
            plan.assign(d, MealSlot::Lunch, "m2".into()),
            Some(MealId::from("m1"))
        );
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.slot(d, MealSlot::Lunch).unwrap().meal_id.as_str(), "m2");
    }

    #[test]
    fn same_meal_may_fill_several_slots() {
        let mut plan = DayPlanIndex::new();
        let d = day(date!(2024 - 03 - 05));
        plan.assign(d, MealSlot::Breakfast, "m1".into());
        plan.assign(d, MealSlot::Snack, "m1".into());
        assert_eq!(plan.planned_for(d).len(), 2);
    }

    #[test]
    fn unassign_frees_the_slot() {
        let mut plan = DayPlanIndex::new();
        let d = day(date!(2024 - 03 - 05));
        plan.assign(d, MealSlot::Dinner, "m1".into());
        let removed = plan.unassign(d, MealSlot::Dinner).expect("was planned");
        assert_eq!(removed.meal_id.as_str(), "m1");
        assert!(plan.slot(d, MealSlot::Dinner).is_none());
        assert!(plan.unassign(d, MealSlot::Dinner).is_none());
        assert!(plan.is_empty());
    }

    #[test]
    fn calendar_markers_are_unique_and_sorted() {
        let mut plan = DayPlanIndex::new();
        plan.assign(day(date!(2024 - 03 - 20)), MealSlot::Lunch, "m1".into());
        plan.assign(day(date!(2024 - 03 - 02)), MealSlot::Lunch, "m1".into());
        plan.assign(day(date!(2024 - 03 - 20)), MealSlot::Dinner, "m2".into());
        plan.assign(day(date!(2024 - 04 - 01)), MealSlot::Dinner, "m2".into());

        let days: Vec<_> = plan
            .days_with_meals(2024, Month::March)
            .into_iter()
            .map(|d| d.to_string())
            .collect();
        assert_eq!(days, vec!["2024-03-02", "2024-03-20"]);
    }

    #[test]
    fn slot_names_accept_lowercase() {
        let slot: MealSlot = serde_json::from_str("\"snack\"").unwrap();
        assert_eq!(slot, MealSlot::Snack);
        assert_eq!(serde_json::to_string(&MealSlot::Lunch).unwrap(), "\"Lunch\"");
    }
}
