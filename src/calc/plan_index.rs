use crate::calc::view_window::date_key;
use crate::data::{DayPlan, TimeSlot};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// All sessions for one calendar date, merged across day records.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IndexedDay {
    /// Weekday label from the first record seen for this date.
    pub day: String,
    pub date: String,
    pub time_slots: Vec<TimeSlot>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlanIndex {
    days: BTreeMap<String, IndexedDay>,
}

/// Folds day records into a date-keyed index. Records without a date are
/// dropped; records sharing a date have their slots concatenated in order.
pub fn build_index(records: &[DayPlan]) -> PlanIndex {
    let mut days: BTreeMap<String, IndexedDay> = BTreeMap::new();
    for record in records {
        let Some(date) = record.date.as_deref() else {
            continue;
        };
        let entry = days.entry(date.to_string()).or_insert_with(|| IndexedDay {
            day: record.day.clone(),
            date: date.to_string(),
            time_slots: Vec::new(),
        });
        if let Some(slots) = &record.time_slots {
            entry.time_slots.extend(slots.iter().cloned());
        }
    }
    PlanIndex { days }
}

impl PlanIndex {
    pub fn get(&self, key: &str) -> Option<&IndexedDay> {
        self.days.get(key)
    }

    pub fn get_date(&self, date: NaiveDate) -> Option<&IndexedDay> {
        self.get(&date_key(date))
    }

    pub fn slots_for(&self, date: NaiveDate) -> &[TimeSlot] {
        self.get_date(date)
            .map(|d| d.time_slots.as_slice())
            .unwrap_or(&[])
    }

    pub fn slot_count(&self, date: NaiveDate) -> usize {
        self.slots_for(date).len()
    }

    /// Date keys in ascending order.
    pub fn dates(&self) -> impl Iterator<Item = &str> {
        self.days.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}
