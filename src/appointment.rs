// File: ./src/appointment.rs
//! Appointment values shared by the extractor, the gate and the state store.
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::collections::btree_set;

/// A calendar-naive appointment slot (year, month, day, hour, minute).
///
/// Two slots are the same appointment iff all fields match; ordering is
/// chronological.
pub type Timestamp = NaiveDateTime;

/// The slot currently booked by the user, if it could be determined.
pub type ScheduledAppointment = Option<Timestamp>;

/// Deduplicated set of slots observed during one scrape cycle.
///
/// Backed by a `BTreeSet` so iteration is chronological, which keeps log
/// output and notification messages stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppointmentSet(BTreeSet<Timestamp>);

impl AppointmentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the slot was not already present.
    pub fn insert(&mut self, slot: Timestamp) -> bool {
        self.0.insert(slot)
    }

    pub fn contains(&self, slot: &Timestamp) -> bool {
        self.0.contains(slot)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_set::Iter<'_, Timestamp> {
        self.0.iter()
    }

    /// Earliest observed slot.
    pub fn earliest(&self) -> Option<Timestamp> {
        self.0.first().copied()
    }

    /// Slots in `self` that are absent from `previous` (set difference by value).
    pub fn difference(&self, previous: &AppointmentSet) -> AppointmentSet {
        self.0.difference(&previous.0).copied().collect()
    }

    /// Slots strictly earlier than `baseline`.
    pub fn earlier_than(&self, baseline: Timestamp) -> AppointmentSet {
        self.0.range(..baseline).copied().collect()
    }
}

impl FromIterator<Timestamp> for AppointmentSet {
    fn from_iter<I: IntoIterator<Item = Timestamp>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Timestamp> for AppointmentSet {
    fn extend<I: IntoIterator<Item = Timestamp>>(&mut self, iter: I) {
        self.0.extend(iter)
    }
}

impl IntoIterator for AppointmentSet {
    type Item = Timestamp;
    type IntoIter = btree_set::IntoIter<Timestamp>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a AppointmentSet {
    type Item = &'a Timestamp;
    type IntoIter = btree_set::Iter<'a, Timestamp>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Builds a slot from its five components, rejecting impossible dates.
pub fn slot(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Option<Timestamp> {
    chrono::NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(y: i32, m: u32, d: u32, h: u32, min: u32) -> Timestamp {
        slot(y, m, d, h, min).unwrap()
    }

    #[test]
    fn test_duplicates_collapse() {
        let set: AppointmentSet = [ts(2025, 11, 19, 7, 30), ts(2025, 11, 19, 7, 30)]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_difference_by_value() {
        let previous: AppointmentSet = [ts(2025, 10, 14, 12, 45)].into_iter().collect();
        let current: AppointmentSet = [ts(2025, 10, 14, 12, 45), ts(2025, 10, 16, 8, 0)]
            .into_iter()
            .collect();

        let new = current.difference(&previous);
        assert_eq!(new.len(), 1);
        assert!(new.contains(&ts(2025, 10, 16, 8, 0)));
    }

    #[test]
    fn test_earlier_than_is_strict() {
        let set: AppointmentSet = [
            ts(2025, 10, 15, 8, 0),
            ts(2025, 10, 20, 8, 0),
            ts(2025, 10, 25, 8, 0),
        ]
        .into_iter()
        .collect();

        let earlier = set.earlier_than(ts(2025, 10, 20, 8, 0));
        assert_eq!(earlier.len(), 1);
        assert_eq!(earlier.earliest(), Some(ts(2025, 10, 15, 8, 0)));
    }

    #[test]
    fn test_slot_rejects_impossible_dates() {
        assert!(slot(2025, 2, 30, 8, 0).is_none());
        assert!(slot(2025, 13, 1, 8, 0).is_none());
        assert!(slot(2025, 10, 1, 24, 0).is_none());
    }
}
