// File: ./src/gate.rs
//! Decides whether a freshly scraped appointment set is worth a notification.
//!
//! Persistence and notification are separate outcomes: any slot that was not
//! in the persisted set replaces the record, even when the policy then keeps
//! quiet about it.
use crate::appointment::{AppointmentSet, ScheduledAppointment};
use crate::storage::DateStore;
use anyhow::Result;

/// Gating options, read from the `[TELEGRAM]` config section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotificationPolicy {
    /// Notify on every run, skipping all comparisons.
    pub force_notify: bool,
    /// Only notify when a new slot precedes the booked one.
    pub notify_only_if_earlier: bool,
}

/// Outcome of a gate evaluation, with the slots that justified it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// `force_notify` was set.
    Forced,
    /// New slots appeared and any new slot is reportable.
    NewDates(AppointmentSet),
    /// No booked slot exists to compare against. Always reported, even when
    /// the carried set of new slots is empty.
    NoBaseline(AppointmentSet),
    /// New slots earlier than the booked one.
    Earlier(AppointmentSet),
    /// New slots appeared, all on or after the booked one.
    NotEarlier(AppointmentSet),
    /// Nothing new against the persisted set, and a booked slot exists.
    Unchanged,
}

impl Verdict {
    pub fn should_notify(&self) -> bool {
        matches!(
            self,
            Verdict::Forced | Verdict::NewDates(_) | Verdict::NoBaseline(_) | Verdict::Earlier(_)
        )
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NotificationGate {
    policy: NotificationPolicy,
}

impl NotificationGate {
    pub fn new(policy: NotificationPolicy) -> Self {
        Self { policy }
    }

    /// Compares `current` with the persisted set and the booked slot.
    ///
    /// Side effect: when `current` holds at least one slot missing from the
    /// store, the store is overwritten with `current`.
    ///
    /// Without a booked slot the verdict always notifies; the available list
    /// is then the only thing the user has to go on.
    pub fn decide(
        &self,
        current: &AppointmentSet,
        scheduled: ScheduledAppointment,
        store: &mut dyn DateStore,
    ) -> Result<Verdict> {
        if self.policy.force_notify {
            log::info!("FORCE_NOTIFY is set. Notifying regardless of dates.");
            return Ok(Verdict::Forced);
        }

        let previous = store.load();
        let new_dates = current.difference(&previous);
        if new_dates.is_empty() {
            log::debug!("No new dates since last run ({} known)", previous.len());
        } else {
            log::info!("{} new date(s) since last run", new_dates.len());
            store.save(current)?;
            if !self.policy.notify_only_if_earlier {
                return Ok(Verdict::NewDates(new_dates));
            }
        }

        let Some(baseline) = scheduled else {
            return Ok(Verdict::NoBaseline(new_dates));
        };
        if new_dates.is_empty() {
            return Ok(Verdict::Unchanged);
        }

        let earlier = new_dates.earlier_than(baseline);
        if earlier.is_empty() {
            Ok(Verdict::NotEarlier(new_dates))
        } else {
            Ok(Verdict::Earlier(earlier))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appointment::{Timestamp, slot};
    use crate::storage::MemoryDateStore;

    fn ts(y: i32, m: u32, d: u32, h: u32, min: u32) -> Timestamp {
        slot(y, m, d, h, min).unwrap()
    }

    fn set(items: &[Timestamp]) -> AppointmentSet {
        items.iter().copied().collect()
    }

    const EARLIER_ONLY: NotificationPolicy = NotificationPolicy {
        force_notify: false,
        notify_only_if_earlier: true,
    };

    #[test]
    fn test_force_notify_always_true_and_leaves_state_alone() {
        let gate = NotificationGate::new(NotificationPolicy {
            force_notify: true,
            notify_only_if_earlier: true,
        });
        let known = set(&[ts(2025, 10, 14, 12, 45)]);
        let mut store = MemoryDateStore::with_dates(known.clone());

        for scheduled in [None, Some(ts(2020, 1, 1, 8, 0))] {
            let verdict = gate.decide(&known, scheduled, &mut store).unwrap();
            assert_eq!(verdict, Verdict::Forced);
            assert!(verdict.should_notify());
        }
        let verdict = gate
            .decide(&AppointmentSet::new(), None, &mut store)
            .unwrap();
        assert!(verdict.should_notify());
        assert_eq!(store.saves, 0);
    }

    #[test]
    fn test_new_date_notifies_and_replaces_state() {
        let gate = NotificationGate::default();
        let mut store = MemoryDateStore::with_dates(set(&[ts(2025, 10, 14, 12, 45)]));
        let current = set(&[ts(2025, 10, 16, 8, 0)]);

        let verdict = gate.decide(&current, None, &mut store).unwrap();
        assert!(verdict.should_notify());
        assert_eq!(verdict, Verdict::NewDates(current.clone()));
        assert_eq!(store.dates, current);
    }

    #[test]
    fn test_unchanged_set_notifies_without_schedule() {
        let known = set(&[ts(2025, 10, 14, 12, 45)]);
        for policy in [NotificationPolicy::default(), EARLIER_ONLY] {
            let gate = NotificationGate::new(policy);
            let mut store = MemoryDateStore::with_dates(known.clone());

            let verdict = gate.decide(&known, None, &mut store).unwrap();
            assert_eq!(verdict, Verdict::NoBaseline(AppointmentSet::new()));
            assert!(verdict.should_notify());
            // Nothing new, so nothing is written
            assert_eq!(store.saves, 0);
            assert_eq!(store.dates, known);
        }
    }

    #[test]
    fn test_unchanged_set_does_not_notify_with_schedule() {
        let known = set(&[ts(2025, 10, 14, 12, 45)]);
        for policy in [NotificationPolicy::default(), EARLIER_ONLY] {
            let gate = NotificationGate::new(policy);
            let mut store = MemoryDateStore::with_dates(known.clone());
            let verdict = gate
                .decide(&known, Some(ts(2025, 12, 1, 8, 0)), &mut store)
                .unwrap();
            assert!(!verdict.should_notify());
        }
    }

    #[test]
    fn test_subset_of_known_dates_is_unchanged() {
        let gate = NotificationGate::default();
        let known = set(&[ts(2025, 10, 14, 12, 45), ts(2025, 10, 15, 9, 0)]);
        let mut store = MemoryDateStore::with_dates(known.clone());

        let current = set(&[ts(2025, 10, 15, 9, 0)]);
        let verdict = gate
            .decide(&current, Some(ts(2025, 12, 1, 8, 0)), &mut store)
            .unwrap();
        assert_eq!(verdict, Verdict::Unchanged);
        // A shrinking set is not persisted
        assert_eq!(store.dates, known);
    }

    #[test]
    fn test_earlier_only_later_date_is_quiet_but_persisted() {
        let gate = NotificationGate::new(EARLIER_ONLY);
        let mut store = MemoryDateStore::default();
        let current = set(&[ts(2025, 10, 25, 8, 0)]);

        let verdict = gate
            .decide(&current, Some(ts(2025, 10, 20, 8, 0)), &mut store)
            .unwrap();
        assert!(!verdict.should_notify());
        assert_eq!(verdict, Verdict::NotEarlier(current.clone()));
        assert_eq!(store.dates, current);
    }

    #[test]
    fn test_earlier_only_earlier_date_notifies() {
        let gate = NotificationGate::new(EARLIER_ONLY);
        let mut store = MemoryDateStore::default();
        let current = set(&[ts(2025, 10, 15, 8, 0), ts(2025, 10, 25, 8, 0)]);

        let verdict = gate
            .decide(&current, Some(ts(2025, 10, 20, 8, 0)), &mut store)
            .unwrap();
        assert!(verdict.should_notify());
        assert_eq!(verdict, Verdict::Earlier(set(&[ts(2025, 10, 15, 8, 0)])));
        assert_eq!(store.dates, current);
    }

    #[test]
    fn test_earlier_only_same_time_is_not_earlier() {
        let gate = NotificationGate::new(EARLIER_ONLY);
        let mut store = MemoryDateStore::default();
        let scheduled = ts(2025, 10, 20, 8, 0);

        let verdict = gate
            .decide(&set(&[scheduled]), Some(scheduled), &mut store)
            .unwrap();
        assert!(!verdict.should_notify());
    }

    #[test]
    fn test_earlier_only_without_schedule_notifies_on_new() {
        let gate = NotificationGate::new(EARLIER_ONLY);
        let mut store = MemoryDateStore::default();
        let current = set(&[ts(2025, 10, 25, 8, 0)]);

        let verdict = gate.decide(&current, None, &mut store).unwrap();
        assert_eq!(verdict, Verdict::NoBaseline(current));
        assert!(verdict.should_notify());
    }

    #[test]
    fn test_earlier_check_ignores_already_known_earlier_dates() {
        let gate = NotificationGate::new(EARLIER_ONLY);
        let early = ts(2025, 10, 1, 8, 0);
        let mut store = MemoryDateStore::with_dates(set(&[early]));

        // The known early slot is still listed; the only new one is later.
        let current = set(&[early, ts(2025, 11, 5, 8, 0)]);
        let verdict = gate
            .decide(&current, Some(ts(2025, 10, 20, 8, 0)), &mut store)
            .unwrap();
        assert!(!verdict.should_notify());
        assert_eq!(store.dates, current);
    }

    #[test]
    fn test_first_run_with_empty_store() {
        let gate = NotificationGate::default();
        let mut store = MemoryDateStore::default();

        let verdict = gate
            .decide(&AppointmentSet::new(), None, &mut store)
            .unwrap();
        assert_eq!(verdict, Verdict::NoBaseline(AppointmentSet::new()));
        assert_eq!(store.saves, 0);

        let verdict = gate
            .decide(&AppointmentSet::new(), Some(ts(2025, 12, 1, 8, 0)), &mut store)
            .unwrap();
        assert_eq!(verdict, Verdict::Unchanged);
    }

    #[test]
    fn test_second_run_repeats_only_without_schedule() {
        let gate = NotificationGate::default();
        let current = set(&[ts(2025, 10, 16, 8, 0)]);

        let mut store = MemoryDateStore::default();
        assert!(gate.decide(&current, None, &mut store).unwrap().should_notify());
        assert!(gate.decide(&current, None, &mut store).unwrap().should_notify());
        assert_eq!(store.saves, 1);

        let booked = Some(ts(2025, 12, 1, 8, 0));
        let mut store = MemoryDateStore::default();
        assert!(gate.decide(&current, booked, &mut store).unwrap().should_notify());
        assert!(!gate.decide(&current, booked, &mut store).unwrap().should_notify());
        assert_eq!(store.saves, 1);
    }
}
