// File: ./src/runner.rs
// One watch cycle: read the site, extract slots, gate, notify.
use crate::appointment::{AppointmentSet, ScheduledAppointment};
use crate::config::Config;
use crate::driver::SiteDriver;
use crate::extract::{DEFAULT_HORIZON_MONTHS, extract_appointments};
use crate::gate::{NotificationGate, Verdict};
use crate::lexicon::parse_labelled_date;
use crate::message::{compose, format_slot};
use crate::notify::Notifier;
use crate::storage::DateStore;
use anyhow::Result;
use chrono::Datelike;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub scheduled: ScheduledAppointment,
    pub appointments: AppointmentSet,
    /// `None` when the gate was not consulted (no slots, or Telegram off).
    pub verdict: Option<Verdict>,
    pub notified: bool,
}

/// Runs a single cycle against `driver`.
///
/// `notifier` is only used when Telegram is enabled and configured; the
/// persisted state is only touched when the gate runs.
pub async fn run_cycle<D, N>(
    config: &Config,
    driver: &mut D,
    store: &mut dyn DateStore,
    notifier: Option<&N>,
) -> Result<CycleReport>
where
    D: SiteDriver,
    N: Notifier,
{
    let scheduled = read_scheduled(driver).await;
    match scheduled {
        Some(s) => log::info!("Currently scheduled date: {}", format_slot(&s)),
        None => log::warn!("No currently scheduled date found."),
    }

    let fallback_year = chrono::Local::now().year();
    let pages = driver.calendar_pages(DEFAULT_HORIZON_MONTHS).await;
    let appointments = extract_appointments(&pages, fallback_year);

    let mut report = CycleReport {
        scheduled,
        appointments,
        verdict: None,
        notified: false,
    };

    if report.appointments.is_empty() {
        log::info!("No available dates found.");
        return Ok(report);
    }

    log::info!("Available dates:");
    for slot in &report.appointments {
        log::info!("  - {}", format_slot(slot));
    }
    if let (Some(first), Some(booked)) = (report.appointments.earliest(), scheduled)
        && first < booked
    {
        log::info!("Earliest slot is before the booked one: {}", format_slot(&first));
    }

    let Some(notifier) = notifier.filter(|_| config.telegram_ready()) else {
        log::debug!("Telegram disabled or incomplete; skipping notification.");
        return Ok(report);
    };

    let gate = NotificationGate::new(config.policy());
    let verdict = gate.decide(&report.appointments, scheduled, store)?;

    if verdict.should_notify() {
        let message = compose(&config.default.url, scheduled, &report.appointments);
        report.notified = notifier.send(&config.telegram.chat_id, &message).await;
    } else {
        log::info!("No new/earlier dates. Telegram message not sent.");
    }
    report.verdict = Some(verdict);

    Ok(report)
}

async fn read_scheduled<D: SiteDriver>(driver: &mut D) -> ScheduledAppointment {
    let label = driver.scheduled_label().await?;
    let parsed = parse_labelled_date(&label);
    if parsed.is_none() {
        log::warn!("Could not parse scheduled date: '{}'", label.trim());
    }
    parsed
}
