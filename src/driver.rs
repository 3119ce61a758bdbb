// File: ./src/driver.rs
//! Contract between the watcher and whatever drives the booking site.
//!
//! A driver navigates the reservation, opens the slot picker and reports
//! what it sees in structured form. Waiting on the page is the driver's
//! business: an element that never shows up is reported as absent.
use crate::config::DateLanguage;
use crate::extract::{CalendarPage, DayCell};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

pub trait SiteDriver {
    /// Raw text of the currently booked slot, e.g. "Mittwoch 19 november 2025  07:30".
    fn scheduled_label(&mut self) -> impl Future<Output = Option<String>>;

    /// Up to `horizon` consecutive calendar months, starting with the one shown first.
    fn calendar_pages(&mut self, horizon: usize) -> impl Future<Output = Vec<CalendarPage>>;
}

/// A captured site state, as written by an external browser session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteSnapshot {
    #[serde(default)]
    pub scheduled: Option<String>,
    #[serde(default)]
    pub pages: Vec<SnapshotPage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotPage {
    pub month: String,
    #[serde(default)]
    pub days: Vec<SnapshotDay>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotDay {
    pub day: String,
    /// `dd/mm/yyyy` date attribute of the cell.
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub offer: bool,
    #[serde(default)]
    pub offers: Vec<SnapshotOffer>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotOffer {
    pub time: String,
    /// Language code of the offer's flag; offers without one are dropped.
    #[serde(default)]
    pub language: Option<String>,
}

/// Replays a `SiteSnapshot`, keeping only offers in the configured languages.
#[derive(Debug, Clone)]
pub struct SnapshotDriver {
    snapshot: SiteSnapshot,
    languages: Vec<DateLanguage>,
}

impl SnapshotDriver {
    pub fn new(snapshot: SiteSnapshot, languages: Vec<DateLanguage>) -> Self {
        Self {
            snapshot,
            languages,
        }
    }

    /// Reads a snapshot from `path`, or from stdin when `path` is `-`.
    pub fn from_path(path: &Path, languages: Vec<DateLanguage>) -> Result<Self> {
        let json = if path.as_os_str() == "-" {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read snapshot from stdin")?;
            buf
        } else {
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read snapshot {:?}", path))?
        };
        let snapshot: SiteSnapshot = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse snapshot {:?}", path))?;
        Ok(Self::new(snapshot, languages))
    }

    fn wants(&self, offer: &SnapshotOffer) -> bool {
        offer
            .language
            .as_deref()
            .and_then(|code| DateLanguage::from_str(code).ok())
            .is_some_and(|lang| self.languages.contains(&lang))
    }

    fn to_cell(&self, day: &SnapshotDay) -> DayCell {
        DayCell {
            day_label: day.day.clone(),
            date_attribute: day.date.clone(),
            available: day.offer,
            time_labels: day
                .offers
                .iter()
                .filter(|o| self.wants(o))
                .map(|o| o.time.clone())
                .collect(),
        }
    }
}

impl SiteDriver for SnapshotDriver {
    async fn scheduled_label(&mut self) -> Option<String> {
        self.snapshot.scheduled.clone()
    }

    async fn calendar_pages(&mut self, horizon: usize) -> Vec<CalendarPage> {
        self.snapshot
            .pages
            .iter()
            .take(horizon)
            .map(|page| CalendarPage {
                month_label: page.month.clone(),
                days: page.days.iter().map(|d| self.to_cell(d)).collect(),
            })
            .collect()
    }
}
