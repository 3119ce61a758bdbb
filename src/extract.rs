// File: ./src/extract.rs
//! Turns the structured calendar observations reported by a site driver into
//! a deduplicated set of appointment slots.
use crate::appointment::{AppointmentSet, Timestamp, slot};
use crate::lexicon::parse_month_label;

/// Number of consecutive calendar months inspected per cycle.
pub const DEFAULT_HORIZON_MONTHS: usize = 3;

/// One rendered month of the booking calendar.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CalendarPage {
    /// Header text, e.g. "November 2025".
    pub month_label: String,
    pub days: Vec<DayCell>,
}

/// A single day cell as rendered in the calendar grid.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DayCell {
    /// Visible day number, e.g. "19".
    pub day_label: String,
    /// The cell's date attribute in `dd/mm/yyyy` form. Calendars pad the
    /// grid with days of the adjacent months, which only this reveals.
    pub date_attribute: Option<String>,
    /// Whether the cell shows an offer marker.
    pub available: bool,
    /// Offered start times, `HH:MM` at the start of each label.
    pub time_labels: Vec<String>,
}

/// Collects every parseable slot across `pages`.
///
/// Pages whose month cannot be resolved, cells belonging to another month
/// and malformed time labels are skipped individually. `fallback_year` is
/// used for page headers that do not carry a year.
pub fn extract_appointments(pages: &[CalendarPage], fallback_year: i32) -> AppointmentSet {
    let mut found = AppointmentSet::new();

    for page in pages {
        let label = parse_month_label(&page.month_label, fallback_year);
        let Some(month) = label.month else {
            log::warn!(
                "Skipping calendar page with unknown month: '{}'",
                page.month_label
            );
            continue;
        };

        for cell in &page.days {
            found.extend(extract_day(cell, label.year, month));
        }
    }

    found
}

fn extract_day(cell: &DayCell, year: i32, month: u32) -> Vec<Timestamp> {
    let Some(cell_month) = cell.date_attribute.as_deref().and_then(attribute_month) else {
        log::debug!(
            "Skipping day '{}' without a readable date attribute",
            cell.day_label
        );
        return vec![];
    };
    if cell_month != month || !cell.available {
        return vec![];
    }

    let Ok(day) = cell.day_label.trim().parse::<u32>() else {
        log::warn!("Could not parse day number '{}'", cell.day_label);
        return vec![];
    };

    let mut slots = Vec::with_capacity(cell.time_labels.len());
    for label in &cell.time_labels {
        match parse_time_label(label).and_then(|(h, m)| slot(year, month, day, h, m)) {
            Some(ts) => slots.push(ts),
            None => log::warn!(
                "Could not parse datetime for {} {} {}: '{}'",
                day,
                month,
                year,
                label
            ),
        }
    }
    slots
}

/// Month component of a `dd/mm/yyyy` date attribute.
fn attribute_month(attr: &str) -> Option<u32> {
    attr.split('/').nth(1)?.trim().parse().ok()
}

/// Reads `HH:MM` from the start of a time label such as `"07:30 FR"`.
fn parse_time_label(label: &str) -> Option<(u32, u32)> {
    let label = label.trim();
    if label.get(2..3)? != ":" {
        return None;
    }
    let hour = label.get(0..2)?.parse().ok()?;
    let minute = label.get(3..5)?.parse().ok()?;
    Some((hour, minute))
}
