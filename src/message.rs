// File: ./src/message.rs
// Text rendering for logs and the Telegram notification.
use crate::appointment::{AppointmentSet, ScheduledAppointment, Timestamp};
use chrono::Locale;

pub const DISPLAY_FORMAT: &str = "%A, %d.%m.%Y %H:%M";

/// German rendering, e.g. "Mittwoch, 19.11.2025 07:30".
pub fn format_slot(slot: &Timestamp) -> String {
    // Only date and time fields are printed, the offset never shows up.
    slot.and_utc()
        .format_localized(DISPLAY_FORMAT, Locale::de_DE)
        .to_string()
}

/// Escapes text for Telegram's HTML parse mode.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Builds the notification body listing `appointments` in chronological order.
pub fn compose(url: &str, scheduled: ScheduledAppointment, appointments: &AppointmentSet) -> String {
    let lines: Vec<String> = appointments.iter().map(format_slot).collect();
    let link = format!("<a href=\"{}\">Termin ändern</a>", escape_html(url));

    let mut message = String::new();
    if let Some(booked) = scheduled {
        message.push_str("<b>Aktuell gebuchter Termin:</b>\n");
        message.push_str(&format_slot(&booked));
        message.push_str("\n\n");
    }
    message.push_str("<b>Verfügbare Prüfungstermine:</b>\n");
    message.push_str(&lines.join("\n"));
    message.push_str("\n\n");
    message.push_str(&link);
    message
}
