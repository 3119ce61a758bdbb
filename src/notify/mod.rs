// File: ./src/notify/mod.rs
pub mod middleware;
pub mod telegram;

pub use telegram::TelegramNotifier;

use std::future::Future;

/// Delivers a notification message to a chat.
///
/// Delivery problems are logged by the implementation and reported as
/// `false`; they never abort a cycle.
pub trait Notifier {
    fn send(&self, chat_id: &str, message: &str) -> impl Future<Output = bool>;
}
