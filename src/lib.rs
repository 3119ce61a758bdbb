// Crate root library declaration and module exports.
pub mod appointment;
pub mod cli;
pub mod config;
pub mod context;
pub mod driver;
pub mod extract;
pub mod gate;
pub mod lexicon;
pub mod message;
pub mod notify;
pub mod runner;
pub mod storage;
