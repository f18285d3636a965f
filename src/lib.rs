//! Liberty Dashboard -- Status Dashboard Updater
//!
//! A headless dashboard updater that polls a static `status.json`
//! document, renders its fields into a fixed set of page slots,
//! and writes the populated page out on every cycle.

pub mod types;
pub mod config;
pub mod error;
pub mod view;
pub mod render;
pub mod client;
pub mod updater;
pub mod session;
