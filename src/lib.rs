#![doc(test(attr(deny(warnings))))]

//! Rental Core is the back office of an event-equipment rental business: clients,
//! suppliers, inventory, quotes and orders, an accounting ledger, and the
//! scheduler that turns recurring obligations into ledger movements.

pub mod cli;
pub mod config;
pub mod core;
pub mod ledger;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    init_with(None);
}

/// Like [`init`], with an extra filter directive such as the configured log level.
pub fn init_with(log_level: Option<&str>) {
    INIT_TRACING.call_once(|| {
        utils::init_tracing(log_level);
        tracing::info!("Rental Core tracing initialized.");
    });
}
