#![doc(test(attr(deny(warnings))))]

//! Converter Core maintains user accounts, the formula catalog, per-user
//! ordered favorites and the history of calculation results for the unit
//! converter front ends.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod storage;
pub mod utils;

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    init_with_filter(config::DEFAULT_LOG_FILTER);
}

/// Same as [`init`] with explicit filter directives (`RUST_LOG` still wins).
pub fn init_with_filter(directives: &str) {
    utils::init_tracing_with(directives);
}
