//! playwright-push - Prometheus Pushgateway exporter for Playwright test runs
//!
//! Reads a Playwright JSON report, aggregates pass/fail/skip counts and
//! durations, and pushes them as five gauges to a Pushgateway.

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod exposition;
pub mod push;
pub mod report;
pub mod telemetry;
