//! Reconciliation of municipal property-edit feeds against an authoritative registry.
//!
//! The decision logic lives under [`workflows`]: the record locator and edit classifier
//! triage one feed row at a time, while the snapshot comparator diffs two full property
//! collections. Everything else in the crate is plumbing that feeds those pure functions.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
