//! FleetDash - operator dashboard for a fleet of managed services.
//!
//! Keeps a live view of service up/down state and the activator subsystem in
//! sync with the orchestrator backend, and dispatches restart and activator
//! commands on the operator's behalf.

pub mod api;
pub mod catalog;
pub mod config;
pub mod console;
pub mod dashboard;
pub mod dispatch;
pub mod sync;
pub mod view;
