//! Real-time bus arrival server.
//!
//! Answers: "when do the buses arrive at this stop?" by joining a stop's
//! static route listing with its live arrival feed from the Taipei bus
//! PDA service.

pub mod domain;
pub mod format;
pub mod pda;
pub mod reconcile;
pub mod registry;
pub mod service;
pub mod web;
