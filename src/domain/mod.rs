//! Domain models with validation
//!
//! This module contains the alert payload exchanged with Keep. Every payload is
//! validated on construction and again right before it is transmitted.

pub mod payload;
pub mod status;

pub use payload::{AlertPayload, UnknownKeyPolicy, MAX_TEXT_LENGTH};
pub use status::{AlertSeverity, AlertStatus};
