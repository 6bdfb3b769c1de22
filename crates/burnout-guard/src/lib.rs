//! BurnoutGuard: burnout risk scoring for journal entries.
//!
//! Fuses an emotion signal read from free text with weighted lifestyle factors (activities,
//! sleep, self-reported stress) into a bounded 0-100 score, a risk tier, and recommendations.

pub mod analysis;
pub mod config;
pub mod error;
pub mod telemetry;
