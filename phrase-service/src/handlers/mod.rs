//! HTTP handlers for the phrase relay.

pub mod health;
pub mod metrics;
pub mod phrases;
