//! Notification filtering and timeout resolution

pub mod policy;

pub use policy::{Decision, PolicyEngine};
