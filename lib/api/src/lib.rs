//! HTTP layer of the candidate scorer

pub mod rest;
pub mod state;

pub use rest::{configure, RestApi};
pub use state::{HealthStatus, LoadSummary, ScorerState};
