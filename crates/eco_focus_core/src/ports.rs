//! crates/eco_focus_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or APIs.

use async_trait::async_trait;
use crate::domain::{Report, SummaryRequest};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PortError {
    /// The remote service could not be reached or answered with a failure status.
    #[error("Service unavailable: {0}")]
    Unavailable(String),
    /// The remote service answered, but not in the shape we expect.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait CarbonEstimateService: Send + Sync {
    /// Estimates kg CO₂ for `kwh` of grid electricity in the given 2-letter country.
    async fn estimate_electricity(&self, kwh: f64, country: &str) -> PortResult<f64>;

    /// Estimates kg CO₂ for driving `distance_km` in a specific vehicle model.
    async fn estimate_vehicle(&self, distance_km: f64, vehicle_model_id: &str) -> PortResult<f64>;
}

#[async_trait]
pub trait SummaryGenerationService: Send + Sync {
    /// Produces a free-text sustainability summary for the given metrics.
    async fn generate_summary(&self, request: &SummaryRequest) -> PortResult<String>;
}

#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn save_report(&self, report: &Report) -> PortResult<()>;

    /// Returns at most `limit` reports for `nickname`, newest first.
    async fn fetch_recent_reports(&self, nickname: &str, limit: usize) -> PortResult<Vec<Report>>;
}
