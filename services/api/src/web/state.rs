//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use eco_focus_core::ports::{CarbonEstimateService, ReportStore, SummaryGenerationService};
use eco_focus_core::service::ImpactReportService;
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub reports: ImpactReportService,
}

impl AppState {
    /// Wires the adapters into the report service.
    pub fn new(
        config: &Config,
        carbon: Arc<dyn CarbonEstimateService>,
        summarizer: Arc<dyn SummaryGenerationService>,
        store: Arc<dyn ReportStore>,
    ) -> Self {
        let reports = ImpactReportService::new(carbon, summarizer, store)
            .with_history_limit(config.history_limit);
        Self { reports }
    }
}
