//! crates/eco_focus_core/src/service.rs
//!
//! Runs one "generate report" action end to end against the injected ports.
//!
//! Only invalid input stops the flow. Summary, save and history failures are
//! captured in the returned `GeneratedReport` so the computed report is never lost.

use crate::domain::{ActivityInput, Report, SummaryRequest, ValidationError, MAX_QUANTITY};
use crate::emissions;
use crate::ports::{CarbonEstimateService, PortResult, ReportStore, SummaryGenerationService};
use crate::sdg::{score_alignment, AlignmentMetrics, SdgAlignment};
use std::sync::Arc;
use tracing::{error, info};

pub const DEFAULT_HISTORY_LIMIT: usize = 5;

/// Everything produced by a single generate action.
#[derive(Debug)]
pub struct GeneratedReport {
    pub report: Report,
    pub alignment: SdgAlignment,
    pub summary: PortResult<String>,
    pub saved: PortResult<()>,
    pub history: PortResult<Vec<Report>>,
}

#[derive(Clone)]
pub struct ImpactReportService {
    carbon: Arc<dyn CarbonEstimateService>,
    summarizer: Arc<dyn SummaryGenerationService>,
    store: Arc<dyn ReportStore>,
    history_limit: usize,
}

impl ImpactReportService {
    pub fn new(
        carbon: Arc<dyn CarbonEstimateService>,
        summarizer: Arc<dyn SummaryGenerationService>,
        store: Arc<dyn ReportStore>,
    ) -> Self {
        Self {
            carbon,
            summarizer,
            store,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    pub fn with_history_limit(mut self, history_limit: usize) -> Self {
        self.history_limit = history_limit;
        self
    }

    pub async fn generate(&self, input: ActivityInput) -> Result<GeneratedReport, ValidationError> {
        input.validate()?;

        // --- 1. Emissions & Digital Impact ---
        let breakdown = emissions::estimate_breakdown(self.carbon.as_ref(), &input).await;
        let digital_impact = emissions::digital_impact(&input);
        let report = Report::new(input, breakdown, digital_impact);
        info!(
            report_id = %report.id,
            total_footprint = report.total_footprint(),
            "Computed impact report"
        );

        // --- 2. SDG Alignment ---
        let alignment = score_alignment(&AlignmentMetrics::from_report(&report));

        // --- 3. Summary ---
        let summary = self
            .summarizer
            .generate_summary(&SummaryRequest::from_report(&report))
            .await;
        if let Err(e) = &summary {
            error!("Failed to generate summary for report {}: {:?}", report.id, e);
        }

        // --- 4. Persist & Load History ---
        let saved = self.store.save_report(&report).await;
        match &saved {
            Ok(()) => info!("Saved report {}", report.id),
            Err(e) => error!("Failed to save report {}: {:?}", report.id, e),
        }

        let history = self.history(&report.input.nickname).await;

        Ok(GeneratedReport {
            report,
            alignment,
            summary,
            saved,
            history,
        })
    }

    /// The most recent reports for `nickname`, newest first.
    pub async fn history(&self, nickname: &str) -> PortResult<Vec<Report>> {
        let history = self
            .store
            .fetch_recent_reports(nickname, self.history_limit)
            .await;
        if let Err(e) = &history {
            error!("Failed to fetch report history for '{}': {:?}", nickname, e);
        }
        history
    }

    /// Remote vehicle estimate with the local distance fallback.
    pub async fn estimate_vehicle(
        &self,
        distance_km: f64,
        vehicle_model_id: &str,
    ) -> Result<f64, ValidationError> {
        if !distance_km.is_finite() || distance_km < 0.0 {
            return Err(ValidationError::InvalidQuantity {
                field: "distance_km",
                value: distance_km,
            });
        }
        if distance_km > MAX_QUANTITY {
            return Err(ValidationError::QuantityTooLarge {
                field: "distance_km",
                value: distance_km,
            });
        }
        Ok(
            emissions::estimate_vehicle_emissions(self.carbon.as_ref(), distance_km, vehicle_model_id)
                .await,
        )
    }
}
