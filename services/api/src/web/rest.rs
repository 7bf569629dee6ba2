//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use eco_focus_core::domain::{
    round2, ActivityInput, RecycledMaterial, Report, TransportMode, UserType, ValidationError,
};
use eco_focus_core::ports::PortResult;
use eco_focus_core::sdg::{SdgAlignment, SdgGoal};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{error, info};
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        generate_report_handler,
        report_history_handler,
        vehicle_estimate_handler,
        health_handler,
    ),
    components(
        schemas(
            GenerateReportRequest,
            GenerateReportResponse,
            ReportHistoryResponse,
            VehicleEstimateRequest,
            VehicleEstimateResponse,
        )
    ),
    tags(
        (name = "Eco-Focus API", description = "Carbon footprint estimates, SDG alignment and AI impact summaries.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// The activity form. Every numeric field defaults to zero.
#[derive(Deserialize, Debug, ToSchema)]
#[serde(default)]
pub struct GenerateReportRequest {
    pub nickname: String,
    pub region: String,
    /// `Individual` or `Business`.
    pub user_type: String,
    /// Monthly energy use in kWh.
    pub energy_kwh: f64,
    /// Share of energy from renewables, 0 to 100.
    pub renewable_percent: f64,
    /// Monthly water use in liters.
    pub water_liters: f64,
    /// Weekly commute distance in km.
    pub commute_km: f64,
    /// `Car`, `Bike`, `Bus`, `Train` or `Electric Vehicle`.
    pub transport_mode: String,
    /// Weekly waste in kg.
    pub weekly_waste_kg: f64,
    /// Any of `Plastic`, `Glass`, `Paper`, `E-waste`, `Other`.
    pub recycle_types: Vec<String>,
    pub cards_shared: u32,
    pub meetings_held: u32,
    pub paper_cards_avoided: u32,
    pub travel_saved_km: f64,
}

impl Default for GenerateReportRequest {
    fn default() -> Self {
        Self {
            nickname: String::new(),
            region: String::new(),
            user_type: UserType::default().to_string(),
            energy_kwh: 0.0,
            renewable_percent: 0.0,
            water_liters: 0.0,
            commute_km: 0.0,
            transport_mode: TransportMode::default().to_string(),
            weekly_waste_kg: 0.0,
            recycle_types: Vec::new(),
            cards_shared: 0,
            meetings_held: 0,
            paper_cards_avoided: 0,
            travel_saved_km: 0.0,
        }
    }
}

impl GenerateReportRequest {
    fn into_domain(self) -> Result<ActivityInput, ValidationError> {
        let recycled: BTreeSet<RecycledMaterial> = self
            .recycle_types
            .iter()
            .map(|m| m.parse::<RecycledMaterial>())
            .collect::<Result<_, _>>()?;

        Ok(ActivityInput {
            nickname: self.nickname.trim().to_string(),
            region: self.region,
            user_type: self.user_type.parse()?,
            energy_kwh: self.energy_kwh,
            renewable_percent: self.renewable_percent,
            water_liters: self.water_liters,
            commute_km: self.commute_km,
            transport_mode: TransportMode::from(self.transport_mode.as_str()),
            weekly_waste_kg: self.weekly_waste_kg,
            recycled,
            cards_shared: self.cards_shared,
            meetings_held: self.meetings_held,
            paper_cards_avoided: self.paper_cards_avoided,
            travel_saved_km: self.travel_saved_km,
        })
    }
}

/// One row of the category breakdown table.
#[derive(Serialize, Debug, ToSchema)]
pub struct CategoryEmission {
    category: String,
    kg_co2: f64,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct RecyclingView {
    materials: Vec<String>,
    message: String,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct DigitalImpactView {
    kg_co2_avoided: f64,
    message: String,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct SdgGoalView {
    number: u8,
    id: String,
    title: String,
    description: String,
}

impl From<SdgGoal> for SdgGoalView {
    fn from(goal: SdgGoal) -> Self {
        Self {
            number: goal.number(),
            id: goal.id().to_string(),
            title: goal.title().to_string(),
            description: goal.description().to_string(),
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct SdgAlignmentView {
    aligned: bool,
    goals: Vec<SdgGoalView>,
    /// Present only when no goal matched.
    message: Option<String>,
}

impl From<&SdgAlignment> for SdgAlignmentView {
    fn from(alignment: &SdgAlignment) -> Self {
        match alignment {
            SdgAlignment::Aligned(goals) => Self {
                aligned: true,
                goals: goals.iter().copied().map(SdgGoalView::from).collect(),
                message: None,
            },
            SdgAlignment::NoAlignment => Self {
                aligned: false,
                goals: Vec::new(),
                message: Some(format!(
                    "{}. Your current impact doesn't match any SDG indicators yet. Keep going!",
                    SdgAlignment::NO_ALIGNMENT_MESSAGE
                )),
            },
        }
    }
}

/// A previous report, as shown in the history table.
#[derive(Serialize, Debug, ToSchema)]
pub struct HistoryRow {
    report_id: Uuid,
    /// Formatted as `YYYY-MM-DD HH:MM` (UTC).
    timestamp: String,
    total_footprint: f64,
    digital_impact: f64,
    cards_shared: u32,
    waste_emissions: f64,
}

impl From<&Report> for HistoryRow {
    fn from(report: &Report) -> Self {
        Self {
            report_id: report.id,
            timestamp: report.created_at.format("%Y-%m-%d %H:%M").to_string(),
            total_footprint: round2(report.total_footprint()),
            digital_impact: round2(report.digital_impact.kg_co2_avoided),
            cards_shared: report.input.cards_shared,
            waste_emissions: round2(report.emissions.waste),
        }
    }
}

/// The full result of a generate action. Partial failures are reported per section.
#[derive(Serialize, Debug, ToSchema)]
pub struct GenerateReportResponse {
    report_id: Uuid,
    created_at: DateTime<Utc>,
    nickname: String,
    total_footprint: f64,
    breakdown: Vec<CategoryEmission>,
    recycling: RecyclingView,
    digital_impact: DigitalImpactView,
    sdg_alignment: SdgAlignmentView,
    summary: Option<String>,
    summary_error: Option<String>,
    saved: bool,
    save_error: Option<String>,
    history: Vec<HistoryRow>,
    history_error: Option<String>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ReportHistoryResponse {
    nickname: String,
    reports: Vec<HistoryRow>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct VehicleEstimateRequest {
    pub distance_km: f64,
    pub vehicle_model_id: String,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct VehicleEstimateResponse {
    kg_co2: f64,
}

//=========================================================================================
// Presentation Helpers
//=========================================================================================

fn recycling_view(input: &ActivityInput) -> RecyclingView {
    let materials: Vec<String> = input.recycled.iter().map(|m| m.to_string()).collect();
    let message = if materials.is_empty() {
        "No recycling options selected.".to_string()
    } else {
        format!("You are recycling: {}", materials.join(", "))
    };
    RecyclingView { materials, message }
}

fn digital_impact_view(kg_co2_avoided: f64) -> DigitalImpactView {
    DigitalImpactView {
        kg_co2_avoided: round2(kg_co2_avoided),
        message: format!(
            "Thanks to your digital habits, you've helped avoid approximately {:.2} kg CO₂ via digital cards and reduced travel.",
            kg_co2_avoided
        ),
    }
}

fn split_outcome<T>(outcome: PortResult<T>, context: &str) -> (Option<T>, Option<String>) {
    match outcome {
        Ok(value) => (Some(value), None),
        Err(e) => (None, Some(format!("{}: {}", context, e))),
    }
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Generate an impact report from the activity form.
///
/// Summary, save and history failures don't fail the request; they are
/// reported in the matching `*_error` field next to the computed report.
#[utoipa::path(
    post,
    path = "/reports",
    request_body = GenerateReportRequest,
    responses(
        (status = 200, description = "Report generated", body = GenerateReportResponse),
        (status = 400, description = "Invalid activity data")
    )
)]
pub async fn generate_report_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<GenerateReportRequest>,
) -> Result<Json<GenerateReportResponse>, (StatusCode, String)> {
    let input = payload
        .into_domain()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let generated = app_state
        .reports
        .generate(input)
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let report = &generated.report;
    info!("Generated report {} for '{}'", report.id, report.input.nickname);

    let breakdown = [
        ("Energy", report.emissions.energy),
        ("Water", report.emissions.water),
        ("Commute", report.emissions.commute),
        ("Waste", report.emissions.waste),
    ]
    .into_iter()
    .map(|(category, kg_co2)| CategoryEmission {
        category: category.to_string(),
        kg_co2: round2(kg_co2),
    })
    .collect();

    let (summary, summary_error) = split_outcome(generated.summary, "Failed to generate summary");
    let (saved, save_error) = split_outcome(generated.saved, "Failed to save report");
    let (history, history_error) =
        split_outcome(generated.history, "Failed to load previous reports");

    Ok(Json(GenerateReportResponse {
        report_id: report.id,
        created_at: report.created_at,
        nickname: report.input.nickname.clone(),
        total_footprint: round2(report.total_footprint()),
        breakdown,
        recycling: recycling_view(&report.input),
        digital_impact: digital_impact_view(report.digital_impact.kg_co2_avoided),
        sdg_alignment: SdgAlignmentView::from(&generated.alignment),
        summary,
        summary_error,
        saved: saved.is_some(),
        save_error,
        history: history
            .unwrap_or_default()
            .iter()
            .map(HistoryRow::from)
            .collect(),
        history_error,
    }))
}

/// List the most recent reports for a nickname, newest first.
#[utoipa::path(
    get,
    path = "/reports/{nickname}",
    params(
        ("nickname" = String, Path, description = "The nickname the reports were saved under.")
    ),
    responses(
        (status = 200, description = "Recent reports", body = ReportHistoryResponse),
        (status = 500, description = "The report store could not be read")
    )
)]
pub async fn report_history_handler(
    State(app_state): State<Arc<AppState>>,
    Path(nickname): Path<String>,
) -> Result<Json<ReportHistoryResponse>, (StatusCode, String)> {
    let nickname = nickname.trim().to_string();
    let reports = app_state.reports.history(&nickname).await.map_err(|e| {
        error!("Failed to load history for '{}': {:?}", nickname, e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to load report history".to_string(),
        )
    })?;

    Ok(Json(ReportHistoryResponse {
        reports: reports.iter().map(HistoryRow::from).collect(),
        nickname,
    }))
}

/// Estimate emissions for a trip in a specific vehicle model.
#[utoipa::path(
    post,
    path = "/estimates/vehicle",
    request_body = VehicleEstimateRequest,
    responses(
        (status = 200, description = "Estimate (remote or local fallback)", body = VehicleEstimateResponse),
        (status = 400, description = "Invalid distance")
    )
)]
pub async fn vehicle_estimate_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<VehicleEstimateRequest>,
) -> Result<Json<VehicleEstimateResponse>, (StatusCode, String)> {
    let kg_co2 = app_state
        .reports
        .estimate_vehicle(payload.distance_km, payload.vehicle_model_id.trim())
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    Ok(Json(VehicleEstimateResponse { kg_co2 }))
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "The service is running"))
)]
pub async fn health_handler() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::web::api_router;
    use async_trait::async_trait;
    use axum::{body::Body, http::Request};
    use eco_focus_core::domain::SummaryRequest;
    use eco_focus_core::ports::{
        CarbonEstimateService, PortError, ReportStore, SummaryGenerationService,
    };
    use serde_json::{json, Value};
    use std::sync::Mutex;
    use tower::ServiceExt;

    struct OfflineCarbon;

    #[async_trait]
    impl CarbonEstimateService for OfflineCarbon {
        async fn estimate_electricity(&self, _kwh: f64, _country: &str) -> PortResult<f64> {
            Err(PortError::Unavailable("timed out".to_string()))
        }

        async fn estimate_vehicle(&self, _distance_km: f64, _model: &str) -> PortResult<f64> {
            Err(PortError::Unavailable("timed out".to_string()))
        }
    }

    struct CannedSummary(PortResult<String>);

    #[async_trait]
    impl SummaryGenerationService for CannedSummary {
        async fn generate_summary(&self, _request: &SummaryRequest) -> PortResult<String> {
            self.0.clone()
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        reports: Mutex<Vec<Report>>,
        broken: bool,
    }

    #[async_trait]
    impl ReportStore for MemoryStore {
        async fn save_report(&self, report: &Report) -> PortResult<()> {
            if self.broken {
                return Err(PortError::Unavailable("database is down".to_string()));
            }
            self.reports.lock().unwrap().push(report.clone());
            Ok(())
        }

        async fn fetch_recent_reports(&self, nickname: &str, limit: usize) -> PortResult<Vec<Report>> {
            if self.broken {
                return Err(PortError::Unavailable("database is down".to_string()));
            }
            Ok(self
                .reports
                .lock()
                .unwrap()
                .iter()
                .rev()
                .filter(|r| r.input.nickname == nickname)
                .take(limit)
                .cloned()
                .collect())
        }
    }

    fn app(summary: PortResult<String>, store: MemoryStore) -> axum::Router {
        let config = Config::from_lookup(|key| match key {
            "DATABASE_URL" => Some("postgres://localhost/test".to_string()),
            _ => None,
        })
        .unwrap();
        let state = AppState::new(
            &config,
            Arc::new(OfflineCarbon),
            Arc::new(CannedSummary(summary)),
            Arc::new(store),
        );
        api_router(Arc::new(state))
    }

    async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn generate_report_returns_full_breakdown() {
        let app = app(Ok("Nice work".to_string()), MemoryStore::default());
        let (status, body) = send(
            app,
            post_json(
                "/reports",
                json!({
                    "nickname": "ada",
                    "region": "India",
                    "energy_kwh": 100.0,
                    "water_liters": 3000.0,
                    "commute_km": 50.0,
                    "transport_mode": "Bus",
                    "weekly_waste_kg": 2.0,
                    "recycle_types": ["Plastic"],
                    "cards_shared": 12,
                    "meetings_held": 4
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["breakdown"][0]["category"], "Energy");
        assert_eq!(body["breakdown"][0]["kg_co2"], 50.0);
        assert_eq!(body["summary"], "Nice work");
        assert_eq!(body["saved"], true);
        assert_eq!(body["recycling"]["message"], "You are recycling: Plastic");
        assert_eq!(body["sdg_alignment"]["aligned"], true);
        assert_eq!(body["history"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn failures_are_reported_without_losing_the_report() {
        let store = MemoryStore {
            broken: true,
            ..Default::default()
        };
        let app = app(Err(PortError::Unavailable("quota".to_string())), store);
        let (status, body) = send(app, post_json("/reports", json!({ "energy_kwh": 10.0 }))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_footprint"], 5.0);
        assert!(body["summary"].is_null());
        assert!(body["summary_error"]
            .as_str()
            .unwrap()
            .starts_with("Failed to generate summary"));
        assert_eq!(body["saved"], false);
        assert!(body["save_error"].is_string());
        assert!(body["history_error"].is_string());
    }

    #[tokio::test]
    async fn no_alignment_is_reported_as_a_message() {
        let app = app(Ok("ok".to_string()), MemoryStore::default());
        let (_, body) = send(
            app,
            post_json("/reports", json!({ "energy_kwh": 1000.0, "weekly_waste_kg": 10.0 })),
        )
        .await;

        assert_eq!(body["sdg_alignment"]["aligned"], false);
        assert_eq!(body["sdg_alignment"]["goals"].as_array().unwrap().len(), 0);
        assert!(body["sdg_alignment"]["message"].is_string());
        assert_eq!(body["recycling"]["message"], "No recycling options selected.");
    }

    #[tokio::test]
    async fn invalid_input_is_a_bad_request() {
        let app = app(Ok("ok".to_string()), MemoryStore::default());
        let (status, _) = send(
            app.clone(),
            post_json("/reports", json!({ "water_liters": -5.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            app,
            post_json("/reports", json!({ "recycle_types": ["Cardboard"] })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn history_endpoint_lists_saved_reports() {
        let app = app(Ok("ok".to_string()), MemoryStore::default());
        for _ in 0..2 {
            send(app.clone(), post_json("/reports", json!({ "nickname": "bo" }))).await;
        }

        let request = Request::builder()
            .uri("/reports/bo")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["nickname"], "bo");
        assert_eq!(body["reports"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn history_lookup_trims_the_nickname_like_generate_does() {
        let app = app(Ok("ok".to_string()), MemoryStore::default());
        send(app.clone(), post_json("/reports", json!({ "nickname": " cy " }))).await;

        let request = Request::builder()
            .uri("/reports/cy%20")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["nickname"], "cy");
        assert_eq!(body["reports"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn oversized_quantity_is_a_bad_request() {
        let app = app(Ok("ok".to_string()), MemoryStore::default());
        let (status, _) = send(
            app,
            post_json("/reports", json!({ "nickname": "ada", "energy_kwh": 1e308 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn vehicle_estimate_falls_back_locally() {
        let app = app(Ok("ok".to_string()), MemoryStore::default());
        let (status, body) = send(
            app,
            post_json(
                "/estimates/vehicle",
                json!({ "distance_km": 80.0, "vehicle_model_id": "abc" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["kg_co2"], 80.0 * 0.1);
    }
}
