//! In-memory port implementations shared by the core unit tests.

use crate::domain::{Report, SummaryRequest};
use crate::ports::{
    CarbonEstimateService, PortError, PortResult, ReportStore, SummaryGenerationService,
};
use async_trait::async_trait;
use std::sync::Mutex;

pub struct FakeCarbon {
    result: PortResult<f64>,
    last_country: Mutex<Option<String>>,
}

impl FakeCarbon {
    pub fn answering(carbon_kg: f64) -> Self {
        Self {
            result: Ok(carbon_kg),
            last_country: Mutex::new(None),
        }
    }

    pub fn failing(error: PortError) -> Self {
        Self {
            result: Err(error),
            last_country: Mutex::new(None),
        }
    }

    pub fn last_country(&self) -> Option<String> {
        self.last_country.lock().unwrap().clone()
    }
}

#[async_trait]
impl CarbonEstimateService for FakeCarbon {
    async fn estimate_electricity(&self, _kwh: f64, country: &str) -> PortResult<f64> {
        *self.last_country.lock().unwrap() = Some(country.to_string());
        self.result.clone()
    }

    async fn estimate_vehicle(&self, _distance_km: f64, _vehicle_model_id: &str) -> PortResult<f64> {
        self.result.clone()
    }
}

pub struct FakeSummarizer {
    result: PortResult<String>,
}

impl FakeSummarizer {
    pub fn answering(text: &str) -> Self {
        Self {
            result: Ok(text.to_string()),
        }
    }

    pub fn failing(error: PortError) -> Self {
        Self { result: Err(error) }
    }
}

#[async_trait]
impl SummaryGenerationService for FakeSummarizer {
    async fn generate_summary(&self, _request: &SummaryRequest) -> PortResult<String> {
        self.result.clone()
    }
}

#[derive(Default)]
pub struct FakeStore {
    reports: Mutex<Vec<Report>>,
    broken: bool,
}

impl FakeStore {
    /// A store whose every call fails.
    pub fn broken() -> Self {
        Self {
            reports: Mutex::new(Vec::new()),
            broken: true,
        }
    }

    pub fn saved_count(&self) -> usize {
        self.reports.lock().unwrap().len()
    }
}

#[async_trait]
impl ReportStore for FakeStore {
    async fn save_report(&self, report: &Report) -> PortResult<()> {
        if self.broken {
            return Err(PortError::Unavailable("connection refused".to_string()));
        }
        self.reports.lock().unwrap().push(report.clone());
        Ok(())
    }

    async fn fetch_recent_reports(&self, nickname: &str, limit: usize) -> PortResult<Vec<Report>> {
        if self.broken {
            return Err(PortError::Unavailable("connection refused".to_string()));
        }
        let mut matching: Vec<Report> = self
            .reports
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.input.nickname == nickname)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching.truncate(limit);
        Ok(matching)
    }
}
