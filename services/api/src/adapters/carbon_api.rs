//! services/api/src/adapters/carbon_api.rs
//!
//! This module contains the adapter for the Carbon Interface estimates API.
//! It implements the `CarbonEstimateService` port from the `core` crate.

use async_trait::async_trait;
use eco_focus_core::ports::{CarbonEstimateService, PortError, PortResult};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

//=========================================================================================
// Request Payloads
//=========================================================================================

/// The body of `POST /estimates`, discriminated by `type`.
#[derive(Serialize, Debug)]
#[serde(tag = "type", rename_all = "snake_case")]
enum EstimateRequest<'a> {
    Electricity {
        electricity_unit: &'static str,
        electricity_value: f64,
        country: &'a str,
    },
    Vehicle {
        distance_unit: &'static str,
        distance_value: f64,
        vehicle_model_id: &'a str,
    },
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `CarbonEstimateService` against the Carbon Interface API.
#[derive(Clone)]
pub struct CarbonInterfaceAdapter {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl CarbonInterfaceAdapter {
    /// Creates a new `CarbonInterfaceAdapter`.
    ///
    /// Without an API key every estimate fails fast and callers fall back to local factors.
    pub fn new(client: reqwest::Client, base_url: String, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url,
            api_key,
        }
    }

    /// Builds the HTTP client used by the adapter, bounded by `timeout`.
    pub fn http_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
        reqwest::Client::builder().timeout(timeout).build()
    }

    async fn post_estimate(&self, body: &EstimateRequest<'_>) -> PortResult<f64> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            PortError::Unavailable("no carbon API key configured".to_string())
        })?;

        let response = self
            .client
            .post(format!("{}/estimates", self.base_url))
            .bearer_auth(api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| PortError::Unavailable(e.to_string()))?
            .error_for_status()
            .map_err(|e| PortError::Unavailable(e.to_string()))?;

        let json: Value = response
            .json()
            .await
            .map_err(|e| PortError::InvalidResponse(e.to_string()))?;

        parse_carbon_kg(&json)
    }
}

/// Pulls `data.attributes.carbon_kg` out of an estimate response.
///
/// The API sometimes wraps the estimate in a list; the first element is used.
pub fn parse_carbon_kg(json: &Value) -> PortResult<f64> {
    let estimate = match json {
        Value::Array(items) => items.first().ok_or_else(|| {
            PortError::InvalidResponse("estimate response was an empty list".to_string())
        })?,
        other => other,
    };

    estimate
        .pointer("/data/attributes/carbon_kg")
        .and_then(Value::as_f64)
        .ok_or_else(|| {
            PortError::InvalidResponse("missing 'carbon_kg' in estimate response".to_string())
        })
}

//=========================================================================================
// `CarbonEstimateService` Trait Implementation
//=========================================================================================

#[async_trait]
impl CarbonEstimateService for CarbonInterfaceAdapter {
    async fn estimate_electricity(&self, kwh: f64, country: &str) -> PortResult<f64> {
        self.post_estimate(&EstimateRequest::Electricity {
            electricity_unit: "kwh",
            electricity_value: kwh,
            country,
        })
        .await
    }

    async fn estimate_vehicle(&self, distance_km: f64, vehicle_model_id: &str) -> PortResult<f64> {
        self.post_estimate(&EstimateRequest::Vehicle {
            distance_unit: "km",
            distance_value: distance_km,
            vehicle_model_id,
        })
        .await
    }
}
