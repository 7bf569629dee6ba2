//! crates/eco_focus_core/src/emissions.rs
//!
//! Per-category kg CO₂ estimators. All local estimators are a quantity times a
//! fixed coefficient. Energy and vehicle estimates try the remote carbon service
//! first and fall back to a local coefficient on any failure.

use crate::domain::{ActivityInput, DigitalImpact, EmissionBreakdown, TransportMode};
use crate::ports::{CarbonEstimateService, PortError};
use tracing::warn;

pub const CAR_FACTOR: f64 = 0.21;
pub const BIKE_FACTOR: f64 = 0.05;
pub const BUS_FACTOR: f64 = 0.089;
pub const TRAIN_FACTOR: f64 = 0.041;
pub const ELECTRIC_VEHICLE_FACTOR: f64 = 0.06;
/// Used for any transport mode without a dedicated factor.
pub const DEFAULT_COMMUTE_FACTOR: f64 = 0.1;

pub const WATER_FACTOR: f64 = 0.0003;
pub const WASTE_FACTOR: f64 = 1.8;
pub const ENERGY_FALLBACK_FACTOR: f64 = 0.5;
pub const VEHICLE_FALLBACK_FACTOR: f64 = 0.1;

pub const DIGITAL_CARD_SAVING: f64 = 0.02;
pub const TRAVEL_SAVING_PER_KM: f64 = 0.1;

pub const DEFAULT_COUNTRY: &str = "us";

//=========================================================================================
// Local Estimators
//=========================================================================================

pub fn commute_factor(mode: &TransportMode) -> f64 {
    match mode {
        TransportMode::Car => CAR_FACTOR,
        TransportMode::Bike => BIKE_FACTOR,
        TransportMode::Bus => BUS_FACTOR,
        TransportMode::Train => TRAIN_FACTOR,
        TransportMode::ElectricVehicle => ELECTRIC_VEHICLE_FACTOR,
        TransportMode::Other(_) => DEFAULT_COMMUTE_FACTOR,
    }
}

pub fn commute_emissions(distance_km: f64, mode: &TransportMode) -> f64 {
    distance_km * commute_factor(mode)
}

pub fn water_emissions(liters: f64) -> f64 {
    liters * WATER_FACTOR
}

pub fn waste_emissions(kg: f64) -> f64 {
    kg * WASTE_FACTOR
}

pub fn fallback_energy_emissions(kwh: f64) -> f64 {
    kwh * ENERGY_FALLBACK_FACTOR
}

pub fn digital_impact(input: &ActivityInput) -> DigitalImpact {
    DigitalImpact {
        kg_co2_avoided: f64::from(input.cards_shared) * DIGITAL_CARD_SAVING
            + input.travel_saved_km * TRAVEL_SAVING_PER_KM,
    }
}

/// Derives the 2-letter country code sent to the carbon service.
///
/// The first two characters of the trimmed, lower-cased region; `"us"` when blank.
pub fn country_code(region: &str) -> String {
    let region = region.trim();
    if region.is_empty() {
        return DEFAULT_COUNTRY.to_string();
    }
    region.to_lowercase().chars().take(2).collect()
}

//=========================================================================================
// Remote Estimators With Fallback
//=========================================================================================

/// Estimates energy emissions remotely, or `kwh * 0.5` if the remote call fails.
pub async fn estimate_energy_emissions(
    carbon: &dyn CarbonEstimateService,
    kwh: f64,
    region: &str,
) -> f64 {
    let country = country_code(region);
    match carbon.estimate_electricity(kwh, &country).await.and_then(check_estimate) {
        Ok(carbon_kg) => carbon_kg,
        Err(e) => {
            warn!(country = %country, "Electricity estimate failed, using local factor: {}", e);
            fallback_energy_emissions(kwh)
        }
    }
}

/// Estimates vehicle emissions remotely, or `distance_km * 0.1` if the remote call fails.
pub async fn estimate_vehicle_emissions(
    carbon: &dyn CarbonEstimateService,
    distance_km: f64,
    vehicle_model_id: &str,
) -> f64 {
    match carbon
        .estimate_vehicle(distance_km, vehicle_model_id)
        .await
        .and_then(check_estimate)
    {
        Ok(carbon_kg) => carbon_kg,
        Err(e) => {
            warn!(vehicle_model_id, "Vehicle estimate failed, using local factor: {}", e);
            distance_km * VEHICLE_FALLBACK_FACTOR
        }
    }
}

fn check_estimate(carbon_kg: f64) -> Result<f64, PortError> {
    if carbon_kg.is_finite() && carbon_kg >= 0.0 {
        Ok(carbon_kg)
    } else {
        Err(PortError::InvalidResponse(format!(
            "carbon_kg must be a non-negative number, got {}",
            carbon_kg
        )))
    }
}

/// Computes all four category emissions for one activity input.
pub async fn estimate_breakdown(
    carbon: &dyn CarbonEstimateService,
    input: &ActivityInput,
) -> EmissionBreakdown {
    EmissionBreakdown {
        energy: estimate_energy_emissions(carbon, input.energy_kwh, &input.region).await,
        water: water_emissions(input.water_liters),
        commute: commute_emissions(input.commute_km, &input.transport_mode),
        waste: waste_emissions(input.weekly_waste_kg),
    }
}
