//! crates/eco_focus_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

//=========================================================================================
// Validation Errors
//=========================================================================================

/// Upper bound for any single activity quantity. Keeps every derived figure finite.
pub const MAX_QUANTITY: f64 = 1e12;

/// Raised when user-supplied activity data cannot be accepted.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must be a finite, non-negative number (got {value})")]
    InvalidQuantity { field: &'static str, value: f64 },
    #[error("{field} is too large to estimate (got {value}, maximum 1e12)")]
    QuantityTooLarge { field: &'static str, value: f64 },
    #[error("Renewable share must be between 0 and 100 percent (got {0})")]
    RenewableShareOutOfRange(f64),
    #[error("Unknown user type: {0}")]
    UnknownUserType(String),
    #[error("Unknown recycled material: {0}")]
    UnknownMaterial(String),
}

//=========================================================================================
// Enumerated Input Fields
//=========================================================================================

/// Who is filling in the activity form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UserType {
    #[default]
    Individual,
    Business,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Individual => "Individual",
            UserType::Business => "Business",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "individual" => Ok(UserType::Individual),
            "business" => Ok(UserType::Business),
            _ => Err(ValidationError::UnknownUserType(s.to_string())),
        }
    }
}

/// How the weekly commute is travelled.
///
/// Mode names that aren't recognised are kept verbatim in `Other` so they can be
/// persisted and echoed back; they are costed with the default commute factor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum TransportMode {
    #[default]
    Car,
    Bike,
    Bus,
    Train,
    ElectricVehicle,
    Other(String),
}

impl TransportMode {
    pub fn label(&self) -> &str {
        match self {
            TransportMode::Car => "Car",
            TransportMode::Bike => "Bike",
            TransportMode::Bus => "Bus",
            TransportMode::Train => "Train",
            TransportMode::ElectricVehicle => "Electric Vehicle",
            TransportMode::Other(name) => name,
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<&str> for TransportMode {
    fn from(s: &str) -> Self {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "car" => TransportMode::Car,
            "bike" => TransportMode::Bike,
            "bus" => TransportMode::Bus,
            "train" => TransportMode::Train,
            "electricvehicle" | "ev" => TransportMode::ElectricVehicle,
            _ => TransportMode::Other(s.trim().to_string()),
        }
    }
}

/// Material categories a user can report recycling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecycledMaterial {
    Plastic,
    Glass,
    Paper,
    EWaste,
    Other,
}

impl RecycledMaterial {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecycledMaterial::Plastic => "Plastic",
            RecycledMaterial::Glass => "Glass",
            RecycledMaterial::Paper => "Paper",
            RecycledMaterial::EWaste => "E-waste",
            RecycledMaterial::Other => "Other",
        }
    }
}

impl fmt::Display for RecycledMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecycledMaterial {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "plastic" => Ok(RecycledMaterial::Plastic),
            "glass" => Ok(RecycledMaterial::Glass),
            "paper" => Ok(RecycledMaterial::Paper),
            "ewaste" => Ok(RecycledMaterial::EWaste),
            "other" => Ok(RecycledMaterial::Other),
            _ => Err(ValidationError::UnknownMaterial(s.to_string())),
        }
    }
}

//=========================================================================================
// Activity Input
//=========================================================================================

/// Everything a user reports for one impact report.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ActivityInput {
    pub nickname: String,
    pub region: String,
    pub user_type: UserType,

    pub energy_kwh: f64,
    pub renewable_percent: f64,
    pub water_liters: f64,
    pub commute_km: f64,
    pub transport_mode: TransportMode,
    pub weekly_waste_kg: f64,
    pub recycled: BTreeSet<RecycledMaterial>,

    pub cards_shared: u32,
    pub meetings_held: u32,
    pub paper_cards_avoided: u32,
    pub travel_saved_km: f64,
}

impl ActivityInput {
    /// Rejects negative, non-finite and absurdly large quantities.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let quantities = [
            ("energy_kwh", self.energy_kwh),
            ("renewable_percent", self.renewable_percent),
            ("water_liters", self.water_liters),
            ("commute_km", self.commute_km),
            ("weekly_waste_kg", self.weekly_waste_kg),
            ("travel_saved_km", self.travel_saved_km),
        ];
        for (field, value) in quantities {
            if !value.is_finite() || value < 0.0 {
                return Err(ValidationError::InvalidQuantity { field, value });
            }
            if value > MAX_QUANTITY {
                return Err(ValidationError::QuantityTooLarge { field, value });
            }
        }
        if self.renewable_percent > 100.0 {
            return Err(ValidationError::RenewableShareOutOfRange(self.renewable_percent));
        }
        Ok(())
    }

    pub fn recycles_anything(&self) -> bool {
        !self.recycled.is_empty()
    }
}

//=========================================================================================
// Derived Values
//=========================================================================================

/// Estimated kg CO₂ per activity category.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EmissionBreakdown {
    pub energy: f64,
    pub water: f64,
    pub commute: f64,
    pub waste: f64,
}

impl EmissionBreakdown {
    /// The total footprint. Always derived from the four categories.
    pub fn total(&self) -> f64 {
        self.energy + self.water + self.commute + self.waste
    }
}

/// kg CO₂ avoided through digital cards and avoided travel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DigitalImpact {
    pub kg_co2_avoided: f64,
}

//=========================================================================================
// Report
//=========================================================================================

/// A single generated impact report. Built once per generate action.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub input: ActivityInput,
    pub emissions: EmissionBreakdown,
    pub digital_impact: DigitalImpact,
}

impl Report {
    pub fn new(
        input: ActivityInput,
        emissions: EmissionBreakdown,
        digital_impact: DigitalImpact,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            input,
            emissions,
            digital_impact,
        }
    }

    pub fn total_footprint(&self) -> f64 {
        self.emissions.total()
    }
}

/// Rounded metrics and identity strings handed to the summary generator.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRequest {
    pub nickname: String,
    pub region: String,
    pub user_type: String,
    pub energy_emissions: f64,
    pub commute_emissions: f64,
    pub transport_mode: String,
    pub water_consumption: f64,
    pub waste_emissions: f64,
    pub recycle_types: String,
    pub cards_shared: u32,
    pub travel_saved_km: f64,
    pub digital_impact: f64,
    pub total_footprint: f64,
}

impl SummaryRequest {
    pub fn from_report(report: &Report) -> Self {
        let input = &report.input;
        let recycle_types = if input.recycled.is_empty() {
            "None".to_string()
        } else {
            input
                .recycled
                .iter()
                .map(|m| m.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };

        Self {
            nickname: non_blank_or(&input.nickname, "User"),
            region: non_blank_or(&input.region, "Global"),
            user_type: input.user_type.to_string(),
            energy_emissions: round2(report.emissions.energy),
            commute_emissions: round2(report.emissions.commute),
            transport_mode: input.transport_mode.to_string(),
            water_consumption: round2(input.water_liters),
            waste_emissions: round2(report.emissions.waste),
            recycle_types,
            cards_shared: input.cards_shared,
            travel_saved_km: round2(input.travel_saved_km),
            digital_impact: round2(report.digital_impact.kg_co2_avoided),
            total_footprint: round2(report.total_footprint()),
        }
    }
}

fn non_blank_or(value: &str, fallback: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Rounds to two decimal places for display and prompts.
pub fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    if scaled.is_finite() {
        scaled.round() / 100.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_accepts_defaults() {
        assert_eq!(ActivityInput::default().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_quantities_that_would_overflow() {
        let input = ActivityInput {
            energy_kwh: 1e308,
            ..Default::default()
        };
        assert_eq!(
            input.validate(),
            Err(ValidationError::QuantityTooLarge {
                field: "energy_kwh",
                value: 1e308
            })
        );

        let at_limit = ActivityInput {
            energy_kwh: MAX_QUANTITY,
            water_liters: MAX_QUANTITY,
            commute_km: MAX_QUANTITY,
            weekly_waste_kg: MAX_QUANTITY,
            ..Default::default()
        };
        assert_eq!(at_limit.validate(), Ok(()));
    }

    #[test]
    fn round2_never_overflows() {
        assert_eq!(round2(1e307), 1e307);
        assert_eq!(round2(f64::MAX), f64::MAX);
        assert_eq!(round2(2.345_6), 2.35);
    }

    #[test]
    fn validate_rejects_negative_and_nan() {
        let input = ActivityInput {
            water_liters: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            input.validate(),
            Err(ValidationError::InvalidQuantity { field: "water_liters", .. })
        ));

        let input = ActivityInput {
            energy_kwh: f64::NAN,
            ..Default::default()
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn validate_rejects_renewable_share_above_100() {
        let input = ActivityInput {
            renewable_percent: 120.0,
            ..Default::default()
        };
        assert_eq!(
            input.validate(),
            Err(ValidationError::RenewableShareOutOfRange(120.0))
        );
    }

    #[test]
    fn transport_mode_parses_labels_and_keeps_unknown_names() {
        assert_eq!(TransportMode::from("Electric Vehicle"), TransportMode::ElectricVehicle);
        assert_eq!(TransportMode::from("train"), TransportMode::Train);
        assert_eq!(
            TransportMode::from(" Scooter "),
            TransportMode::Other("Scooter".to_string())
        );
    }

    #[test]
    fn recycled_material_parses_e_waste() {
        assert_eq!("E-waste".parse::<RecycledMaterial>(), Ok(RecycledMaterial::EWaste));
        assert!("Cardboard".parse::<RecycledMaterial>().is_err());
    }

    #[test]
    fn total_is_sum_of_categories() {
        let breakdown = EmissionBreakdown {
            energy: 50.0,
            water: 0.9,
            commute: 21.0,
            waste: 9.0,
        };
        assert_eq!(breakdown.total(), 50.0 + 0.9 + 21.0 + 9.0);
    }

    #[test]
    fn summary_request_fills_defaults_and_rounds() {
        let report = Report::new(
            ActivityInput {
                nickname: "  ".to_string(),
                water_liters: 1234.567,
                ..Default::default()
            },
            EmissionBreakdown {
                energy: 10.006,
                water: 0.37,
                commute: 2.1,
                waste: 1.8,
            },
            DigitalImpact { kg_co2_avoided: 0.333 },
        );

        let request = SummaryRequest::from_report(&report);
        assert_eq!(request.nickname, "User");
        assert_eq!(request.region, "Global");
        assert_eq!(request.recycle_types, "None");
        assert_eq!(request.energy_emissions, 10.01);
        assert_eq!(request.water_consumption, 1234.57);
        assert_eq!(request.digital_impact, 0.33);
        assert_eq!(request.user_type, "Individual");
        assert_eq!(request.transport_mode, "Car");
    }

    #[test]
    fn summary_request_joins_recycled_materials() {
        let mut input = ActivityInput::default();
        input.recycled.insert(RecycledMaterial::Paper);
        input.recycled.insert(RecycledMaterial::Plastic);
        let report = Report::new(input, EmissionBreakdown::default(), DigitalImpact::default());

        assert_eq!(SummaryRequest::from_report(&report).recycle_types, "Plastic, Paper");
    }
}
