//! crates/eco_focus_core/src/sdg.rs
//!
//! Maps aggregated report metrics onto four UN Sustainable Development Goals.

use crate::domain::Report;
use std::fmt;

/// The closed set of goals a report can align with.
///
/// Variant order is the canonical output order of [`score_alignment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SdgGoal {
    ResponsibleConsumption,
    ClimateAction,
    IndustryInnovation,
    Partnerships,
}

impl SdgGoal {
    pub const ALL: [SdgGoal; 4] = [
        SdgGoal::ResponsibleConsumption,
        SdgGoal::ClimateAction,
        SdgGoal::IndustryInnovation,
        SdgGoal::Partnerships,
    ];

    /// The UN goal number.
    pub fn number(&self) -> u8 {
        match self {
            SdgGoal::ResponsibleConsumption => 12,
            SdgGoal::ClimateAction => 13,
            SdgGoal::IndustryInnovation => 9,
            SdgGoal::Partnerships => 17,
        }
    }

    /// Stable identifier used in API payloads.
    pub fn id(&self) -> &'static str {
        match self {
            SdgGoal::ResponsibleConsumption => "responsible_consumption",
            SdgGoal::ClimateAction => "climate_action",
            SdgGoal::IndustryInnovation => "industry_innovation",
            SdgGoal::Partnerships => "partnerships",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            SdgGoal::ResponsibleConsumption => "Responsible Consumption & Production",
            SdgGoal::ClimateAction => "Climate Action",
            SdgGoal::IndustryInnovation => "Industry, Innovation & Infrastructure",
            SdgGoal::Partnerships => "Partnerships for the Goals",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SdgGoal::ResponsibleConsumption => {
                "Low weekly waste or active recycling reduces material throughput."
            }
            SdgGoal::ClimateAction => {
                "A modest footprint or meaningful avoided emissions contributes to climate action."
            }
            SdgGoal::IndustryInnovation => {
                "Digital cards and avoided business travel show adoption of low-carbon tools."
            }
            SdgGoal::Partnerships => {
                "Regular digital sharing and meetings build collaborative networks."
            }
        }
    }

    fn matches(&self, m: &AlignmentMetrics) -> bool {
        match self {
            SdgGoal::ResponsibleConsumption => m.waste_emissions < 5.0 || m.recycles,
            SdgGoal::ClimateAction => m.total_footprint < 300.0 || m.digital_impact > 1.0,
            SdgGoal::IndustryInnovation => m.cards_shared >= 5 || m.travel_saved_km > 10.0,
            SdgGoal::Partnerships => m.cards_shared > 10 && m.meetings_held > 3,
        }
    }
}

impl fmt::Display for SdgGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SDG {}: {}", self.number(), self.title())
    }
}

/// The scorer's result. Never an empty list: no match is `NoAlignment`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SdgAlignment {
    Aligned(Vec<SdgGoal>),
    NoAlignment,
}

impl SdgAlignment {
    pub const NO_ALIGNMENT_MESSAGE: &'static str = "No strong SDG alignment detected";

    pub fn goals(&self) -> &[SdgGoal] {
        match self {
            SdgAlignment::Aligned(goals) => goals,
            SdgAlignment::NoAlignment => &[],
        }
    }

    pub fn contains(&self, goal: SdgGoal) -> bool {
        self.goals().contains(&goal)
    }
}

/// The subset of report metrics the alignment rules look at.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AlignmentMetrics {
    pub waste_emissions: f64,
    pub recycles: bool,
    pub total_footprint: f64,
    pub digital_impact: f64,
    pub cards_shared: u32,
    pub meetings_held: u32,
    pub travel_saved_km: f64,
}

impl AlignmentMetrics {
    pub fn from_report(report: &Report) -> Self {
        Self {
            waste_emissions: report.emissions.waste,
            recycles: report.input.recycles_anything(),
            total_footprint: report.total_footprint(),
            digital_impact: report.digital_impact.kg_co2_avoided,
            cards_shared: report.input.cards_shared,
            meetings_held: report.input.meetings_held,
            travel_saved_km: report.input.travel_saved_km,
        }
    }
}

/// Evaluates every rule independently and returns the matched goals in canonical order.
pub fn score_alignment(metrics: &AlignmentMetrics) -> SdgAlignment {
    let goals: Vec<SdgGoal> = SdgGoal::ALL
        .into_iter()
        .filter(|goal| goal.matches(metrics))
        .collect();

    if goals.is_empty() {
        SdgAlignment::NoAlignment
    } else {
        SdgAlignment::Aligned(goals)
    }
}
