//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `ReportStore` port from the `core` crate. It handles all interactions
//! with the PostgreSQL `impact_logs` table using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eco_focus_core::domain::{
    ActivityInput, DigitalImpact, EmissionBreakdown, RecycledMaterial, Report, TransportMode,
    UserType,
};
use eco_focus_core::ports::{PortError, PortResult, ReportStore};
use sqlx::{FromRow, PgPool};
use std::collections::BTreeSet;
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `ReportStore` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow, Debug)]
struct ReportRecord {
    id: Uuid,
    created_at: DateTime<Utc>,
    nickname: String,
    user_type: String,
    region: String,
    energy_kwh: f64,
    renewable_percent: f64,
    water_liters: f64,
    commute_km: f64,
    transport_mode: String,
    weekly_waste_kg: f64,
    recycle_types: Vec<String>,
    cards_shared: i64,
    meetings_held: i64,
    paper_cards_avoided: i64,
    travel_saved_km: f64,
    energy_emissions: f64,
    water_emissions: f64,
    commute_emissions: f64,
    waste_emissions: f64,
    digital_impact: f64,
}

impl ReportRecord {
    fn to_domain(self) -> PortResult<Report> {
        let user_type = self
            .user_type
            .parse::<UserType>()
            .map_err(|e| PortError::InvalidResponse(e.to_string()))?;
        let recycled: BTreeSet<RecycledMaterial> = self
            .recycle_types
            .iter()
            .map(|m| m.parse::<RecycledMaterial>())
            .collect::<Result<_, _>>()
            .map_err(|e| PortError::InvalidResponse(e.to_string()))?;

        Ok(Report {
            id: self.id,
            created_at: self.created_at,
            input: ActivityInput {
                nickname: self.nickname,
                region: self.region,
                user_type,
                energy_kwh: self.energy_kwh,
                renewable_percent: self.renewable_percent,
                water_liters: self.water_liters,
                commute_km: self.commute_km,
                transport_mode: TransportMode::from(self.transport_mode.as_str()),
                weekly_waste_kg: self.weekly_waste_kg,
                recycled,
                cards_shared: to_count("cards_shared", self.cards_shared)?,
                meetings_held: to_count("meetings_held", self.meetings_held)?,
                paper_cards_avoided: to_count("paper_cards_avoided", self.paper_cards_avoided)?,
                travel_saved_km: self.travel_saved_km,
            },
            emissions: EmissionBreakdown {
                energy: self.energy_emissions,
                water: self.water_emissions,
                commute: self.commute_emissions,
                waste: self.waste_emissions,
            },
            digital_impact: DigitalImpact {
                kg_co2_avoided: self.digital_impact,
            },
        })
    }
}

fn to_count(column: &str, value: i64) -> PortResult<u32> {
    u32::try_from(value).map_err(|_| {
        PortError::InvalidResponse(format!("{} holds an out-of-range count: {}", column, value))
    })
}

const SELECT_RECENT: &str = "SELECT id, created_at, nickname, user_type, region, \
     energy_kwh, renewable_percent, water_liters, commute_km, transport_mode, weekly_waste_kg, \
     recycle_types, cards_shared, meetings_held, paper_cards_avoided, travel_saved_km, \
     energy_emissions, water_emissions, commute_emissions, waste_emissions, digital_impact \
     FROM impact_logs WHERE nickname = $1 ORDER BY created_at DESC LIMIT $2";

const INSERT_REPORT: &str = "INSERT INTO impact_logs (id, created_at, nickname, user_type, region, \
     energy_kwh, renewable_percent, water_liters, commute_km, transport_mode, weekly_waste_kg, \
     recycle_types, cards_shared, meetings_held, paper_cards_avoided, travel_saved_km, \
     energy_emissions, water_emissions, commute_emissions, waste_emissions, digital_impact, \
     total_footprint) \
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21, $22)";

//=========================================================================================
// `ReportStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl ReportStore for DbAdapter {
    async fn save_report(&self, report: &Report) -> PortResult<()> {
        let input = &report.input;
        let recycle_types: Vec<String> = input
            .recycled
            .iter()
            .map(|m| m.as_str().to_string())
            .collect();

        sqlx::query(INSERT_REPORT)
            .bind(report.id)
            .bind(report.created_at)
            .bind(&input.nickname)
            .bind(input.user_type.as_str())
            .bind(&input.region)
            .bind(input.energy_kwh)
            .bind(input.renewable_percent)
            .bind(input.water_liters)
            .bind(input.commute_km)
            .bind(input.transport_mode.label())
            .bind(input.weekly_waste_kg)
            .bind(recycle_types)
            .bind(i64::from(input.cards_shared))
            .bind(i64::from(input.meetings_held))
            .bind(i64::from(input.paper_cards_avoided))
            .bind(input.travel_saved_km)
            .bind(report.emissions.energy)
            .bind(report.emissions.water)
            .bind(report.emissions.commute)
            .bind(report.emissions.waste)
            .bind(report.digital_impact.kg_co2_avoided)
            .bind(report.total_footprint())
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Unavailable(e.to_string()))?;
        Ok(())
    }

    async fn fetch_recent_reports(&self, nickname: &str, limit: usize) -> PortResult<Vec<Report>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let records = sqlx::query_as::<_, ReportRecord>(SELECT_RECENT)
            .bind(nickname)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| PortError::Unavailable(e.to_string()))?;

        records.into_iter().map(|r| r.to_domain()).collect()
    }
}
