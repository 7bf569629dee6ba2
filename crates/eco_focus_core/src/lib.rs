pub mod domain;
pub mod emissions;
pub mod ports;
pub mod sdg;
pub mod service;

#[cfg(test)]
mod test_support;

pub use domain::{
    ActivityInput, DigitalImpact, EmissionBreakdown, RecycledMaterial, Report, SummaryRequest,
    TransportMode, UserType, ValidationError,
};
pub use ports::{
    CarbonEstimateService, PortError, PortResult, ReportStore, SummaryGenerationService,
};
pub use sdg::{score_alignment, AlignmentMetrics, SdgAlignment, SdgGoal};
pub use service::{GeneratedReport, ImpactReportService};
