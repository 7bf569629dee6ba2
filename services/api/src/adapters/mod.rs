pub mod carbon_api;
pub mod db;
pub mod summary_llm;

pub use carbon_api::CarbonInterfaceAdapter;
pub use db::DbAdapter;
pub use summary_llm::OpenAiSummaryAdapter;
