//! services/api/src/adapters/summary_llm.rs
//!
//! This module contains the adapter for the sustainability summary LLM.
//! It implements the `SummaryGenerationService` port from the `core` crate.

const SYSTEM_INSTRUCTIONS: &str = "You are a friendly sustainability coach. You write short, concrete impact reports from self-reported activity data. Use plain language, keep numbers as given, and never invent metrics that are not in the data.";

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client, error::OpenAIError,
};
use async_trait::async_trait;
use eco_focus_core::{
    domain::SummaryRequest,
    ports::{PortError, PortResult, SummaryGenerationService},
};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `SummaryGenerationService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiSummaryAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiSummaryAdapter {
    /// Creates a new `OpenAiSummaryAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }
}

/// Fills the report template with the request's rounded metrics.
///
/// The template is formatted in one pass, so braces inside user-supplied text are kept verbatim.
pub fn render_prompt(request: &SummaryRequest) -> String {
    format!(
        r#"Write a concise sustainability report for {nickname}, a {user_type} user based in {region}.

Structure the report as follows:

1. Emissions summary, quoting these figures:
   - Energy emissions: {energy_emissions} kg CO₂
   - Commute emissions: {commute_emissions} kg CO₂ (transport mode: {transport_mode})
   - Water consumption: {water_consumption} liters
   - Waste emissions: {waste_emissions} kg CO₂
   - Total footprint: {total_footprint} kg CO₂
   - Recycled materials: {recycle_types}
   - Digital habits: {cards_shared} cards shared, {travel_saved_km} km of travel avoided, about {digital_impact} kg CO₂ avoided

2. Quick insights:
   - Two strengths (for example low water or waste, or good recycling). If none stand out, name the lowest-emission categories.
   - Two weaknesses that need work (for example high energy use or a car commute). If none stand out, name the highest-emission categories.

3. Two actionable tips aimed at the weaknesses above, specific to this data (for example, if commute emissions are high and the transport mode is Car, suggest public transport)."#,
        nickname = request.nickname,
        user_type = request.user_type,
        region = request.region,
        energy_emissions = request.energy_emissions,
        commute_emissions = request.commute_emissions,
        transport_mode = request.transport_mode,
        water_consumption = request.water_consumption,
        waste_emissions = request.waste_emissions,
        total_footprint = request.total_footprint,
        recycle_types = request.recycle_types,
        cards_shared = request.cards_shared,
        travel_saved_km = request.travel_saved_km,
        digital_impact = request.digital_impact,
    )
}

//=========================================================================================
// `SummaryGenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl SummaryGenerationService for OpenAiSummaryAdapter {
    async fn generate_summary(&self, request: &SummaryRequest) -> PortResult<String> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_INSTRUCTIONS)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(render_prompt(request))
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        let chat_request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(chat_request)
            .await
            .map_err(|e: OpenAIError| PortError::Unavailable(e.to_string()))?;

        let summary = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| {
                PortError::InvalidResponse("Summary LLM returned no text content.".to_string())
            })?;

        Ok(summary)
    }
}
