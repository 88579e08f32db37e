//! Narration service - the two narrative prompts the bot supports
//!
//! Both calls share the same shape: the event's persona directive as the
//! leading system message plus one user instruction. Model selection belongs to the
//! `LlmPort` adapter; temperature is fixed per call type.

use crate::application::ports::outbound::{
    ChatMessage, LlmError, LlmPort, LlmRequest, LlmResponse,
};
use crate::application::services::llm::{build_intro_prompt, build_outcome_prompt, OutcomeContext};
use crate::domain::value_objects::Persona;

/// Sampling temperature for scene introductions
pub const INTRO_TEMPERATURE: f64 = 0.6;
/// Sampling temperature for outcome continuations
pub const OUTCOME_TEMPERATURE: f64 = 0.4;

#[derive(Debug, thiserror::Error)]
pub enum NarrationError {
    #[error("Intro narration failed: {0}")]
    Intro(#[source] LlmError),
    #[error("Outcome narration failed: {0}")]
    Outcome(#[source] LlmError),
}

/// Service for generating event narration
pub struct NarrationService<L: LlmPort> {
    llm: L,
}

impl<L: LlmPort> NarrationService<L> {
    pub fn new(llm: L) -> Self {
        Self { llm }
    }

    /// Generate the scene introduction shown before the roll
    pub async fn generate_intro(
        &self,
        persona: Persona,
        target_mention: Option<&str>,
        description: &str,
    ) -> Result<String, NarrationError> {
        let request = LlmRequest::new(vec![
            ChatMessage::system(persona.directive()),
            ChatMessage::user(build_intro_prompt(target_mention, description)),
        ])
        .with_temperature(INTRO_TEMPERATURE);

        let response = self.llm.generate(request).await.map_err(|e| {
            tracing::error!("Intro narration request failed: {}", e);
            NarrationError::Intro(e)
        })?;

        Ok(narrated_text(response, "intro"))
    }

    /// Generate the continuation reflecting the roll's success or failure
    pub async fn generate_outcome(
        &self,
        persona: Persona,
        context: &OutcomeContext,
    ) -> Result<String, NarrationError> {
        let request = LlmRequest::new(vec![
            ChatMessage::system(persona.directive()),
            ChatMessage::user(build_outcome_prompt(context)),
        ])
        .with_temperature(OUTCOME_TEMPERATURE);

        let response = self.llm.generate(request).await.map_err(|e| {
            tracing::error!("Outcome narration request failed: {}", e);
            NarrationError::Outcome(e)
        })?;

        Ok(narrated_text(response, "outcome"))
    }
}

fn narrated_text(response: LlmResponse, kind: &str) -> String {
    tracing::debug!(
        "Narrated {} ({} chars) with {}",
        kind,
        response.content.chars().count(),
        response.model.as_deref().unwrap_or("unreported model")
    );
    response.content.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::outbound::{MessageRole, MockLlmPort};
    use crate::domain::value_objects::{CheckCategory, Difficulty};

    fn reply(text: &str) -> Result<LlmResponse, LlmError> {
        Ok(LlmResponse {
            content: text.to_string(),
            model: Some("mock".to_string()),
        })
    }

    #[tokio::test]
    async fn test_intro_uses_persona_and_temperature() {
        let mut llm = MockLlmPort::new();
        llm.expect_generate()
            .withf(|request| {
                request.temperature == Some(INTRO_TEMPERATURE)
                    && request.messages.len() == 2
                    && request.messages[0].role == MessageRole::System
                    && request.messages[0].content == Persona::WearyBard.directive()
                    && request.messages[1].role == MessageRole::User
                    && request.messages[1].content.contains("для @alex")
            })
            .times(1)
            .returning(|_| reply("  Таверна затихла.  \n"));

        let service = NarrationService::new(llm);
        let intro = service
            .generate_intro(Persona::WearyBard, Some("@alex"), "украл пирожок")
            .await
            .unwrap();

        assert_eq!(intro, "Таверна затихла.");
    }

    #[tokio::test]
    async fn test_outcome_uses_its_own_temperature() {
        let mut llm = MockLlmPort::new();
        llm.expect_generate()
            .withf(|request| {
                request.temperature == Some(OUTCOME_TEMPERATURE)
                    && request.messages[1].content.contains("Бросок: 15")
            })
            .times(1)
            .returning(|_| reply("Дверь поддалась."));

        let service = NarrationService::new(llm);
        let context = OutcomeContext {
            success: true,
            check_category: CheckCategory::Stealth,
            difficulty: Difficulty::clamped(12),
            roll: 15,
            target_mention: None,
            description: "ищет тайную дверь".to_string(),
        };

        let text = service
            .generate_outcome(Persona::DungeonMaster, &context)
            .await
            .unwrap();

        assert_eq!(text, "Дверь поддалась.");
    }

    #[tokio::test]
    async fn test_provider_failure_is_labeled() {
        let mut llm = MockLlmPort::new();
        llm.expect_generate()
            .returning(|_| Err(LlmError::Unauthorized("bad key".to_string())));

        let service = NarrationService::new(llm);
        let err = service
            .generate_intro(Persona::DungeonMaster, None, "что-то")
            .await
            .unwrap_err();

        assert!(matches!(err, NarrationError::Intro(LlmError::Unauthorized(_))));
        assert!(err.to_string().contains("bad key"));
    }
}
