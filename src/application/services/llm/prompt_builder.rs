//! Prompt building functions for narration requests

use crate::domain::value_objects::{CheckCategory, Difficulty};

/// Word shown to players and the model for a successful check
pub const SUCCESS_WORD: &str = "УСПЕХ";
/// Word shown to players and the model for a failed check
pub const FAILURE_WORD: &str = "ПРОВАЛ";

/// Fields the outcome narration is built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeContext {
    pub success: bool,
    pub check_category: CheckCategory,
    pub difficulty: Difficulty,
    pub roll: u8,
    pub target_mention: Option<String>,
    pub description: String,
}

pub fn result_word(success: bool) -> &'static str {
    if success {
        SUCCESS_WORD
    } else {
        FAILURE_WORD
    }
}

/// Build the user instruction for the scene introduction
pub fn build_intro_prompt(target_mention: Option<&str>, description: &str) -> String {
    let who = match target_mention {
        Some(target) => format!("для {}", target),
        None => "для игрока".to_string(),
    };

    format!(
        "Сформируй короткое вступление сцены {} по описанию: \"{}\".\n\
         Не раскрывай, чем всё закончится: исход решит бросок кубика.\n\
         Дай 2–4 кинематографичных предложения простым текстом.",
        who, description
    )
}

/// Build the user instruction for the continuation after the roll
pub fn build_outcome_prompt(context: &OutcomeContext) -> String {
    let mut prompt = format!("Используй описание: \"{}\".\n", context.description);

    if let Some(target) = &context.target_mention {
        prompt.push_str(&format!("Герой сцены: {}.\n", target));
    }

    prompt.push_str(&format!(
        "Проверка: {}. Бросок: {}. Сложность: {}. Итог: {}.\n",
        context.check_category,
        context.roll,
        context.difficulty,
        result_word(context.success)
    ));
    prompt.push_str("Сделай короткое продолжение (2–4 предложения), которое однозначно отражает итог.");

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intro_prompt_names_target() {
        let prompt = build_intro_prompt(Some("@alex"), "украл пирожок");

        assert!(prompt.contains("для @alex"));
        assert!(prompt.contains("\"украл пирожок\""));
    }

    #[test]
    fn test_intro_prompt_without_target() {
        let prompt = build_intro_prompt(None, "лезет в окно");

        assert!(prompt.contains("для игрока"));
    }

    #[test]
    fn test_outcome_prompt_embeds_all_fields() {
        let context = OutcomeContext {
            success: false,
            check_category: CheckCategory::Luck,
            difficulty: Difficulty::clamped(17),
            roll: 3,
            target_mention: Some("@bob".to_string()),
            description: "прыгает через пропасть".to_string(),
        };

        let prompt = build_outcome_prompt(&context);

        assert!(prompt.contains("прыгает через пропасть"));
        assert!(prompt.contains("@bob"));
        assert!(prompt.contains("Проверка: Удача"));
        assert!(prompt.contains("Бросок: 3"));
        assert!(prompt.contains("Сложность: 17"));
        assert!(prompt.contains(FAILURE_WORD));
    }
}
