//! Message rendering - user-facing texts of a roll event
//!
//! Texts are plain; markup escaping is the transport adapter's job.

use crate::application::services::llm::result_word;
use crate::domain::entities::RollEvent;
use crate::domain::value_objects::ActorIdentity;

pub const USAGE_HINT: &str =
    "Нужно описание события после /dnd. Пример: /dnd @alex украл пирожок у торговца";

pub const ROLL_BUTTON_LABEL: &str = "🎲 Бросить d20";

pub const EXPIRED_NOTICE: &str = "Событие устарело или не найдено.";

pub const ALREADY_ROLLED_NOTICE: &str = "Бросок уже сделан.";

/// Stand-in when the outcome narration could not be generated
pub const OUTCOME_PLACEHOLDER: &str = "(рассказчик потерял дар речи, но кубик не врёт)";

/// Telegram's cap on message text
pub const MESSAGE_LIMIT: usize = 4096;

/// Markup escaping at most doubles a text: an escaped character becomes two
/// ASCII characters and an unescaped one is at most two UTF-16 units.
const ESCAPE_FACTOR: usize = 2;

const TRUNCATION_MARK: char = '…';

/// Initial message: header, optional target, intro, category and difficulty
pub fn render_announcement(event: &RollEvent) -> String {
    let budget = narration_budget(&announcement_text(event, ""));
    announcement_text(event, &truncate(&event.intro_text, budget))
}

/// Final message: the announcement followed by the roll and its consequences.
///
/// Intro and outcome narration are shortened as needed so the escaped text
/// stays within `MESSAGE_LIMIT`; the roll and its result are never cut.
pub fn render_resolution(event: &RollEvent, roll: u8, success: bool, outcome_text: &str) -> String {
    let skeleton = format!(
        "{}{}",
        announcement_text(event, ""),
        resolution_tail(event, roll, success, "")
    );
    let (intro_max, outcome_max) = split_budget(
        event.intro_text.chars().count(),
        outcome_text.chars().count(),
        narration_budget(&skeleton),
    );

    format!(
        "{}{}",
        announcement_text(event, &truncate(&event.intro_text, intro_max)),
        resolution_tail(event, roll, success, &truncate(outcome_text, outcome_max))
    )
}

fn announcement_text(event: &RollEvent, intro: &str) -> String {
    let mut text = format!("🎭 Событие {}", event.persona.title());
    if let Some(target) = &event.target_mention {
        text.push_str(&format!(" для {}", target));
    }

    if !intro.is_empty() {
        text.push_str("\n\n");
        text.push_str(intro);
    }

    text.push_str(&format!(
        "\n\n🎲 Проверка: {}\nСложность: {}",
        event.check_category, event.difficulty
    ));

    text
}

fn resolution_tail(event: &RollEvent, roll: u8, success: bool, outcome: &str) -> String {
    format!(
        "\n\n🎲 Бросок: {}\nСложность: {} — {}\n\n{} Продолжение истории:\n{}",
        roll,
        event.difficulty,
        result_word(success),
        if success { "🔓" } else { "💥" },
        outcome
    )
}

/// Plain characters left for narration around a narration-free skeleton
fn narration_budget(skeleton: &str) -> usize {
    // +2 for the separator an intro brings with it
    (MESSAGE_LIMIT / ESCAPE_FACTOR).saturating_sub(skeleton.chars().count() + 2)
}

/// Share `total` between two texts; a short one leaves its spare to the other
fn split_budget(first: usize, second: usize, total: usize) -> (usize, usize) {
    if first + second <= total {
        return (first, second);
    }
    let half = total / 2;
    if first <= half {
        (first, total - first)
    } else if second <= half {
        (total - second, second)
    } else {
        (half, total - half)
    }
}

/// Cut to at most `max` characters, marking the cut
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut cut: String = text.chars().take(max - 1).collect();
    cut.push(TRUNCATION_MARK);
    cut
}

/// Notice for someone pressing another player's button
pub fn not_allowed_notice(allowed: &ActorIdentity) -> String {
    match allowed {
        ActorIdentity::Username(username) => format!("Кнопку может нажать только @{}.", username),
        ActorIdentity::UserId(_) => "Кнопку может нажать только автор события.".to_string(),
    }
}

/// Immediate feedback with the raw die value
pub fn roll_ack(roll: u8) -> String {
    format!("Ты бросил: {}", roll)
}
