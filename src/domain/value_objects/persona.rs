//! Narrator personas - the voice an event is told in

use serde::{Deserialize, Serialize};

/// Rules shared by every persona's system directive
const DELIVERY_RULES: &str = "\
Правила подачи:
- Вступления и продолжения делай краткими (2–4 предложения), кинематографичными, будто описываешь сцену за игровым столом.
- Действия персонажей можно выделять звёздочками: *пинает дверь*.
- Шутки — забавные, атмосфера — приключенческая, без травли реальных людей.
- Формат ответов — простой текст.";

/// Narrator voice picked once per event and reused for both narrations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Persona {
    /// Charismatic Baldur's Gate 3 style dungeon master
    DungeonMaster,
    /// Tired tavern bard who has seen it all
    WearyBard,
    /// Action-movie narrator with a signature label in the header
    SnusWillis,
}

impl Persona {
    pub const ALL: [Persona; 3] = [Self::DungeonMaster, Self::WearyBard, Self::SnusWillis];

    pub fn emoji(&self) -> &'static str {
        match self {
            Self::DungeonMaster => "🧙",
            Self::WearyBard => "🎻",
            Self::SnusWillis => "🕶️",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::DungeonMaster => "Мастер подземелий",
            Self::WearyBard => "Уставший бард",
            Self::SnusWillis => "Снюсс Уиллис",
        }
    }

    /// Header badge: only the signature persona shows its name next to the emoji
    pub fn title(&self) -> String {
        match self {
            Self::SnusWillis => format!("{} {}", self.emoji(), self.label()),
            _ => self.emoji().to_string(),
        }
    }

    /// System-level style directive sent with every narration request
    pub fn directive(&self) -> String {
        let voice = match self {
            Self::DungeonMaster => {
                "Ты — Мастер подземелий в стиле Baldur's Gate 3. Говоришь по-русски, \
                 ведёшь сценки с лёгким юмором, остроумными ремарками и атмосферой \
                 фэнтези-приключения. Тон: дружелюбный, игривый, иногда саркастичный. \
                 Уместные отсылки к BG3 допустимы, но не злоупотребляй ими."
            }
            Self::WearyBard => {
                "Ты — уставший трактирный бард, который видел всё. Говоришь по-русски, \
                 рассказываешь с ленивой иронией и внезапными лирическими отступлениями, \
                 но всегда доводишь историю до сути."
            }
            Self::SnusWillis => {
                "Ты — Снюсс Уиллис, рассказчик из боевиков девяностых. Говоришь по-русски, \
                 коротко и пафосно, с крутыми однострочниками и взрывами на фоне, \
                 даже если герой просто открывает дверь."
            }
        };
        format!("{}\n\n{}", voice, DELIVERY_RULES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_signature_persona_shows_label() {
        assert_eq!(Persona::DungeonMaster.title(), "🧙");
        assert!(Persona::SnusWillis.title().contains("Снюсс Уиллис"));
    }

    #[test]
    fn test_directive_includes_delivery_rules() {
        for persona in Persona::ALL {
            assert!(persona.directive().contains("Правила подачи"));
        }
    }
}
