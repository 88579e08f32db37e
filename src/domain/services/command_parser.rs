//! Command parser - recognises `/dnd` and splits off the target and description

/// Keyword that starts a roll event
const TRIGGER_KEYWORD: &str = "/dnd";

/// Result of parsing a trigger command; missing parts are `None`, never errors
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedCommand {
    /// Leading mention including the `@`, e.g. `@alex`
    pub target_mention: Option<String>,
    pub description: Option<String>,
}

/// Parser for the trigger command.
///
/// When the bot's own username is known, the `/dnd@BotName` form Telegram
/// uses in group chats is understood and the suffix is not mistaken for a
/// target mention.
#[derive(Debug, Clone, Default)]
pub struct CommandParser {
    bot_username: Option<String>,
}

impl CommandParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bot_username(mut self, username: impl Into<String>) -> Self {
        let username = username.into();
        let username = username.trim_start_matches('@');
        self.bot_username = (!username.is_empty()).then(|| username.to_string());
        self
    }

    pub fn is_trigger(&self, raw_text: &str) -> bool {
        is_trigger_command(raw_text)
    }

    pub fn parse(&self, raw_text: &str) -> ParsedCommand {
        let text = raw_text.trim();
        let Some(rest) = text.strip_prefix(TRIGGER_KEYWORD) else {
            return ParsedCommand::default();
        };

        let rest = self.strip_bot_suffix(rest).trim();

        let (target_mention, remainder) = match leading_mention(rest) {
            Some(len) => (Some(rest[..len].to_string()), rest[len..].trim()),
            None => (None, rest),
        };

        ParsedCommand {
            target_mention,
            description: (!remainder.is_empty()).then(|| remainder.to_string()),
        }
    }

    fn strip_bot_suffix<'a>(&self, rest: &'a str) -> &'a str {
        let Some(bot) = &self.bot_username else {
            return rest;
        };
        let Some(len) = rest.strip_prefix('@').and(leading_mention(rest)) else {
            return rest;
        };
        if rest[1..len].eq_ignore_ascii_case(bot) {
            &rest[len..]
        } else {
            rest
        }
    }
}

/// True iff the trimmed text begins with the trigger keyword
fn is_trigger_command(raw_text: &str) -> bool {
    raw_text.trim().starts_with(TRIGGER_KEYWORD)
}

/// Byte length of a leading `@[A-Za-z0-9_]+` token, if any
fn leading_mention(text: &str) -> Option<usize> {
    let name = text.strip_prefix('@')?;
    let len = name
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
        .count();
    (len > 0).then_some(len + 1)
}
