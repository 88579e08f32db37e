//! Actor identities - who triggered an event and who may resolve it

use serde::{Deserialize, Serialize};

use super::ids::UserId;

/// A chat user as reported by the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: UserId,
    pub username: Option<String>,
}

impl Actor {
    pub fn new(id: UserId, username: Option<String>) -> Self {
        Self {
            id,
            username: username.filter(|u| !u.is_empty()),
        }
    }

    /// Preferred identity form: the username when known, otherwise the numeric id
    pub fn identity(&self) -> ActorIdentity {
        match &self.username {
            Some(username) => ActorIdentity::Username(username.clone()),
            None => ActorIdentity::UserId(self.id),
        }
    }
}

/// Exactly one identity form for a user
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorIdentity {
    /// Username without the leading `@`
    Username(String),
    UserId(UserId),
}

impl ActorIdentity {
    /// Resolve the only identity allowed to roll for a new event.
    ///
    /// A mention designates that user by username; otherwise the invoker
    /// rolls for themselves, by username if known, else by numeric id.
    pub fn allowed_for(target_mention: Option<&str>, invoker: &Actor) -> Self {
        match target_mention {
            Some(mention) => Self::Username(mention.trim_start_matches('@').to_string()),
            None => invoker.identity(),
        }
    }

    /// Whether `actor` is the user this identity designates.
    ///
    /// Telegram usernames are case-insensitive.
    pub fn matches(&self, actor: &Actor) -> bool {
        match self {
            Self::Username(expected) => actor
                .username
                .as_deref()
                .is_some_and(|actual| actual.eq_ignore_ascii_case(expected)),
            Self::UserId(expected) => actor.id == *expected,
        }
    }
}

impl std::fmt::Display for ActorIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Username(username) => write!(f, "@{}", username),
            Self::UserId(id) => write!(f, "#{}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mention_designates_username() {
        let invoker = Actor::new(1, Some("alice".to_string()));
        let allowed = ActorIdentity::allowed_for(Some("@bob"), &invoker);

        assert_eq!(allowed, ActorIdentity::Username("bob".to_string()));
        assert!(allowed.matches(&Actor::new(2, Some("Bob".to_string()))));
        assert!(!allowed.matches(&invoker));
    }

    #[test]
    fn test_invoker_without_username_is_matched_by_id() {
        let invoker = Actor::new(42, None);
        let allowed = ActorIdentity::allowed_for(None, &invoker);

        assert_eq!(allowed, ActorIdentity::UserId(42));
        assert!(allowed.matches(&Actor::new(42, None)));
        assert!(!allowed.matches(&Actor::new(43, None)));
    }

    #[test]
    fn test_user_without_username_never_matches_username_identity() {
        let allowed = ActorIdentity::Username("carol".to_string());

        assert!(!allowed.matches(&Actor::new(7, None)));
    }

    #[test]
    fn test_empty_username_treated_as_missing() {
        let actor = Actor::new(5, Some(String::new()));

        assert_eq!(actor.identity(), ActorIdentity::UserId(5));
    }
}
