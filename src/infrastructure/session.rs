//! Roll event store - in-memory table of live events
//!
//! Events live only as long as one round of the game: created when a command
//! arrives, resolved by a single button press, then deleted. Nothing is
//! persisted; a restart forgets every pending event and their buttons answer
//! with the "expired" notice.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::entities::{NewRollEvent, RollEvent};
use crate::domain::value_objects::{ActorIdentity, EventToken, MessageRef};

#[derive(Default)]
struct StoreState {
    live: HashMap<EventToken, RollEvent>,
    /// Tokens of resolved events with their deletion time
    retired: HashMap<EventToken, DateTime<Utc>>,
}

/// Concurrent-safe store of live roll events keyed by token
#[derive(Default)]
pub struct RollEventStore {
    state: RwLock<StoreState>,
}

impl RollEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a token and insert a new event under it
    pub async fn create(&self, data: NewRollEvent) -> EventToken {
        let now = Utc::now();
        let mut state = self.state.write().await;

        let mut token = EventToken::generate(now);
        while state.live.contains_key(&token) || state.retired.contains_key(&token) {
            token = EventToken::generate(now);
        }

        state
            .live
            .insert(token.clone(), RollEvent::new(token.clone(), data, now));
        tracing::debug!("Roll event {} created ({} live)", token, state.live.len());
        token
    }

    /// Snapshot of an event, if it is still live
    pub async fn get(&self, token: &EventToken) -> Option<RollEvent> {
        self.state.read().await.live.get(token).cloned()
    }

    /// Latch the single roll.
    ///
    /// Returns `false` when the event is missing or already used. The check
    /// and the write happen under one write lock, so of two concurrent
    /// presses exactly one wins.
    pub async fn mark_used(&self, token: &EventToken, actor: ActorIdentity) -> bool {
        let mut state = self.state.write().await;
        match state.live.get_mut(token) {
            Some(event) if event.used_by.is_none() => {
                event.used_by = Some(actor);
                true
            }
            _ => false,
        }
    }

    /// Record where the announcement was delivered
    pub async fn set_message_ref(&self, token: &EventToken, message_ref: MessageRef) -> bool {
        let mut state = self.state.write().await;
        match state.live.get_mut(token) {
            Some(event) => {
                event.message_ref = Some(message_ref);
                true
            }
            None => false,
        }
    }

    /// Remove an event. A resolved event's token is remembered as retired so
    /// late presses can be told the roll already happened.
    pub async fn delete(&self, token: &EventToken) -> Option<RollEvent> {
        let mut state = self.state.write().await;
        let event = state.live.remove(token)?;
        if event.is_used() {
            state.retired.insert(token.clone(), Utc::now());
        }
        Some(event)
    }

    /// Whether the token belonged to an event that was already resolved
    pub async fn is_retired(&self, token: &EventToken) -> bool {
        self.state.read().await.retired.contains_key(token)
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.live.len()
    }

    /// Drop live events created, and retired tokens deleted, more than
    /// `max_age` ago; returns how many live events were removed
    pub async fn sweep_older_than(&self, max_age: Duration) -> usize {
        let max_age = chrono::Duration::from_std(max_age).unwrap_or(chrono::Duration::MAX);
        let Some(cutoff) = Utc::now().checked_sub_signed(max_age) else {
            return 0;
        };

        let mut state = self.state.write().await;
        let before = state.live.len();
        state.live.retain(|_, event| event.created_at >= cutoff);
        state.retired.retain(|_, retired_at| *retired_at >= cutoff);
        before - state.live.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::value_objects::{CheckCategory, Difficulty, Persona};

    fn create_test_data() -> NewRollEvent {
        NewRollEvent {
            chat_id: -42,
            difficulty: Difficulty::clamped(10),
            check_category: CheckCategory::Charisma,
            target_mention: None,
            description: "уговаривает стражника".to_string(),
            intro_text: "Стражник зевает.".to_string(),
            allowed_actor: ActorIdentity::UserId(7),
            persona: Persona::DungeonMaster,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = RollEventStore::new();
        let token = store.create(create_test_data()).await;

        let event = store.get(&token).await.unwrap();
        assert_eq!(event.token, token);
        assert_eq!(event.chat_id, -42);
        assert!(!event.is_used());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_tokens_are_unique() {
        let store = RollEventStore::new();
        let a = store.create(create_test_data()).await;
        let b = store.create(create_test_data()).await;

        assert_ne!(a, b);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_mark_used_latches_once() {
        let store = RollEventStore::new();
        let token = store.create(create_test_data()).await;

        assert!(store.mark_used(&token, ActorIdentity::UserId(7)).await);
        assert!(!store.mark_used(&token, ActorIdentity::UserId(7)).await);

        let event = store.get(&token).await.unwrap();
        assert_eq!(event.used_by, Some(ActorIdentity::UserId(7)));
    }

    #[tokio::test]
    async fn test_mark_used_missing_token() {
        let store = RollEventStore::new();

        assert!(!store.mark_used(&EventToken::from_raw("nope"), ActorIdentity::UserId(1)).await);
    }

    #[tokio::test]
    async fn test_concurrent_mark_used_has_single_winner() {
        let store = Arc::new(RollEventStore::new());
        let token = store.create(create_test_data()).await;

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                let token = token.clone();
                tokio::spawn(async move { store.mark_used(&token, ActorIdentity::UserId(i)).await })
            })
            .collect();

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }

    #[tokio::test]
    async fn test_set_message_ref() {
        let store = RollEventStore::new();
        let token = store.create(create_test_data()).await;

        assert!(store.set_message_ref(&token, MessageRef::new(-42, 99)).await);
        assert_eq!(
            store.get(&token).await.unwrap().message_ref,
            Some(MessageRef::new(-42, 99))
        );
        assert!(!store.set_message_ref(&EventToken::from_raw("gone"), MessageRef::new(1, 1)).await);
    }

    #[tokio::test]
    async fn test_delete_removes_event() {
        let store = RollEventStore::new();
        let token = store.create(create_test_data()).await;

        assert!(store.delete(&token).await.is_some());
        assert!(store.get(&token).await.is_none());
        assert!(store.delete(&token).await.is_none());
        assert!(!store.is_retired(&token).await);
    }

    #[tokio::test]
    async fn test_resolved_event_is_retired() {
        let store = RollEventStore::new();
        let token = store.create(create_test_data()).await;
        store.mark_used(&token, ActorIdentity::UserId(7)).await;

        store.delete(&token).await;

        assert!(store.get(&token).await.is_none());
        assert!(store.is_retired(&token).await);
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_sweep_keeps_fresh_events() {
        let store = RollEventStore::new();
        let fresh = store.create(create_test_data()).await;
        let stale = store.create(create_test_data()).await;
        {
            let mut state = store.state.write().await;
            if let Some(event) = state.live.get_mut(&stale) {
                event.created_at = Utc::now() - chrono::Duration::hours(7);
            }
        }

        let removed = store.sweep_older_than(Duration::from_secs(6 * 3600)).await;

        assert_eq!(removed, 1);
        assert!(store.get(&fresh).await.is_some());
        assert!(store.get(&stale).await.is_none());
    }
}
