//! HTTP routes: health check and Telegram webhook delivery

mod webhook_routes;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::infrastructure::state::AppState;

/// Header Telegram uses to echo the webhook secret
pub const SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

/// Create all HTTP routes
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health_check))
        .route("/telegram/webhook", post(webhook_routes::receive_update))
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::infrastructure::config::{AppConfig, BotMode};
    use crate::infrastructure::dispatcher::UpdateHandler;
    use crate::infrastructure::session::RollEventStore;
    use crate::infrastructure::telegram::{TelegramClient, Update};

    /// Records update ids and signals each arrival
    struct RecordingHandler {
        seen: Mutex<Vec<i64>>,
        notify: tokio::sync::Notify,
    }

    #[async_trait]
    impl UpdateHandler for RecordingHandler {
        async fn handle_update(&self, update: Update) {
            self.seen.lock().unwrap().push(update.update_id);
            self.notify.notify_one();
        }
    }

    fn test_state(secret: Option<&str>) -> (Arc<AppState>, Arc<RecordingHandler>) {
        let config = AppConfig {
            telegram_token: "123:abc".to_string(),
            telegram_api_url: "http://127.0.0.1:9".to_string(),
            openai_api_key: "sk-test".to_string(),
            openai_base_url: "http://127.0.0.1:9".to_string(),
            openai_model: "gpt-4o-mini".to_string(),
            mode: BotMode::Webhook {
                url: "https://example.org/telegram/webhook".to_string(),
            },
            webhook_secret: secret.map(str::to_string),
            server_port: 3000,
            event_ttl: Duration::from_secs(3600),
            sweep_interval: Duration::from_secs(600),
        };
        let handler = Arc::new(RecordingHandler {
            seen: Mutex::new(Vec::new()),
            notify: tokio::sync::Notify::new(),
        });
        let state = AppState {
            telegram: TelegramClient::new(&config.telegram_api_url, &config.telegram_token),
            config,
            store: Arc::new(RollEventStore::new()),
            dispatcher: handler.clone(),
        };
        (Arc::new(state), handler)
    }

    fn webhook_request(secret: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/telegram/webhook")
            .header("content-type", "application/json");
        if let Some(secret) = secret {
            builder = builder.header(SECRET_HEADER, secret);
        }
        builder
            .body(Body::from(r#"{"update_id": 77}"#))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let (state, _) = test_state(None);
        let app = create_routes().with_state(state);

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), 64).await.unwrap();
        assert_eq!(&body[..], b"OK");
    }

    #[tokio::test]
    async fn test_webhook_dispatches_update() {
        let (state, handler) = test_state(Some("s3cret"));
        let app = create_routes().with_state(state);

        let response = app.oneshot(webhook_request(Some("s3cret"))).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        tokio::time::timeout(Duration::from_secs(1), handler.notify.notified())
            .await
            .unwrap();
        assert_eq!(*handler.seen.lock().unwrap(), vec![77]);
    }

    #[tokio::test]
    async fn test_webhook_rejects_wrong_secret() {
        let (state, handler) = test_state(Some("s3cret"));
        let app = create_routes().with_state(state);

        let wrong = app
            .clone()
            .oneshot(webhook_request(Some("guess")))
            .await
            .unwrap();
        let missing = app.oneshot(webhook_request(None)).await.unwrap();

        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
        assert!(handler.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_webhook_without_secret_accepts_any() {
        let (state, _) = test_state(None);
        let app = create_routes().with_state(state);

        let response = app.oneshot(webhook_request(None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
