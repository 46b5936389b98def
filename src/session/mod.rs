//! Per-browser-session cache for the last produced line-item document.
//!
//! The cache is keyed by an opaque session id carried in a cookie. Values are the
//! JSON text shown in the form textarea; reading them for display clears them.

use actix_web::cookie::{Cookie, SameSite};
use actix_web::HttpRequest;
use moka::future::Cache;
use std::time::Duration;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "render_form_session";

#[derive(Clone)]
pub struct SessionStore {
    documents: Cache<String, String>,
}

impl SessionStore {
    pub fn new(idle_ttl: Duration, max_capacity: u64) -> Self {
        let documents = Cache::builder()
            .time_to_idle(idle_ttl)
            .max_capacity(max_capacity)
            .build();
        Self { documents }
    }

    pub async fn get(&self, session_id: &str) -> Option<String> {
        self.documents.get(session_id).await
    }

    pub async fn set(&self, session_id: &str, document_text: String) {
        self.documents
            .insert(session_id.to_string(), document_text)
            .await;
    }

    /// Returns the cached text and removes it, so it is shown at most once.
    pub async fn take(&self, session_id: &str) -> Option<String> {
        self.documents.remove(session_id).await
    }

    pub async fn clear(&self, session_id: &str) {
        self.documents.invalidate(session_id).await;
    }
}

/// Session id attached to a request, and whether it still has to be sent to the client.
#[derive(Debug, Clone)]
pub struct SessionId {
    pub id: String,
    pub is_new: bool,
}

impl SessionId {
    pub fn from_request(req: &HttpRequest) -> Self {
        match req.cookie(SESSION_COOKIE) {
            Some(cookie) if Uuid::parse_str(cookie.value()).is_ok() => Self {
                id: cookie.value().to_string(),
                is_new: false,
            },
            _ => Self {
                id: Uuid::new_v4().to_string(),
                is_new: true,
            },
        }
    }

    pub fn cookie(&self) -> Cookie<'static> {
        Cookie::build(SESSION_COOKIE, self.id.clone())
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn store() -> SessionStore {
        SessionStore::new(Duration::from_secs(60), 100)
    }

    #[tokio::test]
    async fn test_take_returns_value_once() {
        let sessions = store();
        sessions.set("a", "{\"items\": []}".to_string()).await;

        assert_eq!(sessions.take("a").await.as_deref(), Some("{\"items\": []}"));
        assert!(sessions.take("a").await.is_none());
    }

    #[tokio::test]
    async fn test_set_overwrites_previous_document() {
        let sessions = store();
        sessions.set("a", "first".to_string()).await;
        sessions.set("a", "second".to_string()).await;
        assert_eq!(sessions.get("a").await.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let sessions = store();
        sessions.set("a", "mine".to_string()).await;
        assert!(sessions.get("b").await.is_none());
        sessions.clear("a").await;
        assert!(sessions.get("a").await.is_none());
    }

    #[test]
    fn test_session_id_reuses_valid_cookie() {
        let existing = Uuid::new_v4().to_string();
        let req = TestRequest::default()
            .cookie(Cookie::new(SESSION_COOKIE, existing.clone()))
            .to_http_request();

        let session = SessionId::from_request(&req);
        assert_eq!(session.id, existing);
        assert!(!session.is_new);
    }

    #[test]
    fn test_session_id_replaces_garbage_cookie() {
        let req = TestRequest::default()
            .cookie(Cookie::new(SESSION_COOKIE, "../../etc"))
            .to_http_request();

        let session = SessionId::from_request(&req);
        assert!(session.is_new);
        assert!(Uuid::parse_str(&session.id).is_ok());
        assert_eq!(session.cookie().name(), SESSION_COOKIE);
    }
}
