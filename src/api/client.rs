//! The typed backend client and its credential policy.
//!
//! Every request is allowed at most one refresh-and-retry: on a 401 the client posts the stored
//! refresh token, persists the renewed pair, and replays the original request once. A second 401
//! (or a refused refresh) clears the stored session and surfaces `ApiError::Auth`, forcing the
//! user to log in again. The bound is an explicit flag rather than recursion so the "no infinite
//! retry" property is visible in the control flow.

use crate::api::{
    Method, Session, Transport, TransportRequest, TransportResponse, TOKEN, TOKEN_REFRESH,
};
use crate::{ApiError, Config, HttpTransport, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// What the refresh endpoint returns. Some backends rotate the refresh token, some return only a
/// new access token; both shapes are accepted.
#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access: String,
    #[serde(default)]
    refresh: Option<String>,
}

/// The backend client. Holds the current session behind a mutex so that the collection fetches
/// can run concurrently over a shared reference.
pub struct Client {
    transport: Box<dyn Transport>,
    base_url: String,
    token_path: PathBuf,
    session: Mutex<Option<Session>>,
}

impl Client {
    pub fn new(
        transport: Box<dyn Transport>,
        base_url: &str,
        token_path: impl Into<PathBuf>,
        session: Option<Session>,
    ) -> Self {
        let base_url = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        Self {
            transport,
            base_url,
            token_path: token_path.into(),
            session: Mutex::new(session),
        }
    }

    /// Builds the production client from a loaded config, picking up the stored session if one
    /// exists.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let token_path = config.token_path();
        let session = Session::load_if_present(&token_path).await?;
        Ok(Self::new(
            Box::new(HttpTransport::new()?),
            config.base_url(),
            token_path,
            session,
        ))
    }

    /// Exchanges username and password for a credential pair and persists it.
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        let response = self
            .transport
            .execute(TransportRequest {
                method: Method::Post,
                url: self.url(TOKEN),
                body: Some(json!({ "username": username, "password": password })),
                bearer: None,
            })
            .await?;
        if response.status == 400 || response.status == 401 {
            return Err(ApiError::Auth("invalid username or password".to_string()).into());
        }
        if !response.is_success() {
            return Err(ApiError::Network(format!(
                "token endpoint returned status {}",
                response.status
            ))
            .into());
        }
        let session: Session = response.json()?;
        session.save(&self.token_path).await?;
        *self.session.lock().await = Some(session);
        Ok(())
    }

    /// Lists every record in `collection`.
    pub async fn list<T>(&self, collection: &str) -> std::result::Result<Vec<T>, ApiError>
    where
        T: DeserializeOwned,
    {
        let path = format!("{collection}/");
        let response = self.send(Method::Get, &path, None).await?;
        if !response.is_success() {
            return Err(ApiError::Network(format!(
                "listing {collection} returned status {}",
                response.status
            )));
        }
        response.json()
    }

    /// Creates a record in `collection` and returns the stored form. A rejected payload is a
    /// `Validation` failure carrying the backend's message verbatim.
    pub async fn create<P, R>(
        &self,
        collection: &str,
        payload: &P,
    ) -> std::result::Result<R, ApiError>
    where
        P: Serialize + Sync,
        R: DeserializeOwned,
    {
        let body = serde_json::to_value(payload)
            .map_err(|e| ApiError::Validation(format!("unserializable payload: {e}")))?;
        let path = format!("{collection}/");
        let response = self.send(Method::Post, &path, Some(body)).await?;
        match response.status {
            _ if response.is_success() => response.json(),
            400 => Err(ApiError::Validation(response.body.clone())),
            404 => Err(ApiError::NotFound(format!("no such collection {collection}"))),
            status => Err(ApiError::Network(format!(
                "creating in {collection} returned status {status}"
            ))),
        }
    }

    /// Deletes the record with `id` from `collection`. Success is 204 or any other 2xx.
    pub async fn remove(&self, collection: &str, id: i64) -> std::result::Result<(), ApiError> {
        let path = format!("{collection}/{id}/");
        let response = self.send(Method::Delete, &path, None).await?;
        match response.status {
            _ if response.is_success() => Ok(()),
            404 => Err(ApiError::NotFound(format!("{collection} record {id}"))),
            status => Err(ApiError::Network(format!(
                "deleting {collection} record {id} returned status {status}"
            ))),
        }
    }

    /// Sends an authenticated request, refreshing and retrying at most once on a 401.
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> std::result::Result<TransportResponse, ApiError> {
        let mut refreshed = false;
        loop {
            let bearer = self
                .session
                .lock()
                .await
                .as_ref()
                .map(|s| s.access().to_string());
            let response = self
                .transport
                .execute(TransportRequest {
                    method,
                    url: self.url(path),
                    body: body.clone(),
                    bearer,
                })
                .await?;
            if response.status != 401 {
                return Ok(response);
            }
            if refreshed {
                // The refreshed credential was also refused; the session is dead.
                self.forget_session().await;
                return Err(ApiError::Auth(
                    "session expired; please log in again".to_string(),
                ));
            }
            debug!("received 401 for {path}; refreshing the access token");
            refreshed = true;
            self.refresh().await?;
        }
    }

    /// Posts the stored refresh token and installs the renewed pair.
    async fn refresh(&self) -> std::result::Result<(), ApiError> {
        let refresh_token = self
            .session
            .lock()
            .await
            .as_ref()
            .map(|s| s.refresh().to_string())
            .ok_or_else(|| ApiError::Auth("not logged in".to_string()))?;

        let response = self
            .transport
            .execute(TransportRequest {
                method: Method::Post,
                url: self.url(TOKEN_REFRESH),
                body: Some(json!({ "refresh": refresh_token })),
                bearer: None,
            })
            .await?;
        if !response.is_success() {
            self.forget_session().await;
            return Err(ApiError::Auth(
                "token refresh was rejected; please log in again".to_string(),
            ));
        }

        let renewed: RefreshResponse = response.json()?;
        let session = Session::new(renewed.access, renewed.refresh.unwrap_or(refresh_token));
        if let Err(error) = session.save(&self.token_path).await {
            // The renewed pair still works for this process; only persistence failed.
            warn!("unable to persist refreshed credentials: {error:#}");
        }
        *self.session.lock().await = Some(session);
        Ok(())
    }

    /// Drops the in-memory session and best-effort clears the stored one.
    async fn forget_session(&self) {
        *self.session.lock().await = None;
        if let Err(error) = Session::clear(&self.token_path).await {
            warn!("unable to clear stored credentials: {error:#}");
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::ScriptedTransport;
    use std::sync::Arc;
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
        transport: Arc<ScriptedTransport>,
    }

    impl Fixture {
        fn new(responses: impl IntoIterator<Item = (u16, &'static str)>) -> Self {
            Self {
                dir: TempDir::new().unwrap(),
                transport: Arc::new(ScriptedTransport::new(responses)),
            }
        }

        fn token_path(&self) -> PathBuf {
            self.dir.path().join("token.json")
        }

        fn client(&self, session: Option<Session>) -> Client {
            Client::new(
                Box::new(SharedTransport(self.transport.clone())),
                "http://backend.test/api",
                self.token_path(),
                session,
            )
        }
    }

    /// Lets a test keep a handle on the transport the client consumes.
    struct SharedTransport(Arc<ScriptedTransport>);

    #[async_trait::async_trait]
    impl Transport for SharedTransport {
        async fn execute(
            &self,
            request: TransportRequest,
        ) -> std::result::Result<TransportResponse, ApiError> {
            self.0.execute(request).await
        }
    }

    #[tokio::test]
    async fn test_base_url_gets_trailing_slash() {
        let fixture = Fixture::new([(200, "[]")]);
        let client = fixture.client(None);
        client.list::<serde_json::Value>("materials").await.unwrap();
        let requests = fixture.transport.requests();
        assert_eq!(requests[0].url, "http://backend.test/api/materials/");
    }

    #[tokio::test]
    async fn test_refresh_and_retry_once_on_401() {
        let fixture = Fixture::new([
            (401, ""),
            (200, r#"{"access": "new-access", "refresh": "new-refresh"}"#),
            (200, "[]"),
        ]);
        let client = fixture.client(Some(Session::new("stale-access", "old-refresh")));

        let records = client.list::<serde_json::Value>("materials").await.unwrap();
        assert!(records.is_empty());

        let requests = fixture.transport.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].bearer.as_deref(), Some("stale-access"));
        assert_eq!(requests[1].url, "http://backend.test/api/token/refresh/");
        assert_eq!(
            requests[1].body.as_ref().unwrap()["refresh"],
            "old-refresh"
        );
        // The retry carries the renewed access token.
        assert_eq!(requests[2].bearer.as_deref(), Some("new-access"));

        // The rotated pair was persisted.
        let stored = Session::load(&fixture.token_path()).await.unwrap();
        assert_eq!(stored, Session::new("new-access", "new-refresh"));
    }

    #[tokio::test]
    async fn test_second_401_forces_logout_without_another_retry() {
        let fixture = Fixture::new([
            (401, ""),
            (200, r#"{"access": "new-access"}"#),
            (401, ""),
        ]);
        let client = fixture.client(Some(Session::new("a", "r")));
        Session::new("a", "r")
            .save(&fixture.token_path())
            .await
            .unwrap();

        let error = client
            .list::<serde_json::Value>("materials")
            .await
            .unwrap_err();
        assert!(matches!(error, ApiError::Auth(_)));

        // Exactly three requests: original, refresh, one retry. No further attempts.
        assert_eq!(fixture.transport.requests().len(), 3);
        // The stored session was cleared.
        assert!(!fixture.token_path().exists());
    }

    #[tokio::test]
    async fn test_rejected_refresh_forces_logout() {
        let fixture = Fixture::new([(401, ""), (401, "")]);
        let client = fixture.client(Some(Session::new("a", "r")));
        Session::new("a", "r")
            .save(&fixture.token_path())
            .await
            .unwrap();

        let error = client
            .list::<serde_json::Value>("materials")
            .await
            .unwrap_err();
        assert!(matches!(error, ApiError::Auth(_)));
        assert_eq!(fixture.transport.requests().len(), 2);
        assert!(!fixture.token_path().exists());
    }

    #[tokio::test]
    async fn test_refresh_keeps_old_refresh_token_when_not_rotated() {
        let fixture = Fixture::new([
            (401, ""),
            (200, r#"{"access": "new-access"}"#),
            (200, "[]"),
        ]);
        let client = fixture.client(Some(Session::new("a", "keep-me")));

        client.list::<serde_json::Value>("materials").await.unwrap();
        let stored = Session::load(&fixture.token_path()).await.unwrap();
        assert_eq!(stored, Session::new("new-access", "keep-me"));
    }

    #[tokio::test]
    async fn test_401_with_no_session_is_auth_error() {
        let fixture = Fixture::new([(401, "")]);
        let client = fixture.client(None);

        let error = client
            .list::<serde_json::Value>("materials")
            .await
            .unwrap_err();
        assert!(matches!(error, ApiError::Auth(_)));
    }

    #[tokio::test]
    async fn test_login_persists_the_pair() {
        let fixture = Fixture::new([(200, r#"{"access": "a1", "refresh": "r1"}"#)]);
        let client = fixture.client(None);

        client.login("owner", "hunter2").await.unwrap();
        let requests = fixture.transport.requests();
        assert_eq!(requests[0].url, "http://backend.test/api/token/");
        assert_eq!(requests[0].body.as_ref().unwrap()["username"], "owner");

        let stored = Session::load(&fixture.token_path()).await.unwrap();
        assert_eq!(stored, Session::new("a1", "r1"));
    }

    #[tokio::test]
    async fn test_login_rejects_bad_credentials() {
        let fixture = Fixture::new([(401, r#"{"detail": "Invalid credentials"}"#)]);
        let client = fixture.client(None);

        let error = client.login("owner", "wrong").await.unwrap_err();
        let api_error = error.downcast::<ApiError>().unwrap();
        assert!(matches!(api_error, ApiError::Auth(_)));
        assert!(!fixture.token_path().exists());
    }

    #[tokio::test]
    async fn test_create_surfaces_validation_message_verbatim() {
        let body = r#"{"material": ["Material is required for a Purchase (CR)."]}"#;
        let fixture = Fixture::new([(400, body)]);
        let client = fixture.client(Some(Session::new("a", "r")));

        let error = client
            .create::<serde_json::Value, serde_json::Value>(
                "transactions",
                &serde_json::json!({"transaction_type": "CR"}),
            )
            .await
            .unwrap_err();
        match error {
            ApiError::Validation(message) => assert_eq!(message, body),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_remove_treats_204_as_success() {
        let fixture = Fixture::new([(204, "")]);
        let client = fixture.client(Some(Session::new("a", "r")));
        client.remove("materials", 7).await.unwrap();
        let requests = fixture.transport.requests();
        assert_eq!(requests[0].url, "http://backend.test/api/materials/7/");
        assert_eq!(requests[0].method, Method::Delete);
    }

    #[tokio::test]
    async fn test_remove_missing_record_is_not_found() {
        let fixture = Fixture::new([(404, "")]);
        let client = fixture.client(Some(Session::new("a", "r")));
        let error = client.remove("materials", 7).await.unwrap_err();
        assert!(matches!(error, ApiError::NotFound(_)));
    }
}
