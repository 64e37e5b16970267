//! Wellness backend HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::dto::{ChatRequest, ErrorResponse};
use crate::domain::entities::{
    AffectiveAnswers, AffectiveResult, AuthToken, ChatReply, CheckIn, CheckInAnswers,
    DashboardData, JournalEntry, NewJournalEntry, ProfileUpdate, RiskData, UserProfile,
};
use crate::domain::errors::ApiError;
use crate::domain::ports::WellnessApiPort;

const JOURNAL_PATH: &str = "/v1/journal/";
const CHAT_PATH: &str = "/v1/chat/message";
const RISK_PATH: &str = "/v1/insights/risk";
const DASHBOARD_PATH: &str = "/v1/insights/dashboard";
const CHECK_IN_SUBMIT_PATH: &str = "/checkin/";
const CHECK_IN_TODAY_PATH: &str = "/v1/checkin/today";
const PROFILE_PATH: &str = "/v1/users/me";
const AFFECTIVE_PATH: &str = "/affective/analyze/questions";

const USER_AGENT: &str = concat!("bhavya/", env!("CARGO_PKG_VERSION"));
const DEFAULT_RETRY_AFTER_SECS: u64 = 5;

/// REST client for the wellness backend.
pub struct WellnessApiClient {
    client: Client,
    base_url: String,
}

impl WellnessApiClient {
    /// Creates client for `base_url` (including the `/api` prefix).
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::unexpected(format!("failed to create HTTP client: {e}")))?;

        Ok(Self::with_client(client, base_url))
    }

    /// Wraps a preconfigured `reqwest::Client`.
    #[must_use]
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, token: &AuthToken) -> Result<T, ApiError> {
        let request = self
            .client
            .get(self.url(path))
            .header(header::AUTHORIZATION, token.bearer_header());
        self.execute(path, request).await
    }

    async fn post<B, T>(&self, path: &str, token: &AuthToken, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let request = self
            .client
            .post(self.url(path))
            .header(header::AUTHORIZATION, token.bearer_header())
            .json(body);
        self.execute(path, request).await
    }

    async fn put<B, T>(&self, path: &str, token: &AuthToken, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let request = self
            .client
            .put(self.url(path))
            .header(header::AUTHORIZATION, token.bearer_header())
            .json(body);
        self.execute(path, request).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        path: &str,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        debug!(base = %self.base_url, path, "Sending backend request");

        let response = request.send().await.map_err(|e| {
            warn!(path, error = %e, "Backend request failed");
            map_transport_error(&e)
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::handle_error_response(path, status, response).await);
        }

        let body = response.bytes().await.map_err(|e| map_transport_error(&e))?;
        serde_json::from_slice(&body).map_err(|e| {
            warn!(path, error = %e, "Failed to parse backend response");
            ApiError::decode(format!("{path}: {e}"))
        })
    }

    async fn handle_error_response(
        path: &str,
        status: StatusCode,
        response: reqwest::Response,
    ) -> ApiError {
        let retry_after = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        let detail = response
            .json::<ErrorResponse>()
            .await
            .ok()
            .and_then(|body| body.message());

        warn!(path, status = status.as_u16(), detail = ?detail, "Backend returned error status");
        map_status(status, path, detail, retry_after)
    }
}

fn map_transport_error(e: &reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::network("request timed out")
    } else if e.is_connect() {
        ApiError::network("failed to connect to backend")
    } else if e.is_decode() {
        ApiError::decode(e.to_string())
    } else {
        ApiError::network(e.to_string())
    }
}

fn map_status(
    status: StatusCode,
    path: &str,
    detail: Option<String>,
    retry_after: Option<u64>,
) -> ApiError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ApiError::unauthorized(detail.unwrap_or_else(|| "invalid or expired token".to_string()))
        }
        StatusCode::NOT_FOUND => ApiError::NotFound {
            path: path.to_string(),
        },
        StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimited {
            retry_after_secs: retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS),
        },
        StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
            ApiError::invalid_request(detail.unwrap_or_else(|| format!("HTTP {status}")))
        }
        s if s.is_server_error() => ApiError::Unavailable {
            status: s.as_u16(),
        },
        s => ApiError::unexpected(match detail {
            Some(detail) => format!("HTTP {s}: {detail}"),
            None => format!("HTTP {s}"),
        }),
    }
}

#[async_trait]
impl WellnessApiPort for WellnessApiClient {
    async fn list_journal_entries(
        &self,
        token: &AuthToken,
    ) -> Result<Vec<JournalEntry>, ApiError> {
        self.get(JOURNAL_PATH, token).await
    }

    async fn create_journal_entry(
        &self,
        token: &AuthToken,
        entry: &NewJournalEntry,
    ) -> Result<JournalEntry, ApiError> {
        self.post(JOURNAL_PATH, token, entry).await
    }

    async fn send_chat_message(
        &self,
        token: &AuthToken,
        message: &str,
    ) -> Result<ChatReply, ApiError> {
        self.post(CHAT_PATH, token, &ChatRequest { message }).await
    }

    async fn fetch_risk(&self, token: &AuthToken) -> Result<RiskData, ApiError> {
        self.get(RISK_PATH, token).await
    }

    async fn fetch_dashboard(&self, token: &AuthToken) -> Result<DashboardData, ApiError> {
        self.get(DASHBOARD_PATH, token).await
    }

    async fn submit_check_in(
        &self,
        token: &AuthToken,
        answers: &CheckInAnswers,
    ) -> Result<CheckIn, ApiError> {
        self.post(CHECK_IN_SUBMIT_PATH, token, answers).await
    }

    async fn fetch_today_check_in(&self, token: &AuthToken) -> Result<Option<CheckIn>, ApiError> {
        self.get(CHECK_IN_TODAY_PATH, token).await
    }

    async fn fetch_profile(&self, token: &AuthToken) -> Result<UserProfile, ApiError> {
        self.get(PROFILE_PATH, token).await
    }

    async fn update_profile(
        &self,
        token: &AuthToken,
        update: &ProfileUpdate,
    ) -> Result<UserProfile, ApiError> {
        self.put(PROFILE_PATH, token, update).await
    }

    async fn analyze_affective(
        &self,
        token: &AuthToken,
        answers: &AffectiveAnswers,
    ) -> Result<AffectiveResult, ApiError> {
        self.post(AFFECTIVE_PATH, token, answers).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Mood;
    use test_case::test_case;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    fn token() -> AuthToken {
        AuthToken::new_unchecked("test-token")
    }

    fn client_for(base_url: &str) -> WellnessApiClient {
        let client = Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        WellnessApiClient::with_client(client, base_url)
    }

    /// Serves one canned response and returns the raw request it received.
    async fn serve_once(
        status_line: &'static str,
        extra_headers: &'static str,
        body: &'static str,
    ) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\n{extra_headers}Connection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            request
        });
        (format!("http://{addr}/api"), handle)
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf);
            if let Some(end) = text.find("\r\n\r\n") {
                let content_length = text[..end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    #[test_case(StatusCode::UNAUTHORIZED, "unauthorized")]
    #[test_case(StatusCode::FORBIDDEN, "unauthorized")]
    #[test_case(StatusCode::NOT_FOUND, "not_found")]
    #[test_case(StatusCode::TOO_MANY_REQUESTS, "rate_limited")]
    #[test_case(StatusCode::BAD_REQUEST, "invalid")]
    #[test_case(StatusCode::UNPROCESSABLE_ENTITY, "invalid")]
    #[test_case(StatusCode::INTERNAL_SERVER_ERROR, "unavailable")]
    #[test_case(StatusCode::BAD_GATEWAY, "unavailable")]
    #[test_case(StatusCode::IM_A_TEAPOT, "unexpected")]
    fn test_status_mapping(status: StatusCode, expected: &str) {
        let err = map_status(status, "/v1/journal/", None, None);
        let kind = match err {
            ApiError::Unauthorized { .. } => "unauthorized",
            ApiError::NotFound { .. } => "not_found",
            ApiError::RateLimited { .. } => "rate_limited",
            ApiError::InvalidRequest { .. } => "invalid",
            ApiError::Unavailable { .. } => "unavailable",
            ApiError::Unexpected { .. } => "unexpected",
            _ => "other",
        };
        assert_eq!(kind, expected);
    }

    #[test]
    fn test_status_mapping_keeps_detail_and_retry_after() {
        let err = map_status(
            StatusCode::BAD_REQUEST,
            "/checkin/",
            Some("You have already checked in today.".to_string()),
            None,
        );
        assert_eq!(
            err.to_string(),
            "invalid request: You have already checked in today."
        );

        let err = map_status(StatusCode::TOO_MANY_REQUESTS, "/v1/chat/message", None, Some(30));
        assert!(matches!(err, ApiError::RateLimited { retry_after_secs: 30 }));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = client_for("http://localhost:8000/api/");
        assert_eq!(client.url(CHECK_IN_SUBMIT_PATH), "http://localhost:8000/api/checkin/");
        assert_eq!(client.url(RISK_PATH), "http://localhost:8000/api/v1/insights/risk");
    }

    #[tokio::test]
    async fn test_list_journal_sends_bearer_and_decodes() {
        let (base, server) = serve_once(
            "200 OK",
            "",
            r#"[{"id":7,"user_id":1,"title":"Morning","mood":"CALM","content":"Slept well.","timestamp":"2024-05-02T07:30:00"}]"#,
        )
        .await;

        let entries = client_for(&base).list_journal_entries(&token()).await.unwrap();
        let request = server.await.unwrap().to_lowercase();

        assert!(request.starts_with("get /api/v1/journal/ http/1.1"));
        assert!(request.contains("authorization: bearer test-token"));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].mood, Some(Mood::Calm));
    }

    #[tokio::test]
    async fn test_create_journal_posts_json_body() {
        let (base, server) = serve_once(
            "200 OK",
            "",
            r#"{"id":8,"user_id":1,"title":null,"mood":"LOW","content":"Rough day","timestamp":"2024-05-02T21:00:00"}"#,
        )
        .await;

        let entry = NewJournalEntry::new("Rough day").with_mood(Mood::Low);
        let stored = client_for(&base)
            .create_journal_entry(&token(), &entry)
            .await
            .unwrap();
        let request = server.await.unwrap();

        assert!(request.starts_with("POST /api/v1/journal/ HTTP/1.1"));
        assert!(request.ends_with(r#"{"mood":"LOW","content":"Rough day"}"#));
        assert_eq!(stored.id, 8);
        assert!(stored.title.is_none());
    }

    #[tokio::test]
    async fn test_check_in_submit_uses_unversioned_route() {
        let (base, server) = serve_once(
            "400 Bad Request",
            "",
            r#"{"detail":"You have already checked in today."}"#,
        )
        .await;

        let answers = CheckInAnswers::default();
        let err = client_for(&base)
            .submit_check_in(&token(), &answers)
            .await
            .unwrap_err();
        let request = server.await.unwrap();

        assert!(request.starts_with("POST /api/checkin/ HTTP/1.1"));
        assert!(matches!(err, ApiError::InvalidRequest { ref message } if message.contains("already")));
    }

    #[tokio::test]
    async fn test_fetch_profile_decodes_user() {
        let (base, server) = serve_once(
            "200 OK",
            "",
            r#"{"id":3,"username":"meera","email":"meera@example.org","full_name":"Meera Rao","bio":null,"location":"Pune","is_active":true,"created_at":"2024-01-15T09:30:00"}"#,
        )
        .await;

        let profile = client_for(&base).fetch_profile(&token()).await.unwrap();
        let request = server.await.unwrap().to_lowercase();

        assert!(request.starts_with("get /api/v1/users/me http/1.1"));
        assert!(request.contains("authorization: bearer test-token"));
        assert_eq!(profile.display_name(), "Meera Rao");
        assert_eq!(profile.location(), Some("Pune"));
        assert!(profile.bio().is_none());
    }

    #[tokio::test]
    async fn test_update_profile_puts_changed_fields_only() {
        let (base, server) = serve_once(
            "200 OK",
            "",
            r#"{"id":3,"username":"meera","email":null,"full_name":null,"bio":"Runner","location":null,"is_active":true,"created_at":"2024-01-15T09:30:00"}"#,
        )
        .await;

        let update = ProfileUpdate {
            bio: Some("Runner".to_string()),
            ..ProfileUpdate::default()
        };
        let profile = client_for(&base)
            .update_profile(&token(), &update)
            .await
            .unwrap();
        let request = server.await.unwrap();

        assert!(request.starts_with("PUT /api/v1/users/me HTTP/1.1"));
        assert!(request.ends_with(r#"{"bio":"Runner"}"#));
        assert_eq!(profile.bio(), Some("Runner"));
    }

    #[tokio::test]
    async fn test_update_profile_email_conflict_is_invalid_request() {
        let (base, server) =
            serve_once("400 Bad Request", "", r#"{"detail":"Email already registered"}"#).await;

        let update = ProfileUpdate {
            email: Some("taken@example.org".to_string()),
            ..ProfileUpdate::default()
        };
        let err = client_for(&base)
            .update_profile(&token(), &update)
            .await
            .unwrap_err();
        server.await.unwrap();

        assert_eq!(err.to_string(), "invalid request: Email already registered");
    }

    #[tokio::test]
    async fn test_affective_analysis_uses_unversioned_route() {
        let (base, server) = serve_once(
            "200 OK",
            "",
            r#"{"pattern":"Volatile","risk_score":0.42,"emotion_timeline":[{"time":0,"positive":0.3,"negative":0.4}]}"#,
        )
        .await;

        let answers = AffectiveAnswers::from_scores(&[1, 2, 0, 3, 1, 1, 2, 0, 1, 2]).unwrap();
        let result = client_for(&base)
            .analyze_affective(&token(), &answers)
            .await
            .unwrap();
        let request = server.await.unwrap();

        assert!(request.starts_with("POST /api/affective/analyze/questions HTTP/1.1"));
        assert!(request.ends_with(r#"{"answers":[1,2,0,3,1,1,2,0,1,2]}"#));
        assert_eq!(result.pattern, "Volatile");
        assert_eq!(result.risk_percent(), 42);
        assert_eq!(result.emotion_timeline.len(), 1);
    }

    #[tokio::test]
    async fn test_today_check_in_null_is_none() {
        let (base, server) = serve_once("200 OK", "", "null").await;

        let today = client_for(&base).fetch_today_check_in(&token()).await.unwrap();
        server.await.unwrap();

        assert!(today.is_none());
    }

    #[tokio::test]
    async fn test_rate_limit_reads_retry_after() {
        let (base, server) =
            serve_once("429 Too Many Requests", "Retry-After: 12\r\n", "{}").await;

        let err = client_for(&base)
            .send_chat_message(&token(), "hello")
            .await
            .unwrap_err();
        server.await.unwrap();

        assert!(matches!(err, ApiError::RateLimited { retry_after_secs: 12 }));
        assert!(err.is_recoverable());
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let (base, server) = serve_once("200 OK", "", r#"{"score":"high"}"#).await;

        let err = client_for(&base).fetch_risk(&token()).await.unwrap_err();
        server.await.unwrap();

        assert!(matches!(err, ApiError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client_for(&format!("http://{addr}/api"))
            .fetch_dashboard(&token())
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Network { .. }));
    }
}
