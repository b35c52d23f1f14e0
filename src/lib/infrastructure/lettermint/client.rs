//! Lettermint HTTP API client

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{header::ACCEPT, Client};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::domain::mail::{ApiToken, EmailProvider, OutboundEmail, ProviderError, SendResponse};

use super::LettermintSettings;

const TOKEN_HEADER: &str = "x-lettermint-token";

/// JSON body of `POST /send`
#[derive(Debug, Serialize)]
struct SendEmailPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    from: Option<&'a str>,

    #[serde(skip_serializing_if = "is_empty")]
    to: &'a [String],

    #[serde(skip_serializing_if = "is_empty")]
    cc: &'a [String],

    #[serde(skip_serializing_if = "is_empty")]
    bcc: &'a [String],

    #[serde(skip_serializing_if = "Vec::is_empty")]
    reply_to: Vec<&'a str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    subject: Option<&'a str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    html: Option<&'a str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    route: Option<&'a str>,
}

/// An accepted request answers with something other than an empty value
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn is_empty(values: &&[String]) -> bool {
    values.is_empty()
}

impl<'a> From<&'a OutboundEmail> for SendEmailPayload<'a> {
    fn from(email: &'a OutboundEmail) -> Self {
        Self {
            from: email.sender(),
            to: email.recipients(),
            cc: email.cc_recipients(),
            bcc: email.bcc_recipients(),
            reply_to: email.reply_to_address().into_iter().collect(),
            subject: email.subject_line(),
            html: email.html_body(),
            text: email.text_body(),
            route: email.selected_route(),
        }
    }
}

/// Lettermint API client
#[derive(Debug, Clone)]
pub struct LettermintClient {
    http: Client,
    base_url: String,
}

impl LettermintClient {
    /// Creates a client for the API at `base_url`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build the Lettermint HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Creates a client from the environment settings
    pub fn from_settings(settings: &LettermintSettings) -> Result<Self> {
        Self::new(
            &settings.base_url,
            Duration::from_secs(settings.timeout_secs),
        )
    }

    fn endpoint(&self) -> String {
        format!("{}/send", self.base_url)
    }
}

#[async_trait]
impl EmailProvider for LettermintClient {
    async fn send(
        &self,
        token: &ApiToken,
        email: &OutboundEmail,
    ) -> Result<Option<SendResponse>, ProviderError> {
        debug!(
            to = ?email.recipients(),
            route = ?email.selected_route(),
            "sending email via Lettermint"
        );

        let response = self
            .http
            .post(self.endpoint())
            .header(TOKEN_HEADER, token.expose())
            .header(ACCEPT, "application/json")
            .json(&SendEmailPayload::from(email))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ProviderError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        if body.trim().is_empty() {
            return Ok(None);
        }

        let value: Value = serde_json::from_str(&body)
            .with_context(|| format!("unexpected Lettermint response: {body}"))?;

        if is_falsy(&value) {
            return Ok(None);
        }

        let response = match value {
            Value::Object(_) => serde_json::from_value::<SendResponse>(value)
                .with_context(|| format!("unexpected Lettermint response: {body}"))?,
            _ => SendResponse::default(),
        };

        debug!(message_id = ?response.message_id, "email accepted by Lettermint");

        Ok(Some(response))
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        debug!("reqwest::Error: {:?}", err);

        ProviderError::UnknownError(err.into())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::State,
        http::{HeaderMap, StatusCode},
        routing::post,
        Json, Router,
    };
    use serde_json::{json, Value};
    use testresult::TestResult;
    use tokio::net::TcpListener;

    use super::*;

    type Captured = Arc<Mutex<Option<(String, Value)>>>;

    async fn serve(router: Router) -> TestResult<String> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let address = listener.local_addr()?;

        tokio::spawn(async move { axum::serve(listener, router).await });

        Ok(format!("http://{address}/v1"))
    }

    async fn accept(
        State(captured): State<Captured>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> Json<Value> {
        let token = headers
            .get(TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        *captured.lock().unwrap() = Some((token, body));

        Json(json!({ "message_id": "msg_123", "status": "pending" }))
    }

    fn client(base_url: &str) -> TestResult<LettermintClient> {
        Ok(LettermintClient::new(base_url, Duration::from_secs(5))?)
    }

    #[tokio::test]
    async fn test_send_posts_payload_with_token() -> TestResult {
        let captured = Captured::default();
        let router = Router::new()
            .route("/v1/send", post(accept))
            .with_state(captured.clone());
        let base_url = serve(router).await?;

        let email = OutboundEmail::new()
            .from("Shop <shop@example.com>")
            .to(vec!["a@example.com".to_string(), "b@example.com".to_string()])
            .reply_to("help@example.com")
            .subject("Your order")
            .html("<p>Thanks</p>")
            .route("outgoing");

        let response = client(&base_url)?
            .send(&ApiToken::new("lm_token"), &email)
            .await?;

        assert_eq!(
            response,
            Some(SendResponse {
                message_id: Some("msg_123".to_string()),
                status: Some("pending".to_string()),
            })
        );

        let (token, body) = captured
            .lock()
            .unwrap()
            .take()
            .expect("request was captured");

        assert_eq!(token, "lm_token");
        assert_eq!(
            body,
            json!({
                "from": "Shop <shop@example.com>",
                "to": ["a@example.com", "b@example.com"],
                "reply_to": ["help@example.com"],
                "subject": "Your order",
                "html": "<p>Thanks</p>",
                "route": "outgoing",
            })
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_send_rejected_request() -> TestResult {
        let router = Router::new().route(
            "/v1/send",
            post(|| async { (StatusCode::UNPROCESSABLE_ENTITY, r#"{"message":"invalid from"}"#) }),
        );
        let base_url = serve(router).await?;

        let result = client(&base_url)?
            .send(&ApiToken::new("lm_token"), &OutboundEmail::new().text("hi"))
            .await;

        assert!(matches!(
            result,
            Err(ProviderError::Rejected { status: 422, ref body }) if body.contains("invalid from")
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_send_empty_response_body() -> TestResult {
        let router = Router::new().route("/v1/send", post(|| async { StatusCode::OK }));
        let base_url = serve(router).await?;

        let response = client(&base_url)?
            .send(&ApiToken::new("lm_token"), &OutboundEmail::new().text("hi"))
            .await?;

        assert_eq!(response, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_send_null_response_body() -> TestResult {
        let router = Router::new().route("/v1/send", post(|| async { Json(Value::Null) }));
        let base_url = serve(router).await?;

        let response = client(&base_url)?
            .send(&ApiToken::new("lm_token"), &OutboundEmail::new().text("hi"))
            .await?;

        assert_eq!(response, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_send_empty_object_response_body() -> TestResult {
        let router = Router::new().route("/v1/send", post(|| async { Json(json!({})) }));
        let base_url = serve(router).await?;

        let response = client(&base_url)?
            .send(&ApiToken::new("lm_token"), &OutboundEmail::new().text("hi"))
            .await?;

        assert_eq!(response, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_send_response_without_message_id_is_accepted() -> TestResult {
        let router = Router::new().route(
            "/v1/send",
            post(|| async { Json(json!({ "status": "queued" })) }),
        );
        let base_url = serve(router).await?;

        let response = client(&base_url)?
            .send(&ApiToken::new("lm_token"), &OutboundEmail::new().text("hi"))
            .await?;

        assert_eq!(
            response,
            Some(SendResponse {
                message_id: None,
                status: Some("queued".to_string()),
            })
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_send_unreachable_provider() -> TestResult {
        let result = client("http://127.0.0.1:9")?
            .send(&ApiToken::new("lm_token"), &OutboundEmail::new().text("hi"))
            .await;

        assert!(matches!(result, Err(ProviderError::UnknownError(_))));

        Ok(())
    }

    #[test]
    fn test_endpoint_ignores_trailing_slash() -> TestResult {
        let client = client("https://api.lettermint.co/v1/")?;

        assert_eq!(client.endpoint(), "https://api.lettermint.co/v1/send");

        Ok(())
    }
}
