//! Minimal client for the Telegram Bot API.
//!
//! Only the handful of methods the bot consumes are covered: `getMe`,
//! long-polled `getUpdates`, and `sendMessage`.

use http_body_util::BodyExt;
use http_body_util::Full;
use hyper::Method;
use hyper::Request;
use hyper::body::Bytes;
use hyper::header;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use yup_oauth2::hyper_rustls::HttpsConnectorBuilder;

/// One element of the `getUpdates` result.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

/// An inbound chat message.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

impl Message {
    /// The command name when the message is a `/command`, without the slash
    /// and without a trailing `@botname` mention.
    pub fn command(&self) -> Option<&str> {
        let rest = self.text.as_deref()?.strip_prefix('/')?;
        let first = rest.split_whitespace().next().unwrap_or("");
        first.split('@').next()
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// The bot's own account, as returned by `getMe`.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
}

/// Errors raised when talking to the Bot API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TelegramError {
    /// The request never produced a well-formed API response.
    Transport(String),
    /// The API answered with `ok: false`.
    Api(String),
}

impl std::fmt::Display for TelegramError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TelegramError::Transport(e) => write!(f, "transport error: {e}"),
            TelegramError::Api(e) => write!(f, "telegram api error: {e}"),
        }
    }
}

impl std::error::Error for TelegramError {}

/// Blocking client over the Telegram Bot API.
pub struct BotClient {
    client: Client<yup_oauth2::hyper_rustls::HttpsConnector<HttpConnector>, Full<Bytes>>,
    rt: tokio::runtime::Runtime,
    base_url: String,
    token: String,
}

impl BotClient {
    /// Create a client against the public Bot API endpoint.
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(token, "https://api.telegram.org/")
    }

    /// Create a client with a custom base URL.
    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        let rt = tokio::runtime::Runtime::new().expect("tokio runtime");
        let https = HttpsConnectorBuilder::new()
            .with_native_roots()
            .expect("native roots")
            .https_or_http()
            .enable_http1()
            .build();
        let client = Client::builder(TokioExecutor::new()).build::<_, Full<Bytes>>(https);
        Self {
            client,
            rt,
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    /// The bot account the token belongs to.
    pub fn get_me(&self) -> Result<User, TelegramError> {
        let result = self.call("getMe", json!({}))?;
        serde_json::from_value(result).map_err(|e| TelegramError::Transport(e.to_string()))
    }

    /// Long-poll for updates past `offset`, waiting up to `timeout` seconds.
    pub fn get_updates(&self, offset: i64, timeout: u64) -> Result<Vec<Update>, TelegramError> {
        let result = self.call(
            "getUpdates",
            json!({ "offset": offset, "timeout": timeout }),
        )?;
        serde_json::from_value(result).map_err(|e| TelegramError::Transport(e.to_string()))
    }

    /// Send `text` to a chat, optionally quoting an earlier message.
    pub fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_to: Option<i64>,
    ) -> Result<(), TelegramError> {
        let mut body = json!({ "chat_id": chat_id, "text": text });
        if let Some(message_id) = reply_to {
            body["reply_to_message_id"] = json!(message_id);
        }
        self.call("sendMessage", body)?;
        Ok(())
    }

    fn call(
        &self,
        method: &str,
        body_json: serde_json::Value,
    ) -> Result<serde_json::Value, TelegramError> {
        self.rt.block_on(async {
            let url = format!("{}bot{}/{}", self.base_url, self.token, method);
            debug!(method, body = %body_json, "Bot API request");
            let req = Request::builder()
                .method(Method::POST)
                .uri(&url)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Full::from(Bytes::from(body_json.to_string())))
                .map_err(|e| TelegramError::Transport(e.to_string()))?;
            let res = self
                .client
                .request(req)
                .await
                .map_err(|e| TelegramError::Transport(e.to_string()))?;
            let bytes = res
                .into_body()
                .collect()
                .await
                .map_err(|e| TelegramError::Transport(e.to_string()))?
                .to_bytes();
            let body: serde_json::Value = serde_json::from_slice(&bytes[..])
                .map_err(|e| TelegramError::Transport(e.to_string()))?;
            if body["ok"].as_bool() != Some(true) {
                let description = body["description"].as_str().unwrap_or("request rejected");
                return Err(TelegramError::Api(description.to_string()));
            }
            Ok(body["result"].clone())
        })
    }
}
