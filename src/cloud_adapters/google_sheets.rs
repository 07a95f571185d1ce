use crate::cloud_adapters::{Cell, SheetsService, SpreadsheetError};
use http_body_util::BodyExt;
use http_body_util::Full;
use hyper::Method;
use hyper::Request;
use hyper::body::Bytes;
use hyper::header;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::json;
use std::future::Future;
use std::pin::Pin;
use tracing::debug;
use yup_oauth2::hyper_rustls::HttpsConnectorBuilder;

const SPREADSHEET_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

/// Asynchronous token retrieval interface used by the adapter.
pub trait TokenProvider: Send + Sync + 'static {
    fn token<'a>(
        &'a self,
        scopes: &'a [&str],
    ) -> Pin<Box<dyn Future<Output = Result<String, SpreadsheetError>> + Send + 'a>>;
}

impl TokenProvider for yup_oauth2::authenticator::DefaultAuthenticator {
    fn token<'a>(
        &'a self,
        scopes: &'a [&str],
    ) -> Pin<Box<dyn Future<Output = Result<String, SpreadsheetError>> + Send + 'a>> {
        Box::pin(async move {
            self.token(scopes)
                .await
                .map_err(|e| SpreadsheetError::ReadFailed(e.to_string()))?
                .token()
                .map(|t| t.to_string())
                .ok_or_else(|| SpreadsheetError::ReadFailed("missing token".into()))
        })
    }
}

/// Token provider backed by a fixed access token, e.g. one supplied through
/// configuration instead of an OAuth flow.
pub struct StaticToken(pub String);

impl TokenProvider for StaticToken {
    fn token<'a>(
        &'a self,
        _scopes: &'a [&str],
    ) -> Pin<Box<dyn Future<Output = Result<String, SpreadsheetError>> + Send + 'a>> {
        Box::pin(async move { Ok(self.0.clone()) })
    }
}

/// Adapter backed by the Google Sheets REST API.
pub struct GoogleSheetsAdapter {
    client: Client<yup_oauth2::hyper_rustls::HttpsConnector<HttpConnector>, Full<Bytes>>,
    auth: Box<dyn TokenProvider>,
    rt: tokio::runtime::Runtime,
    base_url: String,
    spreadsheet_id: String,
}

impl GoogleSheetsAdapter {
    /// Create a new adapter using the default API endpoint.
    pub fn new<A: TokenProvider>(auth: A, spreadsheet_id: impl Into<String>) -> Self {
        Self::with_base_url(auth, spreadsheet_id, "https://sheets.googleapis.com/v4/")
    }

    /// Create an adapter with a custom base URL.
    pub fn with_base_url<A: TokenProvider>(
        auth: A,
        spreadsheet_id: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
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
            auth: Box::new(auth),
            rt,
            base_url: base_url.into(),
            spreadsheet_id: spreadsheet_id.into(),
        }
    }

    async fn get_token(&self) -> Result<String, SpreadsheetError> {
        self.auth.token(&[SPREADSHEET_SCOPE]).await
    }

    fn values_url(&self, range: &str) -> String {
        // Month tab names are non-ASCII, so the range must be encoded into
        // the path.
        let range = utf8_percent_encode(range, NON_ALPHANUMERIC);
        format!(
            "{}spreadsheets/{}/values/{}",
            self.base_url, self.spreadsheet_id, range
        )
    }
}

fn cell_from_json(value: &serde_json::Value) -> Cell {
    match value {
        serde_json::Value::String(s) => Cell::Text(s.clone()),
        serde_json::Value::Number(n) => match n.as_f64() {
            Some(f) => Cell::Number(f),
            None => Cell::Empty,
        },
        serde_json::Value::Bool(b) => Cell::Text(b.to_string()),
        _ => Cell::Empty,
    }
}

fn cell_to_json(cell: Cell) -> serde_json::Value {
    match cell {
        Cell::Text(s) => serde_json::Value::String(s),
        Cell::Number(n) => serde_json::Number::from_f64(n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Cell::Empty => serde_json::Value::Null,
    }
}

impl SheetsService for GoogleSheetsAdapter {
    fn read_range(&self, range: &str) -> Result<Vec<Vec<Cell>>, SpreadsheetError> {
        self.rt.block_on(async {
            let token = self.get_token().await?;
            let url = self.values_url(range);
            debug!(range, "Reading range");
            let req = Request::builder()
                .method(Method::GET)
                .uri(&url)
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Full::new(Bytes::new()))
                .map_err(|e| SpreadsheetError::ReadFailed(e.to_string()))?;
            let res = self
                .client
                .request(req)
                .await
                .map_err(|e| SpreadsheetError::ReadFailed(e.to_string()))?;
            if !res.status().is_success() {
                return Err(SpreadsheetError::ReadFailed(format!(
                    "service returned {}",
                    res.status()
                )));
            }
            let bytes = res
                .into_body()
                .collect()
                .await
                .map_err(|e| SpreadsheetError::ReadFailed(e.to_string()))?
                .to_bytes();
            let body: serde_json::Value = serde_json::from_slice(&bytes[..])
                .map_err(|e| SpreadsheetError::ReadFailed(e.to_string()))?;
            let rows = body["values"].as_array().cloned().unwrap_or_default();
            Ok(rows
                .into_iter()
                .map(|row| {
                    row.as_array()
                        .map(|cells| cells.iter().map(cell_from_json).collect())
                        .unwrap_or_default()
                })
                .collect())
        })
    }

    fn write_range(
        &mut self,
        range: &str,
        rows: Vec<Vec<Cell>>,
    ) -> Result<u32, SpreadsheetError> {
        self.rt.block_on(async {
            let token = self.get_token().await?;
            let url = format!("{}?valueInputOption=RAW", self.values_url(range));
            let rows_json: Vec<Vec<serde_json::Value>> = rows
                .into_iter()
                .map(|row| row.into_iter().map(cell_to_json).collect())
                .collect();
            let body_json = json!({
                "majorDimension": "ROWS",
                "values": rows_json,
            });
            debug!(range, body = %body_json, "Writing range");
            let req = Request::builder()
                .method(Method::PUT)
                .uri(&url)
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Full::from(Bytes::from(body_json.to_string())))
                .map_err(|e| SpreadsheetError::WriteFailed(e.to_string()))?;
            let res = self
                .client
                .request(req)
                .await
                .map_err(|e| SpreadsheetError::WriteFailed(e.to_string()))?;
            if !res.status().is_success() {
                return Err(SpreadsheetError::WriteFailed(format!(
                    "service returned {}",
                    res.status()
                )));
            }
            let bytes = res
                .into_body()
                .collect()
                .await
                .map_err(|e| SpreadsheetError::WriteFailed(e.to_string()))?
                .to_bytes();
            let body: serde_json::Value = serde_json::from_slice(&bytes[..])
                .map_err(|e| SpreadsheetError::WriteFailed(e.to_string()))?;
            Ok(body["updatedCells"].as_u64().unwrap_or(0) as u32)
        })
    }
}
