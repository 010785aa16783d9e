//! Google Sheets backend.
//!
//! Each table is one sheet (tab) of a single spreadsheet, addressed through
//! the Sheets v4 values API. Row positions map directly onto sheet rows, so
//! the header is sheet row 1.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, StoreError};
use crate::row::Row;
use crate::schema::Table;
use crate::TableBackend;

/// Default Sheets v4 endpoint.
pub const DEFAULT_API_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Connection settings for [`SheetsBackend`].
#[derive(Clone)]
pub struct SheetsConfig {
    /// Base URL of the spreadsheets collection.
    pub api_url: String,
    /// Spreadsheet holding the tables.
    pub spreadsheet_id: String,
    /// OAuth access token, sent as a bearer token.
    pub access_token: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl SheetsConfig {
    /// Settings for the public Sheets endpoint.
    pub fn new(spreadsheet_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            spreadsheet_id: spreadsheet_id.into(),
            access_token: access_token.into(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Point the backend at another endpoint.
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }
}

impl std::fmt::Debug for SheetsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetsConfig")
            .field("api_url", &self.api_url)
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("access_token", &"[redacted]")
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetMeta>,
}

#[derive(Debug, Deserialize)]
struct SheetMeta {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Serialize)]
struct ValuesBody<'a> {
    values: Vec<&'a [String]>,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorResponse {
    error: GoogleError,
}

#[derive(Debug, Deserialize)]
struct GoogleError {
    message: String,
}

/// Tables stored as sheets of one Google spreadsheet.
#[derive(Debug, Clone)]
pub struct SheetsBackend {
    client: Client,
    base_url: String,
    access_token: String,
}

impl SheetsBackend {
    /// Create a backend from its settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: SheetsConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url: format!(
                "{}/{}",
                config.api_url.trim_end_matches('/'),
                config.spreadsheet_id
            ),
            access_token: config.access_token,
        })
    }

    fn values_url(&self, range: &str) -> String {
        format!("{}/values/{}", self.base_url, range)
    }

    async fn sheet_titles(&self) -> Result<Vec<String>> {
        let response = self
            .client
            .get(&self.base_url)
            .bearer_auth(&self.access_token)
            .query(&[("fields", "sheets.properties.title")])
            .send()
            .await?;

        let meta: SpreadsheetMeta = Self::handle_response(response).await?;
        Ok(meta
            .sheets
            .into_iter()
            .map(|sheet| sheet.properties.title)
            .collect())
    }

    async fn add_sheet(&self, title: &str) -> Result<()> {
        let body = serde_json::json!({
            "requests": [{ "addSheet": { "properties": { "title": title } } }]
        });

        let response = self
            .client
            .post(format!("{}:batchUpdate", self.base_url))
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;

        Self::handle_response::<Value>(response).await.map(|_| ())
    }

    async fn get_values(&self, range: &str) -> Result<Vec<Row>> {
        let response = self
            .client
            .get(self.values_url(range))
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        let range: ValueRange = Self::handle_response(response).await?;
        Ok(range
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect())
    }

    async fn put_values(&self, range: &str, row: &[String]) -> Result<()> {
        let response = self
            .client
            .put(self.values_url(range))
            .bearer_auth(&self.access_token)
            .query(&[("valueInputOption", "RAW")])
            .json(&ValuesBody { values: vec![row] })
            .send()
            .await?;

        Self::handle_response::<Value>(response).await.map(|_| ())
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        let message = match response.json::<GoogleErrorResponse>().await {
            Ok(body) => body.error.message,
            Err(_) => format!("HTTP {status}"),
        };
        Err(StoreError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

/// Sheets reports cells as strings, but numbers and booleans can appear
/// when another client wrote the sheet.
fn cell_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

const ALPHABET: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// A1 column letters for a 0-based column index: 0 is `A`, 26 is `AA`.
#[must_use]
pub fn column_letter(column: usize) -> String {
    let mut letters = Vec::new();
    let mut n = column + 1;
    while n > 0 {
        letters.push(char::from(ALPHABET[(n - 1) % 26]));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

#[async_trait]
impl TableBackend for SheetsBackend {
    fn name(&self) -> &'static str {
        "sheets"
    }

    async fn ensure_table(&self, table: &Table) -> Result<()> {
        let titles = self.sheet_titles().await?;

        if !titles.iter().any(|title| title == table.name) {
            tracing::debug!(table = table.name, "Creating sheet");
            self.add_sheet(table.name).await?;
        } else {
            let first = self.get_values(&format!("{}!1:1", table.name)).await?;
            let has_header = first
                .first()
                .is_some_and(|row| row.iter().any(|c| !c.trim().is_empty()));
            if has_header {
                return Ok(());
            }
        }

        tracing::debug!(table = table.name, "Writing header row");
        self.put_values(&format!("{}!A1", table.name), &table.header_row())
            .await
    }

    async fn read_all(&self, table: &Table) -> Result<Vec<Row>> {
        self.get_values(table.name).await
    }

    async fn append(&self, table: &Table, row: Row) -> Result<()> {
        let response = self
            .client
            .post(format!("{}:append", self.values_url(table.name)))
            .bearer_auth(&self.access_token)
            .query(&[
                ("valueInputOption", "RAW"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&ValuesBody {
                values: vec![row.as_slice()],
            })
            .send()
            .await?;

        Self::handle_response::<Value>(response).await.map(|_| ())
    }

    async fn update_cell(
        &self,
        table: &Table,
        row_position: usize,
        column_position: usize,
        value: &str,
    ) -> Result<()> {
        if row_position < 2 {
            return Err(StoreError::RowOutOfRange {
                table: table.name.to_string(),
                row_position,
            });
        }

        let range = format!(
            "{}!{}{}",
            table.name,
            column_letter(column_position),
            row_position
        );
        self.put_values(&range, &[value.to_string()]).await
    }
}
