use super::cell::CellValue;
use crate::errors::ServiceError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{instrument, warn};

/// Wire shape shared by reads and writes of the values API.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ValueRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(default)]
    pub values: Vec<Vec<CellValue>>,
}

/// Transport to the spreadsheet holding entity data. The live implementation
/// talks to a Sheets-style values API; the seed implementation serves fixed
/// rows with identical range semantics.
#[async_trait]
pub trait SheetsBackend: Send + Sync {
    async fn get_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        token: &str,
    ) -> Result<Vec<Vec<CellValue>>, ServiceError>;

    /// Replaces exactly the addressed row(s).
    async fn update_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        token: &str,
        values: Vec<Vec<CellValue>>,
    ) -> Result<(), ServiceError>;

    /// Appends after the last data row; the backend assigns the position.
    async fn append_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        token: &str,
        values: Vec<Vec<CellValue>>,
    ) -> Result<(), ServiceError>;
}

/// Live backend over HTTP with bearer-token auth.
#[derive(Clone)]
pub struct HttpSheetsBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSheetsBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::InternalError(format!("http client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn values_url(&self, spreadsheet_id: &str, range: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}",
            self.base_url, spreadsheet_id, range
        )
    }
}

#[async_trait]
impl SheetsBackend for HttpSheetsBackend {
    #[instrument(skip(self, token), fields(range = %range))]
    async fn get_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        token: &str,
    ) -> Result<Vec<Vec<CellValue>>, ServiceError> {
        let response = self
            .client
            .get(self.values_url(spreadsheet_id, range))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ServiceError::RangeRead(format!("{}: {}", range, e)))?;

        if !response.status().is_success() {
            return Err(ServiceError::RangeRead(format!(
                "{}: status {}",
                range,
                response.status()
            )));
        }

        let body: ValueRange = response
            .json()
            .await
            .map_err(|e| ServiceError::RangeRead(format!("{}: {}", range, e)))?;

        // An empty read is a valid result: the API omits `values` entirely
        // when the range holds no data.
        Ok(body.values)
    }

    #[instrument(skip(self, token, values), fields(range = %range))]
    async fn update_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        token: &str,
        values: Vec<Vec<CellValue>>,
    ) -> Result<(), ServiceError> {
        let response = self
            .client
            .put(self.values_url(spreadsheet_id, range))
            .query(&[("valueInputOption", "USER_ENTERED")])
            .bearer_auth(token)
            .json(&ValueRange {
                range: None,
                values,
            })
            .send()
            .await
            .map_err(|e| ServiceError::WriteFailed(format!("{}: {}", range, e)))?;

        if !response.status().is_success() {
            warn!(status = %response.status(), range, "row update rejected");
            return Err(ServiceError::WriteFailed(format!(
                "{}: status {}",
                range,
                response.status()
            )));
        }
        Ok(())
    }

    #[instrument(skip(self, token, values), fields(range = %range))]
    async fn append_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        token: &str,
        values: Vec<Vec<CellValue>>,
    ) -> Result<(), ServiceError> {
        let response = self
            .client
            .post(format!(
                "{}:append",
                self.values_url(spreadsheet_id, range)
            ))
            .query(&[("valueInputOption", "USER_ENTERED")])
            .bearer_auth(token)
            .json(&ValueRange {
                range: None,
                values,
            })
            .send()
            .await
            .map_err(|e| ServiceError::WriteFailed(format!("{}: {}", range, e)))?;

        if !response.status().is_success() {
            return Err(ServiceError::WriteFailed(format!(
                "{}: status {}",
                range,
                response.status()
            )));
        }
        Ok(())
    }
}
