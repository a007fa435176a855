use super::auth::ServiceAccount;
use super::{RangeId, RecordStore, SheetInfo, StoreError};
use crate::config::SheetsSettings;
use crate::highlight::{HighlightError, RowColor, RowHighlighter};
use crate::layout::{FASTING_COLUMNS, FIRST_DATA_ROW};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info};

const API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets/";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

#[derive(Deserialize)]
struct Spreadsheet {
    #[serde(default)]
    sheets: Vec<Sheet>,
}

#[derive(Deserialize)]
struct Sheet {
    properties: SheetProperties,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    sheet_id: i64,
    title: String,
}

fn last_column(range: RangeId) -> char {
    match range {
        RangeId::Fasting => 'J',
        RangeId::Meals => 'I',
    }
}

/// A1 notation of the whole data range, e.g. `Fasting_Plan!A2:J`.
fn data_range(sheet: &str, range: RangeId) -> String {
    format!("{sheet}!A{FIRST_DATA_ROW}:{}", last_column(range))
}

/// A1 notation of a single data row.
fn row_range(sheet: &str, range: RangeId, row_index: usize) -> String {
    let row = row_index + FIRST_DATA_ROW;
    let last = last_column(range);
    format!("{sheet}!A{row}:{last}{row}")
}

/// Google Sheets v4 backed store. One instance is created at startup and
/// shared by every request.
pub struct SheetsStore {
    http: Client,
    account: ServiceAccount,
    spreadsheet_id: String,
    fasting_sheet: String,
    meal_sheet: String,
}

impl SheetsStore {
    pub fn new(settings: &SheetsSettings) -> Result<Self, StoreError> {
        let account = ServiceAccount::from_base64(&settings.credentials)?;
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        info!(
            spreadsheet = %settings.spreadsheet_id,
            account = account.client_email(),
            fasting_sheet = %settings.fasting_sheet,
            meal_sheet = %settings.meal_sheet,
            "sheets store initialized"
        );
        Ok(Self {
            http,
            account,
            spreadsheet_id: settings.spreadsheet_id.clone(),
            fasting_sheet: settings.fasting_sheet.clone(),
            meal_sheet: settings.meal_sheet.clone(),
        })
    }

    fn sheet_name(&self, range: RangeId) -> &str {
        match range {
            RangeId::Fasting => &self.fasting_sheet,
            RangeId::Meals => &self.meal_sheet,
        }
    }

    fn data_range(&self, range: RangeId) -> String {
        data_range(self.sheet_name(range), range)
    }

    fn row_range(&self, range: RangeId, row_index: usize) -> String {
        row_range(self.sheet_name(range), range, row_index)
    }

    /// Builds `.../spreadsheets/{id}/values/{a1}{suffix}` with the A1 range
    /// percent-encoded as a single path segment.
    fn values_url(&self, a1: &str, suffix: &str) -> Result<Url, StoreError> {
        let mut url = self.spreadsheet_url("")?;
        url.path_segments_mut()
            .map_err(|()| StoreError::Url(API_BASE.to_string()))?
            .push("values")
            .push(&format!("{a1}{suffix}"));
        Ok(url)
    }

    fn spreadsheet_url(&self, suffix: &str) -> Result<Url, StoreError> {
        let mut url = Url::parse(API_BASE)
            .map_err(|err| StoreError::Url(format!("{API_BASE}: {err}")))?;
        url.path_segments_mut()
            .map_err(|()| StoreError::Url(API_BASE.to_string()))?
            .pop_if_empty()
            .push(&format!("{}{suffix}", self.spreadsheet_id));
        Ok(url)
    }

    async fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder, StoreError> {
        let token = self.account.access_token(&self.http).await?;
        Ok(request.bearer_auth(token.expose_secret()))
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, StoreError> {
        let response = self.authorized(request).await?.send().await?;
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Status { status, body })
    }

    async fn repeat_background(
        &self,
        sheet_id: i64,
        row_index: usize,
        color: RowColor,
    ) -> Result<(), StoreError> {
        let start = row_index + FIRST_DATA_ROW - 1;
        let body = json!({
            "requests": [{
                "repeatCell": {
                    "range": {
                        "sheetId": sheet_id,
                        "startRowIndex": start,
                        "endRowIndex": start + 1,
                        "startColumnIndex": 0,
                        "endColumnIndex": FASTING_COLUMNS,
                    },
                    "cell": { "userEnteredFormat": { "backgroundColor": color } },
                    "fields": "userEnteredFormat.backgroundColor",
                }
            }]
        });
        let url = self.spreadsheet_url(":batchUpdate")?;
        self.send(self.http.post(url).json(&body)).await?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for SheetsStore {
    async fn read_range(&self, range: RangeId) -> Result<Vec<Vec<String>>, StoreError> {
        let url = self.values_url(&self.data_range(range), "")?;
        let response = self.send(self.http.get(url)).await?;
        let values: ValueRange = response.json().await?;
        debug!(?range, rows = values.values.len(), "read range");
        Ok(values.values)
    }

    async fn write_row(
        &self,
        range: RangeId,
        row_index: usize,
        row: Vec<String>,
    ) -> Result<(), StoreError> {
        let url = self.values_url(&self.row_range(range, row_index), "")?;
        let request = self
            .http
            .put(url)
            .query(&[("valueInputOption", "USER_ENTERED")])
            .json(&json!({ "values": [row] }));
        self.send(request).await?;
        Ok(())
    }

    async fn append_row(&self, range: RangeId, row: Vec<String>) -> Result<(), StoreError> {
        let url = self.values_url(&self.data_range(range), ":append")?;
        let request = self
            .http
            .post(url)
            .query(&[("valueInputOption", "USER_ENTERED")])
            .json(&json!({ "values": [row] }));
        self.send(request).await?;
        Ok(())
    }

    async fn sheet_metadata(&self) -> Result<Vec<SheetInfo>, StoreError> {
        let url = self.spreadsheet_url("")?;
        let request = self
            .http
            .get(url)
            .query(&[("fields", "sheets.properties(sheetId,title)")]);
        let spreadsheet: Spreadsheet = self.send(request).await?.json().await?;
        Ok(spreadsheet
            .sheets
            .into_iter()
            .map(|sheet| SheetInfo {
                id: sheet.properties.sheet_id,
                title: sheet.properties.title,
            })
            .collect())
    }
}

#[async_trait]
impl RowHighlighter for SheetsStore {
    async fn set_row_color(
        &self,
        range: RangeId,
        row_index: usize,
        status: &str,
    ) -> Result<RowColor, HighlightError> {
        let title = self.sheet_name(range);
        let sheet = self
            .sheet_metadata()
            .await?
            .into_iter()
            .find(|sheet| sheet.title == title)
            .ok_or_else(|| HighlightError::SheetMissing(title.to_string()))?;

        let color = RowColor::for_status(status);
        self.repeat_background(sheet.id, row_index, color).await?;
        info!(row = row_index + FIRST_DATA_ROW, color = color.name(), "row recolored");
        Ok(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_ranges_skip_the_header_row() {
        assert_eq!(data_range("Fasting_Plan", RangeId::Fasting), "Fasting_Plan!A2:J");
        assert_eq!(data_range("Planovane_Jedlo", RangeId::Meals), "Planovane_Jedlo!A2:I");
    }

    #[test]
    fn row_offsets_map_to_sheet_rows() {
        assert_eq!(row_range("Fasting_Plan", RangeId::Fasting, 0), "Fasting_Plan!A2:J2");
        assert_eq!(row_range("Fasting_Plan", RangeId::Fasting, 41), "Fasting_Plan!A43:J43");
    }
}
