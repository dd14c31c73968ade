use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use super::SheetService;
use crate::errors::HerringError;

const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveFile {
    id: String,
    web_view_link: Option<String>,
}

/// Creates puzzle sheets by copying a template spreadsheet in Google Drive.
pub struct DriveSheetService {
    http: Client,
    access_token: String,
    template_id: String,
    folder_id: Option<String>,
}

impl DriveSheetService {
    #[must_use]
    pub fn new(
        http: Client,
        access_token: String,
        template_id: String,
        folder_id: Option<String>,
    ) -> Self {
        Self {
            http,
            access_token,
            template_id,
            folder_id,
        }
    }

    fn copy_payload(&self, title: &str) -> Value {
        let mut payload = json!({ "name": title });
        if let Some(folder) = &self.folder_id {
            payload["parents"] = json!([folder]);
        }
        payload
    }
}

/// Link to a Drive file, preferring the one Drive reports.
fn sheet_link(file: DriveFile) -> String {
    file.web_view_link.unwrap_or_else(|| {
        format!("https://docs.google.com/spreadsheets/d/{}/edit", file.id)
    })
}

#[async_trait]
impl SheetService for DriveSheetService {
    async fn create_spreadsheet(&self, title: &str) -> Result<String, HerringError> {
        let resp = self
            .http
            .post(format!("{DRIVE_API_BASE}/files/{}/copy", self.template_id))
            .bearer_auth(&self.access_token)
            .query(&[("fields", "id,webViewLink"), ("supportsAllDrives", "true")])
            .json(&self.copy_payload(title))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body_text = resp
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read body>".to_string());
            return Err(HerringError::SheetError(format!(
                "files.copy HTTP {status}: {body_text}"
            )));
        }

        let file: DriveFile = resp
            .json()
            .await
            .map_err(|e| HerringError::SheetError(format!("files.copy parse error: {e}")))?;
        info!(file_id = %file.id, title, "Created spreadsheet");
        Ok(sheet_link(file))
    }
}
