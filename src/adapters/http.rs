use crate::adapters::workbook::{decode_csv, decode_xlsx};
use crate::config::{SourceFormat, SourceSettings};
use crate::core::{Row, SheetSource};
use crate::utils::error::{EtlError, Result};
use reqwest::Client;
use url::Url;

/// Downloads the published export of a spreadsheet and decodes it.
pub struct GoogleSheetSource {
    settings: SourceSettings,
    client: Client,
}

impl GoogleSheetSource {
    pub fn new(settings: SourceSettings) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            settings,
            client: builder.build()?,
        })
    }

    /// `<base_url>?key=<sheet>&output=<format>`
    pub fn export_url(&self) -> Result<Url> {
        Url::parse_with_params(
            &self.settings.base_url,
            &[
                ("key", self.settings.sheet.as_str()),
                ("output", self.settings.format.as_str()),
            ],
        )
        .map_err(|e| EtlError::InvalidConfigValueError {
            field: "source.base_url".to_string(),
            value: self.settings.base_url.clone(),
            reason: e.to_string(),
        })
    }

    async fn download(&self, url: &Url) -> Result<Vec<u8>> {
        let unavailable = |reason: String| EtlError::SourceUnavailableError {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        let status = response.status();
        tracing::debug!("Export response status: {}", status);
        if !status.is_success() {
            return Err(unavailable(format!("HTTP {}", status)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| unavailable(e.to_string()))?;
        Ok(body.to_vec())
    }
}

impl SheetSource for GoogleSheetSource {
    async fn fetch(&self) -> Result<Vec<Row>> {
        let url = self.export_url()?;
        tracing::info!("🌐 Downloading {} export from {}", self.settings.format.as_str(), url);

        let body = self.download(&url).await?;
        tracing::debug!("Downloaded {} bytes", body.len());

        let rows = match self.settings.format {
            SourceFormat::Xlsx => decode_xlsx(&body, &self.settings.worksheet)?,
            SourceFormat::Csv => decode_csv(&body)?,
        };
        Ok(rows)
    }
}
