#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::extractor::ExtractorConfig;
use crate::core::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_range, validate_rename_targets,
    validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use toml_config::TomlConfig;

pub const DEFAULT_SHEET_KEY: &str = "1GrxYfy7o9omllbPBwJVsCvUxHIRMJQymIacTE2mFLqc";
pub const DEFAULT_WORKSHEET: &str = "Cable Layout";
pub const DEFAULT_BASE_URL: &str = "https://docs.google.com/spreadsheet/ccc";
pub const DEFAULT_OUTFILE: &str = "test.json";
pub const DEFAULT_INDENT: usize = 1;
pub const MAX_INDENT: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    #[default]
    Xlsx,
    Csv,
}

impl SourceFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceFormat::Xlsx => "xlsx",
            SourceFormat::Csv => "csv",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceSettings {
    pub sheet: String,
    pub worksheet: String,
    pub base_url: String,
    pub format: SourceFormat,
    pub timeout: Option<Duration>,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            sheet: DEFAULT_SHEET_KEY.to_string(),
            worksheet: DEFAULT_WORKSHEET.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            format: SourceFormat::default(),
            timeout: None,
        }
    }
}

/// 合併預設值、TOML 檔與命令列之後的最終設定
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub source: SourceSettings,
    pub extractor: ExtractorConfig,
    pub outfile: String,
    pub indent: usize,
    pub verify: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source: SourceSettings::default(),
            extractor: ExtractorConfig::default(),
            outfile: DEFAULT_OUTFILE.to_string(),
            indent: DEFAULT_INDENT,
            verify: false,
        }
    }
}

impl AppConfig {
    /// Defaults with every value present in `file` applied on top.
    pub fn from_toml(file: &TomlConfig) -> Self {
        let mut config = Self::default();

        let source = &file.source;
        if let Some(sheet) = &source.sheet {
            config.source.sheet = sheet.clone();
        }
        if let Some(worksheet) = &source.worksheet {
            config.source.worksheet = worksheet.clone();
        }
        if let Some(base_url) = &source.base_url {
            config.source.base_url = base_url.clone();
        }
        if let Some(format) = source.format {
            config.source.format = format;
        }
        config.source.timeout = source.timeout_seconds.map(Duration::from_secs);

        if let Some(classification) = &file.columns.classification {
            config.extractor.classification_column = classification.clone();
        }
        if let Some(enabled) = &file.columns.enabled {
            config.extractor.enabled_column = enabled.clone();
        }
        // [rename] 與預設改名表合併，同名來源欄位以檔案為準
        for (from, to) in &file.rename {
            config.extractor.rename.insert(from.clone(), to.clone());
        }

        let output = &file.output;
        if let Some(outfile) = &output.outfile {
            config.outfile = outfile.clone();
        }
        if let Some(sentinel) = &output.nan_json_value {
            config.extractor.null_sentinel = sentinel.clone();
        }
        if let Some(indent) = output.indent {
            config.indent = indent;
        }
        config.verify = output.validate.unwrap_or(false);

        config
    }
}

impl ConfigProvider for AppConfig {
    fn outfile(&self) -> &str {
        &self.outfile
    }

    fn indent(&self) -> usize {
        self.indent
    }

    fn verify_consumable(&self) -> bool {
        self.verify
    }

    fn extractor_config(&self) -> &ExtractorConfig {
        &self.extractor
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        if self.source.sheet.trim().is_empty() {
            return Err(EtlError::MissingConfigError {
                field: "source.sheet".to_string(),
            });
        }
        validate_non_empty_string("source.worksheet", &self.source.worksheet)?;
        validate_url("source.base_url", &self.source.base_url)?;
        validate_non_empty_string(
            "columns.classification",
            &self.extractor.classification_column,
        )?;
        validate_non_empty_string("columns.enabled", &self.extractor.enabled_column)?;
        validate_rename_targets("rename", self.extractor.rename.values())?;
        validate_path("output.outfile", &self.outfile)?;
        validate_range("output.indent", self.indent, 0, MAX_INDENT)?;
        Ok(())
    }
}
