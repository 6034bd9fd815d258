use super::toml_config::TomlConfig;
use super::{AppConfig, SourceFormat};
use crate::domain::model::CellValue;
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "channel-map-loader")]
#[command(about = "Fetches the channel map from the published cable layout sheet and saves it to JSON")]
pub struct CliConfig {
    /// TOML file with source, column, rename and output settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Published spreadsheet key
    #[arg(long)]
    pub sheet: Option<String>,

    /// Worksheet holding the cable layout
    #[arg(long)]
    pub worksheet: Option<String>,

    /// Export endpoint of the spreadsheet service
    #[arg(long)]
    pub base_url: Option<String>,

    #[arg(long, value_enum)]
    pub format: Option<SourceFormat>,

    /// Abort the download after this many seconds
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(long)]
    pub outfile: Option<String>,

    /// What value to set all empty cells to in the json
    #[arg(long, allow_hyphen_values = true)]
    pub nan_json_value: Option<String>,

    /// JSON indent width in spaces
    #[arg(long)]
    pub indent: Option<usize>,

    /// Check that every entry carries integer crate/slot/channel and string detector fields
    #[arg(long)]
    pub validate: bool,

    #[arg(short, long, help = "Print every parsed row")]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

impl CliConfig {
    /// 命令列參數優先於 TOML 檔，TOML 檔優先於預設值
    pub fn resolve(&self) -> Result<AppConfig> {
        let file = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path.display());
                TomlConfig::from_file(path)?
            }
            None => TomlConfig::default(),
        };

        let mut config = AppConfig::from_toml(&file);

        if let Some(sheet) = &self.sheet {
            config.source.sheet = sheet.clone();
        }
        if let Some(worksheet) = &self.worksheet {
            config.source.worksheet = worksheet.clone();
        }
        if let Some(base_url) = &self.base_url {
            config.source.base_url = base_url.clone();
        }
        if let Some(format) = self.format {
            config.source.format = format;
        }
        if let Some(seconds) = self.timeout_seconds {
            config.source.timeout = Some(Duration::from_secs(seconds));
        }
        if let Some(outfile) = &self.outfile {
            config.outfile = outfile.clone();
        }
        if let Some(sentinel) = &self.nan_json_value {
            config.extractor.null_sentinel = CellValue::parse_literal(sentinel);
        }
        if let Some(indent) = self.indent {
            config.indent = indent;
        }
        config.verify |= self.validate;

        Ok(config)
    }
}
