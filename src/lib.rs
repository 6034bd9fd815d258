pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::{http::GoogleSheetSource, storage::LocalStorage};
pub use config::{AppConfig, SourceFormat, SourceSettings};
pub use crate::core::{
    etl::EtlEngine,
    extractor::{ChannelMapExtractor, ExtractorConfig},
    pipeline::ChannelMapPipeline,
};
pub use domain::channel_map::ChannelMap;
pub use domain::model::{CellValue, ChannelMapDocument, ChannelMapEntry, Row};
pub use utils::error::{EtlError, Result};
