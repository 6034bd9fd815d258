use crate::domain::channel_map::{
    AMC_SLOT_NUM, CHANNEL_NUM, CRATE_NUM, DETECTOR_SYSTEM, SUBDETECTOR,
};
use crate::domain::model::{CellValue, ChannelMapDocument, ChannelMapEntry, Row};
use crate::utils::error::{EtlError, Result};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

pub const DEFAULT_CLASSIFICATION_COLUMN: &str = "Subdetector";
pub const DEFAULT_ENABLED_COLUMN: &str = "Enabled";
pub const DEFAULT_NULL_SENTINEL: f64 = -1_000_000_000.0;

/// 預設欄位改名表
pub fn default_rename_table() -> HashMap<String, String> {
    [
        ("Crate", CRATE_NUM),
        ("AMC/WFD5", AMC_SLOT_NUM),
        ("AMC Channel", CHANNEL_NUM),
        ("Detector System", DETECTOR_SYSTEM),
        ("Subdetector", SUBDETECTOR),
    ]
    .into_iter()
    .map(|(from, to)| (from.to_string(), to.to_string()))
    .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractorConfig {
    pub rename: HashMap<String, String>,
    pub classification_column: String,
    pub enabled_column: String,
    pub null_sentinel: CellValue,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            rename: default_rename_table(),
            classification_column: DEFAULT_CLASSIFICATION_COLUMN.to_string(),
            enabled_column: DEFAULT_ENABLED_COLUMN.to_string(),
            null_sentinel: CellValue::Number(DEFAULT_NULL_SENTINEL),
        }
    }
}

impl ExtractorConfig {
    fn output_key<'a>(&'a self, column: &'a str) -> &'a str {
        self.rename.get(column).map(String::as_str).unwrap_or(column)
    }
}

/// Turns cable-layout rows into a channel map document.
#[derive(Debug, Clone, Default)]
pub struct ChannelMapExtractor {
    config: ExtractorConfig,
}

impl ChannelMapExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    pub fn extract(&self, rows: &[Row], generated_at: DateTime<Utc>) -> Result<ChannelMapDocument> {
        let mut channel_map = Vec::new();
        let mut unclassified = 0usize;
        let mut disabled = 0usize;

        for (index, row) in rows.iter().enumerate() {
            let classification = row.value(&self.config.classification_column);
            if classification.is_null() {
                unclassified += 1;
                continue;
            }
            let detector = classification.to_string();
            let detector = detector.trim();

            tracing::debug!("Found row {} ({}): {}", index, detector, row);

            if !self.is_enabled(index, row)? {
                disabled += 1;
                continue;
            }

            let entry = self.build_entry(row);
            tracing::debug!("Parsed to: {:?}", entry);
            tracing::debug!("    -> Enabled!");
            channel_map.push(entry);
        }

        tracing::debug!(
            "Kept {} of {} rows ({} without {}, {} disabled)",
            channel_map.len(),
            rows.len(),
            unclassified,
            self.config.classification_column,
            disabled
        );

        Ok(ChannelMapDocument::new(generated_at, channel_map))
    }

    /// 數字取整數部分後與 1 比較；文字需能解析為整數；空值或其他文字直接失敗
    fn is_enabled(&self, index: usize, row: &Row) -> Result<bool> {
        let column = &self.config.enabled_column;
        let value = row.value(column);
        let malformed = || EtlError::MalformedEnabledFlagError {
            row: index,
            column: column.clone(),
            value: value.to_string(),
        };

        match value {
            CellValue::Number(n) if n.is_finite() => Ok(n.trunc() == 1.0),
            CellValue::Bool(b) => Ok(*b),
            CellValue::Text(s) => s.trim().parse::<i64>().map(|n| n == 1).map_err(|_| malformed()),
            CellValue::Number(_) | CellValue::Null => Err(malformed()),
        }
    }

    fn build_entry(&self, row: &Row) -> ChannelMapEntry {
        let mut entry = ChannelMapEntry::new();
        for (column, value) in row.iter() {
            let value = if value.is_null() {
                self.config.null_sentinel.clone()
            } else {
                value.clone()
            };
            entry.insert(self.config.output_key(column), value);
        }
        entry
    }
}
