//! Consumer view of a channel map document: hardware address to detector.

use crate::domain::model::{CellValue, ChannelMapDocument, ChannelMapEntry};
use crate::utils::error::{EtlError, Result};
use std::collections::BTreeMap;

pub const CRATE_NUM: &str = "crateNum";
pub const AMC_SLOT_NUM: &str = "amcSlotNum";
pub const CHANNEL_NUM: &str = "channelNum";
pub const DETECTOR_SYSTEM: &str = "detectorSystem";
pub const SUBDETECTOR: &str = "subdetector";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelKey {
    pub crate_num: i64,
    pub amc_slot_num: i64,
    pub channel_num: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectorAssignment {
    pub detector_system: String,
    pub subdetector: String,
}

#[derive(Debug, Clone, Default)]
pub struct ChannelMap {
    channels: BTreeMap<ChannelKey, DetectorAssignment>,
}

impl ChannelMap {
    /// 以下游讀取的方式建立索引；任何一筆缺欄位或型別不對就失敗
    pub fn from_document(document: &ChannelMapDocument) -> Result<Self> {
        let mut channels = BTreeMap::new();

        for (index, entry) in document.channel_map.iter().enumerate() {
            let key = ChannelKey {
                crate_num: integer_field(entry, index, CRATE_NUM)?,
                amc_slot_num: integer_field(entry, index, AMC_SLOT_NUM)?,
                channel_num: integer_field(entry, index, CHANNEL_NUM)?,
            };
            let assignment = DetectorAssignment {
                detector_system: text_field(entry, index, DETECTOR_SYSTEM)?,
                subdetector: text_field(entry, index, SUBDETECTOR)?,
            };

            if let Some(previous) = channels.insert(key, assignment) {
                tracing::warn!(
                    "⚠️ Channel {:?} listed more than once; entry {} replaces {}/{}",
                    key,
                    index,
                    previous.detector_system,
                    previous.subdetector
                );
            }
        }

        Ok(Self { channels })
    }

    pub fn lookup(
        &self,
        crate_num: i64,
        amc_slot_num: i64,
        channel_num: i64,
    ) -> Option<&DetectorAssignment> {
        self.channels.get(&ChannelKey {
            crate_num,
            amc_slot_num,
            channel_num,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ChannelKey, &DetectorAssignment)> {
        self.channels.iter()
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

fn field<'a>(entry: &'a ChannelMapEntry, index: usize, key: &str) -> Result<&'a CellValue> {
    entry.get(key).ok_or_else(|| EtlError::ValidationError {
        message: format!("channel map entry {} is missing '{}'", index, key),
    })
}

fn integer_field(entry: &ChannelMapEntry, index: usize, key: &str) -> Result<i64> {
    let value = field(entry, index, key)?;
    value.as_integer().ok_or_else(|| EtlError::ValidationError {
        message: format!(
            "channel map entry {} has '{}' = {}, expected an integer",
            index, key, value
        ),
    })
}

fn text_field(entry: &ChannelMapEntry, index: usize, key: &str) -> Result<String> {
    let value = field(entry, index, key)?;
    value
        .as_text()
        .map(str::to_string)
        .ok_or_else(|| EtlError::ValidationError {
            message: format!(
                "channel map entry {} has '{}' = {}, expected a string",
                index, key, value
            ),
        })
}
