pub mod etl;
pub mod extractor;
pub mod pipeline;

pub use crate::domain::model::{CellValue, ChannelMapDocument, ChannelMapEntry, Row};
pub use crate::domain::ports::{ConfigProvider, Pipeline, SheetSource, Storage};
pub use crate::utils::error::Result;
