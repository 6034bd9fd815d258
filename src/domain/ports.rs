use crate::core::extractor::ExtractorConfig;
use crate::domain::model::{ChannelMapDocument, Row};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Where spreadsheet rows come from.
pub trait SheetSource: Send + Sync {
    fn fetch(&self) -> impl std::future::Future<Output = Result<Vec<Row>>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn outfile(&self) -> &str;
    fn indent(&self) -> usize;
    fn verify_consumable(&self) -> bool;
    fn extractor_config(&self) -> &ExtractorConfig;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Row>>;
    async fn transform(&self, rows: Vec<Row>) -> Result<ChannelMapDocument>;
    async fn load(&self, document: ChannelMapDocument) -> Result<String>;
}
