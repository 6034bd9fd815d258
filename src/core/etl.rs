use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting channel map export...");

        // Extract
        tracing::info!("📥 Fetching cable layout...");
        let rows = self.pipeline.extract().await?;
        tracing::info!("Fetched {} rows", rows.len());

        // Transform
        tracing::info!("🔄 Building channel map...");
        let document = self.pipeline.transform(rows).await?;
        tracing::info!("Kept {} enabled channels", document.len());

        // Load
        tracing::info!("💾 Writing channel map...");
        let output_path = self.pipeline.load(document).await?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(output_path)
    }
}
