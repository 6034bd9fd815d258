use crate::core::extractor::ChannelMapExtractor;
use crate::core::{ConfigProvider, Pipeline, SheetSource, Storage};
use crate::domain::channel_map::ChannelMap;
use crate::domain::model::{ChannelMapDocument, Row};
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// 以固定縮排輸出 JSON
pub fn render_document(document: &ChannelMapDocument, indent: usize) -> Result<Vec<u8>> {
    let indent = vec![b' '; indent];
    let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent);
    let mut buffer = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    document.serialize(&mut serializer)?;
    Ok(buffer)
}

pub struct ChannelMapPipeline<Src: SheetSource, S: Storage, C: ConfigProvider> {
    source: Src,
    storage: S,
    config: C,
    extractor: ChannelMapExtractor,
    clock: fn() -> DateTime<Utc>,
}

impl<Src: SheetSource, S: Storage, C: ConfigProvider> ChannelMapPipeline<Src, S, C> {
    pub fn new(source: Src, storage: S, config: C) -> Self {
        let extractor = ChannelMapExtractor::new(config.extractor_config().clone());
        Self {
            source,
            storage,
            config,
            extractor,
            clock: Utc::now,
        }
    }

    /// 測試時固定產生時間
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }
}

#[async_trait::async_trait]
impl<Src: SheetSource, S: Storage, C: ConfigProvider> Pipeline for ChannelMapPipeline<Src, S, C> {
    async fn extract(&self) -> Result<Vec<Row>> {
        let rows = self.source.fetch().await?;
        tracing::debug!("Sheet source returned {} rows", rows.len());
        Ok(rows)
    }

    async fn transform(&self, rows: Vec<Row>) -> Result<ChannelMapDocument> {
        let generated_at = (self.clock)();
        let document = self.extractor.extract(&rows, generated_at)?;

        if self.config.verify_consumable() {
            let channel_map = ChannelMap::from_document(&document)?;
            tracing::info!(
                "🔎 Channel map verified: {} hardware channels",
                channel_map.len()
            );
        }

        Ok(document)
    }

    async fn load(&self, document: ChannelMapDocument) -> Result<String> {
        let data = render_document(&document, self.config.indent())?;
        let outfile = self.config.outfile();

        tracing::debug!("Writing {} bytes to {}", data.len(), outfile);
        self.storage.write_file(outfile, &data).await?;

        Ok(outfile.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::extractor::ExtractorConfig;
    use crate::domain::model::CellValue;
    use crate::utils::error::EtlError;
    use chrono::TimeZone;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockSource {
        rows: Vec<Row>,
    }

    impl SheetSource for MockSource {
        async fn fetch(&self) -> Result<Vec<Row>> {
            Ok(self.rows.clone())
        }
    }

    struct FailingSource;

    impl SheetSource for FailingSource {
        async fn fetch(&self) -> Result<Vec<Row>> {
            Err(EtlError::SourceUnavailableError {
                url: "http://sheet.invalid".to_string(),
                reason: "HTTP 503".to_string(),
            })
        }
    }

    struct MockConfig {
        outfile: String,
        indent: usize,
        verify: bool,
        extractor: ExtractorConfig,
    }

    impl MockConfig {
        fn new() -> Self {
            Self {
                outfile: "channel_map.json".to_string(),
                indent: 1,
                verify: false,
                extractor: ExtractorConfig::default(),
            }
        }
    }

    impl ConfigProvider for MockConfig {
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

    fn fixed_clock() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn cable_row(crate_num: i64, subdetector: Option<&str>, enabled: i64) -> Row {
        Row::new()
            .with("Crate", crate_num)
            .with("AMC/WFD5", 2)
            .with("AMC Channel", 3)
            .with("Detector System", "TPC")
            .with("Subdetector", subdetector)
            .with("Enabled", enabled)
    }

    #[test]
    fn test_render_document_one_space_indent() {
        let mut entry = crate::domain::model::ChannelMapEntry::new();
        entry.insert("crateNum", CellValue::Number(1.0));
        entry.insert("subdetector", CellValue::from("East"));
        let doc = ChannelMapDocument::new(fixed_clock(), vec![entry]);

        let rendered = String::from_utf8(render_document(&doc, 1).unwrap()).unwrap();
        let expected = "{\n \"time\": \"2024-01-01T00:00:00+0000\",\n \"channelMap\": [\n  {\n   \"crateNum\": 1,\n   \"subdetector\": \"East\"\n  }\n ]\n}";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_render_empty_document() {
        let doc = ChannelMapDocument::new(fixed_clock(), vec![]);
        let rendered = String::from_utf8(render_document(&doc, 1).unwrap()).unwrap();
        assert_eq!(
            rendered,
            "{\n \"time\": \"2024-01-01T00:00:00+0000\",\n \"channelMap\": []\n}"
        );
    }

    #[tokio::test]
    async fn test_extract_passes_rows_through() {
        let source = MockSource {
            rows: vec![cable_row(1, Some("East"), 1), cable_row(2, None, 1)],
        };
        let pipeline = ChannelMapPipeline::new(source, MockStorage::new(), MockConfig::new());

        let rows = pipeline.extract().await.unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn test_extract_propagates_source_failure() {
        let pipeline =
            ChannelMapPipeline::new(FailingSource, MockStorage::new(), MockConfig::new());

        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, EtlError::SourceUnavailableError { .. }));
    }

    #[tokio::test]
    async fn test_transform_uses_clock() {
        let source = MockSource { rows: vec![] };
        let pipeline = ChannelMapPipeline::new(source, MockStorage::new(), MockConfig::new())
            .with_clock(fixed_clock);

        let doc = pipeline
            .transform(vec![
                cable_row(1, Some("East"), 1),
                cable_row(2, None, 1),
                cable_row(3, Some("West"), 0),
            ])
            .await
            .unwrap();

        assert_eq!(doc.time, "2024-01-01T00:00:00+0000");
        assert_eq!(doc.channel_map.len(), 1);
    }

    #[tokio::test]
    async fn test_transform_verification_rejects_unusable_entries() {
        let mut config = MockConfig::new();
        config.verify = true;
        let pipeline = ChannelMapPipeline::new(MockSource { rows: vec![] }, MockStorage::new(), config);

        let row = Row::new()
            .with("Crate", 1)
            .with("AMC/WFD5", None::<i64>)
            .with("AMC Channel", 3)
            .with("Subdetector", "East")
            .with("Enabled", 1);

        // 缺少 Detector System 欄位
        let err = pipeline.transform(vec![row]).await.unwrap_err();
        assert!(matches!(err, EtlError::ValidationError { .. }));
    }

    #[tokio::test]
    async fn test_load_writes_rendered_json() {
        let storage = MockStorage::new();
        let pipeline = ChannelMapPipeline::new(
            MockSource { rows: vec![] },
            storage.clone(),
            MockConfig::new(),
        )
        .with_clock(fixed_clock);

        let doc = pipeline
            .transform(vec![cable_row(1, Some("East"), 1)])
            .await
            .unwrap();
        let path = pipeline.load(doc).await.unwrap();
        assert_eq!(path, "channel_map.json");

        let written = storage.get_file("channel_map.json").await.unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&written).unwrap();
        assert_eq!(parsed["time"], "2024-01-01T00:00:00+0000");
        assert_eq!(parsed["channelMap"][0]["crateNum"], 1);
        assert_eq!(parsed["channelMap"][0]["detectorSystem"], "TPC");
    }
}
