use crate::core::Storage;
use crate::utils::error::{EtlError, Result};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        Path::new(&self.base_path).join(path)
    }
}

impl Storage for LocalStorage {
    /// 先寫入同目錄的暫存檔再改名，失敗時不留下不完整的輸出
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.resolve(path);
        let shown_path = full_path.display().to_string();
        let write_error = |source: std::io::Error| EtlError::OutputWriteError {
            path: shown_path.clone(),
            source,
        };

        let file_name = full_path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| EtlError::InvalidConfigValueError {
                field: "output.outfile".to_string(),
                value: path.to_string(),
                reason: "Path does not name a file".to_string(),
            })?;
        let temp_path = full_path.with_file_name(format!(".{}.tmp", file_name));

        if let Some(parent) = full_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(write_error)?;
            }
        }

        fs::write(&temp_path, data).map_err(write_error)?;
        if let Err(e) = fs::rename(&temp_path, &full_path) {
            let _ = fs::remove_file(&temp_path);
            return Err(write_error(e));
        }

        tracing::debug!("Wrote {} bytes to {}", data.len(), shown_path);
        Ok(())
    }
}
