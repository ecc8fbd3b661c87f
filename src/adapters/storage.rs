use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::fs::{self, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// File-system storage rooted at `base_path`. Absolute paths bypass the base.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        Path::new(&self.base_path).join(path)
    }

    fn ensure_parent(full_path: &Path) -> Result<()> {
        if let Some(parent) = full_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

impl Storage for LocalStorage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.resolve(path);
        tracing::debug!("Reading {}", full_path.display());
        let data = fs::read(full_path)?;
        Ok(data)
    }

    fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.resolve(path);
        Self::ensure_parent(&full_path)?;
        fs::write(full_path, data)?;
        Ok(())
    }

    fn append_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.resolve(path);
        Self::ensure_parent(&full_path)?;
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&full_path)?;

        // 原檔最後一行沒有換行時先補上，避免兩筆記錄黏在一起
        if file.metadata()?.len() > 0 {
            let mut last = [0u8; 1];
            file.seek(SeekFrom::End(-1))?;
            file.read_exact(&mut last)?;
            if last[0] != b'\n' {
                file.write_all(b"\n")?;
            }
        }

        file.write_all(data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());

        storage.write_file("nested/report.txt", b"hello").unwrap();
        assert_eq!(storage.read_file("nested/report.txt").unwrap(), b"hello");
    }

    #[test]
    fn test_append_preserves_content_and_terminates_last_line() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());

        storage.write_file("Custs.csv", b"Alice,P1").unwrap();
        storage.append_file("Custs.csv", b"Bob,P2\n").unwrap();
        storage.append_file("Custs.csv", b"Carol,P3\n").unwrap();

        let content = storage.read_file("Custs.csv").unwrap();
        assert_eq!(content, b"Alice,P1\nBob,P2\nCarol,P3\n");
    }

    #[test]
    fn test_append_creates_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());

        storage.append_file("Parcels.csv", b"P1,1,1,1,1,1\n").unwrap();
        assert_eq!(storage.read_file("Parcels.csv").unwrap(), b"P1,1,1,1,1,1\n");
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let storage = LocalStorage::new("/definitely/not/here".to_string());
        assert!(matches!(
            storage.read_file("x.csv"),
            Err(crate::utils::error::DepotError::IoError(_))
        ));
    }
}
