use crate::domain::ports::AuditLog;
use crate::utils::error::Result;
use chrono::{DateTime, Local};
use std::fs::{File, OpenOptions};
use std::io::{LineWriter, Write};
use std::path::{Path, PathBuf};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `[yyyy-MM-dd HH:mm:ss] message`
pub fn format_entry(timestamp: DateTime<Local>, message: &str) -> String {
    format!("[{}] {}", timestamp.format(TIMESTAMP_FORMAT), message)
}

/// In-memory audit log, used by tests and as a sink-less fallback.
#[derive(Debug, Default, Clone)]
pub struct MemoryAuditLog {
    entries: Vec<String>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuditLog for MemoryAuditLog {
    fn append(&mut self, message: &str) {
        tracing::debug!(target: "parcel_depot::audit", "{}", message);
        self.entries.push(format_entry(Local::now(), message));
    }

    fn entries(&self) -> &[String] {
        &self.entries
    }

    fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        Ok(())
    }
}

/// Audit log that appends every entry to a file as it is recorded and keeps
/// a copy in memory for display.
#[derive(Debug)]
pub struct FileAuditLog {
    path: PathBuf,
    writer: LineWriter<File>,
    entries: Vec<String>,
}

impl FileAuditLog {
    /// 以附加模式開啟日誌檔；既有內容會保留
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        tracing::debug!("Audit log opened at {}", path.display());
        Ok(Self {
            path,
            writer: LineWriter::new(file),
            entries: Vec::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditLog for FileAuditLog {
    fn append(&mut self, message: &str) {
        tracing::debug!(target: "parcel_depot::audit", "{}", message);
        let entry = format_entry(Local::now(), message);
        if let Err(e) = writeln!(self.writer, "{}", entry) {
            tracing::warn!(
                "Failed to write audit entry to {}: {}",
                self.path.display(),
                e
            );
        }
        self.entries.push(entry);
    }

    fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Truncates both the in-memory copy and the file.
    fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        self.writer.flush()?;
        self.writer.get_ref().set_len(0)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use regex::Regex;
    use tempfile::TempDir;

    #[test]
    fn test_format_entry() {
        let ts = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(format_entry(ts, "hello"), "[2024-03-09 07:05:01] hello");
    }

    #[test]
    fn test_memory_log_text() {
        let mut log = MemoryAuditLog::new();
        log.append("first");
        log.append("second");

        let re = Regex::new(r"^\[\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}\] first$").unwrap();
        assert!(re.is_match(&log.entries()[0]));
        assert_eq!(log.text().lines().count(), 2);
        assert!(log.text().ends_with("second\n"));

        log.clear().unwrap();
        assert!(log.entries().is_empty());
    }

    #[test]
    fn test_file_log_appends_and_clears() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("logs/warehouse_log.txt");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "[2020-01-01 00:00:00] older run\n").unwrap();

        let mut log = FileAuditLog::open(&path).unwrap();
        log.append("Parcel processed: P001");
        log.flush().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("[2020-01-01 00:00:00] older run\n"));
        assert!(content.trim_end().ends_with("] Parcel processed: P001"));
        assert_eq!(log.entries().len(), 1);

        log.clear().unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
        log.append("after clear");
        log.flush().unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 1);
    }
}
