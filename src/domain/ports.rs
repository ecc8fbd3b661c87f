use crate::domain::model::FeeSchedule;
use crate::utils::error::Result;

/// Byte-level access to the external record sources and report sinks.
pub trait Storage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
    /// 附加到檔案尾端，不覆寫既有內容
    fn append_file(&self, path: &str, data: &[u8]) -> Result<()>;
}

/// Write-only audit trail. Entries are timestamped by the implementation.
///
/// Appending is best-effort: implementations report sink failures through
/// `tracing` and keep the in-memory copy regardless.
pub trait AuditLog {
    fn append(&mut self, message: &str);

    /// Every formatted entry recorded since construction or the last `clear`.
    fn entries(&self) -> &[String];

    fn text(&self) -> String {
        let mut text = String::new();
        for entry in self.entries() {
            text.push_str(entry);
            text.push('\n');
        }
        text
    }

    fn clear(&mut self) -> Result<()>;

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

pub trait ConfigProvider {
    fn data_dir(&self) -> &str;
    fn customer_source(&self) -> &str;
    fn parcel_source(&self) -> &str;
    fn audit_log_path(&self) -> &str;
    fn report_path(&self) -> &str;
    fn long_stored_days(&self) -> u32;
    fn fee_schedule(&self) -> FeeSchedule;
}
