use crate::domain::model::ParcelRecord;
use std::fmt::Write;

pub const REPORT_HEADER: &str = "=== Warehouse System Report ===";

#[derive(Debug, Clone, PartialEq)]
pub struct DepotReport {
    pub customer_count: usize,
    pub parcel_count: usize,
    pub long_stored_days: u32,
    pub long_stored: Vec<ParcelRecord>,
}

impl DepotReport {
    pub fn render(&self) -> String {
        let mut out = String::new();
        // String 的 fmt::Write 不會失敗
        let _ = writeln!(out, "{}", REPORT_HEADER);
        let _ = writeln!(out, "Current customer count: {}", self.customer_count);
        let _ = writeln!(out, "Current parcel count: {}", self.parcel_count);
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Long-term stored parcels (>{} days):",
            self.long_stored_days
        );
        for parcel in &self.long_stored {
            let _ = writeln!(out, "ID: {}, Storage days: {}", parcel.id, parcel.days);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Dimension;

    #[test]
    fn test_render_report() {
        let dim = Dimension::new(1.0, 1.0, 1.0).unwrap();
        let report = DepotReport {
            customer_count: 2,
            parcel_count: 3,
            long_stored_days: 30,
            long_stored: vec![ParcelRecord::new("P7", 45, 1.0, dim).unwrap()],
        };

        let text = report.render();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], REPORT_HEADER);
        assert_eq!(lines[1], "Current customer count: 2");
        assert_eq!(lines[2], "Current parcel count: 3");
        assert_eq!(lines[4], "Long-term stored parcels (>30 days):");
        assert_eq!(lines[5], "ID: P7, Storage days: 45");
        assert_eq!(lines.len(), 6);
    }
}
