use crate::utils::error::Result;
use crate::utils::validation::validate_measurement;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 客戶序號：建立時遞增分配，永不重複使用
pub type SequenceNumber = u32;

/// Parcel measurements in centimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Dimension {
    length: f64,
    width: f64,
    height: f64,
}

impl Dimension {
    pub fn new(length: f64, width: f64, height: f64) -> Result<Self> {
        validate_measurement("length", length, false)?;
        validate_measurement("width", width, false)?;
        validate_measurement("height", height, false)?;
        Ok(Self {
            length,
            width,
            height,
        })
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// 體積 (cm³)
    pub fn volume(&self) -> f64 {
        self.length * self.width * self.height
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0}×{:.0}×{:.0}", self.length, self.width, self.height)
    }
}

/// Built only through [`ParcelRecord::new`], which trims and validates the ID.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParcelRecord {
    pub id: String,
    pub days: u32,
    pub weight: f64,
    pub dimension: Dimension,
}

impl ParcelRecord {
    pub fn new(id: impl Into<String>, days: u32, weight: f64, dimension: Dimension) -> Result<Self> {
        let id = id.into().trim().to_string();
        crate::utils::validation::validate_record_field("parcel id", &id, &[',', ';'])?;
        validate_measurement("weight", weight, true)?;
        Ok(Self {
            id,
            days,
            weight,
            dimension,
        })
    }

    pub fn volume(&self) -> f64 {
        self.dimension.volume()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub sequence: SequenceNumber,
    pub name: String,
    pub parcel_ids: Vec<String>,
    pub fee: f64,
}

impl CustomerRecord {
    pub fn new(sequence: SequenceNumber, name: impl Into<String>, parcel_ids: Vec<String>) -> Self {
        Self {
            sequence,
            name: name.into(),
            parcel_ids,
            fee: 0.0,
        }
    }

    pub fn add_parcel(&mut self, parcel_id: impl Into<String>) {
        self.parcel_ids.push(parcel_id.into());
    }

    pub fn holds(&self, parcel_id: &str) -> bool {
        self.parcel_ids.iter().any(|id| id == parcel_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParcelClass {
    Small,
    Medium,
    Large,
}

impl ParcelClass {
    pub fn label(&self) -> &'static str {
        match self {
            ParcelClass::Small => "small",
            ParcelClass::Medium => "medium",
            ParcelClass::Large => "large",
        }
    }
}

impl fmt::Display for ParcelClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the processing history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedEntry {
    pub parcel_id: String,
    pub processed_at: DateTime<Local>,
}

/// 最近一次處理的 (客戶, 包裹, 費用)，供狀態顯示
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LastProcessed {
    pub customer_sequence: SequenceNumber,
    pub customer_name: String,
    pub parcel: ParcelRecord,
    pub fee: f64,
}

/// Fee rates and size thresholds used by the fee policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeSchedule {
    pub weight_rate: f64,
    pub volume_rate: f64,
    pub day_rate: f64,
    pub large_volume: f64,
    pub medium_volume: f64,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            weight_rate: 0.5,
            volume_rate: 0.001,
            day_rate: 1.0,
            large_volume: 10_000.0,
            medium_volume: 5_000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_volume() {
        let dim = Dimension::new(10.0, 20.0, 5.0).unwrap();
        assert_eq!(dim.volume(), 1000.0);
        assert_eq!(dim.to_string(), "10×20×5");
    }

    #[test]
    fn test_dimension_rejects_non_positive() {
        assert!(Dimension::new(0.0, 1.0, 1.0).is_err());
        assert!(Dimension::new(1.0, -2.0, 1.0).is_err());
        assert!(Dimension::new(1.0, 1.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_parcel_record_validation() {
        let dim = Dimension::new(1.0, 1.0, 1.0).unwrap();
        assert!(ParcelRecord::new("P001", 0, 0.0, dim).is_ok());
        assert!(ParcelRecord::new("", 1, 1.0, dim).is_err());
        assert!(ParcelRecord::new("P1,P2", 1, 1.0, dim).is_err());
        assert!(ParcelRecord::new("P001", 1, -0.5, dim).is_err());
        assert!(ParcelRecord::new("   ", 1, 1.0, dim).is_err());
    }

    #[test]
    fn test_parcel_id_is_trimmed() {
        let dim = Dimension::new(1.0, 1.0, 1.0).unwrap();
        let parcel = ParcelRecord::new(" P7 ", 1, 1.0, dim).unwrap();
        assert_eq!(parcel.id, "P7");
    }

    #[test]
    fn test_customer_holds_parcel() {
        let mut customer = CustomerRecord::new(1, "Alice", vec!["P1".to_string()]);
        customer.add_parcel("P2");
        assert!(customer.holds("P2"));
        assert!(!customer.holds("P3"));
        assert_eq!(customer.fee, 0.0);
    }

    #[test]
    fn test_parcel_class_labels() {
        assert_eq!(ParcelClass::Large.to_string(), "large");
        assert_eq!(serde_json::to_string(&ParcelClass::Medium).unwrap(), "\"medium\"");
    }
}
