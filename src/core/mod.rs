pub mod customer_queue;
pub mod depot;
pub mod fee_policy;
pub mod parcel_store;
pub mod records;
pub mod report;

pub use crate::domain::model::{CustomerRecord, Dimension, ParcelRecord};
pub use crate::domain::ports::{AuditLog, ConfigProvider, Storage};
pub use crate::utils::error::Result;
