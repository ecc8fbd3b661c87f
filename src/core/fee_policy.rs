use crate::core::parcel_store::ParcelStore;
use crate::domain::model::{CustomerRecord, FeeSchedule, LastProcessed, ParcelClass, ParcelRecord};

/// Computes parcel fees and keeps the most recent processing step for display.
#[derive(Debug, Clone, Default)]
pub struct FeePolicy {
    schedule: FeeSchedule,
    last_processed: Option<LastProcessed>,
}

impl FeePolicy {
    pub fn new(schedule: FeeSchedule) -> Self {
        Self {
            schedule,
            last_processed: None,
        }
    }

    pub fn schedule(&self) -> &FeeSchedule {
        &self.schedule
    }

    /// 費用 = 重量 × 0.5 + 體積 × 0.001 + 天數 × 1.0（預設費率）
    pub fn fee(&self, parcel: &ParcelRecord) -> f64 {
        parcel.weight * self.schedule.weight_rate
            + parcel.volume() * self.schedule.volume_rate
            + f64::from(parcel.days) * self.schedule.day_rate
    }

    /// Boundary volumes fall into the lower class.
    pub fn classify(&self, parcel: &ParcelRecord) -> ParcelClass {
        let volume = parcel.volume();
        if volume > self.schedule.large_volume {
            ParcelClass::Large
        } else if volume > self.schedule.medium_volume {
            ParcelClass::Medium
        } else {
            ParcelClass::Small
        }
    }

    /// Charges `parcel` to `customer`, adding the fee to the customer's
    /// running total, and remembers the step for status display.
    pub fn process(&mut self, customer: &mut CustomerRecord, parcel: &ParcelRecord) -> f64 {
        let fee = self.fee(parcel);
        customer.fee += fee;
        self.last_processed = Some(LastProcessed {
            customer_sequence: customer.sequence,
            customer_name: customer.name.clone(),
            parcel: parcel.clone(),
            fee,
        });
        fee
    }

    pub fn last_processed(&self) -> Option<&LastProcessed> {
        self.last_processed.as_ref()
    }

    /// Sum of fees for the customer's parcels still waiting in `store`.
    pub fn estimated_fee(&self, customer: &CustomerRecord, store: &ParcelStore) -> f64 {
        customer
            .parcel_ids
            .iter()
            .filter_map(|id| store.get(id))
            .map(|parcel| self.fee(parcel))
            .sum()
    }
}
