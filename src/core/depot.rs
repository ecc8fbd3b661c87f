use crate::core::customer_queue::CustomerQueue;
use crate::core::fee_policy::FeePolicy;
use crate::core::parcel_store::ParcelStore;
use crate::core::records;
use crate::core::report::DepotReport;
use crate::domain::model::{
    CustomerRecord, FeeSchedule, LastProcessed, ParcelClass, ParcelRecord, ProcessedEntry,
    SequenceNumber,
};
use crate::domain::ports::{AuditLog, ConfigProvider, Storage};
use crate::utils::error::{DepotError, Result};
use crate::utils::validation::validate_record_field;
use chrono::Local;
use std::collections::HashSet;

pub const DEFAULT_LONG_STORED_DAYS: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepotSettings {
    pub fees: FeeSchedule,
    pub long_stored_days: u32,
}

impl Default for DepotSettings {
    fn default() -> Self {
        Self {
            fees: FeeSchedule::default(),
            long_stored_days: DEFAULT_LONG_STORED_DAYS,
        }
    }
}

impl DepotSettings {
    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self {
            fees: config.fee_schedule(),
            long_stored_days: config.long_stored_days(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SourcePaths {
    customers: String,
    parcels: String,
}

#[derive(Debug, Default)]
pub struct LoadSummary {
    pub customers_loaded: usize,
    pub parcels_loaded: usize,
    pub rejected: Vec<DepotError>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParcelCharge {
    pub parcel_id: String,
    pub class: ParcelClass,
    pub fee: f64,
}

/// Result of serving one customer.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessOutcome {
    /// The customer as it left the queue; `fee` holds the total charged.
    pub customer: CustomerRecord,
    pub charges: Vec<ParcelCharge>,
    /// Requested IDs that were not in the store.
    pub missing: Vec<String>,
}

impl ProcessOutcome {
    pub fn total_fee(&self) -> f64 {
        self.customer.fee
    }
}

/// Owns the customer queue and parcel store and runs every depot operation.
///
/// Each mutation is followed by an audit entry. Operations that touch the
/// record sources do their I/O before changing any in-memory state, so a
/// failed read or append leaves the service as it was.
pub struct DepotService<S: Storage, L: AuditLog> {
    storage: S,
    audit: L,
    settings: DepotSettings,
    customers: CustomerQueue,
    parcels: ParcelStore,
    fee_policy: FeePolicy,
    processed: HashSet<String>,
    history: Vec<ProcessedEntry>,
    next_sequence: SequenceNumber,
    sources: Option<SourcePaths>,
}

impl<S: Storage, L: AuditLog> DepotService<S, L> {
    pub fn new(storage: S, audit: L) -> Self {
        Self::with_settings(storage, audit, DepotSettings::default())
    }

    pub fn with_settings(storage: S, audit: L, settings: DepotSettings) -> Self {
        Self {
            storage,
            audit,
            settings,
            customers: CustomerQueue::new(),
            parcels: ParcelStore::new(),
            fee_policy: FeePolicy::new(settings.fees),
            processed: HashSet::new(),
            history: Vec::new(),
            next_sequence: 1,
            sources: None,
        }
    }

    fn log(&mut self, message: impl AsRef<str>) {
        self.audit.append(message.as_ref());
    }

    fn allocate_sequence(&mut self) -> SequenceNumber {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        sequence
    }

    fn require_sources(&self) -> Result<SourcePaths> {
        self.sources.clone().ok_or(DepotError::NotInitialized)
    }

    fn store_parcel(&mut self, parcel: ParcelRecord) {
        let id = parcel.id.clone();
        match self.parcels.add(parcel) {
            None => self.log(format!("New parcel added: {}", id)),
            Some(_) => self.log(format!("Parcel updated: {}", id)),
        }
    }

    fn discard_parcel(&mut self, id: &str) -> Option<ParcelRecord> {
        let removed = self.parcels.remove(id);
        if removed.is_some() {
            self.log(format!("Parcel processed: {}", id));
        }
        removed
    }

    fn record_processed(&mut self, id: &str) {
        if self.processed.insert(id.to_string()) {
            self.history.push(ProcessedEntry {
                parcel_id: id.to_string(),
                processed_at: Local::now(),
            });
        }
    }

    /// 讀取客戶與包裹資料檔，並依體積重新排序包裹
    pub fn load(&mut self, customer_source: &str, parcel_source: &str) -> Result<LoadSummary> {
        tracing::debug!(
            "Loading customers from {} and parcels from {}",
            customer_source,
            parcel_source
        );
        let customer_data = self.storage.read_file(customer_source)?;
        let parcel_data = self.storage.read_file(parcel_source)?;

        let customers = records::parse_customers(&customer_data);
        let parcels = records::parse_parcels(&parcel_data);

        let mut summary = LoadSummary {
            customers_loaded: customers.records.len(),
            parcels_loaded: parcels.records.len(),
            rejected: Vec::new(),
        };

        for line in customers.records {
            let sequence = self.allocate_sequence();
            self.customers
                .enqueue(CustomerRecord::new(sequence, line.name, line.parcel_ids));
        }
        self.log(format!(
            "Customers data loaded from file: {} ({} customers)",
            customer_source, summary.customers_loaded
        ));

        for parcel in parcels.records {
            self.store_parcel(parcel);
        }
        self.log(format!(
            "Parcels data loaded from file: {} ({} parcels)",
            parcel_source, summary.parcels_loaded
        ));

        self.parcels.rebuild_sorted();
        self.log("Parcels sorted by size");

        summary.rejected.extend(customers.rejected);
        summary.rejected.extend(parcels.rejected);
        for rejected in &summary.rejected {
            tracing::warn!("Skipped record: {}", rejected);
        }

        self.sources = Some(SourcePaths {
            customers: customer_source.to_string(),
            parcels: parcel_source.to_string(),
        });
        self.log("System initialization completed");
        tracing::info!(
            "Loaded {} customers and {} parcels ({} lines skipped)",
            summary.customers_loaded,
            summary.parcels_loaded,
            summary.rejected.len()
        );

        Ok(summary)
    }

    pub fn load_from_config<C: ConfigProvider + ?Sized>(&mut self, config: &C) -> Result<LoadSummary> {
        self.load(config.customer_source(), config.parcel_source())
    }

    /// Serves the customer at the head of the queue.
    pub fn process_next(&mut self) -> Result<ProcessOutcome> {
        let mut customer = self.customers.dequeue().ok_or(DepotError::EmptyQueue)?;
        customer.fee = 0.0;

        let parcel_ids = std::mem::take(&mut customer.parcel_ids);
        let mut charges = Vec::new();
        let mut missing = Vec::new();

        for parcel_id in &parcel_ids {
            let Some(parcel) = self.parcels.get(parcel_id).cloned() else {
                tracing::debug!("Parcel {} not in store, skipping", parcel_id);
                missing.push(parcel_id.clone());
                continue;
            };

            let fee = self.fee_policy.process(&mut customer, &parcel);
            self.log(format!(
                "Processed parcel {} for customer {}, fee: {:.2}",
                parcel_id, customer.name, fee
            ));
            self.discard_parcel(parcel_id);
            self.record_processed(parcel_id);
            charges.push(ParcelCharge {
                parcel_id: parcel_id.clone(),
                class: self.fee_policy.classify(&parcel),
                fee,
            });
        }
        customer.parcel_ids = parcel_ids;

        if customer.fee > 0.0 {
            self.log(format!(
                "Processed all parcels for customer {}, Total cost: {:.2}",
                customer.name, customer.fee
            ));
        } else if charges.is_empty() {
            self.log(format!(
                "Customer {} (Sequence number: {}) had no parcels awaiting collection",
                customer.name, customer.sequence
            ));
        }

        Ok(ProcessOutcome {
            customer,
            charges,
            missing,
        })
    }

    pub fn search_by_id(&mut self, id: &str) -> Option<&ParcelRecord> {
        if self.parcels.contains(id) {
            self.log(format!("Search parcel: {}", id));
        } else {
            self.log(format!("Parcel not found: {}", id));
        }
        self.parcels.get(id)
    }

    /// Enqueues a new customer and appends it to the customer source.
    pub fn add_customer(&mut self, name: &str, parcel_ids: &[String]) -> Result<SequenceNumber> {
        let sources = self.require_sources()?;

        let name = name.trim();
        validate_record_field("customer name", name, &[','])?;
        let parcel_ids: Vec<String> = parcel_ids
            .iter()
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect();
        if parcel_ids.is_empty() {
            return Err(DepotError::validation(
                "a customer needs at least one parcel id",
            ));
        }
        for id in &parcel_ids {
            validate_record_field("parcel id", id, &[',', ';'])?;
        }

        let line = records::customer_line(name, &parcel_ids)?;
        self.storage.append_file(&sources.customers, &line)?;

        let sequence = self.allocate_sequence();
        self.customers
            .enqueue(CustomerRecord::new(sequence, name, parcel_ids));
        self.log(format!(
            "New customer added: {} (Sequence number: {})",
            name, sequence
        ));
        Ok(sequence)
    }

    /// Stores a parcel, optionally assigning it to a queued customer, and
    /// appends it to the parcel source. Returns whether it was assigned.
    pub fn add_parcel(&mut self, parcel: ParcelRecord, owner: Option<SequenceNumber>) -> Result<bool> {
        let sources = self.require_sources()?;

        let line = records::parcel_line(&parcel)?;
        self.storage.append_file(&sources.parcels, &line)?;

        let id = parcel.id.clone();
        self.store_parcel(parcel);

        let Some(sequence) = owner else {
            return Ok(false);
        };
        match self.customers.get_mut(sequence) {
            Some(customer) => {
                customer.add_parcel(id.clone());
                let name = customer.name.clone();
                self.log(format!("Parcel {} assigned to customer {}", id, name));
                Ok(true)
            }
            None => {
                tracing::warn!("Customer {} not in queue; parcel {} left unassigned", sequence, id);
                self.log(format!(
                    "Parcel {} not assigned: no customer with sequence number {}",
                    id, sequence
                ));
                Ok(false)
            }
        }
    }

    pub fn delete_customer(&mut self, sequence: SequenceNumber) -> Result<CustomerRecord> {
        let removed = self.customers.remove_by_sequence(sequence)?;
        self.log(format!(
            "Customer {} (Sequence number: {}) deleted",
            removed.name, sequence
        ));
        Ok(removed)
    }

    /// 標記包裹狀態；已領取的包裹會從倉庫移除
    pub fn update_parcel_status(&mut self, id: &str, collected: bool) -> bool {
        if !self.parcels.contains(id) {
            return false;
        }
        if collected {
            self.parcels.remove(id);
        }
        self.log(format!(
            "Update parcel status: {}, collected: {}",
            id, collected
        ));
        true
    }

    pub fn long_stored_parcels(&mut self, days: u32) -> Vec<ParcelRecord> {
        let parcels: Vec<ParcelRecord> = self
            .parcels
            .snapshot()
            .into_iter()
            .filter(|p| p.days > days)
            .collect();
        self.log(format!(
            "Count parcels stored more than {} days: {} parcels",
            days,
            parcels.len()
        ));
        parcels
    }

    pub fn build_report(&mut self) -> DepotReport {
        let days = self.settings.long_stored_days;
        DepotReport {
            customer_count: self.customers.len(),
            parcel_count: self.parcels.len(),
            long_stored_days: days,
            long_stored: self.long_stored_parcels(days),
        }
    }

    /// Writes the summary report to `destination` through the storage port.
    pub fn report(&mut self, destination: &str) -> Result<DepotReport> {
        let report = self.build_report();
        self.storage
            .write_file(destination, report.render().as_bytes())?;
        self.log(format!("Report generated: {}", destination));
        Ok(report)
    }

    pub fn is_initialized(&self) -> bool {
        self.sources.is_some()
    }

    /// Queue contents in arrival order.
    pub fn customers(&self) -> Vec<CustomerRecord> {
        self.customers.iter().cloned().collect()
    }

    pub fn customer(&self, sequence: SequenceNumber) -> Option<&CustomerRecord> {
        self.customers.get(sequence)
    }

    pub fn next_customer(&self) -> Option<&CustomerRecord> {
        self.customers.peek_head()
    }

    pub fn customer_count(&self) -> usize {
        self.customers.len()
    }

    /// Stored parcels, largest first.
    pub fn parcels(&self) -> Vec<ParcelRecord> {
        self.parcels.snapshot()
    }

    pub fn parcel_count(&self) -> usize {
        self.parcels.len()
    }

    /// First queued customer whose parcel list names `parcel_id`.
    pub fn owner_of(&self, parcel_id: &str) -> Option<&CustomerRecord> {
        self.customers.iter().find(|c| c.holds(parcel_id))
    }

    pub fn classify(&self, parcel: &ParcelRecord) -> ParcelClass {
        self.fee_policy.classify(parcel)
    }

    pub fn fee_for(&self, parcel: &ParcelRecord) -> f64 {
        self.fee_policy.fee(parcel)
    }

    pub fn estimated_fee(&self, sequence: SequenceNumber) -> Option<f64> {
        let customer = self.customers.get(sequence)?;
        Some(self.fee_policy.estimated_fee(customer, &self.parcels))
    }

    pub fn last_processed(&self) -> Option<&LastProcessed> {
        self.fee_policy.last_processed()
    }

    pub fn is_parcel_processed(&self, parcel_id: &str) -> bool {
        self.processed.contains(parcel_id)
    }

    /// Processing history in the order parcels were handled.
    pub fn processed_parcels(&self) -> Vec<ProcessedEntry> {
        self.history.clone()
    }

    pub fn audit_log(&self) -> &L {
        &self.audit
    }

    pub fn clear_audit_log(&mut self) -> Result<()> {
        self.audit.clear()
    }

    /// Flushes the audit log and hands it back.
    pub fn shutdown(mut self) -> Result<L> {
        self.audit.flush()?;
        tracing::debug!("Depot service shut down");
        Ok(self.audit)
    }
}
