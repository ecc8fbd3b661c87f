use crate::domain::model::ParcelRecord;
use std::collections::HashMap;

/// Parcels awaiting collection, keyed by parcel ID.
///
/// Insertion order is tracked only so that equal-volume parcels keep a
/// stable order in snapshots.
#[derive(Debug, Default, Clone)]
pub struct ParcelStore {
    records: HashMap<String, ParcelRecord>,
    order: Vec<String>,
}

impl ParcelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites by ID. Returns the record that was replaced.
    pub fn add(&mut self, record: ParcelRecord) -> Option<ParcelRecord> {
        let id = record.id.clone();
        let previous = self.records.insert(id.clone(), record);
        // 覆寫時保留原本的位置
        if previous.is_none() {
            self.order.push(id);
        }
        previous
    }

    pub fn get(&self, id: &str) -> Option<&ParcelRecord> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    pub fn remove(&mut self, id: &str) -> Option<ParcelRecord> {
        let removed = self.records.remove(id)?;
        self.order.retain(|existing| existing != id);
        Some(removed)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ParcelRecord> {
        self.order.iter().filter_map(|id| self.records.get(id))
    }

    /// 依體積由大到小排序的複本；體積相同時保留插入順序
    pub fn snapshot(&self) -> Vec<ParcelRecord> {
        let mut parcels: Vec<ParcelRecord> = self.iter().cloned().collect();
        parcels.sort_by(|a, b| b.volume().total_cmp(&a.volume()));
        parcels
    }

    /// Replaces the store with a fresh one built from the sorted snapshot.
    pub fn rebuild_sorted(&mut self) {
        let mut rebuilt = ParcelStore::new();
        for parcel in self.snapshot() {
            rebuilt.add(parcel);
        }
        *self = rebuilt;
    }
}

impl FromIterator<ParcelRecord> for ParcelStore {
    fn from_iter<I: IntoIterator<Item = ParcelRecord>>(iter: I) -> Self {
        let mut store = ParcelStore::new();
        for parcel in iter {
            store.add(parcel);
        }
        store
    }
}
