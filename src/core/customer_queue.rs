use crate::domain::model::{CustomerRecord, SequenceNumber};
use crate::utils::error::{DepotError, Result};
use std::collections::{HashMap, VecDeque};

/// FIFO of customers waiting at the counter.
///
/// Records live in an arena keyed by sequence number; `order` holds the
/// arrival order. Both always contain the same set of sequence numbers.
#[derive(Debug, Default, Clone)]
pub struct CustomerQueue {
    records: HashMap<SequenceNumber, CustomerRecord>,
    order: VecDeque<SequenceNumber>,
}

impl CustomerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, record: CustomerRecord) {
        let sequence = record.sequence;
        debug_assert!(
            !self.records.contains_key(&sequence),
            "sequence number {} enqueued twice",
            sequence
        );
        self.records.insert(sequence, record);
        self.order.push_back(sequence);
    }

    pub fn dequeue(&mut self) -> Option<CustomerRecord> {
        let sequence = self.order.pop_front()?;
        self.records.remove(&sequence)
    }

    /// Removes the customer with `sequence` wherever it sits in the queue.
    pub fn remove_by_sequence(&mut self, sequence: SequenceNumber) -> Result<CustomerRecord> {
        let position = self
            .order
            .iter()
            .position(|s| *s == sequence)
            .ok_or(DepotError::CustomerNotFound { sequence })?;
        self.order.remove(position);
        self.records
            .remove(&sequence)
            .ok_or(DepotError::CustomerNotFound { sequence })
    }

    pub fn peek_head(&self) -> Option<&CustomerRecord> {
        self.order.front().and_then(|s| self.records.get(s))
    }

    pub fn get(&self, sequence: SequenceNumber) -> Option<&CustomerRecord> {
        self.records.get(&sequence)
    }

    pub fn get_mut(&mut self, sequence: SequenceNumber) -> Option<&mut CustomerRecord> {
        self.records.get_mut(&sequence)
    }

    pub fn contains(&self, sequence: SequenceNumber) -> bool {
        self.records.contains_key(&sequence)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Customers in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = &CustomerRecord> {
        self.order.iter().filter_map(|s| self.records.get(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue_of(names: &[&str]) -> CustomerQueue {
        let mut queue = CustomerQueue::new();
        for (i, name) in names.iter().enumerate() {
            queue.enqueue(CustomerRecord::new(i as SequenceNumber + 1, *name, vec![]));
        }
        queue
    }

    fn names(queue: &CustomerQueue) -> Vec<&str> {
        queue.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_fifo_order() {
        let mut queue = queue_of(&["Alice", "Bob", "Carol"]);
        assert_eq!(queue.peek_head().map(|c| c.sequence), Some(1));
        assert_eq!(queue.dequeue().map(|c| c.name), Some("Alice".to_string()));
        assert_eq!(queue.dequeue().map(|c| c.name), Some("Bob".to_string()));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.dequeue().map(|c| c.name), Some("Carol".to_string()));
        assert!(queue.dequeue().is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_remove_by_sequence_preserves_order() {
        let mut queue = queue_of(&["Alice", "Bob", "Carol", "Dave"]);

        let removed = queue.remove_by_sequence(2).unwrap();
        assert_eq!(removed.name, "Bob");
        assert_eq!(names(&queue), vec!["Alice", "Carol", "Dave"]);
        assert_eq!(queue.len(), 3);

        queue.remove_by_sequence(1).unwrap();
        assert_eq!(queue.peek_head().map(|c| c.name.as_str()), Some("Carol"));
    }

    #[test]
    fn test_remove_missing_sequence_fails() {
        let mut queue = queue_of(&["Alice"]);
        assert!(matches!(
            queue.remove_by_sequence(42),
            Err(DepotError::CustomerNotFound { sequence: 42 })
        ));
        queue.remove_by_sequence(1).unwrap();
        assert!(matches!(
            queue.remove_by_sequence(1),
            Err(DepotError::CustomerNotFound { sequence: 1 })
        ));
    }

    #[test]
    fn test_get_mut_updates_parcels() {
        let mut queue = queue_of(&["Alice", "Bob"]);
        queue.get_mut(2).unwrap().add_parcel("P9");
        assert!(queue.get(2).unwrap().holds("P9"));
        assert!(!queue.contains(3));
    }
}
