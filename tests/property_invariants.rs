use std::collections::BTreeSet;
use std::fs;

use proptest::prelude::*;
use tempfile::TempDir;

use parcel_depot::core::customer_queue::CustomerQueue;
use parcel_depot::domain::model::{CustomerRecord, SequenceNumber};
use parcel_depot::{DepotError, DepotService, LocalStorage, MemoryAuditLog};

#[derive(Debug, Clone)]
enum Action {
    Add { name_idx: u8 },
    Delete { target: u8 },
    Process,
}

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        3 => (0u8..8).prop_map(|name_idx| Action::Add { name_idx }),
        2 => (0u8..32).prop_map(|target| Action::Delete { target }),
        1 => Just(Action::Process),
    ]
}

fn fresh_service(dir: &TempDir) -> DepotService<LocalStorage, MemoryAuditLog> {
    fs::write(dir.path().join("Custs.csv"), "Alice,P1\n").unwrap();
    fs::write(dir.path().join("Parcels.csv"), "P1,1,1,1,1,1\n").unwrap();
    let storage = LocalStorage::new(dir.path().to_str().unwrap().to_string());
    let mut service = DepotService::new(storage, MemoryAuditLog::new());
    service.load("Custs.csv", "Parcels.csv").unwrap();
    service
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn sequence_numbers_strictly_increase_and_are_never_reused(
        actions in prop::collection::vec(action_strategy(), 1..40)
    ) {
        let dir = TempDir::new().unwrap();
        let mut service = fresh_service(&dir);
        let mut issued: Vec<SequenceNumber> = vec![1];
        let mut deleted: BTreeSet<SequenceNumber> = BTreeSet::new();

        for action in actions {
            match action {
                Action::Add { name_idx } => {
                    let seq = service
                        .add_customer(&format!("C{name_idx}"), &[format!("P{name_idx}")])
                        .unwrap();
                    prop_assert!(seq > *issued.last().unwrap());
                    prop_assert!(!deleted.contains(&seq));
                    issued.push(seq);
                }
                Action::Delete { target } => {
                    let seq = SequenceNumber::from(target);
                    let queued = service.customer(seq).is_some();
                    match service.delete_customer(seq) {
                        Ok(removed) => {
                            prop_assert!(queued);
                            prop_assert_eq!(removed.sequence, seq);
                            deleted.insert(seq);
                            let gone = matches!(
                                service.delete_customer(seq),
                                Err(DepotError::CustomerNotFound { .. })
                            );
                            prop_assert!(gone, "customer {} deleted twice", seq);
                        }
                        Err(e) => {
                            prop_assert!(!queued);
                            prop_assert!(
                                matches!(e, DepotError::CustomerNotFound { .. }),
                                "unexpected error: {:?}", e
                            );
                        }
                    }
                }
                Action::Process => {
                    let before = service.customer_count();
                    match service.process_next() {
                        Ok(_) => prop_assert_eq!(service.customer_count(), before - 1),
                        Err(e) => {
                            prop_assert!(matches!(e, DepotError::EmptyQueue));
                            prop_assert_eq!(before, 0);
                        }
                    }
                }
            }

            let sequences: Vec<SequenceNumber> =
                service.customers().iter().map(|c| c.sequence).collect();
            prop_assert!(sequences.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn queue_removal_preserves_relative_order(
        count in 1usize..20,
        removals in prop::collection::vec(0u32..25, 0..10)
    ) {
        let mut queue = CustomerQueue::new();
        let mut model: Vec<SequenceNumber> = Vec::new();
        for i in 1..=count as SequenceNumber {
            queue.enqueue(CustomerRecord::new(i, format!("C{i}"), vec![]));
            model.push(i);
        }

        for target in removals {
            let result = queue.remove_by_sequence(target);
            match model.iter().position(|s| *s == target) {
                Some(pos) => {
                    model.remove(pos);
                    prop_assert_eq!(result.unwrap().sequence, target);
                }
                None => prop_assert!(result.is_err()),
            }
            let actual: Vec<SequenceNumber> = queue.iter().map(|c| c.sequence).collect();
            prop_assert_eq!(&actual, &model);
            prop_assert_eq!(queue.len(), model.len());
        }
    }
}
