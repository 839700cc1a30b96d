use std::collections::HashSet;

use uuid::Uuid;

use mdmgen_core::Record;

/// Identities consumed by exclusive link phases during one run.
///
/// A single ledger is shared by every exclusive phase, so an identity claimed
/// by one link type is also unavailable to the others. Phases receive it
/// explicitly from [`super::link_dataset`].
#[derive(Debug, Clone, Default)]
pub struct ExclusivityLedger {
    claimed: HashSet<Uuid>,
}

impl ExclusivityLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_claimed(&self, id: Uuid) -> bool {
        self.claimed.contains(&id)
    }

    /// Mark both ends of a link as consumed.
    pub fn claim_pair(&mut self, source: Uuid, target: Uuid) {
        self.claimed.insert(source);
        self.claimed.insert(target);
    }

    /// Positions of the records whose identity has not been claimed.
    pub fn unclaimed<T: Record>(&self, records: &[T]) -> Vec<usize> {
        records
            .iter()
            .enumerate()
            .filter(|(_, record)| !self.is_claimed(record.id()))
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.claimed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }
}
