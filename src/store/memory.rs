//! # In-Memory Store
//!
//! Ordered list of circuits with sequential ids. Ids come from a monotonic
//! counter so a deleted id is never handed out again.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use tracing::debug;

use super::errors::{StoreError, StoreResult};
use super::CircuitStore;
use crate::circuit::{reference_circuits, Circuit, CircuitFields, CircuitId};

#[derive(Debug)]
struct Inner {
    circuits: Vec<Circuit>,
    next_id: u64,
}

impl Inner {
    fn position(&self, id: u64) -> Option<usize> {
        self.circuits
            .iter()
            .position(|c| c.id == CircuitId::Seq(id))
    }
}

/// In-memory circuit store
#[derive(Debug)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Empty store; the first circuit gets id 1
    pub fn new() -> Self {
        Self::with_circuits(Vec::new())
    }

    /// Store pre-loaded with the reference circuits
    pub fn seeded() -> Self {
        Self::with_circuits(reference_circuits())
    }

    /// Store pre-loaded with the given circuits.
    ///
    /// Non-sequential ids are kept but ignored when picking the next id.
    pub fn with_circuits(circuits: Vec<Circuit>) -> Self {
        let next_id = circuits
            .iter()
            .filter_map(|c| match c.id {
                CircuitId::Seq(n) => Some(n),
                CircuitId::Key(_) => None,
            })
            .max()
            .unwrap_or(0)
            + 1;

        Self {
            inner: RwLock::new(Inner { circuits, next_id }),
        }
    }

    /// Number of stored circuits
    pub fn len(&self) -> usize {
        self.read().circuits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A panic while holding the lock cannot leave the list half-written, so a
    // poisoned lock is still safe to use.
    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Sequential ids only; anything else names no circuit
fn parse_id(id: &str) -> Option<u64> {
    id.trim().parse().ok()
}

#[async_trait]
impl CircuitStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn list_all(&self) -> StoreResult<Vec<Circuit>> {
        Ok(self.read().circuits.clone())
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Circuit>> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };
        let inner = self.read();
        Ok(inner.position(id).map(|idx| inner.circuits[idx].clone()))
    }

    async fn insert(
        &self,
        fields: CircuitFields,
        image_path: Option<String>,
    ) -> StoreResult<Circuit> {
        let mut inner = self.write();
        let id = inner.next_id;
        inner.next_id += 1;

        let circuit = Circuit::create(CircuitId::Seq(id), fields, image_path);
        inner.circuits.push(circuit.clone());

        debug!(id, slug = %circuit.slug, "inserted circuit");
        Ok(circuit)
    }

    async fn update(
        &self,
        id: &str,
        fields: CircuitFields,
        image_path: Option<String>,
    ) -> StoreResult<Circuit> {
        let not_found = || StoreError::NotFound(id.to_string());
        let seq = parse_id(id).ok_or_else(not_found)?;

        let mut inner = self.write();
        let idx = inner.position(seq).ok_or_else(not_found)?;
        let circuit = &mut inner.circuits[idx];
        circuit.apply(fields, image_path);

        debug!(id = seq, slug = %circuit.slug, "updated circuit");
        Ok(circuit.clone())
    }

    async fn delete(&self, id: &str) -> StoreResult<Circuit> {
        let not_found = || StoreError::NotFound(id.to_string());
        let seq = parse_id(id).ok_or_else(not_found)?;

        let mut inner = self.write();
        let idx = inner.position(seq).ok_or_else(not_found)?;
        let removed = inner.circuits.remove(idx);

        debug!(id = seq, "deleted circuit");
        Ok(removed)
    }
}
