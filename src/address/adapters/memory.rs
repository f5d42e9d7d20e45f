//! In-memory address lookup for tests and deterministic flows.

use crate::address::{
    domain::{AddressRecord, Postcode},
    ports::{AddressLookup, AddressLookupError, AddressLookupResult},
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Thread-safe in-memory address lookup.
///
/// Postcodes without canned records answer with an empty list; postcodes
/// registered through [`Self::fail_with`] answer with the given error.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAddressLookup {
    state: Arc<RwLock<InMemoryLookupState>>,
}

#[derive(Debug, Default)]
struct InMemoryLookupState {
    records: HashMap<Postcode, Vec<AddressRecord>>,
    failures: HashMap<Postcode, AddressLookupError>,
    calls: Vec<Postcode>,
}

impl InMemoryAddressLookup {
    /// Creates an empty lookup.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the records served for a postcode.
    pub fn insert(&self, postcode: Postcode, records: Vec<AddressRecord>) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.failures.remove(&postcode);
        state.records.insert(postcode, records);
    }

    /// Makes lookups for a postcode fail with `error`.
    pub fn fail_with(&self, postcode: Postcode, error: AddressLookupError) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.records.remove(&postcode);
        state.failures.insert(postcode, error);
    }

    /// Returns every postcode looked up so far, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<Postcode> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .calls
            .clone()
    }
}

#[async_trait]
impl AddressLookup for InMemoryAddressLookup {
    async fn find(&self, postcode: &Postcode) -> AddressLookupResult<Vec<AddressRecord>> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.calls.push(postcode.clone());
        if let Some(error) = state.failures.get(postcode) {
            return Err(error.clone());
        }
        Ok(state.records.get(postcode).cloned().unwrap_or_default())
    }
}
