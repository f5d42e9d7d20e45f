//! Service turning a postcode into selectable address candidates.

use crate::address::{
    domain::{AddressCandidate, Postcode},
    ports::AddressLookup,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Address resolution service.
///
/// Resolution never fails: a lookup error is logged and yields no
/// candidates, leaving the caller free to render the rest of its view.
#[derive(Clone)]
pub struct AddressResolutionService<L>
where
    L: AddressLookup,
{
    lookup: Arc<L>,
}

impl<L> AddressResolutionService<L>
where
    L: AddressLookup,
{
    /// Creates a new resolution service.
    #[must_use]
    pub const fn new(lookup: Arc<L>) -> Self {
        Self { lookup }
    }

    /// Resolves a postcode to one display candidate per record, in source
    /// order.
    pub async fn resolve(&self, postcode: &Postcode) -> Vec<AddressCandidate> {
        match self.lookup.find(postcode).await {
            Ok(records) => {
                let candidates: Vec<_> =
                    records.iter().map(AddressCandidate::from_record).collect();
                debug!(
                    postcode = %postcode,
                    records = records.len(),
                    candidates = candidates.len(),
                    "resolved address candidates"
                );
                candidates
            }
            Err(error) => {
                warn!(postcode = %postcode, error = %error, "address lookup failed");
                Vec::new()
            }
        }
    }
}
