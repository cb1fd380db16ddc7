//! Per-(chain, address) nonce allocation.
//!
//! Every allocation re-reads the pending count and hands out
//! `max(pending, last_allocated + 1)`, so numbers are strictly increasing for a
//! key and never fall behind what the node already knows about.

use crate::error::ActionError;
use crate::utils::hex::short_address;
use crate::utils::rpc::ChainClient;
use alloy::primitives::Address;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio_util::sync::CancellationToken;

type NonceKey = (u64, Address);

#[derive(Debug, Default)]
pub struct NonceAllocator {
    last_allocated: DashMap<NonceKey, u64>,
}

impl NonceAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records and returns the next nonce given a fresh pending count.
    pub fn reconcile(&self, chain_id: u64, address: Address, pending: u64) -> u64 {
        match self.last_allocated.entry((chain_id, address)) {
            Entry::Occupied(mut entry) => {
                let nonce = pending.max(entry.get().saturating_add(1));
                entry.insert(nonce);
                nonce
            }
            Entry::Vacant(entry) => {
                entry.insert(pending);
                pending
            }
        }
    }

    pub async fn allocate(
        &self,
        client: &dyn ChainClient,
        chain_id: u64,
        address: Address,
        stop: &CancellationToken,
    ) -> Result<u64, ActionError> {
        if stop.is_cancelled() {
            return Err(ActionError::Cancelled);
        }
        let pending = client
            .pending_nonce(address)
            .await
            .map_err(|err| ActionError::NonceQuery(err.to_string()))?;
        let nonce = self.reconcile(chain_id, address, pending);
        tracing::debug!(
            "[NONCE] {} on chain {}: pending={} allocated={}",
            short_address(address),
            chain_id,
            pending,
            nonce
        );
        Ok(nonce)
    }

    /// Forgets the last allocation so the next one trusts the node again.
    pub fn evict(&self, chain_id: u64, address: Address) {
        if self.last_allocated.remove(&(chain_id, address)).is_some() {
            tracing::debug!(
                "[NONCE] Cleared cached nonce for {} on chain {}",
                short_address(address),
                chain_id
            );
        }
    }

    pub fn last_allocated(&self, chain_id: u64, address: Address) -> Option<u64> {
        self.last_allocated
            .get(&(chain_id, address))
            .map(|entry| *entry)
    }
}
