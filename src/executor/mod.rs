//! Transaction pipeline: connect, number, price, sign, submit and confirm one action.

pub mod actions;
pub mod fees;
pub mod nonce;

use crate::core::{Account, ProxyEndpoint};
use crate::error::{ActionError, SubmissionErrorKind};
use crate::executor::actions::ActionDescriptor;
use crate::executor::fees::estimate_fee_strategy;
use crate::runtime::session::Session;
use crate::utils::hex::{short_address, short_hash};
use crate::utils::rpc::Connector;
use alloy::eips::eip2718::Encodable2718;
use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::{Address, Bytes, TxHash};
use std::sync::Arc;
use std::time::Duration;

pub use actions::{perform_claim, perform_decrypt, perform_encrypt};

pub const CONFIRMATION_TIMEOUT_SECS: u64 = 120;

pub struct TxPipeline {
    session: Arc<Session>,
    connector: Arc<dyn Connector>,
    confirmation_timeout: Duration,
}

impl TxPipeline {
    pub fn new(session: Arc<Session>, connector: Arc<dyn Connector>) -> Self {
        Self {
            session,
            connector,
            confirmation_timeout: Duration::from_secs(CONFIRMATION_TIMEOUT_SECS),
        }
    }

    pub fn with_confirmation_timeout(mut self, timeout: Duration) -> Self {
        self.confirmation_timeout = timeout;
        self
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn connector(&self) -> &Arc<dyn Connector> {
        &self.connector
    }

    pub fn contract(&self) -> Address {
        self.session.chain().contract
    }

    /// Runs one attempt end to end. No retries; every failure is logged here.
    pub async fn submit(
        &self,
        account: &Account,
        descriptor: ActionDescriptor,
        proxy: Option<&ProxyEndpoint>,
        label: &str,
    ) -> Result<TxHash, ActionError> {
        let result = self.submit_inner(account, descriptor, proxy, label).await;
        if let Err(err) = &result {
            if err.is_cancelled() {
                tracing::warn!(
                    "[EXEC] {label} skipped for {}: {err}",
                    short_address(account.address())
                );
            } else {
                tracing::error!("[EXEC] Failed to send {label} transaction: {err}");
            }
        }
        result
    }

    async fn submit_inner(
        &self,
        account: &Account,
        descriptor: ActionDescriptor,
        proxy: Option<&ProxyEndpoint>,
        label: &str,
    ) -> Result<TxHash, ActionError> {
        let client = self.connector.connect(proxy)?;
        let chain_id = self.session.chain().chain_id;
        let from = account.address();

        let nonce = self
            .session
            .nonces()
            .allocate(client.as_ref(), chain_id, from, self.session.stop_token())
            .await?;
        let fees = estimate_fee_strategy(client.as_ref()).await;
        let request = descriptor.into_request(from, chain_id, nonce, fees);

        let wallet = EthereumWallet::from(account.signer().clone());
        let signed = request
            .build(&wallet)
            .await
            .map_err(|err| ActionError::Signing(err.to_string()))?;
        let raw = Bytes::from(signed.encoded_2718());

        let pending = match client.send_raw_transaction(raw).await {
            Ok(pending) => pending,
            Err(rejection) => {
                if rejection.kind == SubmissionErrorKind::NonceConflict {
                    tracing::warn!(
                        "[NONCE] Nonce error detected, resetting nonce for the next attempt."
                    );
                    self.session.nonces().evict(chain_id, from);
                }
                return Err(rejection.into());
            }
        };

        let hash = pending.tx_hash();
        tracing::info!(
            "[EXEC] {label} sent. Awaiting confirmation... Hash: {}",
            short_hash(hash)
        );

        match tokio::time::timeout(self.confirmation_timeout, pending.wait()).await {
            Err(_) => Err(ActionError::ConfirmationTimeout {
                hash,
                waited_secs: self.confirmation_timeout.as_secs(),
            }),
            Ok(Err(reason)) => Err(ActionError::Confirmation { hash, reason }),
            Ok(Ok(false)) => Err(ActionError::Reverted { hash }),
            Ok(Ok(true)) => {
                tracing::info!(
                    "[EXEC] {label} confirmed successfully! Hash: {}",
                    short_hash(hash)
                );
                Ok(hash)
            }
        }
    }
}
