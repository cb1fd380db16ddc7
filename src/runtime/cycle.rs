//! Per-account encrypt -> decrypt -> claim cycles.

use crate::core::{Account, ProxyEndpoint};
use crate::error::{AccountError, ActionError};
use crate::executor::{perform_claim, perform_decrypt, perform_encrypt, TxPipeline};
use crate::runtime::pacing::pause;
use crate::utils::config::RunConfig;
use crate::utils::hex::short_address;
use alloy::primitives::utils::format_ether;
use alloy::primitives::U256;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleTimings {
    pub after_encrypt: Duration,
    pub after_decrypt: Duration,
    pub after_failure: Duration,
    pub between_cycles: Duration,
}

impl Default for CycleTimings {
    fn default() -> Self {
        Self {
            after_encrypt: Duration::from_secs(30),
            after_decrypt: Duration::from_secs(15),
            after_failure: Duration::from_secs(10),
            between_cycles: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CycleTally {
    pub completed: u32,
    pub failed: u32,
    /// Set when a stop request cut the account short.
    pub stopped: bool,
}

#[derive(Debug)]
pub enum AccountOutcome {
    BalanceCheckFailed(AccountError),
    Done(CycleTally),
}

impl AccountOutcome {
    pub fn tally(&self) -> Option<CycleTally> {
        match self {
            Self::Done(tally) => Some(*tally),
            Self::BalanceCheckFailed(_) => None,
        }
    }
}

enum CycleEnd {
    Completed,
    Interrupted,
}

pub struct CycleScheduler {
    pipeline: Arc<TxPipeline>,
    config: RunConfig,
    timings: CycleTimings,
}

impl CycleScheduler {
    pub fn new(pipeline: Arc<TxPipeline>, config: RunConfig) -> Self {
        Self {
            pipeline,
            config,
            timings: CycleTimings::default(),
        }
    }

    pub fn with_timings(mut self, timings: CycleTimings) -> Self {
        self.timings = timings;
        self
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn pipeline(&self) -> &Arc<TxPipeline> {
        &self.pipeline
    }

    async fn check_balance(
        &self,
        account: &Account,
        proxy: Option<&ProxyEndpoint>,
    ) -> Result<U256, AccountError> {
        let client = self.pipeline.connector().connect(proxy)?;
        client
            .balance(account.address())
            .await
            .map_err(|err| AccountError::BalanceQuery(err.to_string()))
    }

    /// Runs every configured cycle for one account. Failures stay inside the account.
    pub async fn run_account<R: Rng + Send>(
        &self,
        index: usize,
        account: &Account,
        proxy: Option<&ProxyEndpoint>,
        rng: &mut R,
    ) -> AccountOutcome {
        let number = index + 1;
        tracing::info!(
            "[CYCLE] Processing Account #{number} | Address: {}",
            short_address(account.address())
        );
        if let Some(proxy) = proxy {
            tracing::info!("[CYCLE] Using proxy: {proxy}");
        }

        match self.check_balance(account, proxy).await {
            Ok(balance) => {
                let ether = format_ether(balance);
                let shown = ether
                    .parse::<f64>()
                    .map(|value| format!("{value:.6}"))
                    .unwrap_or(ether);
                tracing::info!("[CYCLE] Initial Balance: {shown} ETH");
            }
            Err(err) => {
                tracing::error!("[CYCLE] Failed to check balance: {err}");
                return AccountOutcome::BalanceCheckFailed(err);
            }
        }

        let stop = self.pipeline.session().stop_token();
        let total = self.config.cycle_count;
        let mut tally = CycleTally::default();

        for cycle in 1..=total {
            if stop.is_cancelled() {
                tally.stopped = true;
                break;
            }
            tracing::info!("[CYCLE] Starting Cycle {cycle} of {total}...");
            match self.run_cycle(account, proxy, &mut *rng).await {
                Ok(CycleEnd::Completed) => {
                    tally.completed += 1;
                    tracing::info!("[CYCLE] Cycle {cycle} for Account #{number} completed.");
                    if cycle < total {
                        pause(stop, self.timings.between_cycles).await;
                    }
                }
                Ok(CycleEnd::Interrupted) => {
                    tally.stopped = true;
                    break;
                }
                Err(err) if err.is_cancelled() => {
                    tally.stopped = true;
                    break;
                }
                Err(err) => {
                    tally.failed += 1;
                    tracing::error!("[CYCLE] An error occurred during cycle {cycle}: {err}");
                    tracing::warn!(
                        "[CYCLE] Continuing to the next cycle/account after a short delay..."
                    );
                    pause(stop, self.timings.after_failure).await;
                }
            }
        }
        if stop.is_cancelled() {
            tally.stopped = true;
        }

        tracing::info!("[CYCLE] All cycles for Account #{number} have been completed.");
        AccountOutcome::Done(tally)
    }

    async fn run_cycle<R: Rng + Send>(
        &self,
        account: &Account,
        proxy: Option<&ProxyEndpoint>,
        rng: &mut R,
    ) -> Result<CycleEnd, ActionError> {
        let stop = self.pipeline.session().stop_token();

        let encrypt_amount = self.config.encrypt_range.sample(&mut *rng);
        tracing::info!("[CYCLE] Attempting to encrypt {encrypt_amount:.6} ETH");
        perform_encrypt(&self.pipeline, account, proxy, encrypt_amount).await?;
        if !pause(stop, self.timings.after_encrypt).await {
            return Ok(CycleEnd::Interrupted);
        }

        let decrypt_amount = self.config.decrypt_range.sample(&mut *rng);
        tracing::info!("[CYCLE] Attempting to decrypt {decrypt_amount:.6} eETH");
        perform_decrypt(&self.pipeline, account, proxy, decrypt_amount).await?;
        if !pause(stop, self.timings.after_decrypt).await {
            return Ok(CycleEnd::Interrupted);
        }

        tracing::info!("[CYCLE] Attempting to claim decrypted ETH");
        perform_claim(&self.pipeline, account, proxy).await?;
        Ok(CycleEnd::Completed)
    }
}
