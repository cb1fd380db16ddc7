use crate::core::{proxy_for, Account, ProxyEndpoint};
use crate::runtime::cycle::{AccountOutcome, CycleScheduler};
use crate::runtime::pacing::{format_duration, pause};
use alloy::primitives::Address;
use rand::Rng;
use std::time::Duration;

pub const ACCOUNT_GAP_MIN_SECS: u64 = 60;
pub const ACCOUNT_GAP_MAX_SECS: u64 = 180;

#[derive(Debug)]
pub struct AccountReport {
    pub round: u64,
    pub index: usize,
    pub address: Address,
    pub outcome: AccountOutcome,
}

#[derive(Debug, Default)]
pub struct RunReport {
    /// Passes that reached every account.
    pub rounds_completed: u64,
    pub accounts: Vec<AccountReport>,
}

/// Drives every account in order, round after round, until a stop is requested.
pub struct RoundScheduler {
    cycles: CycleScheduler,
    accounts: Vec<Account>,
    proxies: Vec<ProxyEndpoint>,
}

impl RoundScheduler {
    pub fn new(cycles: CycleScheduler, accounts: Vec<Account>, proxies: Vec<ProxyEndpoint>) -> Self {
        Self {
            cycles,
            accounts,
            proxies,
        }
    }

    pub async fn run<R: Rng + Send>(&self, rng: &mut R) -> RunReport {
        let session = self.cycles.pipeline().session().clone();
        let control = session.control();
        let stop = control.stop_token();
        let _running = control.enter_running();
        let mut report = RunReport::default();

        tracing::info!(
            "[ROUND] Bot started! Accounts: {} | Proxies: {} | Cycles per account: {}.",
            self.accounts.len(),
            self.proxies.len(),
            self.cycles.config().cycle_count
        );

        while !stop.is_cancelled() {
            let round = report.rounds_completed + 1;
            tracing::info!("[ROUND] Starting round {round} for all accounts...");
            for (index, account) in self.accounts.iter().enumerate() {
                if stop.is_cancelled() {
                    break;
                }
                let proxy = proxy_for(index, &self.proxies);
                let outcome = self.cycles.run_account(index, account, proxy, &mut *rng).await;
                report.accounts.push(AccountReport {
                    round,
                    index,
                    address: account.address(),
                    outcome,
                });

                if index + 1 < self.accounts.len() && !stop.is_cancelled() {
                    let gap = Duration::from_secs(
                        rng.gen_range(ACCOUNT_GAP_MIN_SECS..=ACCOUNT_GAP_MAX_SECS),
                    );
                    tracing::info!(
                        "[ROUND] Waiting {} before the next account...",
                        format_duration(gap)
                    );
                    pause(stop, gap).await;
                }
            }

            if stop.is_cancelled() {
                break;
            }
            report.rounds_completed = round;

            let wait = self.cycles.config().inter_round_wait();
            tracing::info!(
                "[ROUND] All accounts processed. Next round will begin in {} hours ({}).",
                self.cycles.config().wait_hours,
                format_duration(wait)
            );
            pause(stop, wait).await;
        }

        tracing::info!("[ROUND] Bot has been stopped by the user.");
        report
    }
}
