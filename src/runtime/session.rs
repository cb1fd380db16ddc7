use crate::config::chains::ChainConfig;
use crate::executor::nonce::NonceAllocator;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio_util::sync::CancellationToken;

/// Process-wide run flags. The stop token is set at most once and never reset.
#[derive(Debug, Default)]
pub struct RunControl {
    stop: CancellationToken,
    running: AtomicBool,
}

impl RunControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop_token(&self) -> &CancellationToken {
        &self.stop
    }

    pub fn request_stop(&self) {
        self.stop.cancel();
    }

    pub fn is_stop_requested(&self) -> bool {
        self.stop.is_cancelled()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Marks the run loop active until the returned guard is dropped.
    pub fn enter_running(&self) -> RunningGuard<'_> {
        self.running.store(true, Ordering::SeqCst);
        RunningGuard { control: self }
    }
}

pub struct RunningGuard<'a> {
    control: &'a RunControl,
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.control.running.store(false, Ordering::SeqCst);
    }
}

/// Orchestration state shared by every layer of one run.
#[derive(Debug)]
pub struct Session {
    chain: ChainConfig,
    nonces: NonceAllocator,
    control: RunControl,
}

impl Session {
    pub fn new(chain: ChainConfig) -> Self {
        Self {
            chain,
            nonces: NonceAllocator::new(),
            control: RunControl::new(),
        }
    }

    pub fn chain(&self) -> &ChainConfig {
        &self.chain
    }

    pub fn nonces(&self) -> &NonceAllocator {
        &self.nonces
    }

    pub fn control(&self) -> &RunControl {
        &self.control
    }

    pub fn stop_token(&self) -> &CancellationToken {
        self.control.stop_token()
    }
}
