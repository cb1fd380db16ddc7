use crate::runtime::session::{RunControl, Session};
use std::sync::Arc;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalResponse {
    /// Stop requested; the current task finishes before the loop exits.
    GracefulStop,
    ExitIdle,
    ForceExit,
}

impl SignalResponse {
    pub fn exit_code(self) -> Option<i32> {
        match self {
            Self::GracefulStop => None,
            Self::ExitIdle => Some(0),
            Self::ForceExit => Some(1),
        }
    }
}

/// Decides what one interrupt means given the current run state.
pub fn on_interrupt(control: &RunControl) -> SignalResponse {
    if control.is_stop_requested() {
        SignalResponse::ForceExit
    } else if !control.is_running() {
        SignalResponse::ExitIdle
    } else {
        control.request_stop();
        SignalResponse::GracefulStop
    }
}

pub fn spawn_interrupt_handler(session: Arc<Session>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!("[SHUTDOWN] Failed to listen for Ctrl-C: {err}");
                return;
            }
            let response = on_interrupt(session.control());
            match response {
                SignalResponse::GracefulStop => tracing::warn!(
                    "[SHUTDOWN] Stop request received. Finishing current task before exiting..."
                ),
                SignalResponse::ExitIdle => tracing::info!("[SHUTDOWN] Not running, exiting."),
                SignalResponse::ForceExit => tracing::error!("[SHUTDOWN] Forcing exit!"),
            }
            if let Some(code) = response.exit_code() {
                std::process::exit(code);
            }
        }
    })
}
