pub mod args;
pub mod cycle;
pub mod pacing;
pub mod rounds;
pub mod session;
pub mod shutdown;
pub mod status;

pub use args::{parse_runtime_args, RuntimeArgs};
pub use cycle::{AccountOutcome, CycleScheduler, CycleTally, CycleTimings};
pub use rounds::{AccountReport, RoundScheduler, RunReport};
pub use session::{RunControl, Session};
pub use shutdown::{on_interrupt, spawn_interrupt_handler, SignalResponse};
pub use status::emit_startup_status;
