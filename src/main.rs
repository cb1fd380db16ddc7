//! Env-driven runner binary. Reads `.env`, `config.json`, `pk.txt` and `proxy.txt`
//! from the working directory and cycles every account until Ctrl-C.

use rand::rngs::StdRng;
use rand::SeedableRng;
use redact_cycler::config::chains::ChainConfig;
use redact_cycler::executor::TxPipeline;
use redact_cycler::runtime::{
    emit_startup_status, parse_runtime_args, spawn_interrupt_handler, CycleScheduler,
    RoundScheduler, Session,
};
use redact_cycler::storage::{load_accounts, load_proxies};
use redact_cycler::utils::config::load_run_config;
use redact_cycler::utils::rpc::HttpConnector;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load `.env` first so file locations and network overrides are visible below.
    redact_cycler::utils::env_guard::harden_env_setup();
    let runtime_args = parse_runtime_args()?;

    match std::env::var("RUST_LOG") {
        Ok(val) => println!("[STARTUP] RUST_LOG is set to: '{}'", val),
        Err(_) => println!("[STARTUP] RUST_LOG is unset."),
    }

    // Default to `info` when `RUST_LOG` is unset or invalid to avoid silent startup.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        println!("[STARTUP] RUST_LOG invalid or unset; defaulting to 'info'");
        tracing_subscriber::EnvFilter::new("info")
    });

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    println!("[STARTUP] Tracing initialized.");

    let chain = ChainConfig::from_env()?;
    let config = load_run_config(&runtime_args.config_path);
    let accounts = match load_accounts(&runtime_args.accounts_path) {
        Ok(accounts) => accounts,
        Err(err) => {
            tracing::error!("[LOAD] Failed to load accounts: {err}");
            std::process::exit(1);
        }
    };
    let proxies = load_proxies(&runtime_args.proxies_path);
    emit_startup_status(&runtime_args, &chain, &config, accounts.len(), proxies.len());

    let session = Arc::new(Session::new(chain.clone()));
    let _signals = spawn_interrupt_handler(session.clone());

    let connector = Arc::new(HttpConnector::new(chain));
    let pipeline = Arc::new(TxPipeline::new(session, connector));
    let scheduler = RoundScheduler::new(CycleScheduler::new(pipeline, config), accounts, proxies);

    let mut rng = StdRng::from_entropy();
    let report = scheduler.run(&mut rng).await;
    tracing::info!(
        "[OPS] Run finished after {} full rounds ({} account passes).",
        report.rounds_completed,
        report.accounts.len()
    );
    Ok(())
}
