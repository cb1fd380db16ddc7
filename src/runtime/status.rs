use crate::config::chains::ChainConfig;
use crate::runtime::RuntimeArgs;
use crate::utils::config::RunConfig;
use crate::utils::hex::short_address;

pub fn emit_startup_status(
    runtime_args: &RuntimeArgs,
    chain: &ChainConfig,
    config: &RunConfig,
    accounts: usize,
    proxies: usize,
) {
    tracing::info!(
        "[OPS] Network resolved: chain={}({}) rpc={} contract={}",
        chain.chain_id,
        chain.name,
        chain.rpc_url,
        short_address(chain.contract)
    );
    tracing::info!(
        "[OPS] Files: config={} accounts={} proxies={}",
        runtime_args.config_path.display(),
        runtime_args.accounts_path.display(),
        runtime_args.proxies_path.display()
    );
    let routing = if proxies == 0 {
        "direct".to_string()
    } else {
        format!("{proxies} proxies round-robin")
    };
    tracing::info!(
        "[OPS] Run plan: accounts={} routing={} cycles_per_account={} encrypt=[{:.6}, {:.6}] decrypt=[{:.6}, {:.6}] wait_hours={}",
        accounts,
        routing,
        config.cycle_count,
        config.encrypt_range.min,
        config.encrypt_range.max,
        config.decrypt_range.min,
        config.decrypt_range.max,
        config.wait_hours
    );
}
