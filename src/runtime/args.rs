use std::path::PathBuf;

pub const DEFAULT_CONFIG_FILE: &str = "config.json";
pub const DEFAULT_ACCOUNTS_FILE: &str = "pk.txt";
pub const DEFAULT_PROXY_FILE: &str = "proxy.txt";

/// File locations for one run, resolved from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeArgs {
    pub config_path: PathBuf,
    pub accounts_path: PathBuf,
    pub proxies_path: PathBuf,
}

fn path_from<F>(lookup: &F, key: &str, default: &str) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}

fn parse_runtime_args_from<I, S, F>(args: I, lookup: F) -> anyhow::Result<RuntimeArgs>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    F: Fn(&str) -> Option<String>,
{
    let supplied_args = args
        .into_iter()
        .map(|arg| arg.as_ref().to_string())
        .collect::<Vec<_>>();
    if !supplied_args.is_empty() {
        let joined = supplied_args.join(" ");
        return Err(anyhow::anyhow!(
            "CLI arguments are disabled in this build. Configure .env keys instead (REDACT_CONFIG_FILE, REDACT_ACCOUNTS_FILE, REDACT_PROXY_FILE, REDACT_RPC_URL). Received args: {}",
            joined
        ));
    }

    Ok(RuntimeArgs {
        config_path: path_from(&lookup, "REDACT_CONFIG_FILE", DEFAULT_CONFIG_FILE),
        accounts_path: path_from(&lookup, "REDACT_ACCOUNTS_FILE", DEFAULT_ACCOUNTS_FILE),
        proxies_path: path_from(&lookup, "REDACT_PROXY_FILE", DEFAULT_PROXY_FILE),
    })
}

pub fn parse_runtime_args() -> anyhow::Result<RuntimeArgs> {
    parse_runtime_args_from(std::env::args().skip(1), |key| std::env::var(key).ok())
}
