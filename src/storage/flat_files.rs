//! Line-delimited account and proxy sources.

use crate::core::{Account, ProxyEndpoint};
use crate::error::LoadError;
use std::fs;
use std::path::Path;

fn non_empty_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

/// Parses one private key per line. An empty source is an error.
pub fn parse_accounts(content: &str, source: &str) -> Result<Vec<Account>, LoadError> {
    let accounts = non_empty_lines(content)
        .map(|(line, raw)| {
            Account::from_private_key(raw).map_err(|reason| LoadError::InvalidKey {
                path: source.to_string(),
                line,
                reason,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    if accounts.is_empty() {
        return Err(LoadError::NoAccounts(source.to_string()));
    }
    Ok(accounts)
}

pub fn load_accounts(path: &Path) -> Result<Vec<Account>, LoadError> {
    let content = fs::read_to_string(path).map_err(|e| LoadError::Read {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let accounts = parse_accounts(&content, &path.display().to_string())?;
    tracing::info!(
        "[LOAD] Successfully loaded {} accounts from {}.",
        accounts.len(),
        path.display()
    );
    Ok(accounts)
}

pub fn parse_proxies(content: &str) -> Vec<ProxyEndpoint> {
    non_empty_lines(content)
        .map(|(_, raw)| ProxyEndpoint::new(raw))
        .collect()
}

/// Missing, unreadable, or empty proxy sources all mean "connect directly".
pub fn load_proxies(path: &Path) -> Vec<ProxyEndpoint> {
    if !path.exists() {
        tracing::info!(
            "[LOAD] {} not found. Running without proxies.",
            path.display()
        );
        return Vec::new();
    }
    match fs::read_to_string(path) {
        Ok(content) => {
            let proxies = parse_proxies(&content);
            if proxies.is_empty() {
                tracing::info!(
                    "[LOAD] {} is empty. Running without proxies.",
                    path.display()
                );
            } else {
                tracing::info!(
                    "[LOAD] Successfully loaded {} proxies from {}.",
                    proxies.len(),
                    path.display()
                );
            }
            proxies
        }
        Err(err) => {
            tracing::error!(
                "[LOAD] Failed to load proxies from {}: {}. Running without proxies.",
                path.display(),
                err
            );
            Vec::new()
        }
    }
}
