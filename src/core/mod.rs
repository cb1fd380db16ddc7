//! Identities and network routes the runner operates with.

use crate::utils::hex::{clean_hex, short_address};
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use std::fmt;
use std::str::FromStr;

/// A signing key and the address derived from it.
#[derive(Clone)]
pub struct Account {
    signer: PrivateKeySigner,
    address: Address,
}

impl Account {
    pub fn from_private_key(raw: &str) -> Result<Self, String> {
        let clean = clean_hex(raw);
        if clean.len() != 64 {
            return Err(format!(
                "expected 64 hex characters, got {}",
                clean.len()
            ));
        }
        let signer = PrivateKeySigner::from_str(clean).map_err(|e| e.to_string())?;
        Ok(Self::from_signer(signer))
    }

    pub fn from_signer(signer: PrivateKeySigner) -> Self {
        let address = signer.address();
        Self { signer, address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn signer(&self) -> &PrivateKeySigner {
        &self.signer
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("address", &short_address(self.address))
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyKind {
    Socks,
    HttpTunnel,
}

/// Opaque forward-proxy connection string. Not validated until a client is built from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyEndpoint(String);

impl ProxyEndpoint {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn kind(&self) -> ProxyKind {
        if self.0.to_ascii_lowercase().starts_with("socks") {
            ProxyKind::Socks
        } else {
            ProxyKind::HttpTunnel
        }
    }

    /// Proxy URL handed to the HTTP client; bare `host:port` entries are treated as `http://`.
    pub fn to_url(&self) -> String {
        if self.0.contains("://") {
            self.0.clone()
        } else {
            format!("http://{}", self.0)
        }
    }
}

impl fmt::Display for ProxyEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Round-robin proxy assignment by account index.
pub fn proxy_for(account_index: usize, proxies: &[ProxyEndpoint]) -> Option<&ProxyEndpoint> {
    if proxies.is_empty() {
        return None;
    }
    proxies.get(account_index % proxies.len())
}
