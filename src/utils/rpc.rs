//! Connection factory and the chain-access seam used by the executor.

use crate::config::chains::ChainConfig;
use crate::core::{ProxyEndpoint, ProxyKind};
use crate::error::{RpcError, SubmissionRejection};
use crate::utils::error::{classify_submission_error, compact_error_message};
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::providers::{Provider, ProviderBuilder, RootProvider};
use alloy::rpc::client::RpcClient;
use alloy::transports::http::Http;
use async_trait::async_trait;
use reqwest::Client;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

const RPC_HTTP_TIMEOUT_SECS: u64 = 30;
const RPC_ERR_MAX_LEN: usize = 260;

pub type HttpProvider = RootProvider<Http<Client>>;

type ReceiptFuture = Pin<Box<dyn Future<Output = Result<bool, String>> + Send>>;

/// Raw fee data as reported by the node. Any field may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeeData {
    pub max_fee_per_gas: Option<u128>,
    pub max_priority_fee_per_gas: Option<u128>,
    pub gas_price: Option<u128>,
}

/// Handle for a transaction the node accepted. Resolves to the receipt status
/// (`true` = success) once the transaction is mined.
pub struct PendingConfirmation {
    tx_hash: TxHash,
    receipt: ReceiptFuture,
}

impl PendingConfirmation {
    pub fn new<F>(tx_hash: TxHash, receipt: F) -> Self
    where
        F: Future<Output = Result<bool, String>> + Send + 'static,
    {
        Self {
            tx_hash,
            receipt: Box::pin(receipt),
        }
    }

    pub fn tx_hash(&self) -> TxHash {
        self.tx_hash
    }

    pub async fn wait(self) -> Result<bool, String> {
        self.receipt.await
    }
}

impl fmt::Debug for PendingConfirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingConfirmation")
            .field("tx_hash", &self.tx_hash)
            .finish_non_exhaustive()
    }
}

#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Transaction count for `address` at the `pending` block tag.
    async fn pending_nonce(&self, address: Address) -> Result<u64, RpcError>;
    async fn fee_data(&self) -> Result<FeeData, RpcError>;
    async fn balance(&self, address: Address) -> Result<U256, RpcError>;
    async fn send_raw_transaction(
        &self,
        raw: Bytes,
    ) -> Result<PendingConfirmation, SubmissionRejection>;
}

/// Builds a fresh client per call, optionally routed through a proxy.
pub trait Connector: Send + Sync {
    fn connect(&self, proxy: Option<&ProxyEndpoint>) -> Result<Arc<dyn ChainClient>, RpcError>;
}

fn compact_rpc_error_message(message: &str) -> String {
    compact_error_message(message, RPC_ERR_MAX_LEN)
}

/// HTTP client for the RPC endpoint, tunnelled through `proxy` when one is given.
pub fn build_http_client(proxy: Option<&ProxyEndpoint>) -> Result<Client, RpcError> {
    let mut builder = Client::builder().timeout(Duration::from_secs(RPC_HTTP_TIMEOUT_SECS));
    if let Some(proxy) = proxy {
        let url = proxy.to_url();
        let route = reqwest::Proxy::all(url.as_str()).map_err(|err| RpcError::InvalidProxy {
            proxy: proxy.to_string(),
            reason: err.to_string(),
        })?;
        builder = builder.proxy(route);
        tracing::debug!(
            "[RPC] Routing through {} proxy {}",
            match proxy.kind() {
                ProxyKind::Socks => "SOCKS",
                ProxyKind::HttpTunnel => "HTTP(S)",
            },
            proxy
        );
    }
    builder.build().map_err(|err| match proxy {
        Some(proxy) => RpcError::InvalidProxy {
            proxy: proxy.to_string(),
            reason: err.to_string(),
        },
        None => RpcError::Transport(err.to_string()),
    })
}

pub fn build_provider(
    chain: &ChainConfig,
    proxy: Option<&ProxyEndpoint>,
) -> Result<HttpProvider, RpcError> {
    let url = chain
        .rpc_url
        .parse::<reqwest::Url>()
        .map_err(|err| RpcError::InvalidUrl {
            url: chain.rpc_url.clone(),
            reason: err.to_string(),
        })?;
    let http = Http::with_client(build_http_client(proxy)?, url);
    Ok(ProviderBuilder::new().on_client(RpcClient::new(http, false)))
}

/// Live JSON-RPC client for one network.
pub struct AlloyChainClient {
    provider: HttpProvider,
}

impl AlloyChainClient {
    pub fn new(provider: HttpProvider) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl ChainClient for AlloyChainClient {
    async fn pending_nonce(&self, address: Address) -> Result<u64, RpcError> {
        self.provider
            .get_transaction_count(address)
            .pending()
            .await
            .map_err(|err| RpcError::Transport(compact_rpc_error_message(&err.to_string())))
    }

    async fn fee_data(&self) -> Result<FeeData, RpcError> {
        let eip1559 = self.provider.estimate_eip1559_fees(None).await;
        let gas_price = self.provider.get_gas_price().await;
        match (eip1559, gas_price) {
            (Err(eip1559_err), Err(gas_price_err)) => Err(RpcError::Transport(
                compact_rpc_error_message(&format!(
                    "fee estimation failed ({eip1559_err}); gas price query failed ({gas_price_err})"
                )),
            )),
            (eip1559, gas_price) => {
                let (max_fee_per_gas, max_priority_fee_per_gas) = match eip1559 {
                    Ok(fees) => (
                        Some(fees.max_fee_per_gas),
                        Some(fees.max_priority_fee_per_gas),
                    ),
                    Err(_) => (None, None),
                };
                Ok(FeeData {
                    max_fee_per_gas,
                    max_priority_fee_per_gas,
                    gas_price: gas_price.ok(),
                })
            }
        }
    }

    async fn balance(&self, address: Address) -> Result<U256, RpcError> {
        self.provider
            .get_balance(address)
            .await
            .map_err(|err| RpcError::Transport(compact_rpc_error_message(&err.to_string())))
    }

    async fn send_raw_transaction(
        &self,
        raw: Bytes,
    ) -> Result<PendingConfirmation, SubmissionRejection> {
        let pending = self
            .provider
            .send_raw_transaction(&raw)
            .await
            .map_err(|err| {
                let message = compact_rpc_error_message(&err.to_string());
                SubmissionRejection::new(classify_submission_error(&message), message)
            })?;
        let tx_hash = *pending.tx_hash();
        Ok(PendingConfirmation::new(tx_hash, async move {
            pending
                .get_receipt()
                .await
                .map(|receipt| receipt.status())
                .map_err(|err| compact_rpc_error_message(&err.to_string()))
        }))
    }
}

/// Production [`Connector`]: one fresh HTTP provider per call.
#[derive(Debug, Clone)]
pub struct HttpConnector {
    chain: ChainConfig,
}

impl HttpConnector {
    pub fn new(chain: ChainConfig) -> Self {
        Self { chain }
    }
}

impl Connector for HttpConnector {
    fn connect(&self, proxy: Option<&ProxyEndpoint>) -> Result<Arc<dyn ChainClient>, RpcError> {
        let provider = build_provider(&self.chain, proxy)?;
        Ok(Arc::new(AlloyChainClient::new(provider)))
    }
}
