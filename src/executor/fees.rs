//! Fee strategy selection.
//!
//! Prefers a dynamic (type 2) fee when the node reports both EIP-1559 components,
//! otherwise a legacy gas price. Estimation never fails: a node that cannot answer
//! at all yields the 1 gwei legacy floor.

use crate::utils::rpc::{ChainClient, FeeData};
use alloy::rpc::types::eth::TransactionRequest;
use alloy::network::TransactionBuilder;

/// 1 gwei.
pub const FALLBACK_GAS_PRICE_WEI: u128 = 1_000_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeStrategy {
    Dynamic {
        max_fee_per_gas: u128,
        max_priority_fee_per_gas: u128,
    },
    Legacy {
        gas_price: u128,
    },
}

impl FeeStrategy {
    pub fn fallback() -> Self {
        Self::Legacy {
            gas_price: FALLBACK_GAS_PRICE_WEI,
        }
    }

    pub fn from_fee_data(data: &FeeData) -> Self {
        match (data.max_fee_per_gas, data.max_priority_fee_per_gas) {
            (Some(max_fee_per_gas), Some(max_priority_fee_per_gas))
                if max_fee_per_gas > 0 && max_priority_fee_per_gas > 0 =>
            {
                Self::Dynamic {
                    max_fee_per_gas,
                    max_priority_fee_per_gas,
                }
            }
            _ => Self::Legacy {
                gas_price: data
                    .gas_price
                    .filter(|price| *price > 0)
                    .unwrap_or(FALLBACK_GAS_PRICE_WEI),
            },
        }
    }

    /// EIP-2718 envelope type the strategy produces.
    pub fn tx_type(&self) -> u8 {
        match self {
            Self::Dynamic { .. } => 2,
            Self::Legacy { .. } => 0,
        }
    }

    pub fn apply(self, request: TransactionRequest) -> TransactionRequest {
        match self {
            Self::Dynamic {
                max_fee_per_gas,
                max_priority_fee_per_gas,
            } => request
                .with_max_fee_per_gas(max_fee_per_gas)
                .with_max_priority_fee_per_gas(max_priority_fee_per_gas),
            Self::Legacy { gas_price } => request.with_gas_price(gas_price),
        }
    }
}

pub async fn estimate_fee_strategy(client: &dyn ChainClient) -> FeeStrategy {
    match client.fee_data().await {
        Ok(data) => {
            let strategy = FeeStrategy::from_fee_data(&data);
            tracing::debug!("[FEES] Selected {:?} from {:?}", strategy, data);
            strategy
        }
        Err(err) => {
            tracing::debug!("[FEES] Failed to get fee data ({err}), using default.");
            FeeStrategy::fallback()
        }
    }
}
