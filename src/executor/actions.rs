//! Encrypt / decrypt / claim descriptors for the encrypted-ETH contract.

use crate::core::{Account, ProxyEndpoint};
use crate::error::ActionError;
use crate::executor::fees::FeeStrategy;
use crate::executor::TxPipeline;
use alloy::network::TransactionBuilder;
use alloy::primitives::utils::parse_ether;
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::rpc::types::eth::TransactionRequest;
use alloy::sol_types::SolCall;

pub const ACTION_GAS_LIMIT: u64 = 750_000;

alloy::sol! {
    interface IEncryptedEth {
        function encryptETH(address to) external payable;
        function decrypt(address to, uint128 value) external;
        function claimAllDecrypted() external;
    }
}

/// One contract call, ready to be priced and numbered. Consumed by the request it becomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionDescriptor {
    pub target: Address,
    pub calldata: Bytes,
    pub value: U256,
    pub gas_limit: u64,
}

impl ActionDescriptor {
    pub fn into_request(
        self,
        from: Address,
        chain_id: u64,
        nonce: u64,
        fees: FeeStrategy,
    ) -> TransactionRequest {
        let request = TransactionRequest::default()
            .with_from(from)
            .with_to(self.target)
            .with_input(self.calldata)
            .with_value(self.value)
            .with_gas_limit(self.gas_limit)
            .with_chain_id(chain_id)
            .with_nonce(nonce);
        fees.apply(request)
    }
}

/// Ether amount to wei after rounding to 6 decimals.
pub fn ether_amount_to_wei(amount: f64) -> Result<U256, ActionError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(ActionError::InvalidAmount {
            amount: amount.to_string(),
            reason: "amount must be a finite, non-negative number".to_string(),
        });
    }
    let rounded = format!("{amount:.6}");
    parse_ether(&rounded).map_err(|err| ActionError::InvalidAmount {
        amount: rounded,
        reason: err.to_string(),
    })
}

pub fn encrypt(
    contract: Address,
    beneficiary: Address,
    amount: f64,
) -> Result<ActionDescriptor, ActionError> {
    let value = ether_amount_to_wei(amount)?;
    Ok(ActionDescriptor {
        target: contract,
        calldata: IEncryptedEth::encryptETHCall { to: beneficiary }
            .abi_encode()
            .into(),
        value,
        gas_limit: ACTION_GAS_LIMIT,
    })
}

pub fn decrypt(
    contract: Address,
    beneficiary: Address,
    amount: f64,
) -> Result<ActionDescriptor, ActionError> {
    let wei = ether_amount_to_wei(amount)?;
    if wei > U256::from(u128::MAX) {
        return Err(ActionError::InvalidAmount {
            amount: format!("{amount:.6}"),
            reason: "does not fit in uint128".to_string(),
        });
    }
    Ok(ActionDescriptor {
        target: contract,
        calldata: IEncryptedEth::decryptCall {
            to: beneficiary,
            value: wei.to::<u128>(),
        }
        .abi_encode()
        .into(),
        value: U256::ZERO,
        gas_limit: ACTION_GAS_LIMIT,
    })
}

pub fn claim(contract: Address) -> ActionDescriptor {
    ActionDescriptor {
        target: contract,
        calldata: IEncryptedEth::claimAllDecryptedCall {}.abi_encode().into(),
        value: U256::ZERO,
        gas_limit: ACTION_GAS_LIMIT,
    }
}

pub async fn perform_encrypt(
    pipeline: &TxPipeline,
    account: &Account,
    proxy: Option<&ProxyEndpoint>,
    amount: f64,
) -> Result<TxHash, ActionError> {
    let descriptor = encrypt(pipeline.contract(), account.address(), amount)?;
    pipeline
        .submit(account, descriptor, proxy, &format!("Encrypt {amount:.6} ETH"))
        .await
}

pub async fn perform_decrypt(
    pipeline: &TxPipeline,
    account: &Account,
    proxy: Option<&ProxyEndpoint>,
    amount: f64,
) -> Result<TxHash, ActionError> {
    let descriptor = decrypt(pipeline.contract(), account.address(), amount)?;
    pipeline
        .submit(account, descriptor, proxy, &format!("Decrypt {amount:.6} eETH"))
        .await
}

pub async fn perform_claim(
    pipeline: &TxPipeline,
    account: &Account,
    proxy: Option<&ProxyEndpoint>,
) -> Result<TxHash, ActionError> {
    pipeline
        .submit(account, claim(pipeline.contract()), proxy, "Claim all")
        .await
}
