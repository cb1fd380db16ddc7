use crate::anchor_utils::{harness, test_account, Outcome};
use redact_cycler::error::ActionError;
use redact_cycler::executor::actions::claim;
use redact_cycler::utils::rpc::FeeData;
use std::time::Duration;
use tokio::time::Instant;

#[tokio::test(start_paused = true)]
async fn confirmed_transaction_returns_its_hash() {
    let h = harness();
    let account = test_account(0);

    let hash = h
        .pipeline
        .submit(&account, claim(h.pipeline.contract()), None, "Claim all")
        .await
        .expect("confirmed");

    let sent = h.chain.submissions();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].hash, hash);
    assert_eq!(sent[0].to, Some(h.pipeline.contract()));
    assert_eq!(sent[0].chain_id, Some(11_155_111));
    assert_eq!(sent[0].gas_limit, 750_000);
}

#[tokio::test(start_paused = true)]
async fn reverted_receipt_is_reported_as_revert() {
    let h = harness();
    let account = test_account(0);
    h.chain.script([Outcome::Revert]);

    let err = h
        .pipeline
        .submit(&account, claim(h.pipeline.contract()), None, "Claim all")
        .await
        .expect_err("reverted");

    let sent_hash = h.chain.submissions()[0].hash;
    match err {
        ActionError::Reverted { hash } => assert_eq!(hash, sent_hash),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn missing_receipt_times_out_after_two_minutes() {
    let h = harness();
    let account = test_account(0);
    h.chain.script([Outcome::NeverConfirm]);

    let started = Instant::now();
    let err = h
        .pipeline
        .submit(&account, claim(h.pipeline.contract()), None, "Claim all")
        .await
        .expect_err("timed out");

    assert!(started.elapsed() >= Duration::from_secs(120));
    match err {
        ActionError::ConfirmationTimeout { waited_secs, .. } => assert_eq!(waited_secs, 120),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn receipt_lookup_failure_is_a_confirmation_error() {
    let h = harness();
    let account = test_account(0);
    h.chain.script([Outcome::ConfirmationError]);

    let err = h
        .pipeline
        .submit(&account, claim(h.pipeline.contract()), None, "Claim all")
        .await
        .expect_err("confirmation error");
    assert!(matches!(err, ActionError::Confirmation { .. }), "{err:?}");
}

#[tokio::test]
async fn dynamic_fee_data_produces_type_two_transactions() {
    let h = harness();
    let account = test_account(0);

    h.pipeline
        .submit(&account, claim(h.pipeline.contract()), None, "Claim all")
        .await
        .expect("confirmed");

    assert_eq!(h.chain.submissions()[0].tx_type, 2);
}

#[tokio::test]
async fn fee_query_failure_falls_back_to_one_gwei_legacy() {
    let h = harness();
    let account = test_account(0);
    h.chain.set_fee_data(None);

    h.pipeline
        .submit(&account, claim(h.pipeline.contract()), None, "Claim all")
        .await
        .expect("confirmed");

    let sent = &h.chain.submissions()[0];
    assert_eq!(sent.tx_type, 0);
    assert_eq!(sent.gas_price, Some(1_000_000_000));
}

#[tokio::test]
async fn partial_fee_data_uses_queried_gas_price() {
    let h = harness();
    let account = test_account(0);
    h.chain.set_fee_data(Some(FeeData {
        max_fee_per_gas: None,
        max_priority_fee_per_gas: Some(1),
        gas_price: Some(7_000_000_000),
    }));

    h.pipeline
        .submit(&account, claim(h.pipeline.contract()), None, "Claim all")
        .await
        .expect("confirmed");

    let sent = &h.chain.submissions()[0];
    assert_eq!(sent.tx_type, 0);
    assert_eq!(sent.gas_price, Some(7_000_000_000));
}
