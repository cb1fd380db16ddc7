use crate::anchor_utils::{harness, test_account, Outcome};
use redact_cycler::error::{ActionError, SubmissionErrorKind};
use redact_cycler::executor::actions::claim;

#[tokio::test]
async fn lagging_pending_count_still_yields_strictly_increasing_nonces() {
    let h = harness();
    let account = test_account(0);
    h.chain.set_pending_nonce(account.address(), 5);

    for _ in 0..3 {
        h.pipeline
            .submit(&account, claim(h.pipeline.contract()), None, "Claim all")
            .await
            .expect("confirmed");
    }

    assert_eq!(h.chain.nonces(), vec![5, 6, 7]);
    assert_eq!(h.chain.nonce_queries(), 3);
}

#[tokio::test]
async fn pending_count_ahead_of_local_record_wins() {
    let h = harness();
    let account = test_account(0);
    h.chain.set_pending_nonce(account.address(), 2);
    h.pipeline
        .submit(&account, claim(h.pipeline.contract()), None, "Claim all")
        .await
        .expect("confirmed");

    h.chain.set_pending_nonce(account.address(), 40);
    h.pipeline
        .submit(&account, claim(h.pipeline.contract()), None, "Claim all")
        .await
        .expect("confirmed");

    assert_eq!(h.chain.nonces(), vec![2, 40]);
}

#[tokio::test]
async fn nonce_query_failure_aborts_attempt_without_recording() {
    let h = harness();
    let account = test_account(0);
    h.chain.fail_nonce_queries(true);

    let err = h
        .pipeline
        .submit(&account, claim(h.pipeline.contract()), None, "Claim all")
        .await
        .expect_err("nonce query fails");

    assert!(matches!(err, ActionError::NonceQuery(_)), "{err:?}");
    assert!(h.chain.submissions().is_empty());
    let chain_id = h.session.chain().chain_id;
    assert_eq!(
        h.session.nonces().last_allocated(chain_id, account.address()),
        None
    );
}

#[tokio::test]
async fn nonce_conflict_evicts_and_next_attempt_trusts_the_node() {
    let h = harness();
    let account = test_account(0);
    let chain_id = h.session.chain().chain_id;
    h.chain.set_pending_nonce(account.address(), 5);
    h.chain
        .script([Outcome::Reject(SubmissionErrorKind::NonceConflict)]);

    let err = h
        .pipeline
        .submit(&account, claim(h.pipeline.contract()), None, "Claim all")
        .await
        .expect_err("rejected");
    assert!(matches!(
        err,
        ActionError::Submission {
            kind: SubmissionErrorKind::NonceConflict,
            ..
        }
    ));
    assert_eq!(
        h.session.nonces().last_allocated(chain_id, account.address()),
        None
    );

    h.pipeline
        .submit(&account, claim(h.pipeline.contract()), None, "Claim all")
        .await
        .expect("confirmed");
    assert_eq!(h.chain.nonces(), vec![5, 5]);
}

#[tokio::test]
async fn other_rejections_keep_the_nonce_record() {
    let h = harness();
    let account = test_account(0);
    let chain_id = h.session.chain().chain_id;
    h.chain.set_pending_nonce(account.address(), 5);
    h.chain
        .script([Outcome::Reject(SubmissionErrorKind::Underpriced)]);

    let err = h
        .pipeline
        .submit(&account, claim(h.pipeline.contract()), None, "Claim all")
        .await
        .expect_err("rejected");
    assert!(matches!(
        err,
        ActionError::Submission {
            kind: SubmissionErrorKind::Underpriced,
            ..
        }
    ));
    assert_eq!(
        h.session.nonces().last_allocated(chain_id, account.address()),
        Some(5)
    );

    h.pipeline
        .submit(&account, claim(h.pipeline.contract()), None, "Claim all")
        .await
        .expect("confirmed");
    assert_eq!(h.chain.nonces(), vec![5, 6]);
}

#[tokio::test]
async fn accounts_do_not_share_nonce_sequences() {
    let h = harness();
    let first = test_account(0);
    let second = test_account(1);
    h.chain.set_pending_nonce(first.address(), 3);
    h.chain.set_pending_nonce(second.address(), 3);

    for account in [&first, &second, &first] {
        h.pipeline
            .submit(account, claim(h.pipeline.contract()), None, "Claim all")
            .await
            .expect("confirmed");
    }

    assert_eq!(h.chain.nonces(), vec![3, 3, 4]);
}
