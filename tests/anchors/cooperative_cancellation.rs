use crate::anchor_utils::{harness, test_account};
use rand::rngs::StdRng;
use rand::SeedableRng;
use redact_cycler::error::ActionError;
use redact_cycler::executor::actions::claim;
use redact_cycler::runtime::{on_interrupt, CycleScheduler, RoundScheduler, SignalResponse};
use redact_cycler::utils::config::RunConfig;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

#[tokio::test]
async fn stop_before_submit_skips_the_nonce_query() {
    let h = harness();
    let account = test_account(0);
    h.session.control().request_stop();

    let err = h
        .pipeline
        .submit(&account, claim(h.pipeline.contract()), None, "Claim all")
        .await
        .expect_err("cancelled");

    assert!(err.is_cancelled());
    assert!(matches!(err, ActionError::Cancelled));
    assert_eq!(h.chain.nonce_queries(), 0);
    assert!(h.chain.submissions().is_empty());
}

#[tokio::test(start_paused = true)]
async fn stop_during_post_encrypt_wait_ends_the_account_promptly() {
    let h = harness();
    let account = test_account(0);
    let session = h.session.clone();
    h.chain.on_send(move |count| {
        if count == 1 {
            session.control().request_stop();
        }
    });
    let config = RunConfig {
        cycle_count: 3,
        ..RunConfig::default()
    };
    let scheduler = CycleScheduler::new(h.pipeline.clone(), config);
    let mut rng = StdRng::seed_from_u64(9);

    let started = Instant::now();
    let outcome = scheduler.run_account(0, &account, None, &mut rng).await;

    let tally = outcome.tally().expect("balance check passed");
    assert!(tally.stopped);
    assert_eq!(tally.completed, 0);
    assert_eq!(tally.failed, 0);
    assert_eq!(h.chain.submissions().len(), 1);
    assert!(started.elapsed() < Duration::from_secs(30));
}

#[tokio::test(start_paused = true)]
async fn interrupt_while_running_finishes_current_account_then_exits_loop() {
    let h = harness();
    let session = h.session.clone();
    let responses = Arc::new(Mutex::new(Vec::new()));
    let seen = responses.clone();
    // Interrupt arrives right after the first account's claim is submitted.
    h.chain.on_send(move |count| {
        if count == 3 {
            seen.lock().unwrap().push(on_interrupt(session.control()));
        }
    });
    let scheduler = RoundScheduler::new(
        CycleScheduler::new(h.pipeline.clone(), RunConfig::default()),
        vec![test_account(0), test_account(1)],
        Vec::new(),
    );
    let mut rng = StdRng::seed_from_u64(5);

    let report = scheduler.run(&mut rng).await;

    assert_eq!(*responses.lock().unwrap(), vec![SignalResponse::GracefulStop]);
    assert_eq!(report.rounds_completed, 0);
    assert_eq!(report.accounts.len(), 1);
    assert_eq!(report.accounts[0].outcome.tally().map(|t| t.completed), Some(1));
    assert_eq!(h.chain.submissions().len(), 3);
    assert!(!h.session.control().is_running());
    assert_eq!(on_interrupt(h.session.control()), SignalResponse::ForceExit);
}

#[tokio::test]
async fn interrupt_before_run_starts_means_idle_exit() {
    let h = harness();
    assert_eq!(on_interrupt(h.session.control()), SignalResponse::ExitIdle);
    assert!(!h.session.control().is_stop_requested());
}
