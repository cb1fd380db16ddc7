use crate::anchor_utils::{harness, test_account};
use rand::rngs::StdRng;
use rand::SeedableRng;
use redact_cycler::core::ProxyEndpoint;
use redact_cycler::runtime::{AccountOutcome, CycleScheduler, RoundScheduler};
use redact_cycler::utils::config::RunConfig;
use std::time::Duration;
use tokio::time::Instant;

fn stop_after(h: &crate::anchor_utils::Harness, sends: usize) {
    let session = h.session.clone();
    h.chain.on_send(move |count| {
        if count == sends {
            session.control().request_stop();
        }
    });
}

#[tokio::test(start_paused = true)]
async fn proxies_are_assigned_round_robin_by_account_index() {
    let h = harness();
    stop_after(&h, 9);
    let proxies = vec![
        ProxyEndpoint::new("socks5://10.0.0.1:1080"),
        ProxyEndpoint::new("http://10.0.0.2:8080"),
    ];
    let scheduler = RoundScheduler::new(
        CycleScheduler::new(h.pipeline.clone(), RunConfig::default()),
        vec![test_account(0), test_account(1), test_account(2)],
        proxies,
    );
    let mut rng = StdRng::seed_from_u64(21);

    let report = scheduler.run(&mut rng).await;

    assert_eq!(report.accounts.len(), 3);
    let order = report.accounts.iter().map(|a| a.index).collect::<Vec<_>>();
    assert_eq!(order, vec![0, 1, 2]);

    // One balance check plus three submissions per account.
    let seen = h.connector.proxies_seen();
    assert_eq!(seen.len(), 12);
    let first = Some("socks5://10.0.0.1:1080".to_string());
    let second = Some("http://10.0.0.2:8080".to_string());
    assert!(seen[0..4].iter().all(|p| *p == first));
    assert!(seen[4..8].iter().all(|p| *p == second));
    assert!(seen[8..12].iter().all(|p| *p == first));
}

#[tokio::test(start_paused = true)]
async fn no_proxies_means_direct_connections() {
    let h = harness();
    stop_after(&h, 3);
    let scheduler = RoundScheduler::new(
        CycleScheduler::new(h.pipeline.clone(), RunConfig::default()),
        vec![test_account(0)],
        Vec::new(),
    );
    let mut rng = StdRng::seed_from_u64(22);

    scheduler.run(&mut rng).await;

    let seen = h.connector.proxies_seen();
    assert!(!seen.is_empty());
    assert!(seen.iter().all(Option::is_none));
}

#[tokio::test(start_paused = true)]
async fn balance_failure_skips_only_that_account() {
    let h = harness();
    let broken = test_account(1);
    h.chain.fail_balance_for(broken.address());
    stop_after(&h, 6);
    let scheduler = RoundScheduler::new(
        CycleScheduler::new(h.pipeline.clone(), RunConfig::default()),
        vec![test_account(0), broken, test_account(2)],
        Vec::new(),
    );
    let mut rng = StdRng::seed_from_u64(23);

    let report = scheduler.run(&mut rng).await;

    assert_eq!(report.accounts.len(), 3);
    assert!(matches!(report.accounts[0].outcome, AccountOutcome::Done(_)));
    assert!(matches!(
        report.accounts[1].outcome,
        AccountOutcome::BalanceCheckFailed(_)
    ));
    assert_eq!(report.accounts[2].outcome.tally().map(|t| t.completed), Some(1));
    assert_eq!(h.chain.submissions().len(), 6);
}

#[tokio::test(start_paused = true)]
async fn accounts_are_staggered_by_one_to_three_minutes() {
    let h = harness();
    stop_after(&h, 6);
    let scheduler = RoundScheduler::new(
        CycleScheduler::new(h.pipeline.clone(), RunConfig::default()),
        vec![test_account(0), test_account(1)],
        Vec::new(),
    );
    let mut rng = StdRng::seed_from_u64(24);

    let started = Instant::now();
    scheduler.run(&mut rng).await;
    let elapsed = started.elapsed();

    // Two single-cycle accounts (45s each) plus one gap in [60, 180] seconds.
    assert!(elapsed >= Duration::from_secs(90 + 60), "{elapsed:?}");
    assert!(elapsed <= Duration::from_secs(90 + 180 + 1), "{elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn completed_pass_waits_configured_hours_before_next_round() {
    let h = harness();
    // First submission of the second round.
    stop_after(&h, 4);
    let config = RunConfig {
        wait_hours: 2.0,
        ..RunConfig::default()
    };
    let scheduler = RoundScheduler::new(
        CycleScheduler::new(h.pipeline.clone(), config),
        vec![test_account(0)],
        Vec::new(),
    );
    let mut rng = StdRng::seed_from_u64(25);

    let started = Instant::now();
    let report = scheduler.run(&mut rng).await;

    assert_eq!(report.rounds_completed, 1);
    assert_eq!(report.accounts.len(), 2);
    assert_eq!(report.accounts[1].round, 2);
    assert!(report.accounts[1].outcome.tally().is_some_and(|t| t.stopped));
    // Nonces keep climbing across rounds for the same account.
    assert_eq!(h.chain.nonces(), vec![0, 1, 2, 3]);
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(45 + 2 * 3_600), "{elapsed:?}");
    assert!(elapsed < Duration::from_secs(45 + 2 * 3_600 + 30), "{elapsed:?}");
}
