mod common;

use common::FakeGraph;
use kinship_core::{KinshipError, RiskTier, SupportStrength};
use kinship_engine::{EngineConfig, LoanSupportAggregator, ManualClock};
use std::sync::Arc;
use std::time::Duration;

const BORROWER: &str = "0xB0RROWER";
const BORROWER_FID: u64 = 1;

fn lender_address(i: u64) -> String {
    format!("0xlender{i}")
}

/// Borrower with followers 100..120; lender `i` shares `mutuals[i]` of them
fn loan_graph(mutuals: &[u64]) -> FakeGraph {
    let mut graph = FakeGraph::new()
        .user(BORROWER, BORROWER_FID, Some(0.9))
        .followers(BORROWER_FID, 100..120);
    for (i, &shared) in mutuals.iter().enumerate() {
        let i = i as u64;
        let fid = 10 + i;
        let private = 1_000 + i * 100;
        graph = graph
            .user(&lender_address(i), fid, Some(0.8))
            .followers(fid, (100..100 + shared).chain(private..private + 20));
    }
    graph
}

fn lenders(count: u64) -> Vec<String> {
    (0..count).map(lender_address).collect()
}

fn aggregator(graph: Arc<FakeGraph>) -> (LoanSupportAggregator, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::default());
    let aggregator = LoanSupportAggregator::from_config_with_clock(
        graph,
        &EngineConfig::default(),
        clock.clone(),
    );
    (aggregator, clock)
}

#[tokio::test]
async fn empty_lender_list_makes_no_network_call() {
    let graph = loan_graph(&[]).shared();
    let (aggregator, _clock) = aggregator(graph.clone());

    let record = aggregator.get_support(BORROWER, &[]).await;
    assert_eq!(record.total_lenders, 0);
    assert_eq!(record.support_strength, SupportStrength::None);
    assert_eq!(graph.calls(), 0);
}

#[tokio::test]
async fn seven_of_ten_connected_lenders_is_strong() {
    let graph = loan_graph(&[5, 6, 7, 8, 9, 10, 12, 1, 2, 0]).shared();
    let (aggregator, _clock) = aggregator(graph);

    let record = aggregator.get_support(BORROWER, &lenders(10)).await;
    assert_eq!(record.total_lenders, 10);
    assert_eq!(record.lenders_with_connections, 7);
    assert!((record.percentage_from_network - 70.0).abs() < 1e-9);
    assert_eq!(record.support_strength, SupportStrength::Strong);
    assert!((record.average_mutual_connections - 6.0).abs() < 1e-9);
    assert_eq!(record.lenders.len(), 10);
    assert!(record.lenders.iter().all(|l| l.fid.is_some()));

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["supportStrength"], "STRONG");
    assert_eq!(json["lendersWithConnections"], 7);
}

#[tokio::test]
async fn second_request_within_ttl_is_served_from_cache() {
    let graph = loan_graph(&[6, 0, 3]).shared();
    let (aggregator, clock) = aggregator(graph.clone());

    let first = aggregator.get_support(BORROWER, &lenders(3)).await;
    let calls_after_first = graph.calls();
    assert!(calls_after_first > 0);

    clock.advance(Duration::from_secs(29 * 60));
    // Same lender set in a different order and case maps to the same key
    let mut reordered: Vec<String> = lenders(3).into_iter().rev().collect();
    reordered[0] = reordered[0].to_uppercase();
    let second = aggregator.get_support(BORROWER, &reordered).await;

    assert_eq!(first, second);
    assert_eq!(graph.calls(), calls_after_first);
    assert_eq!(first.support_strength, SupportStrength::Moderate);
}

#[tokio::test]
async fn expired_record_is_recomputed() {
    let graph = loan_graph(&[6]).shared();
    let (aggregator, clock) = aggregator(graph.clone());

    aggregator.get_support(BORROWER, &lenders(1)).await;
    let calls_after_first = graph.calls();

    clock.advance(Duration::from_secs(30 * 60));
    aggregator.get_support(BORROWER, &lenders(1)).await;
    assert!(graph.calls() > calls_after_first);
}

#[tokio::test]
async fn unresolvable_borrower_is_none_and_cached() {
    let graph = FakeGraph::new()
        .user(&lender_address(0), 10, None)
        .shared();
    let (aggregator, _clock) = aggregator(graph.clone());

    let record = aggregator.get_support("0xnobody", &lenders(1)).await;
    assert_eq!(record.support_strength, SupportStrength::None);
    assert_eq!(record.lenders_with_connections, 0);
    assert_eq!(record.total_lenders, 1);
    assert_eq!(graph.calls(), 1);

    aggregator.get_support("0xnobody", &lenders(1)).await;
    assert_eq!(graph.calls(), 1);
}

#[tokio::test]
async fn identity_lookup_failure_degrades_to_none() {
    let graph = loan_graph(&[9]).failing_bulk().shared();
    let (aggregator, _clock) = aggregator(graph);

    let record = aggregator.get_support(BORROWER, &lenders(1)).await;
    assert_eq!(record.support_strength, SupportStrength::None);
}

#[tokio::test]
async fn unreachable_lender_does_not_block_others() {
    // lender 1 (fid 11) fails to fetch
    let graph = loan_graph(&[7, 9]).failing(11).shared();
    let (aggregator, _clock) = aggregator(graph);

    let record = aggregator.get_support(BORROWER, &lenders(2)).await;
    assert_eq!(record.total_lenders, 2);
    assert_eq!(record.lenders_with_connections, 1);
    assert_eq!(record.support_strength, SupportStrength::Moderate);

    let failed = record.lenders.iter().find(|l| l.fid == Some(11)).unwrap();
    assert_eq!(failed.mutual_follows, 0);
    assert_eq!(failed.risk_tier, RiskTier::High);
    assert!(!failed.is_connected);
}

#[tokio::test]
async fn lender_without_profile_counts_as_unconnected() {
    let graph = loan_graph(&[8]).shared();
    let (aggregator, _clock) = aggregator(graph);

    let mut addresses = lenders(1);
    addresses.push("0xstranger".to_string());
    let record = aggregator.get_support(BORROWER, &addresses).await;

    assert_eq!(record.total_lenders, 2);
    assert_eq!(record.lenders_with_connections, 1);
    let stranger = record.lenders.iter().find(|l| l.address == "0xstranger").unwrap();
    assert!(stranger.fid.is_none());
    assert_eq!(stranger.risk_tier, RiskTier::High);
}

#[tokio::test]
async fn invalidate_forces_recompute() {
    let graph = loan_graph(&[6]).shared();
    let (aggregator, _clock) = aggregator(graph.clone());

    aggregator.get_support(BORROWER, &lenders(1)).await;
    let calls_after_first = graph.calls();

    aggregator.invalidate(BORROWER, &lenders(1)).await;
    aggregator.get_support(BORROWER, &lenders(1)).await;
    assert!(graph.calls() > calls_after_first);
}

#[tokio::test]
async fn resolve_identity_reports_unknown_addresses() {
    let graph = loan_graph(&[3]).shared();
    let (aggregator, _clock) = aggregator(graph);

    let borrower = aggregator.resolve_identity("0xb0rrower").await.unwrap();
    assert_eq!(borrower.fid, BORROWER_FID);
    assert_eq!(borrower.label(), "fid:1");

    let err = aggregator.resolve_identity("0xNOBODY").await.unwrap_err();
    assert!(matches!(err, KinshipError::UnresolvableIdentity(ref a) if a == "0xnobody"));
}

#[tokio::test]
async fn failed_lookup_is_unresolvable() {
    let graph = loan_graph(&[3]).failing_bulk().shared();
    let (aggregator, _clock) = aggregator(graph);

    let err = aggregator.resolve_identity(BORROWER).await.unwrap_err();
    assert!(matches!(err, KinshipError::UnresolvableIdentity(_)));
}
