//! Integration tests for Charon
//!
//! These tests verify the integration between the crates:
//! - charon-agents: scripted backends and the keyword-routing supervisor
//! - charon-core: registry, bridge, retry, normalizer, conversations

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::json;

use charon_agents::{Agent, AgentKind, ScriptedAgent, Route, SupervisorAgent};
use charon_core::{
    conversation::Role, execute_with_retry, normalize, AgentRegistry, BlockingBridge,
    ConversationStore, Error, RetryPolicy,
};

// ============================================================================
// Full pipeline: registry -> bridge -> agent -> normalizer
// ============================================================================

#[tokio::test]
async fn test_query_pipeline_end_to_end() {
    let registry = AgentRegistry::new().register(
        "github",
        Box::new(|| {
            Ok(Arc::new(
                ScriptedAgent::new("github")
                    .with_reply("repositories", json!({"content": "- alpha\n- beta"})),
            ) as Arc<dyn Agent>)
        }),
    );
    let bridge = BlockingBridge::new(AgentKind::GitHub.default_workers());

    let agent = registry.resolve("github").await.unwrap();
    let raw = bridge
        .run(move || agent.chat("list repositories", None))
        .await
        .unwrap()
        .unwrap();

    let result = normalize(&raw);
    assert_eq!(result.kind(), "list");
    assert_eq!(result.display_text(), "- alpha\n- beta");
}

#[tokio::test]
async fn test_pipeline_with_retry_recovers_from_transient_failures() {
    let registry = AgentRegistry::new().register(
        "supervisor",
        Box::new(|| Ok(Arc::new(ScriptedAgent::new("supervisor").failing_times(2)) as Arc<dyn Agent>)),
    );
    let bridge = BlockingBridge::new(AgentKind::Supervisor.default_workers());
    let policy = RetryPolicy::new()
        .with_initial_backoff(Duration::from_millis(1))
        .with_jitter(false);

    let agent = registry.resolve("supervisor").await.unwrap();
    let raw = execute_with_retry(&policy, || {
        let agent = agent.clone();
        let bridge = &bridge;
        async move {
            let outcome = bridge.run(move || agent.chat("status", None)).await?;
            Ok(outcome?)
        }
    })
    .await
    .unwrap();

    assert_eq!(normalize(&raw).kind(), "text");
}

#[tokio::test]
async fn test_retry_exhaustion_surfaces_the_last_failure() {
    let bridge = BlockingBridge::new(4);
    let agent: Arc<dyn Agent> =
        Arc::new(ScriptedAgent::new("supervisor").failing_times(u32::MAX));
    let policy = RetryPolicy::new()
        .with_max_attempts(2)
        .with_initial_backoff(Duration::from_millis(1))
        .with_jitter(false);

    let result = execute_with_retry(&policy, || {
        let agent = agent.clone();
        let bridge = &bridge;
        async move {
            let outcome = bridge.run(move || agent.chat("status", None)).await?;
            Ok(outcome?)
        }
    })
    .await;

    match result {
        Err(Error::RetriesExhausted { attempts, .. }) => assert_eq!(attempts, 2),
        other => panic!("unexpected outcome: {:?}", other),
    }
}

// ============================================================================
// Bridge parallelism
// ============================================================================

#[tokio::test]
async fn test_bridge_runs_blocking_calls_in_parallel() {
    let latency = Duration::from_millis(150);
    let bridge = Arc::new(BlockingBridge::new(4));
    let agent: Arc<dyn Agent> =
        Arc::new(ScriptedAgent::new("github").with_latency(latency));

    let started = Instant::now();
    let calls = (0..4).map(|_| {
        let bridge = bridge.clone();
        let agent = agent.clone();
        async move { bridge.run(move || agent.chat("q", None)).await.unwrap().unwrap() }
    });
    futures::future::join_all(calls).await;

    // Serial execution would take 4x the latency; parallel stays well under.
    assert!(started.elapsed() < latency * 3);
}

// ============================================================================
// Supervisor routing
// ============================================================================

#[tokio::test]
async fn test_supervisor_routes_by_keyword_through_the_bridge() {
    let jira: Arc<dyn Agent> =
        Arc::new(ScriptedAgent::new("jira").with_reply("", json!({"content": "from jira"})));
    let github: Arc<dyn Agent> =
        Arc::new(ScriptedAgent::new("github").with_reply("", json!({"content": "from github"})));

    let supervisor = SupervisorAgent::new(vec![
        Route::new("jira", &["issue", "ticket"], jira),
        Route::new("github", &["repo", "commit"], github),
    ])
    .unwrap();

    let bridge = BlockingBridge::new(4);
    let supervisor = Arc::new(supervisor);

    let sup = supervisor.clone();
    let raw = bridge
        .run(move || sup.chat("show my open tickets", Some("s1")))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(normalize(&raw).display_text(), "from jira");

    let sup = supervisor.clone();
    let raw = bridge
        .run(move || sup.chat("latest commit on main", Some("s1")))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(normalize(&raw).display_text(), "from github");
}

// ============================================================================
// Conversations alongside dispatch
// ============================================================================

#[tokio::test]
async fn test_conversations_track_a_multi_agent_session() {
    let store = ConversationStore::new();
    let bridge = BlockingBridge::new(2);
    let agent: Arc<dyn Agent> = Arc::new(ScriptedAgent::new("github"));

    store.select_agent("github").await;
    store.append_turn("github", Role::User, "list repos").await;

    let a = agent.clone();
    let raw = bridge
        .run(move || a.chat("list repos", None))
        .await
        .unwrap()
        .unwrap();
    store
        .append_turn("github", Role::Assistant, normalize(&raw).display_text())
        .await;

    store.select_agent("jira").await;
    store.append_turn("jira", Role::User, "list issues").await;

    assert_eq!(store.history("github").await.len(), 2);
    assert_eq!(store.history("jira").await.len(), 1);

    store.clear("jira").await;
    assert!(store.history("jira").await.is_empty());
    assert_eq!(store.history("github").await.len(), 2);
}
