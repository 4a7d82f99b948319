//! Destroy: confirmation gate, delete chain, best-effort registry removal.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use linodectl_cli::application::services::workflow::{
    InstanceAction, Outcome, run_instance_action,
};
use linodectl_common::{Instance, JobState, Registry};

use crate::helpers::{
    Call, FIRST_JOB_ID, FakeProvider, MemoryRegistryStore, RecordingReporter, ScriptedConfirmer,
    budgets, cached,
};

fn db_registry() -> Registry {
    let mut registry = Registry::new();
    registry.upsert("db", cached("db.01", 7));
    registry.upsert("db", cached("db.02", 8));
    registry
}

async fn destroy(
    provider: &FakeProvider,
    store: &MemoryRegistryStore,
    reporter: &RecordingReporter,
    confirmer: &ScriptedConfirmer,
    force: bool,
) -> Outcome {
    run_instance_action(
        provider,
        store,
        reporter,
        confirmer,
        budgets(5),
        "db.01",
        InstanceAction::Destroy { force },
    )
    .await
    .expect("destroy returns an outcome")
}

#[tokio::test]
async fn forced_destroy_runs_the_chain_and_forgets_the_instance() {
    let provider = FakeProvider::new();
    let store = MemoryRegistryStore::new(db_registry());
    let confirmer = ScriptedConfirmer::answering("n");

    let outcome = destroy(
        &provider,
        &store,
        &RecordingReporter::default(),
        &confirmer,
        true,
    )
    .await;

    assert_eq!(outcome, Outcome::Destroyed);
    assert_eq!(confirmer.asked(), 0);
    assert_eq!(
        provider.calls(),
        vec![
            Call::Shutdown(7),
            Call::JobState(FIRST_JOB_ID),
            Call::DeleteDisks(7),
            Call::DeleteInstance(7),
        ]
    );
    let saved = store.snapshot();
    assert!(saved.instance("db", "db.01").is_none());
    assert!(saved.instance("db", "db.02").is_some());
}

#[tokio::test]
async fn last_instance_leaves_an_empty_cluster() {
    let mut registry = Registry::new();
    registry.upsert("db", cached("db.01", 7));
    let store = MemoryRegistryStore::new(registry);

    destroy(
        &FakeProvider::new(),
        &store,
        &RecordingReporter::default(),
        &ScriptedConfirmer::answering(""),
        false,
    )
    .await;

    let saved = store.snapshot();
    assert!(saved.has_cluster("db"));
    assert!(saved.instance("db", "db.01").is_none());
}

#[tokio::test]
async fn declining_touches_nothing() {
    for answer in ["n", "N", "  n\n"] {
        let provider = FakeProvider::new();
        let store = MemoryRegistryStore::new(db_registry());
        let reporter = RecordingReporter::default();
        let confirmer = ScriptedConfirmer::answering(answer);

        let outcome = destroy(&provider, &store, &reporter, &confirmer, false).await;

        assert_eq!(outcome, Outcome::DestroyDeclined, "{answer:?}");
        assert_eq!(confirmer.asked(), 1);
        assert!(provider.calls().is_empty(), "{answer:?}");
        assert_eq!(store.saves(), 0);
        assert_eq!(store.snapshot(), db_registry());
        assert!(reporter.has("No action taken."));
    }
}

#[tokio::test]
async fn any_other_answer_proceeds() {
    for answer in ["", "y", "yes", "no", "nope"] {
        let provider = FakeProvider::new();
        let store = MemoryRegistryStore::new(db_registry());

        let outcome = destroy(
            &provider,
            &store,
            &RecordingReporter::default(),
            &ScriptedConfirmer::answering(answer),
            false,
        )
        .await;

        assert_eq!(outcome, Outcome::Destroyed, "{answer:?}");
        assert!(provider.calls().contains(&Call::DeleteInstance(7)));
    }
}

#[tokio::test]
async fn failed_disk_deletion_still_forgets_the_instance() {
    let provider = FakeProvider::new().failing("delete_disks");
    let store = MemoryRegistryStore::new(db_registry());
    let reporter = RecordingReporter::default();

    let outcome = destroy(
        &provider,
        &store,
        &reporter,
        &ScriptedConfirmer::answering("y"),
        false,
    )
    .await;

    match outcome {
        Outcome::DestroyedWithErrors { detail } => {
            assert!(detail.contains("delete_disks rejected"), "{detail}");
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(!provider.calls().contains(&Call::DeleteInstance(7)));
    assert!(store.snapshot().instance("db", "db.01").is_none());
    assert_eq!(reporter.warnings().len(), 2);
}

#[tokio::test]
async fn failed_shutdown_job_stops_the_chain() {
    let provider = FakeProvider::new().script_job(
        FIRST_JOB_ID,
        vec![Ok(JobState::Failed {
            detail: "host busy".into(),
        })],
    );
    let store = MemoryRegistryStore::new(db_registry());

    let outcome = destroy(
        &provider,
        &store,
        &RecordingReporter::default(),
        &ScriptedConfirmer::answering("y"),
        false,
    )
    .await;

    assert!(matches!(outcome, Outcome::DestroyedWithErrors { .. }));
    assert_eq!(provider.mutations(), vec![Call::Shutdown(7)]);
    assert!(store.snapshot().instance("db", "db.01").is_none());
}

#[tokio::test]
async fn failed_chain_and_failed_save_reports_both() {
    let provider = FakeProvider::new().failing("delete_disks");
    let store = MemoryRegistryStore::new(db_registry()).read_only();

    let err = run_instance_action(
        &provider,
        &store,
        &RecordingReporter::default(),
        &ScriptedConfirmer::answering("y"),
        budgets(5),
        "db.01",
        InstanceAction::Destroy { force: false },
    )
    .await
    .unwrap_err();

    let message = format!("{err:#}");
    assert!(message.contains("delete_disks rejected"), "{message}");
    assert!(message.contains("registry is read-only"), "{message}");
    assert!(store.snapshot().instance("db", "db.01").is_some());
}

#[tokio::test]
async fn declining_an_uncached_instance_still_caches_its_identity() {
    let mut registry = Registry::new();
    registry.upsert("web", Instance::new("web.02"));
    let provider = FakeProvider::new().with_linode(9, "web.02");
    let store = MemoryRegistryStore::new(registry);
    let confirmer = ScriptedConfirmer::answering("n");

    let outcome = run_instance_action(
        &provider,
        &store,
        &RecordingReporter::default(),
        &confirmer,
        budgets(5),
        "web.02",
        InstanceAction::Destroy { force: false },
    )
    .await
    .unwrap();

    assert_eq!(outcome, Outcome::DestroyDeclined);
    assert_eq!(provider.calls(), vec![Call::FindByLabel("web.02".into())]);
    assert!(provider.mutations().is_empty());
    assert_eq!(store.saves(), 1);
    assert_eq!(
        store.snapshot().instance("web", "web.02").and_then(Instance::provider_id),
        Some(9)
    );
}
