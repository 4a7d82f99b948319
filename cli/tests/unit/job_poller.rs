//! Job poller and readiness waiter behaviour.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::time::Duration;

use linodectl_cli::application::services::job_poller::wait_for_jobs;
use linodectl_cli::application::services::readiness::wait_until_running;
use linodectl_cli::domain::{PollBudget, WorkflowError};
use linodectl_common::{InstanceStatus, JobHandle, JobKind, JobState};

use crate::helpers::{Call, FakeProvider};

const A: u64 = 1;
const B: u64 = 2;
const C: u64 = 3;

fn handles() -> Vec<JobHandle> {
    [A, B, C]
        .into_iter()
        .map(|id| JobHandle::new(7, id, JobKind::Create))
        .collect()
}

fn budget(max_attempts: u32) -> PollBudget {
    PollBudget::new(Duration::ZERO, max_attempts)
}

fn queries(provider: &FakeProvider, job: u64) -> usize {
    provider.count(|c| *c == Call::JobState(job))
}

#[tokio::test]
async fn empty_job_list_resolves_immediately() {
    let provider = FakeProvider::new();
    wait_for_jobs(&provider, &[], budget(1)).await.unwrap();
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn succeeded_jobs_leave_the_watch_set() {
    let provider = FakeProvider::new()
        .script_job(B, vec![Ok(JobState::Pending), Ok(JobState::Running)])
        .script_job(C, vec![Ok(JobState::Pending)]);

    wait_for_jobs(&provider, &handles(), budget(10))
        .await
        .unwrap();

    assert_eq!(queries(&provider, A), 1);
    assert_eq!(queries(&provider, B), 3);
    assert_eq!(queries(&provider, C), 2);
}

#[tokio::test]
async fn first_failure_ends_the_wait_while_siblings_pend() {
    let provider = FakeProvider::new()
        .script_job(A, vec![Ok(JobState::Pending); 5])
        .script_job(
            B,
            vec![
                Ok(JobState::Pending),
                Ok(JobState::Failed {
                    detail: "disk full".into(),
                }),
            ],
        )
        .script_job(C, vec![Ok(JobState::Pending); 5]);

    let err = wait_for_jobs(&provider, &handles(), budget(10))
        .await
        .unwrap_err();

    match err.downcast_ref::<WorkflowError>() {
        Some(WorkflowError::JobFailed { job, detail }) => {
            assert_eq!(detail, "disk full");
            assert!(job.contains("job 2"), "{job}");
        }
        other => panic!("unexpected {other:?}"),
    }
    // C is not queried again after B fails in round two.
    assert_eq!(queries(&provider, C), 1);
}

#[tokio::test]
async fn transport_errors_are_retried() {
    let provider = FakeProvider::new().script_job(A, vec![Err("connection reset".into())]);
    let job = JobHandle::new(7, A, JobKind::Boot);

    wait_for_jobs(&provider, &[job], budget(2)).await.unwrap();
    assert_eq!(queries(&provider, A), 2);
}

#[tokio::test]
async fn exhausted_budget_times_out_naming_pending_jobs() {
    let provider = FakeProvider::new()
        .script_job(A, vec![Ok(JobState::Pending); 10])
        .script_job(B, vec![Err("connection reset".into()); 10]);
    let jobs = &handles()[..2];

    let err = wait_for_jobs(&provider, jobs, budget(3)).await.unwrap_err();

    match err.downcast_ref::<WorkflowError>() {
        Some(WorkflowError::Timeout {
            waiting_for,
            attempts,
        }) => {
            assert_eq!(*attempts, 3);
            assert!(waiting_for.contains("job 1"), "{waiting_for}");
            assert!(waiting_for.contains("job 2"), "{waiting_for}");
            assert!(waiting_for.contains("connection reset"), "{waiting_for}");
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(queries(&provider, A), 3);
}

#[tokio::test]
async fn readiness_polls_until_running() {
    let provider = FakeProvider::new()
        .script_status(vec![InstanceStatus::BeingCreated, InstanceStatus::BrandNew]);
    wait_until_running(&provider, 7, budget(5)).await.unwrap();
    assert_eq!(provider.count(|c| *c == Call::InstanceStatus(7)), 3);
}

#[tokio::test]
async fn readiness_timeout_reports_last_status() {
    let provider = FakeProvider::new().script_status(vec![InstanceStatus::PoweredOff; 4]);
    let err = wait_until_running(&provider, 7, budget(2)).await.unwrap_err();
    let message = err.to_string();
    assert!(message.contains("2 attempts"), "{message}");
    assert!(
        message.contains(&InstanceStatus::PoweredOff.to_string()),
        "{message}"
    );
}
