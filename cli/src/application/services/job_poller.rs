//! Job completion poller.
//!
//! Turns a set of pending provider jobs into one terminal outcome.
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::Result;
use linodectl_common::{JobHandle, JobState};

use crate::application::ports::JobTracker;
use crate::domain::{PollBudget, WorkflowError};

/// Wait until every job in `jobs` has succeeded.
///
/// Each round queries every job still being watched; succeeded jobs leave
/// the watch set. The first job observed as failed ends the wait, whatever
/// state its siblings are in. Query errors are retried on the next round
/// and count against the budget.
///
/// # Errors
///
/// Returns `WorkflowError::JobFailed` for a failed job and
/// `WorkflowError::Timeout` when the budget runs out first.
pub async fn wait_for_jobs(
    tracker: &impl JobTracker,
    jobs: &[JobHandle],
    budget: PollBudget,
) -> Result<()> {
    let mut watching: Vec<JobHandle> = jobs.to_vec();
    let mut last_error: Option<String> = None;

    for attempt in 1..=budget.max_attempts {
        if watching.is_empty() {
            return Ok(());
        }
        tracing::debug!(attempt, pending = watching.len(), "polling provider jobs");

        let mut still_pending = Vec::with_capacity(watching.len());
        for job in &watching {
            match tracker.job_state(job).await {
                Ok(JobState::Succeeded) => tracing::debug!(%job, "job succeeded"),
                Ok(JobState::Failed { detail }) => {
                    return Err(WorkflowError::JobFailed {
                        job: job.to_string(),
                        detail,
                    }
                    .into());
                }
                Ok(JobState::Pending | JobState::Running) => still_pending.push(*job),
                Err(e) => {
                    tracing::warn!(%job, error = %e, "job query failed, retrying");
                    last_error = Some(format!("{e:#}"));
                    still_pending.push(*job);
                }
            }
        }
        watching = still_pending;

        if watching.is_empty() {
            return Ok(());
        }
        if attempt < budget.max_attempts {
            tokio::time::sleep(budget.interval).await;
        }
    }

    if watching.is_empty() {
        return Ok(());
    }
    let mut waiting_for = watching
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    if let Some(err) = last_error {
        waiting_for.push_str(&format!(" (last error: {err})"));
    }
    Err(WorkflowError::Timeout {
        waiting_for,
        attempts: budget.max_attempts,
    }
    .into())
}
