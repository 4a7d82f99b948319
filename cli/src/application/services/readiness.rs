//! Instance readiness waiter.
//!
//! A finished job does not mean a usable instance: the linode may still be
//! booting. This loop watches the instance's own status instead.

use anyhow::Result;
use linodectl_common::{InstanceStatus, ProviderId};

use crate::application::ports::JobTracker;
use crate::domain::{PollBudget, WorkflowError};

/// Poll the instance status until it reports running.
///
/// # Errors
///
/// Returns `WorkflowError::Timeout` if the instance is not running within
/// the budget. Status query errors are retried.
pub async fn wait_until_running(
    tracker: &impl JobTracker,
    id: ProviderId,
    budget: PollBudget,
) -> Result<()> {
    let mut last_seen: Option<String> = None;

    for attempt in 1..=budget.max_attempts {
        match tracker.instance_status(id).await {
            Ok(status) if status.is_ready() => {
                tracing::debug!(linode = id, attempt, "instance is running");
                return Ok(());
            }
            Ok(status) => {
                tracing::debug!(linode = id, attempt, %status, "instance not ready");
                last_seen = Some(status.to_string());
            }
            Err(e) => {
                tracing::warn!(linode = id, error = %e, "status query failed, retrying");
                last_seen = Some(format!("error: {e:#}"));
            }
        }
        if attempt < budget.max_attempts {
            tokio::time::sleep(budget.interval).await;
        }
    }

    let last_seen = last_seen.unwrap_or_else(|| "nothing".to_string());
    Err(WorkflowError::Timeout {
        waiting_for: format!(
            "linode {id} to report {} (last seen: {last_seen})",
            InstanceStatus::Running
        ),
        attempts: budget.max_attempts,
    }
    .into())
}
