//! Linode API client: implements the provider ports over HTTP.
//!
//! Every call is `GET {api_url}?api_key=..&api_action=..&<params>` and
//! answers with an envelope `{"ERRORARRAY": [...], "DATA": ...}`. Transport
//! failures and a non-empty `ERRORARRAY` both surface as
//! `WorkflowError::ApiError`; nothing here retries.

use std::time::Duration;

use anyhow::{Context, Result};
use linodectl_common::{
    InstanceStatus, JobHandle, JobKind, JobState, ProviderId, ProviderRecord,
};
use serde::Deserialize;
use serde_json::Value;

use crate::application::ports::{
    Catalog, CatalogReader, CatalogRow, CreateSpec, JobTracker, ProviderGateway, Provisioned,
    Selector,
};
use crate::domain::WorkflowError;

/// Swap disk size in MB; the root disk gets the rest of the plan.
const SWAP_MB: u64 = 256;
const CONFIG_LABEL: &str = "linodectl";
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the Linode API.
pub struct LinodeClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl LinodeClient {
    /// Build a client for `api_url` authenticated with `api_key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(api_url: &str, api_key: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .user_agent(concat!("linodectl/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("building HTTP client")?;
        Ok(Self {
            http,
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
        })
    }

    async fn call(&self, action: &str, params: &[(&str, String)]) -> Result<Value> {
        let mut query: Vec<(&str, &str)> =
            vec![("api_key", &self.api_key), ("api_action", action)];
        query.extend(params.iter().map(|(k, v)| (*k, v.as_str())));
        let url = reqwest::Url::parse_with_params(&self.api_url, &query)
            .with_context(|| format!("invalid api_url {}", self.api_url))?;

        tracing::debug!(action, "linode api call");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| WorkflowError::ApiError(format!("{action}: {e}")))?;
        let status = response.status();
        let body: Value = response.json().await.map_err(|e| {
            WorkflowError::ApiError(format!("{action}: unreadable response (HTTP {status}): {e}"))
        })?;
        Ok(decode_envelope(action, body)?)
    }

    async fn rows(&self, action: &str, params: &[(&str, String)]) -> Result<Vec<Value>> {
        match self.call(action, params).await? {
            Value::Array(rows) => Ok(rows),
            other => Err(unexpected(action, &other).into()),
        }
    }

    async fn job_call(
        &self,
        action: &str,
        id: ProviderId,
        kind: JobKind,
        extra: &[(&str, String)],
    ) -> Result<JobHandle> {
        let mut params = vec![("LinodeID", id.to_string())];
        params.extend(extra.iter().cloned());
        let data = self.call(action, &params).await?;
        let job_id = field_u64(&data, "JobID").ok_or_else(|| unexpected(action, &data))?;
        Ok(JobHandle::new(id, job_id, kind))
    }

    async fn select_id(&self, catalog: Catalog, selector: &Selector) -> Result<u64> {
        if let Selector::Id(id) = selector {
            return Ok(*id);
        }
        let rows = self.catalog(catalog).await?;
        let picked = match catalog {
            Catalog::Datacenters => pick_datacenter(&rows, selector),
            Catalog::Distributions => pick_distribution(&rows, selector),
            Catalog::Kernels => pick_kernel(&rows, selector),
            Catalog::Plans => pick_plan(&rows, selector).map(|p| p.id),
            Catalog::Linodes => None,
        };
        picked.ok_or_else(|| {
            WorkflowError::ApiError(format!("no {} entry matches {selector}", catalog.name())).into()
        })
    }
}

impl ProviderGateway for LinodeClient {
    async fn find_by_label(&self, label: &str) -> Result<Option<ProviderRecord>> {
        let rows = self.rows("linode.list", &[]).await?;
        Ok(rows
            .iter()
            .filter(|row| row.get("LABEL").and_then(Value::as_str) == Some(label))
            .find_map(record_from_row))
    }

    async fn create(&self, spec: &CreateSpec) -> Result<Provisioned> {
        let datacenter_id = self.select_id(Catalog::Datacenters, &spec.datacenter).await?;
        let distribution_id = self
            .select_id(Catalog::Distributions, &spec.distribution)
            .await?;
        let kernel_id = self.select_id(Catalog::Kernels, &spec.kernel).await?;
        let plans = self.catalog(Catalog::Plans).await?;
        let plan = pick_plan(&plans, &spec.plan).ok_or_else(|| {
            WorkflowError::ApiError(format!("no plans entry matches {}", spec.plan))
        })?;

        let data = self
            .call(
                "linode.create",
                &[
                    ("DatacenterID", datacenter_id.to_string()),
                    ("PlanID", plan.id.to_string()),
                    ("PaymentTerm", spec.payment_term.to_string()),
                ],
            )
            .await?;
        let id = field_u64(&data, "LinodeID").ok_or_else(|| unexpected("linode.create", &data))?;
        tracing::info!(linode = id, label = %spec.label, "linode allocated");

        self.call(
            "linode.update",
            &[("LinodeID", id.to_string()), ("Label", spec.label.clone())],
        )
        .await?;

        let mut root_params = vec![
            ("LinodeID", id.to_string()),
            ("DistributionID", distribution_id.to_string()),
            ("Label", format!("{} root", spec.label)),
            ("Size", root_disk_mb(plan.disk_gb).to_string()),
            ("rootPass", spec.root_password.clone()),
        ];
        if let Some(key) = &spec.ssh_public_key {
            root_params.push(("rootSSHKey", key.clone()));
        }
        let root = self
            .call("linode.disk.createfromdistribution", &root_params)
            .await?;
        let swap = self
            .call(
                "linode.disk.create",
                &[
                    ("LinodeID", id.to_string()),
                    ("Label", format!("{} swap", spec.label)),
                    ("Type", "swap".to_string()),
                    ("Size", SWAP_MB.to_string()),
                ],
            )
            .await?;

        let mut jobs = Vec::new();
        let mut disks = Vec::new();
        for (action, data) in [
            ("linode.disk.createfromdistribution", &root),
            ("linode.disk.create", &swap),
        ] {
            let job = field_u64(data, "JobID").ok_or_else(|| unexpected(action, data))?;
            let disk = field_u64(data, "DiskID").ok_or_else(|| unexpected(action, data))?;
            jobs.push(JobHandle::new(id, job, JobKind::Create));
            disks.push(disk.to_string());
        }

        let config = self
            .call(
                "linode.config.create",
                &[
                    ("LinodeID", id.to_string()),
                    ("KernelID", kernel_id.to_string()),
                    ("Label", CONFIG_LABEL.to_string()),
                    ("DiskList", disks.join(",")),
                ],
            )
            .await?;
        let config_id =
            field_u64(&config, "ConfigID").ok_or_else(|| unexpected("linode.config.create", &config))?;

        jobs.push(
            self.job_call(
                "linode.boot",
                id,
                JobKind::Boot,
                &[("ConfigID", config_id.to_string())],
            )
            .await?,
        );

        let ips = self
            .rows("linode.ip.list", &[("LinodeID", id.to_string())])
            .await?;

        Ok(Provisioned {
            record: ProviderRecord {
                id,
                label: spec.label.clone(),
                datacenter_id: Some(datacenter_id),
                plan_id: Some(plan.id),
            },
            ip: public_ip(&ips),
            jobs,
        })
    }

    async fn boot(&self, id: ProviderId) -> Result<JobHandle> {
        self.job_call("linode.boot", id, JobKind::Boot, &[]).await
    }

    async fn reboot(&self, id: ProviderId) -> Result<JobHandle> {
        self.job_call("linode.reboot", id, JobKind::Reboot, &[]).await
    }

    async fn shutdown(&self, id: ProviderId) -> Result<JobHandle> {
        self.job_call("linode.shutdown", id, JobKind::Shutdown, &[])
            .await
    }

    async fn resize(&self, id: ProviderId, plan: &Selector) -> Result<()> {
        let plan_id = self.select_id(Catalog::Plans, plan).await?;
        self.call(
            "linode.resize",
            &[("LinodeID", id.to_string()), ("PlanID", plan_id.to_string())],
        )
        .await?;
        Ok(())
    }

    async fn delete_disks(&self, id: ProviderId) -> Result<Vec<JobHandle>> {
        let disks = self
            .rows("linode.disk.list", &[("LinodeID", id.to_string())])
            .await?;
        let mut jobs = Vec::with_capacity(disks.len());
        for disk_id in disks.iter().filter_map(|d| field_u64(d, "DISKID")) {
            jobs.push(
                self.job_call(
                    "linode.disk.delete",
                    id,
                    JobKind::DeleteDisk,
                    &[("DiskID", disk_id.to_string())],
                )
                .await?,
            );
        }
        Ok(jobs)
    }

    async fn delete_instance(&self, id: ProviderId) -> Result<()> {
        self.call(
            "linode.delete",
            &[("LinodeID", id.to_string()), ("skipChecks", "true".to_string())],
        )
        .await?;
        Ok(())
    }
}

impl JobTracker for LinodeClient {
    async fn job_state(&self, job: &JobHandle) -> Result<JobState> {
        let rows = self
            .rows(
                "linode.job.list",
                &[
                    ("LinodeID", job.linode_id.to_string()),
                    ("JobID", job.job_id.to_string()),
                ],
            )
            .await?;
        rows.iter()
            .find(|row| field_u64(row, "JOBID") == Some(job.job_id))
            .map(job_state_from_row)
            .ok_or_else(|| WorkflowError::ApiError(format!("{job} not found")).into())
    }

    async fn instance_status(&self, id: ProviderId) -> Result<InstanceStatus> {
        let rows = self
            .rows("linode.list", &[("LinodeID", id.to_string())])
            .await?;
        rows.iter()
            .find(|row| field_u64(row, "LINODEID") == Some(id))
            .and_then(|row| field_i64(row, "STATUS"))
            .map(InstanceStatus::from_code)
            .ok_or_else(|| WorkflowError::InstanceNotFound(format!("linode {id}")).into())
    }
}

impl CatalogReader for LinodeClient {
    async fn catalog(&self, catalog: Catalog) -> Result<Vec<CatalogRow>> {
        let action = match catalog {
            Catalog::Datacenters => "avail.datacenters",
            Catalog::Distributions => "avail.distributions",
            Catalog::Kernels => "avail.kernels",
            Catalog::Linodes => "linode.list",
            Catalog::Plans => "avail.linodeplans",
        };
        Ok(self
            .rows(action, &[])
            .await?
            .into_iter()
            .filter_map(|row| match row {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect())
    }
}

// ── Response decoding ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "ERRORARRAY", default)]
    errors: Vec<ApiErrorEntry>,
    #[serde(rename = "DATA", default)]
    data: Value,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEntry {
    #[serde(rename = "ERRORCODE", default)]
    code: Value,
    #[serde(rename = "ERRORMESSAGE", default)]
    message: String,
}

/// Unwrap the API envelope, turning a non-empty `ERRORARRAY` into an error.
fn decode_envelope(action: &str, body: Value) -> Result<Value, WorkflowError> {
    let envelope: Envelope = serde_json::from_value(body)
        .map_err(|e| WorkflowError::ApiError(format!("{action}: malformed response: {e}")))?;
    if envelope.errors.is_empty() {
        return Ok(envelope.data);
    }
    let messages = envelope
        .errors
        .iter()
        .map(|e| {
            if e.message.is_empty() {
                format!("error code {}", e.code)
            } else {
                e.message.clone()
            }
        })
        .collect::<Vec<_>>()
        .join("; ");
    Err(WorkflowError::ApiError(format!("{action}: {messages}")))
}

fn unexpected(action: &str, data: &Value) -> WorkflowError {
    WorkflowError::ApiError(format!("{action}: unexpected response {data}"))
}

/// Read a numeric field the API may send as a number or a string.
fn field_u64(row: &Value, key: &str) -> Option<u64> {
    let v = row.get(key)?;
    v.as_u64().or_else(|| v.as_str()?.trim().parse().ok())
}

fn field_i64(row: &Value, key: &str) -> Option<i64> {
    let v = row.get(key)?;
    v.as_i64().or_else(|| v.as_str()?.trim().parse().ok())
}

fn field_str<'a>(row: &'a Value, key: &str) -> &'a str {
    row.get(key).and_then(Value::as_str).unwrap_or("")
}

fn record_from_row(row: &Value) -> Option<ProviderRecord> {
    Some(ProviderRecord {
        id: field_u64(row, "LINODEID")?,
        label: field_str(row, "LABEL").to_string(),
        datacenter_id: field_u64(row, "DATACENTERID"),
        plan_id: field_u64(row, "PLANID"),
    })
}

/// `HOST_SUCCESS` is 1 on success, 0 on failure once the job has finished,
/// and empty while it is queued or running.
fn job_state_from_row(row: &Value) -> JobState {
    let finished = !field_str(row, "HOST_FINISH_DT").is_empty();
    let started = !field_str(row, "HOST_START_DT").is_empty();
    match field_i64(row, "HOST_SUCCESS") {
        Some(1) => JobState::Succeeded,
        Some(0) if finished => {
            let message = field_str(row, "HOST_MESSAGE");
            JobState::Failed {
                detail: if message.is_empty() {
                    format!("{} failed", field_str(row, "ACTION"))
                } else {
                    message.to_string()
                },
            }
        }
        _ if started => JobState::Running,
        _ => JobState::Pending,
    }
}

fn public_ip(rows: &[Value]) -> Option<String> {
    rows.iter()
        .find(|row| field_i64(row, "ISPUBLIC") == Some(1))
        .map(|row| field_str(row, "IPADDRESS").to_string())
        .filter(|ip| !ip.is_empty())
}

fn root_disk_mb(plan_disk_gb: u64) -> u64 {
    (plan_disk_gb * 1024).saturating_sub(SWAP_MB)
}

// ── Slug matching ─────────────────────────────────────────────────────────────

/// Lowercase, with every run of non-alphanumerics collapsed to `-`.
fn slugify(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    out.trim_end_matches('-').to_string()
}

fn pick_by_id(rows: &[CatalogRow], key: &str, id: u64) -> Option<u64> {
    rows.iter()
        .filter_map(|row| field_u64(&Value::Object(row.clone()), key))
        .find(|&row_id| row_id == id)
}

fn pick_datacenter(rows: &[CatalogRow], selector: &Selector) -> Option<u64> {
    match selector {
        Selector::Id(id) => pick_by_id(rows, "DATACENTERID", *id),
        Selector::Slug(slug) => {
            let slug = slugify(slug);
            rows.iter().map(|r| Value::Object(r.clone())).find_map(|row| {
                let abbr = slugify(field_str(&row, "ABBR"));
                let location = slugify(field_str(&row, "LOCATION"));
                (abbr == slug || location.starts_with(&slug))
                    .then(|| field_u64(&row, "DATACENTERID"))
                    .flatten()
            })
        }
    }
}

fn pick_distribution(rows: &[CatalogRow], selector: &Selector) -> Option<u64> {
    match selector {
        Selector::Id(id) => pick_by_id(rows, "DISTRIBUTIONID", *id),
        Selector::Slug(slug) => {
            let slug = slugify(slug);
            rows.iter().map(|r| Value::Object(r.clone())).find_map(|row| {
                (slugify(field_str(&row, "LABEL")) == slug)
                    .then(|| field_u64(&row, "DISTRIBUTIONID"))
                    .flatten()
            })
        }
    }
}

/// Kernel names match exactly first, then by prefix (`Latest 64 bit`
/// matches `Latest 64 bit (4.1.5-x86_64-linode61)`).
fn pick_kernel(rows: &[CatalogRow], selector: &Selector) -> Option<u64> {
    match selector {
        Selector::Id(id) => pick_by_id(rows, "KERNELID", *id),
        Selector::Slug(name) => {
            let rows: Vec<Value> = rows.iter().map(|r| Value::Object(r.clone())).collect();
            let exact = rows.iter().find(|row| field_str(row, "LABEL") == name);
            exact
                .or_else(|| {
                    rows.iter()
                        .find(|row| field_str(row, "LABEL").starts_with(name.as_str()))
                })
                .and_then(|row| field_u64(row, "KERNELID"))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PlanChoice {
    id: u64,
    disk_gb: u64,
}

/// Plans match by id, by RAM in MB (`2048`), or by slugified label.
fn pick_plan(rows: &[CatalogRow], selector: &Selector) -> Option<PlanChoice> {
    rows.iter().map(|r| Value::Object(r.clone())).find_map(|row| {
        let id = field_u64(&row, "PLANID")?;
        let matched = match selector {
            Selector::Id(want) => id == *want,
            Selector::Slug(slug) => {
                field_u64(&row, "RAM").is_some_and(|ram| ram.to_string() == *slug)
                    || slugify(field_str(&row, "LABEL")) == slugify(slug)
            }
        };
        matched.then(|| PlanChoice {
            id,
            disk_gb: field_u64(&row, "DISK").unwrap_or_default(),
        })
    })
}
