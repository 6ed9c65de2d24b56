//! Long-running server jobs: start, poll status, fetch result, commit.
//!
//! The caller decides the polling cadence; nothing here sleeps or loops.

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::resource::{json_body, parse_data};
use crate::transport::Transport;

pub type JobId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Pending,
    Running,
    Done,
    Failed,
}

impl JobState {
    /// No further transitions happen once `Done` or `Failed`.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Done | JobState::Failed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStatus {
    pub state: JobState,
    #[serde(default)]
    pub processed: Option<u64>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub error: Option<String>,
}

impl JobStatus {
    /// Progress in `0.0..=1.0` when both counters are known.
    pub fn progress(&self) -> Option<f64> {
        match (self.processed, self.total) {
            (Some(done), Some(total)) if total > 0 => Some((done.min(total)) as f64 / total as f64),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Started {
    job_id: JobId,
}

#[derive(Debug, Clone, Serialize)]
struct CommitRequest<'a> {
    items: &'a [usize],
}

/// Summary returned after committing selected results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitOutcome {
    pub created: u64,
}

/// Job endpoints rooted at `path`, started with `S` and producing `R` items.
pub struct JobEndpoint<S, R> {
    path: &'static str,
    _shapes: PhantomData<fn() -> (S, R)>,
}

impl<S, R> fmt::Debug for JobEndpoint<S, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobEndpoint").field("path", &self.path).finish()
    }
}

impl<S, R> JobEndpoint<S, R> {
    pub const fn new(path: &'static str) -> Self {
        Self {
            path,
            _shapes: PhantomData,
        }
    }

    pub fn path(&self) -> &'static str {
        self.path
    }

    pub fn build_status(&self, job: JobId) -> HttpRequest {
        HttpRequest::new(HttpMethod::Get, format!("{}/{job}", self.path))
    }

    pub fn build_result(&self, job: JobId) -> HttpRequest {
        HttpRequest::new(HttpMethod::Get, format!("{}/{job}/result", self.path))
    }

    /// Persist the results at `indices` (positions in the result list).
    pub fn build_commit(&self, job: JobId, indices: &[usize]) -> Result<HttpRequest, ApiError> {
        Ok(
            HttpRequest::new(HttpMethod::Post, format!("{}/{job}/commit", self.path))
                .with_body(json_body(&CommitRequest { items: indices })?),
        )
    }

    pub fn parse_start(&self, response: HttpResponse) -> Result<JobId, ApiError> {
        parse_data::<Started>(response).map(|s| s.job_id)
    }

    pub fn parse_status(&self, response: HttpResponse) -> Result<JobStatus, ApiError> {
        parse_data(response)
    }

    pub fn parse_commit(&self, response: HttpResponse) -> Result<CommitOutcome, ApiError> {
        parse_data(response)
    }

    pub async fn status<T: Transport + ?Sized>(&self, transport: &T, job: JobId) -> Result<JobStatus, ApiError> {
        let response = transport.execute(self.build_status(job)).await?;
        self.parse_status(response)
    }

    pub async fn commit<T: Transport + ?Sized>(
        &self,
        transport: &T,
        job: JobId,
        indices: &[usize],
    ) -> Result<CommitOutcome, ApiError> {
        let response = transport.execute(self.build_commit(job, indices)?).await?;
        let outcome = self.parse_commit(response)?;
        tracing::debug!(job = %job, created = outcome.created, "committed job results");
        Ok(outcome)
    }
}

impl<S: Serialize + Sync, R> JobEndpoint<S, R> {
    pub fn build_start(&self, input: &S) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest::new(HttpMethod::Post, self.path).with_body(json_body(input)?))
    }

    pub async fn start<T: Transport + ?Sized>(&self, transport: &T, input: &S) -> Result<JobId, ApiError> {
        let response = transport.execute(self.build_start(input)?).await?;
        let job = self.parse_start(response)?;
        tracing::debug!(path = self.path, job = %job, "started job");
        Ok(job)
    }
}

impl<S, R: DeserializeOwned> JobEndpoint<S, R> {
    pub fn parse_result(&self, response: HttpResponse) -> Result<Vec<R>, ApiError> {
        parse_data(response)
    }

    /// Produced items; the server rejects this until the job is `done`.
    pub async fn result<T: Transport + ?Sized>(&self, transport: &T, job: JobId) -> Result<Vec<R>, ApiError> {
        let response = transport.execute(self.build_result(job)).await?;
        self.parse_result(response)
    }
}
