//! In-memory render queue and the row view shown for each job.
//!
//! `RenderQueue` accepts jobs through the [`RenderJobClient`] contract, so a composer
//! can submit straight into it. The render engine reports progress back through
//! `mark_running`, `mark_done` and `mark_failed`.
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::params::{JobRequest, StillJobParams, VideoJobParams};
use crate::error::{Error, Result};
use crate::io::RenderJobClient;
use crate::types::RenderMode;

pub type JobId = u64;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Running { progress: f64 },
    Done,
    Failed { message: String },
}

impl JobStatus {
    pub fn is_finished(&self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Failed { .. })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RenderJob {
    pub id: JobId,
    pub request: JobRequest,
    pub created_at: DateTime<Utc>,
    pub status: JobStatus,
}

impl RenderJob {
    pub fn kind(&self) -> RenderMode {
        self.request.mode()
    }
}

/// What a queue row displays for one job.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RenderQueueItem {
    pub id: JobId,
    pub title: String,
    pub output_name: String,
    pub status_label: String,
    pub removable: bool,
}

impl From<&RenderJob> for RenderQueueItem {
    fn from(job: &RenderJob) -> Self {
        let status_label = match &job.status {
            JobStatus::Queued => "Queued".to_string(),
            JobStatus::Running { progress } => {
                format!("Rendering {}%", (progress.clamp(0.0, 1.0) * 100.0).round() as u32)
            }
            JobStatus::Done => "Done".to_string(),
            JobStatus::Failed { message } => format!("Failed: {message}"),
        };
        Self {
            id: job.id,
            title: job.request.composition_id().to_string(),
            output_name: job.request.out_name().to_string(),
            status_label,
            removable: !matches!(job.status, JobStatus::Running { .. }),
        }
    }
}

#[derive(Default)]
struct QueueInner {
    next_id: JobId,
    jobs: Vec<RenderJob>,
}

/// Shared, thread-safe job list. Clones refer to the same queue.
#[derive(Clone, Default)]
pub struct RenderQueue {
    inner: Arc<Mutex<QueueInner>>,
}

impl RenderQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, QueueInner>> {
        self.inner
            .lock()
            .map_err(|e| Error::external(format!("render queue lock poisoned: {e}")))
    }

    /// Queue a job. Rejected while an unfinished job writes the same output.
    pub fn add(&self, request: JobRequest) -> Result<JobId> {
        let mut inner = self.lock()?;
        let clash = inner
            .jobs
            .iter()
            .any(|j| !j.status.is_finished() && j.request.out_name() == request.out_name());
        if clash {
            warn!("Rejecting job, {} is already being rendered", request.out_name());
            return Err(Error::JobRejected(format!(
                "an unfinished job already writes to {}",
                request.out_name()
            )));
        }

        inner.next_id += 1;
        let id = inner.next_id;
        info!(
            "Queued {} job {} for {} -> {}",
            request.mode(),
            id,
            request.composition_id(),
            request.out_name()
        );
        inner.jobs.push(RenderJob {
            id,
            request,
            created_at: Utc::now(),
            status: JobStatus::Queued,
        });
        Ok(id)
    }

    pub fn jobs(&self) -> Vec<RenderJob> {
        self.lock().map(|inner| inner.jobs.clone()).unwrap_or_default()
    }

    pub fn items(&self) -> Vec<RenderQueueItem> {
        self.jobs().iter().map(RenderQueueItem::from).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().map(|inner| inner.jobs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn update(&self, id: JobId, status: JobStatus) -> Result<()> {
        let mut inner = self.lock()?;
        let job = inner
            .jobs
            .iter_mut()
            .find(|j| j.id == id)
            .ok_or_else(|| Error::external(format!("no render job with id {id}")))?;
        debug!("Job {} status {:?} -> {:?}", id, job.status, status);
        job.status = status;
        Ok(())
    }

    pub fn mark_running(&self, id: JobId, progress: f64) -> Result<()> {
        self.update(id, JobStatus::Running { progress })
    }

    pub fn mark_done(&self, id: JobId) -> Result<()> {
        self.update(id, JobStatus::Done)
    }

    pub fn mark_failed(&self, id: JobId, message: impl Into<String>) -> Result<()> {
        self.update(
            id,
            JobStatus::Failed {
                message: message.into(),
            },
        )
    }

    /// Remove a job that is not currently rendering. Returns whether it was removed.
    pub fn remove(&self, id: JobId) -> Result<bool> {
        let mut inner = self.lock()?;
        let before = inner.jobs.len();
        inner
            .jobs
            .retain(|j| j.id != id || matches!(j.status, JobStatus::Running { .. }));
        Ok(inner.jobs.len() != before)
    }
}

impl RenderJobClient for RenderQueue {
    fn add_still_render_job(&self, params: StillJobParams) -> Result<()> {
        self.add(JobRequest::Still(params)).map(|_| ())
    }

    fn add_video_render_job(&self, params: VideoJobParams) -> Result<()> {
        self.add(JobRequest::Video(params)).map(|_| ())
    }
}
