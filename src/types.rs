use serde::{Deserialize, Serialize};

/// Job status lifecycle: Pending -> Processing -> Completed/Failed.
///
/// `Completed` and `Failed` are terminal; a record never leaves a terminal
/// status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(JobStatus::Pending),
            "processing" => Some(JobStatus::Processing),
            "completed" => Some(JobStatus::Completed),
            "failed" => Some(JobStatus::Failed),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// The four ordered pipeline stages.
///
/// Each stage writes its entry progress to the job record before the
/// collaborator call is made, so pollers see 10/30/60/80 checkpoints and a
/// failed job keeps the progress of the last stage it entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStep {
    WritingStory,
    GeneratingVisuals,
    CreatingNarration,
    RenderingVideo,
}

impl PipelineStep {
    pub fn as_str(&self) -> &str {
        match self {
            PipelineStep::WritingStory => "writing_story",
            PipelineStep::GeneratingVisuals => "generating_visuals",
            PipelineStep::CreatingNarration => "creating_narration",
            PipelineStep::RenderingVideo => "rendering_video",
        }
    }

    /// Progress value written when the stage is entered.
    pub fn entry_progress(&self) -> u8 {
        match self {
            PipelineStep::WritingStory => 10,
            PipelineStep::GeneratingVisuals => 30,
            PipelineStep::CreatingNarration => 60,
            PipelineStep::RenderingVideo => 80,
        }
    }
}

/// Supported visual styles for generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoStyle {
    Cinematic,
    Anime,
    Kids,
    Documentary,
}

impl VideoStyle {
    pub const ALL: [VideoStyle; 4] = [
        VideoStyle::Cinematic,
        VideoStyle::Anime,
        VideoStyle::Kids,
        VideoStyle::Documentary,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            VideoStyle::Cinematic => "cinematic",
            VideoStyle::Anime => "anime",
            VideoStyle::Kids => "kids",
            VideoStyle::Documentary => "documentary",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "cinematic" => Some(VideoStyle::Cinematic),
            "anime" => Some(VideoStyle::Anime),
            "kids" => Some(VideoStyle::Kids),
            "documentary" => Some(VideoStyle::Documentary),
            _ => None,
        }
    }
}

/// Kind of visual asset requested from the visual collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualKind {
    Image,
    Video,
}

impl Default for VisualKind {
    fn default() -> Self {
        VisualKind::Image
    }
}

/// One generation job and its progress snapshot.
///
/// Created by the [`Dispatcher`](crate::Dispatcher) at `pending` and mutated
/// only by the pipeline worker assigned to it. `current_step` is present
/// exactly while the job is `processing`; a terminal record carries exactly
/// one of `video_url` or `error`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// Unique identifier, assigned once at creation.
    #[serde(rename = "jobId")]
    pub id: String,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_step: Option<PipelineStep>,
    /// 0-100, monotonically non-decreasing until a terminal status.
    pub progress: u8,
    pub prompt: String,
    pub style: VideoStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// ISO 8601 timestamp when the job was created.
    pub created_at: String,
    /// ISO 8601 timestamp when processing started.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    /// ISO 8601 timestamp when the job reached a terminal status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

impl Job {
    /// Create a fresh pending record with the immutable inputs captured.
    pub fn new(id: String, prompt: String, style: VideoStyle) -> Self {
        Self {
            id,
            status: JobStatus::Pending,
            current_step: None,
            progress: 0,
            prompt,
            style,
            video_url: None,
            error: None,
            created_at: chrono::Utc::now().to_rfc3339(),
            started_at: None,
            completed_at: None,
        }
    }

    /// Merge a partial update into the record, enforcing the lifecycle
    /// invariants: terminal records never change, progress never decreases,
    /// and entering a terminal status clears `current_step` and stamps
    /// `completed_at`.
    pub(crate) fn apply(&mut self, update: JobUpdate) {
        if self.status.is_terminal() {
            return;
        }

        if let Some(status) = update.status {
            if status == JobStatus::Processing && self.started_at.is_none() {
                self.started_at = Some(chrono::Utc::now().to_rfc3339());
            }
            if status.is_terminal() {
                self.current_step = None;
                self.completed_at = Some(chrono::Utc::now().to_rfc3339());
            }
            self.status = status;
        }

        if let Some(step) = update.current_step {
            if !self.status.is_terminal() {
                self.current_step = Some(step);
            }
        }

        if let Some(progress) = update.progress {
            self.progress = self.progress.max(progress);
        }

        if update.video_url.is_some() {
            self.video_url = update.video_url;
        }
        if update.error.is_some() {
            self.error = update.error;
        }
    }
}

/// Partial update merged into a [`Job`] by [`JobStore::update`](crate::JobStore::update).
///
/// The named constructors produce the three legal write shapes of the
/// pipeline worker; `Default` gives an empty update for custom merges.
#[derive(Debug, Clone, Default)]
pub struct JobUpdate {
    pub status: Option<JobStatus>,
    pub current_step: Option<PipelineStep>,
    pub progress: Option<u8>,
    pub video_url: Option<String>,
    pub error: Option<String>,
}

impl JobUpdate {
    /// Stage entry: mark processing, set the step and its entry progress.
    pub fn checkpoint(step: PipelineStep) -> Self {
        Self {
            status: Some(JobStatus::Processing),
            current_step: Some(step),
            progress: Some(step.entry_progress()),
            ..Default::default()
        }
    }

    /// Successful completion with the composed video reference.
    pub fn completed(video_url: String) -> Self {
        Self {
            status: Some(JobStatus::Completed),
            progress: Some(100),
            video_url: Some(video_url),
            ..Default::default()
        }
    }

    /// Terminal failure with the collaborator's error message.
    pub fn failed(error: String) -> Self {
        Self {
            status: Some(JobStatus::Failed),
            error: Some(error),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_job() -> Job {
        Job::new(
            "job-1".to_string(),
            "a lighthouse at dusk".to_string(),
            VideoStyle::Cinematic,
        )
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [
            JobStatus::Pending,
            JobStatus::Processing,
            JobStatus::Completed,
            JobStatus::Failed,
        ] {
            assert_eq!(JobStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(JobStatus::parse("unknown"), None);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }

    #[test]
    fn test_entry_progress_checkpoints() {
        assert_eq!(PipelineStep::WritingStory.entry_progress(), 10);
        assert_eq!(PipelineStep::GeneratingVisuals.entry_progress(), 30);
        assert_eq!(PipelineStep::CreatingNarration.entry_progress(), 60);
        assert_eq!(PipelineStep::RenderingVideo.entry_progress(), 80);
    }

    #[test]
    fn test_style_parse() {
        assert_eq!(VideoStyle::parse("anime"), Some(VideoStyle::Anime));
        assert_eq!(VideoStyle::parse("noir"), None);
        for style in VideoStyle::ALL {
            assert_eq!(VideoStyle::parse(style.as_str()), Some(style));
        }
    }

    #[test]
    fn test_new_job_is_pending() {
        let job = make_job();
        assert_eq!(job.status, JobStatus::Pending);
        assert_eq!(job.progress, 0);
        assert!(job.current_step.is_none());
        assert!(!job.created_at.is_empty());
        assert!(job.started_at.is_none());
    }

    #[test]
    fn test_checkpoint_marks_processing() {
        let mut job = make_job();
        job.apply(JobUpdate::checkpoint(PipelineStep::WritingStory));

        assert_eq!(job.status, JobStatus::Processing);
        assert_eq!(job.current_step, Some(PipelineStep::WritingStory));
        assert_eq!(job.progress, 10);
        assert!(job.started_at.is_some());
    }

    #[test]
    fn test_completed_clears_step_and_stamps() {
        let mut job = make_job();
        job.apply(JobUpdate::checkpoint(PipelineStep::RenderingVideo));
        job.apply(JobUpdate::completed("video://final.mp4".to_string()));

        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.progress, 100);
        assert!(job.current_step.is_none());
        assert_eq!(job.video_url.as_deref(), Some("video://final.mp4"));
        assert!(job.error.is_none());
        assert!(job.completed_at.is_some());
    }

    #[test]
    fn test_failed_keeps_last_checkpoint_progress() {
        let mut job = make_job();
        job.apply(JobUpdate::checkpoint(PipelineStep::CreatingNarration));
        job.apply(JobUpdate::failed("voice synthesis failed".to_string()));

        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.progress, 60);
        assert!(job.current_step.is_none());
        assert!(job.video_url.is_none());
        assert_eq!(job.error.as_deref(), Some("voice synthesis failed"));
    }

    #[test]
    fn test_terminal_record_is_frozen() {
        let mut job = make_job();
        job.apply(JobUpdate::failed("backend down".to_string()));
        job.apply(JobUpdate::completed("video://late.mp4".to_string()));

        assert_eq!(job.status, JobStatus::Failed);
        assert!(job.video_url.is_none());
        assert_eq!(job.error.as_deref(), Some("backend down"));
    }

    #[test]
    fn test_progress_never_decreases() {
        let mut job = make_job();
        job.apply(JobUpdate::checkpoint(PipelineStep::CreatingNarration));
        job.apply(JobUpdate::checkpoint(PipelineStep::WritingStory));

        assert_eq!(job.progress, 60);
    }

    #[test]
    fn test_wire_shape() {
        let mut job = make_job();
        job.apply(JobUpdate::checkpoint(PipelineStep::WritingStory));

        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(value["jobId"], "job-1");
        assert_eq!(value["status"], "processing");
        assert_eq!(value["currentStep"], "writing_story");
        assert_eq!(value["style"], "cinematic");
        assert!(value.get("videoUrl").is_none());
        assert!(value.get("error").is_none());

        job.apply(JobUpdate::completed("video://final.mp4".to_string()));
        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(value["videoUrl"], "video://final.mp4");
        assert!(value.get("currentStep").is_none());
    }
}
