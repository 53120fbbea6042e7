use std::sync::Arc;

use crate::config::PipelineConfig;
use crate::error::{ReelError, Result};
use crate::pipeline;
use crate::providers::{NarrationProvider, Providers, StoryProvider, VideoComposer, VisualProvider};
use crate::store::JobStore;
use crate::types::{Job, VideoStyle};

/// Request-facing entry point: creates job records and hands them to
/// background pipeline workers.
///
/// `submit` validates, registers the job at `pending` and returns its id
/// immediately; all generation work happens on a detached tokio task. Poll
/// [`status`](Self::status) until the record reaches a terminal state.
///
/// # Example
///
/// ```ignore
/// let dispatcher = Dispatcher::new(Providers::new(story, visuals, narration, composer));
/// let job_id = dispatcher.submit("a lighthouse at dusk", "cinematic")?;
///
/// loop {
///     let job = dispatcher.status(&job_id)?;
///     if job.status.is_terminal() {
///         break;
///     }
///     tokio::time::sleep(Duration::from_secs(3)).await;
/// }
/// ```
pub struct Dispatcher<S, V, N, C>
where
    S: StoryProvider,
    V: VisualProvider,
    N: NarrationProvider,
    C: VideoComposer,
{
    store: Arc<JobStore>,
    providers: Arc<Providers<S, V, N, C>>,
    config: PipelineConfig,
}

impl<S, V, N, C> Dispatcher<S, V, N, C>
where
    S: StoryProvider,
    V: VisualProvider,
    N: NarrationProvider,
    C: VideoComposer,
{
    /// Create a dispatcher with the stock pipeline configuration.
    pub fn new(providers: Providers<S, V, N, C>) -> Self {
        Self::with_config(providers, PipelineConfig::default())
    }

    /// Create a dispatcher with a custom [`PipelineConfig`].
    pub fn with_config(providers: Providers<S, V, N, C>, config: PipelineConfig) -> Self {
        Self {
            store: Arc::new(JobStore::new()),
            providers: Arc::new(providers),
            config,
        }
    }

    /// Submit a generation request. Returns the new job id without waiting
    /// on any pipeline work.
    ///
    /// Fails synchronously only on input validation: an empty prompt or an
    /// unsupported style. Everything downstream surfaces through the job
    /// record's `error` field.
    pub fn submit(&self, prompt: &str, style: &str) -> Result<String> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(ReelError::InvalidInput(
                "prompt must not be empty".to_string(),
            ));
        }
        let style = parse_style(style)?;

        let id = uuid::Uuid::new_v4().to_string();
        self.store
            .insert(Job::new(id.clone(), prompt.to_string(), style))?;

        let store = Arc::clone(&self.store);
        let providers = Arc::clone(&self.providers);
        let config = self.config.clone();
        let job_id = id.clone();
        let prompt = prompt.to_string();
        tokio::spawn(async move {
            pipeline::process_job(store, providers, config, job_id, prompt, style).await;
        });

        tracing::info!(job_id = %id, style = style.as_str(), "Job submitted");
        Ok(id)
    }

    /// Current snapshot of a job record. Fails with [`ReelError::NotFound`]
    /// for an unknown id.
    pub fn status(&self, job_id: &str) -> Result<Job> {
        self.store.get(job_id)
    }

    /// Rewrite a scene description in the given style, synchronously, via
    /// the story collaborator.
    pub async fn enhance_scene(&self, description: &str, style: &str) -> Result<String> {
        let description = description.trim();
        if description.is_empty() {
            return Err(ReelError::InvalidInput(
                "description must not be empty".to_string(),
            ));
        }
        let style = parse_style(style)?;

        self.providers
            .story
            .enhance_scene(description, style)
            .await
            .map_err(|e| ReelError::StageFailed {
                stage: "enhance_scene".to_string(),
                message: format!("{:#}", e),
            })
    }

    /// The underlying job store, for embedding in a serving layer.
    pub fn store(&self) -> Arc<JobStore> {
        Arc::clone(&self.store)
    }
}

fn parse_style(style: &str) -> Result<VideoStyle> {
    VideoStyle::parse(style).ok_or_else(|| {
        ReelError::InvalidInput(format!(
            "unsupported style '{}' (expected one of: {})",
            style,
            VideoStyle::ALL
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{Scene, Story};
    use crate::types::VisualKind;
    use std::time::{Duration, Instant};

    struct NullStory;

    impl StoryProvider for NullStory {
        async fn expand_story(&self, prompt: &str, _style: VideoStyle) -> anyhow::Result<Story> {
            tokio::time::sleep(Duration::from_secs(1)).await;
            Ok(Story {
                title: prompt.to_string(),
                scenes: vec![Scene {
                    description: "scene-1".to_string(),
                    narration: "narration-1".to_string(),
                }],
            })
        }

        async fn enhance_scene(&self, description: &str, _style: VideoStyle) -> anyhow::Result<String> {
            Ok(description.to_string())
        }
    }

    struct NullVisuals;

    impl VisualProvider for NullVisuals {
        async fn generate_visual(
            &self,
            description: &str,
            _style: VideoStyle,
            _kind: VisualKind,
        ) -> anyhow::Result<String> {
            Ok(format!("visual://{}", description))
        }
    }

    struct NullNarration;

    impl NarrationProvider for NullNarration {
        async fn generate_narration(&self, text: &str) -> anyhow::Result<String> {
            Ok(format!("audio://{}", text))
        }
    }

    struct NullComposer;

    impl VideoComposer for NullComposer {
        async fn compose_video(
            &self,
            _scenes: &[Scene],
            _visual_assets: &[String],
            _narration_assets: &[String],
        ) -> anyhow::Result<String> {
            Ok("video://final.mp4".to_string())
        }
    }

    fn make_dispatcher() -> Dispatcher<NullStory, NullVisuals, NullNarration, NullComposer> {
        Dispatcher::new(Providers::new(
            NullStory,
            NullVisuals,
            NullNarration,
            NullComposer,
        ))
    }

    #[test]
    fn test_empty_prompt_rejected_without_record() {
        let dispatcher = make_dispatcher();

        assert!(matches!(
            dispatcher.submit("", "cinematic"),
            Err(ReelError::InvalidInput(_))
        ));
        assert!(matches!(
            dispatcher.submit("   ", "cinematic"),
            Err(ReelError::InvalidInput(_))
        ));
        assert!(dispatcher.store().is_empty());
    }

    #[test]
    fn test_unsupported_style_rejected() {
        let dispatcher = make_dispatcher();

        match dispatcher.submit("a lighthouse at dusk", "noir") {
            Err(ReelError::InvalidInput(message)) => {
                assert!(message.contains("noir"));
                assert!(message.contains("cinematic"));
            }
            other => panic!("expected InvalidInput, got {:?}", other),
        }
        assert!(dispatcher.store().is_empty());
    }

    #[tokio::test]
    async fn test_submit_does_not_block_on_pipeline() {
        let dispatcher = make_dispatcher();

        // The story provider sleeps for a second; submission must not
        let started = Instant::now();
        let job_id = dispatcher.submit("a lighthouse at dusk", "cinematic").unwrap();
        assert!(started.elapsed() < Duration::from_millis(100));
        assert!(!job_id.is_empty());
    }
}
