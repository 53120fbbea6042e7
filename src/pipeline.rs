use std::future::Future;
use std::sync::Arc;

use tokio::task::JoinSet;

use crate::config::PipelineConfig;
use crate::error::{ReelError, Result};
use crate::providers::{NarrationProvider, Providers, StoryProvider, VideoComposer, VisualProvider};
use crate::store::JobStore;
use crate::types::{JobUpdate, PipelineStep, VideoStyle, VisualKind};

/// Drive one job through the four stages and write its terminal record.
///
/// This is the single writer for `job_id`. Stage errors are not propagated
/// to any caller; they end up in the record's `error` field, where polling
/// clients observe them.
pub(crate) async fn process_job<S, V, N, C>(
    store: Arc<JobStore>,
    providers: Arc<Providers<S, V, N, C>>,
    config: PipelineConfig,
    job_id: String,
    prompt: String,
    style: VideoStyle,
) where
    S: StoryProvider,
    V: VisualProvider,
    N: NarrationProvider,
    C: VideoComposer,
{
    match run_stages(&store, &providers, &config, &job_id, &prompt, style).await {
        Ok(video_url) => {
            tracing::info!(job_id = %job_id, "Job completed");
            if let Err(e) = store.update(&job_id, JobUpdate::completed(video_url)) {
                tracing::error!(job_id = %job_id, error = %e, "Failed to record completion");
            }
        }
        Err(e) => {
            let message = match e {
                ReelError::StageFailed { stage, message } => {
                    tracing::warn!(job_id = %job_id, stage = %stage, error = %message, "Job failed");
                    message
                }
                other => {
                    tracing::warn!(job_id = %job_id, error = %other, "Job failed");
                    other.to_string()
                }
            };
            if let Err(e) = store.update(&job_id, JobUpdate::failed(message)) {
                tracing::error!(job_id = %job_id, error = %e, "Failed to record failure");
            }
        }
    }
}

async fn run_stages<S, V, N, C>(
    store: &JobStore,
    providers: &Arc<Providers<S, V, N, C>>,
    config: &PipelineConfig,
    job_id: &str,
    prompt: &str,
    style: VideoStyle,
) -> Result<String>
where
    S: StoryProvider,
    V: VisualProvider,
    N: NarrationProvider,
    C: VideoComposer,
{
    // Stage 1: expand the prompt into a story with ordered scenes
    checkpoint(store, job_id, PipelineStep::WritingStory);
    let story = run_stage(
        config,
        PipelineStep::WritingStory,
        providers.story.expand_story(prompt, style),
    )
    .await?;
    tracing::debug!(job_id = %job_id, scenes = story.scenes.len(), "Story expanded");

    // Stage 2: one visual per scene, generated concurrently
    checkpoint(store, job_id, PipelineStep::GeneratingVisuals);
    let scene_count = story.scenes.len();
    let visual_assets = run_stage(config, PipelineStep::GeneratingVisuals, {
        let providers = Arc::clone(providers);
        let scenes = story.scenes.clone();
        async move {
            let mut tasks = JoinSet::new();
            for (index, scene) in scenes.into_iter().enumerate() {
                let providers = Arc::clone(&providers);
                tasks.spawn(async move {
                    let result = providers
                        .visuals
                        .generate_visual(&scene.description, style, VisualKind::Image)
                        .await;
                    (index, result)
                });
            }
            join_ordered(tasks, scene_count).await
        }
    })
    .await?;

    // Stage 3: one narration clip per scene, generated concurrently
    checkpoint(store, job_id, PipelineStep::CreatingNarration);
    let narration_assets = run_stage(config, PipelineStep::CreatingNarration, {
        let providers = Arc::clone(providers);
        let scenes = story.scenes.clone();
        async move {
            let mut tasks = JoinSet::new();
            for (index, scene) in scenes.into_iter().enumerate() {
                let providers = Arc::clone(&providers);
                tasks.spawn(async move {
                    let result = providers.narration.generate_narration(&scene.narration).await;
                    (index, result)
                });
            }
            join_ordered(tasks, scene_count).await
        }
    })
    .await?;

    // Stage 4: mux everything into the final video
    checkpoint(store, job_id, PipelineStep::RenderingVideo);
    let video_url = run_stage(
        config,
        PipelineStep::RenderingVideo,
        providers
            .composer
            .compose_video(&story.scenes, &visual_assets, &narration_assets),
    )
    .await?;

    Ok(video_url)
}

/// Write a stage-entry checkpoint. The store can only refuse if the record
/// vanished, which the single-writer contract rules out, so a failure here
/// is logged rather than aborting the job.
fn checkpoint(store: &JobStore, job_id: &str, step: PipelineStep) {
    if let Err(e) = store.update(job_id, JobUpdate::checkpoint(step)) {
        tracing::error!(job_id = %job_id, step = step.as_str(), error = %e, "Failed to write checkpoint");
    }
}

/// Run one stage body, applying the configured deadline and mapping any
/// error into [`ReelError::StageFailed`] with the message kept verbatim.
async fn run_stage<T, F>(config: &PipelineConfig, step: PipelineStep, stage: F) -> Result<T>
where
    F: Future<Output = anyhow::Result<T>>,
{
    let result = match config.stage_timeout {
        Some(limit) => match tokio::time::timeout(limit, stage).await {
            Ok(inner) => inner,
            Err(_) => Err(anyhow::anyhow!("timed out after {:?}", limit)),
        },
        None => stage.await,
    };

    result.map_err(|e| ReelError::StageFailed {
        stage: step.as_str().to_string(),
        message: format!("{:#}", e),
    })
}

/// Join an indexed fan-out, reassembling results in original scene order.
///
/// Sub-tasks complete in any order; each lands in its slot. The first error
/// aborts everything still in flight and becomes the stage error, so a
/// partially failed fan-out never advances the pipeline.
async fn join_ordered<T>(
    mut tasks: JoinSet<(usize, anyhow::Result<T>)>,
    len: usize,
) -> anyhow::Result<Vec<T>>
where
    T: Send + 'static,
{
    let mut slots: Vec<Option<T>> = Vec::with_capacity(len);
    slots.resize_with(len, || None);

    while let Some(joined) = tasks.join_next().await {
        let (index, result) = joined.map_err(|e| anyhow::anyhow!("scene task failed: {}", e))?;
        match result {
            Ok(asset) => slots[index] = Some(asset),
            Err(e) => {
                tasks.abort_all();
                return Err(e);
            }
        }
    }

    slots
        .into_iter()
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| anyhow::anyhow!("scene results incomplete"))
}
