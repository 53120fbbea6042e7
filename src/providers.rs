use serde::{Deserialize, Serialize};

use crate::types::{VideoStyle, VisualKind};

/// One scene of an expanded story: what to show and what to say.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub description: String,
    pub narration: String,
}

/// A story expanded from a user prompt, as an ordered list of scenes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub title: String,
    pub scenes: Vec<Scene>,
}

/// Expands a prompt into a structured story (an LLM behind the seam).
///
/// Implementations are treated as black boxes by the pipeline: any error is
/// terminal for the job and its message is recorded on the record verbatim.
///
/// # Example
///
/// ```ignore
/// use storyreel::*;
///
/// struct LlmBackend { endpoint: String }
///
/// impl StoryProvider for LlmBackend {
///     async fn expand_story(&self, prompt: &str, style: VideoStyle) -> anyhow::Result<Story> {
///         // POST to the model server, parse scenes...
///         Ok(Story { title: prompt.to_string(), scenes: vec![] })
///     }
///
///     async fn enhance_scene(&self, description: &str, _style: VideoStyle) -> anyhow::Result<String> {
///         Ok(description.to_string())
///     }
/// }
/// ```
pub trait StoryProvider: Send + Sync + 'static {
    /// Expand a user prompt into a titled story with ordered scenes.
    fn expand_story(
        &self,
        prompt: &str,
        style: VideoStyle,
    ) -> impl std::future::Future<Output = anyhow::Result<Story>> + Send;

    /// Rewrite a single scene description in the given style.
    fn enhance_scene(
        &self,
        description: &str,
        style: VideoStyle,
    ) -> impl std::future::Future<Output = anyhow::Result<String>> + Send;
}

/// Generates one visual asset per scene description (diffusion model,
/// render farm, etc). Returns a reference to the generated asset.
pub trait VisualProvider: Send + Sync + 'static {
    fn generate_visual(
        &self,
        description: &str,
        style: VideoStyle,
        kind: VisualKind,
    ) -> impl std::future::Future<Output = anyhow::Result<String>> + Send;
}

/// Synthesizes narration audio from text. Returns an asset reference.
pub trait NarrationProvider: Send + Sync + 'static {
    fn generate_narration(
        &self,
        text: &str,
    ) -> impl std::future::Future<Output = anyhow::Result<String>> + Send;
}

/// Muxes scenes, visuals and narration into one composed video.
///
/// `visual_assets` and `narration_assets` are ordered to match `scenes`.
pub trait VideoComposer: Send + Sync + 'static {
    fn compose_video(
        &self,
        scenes: &[Scene],
        visual_assets: &[String],
        narration_assets: &[String],
    ) -> impl std::future::Future<Output = anyhow::Result<String>> + Send;
}

/// The full set of collaborators a pipeline needs, one per stage.
pub struct Providers<S, V, N, C>
where
    S: StoryProvider,
    V: VisualProvider,
    N: NarrationProvider,
    C: VideoComposer,
{
    pub story: S,
    pub visuals: V,
    pub narration: N,
    pub composer: C,
}

impl<S, V, N, C> Providers<S, V, N, C>
where
    S: StoryProvider,
    V: VisualProvider,
    N: NarrationProvider,
    C: VideoComposer,
{
    pub fn new(story: S, visuals: V, narration: N, composer: C) -> Self {
        Self {
            story,
            visuals,
            narration,
            composer,
        }
    }
}
