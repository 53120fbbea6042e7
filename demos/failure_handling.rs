use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use storyreel::*;

struct DemoStory;

impl StoryProvider for DemoStory {
    async fn expand_story(&self, prompt: &str, _style: VideoStyle) -> anyhow::Result<Story> {
        Ok(Story {
            title: prompt.to_string(),
            scenes: (1..=3)
                .map(|i| Scene {
                    description: format!("{}, shot {}", prompt, i),
                    narration: format!("Part {} of the story.", i),
                })
                .collect(),
        })
    }

    async fn enhance_scene(&self, description: &str, _style: VideoStyle) -> anyhow::Result<String> {
        Ok(description.to_string())
    }
}

struct DemoVisuals;

impl VisualProvider for DemoVisuals {
    async fn generate_visual(
        &self,
        description: &str,
        _style: VideoStyle,
        _kind: VisualKind,
    ) -> anyhow::Result<String> {
        tokio::time::sleep(Duration::from_millis(200)).await;
        Ok(format!("https://cdn.example.com/visuals/{}.png", description.len()))
    }
}

/// Narration backend that rejects its second request, the way a TTS service
/// might throttle or refuse a passage.
struct FlakyNarration {
    calls: AtomicUsize,
}

impl NarrationProvider for FlakyNarration {
    async fn generate_narration(&self, text: &str) -> anyhow::Result<String> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call == 1 {
            anyhow::bail!("narration service rejected the passage");
        }
        Ok(format!("https://cdn.example.com/audio/{}.mp3", text.len()))
    }
}

struct DemoComposer;

impl VideoComposer for DemoComposer {
    async fn compose_video(
        &self,
        _scenes: &[Scene],
        _visual_assets: &[String],
        _narration_assets: &[String],
    ) -> anyhow::Result<String> {
        Ok("https://cdn.example.com/renders/final.mp4".to_string())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storyreel=debug".into()),
        )
        .init();

    let dispatcher = Dispatcher::new(Providers::new(
        DemoStory,
        DemoVisuals,
        FlakyNarration {
            calls: AtomicUsize::new(0),
        },
        DemoComposer,
    ));

    let job_id = dispatcher.submit("a robot learning to paint", "kids")?;
    println!("Submitted job {}", job_id);

    loop {
        let job = dispatcher.status(&job_id)?;
        println!("  {:>3}%  {}", job.progress, job.status.as_str());

        if job.status.is_terminal() {
            // The job fails during narration and keeps its 60% checkpoint;
            // a failed job is resubmitted as a new job, never retried in place
            println!("Terminal status: {}", job.status.as_str());
            if let Some(error) = job.error {
                println!("Recorded error: {}", error);
            }
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    // Unknown ids are a synchronous NotFound, before and after completion
    match dispatcher.status("not-a-job") {
        Err(ReelError::NotFound(id)) => println!("Lookup of '{}' correctly failed", id),
        other => println!("Unexpected: {:?}", other),
    }

    Ok(())
}
