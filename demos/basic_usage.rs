use std::time::Duration;

use storyreel::*;

// Mock backends that sleep instead of calling real model servers. Swap these
// for an LLM client, a diffusion client, a TTS client and an FFmpeg muxer.

struct DemoStory;

impl StoryProvider for DemoStory {
    async fn expand_story(&self, prompt: &str, style: VideoStyle) -> anyhow::Result<Story> {
        tokio::time::sleep(Duration::from_millis(400)).await;
        Ok(Story {
            title: format!("{} ({})", prompt, style.as_str()),
            scenes: (1..=3)
                .map(|i| Scene {
                    description: format!("{}, shot {}", prompt, i),
                    narration: format!("Part {} of the story about {}.", i, prompt),
                })
                .collect(),
        })
    }

    async fn enhance_scene(&self, description: &str, style: VideoStyle) -> anyhow::Result<String> {
        Ok(format!("{}, rendered in a {} look", description, style.as_str()))
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
        tokio::time::sleep(Duration::from_millis(500)).await;
        Ok(format!("https://cdn.example.com/visuals/{}.png", slug(description)))
    }
}

struct DemoNarration;

impl NarrationProvider for DemoNarration {
    async fn generate_narration(&self, text: &str) -> anyhow::Result<String> {
        tokio::time::sleep(Duration::from_millis(300)).await;
        Ok(format!("https://cdn.example.com/audio/{}.mp3", slug(text)))
    }
}

struct DemoComposer;

impl VideoComposer for DemoComposer {
    async fn compose_video(
        &self,
        scenes: &[Scene],
        _visual_assets: &[String],
        _narration_assets: &[String],
    ) -> anyhow::Result<String> {
        tokio::time::sleep(Duration::from_millis(600)).await;
        println!("  composing {} scenes into one video", scenes.len());
        Ok("https://cdn.example.com/renders/final.mp4".to_string())
    }
}

fn slug(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect()
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
        DemoNarration,
        DemoComposer,
    ));

    let job_id = dispatcher.submit("a lighthouse keeper who befriends a storm", "cinematic")?;
    println!("Submitted job {}", job_id);

    // Real clients poll every few seconds; the demo polls faster
    loop {
        let job = dispatcher.status(&job_id)?;
        match job.current_step {
            Some(step) => println!("  {:>3}%  {} ({})", job.progress, job.status.as_str(), step.as_str()),
            None => println!("  {:>3}%  {}", job.progress, job.status.as_str()),
        }

        if job.status.is_terminal() {
            match job.video_url {
                Some(url) => println!("Done: {}", url),
                None => println!("Failed: {}", job.error.unwrap_or_default()),
            }
            break;
        }
        tokio::time::sleep(Duration::from_millis(300)).await;
    }

    Ok(())
}
