use std::time::Duration;

/// Configuration for pipeline workers.
///
/// Use [`PipelineConfig::builder()`] for ergonomic construction, or
/// [`PipelineConfig::default()`] for the stock behavior (no deadlines).
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// Deadline applied to each stage, including the whole per-scene fan-out
    /// of the visual and narration stages. `None` waits on collaborators
    /// indefinitely; a miss fails the job like any other stage error.
    pub stage_timeout: Option<Duration>,
}

impl PipelineConfig {
    /// Start building a config with the builder pattern.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }
}

/// Builder for [`PipelineConfig`].
#[derive(Default)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    /// Bound every stage by the given deadline.
    pub fn with_stage_timeout(mut self, timeout: Duration) -> Self {
        self.config.stage_timeout = Some(timeout);
        self
    }

    /// Build the final [`PipelineConfig`].
    pub fn build(self) -> PipelineConfig {
        self.config
    }
}
