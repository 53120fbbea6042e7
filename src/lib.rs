//! # Storyreel
//!
//! Asynchronous job orchestration for AI story-to-video generation.
//!
//! A client submits a creative prompt, gets a job id back immediately, and
//! polls for a status snapshot while a background worker drives the job
//! through four ordered stages: story expansion, visual generation,
//! narration synthesis and video composition. Each stage delegates to a
//! swappable collaborator behind a trait seam.
//!
//! ## Features
//!
//! - **Non-blocking submission** — `submit` validates, registers the job
//!   and hands it to a tokio task; it never waits on generation
//! - **Fixed progress checkpoints** — pollers see 10/30/60/80/100 as the
//!   pipeline advances, and a failed job keeps its last checkpoint
//! - **Order-preserving fan-out** — per-scene visual and narration calls
//!   run concurrently but results are reassembled in scene order
//! - **Fail-fast stages** — the first error aborts in-flight work, fails
//!   the job and records the collaborator's message verbatim
//! - **Concurrency-safe job store** — one writer per job, any number of
//!   polling readers, never a torn snapshot
//! - **Optional stage deadlines** — bound stuck collaborator calls via
//!   [`PipelineConfig`]
//!
//! ## Quick Start
//!
//! 1. Implement the four collaborator traits ([`StoryProvider`],
//!    [`VisualProvider`], [`NarrationProvider`], [`VideoComposer`]) for
//!    your AI backends
//! 2. Bundle them into a [`Providers`] set and create a [`Dispatcher`]
//! 3. Call [`Dispatcher::submit()`] and keep the returned job id
//! 4. Poll [`Dispatcher::status()`] every few seconds until the record
//!    reaches `completed` or `failed`
//!
//! See the `demos/` directory for complete runnable examples.

pub mod config;
pub mod dispatcher;
pub mod error;
mod pipeline;
pub mod providers;
pub mod store;
pub mod types;

pub use config::{PipelineConfig, PipelineConfigBuilder};
pub use dispatcher::Dispatcher;
pub use error::{ReelError, Result};
pub use providers::{
    NarrationProvider, Providers, Scene, Story, StoryProvider, VideoComposer, VisualProvider,
};
pub use store::JobStore;
pub use types::{Job, JobStatus, JobUpdate, PipelineStep, VideoStyle, VisualKind};
