// src/notify/mod.rs
//! Best-effort push notifications. A failed send never fails the pipeline;
//! the orchestrator carries it as a warning instead.

pub mod pushbullet;

use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertPayload {
    pub message: String,
    pub link: String,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, alert: &AlertPayload) -> anyhow::Result<()>;
    /// Transport name for diagnostics.
    fn name(&self) -> &'static str;
}
