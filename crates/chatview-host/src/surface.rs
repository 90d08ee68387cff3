//! The rendering surface a message view writes into.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

/// A browser-style panel that runs script fragments. Rendered message HTML
/// always goes through `execute_script`; `evaluate_script` exists so host
/// code can read state back out of the panel (selection text, scroll
/// position).
#[async_trait]
pub trait PanelSurface: Send + Sync {
    /// Run a script fragment in the panel, discarding any result.
    async fn execute_script(&mut self, script: &str) -> Result<()>;

    /// Run a script fragment and return its value.
    async fn evaluate_script(&mut self, script: &str) -> Result<Value>;
}

/// Surface that drops everything, for when no panel is attached.
pub struct NullSurface;

#[async_trait]
impl PanelSurface for NullSurface {
    async fn execute_script(&mut self, _script: &str) -> Result<()> {
        Ok(())
    }

    async fn evaluate_script(&mut self, _script: &str) -> Result<Value> {
        Ok(Value::Null)
    }
}

/// Surface that records every script it receives, for tests.
#[derive(Default)]
pub struct RecordingSurface {
    pub scripts: Vec<String>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_script(&self) -> Option<&str> {
        self.scripts.last().map(String::as_str)
    }
}

#[async_trait]
impl PanelSurface for RecordingSurface {
    async fn execute_script(&mut self, script: &str) -> Result<()> {
        self.scripts.push(script.to_string());
        Ok(())
    }

    async fn evaluate_script(&mut self, script: &str) -> Result<Value> {
        self.scripts.push(script.to_string());
        Ok(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_null_surface_accepts_everything() {
        let mut surface = NullSurface;
        surface.execute_script("updateMessage('x', \"y\")").await.unwrap();
        let value = surface.evaluate_script("1 + 1").await.unwrap();
        assert_eq!(value, Value::Null);
    }

    #[tokio::test]
    async fn test_recording_surface_keeps_scripts_in_order() {
        let mut surface = RecordingSurface::new();
        surface.execute_script("first()").await.unwrap();
        surface.execute_script("second()").await.unwrap();

        assert_eq!(surface.scripts, vec!["first()", "second()"]);
        assert_eq!(surface.last_script(), Some("second()"));
    }
}
