//! Scripted message source for tests and offline streaming simulation.

use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::{
    make_final_delta, make_text_delta, DeltaStream, MessageDelta, MessageSource, StreamRequest,
};

/// Splits text into chunks of at most `chunk_size` characters, never inside
/// a character.
pub fn chunk_text(text: &str, chunk_size: usize) -> Vec<String> {
    let chunk_size = chunk_size.max(1);
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(chunk_size)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// A mock source that plays back scripted delta sequences.
///
/// Scripts are consumed in FIFO order; when the queue is empty the default
/// script (or a canned notice) is used. Every request is recorded so tests
/// can verify what was asked for.
pub struct MockSource {
    name: String,
    scripts: Arc<Mutex<Vec<Vec<MessageDelta>>>>,
    requests: Arc<Mutex<Vec<StreamRequest>>>,
    default_script: Option<Vec<MessageDelta>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self {
            name: "mock".to_string(),
            scripts: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            default_script: None,
        }
    }

    /// Set the source name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Queue an explicit delta script
    pub fn with_script(self, script: Vec<MessageDelta>) -> Self {
        self.scripts.lock().unwrap().push(script);
        self
    }

    /// Queue a script that streams `text` as one delta plus the finish
    pub fn with_text(self, text: &str) -> Self {
        self.with_script(vec![make_text_delta(text.to_string()), make_final_delta()])
    }

    /// Queue a script that streams `text` split into `chunk_size`-char deltas
    pub fn with_chunked_text(self, text: &str, chunk_size: usize) -> Self {
        let mut script: Vec<MessageDelta> = chunk_text(text, chunk_size)
            .into_iter()
            .map(make_text_delta)
            .collect();
        script.push(make_final_delta());
        self.with_script(script)
    }

    /// Set the script used when the queue is empty
    pub fn with_default_script(mut self, script: Vec<MessageDelta>) -> Self {
        self.default_script = Some(script);
        self
    }

    /// Get all requests that were made to this source
    pub fn get_requests(&self) -> Vec<StreamRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Get the number of requests made
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn next_script(&self) -> Vec<MessageDelta> {
        let mut scripts = self.scripts.lock().unwrap();
        if scripts.is_empty() {
            self.default_script.clone().unwrap_or_else(|| {
                vec![
                    make_text_delta("Mock delta (no scripts configured)".to_string()),
                    make_final_delta(),
                ]
            })
        } else {
            scripts.remove(0)
        }
    }
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageSource for MockSource {
    async fn stream(&self, request: StreamRequest) -> Result<DeltaStream> {
        self.requests.lock().unwrap().push(request);

        let script = self.next_script();
        let (tx, rx) = mpsc::channel(32);
        let num_deltas = script.len();

        tokio::spawn(async move {
            for (i, delta) in script.into_iter().enumerate() {
                if tx.send(Ok(delta)).await.is_err() {
                    // Receiver dropped, stop sending
                    break;
                }

                // Small delay between deltas to simulate streaming
                if i < num_deltas - 1 {
                    tokio::time::sleep(tokio::time::Duration::from_micros(100)).await;
                }
            }
        });

        Ok(ReceiverStream::new(rx))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
