//! Message source speaking the SSE chat-completions wire format.

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, error};

use crate::{
    make_final_delta, make_text_delta, take_valid_utf8, DeltaStream, MessageDelta, MessageSource,
    SourceError, StreamRequest,
};

/// Streams message deltas from an SSE chat-completions endpoint.
pub struct SseSource {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    name: String,
}

impl SseSource {
    pub fn new(endpoint: String, model: String, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            model,
            api_key,
            name: "sse".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct StreamEvent {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: EventDelta,
}

#[derive(Debug, Default, Deserialize)]
struct EventDelta {
    content: Option<String>,
}

/// Pulls the text fragments out of one `data:` payload.
fn content_from_event(data: &str) -> serde_json::Result<Vec<String>> {
    let event: StreamEvent = serde_json::from_str(data)?;
    Ok(event
        .choices
        .into_iter()
        .filter_map(|choice| choice.delta.content)
        .collect())
}

async fn forward_events(
    mut stream: impl Stream<Item = reqwest::Result<Bytes>> + Unpin,
    tx: mpsc::Sender<Result<MessageDelta>>,
) {
    let mut byte_buffer: Vec<u8> = Vec::new();
    let mut buffer = String::new();

    while let Some(chunk_result) = stream.next().await {
        let chunk = match chunk_result {
            Ok(chunk) => chunk,
            Err(e) => {
                error!("Stream transport error: {}", e);
                let _ = tx.send(Err(e.into())).await;
                return;
            }
        };

        byte_buffer.extend_from_slice(&chunk);
        match take_valid_utf8(&mut byte_buffer) {
            Some(decoded) => buffer.push_str(&decoded),
            None => continue,
        }

        // Process complete lines
        while let Some(line_end) = buffer.find('\n') {
            let line = buffer[..line_end].trim().to_string();
            buffer.drain(..line_end + 1);

            if line.is_empty() {
                continue;
            }

            if let Some(data) = line.strip_prefix("data: ") {
                if data == "[DONE]" {
                    debug!("Received stream completion marker");
                    let _ = tx.send(Ok(make_final_delta())).await;
                    return;
                }

                match content_from_event(data) {
                    Ok(fragments) => {
                        for fragment in fragments {
                            if tx.send(Ok(make_text_delta(fragment))).await.is_err() {
                                debug!("Receiver dropped, stopping stream");
                                return;
                            }
                        }
                    }
                    Err(e) => {
                        error!("Malformed stream event: {}", e);
                        let _ = tx
                            .send(Err(SourceError::MalformedEvent(e.to_string()).into()))
                            .await;
                        return;
                    }
                }
            }
        }
    }

    // The upstream closed without [DONE]; finish the message anyway.
    let _ = tx.send(Ok(make_final_delta())).await;
}

#[async_trait]
impl MessageSource for SseSource {
    async fn stream(&self, request: StreamRequest) -> Result<DeltaStream> {
        let model = request
            .model
            .clone()
            .unwrap_or_else(|| self.model.clone());
        debug!("Opening SSE stream to {} (model={})", self.endpoint, model);

        let body = json!({
            "model": model,
            "messages": [{"role": "user", "content": request.prompt}],
            "stream": true,
        });

        let mut http = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            http = http.header("Authorization", format!("Bearer {key}"));
        }
        let response = http
            .send()
            .await
            .with_context(|| format!("sending stream request to {}", self.endpoint))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SourceError::Http { status, body }.into());
        }

        let (tx, rx) = mpsc::channel(100);
        tokio::spawn(forward_events(response.bytes_stream(), tx));
        Ok(ReceiverStream::new(rx))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
