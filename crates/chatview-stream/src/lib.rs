pub mod mock;
pub mod sse;

pub use mock::{chunk_text, MockSource};
pub use sse::SseSource;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// One increment of streamed message text. The consumer appends `content`
/// to its buffer and re-renders the whole thing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDelta {
    pub content: String,
    pub finished: bool,
}

pub type DeltaStream = tokio_stream::wrappers::ReceiverStream<Result<MessageDelta>>;

/// A request for one streamed assistant message.
#[derive(Debug, Clone)]
pub struct StreamRequest {
    pub prompt: String,
    pub model: Option<String>,
}

/// Anything that can produce a live delta stream for a message.
#[async_trait::async_trait]
pub trait MessageSource: Send + Sync {
    /// Open a delta stream for the given request.
    async fn stream(&self, request: StreamRequest) -> Result<DeltaStream>;

    /// Get the source name.
    fn name(&self) -> &str;
}

/// Typed failures raised by a source before or during transport. These
/// convert into `anyhow::Error` at the call sites.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("upstream returned HTTP {status}: {body}")]
    Http {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("malformed stream event: {0}")]
    MalformedEvent(String),
}

/// Create a text content delta (not finished).
pub fn make_text_delta(content: String) -> MessageDelta {
    MessageDelta {
        content,
        finished: false,
    }
}

/// Create the final delta that closes a message.
pub fn make_final_delta() -> MessageDelta {
    MessageDelta {
        content: String::new(),
        finished: true,
    }
}

/// Decodes as much of `bytes` as is valid UTF-8, leaving an incomplete
/// trailing sequence in the buffer for the next network chunk.
pub fn take_valid_utf8(bytes: &mut Vec<u8>) -> Option<String> {
    let valid_up_to = match std::str::from_utf8(bytes) {
        Ok(_) => bytes.len(),
        Err(e) => e.valid_up_to(),
    };
    if valid_up_to == 0 {
        return None;
    }
    let taken: Vec<u8> = bytes.drain(..valid_up_to).collect();
    // Safe: the drained prefix was just validated.
    Some(String::from_utf8(taken).unwrap())
}
