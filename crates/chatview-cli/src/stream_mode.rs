use anyhow::Result;
use tokio_stream::StreamExt;
use tracing::debug;

use chatview_config::Config;
use chatview_host::MessageView;
use chatview_stream::{MessageSource, MockSource, StreamRequest};

/// Replay `text` through the mock source, re-rendering the whole buffer
/// after every delta the way a live panel update would.
pub async fn run(
    text: String,
    chunk_size: usize,
    final_only: bool,
    script: bool,
    config: &Config,
) -> Result<()> {
    let source = MockSource::new().with_chunked_text(&text, chunk_size);
    let mut stream = source
        .stream(StreamRequest {
            prompt: String::new(),
            model: None,
        })
        .await?;

    let mut view = MessageView::new(config.render.code_buttons);
    if script {
        println!("{}", view.mount_script(&config.panel.panel_id));
    }
    let emit = |view: &MessageView| {
        if script {
            view.update_script()
        } else {
            view.render_fragment()
        }
    };

    let mut snapshots = 0usize;
    while let Some(delta) = stream.next().await {
        let delta = delta?;
        if delta.finished {
            break;
        }
        view.append_delta(&delta.content);
        snapshots += 1;
        if !final_only {
            println!("{}", emit(&view));
        }
    }
    if final_only {
        println!("{}", emit(&view));
    }

    debug!(
        "Re-rendered {snapshots} snapshots over {} buffered bytes",
        view.buffer().len()
    );
    Ok(())
}
