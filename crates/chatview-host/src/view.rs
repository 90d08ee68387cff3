//! One streamed message and the script updates that redraw it.

use anyhow::Result;
use tracing::debug;
use uuid::Uuid;

use chatview_render::render;

use crate::surface::PanelSurface;

/// A single chat message bound to a panel DOM node by id.
///
/// The buffer only ever grows. Every update re-renders the entire buffer,
/// which is what keeps open blocks correct while text streams in.
#[derive(Debug, Clone)]
pub struct MessageView {
    id: Uuid,
    buffer: String,
    include_code_buttons: bool,
}

impl MessageView {
    pub fn new(include_code_buttons: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            buffer: String::new(),
            include_code_buttons,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Append streamed text to the message buffer.
    pub fn append_delta(&mut self, delta: &str) {
        self.buffer.push_str(delta);
    }

    /// The literal-escaped HTML fragment for the current buffer.
    pub fn render_fragment(&self) -> String {
        render(&self.buffer, self.include_code_buttons)
    }

    /// The full panel update call, with the rendered fragment spliced in as
    /// the quoted second argument.
    pub fn update_script(&self) -> String {
        format!("updateMessage('{}', \"{}\")", self.id, self.render_fragment())
    }

    /// The one-time call that creates this message's DOM node inside the
    /// panel, run before the first update.
    pub fn mount_script(&self, panel_id: &str) -> String {
        format!("appendMessage('{panel_id}', '{}')", self.id)
    }

    /// Render the buffer and push the update into the surface.
    pub async fn flush(&self, surface: &mut dyn PanelSurface) -> Result<()> {
        debug!("Flushing message {} ({} bytes)", self.id, self.buffer.len());
        surface.execute_script(&self.update_script()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;

    #[test]
    fn test_each_view_gets_its_own_id() {
        let a = MessageView::new(false);
        let b = MessageView::new(false);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_update_script_wraps_rendered_html() {
        let mut view = MessageView::new(false);
        view.append_delta("**hi**");

        let script = view.update_script();
        assert!(script.starts_with(&format!("updateMessage('{}', \"", view.id())));
        assert!(script.contains("<b>hi</b><br>"));
        assert!(script.ends_with("\")"));
    }

    #[test]
    fn test_rendered_attribute_quotes_are_escaped_in_script() {
        let mut view = MessageView::new(false);
        view.append_delta("```python\nprint(1)\n```");

        let script = view.update_script();
        // The <pre> attribute quotes must not terminate the argument.
        assert!(script.contains("class=\\\"code-block\\\""));
        assert!(!script.contains("class=\"code-block\""));
    }

    #[test]
    fn test_mount_script_targets_the_panel() {
        let view = MessageView::new(false);
        assert_eq!(
            view.mount_script("chat-panel"),
            format!("appendMessage('chat-panel', '{}')", view.id())
        );
    }

    #[test]
    fn test_growing_buffer_re_renders_whole_message() {
        let mut view = MessageView::new(false);
        view.append_delta("```rust\n");
        let open = view.render_fragment();
        assert!(open.contains("</pre>"), "open fence auto-closes: {open}");

        view.append_delta("let x = 1;\n```\n");
        let closed = view.render_fragment();
        assert!(closed.contains("let x = 1;"));
        assert_eq!(view.buffer(), "```rust\nlet x = 1;\n```\n");
    }

    #[tokio::test]
    async fn test_flush_executes_the_update_script() {
        let mut surface = RecordingSurface::new();
        let mut view = MessageView::new(true);
        view.append_delta("hello");
        view.flush(&mut surface).await.unwrap();

        assert_eq!(surface.scripts.len(), 1);
        assert_eq!(surface.last_script(), Some(view.update_script().as_str()));
    }
}
