pub mod diff;
pub mod surface;
pub mod view;

pub use diff::diff_against_selection;
pub use surface::{NullSurface, PanelSurface, RecordingSurface};
pub use view::MessageView;
