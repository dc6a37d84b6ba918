// Themesmith Services
// Business logic layer

pub mod color;
pub mod events;
pub mod markers;
pub mod mode_conversion;
pub mod persistence;
pub mod prompt;
pub mod shadows;
pub mod stream_session;
pub mod text_streams;
pub mod theme_css;
pub mod theme_store;
pub mod theme_updates;
pub mod tool_input;

pub use color::*;
pub use events::{
    emit_event, EventSink, STREAM_FINISHED_EVENT, THEME_CHANGED_EVENT,
    THEME_UPDATE_APPLIED_EVENT,
};
pub use markers::*;
pub use mode_conversion::*;
pub use persistence::*;
pub use prompt::*;
pub use shadows::*;
pub use stream_session::*;
pub use text_streams::*;
pub use theme_css::*;
pub use theme_store::*;
pub use theme_updates::*;
pub use tool_input::*;
