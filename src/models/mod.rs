// Themesmith Models
// Data structures for the application

mod theme;
mod theme_defaults;
mod theme_update;
mod shadow;
mod stream;

pub use theme::*;
pub use theme_defaults::{DEFAULT_FONT_MONO, DEFAULT_FONT_SANS, DEFAULT_FONT_SERIF};
pub use theme_update::*;
pub use shadow::*;
pub use stream::*;
