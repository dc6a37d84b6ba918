// Themesmith Commands
// Handlers behind the invoke endpoint

mod stream;
mod theme;

pub use stream::*;
pub use theme::*;
