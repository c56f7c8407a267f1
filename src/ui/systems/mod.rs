mod feed;
mod input;
mod render;
mod types;

pub use feed::*;
pub use input::*;
pub use render::*;
pub use types::*;
