#![warn(clippy::all, rust_2018_idioms)]

pub mod animation;
pub mod canvas;
pub mod config;
pub mod content;
pub mod shape;
pub mod state;
pub mod surface;
pub mod svg;

pub use canvas::{Canvas, CanvasId};
pub use config::CanvasConfig;
pub use content::{Contents, VertexId};
pub use state::{InteractionError, Mode};
pub use surface::{Style, Surface};
