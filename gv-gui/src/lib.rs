#![warn(clippy::all, rust_2018_idioms)]

mod app;
mod canvas_ui;
pub mod command;
pub mod workspace;

pub use app::App;
