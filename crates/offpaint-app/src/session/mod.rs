//! One simulated renderer session: a renderer, its process host, a view,
//! and the render host in between.

mod core;
mod process;
mod renderer;
mod shutdown;
mod view;

pub use self::core::Session;
