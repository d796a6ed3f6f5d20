//! Video rendering through an external command-line renderer.
//!
//! The renderer is reached through the [`renderer::VideoRenderer`] trait so
//! the API layer can swap in fakes. [`manim::ManimRenderer`] is the
//! production implementation; [`subprocess`] holds the process plumbing.

pub mod manim;
pub mod renderer;
pub mod subprocess;

pub use manim::{ManimRenderer, RendererSettings};
pub use renderer::{RenderError, RenderJob, VideoRenderer};
