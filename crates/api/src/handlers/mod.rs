pub mod diagnostics;
pub mod render;
pub mod scripts;
pub mod videos;
