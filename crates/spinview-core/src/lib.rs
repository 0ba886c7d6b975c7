pub mod config;
pub mod error;
pub mod frames;
pub mod gesture;
pub mod inertia;
pub mod path;
pub mod source;
pub mod viewer;

pub use config::SpinConfig;
pub use error::{Error, Result};
pub use gesture::{DragOutcome, Point, PointerInput};
pub use source::{FrameRequest, SourceTemplate};
pub use viewer::{Drive, Effect, SpinViewer, ViewerOptions};
