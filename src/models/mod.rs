pub mod project;
pub mod video;

pub use project::{FrameSettings, PaletteSource, ProjectDocument, ProjectFormat};
pub use video::VideoInfo;
