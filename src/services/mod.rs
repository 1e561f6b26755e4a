pub mod coalescer;
pub mod pipeline;

pub use coalescer::{RecomputeSlot, Snapshot};
pub use pipeline::FramePipeline;
