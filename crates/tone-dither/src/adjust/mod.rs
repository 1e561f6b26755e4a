//! Adjustment pipeline: tone and color corrections before quantization.

mod filters;
mod pipeline;
mod settings;

pub use pipeline::apply;
pub use settings::AdjustmentSettings;
