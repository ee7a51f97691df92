//! Write-only cell-grid compositing and the terminal adapter that
//! flushes it to ANSI (spec §4.3, §4.5).

pub mod adapter;
pub mod blend;
pub mod buffer;
pub mod cell;
pub mod color;
pub mod postprocess;

pub use adapter::{detect_capability, Adapter, Capability, KeyCode, TermEvent};
pub use blend::{blend_rgb, Blend};
pub use buffer::RenderBuffer;
pub use cell::{Attrs, Cell, Mask};
pub use color::{quantize, quantize_naive, quantize_redmean, ColorMode, QuantizerKind, Rgb};
pub use postprocess::{dim, grayout, occlusion_dim, run_passes, PostProcessParams};
