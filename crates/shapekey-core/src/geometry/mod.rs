//! Geometry primitives consumed by shapes.

mod path;
mod rrect;

pub use path::{EMPTY_GENERATION_ID, Path};
pub use rrect::{Corner, RRect, RRectKind};
