//! Shapekey Core Library
//!
//! Canonical shape geometry, stable cache keys, and style application for a
//! 2D renderer.

pub mod cache;
pub mod geometry;
pub mod key;
pub mod shape;
pub mod style;

pub use cache::{CacheConfig, CacheError, CacheStats, ShapeCache};
pub use geometry::{Path, RRect, RRectKind};
pub use key::{KeyError, KeyFlags, KeyResult};
pub use shape::{Shape, ShapeKind};
pub use style::{
    Apply, Cap, DashEffect, InitStyle, Join, PathEffect, StrokeRec, StrokeStyle, Style,
    StyleError,
};
