//! Core library modules for butterfly-viz
//!
//! This module contains the internal implementation details of the butterfly-viz library.

pub mod compose;
pub mod config;
pub mod directions;
pub mod error;
pub mod map;
pub mod polyline;
pub mod render;

// Re-export main types for internal use
pub use compose::MapComposer;
pub use config::Config;
