//! Bounds-checked buffer access shared by all decoders

pub mod bounds;

pub use bounds::{check_buffer_bounds, safe_slice, BoundsError, ByteCursor};
