#![forbid(unsafe_code)]

//! Frame-driven motion primitives.
//!
//! Everything here is advanced explicitly by the host's frame loop. Nothing
//! owns a timer or a thread.

pub mod spring;

pub use spring::Spring;
