#![forbid(unsafe_code)]

//! Logging facade.
//!
//! Re-exports the `tracing` macros so downstream crates log through one
//! path. Targets used across the workspace:
//!
//! | target             | content                                   |
//! |--------------------|-------------------------------------------|
//! | `tdrawer.state`    | committed state changes, ignored requests |
//! | `tdrawer.touch`    | arbitration and capture decisions         |
//! | `tdrawer.settle`   | release classification                    |
//! | `tdrawer.surface`  | drag surface capture and settling         |
//!
//! The library never installs a subscriber.

pub use tracing::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
