//! gwscan base. Shapes raw REST and GraphQL payloads into the view models of
//! `gwscan-core`, handles live refresh topics, and loads settings and
//! tracing for the binaries.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![warn(missing_docs)]

pub mod settings;

/// Raw payload to view model conversion
pub mod normalize;
pub use normalize::{Normalizer, Source};

/// Live refresh topics and home feed merging
pub mod refresh;
