#![deny(
    rust_2018_compatibility,
    rust_2018_idioms,
    nonstandard_style,
    unused,
    future_incompatible
)]
#![warn(clippy::doc_markdown)]

//! Common code for tests and benches. Only depends on `label_pyramids_core`, so every crate in the workspace can use it as
//! a dev-dependency without a second copy of its own types.

pub mod data_sets;
