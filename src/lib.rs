//! asset-min - CSS/JS minification for web asset pipelines.
//!
//! - [`css`]: tokenizing CSS compressor and relative URL rewriting
//! - [`asset`]: descriptor collections, dispatch, target naming, gzip output
//! - [`config`]: `min.toml` loading and validation
//! - [`cli`]: command handlers of the `asset-min` binary

pub mod asset;
pub mod cli;
pub mod config;
pub mod css;
pub mod logger;
