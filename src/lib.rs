//! Pageload Insights
//!
//! Offline analysis of page-load artifacts:
//!
//! - Layout-shift attribution: which elements moved the most during a
//!   trace, and a resolver that describes them through a DOM session.
//! - Duplicated JavaScript: source-map attribution of bundle bytes, the
//!   modules shipped more than once, and the transfer time they cost.
//!
//! This crate provides the core implementation for the
//! `pageload-insights` CLI tool.
//!
//! ## Getting Started
//!
//! ```bash
//! pageload-insights analyze --trace trace.json --bundles bundles.json --summary
//! ```

pub mod aggregator;
pub mod commands;
pub mod geometry;
pub mod output;
pub mod parser;
pub mod session;
pub mod utils;
