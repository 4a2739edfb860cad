// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Async subscribers for switchyard streams.
//!
//! [`SubscribeExt::subscribe`] is the downstream end of a pipeline: it pulls one item at
//! a time and awaits the handler before pulling the next, so a handler that feeds new
//! tokens back into an upstream switching stream only ever enqueues them.

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
mod logging;
pub mod subscribe;

// Re-export commonly used types
pub use subscribe::SubscribeExt;
