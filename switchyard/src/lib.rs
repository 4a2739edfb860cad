// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! # Switchyard
//!
//! Switch-map streams with explicit lifecycle control.
//!
//! ## Overview
//!
//! A switching stream maps every token of an outer stream to a freshly created inner
//! stream and relays only the newest one. The previous inner stream is dropped before
//! its successor is created, so resources held by stale work (connections, timers,
//! subscriptions) are released as soon as they become irrelevant.
//!
//! The workspace is split the usual way:
//!
//! - `switchyard-core`: [`StreamItem`], [`SwitchError`] and [`DestroyHandle`]
//! - `switchyard-stream`: the operators ([`SwitchMapExt`])
//! - `switchyard-exec`: a sequential async subscriber ([`SubscribeExt`])
//!
//! ## Quick Start
//!
//! ```rust
//! use futures::{stream, StreamExt};
//! use switchyard::prelude::*;
//!
//! # #[tokio::main]
//! # async fn main() {
//! // Each query replaces the previous search
//! let queries = stream::iter(vec![StreamItem::Value("ru"), StreamItem::Value("rust")]);
//!
//! let results: Vec<String> = queries
//!     .switch_map(|query: &str| {
//!         stream::iter(vec![StreamItem::Value(format!("results for {query}"))])
//!     })
//!     .with_terminal_policy(TerminalPolicy::Drain)
//!     .filter_map(|item| async move { item.ok() })
//!     .collect()
//!     .await;
//!
//! assert_eq!(results, vec!["results for rust".to_string()]);
//! # }
//! ```

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]

// Re-export core types
pub use switchyard_core::{DestroyHandle, Result, StreamItem, SwitchError};

// Re-export the operators
pub use switchyard_stream::{
    switch_map, switch_map_with_change_signal, try_switch_map, InnerFactory, SwitchMap,
    SwitchMapExt, SwitchMapWithChange, SwitchPhase, Switched, TerminalPolicy,
};

// Re-export the subscriber
pub use switchyard_exec::SubscribeExt;

/// Prelude module for convenient imports
pub mod prelude {
    pub use switchyard_exec::SubscribeExt;
    pub use switchyard_stream::prelude::*;
}
