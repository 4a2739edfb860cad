// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Switch-map stream operators with explicit lifecycle control.
//!
//! An outer stream of tokens drives a factory that builds one inner stream per token.
//! Only the inner stream of the most recent token is ever alive: it is dropped the
//! moment a newer token arrives, when the outer ends (unless draining), or when the
//! whole operator is destroyed.
//!
//! # Operators
//!
//! | Operator | Output item | Notes |
//! |----------|-------------|-------|
//! | [`switch_map`](SwitchMapExt::switch_map) | `StreamItem<B>` | Infallible factory |
//! | [`try_switch_map`](SwitchMapExt::try_switch_map) | `StreamItem<B>` | Factory errors become items |
//! | [`switch_map_with_change_signal`](SwitchMapExt::switch_map_with_change_signal) | `StreamItem<Switched<B, C>>` | Optional replacement signal |
//!
//! Each operator is also available as a free function taking the outer stream last.
//!
//! # Errors
//!
//! Nothing is thrown across the stream boundary. Errors from the outer stream, the
//! live inner stream and the factory are all delivered as
//! [`StreamItem::Error`](switchyard_core::StreamItem::Error), and the output keeps
//! running afterwards.
//!
//! # Lifecycle
//!
//! Every switching stream owns a [`DestroyHandle`](switchyard_core::DestroyHandle).
//! Destroying it, calling `destroy` or dropping the stream tears down the outer stream
//! and then the live inner stream exactly once. The handle may be triggered from inside
//! the factory or the change listener; the stream notices right after that callback
//! returns and yields nothing further.
//!
//! # Getting Started
//!
//! ```toml
//! [dependencies]
//! switchyard-stream = { path = "../switchyard-stream" }
//! futures = "0.3"
//! ```

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
#[macro_use]
mod logging;
pub mod prelude;
pub mod switch_map;
pub mod switched;

// Re-export commonly used types
pub use switch_map::{
    switch_map, switch_map_with_change_signal, try_switch_map, InnerFactory, Make, SwitchMap,
    SwitchMapExt, SwitchMapWithChange, SwitchPhase, TerminalPolicy, TryMake,
};
pub use switched::Switched;
pub use switchyard_core::{DestroyHandle, StreamItem, SwitchError};
