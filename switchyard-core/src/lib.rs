// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Core types shared by every switchyard crate.
//!
//! - [`StreamItem`]: the value-or-error item carried by every outer, inner and output stream
//! - [`SwitchError`]: the root error type, forwarded downstream as items rather than thrown
//! - [`DestroyHandle`]: the cloneable, idempotent teardown signal of a switching stream

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod destroy_handle;
pub mod error;
pub mod stream_item;

pub use self::destroy_handle::{DestroyHandle, Destroyed};
pub use self::error::{Result, SwitchError};
pub use self::stream_item::StreamItem;
