// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Prelude module re-exporting the operator trait and the types it works with.
//!
//! ```
//! use switchyard_stream::prelude::*;
//! ```

pub use crate::switch_map::{SwitchMapExt, SwitchPhase, TerminalPolicy};
pub use crate::switched::Switched;
pub use switchyard_core::{DestroyHandle, StreamItem, SwitchError};
