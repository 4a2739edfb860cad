// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::convert::Infallible;

/// An output value of a switching stream that reports replacements.
///
/// `Change` marks the moment the previous inner stream was torn down and is always
/// emitted before any `Value` of the inner stream that replaced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Switched<B, C> {
    /// A value relayed from the live inner stream
    Value(B),
    /// The change signal produced for a replacement
    Change(C),
}

impl<B, C> Switched<B, C> {
    /// Returns `true` if this is a `Change`.
    pub const fn is_change(&self) -> bool {
        matches!(self, Switched::Change(_))
    }

    /// Returns the relayed value, if any.
    pub fn value(self) -> Option<B> {
        match self {
            Switched::Value(value) => Some(value),
            Switched::Change(_) => None,
        }
    }

    /// Returns the change signal, if any.
    pub fn change(self) -> Option<C> {
        match self {
            Switched::Value(_) => None,
            Switched::Change(signal) => Some(signal),
        }
    }
}

impl<B> Switched<B, Infallible> {
    /// Unwraps the value of a stream that can never signal a change.
    pub fn into_value(self) -> B {
        match self {
            Switched::Value(value) => value,
            Switched::Change(never) => match never {},
        }
    }
}
