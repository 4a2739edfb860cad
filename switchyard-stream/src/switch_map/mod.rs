// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Switch-map operator with explicit lifecycle control.
//!
//! For every token of an outer stream, a factory creates an inner stream. The output
//! relays only the most recent inner stream: when the next token arrives the previous
//! inner stream is dropped before its successor is created, so at most one inner stream
//! is ever alive.
//!
//! # Behavior
//!
//! - Errors from the outer stream or the live inner stream are forwarded as
//!   [`StreamItem::Error`] and the output keeps going
//! - Tokens already queued on the outer stream are consumed first; each one still gets
//!   its own inner stream, which the following token destroys
//! - An inner stream that completes on its own is dropped; the output then waits for
//!   the next token
//! - When the outer ends, the [`TerminalPolicy`] decides whether the live inner stream
//!   is destroyed right away (default) or drained first
//! - Destroying the output (explicitly, through a [`DestroyHandle`](switchyard_core::DestroyHandle)
//!   or by dropping it) drops the outer stream and then the live inner stream, once
//!
//! Consumption is purely pull-based: each `poll_next` yields at most one item, so a
//! consumer that feeds new tokens back into the outer stream while handling an item can
//! never recurse into the operator.
//!
//! # Example
//!
//! ```
//! use futures::{stream, StreamExt};
//! use switchyard_core::StreamItem;
//! use switchyard_stream::SwitchMapExt;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let feeds = stream::iter(vec![StreamItem::Value(1), StreamItem::Value(10)]);
//!
//! let prices = feeds
//!     .switch_map(|base: i32| stream::iter((0..3).map(move |i| StreamItem::Value(base + i))))
//!     .with_terminal_policy(switchyard_stream::TerminalPolicy::Drain);
//!
//! // Token 1 is replaced by token 10 before its inner stream is ever polled
//! let values: Vec<i32> = prices.filter_map(|item| async move { item.ok() }).collect().await;
//! assert_eq!(values, vec![10, 11, 12]);
//! # }
//! ```
//!
//! # Change signals
//!
//! [`switch_map_with_change_signal`](SwitchMapExt::switch_map_with_change_signal) calls a
//! listener for every token after the first and injects its `Some` result as
//! [`Switched::Change`](crate::Switched::Change) ahead of the new inner stream's values:
//!
//! ```
//! use futures::{stream, StreamExt};
//! use switchyard_core::StreamItem;
//! use switchyard_stream::{SwitchMapExt, Switched, TerminalPolicy};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let channels = stream::iter(vec![StreamItem::Value("news"), StreamItem::Value("sport")]);
//!
//! let output: Vec<_> = channels
//!     .switch_map_with_change_signal(
//!         Some(|channel: &&str| Some(format!("tuned to {channel}"))),
//!         |channel: &str| stream::iter(vec![StreamItem::Value(channel.len())]),
//!     )
//!     .with_terminal_policy(TerminalPolicy::Drain)
//!     .filter_map(|item| async move { item.ok() })
//!     .collect()
//!     .await;
//!
//! assert_eq!(
//!     output,
//!     vec![Switched::Change("tuned to sport".to_string()), Switched::Value(5)]
//! );
//! # }
//! ```

mod factory;
mod implementation;
mod policy;
mod streams;

pub use factory::{InnerFactory, Make, TryMake};
pub use policy::{SwitchPhase, TerminalPolicy};
pub use streams::{SwitchMap, SwitchMapWithChange};

use core::fmt::Display;
use futures::Stream;
use switchyard_core::StreamItem;

/// Extension trait providing the switch-map operators on any stream of tokens.
pub trait SwitchMapExt<A>: Stream<Item = StreamItem<A>> + Sized {
    /// Relays the inner stream created by `make` for the most recent token.
    ///
    /// See the [module-level documentation](mod@crate::switch_map) for the full lifecycle.
    fn switch_map<U, B, F>(self, make: F) -> SwitchMap<Self, U, Make<F>>
    where
        F: FnMut(A) -> U,
        U: Stream<Item = StreamItem<B>>,
    {
        SwitchMap::new(self, Make::new(make))
    }

    /// Like [`switch_map`](Self::switch_map) with a factory that can reject a token.
    ///
    /// A rejection is emitted as one [`SwitchError::FactoryError`](switchyard_core::SwitchError::FactoryError)
    /// item; no inner stream is live until the next token.
    fn try_switch_map<U, B, E, F>(self, make: F) -> SwitchMap<Self, U, TryMake<F>>
    where
        F: FnMut(A) -> Result<U, E>,
        E: Display,
        U: Stream<Item = StreamItem<B>>,
    {
        SwitchMap::new(self, TryMake::new(make))
    }

    /// Like [`switch_map`](Self::switch_map), reporting each replacement through `on_change`.
    ///
    /// `on_change` receives every token except the first, before the inner stream it
    /// replaces is dropped. Passing `None` behaves exactly like `switch_map`, with values
    /// wrapped in [`Switched::Value`](crate::Switched::Value).
    fn switch_map_with_change_signal<U, B, C, L, F>(
        self,
        on_change: Option<L>,
        make: F,
    ) -> SwitchMapWithChange<Self, U, Make<F>, L>
    where
        L: FnMut(&A) -> Option<C>,
        F: FnMut(A) -> U,
        U: Stream<Item = StreamItem<B>>,
    {
        SwitchMapWithChange::new(self, Make::new(make), on_change)
    }
}

impl<S, A> SwitchMapExt<A> for S where S: Stream<Item = StreamItem<A>> {}

/// Two-argument form: `switch_map(make, outer)`.
pub fn switch_map<St, A, U, B, F>(make: F, outer: St) -> SwitchMap<St, U, Make<F>>
where
    St: Stream<Item = StreamItem<A>>,
    F: FnMut(A) -> U,
    U: Stream<Item = StreamItem<B>>,
{
    outer.switch_map(make)
}

/// Fallible-factory form: `try_switch_map(make, outer)`.
pub fn try_switch_map<St, A, U, B, E, F>(make: F, outer: St) -> SwitchMap<St, U, TryMake<F>>
where
    St: Stream<Item = StreamItem<A>>,
    F: FnMut(A) -> Result<U, E>,
    E: Display,
    U: Stream<Item = StreamItem<B>>,
{
    outer.try_switch_map(make)
}

/// Three-argument form: `switch_map_with_change_signal(on_change, make, outer)`.
///
/// Returns a stream of [`Switched`](crate::Switched) items.
pub fn switch_map_with_change_signal<St, A, U, B, C, L, F>(
    on_change: Option<L>,
    make: F,
    outer: St,
) -> SwitchMapWithChange<St, U, Make<F>, L>
where
    St: Stream<Item = StreamItem<A>>,
    L: FnMut(&A) -> Option<C>,
    F: FnMut(A) -> U,
    U: Stream<Item = StreamItem<B>>,
{
    outer.switch_map_with_change_signal(on_change, make)
}
