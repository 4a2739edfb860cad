// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::switch_map::factory::InnerFactory;
use crate::switch_map::implementation::SwitchCore;
use crate::switch_map::policy::{SwitchPhase, TerminalPolicy};
use crate::switched::Switched;
use core::convert::Infallible;
use core::pin::Pin;
use core::task::{Context, Poll};
use futures::stream::FusedStream;
use futures::Stream;
use pin_project::pin_project;
use switchyard_core::{DestroyHandle, StreamItem};

// Lifecycle accessors shared by both output types.
macro_rules! impl_lifecycle {
    () => {
        /// Selects what happens to the live inner stream when the outer ends.
        ///
        /// Defaults to [`TerminalPolicy::Immediate`].
        #[must_use]
        pub fn with_terminal_policy(mut self, policy: TerminalPolicy) -> Self {
            self.core.policy = policy;
            self
        }

        /// The configured terminal policy.
        pub fn terminal_policy(&self) -> TerminalPolicy {
            self.core.policy
        }

        /// The current lifecycle phase.
        pub fn phase(&self) -> SwitchPhase {
            self.core.phase()
        }

        /// Returns `true` once a destroy has been requested.
        pub fn is_destroyed(&self) -> bool {
            self.core.phase() == SwitchPhase::Destroyed || self.core.handle().is_destroyed()
        }

        /// A handle that destroys this stream from anywhere, including its own callbacks.
        ///
        /// The teardown runs on the next poll, or right after the callback that issued it.
        pub fn destroy_handle(&self) -> DestroyHandle {
            self.core.handle().clone()
        }

        /// Drops the outer stream, then the live inner stream, and ends the output.
        ///
        /// Calling it again has no effect.
        pub fn destroy(self: Pin<&mut Self>) {
            self.project().core.destroy();
        }
    };
}

/// Output of [`switch_map`](fn@super::switch_map): relays the most recent inner stream.
///
/// Dropping the stream has the same effect as [`destroy`](Self::destroy).
#[pin_project]
#[must_use = "streams do nothing unless polled"]
pub struct SwitchMap<St, U, F> {
    #[pin]
    core: SwitchCore<St, U, F>,
}

impl<St, U, F> SwitchMap<St, U, F> {
    /// Creates a switching stream over `outer` using `factory` to build inner streams.
    pub fn new(outer: St, factory: F) -> Self {
        Self {
            core: SwitchCore::new(outer, factory),
        }
    }

    impl_lifecycle!();
}

impl<St, U, F, A, B> Stream for SwitchMap<St, U, F>
where
    St: Stream<Item = StreamItem<A>>,
    U: Stream<Item = StreamItem<B>>,
    F: InnerFactory<A, Inner = U>,
{
    type Item = StreamItem<B>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.project()
            .core
            .poll_switch::<Infallible, fn(&A) -> Option<Infallible>>(cx, None)
            .map(|item| item.map(|item| item.map(Switched::into_value)))
    }
}

impl<St, U, F, A, B> FusedStream for SwitchMap<St, U, F>
where
    St: Stream<Item = StreamItem<A>>,
    U: Stream<Item = StreamItem<B>>,
    F: InnerFactory<A, Inner = U>,
{
    fn is_terminated(&self) -> bool {
        self.core.phase().is_terminal()
    }
}

/// Output of [`switch_map_with_change_signal`](super::switch_map_with_change_signal).
///
/// Like [`SwitchMap`], but every replacement of a live inner stream may inject a
/// [`Switched::Change`] item produced by the listener. Without a listener it only
/// yields [`Switched::Value`] items.
#[pin_project]
#[must_use = "streams do nothing unless polled"]
pub struct SwitchMapWithChange<St, U, F, L> {
    #[pin]
    core: SwitchCore<St, U, F>,
    on_change: Option<L>,
}

impl<St, U, F, L> SwitchMapWithChange<St, U, F, L> {
    /// Creates a switching stream that reports replacements through `on_change`.
    pub fn new(outer: St, factory: F, on_change: Option<L>) -> Self {
        Self {
            core: SwitchCore::new(outer, factory),
            on_change,
        }
    }

    impl_lifecycle!();
}

impl<St, U, F, L, A, B, C> Stream for SwitchMapWithChange<St, U, F, L>
where
    St: Stream<Item = StreamItem<A>>,
    U: Stream<Item = StreamItem<B>>,
    F: InnerFactory<A, Inner = U>,
    L: FnMut(&A) -> Option<C>,
{
    type Item = StreamItem<Switched<B, C>>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        this.core.poll_switch(cx, this.on_change.as_mut())
    }
}

impl<St, U, F, L, A, B, C> FusedStream for SwitchMapWithChange<St, U, F, L>
where
    St: Stream<Item = StreamItem<A>>,
    U: Stream<Item = StreamItem<B>>,
    F: InnerFactory<A, Inner = U>,
    L: FnMut(&A) -> Option<C>,
{
    fn is_terminated(&self) -> bool {
        self.core.phase().is_terminal()
    }
}
