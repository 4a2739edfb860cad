// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Teardown signal for switching streams.
//!
//! A [`DestroyHandle`] is the single cancellation signal of a switching stream. It can be
//! cloned freely and triggered from anywhere: the consumer, another task, or one of the
//! stream's own callbacks. The owning stream registers its waker with the handle on
//! every poll, so a destroy issued while the stream is parked wakes it up to finish the
//! teardown.

use core::future::Future;
use core::pin::Pin;
use core::sync::atomic::{AtomicBool, Ordering};
use core::task::{Context, Poll, Waker};
use event_listener::{Event, EventListener};
use futures::task::AtomicWaker;
use std::sync::Arc;

/// Cloneable, idempotent destroy signal.
///
/// # Example
///
/// ```
/// use switchyard_core::DestroyHandle;
///
/// let handle = DestroyHandle::new();
/// let clone = handle.clone();
///
/// assert!(clone.destroy());
/// assert!(!handle.destroy()); // already destroyed
/// assert!(handle.is_destroyed());
/// ```
#[derive(Clone, Debug)]
pub struct DestroyHandle {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    destroyed: AtomicBool,
    event: Event,
    waker: AtomicWaker,
}

impl DestroyHandle {
    /// Create a new handle in the live state.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                destroyed: AtomicBool::new(false),
                event: Event::new(),
                waker: AtomicWaker::new(),
            }),
        }
    }

    /// Request teardown.
    ///
    /// Returns `true` for the call that performed the transition and `false` for every
    /// later call, which has no effect.
    pub fn destroy(&self) -> bool {
        if self.inner.destroyed.swap(true, Ordering::AcqRel) {
            return false;
        }

        self.inner.waker.wake();
        self.inner.event.notify(usize::MAX);
        true
    }

    /// Check if teardown has been requested (non-blocking).
    pub fn is_destroyed(&self) -> bool {
        self.inner.destroyed.load(Ordering::Acquire)
    }

    /// Register the waker of the stream that owns this handle.
    ///
    /// Only the most recently registered waker is kept.
    pub fn register(&self, waker: &Waker) {
        self.inner.waker.register(waker);
    }

    /// Wait asynchronously until the handle is destroyed.
    ///
    /// Resolves immediately if it already is.
    pub fn destroyed(&self) -> Destroyed<'_> {
        Destroyed {
            handle: self,
            listener: None,
        }
    }
}

impl Default for DestroyHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Future returned by [`DestroyHandle::destroyed()`].
pub struct Destroyed<'a> {
    handle: &'a DestroyHandle,
    listener: Option<EventListener>,
}

impl Future for Destroyed<'_> {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        loop {
            if self.handle.is_destroyed() {
                return Poll::Ready(());
            }

            match self.listener.as_mut() {
                Some(listener) => {
                    futures::ready!(Pin::new(listener).poll(cx));
                    self.listener = None;
                }
                // Re-check after listening so a destroy racing with us is not missed
                None => self.listener = Some(self.handle.inner.event.listen()),
            }
        }
    }
}
