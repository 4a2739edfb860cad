// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Teardown probes.
//!
//! Dropping a stream is how switchyard destroys it, so tests observe teardown by
//! wrapping streams in a [`TrackedStream`] that reports its own drop.

use core::pin::Pin;
use core::sync::atomic::{AtomicUsize, Ordering};
use core::task::{Context, Poll};
use futures::Stream;
use parking_lot::Mutex;
use std::sync::Arc;

/// Shared counter of how many tracked streams were dropped.
#[derive(Clone, Debug, Default)]
pub struct DropCounter(Arc<AtomicUsize>);

impl DropCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Ordered record of dropped stream labels.
///
/// Lets a test check both that a stream was torn down and in which order.
#[derive(Clone, Debug, Default)]
pub struct DropLog(Arc<Mutex<Vec<String>>>);

impl DropLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// All drops so far, oldest first.
    pub fn entries(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    /// How many times a stream with `label` was dropped.
    pub fn count(&self, label: &str) -> usize {
        self.0.lock().iter().filter(|entry| *entry == label).count()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.count(label) > 0
    }

    /// Index of the first drop of `label`.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.0.lock().iter().position(|entry| entry == label)
    }

    pub fn len(&self) -> usize {
        self.0.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().is_empty()
    }

    fn push(&self, label: &str) {
        self.0.lock().push(label.to_string());
    }
}

/// Stream wrapper that writes its label to a [`DropLog`] when dropped.
///
/// # Example
///
/// ```rust
/// use futures::stream;
/// use switchyard_test_utils::{DropLog, TrackedStream};
///
/// let log = DropLog::new();
/// let tracked = TrackedStream::new(stream::iter(vec![1, 2, 3]), "numbers", &log);
///
/// drop(tracked);
/// assert_eq!(log.entries(), vec!["numbers".to_string()]);
/// ```
#[derive(Debug)]
pub struct TrackedStream<S> {
    inner: S,
    label: String,
    log: DropLog,
    counter: Option<DropCounter>,
}

impl<S> TrackedStream<S> {
    pub fn new(inner: S, label: impl Into<String>, log: &DropLog) -> Self {
        Self {
            inner,
            label: label.into(),
            log: log.clone(),
            counter: None,
        }
    }

    /// Also count the drop on `counter`.
    #[must_use]
    pub fn with_counter(mut self, counter: &DropCounter) -> Self {
        self.counter = Some(counter.clone());
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl<S> Stream for TrackedStream<S>
where
    S: Stream + Unpin,
{
    type Item = S::Item;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<S> Drop for TrackedStream<S> {
    fn drop(&mut self) {
        self.log.push(&self.label);
        if let Some(counter) = &self.counter {
            counter.record();
        }
    }
}
