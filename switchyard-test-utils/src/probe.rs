// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::tracked::{DropLog, TrackedStream};
use parking_lot::Mutex;
use std::sync::Arc;
use switchyard_core::{StreamItem, SwitchError};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

/// Inner stream handed out by an [`InnerProbe`].
pub type ProbeStream<T> = TrackedStream<UnboundedReceiverStream<StreamItem<T>>>;

/// Recording inner-stream factory.
///
/// Every call creates a channel-backed inner stream labelled `inner-{index}`, records the
/// token it was created for and keeps the sender so the test can push values into that
/// particular inner stream later. Drops go to the probe's [`DropLog`].
///
/// # Example
///
/// ```rust
/// use switchyard_test_utils::InnerProbe;
///
/// let probe = InnerProbe::<&str, i32>::new();
/// let mut make = probe.factory();
///
/// let first = make("a");
/// let _second = make("b");
/// drop(first);
///
/// assert_eq!(probe.tokens(), vec!["a", "b"]);
/// assert!(probe.is_dropped(0));
/// assert_eq!(probe.live(), 1);
/// ```
pub struct InnerProbe<A, T> {
    state: Arc<Mutex<ProbeState<A, T>>>,
    log: DropLog,
}

struct ProbeState<A, T> {
    tokens: Vec<A>,
    senders: Vec<Option<mpsc::UnboundedSender<StreamItem<T>>>>,
}

impl<A, T> Clone for InnerProbe<A, T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            log: self.log.clone(),
        }
    }
}

impl<A, T> Default for InnerProbe<A, T> {
    fn default() -> Self {
        Self::with_log(DropLog::new())
    }
}

impl<A, T> InnerProbe<A, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// A probe that records drops into an existing log, shared with other tracked streams.
    pub fn with_log(log: DropLog) -> Self {
        Self {
            state: Arc::new(Mutex::new(ProbeState {
                tokens: Vec::new(),
                senders: Vec::new(),
            })),
            log,
        }
    }

    /// Drop-log label of the inner stream created by call `index`.
    pub fn label(index: usize) -> String {
        format!("inner-{index}")
    }

    /// Creates the inner stream for `token`.
    pub fn create(&self, token: A) -> ProbeStream<T> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut state = self.state.lock();
        let index = state.tokens.len();
        state.tokens.push(token);
        state.senders.push(Some(tx));

        TrackedStream::new(UnboundedReceiverStream::new(rx), Self::label(index), &self.log)
    }

    /// A factory closure backed by this probe.
    pub fn factory(&self) -> impl FnMut(A) -> ProbeStream<T> {
        let probe = self.clone();
        move |token| probe.create(token)
    }

    pub fn created(&self) -> usize {
        self.state.lock().tokens.len()
    }

    /// Pushes a value into inner stream `index`.
    ///
    /// Returns `false` if that inner stream is gone or was completed.
    pub fn send(&self, index: usize, value: T) -> bool {
        self.send_item(index, StreamItem::Value(value))
    }

    /// Pushes an error into inner stream `index`.
    pub fn send_error(&self, index: usize, error: SwitchError) -> bool {
        self.send_item(index, StreamItem::Error(error))
    }

    /// Completes inner stream `index` once its buffered items are consumed.
    pub fn complete(&self, index: usize) {
        if let Some(sender) = self.state.lock().senders.get_mut(index) {
            sender.take();
        }
    }

    /// Returns `true` once inner stream `index` has been dropped.
    pub fn is_dropped(&self, index: usize) -> bool {
        self.log.contains(&Self::label(index))
    }

    /// How many times inner stream `index` was dropped. Never more than one.
    pub fn drop_count(&self, index: usize) -> usize {
        self.log.count(&Self::label(index))
    }

    /// Number of inner streams that have been created and not dropped yet.
    pub fn live(&self) -> usize {
        (0..self.created())
            .filter(|index| !self.is_dropped(*index))
            .count()
    }

    pub fn log(&self) -> &DropLog {
        &self.log
    }

    fn send_item(&self, index: usize, item: StreamItem<T>) -> bool {
        match self.state.lock().senders.get(index) {
            Some(Some(sender)) => sender.send(item).is_ok(),
            _ => false,
        }
    }
}

impl<A: Clone, T> InnerProbe<A, T> {
    /// Tokens passed to the factory, in call order.
    pub fn tokens(&self) -> Vec<A> {
        self.state.lock().tokens.clone()
    }
}
