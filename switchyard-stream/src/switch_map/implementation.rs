// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::switch_map::factory::InnerFactory;
use crate::switch_map::policy::{SwitchPhase, TerminalPolicy};
use crate::switched::Switched;
use core::pin::Pin;
use core::task::{Context, Poll};
use futures::Stream;
use pin_project::pin_project;
use switchyard_core::{DestroyHandle, StreamItem, SwitchError};

/// Maximum number of outer tokens handled by a single poll before the live inner
/// stream gets its turn.
const OUTER_TOKEN_BUDGET: usize = 32;

/// Shared state machine behind [`SwitchMap`](super::SwitchMap) and
/// [`SwitchMapWithChange`](super::SwitchMapWithChange).
///
/// `outer` is declared before `inner` so that dropping the core tears the streams down
/// in the same order as an explicit destroy.
#[pin_project(project = SwitchCoreProj)]
pub(crate) struct SwitchCore<St, U, F> {
    #[pin]
    outer: Option<St>,
    #[pin]
    inner: Option<U>,
    factory: F,
    pub(crate) policy: TerminalPolicy,
    phase: SwitchPhase,
    handle: DestroyHandle,
    switched_once: bool,
    pending_error: Option<SwitchError>,
}

impl<St, U, F> SwitchCore<St, U, F> {
    pub(crate) fn new(outer: St, factory: F) -> Self {
        Self {
            outer: Some(outer),
            inner: None,
            factory,
            policy: TerminalPolicy::default(),
            phase: SwitchPhase::Idle,
            handle: DestroyHandle::new(),
            switched_once: false,
            pending_error: None,
        }
    }

    pub(crate) fn phase(&self) -> SwitchPhase {
        self.phase
    }

    pub(crate) fn handle(&self) -> &DestroyHandle {
        &self.handle
    }

    pub(crate) fn destroy(self: Pin<&mut Self>) {
        tear_down(&mut self.project());
    }
}

impl<St, U, F, A, B> SwitchCore<St, U, F>
where
    St: Stream<Item = StreamItem<A>>,
    U: Stream<Item = StreamItem<B>>,
    F: InnerFactory<A, Inner = U>,
{
    /// Advances the state machine by at most one output item.
    ///
    /// Queued tokens are consumed first, up to [`OUTER_TOKEN_BUDGET`] per call, so the
    /// output follows the most recent one. Every token still creates its inner stream,
    /// which the next token destroys. Once the budget is spent the live inner is polled
    /// and, if nothing is ready, the task is woken again instead of spinning on an
    /// always-ready outer.
    pub(crate) fn poll_switch<C, L>(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        mut on_change: Option<&mut L>,
    ) -> Poll<Option<StreamItem<Switched<B, C>>>>
    where
        L: FnMut(&A) -> Option<C>,
    {
        let mut this = self.project();

        this.handle.register(cx.waker());
        if this.handle.is_destroyed() {
            tear_down(&mut this);
            return Poll::Ready(None);
        }

        if this.phase.is_terminal() {
            return Poll::Ready(None);
        }

        if let Some(error) = this.pending_error.take() {
            return Poll::Ready(Some(StreamItem::Error(error)));
        }

        let mut budget_spent = false;
        if *this.phase != SwitchPhase::Draining {
            let mut budget = OUTER_TOKEN_BUDGET;
            while let Some(outer) = this.outer.as_mut().as_pin_mut() {
                if budget == 0 {
                    budget_spent = true;
                    break;
                }

                let token = match outer.poll_next(cx) {
                    Poll::Ready(Some(StreamItem::Value(token))) => token,
                    Poll::Ready(Some(StreamItem::Error(error))) => {
                        debug!("switch_map: forwarding outer error: {}", error);
                        return Poll::Ready(Some(StreamItem::Error(error)));
                    }
                    Poll::Ready(None) => {
                        if end_of_outer(&mut this) {
                            return Poll::Ready(None);
                        }
                        break;
                    }
                    Poll::Pending => break,
                };
                budget -= 1;

                let signal = match on_change.as_mut() {
                    Some(listener) if *this.switched_once => listener(&token),
                    _ => None,
                };
                *this.switched_once = true;

                if this.handle.is_destroyed() {
                    tear_down(&mut this);
                    return Poll::Ready(None);
                }

                if this.inner.is_some() {
                    trace!("switch_map: destroying replaced inner stream");
                    this.inner.set(None);
                }

                let failure = match this.factory.create(token) {
                    Ok(inner) => {
                        trace!("switch_map: inner stream created");
                        this.inner.set(Some(inner));
                        *this.phase = SwitchPhase::Live;
                        None
                    }
                    Err(error) => {
                        debug!("switch_map: factory failed: {}", error);
                        *this.phase = SwitchPhase::Idle;
                        Some(error)
                    }
                };

                if this.handle.is_destroyed() {
                    tear_down(&mut this);
                    return Poll::Ready(None);
                }

                match (signal, failure) {
                    (Some(signal), failure) => {
                        *this.pending_error = failure;
                        return Poll::Ready(Some(StreamItem::Value(Switched::Change(signal))));
                    }
                    (None, Some(error)) => return Poll::Ready(Some(StreamItem::Error(error))),
                    (None, None) => {}
                }
            }
        }

        if let Some(inner) = this.inner.as_mut().as_pin_mut() {
            match inner.poll_next(cx) {
                Poll::Ready(Some(item)) => return Poll::Ready(Some(item.map(Switched::Value))),
                Poll::Ready(None) => {
                    trace!("switch_map: inner stream completed");
                    this.inner.set(None);

                    if *this.phase == SwitchPhase::Draining {
                        *this.phase = SwitchPhase::Ended;
                        return Poll::Ready(None);
                    }
                    *this.phase = SwitchPhase::Idle;
                }
                Poll::Pending => {}
            }
        }

        if budget_spent {
            trace!("switch_map: outer token budget spent, yielding");
            cx.waker().wake_by_ref();
        }

        Poll::Pending
    }
}

/// Applies the terminal policy once the outer has ended.
///
/// Returns `true` when the output ends right away. The outer itself is kept: it is
/// only dropped by a destroy.
fn end_of_outer<St, U, F>(this: &mut SwitchCoreProj<'_, St, U, F>) -> bool {
    debug!("switch_map: outer stream ended ({:?})", this.policy);

    match *this.policy {
        TerminalPolicy::Drain if this.inner.is_some() => {
            *this.phase = SwitchPhase::Draining;
            false
        }
        _ => {
            this.inner.set(None);
            *this.phase = SwitchPhase::Ended;
            true
        }
    }
}

fn tear_down<St, U, F>(this: &mut SwitchCoreProj<'_, St, U, F>) {
    if *this.phase == SwitchPhase::Destroyed {
        return;
    }

    debug!("switch_map: destroying outer and live inner stream");
    this.outer.set(None);
    this.inner.set(None);
    *this.phase = SwitchPhase::Destroyed;
    this.handle.destroy();
}
