// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use async_trait::async_trait;
use core::future::Future;
use futures::future::{self, Either};
use futures::stream::{Stream, StreamExt};
use switchyard_core::{DestroyHandle, Result, StreamItem, SwitchError};

/// Extension trait providing sequential async subscription for streams of [`StreamItem`]s.
#[async_trait]
pub trait SubscribeExt<T>: Stream<Item = StreamItem<T>> + Sized {
    /// Subscribes to the stream with an async handler, processing values sequentially.
    ///
    /// Each value is handed to `on_next_func` together with the subscription's
    /// [`DestroyHandle`], and the handler runs to completion before the next item is
    /// pulled.
    ///
    /// # Behavior
    ///
    /// - Stream errors go to `on_error_callback`; without one they are logged and skipped
    /// - Handler errors go to `on_error_callback` as [`SwitchError::UserError`]; without
    ///   one they are collected
    /// - The subscription stops when the stream ends or `destroy_handle` is destroyed,
    ///   including while waiting for the next item
    ///
    /// Pass the handle of a switching stream (see `destroy_handle()` on the switch-map
    /// outputs) to let a handler tear the whole pipeline down.
    ///
    /// # Errors
    ///
    /// Returns [`SwitchError::MultipleErrors`] if any handler failed and no error callback
    /// was installed.
    ///
    /// # Example
    ///
    /// ```
    /// use futures::stream;
    /// use switchyard_core::{DestroyHandle, StreamItem, SwitchError};
    /// use switchyard_exec::SubscribeExt;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> anyhow::Result<()> {
    /// let items = stream::iter(vec![StreamItem::Value(1), StreamItem::Value(2)]);
    ///
    /// items
    ///     .subscribe(
    ///         |value: i32, _handle: DestroyHandle| async move {
    ///             println!("got {value}");
    ///             Ok::<(), std::io::Error>(())
    ///         },
    ///         None::<fn(SwitchError)>,
    ///         None,
    ///     )
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    async fn subscribe<F, Fut, E, OnError>(
        self,
        on_next_func: F,
        on_error_callback: Option<OnError>,
        destroy_handle: Option<DestroyHandle>,
    ) -> Result<()>
    where
        F: Fn(T, DestroyHandle) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = core::result::Result<(), E>> + Send + 'static,
        OnError: Fn(SwitchError) + Send + Sync + 'static,
        T: Send + 'static,
        E: std::error::Error + Send + Sync + 'static;
}

#[async_trait]
impl<S, T> SubscribeExt<T> for S
where
    S: Stream<Item = StreamItem<T>> + Send + Unpin + 'static,
    T: Send + 'static,
{
    async fn subscribe<F, Fut, E, OnError>(
        mut self,
        on_next_func: F,
        on_error_callback: Option<OnError>,
        destroy_handle: Option<DestroyHandle>,
    ) -> Result<()>
    where
        F: Fn(T, DestroyHandle) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = core::result::Result<(), E>> + Send + 'static,
        OnError: Fn(SwitchError) + Send + Sync + 'static,
        T: Send + 'static,
        E: std::error::Error + Send + Sync + 'static,
    {
        let destroy_handle = destroy_handle.unwrap_or_default();
        let mut collected_errors = Vec::new();

        loop {
            let next = match future::select(self.next(), destroy_handle.destroyed()).await {
                Either::Left((next, _)) => next,
                Either::Right(_) => break,
            };

            let item = match next {
                Some(item) => item,
                None => break,
            };

            // Items that raced with a destroy are not delivered
            if destroy_handle.is_destroyed() {
                break;
            }

            match item {
                StreamItem::Value(value) => {
                    if let Err(error) = on_next_func(value, destroy_handle.clone()).await {
                        match &on_error_callback {
                            Some(on_error_callback) => {
                                on_error_callback(SwitchError::user_error(error));
                            }
                            None => collected_errors.push(error),
                        }
                    }
                }
                StreamItem::Error(error) => match &on_error_callback {
                    Some(on_error_callback) => on_error_callback(error),
                    None => {
                        crate::warn!(
                            "subscribe: skipping stream error without an error callback: {}",
                            error
                        );
                    }
                },
            }

            if destroy_handle.is_destroyed() {
                break;
            }
        }

        if collected_errors.is_empty() {
            Ok(())
        } else {
            Err(SwitchError::from_user_errors(collected_errors))
        }
    }
}
