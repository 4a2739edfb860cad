// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::fmt::Debug;
use futures::stream::{Stream, StreamExt};
use std::time::Duration;
use switchyard_core::{StreamItem, SwitchError};
use tokio::time::{sleep, timeout};

/// Waits for the next item, panicking if none arrives within `timeout_ms` or the stream ends.
pub async fn unwrap_stream<S>(stream: &mut S, timeout_ms: u64) -> S::Item
where
    S: Stream + Unpin,
{
    match timeout(Duration::from_millis(timeout_ms), stream.next()).await {
        Ok(Some(item)) => item,
        Ok(None) => panic!("Expected an item but the stream ended"),
        Err(_) => panic!("Timeout: no item received within {timeout_ms} ms"),
    }
}

/// Waits for the next item and returns its value, panicking on an error item.
pub async fn unwrap_value<S, T>(stream: &mut S, timeout_ms: u64) -> T
where
    S: Stream<Item = StreamItem<T>> + Unpin,
{
    match unwrap_stream(stream, timeout_ms).await {
        StreamItem::Value(value) => value,
        StreamItem::Error(e) => panic!("Expected a value but got error: {e}"),
    }
}

/// Waits for the next item and returns its error, panicking on a value item.
pub async fn unwrap_error<S, T>(stream: &mut S, timeout_ms: u64) -> SwitchError
where
    S: Stream<Item = StreamItem<T>> + Unpin,
    T: Debug,
{
    match unwrap_stream(stream, timeout_ms).await {
        StreamItem::Value(value) => panic!("Expected an error but got value: {value:?}"),
        StreamItem::Error(e) => e,
    }
}

/// Asserts that nothing is emitted for `timeout_ms`.
///
/// A stream that ends during the wait counts as an emission.
pub async fn assert_no_element_emitted<S>(stream: &mut S, timeout_ms: u64)
where
    S: Stream + Unpin,
    S::Item: Debug,
{
    tokio::select! {
        state = stream.next() => {
            panic!("Unexpected emission, expected no output: {state:?}");
        }
        _ = sleep(Duration::from_millis(timeout_ms)) => {
        }
    }
}

/// Asserts that the stream ends within `timeout_ms`.
pub async fn assert_stream_ended<S>(stream: &mut S, timeout_ms: u64)
where
    S: Stream + Unpin,
    S::Item: Debug,
{
    match timeout(Duration::from_millis(timeout_ms), stream.next()).await {
        Ok(None) => {}
        Ok(Some(item)) => panic!("Expected the stream to end but got: {item:?}"),
        Err(_) => panic!("Timeout: stream did not end within {timeout_ms} ms"),
    }
}
