// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::{stream, FutureExt, StreamExt};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use switchyard_core::StreamItem;
use switchyard_stream::{switch_map, SwitchMapExt, SwitchPhase};
use switchyard_test_utils::{assert_no_element_emitted, test_channel, unwrap_value, InnerProbe};

#[tokio::test]
async fn test_switch_map_relays_values_of_live_inner() -> anyhow::Result<()> {
    // Arrange
    let (tx, outer) = test_channel::<&str>();
    let probe = InnerProbe::<&str, String>::new();
    let mut result = outer.switch_map(probe.factory());

    // Act
    tx.send("foo")?;
    assert_no_element_emitted(&mut result, 50).await;
    assert!(probe.send(0, "bar".to_string()));
    assert!(probe.send(0, "baz".to_string()));

    // Assert
    assert_eq!(probe.tokens(), vec!["foo"]);
    assert_eq!(unwrap_value(&mut result, 100).await, "bar");
    assert_eq!(unwrap_value(&mut result, 100).await, "baz");
    assert_eq!(result.phase(), SwitchPhase::Live);

    Ok(())
}

#[tokio::test]
async fn test_switch_map_does_not_create_inner_before_first_token() -> anyhow::Result<()> {
    // Arrange
    let (_tx, outer) = test_channel::<&str>();
    let probe = InnerProbe::<&str, String>::new();
    let mut result = outer.switch_map(probe.factory());

    // Act
    assert_no_element_emitted(&mut result, 50).await;

    // Assert
    assert_eq!(probe.created(), 0);
    assert_eq!(result.phase(), SwitchPhase::Idle);

    Ok(())
}

#[tokio::test]
async fn test_switch_map_destroys_previous_inner_on_new_token() -> anyhow::Result<()> {
    // Arrange
    let (tx, outer) = test_channel::<&str>();
    let probe = InnerProbe::<&str, String>::new();
    let mut result = outer.switch_map(probe.factory());

    tx.send("foo")?;
    assert_no_element_emitted(&mut result, 50).await;
    probe.send(0, "first".to_string());
    assert_eq!(unwrap_value(&mut result, 100).await, "first");

    // Act
    tx.send("bar")?;
    probe.send(0, "stale".to_string());

    // Assert
    assert_no_element_emitted(&mut result, 50).await;
    assert_eq!(probe.drop_count(0), 1);
    assert!(!probe.is_dropped(1));
    assert!(!probe.send(0, "late".to_string()));

    probe.send(1, "second".to_string());
    assert_eq!(unwrap_value(&mut result, 100).await, "second");
    assert_eq!(probe.drop_count(0), 1);

    Ok(())
}

#[tokio::test]
async fn test_switch_map_keeps_at_most_one_inner_alive() -> anyhow::Result<()> {
    // Arrange
    let (tx, outer) = test_channel::<usize>();
    let probe = InnerProbe::<usize, usize>::new();
    let mut result = outer.switch_map(probe.factory());

    // Act & Assert
    for token in 0..5 {
        tx.send(token)?;
        assert_no_element_emitted(&mut result, 20).await;
        assert_eq!(probe.live(), 1);

        probe.send(token, token * 10);
        assert_eq!(unwrap_value(&mut result, 100).await, token * 10);
        assert_eq!(probe.live(), 1);
    }

    assert_eq!(probe.created(), 5);
    for index in 0..4 {
        assert_eq!(probe.drop_count(index), 1);
    }

    Ok(())
}

#[tokio::test]
async fn test_switch_map_queued_tokens_each_create_an_inner() -> anyhow::Result<()> {
    // Arrange
    let (tx, outer) = test_channel::<&str>();
    let probe = InnerProbe::<&str, String>::new();
    let mut result = outer.switch_map(probe.factory());

    // Act
    tx.send("a")?;
    tx.send("b")?;
    tx.send("c")?;
    assert_no_element_emitted(&mut result, 50).await;

    // Assert
    assert_eq!(probe.tokens(), vec!["a", "b", "c"]);
    assert!(probe.is_dropped(0));
    assert!(probe.is_dropped(1));
    assert_eq!(probe.live(), 1);

    probe.send(2, "from c".to_string());
    assert_eq!(unwrap_value(&mut result, 100).await, "from c");

    Ok(())
}

#[tokio::test]
async fn test_switch_map_inner_completing_returns_to_idle() -> anyhow::Result<()> {
    // Arrange
    let (tx, outer) = test_channel::<&str>();
    let probe = InnerProbe::<&str, String>::new();
    let mut result = outer.switch_map(probe.factory());

    tx.send("foo")?;
    assert_no_element_emitted(&mut result, 50).await;

    // Act
    probe.send(0, "only".to_string());
    probe.complete(0);

    // Assert
    assert_eq!(unwrap_value(&mut result, 100).await, "only");
    assert_no_element_emitted(&mut result, 50).await;
    assert_eq!(probe.drop_count(0), 1);
    assert_eq!(result.phase(), SwitchPhase::Idle);

    tx.send("bar")?;
    assert_no_element_emitted(&mut result, 50).await;
    probe.send(1, "again".to_string());
    assert_eq!(unwrap_value(&mut result, 100).await, "again");
    assert_eq!(probe.drop_count(0), 1);

    Ok(())
}

#[tokio::test]
async fn test_switch_map_free_function_form() -> anyhow::Result<()> {
    // Arrange
    let outer = stream::iter(vec![StreamItem::Value(2), StreamItem::Value(3)]);

    // Act
    let values: Vec<i32> = switch_map(
        |n: i32| stream::iter((0..n).map(StreamItem::Value)),
        outer,
    )
    .with_terminal_policy(switchyard_stream::TerminalPolicy::Drain)
    .filter_map(|item| async move { item.ok() })
    .collect()
    .await;

    // Assert
    assert_eq!(values, vec![0, 1, 2]);

    Ok(())
}

#[tokio::test]
async fn test_switch_map_output_is_send() -> anyhow::Result<()> {
    fn assert_send<T: Send>(_: &T) {}

    // Arrange
    let (tx, outer) = test_channel::<u32>();
    let probe = InnerProbe::<u32, u32>::new();
    let mut result = outer.switch_map(probe.factory());
    assert_send(&result);

    // Act
    let consumer = tokio::spawn(async move { unwrap_value(&mut result, 500).await });
    tx.send(1)?;
    while probe.created() == 0 {
        tokio::task::yield_now().await;
    }
    probe.send(0, 42);

    // Assert
    assert_eq!(consumer.await?, 42);

    Ok(())
}

#[test]
fn test_switch_map_first_poll_returns_on_infinite_ready_outer() -> anyhow::Result<()> {
    // Arrange
    let (done_tx, done_rx) = mpsc::channel();
    thread::spawn(move || {
        let mut result = stream::iter(0u64..)
            .map(StreamItem::Value)
            .switch_map(|n: u64| stream::iter(vec![StreamItem::Value(n)]));

        let polls: Vec<_> = (0..3).map(|_| result.next().now_or_never()).collect();
        let _ = done_tx.send(polls);
    });

    // Act
    let polls = done_rx.recv_timeout(Duration::from_secs(2))?;

    // Assert
    let values: Vec<u64> = polls
        .into_iter()
        .map(|poll| match poll {
            Some(Some(StreamItem::Value(value))) => value,
            other => panic!("expected a value on every poll, got {other:?}"),
        })
        .collect();
    assert!(values.windows(2).all(|pair| pair[0] < pair[1]));

    Ok(())
}

#[tokio::test]
async fn test_switch_map_yields_and_resumes_on_long_ready_burst() -> anyhow::Result<()> {
    // Arrange
    let probe = InnerProbe::<u32, u32>::new();
    let outer = stream::iter(0..1000u32)
        .map(StreamItem::Value)
        .chain(stream::pending());
    let mut result = outer.switch_map(probe.factory());

    // Act
    let first = result.next().now_or_never();

    // Assert
    assert!(first.is_none());
    let created_by_first_poll = probe.created();
    assert!(created_by_first_poll > 0);
    assert!(created_by_first_poll < 1000);
    assert_eq!(probe.live(), 1);

    assert_no_element_emitted(&mut result, 100).await;
    assert_eq!(probe.created(), 1000);
    assert_eq!(probe.live(), 1);
    assert_eq!(probe.tokens().last(), Some(&999));

    assert!(probe.send(999, 7));
    assert_eq!(unwrap_value(&mut result, 100).await, 7);

    Ok(())
}
