// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::{stream, StreamExt};
use parking_lot::Mutex;
use std::sync::Arc;
use switchyard_core::StreamItem;
use switchyard_stream::{switch_map_with_change_signal, SwitchMapExt, Switched, TerminalPolicy};
use switchyard_test_utils::{assert_no_element_emitted, test_channel, unwrap_value, InnerProbe};

#[tokio::test]
async fn test_change_signal_called_once_for_replacing_token() -> anyhow::Result<()> {
    // Arrange
    let (tx, outer) = test_channel::<&str>();
    let probe = InnerProbe::<&str, String>::new();
    let calls = Arc::new(Mutex::new(Vec::new()));
    let listener_calls = Arc::clone(&calls);
    let mut result = outer.switch_map_with_change_signal(
        Some(move |token: &&str| {
            listener_calls.lock().push(token.to_string());
            Some("changed")
        }),
        probe.factory(),
    );

    // Act
    tx.send("bar")?;
    assert_no_element_emitted(&mut result, 50).await;
    tx.send("foo")?;

    // Assert
    assert_eq!(unwrap_value(&mut result, 100).await, Switched::Change("changed"));
    assert_eq!(*calls.lock(), vec!["foo".to_string()]);

    Ok(())
}

#[tokio::test]
async fn test_change_signal_precedes_values_of_new_inner() -> anyhow::Result<()> {
    // Arrange
    let (tx, outer) = test_channel::<&str>();
    let probe = InnerProbe::<&str, String>::new();
    let mut result =
        outer.switch_map_with_change_signal(Some(|token: &&str| Some(token.len())), probe.factory());

    tx.send("foo")?;
    assert_no_element_emitted(&mut result, 50).await;
    probe.send(0, "old".to_string());
    assert_eq!(
        unwrap_value(&mut result, 100).await,
        Switched::Value("old".to_string())
    );

    // Act
    tx.send("longer")?;

    // Assert
    assert_eq!(unwrap_value(&mut result, 100).await, Switched::Change(6));
    assert!(probe.is_dropped(0));

    probe.send(1, "new".to_string());
    assert_eq!(
        unwrap_value(&mut result, 100).await,
        Switched::Value("new".to_string())
    );

    Ok(())
}

#[tokio::test]
async fn test_change_signal_runs_before_old_inner_is_dropped() -> anyhow::Result<()> {
    // Arrange
    let (tx, outer) = test_channel::<&str>();
    let probe = InnerProbe::<&str, String>::new();
    let observed = Arc::new(Mutex::new(Vec::new()));

    let listener_probe = probe.clone();
    let listener_observed = Arc::clone(&observed);
    let mut result = outer.switch_map_with_change_signal(
        Some(move |_: &&str| {
            listener_observed
                .lock()
                .push((listener_probe.created(), listener_probe.live()));
            Some(())
        }),
        probe.factory(),
    );

    tx.send("a")?;
    assert_no_element_emitted(&mut result, 50).await;

    // Act
    tx.send("b")?;

    // Assert
    assert_eq!(unwrap_value(&mut result, 100).await, Switched::Change(()));
    assert_eq!(*observed.lock(), vec![(1, 1)]);
    assert_eq!(probe.live(), 1);

    Ok(())
}

#[tokio::test]
async fn test_change_signal_none_result_is_not_emitted() -> anyhow::Result<()> {
    // Arrange
    let (tx, outer) = test_channel::<u32>();
    let probe = InnerProbe::<u32, u32>::new();
    let mut result = outer.switch_map_with_change_signal(
        Some(|token: &u32| (token % 2 == 0).then_some(*token)),
        probe.factory(),
    );

    tx.send(1)?;
    assert_no_element_emitted(&mut result, 50).await;

    // Act
    tx.send(3)?;
    assert_no_element_emitted(&mut result, 50).await;
    tx.send(4)?;

    // Assert
    assert_eq!(unwrap_value(&mut result, 100).await, Switched::Change(4));
    assert_eq!(probe.created(), 3);
    assert_eq!(probe.live(), 1);

    Ok(())
}

#[tokio::test]
async fn test_change_signal_after_inner_completed_on_its_own() -> anyhow::Result<()> {
    // Arrange
    let (tx, outer) = test_channel::<&str>();
    let probe = InnerProbe::<&str, String>::new();
    let mut result =
        outer.switch_map_with_change_signal(Some(|_: &&str| Some("switch")), probe.factory());

    tx.send("first")?;
    assert_no_element_emitted(&mut result, 50).await;
    probe.complete(0);
    assert_no_element_emitted(&mut result, 50).await;
    assert!(probe.is_dropped(0));

    // Act
    tx.send("second")?;

    // Assert
    assert_eq!(unwrap_value(&mut result, 100).await, Switched::Change("switch"));
    assert_eq!(probe.drop_count(0), 1);

    Ok(())
}

#[tokio::test]
async fn test_change_signal_for_each_queued_token() -> anyhow::Result<()> {
    // Arrange
    let (tx, outer) = test_channel::<u32>();
    let probe = InnerProbe::<u32, u32>::new();
    let mut result =
        outer.switch_map_with_change_signal(Some(|token: &u32| Some(*token)), probe.factory());

    // Act
    tx.send(1)?;
    tx.send(2)?;
    tx.send(3)?;

    // Assert
    assert_eq!(unwrap_value(&mut result, 100).await, Switched::Change(2));
    assert_eq!(unwrap_value(&mut result, 100).await, Switched::Change(3));
    assert_no_element_emitted(&mut result, 50).await;
    assert_eq!(probe.created(), 3);
    assert_eq!(probe.live(), 1);

    Ok(())
}

#[tokio::test]
async fn test_without_listener_matches_plain_switch_map() -> anyhow::Result<()> {
    // Arrange
    let tokens = || stream::iter(vec![StreamItem::Value(1), StreamItem::Value(2)]);
    let make = |n: i32| stream::iter(vec![StreamItem::Value(n * 10), StreamItem::Value(n * 10 + 1)]);

    // Act
    let plain: Vec<i32> = tokens()
        .switch_map(make)
        .with_terminal_policy(TerminalPolicy::Drain)
        .filter_map(|item| async move { item.ok() })
        .collect()
        .await;

    let signalled: Vec<Switched<i32, ()>> =
        switch_map_with_change_signal(None::<fn(&i32) -> Option<()>>, make, tokens())
            .with_terminal_policy(TerminalPolicy::Drain)
            .filter_map(|item| async move { item.ok() })
            .collect()
            .await;

    // Assert
    assert_eq!(plain, vec![20, 21]);
    assert_eq!(
        signalled,
        plain.into_iter().map(Switched::Value).collect::<Vec<_>>()
    );

    Ok(())
}
