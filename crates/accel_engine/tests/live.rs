use std::time::Duration;

use accel_core::{Record, Topic};
use accel_engine::{
    parse_frame, pump_frames, topic_message, AccelerationUpdate, LiveBook, RecordStream,
    StaticStream, StreamError,
};
use futures_util::{stream, StreamExt};
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio_tungstenite::tungstenite::Message;

fn tx(id: &str) -> Record {
    Record {
        txid: Some(id.to_string()),
        ..Record::default()
    }
}

fn txids(records: &[Record]) -> Vec<String> {
    records.iter().filter_map(|r| r.txid.clone()).collect()
}

#[test]
fn deltas_fold_into_a_full_snapshot() {
    let book = LiveBook::new();
    assert_eq!(book.snapshot(), None);

    book.apply(AccelerationUpdate {
        accelerations: Some(vec![tx("a"), tx("b")]),
        ..AccelerationUpdate::default()
    });
    let mut replaced_b = tx("b");
    replaced_b.status = Some("completed".into());
    book.apply(AccelerationUpdate {
        added: vec![tx("c"), replaced_b],
        removed: vec!["a".into()],
        ..AccelerationUpdate::default()
    });

    let snapshot = book.snapshot().unwrap();
    assert_eq!(txids(&snapshot), vec!["b", "c"]);
    assert_eq!(snapshot[0].status.as_deref(), Some("completed"));

    book.apply(AccelerationUpdate {
        added: vec![tx("z")],
        reset: true,
        ..AccelerationUpdate::default()
    });
    assert_eq!(txids(&book.snapshot().unwrap()), vec!["z"]);
}

#[tokio::test]
async fn open_yields_current_snapshot_then_changes() {
    let book = LiveBook::new();
    book.replace(vec![tx("a")]);

    let mut feed = book.open();
    let first = feed.next().await.unwrap().unwrap();
    assert_eq!(txids(&first), vec!["a"]);

    book.replace(vec![tx("a"), tx("b")]);
    let second = feed.next().await.unwrap().unwrap();
    assert_eq!(txids(&second), vec!["a", "b"]);

    book.close();
    assert_eq!(feed.next().await.unwrap(), Err(StreamError::Closed));
    assert!(feed.next().await.is_none());
}

#[tokio::test]
async fn open_waits_for_first_frame() {
    let book = LiveBook::new();
    let mut feed = book.open();

    let pending = tokio::time::timeout(Duration::from_millis(30), feed.next()).await;
    assert!(pending.is_err());

    book.replace(Vec::new());
    let first = feed.next().await.unwrap().unwrap();
    assert!(first.is_empty());
}

#[tokio::test]
async fn static_stream_replays_on_every_open() {
    let stream = StaticStream::new(vec![
        Ok(vec![tx("a")]),
        Err(StreamError::Failed("boom".into())),
    ]);
    for _ in 0..2 {
        let items: Vec<_> = stream.open().collect().await;
        assert_eq!(items.len(), 2);
        assert!(items[1].is_err());
    }
}

#[test]
fn frames_without_accelerations_are_ignored() {
    assert_eq!(parse_frame(r#"{"block": {"height": 1}}"#).unwrap(), None);
    let update = parse_frame(r#"{"accelerations": {"added": [{"txid": "x"}], "removed": ["y"]}}"#)
        .unwrap()
        .unwrap();
    assert_eq!(txids(&update.added), vec!["x"]);
    assert_eq!(update.removed, vec!["y".to_string()]);
    assert!(parse_frame("not json").is_err());
}

#[test]
fn topic_messages_match_the_wire_protocol() {
    assert_eq!(
        topic_message(Topic::Accelerations, true),
        json!({ "track-accelerations": true })
    );
    assert_eq!(
        topic_message(Topic::Accelerations, false),
        json!({ "track-accelerations": false })
    );
    assert_eq!(
        topic_message(Topic::Blocks, true),
        json!({ "action": "want", "data": ["blocks"] })
    );
    assert_eq!(
        topic_message(Topic::Blocks, false),
        json!({ "action": "want", "data": [] })
    );
}

#[tokio::test]
async fn pump_applies_frames_and_closes_book_at_end() {
    let book = LiveBook::new();
    let frames = stream::iter(vec![
        Ok(Message::Text(r#"{"accelerations": {"accelerations": [{"txid": "a"}]}}"#.into())),
        Ok(Message::Text("garbage".into())),
        Ok(Message::Ping(Vec::new().into())),
        Ok(Message::Text(r#"{"accelerations": {"added": [{"txid": "b"}]}}"#.into())),
    ]);

    let mut feed = book.open();
    pump_frames(frames, &book).await;

    assert_eq!(txids(&book.snapshot().unwrap()), vec!["a", "b"]);
    let last = feed.next().await.unwrap();
    assert_eq!(last, Err(StreamError::Closed));
}
