//! Unit tests for the buffered stream decoder.
//!
//! Covers record splitting across chunk boundaries, buffer state after each
//! call, `clear`, the terminal channel state and the skip-and-continue
//! policy.

use std::sync::{Arc, Mutex};

use bytes::Bytes;
use rstest::{fixture, rstest};
use tracing_test::traced_test;

use super::*;

type Seen = Arc<Mutex<Vec<Vec<u8>>>>;

/// Decoder accepting UTF-8 records that do not start with `!`.
///
/// Every input it is handed is recorded so tests can inspect exactly what
/// the stream decoder passed in.
fn recording_decoder(seen: Seen) -> impl Fn(&[u8]) -> Result<String, String> {
    move |bytes: &[u8]| {
        seen.lock().expect("seen lock poisoned").push(bytes.to_vec());
        if bytes.first() == Some(&b'!') {
            return Err(format!("rejected {} bytes", bytes.len()));
        }
        std::str::from_utf8(bytes)
            .map(|s| s.trim_end_matches('\n').to_owned())
            .map_err(|e| e.to_string())
    }
}

#[fixture]
fn seen() -> Seen { Arc::new(Mutex::new(Vec::new())) }

fn values(events: Vec<StreamEvent<String, String>>) -> Vec<String> {
    events
        .into_iter()
        .map(|event| match event {
            StreamEvent::Value(v) => v,
            StreamEvent::Terminal(err) => panic!("unexpected terminal event: {err}"),
        })
        .collect()
}

#[rstest]
fn record_split_across_chunks_is_reassembled(seen: Seen) {
    let decoder = BufferedStreamDecoder::newline(recording_decoder(seen.clone()));
    let mut events = decoder.subscribe();

    decoder.receive(b"hel");
    assert!(events.try_next().is_none());
    assert_eq!(decoder.buffered_len(), 3);

    decoder.receive(b"lo\n");
    assert_eq!(values(events.drain_ready()), vec!["hello"]);
    assert_eq!(
        seen.lock().expect("seen lock poisoned").as_slice(),
        [b"hello\n".to_vec()]
    );
}

#[rstest]
fn chunk_with_many_records_emits_each_in_order(seen: Seen) {
    let decoder = BufferedStreamDecoder::newline(recording_decoder(seen));
    let mut events = decoder.subscribe();

    decoder.receive(b"a\nbb\nccc\ndd");

    assert_eq!(values(events.drain_ready()), vec!["a", "bb", "ccc"]);
    assert_eq!(decoder.buffered_len(), 2);
}

#[rstest]
fn empty_chunk_is_a_no_op(seen: Seen) {
    let decoder = BufferedStreamDecoder::newline(recording_decoder(seen.clone()));
    let mut events = decoder.subscribe();

    decoder.receive(b"abc");
    decoder.receive(b"");

    assert_eq!(decoder.buffered_len(), 3);
    assert!(events.try_next().is_none());
    assert!(seen.lock().expect("seen lock poisoned").is_empty());
}

#[rstest]
#[case::single(&b"one\n"[..])]
#[case::several(&b"one\ntwo\n"[..])]
#[case::terminator_only(&b"\n"[..])]
fn terminator_as_last_byte_leaves_buffer_empty(seen: Seen, #[case] chunk: &[u8]) {
    let decoder = BufferedStreamDecoder::newline(recording_decoder(seen));
    decoder.receive(b"partial ");
    decoder.receive(chunk);

    assert_eq!(decoder.buffered_len(), 0);
}

#[rstest]
fn lone_terminator_completes_buffered_record(seen: Seen) {
    let decoder = BufferedStreamDecoder::newline(recording_decoder(seen));
    let mut events = decoder.subscribe();

    decoder.receive(b"tail");
    decoder.receive(b"\n");

    assert_eq!(values(events.drain_ready()), vec!["tail"]);
}

#[rstest]
fn clear_discards_partial_record(seen: Seen) {
    let decoder = BufferedStreamDecoder::newline(recording_decoder(seen.clone()));
    let mut events = decoder.subscribe();

    decoder.receive(b"stale bytes");
    decoder.clear();
    assert_eq!(decoder.buffered_len(), 0);

    decoder.receive(b"fresh\n");
    assert_eq!(values(events.drain_ready()), vec!["fresh"]);
    assert_eq!(
        seen.lock().expect("seen lock poisoned").as_slice(),
        [b"fresh\n".to_vec()]
    );
    assert!(!decoder.is_closed());
}

#[rstest]
fn decode_failure_publishes_terminal_event_with_raw_bytes(seen: Seen) {
    let decoder = BufferedStreamDecoder::newline(recording_decoder(seen));
    let mut events = decoder.subscribe();

    decoder.receive(b"ok\n!bad\n");

    let received = events.drain_ready();
    assert_eq!(received.len(), 2);
    assert!(matches!(&received[0], StreamEvent::Value(v) if v == "ok"));
    match &received[1] {
        StreamEvent::Terminal(err) => {
            assert_eq!(err.raw(), &Bytes::from_static(b"!bad\n"));
            assert_eq!(err.error(), "rejected 5 bytes");
        }
        StreamEvent::Value(v) => panic!("expected terminal event, got value {v}"),
    }
    assert!(decoder.is_closed());
    assert_eq!(decoder.buffered_len(), 0);
}

#[rstest]
fn terminal_state_withholds_later_records(seen: Seen) {
    let decoder = BufferedStreamDecoder::newline(recording_decoder(seen.clone()));
    let mut events = decoder.subscribe();

    decoder.receive(b"!bad\n");
    assert!(events.try_next().is_some_and(|e| e.is_terminal()));

    decoder.receive(b"good\nalso good\n");
    assert!(events.try_next().is_none());
    assert!(events.is_finished());

    // Records are still framed and decoded after the channel closed.
    assert_eq!(seen.lock().expect("seen lock poisoned").len(), 3);
}

#[rstest]
fn skip_and_continue_drops_only_the_bad_record(seen: Seen) {
    let config = DecoderConfig::default().error_policy(ErrorPolicy::SkipAndContinue);
    let decoder = BufferedStreamDecoder::with_config(config, recording_decoder(seen));
    let mut events = decoder.subscribe();

    decoder.receive(b"first\n!bad\nsecond\n");

    assert_eq!(values(events.drain_ready()), vec!["first", "second"]);
    assert!(!decoder.is_closed());
}

#[rstest]
fn custom_terminator_is_included_in_decoded_bytes(seen: Seen) {
    let decoder = BufferedStreamDecoder::new(b';', recording_decoder(seen.clone()));
    let _events = decoder.subscribe();

    decoder.receive(b"x=1;y=2;z");

    assert_eq!(decoder.terminator(), b';');
    assert_eq!(
        seen.lock().expect("seen lock poisoned").as_slice(),
        [b"x=1;".to_vec(), b"y=2;".to_vec()]
    );
    assert_eq!(decoder.buffered_len(), 1);
}

#[rstest]
fn finish_returns_remainder_and_completes_channel(seen: Seen) {
    let decoder = BufferedStreamDecoder::newline(recording_decoder(seen));
    let mut events = decoder.subscribe();

    decoder.receive(b"done\nhalf");
    let remainder = decoder.finish();

    assert_eq!(remainder, Bytes::from_static(b"half"));
    assert_eq!(decoder.buffered_len(), 0);
    assert_eq!(values(events.drain_ready()), vec!["done"]);
    assert!(events.is_finished());
    assert!(decoder.is_closed());
}

#[test]
fn json_decoder_default_reads_newline_delimited_json() {
    let decoder = BufferedStreamDecoder::<JsonDecoder<Vec<u8>>>::default();
    let mut events = decoder.subscribe();

    decoder.receive(b"[1,2]\n[3]\n");

    let decoded: Vec<_> = events
        .drain_ready()
        .into_iter()
        .filter_map(StreamEvent::into_value)
        .collect();
    assert_eq!(decoded, vec![vec![1, 2], vec![3]]);
    assert_eq!(decoder.terminator(), b'\n');
    assert_eq!(decoder.policy(), ErrorPolicy::StopOnError);
}

#[rstest]
#[traced_test]
fn clear_logs_discarded_byte_count(seen: Seen) {
    let decoder = BufferedStreamDecoder::newline(recording_decoder(seen));

    decoder.receive(b"12345");
    decoder.clear();

    assert!(logs_contain("partial record cleared"));
    assert!(logs_contain("discarded=5"));
}
