//! Fan-in of the reference and error streams.
//!
//! A search produces two channels that close independently. The merger
//! waits on both with crossbeam's `select!`, which picks uniformly among
//! ready operations, and hands every item to a [`ReportSink`] the moment it
//! arrives. A channel that disconnects is replaced by [`never`] so the
//! select stops waking on it; the loop ends when no channel is left open
//! or the cancel token fires.

pub mod display;

use crate::cancel::CancelToken;
use crate::error::RefsError;
use crate::resolve::{Identifier, Reference, ReferenceStreams};
use crossbeam_channel::{never, select};

pub use display::{read_context_line, ConsoleSink, OutputFormat};

/// Receives merged search output.
pub trait ReportSink {
    /// The identifier being searched for, emitted before any reference.
    fn identifier(&mut self, ident: &Identifier);

    /// One reference, as soon as it arrives.
    fn reference(&mut self, reference: Reference);

    /// One non-fatal error, as soon as it arrives.
    fn error(&mut self, error: RefsError);
}

/// What the merger emitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    /// References handed to the sink.
    pub references: usize,
    /// Errors handed to the sink.
    pub errors: usize,
    /// Whether the merge stopped because of cancellation.
    pub cancelled: bool,
}

/// One wake-up of the merge loop.
enum Event {
    Reference(Reference),
    Error(RefsError),
    ReferencesClosed,
    ErrorsClosed,
    Cancelled,
}

/// Drain `streams` into `sink` until both channels are closed.
///
/// Items within a channel reach the sink in the order they were sent. There
/// is no ordering between the two channels. Returns early, with
/// `cancelled` set, once `cancel` fires.
pub fn merge_streams<S: ReportSink + ?Sized>(
    streams: ReferenceStreams,
    cancel: &CancelToken,
    sink: &mut S,
) -> MergeSummary {
    let ReferenceStreams {
        mut references,
        mut errors,
    } = streams;
    let cancelled = cancel.signal();

    let mut summary = MergeSummary::default();
    let mut open = 2;

    while open > 0 {
        let event = select! {
            recv(references) -> msg => msg.map_or(Event::ReferencesClosed, Event::Reference),
            recv(errors) -> msg => msg.map_or(Event::ErrorsClosed, Event::Error),
            recv(cancelled) -> _ => Event::Cancelled,
        };

        match event {
            Event::Reference(reference) => {
                summary.references += 1;
                sink.reference(reference);
            }
            Event::Error(error) => {
                summary.errors += 1;
                sink.error(error);
            }
            Event::ReferencesClosed => {
                log::debug!("Reference stream closed");
                references = never();
                open -= 1;
            }
            Event::ErrorsClosed => {
                log::debug!("Error stream closed");
                errors = never();
                open -= 1;
            }
            Event::Cancelled => {
                log::info!("Search cancelled");
                summary.cancelled = true;
                break;
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;
    use crossbeam_channel::{unbounded, Sender};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, Instant};

    #[derive(Default)]
    struct RecordingSink {
        references: Vec<Reference>,
        errors: Vec<String>,
        seen: Arc<AtomicUsize>,
    }

    impl ReportSink for RecordingSink {
        fn identifier(&mut self, _ident: &Identifier) {}

        fn reference(&mut self, reference: Reference) {
            self.references.push(reference);
            self.seen.fetch_add(1, Ordering::SeqCst);
        }

        fn error(&mut self, error: RefsError) {
            self.errors.push(error.to_string());
        }
    }

    fn reference(offset: usize) -> Reference {
        Reference {
            position: Position::new("a.go", offset, 1, offset + 1),
        }
    }

    fn channels() -> (Sender<Reference>, Sender<RefsError>, ReferenceStreams) {
        let (ref_tx, ref_rx) = unbounded();
        let (err_tx, err_rx) = unbounded();
        (
            ref_tx,
            err_tx,
            ReferenceStreams {
                references: ref_rx,
                errors: err_rx,
            },
        )
    }

    /// Run the merge on a helper thread and fail instead of hanging.
    fn merge_with_deadline(
        streams: ReferenceStreams,
        cancel: CancelToken,
        sink: RecordingSink,
    ) -> (MergeSummary, RecordingSink) {
        let (done_tx, done_rx) = unbounded();
        thread::spawn(move || {
            let mut sink = sink;
            let summary = merge_streams(streams, &cancel, &mut sink);
            let _ = done_tx.send((summary, sink));
        });
        done_rx
            .recv_timeout(Duration::from_secs(10))
            .expect("merge did not terminate")
    }

    #[test]
    fn test_emits_everything_from_interleaved_producers() {
        let (ref_tx, err_tx, streams) = channels();
        let producer = thread::spawn(move || {
            for i in 0..50 {
                ref_tx.send(reference(i)).unwrap();
                if i % 5 == 0 {
                    err_tx.send(RefsError::Other(format!("e{}", i))).unwrap();
                }
            }
        });

        let (summary, sink) =
            merge_with_deadline(streams, CancelToken::new(), RecordingSink::default());
        producer.join().unwrap();

        assert_eq!(summary.references, 50);
        assert_eq!(summary.errors, 10);
        assert!(!summary.cancelled);
        assert_eq!(sink.references.len(), 50);
        assert_eq!(sink.errors.len(), 10);

        // FIFO within each channel
        let offsets: Vec<usize> = sink.references.iter().map(|r| r.position.offset).collect();
        assert_eq!(offsets, (0..50).collect::<Vec<_>>());
        let expected: Vec<String> = (0..50).step_by(5).map(|i| format!("e{}", i)).collect();
        assert_eq!(sink.errors, expected);
    }

    #[test]
    fn test_error_channel_closing_first_does_not_end_merge() {
        let (ref_tx, err_tx, streams) = channels();
        let producer = thread::spawn(move || {
            err_tx.send(RefsError::Other("early".to_string())).unwrap();
            drop(err_tx);
            thread::sleep(Duration::from_millis(50));
            for i in 0..3 {
                ref_tx.send(reference(i)).unwrap();
                thread::sleep(Duration::from_millis(10));
            }
        });

        let (summary, _) =
            merge_with_deadline(streams, CancelToken::new(), RecordingSink::default());
        producer.join().unwrap();
        assert_eq!((summary.references, summary.errors), (3, 1));
    }

    #[test]
    fn test_reference_channel_closing_first_does_not_end_merge() {
        let (ref_tx, err_tx, streams) = channels();
        let producer = thread::spawn(move || {
            ref_tx.send(reference(0)).unwrap();
            drop(ref_tx);
            thread::sleep(Duration::from_millis(50));
            err_tx.send(RefsError::Other("late".to_string())).unwrap();
        });

        let (summary, sink) =
            merge_with_deadline(streams, CancelToken::new(), RecordingSink::default());
        producer.join().unwrap();
        assert_eq!((summary.references, summary.errors), (1, 1));
        assert_eq!(sink.errors, vec!["late".to_string()]);
    }

    #[test]
    fn test_both_closed_without_items() {
        let (ref_tx, err_tx, streams) = channels();
        drop(ref_tx);
        drop(err_tx);
        let (summary, _) =
            merge_with_deadline(streams, CancelToken::new(), RecordingSink::default());
        assert_eq!(summary, MergeSummary::default());
    }

    #[test]
    fn test_busy_channel_is_emitted_while_other_stays_open() {
        let (ref_tx, err_tx, streams) = channels();
        let seen = Arc::new(AtomicUsize::new(0));
        let sink = RecordingSink {
            seen: Arc::clone(&seen),
            ..RecordingSink::default()
        };

        // The error channel stays open until every reference has been
        // observed by the sink.
        let producer = thread::spawn(move || {
            for i in 0..100 {
                ref_tx.send(reference(i)).unwrap();
            }
            let deadline = Instant::now() + Duration::from_secs(5);
            while seen.load(Ordering::SeqCst) < 100 && Instant::now() < deadline {
                thread::sleep(Duration::from_millis(1));
            }
            let all_seen = seen.load(Ordering::SeqCst) == 100;
            drop(err_tx);
            drop(ref_tx);
            all_seen
        });

        let (summary, _) = merge_with_deadline(streams, CancelToken::new(), sink);
        assert!(producer.join().unwrap(), "references were held back");
        assert_eq!(summary.references, 100);
    }

    #[test]
    fn test_cancel_ends_merge_with_channels_still_open() {
        let (ref_tx, err_tx, streams) = channels();
        let cancel = CancelToken::new();
        let trigger = cancel.clone();
        ref_tx.send(reference(0)).unwrap();

        let canceller = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            trigger.cancel();
        });

        let (summary, _) = merge_with_deadline(streams, cancel, RecordingSink::default());
        canceller.join().unwrap();
        assert!(summary.cancelled);
        assert_eq!(summary.references, 1);

        // Producer side outlives the merge
        drop(ref_tx);
        drop(err_tx);
    }
}
