//! Event transport drivers.
//!
//! Two consumption modes wrap the same conductor contract: a push driver that
//! forwards each event to an observer as soon as it is produced, and a
//! collecting driver that exhausts the sequence and returns the full ordered
//! list. Neither reorders events or buffers beyond the configured bound.

use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use uuid::Uuid;

use reelsmith_types::{EventStatus, RunEvent};

use crate::conductor::RunStream;

/// Default bounded lookahead for the push driver.
pub const DEFAULT_PUSH_CAPACITY: usize = 8;

/// The full result of an unattended run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// True when the terminal event is `success`.
    pub ok: bool,
    pub run_id: Uuid,
    /// Every event the run produced, in emission order.
    pub events: Vec<RunEvent>,
}

impl RunReport {
    /// The terminal event, if the run produced any events at all.
    pub fn terminal(&self) -> Option<&RunEvent> {
        self.events.last()
    }
}

/// Collecting driver: exhaust the run's event sequence and return the report.
///
/// Used for unattended (cron-style) execution where no live observer exists.
pub async fn collect_run(run_id: Uuid, stream: RunStream) -> RunReport {
    let events: Vec<RunEvent> = stream.collect().await;
    let ok = events
        .last()
        .map(|e| e.status == EventStatus::Success)
        .unwrap_or(false);
    RunReport { ok, run_id, events }
}

/// Push driver: forward events through a bounded channel as they are
/// produced.
///
/// Dropping the returned receiver cancels the run at the next stage boundary:
/// the forwarding task's send fails, the task stops polling, and the
/// conductor stream is dropped without producing further events.
pub fn push_run(stream: RunStream, capacity: usize) -> ReceiverStream<RunEvent> {
    let (tx, rx) = mpsc::channel(capacity.max(1));

    tokio::spawn(async move {
        let mut stream = std::pin::pin!(stream);
        while let Some(event) = stream.next().await {
            if tx.send(event).await.is_err() {
                tracing::debug!("run observer went away, stopping event forwarding");
                break;
            }
        }
    });

    ReceiverStream::new(rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream_of(events: Vec<RunEvent>) -> RunStream {
        Box::pin(futures::stream::iter(events))
    }

    #[tokio::test]
    async fn test_collect_ok_on_success_terminal() {
        let run_id = Uuid::new_v4();
        let report = collect_run(
            run_id,
            stream_of(vec![
                RunEvent::info("Generating script"),
                RunEvent::success("Run complete"),
            ]),
        )
        .await;

        assert!(report.ok);
        assert_eq!(report.run_id, run_id);
        assert_eq!(report.events.len(), 2);
        assert_eq!(report.terminal().unwrap().status, EventStatus::Success);
    }

    #[tokio::test]
    async fn test_collect_not_ok_on_error_terminal() {
        let report = collect_run(
            Uuid::new_v4(),
            stream_of(vec![
                RunEvent::info("Generating script"),
                RunEvent::error("Script stage failed"),
            ]),
        )
        .await;

        assert!(!report.ok);
    }

    #[tokio::test]
    async fn test_collect_empty_stream_is_not_ok() {
        let report = collect_run(Uuid::new_v4(), stream_of(vec![])).await;
        assert!(!report.ok);
        assert!(report.terminal().is_none());
    }

    #[tokio::test]
    async fn test_push_preserves_order() {
        use futures::StreamExt;

        let events = vec![
            RunEvent::info("a"),
            RunEvent::progress("b"),
            RunEvent::success("c"),
        ];
        let titles: Vec<String> = push_run(stream_of(events), DEFAULT_PUSH_CAPACITY)
            .map(|e| e.title)
            .collect()
            .await;

        assert_eq!(titles, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_push_stops_when_receiver_dropped() {
        use futures::StreamExt;

        // An endless source; forwarding must stop once the receiver is gone.
        let endless: RunStream =
            Box::pin(futures::stream::repeat_with(|| RunEvent::info("tick")));

        let mut rx = push_run(endless, 1);
        assert!(rx.next().await.is_some());
        drop(rx);

        // Give the forwarding task a chance to observe the closed channel.
        tokio::task::yield_now().await;
    }
}
