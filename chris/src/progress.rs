//! Progress reporting from the apply worker
//!
//! Percentages follow a fixed layout: assembly uses 0–80, finalizing the
//! payload reports 90 and everything from 92 up belongs to the transport.

use tokio::sync::mpsc;
use tracing::trace;

/// Upper end of the per-tweak build range
pub const BUILD_END: u8 = 80;
/// Reported once the payload is assembled
pub const FINALIZE: u8 = 90;
/// First value the transport phase reports
pub const TRANSPORT_START: u8 = 92;
pub const DONE: u8 = 100;

/// One progress update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub percent: u8,
    pub message: String,
}

/// Sending half of a progress channel
///
/// Updates arrive in the order they were reported. A reporter with no
/// receiver, or whose receiver was dropped, discards updates.
#[derive(Debug, Clone, Default)]
pub struct ProgressReporter {
    sender: Option<mpsc::UnboundedSender<Progress>>,
}

impl ProgressReporter {
    /// Creates a reporter and the receiver that drains it
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Progress>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            Self {
                sender: Some(sender),
            },
            receiver,
        )
    }

    /// A reporter that goes nowhere
    pub fn silent() -> Self {
        Self::default()
    }

    pub fn report(&self, percent: u8, message: impl Into<String>) {
        let message = message.into();
        trace!("Progress {percent}%: {message}");
        if let Some(sender) = &self.sender {
            // Receiver gone means nobody is watching anymore
            let _ = sender.send(Progress {
                percent: percent.min(DONE),
                message,
            });
        }
    }
}

/// Percentage for the `done`th of `total` build steps
pub fn build_percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return BUILD_END;
    }
    (done.min(total) * BUILD_END as usize / total) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_percent_stays_in_range() {
        assert_eq!(build_percent(0, 4), 0);
        assert_eq!(build_percent(1, 4), 20);
        assert_eq!(build_percent(4, 4), BUILD_END);
        assert_eq!(build_percent(9, 4), BUILD_END);
        assert_eq!(build_percent(0, 0), BUILD_END);
    }

    #[tokio::test]
    async fn updates_arrive_in_order() {
        let (reporter, mut rx) = ProgressReporter::channel();
        reporter.report(10, "a");
        reporter.report(20, "b");
        drop(reporter);

        assert_eq!(rx.recv().await.map(|p| p.percent), Some(10));
        assert_eq!(rx.recv().await.map(|p| p.message), Some("b".to_string()));
        assert!(rx.recv().await.is_none());
    }

    #[test]
    fn silent_reporter_discards() {
        ProgressReporter::silent().report(50, "nobody listens");
    }
}
