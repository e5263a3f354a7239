//! Downstream notifiers for committed allocations

use assay_domain::traits::AllocationNotifier;
use assay_domain::AllocationRecord;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Logs every committed allocation
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl AllocationNotifier for TracingNotifier {
    fn notify(&self, record: &AllocationRecord) {
        info!(
            allocation_id = %record.id,
            submission_id = %record.submission_id,
            contributor_id = %record.contributor_id,
            epoch = %record.epoch,
            metal = %record.metal,
            amount = record.amount,
            "Allocation committed"
        );
    }
}

/// Forwards committed allocations to an async consumer
///
/// # Examples
///
/// ```
/// use assay_allocator::ChannelNotifier;
///
/// let (notifier, mut receiver) = ChannelNotifier::new();
/// drop(notifier);
/// assert!(receiver.try_recv().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: mpsc::UnboundedSender<AllocationRecord>,
}

impl ChannelNotifier {
    /// Create a notifier and the receiving end of its channel
    pub fn new() -> (Self, mpsc::UnboundedReceiver<AllocationRecord>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    /// Wrap an existing sender
    pub fn from_sender(sender: mpsc::UnboundedSender<AllocationRecord>) -> Self {
        Self { sender }
    }
}

impl AllocationNotifier for ChannelNotifier {
    fn notify(&self, record: &AllocationRecord) {
        if self.sender.send(record.clone()).is_err() {
            warn!(
                submission_id = %record.submission_id,
                metal = %record.metal,
                "Allocation receiver dropped; event not delivered"
            );
        }
    }
}
