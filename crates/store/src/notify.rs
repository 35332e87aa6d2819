//! User-visible notification channel.
//!
//! Every failure a shopper should see leaves the store as a [`Notice`]
//! through the [`Notifier`] seam: fire-and-forget, one message per failure
//! kind. The consuming layer (UI, CLI) decides how to display it.

use std::fmt;

use tokio::sync::mpsc;

/// A user-visible message emitted by a cart operation.
///
/// The `Display` text is the user-facing contract: distinct per failure
/// kind, with a single out-of-stock message shared by add and update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// The requested quantity exceeds the catalog's available stock.
    OutOfStock,
    /// Adding a product failed for an unexpected reason.
    AddFailed,
    /// The product to remove was not in the cart, or removal failed.
    RemoveFailed,
    /// Updating a quantity failed (invalid target or unexpected error).
    UpdateFailed,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::OutOfStock => "Requested quantity is out of stock",
            Self::AddFailed => "Error adding product",
            Self::RemoveFailed => "Error removing product",
            Self::UpdateFailed => "Error updating product quantity",
        };
        f.write_str(message)
    }
}

/// Sink for user-visible notices.
///
/// Implementations must be fire-and-forget: `notify` cannot fail and must
/// not block the calling operation.
pub trait Notifier: Send + Sync {
    /// Deliver a notice to the user-visible channel.
    fn notify(&self, notice: Notice);
}

/// A [`Notifier`] that forwards notices over an unbounded channel.
///
/// The receiving half is handed to whatever renders notices (a UI task, a
/// test assertion). A dropped receiver is logged at debug level and
/// otherwise ignored.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: mpsc::UnboundedSender<Notice>,
}

impl ChannelNotifier {
    /// Create a notifier and the receiver that drains it.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notice: Notice) {
        if self.sender.send(notice).is_err() {
            tracing::debug!(%notice, "notice receiver dropped, discarding");
        }
    }
}
