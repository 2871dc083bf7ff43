//! The boundary between the lobby and the transport.
//!
//! Skirmish never sends anything over the network itself. It hands
//! [`Order`]s to a [`CommandSink`] and moves on; the server's answer
//! arrives later as a new session snapshot.

use tokio::sync::mpsc;

use crate::Order;

/// Receives orders for delivery to the authoritative server.
///
/// Delivery is fire-and-forget: `send` must not block and has nothing to
/// report back. A sink that can't deliver drops the order; the next
/// snapshot shows the server never saw it.
///
/// # Example
///
/// ```rust
/// use skirmish_command::{Command, CommandSink, Order};
///
/// /// Prints orders instead of sending them.
/// struct StdoutSink;
///
/// impl CommandSink for StdoutSink {
///     fn send(&mut self, order: Order) {
///         if let Order::Command(cmd) = order {
///             println!("{}", cmd.encode());
///         }
///     }
/// }
///
/// StdoutSink.send(Command::Ready.into());
/// ```
pub trait CommandSink: Send + 'static {
    /// Hands one order to the transport.
    fn send(&mut self, order: Order);
}

/// Collects orders in memory. Handy when the caller drains them itself.
impl CommandSink for Vec<Order> {
    fn send(&mut self, order: Order) {
        self.push(order);
    }
}

/// Forwards orders to a transport task listening on the other end.
impl CommandSink for mpsc::UnboundedSender<Order> {
    fn send(&mut self, order: Order) {
        if let Err(mpsc::error::SendError(order)) = mpsc::UnboundedSender::send(self, order) {
            tracing::debug!(?order, "transport gone, dropping order");
        }
    }
}
