use strum_macros::{AsRefStr, Display, EnumString};

/// Lifecycle of a row in `queue_messages`. Acked messages are deleted, not marked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum MessageStatus {
    Ready,
    InFlight,
    Dead,
}

/// Where a negatively acknowledged message goes next.
pub fn status_after_nack(
    requeue: bool,
    attempts: u32,
    max_deliveries: Option<u32>,
) -> MessageStatus {
    if !requeue {
        return MessageStatus::Dead;
    }
    match max_deliveries {
        Some(max) if attempts >= max => MessageStatus::Dead,
        _ => MessageStatus::Ready,
    }
}

/// Value stored in `last_error` after a nack.
pub fn last_error_after_nack(status: MessageStatus, requeue: bool, reason: &str) -> String {
    match status {
        MessageStatus::Dead if requeue => format!("max_deliveries_exceeded: {reason}"),
        _ => reason.to_string(),
    }
}
