//! Order lifecycle state machine.
//!
//! Statuses split into two transition classes:
//!
//! 1. **Locked** — reachable only through the specific trigger that
//!    produces them, never by direct staff selection. A direct edit into
//!    a locked status is a silent no-op.
//! 2. **Editable** — staff may move an order freely between these
//!    (flat authorization), until a terminal status is reached.
//!
//! Triggers force their transition regardless of the current status, with
//! one guard: authorization is confirmed only on an order sitting in
//! `DocumentsPlaced`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// All statuses an order can occupy. Serialized names are the exact
/// wire strings and are case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Assigned at creation, before any quote document exists.
    Received,
    /// A quote document was generated and downloaded. Locked.
    QuoteDownloaded,
    /// A sender record has been linked.
    Pending,
    /// The document set was submitted. Locked.
    DocumentsPlaced,
    Verified,
    /// Review flow complete. Terminal.
    Authorized,
    /// Terminal.
    Rejected,
    /// Terminal.
    Completed,
    Blocked,
    RateExpired,
}

impl OrderStatus {
    /// Statuses rendered read-only once reached; the order leaves them
    /// only through another trigger.
    pub fn is_locked(&self) -> bool {
        matches!(self, Self::QuoteDownloaded | Self::DocumentsPlaced)
    }

    /// Statuses that can only ever be entered by a trigger, never chosen
    /// from the status dropdown.
    pub fn is_trigger_entered(&self) -> bool {
        self.is_locked() || matches!(self, Self::Authorized)
    }

    /// Returns `true` if no further staff edits are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Authorized | Self::Completed | Self::Rejected)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Received => "Received",
            Self::QuoteDownloaded => "QuoteDownloaded",
            Self::Pending => "Pending",
            Self::DocumentsPlaced => "DocumentsPlaced",
            Self::Verified => "Verified",
            Self::Authorized => "Authorized",
            Self::Rejected => "Rejected",
            Self::Completed => "Completed",
            Self::Blocked => "Blocked",
            Self::RateExpired => "RateExpired",
        };
        f.write_str(name)
    }
}

/// System actions that force a status transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTrigger {
    /// Quote document generated and downloaded.
    QuoteDownloaded,
    /// Sender record successfully linked.
    SenderLinked,
    /// Document set submitted.
    DocumentsSubmitted,
    /// Authorize action confirmed by staff.
    AuthorizeConfirmed,
    /// Rate-status popup resolved with the "Blocked" selection.
    RateBlocked,
}

/// Returned when a trigger cannot legally fire in the current status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionRefused {
    pub from: OrderStatus,
    pub trigger: StatusTrigger,
}

impl fmt::Display for TransitionRefused {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot apply {:?} from {}", self.trigger, self.from)
    }
}

/// Outcome of a direct staff status edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Applied(OrderStatus),
    /// The edit was rejected and the status stays as it was. Surfaced as
    /// an unavailable action, not an error.
    Unchanged,
}

/// Applies a trigger-forced transition.
///
/// Triggers override whatever status the order currently holds; only
/// authorization carries a guard.
pub fn apply_trigger(
    current: OrderStatus,
    trigger: StatusTrigger,
) -> Result<OrderStatus, TransitionRefused> {
    match trigger {
        StatusTrigger::QuoteDownloaded => Ok(OrderStatus::QuoteDownloaded),
        StatusTrigger::SenderLinked => Ok(OrderStatus::Pending),
        StatusTrigger::DocumentsSubmitted => Ok(OrderStatus::DocumentsPlaced),
        StatusTrigger::AuthorizeConfirmed => {
            if current == OrderStatus::DocumentsPlaced {
                Ok(OrderStatus::Authorized)
            } else {
                Err(TransitionRefused { from: current, trigger })
            }
        }
        StatusTrigger::RateBlocked => Ok(OrderStatus::Blocked),
    }
}

/// Applies a direct staff status selection.
///
/// Trigger-entered statuses cannot be chosen, orders sitting in a locked
/// status are read-only, and terminal orders accept no further edits; all
/// of these leave the status untouched.
pub fn set_directly(current: OrderStatus, requested: OrderStatus) -> EditOutcome {
    if current.is_terminal()
        || current.is_locked()
        || requested.is_trigger_entered()
        || requested == current
    {
        EditOutcome::Unchanged
    } else {
        EditOutcome::Applied(requested)
    }
}
