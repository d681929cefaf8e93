//! Readiness validation: may a parsed request be dispatched?

use std::fmt;

use crate::domain::{ActionKind, ActionRequest};

/// Why a request cannot be dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotReadyReason {
    /// No `-a` given
    NoActionSelected,
    /// The action needs at least one task and none were given
    MissingTaskSubset(ActionKind),
}

impl fmt::Display for NotReadyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotReadyReason::NoActionSelected => f.write_str("no action selected"),
            NotReadyReason::MissingTaskSubset(kind) => {
                write!(f, "action '{kind}' requires at least one task")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessVerdict {
    Ready(ActionKind),
    NotReady(NotReadyReason),
}

impl ReadinessVerdict {
    pub fn is_ready(&self) -> bool {
        matches!(self, ReadinessVerdict::Ready(_))
    }

    pub fn reason(&self) -> Option<NotReadyReason> {
        match self {
            ReadinessVerdict::Ready(_) => None,
            ReadinessVerdict::NotReady(reason) => Some(*reason),
        }
    }
}

/// Decide whether `request` can be dispatched.
///
/// The source override plays no part here: an action that requires tasks is
/// rejected without them even when a local dump directory was given.
pub fn check_readiness(request: &ActionRequest) -> ReadinessVerdict {
    let Some(kind) = request.action else {
        return ReadinessVerdict::NotReady(NotReadyReason::NoActionSelected);
    };

    if kind.spec().requires_tasks && request.tasks.is_empty() {
        return ReadinessVerdict::NotReady(NotReadyReason::MissingTaskSubset(kind));
    }

    ReadinessVerdict::Ready(kind)
}
