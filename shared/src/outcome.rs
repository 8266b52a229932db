//! Result of one sync attempt

/// Outcome reported to the scheduler and shown to the user
///
/// `perform_sync` never fails at the type level; every fault is folded into
/// an outcome with `ok = false` and a message from a small fixed set of
/// templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    pub ok: bool,
    pub message: String,
}

impl SyncOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}
