//! Lifecycle checks declared by external plugin adapters.

use borsh::{BorshDeserialize, BorshSerialize};

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookableLifecycleEvent {
    Create,
    Transfer,
    Burn,
    Update,
}

/// What an adapter may decide when consulted for an event.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExternalCheckResult {
    pub flags: u32,
}

impl ExternalCheckResult {
    pub const CAN_LISTEN: u32 = 1;
    pub const CAN_APPROVE: u32 = 1 << 1;
    pub const CAN_REJECT: u32 = 1 << 2;

    pub fn new(flags: u32) -> Self {
        Self { flags }
    }

    pub fn can_listen(&self) -> bool {
        self.flags & Self::CAN_LISTEN != 0
    }

    pub fn can_approve(&self) -> bool {
        self.flags & Self::CAN_APPROVE != 0
    }

    pub fn can_reject(&self) -> bool {
        self.flags & Self::CAN_REJECT != 0
    }
}

/// Ordered `(event, result)` pairs stored in an external registry record.
pub type LifecycleChecks = Vec<(HookableLifecycleEvent, ExternalCheckResult)>;

/// The check registered for `event`, if any.
pub fn check_for(
    checks: &[(HookableLifecycleEvent, ExternalCheckResult)],
    event: HookableLifecycleEvent,
) -> Option<ExternalCheckResult> {
    checks
        .iter()
        .find(|(e, _)| *e == event)
        .map(|(_, result)| *result)
}
