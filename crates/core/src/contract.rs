#![forbid(unsafe_code)]

//! Contracts to the external collaborators this engine consults but never
//! implements: the clinical entry owning a form, and the billing subsystem.

use crate::ids::BillingLineId;

/// Lock facts about the entry that owns a form. Lock state is an
/// entry-only concept; template-owned forms use [`UnlockedEntry`].
pub trait EntryState {
    fn is_locked(&self) -> bool;
}

/// Editability of external billing lines referenced by rows.
pub trait BillingLines {
    fn is_editable(&self, line: BillingLineId) -> bool;
}

/// Entry state for contexts that have no entry at all (templates,
/// excerpt projections).
#[derive(Clone, Copy, Debug, Default)]
pub struct UnlockedEntry;

impl EntryState for UnlockedEntry {
    fn is_locked(&self) -> bool {
        false
    }
}

/// Billing collaborator for documents with no billing linkage; every line
/// is reported editable.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoBilling;

impl BillingLines for NoBilling {
    fn is_editable(&self, _line: BillingLineId) -> bool {
        true
    }
}
