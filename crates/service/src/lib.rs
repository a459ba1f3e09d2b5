#![forbid(unsafe_code)]

mod documents;
mod outcome;
mod render;
mod rows;
mod templates;

pub use documents::TemplateInsertion;
pub use outcome::{Outcome, ServiceResult};
pub use render::RenderRow;
pub use rows::CreateRowRequest;
pub use templates::{PublishReport, RefreshFailure};

use jf_core::{BillingLines, EntryState, MutationContext, Row};
use jf_storage::{SqliteStore, StoreError};

/// Single entry point for every form mutation and read. Each operation
/// resolves identifiers, consults the mutation gate and delegates to the
/// store; expected domain conditions come back as [`Outcome::Invalid`],
/// never as errors.
pub struct FormService<'a> {
    store: &'a mut SqliteStore,
    billing: &'a dyn BillingLines,
}

impl<'a> FormService<'a> {
    pub fn new(store: &'a mut SqliteStore, billing: &'a dyn BillingLines) -> Self {
        Self { store, billing }
    }

    fn mutation_context(
        &self,
        form: jf_core::FormId,
        entry: &dyn EntryState,
    ) -> Result<MutationContext, StoreError> {
        let owner = self.store.form_owner(form)?;
        Ok(if owner.is_template() {
            MutationContext::template()
        } else {
            MutationContext::entry(entry.is_locked())
        })
    }

    /// Billing gate for billing-locked row kinds: refused once the linked
    /// billing line is no longer editable.
    fn billing_allows(&self, row: &Row) -> bool {
        if !row.kind().billing_locked() {
            return true;
        }
        match row.billing_line {
            Some(line) => self.billing.is_editable(line),
            None => true,
        }
    }
}
