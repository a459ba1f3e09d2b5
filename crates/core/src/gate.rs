#![forbid(unsafe_code)]

use crate::kind::RowKind;
use crate::row::Row;

/// Lock and ownership facts a mutation is evaluated against. Built by the
/// facade from the stored owner kind plus the external entry collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MutationContext {
    pub entry_locked: bool,
    pub template_context: bool,
}

impl MutationContext {
    pub fn template() -> Self {
        Self {
            entry_locked: false,
            template_context: true,
        }
    }

    pub fn entry(locked: bool) -> Self {
        Self {
            entry_locked: locked,
            template_context: false,
        }
    }
}

/// A row is deletable unless its document is locked and the row is not part
/// of a template definition. Templates stay editable regardless of lock
/// state, which is an entry-only concept.
pub fn row_deletable(ctx: MutationContext) -> bool {
    !(ctx.entry_locked && !ctx.template_context)
}

/// Distinct kinds that violate the certificate allow-list, in first-seen
/// order, so one message can name each offender once.
pub fn certificate_violations<I>(kinds: I) -> Vec<RowKind>
where
    I: IntoIterator<Item = RowKind>,
{
    let mut seen = Vec::new();
    for kind in kinds {
        if !kind.allowed_in_certificate() && !seen.contains(&kind) {
            seen.push(kind);
        }
    }
    seen
}

/// All-rows certificate validation for a document, one message naming every
/// offending kind. Empty when the document is valid.
pub fn certificate_errors(rows: &[Row]) -> Vec<String> {
    let violations = certificate_violations(rows.iter().map(Row::kind));
    if violations.is_empty() {
        return Vec::new();
    }
    let kinds = violations
        .iter()
        .map(|kind| kind.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    vec![format!("a certificate cannot contain rows of kind: {kinds}")]
}

pub const MANDATORY_ROW_MESSAGE: &str = "mandatory rows cannot be removed from the document";
pub const LOCKED_DOCUMENT_MESSAGE: &str = "the document is locked and its rows cannot be removed";
pub const BILLING_LINE_MESSAGE: &str =
    "rows tied to a closed billing line cannot be duplicated or moved";
pub const HARD_DELETE_CONTEXT_MESSAGE: &str =
    "permanent deletion is only available when editing a template";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locked_entries_protect_rows_templates_do_not() {
        assert!(!row_deletable(MutationContext::entry(true)));
        assert!(row_deletable(MutationContext::entry(false)));
        assert!(row_deletable(MutationContext::template()));
    }

    #[test]
    fn certificate_violations_are_distinct_and_ordered() {
        let kinds = vec![
            RowKind::Heading,
            RowKind::Drug,
            RowKind::Item,
            RowKind::Drug,
            RowKind::FreeText,
        ];
        assert_eq!(
            certificate_violations(kinds),
            vec![RowKind::Drug, RowKind::Item]
        );
    }
}
