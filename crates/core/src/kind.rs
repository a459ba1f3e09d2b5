#![forbid(unsafe_code)]

/// Closed set of row kinds. The stored strings are stable and appear in
/// persisted rows; renaming a variant must not change its string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RowKind {
    Image,
    Item,
    Diagnosis,
    Document,
    MultiQuestion,
    FreeText,
    Question,
    InternalLabSample,
    MultiCheckbox,
    Drug,
    Include,
    MilkSampleDouble,
    MilkSample,
    MilkSampleSingle,
    LabSample,
    Prescription,
    Referral,
    Heading,
}

pub const ALL_KINDS: &[RowKind] = &[
    RowKind::Image,
    RowKind::Item,
    RowKind::Diagnosis,
    RowKind::Document,
    RowKind::MultiQuestion,
    RowKind::FreeText,
    RowKind::Question,
    RowKind::InternalLabSample,
    RowKind::MultiCheckbox,
    RowKind::Drug,
    RowKind::Include,
    RowKind::MilkSampleDouble,
    RowKind::MilkSample,
    RowKind::MilkSampleSingle,
    RowKind::LabSample,
    RowKind::Prescription,
    RowKind::Referral,
    RowKind::Heading,
];

/// Kinds a certificate document may contain.
pub const CERTIFICATE_KINDS: &[RowKind] = &[
    RowKind::Heading,
    RowKind::FreeText,
    RowKind::Question,
    RowKind::MultiQuestion,
    RowKind::Image,
    RowKind::MultiCheckbox,
];

impl RowKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RowKind::Image => "image",
            RowKind::Item => "item",
            RowKind::Diagnosis => "diagnosis",
            RowKind::Document => "document",
            RowKind::MultiQuestion => "multiquestion",
            RowKind::FreeText => "freetext",
            RowKind::Question => "question",
            RowKind::InternalLabSample => "internal_sample",
            RowKind::MultiCheckbox => "multicheckbox",
            RowKind::Drug => "drug",
            RowKind::Include => "include",
            RowKind::MilkSampleDouble => "milksample_double",
            RowKind::MilkSample => "milksample",
            RowKind::MilkSampleSingle => "milksample_single",
            RowKind::LabSample => "sample",
            RowKind::Prescription => "prescription",
            RowKind::Referral => "referral",
            RowKind::Heading => "heading",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        ALL_KINDS
            .iter()
            .copied()
            .find(|kind| kind.as_str() == value)
    }

    pub fn allowed_in_certificate(self) -> bool {
        CERTIFICATE_KINDS.contains(&self)
    }

    /// Kinds whose duplication and reordering are tied to the editability
    /// of their billing line.
    pub fn billing_locked(self) -> bool {
        matches!(self, RowKind::Item | RowKind::LabSample | RowKind::Drug)
    }

    /// Kinds that may carry a billing line at all.
    pub fn billable(self) -> bool {
        matches!(
            self,
            RowKind::Drug | RowKind::Item | RowKind::InternalLabSample | RowKind::LabSample
        )
    }

    /// Kinds a user may add ad hoc to a document, outside a template.
    pub fn custom_kinds(include_prescription: bool) -> Vec<RowKind> {
        ALL_KINDS
            .iter()
            .copied()
            .filter(|kind| {
                !matches!(
                    kind,
                    RowKind::Include
                        | RowKind::MultiQuestion
                        | RowKind::MultiCheckbox
                        | RowKind::Heading
                        | RowKind::Question
                        | RowKind::InternalLabSample
                ) && (include_prescription || *kind != RowKind::Prescription)
            })
            .collect()
    }
}
