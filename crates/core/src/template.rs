#![forbid(unsafe_code)]

const MAX_NAME_LEN: usize = 64;
const MAX_HEADER_LEN: usize = 64;

/// Two-state publish lifecycle. Re-entering the current state is legal and
/// a no-op, so both transitions are total.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TemplateStatus {
    Edit,
    Public,
}

impl TemplateStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TemplateStatus::Edit => "edit",
            TemplateStatus::Public => "public",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "edit" => Some(TemplateStatus::Edit),
            "public" => Some(TemplateStatus::Public),
            _ => None,
        }
    }

    pub fn publish(self) -> Self {
        TemplateStatus::Public
    }

    pub fn begin_edit(self) -> Self {
        TemplateStatus::Edit
    }

    pub fn is_public(self) -> bool {
        self == TemplateStatus::Public
    }
}

/// Governs whether a template may be used as a top-level document, only
/// included inside another, or both.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TemplateCategory {
    Template,
    Partial,
    All,
}

impl TemplateCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            TemplateCategory::Template => "template",
            TemplateCategory::Partial => "partial",
            TemplateCategory::All => "all",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "template" => Some(TemplateCategory::Template),
            "partial" => Some(TemplateCategory::Partial),
            "all" => Some(TemplateCategory::All),
            _ => None,
        }
    }

    /// May this template be inserted into another document?
    pub fn insertable(self) -> bool {
        matches!(self, TemplateCategory::Partial | TemplateCategory::All)
    }

    /// May this template start a new top-level document?
    pub fn top_level(self) -> bool {
        matches!(self, TemplateCategory::Template | TemplateCategory::All)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TemplateKind {
    Journal,
    HerdJournal,
    CombinedJournal,
    Certificate,
    Quotation,
}

impl TemplateKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TemplateKind::Journal => "journal",
            TemplateKind::HerdJournal => "herd_journal",
            TemplateKind::CombinedJournal => "combined_journal",
            TemplateKind::Certificate => "certificate",
            TemplateKind::Quotation => "quotation",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "journal" => Some(TemplateKind::Journal),
            "herd_journal" => Some(TemplateKind::HerdJournal),
            "combined_journal" => Some(TemplateKind::CombinedJournal),
            "certificate" => Some(TemplateKind::Certificate),
            "quotation" => Some(TemplateKind::Quotation),
            _ => None,
        }
    }

    pub fn is_certificate(self) -> bool {
        self == TemplateKind::Certificate
    }
}

/// Field-level template validation. Returns every problem at once.
pub fn validate_template_fields(
    name: &str,
    kind: TemplateKind,
    document_header: Option<&str>,
) -> Vec<String> {
    let mut errors = Vec::new();
    if name.trim().is_empty() {
        errors.push("name must not be empty".to_string());
    }
    if name.len() > MAX_NAME_LEN {
        errors.push(format!("name must be at most {MAX_NAME_LEN} characters"));
    }
    if let Some(header) = document_header {
        if header.len() > MAX_HEADER_LEN {
            errors.push(format!(
                "document header must be at most {MAX_HEADER_LEN} characters"
            ));
        }
    }
    if kind.is_certificate() && document_header.is_none_or(|header| header.trim().is_empty()) {
        errors.push("certificates require a document header".to_string());
    }
    errors
}
