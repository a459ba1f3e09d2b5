#![forbid(unsafe_code)]

use jf_core::{
    BillingLineId, RowPayload, TemplateCategory, TemplateKind, TemplateStatus, UserId,
};

/// A row to be created. Kind is implied by the payload variant.
#[derive(Clone, Debug, PartialEq)]
pub struct NewRowSpec {
    pub payload: RowPayload,
    pub mandatory: bool,
    pub responsible: Option<UserId>,
    pub billing_line: Option<BillingLineId>,
}

impl NewRowSpec {
    pub fn from_payload(payload: RowPayload) -> Self {
        Self {
            payload,
            mandatory: false,
            responsible: None,
            billing_line: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct InsertRowsRequest {
    pub rows: Vec<NewRowSpec>,
    /// Clamped to `[1, row_count + 1]`.
    pub position: i64,
}

/// Field updates for a live row. There is deliberately no position field;
/// reordering goes through the move operation only.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpdateRowRequest {
    pub payload: Option<RowPayload>,
    pub mandatory: Option<bool>,
    pub responsible: Option<Option<UserId>>,
    pub billing_line: Option<Option<BillingLineId>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CreateTemplateRequest {
    pub name: String,
    pub kind: TemplateKind,
    pub category: TemplateCategory,
    pub description: Option<String>,
    pub document_header: Option<String>,
    pub owner: Option<UserId>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpdateTemplateRequest {
    pub name: Option<String>,
    pub category: Option<TemplateCategory>,
    pub description: Option<Option<String>>,
    pub document_header: Option<Option<String>>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListTemplatesRequest {
    pub status: Option<TemplateStatus>,
    pub kind: Option<TemplateKind>,
    pub insertable_only: bool,
}
