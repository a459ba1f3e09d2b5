#![forbid(unsafe_code)]

pub mod contract;
pub mod gate;
pub mod ids;
pub mod kind;
pub mod payload;
pub mod row;
pub mod template;

pub use contract::{BillingLines, EntryState, NoBilling, UnlockedEntry};
pub use gate::{MutationContext, certificate_violations, row_deletable};
pub use ids::{BillingLineId, FormId, RowId, TemplateId, UserId};
pub use kind::RowKind;
pub use payload::RowPayload;
pub use row::{Row, RowStatus};
pub use template::{TemplateCategory, TemplateKind, TemplateStatus, validate_template_fields};
