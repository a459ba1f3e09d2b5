#![forbid(unsafe_code)]

use crate::ids::TemplateId;
use crate::kind::RowKind;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ImagePayload {
    pub image_id: Option<i64>,
    pub sketch_id: Option<i64>,
    pub caption: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemPayload {
    pub item_id: Option<i64>,
    pub quantity: f64,
    /// Unit price in minor currency units.
    pub unit_price_minor: Option<i64>,
    pub description: Option<String>,
}

impl Default for ItemPayload {
    fn default() -> Self {
        Self {
            item_id: None,
            quantity: 1.0,
            unit_price_minor: None,
            description: None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisPayload {
    pub diagnosis_id: Option<i64>,
    pub topography_ids: Vec<i64>,
    pub preliminary: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentPayload {
    pub document_id: Option<i64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MultiQuestionPayload {
    pub question: String,
    pub alternatives: Vec<String>,
    pub selected: Option<usize>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FreeTextPayload {
    pub text: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionPayload {
    pub question: String,
    pub answer: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InternalLabSamplePayload {
    pub description: Option<String>,
    pub result: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MultiCheckboxPayload {
    pub question: String,
    pub alternatives: Vec<String>,
    pub selected: Vec<usize>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DrugPayload {
    pub name: Option<String>,
    pub quantity: f64,
    pub unit: Option<String>,
    pub batch: Option<String>,
    pub delivery: Option<String>,
}

impl Default for DrugPayload {
    fn default() -> Self {
        Self {
            name: None,
            quantity: 1.0,
            unit: None,
            batch: None,
            delivery: None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IncludePayload {
    /// Target template. An include row may exist before a target is chosen.
    pub template_id: Option<i64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MilkSampleDoublePayload {
    pub left: Option<String>,
    pub right: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MilkSamplePayload {
    pub front_left: Option<String>,
    pub front_right: Option<String>,
    pub rear_left: Option<String>,
    pub rear_right: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MilkSampleSinglePayload {
    pub value: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LabSamplePayload {
    pub lab_sample_id: Option<i64>,
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PrescriptionPayload {
    pub prescription_id: Option<i64>,
    pub placeholder_id: Option<i64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferralPayload {
    pub referral_id: Option<i64>,
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HeadingPayload {
    pub text: String,
}

/// Kind-specific row content. The discriminant is persisted separately as
/// the row's kind column; the payload serializes to the inner struct only.
#[derive(Clone, Debug, PartialEq)]
pub enum RowPayload {
    Image(ImagePayload),
    Item(ItemPayload),
    Diagnosis(DiagnosisPayload),
    Document(DocumentPayload),
    MultiQuestion(MultiQuestionPayload),
    FreeText(FreeTextPayload),
    Question(QuestionPayload),
    InternalLabSample(InternalLabSamplePayload),
    MultiCheckbox(MultiCheckboxPayload),
    Drug(DrugPayload),
    Include(IncludePayload),
    MilkSampleDouble(MilkSampleDoublePayload),
    MilkSample(MilkSamplePayload),
    MilkSampleSingle(MilkSampleSinglePayload),
    LabSample(LabSamplePayload),
    Prescription(PrescriptionPayload),
    Referral(ReferralPayload),
    Heading(HeadingPayload),
}

impl RowPayload {
    pub fn kind(&self) -> RowKind {
        match self {
            RowPayload::Image(_) => RowKind::Image,
            RowPayload::Item(_) => RowKind::Item,
            RowPayload::Diagnosis(_) => RowKind::Diagnosis,
            RowPayload::Document(_) => RowKind::Document,
            RowPayload::MultiQuestion(_) => RowKind::MultiQuestion,
            RowPayload::FreeText(_) => RowKind::FreeText,
            RowPayload::Question(_) => RowKind::Question,
            RowPayload::InternalLabSample(_) => RowKind::InternalLabSample,
            RowPayload::MultiCheckbox(_) => RowKind::MultiCheckbox,
            RowPayload::Drug(_) => RowKind::Drug,
            RowPayload::Include(_) => RowKind::Include,
            RowPayload::MilkSampleDouble(_) => RowKind::MilkSampleDouble,
            RowPayload::MilkSample(_) => RowKind::MilkSample,
            RowPayload::MilkSampleSingle(_) => RowKind::MilkSampleSingle,
            RowPayload::LabSample(_) => RowKind::LabSample,
            RowPayload::Prescription(_) => RowKind::Prescription,
            RowPayload::Referral(_) => RowKind::Referral,
            RowPayload::Heading(_) => RowKind::Heading,
        }
    }

    /// Default payload for a kind, used when building a fresh row.
    pub fn empty(kind: RowKind) -> Self {
        match kind {
            RowKind::Image => RowPayload::Image(ImagePayload::default()),
            RowKind::Item => RowPayload::Item(ItemPayload::default()),
            RowKind::Diagnosis => RowPayload::Diagnosis(DiagnosisPayload::default()),
            RowKind::Document => RowPayload::Document(DocumentPayload::default()),
            RowKind::MultiQuestion => RowPayload::MultiQuestion(MultiQuestionPayload::default()),
            RowKind::FreeText => RowPayload::FreeText(FreeTextPayload::default()),
            RowKind::Question => RowPayload::Question(QuestionPayload::default()),
            RowKind::InternalLabSample => {
                RowPayload::InternalLabSample(InternalLabSamplePayload::default())
            }
            RowKind::MultiCheckbox => RowPayload::MultiCheckbox(MultiCheckboxPayload::default()),
            RowKind::Drug => RowPayload::Drug(DrugPayload::default()),
            RowKind::Include => RowPayload::Include(IncludePayload::default()),
            RowKind::MilkSampleDouble => {
                RowPayload::MilkSampleDouble(MilkSampleDoublePayload::default())
            }
            RowKind::MilkSample => RowPayload::MilkSample(MilkSamplePayload::default()),
            RowKind::MilkSampleSingle => {
                RowPayload::MilkSampleSingle(MilkSampleSinglePayload::default())
            }
            RowKind::LabSample => RowPayload::LabSample(LabSamplePayload::default()),
            RowKind::Prescription => RowPayload::Prescription(PrescriptionPayload::default()),
            RowKind::Referral => RowPayload::Referral(ReferralPayload::default()),
            RowKind::Heading => RowPayload::Heading(HeadingPayload::default()),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        match self {
            RowPayload::Image(p) => serde_json::to_string(p),
            RowPayload::Item(p) => serde_json::to_string(p),
            RowPayload::Diagnosis(p) => serde_json::to_string(p),
            RowPayload::Document(p) => serde_json::to_string(p),
            RowPayload::MultiQuestion(p) => serde_json::to_string(p),
            RowPayload::FreeText(p) => serde_json::to_string(p),
            RowPayload::Question(p) => serde_json::to_string(p),
            RowPayload::InternalLabSample(p) => serde_json::to_string(p),
            RowPayload::MultiCheckbox(p) => serde_json::to_string(p),
            RowPayload::Drug(p) => serde_json::to_string(p),
            RowPayload::Include(p) => serde_json::to_string(p),
            RowPayload::MilkSampleDouble(p) => serde_json::to_string(p),
            RowPayload::MilkSample(p) => serde_json::to_string(p),
            RowPayload::MilkSampleSingle(p) => serde_json::to_string(p),
            RowPayload::LabSample(p) => serde_json::to_string(p),
            RowPayload::Prescription(p) => serde_json::to_string(p),
            RowPayload::Referral(p) => serde_json::to_string(p),
            RowPayload::Heading(p) => serde_json::to_string(p),
        }
    }

    pub fn from_json(kind: RowKind, json: &str) -> serde_json::Result<Self> {
        Ok(match kind {
            RowKind::Image => RowPayload::Image(serde_json::from_str(json)?),
            RowKind::Item => RowPayload::Item(serde_json::from_str(json)?),
            RowKind::Diagnosis => RowPayload::Diagnosis(serde_json::from_str(json)?),
            RowKind::Document => RowPayload::Document(serde_json::from_str(json)?),
            RowKind::MultiQuestion => RowPayload::MultiQuestion(serde_json::from_str(json)?),
            RowKind::FreeText => RowPayload::FreeText(serde_json::from_str(json)?),
            RowKind::Question => RowPayload::Question(serde_json::from_str(json)?),
            RowKind::InternalLabSample => {
                RowPayload::InternalLabSample(serde_json::from_str(json)?)
            }
            RowKind::MultiCheckbox => RowPayload::MultiCheckbox(serde_json::from_str(json)?),
            RowKind::Drug => RowPayload::Drug(serde_json::from_str(json)?),
            RowKind::Include => RowPayload::Include(serde_json::from_str(json)?),
            RowKind::MilkSampleDouble => RowPayload::MilkSampleDouble(serde_json::from_str(json)?),
            RowKind::MilkSample => RowPayload::MilkSample(serde_json::from_str(json)?),
            RowKind::MilkSampleSingle => RowPayload::MilkSampleSingle(serde_json::from_str(json)?),
            RowKind::LabSample => RowPayload::LabSample(serde_json::from_str(json)?),
            RowKind::Prescription => RowPayload::Prescription(serde_json::from_str(json)?),
            RowKind::Referral => RowPayload::Referral(serde_json::from_str(json)?),
            RowKind::Heading => RowPayload::Heading(serde_json::from_str(json)?),
        })
    }

    /// Include target, when this is an include row with a chosen template.
    pub fn include_target(&self) -> Option<TemplateId> {
        match self {
            RowPayload::Include(p) => p.template_id.map(TemplateId::new),
            _ => None,
        }
    }

    /// Clears references that must not survive cloning: lab sample,
    /// referral and prescription links belong to exactly one row.
    pub fn strip_cross_references(&mut self) {
        match self {
            RowPayload::LabSample(p) => p.lab_sample_id = None,
            RowPayload::Referral(p) => p.referral_id = None,
            RowPayload::Prescription(p) => {
                p.prescription_id = None;
                p.placeholder_id = None;
            }
            _ => {}
        }
    }

    /// True for freetext rows whose text is blank; such rows are hidden
    /// from rendered output.
    pub fn is_blank_freetext(&self) -> bool {
        match self {
            RowPayload::FreeText(p) => p.text.trim().is_empty(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::ALL_KINDS;

    #[test]
    fn empty_payload_matches_kind() {
        for kind in ALL_KINDS {
            assert_eq!(RowPayload::empty(*kind).kind(), *kind);
        }
    }

    #[test]
    fn json_round_trip_preserves_payload() {
        let payload = RowPayload::Diagnosis(DiagnosisPayload {
            diagnosis_id: Some(12),
            topography_ids: vec![3, 4],
            preliminary: true,
        });
        let json = payload.to_json().unwrap();
        let back = RowPayload::from_json(RowKind::Diagnosis, &json).unwrap();
        assert_eq!(back, payload);
    }

    #[test]
    fn strip_cross_references_clears_links() {
        let mut payload = RowPayload::LabSample(LabSamplePayload {
            lab_sample_id: Some(9),
            description: Some("serum".to_string()),
        });
        payload.strip_cross_references();
        match payload {
            RowPayload::LabSample(p) => {
                assert_eq!(p.lab_sample_id, None);
                assert_eq!(p.description.as_deref(), Some("serum"));
            }
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn blank_freetext_is_detected() {
        assert!(RowPayload::FreeText(FreeTextPayload { text: "  ".into() }).is_blank_freetext());
        assert!(
            !RowPayload::FreeText(FreeTextPayload {
                text: "note".into()
            })
            .is_blank_freetext()
        );
        assert!(!RowPayload::Heading(HeadingPayload { text: String::new() }).is_blank_freetext());
    }
}
