use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::company_intel::CompanyIntel;
use crate::analysis::skills::{ExtractedSkills, TagsByCategory};

/// Current persisted schema revision. Records without the field are revision 0.
pub const SCHEMA_VERSION: u32 = 2;

/// Self-assessed confidence for one skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Know,
    Practice,
}

impl Confidence {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "know" => Some(Confidence::Know),
            "practice" => Some(Confidence::Practice),
            _ => None,
        }
    }
}

pub type ConfidenceMap = BTreeMap<String, Confidence>;

/// One expected interview round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundMapping {
    pub round_title: String,
    pub focus_areas: Vec<String>,
    pub why_it_matters: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistRound {
    pub round_title: String,
    /// At most 8 items.
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanDay {
    pub day: u8,
    pub focus: String,
    pub tasks: Vec<String>,
}

/// Canonical persisted history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub schema_version: u32,
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub company: String,
    pub role: String,
    pub jd_text: String,
    pub extracted_skills: ExtractedSkills,
    /// Rebuilt from `extracted_skills` on every read.
    pub tags_by_category: TagsByCategory,
    pub round_mapping: Vec<RoundMapping>,
    pub checklist: Vec<ChecklistRound>,
    #[serde(rename = "plan7Days")]
    pub plan7_days: Vec<PlanDay>,
    pub questions: Vec<String>,
    /// Set once at creation.
    pub base_score: u8,
    pub final_score: u8,
    pub skill_confidence_map: ConfidenceMap,
    pub company_intel: Option<CompanyIntel>,
}

/// Fields an update may carry. Absent fields leave the stored record untouched.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skill_confidence_map: Option<ConfidenceMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_intel: Option<CompanyIntel>,
}
