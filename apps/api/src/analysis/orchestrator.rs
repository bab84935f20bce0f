//! Runs the full analysis pipeline and mediates every mutation of a saved entry.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::analysis::checklist::build_checklist;
use crate::analysis::company_intel::{generate_company_intel, CompanyIntel};
use crate::analysis::plan::build_seven_day_plan;
use crate::analysis::questions::generate_questions;
use crate::analysis::scoring::{compute_readiness_score, ReadinessInput};
use crate::analysis::skills::{extract_skills, ExtractedSkills, SkillCategory, TagsByCategory};
use crate::history::store::{HistoryStore, UpdateError};
use crate::models::entry::{ChecklistRound, Confidence, Entry, EntryPatch, PlanDay, RoundMapping};

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisRequest {
    pub jd_text: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub role: String,
}

/// Everything derived from one JD. `final_score` starts equal to `base_score`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub extracted_skills: ExtractedSkills,
    pub categories_present: Vec<SkillCategory>,
    pub tags_by_category: TagsByCategory,
    pub round_mapping: Vec<RoundMapping>,
    pub checklist: Vec<ChecklistRound>,
    #[serde(rename = "plan7Days")]
    pub plan7_days: Vec<PlanDay>,
    pub questions: Vec<String>,
    pub base_score: u8,
    pub final_score: u8,
    pub company_intel: Option<CompanyIntel>,
}

pub fn run_analysis(request: &AnalysisRequest) -> AnalysisResult {
    let extraction = extract_skills(&request.jd_text);
    let skills = extraction.by_category;

    let base_score = compute_readiness_score(&ReadinessInput {
        jd_text: &request.jd_text,
        company: &request.company,
        role: &request.role,
        categories_present: &extraction.categories_present,
    });
    let company_intel = generate_company_intel(&request.company, &request.jd_text, &skills);
    let round_mapping = company_intel
        .as_ref()
        .map(|intel| intel.round_mapping.clone())
        .unwrap_or_default();

    debug!(
        "Analysis: {} categories, base score {base_score}",
        extraction.categories_present.len()
    );

    AnalysisResult {
        checklist: build_checklist(&skills),
        plan7_days: build_seven_day_plan(&skills),
        questions: generate_questions(&skills),
        extracted_skills: skills,
        categories_present: extraction.categories_present,
        tags_by_category: extraction.tags_by_category,
        round_mapping,
        base_score,
        final_score: base_score,
        company_intel,
    }
}

/// Runs the analysis and persists it. Returns the stored entry.
pub fn analyze_and_save(store: &HistoryStore, request: &AnalysisRequest) -> Option<Entry> {
    let analysis = run_analysis(request);
    let id = store.save(request, &analysis)?;
    info!("Analysis {id} saved (score {})", analysis.base_score);
    store.get_by_id(&id)
}

/// Loads an entry, generating and persisting company intel when the entry
/// names a company but was saved without it. A failed back-fill still
/// returns the entry with the generated intel attached.
pub fn ensure_company_intel(store: &HistoryStore, id: &str) -> Option<Entry> {
    let mut entry = store.get_by_id(id)?;
    if entry.company_intel.is_some() {
        return Some(entry);
    }
    let Some(intel) = generate_company_intel(&entry.company, &entry.jd_text, &entry.extracted_skills)
    else {
        return Some(entry);
    };

    let patch = EntryPatch {
        company_intel: Some(intel.clone()),
        ..Default::default()
    };
    if store.update(id, &patch) {
        info!("Back-filled company intel for {id}");
        return store.get_by_id(id);
    }
    entry.company_intel = Some(intel);
    Some(entry)
}

/// Sets one skill's confidence and returns the refreshed entry with its
/// recomputed final score.
pub fn set_skill_confidence(
    store: &HistoryStore,
    id: &str,
    skill: &str,
    confidence: Confidence,
) -> Result<Entry, UpdateError> {
    store.set_skill_confidence(id, skill, confidence)?;
    debug!("Skill '{skill}' on {id} set to {confidence:?}");
    store.get_by_id(id).ok_or(UpdateError::Unavailable)
}
