//! Entry normalization — turns any stored record shape into a canonical `Entry`.
//!
//! Stored records carry a `schemaVersion` (absent ⇒ 0). Each legacy shape has
//! exactly one migration, and migrations run in a fixed chain starting at the
//! record's version. A final decode step coerces every field to a typed
//! default, so a partial record still yields a complete entry.
//!
//! | version | shape |
//! |---------|-------|
//! | 0 | skills under `byCategory` (`cloudDevOps`, `general`), or canonical keys mixed with it |
//! | 1 | canonical skills; rounds as `{name, focus, whyMatters}`, checklist `name`, plan under `plan` with `title`, score aliases |
//! | 2 | current |

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use crate::analysis::company_intel::CompanyIntel;
use crate::analysis::skills::{ExtractedSkills, SkillCategory, DEFAULT_OTHER_SKILLS};
use crate::models::entry::{
    ChecklistRound, Confidence, ConfidenceMap, Entry, PlanDay, RoundMapping, SCHEMA_VERSION,
};

type Record = Map<String, Value>;

/// Single-value `other` written by early versions instead of an empty list.
const LEGACY_OTHER_SENTINEL: &str = "General fresher stack";

const BASE_SCORE_ALIASES: &[&str] = &["baseScore", "baseReadinessScore", "readinessScore"];
const FINAL_SCORE_ALIASES: &[&str] = &["finalScore", "readinessScore"];

struct Migration {
    from: u32,
    name: &'static str,
    apply: fn(Record) -> Record,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        from: 0,
        name: "lift_legacy_skills",
        apply: lift_legacy_skills,
    },
    Migration {
        from: 1,
        name: "lift_legacy_layout",
        apply: lift_legacy_layout,
    },
];

/// Fresh entry id, `analysis_<uuid>`.
pub fn new_entry_id() -> String {
    format!("analysis_{}", Uuid::new_v4().simple())
}

pub fn timestamp_now() -> Value {
    Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Normalizes any stored record. `None` when the value is not an object or
/// has nothing to anchor on (no id, no skills, no checklist).
pub fn normalize_entry(raw: &Value) -> Option<Entry> {
    let record = raw.as_object()?;
    let anchored = ["id", "extractedSkills", "checklist"]
        .iter()
        .any(|key| record.get(*key).is_some_and(is_truthy));
    if !anchored {
        return None;
    }
    Some(decode(migrate(record.clone())))
}

/// Runs every migration at or above the record's version, then stamps the current version.
fn migrate(mut record: Record) -> Record {
    let version = record
        .get("schemaVersion")
        .and_then(Value::as_u64)
        .map_or(0, |v| v.min(u32::MAX as u64) as u32);

    for migration in MIGRATIONS.iter().filter(|m| m.from >= version) {
        debug!(migration = migration.name, from = migration.from, "Migrating entry");
        record = (migration.apply)(record);
    }
    record.insert("schemaVersion".to_string(), Value::from(SCHEMA_VERSION));
    record
}

// ────────────────────────────────────────────────────────────────────────────
// v0 → v1: skill buckets
// ────────────────────────────────────────────────────────────────────────────

fn lift_legacy_skills(mut record: Record) -> Record {
    let skills = lift_skills(record.get("extractedSkills").unwrap_or(&Value::Null));
    if let Ok(value) = serde_json::to_value(skills) {
        record.insert("extractedSkills".to_string(), value);
    }
    record
}

/// Canonical buckets from either skill shape, with the `other` fallback applied.
pub fn normalize_extracted_skills(raw: &Value) -> ExtractedSkills {
    lift_skills(raw).with_fallback()
}

fn lift_skills(raw: &Value) -> ExtractedSkills {
    let empty = Record::new();
    let obj = raw.as_object().unwrap_or(&empty);

    let is_current = SkillCategory::ALL
        .iter()
        .any(|c| obj.get(c.key()).is_some_and(Value::is_array));

    let mut skills = ExtractedSkills::default();
    if is_current {
        for category in SkillCategory::ALL {
            *skills.get_mut(category) =
                string_array(first_present(obj, &[category.key(), category.legacy_key()]));
        }
    } else {
        let source = obj
            .get("byCategory")
            .and_then(Value::as_object)
            .unwrap_or(obj);
        for category in SkillCategory::ALL {
            *skills.get_mut(category) =
                string_array(first_present(source, &[category.legacy_key(), category.key()]));
        }
    }

    if skills.other.len() == 1 && skills.other[0] == LEGACY_OTHER_SENTINEL {
        skills.other.clear();
    }
    // Legacy shapes always carried a populated `other`, even next to real tags.
    if !is_current && skills.other.is_empty() {
        skills.other = DEFAULT_OTHER_SKILLS.iter().map(|s| s.to_string()).collect();
    }
    skills
}

// ────────────────────────────────────────────────────────────────────────────
// v1 → v2: rounds, checklist, plan, score aliases
// ────────────────────────────────────────────────────────────────────────────

fn lift_legacy_layout(mut record: Record) -> Record {
    if let Some(Value::Array(rounds)) = record.get_mut("checklist") {
        for round in rounds.iter_mut().filter_map(Value::as_object_mut) {
            rename_if_absent(round, "name", "roundTitle");
        }
    }

    if first_present(&record, &["plan7Days"]).is_none() {
        if let Some(plan) = record.remove("plan") {
            record.insert("plan7Days".to_string(), plan);
        }
    } else {
        record.remove("plan");
    }
    if let Some(Value::Array(days)) = record.get_mut("plan7Days") {
        for day in days.iter_mut().filter_map(Value::as_object_mut) {
            rename_if_absent(day, "title", "focus");
        }
    }

    if first_present(&record, &["roundMapping"]).is_none() {
        let from_intel = record
            .get("companyIntel")
            .and_then(|intel| intel.get("roundMapping"))
            .cloned();
        if let Some(rounds) = from_intel {
            record.insert("roundMapping".to_string(), rounds);
        }
    }
    if let Some(rounds) = record.get_mut("roundMapping") {
        lift_round_mapping(rounds);
    }
    if let Some(rounds) = record
        .get_mut("companyIntel")
        .and_then(|intel| intel.get_mut("roundMapping"))
    {
        lift_round_mapping(rounds);
    }

    let base = first_present(&record, BASE_SCORE_ALIASES).cloned();
    let final_score = first_present(&record, FINAL_SCORE_ALIASES)
        .cloned()
        .or_else(|| base.clone());
    if let Some(base) = base {
        record.insert("baseScore".to_string(), base);
    }
    if let Some(final_score) = final_score {
        record.insert("finalScore".to_string(), final_score);
    }

    record
}

/// `{name, focus, whyMatters}` → `{roundTitle, focusAreas: [focus], whyItMatters}`.
fn lift_round_mapping(rounds: &mut Value) {
    let Value::Array(rounds) = rounds else {
        return;
    };
    for round in rounds.iter_mut().filter_map(Value::as_object_mut) {
        rename_if_absent(round, "name", "roundTitle");
        rename_if_absent(round, "whyMatters", "whyItMatters");
        if !round.get("focusAreas").is_some_and(Value::is_array) {
            let areas = match round.remove("focus") {
                Some(Value::String(focus)) if !focus.is_empty() => vec![Value::String(focus)],
                _ => Vec::new(),
            };
            round.insert("focusAreas".to_string(), Value::Array(areas));
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Decode
// ────────────────────────────────────────────────────────────────────────────

fn decode(record: Record) -> Entry {
    let extracted_skills =
        normalize_extracted_skills(record.get("extractedSkills").unwrap_or(&Value::Null));
    let tags_by_category = extracted_skills.tags_by_category();

    let created_at = timestamp(record.get("createdAt")).unwrap_or_else(Utc::now);
    let updated_at = timestamp(record.get("updatedAt")).unwrap_or(created_at);

    Entry {
        schema_version: SCHEMA_VERSION,
        id: entry_id(record.get("id")).unwrap_or_else(new_entry_id),
        created_at,
        updated_at,
        company: string_field(&record, "company"),
        role: string_field(&record, "role"),
        jd_text: string_field(&record, "jdText"),
        extracted_skills,
        tags_by_category,
        round_mapping: objects(record.get("roundMapping"))
            .map(|r| RoundMapping {
                round_title: string_field(r, "roundTitle"),
                focus_areas: string_array(r.get("focusAreas")),
                why_it_matters: string_field(r, "whyItMatters"),
            })
            .collect(),
        checklist: objects(record.get("checklist"))
            .map(|r| ChecklistRound {
                round_title: string_field(r, "roundTitle"),
                items: string_array(r.get("items")),
            })
            .collect(),
        plan7_days: objects(record.get("plan7Days"))
            .map(|d| PlanDay {
                day: d
                    .get("day")
                    .and_then(Value::as_u64)
                    .map_or(0, |n| n.min(u8::MAX as u64) as u8),
                focus: string_field(d, "focus"),
                tasks: string_array(d.get("tasks")),
            })
            .collect(),
        questions: string_array(record.get("questions")),
        base_score: score(record.get("baseScore")),
        final_score: score(record.get("finalScore")),
        skill_confidence_map: normalize_confidence_map(record.get("skillConfidenceMap")),
        company_intel: company_intel(record.get("companyIntel")),
    }
}

/// Base score for a raw record, honoring legacy aliases.
pub fn base_score_of(record: &Record) -> u8 {
    score(first_present(record, BASE_SCORE_ALIASES))
}

fn company_intel(value: Option<&Value>) -> Option<CompanyIntel> {
    let value = value.filter(|v| v.is_object())?;
    match serde_json::from_value(value.clone()) {
        Ok(intel) => Some(intel),
        Err(e) => {
            debug!("Dropping unreadable companyIntel: {e}");
            None
        }
    }
}

/// Known confidence values only; anything else is dropped.
pub fn normalize_confidence_map(value: Option<&Value>) -> ConfidenceMap {
    value
        .and_then(Value::as_object)
        .map(|map| {
            map.iter()
                .filter_map(|(skill, v)| {
                    v.as_str()
                        .and_then(Confidence::parse)
                        .map(|c| (skill.clone(), c))
                })
                .collect()
        })
        .unwrap_or_default()
}

// ────────────────────────────────────────────────────────────────────────────
// Default combinators
// ────────────────────────────────────────────────────────────────────────────

/// JavaScript-style truthiness of a stored value.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// First key whose value is present and not null.
fn first_present<'a>(record: &'a Record, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .find_map(|key| record.get(*key).filter(|v| !v.is_null()))
}

fn rename_if_absent(record: &mut Record, legacy: &str, canonical: &str) {
    if first_present(record, &[canonical]).is_some() {
        return;
    }
    if let Some(value) = record.remove(legacy) {
        record.insert(canonical.to_string(), value);
    }
}

/// String items of an array; anything else yields an empty list.
fn string_array(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

fn objects<'a>(value: Option<&'a Value>) -> impl Iterator<Item = &'a Record> + 'a {
    value
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

fn string_field(record: &Record, key: &str) -> String {
    record
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Stored id as a string. Non-empty strings and non-zero numbers count.
pub fn entry_id(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64().is_some_and(|f| f != 0.0) => Some(n.to_string()),
        _ => None,
    }
}

fn timestamp(value: Option<&Value>) -> Option<DateTime<Utc>> {
    let raw = value?.as_str()?;
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Numbers or numeric strings, rounded and clamped to 0..=100; anything else is 0.
fn score(value: Option<&Value>) -> u8 {
    let number = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number
        .filter(|n| n.is_finite())
        .map_or(0, |n| n.round().clamp(0.0, 100.0) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_non_objects_are_unrecoverable() {
        assert!(normalize_entry(&Value::Null).is_none());
        assert!(normalize_entry(&json!("entry")).is_none());
        assert!(normalize_entry(&json!([1, 2])).is_none());
    }

    #[test]
    fn test_empty_object_is_unrecoverable() {
        assert!(normalize_entry(&json!({})).is_none());
        assert!(normalize_entry(&json!({"id": ""})).is_none());
    }

    #[test]
    fn test_id_only_yields_full_entry() {
        let entry = normalize_entry(&json!({"id": "x"})).unwrap();
        assert_eq!(entry.id, "x");
        assert!(entry.checklist.is_empty());
        assert!(entry.plan7_days.is_empty());
        assert!(entry.round_mapping.is_empty());
        assert!(entry.questions.is_empty());
        assert_eq!(entry.base_score, 0);
        assert_eq!(entry.final_score, 0);
        assert!(entry.company_intel.is_none());
        assert_eq!(entry.extracted_skills.other, DEFAULT_OTHER_SKILLS.to_vec());
        assert_eq!(entry.schema_version, SCHEMA_VERSION);
        assert_eq!(entry.updated_at, entry.created_at);
    }

    #[test]
    fn test_checklist_anchor_without_id_gets_fresh_id() {
        let entry = normalize_entry(&json!({"checklist": []})).unwrap();
        assert!(entry.id.starts_with("analysis_"));
    }

    #[test]
    fn test_legacy_by_category_skills() {
        let raw = json!({
            "id": "old",
            "extractedSkills": {
                "byCategory": {
                    "languages": ["Java"],
                    "cloudDevOps": ["AWS", "Docker"]
                },
                "categoriesPresent": ["languages", "cloudDevOps"]
            }
        });
        let entry = normalize_entry(&raw).unwrap();
        assert_eq!(entry.extracted_skills.languages, vec!["Java".to_string()]);
        assert_eq!(
            entry.extracted_skills.cloud,
            vec!["AWS".to_string(), "Docker".to_string()]
        );
        assert_eq!(entry.extracted_skills.other, DEFAULT_OTHER_SKILLS.to_vec());
        let labels: Vec<&str> = entry.tags_by_category.keys().map(|k| k.as_str()).collect();
        assert_eq!(labels, vec!["Languages", "Cloud/DevOps", "Other"]);
    }

    #[test]
    fn test_legacy_skills_lifted_once_keep_fallback() {
        let raw = json!({
            "id": "old",
            "extractedSkills": {"byCategory": {"languages": ["Java"], "cloudDevOps": ["AWS"]}}
        });
        let once = normalize_entry(&raw).unwrap();
        assert_eq!(once.extracted_skills.other, DEFAULT_OTHER_SKILLS.to_vec());
        let twice = normalize_entry(&serde_json::to_value(&once).unwrap()).unwrap();
        assert_eq!(twice.extracted_skills, once.extracted_skills);
        assert_eq!(
            normalize_extracted_skills(&raw["extractedSkills"]),
            once.extracted_skills
        );
    }

    #[test]
    fn test_current_format_with_tags_keeps_other_empty() {
        let raw = json!({"id": "new", "extractedSkills": {"languages": ["Java"], "other": []}});
        let entry = normalize_entry(&raw).unwrap();
        assert!(entry.extracted_skills.other.is_empty());
    }

    #[test]
    fn test_legacy_general_sentinel_replaced_by_fallback() {
        let raw = json!({
            "id": "old",
            "extractedSkills": {"byCategory": {"general": ["General fresher stack"]}}
        });
        let entry = normalize_entry(&raw).unwrap();
        assert_eq!(entry.extracted_skills.other, DEFAULT_OTHER_SKILLS.to_vec());
        assert_eq!(entry.tags_by_category["Other"].len(), 4);
    }

    #[test]
    fn test_legacy_general_list_kept() {
        let raw = json!({
            "id": "old",
            "extractedSkills": {"general": ["Teamwork"]}
        });
        let entry = normalize_entry(&raw).unwrap();
        assert_eq!(entry.extracted_skills.other, vec!["Teamwork".to_string()]);
    }

    #[test]
    fn test_new_format_accepts_cloud_devops_alias() {
        let raw = json!({
            "id": "mixed",
            "extractedSkills": {"web": ["React"], "cloudDevOps": ["K8s"]}
        });
        let entry = normalize_entry(&raw).unwrap();
        assert_eq!(entry.extracted_skills.cloud, vec!["K8s".to_string()]);
        assert!(entry.extracted_skills.other.is_empty());
    }

    #[test]
    fn test_tags_by_category_never_trusted_from_input() {
        let raw = json!({
            "id": "t",
            "extractedSkills": {"data": ["SQL"]},
            "tagsByCategory": {"Bogus": ["Nope"]}
        });
        let entry = normalize_entry(&raw).unwrap();
        assert_eq!(entry.tags_by_category.len(), 1);
        assert_eq!(entry.tags_by_category["Data"], vec!["SQL".to_string()]);
    }

    #[test]
    fn test_non_string_tags_dropped() {
        let raw = json!({"id": "t", "extractedSkills": {"web": ["React", 7, null]}});
        let entry = normalize_entry(&raw).unwrap();
        assert_eq!(entry.extracted_skills.web, vec!["React".to_string()]);
    }

    #[test]
    fn test_legacy_round_mapping_scalar_focus() {
        let raw = json!({
            "id": "r",
            "roundMapping": [
                {"name": "Round 1: Online Test", "focus": "DSA + Aptitude", "whyMatters": "Filters."},
                {"name": "Round 2", "focus": ""}
            ]
        });
        let entry = normalize_entry(&raw).unwrap();
        assert_eq!(entry.round_mapping[0].round_title, "Round 1: Online Test");
        assert_eq!(
            entry.round_mapping[0].focus_areas,
            vec!["DSA + Aptitude".to_string()]
        );
        assert_eq!(entry.round_mapping[0].why_it_matters, "Filters.");
        assert!(entry.round_mapping[1].focus_areas.is_empty());
    }

    #[test]
    fn test_round_mapping_falls_back_to_company_intel() {
        let raw = json!({
            "id": "r",
            "companyIntel": {
                "company": "Swiggy",
                "industry": "E-commerce",
                "size": "mid-size",
                "roundMapping": [{"name": "Round 1: Online Assessment", "focus": "Coding + Aptitude", "whyMatters": "w"}]
            }
        });
        let entry = normalize_entry(&raw).unwrap();
        assert_eq!(entry.round_mapping.len(), 1);
        let intel = entry.company_intel.unwrap();
        assert_eq!(intel.round_mapping[0].round_title, "Round 1: Online Assessment");
        assert_eq!(intel.round_mapping[0].focus_areas, vec!["Coding + Aptitude".to_string()]);
    }

    #[test]
    fn test_unreadable_company_intel_becomes_none() {
        let raw = json!({"id": "r", "companyIntel": {"size": "galactic"}});
        assert!(normalize_entry(&raw).unwrap().company_intel.is_none());
    }

    #[test]
    fn test_legacy_checklist_and_plan_names() {
        let raw = json!({
            "id": "p",
            "checklist": [{"name": "Round 1", "items": ["a", "b"]}, "garbage"],
            "plan": [{"day": 1, "title": "Day 1: Basics", "tasks": ["t"]}]
        });
        let entry = normalize_entry(&raw).unwrap();
        assert_eq!(entry.checklist.len(), 1);
        assert_eq!(entry.checklist[0].round_title, "Round 1");
        assert_eq!(entry.checklist[0].items.len(), 2);
        assert_eq!(entry.plan7_days[0].focus, "Day 1: Basics");
        assert_eq!(entry.plan7_days[0].day, 1);
    }

    #[test]
    fn test_plan7days_preferred_over_legacy_plan() {
        let raw = json!({
            "id": "p",
            "plan": [{"day": 1, "title": "old", "tasks": []}],
            "plan7Days": [{"day": 1, "focus": "new", "tasks": []}]
        });
        let entry = normalize_entry(&raw).unwrap();
        assert_eq!(entry.plan7_days[0].focus, "new");
    }

    #[test]
    fn test_score_aliases() {
        let entry = normalize_entry(&json!({"id": "s", "readinessScore": 72})).unwrap();
        assert_eq!(entry.base_score, 72);
        assert_eq!(entry.final_score, 72);

        let entry =
            normalize_entry(&json!({"id": "s", "baseReadinessScore": "61", "finalScore": 58}))
                .unwrap();
        assert_eq!(entry.base_score, 61);
        assert_eq!(entry.final_score, 58);
    }

    #[test]
    fn test_bad_scores_default_to_zero() {
        let entry = normalize_entry(&json!({"id": "s", "baseScore": "abc"})).unwrap();
        assert_eq!(entry.base_score, 0);
        assert_eq!(entry.final_score, 0);
    }

    #[test]
    fn test_confidence_map_keeps_known_values_only() {
        let raw = json!({
            "id": "c",
            "skillConfidenceMap": {"Java": "know", "SQL": "practice", "AWS": "unsure"}
        });
        let entry = normalize_entry(&raw).unwrap();
        assert_eq!(entry.skill_confidence_map.len(), 2);
        assert_eq!(entry.skill_confidence_map["Java"], Confidence::Know);
    }

    #[test]
    fn test_timestamps_parsed_and_defaulted() {
        let raw = json!({"id": "t", "createdAt": "2024-01-01T00:00:00.000Z", "updatedAt": "not a date"});
        let entry = normalize_entry(&raw).unwrap();
        assert_eq!(entry.created_at.to_rfc3339(), "2024-01-01T00:00:00+00:00");
        assert_eq!(entry.updated_at, entry.created_at);
    }

    #[test]
    fn test_current_version_skips_migrations() {
        // A v2 record with a stray legacy `plan` is not re-lifted.
        let raw = json!({
            "schemaVersion": 2,
            "id": "v2",
            "plan": [{"day": 1, "title": "old", "tasks": []}]
        });
        let entry = normalize_entry(&raw).unwrap();
        assert!(entry.plan7_days.is_empty());
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let raw = json!({
            "id": "i",
            "createdAt": "2024-05-01T10:00:00.000Z",
            "extractedSkills": {"byCategory": {"web": ["React"]}},
            "plan": [{"day": 1, "title": "Day 1", "tasks": ["t"]}],
            "readinessScore": 55
        });
        let once = normalize_entry(&raw).unwrap();
        let twice = normalize_entry(&serde_json::to_value(&once).unwrap()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_base_score_of_uses_aliases() {
        let record = json!({"readinessScore": 44});
        assert_eq!(base_score_of(record.as_object().unwrap()), 44);
    }
}
