//! History store — canonical entries persisted as one JSON array under a single key.
//!
//! Failures at the key-value boundary are logged and degraded: reads fall back
//! to an empty list, writes report `None` / `false`. Nothing here panics or
//! propagates a storage error to the caller.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{info, warn};

use crate::analysis::orchestrator::{AnalysisRequest, AnalysisResult};
use crate::analysis::scoring::{all_skills, compute_final_score};
use crate::history::kv::{KvStore, StoreError};
use crate::history::schema::{
    base_score_of, entry_id, new_entry_id, normalize_confidence_map, normalize_entry,
    normalize_extracted_skills, timestamp_now,
};
use crate::models::entry::{Confidence, ConfidenceMap, Entry, EntryPatch, SCHEMA_VERSION};

type Record = Map<String, Value>;

pub const DEFAULT_HISTORY_KEY: &str = "placement_prep_history";

/// Result of a bulk read.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryListing {
    pub entries: Vec<Entry>,
    pub corrupted_count: usize,
}

/// Why an in-place modification did not land.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UpdateError {
    #[error("no entry with id '{0}'")]
    NotFound(String),

    #[error("history storage unavailable")]
    Unavailable,
}

pub struct HistoryStore {
    kv: Arc<dyn KvStore>,
    key: String,
    /// Serializes read-modify-write sequences within the process.
    write_lock: Mutex<()>,
}

impl HistoryStore {
    pub fn new(kv: Arc<dyn KvStore>, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Builds a canonical entry for the analysis, prepends it, and persists.
    /// Returns the new id, or `None` if the history could not be read or written.
    pub fn save(&self, request: &AnalysisRequest, analysis: &AnalysisResult) -> Option<String> {
        let entry = build_canonical_entry(request, analysis);
        let value = match serde_json::to_value(&entry) {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to serialize entry {}: {e}", entry.id);
                return None;
            }
        };

        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut records = match self.read_records() {
            Ok(records) => records,
            Err(e) => {
                warn!("Not saving analysis, history unreadable: {e}");
                return None;
            }
        };
        records.insert(0, value);

        if self.write_records(&records) {
            info!("Saved analysis {} ({} entries)", entry.id, records.len());
            Some(entry.id)
        } else {
            None
        }
    }

    pub fn get_by_id(&self, id: &str) -> Option<Entry> {
        self.read_records_or_empty()
            .iter()
            .find(|record| has_id(record, id))
            .and_then(normalize_entry)
    }

    pub fn get_latest(&self) -> Option<Entry> {
        self.read_records_or_empty()
            .first()
            .and_then(normalize_entry)
    }

    pub fn get_all(&self) -> Vec<Entry> {
        self.get_all_with_corruption_info().entries
    }

    /// Normalizes each stored record independently. Records that normalize to
    /// nothing are counted and skipped; the rest are still returned.
    pub fn get_all_with_corruption_info(&self) -> HistoryListing {
        let mut entries = Vec::new();
        let mut corrupted_count = 0;
        for record in &self.read_records_or_empty() {
            match normalize_entry(record) {
                Some(entry) => entries.push(entry),
                None => corrupted_count += 1,
            }
        }
        if corrupted_count > 0 {
            warn!("Skipped {corrupted_count} corrupted history entries");
        }
        HistoryListing {
            entries,
            corrupted_count,
        }
    }

    /// Shallow-merges `patch` into the stored record. A new confidence map
    /// recomputes `finalScore` from the record's base score and skill set.
    /// Returns `false` when the id is absent or the write fails.
    pub fn update(&self, id: &str, patch: &EntryPatch) -> bool {
        let fields = match serde_json::to_value(patch) {
            Ok(Value::Object(fields)) => fields,
            Ok(_) => return false,
            Err(e) => {
                warn!("Failed to serialize update for {id}: {e}");
                return false;
            }
        };

        self.modify(id, |record| {
            record.extend(fields);
            if let Some(confidence) = &patch.skill_confidence_map {
                set_final_score(record, confidence);
            }
        })
        .is_ok()
    }

    /// Sets one skill's confidence on top of whatever map is stored, inside a
    /// single locked read-modify-write, and recomputes `finalScore`.
    pub fn set_skill_confidence(
        &self,
        id: &str,
        skill: &str,
        confidence: Confidence,
    ) -> Result<(), UpdateError> {
        self.modify(id, |record| {
            let mut map = normalize_confidence_map(record.get("skillConfidenceMap"));
            map.insert(skill.to_string(), confidence);
            set_final_score(record, &map);
            if let Ok(value) = serde_json::to_value(&map) {
                record.insert("skillConfidenceMap".to_string(), value);
            }
        })
    }

    /// Locates the raw record for `id`, applies `change`, stamps `updatedAt`,
    /// and persists, all under the write lock.
    fn modify(&self, id: &str, change: impl FnOnce(&mut Record)) -> Result<(), UpdateError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut records = self.read_records().map_err(|e| {
            warn!("Not updating {id}, history unreadable: {e}");
            UpdateError::Unavailable
        })?;

        let record = records
            .iter_mut()
            .find(|record| has_id(record, id))
            .and_then(Value::as_object_mut)
            .ok_or_else(|| UpdateError::NotFound(id.to_string()))?;

        change(record);
        record.insert("updatedAt".to_string(), timestamp_now());

        if self.write_records(&records) {
            Ok(())
        } else {
            Err(UpdateError::Unavailable)
        }
    }

    fn read_records(&self) -> Result<Vec<Value>, StoreError> {
        let Some(raw) = self.kv.get(&self.key)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(records)) => Ok(records),
            Ok(_) => {
                warn!("History under '{}' is not a list; treating as empty", self.key);
                Ok(Vec::new())
            }
            Err(e) => {
                warn!("History under '{}' is not valid JSON ({e}); treating as empty", self.key);
                Ok(Vec::new())
            }
        }
    }

    fn read_records_or_empty(&self) -> Vec<Value> {
        self.read_records().unwrap_or_else(|e| {
            warn!("Failed to read history: {e}");
            Vec::new()
        })
    }

    fn write_records(&self, records: &[Value]) -> bool {
        let payload = match serde_json::to_string(records) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Failed to encode history: {e}");
                return false;
            }
        };
        match self.kv.set(&self.key, &payload) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to write history: {e}");
                false
            }
        }
    }
}

/// Matches ids the same way normalization reads them, so numeric legacy ids resolve.
fn has_id(record: &Value, id: &str) -> bool {
    entry_id(record.get("id")).is_some_and(|stored| stored == id)
}

fn set_final_score(record: &mut Record, confidence: &ConfidenceMap) {
    let skills =
        normalize_extracted_skills(record.get("extractedSkills").unwrap_or(&Value::Null));
    let all = all_skills(&skills.tags_by_category());
    let final_score = compute_final_score(base_score_of(record), confidence, &all);
    record.insert("finalScore".to_string(), Value::from(final_score));
}

fn build_canonical_entry(request: &AnalysisRequest, analysis: &AnalysisResult) -> Entry {
    let now = Utc::now();
    Entry {
        schema_version: SCHEMA_VERSION,
        id: new_entry_id(),
        created_at: now,
        updated_at: now,
        company: request.company.clone(),
        role: request.role.clone(),
        jd_text: request.jd_text.clone(),
        extracted_skills: analysis.extracted_skills.clone(),
        tags_by_category: analysis.extracted_skills.tags_by_category(),
        round_mapping: analysis.round_mapping.clone(),
        checklist: analysis.checklist.clone(),
        plan7_days: analysis.plan7_days.clone(),
        questions: analysis.questions.clone(),
        base_score: analysis.base_score,
        final_score: analysis.final_score,
        skill_confidence_map: ConfidenceMap::new(),
        company_intel: analysis.company_intel.clone(),
    }
}
