//! Skill extraction — maps raw JD text onto the fixed skill catalogue.
//!
//! Matching is a case-insensitive literal substring test with no word-boundary
//! check, so short keywords ("Go", "OS") also hit inside longer tokens.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Placeholder skills used when nothing in the catalogue matched.
pub const DEFAULT_OTHER_SKILLS: [&str; 4] =
    ["Communication", "Problem solving", "Basic coding", "Projects"];

/// Display label → tags, in category order. Derived from `ExtractedSkills`.
pub type TagsByCategory = IndexMap<String, Vec<String>>;

/// One of the seven fixed skill buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillCategory {
    #[serde(rename = "coreCS")]
    CoreCs,
    #[serde(rename = "languages")]
    Languages,
    #[serde(rename = "web")]
    Web,
    #[serde(rename = "data")]
    Data,
    #[serde(rename = "cloud")]
    Cloud,
    #[serde(rename = "testing")]
    Testing,
    #[serde(rename = "other")]
    Other,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 7] = [
        SkillCategory::CoreCs,
        SkillCategory::Languages,
        SkillCategory::Web,
        SkillCategory::Data,
        SkillCategory::Cloud,
        SkillCategory::Testing,
        SkillCategory::Other,
    ];

    /// Canonical storage key.
    pub fn key(self) -> &'static str {
        match self {
            SkillCategory::CoreCs => "coreCS",
            SkillCategory::Languages => "languages",
            SkillCategory::Web => "web",
            SkillCategory::Data => "data",
            SkillCategory::Cloud => "cloud",
            SkillCategory::Testing => "testing",
            SkillCategory::Other => "other",
        }
    }

    /// Key used by records written before the canonical skill shape existed.
    pub fn legacy_key(self) -> &'static str {
        match self {
            SkillCategory::Cloud => "cloudDevOps",
            SkillCategory::Other => "general",
            other => other.key(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SkillCategory::CoreCs => "Core CS",
            SkillCategory::Languages => "Languages",
            SkillCategory::Web => "Web",
            SkillCategory::Data => "Data",
            SkillCategory::Cloud => "Cloud/DevOps",
            SkillCategory::Testing => "Testing",
            SkillCategory::Other => "Other",
        }
    }
}

/// Keyword catalogue for the six real categories, in scan order.
const CATALOGUE: &[(SkillCategory, &[&str])] = &[
    (
        SkillCategory::CoreCs,
        &[
            "DSA",
            "OOP",
            "DBMS",
            "OS",
            "Networks",
            "Data Structures",
            "Algorithms",
            "Operating System",
            "Computer Networks",
        ],
    ),
    (
        SkillCategory::Languages,
        &[
            "Java",
            "Python",
            "JavaScript",
            "TypeScript",
            "C++",
            "C#",
            "Go",
            "Golang",
            "C programming",
            "C/C++",
        ],
    ),
    (
        SkillCategory::Web,
        &[
            "React", "Next.js", "Node.js", "Express", "REST", "GraphQL", "Angular", "Vue", "HTML",
            "CSS",
        ],
    ),
    (
        SkillCategory::Data,
        &["SQL", "MongoDB", "PostgreSQL", "MySQL", "Redis", "NoSQL", "Database"],
    ),
    (
        SkillCategory::Cloud,
        &[
            "AWS",
            "Azure",
            "GCP",
            "Docker",
            "Kubernetes",
            "K8s",
            "CI/CD",
            "Linux",
            "DevOps",
            "Terraform",
        ],
    ),
    (
        SkillCategory::Testing,
        &[
            "Selenium",
            "Cypress",
            "Playwright",
            "JUnit",
            "PyTest",
            "Jest",
            "Testing",
            "Unit testing",
        ],
    ),
];

/// Canonical skill buckets. All seven keys are always present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedSkills {
    #[serde(rename = "coreCS", default)]
    pub core_cs: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub web: Vec<String>,
    #[serde(default)]
    pub data: Vec<String>,
    #[serde(default)]
    pub cloud: Vec<String>,
    #[serde(default)]
    pub testing: Vec<String>,
    #[serde(default)]
    pub other: Vec<String>,
}

impl ExtractedSkills {
    pub fn get(&self, category: SkillCategory) -> &[String] {
        match category {
            SkillCategory::CoreCs => &self.core_cs,
            SkillCategory::Languages => &self.languages,
            SkillCategory::Web => &self.web,
            SkillCategory::Data => &self.data,
            SkillCategory::Cloud => &self.cloud,
            SkillCategory::Testing => &self.testing,
            SkillCategory::Other => &self.other,
        }
    }

    pub fn get_mut(&mut self, category: SkillCategory) -> &mut Vec<String> {
        match category {
            SkillCategory::CoreCs => &mut self.core_cs,
            SkillCategory::Languages => &mut self.languages,
            SkillCategory::Web => &mut self.web,
            SkillCategory::Data => &mut self.data,
            SkillCategory::Cloud => &mut self.cloud,
            SkillCategory::Testing => &mut self.testing,
            SkillCategory::Other => &mut self.other,
        }
    }

    /// True when the category holds at least one tag.
    pub fn has(&self, category: SkillCategory) -> bool {
        !self.get(category).is_empty()
    }

    /// True when no bucket holds any tag.
    pub fn is_empty(&self) -> bool {
        SkillCategory::ALL.iter().all(|c| !self.has(*c))
    }

    /// Fills `other` with the placeholder set when every bucket is empty.
    pub fn with_fallback(mut self) -> Self {
        if self.is_empty() {
            self.other = DEFAULT_OTHER_SKILLS.iter().map(|s| s.to_string()).collect();
        }
        self
    }

    /// Rebuilds the display mapping, omitting empty categories.
    pub fn tags_by_category(&self) -> TagsByCategory {
        SkillCategory::ALL
            .iter()
            .filter(|c| self.has(**c))
            .map(|c| (c.label().to_string(), self.get(*c).to_vec()))
            .collect()
    }
}

/// Output of `extract_skills`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillExtraction {
    pub by_category: ExtractedSkills,
    /// Real categories with at least one match. Never contains `Other`.
    pub categories_present: Vec<SkillCategory>,
    pub tags_by_category: TagsByCategory,
}

/// Scans `text` against the catalogue. Pure and deterministic.
pub fn extract_skills(text: &str) -> SkillExtraction {
    let haystack = text.trim().to_lowercase();
    let mut by_category = ExtractedSkills::default();
    let mut categories_present = Vec::new();

    for (category, keywords) in CATALOGUE {
        let found = by_category.get_mut(*category);
        for keyword in keywords.iter() {
            if haystack.contains(&keyword.to_lowercase()) && !found.iter().any(|f| f == keyword) {
                found.push(keyword.to_string());
            }
        }
        if !found.is_empty() {
            categories_present.push(*category);
        }
    }

    let by_category = by_category.with_fallback();
    let tags_by_category = by_category.tags_by_category();

    SkillExtraction {
        by_category,
        categories_present,
        tags_by_category,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_falls_back_to_other() {
        let result = extract_skills("");
        assert!(result.categories_present.is_empty());
        assert_eq!(result.by_category.other, DEFAULT_OTHER_SKILLS.to_vec());
        assert_eq!(result.tags_by_category.len(), 1);
        assert!(result.tags_by_category.contains_key("Other"));
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let lower = extract_skills("react");
        let upper = extract_skills("REACT");
        assert_eq!(lower.by_category.web, vec!["React".to_string()]);
        assert_eq!(lower.by_category.web, upper.by_category.web);
    }

    #[test]
    fn test_substring_matches_inside_longer_tokens() {
        // "Go" hits inside "Google"; kept as-is.
        let result = extract_skills("Interview at Google");
        assert!(result.by_category.languages.contains(&"Go".to_string()));
    }

    #[test]
    fn test_found_keywords_follow_catalogue_order() {
        let result = extract_skills("MySQL and SQL, also Redis");
        assert_eq!(
            result.by_category.data,
            vec!["SQL".to_string(), "MySQL".to_string(), "Redis".to_string()]
        );
    }

    #[test]
    fn test_categories_present_excludes_fallback() {
        let result = extract_skills("Python, SQL, AWS, Docker");
        assert_eq!(
            result.categories_present,
            vec![
                SkillCategory::Languages,
                SkillCategory::Data,
                SkillCategory::Cloud
            ]
        );
        assert!(result.by_category.other.is_empty());
        assert!(!result.tags_by_category.contains_key("Other"));
    }

    #[test]
    fn test_tags_by_category_uses_labels_in_order() {
        let result = extract_skills("Docker, Java, DSA");
        let labels: Vec<&str> = result.tags_by_category.keys().map(|k| k.as_str()).collect();
        assert_eq!(labels, vec!["Core CS", "Languages", "Cloud/DevOps"]);
    }

    #[test]
    fn test_no_duplicate_keywords() {
        let result = extract_skills("Java java JAVA JavaScript");
        assert_eq!(
            result.by_category.languages,
            vec!["Java".to_string(), "JavaScript".to_string()]
        );
    }

    #[test]
    fn test_extracted_skills_serializes_canonical_keys() {
        let value = serde_json::to_value(ExtractedSkills::default()).unwrap();
        let obj = value.as_object().unwrap();
        for category in SkillCategory::ALL {
            assert!(obj[category.key()].is_array(), "missing {}", category.key());
        }
    }

    #[test]
    fn test_legacy_keys() {
        assert_eq!(SkillCategory::Cloud.legacy_key(), "cloudDevOps");
        assert_eq!(SkillCategory::Other.legacy_key(), "general");
        assert_eq!(SkillCategory::Web.legacy_key(), "web");
    }
}
