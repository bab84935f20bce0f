//! Readiness scoring: an immutable base score computed at analysis time and a
//! live final score driven by the skill confidence map.

use crate::analysis::skills::{SkillCategory, TagsByCategory};
use crate::models::entry::{Confidence, ConfidenceMap};

const BASE_SCORE: i32 = 35;
const POINTS_PER_CATEGORY: i32 = 5;
const MAX_CATEGORY_BONUS: i32 = 30;
const COMPANY_BONUS: i32 = 10;
const ROLE_BONUS: i32 = 10;
const LONG_JD_BONUS: i32 = 10;
const LONG_JD_CHARS: usize = 800;
const CONFIDENCE_STEP: i32 = 2;

/// Inputs to the base readiness score.
#[derive(Debug, Clone, Copy)]
pub struct ReadinessInput<'a> {
    pub jd_text: &'a str,
    pub company: &'a str,
    pub role: &'a str,
    pub categories_present: &'a [SkillCategory],
}

/// 35 + 5 per detected category (max 30) + 10 company + 10 role + 10 for a JD over 800 chars.
pub fn compute_readiness_score(input: &ReadinessInput<'_>) -> u8 {
    let category_bonus =
        (input.categories_present.len() as i32 * POINTS_PER_CATEGORY).min(MAX_CATEGORY_BONUS);

    let mut score = BASE_SCORE + category_bonus;
    if !input.company.trim().is_empty() {
        score += COMPANY_BONUS;
    }
    if !input.role.trim().is_empty() {
        score += ROLE_BONUS;
    }
    if input.jd_text.chars().count() > LONG_JD_CHARS {
        score += LONG_JD_BONUS;
    }
    clamp_score(score)
}

/// `base + 2·know − 2·practice`, clamped to 0..=100. Unmapped skills count as practice.
///
/// Pure in its three inputs, so recomputing with an unchanged map is a no-op.
pub fn compute_final_score(base_score: u8, confidence: &ConfidenceMap, all_skills: &[String]) -> u8 {
    if all_skills.is_empty() {
        return base_score;
    }
    let know_count = all_skills
        .iter()
        .filter(|s| confidence.get(s.as_str()) == Some(&Confidence::Know))
        .count() as i32;
    let practice_count = all_skills.len() as i32 - know_count;

    clamp_score(
        base_score as i32 + CONFIDENCE_STEP * know_count - CONFIDENCE_STEP * practice_count,
    )
}

/// Every tag across all categories, deduplicated in first-seen order.
pub fn all_skills(tags: &TagsByCategory) -> Vec<String> {
    let mut skills: Vec<String> = Vec::new();
    for tag in tags.values().flatten() {
        if !skills.contains(tag) {
            skills.push(tag.clone());
        }
    }
    skills
}

/// First `limit` skills not marked as known.
pub fn weak_skills(all_skills: &[String], confidence: &ConfidenceMap, limit: usize) -> Vec<String> {
    all_skills
        .iter()
        .filter(|s| confidence.get(s.as_str()) != Some(&Confidence::Know))
        .take(limit)
        .cloned()
        .collect()
}

fn clamp_score(score: i32) -> u8 {
    score.clamp(0, 100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn input<'a>(categories: &'a [SkillCategory]) -> ReadinessInput<'a> {
        ReadinessInput {
            jd_text: "",
            company: "",
            role: "",
            categories_present: categories,
        }
    }

    #[test]
    fn test_base_score_minimum_is_35() {
        assert_eq!(compute_readiness_score(&input(&[])), 35);
    }

    #[test]
    fn test_three_categories_add_fifteen() {
        let cats = [
            SkillCategory::Languages,
            SkillCategory::Data,
            SkillCategory::Cloud,
        ];
        assert_eq!(compute_readiness_score(&input(&cats)), 50);
    }

    #[test]
    fn test_category_bonus_caps_at_thirty() {
        let cats = [SkillCategory::Web; 8];
        assert_eq!(compute_readiness_score(&input(&cats)), 65);
    }

    #[test]
    fn test_whitespace_company_and_role_earn_nothing() {
        let score = compute_readiness_score(&ReadinessInput {
            company: "   ",
            role: "\t",
            ..input(&[])
        });
        assert_eq!(score, 35);
    }

    #[test]
    fn test_long_jd_threshold_is_strictly_greater_than_800() {
        let exactly = "a".repeat(800);
        let longer = "a".repeat(801);
        let at = compute_readiness_score(&ReadinessInput {
            jd_text: &exactly,
            ..input(&[])
        });
        let over = compute_readiness_score(&ReadinessInput {
            jd_text: &longer,
            ..input(&[])
        });
        assert_eq!(at, 35);
        assert_eq!(over, 45);
    }

    #[test]
    fn test_all_bonuses_together() {
        let long = "a".repeat(900);
        let cats = [SkillCategory::Web; 6];
        let score = compute_readiness_score(&ReadinessInput {
            jd_text: &long,
            company: "Acme",
            role: "SDE",
            categories_present: &cats,
        });
        assert_eq!(score, 95);
    }

    #[test]
    fn test_final_score_empty_map_counts_all_as_practice() {
        let all = skills(&["Java", "SQL", "AWS"]);
        assert_eq!(compute_final_score(70, &ConfidenceMap::new(), &all), 64);
    }

    #[test]
    fn test_final_score_know_and_practice() {
        let all = skills(&["Java", "SQL", "AWS"]);
        let mut map = ConfidenceMap::new();
        map.insert("Java".to_string(), Confidence::Know);
        map.insert("SQL".to_string(), Confidence::Know);
        map.insert("AWS".to_string(), Confidence::Practice);
        assert_eq!(compute_final_score(70, &map, &all), 72);
    }

    #[test]
    fn test_final_score_ignores_stale_keys() {
        let all = skills(&["Java"]);
        let mut map = ConfidenceMap::new();
        map.insert("Cobol".to_string(), Confidence::Know);
        assert_eq!(compute_final_score(50, &map, &all), 48);
    }

    #[test]
    fn test_final_score_without_skills_is_base() {
        assert_eq!(compute_final_score(42, &ConfidenceMap::new(), &[]), 42);
    }

    #[test]
    fn test_final_score_is_idempotent() {
        let all = skills(&["Java", "SQL"]);
        let mut map = ConfidenceMap::new();
        map.insert("SQL".to_string(), Confidence::Know);
        let first = compute_final_score(60, &map, &all);
        let second = compute_final_score(60, &map, &all);
        assert_eq!(first, second);
    }

    #[test]
    fn test_final_score_clamped() {
        let many: Vec<String> = (0..80).map(|i| format!("skill-{i}")).collect();
        assert_eq!(compute_final_score(35, &ConfidenceMap::new(), &many), 0);
        let know: ConfidenceMap = many
            .iter()
            .map(|s| (s.clone(), Confidence::Know))
            .collect();
        assert_eq!(compute_final_score(35, &know, &many), 100);
    }

    #[test]
    fn test_all_skills_dedupes_across_categories() {
        let mut tags = TagsByCategory::new();
        tags.insert("Web".to_string(), skills(&["React", "REST"]));
        tags.insert("Other".to_string(), skills(&["REST", "Projects"]));
        assert_eq!(all_skills(&tags), skills(&["React", "REST", "Projects"]));
    }

    #[test]
    fn test_weak_skills_takes_first_unknown() {
        let all = skills(&["Java", "SQL", "AWS", "Docker", "React"]);
        let mut map = ConfidenceMap::new();
        map.insert("SQL".to_string(), Confidence::Know);
        assert_eq!(weak_skills(&all, &map, 3), skills(&["Java", "AWS", "Docker"]));
    }
}
