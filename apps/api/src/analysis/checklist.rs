//! Round-wise preparation checklist: four fixed rounds, content gated on detected skills.

use crate::analysis::skills::{ExtractedSkills, SkillCategory};
use crate::models::entry::ChecklistRound;

/// Hard cap on items per round. Later items are dropped.
pub const MAX_ROUND_ITEMS: usize = 8;

const APTITUDE_ITEMS: &[&str] = &[
    "Revise quantitative aptitude: percentages, ratios, time-speed-distance.",
    "Practice logical reasoning and pattern recognition.",
    "Review verbal ability and reading comprehension.",
    "Time yourself on mock aptitude tests.",
    "Brush up basic grammar and vocabulary.",
    "Practice data interpretation from tables and graphs.",
    "Do at least 2 full-length aptitude mocks.",
];

const CS_FUNDAMENTALS_ITEMS: &[&str] = &[
    "Revise core DSA: arrays, strings, linked lists, trees, graphs.",
    "Practice 2–3 problems daily on arrays and two pointers.",
    "Revise OOP concepts: encapsulation, inheritance, polymorphism.",
    "Brush up DBMS: normalization, ACID, indexing, transactions.",
    "Review OS: processes, threads, scheduling, memory.",
    "Revise basics of computer networks: TCP/IP, HTTP, DNS.",
];

const GENERIC_FUNDAMENTALS_ITEMS: &[&str] = &[
    "Revise basic data structures: arrays, strings, hash maps.",
    "Practice simple coding problems (loops, conditions).",
    "Brush up basic CS fundamentals from your curriculum.",
];

const CODING_CLOSING_ITEMS: &[&str] = &[
    "Practice explaining your approach before coding.",
    "Time yourself on 2–3 coding problems.",
];

/// Stack items per detected category, in this order.
const STACK_ITEMS: &[(SkillCategory, &[&str])] = &[
    (
        SkillCategory::Languages,
        &["Prepare to explain your strongest language (syntax, memory, best practices)."],
    ),
    (
        SkillCategory::Web,
        &[
            "Prepare project deep-dive: architecture, your role, challenges.",
            "Revise React/Vue/Angular concepts if you used them.",
            "Be ready to explain REST/APIs and state management.",
        ],
    ),
    (
        SkillCategory::Data,
        &["Prepare SQL: joins, subqueries, indexing. Be ready to write queries."],
    ),
    (
        SkillCategory::Cloud,
        &["Revise cloud/DevOps basics if mentioned (e.g. Docker, CI/CD)."],
    ),
    (
        SkillCategory::Testing,
        &["Prepare testing approach: unit, integration, tools you used."],
    ),
];

const PROJECT_CLOSING_ITEMS: &[&str] = &[
    "List 2–3 projects with STAR-style answers.",
    "Align resume bullet points with JD keywords.",
];

const HR_ITEMS: &[&str] = &[
    "Prepare \"Tell me about yourself\" (2 min).",
    "Prepare \"Why this company?\" and \"Why this role?\".",
    "List 3 strengths and 1 weakness with improvement story.",
    "Prepare situational examples: conflict, deadline, failure.",
    "Research company culture and recent news.",
    "Prepare questions to ask the interviewer.",
    "Practice confidence and clarity in communication.",
];

/// Builds the 4-round checklist. Items keep construction order; each round is cut to 8.
pub fn build_checklist(skills: &ExtractedSkills) -> Vec<ChecklistRound> {
    let fundamentals = if skills.has(SkillCategory::CoreCs) {
        CS_FUNDAMENTALS_ITEMS
    } else {
        GENERIC_FUNDAMENTALS_ITEMS
    };

    let stack = STACK_ITEMS
        .iter()
        .filter(|(category, _)| skills.has(*category))
        .flat_map(|(_, items)| items.iter().copied());

    vec![
        round("Round 1: Aptitude / Basics", APTITUDE_ITEMS.iter().copied()),
        round(
            "Round 2: DSA + Core CS",
            fundamentals.iter().chain(CODING_CLOSING_ITEMS).copied(),
        ),
        round(
            "Round 3: Tech interview (projects + stack)",
            stack.chain(PROJECT_CLOSING_ITEMS.iter().copied()),
        ),
        round("Round 4: Managerial / HR", HR_ITEMS.iter().copied()),
    ]
}

fn round<'a>(title: &str, items: impl Iterator<Item = &'a str>) -> ChecklistRound {
    ChecklistRound {
        round_title: title.to_string(),
        items: items.take(MAX_ROUND_ITEMS).map(str::to_string).collect(),
    }
}
