//! Seven-day preparation plan: a fixed skeleton plus skill-gated appendices.

use crate::analysis::skills::{ExtractedSkills, SkillCategory};
use crate::models::entry::PlanDay;

const SKELETON: [(&str, [&str; 3]); 7] = [
    (
        "Day 1: Basics + Core CS",
        [
            "Aptitude: ratios, percentages, reasoning.",
            "Core CS: OOP, DBMS basics.",
            "Review OS and Networks fundamentals.",
        ],
    ),
    (
        "Day 2: Core CS continued",
        [
            "Complete core CS revision (DBMS, OS, Networks).",
            "Start DSA: arrays and strings.",
            "Solve 3–5 easy array/string problems.",
        ],
    ),
    (
        "Day 3: DSA + Coding",
        [
            "DSA: trees and graphs basics.",
            "Practice 2 tree/graph problems.",
            "Revise time/space complexity.",
        ],
    ),
    (
        "Day 4: DSA practice",
        [
            "Mixed DSA: stacks, queues, hashing.",
            "2–3 medium problems.",
            "Practice explaining approach aloud.",
        ],
    ),
    (
        "Day 5: Project + Resume",
        [
            "Document 2 projects with impact and tech stack.",
            "Align resume bullets with JD.",
            "Prepare 1-min project pitch.",
        ],
    ),
    (
        "Day 6: Mock interview Qs",
        [
            "Practice 10 behavioral questions.",
            "Do 1 mock technical (coding + theory).",
            "Record and review one answer.",
        ],
    ),
    (
        "Day 7: Revision + Weak areas",
        [
            "Revise weak topics from the week.",
            "Light revision: no new topics.",
            "Rest and stay confident.",
        ],
    ),
];

/// (gate, day, task), applied top to bottom after the baseline tasks.
const APPENDICES: &[(SkillCategory, u8, &str)] = &[
    (
        SkillCategory::Web,
        5,
        "Frontend: Revise React/state management if applicable.",
    ),
    (
        SkillCategory::Web,
        6,
        "Prepare frontend-specific questions (e.g. virtual DOM, hooks).",
    ),
    (SkillCategory::Data, 2, "SQL: joins, aggregation, indexing."),
    (
        SkillCategory::Data,
        6,
        "Prepare DB design and query optimization answers.",
    ),
    (
        SkillCategory::CoreCs,
        3,
        "Focus on frequently asked DSA patterns (e.g. two pointers, sliding window).",
    ),
];

pub fn build_seven_day_plan(skills: &ExtractedSkills) -> Vec<PlanDay> {
    let mut plan: Vec<PlanDay> = SKELETON
        .iter()
        .zip(1u8..)
        .map(|((focus, tasks), day)| PlanDay {
            day,
            focus: focus.to_string(),
            tasks: tasks.iter().map(|t| t.to_string()).collect(),
        })
        .collect();

    for (category, day, task) in APPENDICES {
        if !skills.has(*category) {
            continue;
        }
        if let Some(plan_day) = plan.iter_mut().find(|d| d.day == *day) {
            plan_day.tasks.push(task.to_string());
        }
    }

    plan
}
