//! Likely interview questions, gated on detected skill categories.

use crate::analysis::skills::{ExtractedSkills, SkillCategory};

pub const MAX_QUESTIONS: usize = 10;

/// Gate order is significant: truncation keeps the earliest pools.
const POOLS: &[(SkillCategory, &[&str])] = &[
    (
        SkillCategory::Data,
        &[
            "Explain indexing in databases and when it helps.",
            "What is the difference between SQL and NoSQL? When would you choose each?",
        ],
    ),
    (
        SkillCategory::Web,
        &[
            "Explain state management options in React (useState, Context, Redux).",
            "How does the virtual DOM work and why is it used?",
        ],
    ),
    (
        SkillCategory::CoreCs,
        &[
            "How would you optimize search in sorted data? (Binary search and variants.)",
            "Explain time complexity of common operations on arrays vs linked lists.",
            "Describe a project where you used OOP effectively.",
        ],
    ),
    (
        SkillCategory::Languages,
        &[
            "Explain pass-by-value vs pass-by-reference in your primary language.",
            "How do you handle memory management / garbage collection?",
        ],
    ),
    (
        SkillCategory::Cloud,
        &[
            "Explain what Docker does and how it differs from a VM.",
            "What is CI/CD and how have you used it?",
        ],
    ),
    (
        SkillCategory::Testing,
        &["How do you approach unit testing? What do you mock and why?"],
    ),
];

const UNIVERSAL: &[&str] = &[
    "Tell me about a challenging bug you fixed and how you approached it.",
    "How do you prioritize when you have multiple deadlines?",
];

const GENERAL_FALLBACK: &[&str] = &[
    "How do you approach a problem you have never seen before?",
    "Describe a project where you collaborated with others.",
];

pub fn generate_questions(skills: &ExtractedSkills) -> Vec<String> {
    let gated = POOLS
        .iter()
        .filter(|(category, _)| skills.has(*category))
        .flat_map(|(_, questions)| questions.iter());

    let fallback: &[&str] = if skills.is_empty() || skills.has(SkillCategory::Other) {
        GENERAL_FALLBACK
    } else {
        &[]
    };

    gated
        .chain(UNIVERSAL)
        .chain(fallback)
        .take(MAX_QUESTIONS)
        .map(|q| q.to_string())
        .collect()
}
