//! Plain-text rendering of a saved entry for copy and download.

use crate::models::entry::{ChecklistRound, Entry, PlanDay};

const RULE_WIDTH: usize = 50;

fn block(title: &str, lines: &[String]) -> String {
    let mut out = title.to_string();
    for line in lines {
        out.push_str("\n  • ");
        out.push_str(line);
    }
    out
}

pub fn format_plan(plan: &[PlanDay]) -> String {
    plan.iter()
        .map(|day| block(&day.focus, &day.tasks))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn format_checklist(checklist: &[ChecklistRound]) -> String {
    checklist
        .iter()
        .map(|round| block(&round.round_title, &round.items))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn format_questions(questions: &[String]) -> String {
    questions
        .iter()
        .enumerate()
        .map(|(i, q)| format!("{}. {q}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Full downloadable report: header, rule, then plan, checklist and questions.
pub fn export_text(entry: &Entry) -> String {
    let company = match entry.company.trim() {
        "" => "Job",
        name => name,
    };
    let mut out = format!("Placement Readiness — {company}");
    if !entry.role.trim().is_empty() {
        out.push_str(&format!(" · {}", entry.role.trim()));
    }
    out.push('\n');
    out.push_str(&"=".repeat(RULE_WIDTH));
    out.push_str("\n\n");

    let sections = [
        ("7-DAY PLAN", format_plan(&entry.plan7_days)),
        ("ROUND-WISE CHECKLIST", format_checklist(&entry.checklist)),
        ("10 LIKELY INTERVIEW QUESTIONS", format_questions(&entry.questions)),
    ];
    let body = sections
        .iter()
        .map(|(title, content)| format!("## {title}\n\n{content}\n"))
        .collect::<Vec<_>>()
        .join("\n");
    out.push_str(&body);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::schema::normalize_entry;
    use serde_json::json;

    fn day(n: u8, focus: &str, tasks: &[&str]) -> PlanDay {
        PlanDay {
            day: n,
            focus: focus.to_string(),
            tasks: tasks.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn test_format_plan_blocks() {
        let plan = vec![
            day(1, "Day 1: Basics", &["Read notes", "Solve 5 problems"]),
            day(2, "Day 2: Depth", &["Mock round"]),
        ];
        assert_eq!(
            format_plan(&plan),
            "Day 1: Basics\n  • Read notes\n  • Solve 5 problems\n\nDay 2: Depth\n  • Mock round"
        );
    }

    #[test]
    fn test_format_checklist_round_without_items() {
        let checklist = vec![ChecklistRound {
            round_title: "HR".to_string(),
            items: vec![],
        }];
        assert_eq!(format_checklist(&checklist), "HR");
    }

    #[test]
    fn test_format_questions_numbered() {
        let questions = vec!["Why us?".to_string(), "Explain joins.".to_string()];
        assert_eq!(format_questions(&questions), "1. Why us?\n2. Explain joins.");
        assert_eq!(format_questions(&[]), "");
    }

    #[test]
    fn test_export_header_defaults_company_to_job() {
        let entry = normalize_entry(&json!({"id": "e1"})).unwrap();
        let text = export_text(&entry);
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Placement Readiness — Job"));
        assert_eq!(lines.next(), Some("=".repeat(50).as_str()));
    }

    #[test]
    fn test_export_contains_all_sections_in_order() {
        let entry = normalize_entry(&json!({
            "id": "e2",
            "company": "Acme",
            "role": "SDE1",
            "plan7Days": [{"day": 1, "focus": "Day 1", "tasks": ["Revise OOP"]}],
            "checklist": [{"roundTitle": "Round 1", "items": ["Aptitude"]}],
            "questions": ["What is a deadlock?"]
        }))
        .unwrap();
        let text = export_text(&entry);

        assert!(text.starts_with("Placement Readiness — Acme · SDE1\n"));
        let plan = text.find("## 7-DAY PLAN").unwrap();
        let checklist = text.find("## ROUND-WISE CHECKLIST").unwrap();
        let questions = text.find("## 10 LIKELY INTERVIEW QUESTIONS").unwrap();
        assert!(plan < checklist && checklist < questions);
        assert!(text.contains("Day 1\n  • Revise OOP"));
        assert!(text.contains("Round 1\n  • Aptitude"));
        assert!(text.ends_with("1. What is a deadlock?\n"));
    }
}
