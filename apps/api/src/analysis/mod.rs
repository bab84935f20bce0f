// Analysis Engine
// Implements: skill extraction, checklist, 7-day plan, questions, scoring, company intel.
// Every builder is pure; only the orchestrator touches the history store.

pub mod checklist;
pub mod company_intel;
pub mod export;
pub mod handlers;
pub mod orchestrator;
pub mod plan;
pub mod questions;
pub mod scoring;
pub mod skills;
