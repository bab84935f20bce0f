//! Company intel — heuristic company profiling and interview round mapping.
//!
//! No external lookups: size comes from fixed name lists, industry from JD
//! keywords, and the round flow from an ordered decision table per size.

use serde::{Deserialize, Serialize};

use crate::analysis::skills::{ExtractedSkills, SkillCategory};
use crate::models::entry::RoundMapping;

const KNOWN_ENTERPRISE: &[&str] = &[
    "amazon",
    "infosys",
    "tcs",
    "wipro",
    "accenture",
    "cognizant",
    "hcl",
    "tech mahindra",
    "capgemini",
    "lti",
    "mindtree",
    "google",
    "microsoft",
    "meta",
    "apple",
    "netflix",
    "oracle",
    "ibm",
    "sap",
    "salesforce",
    "adobe",
    "intel",
    "nvidia",
    "cisco",
    "jpmorgan",
    "goldman sachs",
    "morgan stanley",
    "deloitte",
    "ey",
    "kpmg",
    "pwc",
];

const KNOWN_MIDSIZE: &[&str] = &[
    "razorpay",
    "cred",
    "swiggy",
    "zomato",
    "ola",
    "paytm",
    "phonepe",
    "policybazaar",
    "freshworks",
    "zoho",
    "postman",
    "hasura",
    "thoughtworks",
];

/// Checked in declaration order; first hit wins.
const INDUSTRIES: &[(&str, &[&str])] = &[
    (
        "FinTech",
        &[
            "payment",
            "banking",
            "fintech",
            "transaction",
            "wallet",
            "lending",
            "insurance",
            "investment",
        ],
    ),
    (
        "E-commerce",
        &[
            "ecommerce",
            "e-commerce",
            "marketplace",
            "retail",
            "inventory",
            "order",
        ],
    ),
    (
        "HealthTech",
        &[
            "healthcare",
            "medical",
            "clinical",
            "patient",
            "health tech",
            "hospital",
        ],
    ),
    (
        "EdTech",
        &[
            "education",
            "learning",
            "edtech",
            "course",
            "student",
            "curriculum",
        ],
    ),
    (
        "SaaS",
        &[
            "saas",
            "subscription",
            "b2b",
            "enterprise software",
            "cloud platform",
        ],
    ),
];

pub const DEFAULT_INDUSTRY: &str = "Technology Services";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompanySize {
    Enterprise,
    MidSize,
    Startup,
}

impl CompanySize {
    pub fn label(self) -> &'static str {
        match self {
            CompanySize::Enterprise => "Enterprise (2000+)",
            CompanySize::MidSize => "Mid-size (200–2000)",
            CompanySize::Startup => "Startup (<200)",
        }
    }

    /// Typical hiring focus for companies of this size.
    pub fn hiring_focus(self) -> &'static str {
        match self {
            CompanySize::Enterprise => {
                "Structured DSA rounds, strong core CS fundamentals, and systematic problem-solving. \
                 Emphasis on algorithms, data structures, OOP, DBMS, and behavioral fit."
            }
            CompanySize::MidSize => {
                "Balanced mix of DSA and system design. Practical problem-solving plus domain depth. \
                 Expect coding assessments and project deep-dives."
            }
            CompanySize::Startup => {
                "Practical problem-solving, hands-on coding, and stack depth. Focus on what you can \
                 build, system thinking, and culture fit over formal DSA rounds."
            }
        }
    }

    fn rules(self) -> &'static [RoundRule] {
        match self {
            CompanySize::Enterprise => ENTERPRISE_RULES,
            CompanySize::MidSize => MIDSIZE_RULES,
            CompanySize::Startup => STARTUP_RULES,
        }
    }
}

/// Heuristic company profile. Only produced when a company name was given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyIntel {
    pub company: String,
    pub industry: String,
    pub size: CompanySize,
    #[serde(default)]
    pub size_label: String,
    #[serde(default)]
    pub hiring_focus: String,
    #[serde(default)]
    pub round_mapping: Vec<RoundMapping>,
}

/// Enterprise names take precedence over mid-size names; unknown names are startups.
pub fn infer_company_size(company: &str) -> CompanySize {
    let name = company.trim().to_lowercase();
    if name.is_empty() {
        return CompanySize::Startup;
    }
    if KNOWN_ENTERPRISE.iter().any(|e| name.contains(e)) {
        CompanySize::Enterprise
    } else if KNOWN_MIDSIZE.iter().any(|m| name.contains(m)) {
        CompanySize::MidSize
    } else {
        CompanySize::Startup
    }
}

pub fn infer_industry(jd_text: &str, company: &str) -> &'static str {
    let haystack = format!("{jd_text} {company}").to_lowercase();
    INDUSTRIES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| haystack.contains(kw)))
        .map(|(industry, _)| *industry)
        .unwrap_or(DEFAULT_INDUSTRY)
}

// ────────────────────────────────────────────────────────────────────────────
// Round mapping decision table
// ────────────────────────────────────────────────────────────────────────────

/// Presence flags the round table is keyed on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkillFlags {
    pub has_dsa: bool,
    pub has_web: bool,
    pub has_cloud: bool,
}

impl SkillFlags {
    pub fn from_skills(skills: &ExtractedSkills) -> Self {
        Self {
            has_dsa: skills.has(SkillCategory::CoreCs),
            has_web: skills.has(SkillCategory::Web) || skills.has(SkillCategory::Languages),
            has_cloud: skills.has(SkillCategory::Cloud),
        }
    }

    fn is_set(self, flag: Flag) -> bool {
        match flag {
            Flag::Dsa => self.has_dsa,
            Flag::Web => self.has_web,
            Flag::Cloud => self.has_cloud,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Flag {
    Dsa,
    Web,
    Cloud,
}

#[derive(Debug, Clone, Copy)]
enum Focus {
    Fixed(&'static str),
    ByFlag(Flag, &'static str, &'static str),
}

struct RoundTemplate {
    title: &'static str,
    focus: Focus,
    why: &'static str,
}

/// A row of the table. `when: None` always matches.
struct RoundRule {
    when: Option<Flag>,
    rounds: &'static [RoundTemplate],
}

const WHY_ONLINE_TEST: &str =
    "Filters candidates at scale. Strong performance here opens the door to later rounds.";
const WHY_TECHNICAL_DSA: &str =
    "Core technical competency. Demonstrates problem-solving and coding fluency.";
const WHY_TECH_PROJECTS: &str =
    "Validates real-world experience. Be ready to explain architecture and trade-offs.";
const WHY_SYSTEM_DISCUSSION: &str =
    "Assesses system design and scalability thinking. Critical for product roles.";
const WHY_CULTURE_FIT: &str = "Ensures mutual fit. Communicate clearly and show genuine interest.";
const WHY_HR: &str =
    "Final alignment on expectations and values. Confidence and clarity matter.";
const WHY_PRACTICAL_CODING: &str =
    "Shows you can build, not just theorize. Often pair programming or take-home.";

const ENTERPRISE_RULES: &[RoundRule] = &[RoundRule {
    when: None,
    rounds: &[
        RoundTemplate {
            title: "Round 1: Online Test",
            focus: Focus::ByFlag(Flag::Dsa, "DSA + Aptitude", "Aptitude + Basic Coding"),
            why: WHY_ONLINE_TEST,
        },
        RoundTemplate {
            title: "Round 2: Technical",
            focus: Focus::ByFlag(Flag::Dsa, "DSA + Core CS", "Coding + Fundamentals"),
            why: WHY_TECHNICAL_DSA,
        },
        RoundTemplate {
            title: "Round 3: Tech + Projects",
            focus: Focus::Fixed("Projects, stack deep-dive"),
            why: WHY_TECH_PROJECTS,
        },
        RoundTemplate {
            title: "Round 4: HR",
            focus: Focus::Fixed("Behavioral, fit"),
            why: WHY_HR,
        },
    ],
}];

const MIDSIZE_RULES: &[RoundRule] = &[RoundRule {
    when: None,
    rounds: &[
        RoundTemplate {
            title: "Round 1: Online Assessment",
            focus: Focus::ByFlag(Flag::Dsa, "Coding + Aptitude", "Aptitude + Problem-solving"),
            why: WHY_ONLINE_TEST,
        },
        RoundTemplate {
            title: "Round 2: Technical Interview",
            focus: Focus::ByFlag(Flag::Web, "Coding + Projects", "DSA + Fundamentals"),
            why: WHY_TECHNICAL_DSA,
        },
        RoundTemplate {
            title: "Round 3: System / Project Discussion",
            focus: Focus::ByFlag(Flag::Cloud, "System design + Projects", "Projects + Stack"),
            why: WHY_SYSTEM_DISCUSSION,
        },
        RoundTemplate {
            title: "Round 4: HR / Culture Fit",
            focus: Focus::Fixed("Values, motivation"),
            why: WHY_CULTURE_FIT,
        },
    ],
}];

const STARTUP_RULES: &[RoundRule] = &[
    RoundRule {
        when: Some(Flag::Web),
        rounds: &[
            RoundTemplate {
                title: "Round 1: Practical Coding",
                focus: Focus::Fixed("Build / Debug / Pair"),
                why: WHY_PRACTICAL_CODING,
            },
            RoundTemplate {
                title: "Round 2: System Discussion",
                focus: Focus::Fixed("Architecture, scalability"),
                why: WHY_SYSTEM_DISCUSSION,
            },
            RoundTemplate {
                title: "Round 3: Culture Fit",
                focus: Focus::Fixed("Team fit, motivation"),
                why: WHY_CULTURE_FIT,
            },
        ],
    },
    RoundRule {
        when: Some(Flag::Dsa),
        rounds: &[
            RoundTemplate {
                title: "Round 1: Coding Challenge",
                focus: Focus::Fixed("Problem-solving"),
                why: WHY_PRACTICAL_CODING,
            },
            RoundTemplate {
                title: "Round 2: Technical Interview",
                focus: Focus::Fixed("DSA + Fundamentals"),
                why: WHY_TECHNICAL_DSA,
            },
            RoundTemplate {
                title: "Round 3: Culture Fit",
                focus: Focus::Fixed("Values, fit"),
                why: WHY_CULTURE_FIT,
            },
        ],
    },
    RoundRule {
        when: None,
        rounds: &[
            RoundTemplate {
                title: "Round 1: Screening",
                focus: Focus::Fixed("Aptitude / Basic Coding"),
                why: WHY_ONLINE_TEST,
            },
            RoundTemplate {
                title: "Round 2: Technical",
                focus: Focus::Fixed("Projects + Stack"),
                why: WHY_TECH_PROJECTS,
            },
            RoundTemplate {
                title: "Round 3: Culture Fit",
                focus: Focus::Fixed("Team fit"),
                why: WHY_CULTURE_FIT,
            },
        ],
    },
];

/// Evaluates the size's rules top to bottom; the first matching row produces the rounds.
pub fn build_round_mapping(size: CompanySize, skills: &ExtractedSkills) -> Vec<RoundMapping> {
    let flags = SkillFlags::from_skills(skills);
    size.rules()
        .iter()
        .find(|rule| rule.when.map_or(true, |flag| flags.is_set(flag)))
        .map(|rule| {
            rule.rounds
                .iter()
                .map(|template| render_round(template, flags))
                .collect()
        })
        .unwrap_or_default()
}

fn render_round(template: &RoundTemplate, flags: SkillFlags) -> RoundMapping {
    let focus = match template.focus {
        Focus::Fixed(focus) => focus,
        Focus::ByFlag(flag, set, unset) => {
            if flags.is_set(flag) {
                set
            } else {
                unset
            }
        }
    };
    RoundMapping {
        round_title: template.title.to_string(),
        focus_areas: vec![focus.to_string()],
        why_it_matters: template.why.to_string(),
    }
}

/// Full company profile, or `None` when the company name is blank.
pub fn generate_company_intel(
    company: &str,
    jd_text: &str,
    skills: &ExtractedSkills,
) -> Option<CompanyIntel> {
    let company = company.trim();
    if company.is_empty() {
        return None;
    }
    let size = infer_company_size(company);

    Some(CompanyIntel {
        company: company.to_string(),
        industry: infer_industry(jd_text, company).to_string(),
        size,
        size_label: size.label().to_string(),
        hiring_focus: size.hiring_focus().to_string(),
        round_mapping: build_round_mapping(size, skills),
    })
}
