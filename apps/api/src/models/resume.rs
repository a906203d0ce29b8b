use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::models::lenient;

/// Link kinds every fresh draft is scaffolded with, in display order.
pub const DEFAULT_LINK_KINDS: [&str; 3] = ["github", "notion", "blog"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CareerType {
    #[default]
    #[serde(alias = "신입")]
    Entry,
    #[serde(alias = "경력")]
    Experienced,
}

impl CareerType {
    /// Accepts the wire tags and the legacy Korean labels.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "entry" | "신입" => Some(CareerType::Entry),
            "experienced" | "경력" => Some(CareerType::Experienced),
            _ => None,
        }
    }
}

fn lenient_career_type<'de, D>(deserializer: D) -> Result<Option<CareerType>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?
        .as_str()
        .and_then(CareerType::from_label))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Link {
    #[serde(rename = "type", deserialize_with = "lenient::text")]
    pub kind: String,
    #[serde(deserialize_with = "lenient::text")]
    pub url: String,
}

impl Link {
    pub fn empty(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            url: String::new(),
        }
    }
}

pub fn default_links() -> Vec<Link> {
    DEFAULT_LINK_KINDS.iter().map(|k| Link::empty(k)).collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Entries
//
// Every entry keeps unknown keys in `extra` so fields this service does not
// model survive ingestion and reach the backend untouched.
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Career {
    #[serde(deserialize_with = "lenient::text")]
    pub company: String,
    #[serde(deserialize_with = "lenient::text")]
    pub position: String,
    #[serde(deserialize_with = "lenient::text")]
    pub department: String,
    #[serde(deserialize_with = "lenient::text")]
    pub description: String,
    #[serde(deserialize_with = "lenient::text")]
    pub start_date: String,
    #[serde(deserialize_with = "lenient::text")]
    pub end_date: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub description: String,
    #[serde(deserialize_with = "lenient::tokens")]
    pub tech_stack: Vec<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub role: String,
    #[serde(deserialize_with = "lenient::text")]
    pub start_date: String,
    #[serde(deserialize_with = "lenient::text")]
    pub end_date: String,
    #[serde(deserialize_with = "lenient::count")]
    pub member_count: u32,
    /// Team composition, collapsed into one display string on ingestion.
    #[serde(deserialize_with = "lenient::joined")]
    pub member_roles: String,
    #[serde(deserialize_with = "lenient::text")]
    pub github_link: String,
    #[serde(deserialize_with = "lenient::text")]
    pub deploy_link: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    #[serde(deserialize_with = "lenient::text")]
    pub organization: String,
    #[serde(deserialize_with = "lenient::text")]
    pub degree: String,
    #[serde(deserialize_with = "lenient::text")]
    pub major: String,
    #[serde(deserialize_with = "lenient::text")]
    pub description: String,
    #[serde(deserialize_with = "lenient::text")]
    pub start_date: String,
    #[serde(deserialize_with = "lenient::text")]
    pub end_date: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Certificate {
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub organization: String,
    #[serde(deserialize_with = "lenient::text")]
    pub date: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverLetter {
    #[serde(deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(deserialize_with = "lenient::text")]
    pub content: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Draft
// ────────────────────────────────────────────────────────────────────────────

/// The in-memory resume under construction. Owned by one editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeDraft {
    pub title: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub career_type: CareerType,
    pub position: String,
    pub tech_stack: BTreeSet<String>,
    pub tech_summary: Vec<String>,
    pub links: Vec<Link>,
    pub careers: Vec<Career>,
    pub projects: Vec<Project>,
    pub educations: Vec<Education>,
    pub certificates: Vec<Certificate>,
    pub cover_letters: Vec<CoverLetter>,
}

impl Default for ResumeDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            career_type: CareerType::Entry,
            position: String::new(),
            tech_stack: BTreeSet::new(),
            tech_summary: Vec::new(),
            links: default_links(),
            careers: Vec::new(),
            projects: Vec::new(),
            educations: Vec::new(),
            certificates: Vec::new(),
            cover_letters: Vec::new(),
        }
    }
}

impl ResumeDraft {
    /// Inserts a trimmed tech token. Returns false for blanks and duplicates.
    pub fn add_tech(&mut self, token: &str) -> bool {
        let token = token.trim();
        if token.is_empty() {
            return false;
        }
        self.tech_stack.insert(token.to_string())
    }
}

/// A previously saved resume as handed over for editing. Loosely typed:
/// absent collections default to empty, absent links to the scaffold.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoredResume {
    #[serde(deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub email: String,
    #[serde(deserialize_with = "lenient::text")]
    pub phone: String,
    #[serde(deserialize_with = "lenient_career_type")]
    pub career_type: Option<CareerType>,
    #[serde(deserialize_with = "lenient::text")]
    pub position: String,
    #[serde(deserialize_with = "lenient::tokens")]
    pub tech_stack: Vec<String>,
    #[serde(deserialize_with = "lenient::lines")]
    pub tech_summary: Vec<String>,
    pub links: Option<Vec<Link>>,
    pub careers: Vec<Career>,
    pub projects: Vec<Project>,
    pub educations: Vec<Education>,
    pub certificates: Vec<Certificate>,
    pub cover_letters: Vec<CoverLetter>,
}

impl From<StoredResume> for ResumeDraft {
    fn from(stored: StoredResume) -> Self {
        ResumeDraft {
            title: stored.title,
            name: stored.name,
            email: stored.email,
            phone: stored.phone,
            career_type: stored.career_type.unwrap_or_default(),
            position: stored.position,
            tech_stack: stored.tech_stack.into_iter().collect(),
            tech_summary: stored.tech_summary,
            links: stored.links.unwrap_or_else(default_links),
            careers: stored.careers,
            projects: stored.projects,
            educations: stored.educations,
            certificates: stored.certificates,
            cover_letters: stored.cover_letters,
        }
    }
}

/// Body sent to the resume backend on create/update. Every date inside the
/// entry collections is `YYYY-MM-DD` or empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumePayload {
    pub title: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub career_type: CareerType,
    pub position: String,
    pub tech_stack: Vec<String>,
    pub tech_summary: String,
    pub links: Vec<Link>,
    pub careers: Vec<Career>,
    pub projects: Vec<Project>,
    pub educations: Vec<Education>,
    pub certificates: Vec<Certificate>,
    pub cover_letters: Vec<CoverLetter>,
}
