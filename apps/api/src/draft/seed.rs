//! Generated-seed decoding: turns the loosely-typed `data`, `portfolios` and
//! `careers` query tokens produced by the resume suggestion step into a draft.
//!
//! Only the `data` token is load-bearing: if it does not parse, the whole seed
//! is rejected. The two collection tokens are independent of each other and
//! of `data`'s sub-fields; a malformed one only empties its own collection.

use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::models::lenient;
use crate::models::resume::{Career, CareerType, CoverLetter, Project, ResumeDraft};

/// Title given to every draft created from a generated seed.
pub const GENERATED_TITLE: &str = "AI Generated Resume";

/// Seed tokens as they arrive on the session-opening URL.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedQuery {
    pub data: Option<String>,
    pub portfolios: Option<String>,
    pub careers: Option<String>,
}

impl SeedQuery {
    /// The `data` token, unless it is missing, empty or the literal
    /// `undefined` some clients emit for an unset value.
    pub fn data_token(&self) -> Option<&str> {
        present(&self.data).filter(|d| *d != "undefined")
    }

    pub fn portfolios_token(&self) -> Option<&str> {
        present(&self.portfolios)
    }

    pub fn careers_token(&self) -> Option<&str> {
        present(&self.careers)
    }
}

fn present(token: &Option<String>) -> Option<&str> {
    token.as_deref().filter(|t| !t.is_empty())
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SeedDocument {
    #[serde(deserialize_with = "lenient::text")]
    position: String,
    #[serde(rename = "careerType")]
    career_type: Value,
    #[serde(rename = "career_type")]
    career_type_snake: Value,
    tech_stack: Value,
    cover_letter: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SeedTechStack {
    #[serde(deserialize_with = "lenient::tokens")]
    tech_stack: Vec<String>,
    #[serde(deserialize_with = "lenient::lines")]
    tech_summary: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SeedCoverLetters {
    #[serde(rename = "coverLetter", alias = "cover_letter")]
    entries: Value,
}

/// Builds a draft from the seed tokens. Fails only when `data` itself is not
/// a JSON object.
pub fn decode_generated_seed(query: &SeedQuery, data: &str) -> Result<ResumeDraft, serde_json::Error> {
    let value: Value = serde_json::from_str(data)?;
    if !value.is_object() {
        return Err(serde::de::Error::custom("generated seed must be a JSON object"));
    }
    let doc: SeedDocument = serde_json::from_value(value)?;
    debug!("Parsed generated seed (position: {:?})", doc.position);

    let mut draft = ResumeDraft {
        title: GENERATED_TITLE.to_string(),
        position: doc.position,
        career_type: [&doc.career_type, &doc.career_type_snake]
            .into_iter()
            .find_map(|v| v.as_str().and_then(CareerType::from_label))
            .unwrap_or_default(),
        ..ResumeDraft::default()
    };

    if let Some(raw) = query.portfolios_token() {
        draft.projects = decode_collection::<Project>(raw, "portfolios")
            .into_iter()
            .map(|mut project| {
                project.extra.clear();
                project
            })
            .collect();
        debug!("Seeded {} projects", draft.projects.len());
    }

    if let Some(raw) = query.careers_token() {
        draft.careers = decode_collection::<Career>(raw, "careers");
        if !draft.careers.is_empty() {
            draft.career_type = CareerType::Experienced;
        }
        debug!("Seeded {} careers", draft.careers.len());
    }

    if !doc.tech_stack.is_null() {
        let tech: SeedTechStack = decode_or_default(doc.tech_stack, "tech_stack");
        draft.tech_stack = tech.tech_stack.into_iter().collect();
        draft.tech_summary = tech.tech_summary;
    }

    if !doc.cover_letter.is_null() {
        let letters: SeedCoverLetters = decode_or_default(doc.cover_letter, "cover_letter");
        if let Value::Array(items) = letters.entries {
            draft.cover_letters = decode_entries::<CoverLetter>(items, "cover_letter");
        }
    }

    Ok(draft)
}

fn decode_or_default<T: DeserializeOwned + Default>(value: Value, label: &str) -> T {
    serde_json::from_value(value).unwrap_or_else(|e| {
        warn!("Ignoring malformed seed field '{label}': {e}");
        T::default()
    })
}

/// Parses a JSON array token into entries. Parse errors and non-array values
/// yield an empty collection.
fn decode_collection<T: DeserializeOwned>(raw: &str, label: &str) -> Vec<T> {
    let parsed: Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            error!("Failed to parse '{label}' seed token: {e}");
            return Vec::new();
        }
    };

    match parsed {
        Value::Array(items) => decode_entries(items, label),
        _ => {
            warn!("'{label}' seed token is not an array, ignoring");
            Vec::new()
        }
    }
}

fn decode_entries<T: DeserializeOwned>(items: Vec<Value>, label: &str) -> Vec<T> {
    items
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| match serde_json::from_value(item) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping {label} entry #{i}: {e}");
                None
            }
        })
        .collect()
}
