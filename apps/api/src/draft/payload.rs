//! Submission payload: the draft flattened into the backend's wire shape
//! with every entry date normalized.

use crate::draft::dates::normalize_date;
use crate::models::resume::{Career, Certificate, Education, Project, ResumeDraft, ResumePayload};

/// Joins tech-summary lines into the single field the backend stores.
/// Stored resumes are split back with [`crate::models::lenient::split_lines`].
pub fn join_summary(lines: &[String]) -> String {
    lines.join("\n")
}

pub fn build_payload(draft: &ResumeDraft) -> ResumePayload {
    ResumePayload {
        title: draft.title.clone(),
        name: draft.name.clone(),
        email: draft.email.clone(),
        phone: draft.phone.clone(),
        career_type: draft.career_type,
        position: draft.position.clone(),
        tech_stack: draft.tech_stack.iter().cloned().collect(),
        tech_summary: join_summary(&draft.tech_summary),
        links: draft.links.clone(),
        careers: draft
            .careers
            .iter()
            .map(|c| Career {
                start_date: normalize_date(&c.start_date),
                end_date: normalize_date(&c.end_date),
                ..c.clone()
            })
            .collect(),
        projects: draft
            .projects
            .iter()
            .map(|p| Project {
                start_date: normalize_date(&p.start_date),
                end_date: normalize_date(&p.end_date),
                ..p.clone()
            })
            .collect(),
        educations: draft
            .educations
            .iter()
            .map(|e| Education {
                start_date: normalize_date(&e.start_date),
                end_date: normalize_date(&e.end_date),
                ..e.clone()
            })
            .collect(),
        certificates: draft
            .certificates
            .iter()
            .map(|c| Certificate {
                date: normalize_date(&c.date),
                ..c.clone()
            })
            .collect(),
        cover_letters: draft.cover_letters.clone(),
    }
}
