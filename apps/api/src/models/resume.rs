use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::screening::extractor::{EducationEntry, ParsedResume, ResumeSection};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub candidate_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub raw_text: String,
    pub skills: Vec<String>,
    pub experience_years: Option<f64>,
    pub education_entries: Json<Vec<EducationEntry>>,
    pub sections: Json<Vec<ResumeSection>>,
    pub created_at: DateTime<Utc>,
}

impl ResumeRow {
    pub fn to_parsed(&self) -> ParsedResume {
        ParsedResume {
            candidate_name: self.candidate_name.clone(),
            contact_email: self.contact_email.clone(),
            contact_phone: self.contact_phone.clone(),
            skills: self.skills.iter().cloned().collect(),
            experience_years: self.experience_years,
            education_entries: self.education_entries.0.clone(),
            sections: self.sections.0.clone(),
            raw_text: self.raw_text.clone(),
        }
    }
}
