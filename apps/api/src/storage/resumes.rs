use sqlx::Result;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::resume::ResumeRow;
use crate::screening::extractor::ParsedResume;

/// Stores a freshly parsed resume. Resumes are never updated afterwards;
/// a re-upload is a new row.
pub async fn insert_resume(pool: &PgPool, parsed: &ParsedResume) -> Result<ResumeRow> {
    let skills: Vec<String> = parsed.skills.iter().cloned().collect();

    let row = sqlx::query_as::<_, ResumeRow>(
        r#"
        INSERT INTO resumes
            (id, candidate_name, contact_email, contact_phone, raw_text,
             skills, experience_years, education_entries, sections)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(parsed.candidate_name.as_deref())
    .bind(parsed.contact_email.as_deref())
    .bind(parsed.contact_phone.as_deref())
    .bind(&parsed.raw_text)
    .bind(&skills)
    .bind(parsed.experience_years)
    .bind(Json(&parsed.education_entries))
    .bind(Json(&parsed.sections))
    .fetch_one(pool)
    .await?;

    info!(
        "Stored resume {} ({} skills, experience {:?})",
        row.id,
        skills.len(),
        parsed.experience_years
    );
    Ok(row)
}

/// All resumes in submission order. This order is the shortlist tie-break.
pub async fn list_resumes(pool: &PgPool) -> Result<Vec<ResumeRow>> {
    let rows = sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes ORDER BY created_at, id")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn get_resume(pool: &PgPool, resume_id: Uuid) -> Result<Option<ResumeRow>> {
    let row = sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1")
        .bind(resume_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn delete_resume(pool: &PgPool, resume_id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM resumes WHERE id = $1")
        .bind(resume_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
