use sqlx::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::job::JobRow;

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Default)]
pub struct JobUpdate<'a> {
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub required_skills: Option<&'a [String]>,
}

pub async fn create_job(
    pool: &PgPool,
    title: &str,
    description: &str,
    required_skills: &[String],
) -> Result<JobRow> {
    let job = sqlx::query_as::<_, JobRow>(
        r#"
        INSERT INTO jobs (id, title, description, required_skills)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(title)
    .bind(description)
    .bind(required_skills)
    .fetch_one(pool)
    .await?;
    Ok(job)
}

pub async fn list_jobs(pool: &PgPool) -> Result<Vec<JobRow>> {
    let jobs = sqlx::query_as::<_, JobRow>("SELECT * FROM jobs ORDER BY created_at, id")
        .fetch_all(pool)
        .await?;
    Ok(jobs)
}

pub async fn get_job(pool: &PgPool, job_id: Uuid) -> Result<Option<JobRow>> {
    let job = sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
        .bind(job_id)
        .fetch_optional(pool)
        .await?;
    Ok(job)
}

pub async fn update_job(pool: &PgPool, job_id: Uuid, update: JobUpdate<'_>) -> Result<Option<JobRow>> {
    let job = sqlx::query_as::<_, JobRow>(
        r#"
        UPDATE jobs
        SET title = COALESCE($2, title),
            description = COALESCE($3, description),
            required_skills = COALESCE($4, required_skills),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(job_id)
    .bind(update.title)
    .bind(update.description)
    .bind(update.required_skills)
    .fetch_optional(pool)
    .await?;
    Ok(job)
}

/// Returns `false` when no such job existed. Match results cascade in the schema.
pub async fn delete_job(pool: &PgPool, job_id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
        .bind(job_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
