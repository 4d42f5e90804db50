use sqlx::Result;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::match_result::MatchResultRow;
use crate::screening::scorer::MatchResult;

/// Supersedes every stored result for the job with `results`, atomically.
pub async fn replace_match_results(pool: &PgPool, job_id: Uuid, results: &[MatchResult]) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM match_results WHERE job_id = $1")
        .bind(job_id)
        .execute(&mut *tx)
        .await?;

    for result in results {
        sqlx::query(
            r#"
            INSERT INTO match_results (id, job_id, resume_id, score, reasoning, llm_model)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(job_id)
        .bind(result.resume_id)
        .bind(result.score)
        .bind(result.reasoning_text())
        .bind(result.model_used.as_stored())
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    info!("Saved {} match results for job {job_id}", results.len());
    Ok(())
}

pub async fn list_matches_for_job(pool: &PgPool, job_id: Uuid) -> Result<Vec<MatchResultRow>> {
    let rows = sqlx::query_as::<_, MatchResultRow>(
        "SELECT * FROM match_results WHERE job_id = $1 ORDER BY score DESC, created_at, id",
    )
    .bind(job_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
