//! Writes a compound sentiment score onto every post.

use crate::config::ScoreWrites;
use crate::db::Database;
use crate::error::ImportResult;
use crate::progress::ProgressScope;
use crate::schema;
use crate::sentiment::SentimentAnalyzer;

pub fn score_posts(
    db: &mut Database,
    analyzer: &SentimentAnalyzer,
    mode: ScoreWrites,
    progress_enabled: bool,
) -> ImportResult<u64> {
    let rows = db.client().query(schema::SELECT_ALL_POST_BODIES, &[])?;
    let pb = ProgressScope::count(progress_enabled, "Scoring post sentiment", rows.len() as u64);

    let scored: Vec<(i32, f64)> = rows
        .iter()
        .map(|row| {
            let id: i32 = row.get(0);
            let body: Option<String> = row.get(1);
            (id, analyzer.score_body(body.as_deref()))
        })
        .collect();

    let mut written = 0u64;
    match mode {
        ScoreWrites::PerRow => {
            let stmt = db.client().prepare(schema::UPDATE_SCORE)?;
            for (id, score) in &scored {
                written += db.client().execute(&stmt, &[score, id])?;
                pb.inc(1);
            }
        }
        ScoreWrites::Batched(size) => {
            let stmt = db.client().prepare(schema::UPDATE_SCORES_BATCH)?;
            for chunk in scored.chunks(size.max(1)) {
                let ids: Vec<i32> = chunk.iter().map(|(id, _)| *id).collect();
                let scores: Vec<f64> = chunk.iter().map(|(_, s)| *s).collect();
                written += db.client().execute(&stmt, &[&ids, &scores])?;
                pb.inc(chunk.len() as u64);
            }
        }
    }
    pb.finish("sentiment scored");
    Ok(written)
}
