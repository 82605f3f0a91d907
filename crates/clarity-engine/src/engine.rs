use chrono::{DateTime, Utc};
use clarity_types::models::Message;
use serde::Serialize;
use tracing::debug;

use crate::error::EngineError;
use crate::ranker::{RankParams, ScoredCandidate, rank_with};
use crate::synthesizer::{Confidence, TrendPoint, synthesize};

/// Everything one ask produces. Serializes to the response body of the ask
/// endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    pub answer: String,
    pub confidence: Confidence,
    pub trend: Vec<TrendPoint>,
    pub sources: Vec<ScoredCandidate>,
}

impl RankedResult {
    /// Ids of the sources in rank order, for the pulse event.
    pub fn source_ids(&self) -> Vec<i64> {
        self.sources.iter().map(|c| c.message.id).collect()
    }
}

/// Answer `question` from a snapshot of `candidates` as of `now`.
pub fn answer(
    question: &str,
    candidates: &[Message],
    now: DateTime<Utc>,
    max_age_hours: f64,
) -> Result<RankedResult, EngineError> {
    answer_with(question, candidates, now, &RankParams::with_max_age_hours(max_age_hours))
}

pub fn answer_with(
    question: &str,
    candidates: &[Message],
    now: DateTime<Utc>,
    params: &RankParams,
) -> Result<RankedResult, EngineError> {
    let sources = rank_with(question, candidates, now, params)?;
    let synthesis = synthesize(question, &sources);

    debug!(
        candidates = candidates.len(),
        sources = sources.len(),
        intent = ?synthesis.intent,
        confidence = ?synthesis.confidence,
        max_age_hours = params.max_age_hours,
        "answered question"
    );

    Ok(RankedResult {
        answer: synthesis.answer,
        confidence: synthesis.confidence,
        trend: synthesis.trend,
        sources,
    })
}
