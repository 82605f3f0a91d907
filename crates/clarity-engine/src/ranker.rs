//! Relevance ranking: lexical similarity weighted by recency and pins.
//!
//! ```text
//! score = semantic × recency × pin
//! semantic = cosine(question, "{channel} {user} {text}")
//! recency  = max(0.1, 1 − age_hours / max_age_hours)
//! pin      = 1.2 if pinned else 1.0
//! ```
//!
//! Unpinned messages older than the window are cut before scoring. Scores
//! are relevance weights, not probabilities: a fresh pinned exact match
//! scores 1.2.

use chrono::{DateTime, Utc};
use clarity_types::models::Message;
use serde::{Serialize, Serializer};

use crate::decimal::round_half_up;
use crate::error::EngineError;
use crate::similarity::similarity;
use crate::text::{TermVector, tokenize, vectorize};

pub const DEFAULT_MAX_AGE_HOURS: f64 = 72.0;
pub const DEFAULT_NOISE_FLOOR: f64 = 0.01;
pub const DEFAULT_TOP_K: usize = 6;

const RECENCY_FLOOR: f64 = 0.1;
const PIN_BOOST: f64 = 1.2;
const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Ranking knobs. Only the window normally varies per query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankParams {
    /// Age cutoff for unpinned messages, and the span of the recency decay.
    pub max_age_hours: f64,
    /// Candidates scoring at or below this are dropped.
    pub noise_floor: f64,
    /// Maximum number of candidates returned.
    pub top_k: usize,
}

impl Default for RankParams {
    fn default() -> Self {
        Self {
            max_age_hours: DEFAULT_MAX_AGE_HOURS,
            noise_floor: DEFAULT_NOISE_FLOOR,
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl RankParams {
    pub fn with_max_age_hours(max_age_hours: f64) -> Self {
        Self {
            max_age_hours,
            ..Default::default()
        }
    }
}

/// A message annotated with its score for one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate {
    #[serde(flatten)]
    pub message: Message,
    #[serde(serialize_with = "serialize_score")]
    pub score: f64,
}

fn serialize_score<S: Serializer>(score: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round_half_up(*score, 3))
}

/// Rank `candidates` against `question` with the default noise floor and top-K.
pub fn rank(
    question: &str,
    candidates: &[Message],
    now: DateTime<Utc>,
    max_age_hours: f64,
) -> Result<Vec<ScoredCandidate>, EngineError> {
    rank_with(question, candidates, now, &RankParams::with_max_age_hours(max_age_hours))
}

/// Score every candidate, drop noise, and return the best `top_k` in
/// descending score order. Equal scores keep their input order.
pub fn rank_with(
    question: &str,
    candidates: &[Message],
    now: DateTime<Utc>,
    params: &RankParams,
) -> Result<Vec<ScoredCandidate>, EngineError> {
    if params.max_age_hours.is_nan() {
        return Err(EngineError::InvalidWindow);
    }
    validate_candidates(candidates)?;

    let question_vec = vectorize(tokenize(question));

    let mut scored: Vec<ScoredCandidate> = candidates
        .iter()
        .filter_map(|message| {
            let score = score_message(&question_vec, message, now, params.max_age_hours);
            (score > params.noise_floor).then(|| ScoredCandidate {
                message: message.clone(),
                score,
            })
        })
        .collect();

    // sort_by is stable
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(params.top_k);

    Ok(scored)
}

/// Score a single message. Returns exactly 0 for unpinned messages outside
/// the window.
pub fn score_message(
    question: &TermVector,
    message: &Message,
    now: DateTime<Utc>,
    max_age_hours: f64,
) -> f64 {
    let age = age_hours(now, message.timestamp);
    if !message.pinned && is_stale(age, max_age_hours) {
        return 0.0;
    }

    let document = vectorize(tokenize(&format!(
        "{} {} {}",
        message.channel, message.user, message.text
    )));

    let semantic = similarity(question, &document);
    semantic * recency_boost(age, max_age_hours) * pin_boost(message.pinned)
}

/// Linear decay over the window, floored at 0.1. A non-positive window
/// counts as maximally stale.
pub fn recency_boost(age_hours: f64, max_age_hours: f64) -> f64 {
    if max_age_hours <= 0.0 {
        return RECENCY_FLOOR;
    }
    (1.0 - age_hours / max_age_hours).max(RECENCY_FLOOR)
}

fn pin_boost(pinned: bool) -> f64 {
    if pinned { PIN_BOOST } else { 1.0 }
}

fn is_stale(age_hours: f64, max_age_hours: f64) -> bool {
    max_age_hours <= 0.0 || age_hours > max_age_hours
}

fn age_hours(now: DateTime<Utc>, timestamp: DateTime<Utc>) -> f64 {
    (now - timestamp).num_milliseconds() as f64 / MILLIS_PER_HOUR
}

fn validate_candidates(candidates: &[Message]) -> Result<(), EngineError> {
    for message in candidates {
        if message.channel.is_empty() {
            return Err(EngineError::InvalidCandidate {
                id: message.id,
                field: "channel",
            });
        }
        if message.user.is_empty() {
            return Err(EngineError::InvalidCandidate {
                id: message.id,
                field: "user",
            });
        }
    }
    Ok(())
}
