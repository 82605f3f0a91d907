//! Retrieval and answer synthesis over a snapshot of chat messages.
//!
//! ```text
//! question ─▶ tokenize ─▶ vectorize ─┐
//!                                    ├─▶ similarity ─▶ rank ─▶ synthesize ─▶ RankedResult
//! message  ─▶ tokenize ─▶ vectorize ─┘
//! ```
//!
//! Everything here is pure and synchronous. Callers pass the candidate
//! snapshot and the current instant into every call, so the same inputs
//! always produce the same result.

mod decimal;
pub mod engine;
pub mod error;
pub mod ranker;
pub mod similarity;
pub mod synthesizer;
pub mod text;

pub use engine::{RankedResult, answer, answer_with};
pub use error::EngineError;
pub use ranker::{RankParams, ScoredCandidate, rank, rank_with};
pub use similarity::similarity;
pub use synthesizer::{Confidence, QuestionIntent, Synthesis, TrendPoint, synthesize};
pub use text::{TermVector, tokenize, vectorize};
