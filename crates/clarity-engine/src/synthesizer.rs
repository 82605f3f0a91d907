//! Extractive answers from the ranked candidates.
//!
//! The question is routed through a fixed decision table
//! ([`QuestionIntent`]). Ownership and decision questions quote the first
//! ranked message that carries a matching signal; everything else stitches
//! the two best messages together.

use clarity_types::models::Message;
use serde::Serialize;
use tracing::debug;

use crate::decimal::round_half_up;
use crate::ranker::ScoredCandidate;

pub const FALLBACK_ANSWER: &str = "I could not find enough recent or pinned signal in chat. \
     Try widening the time window or pinning the messages that matter.";

const TREND_POINTS: usize = 5;
const HIGH_CONFIDENCE_ABOVE: f64 = 0.4;
const MEDIUM_CONFIDENCE_ABOVE: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    /// Bucket the best score. Both thresholds are exclusive.
    pub fn from_score(score: f64) -> Self {
        if score > HIGH_CONFIDENCE_ABOVE {
            Self::High
        } else if score > MEDIUM_CONFIDENCE_ABOVE {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// One point of the relevance trend. `value` is the score doubled and
/// capped at 1 for display; it is not a probability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    #[serde(rename = "x")]
    pub label: String,
    #[serde(rename = "y")]
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Synthesis {
    pub answer: String,
    pub confidence: Confidence,
    pub trend: Vec<TrendPoint>,
    /// The answer shape actually used. `Generic` when no message carried the
    /// signal the question asked for.
    pub intent: QuestionIntent,
}

impl Synthesis {
    pub fn fallback() -> Self {
        Self {
            answer: FALLBACK_ANSWER.to_string(),
            confidence: Confidence::Low,
            trend: Vec::new(),
            intent: QuestionIntent::Generic,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionIntent {
    /// "who owns ...", "... owner"
    Ownership,
    /// "what did we decide ...", "... decision", "... resolved"
    Decision,
    Generic,
}

impl QuestionIntent {
    /// Intents that quote a message, in the order they are tried.
    const QUOTED: [QuestionIntent; 2] = [Self::Ownership, Self::Decision];

    /// The first quoted intent the question asks for, or `Generic`.
    pub fn classify(question: &str) -> Self {
        let lowered = question.to_lowercase();
        Self::QUOTED
            .into_iter()
            .find(|intent| intent.asked_by(&lowered))
            .unwrap_or(Self::Generic)
    }

    /// Whether an already lower-cased question asks for this intent.
    /// Never true for `Generic`.
    pub fn asked_by(self, lowered_question: &str) -> bool {
        self.question_cues()
            .iter()
            .any(|cue| lowered_question.contains(cue))
    }

    /// Whether an already lower-cased message text answers this intent.
    pub fn signalled_by(self, lowered_text: &str) -> bool {
        self.signal_cues().iter().any(|cue| lowered_text.contains(cue))
    }

    fn question_cues(self) -> &'static [&'static str] {
        match self {
            Self::Ownership => &["who owns", "owner"],
            Self::Decision => &["what did we decide", "decision", "resolved"],
            Self::Generic => &[],
        }
    }

    fn signal_cues(self) -> &'static [&'static str] {
        match self {
            // "decisio" catches decision/decisions/decisiones
            Self::Ownership => &["owner", "owns", "ownership", "decisio"],
            Self::Decision => &["decision", "final call", "resolved", "made"],
            Self::Generic => &[],
        }
    }
}

/// Build the answer, confidence and trend for an already ranked `top`.
pub fn synthesize(question: &str, top: &[ScoredCandidate]) -> Synthesis {
    let Some(best) = top.first() else {
        return Synthesis::fallback();
    };

    let lowered = question.to_lowercase();
    let lead = format!("Based on {} high-signal chat messages, ", top.len());

    let quoted = quoted_source(&lowered, top);
    let intent = quoted.map_or(QuestionIntent::Generic, |(intent, _)| intent);

    let answer = match quoted {
        Some((QuestionIntent::Ownership, source)) => {
            debug!(id = source.id, "quoting ownership update");
            format!("{lead}the latest ownership update is: \"{}\"", source.text)
        }
        Some((QuestionIntent::Decision, source)) => {
            debug!(id = source.id, "quoting decision");
            format!("{lead}the most relevant decision appears to be: \"{}\"", source.text)
        }
        Some((QuestionIntent::Generic, _)) | None => {
            let joined = top
                .iter()
                .take(2)
                .map(|c| c.message.text.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            format!("{lead}here is the current synthesis: {joined}.")
        }
    };

    Synthesis {
        answer,
        confidence: Confidence::from_score(best.score),
        trend: trend(top),
        intent,
    }
}

/// Walk the quoted intents in order; the first one the question asks for
/// that also has a signalling message wins.
fn quoted_source<'a>(
    lowered_question: &str,
    top: &'a [ScoredCandidate],
) -> Option<(QuestionIntent, &'a Message)> {
    QuestionIntent::QUOTED
        .into_iter()
        .filter(|intent| intent.asked_by(lowered_question))
        .find_map(|intent| {
            top.iter()
                .map(|c| &c.message)
                .find(|m| intent.signalled_by(&m.text.to_lowercase()))
                .map(|m| (intent, m))
        })
}

fn trend(top: &[ScoredCandidate]) -> Vec<TrendPoint> {
    top.iter()
        .take(TREND_POINTS)
        .map(|c| TrendPoint {
            label: c.message.timestamp.format("%H:%M").to_string(),
            value: round_half_up(c.score * 2.0, 2).min(1.0),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn scored(id: i64, text: &str, score: f64) -> ScoredCandidate {
        ScoredCandidate {
            message: Message {
                id,
                channel: "general".into(),
                user: "Lena".into(),
                text: text.into(),
                timestamp: Utc.with_ymd_and_hms(2026, 3, 14, 9, 5 + id as u32, 0).unwrap(),
                pinned: false,
            },
            score,
        }
    }

    #[test]
    fn empty_top_falls_back() {
        let s = synthesize("who owns the checklist", &[]);
        assert_eq!(s.confidence, Confidence::Low);
        assert_eq!(s.answer, FALLBACK_ANSWER);
        assert!(!s.answer.is_empty());
        assert!(s.trend.is_empty());
    }

    #[test]
    fn confidence_boundaries_are_exclusive() {
        assert_eq!(Confidence::from_score(0.41), Confidence::High);
        assert_eq!(Confidence::from_score(0.4), Confidence::Medium);
        assert_eq!(Confidence::from_score(0.21), Confidence::Medium);
        assert_eq!(Confidence::from_score(0.2), Confidence::Low);
        assert_eq!(Confidence::from_score(0.0), Confidence::Low);
        assert_eq!(Confidence::from_score(1.2), Confidence::High);
    }

    #[test]
    fn classify_follows_the_decision_table() {
        assert_eq!(QuestionIntent::classify("Who owns Monte Carlo reruns?"), QuestionIntent::Ownership);
        assert_eq!(QuestionIntent::classify("owner of the runbook"), QuestionIntent::Ownership);
        assert_eq!(QuestionIntent::classify("What did we decide on tanks?"), QuestionIntent::Decision);
        assert_eq!(QuestionIntent::classify("was the anomaly RESOLVED"), QuestionIntent::Decision);
        assert_eq!(QuestionIntent::classify("when is the thermal test"), QuestionIntent::Generic);
        // both cues present: ownership wins
        assert_eq!(QuestionIntent::classify("who owns the decision"), QuestionIntent::Ownership);
    }

    #[test]
    fn signals_match_substrings() {
        assert!(QuestionIntent::Ownership.signalled_by("decisions are final"));
        assert!(QuestionIntent::Decision.signalled_by("final call: thursday"));
        assert!(QuestionIntent::Decision.signalled_by("decision made: priya"));
        assert!(!QuestionIntent::Ownership.signalled_by("tank pressure limits unchanged"));
        assert!(!QuestionIntent::Generic.signalled_by("anything"));
        assert!(!QuestionIntent::Generic.asked_by("anything"));
    }

    #[test]
    fn ownership_question_quotes_first_signalling_message() {
        let top = vec![
            scored(1, "Cross-team note about telemetry.", 0.5),
            scored(2, "Final call: thermal tests due Thursday, owner is Lena.", 0.3),
            scored(3, "Decision made: Priya owns guidance signoff.", 0.2),
        ];

        let s = synthesize("Who owns the thermal tests?", &top);
        assert_eq!(
            s.answer,
            "Based on 3 high-signal chat messages, the latest ownership update is: \
             \"Final call: thermal tests due Thursday, owner is Lena.\""
        );
        assert_eq!(s.confidence, Confidence::High);
    }

    #[test]
    fn ownership_without_signal_falls_through_to_decision() {
        let top = vec![
            scored(1, "We resolved injector anomaly by switching to rev-C manifold.", 0.3),
            scored(2, "Tank pressure limits unchanged.", 0.1),
        ];

        let s = synthesize("owner of the resolved anomaly?", &top);
        assert_eq!(
            s.answer,
            "Based on 2 high-signal chat messages, the most relevant decision appears to be: \
             \"We resolved injector anomaly by switching to rev-C manifold.\""
        );
        assert_eq!(s.confidence, Confidence::Medium);
    }

    #[test]
    fn unmatched_signal_uses_generic_synthesis() {
        let top = vec![
            scored(1, "Tank pressure limits unchanged.", 0.15),
            scored(2, "Only sensor offsets changed.", 0.1),
            scored(3, "Ignored third message.", 0.05),
        ];

        let s = synthesize("what did we decide about tanks", &top);
        assert_eq!(
            s.answer,
            "Based on 3 high-signal chat messages, here is the current synthesis: \
             Tank pressure limits unchanged. Only sensor offsets changed.."
        );
        assert_eq!(s.confidence, Confidence::Low);
    }

    #[test]
    fn generic_with_one_candidate() {
        let s = synthesize("thermal schedule", &[scored(1, "Thermal tests Thursday", 0.3)]);
        assert_eq!(
            s.answer,
            "Based on 1 high-signal chat messages, here is the current synthesis: Thermal tests Thursday."
        );
    }

    #[test]
    fn trend_is_capped_labelled_and_amplified() {
        let top: Vec<ScoredCandidate> = (0..6)
            .map(|i| scored(i, "text", [0.6, 0.123, 0.3, 0.2, 0.1, 0.05][i as usize]))
            .collect();

        let s = synthesize("anything", &top);
        assert_eq!(s.trend.len(), 5);
        assert_eq!(s.trend[0], TrendPoint { label: "09:05".into(), value: 1.0 });
        assert_eq!(s.trend[1], TrendPoint { label: "09:06".into(), value: 0.25 });
        assert_eq!(s.trend[2].value, 0.6);
        assert_eq!(s.trend[4].label, "09:09");

        let short = synthesize("anything", &top[..2]);
        assert_eq!(short.trend.len(), 2);
    }

    #[test]
    fn trend_value_rounds_halfway_scores_like_to_fixed() {
        // 0.0075 * 2 is stored just under 0.015
        let s = synthesize("anything", &[scored(1, "text", 0.0075)]);
        assert_eq!(s.trend[0].value, 0.01);
    }

    #[test]
    fn intent_records_the_branch_taken() {
        let top = [scored(1, "Thermal tests Thursday", 0.5)];
        assert_eq!(QuestionIntent::classify("who owns thermal"), QuestionIntent::Ownership);
        assert_eq!(synthesize("who owns thermal", &top).intent, QuestionIntent::Generic);

        let top = [scored(2, "Decision made: Priya owns signoff", 0.5)];
        assert_eq!(synthesize("who owns signoff", &top).intent, QuestionIntent::Ownership);
        assert_eq!(synthesize("anything", &[]).intent, QuestionIntent::Generic);
    }

    #[test]
    fn trend_serializes_as_xy() {
        let json = serde_json::to_value(TrendPoint { label: "10:30".into(), value: 0.5 }).unwrap();
        assert_eq!(json, serde_json::json!({"x": "10:30", "y": 0.5}));
        assert_eq!(serde_json::to_value(Confidence::Medium).unwrap(), "medium");
    }
}
