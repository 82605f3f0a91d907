use std::collections::BTreeMap;
use std::collections::btree_map;

/// Tokens this short or shorter carry no signal ("a", "is", "on").
const MIN_TOKEN_LEN: usize = 3;

/// Normalize free text into index terms.
///
/// Lower-cases, replaces anything outside `[a-z0-9]` and whitespace with a
/// space, splits on whitespace runs and drops tokens shorter than three
/// characters.
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    normalized
        .split_whitespace()
        .filter(|token| token.len() >= MIN_TOKEN_LEN)
        .map(str::to_owned)
        .collect()
}

/// Sparse term-frequency vector.
///
/// Keys are kept sorted so dot products and norms sum in the same order no
/// matter which side of a comparison a vector is on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermVector {
    counts: BTreeMap<String, u32>,
}

impl TermVector {
    pub fn get(&self, term: &str) -> u32 {
        self.counts.get(term).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, u32> {
        self.counts.iter()
    }

    /// Euclidean norm.
    pub fn magnitude(&self) -> f64 {
        self.counts
            .values()
            .map(|&c| f64::from(c) * f64::from(c))
            .sum::<f64>()
            .sqrt()
    }

    /// Dot product over the shared terms. Terms missing on either side
    /// contribute zero.
    pub fn dot(&self, other: &TermVector) -> f64 {
        let mut lhs = self.counts.iter().peekable();
        let mut rhs = other.counts.iter().peekable();
        let mut sum = 0.0;

        while let (Some((lk, lv)), Some((rk, rv))) = (lhs.peek(), rhs.peek()) {
            match lk.cmp(rk) {
                std::cmp::Ordering::Less => {
                    lhs.next();
                }
                std::cmp::Ordering::Greater => {
                    rhs.next();
                }
                std::cmp::Ordering::Equal => {
                    sum += f64::from(**lv) * f64::from(**rv);
                    lhs.next();
                    rhs.next();
                }
            }
        }

        sum
    }
}

impl<S: Into<String>> FromIterator<S> for TermVector {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut counts = BTreeMap::new();
        for token in iter {
            *counts.entry(token.into()).or_insert(0) += 1;
        }
        Self { counts }
    }
}

/// Count occurrences of each token.
pub fn vectorize<I, S>(tokens: I) -> TermVector
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    tokens.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_has_no_tokens() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("?!... --- ###").is_empty());
    }

    #[test]
    fn short_tokens_are_dropped() {
        assert_eq!(tokenize("ab cde f"), vec!["cde"]);
    }

    #[test]
    fn punctuation_splits_and_case_folds() {
        assert_eq!(
            tokenize("Decision: Ops owns hot-fire CHECKLIST."),
            vec!["decision", "ops", "owns", "hot", "fire", "checklist"]
        );
    }

    #[test]
    fn digits_survive_and_underscores_split() {
        assert_eq!(tokenize("rev_C manifold v2024"), vec!["rev", "manifold", "v2024"]);
    }

    #[test]
    fn counts_are_exact() {
        let v = vectorize(["a", "a", "b"]);
        assert_eq!(v.get("a"), 2);
        assert_eq!(v.get("b"), 1);
        assert_eq!(v.get("c"), 0);
        assert_eq!(v.len(), 2);
    }

    #[test]
    fn empty_tokens_give_empty_vector() {
        let v = vectorize(Vec::<String>::new());
        assert!(v.is_empty());
        assert_eq!(v.magnitude(), 0.0);
    }

    #[test]
    fn dot_only_counts_shared_terms() {
        let a = vectorize(["ops", "ops", "checklist"]);
        let b = vectorize(["ops", "lunch"]);
        assert_eq!(a.dot(&b), 2.0);
        assert_eq!(b.dot(&a), 2.0);
        assert_eq!(a.magnitude(), 5f64.sqrt());
    }
}
