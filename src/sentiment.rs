//! Lexicon and rule based sentiment scoring.
//!
//! Each token gets a valence from the lexicon, adjusted by the three tokens before it
//! (boosters, dampeners, negations), by ALL-CAPS emphasis, and by a contrastive "but".
//! The sum is amplified by trailing `!`/`?` and squashed into [-1, 1].

use crate::lexicon::{valences, BOOSTERS, C_INCR, NEGATIONS, N_SCALAR};
use std::collections::{HashMap, HashSet};

/// Normalization constant: approximates the max expected raw sum.
const ALPHA: f64 = 15.0;
const PUNCTUATION: &[char] = &[
    '!', '"', '#', '$', '%', '&', '\'', '(', ')', '*', '+', ',', '-', '.', '/', ':', ';', '<',
    '=', '>', '?', '@', '[', '\\', ']', '^', '_', '`', '{', '|', '}', '~',
];

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PolarityScores {
    pub neg: f64,
    pub neu: f64,
    pub pos: f64,
    pub compound: f64,
}

#[derive(Clone, Debug)]
pub struct SentimentAnalyzer {
    lexicon: HashMap<&'static str, f64>,
    boosters: HashMap<&'static str, f64>,
    negations: HashSet<&'static str>,
}

impl Default for SentimentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Python-style `isupper`: at least one cased letter and no lowercase ones.
fn is_upper(s: &str) -> bool {
    s.chars().any(char::is_alphabetic) && !s.chars().any(char::is_lowercase)
}

/// Strip surrounding punctuation unless that would leave two characters or fewer
/// (keeps emoticons like `:)` intact).
fn strip_punct_if_word(token: &str) -> &str {
    let stripped = token.trim_matches(PUNCTUATION);
    if stripped.chars().count() <= 2 {
        token
    } else {
        stripped
    }
}

pub fn normalize(score: f64) -> f64 {
    (score / (score * score + ALPHA).sqrt()).clamp(-1.0, 1.0)
}

fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

fn punctuation_emphasis(text: &str) -> f64 {
    let ep = text.matches('!').count().min(4) as f64 * 0.292;
    let qm = match text.matches('?').count() {
        n if n > 3 => 0.96,
        n if n > 1 => n as f64 * 0.18,
        _ => 0.0,
    };
    ep + qm
}

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self {
            lexicon: valences().collect(),
            boosters: BOOSTERS.iter().copied().collect(),
            negations: NEGATIONS.iter().copied().collect(),
        }
    }

    /// Compound score in [-1, 1]; blank text is exactly neutral.
    pub fn compound(&self, text: &str) -> f64 {
        self.polarity_scores(text).compound
    }

    /// Null, empty and whitespace-only bodies score 0.
    pub fn score_body(&self, body: Option<&str>) -> f64 {
        match body {
            Some(text) if !text.trim().is_empty() => self.compound(text),
            _ => 0.0,
        }
    }

    pub fn polarity_scores(&self, text: &str) -> PolarityScores {
        let tokens: Vec<&str> = text
            .split_whitespace()
            .map(strip_punct_if_word)
            .filter(|w| w.chars().count() > 1)
            .collect();
        if tokens.is_empty() {
            return PolarityScores::default();
        }
        let lower: Vec<String> = tokens.iter().map(|w| w.to_lowercase()).collect();
        let upper_count = tokens.iter().filter(|w| is_upper(w)).count();
        let cap_diff = upper_count > 0 && upper_count < tokens.len();

        let mut sentiments = Vec::with_capacity(tokens.len());
        for i in 0..tokens.len() {
            let w = lower[i].as_str();
            if self.boosters.contains_key(w) || (w == "kind" && lower.get(i + 1).map(String::as_str) == Some("of")) {
                sentiments.push(0.0);
                continue;
            }
            sentiments.push(self.valence_at(&tokens, &lower, i, cap_diff));
        }

        but_check(&lower, &mut sentiments);
        self.score_valence(&sentiments, text)
    }

    fn valence_at(&self, tokens: &[&str], lower: &[String], i: usize, cap_diff: bool) -> f64 {
        let Some(&base) = self.lexicon.get(lower[i].as_str()) else {
            return 0.0;
        };
        // "no" directly before another sentiment word is a negation, not a valence.
        if lower[i] == "no" && lower.get(i + 1).is_some_and(|n| self.lexicon.contains_key(n.as_str())) {
            return 0.0;
        }
        let mut valence = base;
        // "no" up to two tokens back, or three back across "or"/"nor".
        let no_at = |k: usize| i >= k && lower[i - k] == "no";
        if no_at(1) || no_at(2) || (no_at(3) && matches!(lower[i - 1].as_str(), "or" | "nor")) {
            valence *= N_SCALAR;
        }
        if cap_diff && is_upper(tokens[i]) {
            valence += if valence > 0.0 { C_INCR } else { -C_INCR };
        }

        for start in 0..3 {
            if i <= start {
                break;
            }
            let prev = lower[i - start - 1].as_str();
            if !self.lexicon.contains_key(prev) {
                let mut s = self.scalar_inc_dec(tokens[i - start - 1], prev, valence, cap_diff);
                if start == 1 {
                    s *= 0.95;
                } else if start == 2 {
                    s *= 0.9;
                }
                valence += s;
                valence = self.negation_check(valence, lower, start, i);
            }
        }
        self.least_check(valence, lower, i)
    }

    fn scalar_inc_dec(&self, raw: &str, word: &str, valence: f64, cap_diff: bool) -> f64 {
        let Some(&b) = self.boosters.get(word) else {
            return 0.0;
        };
        let mut scalar = if valence < 0.0 { -b } else { b };
        if cap_diff && is_upper(raw) {
            scalar += if valence > 0.0 { C_INCR } else { -C_INCR };
        }
        scalar
    }

    fn negated(&self, word: &str) -> bool {
        self.negations.contains(word) || word.contains("n't")
    }

    fn negation_check(&self, valence: f64, lower: &[String], start: usize, i: usize) -> f64 {
        let at = |k: usize| lower[i - k].as_str();
        let so_this = |w: &str| w == "so" || w == "this";
        match start {
            0 if self.negated(at(1)) => valence * N_SCALAR,
            1 if at(2) == "never" && so_this(at(1)) => valence * 1.25,
            1 if at(2) == "without" && at(1) == "doubt" => valence,
            1 if self.negated(at(2)) => valence * N_SCALAR,
            2 if at(3) == "never" && (so_this(at(2)) || so_this(at(1))) => valence * 1.25,
            2 if at(3) == "without" && (at(2) == "doubt" || at(1) == "doubt") => valence,
            2 if self.negated(at(3)) => valence * N_SCALAR,
            _ => valence,
        }
    }

    fn least_check(&self, valence: f64, lower: &[String], i: usize) -> f64 {
        if i > 0 && lower[i - 1] == "least" && !self.lexicon.contains_key("least") {
            if i > 1 && (lower[i - 2] == "at" || lower[i - 2] == "very") {
                return valence;
            }
            return valence * N_SCALAR;
        }
        valence
    }

    fn score_valence(&self, sentiments: &[f64], text: &str) -> PolarityScores {
        let emphasis = punctuation_emphasis(text);
        let mut sum: f64 = sentiments.iter().sum();
        if sum > 0.0 {
            sum += emphasis;
        } else if sum < 0.0 {
            sum -= emphasis;
        }
        let compound = round4(normalize(sum));

        let (mut pos, mut neg, mut neu) = (0.0f64, 0.0f64, 0.0f64);
        for &s in sentiments {
            if s > 0.0 {
                pos += s + 1.0;
            } else if s < 0.0 {
                neg += s - 1.0;
            } else {
                neu += 1.0;
            }
        }
        if pos > neg.abs() {
            pos += emphasis;
        } else if pos < neg.abs() {
            neg -= emphasis;
        }
        let total = pos + neg.abs() + neu;
        if total == 0.0 {
            return PolarityScores::default();
        }
        PolarityScores {
            neg: round4((neg / total).abs()),
            neu: round4((neu / total).abs()),
            pos: round4((pos / total).abs()),
            compound,
        }
    }
}

/// Words before the first "but" count half, words after it one and a half.
fn but_check(lower: &[String], sentiments: &mut [f64]) {
    if let Some(bi) = lower.iter().position(|w| w == "but") {
        for (idx, s) in sentiments.iter_mut().enumerate() {
            if idx < bi {
                *s *= 0.5;
            } else if idx > bi {
                *s *= 1.5;
            }
        }
    }
}
