//! Static data for the sentiment model: word valences on a [-4, 4] scale, intensity
//! modifiers, and negation cues.
//!
//! The valence table is the VADER lexicon (C.J. Hutto, MIT, see
//! `resources/LICENSE-VADER.txt`), one `word<TAB>mean valence` pair per line.

const VADER_LEXICON: &str = include_str!("../resources/vader_lexicon.txt");

/// Every `(token, valence)` pair of the embedded lexicon. Malformed lines are skipped.
pub fn valences() -> impl Iterator<Item = (&'static str, f64)> {
    VADER_LEXICON.lines().filter_map(|line| {
        let mut cols = line.split('\t');
        let token = cols.next()?;
        let valence = cols.next()?.trim().parse().ok()?;
        Some((token, valence))
    })
}

/// Words that scale the valence of the word they precede.
pub const BOOSTERS: &[(&str, f64)] = &[
    ("absolutely", B_INCR), ("amazingly", B_INCR), ("awfully", B_INCR), ("completely", B_INCR),
    ("considerably", B_INCR), ("decidedly", B_INCR), ("deeply", B_INCR), ("effing", B_INCR),
    ("enormously", B_INCR), ("entirely", B_INCR), ("especially", B_INCR), ("exceptionally", B_INCR),
    ("extremely", B_INCR), ("fabulously", B_INCR), ("flipping", B_INCR), ("fucking", B_INCR),
    ("fully", B_INCR), ("greatly", B_INCR), ("hella", B_INCR), ("highly", B_INCR),
    ("hugely", B_INCR), ("incredibly", B_INCR), ("intensely", B_INCR), ("majorly", B_INCR),
    ("more", B_INCR), ("most", B_INCR), ("particularly", B_INCR), ("purely", B_INCR),
    ("quite", B_INCR), ("really", B_INCR), ("remarkably", B_INCR), ("so", B_INCR),
    ("substantially", B_INCR), ("thoroughly", B_INCR), ("totally", B_INCR), ("tremendously", B_INCR),
    ("uber", B_INCR), ("unbelievably", B_INCR), ("unusually", B_INCR), ("utterly", B_INCR),
    ("very", B_INCR),
    ("almost", B_DECR), ("barely", B_DECR), ("hardly", B_DECR), ("kinda", B_DECR),
    ("kindof", B_DECR), ("less", B_DECR), ("little", B_DECR), ("marginally", B_DECR),
    ("occasionally", B_DECR), ("partly", B_DECR), ("scarcely", B_DECR), ("slightly", B_DECR),
    ("somewhat", B_DECR), ("sorta", B_DECR), ("sortof", B_DECR),
];

pub const NEGATIONS: &[&str] = &[
    "aint", "arent", "cannot", "cant", "couldnt", "darent", "didnt", "doesnt",
    "ain't", "aren't", "can't", "couldn't", "daren't", "didn't", "doesn't",
    "dont", "hadnt", "hasnt", "havent", "isnt", "mightnt", "mustnt", "neither",
    "don't", "hadn't", "hasn't", "haven't", "isn't", "mightn't", "mustn't",
    "neednt", "needn't", "never", "none", "nope", "nor", "not", "nothing", "nowhere",
    "oughtnt", "shant", "shouldnt", "uhuh", "wasnt", "werent",
    "oughtn't", "shan't", "shouldn't", "uh-uh", "wasn't", "weren't",
    "without", "wont", "wouldnt", "won't", "wouldn't", "rarely", "seldom", "despite",
];

/// Booster increment and dampener decrement.
pub const B_INCR: f64 = 0.293;
pub const B_DECR: f64 = -0.293;
/// Added to a word's valence when it is shouted in otherwise mixed-case text.
pub const C_INCR: f64 = 0.733;
/// Multiplier applied to a negated valence.
pub const N_SCALAR: f64 = -0.74;
