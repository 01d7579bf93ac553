//! Synthetic replacement values

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use thiserror::Error;

const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const LOWERCASE_ALNUM: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

pub const DEFAULT_NAMES: &[&str] = &[
    "Alex", "Jordan", "Taylor", "Morgan", "Casey", "Sam", "Jamie", "Riley", "Quinn", "Avery",
];

pub const DEFAULT_WORDS: &[&str] = &[
    "Improve", "Refactor", "Fix", "Update", "Add", "Remove", "Test", "Clean", "Document", "Review",
];

const PHRASE_WORDS: usize = 3;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum VocabularyError {
    #[error("Vocabulary list '{0}' must not be empty")]
    Empty(&'static str),
}

/// Placeholder names and phrase words the generator draws from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    names: Vec<String>,
    words: Vec<String>,
}

impl Vocabulary {
    pub fn new(names: Vec<String>, words: Vec<String>) -> Result<Self, VocabularyError> {
        if names.is_empty() {
            return Err(VocabularyError::Empty("names"));
        }
        if words.is_empty() {
            return Err(VocabularyError::Empty("words"));
        }
        Ok(Self { names, words })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            names: DEFAULT_NAMES.iter().map(|s| s.to_string()).collect(),
            words: DEFAULT_WORDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Produces well-formed stand-ins for sensitive values.
///
/// Calls are independent: the same real value is not mapped to the same
/// synthetic one twice. Each generator owns its RNG, so generators on
/// different threads never share state.
pub struct SyntheticGenerator {
    vocabulary: Vocabulary,
    rng: StdRng,
}

impl SyntheticGenerator {
    pub fn from_entropy(vocabulary: Vocabulary) -> Self {
        Self {
            vocabulary,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic generator for reproducible output
    pub fn seeded(vocabulary: Vocabulary, seed: u64) -> Self {
        Self {
            vocabulary,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// `<8 lowercase>@<5 lowercase>.com`
    pub fn email(&mut self) -> String {
        let local = self.sample(LOWERCASE, 8);
        let domain = self.sample(LOWERCASE, 5);
        format!("{}@{}.com", local, domain)
    }

    /// `https://<10 alnum>.com/a/b/c/d/e`
    pub fn url(&mut self) -> String {
        let host = self.token(10);
        let path: Vec<String> = (0..5).map(|_| self.sample(LOWERCASE, 1)).collect();
        format!("https://{}.com/{}", host, path.join("/"))
    }

    /// Opaque lowercase alphanumeric token
    pub fn token(&mut self, len: usize) -> String {
        self.sample(LOWERCASE_ALNUM, len)
    }

    pub fn display_name(&mut self) -> String {
        pick(&mut self.rng, &self.vocabulary.names, None)
    }

    /// Three vocabulary words joined by spaces
    pub fn phrase(&mut self) -> String {
        let words: Vec<String> = (0..PHRASE_WORDS)
            .map(|_| pick(&mut self.rng, &self.vocabulary.words, None))
            .collect();
        words.join(" ")
    }

    /// Like [`display_name`](Self::display_name) but never returns `original`
    /// while the vocabulary holds any other name.
    pub fn display_name_unlike(&mut self, original: &str) -> String {
        pick(&mut self.rng, &self.vocabulary.names, Some(original))
    }

    /// Like [`phrase`](Self::phrase) but never returns `original` while the
    /// vocabulary holds more than one distinct word.
    pub fn phrase_unlike(&mut self, original: &str) -> String {
        let mut words: Vec<String> = (0..PHRASE_WORDS)
            .map(|_| pick(&mut self.rng, &self.vocabulary.words, None))
            .collect();
        if words.join(" ") == original {
            let first = words[0].clone();
            words[0] = pick(&mut self.rng, &self.vocabulary.words, Some(first.as_str()));
        }
        words.join(" ")
    }

    fn sample(&mut self, alphabet: &[u8], len: usize) -> String {
        (0..len)
            .map(|_| alphabet[self.rng.random_range(0..alphabet.len())] as char)
            .collect()
    }
}

/// Uniform choice, skipping `avoid` unless it is the only option left
fn pick(rng: &mut StdRng, list: &[String], avoid: Option<&str>) -> String {
    let candidates: Vec<&String> = match avoid {
        Some(avoid) => list.iter().filter(|item| item.as_str() != avoid).collect(),
        None => list.iter().collect(),
    };
    let chosen = if candidates.is_empty() {
        list.choose(rng)
    } else {
        candidates.choose(rng).copied()
    };
    chosen.cloned().unwrap_or_default()
}
