use std::borrow::Cow;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::generator::SyntheticGenerator;

pub const EMAIL_PATTERN: &str = r"[a-zA-Z0-9_.+\-]+@[a-zA-Z0-9\-]+\.[a-zA-Z0-9.\-]+";
pub const URL_PATTERN: &str = r"https?://[\w./\-]+";

/// Matches scrubbed out of a single string
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrubCounts {
    pub emails: usize,
    pub urls: usize,
}

/// Content patterns replaced inside free text
#[derive(Debug, Clone)]
pub struct PatternSet {
    email: Regex,
    url: Regex,
}

impl PatternSet {
    pub fn new() -> Self {
        Self {
            email: Regex::new(EMAIL_PATTERN).unwrap(),
            url: Regex::new(URL_PATTERN).unwrap(),
        }
    }

    /// Build from caller-supplied patterns
    pub fn with_patterns(email: &str, url: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            email: Regex::new(email)?,
            url: Regex::new(url)?,
        })
    }

    pub fn email(&self) -> &Regex {
        &self.email
    }

    pub fn url(&self) -> &Regex {
        &self.url
    }

    /// Replace every email, then every URL, with fresh synthetic values.
    ///
    /// Text without matches comes back as the same `String`.
    pub fn scrub(&self, text: String, generator: &mut SyntheticGenerator) -> (String, ScrubCounts) {
        let (text, emails) = substitute(&self.email, text, || generator.email());
        let (text, urls) = substitute(&self.url, text, || generator.url());

        (text, ScrubCounts { emails, urls })
    }
}

impl Default for PatternSet {
    fn default() -> Self {
        Self::new()
    }
}

fn substitute(
    pattern: &Regex,
    text: String,
    mut replacement: impl FnMut() -> String,
) -> (String, usize) {
    let mut count = 0;
    let replaced = match pattern.replace_all(&text, |_: &Captures<'_>| {
        count += 1;
        replacement()
    }) {
        Cow::Borrowed(_) => None,
        Cow::Owned(replaced) => Some(replaced),
    };

    match replaced {
        Some(replaced) => (replaced, count),
        None => (text, 0),
    }
}
