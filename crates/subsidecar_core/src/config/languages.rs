//! Language filter parsed from free-text configuration.

/// Ordered set of normalized language codes.
///
/// An empty filter matches every language.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageFilter {
    codes: Vec<String>,
}

impl LanguageFilter {
    /// Parse a raw configuration value into a filter.
    ///
    /// Whitespace runs fold to `-` so multi-word labels survive as single
    /// tokens, then the string is lowercased and split on commas. Empty
    /// tokens are dropped; duplicates keep their first position. Any input
    /// yields a valid filter.
    pub fn parse(raw: &str) -> Self {
        let folded: String = raw
            .chars()
            .map(|c| if c.is_whitespace() { '-' } else { c })
            .collect();

        let mut codes: Vec<String> = Vec::new();
        for token in folded.to_lowercase().split(',') {
            if token.is_empty() {
                continue;
            }
            if !codes.iter().any(|c| c == token) {
                codes.push(token.to_string());
            }
        }
        Self { codes }
    }

    /// Whether the filter matches everything.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Whether a stream's language tag passes the filter.
    ///
    /// An empty filter matches everything, including untagged streams. A
    /// non-empty filter never matches an empty tag.
    pub fn matches(&self, language: &str) -> bool {
        if self.codes.is_empty() {
            return true;
        }
        let language = language.to_lowercase();
        self.codes.iter().any(|c| *c == language)
    }

    /// The normalized codes, in configuration order.
    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    /// Canonical comma-joined form; parsing it again yields an equal filter.
    pub fn normalized(&self) -> String {
        self.codes.join(",")
    }
}
