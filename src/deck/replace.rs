/// Token substitution over slide text units.
use aho_corasick::{AhoCorasick, MatchKind};
use memchr::memmem;
use once_cell::sync::Lazy;

use crate::deck::walker::TextUnitVisitor;

// Every token opens with this marker, so units without it are skipped
// before the automaton runs
static TOKEN_OPEN: Lazy<memmem::Finder<'static>> = Lazy::new(|| memmem::Finder::new("{{"));

/// Ordered token-to-value pairs for one export.
///
/// Built fresh per export; order is the fixed catalogue order, which the
/// substitution automaton preserves across calls.
#[derive(Debug, Clone, Default)]
pub struct ReplacementMap {
    entries: Vec<(String, String)>,
}

impl ReplacementMap {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a token and its rendered value.
    pub fn push(&mut self, token: impl Into<String>, value: impl Into<String>) {
        self.entries.push((token.into(), value.into()));
    }

    /// The entries in insertion order.
    #[inline]
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    /// Value for an exact token literal.
    pub fn get(&self, token: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(t, _)| t == token)
            .map(|(_, v)| v.as_str())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, String)> for ReplacementMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Substitutes every token occurrence in each visited unit.
///
/// One leftmost-longest Aho-Corasick pass per unit: substituted values are
/// never re-scanned, so a value containing another token literal stays as
/// written, and iteration order cannot change the output. A token split
/// across two adjacent runs of a paragraph is not recognized; table cells
/// are visited as whole text, so the same split inside a cell is.
pub struct RunReplacer {
    automaton: AhoCorasick,
    values: Vec<String>,
}

impl RunReplacer {
    /// Build a replacer for one replacement map.
    pub fn new(map: &ReplacementMap) -> Self {
        let patterns: Vec<&str> = map.entries().iter().map(|(t, _)| t.as_str()).collect();
        let automaton = AhoCorasick::builder()
            .match_kind(MatchKind::LeftmostLongest)
            .build(&patterns)
            .expect("Failed to build token automaton");
        let values = map.entries().iter().map(|(_, v)| v.clone()).collect();
        Self { automaton, values }
    }
}

impl TextUnitVisitor for RunReplacer {
    fn visit_text_unit(&mut self, text: &str) -> Option<String> {
        if TOKEN_OPEN.find(text.as_bytes()).is_none() {
            return None;
        }
        let replaced = self.automaton.replace_all(text, &self.values);
        (replaced != text).then_some(replaced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> ReplacementMap {
        pairs
            .iter()
            .map(|(t, v)| (t.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_replaces_every_occurrence() {
        let mut replacer = RunReplacer::new(&map(&[
            ("{{CLIENT}}", "Acme"),
            ("{{YEAR}}", "2024"),
        ]));
        let out = replacer
            .visit_text_unit("{{CLIENT}} in {{YEAR}}, again {{CLIENT}}")
            .unwrap();
        assert_eq!(out, "Acme in 2024, again Acme");
    }

    #[test]
    fn test_token_free_unit_is_untouched() {
        let mut replacer = RunReplacer::new(&map(&[("{{CLIENT}}", "Acme")]));
        assert_eq!(replacer.visit_text_unit("no tokens here"), None);
        // Brace marker present but no known token: scanned, unchanged
        assert_eq!(replacer.visit_text_unit("{{UNKNOWN}}"), None);
    }

    #[test]
    fn test_substituted_values_are_not_rescanned() {
        let mut replacer = RunReplacer::new(&map(&[
            ("{{A}}", "{{B}}"),
            ("{{B}}", "oops"),
        ]));
        assert_eq!(replacer.visit_text_unit("{{A}}").unwrap(), "{{B}}");
    }

    #[test]
    fn test_tokens_are_case_sensitive() {
        let mut replacer = RunReplacer::new(&map(&[("{{CLIENT}}", "Acme")]));
        assert_eq!(replacer.visit_text_unit("{{client}}"), None);
    }

    #[test]
    fn test_empty_map_changes_nothing() {
        let mut replacer = RunReplacer::new(&ReplacementMap::new());
        assert_eq!(replacer.visit_text_unit("{{CLIENT}}"), None);
    }

    #[cfg(test)]
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(256))]

            /// Text without the opening marker never changes, whatever the map
            #[test]
            fn prop_markerless_text_is_fixed(text in "[^{]*") {
                let mut replacer = RunReplacer::new(&map(&[
                    ("{{CLIENT}}", "Acme"),
                    ("{{PROJECT_NAME}}", "Portal"),
                ]));
                prop_assert_eq!(replacer.visit_text_unit(&text), None);
            }

            /// Replacement output never contains a token from the map
            #[test]
            fn prop_no_known_token_survives(prefix in "[a-z ]{0,10}", suffix in "[a-z ]{0,10}") {
                let mut replacer = RunReplacer::new(&map(&[("{{CLIENT}}", "Acme")]));
                let input = format!("{prefix}{{{{CLIENT}}}}{suffix}");
                let out = replacer.visit_text_unit(&input).unwrap();
                prop_assert!(!out.contains("{{CLIENT}}"));
                prop_assert_eq!(out, format!("{prefix}Acme{suffix}"));
            }
        }
    }
}
