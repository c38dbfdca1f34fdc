// Intent tags: named regex patterns matched against item text.
//
// The built-in table is immutable. Caller-supplied patterns are merged in at
// construction time: a configured name replaces the built-in pattern of the
// same name, new names extend the table.

use std::collections::{BTreeMap, BTreeSet};

use regex_lite::Regex;
use tracing::warn;

use crate::text::{limit_tag_length, MAX_TAG_LENGTH};

/// Built-in tag table. Whole-word and case-sensitive, matched against the
/// raw title and snippet text.
const BUILTIN_TAGS: &[(&str, &str)] = &[
    ("pdf", r"\bpdf\b"),
    ("printable", r"\bprintable\b"),
    ("prompt", r"\bprompt(s)?\b"),
    ("bundle", r"\bbundle\b"),
    ("undated", r"\bundated\b"),
    ("planner", r"\bplanner\b"),
    ("workbook", r"\bworkbook\b"),
    ("cards", r"\bcard(s)?\b"),
    ("guided", r"\bguided\b"),
];

/// Matches item text against a table of named patterns.
#[derive(Debug, Clone)]
pub struct IntentTagger {
    patterns: BTreeMap<String, Regex>,
}

impl Default for IntentTagger {
    fn default() -> Self {
        Self::builtin()
    }
}

impl IntentTagger {
    /// The built-in table only.
    pub fn builtin() -> Self {
        let patterns = BUILTIN_TAGS
            .iter()
            .filter_map(|(name, pattern)| {
                Regex::new(pattern)
                    .ok()
                    .map(|regex| (name.to_string(), regex))
            })
            .collect();
        Self { patterns }
    }

    /// The built-in table with `extra` (name -> regex) layered on top.
    ///
    /// Patterns that fail to compile are skipped with a warning; the
    /// built-in pattern of the same name, if any, stays in place.
    pub fn with_overrides(extra: &BTreeMap<String, String>) -> Self {
        let mut tagger = Self::builtin();
        for (name, pattern) in extra {
            match Regex::new(pattern) {
                Ok(regex) => {
                    tagger.patterns.insert(name.clone(), regex);
                }
                Err(e) => {
                    warn!(tag = %name, error = %e, "Skipping invalid intent tag pattern");
                }
            }
        }
        tagger
    }

    /// Tag names in the table, ascending.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.patterns.keys().map(String::as_str)
    }

    /// Every tag whose pattern matches `text`, truncated and ascending.
    pub fn tag(&self, text: &str) -> Vec<String> {
        self.patterns
            .iter()
            .filter(|(_, regex)| regex.is_match(text))
            .map(|(name, _)| limit_tag_length(name, MAX_TAG_LENGTH))
            .collect::<BTreeSet<String>>()
            .into_iter()
            .collect()
    }
}
