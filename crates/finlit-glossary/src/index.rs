use std::collections::HashMap;
use std::fs;
use std::path::Path;

use finlit_types::{GlossaryTerm, TextSegment};
use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Upper bound for the compiled alternation; large glossaries exceed the
/// regex crate's 10 MiB default.
const PATTERN_SIZE_LIMIT: usize = 64 * (1 << 20);

/// Immutable term lexicon.
///
/// Keys are the trimmed, lowercased `term` and `aliases` of every indexable
/// term. When two terms normalize to the same key, the one later in build
/// order owns it (last write wins); the same holds for duplicate ids.
#[derive(Debug, Clone)]
pub struct GlossaryIndex {
    terms: Vec<GlossaryTerm>,
    by_key: HashMap<String, usize>,
    by_id: HashMap<String, usize>,
    pattern: Option<Regex>,
}

#[derive(Debug, Error)]
pub enum GlossaryError {
    #[error("failed to read glossary: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse glossary: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Accepted on-disk shapes: a bare array or `{ "terms": [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum GlossaryFile {
    List(Vec<GlossaryTerm>),
    Wrapped { terms: Vec<GlossaryTerm> },
}

impl GlossaryFile {
    fn into_terms(self) -> Vec<GlossaryTerm> {
        match self {
            GlossaryFile::List(terms) | GlossaryFile::Wrapped { terms } => terms,
        }
    }
}

impl GlossaryIndex {
    pub fn empty() -> Self {
        Self::build(Vec::new())
    }

    pub fn build<I>(terms: I) -> Self
    where
        I: IntoIterator<Item = GlossaryTerm>,
    {
        let terms: Vec<GlossaryTerm> = terms.into_iter().collect();
        let mut by_key: HashMap<String, usize> = HashMap::new();
        let mut by_id: HashMap<String, usize> = HashMap::new();

        for (slot, term) in terms.iter().enumerate() {
            if term.id.trim().is_empty() {
                debug!("term {:?} has a blank id; not indexed", term.term);
                continue;
            }
            by_id.insert(term.id.clone(), slot);

            let label = normalize_key(&term.term);
            if label.is_empty() {
                debug!("term {:?} has a blank label; linked by aliases only", term.id);
            }
            let keys = std::iter::once(label)
                .chain(term.aliases.iter().map(|alias| normalize_key(alias)))
                .filter(|key| !key.is_empty());
            for key in keys {
                if let Some(prev) = by_key.insert(key.clone(), slot)
                    && prev != slot
                {
                    debug!(
                        "key {key:?} moved from term {:?} to {:?}",
                        terms[prev].id, term.id
                    );
                }
            }
        }

        let pattern = compile_pattern(&by_key);
        Self {
            terms,
            by_key,
            by_id,
            pattern,
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, GlossaryError> {
        let raw = fs::read_to_string(path.as_ref())?;
        let index = Self::from_json_str(&raw)?;
        info!(
            "loaded {} glossary terms ({} match keys) from {}",
            index.len(),
            index.key_count(),
            path.as_ref().display()
        );
        Ok(index)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, GlossaryError> {
        let file: GlossaryFile = serde_json::from_str(raw)?;
        let terms = file.into_terms();
        let unlabeled = terms
            .iter()
            .filter(|t| normalize_key(&t.term).is_empty())
            .count();
        if unlabeled > 0 {
            warn!("{unlabeled} glossary terms have blank labels; matched by aliases only");
        }
        let undefined: Vec<&str> = terms
            .iter()
            .filter(|t| !t.has_definition())
            .map(|t| t.id.as_str())
            .collect();
        if !undefined.is_empty() {
            warn!("glossary terms without a definition: {}", undefined.join(", "));
        }
        Ok(Self::build(terms))
    }

    /// Look up a term by id.
    pub fn term(&self, id: &str) -> Option<&GlossaryTerm> {
        self.by_id.get(id).map(|&slot| &self.terms[slot])
    }

    /// Look up a term by label or alias, ignoring case and outer whitespace.
    pub fn lookup(&self, key: &str) -> Option<&GlossaryTerm> {
        self.by_key
            .get(&normalize_key(key))
            .map(|&slot| &self.terms[slot])
    }

    /// Every term in build order, including ones that were not indexable.
    pub fn terms(&self) -> &[GlossaryTerm] {
        &self.terms
    }

    /// Number of indexed (addressable by id) terms.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn key_count(&self) -> usize {
        self.by_key.len()
    }

    /// Split `text` into plain and linked segments.
    ///
    /// Always returns at least one segment. Concatenating the `text` of every
    /// segment gives back `text` unchanged; linked segments keep the casing
    /// found in the input.
    pub fn split_text<'a>(&'a self, text: &'a str) -> Vec<TextSegment<'a>> {
        let Some(pattern) = self.pattern.as_ref().filter(|_| !text.is_empty()) else {
            return vec![TextSegment::plain(text)];
        };

        let mut segments = Vec::new();
        let mut cursor = 0usize;
        for found in pattern.find_iter(text) {
            if found.start() > cursor {
                segments.push(TextSegment::plain(&text[cursor..found.start()]));
            }
            let piece = found.as_str();
            segments.push(match self.lookup(piece) {
                Some(term) => TextSegment::linked(piece, term),
                None => TextSegment::plain(piece),
            });
            cursor = found.end();
        }
        if cursor < text.len() {
            segments.push(TextSegment::plain(&text[cursor..]));
        }
        segments
    }

    /// Terms linked anywhere in `text`, in order of appearance (repeats kept).
    pub(crate) fn terms_in<'s>(&self, text: &'s str) -> impl Iterator<Item = &GlossaryTerm> {
        self.pattern
            .iter()
            .flat_map(move |pattern| pattern.find_iter(text))
            .filter_map(move |found| self.lookup(found.as_str()))
    }
}

impl Default for GlossaryIndex {
    fn default() -> Self {
        Self::empty()
    }
}

/// Normalized form used for every key: trimmed, then lowercased one
/// character at a time.
///
/// Per-character lowercasing ignores context (`Σ` always becomes `σ`), and
/// the variant spellings below fold to one letter, so every piece the `(?i)`
/// matcher accepts normalizes to the key it was built from. Characters whose
/// lowercase form is several characters (`İ`) only match in that form.
pub fn normalize_key(raw: &str) -> String {
    raw.trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(fold_variant)
        .collect()
}

fn fold_variant(c: char) -> char {
    match c {
        'ς' => 'σ',
        'ſ' => 's',
        'ϐ' => 'β',
        'ϑ' => 'θ',
        'ϕ' => 'φ',
        'ϖ' => 'π',
        'ϰ' => 'κ',
        'ϱ' => 'ρ',
        'ϵ' => 'ε',
        '\u{1fbe}' => 'ι',
        other => other,
    }
}

fn compile_pattern(by_key: &HashMap<String, usize>) -> Option<Regex> {
    if by_key.is_empty() {
        return None;
    }

    // Leftmost-first alternation: longer keys must come first so a phrase
    // beats any shorter key that starts at the same position.
    let mut keys: Vec<&str> = by_key.keys().map(String::as_str).collect();
    keys.sort_by(|a, b| {
        b.chars()
            .count()
            .cmp(&a.chars().count())
            .then_with(|| a.cmp(b))
    });
    let alternation = keys
        .iter()
        .map(|key| regex::escape(key))
        .collect::<Vec<_>>()
        .join("|");

    let source = format!(r"(?i)\b(?:{alternation})\b");
    match RegexBuilder::new(&source)
        .size_limit(PATTERN_SIZE_LIMIT)
        .build()
    {
        Ok(pattern) => Some(pattern),
        Err(err) => {
            warn!("glossary pattern rejected, term linking disabled: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn make_index(terms: &[(&str, &str)]) -> GlossaryIndex {
        GlossaryIndex::build(
            terms
                .iter()
                .map(|(id, label)| GlossaryTerm::new(*id, *label)),
        )
    }

    fn rendered(segments: &[TextSegment<'_>]) -> Vec<(String, Option<String>)> {
        segments
            .iter()
            .map(|s| (s.text.to_string(), s.term_id().map(str::to_string)))
            .collect()
    }

    #[test]
    fn splits_example_sentence_into_four_segments() {
        let index = make_index(&[("t1", "Compounding"), ("t2", "Time Horizon")]);
        let segments = index.split_text("Compounding and Time Horizon matter.");
        assert_eq!(
            rendered(&segments),
            vec![
                ("Compounding".into(), Some("t1".into())),
                (" and ".into(), None),
                ("Time Horizon".into(), Some("t2".into())),
                (" matter.".into(), None),
            ]
        );
    }

    #[test]
    fn prefers_longest_phrase() {
        let index = make_index(&[("short", "Time"), ("long", "Time Horizon")]);
        let segments = index.split_text("my Time Horizon is long");
        assert_eq!(segments[1].text, "Time Horizon");
        assert_eq!(segments[1].term_id(), Some("long"));
        assert_eq!(segments.len(), 3);
    }

    #[test]
    fn falls_back_to_shorter_key_when_phrase_breaks_word_boundary() {
        let index = make_index(&[("short", "Time"), ("long", "Time Horizon")]);
        let segments = index.split_text("Time Horizons vary");
        assert_eq!(segments[0].text, "Time");
        assert_eq!(segments[0].term_id(), Some("short"));
    }

    #[test]
    fn keeps_original_casing() {
        let index = make_index(&[("t1", "Compounding")]);
        let segments = index.split_text("COMPOUNDING grows");
        assert_eq!(segments[0].text, "COMPOUNDING");
        assert_eq!(segments[0].term_id(), Some("t1"));
        assert_eq!(segments[1].text, " grows");
    }

    #[test]
    fn matches_whole_words_only() {
        let index = make_index(&[("t1", "ETF")]);
        let segments = index.split_text("ETFs and an ETF.");
        let linked: Vec<_> = segments.iter().filter(|s| s.term.is_some()).collect();
        assert_eq!(linked.len(), 1);
        assert_eq!(linked[0].text, "ETF");
    }

    #[test]
    fn aliases_link_to_owner() {
        let index = GlossaryIndex::build([
            GlossaryTerm::new("apr", "Annual Percentage Rate").with_aliases(["APR", " apr "]),
        ]);
        assert_eq!(index.key_count(), 2);
        let segments = index.split_text("Check the apr first");
        assert_eq!(segments[1].text, "apr");
        assert_eq!(segments[1].term_id(), Some("apr"));
    }

    #[test]
    fn escapes_metacharacters_in_keys() {
        let index = make_index(&[("k", "S&P 500"), ("dot", "a.b")]);
        let segments = index.split_text("my S&P 500 fund and a-b and a.b");
        let ids: Vec<_> = segments.iter().filter_map(|s| s.term_id()).collect();
        assert_eq!(ids, ["k", "dot"]);
    }

    #[test]
    fn later_terms_win_key_collisions() {
        let index = GlossaryIndex::build([
            GlossaryTerm::new("first", "Yield"),
            GlossaryTerm::new("second", "Dividend").with_aliases(["yield"]),
        ]);
        assert_eq!(index.lookup("YIELD").map(|t| t.id.as_str()), Some("second"));
        assert_eq!(index.term("first").map(|t| t.term.as_str()), Some("Yield"));
    }

    #[test]
    fn blank_labels_keep_id_and_aliases() {
        let index = GlossaryIndex::build([
            GlossaryTerm::new("etf", "  ").with_aliases(["ETF"]),
            GlossaryTerm::new("bare", " "),
            GlossaryTerm::new("ok", "Budget"),
        ]);
        assert_eq!(index.len(), 3);
        assert_eq!(index.key_count(), 2);
        assert_eq!(index.term("etf").map(|t| t.id.as_str()), Some("etf"));
        assert_eq!(index.lookup("etf").map(|t| t.id.as_str()), Some("etf"));
        assert!(index.term("bare").is_some());

        let ids = index.collect_term_ids_json(&serde_json::json!([
            { "type": "term", "termId": "bare" },
            "An ETF tracks an index."
        ]));
        assert_eq!(ids, ["bare", "etf"]);
    }

    #[test]
    fn blank_ids_are_not_indexed() {
        let index = make_index(&[("", "Budget"), ("ok", "Debt")]);
        assert_eq!(index.len(), 1);
        assert!(index.lookup("budget").is_none());
        assert_eq!(index.terms().len(), 2);
    }

    #[test]
    fn matching_and_lookup_agree_on_case() {
        let index = make_index(&[("tax", "ΦΟΡΟΣ"), ("long-s", "ſtock")]);
        let text = "φοροσ, φορος, Φόρος and ΦΟΡΟΣ; stock";
        let linked: Vec<_> = index
            .split_text(text)
            .iter()
            .filter_map(|s| s.term_id().map(|id| (s.text, id)))
            .collect();
        assert_eq!(
            linked,
            vec![
                ("φοροσ", "tax"),
                ("φορος", "tax"),
                ("ΦΟΡΟΣ", "tax"),
                ("stock", "long-s"),
            ]
        );
        assert_eq!(normalize_key(" ΦΟΡΟΣ "), normalize_key("φορος"));
    }

    #[test]
    fn terms_without_definition_still_load() {
        let index = GlossaryIndex::from_json_str(r#"[{"id": "t1", "term": "Budget"}]"#)
            .expect("load undefined");
        let term = index.term("t1").expect("indexed");
        assert!(!term.has_definition());
        assert_eq!(term.description_for(finlit_types::KnowledgeLevel::Beginner), "");
    }

    #[test]
    fn empty_index_returns_input_as_single_segment() {
        let index = GlossaryIndex::empty();
        assert!(index.is_empty());
        let segments = index.split_text("anything at all");
        assert_eq!(segments, vec![TextSegment::plain("anything at all")]);
    }

    #[test]
    fn empty_text_is_single_plain_segment() {
        let index = make_index(&[("t1", "Budget")]);
        assert_eq!(index.split_text(""), vec![TextSegment::plain("")]);
    }

    #[test]
    fn loads_bare_and_wrapped_files() {
        let mut bare = NamedTempFile::new().expect("temp file");
        write!(bare, r#"[{{"id": "t1", "term": "Budget", "definition": "A plan."}}]"#).unwrap();
        let index = GlossaryIndex::load_from_file(bare.path()).expect("load bare");
        assert_eq!(index.term("t1").map(|t| t.definition.as_str()), Some("A plan."));

        let wrapped = GlossaryIndex::from_json_str(r#"{"terms": [{"id": "t2", "term": "Debt"}]}"#)
            .expect("load wrapped");
        assert!(wrapped.lookup("debt").is_some());
    }

    #[test]
    fn reports_parse_errors() {
        let err = GlossaryIndex::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, GlossaryError::Parse(_)));
        assert!(err.to_string().contains("parse"));
    }
}
