use std::collections::HashSet;

use finlit_types::{ContentNode, GlossaryTerm};
use serde_json::Value;

use crate::index::GlossaryIndex;

/// Object keys that hold ids, ordering, ranges, or routing data rather than
/// prose. Their values are never scanned for terms.
pub const STRUCTURAL_KEYS: &[&str] = &[
    "id",
    "type",
    "kind",
    "key",
    "termId",
    "termKey",
    "lessonId",
    "moduleId",
    "stepId",
    "variantId",
    "nextLessonId",
    "index",
    "order",
    "position",
    "min",
    "max",
    "step",
    "range",
    "route",
    "screen",
    "href",
    "icon",
    "color",
];

pub fn is_structural_key(key: &str) -> bool {
    STRUCTURAL_KEYS.contains(&key)
}

impl GlossaryIndex {
    /// Ids of every term referenced anywhere in `content`.
    ///
    /// Explicit references (`termId` / `termKey`) resolve directly; prose is
    /// scanned with the same matcher as [`GlossaryIndex::split_text`]. Ids are
    /// returned in first-seen order without repeats. Unknown references and
    /// odd shapes are skipped.
    pub fn collect_term_ids(&self, content: &ContentNode) -> Vec<&str> {
        let mut collector = TermCollector {
            index: self,
            seen: HashSet::new(),
            ids: Vec::new(),
        };
        collector.visit(content);
        collector.ids
    }

    /// Same as [`GlossaryIndex::collect_term_ids`] for raw JSON content.
    pub fn collect_term_ids_json(&self, content: &Value) -> Vec<&str> {
        self.collect_term_ids(&ContentNode::from(content))
    }
}

struct TermCollector<'a> {
    index: &'a GlossaryIndex,
    seen: HashSet<&'a str>,
    ids: Vec<&'a str>,
}

impl<'a> TermCollector<'a> {
    fn visit(&mut self, node: &ContentNode) {
        match node {
            ContentNode::Empty => {}
            ContentNode::Leaf(text) | ContentNode::Text(text) => self.scan(text),
            ContentNode::Array(items) => {
                for item in items {
                    self.visit(item);
                }
            }
            ContentNode::TermRef {
                term_id,
                term_key,
                text,
            } => {
                let direct = term_id
                    .as_deref()
                    .and_then(|id| self.index.term(id))
                    .or_else(|| term_key.as_deref().and_then(|key| self.index.lookup(key)));
                if let Some(term) = direct {
                    self.push(term);
                }
                if let Some(text) = text {
                    self.scan(text);
                }
            }
            ContentNode::Object(entries) => {
                for (key, value) in entries {
                    if !is_structural_key(key) {
                        self.visit(value);
                    }
                }
            }
        }
    }

    fn scan(&mut self, text: &str) {
        let index = self.index;
        for term in index.terms_in(text) {
            self.push(term);
        }
    }

    fn push(&mut self, term: &'a GlossaryTerm) {
        if self.seen.insert(term.id.as_str()) {
            self.ids.push(term.id.as_str());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn index() -> GlossaryIndex {
        GlossaryIndex::build([
            GlossaryTerm::new("t1", "Compounding"),
            GlossaryTerm::new("t2", "Time Horizon"),
            GlossaryTerm::new("t3", "Inflation").with_aliases(["CPI"]),
            GlossaryTerm::new("t4", "12"),
        ])
    }

    #[test]
    fn dedups_text_and_explicit_references() {
        let index = index();
        let content = json!({
            "title": "Why compounding matters",
            "steps": [
                { "type": "text", "text": "Compounding rewards patience." },
                { "type": "term", "termId": "t1", "text": "this idea" }
            ]
        });
        assert_eq!(index.collect_term_ids_json(&content), ["t1"]);
    }

    #[test]
    fn keeps_first_seen_order() {
        let index = index();
        let content = json!([
            "Your time horizon decides risk.",
            { "body": "Inflation and compounding pull in opposite directions." },
            { "termKey": "cpi" }
        ]);
        assert_eq!(index.collect_term_ids_json(&content), ["t2", "t3", "t1"]);
    }

    #[test]
    fn skips_structural_keys() {
        let index = index();
        let content = json!({
            "id": "compounding",
            "order": 12,
            "range": { "min": 12, "max": 40 },
            "route": "Inflation",
            "label": "Months: 12"
        });
        assert_eq!(index.collect_term_ids_json(&content), ["t4"]);
    }

    #[test]
    fn scans_numeric_leaves_outside_structural_keys() {
        let index = index();
        assert_eq!(index.collect_term_ids_json(&json!({ "months": 12 })), ["t4"]);
    }

    #[test]
    fn unknown_references_fall_back_to_key_then_text() {
        let index = index();
        let content = json!({
            "type": "term",
            "termId": "missing",
            "termKey": "Time Horizon",
            "text": "see also CPI"
        });
        assert_eq!(index.collect_term_ids_json(&content), ["t2", "t3"]);
    }

    #[test]
    fn malformed_content_yields_nothing() {
        let index = index();
        assert!(index.collect_term_ids_json(&json!(null)).is_empty());
        assert!(index.collect_term_ids_json(&json!({ "type": "term" })).is_empty());
        assert!(index.collect_term_ids_json(&json!([true, false])).is_empty());
        assert!(
            GlossaryIndex::empty()
                .collect_term_ids_json(&json!("Compounding"))
                .is_empty()
        );
    }

    #[test]
    fn does_not_mutate_input() {
        let index = index();
        let node = ContentNode::from(&json!({ "text": "Compounding" }));
        let before = node.clone();
        let _ = index.collect_term_ids(&node);
        assert_eq!(node, before);
    }
}
