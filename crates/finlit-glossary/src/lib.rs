//! Glossary indexing and term linking.
//!
//! A [`GlossaryIndex`] is built once from a term list and then shared
//! read-only. It answers two questions:
//!
//! 1. Which parts of a display string are glossary terms?
//!    ([`GlossaryIndex::split_text`])
//! 2. Which terms does a lesson's content reference anywhere?
//!    ([`GlossaryIndex::collect_term_ids`])
//!
//! Matching is case-insensitive and whole-word. When several keys could match
//! at the same position the longest one wins, so "Time Horizon" is linked as
//! one phrase even when "Time" is also a term.
//!
//! # Example
//! ```rust
//! use finlit_glossary::GlossaryIndex;
//! use finlit_types::GlossaryTerm;
//!
//! let index = GlossaryIndex::build([
//!     GlossaryTerm::new("t1", "Compounding"),
//!     GlossaryTerm::new("t2", "Time Horizon"),
//! ]);
//! let segments = index.split_text("Compounding and Time Horizon matter.");
//! let linked: Vec<_> = segments.iter().filter_map(|s| s.term_id()).collect();
//! assert_eq!(linked, ["t1", "t2"]);
//! ```

pub mod collect;
pub mod index;

pub use collect::{STRUCTURAL_KEYS, is_structural_key};
pub use index::{GlossaryError, GlossaryIndex, normalize_key};
