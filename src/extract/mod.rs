//! Declaration extraction: which classes, structs and macros a header declares.
//!
//! Extraction is purely lexical. Comments, string literals and disabled
//! `#if 0` blocks are scanned like any other text, so declarations inside them
//! are reported too.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Names textually declared by one header file, in order of appearance.
///
/// Duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeclarationSet {
    /// Class names.
    pub classes: Vec<String>,
    /// Struct names.
    pub structs: Vec<String>,
    /// Macro names from `#define` directives.
    pub defines: Vec<String>,
}

impl DeclarationSet {
    /// Returns `true` if no class, struct or define was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.structs.is_empty() && self.defines.is_empty()
    }
}

/// Turns the text of one header into its [`DeclarationSet`].
pub trait Extractor: Send + Sync {
    /// Extracts every declaration found in `text`.
    fn extract(&self, text: &str) -> DeclarationSet;
}

// `class`/`struct`, optional modifier tokens, then the captured name directly
// before a base list or an opening brace.
static CLASS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"class\s+[\w\s]*?([a-zA-Z_]\w*)\s*[:{]").unwrap());

static STRUCT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"struct\s+[\w\s]*?([a-zA-Z_]\w*)\s*[:{]").unwrap());

static DEFINE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#define\s+([a-zA-Z_]\w*)").unwrap());

/// Regex-based extractor over raw header text.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalExtractor;

impl Extractor for LexicalExtractor {
    fn extract(&self, text: &str) -> DeclarationSet {
        DeclarationSet {
            classes: captures(&CLASS_PATTERN, text),
            structs: captures(&STRUCT_PATTERN, text),
            defines: captures(&DEFINE_PATTERN, text),
        }
    }
}

fn captures(pattern: &Regex, text: &str) -> Vec<String> {
    pattern.captures_iter(text).map(|c| c[1].to_string()).collect()
}
