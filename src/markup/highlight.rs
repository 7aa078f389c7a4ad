//! Best-effort syntax highlighting for literal blocks.
//!
//! The renderer never depends on highlighting succeeding: a failed tokenize
//! falls back to the plain literal, whose raw text is stored on the node
//! unconditionally.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

use crate::nodes::TokenSpan;

/// Tokenizer failure. Callers fall back to an unhighlighted literal and must
/// not surface this to the user.
#[derive(Debug, Error)]
#[error("cannot highlight `{language}`: {reason}")]
pub struct HighlightError {
    pub language: String,
    pub reason: String,
}

/// Produces classified spans for a literal block.
///
/// Implementations must return spans that concatenate back to the original
/// source, so a consumer can always reconstruct the raw text.
pub trait Highlighter {
    fn tokenize(&self, source: &str, language: &str) -> Result<Vec<TokenSpan>, HighlightError>;
}

/// Regex-based classifier covering the handful of languages that show up in
/// command epilogs and examples. Anything else is an error, which the
/// converter treats as "render plain".
#[derive(Debug, Default, Clone, Copy)]
pub struct RegexHighlighter;

const RUST_KEYWORDS: &[&str] = &[
    "as", "break", "const", "continue", "else", "enum", "fn", "for", "if", "impl", "in", "let",
    "loop", "match", "mod", "mut", "pub", "return", "self", "static", "struct", "trait", "type",
    "use", "while",
];

const PYTHON_KEYWORDS: &[&str] = &[
    "and", "as", "class", "def", "elif", "else", "for", "from", "if", "import", "in", "is",
    "lambda", "not", "or", "pass", "raise", "return", "try", "while", "with", "yield",
];

const SHELL_KEYWORDS: &[&str] = &[
    "case", "do", "done", "elif", "else", "esac", "fi", "for", "function", "if", "in", "then",
    "while",
];

fn keyword_table(language: &str) -> Option<&'static [&'static str]> {
    match language.to_ascii_lowercase().as_str() {
        "rust" | "rs" => Some(RUST_KEYWORDS),
        "python" | "py" => Some(PYTHON_KEYWORDS),
        "sh" | "bash" | "shell" | "console" => Some(SHELL_KEYWORDS),
        "json" => Some(&[]),
        _ => None,
    }
}

fn span_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // Static and verified by tests; a broken pattern is a programming error.
        Regex::new(
            r#"(?m)(?P<comment>//[^\n]*|#[^\n]*)|(?P<string>"(?:\\.|[^"\\])*")|(?P<number>\b\d[\d_]*(?:\.\d+)?\b)|(?P<word>\b[A-Za-z_][A-Za-z0-9_]*\b)"#,
        )
        .expect("static highlight pattern is valid")
    })
}

impl Highlighter for RegexHighlighter {
    fn tokenize(&self, source: &str, language: &str) -> Result<Vec<TokenSpan>, HighlightError> {
        let keywords = keyword_table(language).ok_or_else(|| HighlightError {
            language: language.to_string(),
            reason: "unsupported language".to_string(),
        })?;

        let mut spans = Vec::new();
        let mut cursor = 0;
        for captures in span_pattern().captures_iter(source) {
            let Some(matched) = captures.get(0) else {
                continue;
            };
            if matched.start() > cursor {
                push_span(&mut spans, "text", &source[cursor..matched.start()]);
            }
            let class = if captures.name("comment").is_some() {
                "comment"
            } else if captures.name("string").is_some() {
                "string"
            } else if captures.name("number").is_some() {
                "number"
            } else if keywords.contains(&matched.as_str()) {
                "keyword"
            } else {
                "name"
            };
            push_span(&mut spans, class, matched.as_str());
            cursor = matched.end();
        }
        if cursor < source.len() {
            push_span(&mut spans, "text", &source[cursor..]);
        }
        Ok(spans)
    }
}

fn push_span(spans: &mut Vec<TokenSpan>, class: &str, text: &str) {
    spans.push(TokenSpan {
        class: class.to_string(),
        text: text.to_string(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_concatenate_back_to_source() {
        let source = "let answer = 42; // the answer\nlet s = \"hi\";\n";
        let spans = RegexHighlighter
            .tokenize(source, "rust")
            .expect("rust is supported");
        let rejoined: String = spans.iter().map(|span| span.text.as_str()).collect();
        assert_eq!(rejoined, source);
    }

    #[test]
    fn classifies_keywords_strings_and_comments() {
        let spans = RegexHighlighter
            .tokenize("let s = \"hi\"; // note", "rust")
            .expect("rust is supported");
        let class_of = |text: &str| {
            spans
                .iter()
                .find(|span| span.text == text)
                .map(|span| span.class.clone())
        };
        assert_eq!(class_of("let").as_deref(), Some("keyword"));
        assert_eq!(class_of("\"hi\"").as_deref(), Some("string"));
        assert_eq!(class_of("// note").as_deref(), Some("comment"));
        assert_eq!(class_of("s").as_deref(), Some("name"));
    }

    #[test]
    fn unsupported_language_is_an_error() {
        assert!(RegexHighlighter.tokenize("x", "cobol").is_err());
    }

    #[test]
    fn empty_source_yields_no_spans() {
        let spans = RegexHighlighter
            .tokenize("", "python")
            .expect("python is supported");
        assert!(spans.is_empty());
    }
}
