//! Description cleanup
//!
//! Turns raw work descriptions from the bibliographic API into a short,
//! presentable summary. Pure functions, no I/O.
//!
//! Cleanup steps, in order:
//! 1. Remove markdown links pointing at openlibrary.org (text included)
//! 2. Remove bare openlibrary.org URLs
//! 3. Remove runs of two or more hyphens
//! 4. Collapse whitespace runs to a single space, trim
//! 5. Unwrap single-asterisk `*emphasis*`
//! 6. Cut at the first "Also contained in:" / "Contains:" marker
//! 7. Keep the first five sentences
//!
//! Steps 1-5 repeat until the text stops changing, since unwrapping can expose
//! a new hyphen run or URL. Every pass that changes the text shortens it, so
//! the loop terminates. The output of `clean_description` is a fixed point:
//! cleaning it again returns it unchanged.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Maximum number of sentences kept in a summary
pub const MAX_SENTENCES: usize = 5;

/// Phrases that introduce edition contents lists rather than a description
const TRUNCATION_MARKERS: [&str; 2] = ["Also contained in:", "Contains:"];

static SITE_MARKDOWN_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[[^\]]*\]\(\s*https?://(?:www\.)?openlibrary\.org[^)]*\)")
        .expect("valid markdown link regex")
});

static SITE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https?://(?:www\.)?openlibrary\.org\S*").expect("valid site url regex")
});

static HYPHEN_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"-{2,}").expect("valid hyphen regex"));

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s{2,}").expect("valid whitespace regex"));

// Inner text must not start or end with whitespace: unwrapping "a * b * c"
// would otherwise leave double spaces behind. Marker runs are captured whole
// so that `**bold**` can be told apart from `*emphasis*`.
static EMPHASIS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\*+)([^*\s](?:[^*]*[^*\s])?)(\*+)").expect("valid emphasis regex")
});

static SENTENCE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.\s+").expect("valid sentence regex"));

/// Clean a raw description
///
/// Returns `None` when the input is absent or nothing presentable remains.
pub fn clean_description(raw: Option<&str>) -> Option<String> {
    let mut text = raw?.to_string();

    loop {
        let next = surface_pass(&text);
        if next == text {
            break;
        }
        text = next;
    }

    let text = first_sentences(truncate_at_markers(&text), MAX_SENTENCES);

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// One application of steps 1-5
fn surface_pass(text: &str) -> String {
    let text = SITE_MARKDOWN_LINK.replace_all(text, "");
    let text = SITE_URL.replace_all(&text, "");
    let text = HYPHEN_RUN.replace_all(&text, "");
    let text = WHITESPACE_RUN.replace_all(&text, " ");
    EMPHASIS
        .replace_all(text.trim(), |caps: &Captures| {
            if caps[1].len() == 1 && caps[3].len() == 1 {
                caps[2].to_string()
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

fn truncate_at_markers(text: &str) -> &str {
    let cut = TRUNCATION_MARKERS
        .iter()
        .filter_map(|marker| text.find(marker))
        .min()
        .unwrap_or(text.len());
    text[..cut].trim()
}

fn first_sentences(text: &str, limit: usize) -> String {
    let mut sentences: Vec<&str> = Vec::with_capacity(limit);
    let mut start = 0;

    for boundary in SENTENCE_BREAK.find_iter(text) {
        // Keep the period with its sentence
        sentences.push(&text[start..boundary.start() + 1]);
        start = boundary.end();
        if sentences.len() == limit {
            return sentences.join(" ");
        }
    }

    if start < text.len() {
        sentences.push(&text[start..]);
    }
    sentences.join(" ")
}
