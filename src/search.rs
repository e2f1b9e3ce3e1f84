//! Text-indexing helpers: soundex, trigrams, friendly URLs
//!
//! Small pure helpers for building fuzzy and partial-match search fields
//! on documents: a phonetic code for name matching, overlapping trigram
//! windows for substring search, slugified URLs, and category-path
//! prefixes for hierarchy filters.

use std::collections::HashSet;

/// Digit class for a letter per the American Soundex table; vowels map
/// to the empty class and h/w are transparent separators.
fn soundex_class(c: char) -> Option<char> {
    match c.to_ascii_lowercase() {
        'b' | 'f' | 'p' | 'v' => Some('1'),
        'c' | 'g' | 'j' | 'k' | 'q' | 's' | 'x' | 'z' => Some('2'),
        'd' | 't' => Some('3'),
        'l' => Some('4'),
        'm' | 'n' => Some('5'),
        'r' => Some('6'),
        _ => None,
    }
}

/// Classic American Soundex code of a word.
///
/// First letter kept verbatim (upper-cased); following letters map to
/// their digit class, consecutive duplicate classes collapse (including
/// against the first letter's class). Vowels break duplicate runs, h and
/// w do not. The result is padded or truncated to 4 characters. Returns
/// an empty string for input with no letters.
pub fn soundex(input: &str) -> String {
    let mut letters = input.chars().filter(|c| c.is_ascii_alphabetic());
    let Some(first) = letters.next() else {
        return String::new();
    };

    let mut code = String::with_capacity(4);
    code.push(first.to_ascii_uppercase());
    let mut prev = soundex_class(first);
    for c in letters {
        if code.len() == 4 {
            break;
        }
        if matches!(c.to_ascii_lowercase(), 'h' | 'w') {
            continue;
        }
        let class = soundex_class(c);
        if let Some(digit) = class {
            if prev != class {
                code.push(digit);
            }
        }
        prev = class;
    }
    while code.len() < 4 {
        code.push('0');
    }
    code
}

/// Lazy iterator of overlapping 3-character windows, deduplicated while
/// preserving first-occurrence order
#[derive(Debug, Clone)]
pub struct Trigrams {
    chars: Vec<char>,
    pos: usize,
    seen: HashSet<String>,
}

impl Iterator for Trigrams {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        while self.pos + 3 <= self.chars.len() {
            let window: String = self.chars[self.pos..self.pos + 3].iter().collect();
            self.pos += 1;
            if self.seen.insert(window.clone()) {
                return Some(window);
            }
        }
        None
    }
}

/// Overlapping trigrams of the input, lazily and without duplicates.
///
/// Inputs shorter than 3 characters yield nothing; re-invoking restarts
/// the sequence.
pub fn trigrams(input: &str) -> Trigrams {
    Trigrams {
        chars: input.chars().collect(),
        pos: 0,
        seen: HashSet::new(),
    }
}

/// Slugify a string for use as a URL segment or document id.
///
/// Lowercased and trimmed; `/` becomes the reversible `___` delimiter
/// before slugification so path-like inputs survive; other punctuation
/// is dropped and runs of whitespace collapse to single hyphens.
pub fn friendly_url(input: &str) -> String {
    let lowered = input.trim().to_lowercase().replace('/', "___");
    let trimmed = lowered.trim_matches(|c: char| !c.is_ascii_alphanumeric());
    let cleaned: String = trimmed
        .replace('-', " ")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == ' ')
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join("-")
}

/// Every prefix of a `/`-separated category path, longest first.
///
/// `"a/b/c"` yields `["a/b/c", "a/b", "a"]`; used to index a document
/// under its whole category hierarchy.
pub fn category_array(category: &str) -> Vec<String> {
    let mut prefixes = Vec::new();
    let mut cat = category;
    while !cat.is_empty() {
        prefixes.push(cat.to_string());
        cat = cat.rsplit_once('/').map(|(head, _)| head).unwrap_or("");
    }
    prefixes
}
