//! Text tokenization and stemming utilities for search indexing.

use rust_stemmers::Stemmer;

/// Minimum token length for indexing. Set to 1 to allow short names like `u8`, `io`, `eq`.
const MIN_TOKEN_LENGTH: usize = 1;

/// Common English stop words filtered out of description tokens.
/// These high-frequency words add little value to search relevance.
pub(crate) const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is", "it",
    "its", "of", "on", "that", "the", "to", "was", "will", "with",
];

/// Words inside type-like text that never narrow a signature search.
const SIGNATURE_KEYWORDS: &[&str] = &["fn", "mut", "dyn", "impl", "const", "where", "for", "self"];

/// Splits text into identifier fragments on case, delimiter and punctuation boundaries.
///
/// This function implements a state machine that splits text on multiple boundaries:
/// - **CamelCase**: "HttpServer" → ["Http", "Server", "HttpServer"]
/// - **Acronyms**: "HTTPServer" → ["HTTP", "Server", "HTTPServer"]
/// - **snake_case**: "parse_json" → ["parse", "json", "parse_json"]
/// - **hyphen-case**: "multi-line" → ["multi", "line", "multi-line"]
///
/// The state machine maintains two pointers:
/// - `word_start`: Start of the complete word (e.g., "HttpServer")
/// - `subword_start`: Start of the current sub-component (e.g., "Server")
///
/// Digits belong to the word they appear in and never start a new subword, so
/// `from_u64` yields ["from", "u64", "from_u64"].
pub(crate) fn split_words(text: &str, mut emit: impl FnMut(&str)) {
    // State machine variables
    let mut last_case = None; // Case of the last alphabetic char
    let mut prev_upper = false; // Whether the immediately preceding char was uppercase
    let mut word_start = 0;
    let mut subword_start = 0;
    let mut word_start_next_char = true;
    let mut subword_start_next_char = true;

    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if word_start_next_char {
            word_start = i;
            subword_start = i;
            word_start_next_char = false;
            subword_start_next_char = false;
            last_case = None;
        }

        if subword_start_next_char {
            subword_start = i;
            subword_start_next_char = false;
        }

        // Detect case changes for CamelCase splitting (lowercase → uppercase), and the
        // last capital of an acronym run when lowercase follows ("HTTP" | "Server")
        let current_case = c.is_alphabetic().then(|| c.is_uppercase());
        let next_lower = chars.peek().is_some_and(|&(_, next)| next.is_lowercase());
        let acronym_end =
            prev_upper && current_case == Some(true) && next_lower && i > subword_start;
        let case_change = (last_case == Some(false) && current_case == Some(true)) || acronym_end;
        if current_case.is_some() {
            last_case = current_case;
        }
        prev_upper = current_case == Some(true);

        if c == '-' || c == '_' {
            // Snake_case / hyphen-case boundary
            if i.saturating_sub(subword_start) >= MIN_TOKEN_LENGTH {
                emit(&text[subword_start..i]);
            }
            subword_start_next_char = true;
            last_case = None;
        } else if !c.is_alphanumeric() {
            // End of complete word: emit the trailing subword, then the whole word
            if i.saturating_sub(subword_start) >= MIN_TOKEN_LENGTH && subword_start != word_start {
                emit(&text[subword_start..i]);
            }
            if i.saturating_sub(word_start) >= MIN_TOKEN_LENGTH {
                emit(&text[word_start..i]);
            }
            word_start_next_char = true;
        } else if case_change {
            // CamelCase boundary: "http" → "S" in "httpServer"
            if i.saturating_sub(subword_start) >= MIN_TOKEN_LENGTH {
                emit(&text[subword_start..i]);
            }
            subword_start = i;
        }
    }

    // Handle final tokens at end of string
    if !word_start_next_char {
        let last_subword = if subword_start_next_char {
            ""
        } else {
            &text[subword_start..]
        };
        if word_start != subword_start && last_subword.len() >= MIN_TOKEN_LENGTH {
            emit(last_subword);
        }
        let last_word = &text[word_start..];
        if last_word.len() >= MIN_TOKEN_LENGTH {
            emit(last_word);
        }
    }
}

/// Lowercase name tokens, deduplicated, in first-seen order.
///
/// Every fragment is kept (no stemming, no stop words) so prefix lookups work on
/// partial identifiers such as `seq` → `sequence_id`.
pub(crate) fn name_tokens(name: &str) -> Vec<String> {
    let mut tokens: Vec<String> = vec![];
    split_words(name, |fragment| {
        let lowercase = fragment.to_lowercase();
        if !tokens.contains(&lowercase) {
            tokens.push(lowercase);
        }
    });
    tokens
}

/// Tokenizes text into searchable terms with stemming and case-aware splitting.
///
/// Used for documentation summaries, where morphology matters more than exact
/// identifiers: "parsing" and "parses" both reduce to "pars".
pub(crate) fn tokenize_and_stem(text: &str, stemmer: &Stemmer) -> Vec<String> {
    let mut tokens = vec![];
    split_words(text, |fragment| index_token(fragment, &mut tokens, stemmer));
    tokens
}

/// Add a token using proper stemming algorithm, filtering out stop words and bare numbers.
pub(crate) fn index_token(token: &str, tokens: &mut Vec<String>, stemmer: &Stemmer) {
    let lowercase = token.to_lowercase();

    if STOP_WORDS.contains(&lowercase.as_str()) || lowercase.chars().all(|c| c.is_ascii_digit()) {
        return;
    }

    let stemmed = stemmer.stem(&lowercase);
    tokens.push(stemmed.into_owned());
}

/// Extracts signature tokens from type-like text.
///
/// Splits on everything that cannot appear in an identifier, lowercases, drops
/// keywords, then sorts and deduplicates: `fn(&[u8]) -> IoResult<Packet>` becomes
/// ["ioresult", "packet", "u8"].
pub(crate) fn signature_tokens(text: &str) -> Vec<String> {
    let mut tokens: Vec<String> = text
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|word| word.len() >= MIN_TOKEN_LENGTH)
        .map(str::to_lowercase)
        .filter(|word| !SIGNATURE_KEYWORDS.contains(&word.as_str()))
        .collect();
    tokens.sort_unstable();
    tokens.dedup();
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;
    use rust_stemmers::Algorithm;

    #[rstest]
    #[case("CamelCase", &["camel", "case", "camelcase"])]
    #[case("snake_case", &["snake", "case", "snake_case"])]
    #[case("hyphen-case", &["hyphen", "case", "hyphen-case"])]
    #[case("sequence_id", &["sequence", "id", "sequence_id"])]
    #[case("from_u64", &["from", "u64", "from_u64"])]
    #[case("PacketType", &["packet", "type", "packettype"])]
    #[case("tm_isdst", &["tm", "isdst", "tm_isdst"])]
    #[case("HTTPServer", &["http", "server", "httpserver"])]
    #[case("IOError", &["io", "error", "ioerror"])]
    #[case("parse_HTTPRequest", &["parse", "http", "request", "parse_httprequest"])]
    #[case("URL", &["url"])]
    fn test_name_tokens(#[case] input: &str, #[case] expected: &[&str]) {
        check!(name_tokens(input) == expected);
    }

    #[rstest]
    #[case("Packet", &["packet"])]
    #[case("u8", &["u8"])]
    #[case("__private", &["private", "__private"])]
    #[case("", &[])]
    fn test_name_tokens_edges(#[case] input: &str, #[case] expected: &[&str]) {
        check!(name_tokens(input) == expected);
    }

    #[rstest]
    #[case("CamelCases hyphenate-words snake_words", &["camel", "case", "hyphen", "word", "snake"])]
    #[case("Serialized user data goes in here", &["serial", "user", "data", "goe", "here"])]
    fn test_extract_tokens_contains(#[case] input: &str, #[case] expected_tokens: &[&str]) {
        let stemmer = Stemmer::create(Algorithm::English);
        let tokens = tokenize_and_stem(input, &stemmer);
        for expected in expected_tokens {
            check!(tokens.contains(&expected.to_string()), "missing {}", expected);
        }
    }

    #[rstest]
    #[case("plurals", vec!["plural"])]
    #[case("ab abc", vec!["ab", "abc"])] // "a" is a stop word, filtered out
    #[case("Vec2", vec!["vec2"])]
    #[case("seconds 60", vec!["second"])] // bare numbers are dropped
    fn test_extract_tokens_exact(#[case] input: &str, #[case] expected: Vec<&str>) {
        let stemmer = Stemmer::create(Algorithm::English);
        let tokens = tokenize_and_stem(input, &stemmer);
        check!(tokens == expected);
    }

    #[rstest]
    #[case("the quick brown fox", vec!["quick", "brown", "fox"])]
    #[case("a function for parsing", vec!["function", "pars"])] // "parsing" → "pars"
    #[case("is it working", vec!["work"])] // "working" → "work"
    fn test_stop_words_filtered(#[case] input: &str, #[case] expected_contains: Vec<&str>) {
        let stemmer = Stemmer::create(Algorithm::English);
        let tokens = tokenize_and_stem(input, &stemmer);

        for stop_word in STOP_WORDS {
            check!(!tokens.contains(&stop_word.to_string()));
        }

        for expected in expected_contains {
            check!(tokens.contains(&expected.to_string()));
        }
    }

    #[rstest]
    #[case("fn(&[u8]) -> IoResult<Packet>", &["ioresult", "packet", "u8"])]
    #[case("(&mut self, Packet) -> bool", &["bool", "packet"])]
    #[case("Option<T>, Option<T>", &["option", "t"])]
    #[case("() -> ()", &[])]
    fn test_signature_tokens(#[case] input: &str, #[case] expected: &[&str]) {
        check!(signature_tokens(input) == expected);
    }

    #[rstest]
    #[case("Москва")] // Cyrillic
    #[case("日本")] // Japanese
    #[case("🦀")] // Emoji
    #[case("ÀbcDéf")]
    fn test_unicode_handling(#[case] input: &str) {
        let stemmer = Stemmer::create(Algorithm::English);
        // Should not panic, even if it produces empty results
        let _tokens = tokenize_and_stem(input, &stemmer);
        let _names = name_tokens(input);
    }

    #[test]
    fn test_empty_and_whitespace() {
        let stemmer = Stemmer::create(Algorithm::English);
        check!(tokenize_and_stem("", &stemmer).is_empty());
        check!(tokenize_and_stem("   ", &stemmer).is_empty());
        check!(tokenize_and_stem("\n\t", &stemmer).is_empty());
        check!(name_tokens("  ").is_empty());
    }
}
