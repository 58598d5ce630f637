use once_cell::sync::Lazy;
use regex::Regex;

/// Sentence terminator candidates: end punctuation, optional closing quotes or
/// brackets, then whitespace.
static SENTENCE_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[.!?]+["'”’)\]]*\s+"#).expect("valid sentence regex"));

/// Alphanumeric runs (allowing inner joiners such as `3.5`, `state-of-the-art`,
/// `1,000`) or any single other non-space character.
static WORD_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\p{L}\p{N}]+(?:['’\-.,][\p{L}\p{N}]+)*|\S").expect("valid word regex")
});

/// Words that are followed by a period without ending the sentence.
const ABBREVIATIONS: &[&str] = &[
    "e.g", "i.e", "al", "fig", "figs", "eq", "eqs", "dr", "mr", "mrs", "ms", "vs", "cf", "no",
    "approx",
];

/// Split text into trimmed, non-empty sentences in reading order.
pub fn sentences(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut start = 0;

    for m in SENTENCE_END.find_iter(text) {
        let terminator = m.as_str();
        if terminator.starts_with('.') && ends_with_abbreviation(&text[start..m.start()]) {
            continue;
        }
        push_trimmed(&mut out, &text[start..m.end()]);
        start = m.end();
    }
    push_trimmed(&mut out, &text[start..]);

    out
}

/// Word-level tokens used for chunk budgets and BLEU.
pub fn word_tokens(text: &str) -> Vec<&str> {
    WORD_TOKEN.find_iter(text).map(|m| m.as_str()).collect()
}

fn ends_with_abbreviation(fragment: &str) -> bool {
    let Some(last) = fragment.split_whitespace().last() else {
        return false;
    };
    let word = last
        .trim_start_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase();
    ABBREVIATIONS.contains(&word.as_str())
}

fn push_trimmed(out: &mut Vec<String>, fragment: &str) {
    let fragment = fragment.trim();
    if !fragment.is_empty() {
        out.push(fragment.to_string());
    }
}
