use std::collections::HashSet;

use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

const MIN_TOKEN_CHARS: usize = 2;

/// Canonical form used for case-insensitive comparison of whole terms such as prop names.
pub fn normalize_term(value: &str) -> String {
	value.trim().nfkc().collect::<String>().to_lowercase()
}

pub fn terms_equal(lhs: &str, rhs: &str) -> bool {
	normalize_term(lhs) == normalize_term(rhs)
}

/// Lowercased word tokens in first-seen order, without duplicates.
pub fn tokenize(text: &str) -> Vec<String> {
	let mut out = Vec::new();
	let mut seen = HashSet::new();

	push_tokens(&mut out, &mut seen, text);

	out
}

/// Appends the tokens of `text` that are not yet in `seen`.
pub fn push_tokens(out: &mut Vec<String>, seen: &mut HashSet<String>, text: &str) {
	for token in words(text) {
		if seen.insert(token.clone()) {
			out.push(token);
		}
	}
}

/// Every word token of `text`, repeats included. Used for term frequencies.
pub fn words(text: &str) -> Vec<String> {
	let normalized = text.nfkc().collect::<String>().to_lowercase();

	normalized
		.unicode_words()
		.filter(|word| word.chars().count() >= MIN_TOKEN_CHARS)
		.map(str::to_string)
		.collect()
}

/// Entries of `available` that also appear in `requested`, compared case-insensitively.
///
/// The result follows the order and spelling of `available`.
pub fn match_terms(requested: &[String], available: &[String]) -> Vec<String> {
	if requested.is_empty() || available.is_empty() {
		return Vec::new();
	}

	let wanted: HashSet<String> = requested.iter().map(|term| normalize_term(term)).collect();
	let mut seen = HashSet::new();
	let mut out = Vec::new();

	for term in available {
		let key = normalize_term(term);

		if wanted.contains(&key) && seen.insert(key) {
			out.push(term.clone());
		}
	}

	out
}
