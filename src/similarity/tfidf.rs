//! Tokenization and TF-IDF weighting for short documents (titles, tags).

use std::collections::{HashMap, HashSet};

const STRIPPED_CHARS: [char; 12] = ['.', ',', ':', '(', ')', '"', '\'', '|', '!', '?', '#', ';'];

/// Lowercases `text`, strips punctuation and splits it on whitespace
pub fn tokenize(text: &str) -> Vec<String> {
    text.chars()
        .filter(|c| !STRIPPED_CHARS.contains(c))
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Term frequency of already tokenized text
pub fn tf_from_tokens<S: AsRef<str>>(tokens: &[S]) -> HashMap<String, f64> {
    let mut counts: HashMap<String, f64> = HashMap::new();
    for token in tokens {
        *counts.entry(token.as_ref().to_string()).or_insert(0.0) += 1.0;
    }
    let total = tokens.len() as f64;
    for frequency in counts.values_mut() {
        *frequency /= total;
    }
    counts
}

/// Term frequency: occurrences of each token divided by the document's token count
pub fn tf(document: &str) -> HashMap<String, f64> {
    tf_from_tokens(&tokenize(document))
}

/// Inverse document frequency over already tokenized documents
pub fn idf_from_tokens<'a, I>(documents: I) -> HashMap<String, f64>
where
    I: IntoIterator<Item = &'a [String]>,
{
    let mut document_count = 0usize;
    let mut occurrences: HashMap<&str, usize> = HashMap::new();
    for document in documents {
        document_count += 1;
        let distinct: HashSet<&str> = document.iter().map(String::as_str).collect();
        for token in distinct {
            *occurrences.entry(token).or_insert(0) += 1;
        }
    }

    let total = document_count as f64;
    occurrences
        .into_iter()
        .map(|(token, count)| (token.to_string(), (total / count as f64).log10()))
        .collect()
}

/// Inverse document frequency: log10(N / documents containing the token).
///
/// A token counts at most once per document.
pub fn idf<S: AsRef<str>>(documents: &[S]) -> HashMap<String, f64> {
    let tokenized: Vec<Vec<String>> = documents
        .iter()
        .map(|document| tokenize(document.as_ref()))
        .collect();
    idf_from_tokens(tokenized.iter().map(Vec::as_slice))
}
