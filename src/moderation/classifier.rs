/// Spam verdict for a single text against a single term list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Clean,
    Spam,
}

/// Classifies `text` against a term list with a maximum tolerated match
/// density.
///
/// Match density is the fraction of the text, in characters, covered by
/// case-insensitive non-overlapping occurrences of the listed terms. Blank
/// or whitespace-only text is always `Clean` and is not evaluated at all.
///
/// Pure and deterministic; never errors.
pub fn classify(text: &str, terms: &[String], threshold: f64) -> Verdict {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Verdict::Clean;
    }

    let haystack = trimmed.to_lowercase();
    let total_chars = haystack.chars().count() as f64;

    let mut matched_chars = 0.0;
    for term in terms {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            continue;
        }

        let occurrences = haystack.matches(needle.as_str()).count();
        if occurrences > 0 {
            matched_chars += (occurrences * needle.chars().count()) as f64;
        }
    }

    if matched_chars / total_chars > threshold {
        Verdict::Spam
    } else {
        Verdict::Clean
    }
}
