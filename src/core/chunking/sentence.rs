//! Sentence segmentation.
//!
//! The chunker only needs sentences as ordered slices of its input, so
//! segmentation sits behind the [`SentenceSegmenter`] trait. The default
//! [`UnicodeSentenceSegmenter`] uses UAX #29 sentence boundaries and
//! then re-joins breaks that follow a known abbreviation or an initial.

use unicode_segmentation::UnicodeSegmentation;

/// Language-aware sentence splitter
pub trait SentenceSegmenter {
    /// Split `text` into ordered sentences.
    ///
    /// Returned slices must appear in `text` in order. Whitespace
    /// between them may be omitted; the chunker assigns it to the
    /// preceding sentence.
    fn segment<'a>(&self, text: &'a str, language: &str) -> Vec<&'a str>;
}

/// UAX #29 sentence segmentation with abbreviation repair
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeSentenceSegmenter;

const ENGLISH_ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "mt", "vs", "etc", "e.g", "i.e", "inc",
    "ltd", "co", "corp", "no", "fig", "vol", "ch", "p", "pp", "approx", "dept", "est", "jan",
    "feb", "mar", "apr", "jun", "jul", "aug", "sep", "sept", "oct", "nov", "dec",
];

const RUSSIAN_ABBREVIATIONS: &[&str] = &[
    "т", "т.е", "т.к", "т.д", "т.п", "т.н", "др", "пр", "см", "ср", "стр", "гл", "рис", "г",
    "гг", "в", "вв", "им", "ул", "д", "кв", "тыс", "млн", "млрд", "руб", "коп", "проф", "акад",
    "доц", "англ", "лат", "франц", "нем", "ок", "напр", "св",
];

/// Abbreviations that do not end a sentence, for a language hint
fn abbreviations(language: &str) -> Option<&'static [&'static str]> {
    match language.trim().to_lowercase().as_str() {
        "english" | "en" => Some(ENGLISH_ABBREVIATIONS),
        "russian" | "ru" => Some(RUSSIAN_ABBREVIATIONS),
        _ => None,
    }
}

/// Whether `sentence` ends in a period that belongs to an abbreviation
/// or a single-letter initial ("А. С. Пушкин")
fn ends_with_abbreviation(sentence: &str, list: &[&str]) -> bool {
    let Some(body) = sentence.trim_end().strip_suffix('.') else {
        return false;
    };
    let Some(word) = body.split_whitespace().last() else {
        return false;
    };
    let word = word.trim_start_matches(|c: char| !c.is_alphanumeric());

    let mut chars = word.chars();
    if let (Some(first), None) = (chars.next(), chars.next()) {
        if first.is_uppercase() {
            return true;
        }
    }

    let lowered = word.to_lowercase();
    list.contains(&lowered.as_str())
}

impl SentenceSegmenter for UnicodeSentenceSegmenter {
    fn segment<'a>(&self, text: &'a str, language: &str) -> Vec<&'a str> {
        let list = abbreviations(language);
        let mut spans: Vec<(usize, usize)> = Vec::new();

        for (start, piece) in text.split_sentence_bound_indices() {
            let end = start + piece.len();

            let join = match spans.last() {
                Some(&(prev_start, prev_end)) => {
                    piece.trim().is_empty()
                        || list.is_some_and(|list| {
                            ends_with_abbreviation(&text[prev_start..prev_end], list)
                        })
                }
                None => false,
            };

            match spans.last_mut() {
                Some(last) if join => last.1 = end,
                _ => spans.push((start, end)),
            }
        }

        spans
            .into_iter()
            .map(|(start, end)| &text[start..end])
            .filter(|sentence| !sentence.trim().is_empty())
            .collect()
    }
}
