//! Deterministic cleanup for candidate descriptions.
//!
//! Model output and template output both arrive with the same classes of
//! defect: ragged whitespace, missed capitalization, contraction typos, and
//! missing terminal punctuation. The rules below run in a fixed order because
//! later rules assume earlier ones already ran (spacing is settled before
//! capitalization, capitalization before the word-fix tables). Each rule is a
//! pure `&str -> String` pass with no shared state.

use once_cell::sync::Lazy;
use regex::Regex;

/// Contraction typos repaired as whole words, case-insensitively. The first
/// letter of the replacement inherits the case of the matched word.
const CONTRACTION_FIXES: &[(&str, &str)] = &[
    ("youre", "you're"),
    ("dont", "don't"),
    ("cant", "can't"),
    ("wont", "won't"),
    ("shouldnt", "shouldn't"),
    ("couldnt", "couldn't"),
    ("havent", "haven't"),
    ("hasnt", "hasn't"),
    ("isnt", "isn't"),
    ("arent", "aren't"),
];

/// Misspellings repaired under the same whole-word, case-preserving policy.
const SPELLING_FIXES: &[(&str, &str)] = &[
    ("recieve", "receive"),
    ("seperate", "separate"),
    ("occured", "occurred"),
    ("occuring", "occurring"),
    ("accomodate", "accommodate"),
    ("accomodation", "accommodation"),
];

static RE_WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static RE_SPACE_BEFORE_PUNCT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+([.,!?;:])").unwrap());
static RE_TIGHT_COLON_SEMI: Lazy<Regex> = Lazy::new(|| Regex::new(r"([;:])([A-Za-z(])").unwrap());
static RE_STANDALONE_I: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bi\b").unwrap());
static RE_ITS_VERB: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([Ii])ts\s+(is|was|will|has|had|does|did|can|could|should|would)\b").unwrap()
});
static RE_TIGHT_MID_PUNCT: Lazy<Regex> = Lazy::new(|| Regex::new(r"([.,])([A-Za-z])").unwrap());
static RE_WORD_FIX: Lazy<Regex> = Lazy::new(|| {
    let words = CONTRACTION_FIXES
        .iter()
        .chain(SPELLING_FIXES)
        .map(|(typo, _)| *typo)
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b({words})\b")).unwrap()
});

/// Normalize a candidate description. Idempotent: a second pass over the
/// output is a no-op, and the terminal-punctuation rule never doubles up.
pub fn normalize(input: &str) -> String {
    let text = collapse_whitespace(input);
    let text = tighten_punctuation(&text);
    let text = capitalize_sentences(&text);
    let text = capitalize_standalone_i(&text);
    let text = repair_its_contraction(&text);
    let text = space_after_mid_punctuation(&text);
    let text = apply_word_fixes(&text);
    let text = ensure_terminal_punctuation(&text);
    collapse_whitespace(&text)
}

fn collapse_whitespace(input: &str) -> String {
    RE_WHITESPACE_RUN.replace_all(input, " ").trim().to_string()
}

fn tighten_punctuation(input: &str) -> String {
    let text = RE_SPACE_BEFORE_PUNCT.replace_all(input, "$1");
    RE_TIGHT_COLON_SEMI.replace_all(&text, "$1 $2").to_string()
}

fn capitalize_sentences(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut at_boundary = true;
    for ch in input.chars() {
        if at_boundary && ch.is_alphabetic() {
            out.extend(ch.to_uppercase());
            at_boundary = false;
            continue;
        }
        if matches!(ch, '.' | '!' | '?') {
            at_boundary = true;
        } else if !ch.is_whitespace() {
            // digits, quotes and the like do not open a new sentence
            at_boundary = false;
        }
        out.push(ch);
    }
    out
}

fn capitalize_standalone_i(input: &str) -> String {
    RE_STANDALONE_I.replace_all(input, "I").to_string()
}

fn repair_its_contraction(input: &str) -> String {
    RE_ITS_VERB.replace_all(input, "${1}t's ${2}").to_string()
}

fn space_after_mid_punctuation(input: &str) -> String {
    RE_TIGHT_MID_PUNCT.replace_all(input, "$1 $2").to_string()
}

fn apply_word_fixes(input: &str) -> String {
    RE_WORD_FIX
        .replace_all(input, |caps: &regex::Captures<'_>| {
            let matched = &caps[1];
            let key = matched.to_lowercase();
            let fix = CONTRACTION_FIXES
                .iter()
                .chain(SPELLING_FIXES)
                .find(|(typo, _)| *typo == key)
                .map(|(_, fix)| *fix)
                .unwrap_or(matched);
            match_case(matched, fix)
        })
        .to_string()
}

fn match_case(original: &str, replacement: &str) -> String {
    let starts_upper = original.chars().next().is_some_and(char::is_uppercase);
    if !starts_upper {
        return replacement.to_string();
    }
    let mut chars = replacement.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn ensure_terminal_punctuation(input: &str) -> String {
    let trimmed = input.trim_end();
    if trimmed.is_empty() {
        return String::new();
    }
    if trimmed.ends_with(['.', '!', '?']) {
        trimmed.to_string()
    } else {
        format!("{trimmed}.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn applies_capitalization_contraction_spelling_and_period() {
        assert_eq!(
            normalize("dont worry, this is seperate"),
            "Don't worry, this is separate."
        );
    }

    #[test]
    fn collapses_whitespace_and_tightens_punctuation() {
        assert_eq!(
            normalize("great   product ,  truly ! "),
            "Great product, truly!"
        );
    }

    #[test]
    fn spaces_after_colons_and_semicolons() {
        assert_eq!(normalize("note:two modes;both quiet"), "Note: two modes; both quiet.");
    }

    #[test]
    fn capitalizes_sentence_starts() {
        assert_eq!(
            normalize("fast.reliable.affordable"),
            "Fast. Reliable. Affordable."
        );
    }

    #[test]
    fn leaves_decimals_alone() {
        assert_eq!(normalize("weighs 3.5 pounds"), "Weighs 3.5 pounds.");
    }

    #[test]
    fn uppercases_standalone_i() {
        assert_eq!(normalize("i think i'm sold"), "I think I'm sold.");
    }

    #[test]
    fn repairs_its_before_finite_verbs() {
        assert_eq!(normalize("its can run all day"), "It's can run all day.");
        // possessive "its" stays untouched
        assert_eq!(normalize("its battery lasts"), "Its battery lasts.");
    }

    #[test]
    fn word_fixes_preserve_leading_case() {
        assert_eq!(normalize("Youre going to recieve it"), "You're going to receive it.");
    }

    #[test]
    fn spelling_table_handles_longer_variant() {
        assert_eq!(
            normalize("the accomodation was booked"),
            "The accommodation was booked."
        );
    }

    #[test]
    fn does_not_double_terminal_punctuation() {
        assert_eq!(normalize("Nice product."), "Nice product.");
        assert_eq!(normalize("Really?"), "Really?");
    }

    #[test]
    fn empty_and_blank_inputs_stay_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \n\t "), "");
    }

    #[test]
    fn idempotent_on_representative_inputs() {
        let samples = [
            "dont worry, this is seperate",
            "its will hold ; trust me",
            "  a lamp .  a GOOD lamp ",
            "youre right:i cant argue",
            "ends with colon:",
            "multi\nline\ninput here",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {sample:?}");
        }
    }

    proptest! {
        #[test]
        fn normalizer_is_idempotent(input in "\\PC{0,120}") {
            let once = normalize(&input);
            prop_assert_eq!(normalize(&once), once);
        }
    }
}
