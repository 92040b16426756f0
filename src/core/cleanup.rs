//! Cleanup of raw model output into plain Korean text
//!
//! Models tend to echo the prompt, append notes in English or Japanese, wrap
//! asides in parentheses and repeat the same sentence. [`clean_translation`]
//! strips all of that, keeping Hangul, digits, sentence punctuation and
//! whitespace. It is a fixed point: cleaning cleaned text changes nothing.

use regex::Regex;
use std::sync::LazyLock;

use crate::core::errors::{Result, TranslationError};
use crate::core::prompt::{INSTRUCTION, SOURCE_MARKER, TARGET_MARKER};

/// Parenthesised or bracketed asides, half and full width
static BRACKETED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\([^)]*\)|（[^）]*）|\[[^\]]*\]|【[^】]*】").expect("bracket pattern is valid")
});

/// Clean raw backend output.
///
/// Returns [`TranslationError::EmptyResponse`] when no Korean text survives.
pub fn clean_translation(raw: &str) -> Result<String> {
    let text = raw.trim();
    let text = match text.rfind(TARGET_MARKER) {
        Some(idx) => &text[idx + TARGET_MARKER.len()..],
        None => text,
    };

    let mut lines: Vec<String> = Vec::new();
    for line in text.lines() {
        if is_source_echo(line) {
            continue;
        }
        let Some(cleaned) = clean_line(line).and_then(strip_instruction) else {
            continue;
        };
        if lines.last() == Some(&cleaned) {
            continue;
        }
        lines.push(cleaned);
    }

    if lines.is_empty() {
        return Err(TranslationError::EmptyResponse);
    }

    Ok(lines.join("\n"))
}

fn is_hangul(c: char) -> bool {
    ('\u{AC00}'..='\u{D7A3}').contains(&c) || ('\u{3131}'..='\u{318E}').contains(&c)
}

fn contains_hangul(text: &str) -> bool {
    text.chars().any(is_hangul)
}

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?' | '…')
}

/// Punctuation that attaches to the preceding word
fn is_clause_punct(c: char) -> bool {
    is_terminator(c) || matches!(c, ',' | '~')
}

fn is_quote(c: char) -> bool {
    matches!(c, '"' | '\'' | '“' | '”' | '‘' | '’')
}

fn is_closing_quote(c: char) -> bool {
    matches!(c, '”' | '’')
}

/// Map full-width and Japanese punctuation onto what Korean text uses
fn normalize_punct(c: char) -> char {
    match c {
        '。' | '．' => '.',
        '、' | '，' => ',',
        '！' => '!',
        '？' => '?',
        '～' | '〜' => '~',
        '「' => '“',
        '」' => '”',
        '『' => '‘',
        '』' => '’',
        other => other,
    }
}

/// A line that repeats the source part of the prompt
fn is_source_echo(line: &str) -> bool {
    line.trim_start_matches(|c: char| !is_hangul(c))
        .starts_with(SOURCE_MARKER)
}

/// Remove echoed instruction sentences from the start of a cleaned line.
///
/// Terminators and closing quotes glued to the instruction go with it, and
/// the remainder is cleaned again.
fn strip_instruction(line: String) -> Option<String> {
    let mut current = line;
    while let Some(rest) = current.strip_prefix(INSTRUCTION) {
        let rest = rest.trim_start_matches(|c: char| is_terminator(c) || is_closing_quote(c));
        current = clean_line(rest)?;
    }
    Some(current)
}

fn clean_line(line: &str) -> Option<String> {
    let without_asides = BRACKETED.replace_all(line, " ");
    let filtered = filter_script(&without_asides);

    let mut sentences: Vec<String> = Vec::new();
    for sentence in split_sentences(&filtered) {
        if !contains_hangul(&sentence) {
            continue;
        }
        let sentence = collapse_repeated_words(sentence);
        let is_repeat = sentences
            .last()
            .is_some_and(|prev| sentence_key(prev) == sentence_key(&sentence));
        if !is_repeat {
            sentences.push(sentence);
        }
    }

    if sentences.is_empty() {
        None
    } else {
        Some(sentences.join(" "))
    }
}

/// Keep Hangul, digits, quotes, clause punctuation and single spaces.
///
/// Punctuation following discarded text belongs to that text and is dropped
/// with it.
fn filter_script(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut dropped_text = false;

    for c in text.chars().map(normalize_punct) {
        if c.is_whitespace() {
            if !out.is_empty() && !out.ends_with(' ') {
                out.push(' ');
            }
        } else if is_hangul(c) || c.is_ascii_digit() || is_quote(c) {
            out.push(c);
            dropped_text = false;
        } else if is_clause_punct(c) {
            if dropped_text {
                continue;
            }
            if out.ends_with(' ') {
                out.pop();
            }
            out.push(c);
        } else {
            dropped_text = true;
        }
    }

    out.trim_end().to_string()
}

fn is_decimal_point(chars: &[char], i: usize) -> bool {
    chars[i] == '.'
        && i > 0
        && chars[i - 1].is_ascii_digit()
        && chars.get(i + 1).is_some_and(|c| c.is_ascii_digit())
}

/// Split at sentence terminators. Runs of terminators and closing quotes stay
/// with the sentence they end.
fn split_sentences(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut sentences = Vec::new();
    let mut current = String::new();

    let mut i = 0;
    while i < chars.len() {
        current.push(chars[i]);
        if is_terminator(chars[i]) && !is_decimal_point(&chars, i) {
            while i + 1 < chars.len()
                && (is_terminator(chars[i + 1]) || is_closing_quote(chars[i + 1]))
            {
                i += 1;
                current.push(chars[i]);
            }
            push_sentence(&mut sentences, &current);
            current.clear();
        }
        i += 1;
    }
    push_sentence(&mut sentences, &current);

    sentences
}

fn push_sentence(sentences: &mut Vec<String>, raw: &str) {
    let sentence = raw.trim_start_matches(|c: char| c.is_whitespace() || is_clause_punct(c));
    let sentence = sentence.trim_end();
    if !sentence.is_empty() {
        sentences.push(sentence.to_string());
    }
}

/// Comparison key for duplicate detection
fn sentence_key(sentence: &str) -> &str {
    sentence.trim_end_matches(|c: char| is_terminator(c) || is_closing_quote(c))
}

/// "A B A B." becomes "A B."
fn collapse_repeated_words(sentence: String) -> String {
    let body = sentence_key(&sentence);
    let tail = &sentence[body.len()..];
    let words: Vec<&str> = body.split_whitespace().collect();
    let n = words.len();

    for period in 1..=n / 2 {
        if n % period == 0 && (period..n).all(|i| words[i] == words[i % period]) {
            return format!("{}{}", words[..period].join(" "), tail);
        }
    }

    sentence
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean(raw: &str) -> String {
        clean_translation(raw).unwrap()
    }

    #[test]
    fn test_duplicate_sentence_collapsed() {
        assert_eq!(clean("안녕하세요. 안녕하세요."), "안녕하세요.");
    }

    #[test]
    fn test_duplicate_ignores_spacing_and_final_punctuation() {
        assert_eq!(clean("안녕하세요.   안녕하세요"), "안녕하세요.");
        assert_eq!(clean("좋은  아침입니다! 좋은 아침입니다!"), "좋은 아침입니다!");
    }

    #[test]
    fn test_non_consecutive_duplicates_kept() {
        assert_eq!(clean("네. 아니요. 네."), "네. 아니요. 네.");
    }

    #[test]
    fn test_repeated_word_sequence_collapsed() {
        assert_eq!(clean("안녕하세요 안녕하세요"), "안녕하세요");
        assert_eq!(clean("좋은 아침입니다 좋은 아침입니다."), "좋은 아침입니다.");
    }

    #[test]
    fn test_script_filter_drops_labels_and_notes() {
        assert_eq!(clean("Korean: 안녕하세요 (translation note)"), "안녕하세요");
        assert_eq!(clean("안녕하세요（注：挨拶）"), "안녕하세요");
        assert_eq!(clean("Hello, 반갑습니다 😊"), "반갑습니다");
    }

    #[test]
    fn test_punctuation_after_dropped_text_removed() {
        assert_eq!(clean("안녕하세요。元気ですか？"), "안녕하세요.");
    }

    #[test]
    fn test_space_before_punctuation_removed() {
        assert_eq!(clean("고마워요 (thanks) !"), "고마워요!");
    }

    #[test]
    fn test_japanese_punctuation_normalized() {
        assert_eq!(clean("그는 「안녕」이라고 말했다。"), "그는 “안녕”이라고 말했다.");
    }

    #[test]
    fn test_decimal_numbers_survive() {
        assert_eq!(clean("가격은 3.5달러입니다."), "가격은 3.5달러입니다.");
    }

    #[test]
    fn test_target_marker_echo_stripped() {
        let raw = "다음 일본어를 한국어로 번역해주세요. 번역 결과만 출력하세요.\n\n일본어: こんにちは\n한국어: 안녕하세요";
        assert_eq!(clean(raw), "안녕하세요");
    }

    #[test]
    fn test_source_echo_line_dropped() {
        assert_eq!(clean("일본어: こんにちは 인사\n안녕하세요"), "안녕하세요");
    }

    #[test]
    fn test_instruction_echo_stripped() {
        let raw = "다음 일본어를 한국어로 번역해주세요. 번역 결과만 출력하세요. 감사합니다.";
        assert_eq!(clean(raw), "감사합니다.");
    }

    #[test]
    fn test_multiline_output_kept_and_deduplicated() {
        assert_eq!(clean("첫 줄입니다.\n첫 줄입니다.\n\n둘째 줄입니다."), "첫 줄입니다.\n둘째 줄입니다.");
    }

    #[test]
    fn test_only_foreign_text_is_empty() {
        for raw in ["Translation: hello (note)", "こんにちは。", "", "   ", "123 !!", "(안녕하세요)"] {
            assert!(
                matches!(clean_translation(raw), Err(TranslationError::EmptyResponse)),
                "expected empty for {:?}",
                raw
            );
        }
    }

    #[test]
    fn test_instruction_glued_to_quote_and_terminators() {
        let raw = "다음 일본어를 한국어로 번역해주세요.번역 결과만 출력하세요.」。?다음 일본어를 한국어로 번역해주세요.,";
        assert_eq!(clean(raw), "다음 일본어를 한국어로 번역해주세요.");

        let raw = "다음 일본어를 한국어로 번역해주세요. 번역 결과만 출력하세요.」 안녕하세요";
        assert_eq!(clean(raw), "안녕하세요");
    }

    #[test]
    fn test_cleanup_is_idempotent() {
        let samples = [
            "안녕하세요. 안녕하세요.",
            "Korean: 안녕하세요 (translation note)",
            "한국어: 좋은 아침이에요!! 좋은 아침이에요!!\n\nNote: this is casual.",
            "그는 「안녕」이라고 말했다。 그는 「안녕」이라고 말했다。",
            "…음, 글쎄요 ~ 잘 모르겠어요?! (uncertain)",
            "가격은 3.5달러. 3.5달러. 5 달러!",
            "* 일본어: 猫\n고양이\n고양이\nㅋㅋ 재밌네요",
        ];

        for raw in samples {
            let once = clean(raw);
            assert_eq!(once, clean(&once), "not a fixed point for {:?}", raw);
        }
    }

    #[test]
    fn test_cleanup_is_idempotent_on_generated_output() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let pieces = [
            "안녕하세요", "가", "네", "3", "5", INSTRUCTION, "다음 일본어를 한국어로 번역해주세요.",
            TARGET_MARKER, SOURCE_MARKER, ".", "!", "?", "…", ",", "~", "“", "”", "‘", "’", "「",
            "」", "(", ")", "[", "]", "（", "）", "\n", " ", "  ", "Note", "abc", "こんにちは",
            "。", "？",
        ];
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..20_000 {
            let len = rng.random_range(1..=14);
            let raw: String = (0..len)
                .map(|_| pieces[rng.random_range(0..pieces.len())])
                .collect();

            if let Ok(once) = clean_translation(&raw) {
                assert_eq!(
                    clean_translation(&once).ok().as_deref(),
                    Some(once.as_str()),
                    "not a fixed point for {:?}",
                    raw
                );
            }
        }
    }
}
