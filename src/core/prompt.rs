//! Prompt template for Japanese to Korean translation

/// Instruction line that opens every prompt
pub const INSTRUCTION: &str = "다음 일본어를 한국어로 번역해주세요. 번역 결과만 출력하세요.";

/// Marker preceding the Japanese source text
pub const SOURCE_MARKER: &str = "일본어:";

/// Marker the completion is anchored to
pub const TARGET_MARKER: &str = "한국어:";

/// System instruction sent alongside the prompt
pub const SYSTEM_PROMPT: &str = "당신은 일본어를 한국어로 번역하는 전문가입니다. \
주어진 일본어를 자연스러운 한국어로 번역해주세요. \
번역 결과만 출력하고 다른 설명은 하지 마세요.";

/// Build the prompt for `source`. The text is embedded verbatim.
pub fn build_prompt(source: &str) -> String {
    format!(
        "{}\n\n{} {}\n{}",
        INSTRUCTION, SOURCE_MARKER, source, TARGET_MARKER
    )
}
