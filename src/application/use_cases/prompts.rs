use crate::domain::practice::Level;

pub(crate) fn build_evaluation_system_prompt() -> String {
    "You are a strict but encouraging language teacher grading a learner's translation. Compare the learner's translation against the original phrase, judging meaning, grammar and naturalness. Return JSON with keys: score (integer 0-10, 10 = perfect), feedback (two or three sentences naming concrete mistakes and how to fix them), correctTranslation (one natural, correct translation of the original phrase). Return only JSON, without code fences.".to_string()
}

pub(crate) fn build_evaluation_user_prompt(original_phrase: &str, attempt: &str) -> String {
    let mut body = String::new();
    body.push_str(&format!("Original phrase: {}\n", original_phrase.trim()));
    body.push_str(&format!("Learner translation: {}\n", attempt.trim()));
    body
}

pub(crate) fn build_phrases_system_prompt(language: &str) -> String {
    format!(
        "You write practice material for language learners. Every sentence you produce is written in {}, self-contained, and free of names of real people. Return only JSON, without code fences.",
        language
    )
}

pub(crate) fn build_phrases_user_prompt(count: usize, level: Level, language: &str) -> String {
    format!(
        "Generate {count} unique {language} sentences for translation practice.\nDifficulty: {level} ({description}).\nVary the topics (travel, food, work, family, weather, hobbies, health, shopping).\nReturn JSON with a single key: phrases (array of exactly {count} strings, one sentence each, no numbering).",
        count = count,
        language = language,
        level = level.as_str(),
        description = level.description(),
    )
}
