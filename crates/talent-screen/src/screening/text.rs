//! Answer normalisation helpers shared by the scoring rules and highlight builders.

use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Trim, lower-case and fold accents so `" Sí "` compares equal to `"si"`.
pub fn normalize_answer(raw: &str) -> String {
    strip_accents(raw.trim()).to_lowercase()
}

/// Aggressive cleaning used for keyword lookups in free text: accents folded,
/// punctuation and digits dropped, whitespace collapsed.
pub fn clean_free_text(raw: &str) -> String {
    let folded: String = strip_accents(raw)
        .to_lowercase()
        .chars()
        .map(|ch| {
            if ch.is_alphabetic() || ch.is_whitespace() {
                ch
            } else {
                ' '
            }
        })
        .collect();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Character-safe truncation for display labels.
pub fn truncate_display(text: &str, limit: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= limit {
        return trimmed.to_string();
    }
    trimmed
        .chars()
        .take(limit)
        .collect::<String>()
        .trim_end()
        .to_string()
}

fn strip_accents(raw: &str) -> String {
    raw.nfd().filter(|ch| !is_combining_mark(*ch)).collect()
}

/// Non-scoring match report for open text answers with authored keywords.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordSignal {
    pub matched: Vec<String>,
    pub total_keywords: usize,
    pub occurrences: usize,
}

impl KeywordSignal {
    pub fn coverage(&self) -> f32 {
        if self.total_keywords == 0 {
            0.0
        } else {
            self.matched.len() as f32 / self.total_keywords as f32
        }
    }
}

/// Count authored keywords inside a free text answer. Returns `None` when no
/// usable keywords were authored.
pub fn keyword_signal(answer: &str, keywords: &[String]) -> Option<KeywordSignal> {
    let cleaned_keywords: Vec<(&String, String)> = keywords
        .iter()
        .map(|keyword| (keyword, clean_free_text(keyword)))
        .filter(|(_, cleaned)| !cleaned.is_empty())
        .collect();

    if cleaned_keywords.is_empty() {
        return None;
    }

    let haystack = clean_free_text(answer);
    let mut matched = Vec::new();
    let mut occurrences = 0;

    for (original, cleaned) in &cleaned_keywords {
        let count = haystack.matches(cleaned.as_str()).count();
        if count > 0 {
            matched.push((*original).clone());
            occurrences += count;
        }
    }

    Some(KeywordSignal {
        matched,
        total_keywords: cleaned_keywords.len(),
        occurrences,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_answer_folds_case_space_and_accents() {
        assert_eq!(normalize_answer(" SÍ "), "si");
        assert_eq!(normalize_answer("Si"), "si");
        assert_eq!(normalize_answer("Técnico"), "tecnico");
    }

    #[test]
    fn clean_free_text_drops_digits_and_punctuation() {
        assert_eq!(
            clean_free_text("¡Latencia  baja, 300 megas!"),
            "latencia baja megas"
        );
    }

    #[test]
    fn truncate_display_respects_multibyte_characters() {
        let label = truncate_display("¿Tienes certificación técnica vigente?", 14);
        assert_eq!(label, "¿Tienes certif");
        assert_eq!(truncate_display("short", 50), "short");
    }

    #[test]
    fn keyword_signal_counts_matches_without_scoring() {
        let keywords = vec!["Fibra".to_string(), "latencia".to_string(), "SLA".to_string()];
        let signal = keyword_signal("La fibra óptica reduce la latencia; fibra simétrica.", &keywords)
            .expect("keywords authored");

        assert_eq!(signal.matched, vec!["Fibra".to_string(), "latencia".to_string()]);
        assert_eq!(signal.total_keywords, 3);
        assert_eq!(signal.occurrences, 3);
        assert!((signal.coverage() - 2.0 / 3.0).abs() < f32::EPSILON);
    }

    #[test]
    fn keyword_signal_is_absent_without_keywords() {
        assert!(keyword_signal("anything", &[]).is_none());
        assert!(keyword_signal("anything", &["  ".to_string()]).is_none());
    }
}
