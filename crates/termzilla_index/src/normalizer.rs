use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

/// Сервис нормализации: токен → канонический терм (или None для стоп-слов).
/// Передаётся явно в билдер и движок запросов, без глобального состояния.
pub trait Normalizer {
    /// None — стоп-слово или токен, схлопнувшийся в пустую строку.
    fn normalize(&self, token: &str) -> Option<String>;

    /// Разбить текст на сырые токены (по не-алфанумерике).
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Развернуть вложенное значение поля (строка / список / список списков)
    /// в плоский список строк.
    fn flatten(&self, value: &serde_json::Value) -> Vec<String> {
        let mut out = Vec::new();
        collect_strings(value, &mut out);
        out
    }
}

fn collect_strings(v: &serde_json::Value, out: &mut Vec<String>) {
    match v {
        serde_json::Value::String(s) => {
            if !s.trim().is_empty() {
                out.push(s.trim().to_string());
            }
        }
        serde_json::Value::Array(arr) => {
            for vv in arr {
                collect_strings(vv, out);
            }
        }
        serde_json::Value::Object(map) => {
            for vv in map.values() {
                collect_strings(vv, out);
            }
        }
        _ => {}
    }
}

const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "been", "but", "by", "can", "did", "do", "does",
    "for", "from", "had", "has", "have", "he", "her", "his", "i", "in", "is", "it", "its", "me",
    "my", "not", "of", "on", "or", "our", "s", "she", "t", "that", "the", "their", "them", "there",
    "these", "they", "this", "those", "to", "was", "we", "were", "will", "with", "would", "you",
    "your",
];

/// Базовая реализация: lowercase → NFKC → снятие диакритики → обрезка
/// пунктуации по краям → фильтр стоп-слов.
pub struct BasicNormalizer {
    stopwords: HashSet<&'static str>,
}

impl BasicNormalizer {
    pub fn new() -> Self {
        Self {
            stopwords: STOPWORDS.iter().copied().collect(),
        }
    }
}

impl Default for BasicNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer for BasicNormalizer {
    fn normalize(&self, token: &str) -> Option<String> {
        let lower = token.to_lowercase();
        let nfkc = lower.nfkc().collect::<String>();
        let stripped = strip_accents(&nfkc);
        let term = stripped
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_string();
        // именно проверка на равенство пустой строке, не на идентичность
        if term.is_empty() || self.stopwords.contains(term.as_str()) {
            return None;
        }
        Some(term)
    }
}

fn strip_accents(s: &str) -> String {
    s.nfd().filter(|c| !is_mark(*c)).collect()
}

fn is_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_strips_accents() {
        let n = BasicNormalizer::new();
        assert_eq!(n.normalize("Café"), Some("cafe".to_string()));
        assert_eq!(n.normalize("ALPHA"), Some("alpha".to_string()));
    }

    #[test]
    fn stopwords_and_empty_yield_none() {
        let n = BasicNormalizer::new();
        assert_eq!(n.normalize("the"), None);
        assert_eq!(n.normalize("The"), None);
        assert_eq!(n.normalize(""), None);
        // одна пунктуация схлопывается в пустую строку
        assert_eq!(n.normalize("..."), None);
    }

    #[test]
    fn trims_edge_punctuation_only() {
        let n = BasicNormalizer::new();
        assert_eq!(n.normalize("alpha,"), Some("alpha".to_string()));
        // внутренние пробелы фразового токена сохраняются
        assert_eq!(n.normalize("John Doe"), Some("john doe".to_string()));
    }

    #[test]
    fn tokenize_splits_on_non_alphanumeric() {
        let n = BasicNormalizer::new();
        assert_eq!(
            n.tokenize("the alpha-test, run #3"),
            vec!["the", "alpha", "test", "run", "3"]
        );
    }

    #[test]
    fn flatten_handles_nested_lists() {
        let n = BasicNormalizer::new();
        let v = serde_json::json!([["John Doe", "Jane Roe"], "Solo Act"]);
        assert_eq!(n.flatten(&v), vec!["John Doe", "Jane Roe", "Solo Act"]);
        let scalar = serde_json::json!("Berlin");
        assert_eq!(n.flatten(&scalar), vec!["Berlin"]);
        assert!(n.flatten(&serde_json::Value::Null).is_empty());
    }
}
