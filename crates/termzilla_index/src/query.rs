use crate::normalizer::Normalizer;
use crate::postings::{intersect_all_bounded, merge_union};
use crate::{DocId, SegmentReader};
use anyhow::Result;

/// Потолок просмотренных постингов по умолчанию.
pub const DEFAULT_MAX_SCANNED: u64 = 1_000_000;

/// Итог конъюнктивного запроса: совпавшие id плюс диагностика по токенам.
/// Неизвестный терм — не ошибка, а нормальный исход «ничего не найдено»,
/// который вызывающая сторона показывает пользователю.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOutcome {
    /// Совпавшие документы, по возрастанию числового id.
    pub matched: Vec<DocId>,
    /// Сырые токены, схлопнувшиеся в «нет терма».
    pub stopwords: Vec<String>,
    /// Сырые токены, чьих термов нет ни в одном сегменте.
    pub unknown: Vec<String>,
}

/// Движок запросов над сегментами ОДНОГО полевого индекса. Чисто
/// функциональный: состояние — только ссылки на нормализатор и ридеры,
/// конкурентные запросы по одним сегментам безопасны.
pub struct QueryEngine<'a, N: Normalizer, R: SegmentReader> {
    normalizer: &'a N,
    segments: &'a [R],
    max_scanned: u64,
}

impl<'a, N: Normalizer, R: SegmentReader> QueryEngine<'a, N, R> {
    pub fn new(normalizer: &'a N, segments: &'a [R]) -> Self {
        Self {
            normalizer,
            segments,
            max_scanned: DEFAULT_MAX_SCANNED,
        }
    }

    pub fn with_max_scanned(mut self, max_scanned: u64) -> Self {
        self.max_scanned = max_scanned;
        self
    }

    /// Постинги терма, слитые по всем сегментам индекса. None — терма нет
    /// нигде (сегменты держат непересекающиеся подмножества документов).
    pub fn lookup(&self, term: &str) -> Option<Vec<DocId>> {
        let mut merged: Option<Vec<DocId>> = None;
        for seg in self.segments {
            if let Some(list) = seg.postings(term) {
                merged = Some(match merged {
                    Some(acc) => merge_union(&acc, list),
                    None => list.to_vec(),
                });
            }
        }
        merged
    }

    /// Конъюнктивный запрос (AND по всем термам).
    ///
    /// Правила:
    /// - стоп-слово не накладывает ограничения и попадает в `stopwords`;
    /// - хотя бы один неизвестный терм ⇒ пустая выдача сразу (AND с
    ///   неиндексированным термом невыполним), при этом вся диагностика
    ///   по уже разобранным токенам сохраняется;
    /// - ноль эффективных термов (всё стоп-слова либо пустой вход) ⇒
    ///   пустая выдача: AND без ограничений трактуем как «ничего».
    pub fn conjunctive_query(&self, raw_tokens: &[String]) -> Result<QueryOutcome> {
        let mut out = QueryOutcome::default();
        let mut lists: Vec<Vec<DocId>> = Vec::new();

        for token in raw_tokens {
            match self.normalizer.normalize(token) {
                None => out.stopwords.push(token.clone()),
                Some(term) => match self.lookup(&term) {
                    None => out.unknown.push(token.clone()),
                    Some(list) => lists.push(list),
                },
            }
        }

        if !out.unknown.is_empty() {
            tracing::debug!(unknown = out.unknown.len(), "query short-circuited");
            return Ok(out);
        }
        if lists.is_empty() {
            return Ok(out);
        }

        out.matched = intersect_all_bounded(lists, self.max_scanned)?;
        Ok(out)
    }
}

/// Разбить сырую строку запроса на токены (по пробелам, как в форме поиска).
pub fn split_raw_query(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_string).collect()
}
