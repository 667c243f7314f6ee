pub mod builder;
pub mod catalog;
pub mod corpus;
pub mod docstore;
pub mod normalizer;
pub mod postings;
pub mod query;
pub mod segjson;
pub mod shard;

use anyhow::Result;
use std::path::Path;

/// Внутренний идентификатор документа. Внешние ключи корпуса — строки,
/// но сравниваются всегда по числовому значению, поэтому парсим один раз
/// на входе и дальше работаем с числом.
pub type DocId = u64;

/// Точки расширения: читатель/писатель сегмента
pub trait SegmentWriter {
    fn write_segment(
        &mut self,
        buf: &postings::PostingsBuf,
        field: &str,
        out_dir: &Path,
    ) -> Result<()>;
}

pub trait SegmentReader {
    fn open_segment(path: &Path) -> Result<Self>
    where
        Self: Sized;
    fn field(&self) -> &str;
    fn doc_count(&self) -> u32;
    fn term_count(&self) -> u32;
    /// Постинги терма в этом сегменте (отсортированы строго по возрастанию).
    fn postings(&self, term: &str) -> Option<&[DocId]>;
}
