use crate::catalog::IndexCatalog;
use crate::corpus::{Corpus, DocRecord};
use crate::docstore::DocStore;
use crate::normalizer::Normalizer;
use crate::postings::PostingsBuf;
use crate::segjson::JsonSegmentWriter;
use crate::shard::ShardPolicy;
use crate::SegmentWriter;
use anyhow::{Context, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::time::Instant;

/// Структурное поле корпуса, под которое строится отдельный индекс.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuredField {
    Director,
    Starring,
    Location,
}

impl StructuredField {
    pub const ALL: [StructuredField; 3] = [
        StructuredField::Director,
        StructuredField::Starring,
        StructuredField::Location,
    ];

    pub fn index_name(&self) -> &'static str {
        match self {
            StructuredField::Director => "director",
            StructuredField::Starring => "starring",
            StructuredField::Location => "location",
        }
    }

    fn value<'a>(&self, rec: &'a DocRecord) -> &'a serde_json::Value {
        match self {
            StructuredField::Director => &rec.director,
            StructuredField::Starring => &rec.starring,
            StructuredField::Location => &rec.location,
        }
    }
}

/// Что индексируем: объединённый индекс «заголовок + текст» либо одно
/// структурное поле.
#[derive(Debug, Clone, Copy)]
pub enum FieldSelector {
    TitleAndText,
    Structured(StructuredField),
}

impl FieldSelector {
    pub fn index_name(&self) -> &'static str {
        match self {
            FieldSelector::TitleAndText => "text",
            FieldSelector::Structured(f) => f.index_name(),
        }
    }
}

/// Билдер инвертированного индекса. Нормализатор передаётся явно —
/// никакого разделяемого процессного состояния.
pub struct IndexBuilder<'a, N: Normalizer> {
    normalizer: &'a N,
}

impl<'a, N: Normalizer> IndexBuilder<'a, N> {
    pub fn new(normalizer: &'a N) -> Self {
        Self { normalizer }
    }

    /// Построить сегменты одного полевого индекса. Корпус обходится строго
    /// по возрастанию числового id, каждый документ даёт не больше одного
    /// постинга на терм — поэтому списки рождаются уже отсортированными,
    /// а PostingsBuf::append дополнительно страхует порядок.
    pub fn build(
        &self,
        corpus: &Corpus,
        selector: FieldSelector,
        policy: ShardPolicy,
    ) -> Result<Vec<PostingsBuf>> {
        let mut segments: Vec<PostingsBuf> = (0..policy.segment_count(corpus.len()))
            .map(|_| PostingsBuf::new())
            .collect();

        for (seq, (doc_id, rec)) in corpus.iter().enumerate() {
            let tokens = self.collect_tokens(rec, selector);

            // дистинктные термы документа: кратность внутри документа
            // на постинги не влияет
            let terms: BTreeSet<String> = tokens
                .iter()
                .filter_map(|t| self.normalizer.normalize(t))
                .collect();

            let seg = &mut segments[policy.segment_of(seq)];
            for term in &terms {
                seg.append(term, doc_id)
                    .with_context(|| format!("doc {doc_id}"))?;
            }
        }
        Ok(segments)
    }

    /// Сырые токены документа для выбранного индекса. Помимо разбиения,
    /// значение поля добавляется целиком как фразовый псевдо-токен:
    /// точное совпадение по фразе (полное имя режиссёра, название фильма)
    /// должно находиться одним термом.
    fn collect_tokens(&self, rec: &DocRecord, selector: FieldSelector) -> Vec<String> {
        match selector {
            FieldSelector::TitleAndText => {
                let title = rec.main_title();
                let mut tokens = self
                    .normalizer
                    .tokenize(&format!("{} {}", title, rec.text));
                tokens.push(title.trim().to_string());
                tokens
            }
            FieldSelector::Structured(field) => {
                let values = self.normalizer.flatten(field.value(rec));
                let mut tokens = self.normalizer.tokenize(&values.join(" "));
                tokens.extend(values);
                tokens
            }
        }
    }
}

/// Собрать полный индекс: объединённый text-индекс (с шардированием по
/// политике) + по одному индексу на структурное поле + витрины + каталог.
/// Разметка на диске:
///   out/catalog.json
///   out/docs.json
///   out/<field>/seg_NNN/{postings.json, meta.json}
pub fn write_index<N: Normalizer>(
    corpus: &Corpus,
    normalizer: &N,
    out_dir: &Path,
    text_policy: ShardPolicy,
) -> Result<IndexCatalog> {
    let builder = IndexBuilder::new(normalizer);
    let mut writer = JsonSegmentWriter;
    let mut fields: BTreeMap<String, Vec<String>> = BTreeMap::new();

    let mut selectors = vec![(FieldSelector::TitleAndText, text_policy)];
    for f in StructuredField::ALL {
        selectors.push((FieldSelector::Structured(f), ShardPolicy::Single));
    }

    for (selector, policy) in selectors {
        let started = Instant::now();
        let name = selector.index_name();
        let segments = builder.build(corpus, selector, policy)?;

        let mut seg_names = Vec::with_capacity(segments.len());
        for (i, seg) in segments.iter().enumerate() {
            let rel = format!("{name}/seg_{i:03}");
            writer.write_segment(seg, name, &out_dir.join(&rel))?;
            seg_names.push(rel);
        }
        tracing::info!(
            field = name,
            segments = seg_names.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "field index built"
        );
        fields.insert(name.to_string(), seg_names);
    }

    let started = Instant::now();
    DocStore::build(corpus, normalizer).save(out_dir)?;
    tracing::info!(
        docs = corpus.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "doc store written"
    );

    let catalog = IndexCatalog {
        version: 1,
        doc_count: corpus.len() as u32,
        fields,
    };
    catalog.save(out_dir)?;
    Ok(catalog)
}
