use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use termzilla_index::catalog::IndexCatalog;
use termzilla_index::docstore::{DocDisplay, DocStore};
use termzilla_index::normalizer::BasicNormalizer;
use termzilla_index::postings::intersect_all_bounded;
use termzilla_index::query::{split_raw_query, QueryEngine};
use termzilla_index::segjson::JsonSegmentReader;
use termzilla_index::{DocId, SegmentReader};

/// Мультиполевой запрос: по сырой строке на каждый полевой индекс.
/// Пустая строка — поле не ограничивает выдачу и пропускается целиком.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub director: String,
    #[serde(default)]
    pub starring: String,
    #[serde(default)]
    pub location: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    /// Совпавшие id (строками), по возрастанию числового значения.
    pub matched_ids: Vec<String>,
    pub stopwords: Vec<String>,
    pub unknown_terms: Vec<String>,
    pub total_hits: usize,
}

/// Поисковый сервис: каталог + открытые на чтение сегменты всех полевых
/// индексов + витрины. После open() ничего не мутируется, хендлеры ходят
/// сюда по &self из любого числа воркеров.
pub struct SearchService {
    normalizer: BasicNormalizer,
    fields: BTreeMap<String, Vec<JsonSegmentReader>>,
    docstore: DocStore,
    max_scanned: u64,
}

impl SearchService {
    pub fn open(index_dir: &Path, max_scanned: u64) -> Result<Self> {
        let catalog = IndexCatalog::load(index_dir)?;
        let mut fields = BTreeMap::new();
        for (field, segs) in &catalog.fields {
            let mut readers = Vec::with_capacity(segs.len());
            for rel in segs {
                readers.push(JsonSegmentReader::open_segment(&index_dir.join(rel))?);
            }
            fields.insert(field.clone(), readers);
        }
        let docstore = DocStore::load(index_dir)?;
        tracing::info!(
            fields = fields.len(),
            docs = catalog.doc_count,
            "index opened"
        );
        Ok(Self {
            normalizer: BasicNormalizer::new(),
            fields,
            docstore,
            max_scanned,
        })
    }

    /// Разрешить каждый непустой подзапрос против своего полевого индекса
    /// и пересечь списки результатов тем же примитивом слияния.
    pub fn search(&self, req: &SearchRequest) -> Result<SearchResponse> {
        let sub_queries = [
            ("text", &req.query),
            ("director", &req.director),
            ("starring", &req.starring),
            ("location", &req.location),
        ];

        let mut per_field: Vec<Vec<DocId>> = Vec::new();
        let mut stopwords = Vec::new();
        let mut unknown = Vec::new();

        for (field, raw) in sub_queries {
            if raw.trim().is_empty() {
                continue;
            }
            let segments = match self.fields.get(field) {
                Some(s) => s.as_slice(),
                None => &[],
            };
            let engine =
                QueryEngine::new(&self.normalizer, segments).with_max_scanned(self.max_scanned);
            let out = engine.conjunctive_query(&split_raw_query(raw))?;
            stopwords.extend(out.stopwords);
            unknown.extend(out.unknown);
            per_field.push(out.matched);
        }

        // хотя бы один неизвестный терм в любом поле — выдача пустая,
        // но вся диагностика уходит наружу
        let matched = if unknown.is_empty() {
            intersect_all_bounded(per_field, self.max_scanned)?
        } else {
            Vec::new()
        };

        let matched_ids: Vec<String> = matched.iter().map(DocId::to_string).collect();
        Ok(SearchResponse {
            total_hits: matched_ids.len(),
            matched_ids,
            stopwords,
            unknown_terms: unknown,
        })
    }

    pub fn doc(&self, id: &str) -> Option<&DocDisplay> {
        self.docstore.get(id)
    }
}
