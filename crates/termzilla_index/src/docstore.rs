use crate::corpus::Corpus;
use crate::normalizer::Normalizer;
use crate::DocId;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

pub const DOCSTORE_FILE: &str = "docs.json";

/// Витрина документа: поля для показа в выдаче. Движок запросов сюда
/// не заглядывает — это данные исключительно для рендера.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocDisplay {
    pub title: String,
    pub text: String,
    pub director: String,
    pub starring: String,
    pub location: String,
}

/// Хранилище витрин: id (строкой) → DocDisplay, один docs.json на индекс.
/// Обязано покрывать каждый проиндексированный id — дырка здесь означает
/// баг согласованности на стороне сборки, а не ошибку запроса.
pub struct DocStore {
    docs: BTreeMap<String, DocDisplay>,
}

impl DocStore {
    pub fn build<N: Normalizer>(corpus: &Corpus, normalizer: &N) -> Self {
        let mut docs = BTreeMap::new();
        for (id, rec) in corpus.iter() {
            docs.insert(
                id.to_string(),
                DocDisplay {
                    title: rec.main_title().to_string(),
                    text: rec.text.clone(),
                    director: normalizer.flatten(&rec.director).join(", "),
                    starring: normalizer.flatten(&rec.starring).join(", "),
                    location: normalizer.flatten(&rec.location).join(", "),
                },
            );
        }
        Self { docs }
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let mut f = File::create(root.join(DOCSTORE_FILE))
            .with_context(|| format!("create docstore in {}", root.display()))?;
        serde_json::to_writer_pretty(&mut f, &self.docs)?;
        Ok(())
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(DOCSTORE_FILE);
        let f = File::open(&path).with_context(|| format!("open {}", path.display()))?;
        let docs = serde_json::from_reader(f).with_context(|| format!("parse {}", path.display()))?;
        Ok(Self { docs })
    }

    pub fn get(&self, id: &str) -> Option<&DocDisplay> {
        self.docs.get(id)
    }

    pub fn get_by_num(&self, id: DocId) -> Option<&DocDisplay> {
        self.docs.get(&id.to_string())
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}
