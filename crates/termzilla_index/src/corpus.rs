use crate::DocId;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Запись корпуса. Ключи JSON совпадают с исходным форматом корпуса:
/// Title — список вариантов названия (первый — канонический), Text — текст,
/// остальные поля структурные (скаляр или вложенные списки).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocRecord {
    #[serde(rename = "Title")]
    pub title: Vec<String>,
    #[serde(rename = "Text")]
    pub text: String,
    #[serde(rename = "Director", default)]
    pub director: serde_json::Value,
    #[serde(rename = "Starring", default)]
    pub starring: serde_json::Value,
    #[serde(rename = "Location", default)]
    pub location: serde_json::Value,
}

impl DocRecord {
    /// Канонический заголовок — первый вариант из Title.
    pub fn main_title(&self) -> &str {
        &self.title[0]
    }
}

/// Корпус: id → запись. Ключи приходят строками, парсятся в число один раз,
/// BTreeMap по числовому ключу даёт обход строго по возрастанию id —
/// на этом порядке держится инвариант сортированности постингов.
#[derive(Debug)]
pub struct Corpus {
    docs: BTreeMap<DocId, DocRecord>,
}

impl Corpus {
    pub fn load(path: &Path) -> Result<Self> {
        let f = File::open(path).with_context(|| format!("open corpus {}", path.display()))?;
        let raw: BTreeMap<String, DocRecord> = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parse corpus {}", path.display()))?;
        Self::from_raw(raw)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let raw: BTreeMap<String, DocRecord> =
            serde_json::from_str(s).context("parse corpus json")?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: BTreeMap<String, DocRecord>) -> Result<Self> {
        let mut docs = BTreeMap::new();
        for (key, rec) in raw {
            let id: DocId = key
                .trim()
                .parse()
                .with_context(|| format!("corpus id {key:?} is not an integer"))?;
            if rec.title.is_empty() {
                bail!("corpus doc {key}: Title is empty");
            }
            // "1" и "01" парсятся в один и тот же id — это дубликат
            if docs.insert(id, rec).is_some() {
                bail!("corpus contains duplicate doc id {id}");
            }
        }
        Ok(Self { docs })
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Обход строго по возрастанию числового id.
    pub fn iter(&self) -> impl Iterator<Item = (DocId, &DocRecord)> {
        self.docs.iter().map(|(id, rec)| (*id, rec))
    }

    pub fn get(&self, id: DocId) -> Option<&DocRecord> {
        self.docs.get(&id)
    }
}
