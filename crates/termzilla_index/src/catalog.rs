use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

pub const CATALOG_FILE: &str = "catalog.json";

/// Каталог индекса: какие сегменты (в порядке сборки) принадлежат какому
/// полевому индексу. Лежит в корне директории индекса, пишется билдером,
/// читается брокером и CLI — чтобы не угадывать имена директорий.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndexCatalog {
    pub version: u32, // 1
    pub doc_count: u32,
    /// полевой индекс -> имена директорий сегментов относительно корня
    pub fields: BTreeMap<String, Vec<String>>,
}

impl IndexCatalog {
    pub fn save(&self, root: &Path) -> Result<()> {
        let mut f = File::create(root.join(CATALOG_FILE))
            .with_context(|| format!("create catalog in {}", root.display()))?;
        serde_json::to_writer_pretty(&mut f, self)?;
        Ok(())
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CATALOG_FILE);
        let f = File::open(&path).with_context(|| format!("open {}", path.display()))?;
        serde_json::from_reader(f).with_context(|| format!("parse {}", path.display()))
    }

    pub fn segments_for(&self, field: &str) -> Result<&[String]> {
        match self.fields.get(field) {
            Some(segs) => Ok(segs.as_slice()),
            None => bail!("catalog has no field index {field:?}"),
        }
    }
}
