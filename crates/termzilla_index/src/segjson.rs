use crate::postings::PostingsBuf;
use crate::{DocId, SegmentReader, SegmentWriter};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::path::Path;

/// JSON-реализация сегмента:
/// - postings.json : { term -> ["1","3",...] }  // id как строки
/// - meta.json     : SegmentMeta
/// Сегмент пишется один раз при сборке и дальше открывается только на чтение;
/// у ридера нет мутабельного состояния, конкурентные чтения безопасны.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentMeta {
    pub version: u32, // 1
    pub field: String,
    pub doc_count: u32,
    pub term_count: u32,
}

#[derive(Default)]
pub struct JsonSegmentWriter;

impl SegmentWriter for JsonSegmentWriter {
    fn write_segment(&mut self, buf: &PostingsBuf, field: &str, out_dir: &Path) -> Result<()> {
        fs::create_dir_all(out_dir)
            .with_context(|| format!("create segment dir {}", out_dir.display()))?;

        // BTreeMap + упорядоченный обход корпуса ⇒ повторная сборка даёт
        // байт-в-байт одинаковый postings.json
        let mut dump: BTreeMap<&str, Vec<String>> = BTreeMap::new();
        for (term, list) in buf.iter() {
            dump.insert(term, list.iter().map(DocId::to_string).collect());
        }
        let mut pf = File::create(out_dir.join("postings.json"))?;
        serde_json::to_writer_pretty(&mut pf, &dump)?;

        let meta = SegmentMeta {
            version: 1,
            field: field.to_string(),
            doc_count: buf.doc_count(),
            term_count: buf.term_count(),
        };
        let mut mf = File::create(out_dir.join("meta.json"))?;
        serde_json::to_writer_pretty(&mut mf, &meta)?;
        Ok(())
    }
}

#[derive(Debug)]
pub struct JsonSegmentReader {
    meta: SegmentMeta,
    postings: BTreeMap<String, Vec<DocId>>,
}

impl SegmentReader for JsonSegmentReader {
    fn open_segment(path: &Path) -> Result<Self> {
        let meta: SegmentMeta = read_json(&path.join("meta.json"))?;
        let raw: BTreeMap<String, Vec<String>> = read_json(&path.join("postings.json"))?;

        let mut postings = BTreeMap::new();
        for (term, ids) in raw {
            let mut list = Vec::with_capacity(ids.len());
            for id in &ids {
                let n: DocId = id
                    .parse()
                    .with_context(|| format!("segment {}: bad doc id {id:?}", path.display()))?;
                // инвариант сборки; проверяем один раз при открытии,
                // чтобы не тащить битый сегмент в обслуживание
                if let Some(&last) = list.last() {
                    if n <= last {
                        bail!(
                            "segment {}: postings for {term:?} not strictly increasing",
                            path.display()
                        );
                    }
                }
                list.push(n);
            }
            postings.insert(term, list);
        }

        Ok(Self { meta, postings })
    }

    fn field(&self) -> &str {
        &self.meta.field
    }

    fn doc_count(&self) -> u32 {
        self.meta.doc_count
    }

    fn term_count(&self) -> u32 {
        self.meta.term_count
    }

    fn postings(&self, term: &str) -> Option<&[DocId]> {
        self.postings.get(term).map(Vec::as_slice)
    }
}

fn read_json<T: for<'de> serde::Deserialize<'de>>(path: &Path) -> Result<T> {
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    serde_json::from_reader(f).with_context(|| format!("parse {}", path.display()))
}
