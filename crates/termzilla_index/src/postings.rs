use crate::DocId;
use anyhow::{bail, Result};
use std::collections::BTreeMap;

/// Write-once буфер постингов одного сегмента: терм → список id документов.
/// Списки растут только в конец и только по возрастанию id — это проверяется
/// на каждом append, а не при чтении (перечитывать сортировку на каждом
/// запросе было бы дорого, инвариант обязан держаться со сборки).
#[derive(Default)]
pub struct PostingsBuf {
    map: BTreeMap<String, Vec<DocId>>,
    cur_doc: Option<DocId>,
    doc_count: u32,
}

impl PostingsBuf {
    pub fn new() -> Self {
        Self::default()
    }

    /// Добавить документ в постинги терма. Ошибка, если порядок обхода
    /// корпуса нарушен (id не больше хвоста списка).
    pub fn append(&mut self, term: &str, doc: DocId) -> Result<()> {
        let list = self.map.entry(term.to_string()).or_default();
        if let Some(&last) = list.last() {
            if doc <= last {
                bail!("postings order violated for term {term:?}: {doc} after {last}");
            }
        }
        list.push(doc);
        if self.cur_doc != Some(doc) {
            self.cur_doc = Some(doc);
            self.doc_count += 1;
        }
        Ok(())
    }

    pub fn term_count(&self) -> u32 {
        self.map.len() as u32
    }

    pub fn doc_count(&self) -> u32 {
        self.doc_count
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[DocId])> {
        self.map.iter().map(|(t, l)| (t.as_str(), l.as_slice()))
    }

    pub fn postings(&self, term: &str) -> Option<&[DocId]> {
        self.map.get(term).map(Vec::as_slice)
    }
}

/// Объединение двух отсортированных списков (слияние постингов одного терма
/// из разных сегментов). Без дубликатов, порядок сохраняется.
pub fn merge_union(a: &[DocId], b: &[DocId]) -> Vec<DocId> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i] < b[j] {
            out.push(a[i]);
            i += 1;
        } else if a[i] > b[j] {
            out.push(b[j]);
            j += 1;
        } else {
            out.push(a[i]);
            i += 1;
            j += 1;
        }
    }
    out.extend_from_slice(&a[i..]);
    out.extend_from_slice(&b[j..]);
    out
}

/// Пересечение двух отсортированных списков линейным слиянием:
/// двигаем указатель меньшего элемента, на равенстве — эмитим.
pub fn intersect_pair(a: &[DocId], b: &[DocId]) -> Vec<DocId> {
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i] < b[j] {
            i += 1;
        } else if a[i] > b[j] {
            j += 1;
        } else {
            out.push(a[i]);
            i += 1;
            j += 1;
        }
    }
    out
}

/// N-арное пересечение: итеративно, всегда два кратчайших списка первыми.
/// Пустой вход → пусто, один список → он сам.
pub fn intersect_all(lists: Vec<Vec<DocId>>) -> Vec<DocId> {
    // без лимита переполнение счётчика недостижимо
    intersect_all_bounded(lists, u64::MAX).unwrap_or_default()
}

/// То же, но с потолком суммарно просмотренных постингов: патологически
/// частые термы не должны давать неограниченную задержку.
pub fn intersect_all_bounded(mut lists: Vec<Vec<DocId>>, max_scanned: u64) -> Result<Vec<DocId>> {
    if lists.is_empty() {
        return Ok(Vec::new());
    }
    lists.sort_by_key(Vec::len);
    let mut scanned: u64 = 0;
    while lists.len() > 1 {
        let a = lists.remove(0);
        let b = lists.remove(0);
        scanned += (a.len() + b.len()) as u64;
        if scanned > max_scanned {
            bail!("intersection scan budget exceeded: {scanned} > {max_scanned}");
        }
        let merged = intersect_pair(&a, &b);
        // вставляем результат так, чтобы рабочий набор оставался
        // отсортированным по длине — кратчайшие всегда в голове
        let pos = lists.partition_point(|l| l.len() < merged.len());
        lists.insert(pos, merged);
    }
    Ok(lists.pop().unwrap_or_default())
}
