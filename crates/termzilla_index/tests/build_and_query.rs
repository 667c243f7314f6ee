use std::fs;

use tempfile::tempdir;

use termzilla_index::builder::write_index;
use termzilla_index::catalog::IndexCatalog;
use termzilla_index::corpus::Corpus;
use termzilla_index::docstore::DocStore;
use termzilla_index::normalizer::BasicNormalizer;
use termzilla_index::postings::intersect_all;
use termzilla_index::query::{split_raw_query, QueryEngine};
use termzilla_index::segjson::JsonSegmentReader;
use termzilla_index::shard::ShardPolicy;
use termzilla_index::SegmentReader;

const CORPUS: &str = r#"{
    "1": {"Title": ["Alpha"], "Text": "the alpha test",
          "Director": "John Doe", "Starring": [["Jane Roe"]], "Location": "Berlin"},
    "2": {"Title": ["Beta"], "Text": "a beta trial",
          "Director": "Jane Roe", "Starring": [["John Doe"]], "Location": "Berlin"},
    "3": {"Title": ["Alpha Two"], "Text": "another alpha run",
          "Director": "John Doe", "Starring": [["Max Power"]], "Location": "Paris"}
}"#;

fn open_field(root: &std::path::Path, cat: &IndexCatalog, field: &str) -> Vec<JsonSegmentReader> {
    cat.segments_for(field)
        .unwrap()
        .iter()
        .map(|rel| JsonSegmentReader::open_segment(&root.join(rel)).unwrap())
        .collect()
}

#[test]
fn full_index_build_and_conjunctive_query() {
    let tmp = tempdir().unwrap();
    let corpus = Corpus::from_json_str(CORPUS).unwrap();
    let n = BasicNormalizer::new();

    let cat = write_index(&corpus, &n, tmp.path(), ShardPolicy::Single).unwrap();
    assert_eq!(cat.doc_count, 3);
    assert_eq!(cat.fields.len(), 4);

    let text = open_field(tmp.path(), &cat, "text");
    let engine = QueryEngine::new(&n, &text);

    let out = engine.conjunctive_query(&split_raw_query("alpha")).unwrap();
    assert_eq!(out.matched, vec![1, 3]);

    let out = engine
        .conjunctive_query(&split_raw_query("alpha beta"))
        .unwrap();
    assert!(out.matched.is_empty());
    assert!(out.stopwords.is_empty());
    assert!(out.unknown.is_empty());

    let out = engine.conjunctive_query(&split_raw_query("zephyr")).unwrap();
    assert!(out.matched.is_empty());
    assert_eq!(out.unknown, vec!["zephyr"]);
}

#[test]
fn cross_field_composition_intersects_per_field_results() {
    let tmp = tempdir().unwrap();
    let corpus = Corpus::from_json_str(CORPUS).unwrap();
    let n = BasicNormalizer::new();
    let cat = write_index(&corpus, &n, tmp.path(), ShardPolicy::Single).unwrap();

    let text = open_field(tmp.path(), &cat, "text");
    let director = open_field(tmp.path(), &cat, "director");
    let location = open_field(tmp.path(), &cat, "location");

    // alpha → {1,3}, директор "doe" → {1,3}, локация "berlin" → {1,2}
    let per_field = vec![
        QueryEngine::new(&n, &text)
            .conjunctive_query(&split_raw_query("alpha"))
            .unwrap()
            .matched,
        QueryEngine::new(&n, &director)
            .conjunctive_query(&split_raw_query("doe"))
            .unwrap()
            .matched,
        QueryEngine::new(&n, &location)
            .conjunctive_query(&split_raw_query("berlin"))
            .unwrap()
            .matched,
    ];
    assert_eq!(intersect_all(per_field), vec![1]);
}

#[test]
fn director_full_name_matches_as_phrase_term() {
    let tmp = tempdir().unwrap();
    let corpus = Corpus::from_json_str(CORPUS).unwrap();
    let n = BasicNormalizer::new();
    let cat = write_index(&corpus, &n, tmp.path(), ShardPolicy::Single).unwrap();

    let director = open_field(tmp.path(), &cat, "director");
    let engine = QueryEngine::new(&n, &director);
    // фразовый псевдо-токен: полное имя одним термом
    let out = engine.conjunctive_query(&["John Doe".to_string()]).unwrap();
    assert_eq!(out.matched, vec![1, 3]);
}

#[test]
fn sharded_and_single_builds_answer_identically() {
    let corpus = Corpus::from_json_str(CORPUS).unwrap();
    let n = BasicNormalizer::new();

    let tmp_single = tempdir().unwrap();
    let tmp_sharded = tempdir().unwrap();
    let cat_single = write_index(&corpus, &n, tmp_single.path(), ShardPolicy::Single).unwrap();
    let cat_sharded = write_index(
        &corpus,
        &n,
        tmp_sharded.path(),
        ShardPolicy::DocCountCap { cap: 1 },
    )
    .unwrap();

    let single = open_field(tmp_single.path(), &cat_single, "text");
    let sharded = open_field(tmp_sharded.path(), &cat_sharded, "text");
    assert_eq!(single.len(), 1);
    assert_eq!(sharded.len(), 3);

    for q in ["alpha", "beta trial", "alpha beta", "zephyr", "the"] {
        let a = QueryEngine::new(&n, &single)
            .conjunctive_query(&split_raw_query(q))
            .unwrap();
        let b = QueryEngine::new(&n, &sharded)
            .conjunctive_query(&split_raw_query(q))
            .unwrap();
        assert_eq!(a, b, "query {q:?}");
    }
}

#[test]
fn rebuild_produces_byte_identical_postings() {
    let corpus = Corpus::from_json_str(CORPUS).unwrap();
    let n = BasicNormalizer::new();

    let tmp_a = tempdir().unwrap();
    let tmp_b = tempdir().unwrap();
    let cat = write_index(&corpus, &n, tmp_a.path(), ShardPolicy::DocCountCap { cap: 2 }).unwrap();
    write_index(&corpus, &n, tmp_b.path(), ShardPolicy::DocCountCap { cap: 2 }).unwrap();

    for segs in cat.fields.values() {
        for rel in segs {
            let a = fs::read(tmp_a.path().join(rel).join("postings.json")).unwrap();
            let b = fs::read(tmp_b.path().join(rel).join("postings.json")).unwrap();
            assert_eq!(a, b, "segment {rel} differs between rebuilds");
        }
    }
}

#[test]
fn postings_are_strictly_increasing_in_every_segment() {
    let tmp = tempdir().unwrap();
    let corpus = Corpus::from_json_str(CORPUS).unwrap();
    let n = BasicNormalizer::new();
    let cat = write_index(&corpus, &n, tmp.path(), ShardPolicy::DocCountCap { cap: 2 }).unwrap();

    // читаем сырые файлы и проверяем порядок с числовым сравнением
    for segs in cat.fields.values() {
        for rel in segs {
            let raw = fs::read_to_string(tmp.path().join(rel).join("postings.json")).unwrap();
            let map: std::collections::BTreeMap<String, Vec<String>> =
                serde_json::from_str(&raw).unwrap();
            for (term, ids) in map {
                let nums: Vec<u64> = ids.iter().map(|s| s.parse().unwrap()).collect();
                assert!(
                    nums.windows(2).all(|w| w[0] < w[1]),
                    "term {term:?} in {rel} not strictly increasing: {nums:?}"
                );
            }
        }
    }
}

#[test]
fn docstore_covers_every_matched_id() {
    let tmp = tempdir().unwrap();
    let corpus = Corpus::from_json_str(CORPUS).unwrap();
    let n = BasicNormalizer::new();
    let cat = write_index(&corpus, &n, tmp.path(), ShardPolicy::Single).unwrap();

    let store = DocStore::load(tmp.path()).unwrap();
    assert_eq!(store.len(), 3);

    let text = open_field(tmp.path(), &cat, "text");
    let out = QueryEngine::new(&n, &text)
        .conjunctive_query(&split_raw_query("alpha"))
        .unwrap();
    for id in out.matched {
        let doc = store.get_by_num(id).expect("display doc for matched id");
        assert!(!doc.title.is_empty());
    }
    assert_eq!(store.get("1").unwrap().director, "John Doe");
}

#[test]
fn segment_meta_reports_field_and_counts() {
    let tmp = tempdir().unwrap();
    let corpus = Corpus::from_json_str(CORPUS).unwrap();
    let n = BasicNormalizer::new();
    let cat = write_index(&corpus, &n, tmp.path(), ShardPolicy::Single).unwrap();

    let text = open_field(tmp.path(), &cat, "text");
    assert_eq!(text[0].field(), "text");
    assert_eq!(text[0].doc_count(), 3);
    assert!(text[0].term_count() > 0);
}
