//! End-to-end tests for predication training.

use std::io::Cursor;

use semvec_psi::{
    create_psi_vectors, read_triples, read_vector_store, CorpusFormat, CorpusTermStats, ElementalMethod, FileVectorStore,
    FilterConfig, MemoryIndex, OutputConfig, PredicationTrainer, PsiConfig, PsiError, StoreFormat, TrainedVectors,
    Triple,
};
use semvec_vsa::{random, ElementalConfig, VectorKind};

const KINDS: [VectorKind; 3] = [VectorKind::Real, VectorKind::Complex, VectorKind::Binary];

fn train(triples: Vec<Triple>, config: &PsiConfig) -> TrainedVectors {
    let index = MemoryIndex::from_triples(triples);
    let stats = CorpusTermStats::from_index(&index, config).unwrap();
    PredicationTrainer::new(config.clone(), &index, &stats)
        .unwrap()
        .train()
        .unwrap()
}

fn corpus() -> Vec<Triple> {
    vec![
        Triple::new("cat", "chase", "mouse"),
        Triple::new("dog", "chase", "cat"),
        Triple::new("mouse", "eat", "cheese"),
        Triple::new("cat", "eat", "fish"),
        Triple::new("dog", "bite", "postman"),
    ]
}

fn assert_same_semantic(a: &TrainedVectors, b: &TrainedVectors) {
    let left: Vec<_> = a.semantic.entries().collect();
    let right: Vec<_> = b.semantic.entries().collect();
    assert_eq!(left, right);
}

#[test]
fn test_training_is_deterministic() {
    for kind in KINDS {
        let config = PsiConfig::default().with_vector_type(kind);
        let first = train(corpus(), &config);
        let second = train(corpus(), &config);
        assert_same_semantic(&first, &second);
        let left: Vec<_> = first.elemental.iter().collect();
        let right: Vec<_> = second.elemental.iter().collect();
        assert_eq!(left, right, "{kind}");
    }
}

#[test]
fn test_persisted_stores_are_byte_identical() {
    let mut contents = Vec::new();
    for _ in 0..2 {
        let dir = tempfile::tempdir().unwrap();
        let config = PsiConfig::default().with_output(OutputConfig::default().with_directory(dir.path()));
        let index = MemoryIndex::from_triples(corpus());
        let stats = CorpusTermStats::from_index(&index, &config).unwrap();
        let mut writer = FileVectorStore::new(config.output.clone());
        create_psi_vectors(&config, &index, &stats, &mut writer).unwrap();
        contents.push((
            std::fs::read(writer.path_for("elementalvectors")).unwrap(),
            std::fs::read(writer.path_for("semanticvectors")).unwrap(),
        ));
    }
    assert_eq!(contents[0], contents[1]);
}

#[test]
fn test_stopword_object_leaves_semantic_vectors_untouched() {
    let config = PsiConfig::default()
        .with_elemental_method(ElementalMethod::ContentHash)
        .with_filter(FilterConfig::default().with_stopwords(["the", "it"]));

    let baseline = train(corpus(), &config);

    let mut extended = corpus();
    extended.push(Triple::new("dog", "bury", "the it"));
    let with_skip = train(extended, &config);

    assert_eq!(with_skip.report.skipped.predications, 1);
    assert_eq!(with_skip.report.skipped.object_zero, 1);
    assert_eq!(with_skip.report.processed, baseline.report.processed);
    assert_same_semantic(&baseline, &with_skip);
}

#[test]
fn test_repeated_predications_count_once() {
    let config = PsiConfig::default();
    let once = train(corpus(), &config);

    let mut repeated = Vec::new();
    for _ in 0..5 {
        repeated.extend(corpus());
    }
    let many = train(repeated, &config);

    assert_eq!(many.report.unique_predications, once.report.unique_predications);
    assert_eq!(many.report.processed, once.report.processed);
    assert_same_semantic(&once, &many);
}

#[test]
fn test_finalize_twice_changes_nothing() {
    let trained = train(corpus(), &PsiConfig::default());
    let mut semantic = trained.semantic.clone();
    assert!(semantic.is_finalized());
    assert_eq!(semantic.finalize(), 0);
    let before: Vec<_> = trained.semantic.entries().collect();
    let after: Vec<_> = semantic.entries().collect();
    assert_eq!(before, after);
    assert!(matches!(semantic.get_mut("cat"), Err(PsiError::InvalidState(_))));
}

#[test]
fn test_binding_round_trip() {
    for kind in KINDS {
        let config = ElementalConfig::new(kind, 1024);
        let mut rng = random::seeded_rng(99);
        let a = config.generate(&mut rng).unwrap();
        let b = config.generate(&mut rng).unwrap();
        let unrelated = config.generate(&mut rng).unwrap();

        let recovered = a.bind(&b).unwrap().release(&a).unwrap();
        let signal = recovered.overlap(&b).unwrap();
        let noise = recovered.overlap(&unrelated).unwrap();
        assert!(signal > 0.1, "{kind}: {signal}");
        assert!(signal > noise, "{kind}: {signal} <= {noise}");
    }
}

#[test]
fn test_cat_chase_mouse() {
    for kind in KINDS {
        let config = PsiConfig::default().with_vector_type(kind).with_dimension(200);
        let trained = train(vec![Triple::new("cat", "chase", "mouse")], &config);

        for term in ["cat", "chase", "mouse"] {
            assert!(trained.elemental.contains(term), "{kind}: {term}");
        }
        assert!(trained.semantic.contains("cat"));
        assert!(trained.semantic.contains("mouse"));
        assert!(!trained.semantic.contains("chase"));
        assert_eq!(trained.semantic.len(), 2);

        let mouse = trained.semantic.get("mouse").unwrap();
        let chase = trained.elemental.get("chase").unwrap();
        let cat = trained.elemental.get("cat").unwrap();
        let probe = chase.bind(cat).unwrap();
        let random_vector = config
            .elemental_config()
            .generate(&mut random::seeded_rng(12_345))
            .unwrap();

        let related = mouse.overlap(&probe).unwrap();
        let unrelated = mouse.overlap(&random_vector).unwrap();
        assert!(related > unrelated, "{kind}: {related} <= {unrelated}");
        assert!(related > 0.9, "{kind}: {related}");
    }
}

#[test]
fn test_unadmitted_field_skips_every_predication() {
    let config = PsiConfig::default().with_filter(FilterConfig::default().with_stopwords(["it", "them"]));
    let trained = train(
        vec![
            Triple::new("cat", "chase", "it"),
            Triple::new("dog", "bite", "them"),
            Triple::new("bird", "see", "it"),
        ],
        &config,
    );

    assert_eq!(trained.report.unique_predications, 3);
    assert_eq!(trained.report.processed, 0);
    assert_eq!(trained.report.skipped.predications, 3);
    assert_eq!(trained.report.skipped.object_zero, 3);
    assert!(!trained.semantic.is_empty());
    for (term, vector) in trained.semantic.entries() {
        assert!(vector.is_zero(), "{term} should be untouched");
    }
}

#[test]
fn test_failed_training_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let config = PsiConfig::default().with_output(OutputConfig::default().with_directory(dir.path()));
    let index = MemoryIndex::new();
    let stats = CorpusTermStats::from_index(&index, &config).unwrap();
    let mut writer = FileVectorStore::new(config.output.clone());

    let err = create_psi_vectors(&config, &index, &stats, &mut writer).unwrap_err();
    assert!(matches!(err, PsiError::Configuration { .. }));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_unwritable_semantic_store_leaves_no_elemental_store() {
    let dir = tempfile::tempdir().unwrap();
    let mut output = OutputConfig::default().with_directory(dir.path());
    output.semantic_name = "missing_subdir/semanticvectors".to_string();
    let config = PsiConfig::default().with_output(output);
    let index = MemoryIndex::from_triples(corpus());
    let stats = CorpusTermStats::from_index(&index, &config).unwrap();
    let mut writer = FileVectorStore::new(config.output.clone());

    let err = create_psi_vectors(&config, &index, &stats, &mut writer).unwrap_err();
    assert!(matches!(err, PsiError::Io(_)));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_stores_read_back_in_both_formats() {
    for format in [StoreFormat::Json, StoreFormat::Text] {
        for kind in KINDS {
            let dir = tempfile::tempdir().unwrap();
            let config = PsiConfig::default()
                .with_vector_type(kind)
                .with_output(OutputConfig::default().with_directory(dir.path()).with_format(format));
            let trained = train(corpus(), &config);
            let mut writer = FileVectorStore::new(config.output.clone());
            trained
                .persist(&mut writer, &config.output.elemental_name, &config.output.semantic_name)
                .unwrap();

            let semantic = read_vector_store(writer.path_for("semanticvectors")).unwrap();
            assert_eq!(semantic.len(), trained.semantic.len());
            for (term, vector) in trained.semantic.entries() {
                assert_eq!(semantic.get(term), Some(vector), "{format:?} {kind} {term}");
            }

            let elemental = read_vector_store(writer.path_for("elementalvectors")).unwrap();
            assert_eq!(elemental.len(), trained.elemental.len());
            assert_eq!(elemental.header.vector_type, kind);
            assert_eq!(elemental.header.dimension, 200);
        }
    }
}

#[test]
fn test_config_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("psi.yaml");
    let config = PsiConfig::default()
        .with_vector_type(VectorKind::Binary)
        .with_dimension(1024)
        .with_filter(FilterConfig::default().with_frequency_range(2, 500).with_stopwords(["the"]));
    config.to_file(&path).unwrap();
    let loaded = PsiConfig::from_file(&path).unwrap();
    assert_eq!(config, loaded);
}

#[test]
fn test_reverb_corpus_end_to_end() {
    fn line(doc: &str, subject: &str, predicate: &str, object: &str) -> String {
        let mut cols = vec!["x".to_string(); 18];
        cols[0] = doc.to_string();
        cols[15] = subject.to_string();
        cols[16] = predicate.to_string();
        cols[17] = object.to_string();
        cols.join("\t")
    }

    let input = [
        line("abstracts/1.txt", "Aspirin", "treats", "Headache"),
        "truncated\tline".to_string(),
        line("abstracts/2.txt", "aspirin", "treats", "headache"),
        line("abstracts/3.txt", "Ibuprofen", "treats", "Fever"),
    ]
    .join("\n");

    let triples = read_triples(Cursor::new(input), CorpusFormat::Reverb).unwrap();
    assert_eq!(triples.len(), 3);
    assert_eq!(triples[0].document_id.as_deref(), Some("1"));

    let trained = train(triples, &PsiConfig::default());
    assert_eq!(trained.report.unique_predications, 2);
    assert_eq!(trained.report.processed, 2);
    assert!(trained.semantic.contains("aspirin"));
    assert!(trained.semantic.contains("fever"));
}
