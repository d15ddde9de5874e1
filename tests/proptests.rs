use kira_otuclust_seqindex::*;
use proptest::prelude::*;

fn dna(min: usize, max: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(b"ACGT".to_vec()), min..max)
        .prop_map(|v| String::from_utf8(v).unwrap())
}

/// Naive sketch: count every window in a map, then saturate.
fn naive_sketch(seq: &[u8]) -> Vec<(u16, u8)> {
    let mut counts = std::collections::BTreeMap::<u16, usize>::new();
    if seq.len() >= KMER_LEN {
        for w in seq.windows(KMER_LEN) {
            *counts.entry(encode::encode_kmer(w)).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .map(|(c, n)| (c, n.min(u8::MAX as usize) as u8))
        .collect()
}

proptest! {
    #[test]
    fn prop_sketch_matches_naive(seq in dna(0, 400)) {
        let sketch = KmerSketch::build(seq.as_bytes());
        let got: Vec<(u16, u8)> = sketch.entries().iter().map(|e| (e.code, e.count)).collect();
        prop_assert_eq!(&got, &naive_sketch(seq.as_bytes()));
        prop_assert!(got.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn prop_self_similarity_is_one(seq in dna(1, 120)) {
        prop_assert_eq!(global_similarity(seq.as_bytes(), seq.as_bytes()), Ok(1.0));
    }

    #[test]
    fn prop_similarity_in_unit_range(a in dna(1, 60), b in dna(1, 60)) {
        let g = global_similarity(a.as_bytes(), b.as_bytes()).unwrap();
        prop_assert!((0.0..=1.0).contains(&g));
    }

    #[test]
    fn prop_self_overlap(seq in dna(KMER_LEN, 300)) {
        let s = KmerSketch::build(seq.as_bytes());
        let score = overlap_score(&s, &s, seq.len(), seq.len()).unwrap();
        let expected = s.total_count() as f64 / (seq.len() - KMER_LEN + 1) as f64;
        prop_assert_eq!(score, expected);
        prop_assert!(score <= 1.0);
    }

    #[test]
    fn prop_insert_remove_restores(
        seqs in prop::collection::vec(dna(0, 40), 1..8),
        extra in dna(0, 40),
    ) {
        let mut idx = SeqIndex::new();
        for (i, s) in seqs.iter().enumerate() {
            idx.insert(format!("s{i}"), s.clone()).unwrap();
        }
        let before: Vec<SequenceRecord> = idx.iter().cloned().collect();
        idx.insert("extra", extra).unwrap();
        idx.remove("extra").unwrap();
        let after: Vec<SequenceRecord> = idx.iter().cloned().collect();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn prop_ranked_hits_pass_threshold(
        seqs in prop::collection::vec(dna(5, 40), 1..12),
        query in dna(5, 40),
        similarity in 0.0f64..=1.0,
        max_rejects in 0usize..4,
    ) {
        let mut idx = SeqIndex::new();
        for (i, s) in seqs.iter().enumerate() {
            idx.insert(format!("s{i}"), s.clone()).unwrap();
        }
        let params = SearchParams::default()
            .with_similarity(similarity)
            .max_rejects(max_rejects);
        let hits = idx.ranked_search(&query, &params);
        for id in &hits {
            let rec = idx.get(id).unwrap();
            let g = global_similarity(query.as_bytes(), rec.seq().as_bytes()).unwrap();
            prop_assert!(g >= similarity);
        }
        let parallel = idx.ranked_search(&query, &params.parallel(true));
        prop_assert_eq!(hits, parallel);
    }
}
