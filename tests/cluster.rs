use kira_otuclust_seqindex::*;

const Q: &str = "ACGTTGCAAGCTTAGGCATC";
// Q with one substitution: identity 0.95 against Q
const Q_SUB: &str = "ACGTTGCAAGATTAGGCATC";
const OTHER: &str = "GGGGCCCCAAAATTTTGGCC";

fn strict() -> ClusterConfig {
    ClusterConfig::default().search(SearchParams::default().with_similarity(1.0).max_rejects(0))
}

#[test]
fn threshold_splits_near_duplicates() {
    let run = |similarity: f64| {
        let cfg = ClusterConfig::default().search(SearchParams::default().with_similarity(similarity));
        let mut c = Clusterer::new(cfg).unwrap();
        for (id, s) in [("q", Q), ("q_sub", Q_SUB), ("other", OTHER), ("q2", Q)] {
            c.add(id, s).unwrap();
        }
        c.finish().clusters
    };

    let loose = run(0.9);
    assert_eq!(loose.len(), 2);
    assert_eq!(loose[0].members(), ["q", "q_sub", "q2"]);
    assert_eq!(loose[1].members(), ["other"]);

    let tight = run(0.97);
    assert_eq!(tight.len(), 3);
    assert_eq!(tight[0].members(), ["q", "q2"]);
    assert_eq!(tight[1].members(), ["q_sub"]);
}

#[test]
fn prefix_dereplication_finds_skipped_representative() {
    // "ACGTT" is too short to sketch, so every representative ranks 0.0 and
    // the scan follows index order: the poly-T representative fails first
    // and zero reject budget ends the search before "q".
    let seqs = [("polyt", "TTTTTTTTTT"), ("q", Q), ("short", "ACGTT")];

    let mut plain = Clusterer::new(strict()).unwrap();
    for (id, s) in seqs {
        plain.add(id, s).unwrap();
    }
    assert_eq!(plain.num_clusters(), 3);

    let mut derep = Clusterer::new(strict().prefix_dereplication(true)).unwrap();
    let mut last = None;
    for (id, s) in seqs {
        last = Some(derep.add(id, s).unwrap());
    }
    assert_eq!(last, Some(Assignment::Member { rep: "q".into() }));
    let done = derep.finish();
    assert_eq!(done.clusters.len(), 2);
    assert_eq!(done.clusters[1].members(), ["q", "short"]);
}

#[test]
fn abundance_decides_the_representative() {
    let cfg = || {
        ClusterConfig::default()
            .search(SearchParams::default().with_similarity(0.9))
            .min_size(1)
    };
    let records = [("a", Q), ("b", Q_SUB), ("c", Q_SUB)];

    let mut in_order = Clusterer::new(cfg()).unwrap();
    for (id, s) in records {
        in_order.add(id, s).unwrap();
    }
    let in_order = in_order.finish().clusters;
    assert_eq!(in_order.len(), 1);
    assert_eq!(in_order[0].members(), ["a", "b", "c"]);

    // q_sub occurs twice, so it is clustered first and represents q
    let done = Clusterer::new(cfg()).unwrap().cluster(records).unwrap();
    assert_eq!(done.clusters.len(), 1);
    assert_eq!(done.clusters[0].members(), ["b", "c", "a"]);
    assert_eq!(done.representatives.ids().collect::<Vec<_>>(), ["b"]);
}

#[test]
fn rare_sequences_map_onto_abundant_ones() {
    let cfg = ClusterConfig::default().search(SearchParams::default().with_similarity(0.9));
    let records = [("a", Q), ("b", Q_SUB), ("c", Q_SUB), ("d", OTHER)];
    let done = Clusterer::new(cfg).unwrap().cluster(records).unwrap();
    assert_eq!(done.clusters.len(), 1);
    assert_eq!(done.clusters[0].members(), ["b", "c", "a"]);
    assert_eq!(done.representatives.len(), 1);
    assert_eq!(done.unassigned, ["d"]);
}

#[test]
fn repeated_record_id_fails_the_run() {
    let err = Clusterer::new(ClusterConfig::default())
        .unwrap()
        .cluster([("a", Q), ("a", OTHER)])
        .unwrap_err();
    assert_eq!(err, ClusterError::Index(IndexError::DuplicateId("a".into())));
}

#[test]
fn derep_fast_len_truncates_the_prefix() {
    let rep = format!("{Q}AAAA");
    let query = format!("{Q}CCCC");
    let run = |len: usize| {
        let mut c = Clusterer::new(strict().prefix_dereplication(true).derep_fast_len(len)).unwrap();
        c.add("r", &rep).unwrap();
        c.add("x", &query).unwrap()
    };
    assert_eq!(run(200), Assignment::Representative);
    assert_eq!(run(Q.len()), Assignment::Member { rep: "r".into() });
}

#[test]
fn writer_output_for_finished_run() {
    let done = Clusterer::new(ClusterConfig::default())
        .unwrap()
        .cluster([("q", Q), ("other", OTHER), ("q2", Q)])
        .unwrap();
    assert_eq!(done.unassigned, ["other"]);
    let writer = ClusterWriter::new(&done.clusters, &done.representatives);

    let mut table = Vec::new();
    writer.write_table(&mut table).unwrap();
    assert_eq!(String::from_utf8(table).unwrap(), "q\tq2\n");

    let mut fasta = Vec::new();
    writer.write_fasta(&mut fasta).unwrap();
    assert_eq!(String::from_utf8(fasta).unwrap(), format!(">q\n{Q}\n"));
}
