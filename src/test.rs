use rstest::rstest;

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::{Cursor, Write};
use std::path::PathBuf;

use crate::filters::pam::{residue_index, DAYHOFF_FREQ, UNKNOWN_INDEX};
use crate::store::SI_WIDTH;
use crate::*;

fn tmp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("fastaplus-{}-{name}", std::process::id()))
}

// --- alphabet --------------------------------------------------------------

#[test]
fn alphabet_maps_canonical_residues() {
    let alpha = Alphabet::new();
    for (i, b) in b"ACDEFGHIKLMNPQRSTVWY".iter().enumerate() {
        assert_eq!(alpha.index_of(*b), i);
        assert_eq!(alpha.index_of(b.to_ascii_lowercase()), i);
        assert!(!alpha.is_ambiguous(*b));
        assert!(!alpha.is_ambiguous(b.to_ascii_lowercase()));
    }
    for b in [b'B', b'J', b'O', b'U', b'X', b'Z', b'*', b'-', b'1', b' '] {
        assert_eq!(alpha.index_of(b), Alphabet::SIZE);
        assert!(alpha.is_ambiguous(b));
    }
}

// --- log-factorial ---------------------------------------------------------

#[test]
fn ln_fact_small_values() {
    assert_eq!(ln_fact(0), 0.0);
    assert_eq!(ln_fact(1), 0.0);
    assert!((ln_fact(2) - 2.0f64.ln()).abs() < 1e-12);
    assert!((ln_fact(20) - 42.3356164607535).abs() < 1e-10);
}

#[test]
fn ln_fact_is_monotonic_across_the_seam() {
    let mut prev = ln_fact(0);
    for n in 1..400 {
        let v = ln_fact(n);
        assert!(v >= prev, "ln_fact not monotonic at {n}");
        prev = v;
    }
}

#[test]
fn ln_fact_stirling_agrees_at_the_last_tabulated_index() {
    let n = 170f64;
    let stirling = (n + 0.5) * n.ln() - n + 0.9189385332;
    assert!((stirling - ln_fact(170)).abs() < 1e-3);
}

// --- SEG -------------------------------------------------------------------

#[test]
fn seg_masks_a_homopolymer_of_window_length() {
    let seg = Seg::default();
    assert_eq!(seg.filter("AAAAAAAAAAAA"), "XXXXXXXXXXXX");
}

#[test]
fn seg_keeps_a_natural_sequence() {
    let seg = Seg::default();
    assert_eq!(seg.filter("MKTIIALSYIFCLVFA"), "MKTIIALSYIFCLVFA");
}

#[test]
fn seg_masks_only_the_internal_run() {
    let seg = Seg::default();
    assert_eq!(
        seg.filter("MKTAAAAAAAAAAAAAQRSTV"),
        "MKTXXXXXXXXXXXXXQRSTV"
    );
}

#[rstest]
#[case("")]
#[case("A")]
#[case("AAAAAAA")]
#[case("MKTIIALSYI")]
fn seg_returns_short_input_unchanged(#[case] input: &str) {
    // anything shorter than the window carries no entropy window at all
    assert_eq!(Seg::default().filter(input), input);
}

#[rstest]
#[case("AAAAAAAAAAAAAAAAAAAA")]
#[case("MKTIIALSYIFCLVFAFSSATNA")]
#[case("GGGGGSGGGGSGGGGSGGGG")]
#[case("mktiialsyifclvfa")]
#[case("AC DE*FG!!AAAAAAAAAAAAAA")]
fn seg_output_is_same_length_and_x_only(#[case] input: &str) {
    let out = Seg::default().filter(input);
    assert_eq!(out.len(), input.len());
    for (o, i) in out.bytes().zip(input.bytes()) {
        assert!(o == i || o == b'X', "unexpected substitution {o} for {i}");
    }
}

#[test]
fn seg_without_merge_masks_nothing() {
    let seg = Seg::new(SegParams {
        merge: 0,
        ..SegParams::default()
    });
    assert_eq!(seg.filter("AAAAAAAAAAAA"), "AAAAAAAAAAAA");
}

#[test]
fn seg_max_x_gates_ambiguous_windows() {
    // one X in every window exceeds the default max_x of 0
    let seg = Seg::default();
    assert_eq!(seg.filter("AAAAAXAAAAAA"), "AAAAAXAAAAAA");

    let seg = Seg::new(SegParams {
        max_x: 1,
        ..SegParams::default()
    });
    assert_eq!(seg.filter("AAAAAXAAAAAA"), "XXXXXXXXXXXX");
}

// --- XNU -------------------------------------------------------------------

#[test]
fn xnu_masks_a_period_four_repeat() {
    let out = Xnu::default().filter("ABCDABCDABCDABCD");
    assert_eq!(out.len(), 16);
    // the whole repeat scores far above the cutoff on the period diagonal
    assert_eq!(out, "XXXXXXXXXXXXXXXX");
}

#[rstest]
#[case("ABCDABCDABCDABCD")]
#[case("MKTIIALSYIFCLVFA")]
#[case("gagagagagagagaga")]
#[case("QQQQQQQQQQQQQQQQQQQQ")]
fn xnu_output_is_same_length_and_subchar_only(#[case] input: &str) {
    let out = Xnu::default().filter(input);
    assert_eq!(out.len(), input.len());
    for (o, i) in out.bytes().zip(input.bytes()) {
        assert!(
            o == i.to_ascii_uppercase() || o == b'X',
            "unexpected substitution {o} for {i}"
        );
    }
}

#[rstest]
#[case("GAGAGAGAGAGAGAGAGAGA")]
#[case("MKTIIALSYIFCLVFA")]
#[case("ABCDABCDABCDABCD")]
fn xnu_repeats_is_the_complementary_mask(#[case] input: &str) {
    let plain = Xnu::default().filter(input);
    let inverted = Xnu::new(XnuParams {
        repeats: true,
        ..XnuParams::default()
    })
    .filter(input);
    for (i, (p, r)) in plain.bytes().zip(inverted.bytes()).enumerate() {
        assert_ne!(
            p == b'X',
            r == b'X',
            "position {i} masked in both or neither"
        );
    }
}

#[test]
fn xnu_min_offset_beyond_max_is_a_case_normalizing_noop() {
    let xnu = Xnu::new(XnuParams {
        mcut: 9,
        ncut: 4,
        ..XnuParams::default()
    });
    assert_eq!(xnu.filter("mktiialsyifclvfa"), "MKTIIALSYIFCLVFA");
}

#[test]
fn xnu_ncut_zero_scans_every_offset() {
    // period 8 sits beyond the default offset range
    let input = "ACDEFGHKACDEFGHKACDEFGHKACDEFGHK";
    assert_eq!(Xnu::default().filter(input), input);

    let wide = Xnu::new(XnuParams {
        ncut: 0,
        ..XnuParams::default()
    });
    assert!(wide.filter(input).contains('X'));
}

#[test]
fn xnu_subchar_zero_lowercases() {
    let xnu = Xnu::new(XnuParams {
        subchar: 0,
        ..XnuParams::default()
    });
    assert_eq!(xnu.filter("ABCDABCDABCDABCD"), "abcdabcdabcdabcd");
}

#[test]
fn xnu_absolute_score_cutoff_overrides_pcut() {
    let xnu = Xnu::new(XnuParams {
        scut: 1000,
        ..XnuParams::default()
    });
    assert_eq!(xnu.filter("ABCDABCDABCDABCD"), "ABCDABCDABCDABCD");
}

#[test]
fn pam_parse_accepts_the_published_names() {
    assert_eq!(Pam::parse("PAM60").unwrap(), Pam::Pam60);
    assert_eq!(Pam::parse("60").unwrap(), Pam::Pam60);
    assert_eq!(Pam::parse("PAM120").unwrap(), Pam::Pam120);
    // historic typo accepted as PAM120
    assert_eq!(Pam::parse("PAM12").unwrap(), Pam::Pam120);
    assert_eq!(Pam::parse("PAM250").unwrap(), Pam::Pam250);
    assert!(Pam::parse("PAM360").is_err());
}

#[test]
fn pam_residue_order_matches_the_matrix() {
    assert_eq!(residue_index(b'A'), 0);
    assert_eq!(residue_index(b'R'), 1);
    assert_eq!(residue_index(b'V'), 19);
    assert_eq!(residue_index(b'B'), 20);
}

#[test]
fn pam_unknown_characters_map_to_x() {
    assert_eq!(residue_index(b'A'), 0);
    assert_eq!(residue_index(b'a'), 0);
    assert_eq!(residue_index(b'X'), UNKNOWN_INDEX);
    assert_eq!(residue_index(b'*'), UNKNOWN_INDEX);
    assert_eq!(residue_index(b'-'), UNKNOWN_INDEX);
    assert_eq!(residue_index(b'J'), UNKNOWN_INDEX);
}

#[rstest]
#[case(Pam::Pam60)]
#[case(Pam::Pam120)]
#[case(Pam::Pam250)]
fn pam_matrices_are_symmetric(#[case] pam: Pam) {
    let m = pam.matrix();
    for i in 0..23 {
        for j in 0..i {
            assert_eq!(m[i][j], m[j][i], "{pam:?}: asymmetry at ({i},{j})");
        }
    }
}

#[rstest]
#[case(Pam::Pam60)]
#[case(Pam::Pam120)]
#[case(Pam::Pam250)]
fn pam_lambda_solves_the_karlin_equation(#[case] pam: Pam) {
    let (m, lambda) = (pam.matrix(), pam.lambda());
    let mut sum = 0.0;
    for i in 0..20 {
        for j in 0..20 {
            sum += DAYHOFF_FREQ[i] * DAYHOFF_FREQ[j] * (lambda * m[i][j] as f64).exp();
        }
    }
    // the composition is normalized to ~1.001, so the fixed point sits
    // within a small band around 1
    assert!((sum - 1.0).abs() < 0.01, "{pam:?}: sum {sum}");
}

// --- header form -----------------------------------------------------------

#[test]
fn header_parse_roundtrips_through_display() {
    let header = Header {
        si: "0000000000000000000000096061/0".to_string(),
        ti: "9606".to_string(),
        ss: "0".to_string(),
        meta: "ENS937474 additional\tinformation".to_string(),
    };
    let parsed = Header::parse(&header.to_string()).unwrap();
    assert_eq!(parsed, header);
}

#[test]
fn header_parse_rejects_malformed_lines() {
    assert!(matches!(
        Header::parse("si|x|ti|y"),
        Err(FastaError::BadFormat(_))
    ));
    assert!(matches!(
        Header::parse("foo|x|ti|y|ss|0|\tmeta"),
        Err(FastaError::BadFormat(_))
    ));
    assert!(matches!(
        Header::parse("si||ti|y|ss|0|\tmeta"),
        Err(FastaError::BadFormat(_))
    ));
    // a missing tab is tolerated with empty meta
    let header = Header::parse(">si|x|ti|y|ss|0|").unwrap();
    assert_eq!(header.meta, "");
    assert_eq!(header.si, "x");
}

// --- reader ----------------------------------------------------------------

#[test]
fn reader_concatenates_bodies_and_skips_blank_lines() {
    let text = "junk before the first record\n>one\tfirst\nACDE\n\nFGHI\n>two\nKLMN";
    let records: Vec<_> = FastaReader::new(Cursor::new(text))
        .collect::<std::io::Result<_>>()
        .unwrap();
    assert_eq!(
        records,
        vec![
            ("one\tfirst".to_string(), "ACDEFGHI".to_string()),
            // the final line counts even without a trailing newline
            ("two".to_string(), "KLMN".to_string()),
        ]
    );
}

// --- store -----------------------------------------------------------------

#[test]
fn store_load_raw_file_normalizes_and_pads() {
    let path = tmp_path("raw-two.fa");
    fs::write(&path, ">gi|1|foo\nACDEFG\n>gi|2|bar\nacdefg 1\n").unwrap();

    let mut store = FastaStore::new();
    assert_eq!(store.load_file_raw(&path, "9606").unwrap(), 2);
    fs::remove_file(&path).ok();

    let ids = store.ids().to_vec();
    assert_eq!(ids.len(), 2);
    for si in &ids {
        assert_eq!(si.len(), SI_WIDTH);
        assert_eq!(store.ti_for_si(si), Some("9606"));
        assert_eq!(store.ss_for_si(si), Some("0"));
    }
    assert_ne!(ids[0], ids[1]);
    assert_eq!(store.meta_for_si(&ids[0]), Some("gi|1|foo"));

    let all = store.get_all();
    assert_eq!(all[&ids[0]], "ACDEFG");
    assert_eq!(all[&ids[1]], "ACDEFGX");
    assert_eq!(store.sis_for_ti("9606"), &ids[..]);
}

#[test]
fn store_substring_is_one_indexed_inclusive() {
    let mut store = FastaStore::new();
    let si = store.load_record_raw("seq", "ACDEFG", "1");
    assert_eq!(store.get_substring(&si, 2, 4).unwrap(), "CDE");
    assert_eq!(store.get_substring(&si, 1, 6).unwrap(), "ACDEFG");
    assert!(matches!(
        store.get_substring(&si, 0, 3),
        Err(FastaError::OutOfRange(_))
    ));
    assert!(matches!(
        store.get_substring(&si, 2, 7),
        Err(FastaError::OutOfRange(_))
    ));
    assert!(matches!(
        store.get_substring("nope", 1, 2),
        Err(FastaError::OutOfRange(_))
    ));
}

#[test]
fn store_summary_counters_equal_a_recount() {
    let mut store = FastaStore::new();
    store.load_record_raw("a", "AAAA", "1");
    store.load_record_raw("b", "CCCCCC", "1");
    // overwriting the same SI must not double count
    store.load_record("si|DUP|ti|2|ss|0|\tx", "GGGG").unwrap();
    store.load_record("si|DUP|ti|2|ss|0|\tx", "GGGGGGGG").unwrap();

    let all = store.get_all();
    assert_eq!(store.get_summary("TotSeq").unwrap(), all.len() as i64);
    let recount: i64 = all.values().map(|b| b.len() as i64).sum();
    assert_eq!(store.get_summary("TotSeqSize").unwrap(), recount);
    assert!(matches!(
        store.get_summary("TotNonsense"),
        Err(FastaError::BadFormat(_))
    ));
}

#[test]
fn store_subset_and_complement_retrieval() {
    let mut store = FastaStore::new();
    let a = store.load_record_raw("a", "AAAA", "1");
    let b = store.load_record_raw("b", "CCCC", "1");
    let c = store.load_record_raw("c", "GGGG", "2");

    let all = store.get_all();
    assert_eq!(store.get_only(&a)[&a], all[&a]);
    assert!(store.get_only("nope").is_empty());

    let except = store.get_all_except(&b);
    assert!(!except.contains_key(&b));
    assert!(except.contains_key(&a) && except.contains_key(&c));

    let only_b = store.get_all_except_many(&[a.clone(), c.clone()]);
    assert_eq!(only_b.len(), 1);
    assert!(only_b.contains_key(&b));

    assert_eq!(store.get_only_many(&[a, c]).len(), 2);
}

#[test]
fn store_get_by_ti_is_the_union_over_its_sis() {
    let mut store = FastaStore::new();
    store.load_record_raw("a", "AAAA", "7");
    store.load_record_raw("b", "CCCC", "7");
    store.load_record_raw("c", "GGGG", "8");

    let mut union: HashMap<String, String> = HashMap::new();
    for si in store.sis_for_ti("7").to_vec() {
        union.extend(store.get_only(&si));
    }
    assert_eq!(store.get_by_ti("7"), union);
    assert_eq!(store.get_by_ti("8").len(), 1);
    assert!(store.get_by_ti("9").is_empty());
}

#[test]
fn store_ss_collisions_keep_the_last_loaded_si() {
    let mut store = FastaStore::new();
    let first = store.load_record_raw_ss("a", "AAAA", "1", "77");
    let second = store.load_record_raw_ss("b", "CCCC", "1", "77");
    assert_ne!(first, second);
    assert_eq!(store.si_for_ss("77"), Some(second.as_str()));
}

#[test]
fn store_rebinding_an_si_moves_it_between_ti_lists() {
    let mut store = FastaStore::new();
    store.load_record("si|A|ti|t1|ss|0|\tm", "AAAA").unwrap();
    store.load_record("si|A|ti|t2|ss|0|\tm", "AAAA").unwrap();
    assert!(store.sis_for_ti("t1").is_empty());
    assert_eq!(store.sis_for_ti("t2"), ["A".to_string()]);
    assert_eq!(store.ti_for_si("A"), Some("t2"));
    assert_eq!(store.get_summary("TotSeq").unwrap(), 1);
}

#[test]
fn store_clear_resets_the_si_counter() {
    let mut store = FastaStore::new();
    let before = store.load_record_raw("a", "AAAA", "5");
    store.clear();
    assert!(store.get_all().is_empty());
    assert_eq!(store.get_summary("TotSeq").unwrap(), 0);
    let after = store.load_record_raw("a", "AAAA", "5");
    assert_eq!(before, after);
}

#[test]
fn store_dump_and_indexed_reload_roundtrip() {
    let mut store = FastaStore::new();
    store.load_record_raw("short one", "ACDEFGHIKLMNPQRSTVWY", "9606");
    // long enough to exercise the 80 column wrapping
    store.load_record_raw("long one", &"MKTIIALSYIFCLVFA".repeat(12), "9606");
    store.load_record_raw("other taxon", "WYWYWYWY", "10090");

    let path = tmp_path("dump-roundtrip.fa");
    store.dump_all(&path).unwrap();

    let mut reloaded = FastaStore::new();
    reloaded.load_file(&path).unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(reloaded.get_all(), store.get_all());
    for si in store.ids() {
        assert_eq!(reloaded.ti_for_si(si), store.ti_for_si(si));
        assert_eq!(reloaded.ss_for_si(si), store.ss_for_si(si));
        assert_eq!(reloaded.meta_for_si(si), store.meta_for_si(si));
    }
    assert_eq!(
        reloaded.get_summary("TotSeqSize").unwrap(),
        store.get_summary("TotSeqSize").unwrap()
    );
}

#[test]
fn store_indexed_load_is_all_or_nothing() {
    let path = tmp_path("bad-indexed.fa");
    fs::write(
        &path,
        ">si|GOOD|ti|1|ss|0|\tok\nACDE\n>not an indexed header\nFGHI\n",
    )
    .unwrap();

    let mut store = FastaStore::new();
    store.load_record_raw("existing", "AAAA", "1");
    let err = store.load_file(&path).unwrap_err();
    fs::remove_file(&path).ok();

    assert!(matches!(err, FastaError::BadFormat(_)));
    assert_eq!(store.ids().len(), 1);
    assert_eq!(store.get_summary("TotSeq").unwrap(), 1);
    assert!(store.get_only("GOOD").is_empty());
}

#[test]
fn store_reads_gzip_compressed_fasta() {
    use flate2::write::GzEncoder;
    use flate2::Compression;

    let path = tmp_path("records.fa.gz");
    let mut encoder =
        GzEncoder::new(fs::File::create(&path).unwrap(), Compression::default());
    encoder.write_all(b">one\nACDEFG\n>two\nKLMNPQ\n").unwrap();
    encoder.finish().unwrap();

    let mut store = FastaStore::new();
    assert_eq!(store.load_file_raw(&path, "1").unwrap(), 2);
    fs::remove_file(&path).ok();

    let bodies: HashSet<String> = store.get_all().into_values().collect();
    assert_eq!(
        bodies,
        HashSet::from(["ACDEFG".to_string(), "KLMNPQ".to_string()])
    );
}

#[rstest]
fn fixture_files_load_with_coherent_indexes(#[files("resources/*.fa")] path: PathBuf) {
    let mut store = FastaStore::new();
    let count = store.load_file_raw(&path, "562").unwrap();
    assert!(count > 0);

    let all = store.get_all();
    assert_eq!(store.get_summary("TotSeq").unwrap(), all.len() as i64);
    let recount: i64 = all.values().map(|b| b.len() as i64).sum();
    assert_eq!(store.get_summary("TotSeqSize").unwrap(), recount);

    for si in store.ids() {
        assert!(all.contains_key(si));
        assert!(store.ti_for_si(si).is_some());
        assert!(store.ss_for_si(si).is_some());
        assert!(store.meta_for_si(si).is_some());
        // bodies are normalized on file load
        assert!(all[si].bytes().all(|b| b.is_ascii_uppercase() || b == b'X'));
    }
}

// --- filters over store records --------------------------------------------

#[test]
fn filters_compose_over_a_loaded_record() {
    let mut store = FastaStore::new();
    let si = store.load_record_raw("seq", "MKTAAAAAAAAAAAAAQRSTV", "1");
    let body = store.get_only(&si).remove(&si).unwrap();

    let seg = Seg::default();
    let xnu = Xnu::default();
    let chained = xnu.filter(&seg.filter(&body));
    assert_eq!(chained.len(), body.len());
}
