use collatz_viz::*;
use num_bigint::BigUint;

fn big(n: u64) -> BigUint {
    BigUint::from(n)
}

// ===== analyze_range =====

#[test]
fn test_record_count_and_order() {
    for max_n in [1u64, 2, 10, 100] {
        let report = analyze_range(max_n).unwrap();
        assert_eq!(report.max_n, max_n);
        assert_eq!(report.records.len() as u64, max_n);
        for (i, r) in report.records.iter().enumerate() {
            assert_eq!(r.start, i as u64 + 1);
        }
    }
}

#[test]
fn test_records_match_generate() {
    let report = analyze_range(300).unwrap();
    for r in &report.records {
        let seq = generate(r.start).unwrap();
        assert_eq!(r.stopping_time, seq.stopping_time(), "n={}", r.start);
        assert_eq!(&r.peak, seq.peak(), "n={}", r.start);
    }
}

#[test]
fn test_range_27_reference() {
    let report = analyze_range(27).unwrap();
    assert_eq!(report.longest, Extremum { start: 27, value: 111 });
    assert_eq!(report.highest, Extremum { start: 27, value: big(9232) });
}

#[test]
fn test_ties_keep_smallest_start() {
    // 7 と 9 はどちらも最大値 52
    let report = analyze_range(10).unwrap();
    assert_eq!(report.highest, Extremum { start: 7, value: big(52) });
    assert_eq!(report.longest, Extremum { start: 9, value: 19 });

    // 3 と 5 はどちらも最大値 16
    let report = analyze_range(5).unwrap();
    assert_eq!(report.highest, Extremum { start: 3, value: big(16) });
}

#[test]
fn test_range_100() {
    let report = analyze_range(100).unwrap();
    assert_eq!(report.longest, Extremum { start: 97, value: 118 });
    assert_eq!(report.highest, Extremum { start: 27, value: big(9232) });
}

#[test]
fn test_range_invalid() {
    assert_eq!(analyze_range(0).unwrap_err().offending_value(), Some("0"));
    assert_eq!(analyze_range(-4).unwrap_err().offending_value(), Some("-4"));
    assert!(input::parse_integer("10.5").is_err());
}

#[test]
fn test_range_with_config_limit() {
    let config: Config = toml::from_str("[generator]\nmax_steps = 23\n").unwrap();
    let generator = config.generator();
    assert!(generator.analyze_range(26).is_ok());
    let err = generator.analyze_range(27).unwrap_err();
    assert!(matches!(err, CollatzError::IterationLimitExceeded { limit: 23, .. }));
}

#[test]
fn test_range_json_shape() {
    let report = analyze_range(3).unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["max_n"], 3);
    assert_eq!(json["records"][2]["stopping_time"], 7);
    assert_eq!(json["records"][2]["peak"], "16");
    assert_eq!(json["longest"]["start"], 3);
    assert_eq!(json["highest"]["value"], "16");
}

// ===== generate_multiple =====

#[test]
fn test_multiple_preserves_order_and_duplicates() {
    let out = generate_multiple([27, 7, 27]).unwrap();
    let starts: Vec<BigUint> = out.iter().map(|(s, _)| s.clone()).collect();
    assert_eq!(starts, vec![big(27), big(7), big(27)]);
    assert_eq!(out[0].1, out[2].1);
    assert_eq!(out[1].1, generate(7).unwrap());
    for (start, seq) in &out {
        assert_eq!(seq.start(), start);
    }
}

#[test]
fn test_multiple_all_or_nothing() {
    let err = generate_multiple([7, -3, 15]).unwrap_err();
    assert!(matches!(err, CollatzError::InvalidInput { .. }));
    assert_eq!(err.offending_value(), Some("-3"));
}

#[test]
fn test_multiple_reports_first_bad_entry() {
    let err = generate_multiple([0, -3]).unwrap_err();
    assert_eq!(err.offending_value(), Some("0"));
}

#[test]
fn test_multiple_from_text() {
    let starts = input::parse_integer_list("7, 15,27").unwrap();
    let out = generate_multiple(starts).unwrap();
    let lengths: Vec<usize> = out.iter().map(|(_, s)| s.len()).collect();
    assert_eq!(lengths, vec![17, 18, 112]);
}

#[test]
fn test_multiple_limit() {
    let err = Generator::with_max_steps(16)
        .generate_multiple([7, 27])
        .unwrap_err();
    assert!(matches!(err, CollatzError::IterationLimitExceeded { .. }));
}
