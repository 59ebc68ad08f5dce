//! 表示用の整形（CLI と GUI で共用）
//!
//! コア演算の結果を文字列・CSV・プロット用の f64 に変換するだけで、
//! 描画そのものは行わない。

use num_bigint::BigUint;
use num_traits::ToPrimitive;
use std::io::{self, Write};

use crate::sequence::Sequence;
use crate::stats::RangeReport;

const RULE_WIDTH: usize = 40;

pub const ABOUT: &str = "\
COLLATZ CONJECTURE (3x+1 Problem)

The Collatz Conjecture is an unsolved mathematical problem.

Rules:
  - Start with any positive integer n
  - If n is even: divide it by 2 (n/2)
  - If n is odd: multiply by 3 and add 1 (3n+1)
  - Repeat the process

The conjecture states that no matter what number
you start with, you will always eventually reach 1.

Example: Starting with 7
7 -> 22 -> 11 -> 34 -> 17 -> 52 -> 26 -> 13
-> 40 -> 20 -> 10 -> 5 -> 16 -> 8 -> 4 -> 2 -> 1

Despite its simplicity, no one has proven
this works for ALL numbers!";

/// 長すぎる数を "先頭20桁...末尾20桁 (N digits)" に省略する
pub fn abbreviate(n: &BigUint) -> String {
    let s = n.to_string();
    if s.len() <= 50 {
        s
    } else {
        format!("{}...{} ({} digits)", &s[..20], &s[s.len() - 20..], s.len())
    }
}

/// プロット用の f64。f64 に収まらない値は +inf になる。
pub fn plot_value(n: &BigUint) -> f64 {
    n.to_f64().unwrap_or(f64::INFINITY)
}

/// 対数軸プロット用の log10(n)。巨大数でも有限値を返す。
pub fn log10(n: &BigUint) -> f64 {
    let bits = n.bits();
    if bits <= 1000 {
        return plot_value(n).log10();
    }
    // 上位 64 ビットだけで近似
    let shift = bits - 64;
    let top = (n >> shift).to_f64().unwrap_or(0.0);
    top.log10() + shift as f64 * std::f64::consts::LOG10_2
}

/// 単一軌道プロットのタイトル
pub fn sequence_title(seq: &Sequence) -> String {
    format!(
        "Collatz Sequence starting from {}\nLength: {} steps | Max: {}",
        abbreviate(seq.start()),
        seq.len(),
        abbreviate(seq.peak())
    )
}

pub fn stopping_times_title(report: &RangeReport) -> String {
    format!(
        "Collatz Conjecture: Stopping Times (1 to {})\nLongest: {} steps from number {}",
        report.max_n, report.longest.value, report.longest.start
    )
}

pub fn max_values_title(report: &RangeReport) -> String {
    format!(
        "Collatz Conjecture: Maximum Values (1 to {})\nHighest Peak: {} from number {}",
        report.max_n,
        abbreviate(&report.highest.value),
        report.highest.start
    )
}

/// テキスト表示: ヘッダと "Step    i: value" の全行
pub fn sequence_listing(seq: &Sequence) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();
    out.push_str(&format!("Sequence from {} to 1\n", seq.start()));
    out.push_str(&format!("{}\n", rule));
    out.push_str(&format!("Length: {} steps\n", seq.len()));
    out.push_str(&format!("Maximum value: {}\n", seq.peak()));
    out.push_str(&format!("{}\n\n", rule));
    for (i, v) in seq.iter().enumerate() {
        out.push_str(&format!("Step {:4}: {}\n", i, v));
    }
    out
}

/// 先頭 limit 行と末尾 5 行だけを残したプレビュー (step, value)
pub fn preview(seq: &Sequence, limit: usize) -> Vec<PreviewLine> {
    let tail_from = seq.len().saturating_sub(5);
    let mut lines = Vec::new();
    for (i, v) in seq.iter().enumerate() {
        if i < limit || i >= tail_from {
            lines.push(PreviewLine::Step(i, abbreviate(v)));
        } else if i == limit {
            lines.push(PreviewLine::Skipped(tail_from - limit));
        }
    }
    lines
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewLine {
    Step(usize, String),
    /// 省略した行数
    Skipped(usize),
}

pub fn write_sequence_csv<W: Write>(w: &mut W, seq: &Sequence) -> io::Result<()> {
    writeln!(w, "step,value")?;
    for (i, v) in seq.iter().enumerate() {
        writeln!(w, "{},{}", i, v)?;
    }
    Ok(())
}

pub fn write_multiple_csv<W: Write>(w: &mut W, seqs: &[(BigUint, Sequence)]) -> io::Result<()> {
    writeln!(w, "start,step,value")?;
    for (start, seq) in seqs {
        for (i, v) in seq.iter().enumerate() {
            writeln!(w, "{},{},{}", start, i, v)?;
        }
    }
    Ok(())
}

pub fn write_range_csv<W: Write>(w: &mut W, report: &RangeReport) -> io::Result<()> {
    writeln!(w, "start,stopping_time,peak")?;
    for r in &report.records {
        writeln!(w, "{},{},{}", r.start, r.stopping_time, r.peak)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{analyze_range, generate};
    use num_traits::One;

    #[test]
    fn test_listing_format() {
        let seq = generate(4).unwrap();
        let expected = "\
Sequence from 4 to 1
========================================
Length: 3 steps
Maximum value: 4
========================================

Step    0: 4
Step    1: 2
Step    2: 1
";
        assert_eq!(sequence_listing(&seq), expected);
    }

    #[test]
    fn test_titles() {
        let seq = generate(7).unwrap();
        assert_eq!(
            sequence_title(&seq),
            "Collatz Sequence starting from 7\nLength: 17 steps | Max: 52"
        );
        let report = analyze_range(10).unwrap();
        assert!(stopping_times_title(&report).ends_with("Longest: 19 steps from number 9"));
        assert!(max_values_title(&report).ends_with("Highest Peak: 52 from number 7"));
    }

    #[test]
    fn test_abbreviate() {
        assert_eq!(abbreviate(&BigUint::from(12345u64)), "12345");
        let big = BigUint::one() << 400u32;
        let s = abbreviate(&big);
        assert!(s.contains("..."));
        assert!(s.ends_with(&format!("({} digits)", big.to_string().len())));
    }

    #[test]
    fn test_log10() {
        assert!((log10(&BigUint::from(1000u64)) - 3.0).abs() < 1e-12);
        let big = BigUint::one() << 5000u32;
        let expected = 5000.0 * std::f64::consts::LOG10_2;
        assert!((log10(&big) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_preview_skips_middle() {
        let seq = generate(27).unwrap(); // 112 要素
        let lines = preview(&seq, 10);
        assert_eq!(lines.len(), 10 + 1 + 5);
        assert_eq!(lines[10], PreviewLine::Skipped(112 - 5 - 10));
        assert_eq!(lines.last(), Some(&PreviewLine::Step(111, "1".to_string())));
    }

    #[test]
    fn test_preview_short() {
        let seq = generate(7).unwrap();
        let lines = preview(&seq, 50);
        assert_eq!(lines.len(), 17);
        assert!(!lines.iter().any(|l| matches!(l, PreviewLine::Skipped(_))));
    }

    #[test]
    fn test_range_csv() {
        let report = analyze_range(3).unwrap();
        let mut buf = Vec::new();
        write_range_csv(&mut buf, &report).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "start,stopping_time,peak\n1,0,1\n2,1,2\n3,7,16\n"
        );
    }

    #[test]
    fn test_multiple_csv() {
        let seqs = crate::generate_multiple([2, 1]).unwrap();
        let mut buf = Vec::new();
        write_multiple_csv(&mut buf, &seqs).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "start,step,value\n2,0,2\n2,1,1\n1,0,1\n"
        );
    }
}
