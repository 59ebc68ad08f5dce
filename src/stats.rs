use num_bigint::{BigInt, BigUint};
use num_traits::{One, ToPrimitive};
use serde::Serialize;
use std::fmt::Display;

use crate::decimal;
use crate::error::{CollatzError, Result};
use crate::input;
use crate::sequence::{Generator, Sequence};

/// 範囲解析の1行: 開始値ごとの停止時間と最大値
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeRecord {
    pub start: u64,
    pub stopping_time: u64,
    #[serde(serialize_with = "decimal::serialize")]
    pub peak: BigUint,
}

/// 範囲内の最大値とそれを与える（最小の）開始値。
/// JSON では value を 10 進文字列で出力する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extremum<T: Display> {
    pub start: u64,
    #[serde(serialize_with = "decimal::serialize")]
    pub value: T,
}

/// [1, max_n] の範囲解析結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeReport {
    pub max_n: u64,
    /// start 昇順、ちょうど max_n 個
    pub records: Vec<RangeRecord>,
    /// 最大停止時間
    pub longest: Extremum<u64>,
    /// 最大ピーク値
    pub highest: Extremum<BigUint>,
}

impl RangeReport {
    /// 開始値 n の行（1 <= n <= max_n）
    pub fn record(&self, n: u64) -> Option<&RangeRecord> {
        let idx = usize::try_from(n.checked_sub(1)?).ok()?;
        self.records.get(idx)
    }

    /// (開始値, 停止時間) の列
    pub fn stopping_times(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.records.iter().map(|r| (r.start, r.stopping_time))
    }

    /// (開始値, 最大値) の列
    pub fn peaks(&self) -> impl Iterator<Item = (u64, &BigUint)> + '_ {
        self.records.iter().map(|r| (r.start, &r.peak))
    }
}

impl Generator {
    /// 1..=max_n の各開始値について停止時間と最大値を求め、範囲内の最大を記録する。
    /// 同値の場合は小さい開始値を残す。
    pub fn analyze_range(&self, max_n: impl Into<BigInt>) -> Result<RangeReport> {
        let max_n = input::require_positive(max_n.into())?;
        let max_n = max_n
            .to_u64()
            .ok_or_else(|| CollatzError::invalid(&max_n, "range upper bound too large"))?;

        let mut records = Vec::new();
        let mut longest = Extremum { start: 1, value: 0 };
        let mut highest = Extremum {
            start: 1,
            value: BigUint::one(),
        };

        for n in 1..=max_n {
            let metrics = self.measure(&BigUint::from(n))?;
            if metrics.stopping_time > longest.value {
                longest = Extremum {
                    start: n,
                    value: metrics.stopping_time,
                };
            }
            if metrics.peak > highest.value {
                highest = Extremum {
                    start: n,
                    value: metrics.peak.clone(),
                };
            }
            records.push(RangeRecord {
                start: n,
                stopping_time: metrics.stopping_time,
                peak: metrics.peak,
            });
        }

        tracing::debug!(
            max_n,
            longest = longest.value,
            longest_start = longest.start,
            highest = %highest.value,
            highest_start = highest.start,
            "range analysis complete"
        );

        Ok(RangeReport {
            max_n,
            records,
            longest,
            highest,
        })
    }

    /// 複数の開始値の軌道を順に生成する（順序保持・重複可）。
    /// 生成前に全要素を検証し、一つでも不正なら何も生成せずエラーを返す。
    pub fn generate_multiple<I, T>(&self, starts: I) -> Result<Vec<(BigUint, Sequence)>>
    where
        I: IntoIterator<Item = T>,
        T: Into<BigInt>,
    {
        let starts = starts
            .into_iter()
            .map(|s| input::require_positive(s.into()))
            .collect::<Result<Vec<_>>>()?;

        let mut out = Vec::with_capacity(starts.len());
        for start in starts {
            let seq = self.generate_from(&start)?;
            out.push((start, seq));
        }
        tracing::debug!(count = out.len(), "batch generated");
        Ok(out)
    }
}

/// 上限なしで [1, max_n] を解析する
pub fn analyze_range(max_n: impl Into<BigInt>) -> Result<RangeReport> {
    Generator::default().analyze_range(max_n)
}

/// 上限なしで複数の軌道を生成する
pub fn generate_multiple<I, T>(starts: I) -> Result<Vec<(BigUint, Sequence)>>
where
    I: IntoIterator<Item = T>,
    T: Into<BigInt>,
{
    Generator::default().generate_multiple(starts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_1() {
        let report = analyze_range(1).unwrap();
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.longest, Extremum { start: 1, value: 0 });
        assert_eq!(report.highest.start, 1);
        assert_eq!(report.highest.value, BigUint::one());
    }

    #[test]
    fn test_record_lookup() {
        let report = analyze_range(10).unwrap();
        assert_eq!(report.record(0), None);
        assert_eq!(report.record(11), None);
        let r9 = report.record(9).unwrap();
        assert_eq!(r9.start, 9);
        assert_eq!(r9.stopping_time, 19);
        assert_eq!(r9.peak, BigUint::from(52u64));
    }

    #[test]
    fn test_range_too_large() {
        let huge: BigInt = BigInt::from(u64::MAX) + 1u32;
        let err = analyze_range(huge.clone()).unwrap_err();
        assert_eq!(err.offending_value(), Some(huge.to_string().as_str()));
    }

    #[test]
    fn test_range_limit_propagates() {
        // 3 の停止時間は 7
        let err = Generator::with_max_steps(6).analyze_range(5).unwrap_err();
        assert!(matches!(err, CollatzError::IterationLimitExceeded { limit: 6, .. }));
    }

    #[test]
    fn test_multiple_empty() {
        let out = generate_multiple(Vec::<i64>::new()).unwrap();
        assert!(out.is_empty());
    }
}
