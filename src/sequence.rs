use num_bigint::{BigInt, BigUint};
use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::decimal;
use crate::error::{CollatzError, Result};
use crate::input;
use crate::step::Trajectory;

/// 開始値から 1 までのコラッツ軌道（開始値と 1 を含む）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    values: Vec<BigUint>,
    peak: BigUint,
}

impl Sequence {
    /// 開始値
    pub fn start(&self) -> &BigUint {
        &self.values[0]
    }

    pub fn values(&self) -> &[BigUint] {
        &self.values
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BigUint> {
        self.values.iter()
    }

    /// 要素数（開始値と 1 を含む）
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// 常に false（少なくとも開始値を含む）
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 停止時間: 1 に到達するまでのステップ数 (= 要素数 - 1)
    pub fn stopping_time(&self) -> u64 {
        self.values.len() as u64 - 1
    }

    /// 軌道中の最大値
    pub fn peak(&self) -> &BigUint {
        &self.peak
    }

    pub fn metrics(&self) -> Metrics {
        Metrics {
            stopping_time: self.stopping_time(),
            peak: self.peak.clone(),
        }
    }

    pub fn into_values(self) -> Vec<BigUint> {
        self.values
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a BigUint;
    type IntoIter = std::slice::Iter<'a, BigUint>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// JSON では数値を 10 進文字列で出力する
impl Serialize for Sequence {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        struct Values<'a>(&'a [BigUint]);

        impl Serialize for Values<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                decimal::serialize_seq(self.0, serializer)
            }
        }

        let mut state = serializer.serialize_struct("Sequence", 4)?;
        state.serialize_field("start", &self.start().to_string())?;
        state.serialize_field("stopping_time", &self.stopping_time())?;
        state.serialize_field("peak", &self.peak.to_string())?;
        state.serialize_field("values", &Values(&self.values))?;
        state.end()
    }
}

/// 軌道を保持せずに得られる派生量
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Metrics {
    pub stopping_time: u64,
    #[serde(serialize_with = "decimal::serialize")]
    pub peak: BigUint,
}

/// 軌道生成器。max_steps を設定すると、それを超えるステップ数を要する
/// 開始値は `IterationLimitExceeded` になる。デフォルトは上限なし。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Generator {
    max_steps: Option<u64>,
}

impl Generator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_steps(max_steps: u64) -> Self {
        Generator {
            max_steps: Some(max_steps),
        }
    }

    /// None なら上限なし
    pub fn with_limit(max_steps: Option<u64>) -> Self {
        Generator { max_steps }
    }

    pub fn max_steps(&self) -> Option<u64> {
        self.max_steps
    }

    /// 開始値から 1 までの軌道を生成する。start <= 0 は InvalidInput。
    pub fn generate(&self, start: impl Into<BigInt>) -> Result<Sequence> {
        let start = input::require_positive(start.into())?;
        self.generate_from(&start)
    }

    /// 検証済み（または未検証）の BigUint から軌道を生成する。0 は InvalidInput。
    pub fn generate_from(&self, start: &BigUint) -> Result<Sequence> {
        let mut values = Vec::new();
        let mut peak = start.clone();
        self.walk(start, |value| {
            if value > peak {
                peak = value.clone();
            }
            values.push(value);
        })?;
        tracing::trace!(start = %start, steps = values.len() - 1, "sequence generated");
        Ok(Sequence { values, peak })
    }

    /// 軌道を保持せずに停止時間と最大値だけを求める
    pub fn measure(&self, start: &BigUint) -> Result<Metrics> {
        let mut stopping_time = 0u64;
        let mut peak = start.clone();
        let mut first = true;
        self.walk(start, |value| {
            if first {
                first = false;
            } else {
                stopping_time += 1;
            }
            if value > peak {
                peak = value;
            }
        })?;
        Ok(Metrics {
            stopping_time,
            peak,
        })
    }

    /// 軌道を先頭から順に visit に渡す。上限超過時はそこで打ち切ってエラー。
    fn walk(&self, start: &BigUint, mut visit: impl FnMut(BigUint)) -> Result<()> {
        for (steps, value) in Trajectory::new(start.clone())?.enumerate() {
            if let Some(limit) = self.max_steps {
                if steps as u64 > limit {
                    return Err(CollatzError::IterationLimitExceeded {
                        start: start.clone(),
                        limit,
                    });
                }
            }
            visit(value);
        }
        Ok(())
    }
}

/// 上限なしで軌道を生成する
pub fn generate(start: impl Into<BigInt>) -> Result<Sequence> {
    Generator::default().generate(start)
}
