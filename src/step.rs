use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};
use std::iter::FusedIterator;

use crate::error::{CollatzError, Result};

/// コラッツ写像の1ステップ: 偶数なら n/2、奇数なら 3n+1
#[inline]
pub fn collatz_step(n: &BigUint) -> BigUint {
    if n.is_even() {
        n >> 1u32
    } else {
        n * 3u32 + 1u32
    }
}

/// 開始値から 1 までの軌道を遅延生成するイテレータ。
/// 開始値を最初に、1 を最後に返す。
#[derive(Debug, Clone)]
pub struct Trajectory {
    next: Option<BigUint>,
}

impl Trajectory {
    /// start は 1 以上であること（0 は 0 → 0 で停止しないため拒否）
    pub fn new(start: BigUint) -> Result<Self> {
        if start.is_zero() {
            return Err(CollatzError::invalid(&start, "must be a positive integer"));
        }
        Ok(Trajectory { next: Some(start) })
    }
}

impl Iterator for Trajectory {
    type Item = BigUint;

    fn next(&mut self) -> Option<BigUint> {
        let current = self.next.take()?;
        if !current.is_one() {
            self.next = Some(collatz_step(&current));
        }
        Some(current)
    }
}

impl FusedIterator for Trajectory {}
