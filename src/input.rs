//! 利用者入力の検証
//!
//! 文字列・浮動小数点の入力を整数に変換し、正の整数であることを確認する。
//! 変換できない入力はすべて `CollatzError::InvalidInput` になる。

use num_bigint::{BigInt, BigUint};
use num_traits::{FromPrimitive, Zero};
use std::str::FromStr;

use crate::error::{CollatzError, Result};

const NOT_AN_INTEGER: &str = "not an integer";
const NOT_POSITIVE: &str = "must be a positive integer";

/// 文字列を整数として解析する（前後の空白は無視）。符号は許容する。
pub fn parse_integer(input: &str) -> Result<BigInt> {
    let trimmed = input.trim();
    BigInt::from_str(trimmed).map_err(|_| CollatzError::invalid(trimmed, NOT_AN_INTEGER))
}

/// 文字列を正の整数として解析する
pub fn parse_positive(input: &str) -> Result<BigUint> {
    require_positive(parse_integer(input)?)
}

/// カンマ区切りの整数列を解析する（例: "7, 15, 27"）。
/// 空要素や非整数が一つでもあれば全体をエラーにする。正負の検証はしない。
pub fn parse_integer_list(input: &str) -> Result<Vec<BigInt>> {
    input.split(',').map(parse_integer).collect()
}

/// f64 を整数に変換する。小数部がある値・非有限値はエラー。
pub fn integer_from_f64(value: f64) -> Result<BigInt> {
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(CollatzError::invalid(value, NOT_AN_INTEGER));
    }
    BigInt::from_f64(value).ok_or_else(|| CollatzError::invalid(value, NOT_AN_INTEGER))
}

/// 整数が 1 以上であることを確認し、BigUint に変換する
pub fn require_positive(value: BigInt) -> Result<BigUint> {
    match value.to_biguint() {
        Some(n) if !n.is_zero() => Ok(n),
        _ => Err(CollatzError::invalid(&value, NOT_POSITIVE)),
    }
}
