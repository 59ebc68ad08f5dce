//! BigUint を 10 進文字列として serde 出力するヘルパー

use num_bigint::BigUint;
use serde::Serializer;
use std::fmt::Display;

pub(crate) fn serialize<S: Serializer>(
    value: &impl Display,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

pub(crate) fn serialize_seq<S: Serializer>(
    values: &[BigUint],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(values.iter().map(ToString::to_string))
}
