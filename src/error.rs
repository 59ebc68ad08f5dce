use num_bigint::BigUint;
use thiserror::Error;

/// コア演算のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollatzError {
    /// 正の整数でない入力。value は入力値の文字列表現。
    #[error("invalid input `{value}`: {reason}")]
    InvalidInput { value: String, reason: &'static str },

    /// 設定したステップ上限を超えた
    #[error("iteration limit exceeded: {start} did not reach 1 within {limit} steps")]
    IterationLimitExceeded { start: BigUint, limit: u64 },
}

impl CollatzError {
    pub(crate) fn invalid(value: impl ToString, reason: &'static str) -> Self {
        CollatzError::InvalidInput {
            value: value.to_string(),
            reason,
        }
    }

    /// InvalidInput の場合、原因となった入力値を返す
    pub fn offending_value(&self) -> Option<&str> {
        match self {
            CollatzError::InvalidInput { value, .. } => Some(value),
            CollatzError::IterationLimitExceeded { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CollatzError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_message() {
        let err = CollatzError::invalid(-3, "must be a positive integer");
        assert_eq!(err.to_string(), "invalid input `-3`: must be a positive integer");
        assert_eq!(err.offending_value(), Some("-3"));
    }

    #[test]
    fn test_limit_message() {
        let err = CollatzError::IterationLimitExceeded {
            start: BigUint::from(27u64),
            limit: 10,
        };
        assert_eq!(
            err.to_string(),
            "iteration limit exceeded: 27 did not reach 1 within 10 steps"
        );
        assert_eq!(err.offending_value(), None);
    }
}
