//! コラッツ (3x+1) 軌道の生成と範囲統計
//!
//! 任意精度整数 (BigUint) で開始値から 1 までの軌道を生成し、
//! [1, max_n] の各開始値について停止時間と最大値を集計する。
//! 表示用の整形は `render`、CLI/GUI はそれぞれのバイナリにある。

pub mod config;
mod decimal;
pub mod error;
pub mod input;
pub mod logging;
pub mod render;
pub mod sequence;
pub mod stats;
pub mod step;

pub use config::{Config, ConfigError};
pub use error::{CollatzError, Result};
pub use sequence::{generate, Generator, Metrics, Sequence};
pub use stats::{analyze_range, generate_multiple, Extremum, RangeRecord, RangeReport};
pub use step::{collatz_step, Trajectory};
