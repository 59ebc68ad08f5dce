use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// バイナリ用のログ初期化。出力は stderr（stdout は結果専用）。
/// RUST_LOG が設定されていればそちらを優先する。
pub fn init_logging(verbose: bool) {
    let default_directive = if verbose {
        "collatz_viz=debug,info"
    } else {
        "collatz_viz=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    // 二重初期化（テストなど）は無視する
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .try_init();
}
