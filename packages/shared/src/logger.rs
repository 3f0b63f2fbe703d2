//! Logging setup for the Tsudoi binaries.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Build the default filter directive for the server crate and the given binary.
///
/// `tsudoi-server` becomes `tsudoi_server` because tracing targets use the
/// crate's module path.
pub fn default_filter(binary_name: &str, default_log_level: &str) -> String {
    format!(
        "tsudoi_server={},{}={}",
        default_log_level,
        binary_name.replace('-', "_"),
        default_log_level
    )
}

/// Initialize the tracing subscriber with the specified default log level.
///
/// The log level can be overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "tsudoi-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use tsudoi_shared::logger::setup_logger;
///
/// setup_logger("tsudoi-server", "info");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_normalizes_binary_name() {
        // テスト項目: バイナリ名のハイフンがアンダースコアに変換される
        // given (前提条件):
        let binary_name = "tsudoi-server";

        // when (操作):
        let filter = default_filter(binary_name, "debug");

        // then (期待する結果):
        assert_eq!(filter, "tsudoi_server=debug,tsudoi_server=debug");
    }

    #[test]
    fn test_default_filter_is_parseable() {
        // テスト項目: 生成したフィルタが EnvFilter として解釈できる
        // given (前提条件):
        let filter = default_filter("loadgen", "info");

        // when (操作):
        let result = EnvFilter::try_new(&filter);

        // then (期待する結果):
        assert!(result.is_ok());
    }
}
