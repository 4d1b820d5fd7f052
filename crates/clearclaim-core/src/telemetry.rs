//! Tracing subscriber setup shared by the workspace binaries.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the process-wide tracing subscriber.
///
/// `RUST_LOG` takes precedence over `level` when set. With `json` the
/// formatter emits newline-delimited JSON records for log pipelines;
/// otherwise human-readable lines without targets. A subscriber can only
/// be installed once per process, so repeated calls are ignored and tests
/// may call this freely.
pub fn init_tracing(json: bool, level: Level) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    let format = fmt::layer().with_target(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(format.json()).try_init().ok();
    } else {
        registry.with(format).try_init().ok();
    }
}
