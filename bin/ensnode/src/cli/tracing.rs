// This file is part of ENSNode.
//
// ENSNode is free software: you can redistribute it and/or modify it under the
// terms of the GNU Lesser General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later version.
//
// ENSNode is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with ENSNode.
// If not, see https://www.gnu.org/licenses/.

use std::{io, path::Path};

use anyhow::Context;
pub use tracing::*;
use tracing::{subscriber, subscriber::Interest, Metadata, Subscriber};
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_log::LogTracer;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, FmtSubscriber, Layer};

use super::LogsArgs;

/// Install the global subscriber. `RUST_LOG` takes precedence over `--log.level`.
pub fn configure_logging(config: &LogsArgs) -> anyhow::Result<WorkerGuard> {
    let (appender, guard) = match &config.file {
        Some(log_file) => {
            let path = Path::new(log_file);
            let dir = path.parent().unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .with_context(|| format!("log file {log_file} has no file name"))?;
            let appender = if config.rotate_daily {
                rolling::daily(dir, file_name)
            } else {
                rolling::never(dir, file_name)
            };
            tracing_appender::non_blocking(appender)
        }
        None => tracing_appender::non_blocking(io::stdout()),
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .with_context(|| format!("invalid log level {}", config.level))?;
    let builder = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(appender);
    if config.json {
        subscriber::set_global_default(builder.json().finish().with(TargetBlacklistLayer))?;
    } else {
        subscriber::set_global_default(builder.compact().finish().with(TargetBlacklistLayer))?;
    }

    // sqlx and reqwest log through `log`
    LogTracer::init()?;

    Ok(guard)
}

const BLACKLISTED_TARGETS: &[&str] = &["h2", "hyper", "tower::buffer", "sqlx::query"];

/// Drops chatty dependency targets at the callsite.
struct TargetBlacklistLayer;

impl<S: Subscriber> Layer<S> for TargetBlacklistLayer {
    fn register_callsite(&self, metadata: &'static Metadata<'static>) -> Interest {
        if is_blacklisted(metadata.target()) {
            Interest::never()
        } else {
            Interest::always()
        }
    }
}

fn is_blacklisted(target: &str) -> bool {
    BLACKLISTED_TARGETS
        .iter()
        .any(|blacklisted| target.starts_with(blacklisted))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blacklist() {
        assert!(is_blacklisted("hyper::proto::h1"));
        assert!(is_blacklisted("sqlx::query"));
        assert!(!is_blacklisted("ensnode_resolution::forward"));
    }
}
