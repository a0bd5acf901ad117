//! Tracing subscriber setup.

use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt};

/// Install the global subscriber. Logs go to stderr so stdout stays usable
/// for reports and DDL.
///
/// `RUST_LOG` wins when set; otherwise our crates log at `warn`, or `debug`
/// with `--verbose`.
pub fn init(verbose: bool, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let level = if verbose { Level::DEBUG } else { Level::WARN };

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new(format!(
            "warn,normform={level},normform_cli={level},tower_http={level}"
        )),
    };

    if json {
        let subscriber = fmt::Subscriber::builder()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }

    Ok(())
}
