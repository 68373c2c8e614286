use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::EnvFilter;

use crate::config::Env;

/// Installs the global subscriber. `RUST_LOG` overrides the per-environment default level.
pub fn init(env: Env) -> Result<(), TryInitError> {
    let default_level = match env {
        Env::Local | Env::Dev => "debug",
        Env::Prod => "info",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(true);

    match env {
        Env::Local => builder
            .pretty()
            .with_file(true)
            .with_line_number(true)
            .finish()
            .try_init(),
        Env::Dev | Env::Prod => builder.compact().with_ansi(false).finish().try_init(),
    }
}
