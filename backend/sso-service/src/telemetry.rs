use crate::config::Environment;
use tracing_subscriber::EnvFilter;

/// Default filter when RUST_LOG is not set
fn default_filter(env: Environment) -> &'static str {
    match env {
        Environment::Local | Environment::Dev => "sso_service=debug,info",
        Environment::Prod => "sso_service=info,info",
    }
}

/// Initialize the global tracing subscriber.
///
/// `local` logs human-readable text, `dev` and `prod` log JSON.
/// RUST_LOG always wins over the per-environment level.
pub fn init_tracing(env: Environment) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(env)));

    match env {
        Environment::Local => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .init();
        }
        Environment::Dev | Environment::Prod => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .json()
                .init();
        }
    }
}
