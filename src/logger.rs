use crate::types::{LogFormat, ServiceConfig};
use crate::Error;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when set.
pub fn init_logger(cfg: &ServiceConfig) -> Result<(), Error> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cfg.log_level))
        .map_err(|err| Error::config(format!("LOG_LEVEL is not a valid filter: {err}")))?;

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = match cfg.log_format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_timer(UtcTime::rfc_3339())
                    .json(),
            )
            .try_init(),
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_timer(UtcTime::rfc_3339())
                    .with_thread_ids(true),
            )
            .try_init(),
    };

    result.map_err(|err| Error::config(format!("failed to install tracing subscriber: {err}")))
}
