//! Telemetry setup

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogSettings;
use crate::error::AppError;

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over `log.level`. When `log.directory` is set a daily
/// rolling file is written as well; keep the returned guard alive until
/// shutdown or buffered lines are lost.
pub fn init_telemetry(settings: &LogSettings) -> Result<Option<WorkerGuard>, AppError> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .map_err(|e| AppError::TelemetryError(e.to_string()))?;

    let (file_writer, guard) = match &settings.directory {
        Some(dir) => {
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("sitenav")
                .filename_suffix("log")
                .build(dir)
                .map_err(|e| AppError::TelemetryError(e.to_string()))?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(writer), Some(guard))
        }
        None => (None, None),
    };

    let file_layer = file_writer.map(|writer| {
        fmt::layer()
            .json()
            .with_writer(writer)
            .with_target(true)
            .with_ansi(false)
    });

    let registry = tracing_subscriber::registry().with(env_filter).with(file_layer);

    let result = if settings.format == "json" {
        registry.with(fmt::layer().json().with_target(true)).try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };
    result.map_err(|e| AppError::TelemetryError(e.to_string()))?;

    Ok(guard)
}
