use std::process::ExitCode;

use dotenv::dotenv;
use human_panic::setup_panic;
use tracing::{debug, warn};

// 从 lib.rs 导入模块
use rust_course_ratings::config::AppConfig;
use rust_course_ratings::errors::RatingsError;
use rust_course_ratings::runtime::lifetime;

fn report(err: &RatingsError) {
    #[cfg(debug_assertions)]
    eprintln!("{}", err.format_colored());
    #[cfg(not(debug_assertions))]
    eprintln!("{}", err.format_simple());
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    let start = chrono::Utc::now();

    // 初始化配置
    setup_panic!();
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            report(&RatingsError::from(e));
            return ExitCode::FAILURE;
        }
    };

    // 初始化日志
    let stdout_log = std::io::stdout();
    let (non_blocking_writer, _guard) = tracing_appender::non_blocking(stdout_log);
    let filter = tracing_subscriber::EnvFilter::new(config.app.log_level.as_str());
    let tracing_format = tracing_subscriber::fmt::format()
        .with_level(true)
        .with_ansi(true);

    let tracing_builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking_writer)
        .event_format(tracing_format);

    if config.is_development() {
        tracing_builder
            .with_file(true)
            .with_line_number(true)
            .init();
    } else {
        tracing_builder.json().init();
    }

    warn!(
        "Starting...
        Project: {}
        Version: {}
        Authors: {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_AUTHORS")
    );

    let engine = match lifetime::startup::prepare_startup(&config).await {
        Ok(engine) => engine,
        Err(e) => {
            report(&e);
            return ExitCode::FAILURE;
        }
    };

    debug!(
        "Startup completed in {} ms",
        chrono::Utc::now()
            .signed_duration_since(start)
            .num_milliseconds()
    );
    warn!("Rating engine ready, press Ctrl+C to stop");

    lifetime::shutdown::listen_for_shutdown().await;

    match lifetime::shutdown::shutdown(engine).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}
