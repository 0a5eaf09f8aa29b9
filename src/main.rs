use clap::Parser;
use gst_bus::pipeline::GstBackend;

mod app;
mod config;
mod signal;

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .filter_module("gst_bus", log::LevelFilter::Info)
        .filter_module("rtmp_relay", log::LevelFilter::Info)
        .parse_default_env()
        .target(env_logger::Target::Stdout)
        .init();
}

#[tokio::main]
async fn main() -> ! {
    init_logging();
    let args = match config::Args::try_parse() {
        Ok(args) => args,
        Err(e) => std::process::exit(config::report_cli_error(&e)),
    };
    let config = config::RelayConfig::from(args);

    let shutdown = signal::Shutdown::new();
    if let Err(e) = signal::spawn_signal_listener(shutdown.clone()) {
        log::error!("Error installing signal handlers: {:#}", e);
        std::process::exit(1);
    }

    let code = app::run(&config, &GstBackend, &shutdown).await;
    if shutdown.is_triggered() {
        log::info!("Received exit signal. Terminated with code {}", code);
    }
    std::process::exit(code);
}
