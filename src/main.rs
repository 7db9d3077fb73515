use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;

mod config;
mod handler;
mod http;
mod logger;
mod server;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Optional positional argument: config file stem (default "config")
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config".to_string());
    let cfg = config::Config::load_from(&config_path)?;

    logger::init(&cfg)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(run(cfg))
}

async fn run(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.socket_addr()?;

    // The secret is fresh on every start and dies with the process
    let secret_key = config::SecretKey::generate();
    let state = Arc::new(config::AppState::new(cfg, secret_key));

    state.templates.self_check();

    let listener = server::bind_listener(addr)?;
    logger::log_server_start(&addr, &state.config);
    logger::log_secret_generated(state.secret_key.as_bytes().len());

    let shutdown = Arc::new(Notify::new());
    server::spawn_signal_handler(Arc::clone(&shutdown));

    serve(listener, state, shutdown).await
}

/// Accept loop: hand each connection to a task, stop on shutdown signal.
/// In-flight connections finish in their own tasks after the loop exits.
async fn serve(
    listener: TcpListener,
    state: Arc<config::AppState>,
    shutdown: Arc<Notify>,
) -> Result<(), Box<dyn std::error::Error>> {
    let active_connections = Arc::new(AtomicUsize::new(0));

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        server::accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            _ = shutdown.notified() => {
                break;
            }
        }
    }

    Ok(())
}
