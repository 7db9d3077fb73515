//! Logger module
//!
//! Server lifecycle logging, per-request access logging, and error/warning
//! output. All writes go through a process-wide writer with separate access
//! and error sinks; before `init` runs, messages fall back to stdout/stderr.

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;
use std::net::SocketAddr;

/// Initialize the logger from configuration
///
/// Called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write_info("======================================");
    write_info("Game host started");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("Log level: {}", config.logging.level));
    write_info(&format!(
        "Template directory: {}",
        config.resources.template_dir
    ));
    write_info(&format!(
        "Static assets: {} -> {}",
        config.resources.static_route, config.resources.static_dir
    ));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("======================================\n");
}

/// Note that the session secret exists without revealing it
pub fn log_secret_generated(len: usize) {
    write_info(&format!("[Startup] Session secret generated ({len} bytes)"));
}

pub fn log_shutdown(signal_name: &str) {
    write_info(&format!(
        "\n[Shutdown] {signal_name} received, stopping accept loop"
    ));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

/// Write a formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_info(&entry.format(format));
}
