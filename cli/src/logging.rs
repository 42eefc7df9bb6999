use colored::*;
use std::env;

// Simple user-facing messages; structured events go through `log`/`tracing`

pub fn log_info(message: &str) {
    if env::var("MINDMIRROR_DEBUG").is_ok() {
        eprintln!("{} {}", "[INFO]".cyan(), message);
    }
}

pub fn log_error(message: &str) {
    eprintln!("{} {}", "[ERROR]".red().bold(), message);
}
