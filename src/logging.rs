use std::env;
use std::sync::atomic::{AtomicBool, Ordering};

static QUIET: AtomicBool = AtomicBool::new(false);

fn env_quiet() -> bool {
    match env::var("NEWS_QUIET") {
        Ok(v) => matches!(v.trim(), "1" | "true" | "TRUE" | "yes" | "on"),
        Err(_) => false,
    }
}

/// Silence progress output for the rest of the process. Used when stdout
/// carries a machine-readable report.
pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

pub fn is_quiet() -> bool {
    QUIET.load(Ordering::Relaxed) || env_quiet()
}

/// Print one human-readable progress line to stdout.
pub fn progress(line: impl AsRef<str>) {
    if is_quiet() {
        return;
    }
    println!("{}", line.as_ref());
}

/// Print a horizontal rule of `width` characters, used around report banners.
pub fn rule(width: usize) {
    progress("=".repeat(width));
}
