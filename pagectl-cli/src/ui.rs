//! Terminal feedback for long-running pagectl commands
//!
//! Bars and spinners draw on stderr and are hidden when `--quiet` is given,
//! `PAGECTL_QUIET=1` is set, or stderr is not a terminal. Hidden bars are
//! still returned so callers never branch on quiet mode themselves.

use std::io::IsTerminal;
use std::sync::OnceLock;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const QUIET_ENV: &str = "PAGECTL_QUIET";
const SPINNER_TEMPLATE: &str = "{spinner:.cyan} {msg}";
const BAR_TEMPLATE: &str = "{msg:<16} [{bar:30.cyan/dim}] {pos}/{len} ({eta})";

static QUIET: OnceLock<bool> = OnceLock::new();

fn resolve_quiet(flag: bool, env: Option<&str>, stderr_is_tty: bool) -> bool {
    flag || env.map(str::trim) == Some("1") || !stderr_is_tty
}

/// Decide quiet mode once, at startup
pub fn init_quiet_mode(flag: bool) {
    let env = std::env::var(QUIET_ENV).ok();
    let quiet = resolve_quiet(flag, env.as_deref(), std::io::stderr().is_terminal());
    QUIET.set(quiet).ok();
}

fn is_quiet() -> bool {
    QUIET.get().copied().unwrap_or(false)
}

/// Spinner for work of unknown length
pub fn spinner(msg: impl Into<String>) -> ProgressBar {
    if is_quiet() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner().with_style(
        ProgressStyle::with_template(SPINNER_TEMPLATE).expect("static spinner template"),
    );
    pb.set_message(msg.into());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Bar counting `len` requests or rows
pub fn progress_bar(len: u64, msg: impl Into<String>) -> ProgressBar {
    if is_quiet() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len).with_style(
        ProgressStyle::with_template(BAR_TEMPLATE)
            .expect("static bar template")
            .progress_chars("━╸─"),
    );
    pb.set_message(msg.into());
    pb
}

/// Print a report line on stdout without tearing the bar, even when hidden
pub fn println(pb: &ProgressBar, line: impl AsRef<str>) {
    pb.suspend(|| println!("{}", line.as_ref()));
}

/// Replace the bar with a ✓/✗ summary on stderr
pub fn finish(pb: ProgressBar, ok: bool, msg: impl AsRef<str>) {
    if pb.is_hidden() {
        return;
    }
    let mark = if ok { "✓" } else { "✗" };
    pb.finish_and_clear();
    eprintln!("{mark} {}", msg.as_ref());
}
