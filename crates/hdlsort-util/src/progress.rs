//! Right-aligned status lines on stderr, so stdout stays free for the
//! ordered file list.

use std::io::Write;

use console::Style;

const LABEL_WIDTH: usize = 12;

fn emit(style: Style, label: &str, message: &str) {
    let mut stderr = std::io::stderr().lock();
    let _ = writeln!(stderr, "{:>LABEL_WIDTH$} {message}", style.bold().apply_to(label));
}

/// An action in progress: `     Running vcom top.vhd`
pub fn status(label: &str, message: &str) {
    emit(Style::new().green(), label, message);
}

/// Summaries and notes.
pub fn status_info(label: &str, message: &str) {
    emit(Style::new().cyan(), label, message);
}

pub fn status_warn(label: &str, message: &str) {
    emit(Style::new().yellow(), label, message);
}
