//! Provenance record appended to the `history` of written features.

use std::path::Path;

/// Separator between the parts of the provenance record.
const SEPARATOR: &str = " : ";

/// Returns a string describing the current invocation:
/// `<time> : <host> : <user> : <working directory> : <command line>;`
///
/// Time is the local time formatted as `%m/%d/%y %H:%M`.
pub fn provenance_command() -> String {
    let time = chrono::Local::now().format("%m/%d/%y %H:%M").to_string();
    let cwd = std::env::current_dir()
        .map(|dir| dir.display().to_string())
        .unwrap_or_default();
    let call = std::env::args().collect::<Vec<_>>().join(" ");

    format!(
        "{};",
        [time, host_name(), user_name(), cwd, call].join(SEPARATOR)
    )
}

fn host_name() -> String {
    if let Ok(host) = std::env::var("HOSTNAME") {
        if !host.is_empty() {
            return host;
        }
    }

    std::fs::read_to_string(Path::new("/etc/hostname"))
        .ok()
        .map(|host| host.trim().to_string())
        .filter(|host| !host.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

fn user_name() -> String {
    std::env::var("USER").unwrap_or_else(|_| "unknown".to_string())
}
