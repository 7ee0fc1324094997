use colored::*;
use std::process::ExitCode;

mod cli;
mod values;

/// Exit status reported for any composition or usage failure.
const EXIT_FAILURE: u8 = 127;

fn main() -> ExitCode {
    #[cfg(unix)]
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }

    if let Err(e) = cli::run() {
        eprintln!("{}: {}", "Error".bright_red(), e);
        return ExitCode::from(EXIT_FAILURE);
    }
    ExitCode::SUCCESS
}
