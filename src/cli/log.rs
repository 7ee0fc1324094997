//! Logging setup: `log` facade, `fern` backend.

use ::log::LevelFilter;
use colored::*;

const LEVELS: [LevelFilter; 4] = [
    LevelFilter::Warn,
    LevelFilter::Info,
    LevelFilter::Debug,
    LevelFilter::Trace,
];

fn parse_level(s: &str) -> Result<LevelFilter, String> {
    s.parse::<LevelFilter>()
        .map_err(|_| format!("Invalid log level '{}'", s))
}

/// Parse a `-l` spec: `MODULE=LEVEL`, or a bare `MODULE` meaning trace.
fn parse_spec(spec: &str) -> Result<(String, LevelFilter), String> {
    let (module, level) = match spec.split_once('=') {
        Some((module, level)) => (module.trim(), parse_level(level.trim())?),
        None => (spec, LevelFilter::Trace),
    };
    if module.is_empty() {
        return Err(format!("Invalid log spec '{}': missing module name", spec));
    }
    // Modules are given relative to the crate
    let module = if module.starts_with(env!("CARGO_CRATE_NAME")) {
        module.to_string()
    } else {
        format!("{}::{}", env!("CARGO_CRATE_NAME"), module)
    };
    Ok((module, level))
}

fn colored_level(level: ::log::Level) -> ColoredString {
    let name = level.to_string();
    match level {
        ::log::Level::Error => name.bright_red(),
        ::log::Level::Warn => name.yellow(),
        ::log::Level::Info => name.green(),
        ::log::Level::Debug => name.cyan(),
        ::log::Level::Trace => name.dimmed(),
    }
}

fn timestamp() -> String {
    let format = time::macros::format_description!("[hour]:[minute]:[second].[subsecond digits:3]");
    let now = time::OffsetDateTime::now_local().unwrap_or_else(|_| time::OffsetDateTime::now_utc());
    now.format(&format).unwrap_or_default()
}

pub fn setup(verbose: u8, logs: Vec<&str>, log_time: bool) -> Result<(), String> {
    let level = LEVELS[usize::from(verbose).min(LEVELS.len() - 1)];

    let mut dispatch = fern::Dispatch::new()
        .format(move |out, message, record| {
            let prefix = if log_time {
                format!("{} ", timestamp())
            } else {
                String::new()
            };
            out.finish(format_args!(
                "{}{} [{}] {}",
                prefix,
                colored_level(record.level()),
                record.target(),
                message
            ))
        })
        .level(level);

    for spec in logs {
        let (module, module_level) = parse_spec(spec)?;
        dispatch = dispatch.level_for(module, module_level);
    }

    dispatch
        .chain(std::io::stderr())
        .apply()
        .map_err(|e| format!("Failed to set up logging: {}", e))
}
