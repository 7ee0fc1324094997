mod def;
use clap::Parser;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::values::{self, SetOverride, SourceRef, Value, ValuesSpec};

pub mod log;

impl From<values::Error> for String {
    fn from(e: values::Error) -> Self {
        e.to_string()
    }
}

pub fn run() -> Result<(), String> {
    let cli = def::Args::parse();

    // Split log strings upon comma, trim them and flatten all in
    // `logs`, remove empty values
    let logs = cli.log.unwrap_or_default();
    let logs = logs
        .iter()
        .flat_map(|log| log.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<&str>>();

    log::setup(cli.verbose, logs, cli.log_time)?;

    if cli.color && cli.no_color {
        return Err("Cannot use both --color and --no-color".to_string());
    }
    if cli.color {
        colored::control::set_override(true);
    }
    if cli.no_color {
        colored::control::set_override(false);
    }

    if cli.version {
        println!("version: {}", env!("CARGO_PKG_VERSION"));
        println!("libfyaml: {}", values::get_version()?);
        return Ok(());
    }

    let result = match &cli.action {
        Some(def::Actions::Compose {
            manifest,
            values: value_files,
            set,
            set_file,
        }) => {
            let (mut spec, base_dir) = match manifest {
                Some(path) => {
                    let path = Path::new(path);
                    let spec = ValuesSpec::load(path)?;
                    (spec, path.parent().map(Path::to_path_buf))
                }
                None => (ValuesSpec::default(), None),
            };
            extend_spec(&mut spec, value_files, set, set_file)?;
            ::log::debug!(
                "composing {} source(s) and {} override(s)",
                spec.values_from.len(),
                spec.set.len()
            );
            values::compose_values(&spec, &values::FileSource::new(base_dir))?
        }
        Some(def::Actions::Merge { files }) => {
            let mut result = Value::Mapping(Default::default());
            for file in files {
                let text = std::fs::read_to_string(file)
                    .map_err(|e| format!("Failed to read '{}': {}", file, e))?;
                let doc = values::decode_document(&text)
                    .map_err(|e| format!("Failed to parse '{}': {}", file, e))?;
                result = values::merge(result, doc);
            }
            result
        }
        Some(def::Actions::SetValue { key, value }) => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .map_err(|e| e.to_string())?;
            let mut doc = values::decode_document(&input)?;
            values::set_value(key, &mut doc, value)?;
            doc
        }
        None => {
            return Err("Missing action".to_string());
        }
    };

    print!("{}", values::serialize(&result)?);
    Ok(())
}

/// Append command-line sources and overrides after those of the manifest.
///
/// `--set` overrides are applied before `--set-file` ones.
fn extend_spec(
    spec: &mut ValuesSpec,
    value_files: &[String],
    set: &[String],
    set_file: &[String],
) -> Result<(), String> {
    spec.values_from
        .extend(value_files.iter().map(|f| SourceRef::File(cli_path(f))));

    for arg in set {
        let (name, value) = split_assignment(arg, "--set")?;
        spec.set.push(SetOverride::literal(name, value));
    }
    for arg in set_file {
        let (name, file) = split_assignment(arg, "--set-file")?;
        spec.set.push(SetOverride::from_source(
            name,
            SourceRef::File(cli_path(file)),
        ));
    }
    Ok(())
}

/// Command-line paths are relative to the working directory, not to the
/// manifest.
fn cli_path(path: &str) -> PathBuf {
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => PathBuf::from(path),
    }
}

/// Split `PATH=VALUE` on the first `=`.
fn split_assignment<'a>(arg: &'a str, flag: &str) -> Result<(&'a str, &'a str), String> {
    arg.split_once('=')
        .ok_or_else(|| format!("Invalid {} '{}': expected format PATH=VALUE", flag, arg))
}
