use clap::{Parser, Subcommand};

/// Composes Helm-style values documents
#[derive(Parser)]
#[command(author, about, long_about=None, disable_version_flag(true))]
pub struct Args {
    /// force color mode (defaults to check tty)
    #[arg(long)]
    pub color: bool,

    /// force no-color mode (defaults to check tty)
    #[arg(long)]
    pub no_color: bool,

    /// display version and quit
    #[arg(short = 'V', long = "version")]
    pub version: bool,

    /// prepend time to each log line
    #[arg(long)]
    pub log_time: bool,

    /// Turn general verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configure component wise logging (MODULE=LEVEL)
    #[arg(long, short, action = clap::ArgAction::Append)]
    pub log: Option<Vec<String>>,

    #[command(subcommand)]
    pub action: Option<Actions>,
}

#[derive(Subcommand)]
pub enum Actions {
    Compose {
        /// Compose values from a manifest, values files and overrides

        /// Manifest listing valuesFrom, values and set entries
        #[clap(name = "MANIFEST")]
        manifest: Option<String>,

        /// Values file merged after the manifest's sources (repeatable)
        #[arg(short = 'f', long = "values", action = clap::ArgAction::Append)]
        values: Vec<String>,

        /// Override PATH=VALUE applied after the manifest's overrides (repeatable)
        #[arg(long = "set", action = clap::ArgAction::Append)]
        set: Vec<String>,

        /// Override PATH=FILE, the value being the content of FILE (repeatable)
        #[arg(long = "set-file", action = clap::ArgAction::Append)]
        set_file: Vec<String>,
    },
    Merge {
        /// Deep-merge YAML files in order, later files taking precedence

        /// Files to merge
        #[clap(name = "FILE", required = true)]
        files: Vec<String>,
    },
    SetValue {
        /// Set a value at a given path in YAML from stdin

        /// The path where to set the value
        #[clap(name = "KEY")]
        key: String,

        /// The value to set
        #[clap(name = "VALUE")]
        value: String,
    },
}
