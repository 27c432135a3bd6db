use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use confparse::{Configuration, Delimiter, Section};

/// Inspect and edit INI-style configuration files.
///
/// Commands that change the file write it back in place, keeping the previous version as
/// `<FILE>.bak`.
#[derive(Debug, Parser)]
#[command(name = "confparse", version)]
struct Cli {
    /// Configuration file to operate on.
    file: PathBuf,

    /// Delimiter written between option names and values.
    #[arg(long, default_value_t = Delimiter::Equal, env = "CONFPARSE_DELIMITER")]
    delimiter: Delimiter,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the whole file, or every section with the given name.
    Show { fqn: Option<String> },
    /// List section names in order of first appearance.
    Sections,
    /// Print every section whose name matches a regular expression.
    Find { pattern: String },
    /// Print the value of an option in the first section with the given name.
    Get { fqn: String, option: String },
    /// Set an option in the first section with the given name, creating either if needed.
    Set {
        fqn: String,
        option: String,
        value: String,
    },
    /// Remove an option from the first section with the given name.
    Unset { fqn: String, option: String },
    /// Remove every section whose name matches a regular expression.
    Delete { pattern: String },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = confparse::read(&cli.file)
        .with_context(|| format!("failed to load {}", cli.file.display()))?;
    config.set_delimiter(cli.delimiter);

    match cli.command {
        Command::Show { fqn } => {
            let sections = config.sections(fqn.as_deref().unwrap_or_default())?;
            print_sections(&sections, cli.delimiter);
        }
        Command::Sections => {
            for fqn in config.section_names() {
                println!("{fqn}");
            }
        }
        Command::Find { pattern } => print_sections(&config.find(&pattern)?, cli.delimiter),
        Command::Get { fqn, option } => {
            let section = config.section(&fqn)?;
            anyhow::ensure!(section.exists(&option), "no option {option:?} in [{fqn}]");
            println!("{}", section.value_of(&option));
        }
        Command::Set { fqn, option, value } => {
            let section = config
                .section(&fqn)
                .unwrap_or_else(|_| config.add_section(&fqn));
            section.set_value_for(&option, &value);
            save(&config)?;
        }
        Command::Unset { fqn, option } => {
            let section = config.section(&fqn)?;
            anyhow::ensure!(section.exists(&option), "no option {option:?} in [{fqn}]");
            section.delete(&option);
            save(&config)?;
        }
        Command::Delete { pattern } => {
            let removed = config.delete(&pattern)?;
            save(&config)?;
            eprintln!("deleted {} section(s)", removed.len());
        }
    }

    Ok(())
}

fn print_sections(sections: &[std::sync::Arc<Section>], delimiter: Delimiter) {
    for section in sections {
        print!("{}", section.render(delimiter));
    }
}

fn save(config: &Configuration) -> anyhow::Result<()> {
    config.save().context("failed to save configuration")
}
