//! `symkey` command line tool
//!
//! Works on key text alone: decode a key, compare two keys, or read the
//! format version. No compilation is needed.

use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use symkey::{
    inspect, scrub_assembly_names, ComparisonOptions, SymbolKey, SymbolKeyComparer,
    SymbolKeyConfig, FORMAT_VERSION,
};
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("symkey")
        .version(symkey::VERSION)
        .about("Inspect and compare symbol keys")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML file with service settings"),
        )
        .subcommand(
            Command::new("inspect")
                .about("Decode a key into its records")
                .arg(key_arg("KEY"))
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("compare")
                .about("Check if two keys name the same symbol")
                .arg(key_arg("LEFT"))
                .arg(key_arg("RIGHT"))
                .arg(
                    Arg::new("ignore-case")
                        .long("ignore-case")
                        .action(ArgAction::SetTrue)
                        .help("Compare names case-insensitively"),
                )
                .arg(
                    Arg::new("ignore-assembly-keys")
                        .long("ignore-assembly-keys")
                        .action(ArgAction::SetTrue)
                        .help("Ignore assembly names"),
                ),
        )
        .subcommand(
            Command::new("version")
                .about("Print the format version of a key")
                .arg(key_arg("KEY")),
        )
        .subcommand(
            Command::new("scrub")
                .about("Print the record with assembly names removed")
                .arg(key_arg("KEY")),
        )
}

fn key_arg(name: &'static str) -> Arg {
    Arg::new(name)
        .required(true)
        .help("Key text, or - to read standard input")
}

/// Key text from an argument, reading stdin for `-`
fn key_text(args: &ArgMatches, name: &str) -> Result<String> {
    let Some(value) = args.get_one::<String>(name) else {
        bail!("missing {name}");
    };
    if value != "-" {
        return Ok(value.clone());
    }
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .context("reading key from standard input")?;
    Ok(text.trim_end_matches(['\r', '\n']).to_string())
}

fn load_config(matches: &ArgMatches) -> Result<SymbolKeyConfig> {
    match matches.get_one::<PathBuf>("config") {
        Some(path) => SymbolKeyConfig::load(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(SymbolKeyConfig::default()),
    }
}

/// Run a command; `Ok(false)` for a negative answer
fn run(matches: &ArgMatches) -> Result<bool> {
    let config = load_config(matches)?;
    tracing::debug!(?config, "configuration loaded");

    match matches.subcommand() {
        Some(("inspect", args)) => {
            let document = inspect::parse(&key_text(args, "KEY")?)?;
            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&document)?);
            } else {
                print!("{}", document.render_tree());
            }
            Ok(true)
        }
        Some(("compare", args)) => {
            let left = key_text(args, "LEFT")?;
            let right = key_text(args, "RIGHT")?;
            let defaults = config.default_comparison;
            let comparer = SymbolKeyComparer::new(ComparisonOptions::new(
                defaults.ignore_case || args.get_flag("ignore-case"),
                defaults.ignore_assembly_keys || args.get_flag("ignore-assembly-keys"),
            ));
            let equal = comparer.equals(&left, &right);
            tracing::debug!(options = ?comparer.options(), equal, "compared keys");
            println!("{}", if equal { "equal" } else { "different" });
            Ok(equal)
        }
        Some(("version", args)) => {
            let text = key_text(args, "KEY")?;
            let Some(version) = SymbolKey::format_version(&text) else {
                bail!("no key header in input");
            };
            println!("{version}");
            Ok(version == FORMAT_VERSION)
        }
        Some(("scrub", args)) => {
            let key: SymbolKey = key_text(args, "KEY")?.parse()?;
            println!("{}", scrub_assembly_names(key.record()).trim_start());
            Ok(true)
        }
        Some((other, _)) => bail!("unknown command {other}"),
        None => bail!("no command given"),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&cli().get_matches()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    const KEY: &str = r#"5 "C#" (N "Acme" 0 (N "" 1 (U (S "Acme.Core" 0) 1) 2) 3)"#;

    fn matches(args: &[&str]) -> ArgMatches {
        cli().try_get_matches_from(args).unwrap()
    }

    #[test]
    fn cli_definition_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn compare_reports_equality() {
        let other = KEY.replace("Acme.Core", "Acme.Other");
        let strict = matches(&["symkey", "compare", KEY, &other]);
        assert_eq!(run(&strict).unwrap(), false);

        let relaxed = matches(&["symkey", "compare", KEY, &other, "--ignore-assembly-keys"]);
        assert_eq!(run(&relaxed).unwrap(), true);
    }

    #[test]
    fn config_supplies_default_comparison() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[default_comparison]\nignore_case = true").unwrap();
        let path = file.path().to_str().unwrap();
        let upper = KEY.to_uppercase();

        let args = matches(&["symkey", "--config", path, "compare", KEY, &upper]);
        assert_eq!(run(&args).unwrap(), true);
    }

    #[test]
    fn version_and_inspect_accept_keys() {
        assert_eq!(run(&matches(&["symkey", "version", KEY])).unwrap(), true);
        let old = KEY.replacen('5', "4", 1);
        assert_eq!(run(&matches(&["symkey", "version", &old])).unwrap(), false);
        assert!(run(&matches(&["symkey", "inspect", KEY, "--json"])).is_ok());
        assert!(run(&matches(&["symkey", "inspect", "garbage"])).is_err());
    }

    #[test]
    fn missing_config_is_an_error() {
        let args = matches(&["symkey", "--config", "/nonexistent/symkey.toml", "version", KEY]);
        assert!(run(&args).is_err());
    }
}
