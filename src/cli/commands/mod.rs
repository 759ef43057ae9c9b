pub mod cmd_copy;
pub mod cmd_download;
pub mod cmd_transfers;
pub mod cmd_upload;
pub mod cmd_whoami;

use clap::{
    Arg, ColorChoice, Command,
    builder::ValueParser,
    builder::styling::{AnsiColor, Effects, Styles},
};
use regex::Regex;
use std::{
    fs,
    path::{Path, PathBuf},
};

pub fn validator_is_num() -> ValueParser {
    ValueParser::from(move |s: &str| -> std::result::Result<usize, String> {
        s.parse::<usize>()
            .map_err(|_| String::from("Not a valid number"))
    })
}

// directories are rejected, every upload argument must be a regular file
pub fn validator_is_file() -> ValueParser {
    ValueParser::from(move |s: &str| -> std::result::Result<PathBuf, String> {
        if let Ok(metadata) = fs::metadata(s) {
            if metadata.is_file() {
                return Ok(PathBuf::from(s));
            }
        }

        Err(format!("Invalid file path or file does not exist: '{s}'"))
    })
}

pub fn validator_email() -> ValueParser {
    ValueParser::from(move |s: &str| -> std::result::Result<String, String> {
        let re = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").map_err(|e| e.to_string())?;

        if re.is_match(s) {
            Ok(s.to_string())
        } else {
            Err(format!("Invalid e-mail address: '{s}'"))
        }
    })
}

pub fn new(config_path: &Path) -> Command {
    // get config file path (default: ~/.config/teambeam/config.yml)
    let config_file_path = config_path.join("config.yml");

    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new("teambeam")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Send and receive TeamBeam transfers")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new("config")
            .default_value(config_file_path.into_os_string())
            .long("config")
            .num_args(1)
            .short('c')
            .global(true)
            .value_parser(clap::value_parser!(PathBuf))
            .value_name("config.yml")
        )
        .arg(
            Arg::new("quiet")
            .long("quiet")
            .short('q')
            .help("Don't show progress bars")
            .global(true)
            .num_args(0)
        )
        .arg(
            Arg::new("verbose")
            .help("Verbosity level")
            .short('v')
            .long("verbose")
            .global(true)
            .action(clap::ArgAction::Count)
        )
        .arg(
            Arg::new("retries")
            .help("Number of retries per file before an upload fails")
            .long("retries")
            .short('r')
            .default_value("10")
            .global(true)
            .value_parser(validator_is_num())
            .num_args(1)
        )
        .subcommand(cmd_upload::command())
        .subcommand(cmd_transfers::command())
        .subcommand(cmd_download::command())
        .subcommand(cmd_copy::command())
        .subcommand(cmd_whoami::command())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::TempDir;

    #[test]
    fn test_check_defaults() -> Result<()> {
        let tmp_dir = TempDir::new()?;
        let cmd = new(tmp_dir.path());
        let m = cmd.try_get_matches_from(vec!["teambeam", "whoami"]);
        assert!(m.is_ok());

        // get matches
        let m = m.unwrap();
        assert_eq!(
            m.get_one::<PathBuf>("config")
                .map(|s| s.display().to_string()),
            Some(tmp_dir.path().join("config.yml").display().to_string())
        );
        assert_eq!(m.get_one::<usize>("retries").copied(), Some(10));
        assert_eq!(m.get_one::<bool>("quiet").copied(), Some(false));
        assert_eq!(m.get_one::<u8>("verbose").copied(), Some(0));

        Ok(())
    }

    #[test]
    fn test_check_subcommand_required() -> Result<()> {
        let tmp_dir = TempDir::new()?;
        let cmd = new(tmp_dir.path());
        assert!(cmd.try_get_matches_from(vec!["teambeam"]).is_err());

        Ok(())
    }

    #[test]
    fn test_check_globals_after_subcommand() -> Result<()> {
        let tmp_dir = TempDir::new()?;
        let cmd = new(tmp_dir.path());
        let m = cmd.try_get_matches_from(vec![
            "teambeam", "whoami", "-vv", "--retries", "3", "--quiet", "--config", "x.yml",
        ])?;

        assert_eq!(m.get_one::<u8>("verbose").copied(), Some(2));
        assert_eq!(m.get_one::<usize>("retries").copied(), Some(3));
        assert_eq!(m.get_one::<bool>("quiet").copied(), Some(true));
        assert_eq!(
            m.get_one::<PathBuf>("config").map(|p| p.display().to_string()),
            Some("x.yml".to_string())
        );

        Ok(())
    }

    #[test]
    fn test_check_retries() -> Result<()> {
        let tmp_dir = TempDir::new()?;
        let cmd = new(tmp_dir.path());
        let m = cmd.try_get_matches_from(vec!["teambeam", "--retries", "x", "whoami"]);
        assert!(m.is_err());

        Ok(())
    }

    #[test]
    fn test_validator_email() {
        let test_cases = vec![
            ("someone@example.com", true),
            ("first.last+tag@sub.example.co", true),
            ("someone@example", false),
            ("someone.example.com", false),
            ("some one@example.com", false),
            ("", false),
        ];
        for (email, valid) in test_cases {
            let cmd = Command::new("test").arg(
                Arg::new("email")
                    .long("email")
                    .value_parser(validator_email()),
            );
            let m = cmd.try_get_matches_from(vec!["test", "--email", email]);
            assert_eq!(m.is_ok(), valid, "{email}");
        }
    }
}
