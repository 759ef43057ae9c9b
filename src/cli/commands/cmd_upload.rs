use crate::cli::commands::{validator_email, validator_is_file};
use clap::{Arg, ArgAction, ArgGroup, Command};

pub fn command() -> Command {
    Command::new("upload")
        .about("Send files to one or more recipients")
        .arg(
            Arg::new("files")
                .help("Files to send")
                .required(true)
                .value_name("FILE")
                .value_parser(validator_is_file())
                .num_args(1..),
        )
        .arg(
            Arg::new("to")
                .help("Recipient e-mail address")
                .long("to")
                .short('T')
                .value_name("EMAIL")
                .value_parser(validator_email())
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("cc")
                .help("Carbon copy recipient e-mail address")
                .long("cc")
                .short('C')
                .value_name("EMAIL")
                .value_parser(validator_email())
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("bcc")
                .help("Blind carbon copy recipient e-mail address")
                .long("bcc")
                .short('B')
                .value_name("EMAIL")
                .value_parser(validator_email())
                .action(ArgAction::Append),
        )
        .group(
            ArgGroup::new("recipients")
                .args(["to", "cc", "bcc"])
                .required(true)
                .multiple(true),
        )
        .arg(
            Arg::new("subject")
                .help("Subject of the transfer")
                .long("subject")
                .short('s')
                .num_args(1),
        )
        .arg(
            Arg::new("message")
                .help("Message to the recipients")
                .long("message")
                .short('m')
                .num_args(1),
        )
        .arg(
            Arg::new("ttl")
                .help("Days until the transfer expires, must be one of the values allowed by the server")
                .long("ttl")
                .short('t')
                .value_name("DAYS")
                .value_parser(clap::value_parser!(u32))
                .num_args(1),
        )
        .arg(
            Arg::new("password")
                .help("Protect the transfer with a password")
                .long("password")
                .short('P')
                .num_args(1),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::{io::Write, path::PathBuf};
    use tempfile::NamedTempFile;

    #[test]
    fn test_check_upload() -> Result<()> {
        let mut tmp_file = NamedTempFile::new()?;
        tmp_file.write_all(b"data")?;
        let path = tmp_file.path().display().to_string();

        let cmd = command();
        let m = cmd.try_get_matches_from(vec![
            "upload",
            &path,
            &path,
            "-T",
            "a@example.com",
            "--to",
            "b@example.com",
            "-B",
            "c@example.com",
            "-s",
            "report",
            "-t",
            "7",
            "-P",
            "secret",
        ])?;

        let files: Vec<&PathBuf> = m.get_many::<PathBuf>("files").unwrap_or_default().collect();
        assert_eq!(files.len(), 2);

        let to: Vec<&String> = m.get_many::<String>("to").unwrap_or_default().collect();
        assert_eq!(to, vec!["a@example.com", "b@example.com"]);
        assert_eq!(
            m.get_many::<String>("bcc").unwrap_or_default().count(),
            1
        );
        assert!(m.get_many::<String>("cc").is_none());
        assert_eq!(m.get_one::<u32>("ttl").copied(), Some(7));
        assert_eq!(m.get_one::<String>("subject").map(String::as_str), Some("report"));
        assert_eq!(m.get_one::<String>("password").map(String::as_str), Some("secret"));

        Ok(())
    }

    #[test]
    fn test_check_recipient_required() -> Result<()> {
        let tmp_file = NamedTempFile::new()?;
        let path = tmp_file.path().display().to_string();

        let m = command().try_get_matches_from(vec!["upload", &path]);
        assert!(m.is_err());

        let m = command().try_get_matches_from(vec!["upload", &path, "-C", "a@example.com"]);
        assert!(m.is_ok());

        Ok(())
    }

    #[test]
    fn test_check_directory_rejected() {
        let dir = std::env::temp_dir().display().to_string();
        let m = command().try_get_matches_from(vec!["upload", &dir, "-T", "a@example.com"]);
        assert!(m.is_err());
    }

    #[test]
    fn test_check_invalid_email() -> Result<()> {
        let tmp_file = NamedTempFile::new()?;
        let path = tmp_file.path().display().to_string();
        let m = command().try_get_matches_from(vec!["upload", &path, "-T", "nobody"]);
        assert!(m.is_err());

        Ok(())
    }
}
