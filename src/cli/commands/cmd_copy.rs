use clap::{Arg, Command};

pub fn command() -> Command {
    Command::new("copy")
        .about("Copy unread transfers from your inbox to a drive folder")
        .arg(
            Arg::new("drive")
                .help("Drive folder id to copy the transfers into")
                .long("drive")
                .short('d')
                .required(true)
                .value_name("FOLDER")
                .value_parser(clap::value_parser!(u64))
                .num_args(1),
        )
        .arg(
            Arg::new("interval")
                .help("Run in a loop, waiting <interval> seconds between checks")
                .long("interval")
                .short('i')
                .value_name("SECONDS")
                .value_parser(clap::value_parser!(u64).range(1..))
                .num_args(1),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_check_copy() -> Result<()> {
        let m = command().try_get_matches_from(vec!["copy", "--drive", "42"])?;
        assert_eq!(m.get_one::<u64>("drive").copied(), Some(42));
        assert!(m.get_one::<u64>("interval").is_none());

        assert!(command().try_get_matches_from(vec!["copy"]).is_err());
        assert!(
            command()
                .try_get_matches_from(vec!["copy", "-d", "x"])
                .is_err()
        );

        Ok(())
    }
}
