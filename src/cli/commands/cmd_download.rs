use clap::{Arg, Command};
use std::path::PathBuf;

pub fn command() -> Command {
    Command::new("download")
        .about("Download transfers from your inbox")
        .arg(
            Arg::new("dir")
                .help("Directory where transfers are stored, default: <downloads>/transfers")
                .long("dir")
                .short('d')
                .value_name("DIRECTORY")
                .value_parser(clap::value_parser!(PathBuf))
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
        .arg(
            Arg::new("include-old")
                .help("Download already read transfers as well")
                .long("include-old")
                .short('O')
                .num_args(0),
        )
        .arg(
            Arg::new("include-sent")
                .help("Download sent transfers as well")
                .long("include-sent")
                .short('S')
                .num_args(0),
        )
        .arg(
            Arg::new("use-filename")
                .help("Store files under their names instead of their object ids")
                .long("use-filename")
                .short('F')
                .num_args(0),
        )
}
