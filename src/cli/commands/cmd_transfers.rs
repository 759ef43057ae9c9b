use clap::{Arg, Command};

pub fn command() -> Command {
    Command::new("transfers")
        .about("List transfers")
        .arg(
            Arg::new("location")
                .help("Which transfers to list")
                .long("location")
                .short('l')
                .default_value("received")
                .value_parser(["received", "sent", "sentandreceived"])
                .num_args(1),
        )
        .arg(
            Arg::new("search")
                .help("Only transfers matching this text")
                .long("search")
                .short('s')
                .num_args(1),
        )
        .arg(
            Arg::new("unread")
                .help("Only unread transfers")
                .long("unread")
                .short('u')
                .num_args(0),
        )
}
