use clap::Command;

pub fn command() -> Command {
    Command::new("whoami").about("Show the e-mail addresses of your account")
}
