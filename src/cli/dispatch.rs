use crate::{
    cli::actions::Action,
    skp::{RecipientType, TransferLocation},
};
use anyhow::{Context, Result, anyhow};
use secrecy::SecretString;
use std::{path::PathBuf, time::Duration};

// <downloads>/transfers, falls back to ~/Downloads
fn default_download_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join("Downloads")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("transfers")
}

fn interval(sub_m: &clap::ArgMatches) -> Option<Duration> {
    sub_m
        .get_one::<u64>("interval")
        .map(|s| Duration::from_secs(*s))
}

// return Action based on the subcommand
pub fn dispatch(matches: &clap::ArgMatches) -> Result<Action> {
    // Closure to return subcommand_matches
    let sub_m = |subcommand| -> Result<&clap::ArgMatches> {
        matches
            .subcommand_matches(subcommand)
            .context("arguments missing")
    };

    match matches.subcommand_name() {
        Some("upload") => {
            let sub_m = sub_m("upload")?;

            let files: Vec<PathBuf> = sub_m
                .get_many::<PathBuf>("files")
                .unwrap_or_default()
                .cloned()
                .collect();

            let mut recipients = Vec::new();

            for (id, kind) in [
                ("to", RecipientType::To),
                ("cc", RecipientType::Cc),
                ("bcc", RecipientType::Bcc),
            ] {
                recipients.extend(
                    sub_m
                        .get_many::<String>(id)
                        .unwrap_or_default()
                        .map(|email| (kind, email.to_string())),
                );
            }

            if recipients.is_empty() {
                return Err(anyhow!("at least one recipient is required, use --to, --cc or --bcc"));
            }

            Ok(Action::Upload {
                files,
                recipients,
                subject: sub_m.get_one::<String>("subject").cloned(),
                message: sub_m.get_one::<String>("message").cloned(),
                ttl: sub_m.get_one::<u32>("ttl").copied(),
                password: sub_m
                    .get_one::<String>("password")
                    .map(|p| SecretString::new(p.clone().into_boxed_str())),
            })
        }

        Some("transfers") => {
            let sub_m = sub_m("transfers")?;

            let location = sub_m
                .get_one::<String>("location")
                .map_or(Ok(TransferLocation::default()), |s| s.parse())
                .map_err(|e: String| anyhow!(e))?;

            Ok(Action::ListTransfers {
                location,
                search: sub_m.get_one::<String>("search").cloned(),
                unread: sub_m.get_one::<bool>("unread").copied().unwrap_or(false),
            })
        }

        Some("download") => {
            let sub_m = sub_m("download")?;

            let dir = sub_m
                .get_one::<PathBuf>("dir")
                .cloned()
                .unwrap_or_else(default_download_dir);

            Ok(Action::Download {
                dir,
                interval: interval(sub_m),
                include_old: sub_m.get_one::<bool>("include-old").copied().unwrap_or(false),
                include_sent: sub_m.get_one::<bool>("include-sent").copied().unwrap_or(false),
                use_filename: sub_m.get_one::<bool>("use-filename").copied().unwrap_or(false),
            })
        }

        Some("copy") => {
            let sub_m = sub_m("copy")?;

            let folder = sub_m
                .get_one::<u64>("drive")
                .copied()
                .context("drive folder missing")?;

            Ok(Action::Copy {
                folder,
                interval: interval(sub_m),
            })
        }

        Some("whoami") => Ok(Action::WhoAmI),

        _ => Err(anyhow!("unknown command, for more information try --help")),
    }
}
