use crate::{
    cli::{actions::Action, globals::GlobalArgs, progressbar::Bar, runner},
    skp::{Skp, Transfer, TransferFile, TransferLocation, actions},
};
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tokio::{fs, io::AsyncWriteExt};

/// # Errors
/// Will return an error if the action fails
pub async fn handle(skp: &Skp, action: Action, globals: &GlobalArgs) -> Result<()> {
    if let Action::Download {
        dir,
        interval,
        include_old,
        include_sent,
        use_filename,
    } = action
    {
        let location = if include_sent {
            TransferLocation::SentAndReceived
        } else {
            TransferLocation::Received
        };

        log::info!("download directory: {}", dir.display());

        let dir = dir.as_path();
        let quiet = globals.quiet;

        runner::run_with_optional_interval(interval, move || async move {
            let transfers = actions::ListTransfers::new(Some(location), None)
                .request(skp)
                .await?;

            let transfers: Vec<Transfer> = transfers
                .into_iter()
                .filter(|t| include_old || t.is_unread)
                .collect();

            if transfers.is_empty() {
                println!("No new transfers found");
                return Ok(());
            }

            println!("{} transfer(s) found", transfers.len());

            for transfer in &transfers {
                download_transfer(skp, transfer, dir, use_filename, quiet).await?;
            }

            Ok(())
        })
        .await?;
    }

    Ok(())
}

async fn download_transfer(
    skp: &Skp,
    transfer: &Transfer,
    base_dir: &Path,
    use_filename: bool,
    quiet: bool,
) -> Result<()> {
    println!("Transfer {}", transfer.recipient_id.yellow());

    let folder = base_dir.join(&transfer.recipient_id);

    fs::create_dir_all(&folder)
        .await
        .with_context(|| format!("unable to create: {}", folder.display()))?;

    for file in &transfer.files {
        let path = folder.join(target_file_name(file, use_filename));
        download_file(skp, file, &path, quiet).await?;
    }

    // fetched again, downloading marks the transfer as read
    let updated = actions::GetTransfer::new(&transfer.recipient_id)
        .request(skp)
        .await?;

    let json_path = folder.join("transfer.json");

    fs::write(&json_path, serde_json::to_vec_pretty(&updated)?)
        .await
        .with_context(|| format!("unable to write: {}", json_path.display()))?;

    println!("{}", "Done!".green());

    Ok(())
}

async fn download_file(skp: &Skp, file: &TransferFile, path: &Path, quiet: bool) -> Result<()> {
    log::info!("downloading {} to {}", file.object_id, path.display());

    let mut res = actions::GetFile::new(file).request(skp).await?;

    let mut out = fs::File::create(path)
        .await
        .with_context(|| format!("unable to create: {}", path.display()))?;

    let pb = Bar::new(file.size, quiet);

    if let Some(pb) = pb.progress.as_ref() {
        pb.set_message(file.name.clone());
    }

    let mut downloaded = 0u64;

    while let Some(chunk) = res.chunk().await? {
        out.write_all(&chunk).await?;
        downloaded += chunk.len() as u64;
        pb.set_position(downloaded.min(file.size));
    }

    out.flush().await?;

    pb.finish();

    Ok(())
}

/// The object id, or the display name without any directory part.
#[must_use]
pub fn target_file_name(file: &TransferFile, use_filename: bool) -> PathBuf {
    if use_filename {
        if let Some(name) = Path::new(&file.name).file_name() {
            return PathBuf::from(name);
        }
    }

    PathBuf::from(&file.object_id)
}
