use crate::{
    cli::{actions::Action, globals::GlobalArgs, progressbar::Bar, runner},
    skp::{Skp, TransferLocation, actions},
};
use anyhow::Result;
use colored::Colorize;

/// # Errors
/// Will return an error if the action fails
pub async fn handle(skp: &Skp, action: Action, globals: &GlobalArgs) -> Result<()> {
    if let Action::Copy { folder, interval } = action {
        let quiet = globals.quiet;

        runner::run_with_optional_interval(interval, move || async move {
            let transfers = actions::ListTransfers::new(Some(TransferLocation::Received), None)
                .request(skp)
                .await?;

            let unread: Vec<_> = transfers.into_iter().filter(|t| t.is_unread).collect();

            if unread.is_empty() {
                println!("No new transfers found");
                return Ok(());
            }

            println!(
                "Copying {} transfer(s) into drive folder {}",
                unread.len(),
                folder.to_string().yellow()
            );

            let pb = Bar::new_count(unread.len() as u64, quiet);

            for transfer in &unread {
                actions::CopyTransfer::new(&transfer.recipient_id, folder)
                    .request(skp)
                    .await?;

                log::info!("copied {} into {folder}", transfer.recipient_id);

                pb.inc(1);
            }

            pb.finish();

            println!("{}", "Done!".green());

            Ok(())
        })
        .await?;
    }

    Ok(())
}
