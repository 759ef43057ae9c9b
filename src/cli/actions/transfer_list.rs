use crate::{
    cli::actions::Action,
    skp::{Skp, Transfer, actions},
};
use anyhow::Result;
use bytesize::ByteSize;
use colored::Colorize;

/// # Errors
/// Will return an error if the action fails
pub async fn handle(skp: &Skp, action: Action) -> Result<()> {
    if let Action::ListTransfers {
        location,
        search,
        unread,
    } = action
    {
        let transfers = actions::ListTransfers::new(Some(location), search)
            .request(skp)
            .await?;

        for transfer in transfers.iter().filter(|t| !unread || t.is_unread) {
            print_transfer_info(transfer);
        }
    }

    Ok(())
}

fn print_transfer_info(transfer: &Transfer) {
    let marker = if transfer.is_unread { "*" } else { " " };

    println!(
        "{} {} {:>10} {:>3} {}",
        marker.green(),
        transfer.recipient_id.yellow(),
        ByteSize(transfer.total_size()).to_string(),
        transfer.files.len(),
        transfer.subject.as_deref().unwrap_or_default()
    );
}
