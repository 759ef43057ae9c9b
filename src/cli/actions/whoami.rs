use crate::{cli::actions::Action, skalio_id::SkalioId};
use anyhow::Result;
use colored::Colorize;

/// # Errors
/// Will return an error if the action fails
pub async fn handle(id: &SkalioId, action: Action) -> Result<()> {
    if let Action::WhoAmI = action {
        let emails = id.fetch_emails().await?;

        for email in emails {
            let mut flags = Vec::new();

            if email.primary {
                flags.push("primary");
            }

            if !email.verified {
                flags.push("unverified");
            }

            if flags.is_empty() {
                println!("{}", email.address);
            } else {
                println!("{} {}", email.address, format!("({})", flags.join(", ")).dimmed());
            }
        }
    }

    Ok(())
}
