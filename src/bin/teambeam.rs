use anyhow::Result;
use colored::Colorize;
use std::process;
use teambeam::{
    cli::{
        actions::{
            Action, transfer_copy, transfer_download, transfer_list, transfer_upload, whoami,
        },
        start,
    },
    skalio_id::SkalioId,
    skp::Skp,
};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{}", format!("Error: {err:#}").red());
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let (config, action, globals) = start()?;

    let id_token = config.id_token(&globals.config_file)?;

    if let Action::WhoAmI = action {
        let id = SkalioId::new(&config.host, id_token)?;
        return whoami::handle(&id, action).await;
    }

    let skp = Skp::new(&config.host, id_token)?;

    log::debug!("SKP:\n{skp}");

    match action {
        Action::Upload { .. } => transfer_upload::handle(&skp, action, &globals).await,
        Action::ListTransfers { .. } => transfer_list::handle(&skp, action).await,
        Action::Download { .. } => transfer_download::handle(&skp, action, &globals).await,
        Action::Copy { .. } => transfer_copy::handle(&skp, action, &globals).await,
        Action::WhoAmI => Ok(()),
    }
}
