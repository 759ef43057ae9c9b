use crate::{
    cli::{actions::Action, globals::GlobalArgs, progressbar::Bar},
    skp::{
        Expiration, RecipientType, ReservationRequest, ReservationRequestFile, Skp,
        TransferProtection, TransferReceiver, actions,
    },
    upload::{RetryPolicy, TransferUploader},
};
use anyhow::{Context, Result, anyhow};
use bytesize::ByteSize;
use colored::Colorize;
use secrecy::{ExposeSecret, SecretString};
use std::{fs, path::PathBuf, sync::Arc};

/// # Errors
/// Will return an error if the action fails
pub async fn handle(skp: &Skp, action: Action, globals: &GlobalArgs) -> Result<()> {
    if let Action::Upload {
        files,
        recipients,
        subject,
        message,
        ttl,
        password,
    } = action
    {
        let environment = actions::GetEnvironment::new()
            .request(skp)
            .await
            .context("could not fetch the server environment")?;

        let ttl = validate_ttl(ttl, &environment.expiration)?;

        let mut request = reservation_request(&files, &recipients, password)?;
        request.subject = subject;
        request.description = message;
        request.ttl = Some(ttl);

        let total: u64 = request.files.iter().map(|f| f.size).sum();

        log::info!(
            "uploading {} file(s), {}, ttl: {ttl} days",
            request.files.len(),
            ByteSize(total)
        );

        let bar = Arc::new(Bar::new_percent(globals.quiet));

        let uploader =
            TransferUploader::new(skp).with_retry_policy(RetryPolicy::new(globals.retries));

        let result = uploader
            .upload_transfer(&files, &request, Arc::clone(&bar) as _)
            .await;

        bar.finish();

        let result = result?;

        let recipient_id = result
            .result
            .first()
            .map(|r| r.recipient_id.as_str())
            .context("server confirmed the transfer without a recipient")?;

        println!(
            "{} {}",
            "Successfully uploaded transfer:".green().bold(),
            transfer_url(skp.host().as_str(), recipient_id).italic()
        );
    }

    Ok(())
}

/// The requested TTL must be one the server allows, without one the server
/// default is used.
///
/// # Errors
/// Will return an error if the TTL is not allowed
pub fn validate_ttl(ttl: Option<u32>, expiration: &Expiration) -> Result<u32> {
    match ttl {
        None => Ok(expiration.default),
        Some(ttl) if expiration.values.contains(&ttl) => Ok(ttl),
        Some(ttl) => Err(anyhow!(
            "TTL {ttl} is not allowed, must be one of: {}",
            expiration
                .values
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        )),
    }
}

/// Files get the ids `"0"`, `"1"`, … in argument order.
///
/// # Errors
/// Will return an error if a file is not a regular file or there are no recipients
pub fn reservation_request(
    files: &[PathBuf],
    recipients: &[(RecipientType, String)],
    password: Option<SecretString>,
) -> Result<ReservationRequest> {
    if recipients.is_empty() {
        return Err(anyhow!("at least one recipient is required"));
    }

    let files = files
        .iter()
        .enumerate()
        .map(|(i, path)| {
            let metadata = fs::metadata(path)
                .with_context(|| format!("could not read {}", path.display()))?;

            if !metadata.is_file() {
                return Err(anyhow!(
                    "directories are not supported: {}",
                    path.display()
                ));
            }

            let name = path
                .file_name()
                .with_context(|| format!("no file name: {}", path.display()))?
                .to_string_lossy()
                .to_string();

            Ok(ReservationRequestFile {
                name,
                size: metadata.len(),
                id: i.to_string(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let receivers = recipients
        .iter()
        .map(|(kind, email)| TransferReceiver::new(email, *kind))
        .collect();

    let protection = password.map(|key| TransferProtection {
        enabled: true,
        key: key.expose_secret().to_string(),
    });

    Ok(ReservationRequest {
        receivers,
        protection,
        files,
        ..ReservationRequest::default()
    })
}

#[must_use]
pub fn transfer_url(host: &str, recipient_id: &str) -> String {
    format!("{}/transfer/get/{recipient_id}", host.trim_end_matches('/'))
}
