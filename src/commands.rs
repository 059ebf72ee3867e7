//! Headless subcommands sharing the desktop client's backend.

use crate::api::{resolve_link, Backend, ProgressEvent, ProgressSink};
use crate::search::submitted_query;
use crate::upload::SelectedFile;
use crate::utils::file_size::FileSizeUtils;
use anyhow::{bail, Context, Result};
use reqwest::Url;
use std::path::Path;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use tracing::info;

pub async fn health(backend: &dyn Backend) -> Result<()> {
    let health = backend.health().await?;
    match health.detail.as_deref() {
        Some(detail) => println!("{}: {}", health.status, detail),
        None => println!("{}", health.status),
    }
    if !health.is_ok() {
        bail!("backend reports status {:?}", health.status);
    }
    Ok(())
}

pub async fn status(backend: &dyn Backend) -> Result<()> {
    let status = backend.worker_status().await?;
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}

pub async fn search(backend: &dyn Backend, raw: &str) -> Result<()> {
    let Some(query) = submitted_query(raw) else {
        bail!("search query is empty");
    };
    let response = backend.search(query.to_string()).await?;
    let results = response.results.unwrap_or_default();
    info!("{} results for {:?}", results.len(), query);
    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

/// Logs every 10% step, so large uploads do not flood the log.
fn progress_logger() -> ProgressSink {
    let last_logged = Arc::new(AtomicU8::new(0));
    Arc::new(move |event: ProgressEvent| {
        if let Some(percent) = event.percent() {
            let step = percent / 10 * 10;
            if step > last_logged.load(Ordering::Relaxed) {
                last_logged.store(step, Ordering::Relaxed);
                info!("Uploaded {}%", step);
            }
        }
    })
}

pub async fn upload(backend: &dyn Backend, base_url: &Url, path: &Path) -> Result<()> {
    let file = SelectedFile::from_path(path)
        .with_context(|| format!("{} is not a file path", path.display()))?;
    if file.size.is_none() {
        bail!("{} is not a readable file", path.display());
    }
    if !file.has_accepted_extension() {
        tracing::warn!(
            "{} does not have a typical leak file extension, uploading anyway",
            file.name
        );
    }

    info!("Uploading {}", FileSizeUtils::describe(&file.name, file.size));
    let response = backend.upload(file, progress_logger()).await?;
    let outcome = response.outcome();

    println!("{} rows added.", outcome.inserted_rows);
    if let Some(href) = &outcome.json_file_url {
        println!("Parsed JSON: {}", resolve_link(base_url, href));
    }
    Ok(())
}
