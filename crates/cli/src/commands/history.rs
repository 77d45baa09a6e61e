use anyhow::{Result, bail};
use chrono::Utc;
use tubeshelf_core::{ItemMetadata, relative_time};

use crate::{build_client, open_history};

/// Looks the video up so the entry carries its title, channel and thumbnail.
pub(crate) async fn run_watch(id: &str) -> Result<()> {
    let id = id.trim();
    if id.is_empty() {
        bail!("video id must not be empty");
    }
    let client = build_client()?;
    let Some(video) = client.video(id).await? else {
        bail!("Video not found: {id}");
    };

    let mut metadata = ItemMetadata::new(video.title, video.channel_title);
    if let Some(url) = video.thumbnail_url {
        metadata = metadata.with_thumbnail(url);
    }

    let mut history = open_history()?;
    history.record(id, metadata)?;
    tracing::info!(video_id = %id, entries = history.len(), "recorded watch");
    Ok(())
}

pub(crate) fn run_list(limit: usize) -> Result<()> {
    let history = open_history()?;
    if history.is_empty() {
        println!("No watch history");
        return Ok(());
    }
    let now = Utc::now();
    for entry in history.list().iter().take(limit) {
        println!("{}  {}", entry.item_id, entry.title);
        println!("    {} · {}", entry.owner_label, relative_time(entry.watched_at, now));
    }
    Ok(())
}

pub(crate) fn run_clear() -> Result<()> {
    let mut history = open_history()?;
    let removed = history.len();
    history.clear()?;
    println!("Cleared {removed} entries");
    Ok(())
}
