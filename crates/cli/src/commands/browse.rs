use anyhow::Result;
use chrono::{DateTime, Utc};
use tubeshelf_api::VideoSummary;
use tubeshelf_core::{group_thousands, relative_time};

use crate::{build_client, get_region};

pub(crate) async fn run_trending(region: Option<String>) -> Result<()> {
    let client = build_client()?;
    let region = region.unwrap_or_else(get_region);
    let videos = client.trending(&region).await?;
    print_videos(&videos);
    Ok(())
}

pub(crate) async fn run_search(query: &str) -> Result<()> {
    let client = build_client()?;
    let mut videos = client.search(query).await?;
    client.attach_view_counts(&mut videos).await;
    print_videos(&videos);
    Ok(())
}

pub(crate) async fn run_stats(id: &str) -> Result<()> {
    let client = build_client()?;
    match client.statistics(id).await? {
        Some(stats) => {
            println!("views:    {}", format_count(stats.view_count));
            println!("likes:    {}", format_count(stats.like_count));
            println!("comments: {}", format_count(stats.comment_count));
        },
        None => println!("Video not found: {id}"),
    }
    Ok(())
}

pub(crate) async fn run_channel(id: &str) -> Result<()> {
    let client = build_client()?;
    match client.channel(id).await? {
        Some(channel) => println!("{}", serde_json::to_string_pretty(&channel)?),
        None => println!("Channel not found: {id}"),
    }
    Ok(())
}

fn print_videos(videos: &[VideoSummary]) {
    if videos.is_empty() {
        println!("No videos found");
        return;
    }
    let now = Utc::now();
    for video in videos {
        let mut details = vec![video.channel_title.clone()];
        if let Some(views) = video.view_count {
            details.push(format!("{} views", group_thousands(views)));
        }
        if let Some(published) = video.published_at.as_deref().and_then(parse_timestamp) {
            details.push(relative_time(published, now));
        }
        println!("{}  {}", video.id, video.title);
        println!("    {}", details.join(" · "));
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw).ok().map(|t| t.with_timezone(&Utc))
}

fn format_count(count: Option<u64>) -> String {
    count.map_or_else(|| "hidden".to_owned(), group_thousands)
}
