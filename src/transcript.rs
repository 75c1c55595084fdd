use std::time::Duration;

use anyhow::{Result, anyhow};
use log::debug;
use reqwest::Url;

/// Maximum gap, in seconds, between the end of a group's window and the next
/// segment's start for the two to be merged into one line.
const MERGE_INTERVAL: f64 = 3.0;
const GROUP_WINDOW: f64 = 5.0;

#[derive(Clone, Debug, PartialEq)]
pub struct TranscriptSegment {
    pub start: f64,
    pub text: String,
}

/// Extract the video id from a YouTube URL. Accepts `youtu.be/<id>` short
/// links and `youtube.com/watch?v=<id>`, with or without `www.`.
pub fn video_id(url: &str) -> Result<String> {
    let parsed = Url::parse(url).map_err(|_| anyhow!("Invalid YouTube URL"))?;

    match parsed.host_str() {
        Some("youtu.be") | Some("www.youtu.be") => {
            let id = parsed.path().trim_start_matches('/');
            if id.is_empty() {
                return Err(anyhow!("Invalid YouTube URL"));
            }
            Ok(id.to_string())
        }
        Some("youtube.com") | Some("www.youtube.com") if parsed.path() == "/watch" => parsed
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| anyhow!("Invalid YouTube URL")),
        _ => Err(anyhow!("Invalid YouTube URL")),
    }
}

/// Merge nearby segments into longer phrases so the formatted transcript
/// reads as sentences rather than caption fragments.
pub fn group_segments(segments: Vec<TranscriptSegment>, merge_interval: f64) -> Vec<TranscriptSegment> {
    let mut grouped = Vec::new();
    let mut current: Option<TranscriptSegment> = None;

    for segment in segments {
        match current.take() {
            None => current = Some(segment),
            Some(mut group) => {
                if segment.start - (group.start + GROUP_WINDOW) <= merge_interval {
                    group.text.push(' ');
                    group.text.push_str(&segment.text);
                    current = Some(group);
                } else {
                    grouped.push(group);
                    current = Some(segment);
                }
            }
        }
    }

    if let Some(group) = current {
        grouped.push(group);
    }

    grouped
}

/// Render grouped segments as `MM:SS <text>` lines, capitalizing each line.
pub fn format_transcript(groups: &[TranscriptSegment]) -> String {
    groups
        .iter()
        .map(|group| {
            let timestamp = group.start as u64;
            format!(
                "{:02}:{:02} {}",
                timestamp / 60,
                timestamp % 60,
                capitalize(group.text.trim())
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn simulated_segments(video_url: &str) -> Vec<TranscriptSegment> {
    let segment = |start: f64, text: String| TranscriptSegment { start, text };
    vec![
        segment(
            0.0,
            format!("welcome back everyone, in this session we are walking through the video at {video_url}"),
        ),
        segment(
            4.2,
            "before diving in, here is a quick overview of what the video covers".to_string(),
        ),
        segment(
            9.8,
            "the first part goes through the main topic step by step".to_string(),
        ),
        segment(
            16.4,
            "after that there is a short demo tying the key points together".to_string(),
        ),
        segment(
            24.0,
            "thanks for watching, links and resources are in the description".to_string(),
        ),
    ]
}

/// Simulated transcription. Waits the configured processing delay, then
/// returns a fixed timestamped transcript templated with the input URL.
/// A real transcript provider will replace the segment source.
pub async fn transcribe(video_url: &str, delay: Duration) -> Result<String> {
    debug!("Simulating transcript for {video_url} (delay: {delay:?})");

    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let groups = group_segments(simulated_segments(video_url), MERGE_INTERVAL);
    Ok(format_transcript(&groups))
}
