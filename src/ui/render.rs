//! Plain-text rendering of controller snapshots

use crate::error::FetchErrorKind;
use crate::types::{ContentState, ErrorInfo, Item, Phase};

/// Seconds as "m:ss" or "h:mm:ss"
pub fn format_duration(secs: u32) -> String {
    let (h, m, s) = (secs / 3600, secs / 60 % 60, secs % 60);
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{}:{:02}", m, s)
    }
}

/// One-line label for an item in a selector
pub fn format_item_label(item: &Item) -> String {
    let (w, h) = item.dimensions();
    let creator = item.creator().unwrap_or("unknown");
    match item {
        Item::Photo(p) => format!("#{}  {}x{}  {}", p.id, w, h, creator),
        Item::Video(v) => format!(
            "#{}  {}x{}  [{}]  {}",
            v.id,
            w,
            h,
            format_duration(v.duration),
            creator
        ),
    }
}

/// Status line: kind, mode, query, buffer size and lifecycle
pub fn format_status(state: &ContentState) -> String {
    let mut line = format!("{} · {}", state.kind, state.mode);
    if state.mode == crate::types::RetrievalMode::Search {
        line.push_str(&format!(" \"{}\"", state.query));
    }
    line.push_str(&format!(" · {} items", state.items.len()));
    if state.mode.is_paginated() {
        line.push_str(&format!(" · page {}", state.page));
        if !state.has_more {
            line.push_str(" · end");
        }
    }
    match state.phase() {
        Phase::Loading => line.push_str(" · loading…"),
        Phase::Error => line.push_str(" · error"),
        Phase::Idle => {}
    }
    line
}

/// User-facing explanation of a failed fetch
pub fn format_error(info: &ErrorInfo) -> String {
    let mut message = match info.kind {
        FetchErrorKind::RateLimit => {
            "The catalog's request quota is used up. Wait a while before retrying.".to_string()
        }
        FetchErrorKind::InvalidQuery => {
            format!("The catalog rejected the search: {}", info.message)
        }
        FetchErrorKind::Network => format!("Could not reach the catalog: {}", info.message),
    };
    // Rate limits already carry their own advice
    if info.kind.is_retry_safe() && !info.is_rate_limited() {
        message.push_str(" (refresh to retry)");
    }
    message
}

/// Multi-line description of an item
pub fn format_item_detail(item: &Item) -> String {
    let (w, h) = item.dimensions();
    let mut lines = vec![
        format!("{} #{}", item.kind(), item.id()),
        format!("Size:    {}x{}", w, h),
        format!("Creator: {}", item.creator().unwrap_or("unknown")),
    ];

    match item {
        Item::Photo(p) if !p.photographer_url.is_empty() => {
            lines.push(format!("Profile: {}", p.photographer_url));
        }
        Item::Video(v) => {
            lines.push(format!("Length:  {}", format_duration(v.duration)));
            let qualities: Vec<&str> = v
                .video_files
                .iter()
                .filter_map(|f| f.quality.as_deref())
                .collect();
            if !qualities.is_empty() {
                lines.push(format!("Files:   {}", qualities.join(", ")));
            }
        }
        _ => {}
    }

    lines.push(format!("Page:    {}", item.origin_url()));
    if let Some(url) = item.best_url() {
        lines.push(format!("Media:   {}", url));
    }
    lines.join("\n")
}
