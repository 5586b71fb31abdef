//! Terminal progress for the page loop and the profile pass.
//!
//! Bars draw to stderr and stay hidden when it is not a terminal or when
//! progress is turned off.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use interfaces_github_stargazers::FetchProgress;

fn draw_target(enabled: bool) -> ProgressDrawTarget {
    if enabled {
        ProgressDrawTarget::stderr()
    } else {
        ProgressDrawTarget::hidden()
    }
}

/// Page bar for the stargazer listing. Its length is set from the first event.
pub fn pages_bar(enabled: bool) -> ProgressBar {
    let pb = ProgressBar::with_draw_target(None, draw_target(enabled));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40.cyan/blue}] {pos}/{len} pages ({elapsed})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░"),
    );
    pb.set_message("Fetching stargazers");
    pb
}

pub fn profiles_bar(total: u64, enabled: bool) -> ProgressBar {
    let pb = ProgressBar::with_draw_target(Some(total), draw_target(enabled));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40.cyan/blue}] {pos}/{len} users ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░"),
    );
    pb.set_message("Fetching user profiles");
    pb
}

/// Feeds page-loop events into `pb`.
pub fn apply(pb: &ProgressBar, event: FetchProgress) {
    match event {
        FetchProgress::Started {
            estimated_pages, ..
        } => {
            if let Some(pages) = estimated_pages {
                pb.set_length(pages);
            }
        }
        FetchProgress::PageFetched { page, .. } => {
            // The estimate is only a hint; grow the bar rather than overflow it.
            if pb.length().is_some_and(|len| u64::from(page) > len) {
                pb.set_length(u64::from(page));
            }
            pb.inc(1);
        }
        FetchProgress::Finished { total } => {
            pb.finish_with_message(format!("Fetched {total} stargazers"));
        }
    }
}
