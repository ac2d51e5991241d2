//! Output artifact generation.
//!
//! Turns the collected post records into the two build artifacts and
//! publishes them:
//!
//! - **listing**: the generated data module the page renderer imports
//! - **rss**: the RSS 2.0 feed
//!
//! Both are rendered fully in memory first. `publish` then writes each to
//! a `.tmp` sibling and renames both into place only after both staged
//! writes succeed, so a failure never leaves one artifact updated and the
//! other stale.

pub mod listing;
pub mod rss;

use crate::{config::SiteConfig, extract::PostRecord, log, utils::date::DateTimeUtc};
use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Render both artifacts from the collected records.
///
/// Returns `(listing, feed)` as strings. Serialization failure anywhere
/// fails the whole assembly; there is no per-record skip.
pub fn assemble(
    records: Vec<PostRecord>,
    now: DateTimeUtc,
    config: &SiteConfig,
) -> Result<(String, String)> {
    let total = records.len();
    let published = select_published(records, now);
    log!("assemble"; "{} of {} posts published", published.len(), total);

    let listing = listing::render(&published)?;
    let feed = rss::render(&published, config)?;
    Ok((listing, feed))
}

/// Drop future-dated drafts and order the rest newest-first.
///
/// The cutoff is inclusive: a post dated exactly `now` is published. The
/// sort is stable, so records sharing a date keep their scan order.
fn select_published(mut records: Vec<PostRecord>, now: DateTimeUtc) -> Vec<PostRecord> {
    records.retain(|record| record.date <= now);
    records.sort_by(|a, b| b.date.cmp(&a.date));
    records
}

/// Write both artifacts with an all-or-nothing commit.
pub fn publish(listing: &str, feed: &str, config: &SiteConfig) -> Result<()> {
    let listing_path = config.listing_path();
    let feed_path = config.feed_path();

    let listing_tmp = staging_path(&listing_path);
    let feed_tmp = staging_path(&feed_path);
    stage(&listing_tmp, listing)?;
    stage(&feed_tmp, feed)?;

    rename(&listing_tmp, &listing_path)?;
    rename(&feed_tmp, &feed_path)?;

    log!("listing"; "{}", listing_path.display());
    log!("rss"; "{}", feed_path.display());
    Ok(())
}

/// Temporary sibling of `target`, on the same filesystem so the final
/// rename is atomic.
fn staging_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    target.with_file_name(name)
}

fn stage(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create `{}`", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("failed to write `{}`", path.display()))
}

fn rename(from: &Path, to: &Path) -> Result<()> {
    fs::rename(from, to).with_context(|| format!("failed to publish `{}`", to.display()))
}
