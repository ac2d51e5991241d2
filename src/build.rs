//! Build orchestration.
//!
//! One linear pass over the corpus:
//!
//! ```text
//! scan() ──► read ──► compile() ──► extract() ──► assemble() ──► publish()
//!   │                                    │              │
//!   ▼                                    ▼              ▼
//! Vec<PathBuf>                     Vec<PostRecord>  (listing, feed)
//! ```
//!
//! Nothing is recovered locally: any failing step aborts the run and the
//! error reaches `main` naming the offending input.

use crate::{
    compiler,
    config::SiteConfig,
    extract::{self, PostRecord},
    generator, log,
    scan::scan,
    utils::date::DateTimeUtc,
};
use anyhow::{Context, Result};
use std::fs;

/// Run the full build against the current wall clock.
pub fn run_build(config: &SiteConfig) -> Result<()> {
    build_at(config, DateTimeUtc::now())
}

/// Run the full build with an explicit `now`.
///
/// The timestamp is sampled once per run so the date fallback and the
/// publish cutoff agree, and so identical inputs plus a fixed `now`
/// reproduce identical artifacts.
pub fn build_at(config: &SiteConfig, now: DateTimeUtc) -> Result<()> {
    let pages_dir = config.pages_dir();
    let paths = scan(&pages_dir, &config.build.extension)?;
    log!("scan"; "found {} documents under {}", paths.len(), pages_dir.display());

    let mut records: Vec<PostRecord> = Vec::with_capacity(paths.len());
    for path in paths {
        let source = fs::read_to_string(&path)
            .with_context(|| format!("failed to read `{}`", path.display()))?;
        let document = compiler::compile(&source)
            .with_context(|| format!("failed to compile `{}`", path.display()))?;
        let record = extract::extract(&path, &document, config, now)?;
        log!("extract"; "{} ({})", record.url_path, record.date.to_rfc3339());
        records.push(record);
    }

    let (listing, feed) = generator::assemble(records, now, config)?;
    generator::publish(&listing, &feed, config)?;

    log!("build"; "done");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::listing;
    use std::path::Path;
    use tempfile::TempDir;

    const NOW: DateTimeUtc = DateTimeUtc::new(2024, 6, 15, 12, 0, 0);

    fn make_site(documents: &[(&str, &str)]) -> (TempDir, SiteConfig) {
        let dir = TempDir::new().unwrap();
        for (rel, source) in documents {
            let path = dir.path().join("pages").join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, source).unwrap();
        }

        let mut config = SiteConfig::default();
        config.base.title = "Test Blog".to_string();
        config.base.description = "A test blog".to_string();
        config.base.url = Some("https://example.com".to_string());
        config.set_root(dir.path());
        (dir, config)
    }

    #[test]
    fn test_build_end_to_end() {
        let (_dir, config) = make_site(&[
            (
                "posts/january.mdx",
                "+++\ntitle = \"January\"\ndescription = \"New year post\"\ndate = \"2020-01-01\"\n+++\nBody.\n",
            ),
            (
                "posts/june.mdx",
                "+++\ndate = \"2020-06-01\"\n+++\n# June\n\nSummer post.\n",
            ),
            (
                "posts/future.mdx",
                "+++\ntitle = \"Future\"\ndescription = \"Not yet\"\ndate = \"2099-01-01\"\n+++\nBody.\n",
            ),
        ]);

        build_at(&config, NOW).unwrap();

        let records = listing::parse(&fs::read_to_string(config.listing_path()).unwrap());
        let titles: Vec<_> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["June", "January"]);
        assert_eq!(records[0].url_path, "/posts/june");
        assert_eq!(records[0].description, "Summer post.");
        assert_eq!(records[1].file_path, "pages/posts/january.mdx");

        let feed = fs::read_to_string(config.feed_path()).unwrap();
        assert!(feed.contains("<title>June</title>"));
        assert!(feed.contains("<title>January</title>"));
        assert!(!feed.contains("Future"));
        assert!(feed.contains("https://example.com/posts/june"));
    }

    #[test]
    fn test_build_is_idempotent_for_fixed_now() {
        let (_dir, config) = make_site(&[(
            "posts/a.mdx",
            "+++\ntitle = \"A\"\ndescription = \"D\"\ndate = \"2020-01-01\"\n+++\n",
        )]);

        build_at(&config, NOW).unwrap();
        let first_listing = fs::read_to_string(config.listing_path()).unwrap();
        let first_feed = fs::read_to_string(config.feed_path()).unwrap();

        build_at(&config, NOW).unwrap();
        assert_eq!(fs::read_to_string(config.listing_path()).unwrap(), first_listing);
        assert_eq!(fs::read_to_string(config.feed_path()).unwrap(), first_feed);
    }

    #[test]
    fn test_build_ignores_other_extensions() {
        let (_dir, config) = make_site(&[
            (
                "posts/kept.mdx",
                "+++\ntitle = \"Kept\"\ndescription = \"D\"\ndate = \"2020-01-01\"\n+++\n",
            ),
            ("posts/notes.txt", "plain notes"),
            ("posts/skipped.md", "# Skipped\n\nWrong extension.\n"),
        ]);

        build_at(&config, NOW).unwrap();

        let records = listing::parse(&fs::read_to_string(config.listing_path()).unwrap());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Kept");
    }

    #[test]
    fn test_build_fails_on_missing_metadata() {
        let (_dir, config) = make_site(&[("posts/bare.mdx", "no heading, just text\n\nmore\n")]);

        let err = build_at(&config, NOW).unwrap_err();
        assert!(format!("{err:#}").contains("bare.mdx"));
        // Neither artifact is published on failure
        assert!(!config.listing_path().exists());
        assert!(!config.feed_path().exists());
    }

    #[test]
    fn test_build_fails_on_missing_pages_dir() {
        let dir = TempDir::new().unwrap();
        let mut config = SiteConfig::default();
        config.base.url = Some("https://example.com".to_string());
        config.set_root(dir.path());

        assert!(build_at(&config, NOW).is_err());
    }

    #[test]
    fn test_build_dates_undated_posts_with_now() {
        let (_dir, config) = make_site(&[("posts/undated.mdx", "# Undated\n\nStill published.\n")]);

        build_at(&config, NOW).unwrap();

        let records = listing::parse(&fs::read_to_string(config.listing_path()).unwrap());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date, NOW);
    }

    #[test]
    fn test_build_scan_order_breaks_date_ties() {
        // Same date: scan order (lexicographic by file name) must survive
        // the stable sort
        let doc = |title: &str| {
            format!(
                "+++\ntitle = \"{title}\"\ndescription = \"D\"\ndate = \"2020-06-01\"\n+++\n"
            )
        };
        let (_dir, config) = make_site(&[
            ("posts/beta.mdx", &doc("Beta")),
            ("posts/alpha.mdx", &doc("Alpha")),
            ("posts/gamma.mdx", &doc("Gamma")),
        ]);

        build_at(&config, NOW).unwrap();

        let records = listing::parse(&fs::read_to_string(config.listing_path()).unwrap());
        let titles: Vec<_> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Alpha", "Beta", "Gamma"]);
    }

    #[test]
    fn test_build_with_custom_extension() {
        let (_dir, mut config) = make_site(&[(
            "posts/a.md",
            "+++\ntitle = \"A\"\ndescription = \"D\"\ndate = \"2020-01-01\"\n+++\n",
        )]);
        config.build.extension = ".md".to_string();

        build_at(&config, NOW).unwrap();

        let records = listing::parse(&fs::read_to_string(config.listing_path()).unwrap());
        assert_eq!(records[0].url_path, "/posts/a");
        assert!(Path::new(&records[0].file_path).ends_with("a.md"));
    }
}
