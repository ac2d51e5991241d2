//! rss feed generation.
//!
//! Renders the published records as an RSS 2.0 channel. Channel-level
//! metadata (title, link, description, language) is fixed configuration;
//! only the items are derived from records.

use crate::{config::SiteConfig, extract::PostRecord};
use anyhow::{Result, anyhow};
use regex::Regex;
use rss::{ChannelBuilder, GuidBuilder, ItemBuilder, validation::Validate};
use std::sync::LazyLock;

/// Render the published records as an RSS 2.0 XML string.
pub fn render(records: &[PostRecord], config: &SiteConfig) -> Result<String> {
    let base_url = config
        .base
        .url
        .as_deref()
        .unwrap_or_default()
        .trim_end_matches('/');
    let author = channel_author(config);

    let items: Vec<_> = records
        .iter()
        .map(|record| record_to_rss_item(record, base_url, author.as_deref()))
        .collect();

    let channel = ChannelBuilder::default()
        .title(&config.base.title)
        .link(base_url)
        .description(&config.base.description)
        .language(config.base.language.clone())
        .generator("postdex".to_string())
        .items(items)
        .build();

    channel
        .validate()
        .map_err(|e| anyhow!("rss validation failed: {e}"))?;
    Ok(channel.to_string())
}

/// Convert a `PostRecord` to an rss item.
fn record_to_rss_item(record: &PostRecord, base_url: &str, author: Option<&str>) -> rss::Item {
    let link = format!("{base_url}{}", record.url_path);

    ItemBuilder::default()
        .title(record.title.clone())
        .link(Some(link.clone()))
        .guid(GuidBuilder::default().permalink(true).value(link).build())
        .description(record.description.clone())
        .pub_date(record.date.to_rfc2822())
        .author(author.map(str::to_owned))
        .build()
}

/// Normalize the site author to rss format: "email@example.com (Name)"
///
/// Priority:
/// 1. Site author if already in valid format
/// 2. Combine site email and author name
fn channel_author(config: &SiteConfig) -> Option<String> {
    static RE_VALID_AUTHOR: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}[ \t]*\([^)]+\)$").unwrap()
    });

    let author = &config.base.author;
    if RE_VALID_AUTHOR.is_match(author) {
        return Some(author.clone());
    }

    Some(format!("{} ({})", config.base.email, author))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::date::DateTimeUtc;

    fn make_config(author: &str, email: &str) -> SiteConfig {
        let mut config = SiteConfig::default();
        config.base.title = "Test Blog".to_string();
        config.base.description = "A test blog".to_string();
        config.base.author = author.to_string();
        config.base.email = email.to_string();
        config.base.url = Some("https://example.com".to_string());
        config
    }

    fn make_record(title: &str, date: &str) -> PostRecord {
        PostRecord {
            file_path: "pages/posts/test.mdx".to_string(),
            url_path: "/posts/test".to_string(),
            title: title.to_string(),
            date: DateTimeUtc::parse(date).unwrap(),
            description: "Test Summary".to_string(),
        }
    }

    #[test]
    fn test_channel_author_already_valid() {
        let config = make_config("site@example.com (Site Author)", "");
        assert_eq!(
            channel_author(&config),
            Some("site@example.com (Site Author)".to_string())
        );
    }

    #[test]
    fn test_channel_author_combined_from_parts() {
        let config = make_config("Site Author", "site@example.com");
        assert_eq!(
            channel_author(&config),
            Some("site@example.com (Site Author)".to_string())
        );
    }

    #[test]
    fn test_record_to_rss_item() {
        let record = make_record("Test Title", "2024-01-01T00:00:00Z");
        let item = record_to_rss_item(
            &record,
            "https://example.com",
            Some("author@example.com (Author)"),
        );

        assert_eq!(item.title(), Some("Test Title"));
        assert_eq!(item.link(), Some("https://example.com/posts/test"));
        assert_eq!(item.description(), Some("Test Summary"));
        assert_eq!(item.author(), Some("author@example.com (Author)"));
        assert!(item.guid().is_some());
        // RFC2822 format check
        assert!(item.pub_date().unwrap().contains("Jan 2024"));
    }

    #[test]
    fn test_render_channel_fields() {
        let config = make_config("Site Author", "site@example.com");
        let records = vec![
            make_record("Newer", "2020-06-01"),
            make_record("Older", "2020-01-01"),
        ];

        let xml = render(&records, &config).unwrap();

        assert!(xml.contains("<title>Test Blog</title>"));
        assert!(xml.contains("<link>https://example.com</link>"));
        assert!(xml.contains("<description>A test blog</description>"));
        assert!(xml.contains("<language>en</language>"));
        assert!(xml.contains("<title>Newer</title>"));
        assert!(xml.contains("<title>Older</title>"));
        // Items keep the order they were given
        assert!(xml.find("Newer").unwrap() < xml.find("Older").unwrap());
    }

    #[test]
    fn test_render_item_dates_are_rfc2822() {
        let config = make_config("Site Author", "site@example.com");
        let xml = render(&[make_record("Post", "2020-06-01")], &config).unwrap();
        assert!(xml.contains("<pubDate>Mon, 01 Jun 2020 00:00:00 GMT</pubDate>"));
    }

    #[test]
    fn test_render_empty_feed_is_valid() {
        let config = make_config("Site Author", "site@example.com");
        let xml = render(&[], &config).unwrap();
        assert!(xml.contains("<channel>"));
        assert!(!xml.contains("<item>"));
    }
}
