// src/crawl/robots.rs
// =============================================================================
// A deliberately small robots.txt reader.
//
// What we understand:
// - "User-agent: *" groups (other agents' rules are ignored)
// - "Disallow: /prefix" inside those groups (plain path prefixes)
// - "Sitemap: https://..." anywhere in the file (the last one wins)
//
// What we ignore: Allow, Crawl-delay, wildcards inside paths, and anything
// else. A missing or unreadable robots.txt means "everything is allowed".
// =============================================================================

use url::Url;

/// Rules taken from a site's robots.txt
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RobotsPolicy {
    /// Path prefixes that must not be fetched
    pub disallowed: Vec<String>,
    /// Sitemap declared in robots.txt, if any
    pub sitemap_url: Option<String>,
}

impl RobotsPolicy {
    // Parses the text of a robots.txt file
    //
    // Directive names are case-insensitive; values are trimmed.
    pub fn parse(body: &str) -> Self {
        let mut policy = RobotsPolicy::default();
        let mut in_wildcard_group = false;

        for line in body.lines() {
            let Some((key, value)) = line.trim().split_once(':') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            if key.eq_ignore_ascii_case("user-agent") {
                in_wildcard_group = value == "*";
            } else if key.eq_ignore_ascii_case("disallow") {
                if in_wildcard_group && !value.is_empty() {
                    policy.disallowed.push(value.to_string());
                }
            } else if key.eq_ignore_ascii_case("sitemap") && !value.is_empty() {
                policy.sitemap_url = Some(value.to_string());
            }
        }

        policy
    }

    // Checks whether a URL's path starts with any disallowed prefix
    //
    // URLs that do not parse are treated as disallowed, so they are never
    // fetched.
    pub fn is_disallowed(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return true;
        };
        let path = match parsed.path() {
            "" => "/",
            path => path,
        };
        self.disallowed
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }
}
