// src/site/structure.rs
// =============================================================================
// Turns a flat list of crawled pages into a Site with named sections.
//
// How it works:
// 1. The site name defaults to the host of the site URL
// 2. The root page ("/") supplies the real name and description
// 3. Pages one level deep ("/pricing") go into "Pages"
// 4. Deeper pages are grouped by their first path segment ("/docs/intro")
// 5. Sections are sorted by name, their pages by title
// 6. If there are more than MAX_SECTIONS sections, the smallest ones are
//    demoted into the "optional" list
//
// This is a pure function: same input, same output, no I/O.
// =============================================================================

use std::collections::BTreeMap;

use percent_encoding::percent_decode_str;
use url::Url;

use super::sections::section_name;
use super::{Page, Section, Site};

/// Sections beyond this count are demoted into `Site::optional`
pub const MAX_SECTIONS: usize = 5;

// Name of the bucket for single-segment paths like "/about"
const TOP_LEVEL_SECTION: &str = "Pages";

// Groups pages into a Site
//
// Parameters:
//   site_url: the root URL the crawl started from (for the default name)
//   pages: pages in discovery order
//
// Returns: a Site whose sections are sorted by name and whose pages are
// sorted by title. Pages with unparseable URLs are dropped.
pub fn structure(site_url: &str, pages: &[Page]) -> Site {
    let mut site = Site {
        name: Url::parse(site_url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_default(),
        ..Site::default()
    };

    // BTreeMap keeps the buckets sorted by name (byte-wise, like String::cmp)
    let mut buckets: BTreeMap<String, Vec<Page>> = BTreeMap::new();

    for page in pages {
        let Ok(url) = Url::parse(&page.url) else {
            continue;
        };
        // Group on the decoded path: "/caf%C3%A9/menu" belongs to "Café"
        let decoded = percent_decode_str(url.path()).decode_utf8_lossy();
        let path = decoded.trim_matches('/');

        if path.is_empty() {
            // The homepage names the site; it is not listed in any section
            site.name = page.title.clone();
            site.description = page.description.clone();
            continue;
        }

        let name = match path.split_once('/') {
            None => TOP_LEVEL_SECTION.to_string(),
            Some((first, _)) => section_name(first),
        };
        buckets.entry(name).or_default().push(page.clone());
    }

    let mut sections: Vec<Section> = buckets
        .into_iter()
        .map(|(name, mut pages)| {
            // sort_by is stable, so equal titles keep discovery order
            pages.sort_by(|a, b| a.title.cmp(&b.title));
            Section { name, pages }
        })
        .collect();

    if sections.len() > MAX_SECTIONS {
        site.optional = demote_smallest(&mut sections);
    }

    site.sections = sections;
    site
}

// Removes the smallest sections until only MAX_SECTIONS remain
//
// Sections are ranked by page count with a stable sort, so between two
// sections of the same size the one earlier in name order is demoted first.
// Returns the demoted pages, section by section, in name order.
fn demote_smallest(sections: &mut Vec<Section>) -> Vec<Page> {
    let overflow = sections.len() - MAX_SECTIONS;

    let mut ranked: Vec<usize> = (0..sections.len()).collect();
    ranked.sort_by_key(|&i| sections[i].pages.len());

    let mut demoted = vec![false; sections.len()];
    for &index in &ranked[..overflow] {
        demoted[index] = true;
    }

    let mut optional = Vec::new();
    let mut kept = Vec::with_capacity(MAX_SECTIONS);
    for (section, is_demoted) in sections.drain(..).zip(demoted) {
        if is_demoted {
            optional.extend(section.pages);
        } else {
            kept.push(section);
        }
    }

    *sections = kept;
    optional
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(url: &str, title: &str) -> Page {
        Page {
            url: url.to_string(),
            title: title.to_string(),
            description: String::new(),
        }
    }

    fn titles(pages: &[Page]) -> Vec<&str> {
        pages.iter().map(|p| p.title.as_str()).collect()
    }

    #[test]
    fn test_homepage_names_the_site() {
        let pages = vec![
            Page {
                url: "https://example.com/".to_string(),
                title: "My Site".to_string(),
                description: "Welcome to my site".to_string(),
            },
            page("https://example.com/docs/api", "API Docs"),
        ];
        let site = structure("https://example.com", &pages);

        assert_eq!(site.name, "My Site");
        assert_eq!(site.description, "Welcome to my site");
        assert_eq!(site.sections.len(), 1);
        assert_eq!(titles(&site.sections[0].pages), vec!["API Docs"]);
    }

    #[test]
    fn test_without_homepage_name_is_host() {
        let pages = vec![page("https://example.com/docs/api", "API Docs")];
        let site = structure("https://example.com/start", &pages);
        assert_eq!(site.name, "example.com");
        assert_eq!(site.description, "");
    }

    #[test]
    fn test_groups_into_named_sections() {
        let pages = vec![
            page("https://example.com/", "Home"),
            page("https://example.com/docs/a", "Doc A"),
            page("https://example.com/docs/b", "Doc B"),
            page("https://example.com/blog/a", "Blog A"),
        ];
        let site = structure("https://example.com", &pages);

        assert_eq!(site.name, "Home");
        assert_eq!(site.sections.len(), 2);
        assert_eq!(site.sections[0].name, "Blog");
        assert_eq!(titles(&site.sections[0].pages), vec!["Blog A"]);
        assert_eq!(site.sections[1].name, "Documentation");
        assert_eq!(titles(&site.sections[1].pages), vec!["Doc A", "Doc B"]);
        assert!(site.optional.is_empty());
    }

    #[test]
    fn test_single_segment_pages_go_to_pages_section() {
        let pages = vec![
            page("https://example.com/pricing", "Pricing"),
            page("https://example.com/about/", "About"),
        ];
        let site = structure("https://example.com", &pages);

        assert_eq!(site.sections.len(), 1);
        assert_eq!(site.sections[0].name, "Pages");
        assert_eq!(titles(&site.sections[0].pages), vec!["About", "Pricing"]);
    }

    #[test]
    fn test_unknown_segment_case_is_folded() {
        let pages = vec![
            page("https://example.com/Widgets/a", "Widget A"),
            page("https://example.com/widgets/b", "Widget B"),
            page("https://example.com/SDKs/rust", "Rust SDK"),
        ];
        let site = structure("https://example.com", &pages);

        let names: Vec<&str> = site.sections.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Sdks", "Widgets"]);
        assert_eq!(titles(&site.sections[1].pages), vec!["Widget A", "Widget B"]);
    }

    #[test]
    fn test_percent_encoded_segments_are_decoded() {
        let pages = vec![
            page("https://example.com/caf%C3%A9/menu", "Menu"),
            page("https://example.com/%64ocs/a", "Doc A"),
            page("https://example.com/docs/b", "Doc B"),
        ];
        let site = structure("https://example.com", &pages);

        let names: Vec<&str> = site.sections.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Café", "Documentation"]);
        assert_eq!(titles(&site.sections[1].pages), vec!["Doc A", "Doc B"]);
    }

    #[test]
    fn test_titles_sorted_ordinally() {
        let pages = vec![
            page("https://example.com/docs/1", "beta"),
            page("https://example.com/docs/2", "Alpha"),
            page("https://example.com/docs/3", "Zulu"),
        ];
        let site = structure("https://example.com", &pages);
        // Uppercase sorts before lowercase in byte order
        assert_eq!(titles(&site.sections[0].pages), vec!["Alpha", "Zulu", "beta"]);
    }

    #[test]
    fn test_unparseable_urls_are_dropped() {
        let pages = vec![
            page("not a url", "Broken"),
            page("https://example.com/docs/a", "Doc A"),
        ];
        let site = structure("https://example.com", &pages);
        assert_eq!(site.sections.len(), 1);
        assert_eq!(titles(&site.sections[0].pages), vec!["Doc A"]);
    }

    #[test]
    fn test_overflow_moves_smallest_sections_to_optional() {
        // 9 pages over 6 buckets: Blog 2, Documentation 3, Guides 1,
        // Pages 1, Pricing 1, Reference 1
        let pages = vec![
            page("https://example.com/", "Home"),
            page("https://example.com/docs/a", "Doc A"),
            page("https://example.com/docs/b", "Doc B"),
            page("https://example.com/docs/c", "Doc C"),
            page("https://example.com/blog/a", "Blog A"),
            page("https://example.com/blog/b", "Blog B"),
            page("https://example.com/guides/a", "Guide A"),
            page("https://example.com/api/a", "API A"),
            page("https://example.com/plans/a", "Plan A"),
            page("https://example.com/about", "About"),
        ];
        let site = structure("https://example.com", &pages);

        let names: Vec<&str> = site.sections.iter().map(|s| s.name.as_str()).collect();
        // Guides is the first of the four one-page sections in name order
        assert_eq!(
            names,
            vec!["Blog", "Documentation", "Pages", "Pricing", "Reference"]
        );
        assert_eq!(titles(&site.optional), vec!["Guide A"]);
    }

    #[test]
    fn test_overflow_keeps_every_bucketed_page() {
        let segments = ["docs", "blog", "api", "guides", "pricing", "legal", "jobs", "x"];
        let mut pages = vec![page("https://example.com/", "Home")];
        for (i, segment) in segments.iter().enumerate() {
            for n in 0..=i % 3 {
                pages.push(page(
                    &format!("https://example.com/{segment}/{n}"),
                    &format!("{segment} {n}"),
                ));
            }
        }
        let bucketed = pages.len() - 1;

        let site = structure("https://example.com", &pages);

        assert_eq!(site.sections.len(), MAX_SECTIONS);
        let in_sections: usize = site.sections.iter().map(|s| s.pages.len()).sum();
        assert_eq!(in_sections + site.optional.len(), bucketed);
        // Survivors stay in name order
        let names: Vec<&str> = site.sections.iter().map(|s| s.name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_overflow_demoted_pages_keep_section_order() {
        let pages = vec![
            page("https://example.com/a-one/1", "A1"),
            page("https://example.com/b-two/1", "B1"),
            page("https://example.com/c-three/1", "C1"),
            page("https://example.com/c-three/2", "C2"),
            page("https://example.com/d-four/1", "D1"),
            page("https://example.com/d-four/2", "D2"),
            page("https://example.com/e-five/1", "E1"),
            page("https://example.com/e-five/2", "E2"),
            page("https://example.com/f-six/1", "F1"),
            page("https://example.com/f-six/2", "F2"),
            page("https://example.com/g-seven/1", "G1"),
            page("https://example.com/g-seven/2", "G2"),
        ];
        let site = structure("https://example.com", &pages);

        // Two one-page sections are demoted, in name order
        assert_eq!(titles(&site.optional), vec!["A1", "B1"]);
        assert_eq!(site.sections[0].name, "C-three");
    }

    #[test]
    fn test_five_sections_never_overflow() {
        let pages = vec![
            page("https://example.com/docs/a", "a"),
            page("https://example.com/blog/a", "a"),
            page("https://example.com/api/a", "a"),
            page("https://example.com/guides/a", "a"),
            page("https://example.com/about", "a"),
        ];
        let site = structure("https://example.com", &pages);
        assert_eq!(site.sections.len(), 5);
        assert!(site.optional.is_empty());
    }

    #[test]
    fn test_structure_is_deterministic() {
        let pages = vec![
            page("https://example.com/", "Home"),
            page("https://example.com/docs/b", "Same"),
            page("https://example.com/docs/a", "Same"),
            page("https://example.com/news/x", "News"),
        ];
        let first = structure("https://example.com", &pages);
        let second = structure("https://example.com", &pages);
        assert_eq!(first, second);
        // Equal titles keep discovery order
        assert_eq!(first.sections[1].pages[0].url, "https://example.com/docs/b");
    }
}
