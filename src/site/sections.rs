// src/site/sections.rs
// =============================================================================
// Maps the first segment of a URL path to a human-friendly section name.
//
// Many sites use different words for the same thing ("docs" vs
// "documentation", "blog" vs "posts"), so several segments collapse into one
// section. Anything not in the table gets its own section named after the
// lower-cased segment, with the first character upper-cased.
// =============================================================================

// Looks up the section name for a lower-cased path segment
//
// Returns: Some("Documentation") for "docs", None for unknown segments
pub(crate) fn known_section(segment: &str) -> Option<&'static str> {
    let name = match segment {
        "docs" | "documentation" => "Documentation",
        "blog" | "posts" | "articles" | "news" => "Blog",
        "api" | "reference" | "ref" => "Reference",
        "guides" | "tutorials" | "learn" | "examples" => "Guides",
        "getting-started" | "quickstart" | "installation" | "install" => "Getting Started",
        "configuration" | "config" => "Configuration",
        "about" | "team" | "contact" | "company" => "About",
        "changelog" | "releases" | "updates" => "Changelog",
        "pricing" | "plans" => "Pricing",
        "help" | "support" | "faq" | "troubleshooting" => "Support",
        "products" | "product" => "Products",
        "download" | "downloads" => "Downloads",
        "community" | "forum" | "forums" => "Community",
        "use-cases" | "usecases" | "customers" | "case-studies" => "Case Studies",
        "legal" | "privacy" | "terms" => "Legal",
        "careers" | "jobs" => "Careers",
        _ => return None,
    };
    Some(name)
}

// Picks the section for the first path segment of a multi-segment URL
//
// Case never splits a section: "Widgets" and "widgets" both become
// "Widgets", and "SDKs" becomes "Sdks".
pub(crate) fn section_name(segment: &str) -> String {
    let lower = segment.to_lowercase();
    match known_section(&lower) {
        Some(name) => name.to_string(),
        None => capitalize_first(&lower),
    }
}

fn capitalize_first(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
