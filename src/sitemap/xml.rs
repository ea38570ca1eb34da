//! Sitemap XML rendering.

use std::fmt::Write;

const XMLNS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// One `<url>` entry of a urlset.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlEntry {
    pub loc: String,
    pub changefreq: &'static str,
    pub priority: f32,
}

/// Escape the five XML special characters.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render a `<urlset>` document.
pub fn render_urlset(entries: &[UrlEntry]) -> String {
    let mut out = header("urlset");
    for entry in entries {
        let _ = write!(
            out,
            "  <url>\n    <loc>{}</loc>\n    <changefreq>{}</changefreq>\n    <priority>{:.1}</priority>\n  </url>\n",
            escape(&entry.loc),
            entry.changefreq,
            entry.priority
        );
    }
    out.push_str("</urlset>\n");
    out
}

/// Render a `<sitemapindex>` document.
pub fn render_index(locs: &[String]) -> String {
    let mut out = header("sitemapindex");
    for loc in locs {
        let _ = write!(out, "  <sitemap>\n    <loc>{}</loc>\n  </sitemap>\n", escape(loc));
    }
    out.push_str("</sitemapindex>\n");
    out
}

fn header(root: &str) -> String {
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<{root} xmlns=\"{XMLNS}\">\n")
}
