//! Sitemap generation from the location dataset.

use thiserror::Error;
use url::Url;

use crate::config::LocationConfig;
use crate::routing::catalog::{SECTIONS, SERVICE_SLUG_LIST};
use crate::routing::HostKind;
use crate::sitemap::xml::{self, UrlEntry};

const CHANGEFREQ: &str = "weekly";

#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("invalid sitemap URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Which sitemap document was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SitemapFile {
    /// `/sitemap.xml`: index on the main site, urlset on subdomains.
    Primary,
    /// `/sitemap-pages.xml`: main site pages only.
    MainPages,
}

/// Renders sitemaps for the main site and every known subdomain.
#[derive(Debug, Clone)]
pub struct SitemapGenerator {
    root_domain: String,
    locations: Vec<LocationConfig>,
}

impl SitemapGenerator {
    pub fn new(root_domain: impl Into<String>, locations: &[LocationConfig]) -> Self {
        let locations = locations
            .iter()
            .map(|l| LocationConfig {
                id: l.id.to_ascii_lowercase(),
                name: l.name.clone(),
                state: l.state.to_ascii_lowercase(),
            })
            .collect();

        Self {
            root_domain: root_domain.into(),
            locations,
        }
    }

    /// Render the requested document for a host, or `None` when that host has
    /// no such sitemap.
    pub fn render(&self, host: &HostKind, file: SitemapFile) -> Result<Option<String>, SitemapError> {
        match (host, file) {
            (HostKind::Root, SitemapFile::Primary) => self.index().map(Some),
            (HostKind::Root, SitemapFile::MainPages) => self.main_pages().map(Some),
            (HostKind::State(code), SitemapFile::Primary) if self.has_state(code) => {
                self.subdomain_pages(code).map(Some)
            }
            (HostKind::City(id), SitemapFile::Primary) if self.has_location(id) => {
                self.subdomain_pages(id).map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Sitemap index of the main site pages plus every state and city sitemap.
    pub fn index(&self) -> Result<String, SitemapError> {
        let mut locs = vec![self.url(&format!("www.{}", self.root_domain), "/sitemap-pages.xml")?];
        for subdomain in self.states().into_iter().chain(self.locations.iter().map(|l| l.id.as_str())) {
            locs.push(self.subdomain_url(subdomain, "/sitemap.xml")?);
        }
        Ok(xml::render_index(&locs))
    }

    /// Pages served by the main site, including service detail pages.
    pub fn main_pages(&self) -> Result<String, SitemapError> {
        let host = format!("www.{}", self.root_domain);
        let mut entries = vec![self.entry(&host, "/", 1.0)?];
        for section in SECTIONS {
            entries.push(self.entry(&host, &format!("/{section}"), 0.8)?);
        }
        for slug in SERVICE_SLUG_LIST {
            entries.push(self.entry(&host, &format!("/services/{slug}"), 0.6)?);
        }
        Ok(xml::render_urlset(&entries))
    }

    /// Pages served by a state or city subdomain.
    pub fn subdomain_pages(&self, subdomain: &str) -> Result<String, SitemapError> {
        let host = format!("{subdomain}.{}", self.root_domain);
        let mut entries = vec![self.entry(&host, "/", 1.0)?];
        for section in SECTIONS {
            entries.push(self.entry(&host, &format!("/{section}"), 0.8)?);
        }
        for slug in SERVICE_SLUG_LIST {
            entries.push(self.entry(&host, &format!("/{slug}"), 0.6)?);
        }
        Ok(xml::render_urlset(&entries))
    }

    /// States with at least one location, in first-seen order.
    fn states(&self) -> Vec<&str> {
        let mut states: Vec<&str> = Vec::new();
        for location in &self.locations {
            if !states.contains(&location.state.as_str()) {
                states.push(&location.state);
            }
        }
        states
    }

    fn has_state(&self, code: &str) -> bool {
        self.locations.iter().any(|l| l.state == code)
    }

    fn has_location(&self, id: &str) -> bool {
        self.locations.iter().any(|l| l.id == id)
    }

    fn subdomain_url(&self, subdomain: &str, path: &str) -> Result<String, SitemapError> {
        self.url(&format!("{subdomain}.{}", self.root_domain), path)
    }

    fn url(&self, host: &str, path: &str) -> Result<String, SitemapError> {
        Ok(Url::parse(&format!("https://{host}/"))?.join(path)?.to_string())
    }

    fn entry(&self, host: &str, path: &str, priority: f32) -> Result<UrlEntry, SitemapError> {
        Ok(UrlEntry {
            loc: self.url(host, path)?,
            changefreq: CHANGEFREQ,
            priority,
        })
    }
}
