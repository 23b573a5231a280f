//! Raster source URL templates.
//!
//! A template is a URL or file path with placeholders substituted per tile:
//!
//! | Placeholder | Value |
//! |-------------|-------|
//! | `{z}` | zoom level |
//! | `{x}` | column |
//! | `{y}` | row, XYZ scheme (north to south) |
//! | `{-y}` | row, TMS scheme (south to north) |
//! | `{s}` | subdomain, `(x + y) mod n` over the configured list |
//! | `{r}` | resolution suffix, always empty |

use std::fmt;
use std::path::PathBuf;

use super::error::SourceError;
use crate::coord::TileCoord;

/// Where a single tile's bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    /// Fetched over HTTP(S)
    Http(String),
    /// Read from the local filesystem
    File(PathBuf),
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLocation::Http(url) => write!(f, "{}", url),
            SourceLocation::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A tile source template plus the subdomains `{s}` rotates through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTemplate {
    template: String,
    subdomains: Vec<String>,
}

impl SourceTemplate {
    /// Creates a template with no subdomains.
    pub fn new(template: impl Into<String>) -> Result<Self, SourceError> {
        Self::with_subdomains(template, Vec::new())
    }

    /// Creates a template whose `{s}` placeholder cycles over `subdomains`.
    pub fn with_subdomains(
        template: impl Into<String>,
        subdomains: Vec<String>,
    ) -> Result<Self, SourceError> {
        let template = template.into();
        if template.trim().is_empty() {
            return Err(SourceError::InvalidTemplate("template is empty".to_string()));
        }
        if template.contains("{s}") && subdomains.is_empty() {
            return Err(SourceError::InvalidTemplate(format!(
                "{} uses {{s}} but no subdomains are configured",
                template
            )));
        }
        Ok(Self {
            template,
            subdomains,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }

    pub fn subdomains(&self) -> &[String] {
        &self.subdomains
    }

    /// True for `http://` and `https://` templates.
    pub fn is_http(&self) -> bool {
        let lower = self.template.to_ascii_lowercase();
        lower.starts_with("http://") || lower.starts_with("https://")
    }

    /// Substitutes every placeholder for `tile`.
    pub fn url(&self, tile: TileCoord) -> String {
        let subdomain = if self.subdomains.is_empty() {
            ""
        } else {
            let index = (u64::from(tile.col) + u64::from(tile.row)) % self.subdomains.len() as u64;
            self.subdomains[index as usize].as_str()
        };

        let mut url = self.template.clone();
        if url.contains("{-y}") {
            url = url.replace("{-y}", &tile.tms_row().to_string());
        }

        url.replace("{z}", &tile.zoom.to_string())
            .replace("{x}", &tile.col.to_string())
            .replace("{y}", &tile.row.to_string())
            .replace("{s}", subdomain)
            .replace("{r}", "")
    }

    /// Resolves where `tile` is read from.
    pub fn locate(&self, tile: TileCoord) -> SourceLocation {
        let url = self.url(tile);
        if self.is_http() {
            SourceLocation::Http(url)
        } else if let Some(path) = url.strip_prefix("file://") {
            SourceLocation::File(PathBuf::from(path))
        } else {
            SourceLocation::File(PathBuf::from(url))
        }
    }
}

impl fmt::Display for SourceTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.template)
    }
}
