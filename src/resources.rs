// ABOUTME: Stylesheet and script handling for rendered slides
// ABOUTME: Embeds local files or links remote ones without fetching them

use crate::errors::{DeckError, Result};
use log::{info, warn};
use std::fs;
use std::path::Path;

/// The kind of tag a resource is emitted as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Css,
    Js,
}

/// Represents a resource file that can be either local or remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceFile {
    pub path: String,
    pub is_remote: bool,
}

impl ResourceFile {
    /// Create a new ResourceFile from a path string.
    /// The path can be either a local file path or a URL.
    pub fn new(path: &str) -> Self {
        let is_remote = path.starts_with("http://") || path.starts_with("https://");
        Self {
            path: path.to_string(),
            is_remote,
        }
    }

    /// Read content from a local file
    fn read_local_content(&self) -> Result<String> {
        info!("Reading local resource: {}", self.path);
        if !Path::new(&self.path).exists() {
            return Err(DeckError::PathNotFoundError(
                Path::new(&self.path).to_path_buf(),
            ));
        }

        fs::read_to_string(&self.path).map_err(DeckError::FileReadError)
    }

    /// Generate the HTML tag for the resource.
    /// Remote resources are always linked; local ones are embedded when `embed` is set.
    pub fn tag(&self, kind: ResourceKind, embed: bool) -> Result<String> {
        if self.is_remote || !embed {
            Ok(match kind {
                ResourceKind::Css => format!(r#"<link rel="stylesheet" href="{}">"#, self.path),
                ResourceKind::Js => format!(r#"<script src="{}"></script>"#, self.path),
            })
        } else {
            let content = self.read_local_content()?;
            Ok(match kind {
                ResourceKind::Css => format!(r#"<style>{}</style>"#, content),
                ResourceKind::Js => format!(r#"<script>{}</script>"#, content),
            })
        }
    }
}

/// Render tags for every resource, skipping the ones that fail.
pub fn tags(resources: &[ResourceFile], kind: ResourceKind, embed: bool) -> String {
    let mut out = String::new();
    for resource in resources {
        match resource.tag(kind, embed) {
            Ok(tag) => {
                out.push_str(&tag);
                out.push('\n');
            }
            Err(e) => {
                // Continue with other resources rather than failing completely
                warn!("Failed to include resource {}: {}", resource.path, e);
            }
        }
    }
    out
}
