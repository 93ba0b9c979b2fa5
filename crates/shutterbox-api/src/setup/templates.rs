//! Template loading

use anyhow::{Context, Result};
use std::path::Path;
use tera::Tera;

/// Every template the handlers render.
pub const REQUIRED_TEMPLATES: [&str; 4] = [
    "index.html",
    "submit.html",
    "upload_success.html",
    "approve.html",
];

pub fn load_templates(dir: impl AsRef<Path>) -> Result<Tera> {
    let dir = dir.as_ref();
    let pattern = dir.join("**").join("*.html");
    let pattern = pattern
        .to_str()
        .with_context(|| format!("Template path is not valid UTF-8: {}", dir.display()))?;

    let tera = Tera::new(pattern)
        .with_context(|| format!("Failed to load templates from {}", dir.display()))?;

    let loaded: Vec<&str> = tera.get_template_names().collect();
    for name in REQUIRED_TEMPLATES {
        if !loaded.contains(&name) {
            anyhow::bail!("Missing template {} in {}", name, dir.display());
        }
    }

    tracing::info!(count = loaded.len(), path = %dir.display(), "Templates loaded");
    Ok(tera)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_template_fails() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<p>{{ app_name }}</p>").unwrap();
        let err = load_templates(dir.path()).unwrap_err();
        assert!(err.to_string().contains("Missing template"));
    }

    #[test]
    fn test_bundled_templates_load() {
        let dir = concat!(env!("CARGO_MANIFEST_DIR"), "/../../templates");
        assert!(load_templates(dir).is_ok());
    }
}
