use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

/// Errors that can occur while resolving an image reference from the catalog.
#[derive(Error, Debug)]
pub enum ImageRefError {
    #[error("Image has no source")]
    Empty,
    #[error("Invalid image URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// Only http and https images are handed to the system opener.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// Relative reference and no `image_base` configured.
    #[error("Relative image path {0} needs image_base in config.toml")]
    NoBase(String),
    #[error("Image file not found: {}", .0.display())]
    Missing(PathBuf),
}

/// Where an image reference points once resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageTarget {
    Url(Url),
    File(PathBuf),
}

impl ImageTarget {
    /// Hand the target to the platform opener (browser or image viewer).
    pub fn open(&self) -> std::io::Result<()> {
        match self {
            ImageTarget::Url(url) => open::that(url.as_str()),
            ImageTarget::File(path) => open::that(path),
        }
    }
}

impl fmt::Display for ImageTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageTarget::Url(url) => write!(f, "{url}"),
            ImageTarget::File(path) => write!(f, "{}", path.display()),
        }
    }
}

fn check_scheme(url: Url) -> Result<Url, ImageRefError> {
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ImageRefError::UnsupportedScheme(scheme.to_owned())),
    }
}

/// Resolve an image `src` from the catalog into something openable.
///
/// Absolute references must be http(s). Relative references (`/images/x.png`,
/// `diagrams/y.svg`) are joined onto `base`, which may itself be an http(s)
/// URL or a local directory. Local files must exist.
pub fn resolve_image(src: &str, base: Option<&str>) -> Result<ImageTarget, ImageRefError> {
    let src = src.trim();
    if src.is_empty() {
        return Err(ImageRefError::Empty);
    }

    match Url::parse(src) {
        Ok(url) => return check_scheme(url).map(ImageTarget::Url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {}
        Err(e) => return Err(e.into()),
    }

    let base = base
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .ok_or_else(|| ImageRefError::NoBase(src.to_owned()))?;
    let relative = src.trim_start_matches('/');

    match Url::parse(base) {
        Ok(base_url) => {
            let mut base_url = check_scheme(base_url)?;
            if !base_url.path().ends_with('/') {
                let path = format!("{}/", base_url.path());
                base_url.set_path(&path);
            }
            Ok(ImageTarget::Url(base_url.join(relative)?))
        }
        Err(_) => {
            let path = PathBuf::from(base).join(relative);
            if path.is_file() {
                Ok(ImageTarget::File(path))
            } else {
                Err(ImageRefError::Missing(path))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_https_passes_through() {
        let target = resolve_image("https://example.org/pcb.png", None).unwrap();
        assert_eq!(target.to_string(), "https://example.org/pcb.png");
    }

    #[test]
    fn test_non_http_scheme_rejected() {
        let err = resolve_image("file:///etc/passwd", None).unwrap_err();
        assert!(matches!(err, ImageRefError::UnsupportedScheme(s) if s == "file"));
    }

    #[test]
    fn test_empty_src_rejected() {
        assert!(matches!(
            resolve_image("   ", Some("https://example.org")),
            Err(ImageRefError::Empty)
        ));
    }

    #[test]
    fn test_relative_without_base() {
        let err = resolve_image("/images/os_concept.png", None).unwrap_err();
        assert!(matches!(err, ImageRefError::NoBase(_)));
        assert!(err.to_string().contains("image_base"));
    }

    #[test]
    fn test_relative_joined_onto_url_base() {
        let target =
            resolve_image("/images/os_concept.png", Some("https://example.org/notes")).unwrap();
        assert_eq!(
            target,
            ImageTarget::Url(Url::parse("https://example.org/notes/images/os_concept.png").unwrap())
        );
    }

    #[test]
    fn test_url_base_with_bad_scheme_rejected() {
        assert!(matches!(
            resolve_image("a.png", Some("ftp://example.org/")),
            Err(ImageRefError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn test_relative_joined_onto_directory_base() {
        let dir = std::env::temp_dir().join("osnote_image_ref_test");
        std::fs::create_dir_all(dir.join("images")).unwrap();
        std::fs::write(dir.join("images/os_concept.png"), b"png").unwrap();

        let base = dir.to_string_lossy().into_owned();
        let target = resolve_image("/images/os_concept.png", Some(&base)).unwrap();
        assert_eq!(target, ImageTarget::File(dir.join("images/os_concept.png")));

        let missing = resolve_image("/images/nope.png", Some(&base)).unwrap_err();
        assert!(matches!(missing, ImageRefError::Missing(_)));

        std::fs::remove_dir_all(&dir).ok();
    }
}
