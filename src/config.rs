//! Configuration for the upload form.
//!
//! The service endpoint, renderer location, render scale and JPEG quality
//! are all fields of [`ScanConfig`], set through [`ScanConfigBuilder`] and
//! validated once in [`ScanConfigBuilder::build`].

use crate::error::ScanError;
use crate::pipeline::render::PageRasterizer;
use crate::progress::ScanObserver;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// The public document-scanning endpoint the form posts to by default.
pub const DEFAULT_ENDPOINT_URL: &str =
    "https://spring-ai-backend-production.up.railway.app/api/webapp/v0/getDocScanned";

/// Configuration for a [`crate::scan::ScanForm`].
///
/// # Example
/// ```rust
/// use docscan::ScanConfig;
///
/// let config = ScanConfig::builder()
///     .endpoint_url("http://localhost:8080/api/webapp/v0/getDocScanned")
///     .request_timeout_secs(30)
///     .build()
///     .unwrap();
/// assert_eq!(config.jpeg_quality, 90);
/// ```
#[derive(Clone)]
pub struct ScanConfig {
    /// OCR endpoint receiving the multipart upload.
    pub endpoint_url: String,

    /// Location of the pdfium library: the library file itself or the
    /// directory containing it. `None` binds the system library.
    pub renderer_library_path: Option<PathBuf>,

    /// Viewport scale relative to the page's native size. Default: 1.5.
    pub render_scale: f32,

    /// JPEG quality, 1–100. Default: 90.
    pub jpeg_quality: u8,

    /// Whole-request timeout in seconds. Default: none.
    pub request_timeout_secs: Option<u64>,

    /// Pre-constructed rasteriser. Takes precedence over `renderer_library_path`.
    pub renderer: Option<Arc<dyn PageRasterizer>>,

    /// Receives state transitions.
    pub observer: Option<Arc<dyn ScanObserver>>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            endpoint_url: DEFAULT_ENDPOINT_URL.to_string(),
            renderer_library_path: None,
            render_scale: 1.5,
            jpeg_quality: 90,
            request_timeout_secs: None,
            renderer: None,
            observer: None,
        }
    }
}

impl fmt::Debug for ScanConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanConfig")
            .field("endpoint_url", &self.endpoint_url)
            .field("renderer_library_path", &self.renderer_library_path)
            .field("render_scale", &self.render_scale)
            .field("jpeg_quality", &self.jpeg_quality)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("renderer", &self.renderer.as_ref().map(|_| "<dyn PageRasterizer>"))
            .field("observer", &self.observer.as_ref().map(|_| "<dyn ScanObserver>"))
            .finish()
    }
}

impl ScanConfig {
    /// Create a new builder for `ScanConfig`.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ScanConfig`].
#[derive(Debug)]
pub struct ScanConfigBuilder {
    config: ScanConfig,
}

impl ScanConfigBuilder {
    pub fn endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.config.endpoint_url = url.into();
        self
    }

    pub fn renderer_library_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.renderer_library_path = Some(path.into());
        self
    }

    pub fn render_scale(mut self, scale: f32) -> Self {
        self.config.render_scale = scale;
        self
    }

    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.config.jpeg_quality = quality;
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = Some(secs);
        self
    }

    pub fn renderer(mut self, renderer: Arc<dyn PageRasterizer>) -> Self {
        self.config.renderer = Some(renderer);
        self
    }

    pub fn observer(mut self, observer: Arc<dyn ScanObserver>) -> Self {
        self.config.observer = Some(observer);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ScanConfig, ScanError> {
        let c = &self.config;

        let url = reqwest::Url::parse(&c.endpoint_url).map_err(|e| {
            ScanError::InvalidConfig(format!("endpoint URL '{}': {}", c.endpoint_url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ScanError::InvalidConfig(format!(
                "endpoint URL must be http or https, got '{}'",
                url.scheme()
            )));
        }
        if !c.render_scale.is_finite() || c.render_scale <= 0.0 {
            return Err(ScanError::InvalidConfig(format!(
                "render scale must be > 0, got {}",
                c.render_scale
            )));
        }
        if c.jpeg_quality == 0 || c.jpeg_quality > 100 {
            return Err(ScanError::InvalidConfig(format!(
                "JPEG quality must be 1–100, got {}",
                c.jpeg_quality
            )));
        }
        if c.request_timeout_secs == Some(0) {
            return Err(ScanError::InvalidConfig(
                "request timeout must be ≥ 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_public_service() {
        let c = ScanConfig::builder().build().unwrap();
        assert_eq!(c.endpoint_url, DEFAULT_ENDPOINT_URL);
        assert_eq!(c.render_scale, 1.5);
        assert_eq!(c.jpeg_quality, 90);
        assert!(c.request_timeout_secs.is_none());
        assert!(c.renderer_library_path.is_none());
    }

    #[test]
    fn rejects_bad_endpoint() {
        let err = ScanConfig::builder()
            .endpoint_url("not a url")
            .build()
            .unwrap_err();
        assert!(matches!(err, ScanError::InvalidConfig(_)));

        let err = ScanConfig::builder()
            .endpoint_url("ftp://example.com/scan")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("ftp"), "got: {err}");
    }

    #[test]
    fn rejects_bad_scale_and_quality() {
        assert!(ScanConfig::builder().render_scale(0.0).build().is_err());
        assert!(ScanConfig::builder().render_scale(f32::NAN).build().is_err());
        assert!(ScanConfig::builder().jpeg_quality(0).build().is_err());
        assert!(ScanConfig::builder().jpeg_quality(101).build().is_err());
        assert!(ScanConfig::builder().jpeg_quality(100).build().is_ok());
    }

    #[test]
    fn debug_hides_trait_objects() {
        let c = ScanConfig::builder()
            .observer(Arc::new(crate::progress::NoopObserver))
            .build()
            .unwrap();
        let dbg = format!("{c:?}");
        assert!(dbg.contains("<dyn ScanObserver>"));
    }
}
