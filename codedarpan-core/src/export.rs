//! Certificate export to PNG.

use std::path::{Component, Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::NaiveDate;

use crate::domain::{AnalysisReport, ScoreBand};
use crate::error::{CodeDarpanError, Result};

/// Background colour painted behind the exported certificate.
pub const CERTIFICATE_BACKGROUND: &str = "#18181b";
/// Supersampling factor applied when rasterizing the certificate.
pub const CERTIFICATE_SCALE: u32 = 3;

const GITHUB_PREFIX: &str = "https://github.com/";

/// Everything drawn on the certificate card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    /// Aggregate score, 0-100.
    pub score: u32,
    /// Persona label.
    pub persona: String,
    /// Stargazer count.
    pub stars: u64,
    /// Fork count.
    pub forks: u64,
    /// Dominant language.
    pub primary_language: String,
    /// Repository URL with the GitHub prefix removed.
    pub source: String,
    /// Date printed in the card header.
    pub issued_on: NaiveDate,
}

impl Certificate {
    /// Build the certificate for a report fetched from `url`.
    pub fn from_report(report: &AnalysisReport, url: &str, issued_on: NaiveDate) -> Self {
        Self {
            score: report.score,
            persona: report.persona.clone(),
            stars: report.details.stars,
            forks: report.details.forks,
            primary_language: report.details.primary_language.clone(),
            source: display_source(url),
            issued_on,
        }
    }

    /// Colour band of the score ring.
    pub fn band(&self) -> ScoreBand {
        ScoreBand::from_score(self.score)
    }

    /// File name offered for the downloaded image.
    pub fn file_name(&self) -> String {
        certificate_file_name(&self.persona)
    }
}

/// Strip the GitHub prefix from a repository URL for display.
pub fn display_source(url: &str) -> String {
    url.replacen(GITHUB_PREFIX, "", 1)
}

/// Download file name for a persona, with all whitespace removed.
///
/// Path separators become `_` so the name is always a single component.
pub fn certificate_file_name(persona: &str) -> String {
    let compact: String = persona
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("CodeDarpan-{compact}.png")
}

/// Rasterization settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterOptions {
    /// Background colour as `#rrggbb`.
    pub background: String,
    /// Supersampling factor.
    pub scale: u32,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            background: CERTIFICATE_BACKGROUND.to_string(),
            scale: CERTIFICATE_SCALE,
        }
    }
}

/// Turns a certificate into PNG bytes.
#[cfg_attr(test, mockall::automock)]
pub trait ImageExporter {
    /// Rasterize `certificate` and return the encoded PNG.
    fn rasterize(&self, certificate: &Certificate, options: &RasterOptions) -> Result<Vec<u8>>;
}

/// Destination for exported images.
#[cfg_attr(test, mockall::automock)]
pub trait DownloadSink {
    /// Save `png` under `file_name`.
    fn save(&self, file_name: &str, png: &[u8]) -> Result<()>;
}

/// A rendered certificate ready to be offered for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedCertificate {
    /// Suggested file name.
    pub file_name: String,
    /// Encoded PNG bytes.
    pub png: Vec<u8>,
}

impl ExportedCertificate {
    /// PNG encoded as a `data:` URI.
    pub fn data_uri(&self) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(&self.png))
    }
}

/// Exports certificates through an injected rasterizer.
pub struct CertificateExporter {
    rasterizer: Box<dyn ImageExporter + Send + Sync>,
    options: RasterOptions,
}

impl CertificateExporter {
    /// Create an exporter with the default background and scale.
    pub fn new(rasterizer: Box<dyn ImageExporter + Send + Sync>) -> Self {
        Self {
            rasterizer,
            options: RasterOptions::default(),
        }
    }

    /// Rasterization settings in use.
    pub fn options(&self) -> &RasterOptions {
        &self.options
    }

    /// Render the certificate, or nothing when no certificate is shown.
    pub fn render(&self, certificate: Option<&Certificate>) -> Result<Option<ExportedCertificate>> {
        let Some(certificate) = certificate else {
            log::debug!("no certificate rendered, skipping export");
            return Ok(None);
        };
        let png = self.rasterizer.rasterize(certificate, &self.options)?;
        Ok(Some(ExportedCertificate {
            file_name: certificate.file_name(),
            png,
        }))
    }

    /// Render the certificate and hand it to `sink`.
    ///
    /// Returns the saved file name, or `None` when no certificate is shown.
    pub fn export(
        &self,
        certificate: Option<&Certificate>,
        sink: &dyn DownloadSink,
    ) -> Result<Option<String>> {
        let Some(exported) = self.render(certificate)? else {
            return Ok(None);
        };
        sink.save(&exported.file_name, &exported.png)?;
        log::info!(
            "exported certificate {} ({} bytes)",
            exported.file_name,
            exported.png.len()
        );
        Ok(Some(exported.file_name))
    }
}

/// Saves exported images into a directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Create a sink writing into `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for DirectorySink {
    fn save(&self, file_name: &str, png: &[u8]) -> Result<()> {
        let mut components = Path::new(file_name).components();
        if !matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        ) {
            return Err(CodeDarpanError::Export(format!(
                "file name {file_name:?} must not leave {}",
                self.dir.display()
            )));
        }
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.dir.join(file_name), png)?;
        Ok(())
    }
}
