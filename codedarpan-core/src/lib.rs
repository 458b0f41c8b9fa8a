#![deny(missing_docs)]
//! CodeDarpan core library.
//!
//! This crate holds the analysis client, the UI state machine and the report
//! and certificate renderers shared by the CodeDarpan front-ends.

pub mod chart;
pub mod client;
pub mod controller;
pub mod domain;
pub mod error;
pub mod export;
pub mod raster;
pub mod view;

pub use chart::{CHART_PALETTE, CHART_SLICE_LIMIT, ChartSlice, top_languages};
pub use client::{Analyzer, AnalyzeFuture, DEFAULT_ANALYZER_URL, HttpAnalysisClient};
pub use controller::{AppController, Event, Phase, UiState, reduce};
pub use domain::{AnalysisReport, AnalysisRequest, LanguageBreakdown, RepoDetails, ScoreBand};
pub use error::{ANALYSIS_FAILED_MESSAGE, CodeDarpanError, Result};
pub use export::{
    Certificate, CertificateExporter, DirectorySink, DownloadSink, ExportedCertificate,
    ImageExporter, RasterOptions, certificate_file_name, display_source,
};
pub use raster::PlottersRasterizer;
pub use view::{
    html_escape, render_certificate_html, render_dashboard_html, render_document,
    render_report_html,
};
