//! HTTP handlers for the CodeDarpan web front-end.

use actix_web::http::header::{self, ContentDisposition, ContentType};
use actix_web::{HttpResponse, Responder, get, post, web};
use codedarpan_core::{
    AnalysisReport, Analyzer, AppController, CertificateExporter, CodeDarpanError, UiState,
};
use serde::Deserialize;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::pages::render_index;

/// Shared application state for handlers.
pub struct AppState {
    /// Front-end state, never locked across an await.
    pub controller: Mutex<AppController>,
    /// Analysis service client.
    pub analyzer: Box<dyn Analyzer + Send + Sync>,
    /// Certificate exporter; absent when no font could be loaded.
    pub exporter: Option<CertificateExporter>,
}

impl AppState {
    /// Build state around an analyzer and optional exporter.
    pub fn new(
        analyzer: Box<dyn Analyzer + Send + Sync>,
        exporter: Option<CertificateExporter>,
    ) -> Self {
        Self {
            controller: Mutex::new(AppController::new()),
            analyzer,
            exporter,
        }
    }

    fn controller(&self) -> MutexGuard<'_, AppController> {
        self.controller
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn snapshot(&self) -> UiState {
        self.controller().state().clone()
    }
}

/// Submission in flight; fails the controller if dropped before completion.
struct PendingAnalysis<'a> {
    state: &'a AppState,
    done: bool,
}

impl PendingAnalysis<'_> {
    fn complete(mut self, result: codedarpan_core::Result<AnalysisReport>) {
        self.done = true;
        self.state.controller().finish(result);
    }
}

impl Drop for PendingAnalysis<'_> {
    fn drop(&mut self) {
        if !self.done {
            log::warn!("analysis request cancelled before completion");
            self.state
                .controller()
                .finish(Err(CodeDarpanError::Analysis));
        }
    }
}

/// Form payload posted by the URL input.
#[derive(Debug, Deserialize)]
pub struct AnalyzeForm {
    /// Repository URL as typed.
    #[serde(default)]
    pub url: String,
}

/// Local date printed on certificates.
fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

/// Render the page for the current state.
#[get("/")]
pub async fn index(state: web::Data<AppState>) -> impl Responder {
    let snapshot = state.snapshot();
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(render_index(&snapshot, today(), state.exporter.is_some()))
}

/// Run one analysis submission, then redirect back to the page.
#[post("/analyze")]
pub async fn analyze(state: web::Data<AppState>, form: web::Form<AnalyzeForm>) -> impl Responder {
    let url = state.controller().begin(&form.url);
    if let Some(url) = url {
        let pending = PendingAnalysis {
            state: &state,
            done: false,
        };
        let result = state.analyzer.analyze(&url).await;
        pending.complete(result);
    }
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/"))
        .finish()
}

/// Serve the certificate as a PNG attachment, or 204 when none is shown.
#[get("/certificate.png")]
pub async fn certificate(state: web::Data<AppState>) -> impl Responder {
    let Some(exporter) = &state.exporter else {
        log::warn!("certificate requested but export is unavailable");
        return HttpResponse::NoContent().finish();
    };
    let shown = state.controller().certificate(today());
    match exporter.render(shown.as_ref()) {
        Ok(Some(exported)) => {
            log::info!(
                "serving certificate {} ({} bytes)",
                exported.file_name,
                exported.png.len()
            );
            HttpResponse::Ok()
                .content_type(ContentType::png())
                .insert_header(ContentDisposition::attachment(exported.file_name))
                .body(exported.png)
        }
        Ok(None) => HttpResponse::NoContent().finish(),
        Err(err) => {
            log::warn!("certificate export failed: {err}");
            HttpResponse::NoContent().finish()
        }
    }
}
