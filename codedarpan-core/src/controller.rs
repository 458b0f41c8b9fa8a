//! UI state machine driving analysis submissions.
//!
//! [`UiState`] is replaced wholesale on every transition by [`reduce`]. The
//! [`AppController`] owns the current state and talks to an [`Analyzer`].
//! A submission made while another is outstanding is ignored.

use chrono::NaiveDate;

use crate::client::Analyzer;
use crate::domain::AnalysisReport;
use crate::error::Result;
use crate::export::Certificate;

/// Snapshot of everything the front-end displays.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    /// Repository URL as last entered or submitted.
    pub url: String,
    /// Report from the last successful analysis.
    pub report: Option<AnalysisReport>,
    /// Whether an analysis request is outstanding.
    pub loading: bool,
    /// Message from the last failed analysis.
    pub error_message: Option<String>,
}

/// Logical phase derived from a [`UiState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing submitted yet.
    Idle,
    /// Waiting on the analysis service.
    Loading,
    /// A report is held.
    Success,
    /// The last analysis failed.
    Error,
}

impl UiState {
    /// Phase this state represents.
    pub fn phase(&self) -> Phase {
        if self.loading {
            Phase::Loading
        } else if self.report.is_some() {
            Phase::Success
        } else if self.error_message.is_some() {
            Phase::Error
        } else {
            Phase::Idle
        }
    }
}

/// Inputs that drive [`reduce`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The URL field changed.
    Input(String),
    /// The user asked to analyze a URL.
    Submit(String),
    /// The analysis service returned a report.
    Succeeded(AnalysisReport),
    /// The analysis request failed with a user-facing message.
    Failed(String),
}

/// Compute the state that follows `state` after `event`.
pub fn reduce(state: &UiState, event: Event) -> UiState {
    match event {
        Event::Input(url) => UiState {
            url,
            ..state.clone()
        },
        Event::Submit(url) => {
            let url = url.trim();
            if url.is_empty() || state.loading {
                return state.clone();
            }
            UiState {
                url: url.to_string(),
                report: None,
                loading: true,
                error_message: None,
            }
        }
        Event::Succeeded(report) => {
            if !state.loading {
                return state.clone();
            }
            UiState {
                url: state.url.clone(),
                report: Some(report),
                loading: false,
                error_message: None,
            }
        }
        Event::Failed(message) => {
            if !state.loading {
                return state.clone();
            }
            UiState {
                url: state.url.clone(),
                report: None,
                loading: false,
                error_message: Some(message),
            }
        }
    }
}

/// Owner of the front-end state.
#[derive(Debug, Default)]
pub struct AppController {
    state: UiState,
}

impl AppController {
    /// Create a controller in the idle state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> &UiState {
        &self.state
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// Apply an event, returning whether the state changed.
    pub fn dispatch(&mut self, event: Event) -> bool {
        let next = reduce(&self.state, event);
        let changed = next != self.state;
        self.state = next;
        changed
    }

    /// Record a change to the URL field.
    pub fn set_input(&mut self, url: impl Into<String>) {
        self.dispatch(Event::Input(url.into()));
    }

    /// Start a submission.
    ///
    /// Returns the URL to send to the analysis service, or `None` when the URL
    /// is blank or a request is already outstanding.
    pub fn begin(&mut self, url: &str) -> Option<String> {
        if self.state.loading {
            log::info!("ignoring submission of {url:?} while an analysis is running");
            return None;
        }
        if !self.dispatch(Event::Submit(url.to_string())) || !self.state.loading {
            return None;
        }
        log::info!("analyzing {}", self.state.url);
        Some(self.state.url.clone())
    }

    /// Complete the outstanding submission with the service's result.
    pub fn finish(&mut self, result: Result<AnalysisReport>) {
        match result {
            Ok(report) => {
                log::info!(
                    "analysis of {} scored {} ({})",
                    self.state.url,
                    report.score,
                    report.persona
                );
                self.dispatch(Event::Succeeded(report));
            }
            Err(err) => {
                log::warn!("analysis of {} failed: {err}", self.state.url);
                self.dispatch(Event::Failed(err.to_string()));
            }
        }
    }

    /// Run a full submission against `analyzer` and return the resulting phase.
    pub async fn submit<A: Analyzer + ?Sized>(&mut self, url: &str, analyzer: &A) -> Phase {
        let Some(url) = self.begin(url) else {
            return self.phase();
        };
        let result = analyzer.analyze(&url).await;
        self.finish(result);
        self.phase()
    }

    /// Certificate for the held report, if any.
    pub fn certificate(&self, issued_on: NaiveDate) -> Option<Certificate> {
        self.state
            .report
            .as_ref()
            .map(|report| Certificate::from_report(report, &self.state.url, issued_on))
    }
}
