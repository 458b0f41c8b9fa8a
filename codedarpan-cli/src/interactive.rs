//! Prompt loop for analyzing several repositories in one session.

use crate::{CliResult, ServiceArgs, render_report_text};
use chrono::NaiveDate;
use clap::Args;
use codedarpan_core::{Analyzer, AppController, CertificateExporter, DirectorySink, DownloadSink, Phase};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

const PROMPT: &str = "codedarpan> ";
const DOWNLOAD_COMMAND: &str = ":download";
const QUIT_COMMAND: &str = ":quit";

/// CLI arguments for the interactive command.
#[derive(Args, Clone, Debug)]
pub(crate) struct InteractiveArgs {
    #[command(flatten)]
    pub(crate) service: ServiceArgs,
    /// Directory that receives downloaded certificates.
    #[arg(long = "certificate-dir", default_value = ".")]
    pub(crate) certificate_dir: PathBuf,
}

/// Read repository URLs from stdin until `:quit` or end of input.
#[cfg_attr(test, allow(dead_code))]
pub(crate) async fn run_interactive(args: InteractiveArgs) -> CliResult<()> {
    let client = codedarpan_core::HttpAnalysisClient::new(&args.service.api_url)?;
    let exporter = crate::build_exporter(args.service.font.as_deref());
    let sink = DirectorySink::new(&args.certificate_dir);
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    let session = Session {
        analyzer: &client,
        exporter: exporter.as_ref(),
        sink: &sink,
        issued_on: crate::today(),
    };
    session.run(stdin, &mut stdout).await
}

/// Collaborators shared by every line of a session.
struct Session<'a, A: Analyzer + ?Sized> {
    analyzer: &'a A,
    exporter: Option<&'a CertificateExporter>,
    sink: &'a dyn DownloadSink,
    issued_on: NaiveDate,
}

impl<A: Analyzer + ?Sized> Session<'_, A> {
    async fn run<R, W>(&self, input: R, out: &mut W) -> CliResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut controller = AppController::new();
        let mut lines = input.lines();
        writeln!(
            out,
            "Enter a repository URL, {DOWNLOAD_COMMAND} to save the certificate, {QUIT_COMMAND} to exit."
        )?;

        loop {
            write!(out, "{PROMPT}")?;
            out.flush()?;
            let Some(line) = lines.next_line().await? else {
                break;
            };
            match line.trim() {
                "" => continue,
                QUIT_COMMAND => break,
                DOWNLOAD_COMMAND => self.download(&controller, out)?,
                url => {
                    controller.set_input(url);
                    writeln!(out, "Analyzing {url}...")?;
                    match controller.submit(url, self.analyzer).await {
                        Phase::Success => {
                            if let Some(report) = &controller.state().report {
                                let text =
                                    render_report_text(report, &controller.state().url, self.issued_on);
                                write!(out, "{text}")?;
                            }
                        }
                        Phase::Error => {
                            let message = controller.state().error_message.as_deref().unwrap_or_default();
                            writeln!(out, "Error: {message}")?;
                        }
                        Phase::Idle | Phase::Loading => {}
                    }
                }
            }
        }
        Ok(())
    }

    fn download<W: Write>(&self, controller: &AppController, out: &mut W) -> CliResult<()> {
        let Some(exporter) = self.exporter else {
            log::warn!("certificate export unavailable");
            return Ok(());
        };
        match exporter.export(controller.certificate(self.issued_on).as_ref(), self.sink) {
            Ok(Some(file_name)) => writeln!(out, "Saved {file_name}")?,
            Ok(None) => {}
            Err(err) => log::warn!("certificate export failed: {err}"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Session;
    use chrono::NaiveDate;
    use codedarpan_core::{
        AnalysisReport, AnalyzeFuture, Analyzer, Certificate, CertificateExporter,
        CodeDarpanError, DownloadSink, ImageExporter, RasterOptions, RepoDetails,
    };
    use std::sync::Mutex;

    struct FakeAnalyzer {
        calls: Mutex<Vec<String>>,
    }

    impl FakeAnalyzer {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().expect("calls lock").clone()
        }
    }

    impl Analyzer for FakeAnalyzer {
        fn analyze<'a>(&'a self, url: &'a str) -> AnalyzeFuture<'a> {
            self.calls.lock().expect("calls lock").push(url.to_string());
            let fail = url.contains("broken");
            Box::pin(async move {
                if fail {
                    Err(CodeDarpanError::Analysis)
                } else {
                    Ok(AnalysisReport {
                        score: 95,
                        persona: "The Architect".to_string(),
                        summary: "Well kept.".to_string(),
                        details: RepoDetails {
                            stars: 1200,
                            forks: 88,
                            primary_language: "Rust".to_string(),
                            language_breakdown: Default::default(),
                        },
                        roadmap: Vec::new(),
                    })
                }
            })
        }
    }

    struct StubRasterizer;

    impl ImageExporter for StubRasterizer {
        fn rasterize(
            &self,
            _certificate: &Certificate,
            _options: &RasterOptions,
        ) -> codedarpan_core::Result<Vec<u8>> {
            Ok(b"png".to_vec())
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        saved: Mutex<Vec<(String, Vec<u8>)>>,
    }

    impl DownloadSink for RecordingSink {
        fn save(&self, file_name: &str, png: &[u8]) -> codedarpan_core::Result<()> {
            self.saved
                .lock()
                .expect("saved lock")
                .push((file_name.to_string(), png.to_vec()));
            Ok(())
        }
    }

    async fn run_session(input: &str, sink: &RecordingSink, analyzer: &FakeAnalyzer) -> String {
        let exporter = CertificateExporter::new(Box::new(StubRasterizer));
        let session = Session {
            analyzer,
            exporter: Some(&exporter),
            sink,
            issued_on: NaiveDate::from_ymd_opt(2026, 10, 16).expect("date"),
        };
        let mut out = Vec::new();
        session
            .run(input.as_bytes(), &mut out)
            .await
            .expect("session");
        String::from_utf8(out).expect("utf8 output")
    }

    #[tokio::test]
    async fn analyzes_each_line_until_quit() {
        let analyzer = FakeAnalyzer::new();
        let sink = RecordingSink::default();
        let output = run_session(
            "github.com/acme/widgets\n\n   \n:quit\ngithub.com/acme/ignored\n",
            &sink,
            &analyzer,
        )
        .await;

        assert_eq!(analyzer.calls(), vec!["github.com/acme/widgets".to_string()]);
        assert!(output.contains("Analyzing github.com/acme/widgets..."));
        assert!(output.contains("Persona: The Architect"));
        assert!(output.contains("Score: 95 (good)"));
    }

    #[tokio::test]
    async fn download_saves_current_certificate() {
        let analyzer = FakeAnalyzer::new();
        let sink = RecordingSink::default();
        let output = run_session("github.com/acme/widgets\n:download\n", &sink, &analyzer).await;

        assert!(output.contains("Saved CodeDarpan-TheArchitect.png"));
        let saved = sink.saved.lock().expect("saved lock").clone();
        assert_eq!(
            saved,
            vec![("CodeDarpan-TheArchitect.png".to_string(), b"png".to_vec())]
        );
    }

    #[tokio::test]
    async fn download_without_report_is_silent() {
        let analyzer = FakeAnalyzer::new();
        let sink = RecordingSink::default();
        let output = run_session(":download\n:quit\n", &sink, &analyzer).await;

        assert!(!output.contains("Saved"));
        assert!(sink.saved.lock().expect("saved lock").is_empty());
        assert!(analyzer.calls().is_empty());
    }

    #[tokio::test]
    async fn failure_prints_error_and_clears_report() {
        let analyzer = FakeAnalyzer::new();
        let sink = RecordingSink::default();
        let output = run_session(
            "github.com/acme/widgets\ngithub.com/acme/broken\n:download\n",
            &sink,
            &analyzer,
        )
        .await;

        assert!(output.contains("Error: Failed to analyze repository"));
        assert!(sink.saved.lock().expect("saved lock").is_empty());
        assert_eq!(analyzer.calls().len(), 2);
    }
}
