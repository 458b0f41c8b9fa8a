#![deny(missing_docs)]
//! CodeDarpan command-line interface.
//!
//! Submits repositories to the analysis service and renders the resulting
//! report and certificate in the terminal or to files.

mod interactive;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use codedarpan_core::{
    AnalysisReport, Analyzer, AppController, CertificateExporter, DEFAULT_ANALYZER_URL,
    DirectorySink, HttpAnalysisClient, PlottersRasterizer, ScoreBand, display_source,
    render_document, render_report_html, top_languages,
};
use interactive::InteractiveArgs;
use std::fmt::Write;
use std::path::{Path, PathBuf};

pub(crate) type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser)]
#[command(name = "codedarpan", version, about = "CodeDarpan CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Debug)]
pub(crate) struct ServiceArgs {
    /// Base URL of the analysis service.
    #[arg(long, env = "CODEDARPAN_API_URL", default_value = DEFAULT_ANALYZER_URL)]
    pub(crate) api_url: String,
    /// TTF font used to draw the certificate image.
    #[arg(long, env = "CODEDARPAN_FONT")]
    pub(crate) font: Option<PathBuf>,
}

#[derive(Args, Clone, Debug)]
struct OutputArgs {
    /// Output format for the report.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Write the report to a file instead of stdout.
    #[arg(long = "report-output")]
    report_output: Option<PathBuf>,
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum OutputFormat {
    Text,
    Json,
    Html,
}

#[derive(Args, Clone, Debug)]
struct AnalyzeArgs {
    /// Repository URL to analyze.
    url: String,
    #[command(flatten)]
    service: ServiceArgs,
    #[command(flatten)]
    output: OutputArgs,
    /// Save the certificate PNG into this directory.
    #[arg(long = "certificate-dir")]
    certificate_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one repository and print its report.
    Analyze(AnalyzeArgs),
    /// Analyze repositories typed at a prompt, one URL per line.
    Interactive(InteractiveArgs),
}

#[cfg(not(test))]
#[tokio::main]
async fn main() -> CliResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze(args) => {
            let client = HttpAnalysisClient::new(&args.service.api_url)?;
            let exporter = build_exporter(args.service.font.as_deref());
            run_analyze(&args, &client, exporter.as_ref(), today()).await?
        }
        Commands::Interactive(args) => interactive::run_interactive(args).await?,
    }

    Ok(())
}

#[cfg(test)]
fn main() {}

/// Local date printed on certificates.
#[cfg_attr(test, allow(dead_code))]
pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Build the PNG exporter, or `None` when no font can be loaded.
#[cfg_attr(test, allow(dead_code))]
pub(crate) fn build_exporter(font: Option<&Path>) -> Option<CertificateExporter> {
    match PlottersRasterizer::discover(font) {
        Ok(rasterizer) => Some(CertificateExporter::new(Box::new(rasterizer))),
        Err(err) => {
            log::warn!("certificate export disabled: {err}");
            None
        }
    }
}

async fn run_analyze<A: Analyzer + ?Sized>(
    args: &AnalyzeArgs,
    analyzer: &A,
    exporter: Option<&CertificateExporter>,
    issued_on: NaiveDate,
) -> CliResult<()> {
    let mut controller = AppController::new();
    controller.submit(&args.url, analyzer).await;

    let state = controller.state();
    if let Some(message) = &state.error_message {
        return Err(message.clone().into());
    }
    let Some(report) = &state.report else {
        return Err("repository url is required".into());
    };

    if let (Some(dir), Some(exporter)) = (&args.certificate_dir, exporter) {
        let sink = DirectorySink::new(dir);
        match exporter.export(controller.certificate(issued_on).as_ref(), &sink) {
            Ok(Some(file_name)) => eprintln!("Certificate saved to {}", dir.join(file_name).display()),
            Ok(None) => {}
            Err(err) => log::warn!("certificate export failed: {err}"),
        }
    }

    let contents = match args.output.format {
        OutputFormat::Text => render_report_text(report, &state.url, issued_on),
        OutputFormat::Json => render_report_json(report)?,
        OutputFormat::Html => {
            let download = exporter.and_then(|exporter| {
                match exporter.render(controller.certificate(issued_on).as_ref()) {
                    Ok(exported) => exported.map(|exported| exported.data_uri()),
                    Err(err) => {
                        log::warn!("certificate export failed: {err}");
                        None
                    }
                }
            });
            let body = render_report_html(report, &state.url, issued_on, download.as_deref());
            render_document("CodeDarpan Report", &body)
        }
    };
    emit_output(&args.output, contents).await
}

async fn emit_output(output: &OutputArgs, contents: String) -> CliResult<()> {
    if let Some(path) = &output.report_output {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, contents).await?;
    } else {
        print!("{contents}");
    }
    Ok(())
}

fn render_report_json(report: &AnalysisReport) -> CliResult<String> {
    let mut json = serde_json::to_string_pretty(report)?;
    json.push('\n');
    Ok(json)
}

/// Plain-text rendering of the certificate and dashboard.
pub(crate) fn render_report_text(report: &AnalysisReport, url: &str, issued_on: NaiveDate) -> String {
    let mut output = String::new();
    let band = ScoreBand::from_score(report.score);
    let details = &report.details;

    let _ = writeln!(output, "CODEDARPAN REPORT  {}", issued_on.format("%Y-%m-%d"));
    let _ = writeln!(output, "Score: {} ({})", report.score, band.as_str());
    let _ = writeln!(output, "Persona: {}", report.persona);
    let _ = writeln!(
        output,
        "Stars: {}  Forks: {}  Main lang: {}",
        details.stars, details.forks, details.primary_language
    );
    let _ = writeln!(output, "Source: {}", display_source(url));
    let _ = writeln!(output);

    let _ = writeln!(output, "AI Analysis:");
    let _ = writeln!(output, "  {}", report.summary);
    let _ = writeln!(output);

    let slices = top_languages(Some(&details.language_breakdown));
    if slices.is_empty() {
        let _ = writeln!(output, "Code Composition: none");
    } else {
        let _ = writeln!(output, "Code Composition:");
        for slice in &slices {
            let _ = writeln!(output, "  - {}: {}", slice.name, slice.kilobytes_label());
        }
    }
    let _ = writeln!(output);

    if report.roadmap.is_empty() {
        let _ = writeln!(output, "Action Plan: none");
    } else {
        let _ = writeln!(output, "Action Plan:");
        for tip in &report.roadmap {
            let _ = writeln!(output, "  • {tip}");
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::{
        AnalyzeArgs, Cli, Commands, OutputArgs, OutputFormat, ServiceArgs, emit_output,
        render_report_json, render_report_text, run_analyze,
    };
    use chrono::NaiveDate;
    use clap::Parser;
    use codedarpan_core::{
        AnalysisReport, Certificate, CertificateExporter, HttpAnalysisClient, ImageExporter,
        RasterOptions, RepoDetails,
    };
    use httpmock::Method::POST;
    use httpmock::MockServer;
    use serde_json::json;
    use std::path::PathBuf;

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

    fn issued_on() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).expect("date")
    }

    fn sample_report() -> AnalysisReport {
        AnalysisReport {
            score: 72,
            persona: "Pragmatic Builder".to_string(),
            summary: "A tidy Go service.".to_string(),
            details: RepoDetails {
                stars: 10,
                forks: 2,
                primary_language: "Go".to_string(),
                language_breakdown: [("Shell".to_string(), 2048), ("Go".to_string(), 51200)]
                    .into_iter()
                    .collect(),
            },
            roadmap: vec!["Add tests".to_string()],
        }
    }

    fn report_body() -> serde_json::Value {
        json!({
            "score": 72,
            "persona": "Pragmatic Builder",
            "summary": "A tidy Go service.",
            "details": {
                "stars": 10,
                "forks": 2,
                "primary_language": "Go",
                "language_breakdown": {"Go": 50000, "Shell": 2000}
            },
            "roadmap": ["Add tests"]
        })
    }

    fn analyze_args(url: &str, format: OutputFormat, root: &std::path::Path) -> AnalyzeArgs {
        AnalyzeArgs {
            url: url.to_string(),
            service: ServiceArgs {
                api_url: "http://unused".to_string(),
                font: None,
            },
            output: OutputArgs {
                format,
                report_output: Some(root.join("out/report")),
            },
            certificate_dir: Some(root.join("certs")),
        }
    }

    fn unique_dir_name() -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("system time")
            .as_nanos();
        PathBuf::from(format!("codedarpan_cli_test_{nanos}"))
    }

    #[test]
    fn parses_analyze_command() {
        let cli = Cli::try_parse_from([
            "codedarpan",
            "analyze",
            "github.com/acme/widgets",
            "--format",
            "html",
            "--api-url",
            "http://analysis:9000",
            "--certificate-dir",
            "certs",
        ])
        .expect("parse");
        let Commands::Analyze(args) = cli.command else {
            panic!("expected analyze command");
        };
        assert_eq!(args.url, "github.com/acme/widgets");
        assert_eq!(args.output.format, OutputFormat::Html);
        assert_eq!(args.service.api_url, "http://analysis:9000");
        assert_eq!(args.certificate_dir, Some(PathBuf::from("certs")));
    }

    #[test]
    fn analyze_requires_url() {
        assert!(Cli::try_parse_from(["codedarpan", "analyze"]).is_err());
    }

    #[test]
    fn text_report_lists_sections() {
        let output = render_report_text(
            &sample_report(),
            "https://github.com/acme/widgets",
            issued_on(),
        );
        assert!(output.contains("CODEDARPAN REPORT  2026-10-16"));
        assert!(output.contains("Score: 72 (warning)"));
        assert!(output.contains("Persona: Pragmatic Builder"));
        assert!(output.contains("Stars: 10  Forks: 2  Main lang: Go"));
        assert!(output.contains("Source: acme/widgets"));
        assert!(output.contains("  • Add tests"));
        let go = output.find("  - Go: 50 KB").expect("go slice");
        let shell = output.find("  - Shell: 2 KB").expect("shell slice");
        assert!(go < shell);
    }

    #[test]
    fn text_report_handles_empty_sections() {
        let mut report = sample_report();
        report.details.language_breakdown.clear();
        report.roadmap.clear();
        let output = render_report_text(&report, "", issued_on());
        assert!(output.contains("Code Composition: none"));
        assert!(output.contains("Action Plan: none"));
    }

    #[test]
    fn json_report_keeps_breakdown_order() {
        let json = render_report_json(&sample_report()).expect("json");
        let breakdown = json
            .find("\"language_breakdown\"")
            .map(|start| &json[start..])
            .expect("breakdown object");
        let shell = breakdown.find("\"Shell\": 2048").expect("shell entry");
        let go = breakdown.find("\"Go\": 51200").expect("go entry");
        assert!(shell < go);
        assert!(json.ends_with('\n'));
    }

    #[tokio::test]
    async fn emit_output_writes_report_file() {
        let root = std::env::temp_dir().join(unique_dir_name());
        let path = root.join("nested/report.txt");
        let output = OutputArgs {
            format: OutputFormat::Text,
            report_output: Some(path.clone()),
        };
        emit_output(&output, "hello\n".to_string())
            .await
            .expect("emit");
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "hello\n");
        std::fs::remove_dir_all(&root).expect("cleanup");
    }

    #[tokio::test]
    async fn analyze_writes_html_report_and_certificate() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/analyze")
                    .json_body(json!({"url": "github.com/acme/widgets"}));
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(report_body());
            })
            .await;
        let root = std::env::temp_dir().join(unique_dir_name());
        let args = analyze_args("github.com/acme/widgets", OutputFormat::Html, &root);
        let client = HttpAnalysisClient::new(&server.base_url()).expect("client");
        let exporter = CertificateExporter::new(Box::new(StubRasterizer));

        run_analyze(&args, &client, Some(&exporter), issued_on())
            .await
            .expect("analyze");

        mock.assert_async().await;
        let html = std::fs::read_to_string(root.join("out/report")).expect("read html");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Pragmatic Builder"));
        assert!(html.contains("border-color: #facc15"));
        assert!(html.contains(r#"href="data:image/png;base64,cG5n""#));
        let png = std::fs::read(root.join("certs/CodeDarpan-PragmaticBuilder.png"))
            .expect("read certificate");
        assert_eq!(png, b"png");
        std::fs::remove_dir_all(&root).expect("cleanup");
    }

    #[tokio::test]
    async fn analyze_reports_service_failure() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/analyze");
                then.status(500);
            })
            .await;
        let root = std::env::temp_dir().join(unique_dir_name());
        let args = analyze_args("github.com/acme/widgets", OutputFormat::Text, &root);
        let client = HttpAnalysisClient::new(&server.base_url()).expect("client");

        let err = run_analyze(&args, &client, None, issued_on())
            .await
            .expect_err("failure");
        assert_eq!(err.to_string(), "Failed to analyze repository");
        assert!(!root.exists());
    }

    #[tokio::test]
    async fn analyze_rejects_blank_url_without_request() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/analyze");
                then.status(200).json_body(report_body());
            })
            .await;
        let root = std::env::temp_dir().join(unique_dir_name());
        let args = analyze_args("   ", OutputFormat::Json, &root);
        let client = HttpAnalysisClient::new(&server.base_url()).expect("client");

        assert!(run_analyze(&args, &client, None, issued_on()).await.is_err());
        mock.assert_hits_async(0).await;
    }
}
