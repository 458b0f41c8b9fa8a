//! HTML rendering of analysis reports.
//!
//! Produces the two-region layout: the certificate card on the left and the
//! dashboard (summary, composition chart, roadmap) on the right. Output is
//! self-contained markup; styles come from [`inline_css`].

use std::f64::consts::PI;
use std::fmt::Write;

use chrono::NaiveDate;

use crate::chart::{ChartSlice, slice_color, slice_shares, top_languages};
use crate::domain::{AnalysisReport, ScoreBand};
use crate::export::{certificate_file_name, display_source};

const DONUT_SIZE: f64 = 200.0;
const DONUT_RADIUS: f64 = 60.0;
const DONUT_THICKNESS: f64 = 20.0;
const DONUT_PADDING_DEGREES: f64 = 5.0;

/// Render the certificate and dashboard for `report`.
///
/// `download_href` adds the "Download Certificate" control under the card.
pub fn render_report_html(
    report: &AnalysisReport,
    url: &str,
    issued_on: NaiveDate,
    download_href: Option<&str>,
) -> String {
    let download = download_href
        .map(|href| {
            format!(
                r#"<a class="download-btn" href="{href}" download="{file}">Download Certificate</a>"#,
                href = html_escape(href),
                file = html_escape(&certificate_file_name(&report.persona)),
            )
        })
        .unwrap_or_default();

    format!(
        r#"<div class="grid-container">
    <div class="left-column">
        {certificate}
        {download}
    </div>
    <div class="right-column">
        {dashboard}
    </div>
</div>"#,
        certificate = render_certificate_html(report, url, issued_on),
        download = download,
        dashboard = render_dashboard_html(report),
    )
}

/// Render the certificate card.
pub fn render_certificate_html(report: &AnalysisReport, url: &str, issued_on: NaiveDate) -> String {
    let band = ScoreBand::from_score(report.score);
    format!(
        r#"<div id="certificate" class="certificate-card">
    <div class="cert-header">
        <span class="cert-title">CODEDARPAN REPORT</span>
        <span class="cert-date">{date}</span>
    </div>
    <div class="cert-body">
        <div class="score-ring-outer">
            <div class="score-ring-inner band-{band}" style="border-color: {color}">{score}</div>
        </div>
        <h2 class="persona-title">{persona}</h2>
        <div class="meta-grid">
            {stars}
            {forks}
            {language}
        </div>
    </div>
    <div class="cert-footer">
        <div class="verified-badge">✓ AI VERIFIED</div>
        <span class="cert-url">{source}</span>
    </div>
</div>"#,
        date = issued_on.format("%Y-%m-%d"),
        band = band.as_str(),
        color = band.color(),
        score = report.score,
        persona = html_escape(&report.persona),
        stars = render_meta_item("STARS", &report.details.stars.to_string()),
        forks = render_meta_item("FORKS", &report.details.forks.to_string()),
        language = render_meta_item("MAIN LANG", &report.details.primary_language),
        source = html_escape(&display_source(url)),
    )
}

fn render_meta_item(label: &str, value: &str) -> String {
    format!(
        r#"<div class="meta-item"><span class="meta-label">{label}</span><span class="meta-value">{value}</span></div>"#,
        label = label,
        value = html_escape(value),
    )
}

/// Render the summary, composition chart and roadmap panels.
pub fn render_dashboard_html(report: &AnalysisReport) -> String {
    let slices = top_languages(Some(&report.details.language_breakdown));
    format!(
        r#"<div class="glass-panel">
    <h3 class="panel-title">AI Analysis</h3>
    <p class="summary-text">{summary}</p>
</div>
<div class="row-split">
    <div class="glass-panel">
        <h3 class="panel-title">Code Composition</h3>
        {chart}
    </div>
    <div class="glass-panel">
        <h3 class="panel-title">Action Plan</h3>
        {roadmap}
    </div>
</div>"#,
        summary = html_escape(&report.summary),
        chart = render_composition_chart(&slices),
        roadmap = render_roadmap(&report.roadmap),
    )
}

/// Render chart slices as an SVG donut with a legend.
pub fn render_composition_chart(slices: &[ChartSlice]) -> String {
    if slices.is_empty() {
        return r#"<p class="empty">No language data.</p>"#.to_string();
    }

    let circumference = 2.0 * PI * DONUT_RADIUS;
    let gap = if slices.len() > 1 {
        circumference * DONUT_PADDING_DEGREES / 360.0
    } else {
        0.0
    };
    let centre = DONUT_SIZE / 2.0;
    let mut arcs = String::new();
    let mut legend = String::new();
    let mut offset = 0.0;

    for (index, (slice, share)) in slices.iter().zip(slice_shares(slices)).enumerate() {
        let span = circumference * share / 100.0;
        let length = (span - gap).max(0.0);
        let color = slice_color(index);
        let name = html_escape(&slice.name);
        let size = slice.kilobytes_label();
        let _ = writeln!(
            arcs,
            r#"<circle class="slice" cx="{centre}" cy="{centre}" r="{DONUT_RADIUS}" fill="none" stroke="{color}" stroke-width="{DONUT_THICKNESS}" stroke-dasharray="{length:.2} {rest:.2}" stroke-dashoffset="{dash_offset:.2}"><title>{name}: {size}</title></circle>"#,
            rest = circumference - length,
            dash_offset = -offset,
        );
        let _ = writeln!(
            legend,
            r#"<li><span class="swatch" style="background: {color}"></span>{name}<span class="legend-value">{size} · {share:.1}%</span></li>"#,
        );
        offset += span;
    }

    format!(
        r#"<svg class="donut" viewBox="0 0 {DONUT_SIZE} {DONUT_SIZE}" width="100%" height="200" role="img">
<g transform="rotate(-90 {centre} {centre})">
{arcs}</g>
</svg>
<ul class="legend">
{legend}</ul>"#,
    )
}

fn render_roadmap(roadmap: &[String]) -> String {
    if roadmap.is_empty() {
        return r#"<p class="empty">No suggestions.</p>"#.to_string();
    }
    let mut items = String::new();
    for tip in roadmap {
        let _ = writeln!(
            items,
            r#"<li class="roadmap-item"><span class="bullet">•</span>{}</li>"#,
            html_escape(tip)
        );
    }
    format!("<ul class=\"roadmap-list\">\n{items}</ul>")
}

/// Wrap `body` in a standalone HTML document using [`inline_css`].
pub fn render_document(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{css}</style>
</head>
<body>
    <div class="container">
        {body}
    </div>
</body>
</html>"#,
        title = html_escape(title),
        css = inline_css(),
        body = body,
    )
}

/// Stylesheet shared by every rendered page.
pub fn inline_css() -> &'static str {
    r#"
* { box-sizing: border-box; }
body { margin: 0; background: #09090b; color: #e4e4e7; font-family: Inter, system-ui, -apple-system, sans-serif; }
.container { min-height: 100vh; display: flex; flex-direction: column; align-items: center; padding: 40px 20px; }
.hero { text-align: center; max-width: 800px; margin-bottom: 60px; }
.header { font-size: 4.5rem; font-weight: 800; margin: 0 0 10px 0; letter-spacing: -2px; line-height: 1.1; }
.gradient-text { background: linear-gradient(135deg, #a78bfa 0%, #06b6d4 100%); -webkit-background-clip: text; -webkit-text-fill-color: transparent; }
.sub-header { color: #94a3b8; font-size: 1.25rem; font-weight: 300; }
.sub-header strong { color: #fff; font-weight: 600; }
.input-wrapper { margin: 40px auto 0; position: relative; max-width: 500px; }
.input-wrapper input { width: 100%; padding: 20px 60px 20px 25px; border-radius: 16px; border: 1px solid rgba(255,255,255,0.1); background: rgba(255,255,255,0.05); color: white; font-size: 1rem; outline: none; box-shadow: 0 4px 20px rgba(0,0,0,0.3); }
.search-btn { position: absolute; right: 10px; top: 10px; bottom: 10px; width: 45px; border-radius: 12px; border: none; background: linear-gradient(135deg, #8b5cf6, #06b6d4); color: white; cursor: pointer; display: flex; align-items: center; justify-content: center; }
.search-btn:disabled { cursor: wait; opacity: 0.8; }
.loader { width: 18px; height: 18px; border: 2px solid rgba(255,255,255,0.3); border-top: 2px solid white; border-radius: 50%; animation: spin 1s linear infinite; }
@keyframes spin { to { transform: rotate(360deg); } }
.error { margin-top: 15px; color: #f87171; font-size: 0.9rem; background: rgba(248,113,113,0.1); padding: 8px 16px; border-radius: 8px; display: inline-block; }
.grid-container { display: grid; grid-template-columns: repeat(auto-fit, minmax(350px, 1fr)); gap: 40px; width: 100%; max-width: 1200px; }
.left-column { display: flex; flex-direction: column; gap: 20px; align-items: center; }
.certificate-card { width: 100%; background: #18181b; border-radius: 24px; padding: 40px; border: 1px solid #27272a; box-shadow: 0 25px 50px -12px rgba(0,0,0,0.5); }
.cert-header { display: flex; justify-content: space-between; margin-bottom: 40px; border-bottom: 1px solid #27272a; padding-bottom: 20px; }
.cert-title { font-size: 0.8rem; font-weight: 800; color: #71717a; letter-spacing: 2px; }
.cert-date { font-size: 0.8rem; color: #52525b; }
.cert-body { display: flex; flex-direction: column; align-items: center; text-align: center; margin-bottom: 40px; }
.score-ring-outer { width: 140px; height: 140px; border-radius: 50%; background: #27272a; display: flex; align-items: center; justify-content: center; margin-bottom: 25px; }
.score-ring-inner { width: 120px; height: 120px; border-radius: 50%; background: #18181b; display: flex; align-items: center; justify-content: center; font-size: 3.5rem; font-weight: 800; color: white; border: 8px solid; }
.persona-title { font-size: 1.8rem; font-weight: 700; margin: 0 0 25px 0; color: #ffffff; }
.meta-grid { display: grid; grid-template-columns: 1fr 1fr 1fr; gap: 20px; width: 100%; border-top: 1px solid #27272a; padding-top: 25px; }
.meta-item { display: flex; flex-direction: column; gap: 5px; }
.meta-label { font-size: 0.7rem; color: #71717a; letter-spacing: 1px; font-weight: 600; }
.meta-value { font-size: 1.1rem; font-weight: 600; color: #e4e4e7; }
.cert-footer { display: flex; justify-content: space-between; align-items: center; }
.verified-badge { font-size: 0.75rem; background: #2563eb; color: white; padding: 4px 10px; border-radius: 4px; font-weight: 600; }
.cert-url { font-size: 0.8rem; color: #52525b; }
.download-btn { display: block; text-align: center; text-decoration: none; width: 100%; padding: 16px; border-radius: 12px; background: #fff; color: #000; font-weight: 600; font-size: 1rem; box-shadow: 0 0 20px rgba(255,255,255,0.1); }
.right-column { display: flex; flex-direction: column; gap: 20px; }
.glass-panel { background: rgba(255,255,255,0.03); border: 1px solid rgba(255,255,255,0.05); border-radius: 24px; padding: 30px; }
.row-split { display: grid; grid-template-columns: 1fr 1fr; gap: 20px; }
.panel-title { margin: 0 0 20px 0; font-size: 1.1rem; font-weight: 600; color: #e4e4e7; }
.summary-text { line-height: 1.8; color: #a1a1aa; font-size: 0.95rem; }
.roadmap-list, .legend { list-style: none; padding: 0; margin: 0; }
.roadmap-item { display: flex; gap: 12px; margin-bottom: 15px; font-size: 0.9rem; color: #d4d4d8; align-items: flex-start; }
.bullet { color: #f59e0b; font-size: 1.2rem; line-height: 1; }
.legend li { display: flex; align-items: center; gap: 8px; font-size: 0.8rem; color: #d4d4d8; margin-top: 6px; }
.swatch { width: 10px; height: 10px; border-radius: 2px; display: inline-block; }
.legend-value { margin-left: auto; color: #71717a; }
.empty { color: #71717a; font-size: 0.9rem; }
"#
}

/// Escape HTML special characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
