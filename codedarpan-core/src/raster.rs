//! Plotters-backed certificate rasterizer.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::error::{CodeDarpanError, Result};
use crate::export::{Certificate, ImageExporter, RasterOptions};

const FONT_FAMILY: &str = "sans-serif";

const CARD_WIDTH: u32 = 480;
const CARD_HEIGHT: u32 = 600;
const MARGIN: i32 = 40;

const BORDER: RGBColor = RGBColor(0x27, 0x27, 0x2a);
const MUTED: RGBColor = RGBColor(0x71, 0x71, 0x7a);
const FAINT: RGBColor = RGBColor(0x52, 0x52, 0x5b);
const META_VALUE: RGBColor = RGBColor(0xe4, 0xe4, 0xe7);
const BADGE: RGBColor = RGBColor(0x25, 0x63, 0xeb);

/// Font files tried when no explicit font is configured.
pub const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

static REGISTERED_FONT: Mutex<Option<PathBuf>> = Mutex::new(None);

/// Draws the certificate card with plotters and encodes it as PNG.
#[derive(Debug, Clone)]
pub struct PlottersRasterizer {
    font: PathBuf,
}

impl PlottersRasterizer {
    /// Use the TTF font at `path` for all certificate text.
    ///
    /// Fonts are registered once per process and the first one wins: later
    /// calls still require `path` to be readable but return a rasterizer
    /// backed by the already registered font.
    pub fn from_font_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let mut registered = REGISTERED_FONT
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = registered.as_ref() {
            if existing != path {
                log::warn!(
                    "certificate font {} already registered, ignoring {}",
                    existing.display(),
                    path.display()
                );
            }
            return Ok(Self {
                font: existing.clone(),
            });
        }
        let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
        for style in [FontStyle::Normal, FontStyle::Bold] {
            plotters::style::register_font(FONT_FAMILY, style, bytes).map_err(|_| {
                CodeDarpanError::Export(format!("invalid font file {}", path.display()))
            })?;
        }
        let font = path.to_path_buf();
        *registered = Some(font.clone());
        log::debug!("certificate font: {}", font.display());
        Ok(Self { font })
    }

    /// Use `preferred` when given, otherwise the first font found in
    /// [`FONT_CANDIDATES`].
    ///
    /// Only the first successfully registered font is ever used; see
    /// [`PlottersRasterizer::from_font_path`].
    pub fn discover(preferred: Option<&Path>) -> Result<Self> {
        if let Some(path) = preferred {
            return Self::from_font_path(path);
        }
        FONT_CANDIDATES
            .iter()
            .map(Path::new)
            .find(|path| path.is_file())
            .ok_or_else(|| {
                CodeDarpanError::Export("no usable font found; set a font path".to_string())
            })
            .and_then(Self::from_font_path)
    }

    /// Font file backing the rasterizer.
    pub fn font(&self) -> &Path {
        &self.font
    }
}

impl ImageExporter for PlottersRasterizer {
    fn rasterize(&self, certificate: &Certificate, options: &RasterOptions) -> Result<Vec<u8>> {
        let scale = options.scale.max(1);
        let (width, height) = (CARD_WIDTH * scale, CARD_HEIGHT * scale);
        let background = parse_hex_color(&options.background)?;
        let mut buffer = vec![0u8; (width * height * 3) as usize];
        draw_certificate(&mut buffer, (width, height), scale as i32, background, certificate)
            .map_err(CodeDarpanError::Export)?;
        encode_png(&buffer, width, height)
    }
}

struct Painter {
    scale: i32,
}

impl Painter {
    fn px(&self, value: i32) -> i32 {
        value * self.scale
    }

    fn point(&self, at: (i32, i32)) -> (i32, i32) {
        (self.px(at.0), self.px(at.1))
    }

    fn stroke(&self, color: RGBColor) -> ShapeStyle {
        color.stroke_width(self.scale as u32)
    }

    fn text(
        &self,
        value: &str,
        at: (i32, i32),
        points: f64,
        style: FontStyle,
        color: &RGBColor,
        anchor: HPos,
    ) -> Text<'static, (i32, i32), String> {
        let font = (FONT_FAMILY, points * self.scale as f64, style)
            .into_font()
            .color(color)
            .pos(Pos::new(anchor, VPos::Center));
        Text::new(value.to_string(), self.point(at), font)
    }
}

fn draw_certificate(
    buffer: &mut [u8],
    size: (u32, u32),
    scale: i32,
    background: RGBColor,
    certificate: &Certificate,
) -> std::result::Result<(), String> {
    let root = BitMapBackend::with_buffer(buffer, size).into_drawing_area();
    let paint = Painter { scale };
    let right = CARD_WIDTH as i32 - MARGIN;
    let centre = CARD_WIDTH as i32 / 2;
    let bold = FontStyle::Bold;
    let normal = FontStyle::Normal;

    root.fill(&background).map_err(draw_error)?;
    root.draw(&Rectangle::new(
        [(0, 0), (size.0 as i32 - 1, size.1 as i32 - 1)],
        paint.stroke(BORDER),
    ))
    .map_err(draw_error)?;

    // Header
    let issued = certificate.issued_on.format("%Y-%m-%d").to_string();
    let header = [
        paint.text("CODEDARPAN REPORT", (MARGIN, 52), 11.0, bold, &MUTED, HPos::Left),
        paint.text(&issued, (right, 52), 11.0, normal, &FAINT, HPos::Right),
    ];
    for element in &header {
        root.draw(element).map_err(draw_error)?;
    }
    root.draw(&PathElement::new(
        vec![paint.point((MARGIN, 76)), paint.point((right, 76))],
        paint.stroke(BORDER),
    ))
    .map_err(draw_error)?;

    // Score ring
    let (r, g, b) = certificate.band().rgb();
    let ring = paint.point((centre, 186));
    let discs = [
        Circle::new(ring, paint.px(70), BORDER.filled()),
        Circle::new(ring, paint.px(60), RGBColor(r, g, b).filled()),
        Circle::new(ring, paint.px(52), background.filled()),
    ];
    for disc in &discs {
        root.draw(disc).map_err(draw_error)?;
    }
    let score = certificate.score.to_string();
    root.draw(&paint.text(&score, (centre, 186), 48.0, bold, &WHITE, HPos::Center))
        .map_err(draw_error)?;

    // Persona and metadata grid
    root.draw(&paint.text(
        &certificate.persona,
        (centre, 300),
        26.0,
        bold,
        &WHITE,
        HPos::Center,
    ))
    .map_err(draw_error)?;
    root.draw(&PathElement::new(
        vec![paint.point((MARGIN, 340)), paint.point((right, 340))],
        paint.stroke(BORDER),
    ))
    .map_err(draw_error)?;
    let meta = [
        ("STARS", certificate.stars.to_string()),
        ("FORKS", certificate.forks.to_string()),
        ("MAIN LANG", certificate.primary_language.clone()),
    ];
    let column = (right - MARGIN) / 3;
    for (index, (label, value)) in meta.iter().enumerate() {
        let x = MARGIN + column * index as i32 + column / 2;
        root.draw(&paint.text(label, (x, 372), 10.0, bold, &MUTED, HPos::Center))
            .map_err(draw_error)?;
        root.draw(&paint.text(value, (x, 400), 17.0, bold, &META_VALUE, HPos::Center))
            .map_err(draw_error)?;
    }

    // Footer
    let footer = CARD_HEIGHT as i32 - 60;
    root.draw(&Rectangle::new(
        [
            paint.point((MARGIN, footer - 13)),
            paint.point((MARGIN + 112, footer + 13)),
        ],
        BADGE.filled(),
    ))
    .map_err(draw_error)?;
    let footer_text = [
        paint.text("✓ AI VERIFIED", (MARGIN + 56, footer), 11.0, bold, &WHITE, HPos::Center),
        paint.text(&certificate.source, (right, footer), 12.0, normal, &FAINT, HPos::Right),
    ];
    for element in &footer_text {
        root.draw(element).map_err(draw_error)?;
    }

    root.present().map_err(draw_error)?;
    Ok(())
}

fn draw_error<E: std::fmt::Display>(err: E) -> String {
    err.to_string()
}

fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let mut png = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(buffer, width, height, ColorType::Rgb8)
        .map_err(|err| CodeDarpanError::Export(format!("png encoding failed: {err}")))?;
    Ok(png)
}

/// Parse a `#rrggbb` colour.
fn parse_hex_color(value: &str) -> Result<RGBColor> {
    let hex = value.trim().trim_start_matches('#');
    let invalid = || CodeDarpanError::Export(format!("invalid colour {value:?}"));
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(invalid());
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16).map_err(|_| invalid())
    };
    Ok(RGBColor(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}
