//! Bar chart rendering for simulation reports
//!
//! One PNG per metric, drawn straight onto an `RgbImage`:
//! - **deaths**: eliminations per participant
//! - **survival_rate**: survival percentage per participant
//! - **avg_survival_time** / **avg_nervosity**: extended variant only
//!
//! Every PNG gets a `.txt` sidecar (`name,value` per line). Labels need a
//! TrueType font; without one the bars, axes and grid are still drawn.

use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_line_segment_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use std::fmt::Write as FmtWrite;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{SimError, SimResult};
use crate::simulation::{ParticipantStats, SimulationReport, Variant};

// Canvas layout
pub const CHART_WIDTH: u32 = 1000;
pub const CHART_HEIGHT: u32 = 500;
const MARGIN_LEFT: u32 = 80;
const MARGIN_RIGHT: u32 = 40;
const MARGIN_TOP: u32 = 60;
const MARGIN_BOTTOM: u32 = 70;

const BAR_FILL: f32 = 0.6; // Share of each slot covered by its bar
const BAR_ALPHA: f32 = 0.7;
const HEADROOM: f64 = 1.1; // Leaves room for value labels above the tallest bar
const GRID_LINES: u32 = 4;

const TITLE_SCALE: f32 = 24.0;
const LABEL_SCALE: f32 = 16.0;
const TICK_SCALE: f32 = 13.0;

pub const BACKGROUND: Rgb<u8> = Rgb([30, 30, 35]);
const GRID_COLOR: Rgb<u8> = Rgb([50, 50, 55]);
const AXIS_COLOR: Rgb<u8> = Rgb([140, 140, 150]);
const TEXT_COLOR: Rgb<u8> = Rgb([220, 220, 220]);

const DEATHS_COLOR: Rgb<u8> = Rgb([220, 40, 40]);
const SURVIVAL_COLOR: Rgb<u8> = Rgb([40, 180, 60]);
const TIME_COLOR: Rgb<u8> = Rgb([60, 120, 220]);
const NERVOSITY_COLOR: Rgb<u8> = Rgb([240, 150, 40]);

/// Probed in order when no font is configured
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Helvetica.ttc",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Data and styling for one bar chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub file_stem: String,
    pub title: String,
    pub color: Rgb<u8>,
    /// Appended to value labels ("%", "s", ...)
    pub suffix: &'static str,
    pub decimals: usize,
    pub bars: Vec<(String, f64)>,
}

impl ChartSpec {
    /// Charts for every metric the report carries
    pub fn for_report(report: &SimulationReport) -> Vec<ChartSpec> {
        let prefix = match report.variant {
            Variant::Simple => "simple",
            Variant::Extended => "extended",
        };
        let mut specs = vec![
            ChartSpec {
                file_stem: format!("{}_deaths", prefix),
                title: "Eliminations per participant".to_string(),
                color: DEATHS_COLOR,
                suffix: "",
                decimals: 0,
                bars: bars(report, |s| s.deaths as f64),
            },
            ChartSpec {
                file_stem: format!("{}_survival_rate", prefix),
                title: "Survival rate per participant (%)".to_string(),
                color: SURVIVAL_COLOR,
                suffix: "%",
                decimals: 2,
                bars: bars(report, |s| s.survival_rate),
            },
        ];

        if report.is_extended() {
            specs.push(ChartSpec {
                file_stem: format!("{}_avg_survival_time", prefix),
                title: "Average time per survival (s)".to_string(),
                color: TIME_COLOR,
                suffix: "s",
                decimals: 3,
                bars: bars(report, |s| s.avg_time_per_survival.unwrap_or(0.0)),
            });
            specs.push(ChartSpec {
                file_stem: format!("{}_avg_nervosity", prefix),
                title: "Average nervosity".to_string(),
                color: NERVOSITY_COLOR,
                suffix: "",
                decimals: 3,
                bars: bars(report, |s| s.avg_nervosity.unwrap_or(0.0)),
            });
        }
        specs
    }

    pub fn format_value(&self, value: f64) -> String {
        format!("{:.*}{}", self.decimals, value, self.suffix)
    }

    /// Top of the value axis
    fn axis_max(&self) -> f64 {
        let max = self
            .bars
            .iter()
            .map(|(_, value)| *value)
            .fold(0.0_f64, f64::max);
        if max > 0.0 { max * HEADROOM } else { 1.0 }
    }

    /// Sidecar contents: `name,value` per line
    pub fn data_lines(&self) -> String {
        let mut output = String::new();
        for (name, value) in &self.bars {
            let _ = writeln!(output, "{},{}", name, value);
        }
        output
    }
}

/// Writes bar charts for finished reports
pub struct ChartRenderer {
    output_dir: PathBuf,
    font: Option<FontVec>,
}

impl ChartRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            font: None,
        }
    }

    pub fn with_font_file(mut self, path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| SimError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let font = FontVec::try_from_vec(bytes).map_err(|e| SimError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        self.font = Some(font);
        Ok(self)
    }

    /// Use the first loadable well-known system font, if any
    pub fn with_system_font(mut self) -> Self {
        self.font = FONT_CANDIDATES.iter().find_map(|candidate| {
            let bytes = fs::read(candidate).ok()?;
            let font = FontVec::try_from_vec(bytes).ok()?;
            debug!("Using chart font {}", candidate);
            Some(font)
        });
        self
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Draw one chart in memory
    pub fn draw(&self, spec: &ChartSpec) -> RgbImage {
        let mut image = RgbImage::from_pixel(CHART_WIDTH, CHART_HEIGHT, BACKGROUND);

        let plot_left = MARGIN_LEFT as f32;
        let plot_right = (CHART_WIDTH - MARGIN_RIGHT) as f32;
        let plot_top = MARGIN_TOP as f32;
        let plot_bottom = (CHART_HEIGHT - MARGIN_BOTTOM) as f32;
        let plot_height = plot_bottom - plot_top;
        let axis_max = spec.axis_max();

        // Horizontal grid with tick labels
        for i in 1..=GRID_LINES {
            let fraction = i as f32 / GRID_LINES as f32;
            let y = plot_bottom - plot_height * fraction;
            draw_line_segment_mut(&mut image, (plot_left, y), (plot_right, y), GRID_COLOR);
            let tick = spec.format_value(axis_max * fraction as f64);
            self.draw_right_aligned(&mut image, &tick, plot_left - 8.0, y - TICK_SCALE / 2.0);
        }

        draw_line_segment_mut(&mut image, (plot_left, plot_top), (plot_left, plot_bottom), AXIS_COLOR);
        draw_line_segment_mut(
            &mut image,
            (plot_left, plot_bottom),
            (plot_right, plot_bottom),
            AXIS_COLOR,
        );

        // Bars, translucent over the background
        let bar_color = blend(spec.color, BACKGROUND, BAR_ALPHA);
        let slot = (plot_right - plot_left) / spec.bars.len().max(1) as f32;
        let bar_width = (slot * BAR_FILL).max(1.0);

        for (i, (name, value)) in spec.bars.iter().enumerate() {
            let center_x = plot_left + slot * (i as f32 + 0.5);
            let height = ((value.max(0.0) / axis_max) as f32 * plot_height).round();
            let top = plot_bottom - height;

            if height >= 1.0 {
                let rect = Rect::at((center_x - bar_width / 2.0).round() as i32, top.round() as i32)
                    .of_size(bar_width.round().max(1.0) as u32, height as u32);
                draw_filled_rect_mut(&mut image, rect, bar_color);
            }

            self.draw_centered(
                &mut image,
                &spec.format_value(*value),
                center_x,
                top - LABEL_SCALE - 4.0,
                LABEL_SCALE,
            );
            self.draw_centered(&mut image, name, center_x, plot_bottom + 8.0, LABEL_SCALE);
        }

        self.draw_centered(
            &mut image,
            &spec.title,
            CHART_WIDTH as f32 / 2.0,
            (MARGIN_TOP as f32 - TITLE_SCALE) / 2.0,
            TITLE_SCALE,
        );

        image
    }

    /// Draw and save every chart for `report`, returning the PNG paths
    pub fn render(&self, report: &SimulationReport) -> SimResult<Vec<PathBuf>> {
        fs::create_dir_all(&self.output_dir)?;
        let mut written = Vec::new();

        for spec in ChartSpec::for_report(report) {
            let image = self.draw(&spec);
            let png_path = self.output_dir.join(format!("{}.png", spec.file_stem));
            image.save(&png_path)?;
            fs::write(png_path.with_extension("txt"), spec.data_lines())?;
            debug!("Saved {}", png_path.display());
            written.push(png_path);
        }

        Ok(written)
    }

    fn draw_centered(&self, image: &mut RgbImage, text: &str, center_x: f32, y: f32, scale: f32) {
        let Some(font) = &self.font else {
            return;
        };
        let scale = PxScale::from(scale);
        let (width, _) = text_size(scale, font, text);
        let x = (center_x - width as f32 / 2.0).round() as i32;
        draw_text_mut(image, TEXT_COLOR, x, y.round() as i32, scale, font, text);
    }

    fn draw_right_aligned(&self, image: &mut RgbImage, text: &str, right_x: f32, y: f32) {
        let Some(font) = &self.font else {
            return;
        };
        let scale = PxScale::from(TICK_SCALE);
        let (width, _) = text_size(scale, font, text);
        let x = (right_x - width as f32).round() as i32;
        draw_text_mut(image, TEXT_COLOR, x, y.round() as i32, scale, font, text);
    }
}

fn bars(report: &SimulationReport, metric: impl Fn(&ParticipantStats) -> f64) -> Vec<(String, f64)> {
    report
        .participants
        .values()
        .map(|stats| (stats.name.clone(), metric(stats)))
        .collect()
}

/// Alpha-blend `fg` over `bg`
fn blend(fg: Rgb<u8>, bg: Rgb<u8>, alpha: f32) -> Rgb<u8> {
    let mix = |f: u8, b: u8| (f as f32 * alpha + b as f32 * (1.0 - alpha)).round() as u8;
    Rgb([mix(fg[0], bg[0]), mix(fg[1], bg[1]), mix(fg[2], bg[2])])
}
