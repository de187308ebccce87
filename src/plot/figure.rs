//! SVG figures with a daily time axis.

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Utc};
use plotters::prelude::*;
use std::fmt;
use std::path::Path;

/// matplotlib's `tab:blue`.
pub const TAB_BLUE: RGBColor = RGBColor(0x1f, 0x77, 0xb4);
/// matplotlib's `tab:orange`.
pub const TAB_ORANGE: RGBColor = RGBColor(0xff, 0x7f, 0x0e);
/// matplotlib's `tab:cyan`.
pub const TAB_CYAN: RGBColor = RGBColor(0x17, 0xbe, 0xcf);

const SECONDS_PER_DAY: f64 = 86_400.0;
const FONT: &str = "sans-serif";

/// Legend corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LegendPosition {
    UpperLeft,
    #[default]
    UpperRight,
    LowerLeft,
    LowerRight,
}

impl LegendPosition {
    fn to_plotters(self) -> SeriesLabelPosition {
        match self {
            LegendPosition::UpperLeft => SeriesLabelPosition::UpperLeft,
            LegendPosition::UpperRight => SeriesLabelPosition::UpperRight,
            LegendPosition::LowerLeft => SeriesLabelPosition::LowerLeft,
            LegendPosition::LowerRight => SeriesLabelPosition::LowerRight,
        }
    }
}

/// Pixel size and font sizes of a figure.
#[derive(Debug, Clone, PartialEq)]
pub struct FigureConfig {
    pub width: u32,
    pub height: u32,
    pub title_font_size: u32,
    /// Axis description size.
    pub label_font_size: u32,
    pub tick_font_size: u32,
    pub legend_font_size: u32,
    pub legend_position: LegendPosition,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self::arima()
    }
}

impl FigureConfig {
    /// 1000x600, 16pt title and labels, 14pt ticks, 12pt legend.
    pub fn arima() -> Self {
        Self {
            width: 1000,
            height: 600,
            title_font_size: 16,
            label_font_size: 16,
            tick_font_size: 14,
            legend_font_size: 12,
            legend_position: LegendPosition::UpperRight,
        }
    }

    /// Like [`FigureConfig::arima`] with 16pt ticks and legend.
    pub fn arima_zoomed() -> Self {
        Self {
            tick_font_size: 16,
            legend_font_size: 16,
            ..Self::arima()
        }
    }

    /// 1000x800 with every font at 16pt.
    pub fn test_predictions() -> Self {
        Self {
            width: 1000,
            height: 800,
            title_font_size: 16,
            label_font_size: 16,
            tick_font_size: 16,
            legend_font_size: 16,
            legend_position: LegendPosition::UpperLeft,
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_legend_position(mut self, position: LegendPosition) -> Self {
        self.legend_position = position;
        self
    }
}

/// A rendered SVG chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    title: String,
    size: (u32, u32),
    svg: String,
}

impl Figure {
    pub fn title(&self) -> &str {
        &self.title
    }

    /// `(width, height)` in pixels.
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// The SVG document.
    pub fn svg(&self) -> &str {
        &self.svg
    }

    pub fn into_svg(self) -> String {
        self.svg
    }

    /// Write the SVG document to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, &self.svg)?;
        tracing::debug!(path = %path.display(), title = %self.title, "figure saved");
        Ok(())
    }
}

impl fmt::Display for Figure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.svg)
    }
}

/// One line on a chart.
#[derive(Debug, Clone)]
pub(crate) struct Layer {
    pub label: String,
    /// `(days since epoch, value)` pairs.
    pub points: Vec<(f64, f64)>,
    pub color: RGBColor,
    pub width: u32,
}

impl Layer {
    pub fn new(
        label: impl Into<String>,
        timestamps: &[DateTime<Utc>],
        values: &[f64],
        color: RGBColor,
        width: u32,
    ) -> Self {
        Self {
            label: label.into(),
            points: timestamps
                .iter()
                .map(|ts| to_days(*ts))
                .zip(values.iter().copied())
                .collect(),
            color,
            width,
        }
    }
}

/// Axis text of a chart.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Labels<'a> {
    pub title: &'a str,
    pub x: &'a str,
    pub y: &'a str,
}

/// Time position as fractional days since the Unix epoch.
pub(crate) fn to_days(ts: DateTime<Utc>) -> f64 {
    ts.timestamp_millis() as f64 / (SECONDS_PER_DAY * 1000.0)
}

fn font(size: u32) -> FontDesc<'static> {
    (FONT, f64::from(size)).into_font()
}

fn format_day(days: f64) -> String {
    DateTime::from_timestamp((days * SECONDS_PER_DAY).round() as i64, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Smallest `(min, max)` covering every finite value, padded by 5%.
pub(crate) fn fit_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo > hi {
        return None;
    }
    let pad = if hi - lo > 0.0 { (hi - lo) * 0.05 } else { 0.5 };
    Some((lo - pad, hi + pad))
}

/// Split `points` into drawable runs, breaking at non-finite values and
/// at points outside the visible window.
pub(crate) fn visible_segments(
    points: &[(f64, f64)],
    x_range: (f64, f64),
    y_range: (f64, f64),
) -> Vec<Vec<(f64, f64)>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();

    for &(x, y) in points {
        let visible = x.is_finite()
            && y.is_finite()
            && (x_range.0..=x_range.1).contains(&x)
            && (y_range.0..=y_range.1).contains(&y);
        if visible {
            current.push((x, y));
        } else if !current.is_empty() {
            segments.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

/// Render `layers` into an SVG figure.
pub(crate) fn render(
    config: &FigureConfig,
    labels: Labels<'_>,
    layers: &[Layer],
    x_range: (f64, f64),
    y_range: (f64, f64),
) -> Result<Figure> {
    let mut svg = String::new();
    draw(&mut svg, config, labels, layers, x_range, y_range)
        .map_err(|e| ForecastError::PlotError(e.to_string()))?;

    tracing::debug!(title = labels.title, layers = layers.len(), "figure rendered");

    Ok(Figure {
        title: labels.title.to_string(),
        size: (config.width, config.height),
        svg,
    })
}

fn draw(
    svg: &mut String,
    config: &FigureConfig,
    labels: Labels<'_>,
    layers: &[Layer],
    x_range: (f64, f64),
    y_range: (f64, f64),
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let root = SVGBackend::with_string(svg, (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(labels.title, font(config.title_font_size))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(x_range.0..x_range.1, y_range.0..y_range.1)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc(labels.x)
        .y_desc(labels.y)
        .x_labels(8)
        .x_label_formatter(&|v| format_day(*v))
        .label_style(font(config.tick_font_size))
        .axis_desc_style(font(config.label_font_size))
        .draw()?;

    for layer in layers {
        let style = layer.color.stroke_width(layer.width);
        for (i, segment) in visible_segments(&layer.points, x_range, y_range)
            .into_iter()
            .enumerate()
        {
            let series = chart.draw_series(LineSeries::new(segment, style))?;
            if i == 0 {
                series
                    .label(layer.label.as_str())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
            }
        }
    }

    chart
        .configure_series_labels()
        .position(config.legend_position.to_plotters())
        .label_font(font(config.legend_font_size))
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}
