//! Chart export to PNG: plotters draws into an RGB buffer, `image` encodes it.

use std::fmt::Display;
use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, RgbImage};
use plotters::prelude::*;

use crate::color::bar_colors;
use crate::config::{ColumnMapping, ExportConfig};
use crate::data::filter::ChartSeries;
use crate::error::ExportError;

/// Smallest canvas that still fits caption, axis areas and bars.
const MIN_WIDTH: u32 = 200;
const MIN_HEIGHT: u32 = 150;
/// Half the width of a bar, in slot units.
const BAR_HALF: f64 = 0.3;

/// Output size and texts of the exported chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
}

impl ExportOptions {
    /// Axis titles follow the source column names, e.g. "Integridad Académica
    /// por Licenciatura".
    pub fn from_config(export: &ExportConfig, columns: &ColumnMapping) -> Self {
        Self {
            width: export.width,
            height: export.height,
            title: format!("{} por {}", columns.score, columns.program),
            x_label: columns.program.clone(),
            y_label: columns.score.clone(),
        }
    }
}

fn draw_error(e: impl Display) -> ExportError {
    ExportError::Draw(e.to_string())
}

/// Value range of the y axis: always includes zero so bars have a baseline.
fn y_bounds(series: &ChartSeries) -> (f64, f64) {
    let (lo, hi) = series
        .points
        .iter()
        .fold((0.0_f64, 0.0_f64), |(lo, hi), p| (lo.min(p.score), hi.max(p.score)));
    if hi > lo {
        // Headroom above the tallest bar.
        (lo, hi + (hi - lo) * 0.05)
    } else {
        (lo, lo + 1.0)
    }
}

/// Label for an x tick: the bar's program when the tick sits on a bar centre.
pub(crate) fn label_at(labels: &[String], v: f64) -> String {
    let idx = v.round();
    if (v - idx).abs() < 1e-6 && idx >= 0.0 {
        labels.get(idx as usize).cloned().unwrap_or_default()
    } else {
        String::new()
    }
}

/// Draw `series` as a bar chart into an RGB buffer of `width * height * 3` bytes.
fn draw_bars(
    buffer: &mut [u8],
    series: &ChartSeries,
    options: &ExportOptions,
) -> Result<(), ExportError> {
    let root = BitMapBackend::with_buffer(buffer, (options.width, options.height))
        .into_drawing_area();
    root.fill(&WHITE).map_err(draw_error)?;

    let n = series.len();
    let x_min = -0.5;
    let x_max = n as f64 - 0.5;
    let (y_min, y_max) = y_bounds(series);
    let centers: Vec<f64> = (0..n).map(|i| i as f64).collect();

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption(options.title.as_str(), ("sans-serif", 20))
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d((x_min..x_max).with_key_points(centers), y_min..y_max)
        .map_err(draw_error)?;

    let labels: Vec<String> = series.points.iter().map(|p| p.label.clone()).collect();
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .x_desc(options.x_label.as_str())
        .y_desc(options.y_label.as_str())
        .x_label_formatter(&|v: &f64| label_at(&labels, *v))
        .draw()
        .map_err(draw_error)?;

    let colors = bar_colors(n);
    chart
        .draw_series(series.points.iter().zip(colors).enumerate().map(
            |(i, (point, color))| {
                let x = i as f64;
                let fill = RGBColor(color.r(), color.g(), color.b());
                Rectangle::new([(x - BAR_HALF, 0.0), (x + BAR_HALF, point.score)], fill.filled())
            },
        ))
        .map_err(draw_error)?;

    root.present().map_err(draw_error)?;
    Ok(())
}

/// Render `series` as a bar chart and return the PNG bytes.
pub fn render_png(series: &ChartSeries, options: &ExportOptions) -> Result<Vec<u8>, ExportError> {
    if series.is_empty() {
        return Err(ExportError::EmptySeries);
    }
    let (width, height) = (options.width, options.height);
    if width < MIN_WIDTH || height < MIN_HEIGHT {
        return Err(ExportError::InvalidSize { width, height });
    }

    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    draw_bars(&mut buffer, series, options)?;

    let img = RgbImage::from_raw(width, height, buffer)
        .ok_or(ExportError::InvalidSize { width, height })?;
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)?;
    log::debug!("Rendered {}x{} PNG with {} bars", width, height, series.len());
    Ok(out.into_inner())
}

/// Write PNG bytes to disk.
pub fn write_png(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    std::fs::write(path, bytes).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Saved chart to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::ChartPoint;

    fn series(label: &str, scores: &[f64]) -> ChartSeries {
        ChartSeries {
            points: scores
                .iter()
                .map(|&score| ChartPoint {
                    label: label.to_string(),
                    score,
                })
                .collect(),
        }
    }

    fn options() -> ExportOptions {
        ExportOptions::from_config(&ExportConfig::default(), &ColumnMapping::default())
    }

    #[test]
    fn options_use_column_names_for_texts() {
        let opts = options();
        assert_eq!(opts.title, "Integridad Académica por Licenciatura");
        assert_eq!(opts.x_label, "Licenciatura");
        assert_eq!(opts.y_label, "Integridad Académica");
        assert_eq!((opts.width, opts.height), (640, 480));
    }

    #[test]
    fn renders_png_of_requested_size() {
        let bytes = render_png(&series("Derecho", &[80.0, 90.0]), &options()).unwrap();
        assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]));

        let img = image::load_from_memory_with_format(&bytes, ImageFormat::Png).unwrap();
        assert_eq!((img.width(), img.height()), (640, 480));
    }

    #[test]
    fn program_labels_are_drawn() {
        let derecho = render_png(&series("Derecho", &[80.0, 90.0]), &options()).unwrap();
        let medicina = render_png(&series("Medicina", &[80.0, 90.0]), &options()).unwrap();
        assert_ne!(derecho, medicina);
    }

    #[test]
    fn title_is_drawn() {
        let scores = series("Derecho", &[80.0]);
        let plain = render_png(&scores, &options()).unwrap();
        let mut retitled = options();
        retitled.title = "Otra gráfica".to_string();
        assert_ne!(plain, render_png(&scores, &retitled).unwrap());
    }

    #[test]
    fn single_bar_uses_sky_blue() {
        let bytes = render_png(&series("Derecho", &[50.0]), &options()).unwrap();
        let img = image::load_from_memory(&bytes).unwrap().to_rgb8();
        assert!(img.pixels().any(|p| p.0 == [135, 206, 235]));
    }

    #[test]
    fn negative_and_zero_scores_render() {
        assert!(render_png(&series("Derecho", &[0.0]), &options()).is_ok());
        assert!(render_png(&series("Derecho", &[-5.0, 10.0]), &options()).is_ok());
    }

    #[test]
    fn empty_series_is_rejected() {
        assert!(matches!(
            render_png(&ChartSeries::default(), &options()),
            Err(ExportError::EmptySeries)
        ));
    }

    #[test]
    fn tiny_canvas_is_rejected() {
        let mut opts = options();
        opts.width = 40;
        opts.height = 40;
        assert!(matches!(
            render_png(&series("Derecho", &[1.0]), &opts),
            Err(ExportError::InvalidSize { .. })
        ));
    }

    #[test]
    fn tick_labels_only_on_bar_centres() {
        let labels = vec!["Derecho".to_string(), "Medicina".to_string()];
        assert_eq!(label_at(&labels, 0.0), "Derecho");
        assert_eq!(label_at(&labels, 1.0), "Medicina");
        assert_eq!(label_at(&labels, 0.5), "");
        assert_eq!(label_at(&labels, 2.0), "");
        assert_eq!(label_at(&labels, -1.0), "");
    }

    #[test]
    fn write_png_persists_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grafica_integridad.png");
        write_png(&path, b"\x89PNG").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"\x89PNG");
    }
}
