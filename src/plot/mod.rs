use crate::domain::model::ChartKind;
use crate::utils::error::{Result, StatsError};
use plotters::coord::ranged1d::SegmentValue;
use plotters::prelude::*;
use std::io::Cursor;

// 12x8 inches at 100 dpi.
const WIDTH: u32 = 1200;
const HEIGHT: u32 = 800;
const HISTOGRAM_BINS: usize = 30;

const CAPTION_FONT: (&str, u32) = ("sans-serif", 30);

fn chart_err<E: std::fmt::Display>(e: E) -> StatsError {
    StatsError::ChartError {
        message: e.to_string(),
    }
}

/// Rasterize a chart to PNG bytes. The caller decides where they go.
pub fn render(kind: &ChartKind) -> Result<Vec<u8>> {
    let mut buffer = vec![0u8; (WIDTH * HEIGHT * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        match kind {
            ChartKind::Histogram { values, variable } => draw_histogram(&root, values, variable)?,
            ChartKind::Scatter { points, x, y } => draw_scatter(&root, points, x, y)?,
            ChartKind::GroupedBar { groups, x, y } => draw_grouped_bar(&root, groups, x, y)?,
            ChartKind::Line { points, x, y } => draw_line(&root, points, x, y)?,
        }

        root.present().map_err(chart_err)?;
    }
    encode_png(buffer)
}

type Area<'a> = DrawingArea<BitMapBackend<'a>, plotters::coord::Shift>;

fn draw_histogram(root: &Area<'_>, values: &[f64], variable: &str) -> Result<()> {
    if values.is_empty() {
        return Err(StatsError::ProcessingError {
            message: format!("no data to plot for variable '{}'", variable),
        });
    }

    let (min, max) = padded_bounds(values, 0.0);
    let bin_width = (max - min) / HISTOGRAM_BINS as f64;
    let mut counts = vec![0u32; HISTOGRAM_BINS];
    for v in values {
        let idx = (((v - min) / bin_width) as usize).min(HISTOGRAM_BINS - 1);
        counts[idx] += 1;
    }
    let y_max = counts.iter().copied().max().unwrap_or(0) + 1;

    let mut chart = ChartBuilder::on(root)
        .caption(format!("Histogram - Variable: {}", variable), CAPTION_FONT)
        .margin(20)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(min..max, 0u32..y_max)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_desc(variable)
        .y_desc("Frequency")
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(counts.iter().enumerate().map(|(i, count)| {
            let x0 = min + i as f64 * bin_width;
            let x1 = x0 + bin_width;
            Rectangle::new([(x0, 0), (x1, *count)], BLUE.mix(0.6).filled())
        }))
        .map_err(chart_err)?;

    Ok(())
}

fn draw_scatter(root: &Area<'_>, points: &[(f64, f64)], x: &str, y: &str) -> Result<()> {
    let (x_range, y_range) = point_ranges(points, x, y)?;

    let mut chart = ChartBuilder::on(root)
        .caption(format!("Scatter - Variables: {},{}", x, y), CAPTION_FONT)
        .margin(20)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_desc(x)
        .y_desc(y)
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(
            points
                .iter()
                .map(|(px, py)| Circle::new((*px, *py), 3, BLUE.filled())),
        )
        .map_err(chart_err)?;

    Ok(())
}

fn draw_grouped_bar(root: &Area<'_>, groups: &[(String, f64)], x: &str, y: &str) -> Result<()> {
    if groups.is_empty() {
        return Err(StatsError::ProcessingError {
            message: format!("no groups to plot for variable '{}'", x),
        });
    }

    let lo = groups.iter().map(|(_, v)| *v).fold(f64::INFINITY, f64::min);
    let hi = groups
        .iter()
        .map(|(_, v)| *v)
        .fold(f64::NEG_INFINITY, f64::max);
    let span = (hi - lo).abs().max(1.0);
    let mut y_min = if lo < 0.0 { lo - span * 0.05 } else { 0.0 };
    let mut y_max = if hi > 0.0 { hi + span * 0.05 } else { 0.0 };
    if (y_max - y_min).abs() < f64::EPSILON {
        y_min -= 0.5;
        y_max += 0.5;
    }

    let mut chart = ChartBuilder::on(root)
        .caption(format!("Average {} grouped by {}", y, x), CAPTION_FONT)
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d((0u32..groups.len() as u32).into_segmented(), y_min..y_max)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(groups.len())
        .x_label_formatter(&|segment| match segment {
            SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => groups
                .get(*i as usize)
                .map(|(key, _)| key.clone())
                .unwrap_or_default(),
            SegmentValue::Last => String::new(),
        })
        .x_desc(x)
        .y_desc(format!("Average {}", y))
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(groups.iter().enumerate().map(|(i, (_, value))| {
            Rectangle::new(
                [
                    (SegmentValue::Exact(i as u32), 0.0),
                    (SegmentValue::Exact(i as u32 + 1), *value),
                ],
                BLUE.mix(0.6).filled(),
            )
        }))
        .map_err(chart_err)?;

    Ok(())
}

fn draw_line(root: &Area<'_>, points: &[(f64, f64)], x: &str, y: &str) -> Result<()> {
    let (x_range, y_range) = point_ranges(points, x, y)?;

    let mut chart = ChartBuilder::on(root)
        .caption(format!("Two Variables - {},{}", x, y), CAPTION_FONT)
        .margin(20)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_desc(x)
        .y_desc(y)
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(LineSeries::new(points.iter().copied(), &BLUE))
        .map_err(chart_err)?;

    Ok(())
}

fn point_ranges(
    points: &[(f64, f64)],
    x: &str,
    y: &str,
) -> Result<(std::ops::Range<f64>, std::ops::Range<f64>)> {
    if points.is_empty() {
        return Err(StatsError::ProcessingError {
            message: format!("no data points to plot for variables '{},{}'", x, y),
        });
    }
    let xs: Vec<f64> = points.iter().map(|(px, _)| *px).collect();
    let ys: Vec<f64> = points.iter().map(|(_, py)| *py).collect();
    let (x_min, x_max) = padded_bounds(&xs, 0.05);
    let (y_min, y_max) = padded_bounds(&ys, 0.05);
    Ok((x_min..x_max, y_min..y_max))
}

/// Min/max of the values, widened by `pad` of the span on each side. A
/// zero-span input widens by half a unit so the axis never degenerates.
fn padded_bounds(values: &[f64], pad: f64) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        min = min.min(*v);
        max = max.max(*v);
    }
    if (max - min).abs() < f64::EPSILON {
        return (min - 0.5, max + 0.5);
    }
    let span = max - min;
    (min - span * pad, max + span * pad)
}

fn encode_png(rgb: Vec<u8>) -> Result<Vec<u8>> {
    let img = image::RgbImage::from_raw(WIDTH, HEIGHT, rgb).ok_or_else(|| StatsError::ChartError {
        message: "pixel buffer does not match chart dimensions".to_string(),
    })?;
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .map_err(chart_err)?;
    Ok(out.into_inner())
}
