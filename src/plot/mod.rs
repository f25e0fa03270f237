/// Plot layer: batch rendering of spectrum charts to PNG.
///
/// `spectrum` renders one dataset (levels and gaps), `compare` overlays an
/// MPS dataset with an exact-diagonalisation reference. Both build series
/// lists and hand them to the shared line-chart renderer below.
pub mod compare;
pub mod spectrum;

use std::path::Path;

use anyhow::{anyhow, Result};
use plotters::chart::{ChartContext, SeriesLabelPosition};
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;

// ---------------------------------------------------------------------------
// Series description
// ---------------------------------------------------------------------------

/// Marker drawn on each data point of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Cross,
    Circle,
}

/// One labelled line on a chart.
pub struct Series {
    pub name: String,
    pub color: RGBColor,
    pub marker: Marker,
    pub points: Vec<(f64, f64)>,
}

/// A complete chart: caption, axis labels, optional x clamp, and the series
/// to draw. The y range is derived from the data inside the x window.
pub struct SeriesPlot {
    pub caption: String,
    pub x_desc: String,
    pub y_desc: String,
    pub x_window: Option<(f64, f64)>,
    pub series: Vec<Series>,
}

// ---------------------------------------------------------------------------
// Shared renderer
// ---------------------------------------------------------------------------

const MARKER_SIZE: i32 = 5;

/// Render a labelled multi-series line chart to `path`.
pub fn render_line_chart(path: &Path, size: (u32, u32), plot: &SeriesPlot) -> Result<()> {
    draw(path, size, plot).map_err(|e| anyhow!("rendering {}: {e}", path.display()))
}

fn draw(
    path: &Path,
    size: (u32, u32),
    plot: &SeriesPlot,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let ((x_min, x_max), (y_min, y_max)) = axis_ranges(plot);

    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&plot.caption, ("sans-serif", 40))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(90)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc(&plot.x_desc)
        .y_desc(&plot.y_desc)
        .label_style(("sans-serif", 24))
        .axis_desc_style(("sans-serif", 28))
        .draw()?;

    draw_series_set(&mut chart, &plot.series)?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(("sans-serif", 26))
        .draw()?;

    root.present()?;
    Ok(())
}

/// Draw lines, point markers and legend entries for every series. Attaching
/// labels stores them on the chart; rendering the legend box is left to the
/// caller.
fn draw_series_set<'a, DB: DrawingBackend + 'a>(
    chart: &mut ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    series: &[Series],
) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    for s in series {
        let color = s.color;
        chart
            .draw_series(LineSeries::new(s.points.iter().copied(), color.stroke_width(2)))?
            .label(s.name.as_str())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 24, y)], color.stroke_width(2))
            });

        match s.marker {
            Marker::Cross => {
                chart.draw_series(
                    s.points
                        .iter()
                        .map(|&p| Cross::new(p, MARKER_SIZE, color.stroke_width(2))),
                )?;
            }
            Marker::Circle => {
                chart.draw_series(
                    s.points
                        .iter()
                        .map(|&p| Circle::new(p, MARKER_SIZE, color.filled())),
                )?;
            }
        }
    }
    Ok(())
}

/// Data-driven axis ranges: the x window when given, otherwise the data
/// span; the y span of the points inside the x window. Both padded so
/// markers stay clear of the frame.
fn axis_ranges(plot: &SeriesPlot) -> ((f64, f64), (f64, f64)) {
    let (x_lo, x_hi) = plot.x_window.unwrap_or_else(|| {
        span(
            plot.series
                .iter()
                .flat_map(|s| s.points.iter().map(|&(x, _)| x)),
        )
    });

    let (y_lo, y_hi) = span(
        plot.series
            .iter()
            .flat_map(|s| s.points.iter())
            .filter(|&&(x, _)| x >= x_lo && x <= x_hi)
            .map(|&(_, y)| y),
    );

    let x_pad = pad((x_lo, x_hi));
    let y_pad = pad((y_lo, y_hi));
    ((x_lo - x_pad, x_hi + x_pad), (y_lo - y_pad, y_hi + y_pad))
}

fn span(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for v in values {
        if v.is_finite() {
            lo = lo.min(v);
            hi = hi.max(v);
        }
    }
    if lo > hi {
        (0.0, 1.0)
    } else {
        (lo, hi)
    }
}

fn pad(range: (f64, f64)) -> f64 {
    let width = range.1 - range.0;
    if width.abs() < f64::EPSILON {
        0.5
    } else {
        width * 0.05
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_ranges_follow_data_with_padding() {
        let plot = SeriesPlot {
            caption: String::new(),
            x_desc: String::new(),
            y_desc: String::new(),
            x_window: None,
            series: vec![Series {
                name: "s".into(),
                color: RGBColor(0, 0, 0),
                marker: Marker::Cross,
                points: vec![(0.0, -2.0), (1.0, 2.0)],
            }],
        };
        let ((x_lo, x_hi), (y_lo, y_hi)) = axis_ranges(&plot);
        assert!(x_lo < 0.0 && x_hi > 1.0);
        assert!(y_lo < -2.0 && y_hi > 2.0);
    }

    #[test]
    fn x_window_clamps_the_y_scan() {
        let plot = SeriesPlot {
            caption: String::new(),
            x_desc: String::new(),
            y_desc: String::new(),
            x_window: Some((0.0, 1.0)),
            series: vec![Series {
                name: "s".into(),
                color: RGBColor(0, 0, 0),
                marker: Marker::Cross,
                points: vec![(0.0, 0.0), (1.0, 1.0), (5.0, 100.0)],
            }],
        };
        let (_, (_, y_hi)) = axis_ranges(&plot);
        assert!(y_hi < 10.0, "outlier outside the window must not stretch y");
    }

    #[test]
    fn series_render_to_a_nonempty_png() {
        let path = std::env::temp_dir().join("gapplot_render_smoke.png");
        let _ = std::fs::remove_file(&path);
        let series = vec![Series {
            name: "E0".into(),
            color: RGBColor(200, 30, 30),
            marker: Marker::Cross,
            points: vec![(0.0, 0.0), (0.5, 0.25), (1.0, 1.0)],
        }];
        {
            let root = BitMapBackend::new(&path, (320, 240)).into_drawing_area();
            root.fill(&WHITE).unwrap();
            let mut chart = ChartBuilder::on(&root)
                .build_cartesian_2d(-0.1f64..1.1f64, -0.1f64..1.1f64)
                .unwrap();
            draw_series_set(&mut chart, &series).unwrap();
            root.present().unwrap();
        }
        let meta = std::fs::metadata(&path).unwrap();
        assert!(meta.len() > 0);
    }
}
