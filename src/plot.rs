//! PNG rendering of the decay curve figure

use std::fs;
use std::path::Path;

use plotters::prelude::*;

use crate::curve::Curve;
use crate::params::CurveParams;
use crate::CurveError;

/// Image size in pixels
pub const FIGURE_SIZE: (u32, u32) = (700, 500);

pub const X_LABEL: &str = "Time";
pub const Y_LABEL: &str = "y(t)";
pub const MARKER_LABEL: &str = "SCDC(t0, y0)";

const MARKER_RADIUS: i32 = 4;

fn plot_err(err: impl std::fmt::Display) -> CurveError {
    CurveError::Plot(err.to_string())
}

/// Draw the rendered series with the annotation marker and the dashed
/// reference lines through it, and write it as PNG to `path`.
pub fn render_png(curve: &Curve, params: &CurveParams, path: &Path) -> Result<(), CurveError> {
    if curve.is_empty() {
        return Err(CurveError::Plot("nothing to draw".to_string()));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let root = BitMapBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let (ax, ay) = curve.annotation;
    let x_min = params.t_start;
    let x_max = params.t_end;
    let (lo, hi) = curve.rendered_range().unwrap_or((ay, 1.0));
    let lo = lo.min(ay);
    let hi = hi.max(ay);
    let pad = 0.05 * (hi - lo).max(f64::EPSILON);
    let (y_min, y_max) = (lo - pad, hi + pad);

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .x_label_area_size(45)
        .y_label_area_size(55)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc(X_LABEL)
        .y_desc(Y_LABEL)
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(LineSeries::new(
            curve.time.iter().copied().zip(curve.rendered.iter().copied()),
            &BLUE,
        ))
        .map_err(plot_err)?;

    let guide = BLACK.mix(0.6).stroke_width(1);
    chart
        .draw_series(DashedLineSeries::new(
            vec![(x_min, ay), (x_max, ay)],
            6,
            4,
            guide,
        ))
        .map_err(plot_err)?;
    chart
        .draw_series(DashedLineSeries::new(
            vec![(ax, y_min), (ax, y_max)],
            6,
            4,
            guide,
        ))
        .map_err(plot_err)?;

    chart
        .draw_series(std::iter::once(
            EmptyElement::at((ax, ay))
                + Circle::new((0, 0), MARKER_RADIUS, BLACK.filled())
                + Text::new(
                    MARKER_LABEL,
                    (MARKER_RADIUS + 2, -MARKER_RADIUS - 16),
                    ("sans-serif", 15).into_font(),
                ),
        ))
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    Ok(())
}
