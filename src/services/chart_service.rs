use std::fmt::Display;
use std::path::Path;

use plotters::prelude::*;
use plotters::style::FontTransform;

use crate::models::chart::{LegendPosition, Rgb};
use crate::models::ChartConfig;
use crate::utils::{smooth_path, ChartError};

/// Interpolated samples drawn between two neighbouring data points
const SMOOTHING_STEPS: usize = 12;

/// Upper bound on x-axis labels so dates stay readable
const MAX_X_LABELS: usize = 10;

fn render_error<E: Display>(e: E) -> ChartError {
    ChartError::Render(e.to_string())
}

fn to_color(rgb: Rgb) -> RGBColor {
    RGBColor(rgb.r, rgb.g, rgb.b)
}

fn legend_anchor(position: LegendPosition) -> SeriesLabelPosition {
    match position {
        LegendPosition::Top => SeriesLabelPosition::UpperMiddle,
    }
}

/// Y-axis bounds with 10% padding around the values
///
/// Unless `begin_at_zero` is set, the axis hugs the data instead of
/// starting at zero. A flat series still gets a visible band.
pub fn value_range(values: &[f64], begin_at_zero: bool) -> (f64, f64) {
    let min_value = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max_value = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if !min_value.is_finite() || !max_value.is_finite() {
        return (0.0, 1.0);
    }

    let spread = max_value - min_value;
    let padding = if spread > 0.0 {
        spread * 0.1
    } else {
        (max_value.abs() * 0.05).max(1e-8)
    };

    let y_min = if begin_at_zero {
        0.0_f64.min(min_value)
    } else if min_value >= 0.0 {
        (min_value - padding).max(0.0)
    } else {
        min_value - padding
    };

    (y_min, max_value + padding)
}

/// Label for an x coordinate, blank between data points
pub fn label_at(labels: &[String], x: f64) -> String {
    let index = x.round();
    if (x - index).abs() > 1e-6 || index < 0.0 {
        return String::new();
    }
    labels.get(index as usize).cloned().unwrap_or_default()
}

/// Render a line chart config as a PNG at `path`
///
/// An empty series still produces the axes and legend.
pub fn render_chart(
    path: &Path,
    config: &ChartConfig,
    width: u32,
    height: u32,
) -> Result<(), ChartError> {
    let dataset = config.data.datasets.first().ok_or(ChartError::NoDataset)?;

    let points: Vec<(f64, f64)> = dataset
        .data
        .iter()
        .enumerate()
        .map(|(i, &price)| (i as f64, price))
        .collect();
    let curve = smooth_path(&points, dataset.tension, SMOOTHING_STEPS);

    let curve_values: Vec<f64> = curve.iter().map(|&(_, y)| y).collect();
    let (y_min, y_max) = value_range(&curve_values, config.options.scales.y.begin_at_zero);
    let x_max = points.len().saturating_sub(1).max(1) as f64;

    let labels = &config.data.labels;

    // Plotters only rotates text by right angles
    let rotated = config.options.scales.x.ticks.max_rotation > 0;
    let x_label_transform = if rotated {
        FontTransform::Rotate90
    } else {
        FontTransform::None
    };

    let backend = BitMapBackend::new(path, (width, height));
    let root = backend.into_drawing_area();
    root.fill(&WHITE).map_err(render_error)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(15)
        .x_label_area_size(if rotated { 80 } else { 40 })
        .y_label_area_size(80)
        .build_cartesian_2d(0f64..x_max, y_min..y_max)
        .map_err(render_error)?;

    chart
        .configure_mesh()
        .x_labels(labels.len().min(MAX_X_LABELS))
        .x_label_formatter(&|x| label_at(labels, *x))
        .x_label_style(("sans-serif", 12).into_font().transform(x_label_transform))
        .y_label_formatter(&|y| config.y_tick_label(*y))
        .draw()
        .map_err(render_error)?;

    let border = to_color(dataset.border_color);
    let background = to_color(dataset.background_color.rgb).mix(dataset.background_color.alpha);
    let border_style = border.stroke_width(dataset.border_width);

    let series = if dataset.fill {
        chart.draw_series(
            AreaSeries::new(curve.iter().copied(), y_min, background.filled())
                .border_style(border_style),
        )
    } else {
        chart.draw_series(LineSeries::new(curve.iter().copied(), border_style))
    }
    .map_err(render_error)?;

    series
        .label(dataset.label.as_str())
        .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], border.filled()));

    let legend = &config.options.plugins.legend;
    if legend.display {
        chart
            .configure_series_labels()
            .position(legend_anchor(legend.position))
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(render_error)?;
    }

    root.present().map_err(render_error)?;

    Ok(())
}
