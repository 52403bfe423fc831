// ABOUTME: Chart geometry for the slidecraft application
// ABOUTME: Maps bar, line and pie data onto drawing primitives for a fixed canvas

use crate::model::{BarSeries, LineSeries, Segment};

/// Colors used when a theme supplies an empty palette.
pub const DEFAULT_PALETTE: [&str; 6] = [
    "#6366f1", "#ec4899", "#14b8a6", "#f59e0b", "#8b5cf6", "#ef4444",
];

pub const NO_DATA_MESSAGE: &str = "No data";

/// Fixed drawing area for a chart, in SVG user units.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartCanvas {
    pub width: f64,
    pub height: f64,
    pub padding_top: f64,
    pub padding_right: f64,
    pub padding_bottom: f64,
    pub padding_left: f64,
    /// Horizontal gap between bars of the same group.
    pub bar_gap: f64,
    pub min_bar_width: f64,
}

impl Default for ChartCanvas {
    fn default() -> Self {
        Self::new(600.0, 320.0)
    }
}

impl ChartCanvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            padding_top: 20.0,
            padding_right: 20.0,
            padding_bottom: 40.0,
            padding_left: 50.0,
            bar_gap: 4.0,
            min_bar_width: 4.0,
        }
    }

    pub fn plot_left(&self) -> f64 {
        self.padding_left
    }

    pub fn plot_top(&self) -> f64 {
        self.padding_top
    }

    pub fn plot_width(&self) -> f64 {
        (self.width - self.padding_left - self.padding_right).max(0.0)
    }

    pub fn plot_height(&self) -> f64 {
        (self.height - self.padding_top - self.padding_bottom).max(0.0)
    }

    pub fn baseline(&self) -> f64 {
        self.plot_top() + self.plot_height()
    }
}

/// Picks palette colors by index, wrapping around.
#[derive(Debug, Clone)]
pub struct Palette<'a> {
    colors: &'a [String],
}

impl<'a> Palette<'a> {
    pub fn new(colors: &'a [String]) -> Self {
        Self { colors }
    }

    pub fn color(&self, index: usize) -> String {
        if self.colors.is_empty() {
            DEFAULT_PALETTE[index % DEFAULT_PALETTE.len()].to_string()
        } else {
            self.colors[index % self.colors.len()].clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: String,
    pub label: String,
    pub value: f64,
}

/// A text label anchored at a point.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisLabel {
    pub x: f64,
    pub y: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
    /// Share of the total, for pie charts.
    pub percent: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarGeometry {
    pub bars: Vec<Rect>,
    pub x_labels: Vec<AxisLabel>,
    pub y_labels: Vec<AxisLabel>,
    pub legend: Vec<LegendEntry>,
    /// Every value was zero; bars have no height.
    pub flat: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub name: String,
    pub color: String,
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineGeometry {
    pub lines: Vec<Polyline>,
    pub x_labels: Vec<AxisLabel>,
    pub y_labels: Vec<AxisLabel>,
    pub legend: Vec<LegendEntry>,
    pub flat: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Wedge {
    pub label: String,
    pub color: String,
    pub start_angle: f64,
    pub span: f64,
    pub large_arc: bool,
    /// SVG path data for the wedge.
    pub path: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieGeometry {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
    pub wedges: Vec<Wedge>,
    pub legend: Vec<LegendEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NoData {
    pub x: f64,
    pub y: f64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartGeometry {
    Bar(BarGeometry),
    Line(LineGeometry),
    Pie(PieGeometry),
    NoData(NoData),
}

fn no_data(canvas: &ChartCanvas) -> ChartGeometry {
    ChartGeometry::NoData(NoData {
        x: canvas.width / 2.0,
        y: canvas.height / 2.0,
        message: NO_DATA_MESSAGE.to_string(),
    })
}

/// Keys in first-seen order, without duplicates.
fn ordered_union<'a, I>(keys: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen: Vec<&str> = Vec::new();
    for key in keys {
        if !seen.contains(&key) {
            seen.push(key);
        }
    }
    seen
}

fn y_axis_labels(canvas: &ChartCanvas, max: f64) -> Vec<AxisLabel> {
    let x = canvas.plot_left() - 8.0;
    [0.0, 0.5, 1.0]
        .iter()
        .map(|fraction| AxisLabel {
            x,
            y: canvas.baseline() - fraction * canvas.plot_height(),
            text: format_number(max * fraction),
        })
        .collect()
}

fn scale_value(canvas: &ChartCanvas, value: f64, max: f64) -> f64 {
    if max <= 0.0 {
        0.0
    } else {
        value.max(0.0) / max * canvas.plot_height()
    }
}

/// Grouped bar chart geometry.
pub fn bar_geometry(series: &[BarSeries], canvas: &ChartCanvas, palette: &Palette) -> ChartGeometry {
    let labels = ordered_union(
        series
            .iter()
            .flat_map(|s| s.data.iter().map(|point| point.label.as_str())),
    );
    if series.is_empty() || labels.is_empty() {
        return no_data(canvas);
    }

    let max = series
        .iter()
        .flat_map(|s| s.data.iter().map(|point| point.value))
        .fold(0.0_f64, f64::max);

    let group_width = canvas.plot_width() / labels.len() as f64;
    let series_count = series.len() as f64;
    let bar_width = (group_width / series_count - canvas.bar_gap).max(canvas.min_bar_width);
    let cluster_width = bar_width * series_count + canvas.bar_gap * (series_count - 1.0);

    let mut bars = Vec::new();
    for (group, label) in labels.iter().enumerate() {
        let group_x = canvas.plot_left() + group as f64 * group_width;
        let offset = (group_width - cluster_width) / 2.0;
        for (index, s) in series.iter().enumerate() {
            let Some(point) = s.data.iter().find(|point| point.label == *label) else {
                continue;
            };
            let height = scale_value(canvas, point.value, max);
            bars.push(Rect {
                x: group_x + offset + index as f64 * (bar_width + canvas.bar_gap),
                y: canvas.baseline() - height,
                width: bar_width,
                height,
                color: palette.color(index),
                label: label.to_string(),
                value: point.value,
            });
        }
    }

    let x_labels = labels
        .iter()
        .enumerate()
        .map(|(group, label)| AxisLabel {
            x: canvas.plot_left() + (group as f64 + 0.5) * group_width,
            y: canvas.baseline() + 20.0,
            text: label.to_string(),
        })
        .collect();

    ChartGeometry::Bar(BarGeometry {
        bars,
        x_labels,
        y_labels: y_axis_labels(canvas, max),
        legend: legend_for(series.iter().map(|s| s.name.as_str()), palette),
        flat: max <= 0.0,
    })
}

/// Line chart geometry over the shared x-domain.
pub fn line_geometry(
    series: &[LineSeries],
    canvas: &ChartCanvas,
    palette: &Palette,
) -> ChartGeometry {
    let xs = ordered_union(
        series
            .iter()
            .flat_map(|s| s.data.iter().map(|point| point.x.as_str())),
    );
    if series.is_empty() || xs.is_empty() {
        return no_data(canvas);
    }

    let max = series
        .iter()
        .flat_map(|s| s.data.iter().map(|point| point.y))
        .fold(0.0_f64, f64::max);

    let step = if xs.len() > 1 {
        canvas.plot_width() / (xs.len() - 1) as f64
    } else {
        0.0
    };
    let x_at = |index: usize| {
        if xs.len() > 1 {
            canvas.plot_left() + index as f64 * step
        } else {
            canvas.plot_left() + canvas.plot_width() / 2.0
        }
    };

    let lines = series
        .iter()
        .enumerate()
        .map(|(index, s)| {
            let known: Vec<(usize, f64)> = s
                .data
                .iter()
                .filter_map(|point| {
                    xs.iter()
                        .position(|x| *x == point.x)
                        .map(|position| (position, point.y))
                })
                .collect();
            let points = interpolate(&known)
                .into_iter()
                .map(|(position, y)| (x_at(position), canvas.baseline() - scale_value(canvas, y, max)))
                .collect();
            Polyline {
                name: s.name.clone(),
                color: palette.color(index),
                points,
            }
        })
        .collect();

    let x_labels = xs
        .iter()
        .enumerate()
        .map(|(index, x)| AxisLabel {
            x: x_at(index),
            y: canvas.baseline() + 20.0,
            text: x.to_string(),
        })
        .collect();

    ChartGeometry::Line(LineGeometry {
        lines,
        x_labels,
        y_labels: y_axis_labels(canvas, max),
        legend: legend_for(series.iter().map(|s| s.name.as_str()), palette),
        flat: max <= 0.0,
    })
}

/// Fill every x-index between a series' first and last known point.
///
/// `known` holds `(x_index, y)` pairs in series order; the result is sorted by
/// x-index and contains one value per index in the covered span.
fn interpolate(known: &[(usize, f64)]) -> Vec<(usize, f64)> {
    let mut sorted = known.to_vec();
    sorted.sort_by_key(|(position, _)| *position);
    sorted.dedup_by_key(|(position, _)| *position);

    let mut filled = Vec::new();
    for pair in sorted.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        for position in x0..x1 {
            let t = (position - x0) as f64 / (x1 - x0) as f64;
            filled.push((position, y0 + (y1 - y0) * t));
        }
    }
    if let Some(last) = sorted.last() {
        filled.push(*last);
    }
    filled
}

/// Pie chart geometry, swept clockwise from 12 o'clock.
pub fn pie_geometry(segments: &[Segment], canvas: &ChartCanvas, palette: &Palette) -> ChartGeometry {
    let total: f64 = segments.iter().map(|segment| segment.value.max(0.0)).sum();
    if segments.is_empty() || total <= 0.0 {
        return no_data(canvas);
    }

    let cx = canvas.width / 2.0;
    let cy = canvas.height / 2.0;
    let radius = (canvas.width.min(canvas.height) / 2.0 - 10.0).max(1.0);

    let mut angle = -90.0_f64;
    let mut wedges = Vec::new();
    let mut legend = Vec::new();
    for (index, segment) in segments.iter().enumerate() {
        let value = segment.value.max(0.0);
        let span = value / total * 360.0;
        let color = palette.color(index);
        legend.push(LegendEntry {
            label: segment.label.clone(),
            color: color.clone(),
            percent: Some(value / total * 100.0),
        });
        if span > 0.0 {
            wedges.push(Wedge {
                label: segment.label.clone(),
                color,
                start_angle: angle,
                span,
                large_arc: span > 180.0,
                path: wedge_path(cx, cy, radius, angle, span),
            });
        }
        angle += span;
    }

    ChartGeometry::Pie(PieGeometry {
        cx,
        cy,
        radius,
        wedges,
        legend,
    })
}

fn point_on_circle(cx: f64, cy: f64, radius: f64, degrees: f64) -> (f64, f64) {
    let radians = degrees.to_radians();
    (cx + radius * radians.cos(), cy + radius * radians.sin())
}

fn wedge_path(cx: f64, cy: f64, radius: f64, start: f64, span: f64) -> String {
    let r = format_number(radius);
    if span >= 360.0 {
        // An arc cannot start and end at the same point; draw two halves.
        let (x0, y0) = point_on_circle(cx, cy, radius, start);
        let (x1, y1) = point_on_circle(cx, cy, radius, start + 180.0);
        return format!(
            "M {} {} A {} {} 0 1 1 {} {} A {} {} 0 1 1 {} {} Z",
            format_number(x0),
            format_number(y0),
            r,
            r,
            format_number(x1),
            format_number(y1),
            r,
            r,
            format_number(x0),
            format_number(y0),
        );
    }
    let (x0, y0) = point_on_circle(cx, cy, radius, start);
    let (x1, y1) = point_on_circle(cx, cy, radius, start + span);
    format!(
        "M {} {} L {} {} A {} {} 0 {} 1 {} {} Z",
        format_number(cx),
        format_number(cy),
        format_number(x0),
        format_number(y0),
        r,
        r,
        if span > 180.0 { 1 } else { 0 },
        format_number(x1),
        format_number(y1),
    )
}

fn legend_for<'a, I>(names: I, palette: &Palette) -> Vec<LegendEntry>
where
    I: IntoIterator<Item = &'a str>,
{
    names
        .into_iter()
        .enumerate()
        .map(|(index, name)| LegendEntry {
            label: name.to_string(),
            color: palette.color(index),
            percent: None,
        })
        .collect()
}

/// Format a coordinate or value with at most two decimals.
pub fn format_number(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    // Avoid "-0" in the output.
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    let text = format!("{:.2}", rounded);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}
