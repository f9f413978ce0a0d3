//! Dashboard charts drawn with plotters onto in-memory SVG strings.
//!
//! Every chart renders at 640x420 so pages can embed the SVG inline.
//! Scatter tooltips and the pan/zoom script are spliced into the SVG that
//! plotters produces.

use std::f64::consts::PI;

use num::ToPrimitive;
use plotters::coord::ranged1d::SegmentValue;
use plotters::prelude::*;
use plotters::series::Histogram as Bars;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::error::{DashboardError, Result};

const WIDTH: u32 = 640;
const HEIGHT: u32 = 420;

/// Default color cycle used for pie wedges.
const PIE_COLORS: [RGBColor; 4] = [
    RGBColor(0x1f, 0x77, 0xb4),
    RGBColor(0xff, 0x7f, 0x0e),
    RGBColor(0x2c, 0xa0, 0x2c),
    RGBColor(0xd6, 0x27, 0x28),
];

fn chart_error<E: std::fmt::Display>(err: E) -> DashboardError {
    DashboardError::Chart(err.to_string())
}

/// Converts any numeric column values into plot coordinates.
pub fn to_f64s<T: ToPrimitive>(values: &[T]) -> Vec<f64> {
    values.iter().filter_map(|v| v.to_f64()).collect()
}

pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// `bins` equal-width edges spanning every value. A single distinct value
/// gets a unit-wide range centred on it.
pub fn equal_width_edges(xs: &[f64], bins: usize) -> Vec<f64> {
    let bins = bins.max(1);
    let (mut lo, mut hi) = xs
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| (lo.min(x), hi.max(x)));
    if xs.is_empty() {
        lo = 0.0;
        hi = 1.0;
    } else if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;
    let mut edges: Vec<f64> = (0..bins).map(|i| lo + width * i as f64).collect();
    edges.push(hi);
    edges
}

/// Bin holding `x`. Bins are half-open except the last, which also takes
/// the final edge.
pub fn bin_index(x: f64, edges: &[f64]) -> Option<usize> {
    let last = edges.len().checked_sub(1)?;
    if last == 0 || x < edges[0] || x > edges[last] {
        return None;
    }
    let upper = edges.partition_point(|&edge| edge <= x);
    Some(upper.saturating_sub(1).min(last - 1))
}

/// Value range with a 5% margin on both ends.
fn padded_range(values: impl Iterator<Item = f64>) -> std::ops::Range<f64> {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if lo > hi {
        return 0.0..1.0;
    }
    if lo == hi {
        return (lo - 1.0)..(hi + 1.0);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad)..(hi + pad)
}

/// Gives the root `<svg>` an id and a viewBox so page scripts can find it.
fn tag_root(svg: &str, id: &str) -> String {
    let view_box = if svg.contains("viewBox") {
        String::new()
    } else {
        format!("viewBox=\"0 0 {WIDTH} {HEIGHT}\" ")
    };
    svg.replacen("<svg ", &format!("<svg id=\"{}\" {view_box}", escape(id)), 1)
}

/// Inserts `<title>` children into the first circles, in draw order.
fn attach_tooltips(svg: &str, tooltips: &[Option<String>]) -> String {
    let mut out = String::with_capacity(svg.len());
    let mut rest = svg;
    let mut tips = tooltips.iter();
    while let Some(start) = rest.find("<circle") {
        let Some(close) = rest[start..].find("/>") else {
            break;
        };
        let close = start + close;
        out.push_str(&rest[..close]);
        match tips.next() {
            Some(Some(tip)) => {
                out.push_str("><title>");
                out.push_str(&escape(tip));
                out.push_str("</title></circle>");
            }
            Some(None) => out.push_str("/>"),
            None => {
                out.push_str(&rest[close..]);
                return out;
            }
        }
        rest = &rest[close + 2..];
    }
    out.push_str(rest);
    out
}

fn append_before_close(svg: &str, extra: &str) -> String {
    match svg.rfind("</svg>") {
        Some(end) => format!("{}{extra}{}", &svg[..end], &svg[end..]),
        None => format!("{svg}{extra}"),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSeries {
    pub label: String,
    pub color: RGBColor,
    pub values: Vec<f64>,
}

/// Several series binned on shared edges and drawn as grouped bars.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub id: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bins: usize,
    pub series: Vec<HistogramSeries>,
}

impl Histogram {
    pub fn bin_edges(&self) -> Vec<f64> {
        let all: Vec<f64> = self.series.iter().flat_map(|s| s.values.iter().copied()).collect();
        equal_width_edges(&all, self.bins)
    }

    /// Per-series bin counts, in series order.
    pub fn counts(&self) -> Vec<Vec<usize>> {
        let edges = self.bin_edges();
        self.series
            .iter()
            .map(|s| {
                let mut counts = vec![0usize; edges.len() - 1];
                for bin in s.values.iter().filter_map(|&x| bin_index(x, &edges)) {
                    counts[bin] += 1;
                }
                counts
            })
            .collect()
    }

    /// Each bin owns one slot per series, so bars of a bin sit side by side.
    pub fn to_svg(&self) -> Result<String> {
        let edges = self.bin_edges();
        let groups = self.series.len().max(1) as u32;
        let slots = (edges.len() as u32 - 1) * groups;
        let max_count = self.counts().iter().flatten().copied().max().unwrap_or(0) as u32;

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (WIDTH, HEIGHT)).into_drawing_area();
            root.fill(&WHITE).map_err(chart_error)?;
            let mut chart = ChartBuilder::on(&root)
                .caption(self.title.as_str(), ("sans-serif", 18))
                .margin(10)
                .x_label_area_size(40)
                .y_label_area_size(50)
                .build_cartesian_2d((0u32..slots).into_segmented(), 0u32..(max_count + 1))
                .map_err(chart_error)?;

            let label_edge = |value: &SegmentValue<u32>| match value {
                SegmentValue::Exact(slot) | SegmentValue::CenterOf(slot) if slot % groups == 0 => {
                    edges.get((slot / groups) as usize).map(|e| format!("{e:.0}")).unwrap_or_default()
                }
                _ => String::new(),
            };
            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_labels(slots as usize + 1)
                .x_label_formatter(&label_edge)
                .x_desc(self.x_label.as_str())
                .y_desc(self.y_label.as_str())
                .draw()
                .map_err(chart_error)?;

            for (offset, series) in self.series.iter().enumerate() {
                let color = series.color;
                let data = series
                    .values
                    .iter()
                    .filter_map(|&x| bin_index(x, &edges))
                    .map(|bin| (bin as u32 * groups + offset as u32, 1u32));
                chart
                    .draw_series(Bars::vertical(&chart).style(color.filled()).margin(1).data(data))
                    .map_err(chart_error)?
                    .label(series.label.as_str())
                    .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));
            }
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()
                .map_err(chart_error)?;
            root.present().map_err(chart_error)?;
        }
        Ok(tag_root(&svg, &self.id))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub tooltip: Option<String>,
}

/// Points sharing one color and legend entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterGroup {
    pub label: Option<String>,
    pub color: RGBColor,
    pub points: Vec<ScatterPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scatter {
    pub id: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub groups: Vec<ScatterGroup>,
    /// Adds wheel zoom and drag pan over the viewBox.
    pub interactive: bool,
}

impl Scatter {
    pub fn points(&self) -> impl Iterator<Item = &ScatterPoint> {
        self.groups.iter().flat_map(|g| g.points.iter())
    }

    pub fn to_svg(&self) -> Result<String> {
        let x_range = padded_range(self.points().map(|p| p.x));
        let y_range = padded_range(self.points().map(|p| p.y));

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (WIDTH, HEIGHT)).into_drawing_area();
            root.fill(&WHITE).map_err(chart_error)?;
            let mut chart = ChartBuilder::on(&root)
                .caption(self.title.as_str(), ("sans-serif", 18))
                .margin(10)
                .x_label_area_size(40)
                .y_label_area_size(50)
                .build_cartesian_2d(x_range, y_range)
                .map_err(chart_error)?;
            chart
                .configure_mesh()
                .x_desc(self.x_label.as_str())
                .y_desc(self.y_label.as_str())
                .draw()
                .map_err(chart_error)?;

            for group in &self.groups {
                let color = group.color;
                let drawn = chart
                    .draw_series(group.points.iter().map(|p| Circle::new((p.x, p.y), 4, color.mix(0.7).filled())))
                    .map_err(chart_error)?;
                if let Some(label) = &group.label {
                    drawn
                        .label(label.as_str())
                        .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));
                }
            }
            if self.groups.iter().any(|g| g.label.is_some()) {
                chart
                    .configure_series_labels()
                    .position(SeriesLabelPosition::UpperRight)
                    .background_style(WHITE.mix(0.8))
                    .border_style(BLACK)
                    .draw()
                    .map_err(chart_error)?;
            }
            root.present().map_err(chart_error)?;
        }

        let tooltips: Vec<Option<String>> = self.points().map(|p| p.tooltip.clone()).collect();
        let mut out = attach_tooltips(&tag_root(&svg, &self.id), &tooltips);
        if self.interactive {
            out = append_before_close(&out, &pan_zoom_script(&self.id));
        }
        Ok(out)
    }
}

fn pan_zoom_script(id: &str) -> String {
    format!(
        "<script>(function(){{var s=document.getElementById('{id}');if(!s)return;var vb=s.viewBox.baseVal;var drag=null;\
s.addEventListener('wheel',function(e){{e.preventDefault();var k=e.deltaY>0?1.1:0.9;var r=s.getBoundingClientRect();\
var px=vb.x+(e.clientX-r.left)/r.width*vb.width;var py=vb.y+(e.clientY-r.top)/r.height*vb.height;\
vb.x=px-(px-vb.x)*k;vb.y=py-(py-vb.y)*k;vb.width*=k;vb.height*=k;}});\
s.addEventListener('mousedown',function(e){{drag={{x:e.clientX,y:e.clientY}};}});\
window.addEventListener('mouseup',function(){{drag=null;}});\
s.addEventListener('mousemove',function(e){{if(!drag)return;var r=s.getBoundingClientRect();\
vb.x-=(e.clientX-drag.x)/r.width*vb.width;vb.y-=(e.clientY-drag.y)/r.height*vb.height;drag={{x:e.clientX,y:e.clientY}};}});\
s.addEventListener('dblclick',function(){{vb.x=0;vb.y=0;vb.width={WIDTH};vb.height={HEIGHT};}});}})();</script>",
        id = escape(id)
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub value: usize,
    /// Radial offset as a fraction of the radius.
    pub explode: f64,
}

/// Pie chart laid out counter-clockwise from 3 o'clock. Each exploded wedge
/// has its own centre, so wedges are drawn as separate polygons.
#[derive(Debug, Clone, PartialEq)]
pub struct Pie {
    pub id: String,
    pub title: String,
    pub slices: Vec<PieSlice>,
}

impl Pie {
    const RADIUS: f64 = 140.0;

    fn centre() -> (f64, f64) {
        (WIDTH as f64 / 2.0, HEIGHT as f64 / 2.0 + 10.0)
    }

    pub fn total(&self) -> usize {
        self.slices.iter().map(|s| s.value).sum()
    }

    pub fn percentages(&self) -> Vec<f64> {
        let total = self.total();
        self.slices
            .iter()
            .map(|s| if total == 0 { 0.0 } else { s.value as f64 * 100.0 / total as f64 })
            .collect()
    }

    /// Start and end angle of each wedge, in radians.
    fn angles(&self) -> Vec<(f64, f64)> {
        let total = self.total();
        let mut start = 0.0;
        self.slices
            .iter()
            .map(|slice| {
                let sweep = if total == 0 { 0.0 } else { slice.value as f64 / total as f64 * 2.0 * PI };
                let wedge = (start, start + sweep);
                start += sweep;
                wedge
            })
            .collect()
    }

    /// Centre each wedge is drawn around after applying its explode offset.
    pub fn wedge_centres(&self) -> Vec<(f64, f64)> {
        let (cx, cy) = Self::centre();
        self.slices
            .iter()
            .zip(self.angles())
            .map(|(slice, (start, end))| {
                let mid = (start + end) / 2.0;
                let offset = slice.explode * Self::RADIUS;
                (cx + mid.cos() * offset, cy - mid.sin() * offset)
            })
            .collect()
    }

    pub fn to_svg(&self) -> Result<String> {
        let r = Self::RADIUS;
        let at = |(cx, cy): (f64, f64), radius: f64, theta: f64| {
            ((cx + radius * theta.cos()).round() as i32, (cy - radius * theta.sin()).round() as i32)
        };

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (WIDTH, HEIGHT)).into_drawing_area();
            root.fill(&WHITE).map_err(chart_error)?;
            root.draw(&Text::new(
                self.title.as_str(),
                ((WIDTH / 2) as i32, 24),
                ("sans-serif", 18).into_font().color(&BLACK).pos(Pos::new(HPos::Center, VPos::Center)),
            ))
            .map_err(chart_error)?;

            let wedges = self.angles().into_iter().zip(self.wedge_centres()).zip(self.percentages());
            for (i, (((start, end), centre), pct)) in wedges.enumerate() {
                let slice = &self.slices[i];
                if slice.value == 0 {
                    continue;
                }
                let color = PIE_COLORS[i % PIE_COLORS.len()];
                let steps = ((end - start).to_degrees().ceil() as usize).max(1);
                let mut outline = vec![at(centre, 0.0, 0.0)];
                outline.extend((0..=steps).map(|k| at(centre, r, start + (end - start) * k as f64 / steps as f64)));
                root.draw(&Polygon::new(outline, color.filled())).map_err(chart_error)?;

                let mid = (start + end) / 2.0;
                root.draw(&Text::new(
                    format!("{pct:.1}%"),
                    at(centre, 0.6 * r, mid),
                    ("sans-serif", 13).into_font().color(&BLACK).pos(Pos::new(HPos::Center, VPos::Center)),
                ))
                .map_err(chart_error)?;
                let anchor = if mid.cos() > 0.1 {
                    HPos::Left
                } else if mid.cos() < -0.1 {
                    HPos::Right
                } else {
                    HPos::Center
                };
                root.draw(&Text::new(
                    slice.label.as_str(),
                    at(centre, 1.1 * r, mid),
                    ("sans-serif", 13).into_font().color(&BLACK).pos(Pos::new(anchor, VPos::Center)),
                ))
                .map_err(chart_error)?;
            }
            root.present().map_err(chart_error)?;
        }
        Ok(tag_root(&svg, &self.id))
    }
}
