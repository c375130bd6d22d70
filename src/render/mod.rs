//! SVG map emitter (external boundary, §1 "mechanical"): projects stop
//! coordinates onto a flat canvas and draws bus lines, bus-name labels,
//! stop markers, and stop-name labels on top of each other in that order.

pub mod settings;

use std::fmt::Write as _;

use crate::catalog::Catalog;
use crate::geo::Coordinate;
use settings::{Color, RenderSettings};

const EPSILON: f64 = 1e-6;

fn is_zero(value: f64) -> bool {
    value.abs() < EPSILON
}

/// A point in SVG canvas space (pixels, y grows downward).
#[derive(Debug, Clone, Copy, PartialEq)]
struct Point {
    x: f64,
    y: f64,
}

/// Projects lat/lng coordinates onto an SVG canvas of `width x height` with
/// `padding`, preserving aspect ratio by picking the smaller of the
/// width/height zoom factors (or either alone, or none, if the coordinate
/// spread is degenerate along one or both axes).
struct SphereProjector {
    padding: f64,
    min_lon: f64,
    max_lat: f64,
    zoom: f64,
}

impl SphereProjector {
    fn new(points: &[Coordinate], width: f64, height: f64, padding: f64) -> Self {
        if points.is_empty() {
            return Self { padding, min_lon: 0.0, max_lat: 0.0, zoom: 0.0 };
        }
        let min_lon = points.iter().map(|p| p.longitude).fold(f64::INFINITY, f64::min);
        let max_lon = points.iter().map(|p| p.longitude).fold(f64::NEG_INFINITY, f64::max);
        let min_lat = points.iter().map(|p| p.latitude).fold(f64::INFINITY, f64::min);
        let max_lat = points.iter().map(|p| p.latitude).fold(f64::NEG_INFINITY, f64::max);

        let width_zoom = (!is_zero(max_lon - min_lon)).then(|| (width - 2.0 * padding) / (max_lon - min_lon));
        let height_zoom = (!is_zero(max_lat - min_lat)).then(|| (height - 2.0 * padding) / (max_lat - min_lat));

        let zoom = match (width_zoom, height_zoom) {
            (Some(w), Some(h)) => w.min(h),
            (Some(w), None) => w,
            (None, Some(h)) => h,
            (None, None) => 0.0,
        };

        Self { padding, min_lon, max_lat, zoom }
    }

    fn project(&self, coordinate: Coordinate) -> Point {
        Point {
            x: (coordinate.longitude - self.min_lon) * self.zoom + self.padding,
            y: (self.max_lat - coordinate.latitude) * self.zoom + self.padding,
        }
    }
}

fn escape_text(out: &mut String, text: &str) {
    for c in text.trim().chars() {
        match c {
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&apos;"),
            '&' => out.push_str("&amp;"),
            c => out.push(c),
        }
    }
}

fn write_text_label(out: &mut String, pos: Point, offset: (f64, f64), font_size: u32, bold: bool, fill: &Color, data: &str) {
    write!(
        out,
        r#"<text x="{}" y="{}" dx="{}" dy="{}" font-size="{}" font-family="Verdana""#,
        pos.x, pos.y, offset.0, offset.1, font_size
    )
    .unwrap();
    if bold {
        out.push_str(r#" font-weight="bold""#);
    }
    write!(out, r#" fill="{}">"#, fill.to_svg()).unwrap();
    escape_text(out, data);
    out.push_str("</text>\n");
}

fn write_text_underlayer(
    out: &mut String,
    pos: Point,
    offset: (f64, f64),
    font_size: u32,
    bold: bool,
    underlayer_color: &Color,
    underlayer_width: f64,
    data: &str,
) {
    write!(
        out,
        r#"<text x="{}" y="{}" dx="{}" dy="{}" font-size="{}" font-family="Verdana""#,
        pos.x, pos.y, offset.0, offset.1, font_size
    )
    .unwrap();
    if bold {
        out.push_str(r#" font-weight="bold""#);
    }
    write!(
        out,
        r#" fill="{0}" stroke="{0}" stroke-width="{1}" stroke-linecap="round" stroke-linejoin="round">"#,
        underlayer_color.to_svg(),
        underlayer_width
    )
    .unwrap();
    escape_text(out, data);
    out.push_str("</text>\n");
}

/// Renders every bus with at least one stop as an SVG document: bus lines
/// first (so markers and labels draw on top), then bus-name labels at each
/// terminus, then stop markers, then stop-name labels. Buses are drawn in
/// ascending name order and cycle through `settings.color_palette`.
pub fn render_map(catalog: &Catalog, settings: &RenderSettings) -> String {
    let mut buses: Vec<_> = catalog.buses().iter().filter(|b| !b.stops.is_empty()).collect();
    buses.sort_by(|a, b| a.name.cmp(&b.name));

    let mut stop_ids = std::collections::BTreeSet::new();
    for bus in &buses {
        stop_ids.extend(bus.stops.iter().copied());
    }

    let points: Vec<Coordinate> = stop_ids
        .iter()
        .filter_map(|&id| catalog.stop_by_id(id))
        .map(|s| s.coordinate)
        .collect();
    let projector = SphereProjector::new(&points, settings.width, settings.height, settings.padding);

    let mut sorted_stops: Vec<_> = stop_ids.iter().filter_map(|&id| catalog.stop_by_id(id)).collect();
    sorted_stops.sort_by(|a, b| a.name.cmp(&b.name));

    let palette_size = settings.color_palette.len().max(1);
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n");
    out.push_str("<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\">\n");

    for (index, bus) in buses.iter().enumerate() {
        let color = settings.color_palette.get(index % palette_size).unwrap_or(&Color::None);
        out.push_str("<polyline points=\"");
        for (i, &stop_id) in bus.stops.iter().enumerate() {
            if i != 0 {
                out.push(' ');
            }
            if let Some(stop) = catalog.stop_by_id(stop_id) {
                let p = projector.project(stop.coordinate);
                write!(out, "{},{}", p.x, p.y).unwrap();
            }
        }
        write!(
            out,
            "\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\" stroke-linecap=\"round\" stroke-linejoin=\"round\"/>\n",
            color.to_svg(),
            settings.line_width
        )
        .unwrap();
    }

    for (index, bus) in buses.iter().enumerate() {
        let color = settings.color_palette.get(index % palette_size).unwrap_or(&Color::None);
        let Some(first) = catalog.stop_by_id(bus.stops[0]) else { continue };
        let pos = projector.project(first.coordinate);
        let offset = (settings.bus_label_offset.x, settings.bus_label_offset.y);
        write_text_underlayer(
            &mut out,
            pos,
            offset,
            settings.bus_label_font_size,
            true,
            &settings.underlayer_color,
            settings.underlayer_width,
            &bus.name,
        );
        write_text_label(&mut out, pos, offset, settings.bus_label_font_size, true, color, &bus.name);

        let terminus_index = (bus.stops.len() - 1) / 2;
        if !bus.is_roundtrip && bus.stops[terminus_index] != bus.stops[0] {
            if let Some(terminus) = catalog.stop_by_id(bus.stops[terminus_index]) {
                let pos = projector.project(terminus.coordinate);
                write_text_underlayer(
                    &mut out,
                    pos,
                    offset,
                    settings.bus_label_font_size,
                    true,
                    &settings.underlayer_color,
                    settings.underlayer_width,
                    &bus.name,
                );
                write_text_label(&mut out, pos, offset, settings.bus_label_font_size, true, color, &bus.name);
            }
        }
    }

    for stop in &sorted_stops {
        let p = projector.project(stop.coordinate);
        write!(
            out,
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"white\"/>\n",
            p.x, p.y, settings.stop_radius
        )
        .unwrap();
    }

    for stop in &sorted_stops {
        let p = projector.project(stop.coordinate);
        let offset = (settings.stop_label_offset.x, settings.stop_label_offset.y);
        write_text_underlayer(
            &mut out,
            p,
            offset,
            settings.stop_label_font_size,
            false,
            &settings.underlayer_color,
            settings.underlayer_width,
            &stop.name,
        );
        write_text_label(&mut out, p, offset, settings.stop_label_font_size, false, &Color::named("black"), &stop.name);
    }

    out.push_str("</svg>");
    out
}
