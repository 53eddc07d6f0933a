//! Self-contained HTML map report
//!
//! Produces a single page using Leaflet from a CDN:
//! - region outline as GeoJSON
//! - a marker and coverage circle per store
//! - a small dot per Monte Carlo sample (green covered, gray uncovered)
//! - a fixed info box with the headline numbers

use anyhow::{Context, Result};
use geo::{LineString, MultiPolygon};
use serde_json::{Value, json};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::{CoverageResult, ReferencePoint, Region};

const LEAFLET_VERSION: &str = "1.9.4";
const COVERED_COLOR: &str = "green";
const UNCOVERED_COLOR: &str = "gray";

/// Everything the report needs from one estimation run
#[derive(Debug)]
pub struct ReportContext<'a> {
    pub place: &'a str,
    pub brand: &'a str,
    pub region: &'a Region,
    pub references: &'a [ReferencePoint],
    pub radius_m: f64,
    pub result: &'a CoverageResult,
}

/// Write the report to `path`
pub fn write_html_report(path: &Path, ctx: &ReportContext) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create report file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    writer.write_all(render_html(ctx).as_bytes())?;
    writer.flush()?;

    Ok(())
}

/// Render the full HTML document
pub fn render_html(ctx: &ReportContext) -> String {
    let (center_lat, center_lon) = ctx.region.centroid().unwrap_or((0.0, 0.0));

    let data = json!({
        "center": [center_lat, center_lon],
        "radius": ctx.radius_m,
        "region": region_geojson(ctx.region.shape()),
        "stores": ctx.references.iter().map(|r| json!([r.lat, r.lon])).collect::<Vec<_>>(),
        "samples": ctx.result.samples.iter().map(|s| json!([s.lat, s.lon, s.covered])).collect::<Vec<_>>(),
    });

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@{leaflet}/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@{leaflet}/dist/leaflet.js"></script>
<style>
  html, body, #map {{ height: 100%; margin: 0; }}
  .info {{
    position: absolute; top: 10px; left: 50px; width: 250px; padding: 15px;
    background: linear-gradient(145deg, #ffffff, #e6f2ff);
    border: 2px solid #4CAF50; border-radius: 12px;
    box-shadow: 3px 3px 15px rgba(0,0,0,0.3);
    font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; font-size: 14px;
    z-index: 9999;
  }}
  .info h4 {{ margin: 0 0 10px 0; color: #4CAF50; }}
</style>
</head>
<body>
<div id="map"></div>
<div class="info">
  <h4>Coverage estimate</h4>
  <b>Place:</b> {place}<br>
  <b>Brand:</b> {brand}<br>
  <b>Stores:</b> {stores}<br>
  <b>Monte Carlo samples:</b> {samples}<br>
  <b>Coverage:</b> {coverage:.2}%
</div>
<script>
const data = {data};
const map = L.map('map').setView(data.center, 12);
L.tileLayer('https://{{s}}.tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png', {{
  attribution: '&copy; OpenStreetMap contributors'
}}).addTo(map);
L.geoJSON(data.region).addTo(map);
for (const [lat, lon] of data.stores) {{
  L.marker([lat, lon]).addTo(map);
  L.circle([lat, lon], {{ radius: data.radius, color: 'blue', fill: true, opacity: 0.2 }}).addTo(map);
}}
for (const [lat, lon, covered] of data.samples) {{
  L.circleMarker([lat, lon], {{
    radius: 2, color: covered ? '{covered_color}' : '{uncovered_color}', fill: true, fillOpacity: 0.7
  }}).addTo(map);
}}
</script>
</body>
</html>
"#,
        title = escape_html(&format!("{} coverage in {}", ctx.brand, ctx.place)),
        leaflet = LEAFLET_VERSION,
        place = escape_html(ctx.place),
        brand = escape_html(ctx.brand),
        stores = ctx.references.len(),
        samples = ctx.result.len(),
        coverage = ctx.result.ratio * 100.0,
        data = script_safe_json(&data),
        covered_color = COVERED_COLOR,
        uncovered_color = UNCOVERED_COLOR,
    )
}

fn ring_coords(ring: &LineString<f64>) -> Vec<[f64; 2]> {
    ring.coords().map(|c| [c.x, c.y]).collect()
}

/// GeoJSON MultiPolygon for the region, holes included
fn region_geojson(shape: &MultiPolygon<f64>) -> Value {
    let polygons: Vec<Vec<Vec<[f64; 2]>>> = shape
        .iter()
        .map(|polygon| {
            std::iter::once(polygon.exterior())
                .chain(polygon.interiors())
                .map(ring_coords)
                .collect()
        })
        .collect();

    json!({ "type": "MultiPolygon", "coordinates": polygons })
}

/// Serialize JSON so it cannot terminate the surrounding `<script>` element
fn script_safe_json(value: &Value) -> String {
    value.to_string().replace("</", "<\\/")
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
