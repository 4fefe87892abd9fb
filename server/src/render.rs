//! HTML for the dashboard and the error pages.
//!
//! Pages are assembled from view models only. Charts are drawn client side by
//! `static/js/graphs.js`, which gets its data inline as JSON.

use std::fmt::Write;

use celes::Country;
use scan_report_lib::view::{Dashboard, LineGraph, MultiBlock, SimpleBlock};
use serde::Serialize;

const CHART_JS_URL: &str = "https://cdn.jsdelivr.net/npm/chart.js";

pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// JSON that is safe to place inside a `<script>` element.
fn script_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "null".into())
        .replace("</", "<\\/")
}

pub fn country_name(country_code: &str) -> Option<&'static str> {
    Country::from_alpha2(country_code).ok().map(|country| country.long_name)
}

fn page(title: &str, body: &str) -> String {
    format!(r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
    <link rel="stylesheet" href="/static/style.css">
    <script src="{CHART_JS_URL}"></script>
    <script src="/static/js/graphs.js"></script>
</head>
<body>
{body}
</body>
</html>
"#, title = escape(title))
}

pub fn dashboard_page(dashboard: &Dashboard) -> String {
    let heading = match country_name(&dashboard.country_code) {
        Some(name) => format!("{} ({})", name, dashboard.country_code),
        None => dashboard.country_code.clone(),
    };

    let mut body = String::new();
    let _ = writeln!(body, "<h1>Scan summary for {}</h1>", escape(&heading));

    body.push_str("<section class=\"simple-cells\">\n");
    for block in &dashboard.simple_blocks {
        body.push_str(&simple_cell(block));
    }
    body.push_str("</section>\n<section class=\"line-graphs\">\n");
    for graph in &dashboard.line_graphs {
        body.push_str(&line_graph(graph));
    }
    body.push_str("</section>\n<section class=\"multi-cells\">\n");
    for block in &dashboard.multi_blocks {
        body.push_str(&multi_cell(block));
    }
    body.push_str("</section>\n");

    page(&heading, &body)
}

fn simple_cell(block: &SimpleBlock) -> String {
    let value = block.value.map(|value| value.to_string()).unwrap_or_else(|| "N/A".into());
    format!("<div class=\"data-display-cell\">\n    <h3>{}</h3>\n    <p>{}</p>\n</div>\n", escape(&block.title), value)
}

fn multi_cell(block: &MultiBlock) -> String {
    let mut cell = format!("<div class=\"data-display-cell multi\">\n    <h3>{}</h3>\n", escape(&block.title));
    if block.content.is_empty() {
        cell.push_str("    <p>No data</p>\n");
    } else {
        cell.push_str("    <table>\n");
        for (label, count) in block.content.iter() {
            let _ = writeln!(cell, "        <tr><td>{}</td><td>{}</td></tr>", escape(label), count);
        }
        cell.push_str("    </table>\n");
    }
    cell.push_str("</div>\n");
    cell
}

fn line_graph(graph: &LineGraph) -> String {
    format!(
        "<div class=\"graph-cell\">\n    <canvas id=\"{id}\"></canvas>\n    <script>draw_line_graph({id_json}, {title}, {labels}, {plots});</script>\n</div>\n",
        id = escape(&graph.canvas_id),
        id_json = script_json(&graph.canvas_id),
        title = script_json(&graph.title),
        labels = script_json(&graph.x_values),
        plots = script_json(&graph.plots),
    )
}

pub fn not_found_page() -> String {
    page("Not found", "<h1>404</h1>\n<p>There is no scan summary for that country code.</p>\n<p><a href=\"/\">Back to the dashboard</a></p>")
}

/// Shown when the country code could not be checked, usually because the database is down.
pub fn indeterminate_page() -> String {
    page("Data unavailable", "<h1>Data unavailable</h1>\n<p>Scan data could not be loaded right now. Please try again later.</p>")
}
