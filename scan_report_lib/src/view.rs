use serde::Serialize;

use crate::{frequency::FrequencyMap, series::TimeSeries};

/// A titled block with a single value. `None` means the value could not be fetched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimpleBlock {
    pub title: String,
    pub value: Option<i64>,
}

impl SimpleBlock {
    pub fn new(title: impl Into<String>, value: Option<i64>) -> Self {
        Self {
            title: title.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiBlock {
    pub title: String,
    pub content: FrequencyMap,
}

impl MultiBlock {
    /// The content is shaped on the way in, so a block never holds more than five entries.
    pub fn new(title: impl Into<String>, content: FrequencyMap) -> Self {
        Self {
            title: title.into(),
            content: content.shape(),
        }
    }
}

/// Data for a line graph: shared x values and one value sequence per plotted line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineGraph {
    pub canvas_id: String,
    pub title: String,
    pub x_values: Vec<String>,
    pub plots: Vec<Vec<i64>>,
}

impl LineGraph {
    pub fn new(canvas_id: impl Into<String>, title: impl Into<String>, x_values: Vec<String>, plots: Vec<Vec<i64>>) -> Self {
        Self {
            canvas_id: canvas_id.into(),
            title: title.into(),
            x_values,
            plots,
        }
    }

    pub fn from_series(canvas_id: impl Into<String>, title: impl Into<String>, series: TimeSeries) -> Self {
        Self::new(canvas_id, title, series.labels, vec![series.values])
    }

    pub fn plot_count(&self) -> usize {
        self.plots.len()
    }
}

/// Everything the landing page shows for one country.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub country_code: String,
    pub simple_blocks: Vec<SimpleBlock>,
    pub multi_blocks: Vec<MultiBlock>,
    pub line_graphs: Vec<LineGraph>,
}

#[test]
fn multi_block_content_is_shaped() {
    let content: FrequencyMap = (1..=8).map(|n| (format!("svc{n}"), n)).collect();
    let block = MultiBlock::new("Services Identified", content);

    assert_eq!(block.content.len(), 5);
    assert_eq!(block.content.labels().next(), Some("svc8"));
    assert_eq!(block.content.labels().last(), Some("svc4"));
}

#[test]
fn line_graph_from_series_has_one_plot() {
    let series = TimeSeries {
        labels: vec!["01-01-2025".into(), "02-01-2025".into()],
        values: vec![4, 6],
    };
    let graph = LineGraph::from_series("line-graph_total-open-ports", "Total Open Ports", series);

    assert_eq!(graph.plot_count(), 1);
    assert_eq!(graph.x_values.len(), graph.plots[0].len());
}
