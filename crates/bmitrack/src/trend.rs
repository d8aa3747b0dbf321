//! BMI trend charts.
//!
//! A user's history is drawn as a time series with ratatui's `Chart` widget
//! into an off-screen buffer, which can then be printed as plain text. Points
//! are connected in timestamp order and each record also gets its own marker.

use chrono::{DateTime, Utc};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Widget};

use crate::record::BmiRecord;

/// Horizontal padding applied when every point shares one timestamp.
const SINGLE_INSTANT_PAD_SECS: f64 = 3600.0;

/// Label format for the time axis.
const AXIS_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// A renderable BMI time series for one user.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendChart {
    username: String,
    points: Vec<(f64, f64)>,
    first: DateTime<Utc>,
    last: DateTime<Utc>,
}

impl TrendChart {
    /// Build a chart from records already in timestamp order.
    ///
    /// Returns `None` when there is nothing to plot.
    #[must_use]
    pub fn from_records(username: &str, records: &[BmiRecord]) -> Option<Self> {
        let first = records.first()?.timestamp;
        let last = records.last()?.timestamp;
        let points = records
            .iter()
            .map(|r| (epoch_seconds(&r.timestamp), r.bmi))
            .collect();

        Some(Self {
            username: username.to_string(),
            points,
            first,
            last,
        })
    }

    /// The plotted `(seconds since epoch, bmi)` pairs.
    #[must_use]
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Number of plotted records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; an empty history produces no chart.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Chart title.
    #[must_use]
    pub fn title(&self) -> String {
        format!("{}'s BMI Trend Over Time", self.username)
    }

    /// Time axis bounds, widened when all records share a timestamp.
    #[must_use]
    pub fn x_bounds(&self) -> [f64; 2] {
        let min = epoch_seconds(&self.first);
        let max = epoch_seconds(&self.last);
        if (max - min).abs() < f64::EPSILON {
            [min - SINGLE_INSTANT_PAD_SECS, max + SINGLE_INSTANT_PAD_SECS]
        } else {
            [min, max]
        }
    }

    /// BMI axis bounds, rounded outward with one unit of headroom.
    #[must_use]
    pub fn y_bounds(&self) -> [f64; 2] {
        let (min, max) = self
            .points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(_, y)| {
                (lo.min(y), hi.max(y))
            });
        [(min - 1.0).floor().max(0.0), (max + 1.0).ceil()]
    }

    /// Render the chart into a buffer of the given size.
    #[must_use]
    pub fn render(&self, width: u16, height: u16) -> Buffer {
        let area = Rect::new(0, 0, width, height);
        let mut buffer = Buffer::empty(area);

        let [x_min, x_max] = self.x_bounds();
        let [y_min, y_max] = self.y_bounds();

        let line = Dataset::default()
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Blue))
            .data(&self.points);
        let markers = Dataset::default()
            .marker(Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(Color::Blue))
            .data(&self.points);

        let chart = Chart::new(vec![line, markers])
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", self.title())),
            )
            .x_axis(
                Axis::default()
                    .title("Timestamp")
                    .bounds([x_min, x_max])
                    .labels(vec![
                        Span::raw(self.first.format(AXIS_TIME_FORMAT).to_string()),
                        Span::raw(self.last.format(AXIS_TIME_FORMAT).to_string()),
                    ]),
            )
            .y_axis(
                Axis::default()
                    .title("BMI")
                    .bounds([y_min, y_max])
                    .labels(vec![
                        Span::raw(format!("{y_min:.1}")),
                        Span::raw(format!("{:.1}", (y_min + y_max) / 2.0)),
                        Span::raw(format!("{y_max:.1}")),
                    ]),
            );

        chart.render(area, &mut buffer);
        buffer
    }

    /// Render the chart and flatten it to text, one line per buffer row.
    #[must_use]
    pub fn render_text(&self, width: u16, height: u16) -> String {
        buffer_to_text(&self.render(width, height))
    }
}

/// Flatten a buffer into lines with trailing whitespace removed.
#[must_use]
pub fn buffer_to_text(buffer: &Buffer) -> String {
    let width = usize::from(buffer.area.width.max(1));
    let mut text = String::new();
    for row in buffer.content.chunks(width) {
        let line: String = row.iter().map(ratatui::buffer::Cell::symbol).collect();
        text.push_str(line.trim_end());
        text.push('\n');
    }
    text
}

#[allow(clippy::cast_precision_loss)]
fn epoch_seconds(timestamp: &DateTime<Utc>) -> f64 {
    timestamp.timestamp_micros() as f64 / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{test_record, Storage};
    use chrono::{Duration, TimeZone};

    fn history(weights: &[f64]) -> Vec<BmiRecord> {
        let storage = Storage::open_in_memory().unwrap();
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        for (i, weight) in weights.iter().enumerate() {
            let offset = Duration::days(i64::try_from(i).unwrap());
            storage
                .append_at(&test_record("alice", *weight, 1.75), base + offset)
                .unwrap();
        }
        storage.query_by_user("alice").unwrap()
    }

    #[test]
    fn test_empty_history_has_no_chart() {
        assert!(TrendChart::from_records("nobody", &[]).is_none());
    }

    #[test]
    fn test_points_follow_record_order() {
        let records = history(&[70.0, 72.0, 68.0]);
        let chart = TrendChart::from_records("alice", &records).unwrap();

        assert_eq!(chart.len(), 3);
        assert!(!chart.is_empty());
        let xs: Vec<f64> = chart.points().iter().map(|p| p.0).collect();
        assert!(xs.windows(2).all(|w| w[0] < w[1]));
        for (point, record) in chart.points().iter().zip(&records) {
            assert_eq!(point.1, record.bmi);
        }
    }

    #[test]
    fn test_sub_millisecond_records_stay_distinct() {
        let storage = Storage::open_in_memory().unwrap();
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        storage
            .append_at(&test_record("alice", 70.0, 1.75), base)
            .unwrap();
        storage
            .append_at(
                &test_record("alice", 71.0, 1.75),
                base + Duration::microseconds(300),
            )
            .unwrap();

        let records = storage.query_by_user("alice").unwrap();
        let chart = TrendChart::from_records("alice", &records).unwrap();
        let xs: Vec<f64> = chart.points().iter().map(|p| p.0).collect();
        assert!(xs[0] < xs[1]);
    }

    #[test]
    fn test_title() {
        let chart = TrendChart::from_records("alice", &history(&[70.0])).unwrap();
        assert_eq!(chart.title(), "alice's BMI Trend Over Time");
    }

    #[test]
    fn test_single_point_bounds_are_padded() {
        let chart = TrendChart::from_records("alice", &history(&[70.0])).unwrap();
        let [x_min, x_max] = chart.x_bounds();
        assert!(x_max - x_min >= 2.0 * SINGLE_INSTANT_PAD_SECS - 1.0);

        let [y_min, y_max] = chart.y_bounds();
        let bmi = chart.points()[0].1;
        assert!(y_min < bmi && bmi < y_max);
    }

    #[test]
    fn test_y_bounds_cover_all_points() {
        let chart = TrendChart::from_records("alice", &history(&[55.0, 90.0, 70.0])).unwrap();
        let [y_min, y_max] = chart.y_bounds();
        for &(_, y) in chart.points() {
            assert!(y_min <= y && y <= y_max);
        }
    }

    #[test]
    fn test_render_contains_labels() {
        let chart = TrendChart::from_records("alice", &history(&[70.0, 72.0, 74.0])).unwrap();
        let text = chart.render_text(80, 20);

        assert!(text.contains("alice's BMI Trend Over Time"));
        assert!(text.contains("Timestamp"));
        assert!(text.contains("BMI"));
        assert!(text.contains("2024-01-0"));
        assert_eq!(text.lines().count(), 20);
    }

    #[test]
    fn test_render_draws_data() {
        let chart = TrendChart::from_records("alice", &history(&[70.0, 80.0])).unwrap();
        let text = chart.render_text(60, 16);

        let has_plot = text
            .chars()
            .any(|c| ('\u{2801}'..='\u{28FF}').contains(&c) || c == '•');
        assert!(has_plot, "no plotted cells in:\n{text}");
    }

    #[test]
    fn test_render_buffer_size() {
        let chart = TrendChart::from_records("alice", &history(&[70.0])).unwrap();
        let buffer = chart.render(40, 10);
        assert_eq!(buffer.area, Rect::new(0, 0, 40, 10));
    }
}
