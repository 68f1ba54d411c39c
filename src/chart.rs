//! Text sparkline charts for rate histories

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Block characters for different rate levels (8 levels)
const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// A sparkline of rates over time
pub struct RateSparkline<'a> {
    /// Rates for each day, oldest first
    points: &'a [(NaiveDate, Decimal)],
    /// Lowest rate in the series
    min: Decimal,
    /// Highest rate in the series
    max: Decimal,
}

impl<'a> RateSparkline<'a> {
    /// Returns `None` for an empty series
    pub fn new(points: &'a [(NaiveDate, Decimal)]) -> Option<Self> {
        let min = points.iter().map(|(_, rate)| *rate).min()?;
        let max = points.iter().map(|(_, rate)| *rate).max()?;
        Some(Self { points, min, max })
    }

    fn rate_to_block(&self, rate: Decimal) -> char {
        let range = self.max - self.min;
        if range.is_zero() {
            return BLOCKS[0];
        }
        let normalized = ((rate - self.min) / range).to_f64().unwrap_or(0.0).clamp(0.0, 1.0);
        let index = ((normalized * 7.0).round() as usize).min(7);
        BLOCKS[index]
    }

    /// One block character per point
    pub fn line(&self) -> String {
        self.points
            .iter()
            .map(|(_, rate)| self.rate_to_block(*rate))
            .collect()
    }

    /// Label, sparkline, value range and date range, one per line
    pub fn render(&self, label: &str) -> String {
        let mut out = format!("{}\n{}\n", label, self.line());
        out.push_str(&format!("min {} / max {}", self.min, self.max));
        if let (Some((first, _)), Some((last, _))) = (self.points.first(), self.points.last()) {
            out.push_str(&format!(
                "\n{} .. {}",
                first.format("%Y-%m-%d"),
                last.format("%Y-%m-%d")
            ));
        }
        out
    }
}

/// Renders a rate history as text, or `None` when there is nothing to draw
pub fn render_history(points: &[(NaiveDate, Decimal)], label: &str) -> Option<String> {
    RateSparkline::new(points).map(|sparkline| sparkline.render(label))
}
