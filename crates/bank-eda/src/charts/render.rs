use std::io::Write;

use super::{BarChart, BoxPlotChart, Chart, HeatmapChart, HistogramChart, PieChart};
use crate::error::Result;

/// Something that can draw a prepared chart.
pub trait ChartRenderer {
    fn render(&mut self, chart: &Chart) -> Result<()>;

    fn render_all(&mut self, charts: &[Chart]) -> Result<()> {
        for chart in charts {
            self.render(chart)?;
        }
        Ok(())
    }
}

/// Draws charts as plain text.
pub struct TextRenderer<W: Write> {
    out: W,
    /// Maximum bar length in characters.
    width: usize,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, width: 40 }
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width.max(1);
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn bar(&self, value: f64, max: f64) -> String {
        if max <= 0.0 || !value.is_finite() {
            return String::new();
        }
        let len = ((value / max) * self.width as f64).round().max(0.0) as usize;
        "#".repeat(len)
    }

    fn histogram(&mut self, chart: &HistogramChart) -> Result<()> {
        let max = chart.bins.iter().map(|b| b.count).max().unwrap_or(0) as f64;
        for bin in &chart.bins {
            writeln!(
                self.out,
                "  [{:>10.2}, {:>10.2}] {:>6} {}",
                bin.start,
                bin.end,
                bin.count,
                self.bar(bin.count as f64, max)
            )?;
        }
        writeln!(
            self.out,
            "  mean: {}  median: {}",
            format_value(chart.mean),
            format_value(chart.median)
        )?;
        Ok(())
    }

    fn bars(&mut self, chart: &BarChart) -> Result<()> {
        let label_width = chart.bars.iter().map(|b| b.label.len()).max().unwrap_or(0);
        let max = chart.bars.iter().map(|b| b.value).fold(0.0, f64::max);
        writeln!(self.out, "  ({} / {})", chart.x_label, chart.y_label)?;
        for bar in &chart.bars {
            writeln!(
                self.out,
                "  {:<label_width$} {:>10.2} {}",
                bar.label,
                bar.value,
                self.bar(bar.value, max)
            )?;
        }
        Ok(())
    }

    fn pie(&mut self, chart: &PieChart) -> Result<()> {
        let label_width = chart.slices.iter().map(|s| s.label.len()).max().unwrap_or(0);
        for slice in &chart.slices {
            writeln!(
                self.out,
                "  {:<label_width$} {:>8} {:>7.2}%",
                slice.label, slice.count, slice.percentage
            )?;
        }
        Ok(())
    }

    fn box_plot(&mut self, chart: &BoxPlotChart) -> Result<()> {
        let label_width = chart.groups.iter().map(|g| g.label.len()).max().unwrap_or(0);
        writeln!(
            self.out,
            "  {:<label_width$} {:>6} {:>10} {:>10} {:>10} {:>10} {:>10}",
            "", "n", "min", "q1", "median", "q3", "max"
        )?;
        for group in &chart.groups {
            let s = &group.summary;
            writeln!(
                self.out,
                "  {:<label_width$} {:>6} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>10.2}",
                group.label, group.count, s.min, s.q1, s.median, s.q3, s.max
            )?;
        }
        Ok(())
    }

    fn heatmap(&mut self, chart: &HeatmapChart) -> Result<()> {
        let label_width = chart.y_labels.iter().map(|l| l.len()).max().unwrap_or(0);
        let cell_width = chart
            .x_labels
            .iter()
            .map(|l| l.len())
            .max()
            .unwrap_or(0)
            .max(8);

        write!(self.out, "  {:<label_width$}", "")?;
        for label in &chart.x_labels {
            write!(self.out, " {:>cell_width$}", label)?;
        }
        writeln!(self.out)?;

        for (label, row) in chart.y_labels.iter().zip(&chart.values) {
            write!(self.out, "  {:<label_width$}", label)?;
            for value in row {
                write!(self.out, " {:>cell_width$}", format_value(*value))?;
            }
            writeln!(self.out)?;
        }
        Ok(())
    }
}

impl<W: Write> ChartRenderer for TextRenderer<W> {
    fn render(&mut self, chart: &Chart) -> Result<()> {
        writeln!(self.out, "{}", chart.title())?;
        match chart {
            Chart::Histogram(c) => self.histogram(c)?,
            Chart::Bar(c) => self.bars(c)?,
            Chart::Pie(c) => self.pie(c)?,
            Chart::BoxPlot(c) => self.box_plot(c)?,
            Chart::Heatmap(c) => self.heatmap(c)?,
        }
        writeln!(self.out)?;
        Ok(())
    }
}

/// Two decimals, or "N/A" for an undefined statistic.
pub fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{Bar, HistogramBin};

    fn rendered(chart: Chart) -> String {
        let mut renderer = TextRenderer::new(Vec::new()).with_width(10);
        renderer.render(&chart).unwrap();
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn test_render_bar_chart() {
        let text = rendered(Chart::Bar(BarChart {
            title: "Jobs".to_string(),
            x_label: "job".to_string(),
            y_label: "Count".to_string(),
            bars: vec![
                Bar {
                    label: "admin.".to_string(),
                    value: 4.0,
                },
                Bar {
                    label: "services".to_string(),
                    value: 2.0,
                },
            ],
            horizontal: false,
        }));

        assert!(text.starts_with("Jobs\n"));
        assert!(text.contains(&"#".repeat(10)));
        assert!(text.contains("services"));
    }

    #[test]
    fn test_render_histogram_markers() {
        let text = rendered(Chart::Histogram(HistogramChart {
            title: "Distribution of age".to_string(),
            column: "age".to_string(),
            bins: vec![HistogramBin {
                start: 20.0,
                end: 30.0,
                count: 3,
            }],
            mean: Some(25.0),
            median: None,
        }));
        assert!(text.contains("mean: 25.00"));
        assert!(text.contains("median: N/A"));
    }

    #[test]
    fn test_render_heatmap_undefined_cells() {
        let text = rendered(Chart::Heatmap(HeatmapChart {
            title: "Correlation matrix".to_string(),
            x_labels: vec!["a".to_string(), "b".to_string()],
            y_labels: vec!["a".to_string(), "b".to_string()],
            values: vec![vec![Some(1.0), None], vec![None, Some(1.0)]],
        }));
        assert!(text.contains("N/A"));
        assert!(text.contains("1.00"));
    }
}
