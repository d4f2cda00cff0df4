use super::util::ensure_parent_dir;
use super::{ExportStats, Exporter};
use crate::config::ChartConfig;
use crate::error::{Error, ExportError, Result};
use crate::report::Report;
use log::{debug, info};
use plotters::coord::ranged1d::ValueFormatter;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use std::fmt::Display;
use std::path::{Path, PathBuf};

const FONT: &str = "sans-serif";
const BAR_COLOR: RGBColor = RGBColor(31, 119, 180);

/// 每根柱子上标注的耗时文本，顺序与样本一致
pub fn bar_labels(report: &Report) -> Vec<String> {
    report
        .samples()
        .iter()
        .map(|s| s.duration.to_string())
        .collect()
}

/// y 轴范围：包含 0 与全部耗时，顶部留 10% 空间
fn y_range(report: &Report) -> (i64, i64) {
    let min = report.min_duration().unwrap_or(0).min(0);
    let max = report.max_duration().unwrap_or(0).max(0);
    let headroom = ((max - min) / 10).max(1);
    (min, max + headroom)
}

/// x 轴：每个样本占 [i, i+1) 一格，刻度放在格子中央
fn x_axis(count: usize) -> (std::ops::Range<f64>, Vec<f64>) {
    let n = u32::try_from(count.max(1)).unwrap_or(u32::MAX);
    let centers = (0..n).take(count).map(|i| f64::from(i) + 0.5).collect();
    (0.0..f64::from(n), centers)
}

/// `WithKeyPoints<RangedCoordf64>` has no `ValueFormatter` impl in plotters
/// 0.3.7, which `configure_mesh` requires; this wrapper only delegates.
struct KeyPointAxis(plotters::coord::combinators::WithKeyPoints<RangedCoordf64>);

impl Ranged for KeyPointAxis {
    type ValueType = f64;
    type FormatOption = plotters::coord::ranged1d::NoDefaultFormatting;

    fn range(&self) -> std::ops::Range<f64> {
        self.0.range()
    }

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        self.0.map(value, limit)
    }

    fn key_points<Hint: plotters::coord::ranged1d::KeyPointHint>(&self, hint: Hint) -> Vec<f64> {
        self.0.key_points(hint)
    }

    fn axis_pixel_range(&self, limit: (i32, i32)) -> std::ops::Range<i32> {
        self.0.axis_pixel_range(limit)
    }
}

impl ValueFormatter<f64> for KeyPointAxis {
    fn format(value: &f64) -> String {
        RangedCoordf64::format(value)
    }
}

fn render_failed(path: &Path, e: impl Display) -> Error {
    crate::export_error!(RenderFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// 把报告渲染为 SVG 柱状图，已存在的文件会被覆盖
pub fn render_svg(report: &Report, path: &Path, style: &ChartConfig) -> Result<()> {
    let root = SVGBackend::new(path, (style.width, style.height)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| render_failed(path, e))?;

    let ids: Vec<String> = report
        .samples()
        .iter()
        .map(|s| s.opid.to_string())
        .collect();
    let labels = bar_labels(report);
    let (x_range, centers) = x_axis(ids.len());
    let (y_min, y_max) = y_range(report);

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("{} time", report.fn_tag()), (FONT, 20.0))
        .margin(10)
        .x_label_area_size(90)
        .y_label_area_size(70)
        .build_cartesian_2d(
            KeyPointAxis(RangedCoordf64::from(x_range).with_key_points(centers)),
            y_min..y_max,
        )
        .map_err(|e| render_failed(path, e))?;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let x_fmt = |v: &f64| {
        ids.get(v.floor().max(0.0) as usize)
            .cloned()
            .unwrap_or_default()
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(ids.len())
        .x_label_formatter(&x_fmt)
        .x_label_style(
            (FONT, f64::from(style.tick_font_size))
                .into_font()
                .transform(FontTransform::Rotate90),
        )
        .x_desc(format!("{} opid(s)", report.fn_tag()))
        .y_desc("time (us)")
        .axis_desc_style((FONT, 14.0))
        .draw()
        .map_err(|e| render_failed(path, e))?;

    chart
        .draw_series((0u32..).zip(report.samples()).map(|(i, s)| {
            let x = f64::from(i);
            let mut bar = Rectangle::new([(x, 0), (x + 1.0, s.duration)], BAR_COLOR.filled());
            bar.set_margin(0, 0, 2, 2);
            bar
        }))
        .map_err(|e| render_failed(path, e))?
        .label("execution_time")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], BAR_COLOR.filled()));

    let label_style = (FONT, f64::from(style.label_font_size))
        .into_font()
        .transform(FontTransform::Rotate90);
    chart
        .draw_series(
            (0u32..)
                .zip(report.samples())
                .zip(&labels)
                .map(|((i, s), text)| {
                    Text::new(
                        text.clone(),
                        (f64::from(i) + 0.5, s.duration),
                        label_style.clone(),
                    )
                }),
        )
        .map_err(|e| render_failed(path, e))?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .label_font((FONT, 12.0))
        .draw()
        .map_err(|e| render_failed(path, e))?;

    root.present().map_err(|e| render_failed(path, e))?;
    debug!("Rendered {} bar(s) to {}", labels.len(), path.display());
    Ok(())
}

/// SVG 柱状图导出器
#[derive(Debug)]
pub struct ChartExporter {
    path: PathBuf,
    style: ChartConfig,
    stats: ExportStats,
}

impl ChartExporter {
    pub fn new(path: impl AsRef<Path>, style: ChartConfig) -> Self {
        let path = path.as_ref().to_path_buf();
        Self {
            stats: ExportStats {
                exported: 0,
                output: path.display().to_string(),
            },
            path,
            style,
        }
    }

    pub fn from_config(path: &str, style: &ChartConfig) -> Self {
        Self::new(path, style.clone())
    }
}

impl Exporter for ChartExporter {
    fn initialize(&mut self) -> Result<()> {
        if !self
            .path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("svg"))
        {
            log::warn!(
                "Chart output {} does not end in .svg, writing SVG anyway",
                self.path.display()
            );
        }
        ensure_parent_dir(&self.path).map_err(|e| {
            Error::Export(ExportError::FileCreateFailed {
                path: self.path.clone(),
                reason: e.to_string(),
            })
        })
    }

    fn export(&mut self, report: &Report) -> Result<()> {
        render_svg(report, &self.path, &self.style)?;
        self.stats.exported = report.samples().len();
        info!("Chart written: {}", self.path.display());
        Ok(())
    }

    fn name(&self) -> &str {
        "SVG chart"
    }

    fn stats_snapshot(&self) -> Option<ExportStats> {
        Some(self.stats.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OpId;
    use crate::report::OpSample;
    use std::fs;
    use tempfile::TempDir;

    fn report(durations: &[(i64, i64)]) -> Report {
        let samples = durations
            .iter()
            .map(|&(opid, duration)| OpSample {
                opid: OpId::Int(opid),
                start_time: 1000,
                finish_time: 1000 + duration,
                duration,
            })
            .collect();
        Report::new("fsal_read", samples, Vec::new())
    }

    #[test]
    fn test_single_bar_label() {
        let r = report(&[(1, 150)]);
        assert_eq!(bar_labels(&r), vec!["150".to_string()]);
    }

    #[test]
    fn test_x_axis_has_one_slot_per_sample() {
        assert_eq!(x_axis(1), (0.0..1.0, vec![0.5]));
        assert_eq!(x_axis(3), (0.0..3.0, vec![0.5, 1.5, 2.5]));
        assert_eq!(x_axis(0), (0.0..1.0, Vec::new()));
    }

    #[test]
    fn test_y_range_has_headroom() {
        assert_eq!(y_range(&report(&[(1, 150)])), (0, 165));
        assert_eq!(y_range(&report(&[(1, 5)])), (0, 6));
        assert_eq!(y_range(&report(&[(1, -20), (2, 80)])), (-20, 90));
    }

    #[test]
    fn test_render_writes_svg() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out/graph.svg");
        let mut exporter = ChartExporter::new(&path, ChartConfig::default());
        exporter.initialize().unwrap();
        exporter.export(&report(&[(1, 150), (2, 90)])).unwrap();

        let svg = fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("fsal_read time"));
        assert!(svg.contains("time (us)"));
        assert!(svg.contains("execution_time"));
        assert!(svg.contains("150</text>"));
        assert_eq!(exporter.stats_snapshot().unwrap().exported, 2);
    }

    #[test]
    fn test_render_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("graph.svg");
        fs::write(&path, "stale").unwrap();
        render_svg(&report(&[(3, 42)]), &path, &ChartConfig::default()).unwrap();
        let svg = fs::read_to_string(&path).unwrap();
        assert!(!svg.contains("stale"));
        assert!(svg.contains("42</text>"));
    }

    #[test]
    fn test_render_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no/such/dir/graph.svg");
        let result = render_svg(&report(&[(1, 10)]), &path, &ChartConfig::default());
        assert!(matches!(
            result,
            Err(Error::Export(ExportError::RenderFailed { .. }))
        ));
    }
}
