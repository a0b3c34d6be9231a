//! One line chart of daily mean sentiment per forum.

use crate::date::Day;
use crate::db::Database;
use crate::error::{ImportError, ImportResult};
use crate::progress::ProgressScope;
use crate::resample::{group_by_forum, resample_daily_mean, DailySeries};
use crate::schema;
use plotters::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use time::PrimitiveDateTime;

const PLOT_SIZE: (u32, u32) = (1200, 600);

/// `<forum>_sentiment_scores.png`, with path separators made harmless.
pub fn plot_file_name(forum: &str) -> String {
    let safe: String = forum
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    format!("{safe}_sentiment_scores.png")
}

pub fn render_daily_series(series: &DailySeries, forum: &str, path: &Path) -> ImportResult<()> {
    let err = |e: &dyn std::fmt::Display| ImportError::Plot {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let root = BitMapBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| err(&e))?;

    let (x0, x1) = match (series.first_day(), series.last_day()) {
        (Some(a), Some(b)) => (a.julian(), b.julian().max(a.julian() + 1)),
        _ => (0, 1),
    };
    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Daily mean sentiment: {forum}"), ("sans-serif", 28))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x0..x1, -1.0f64..1.0f64)
        .map_err(|e| err(&e))?;

    // An empty series keeps the placeholder range with no dated ticks. plotters needs at
    // least one x label to lay out the axis.
    let empty = series.is_empty();
    let day_label = |jd: &i32| if empty { String::new() } else { Day::from_julian(*jd).to_string() };
    let mut mesh = chart.configure_mesh();
    mesh.x_desc("Date")
        .y_desc("Mean sentiment")
        .x_labels(if empty { 1 } else { 8 })
        .x_label_formatter(&day_label);
    if empty {
        mesh.disable_x_mesh();
    }
    mesh.draw().map_err(|e| err(&e))?;

    for seg in series.segments() {
        if seg.len() == 1 {
            chart
                .draw_series(seg.iter().map(|&(x, y)| Circle::new((x, y), 3, BLUE.filled())))
                .map_err(|e| err(&e))?;
        } else {
            chart.draw_series(LineSeries::new(seg, &BLUE)).map_err(|e| err(&e))?;
        }
    }

    root.present().map_err(|e| err(&e))?;
    Ok(())
}

/// Query every scored post, and write one chart per forum into `output_dir`.
pub fn render_forum_plots(db: &mut Database, output_dir: &Path, progress_enabled: bool) -> ImportResult<Vec<PathBuf>> {
    fs::create_dir_all(output_dir).map_err(|e| ImportError::io(output_dir, e))?;

    let rows = db.client().query(schema::SELECT_SCORED_POSTS, &[])?;
    let grouped = group_by_forum(rows.iter().map(|row| {
        let forum: Option<String> = row.get(0);
        let ts: Option<PrimitiveDateTime> = row.get(1);
        let score: f64 = row.get(2);
        (forum, ts, score)
    }));

    let pb = ProgressScope::count(progress_enabled, "Rendering sentiment plots", grouped.len() as u64);
    let mut written = Vec::with_capacity(grouped.len());
    for (forum, points) in &grouped {
        let series = resample_daily_mean(points);
        let path = output_dir.join(plot_file_name(forum));
        render_daily_series(&series, forum, &path)?;
        tracing::debug!("wrote {} ({} days)", path.display(), series.days.len());
        written.push(path);
        pb.inc(1);
    }
    pb.finish("plots written");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    use time::macros::date;

    fn day(d: time::Date) -> Day {
        Day::from_date(d)
    }

    #[test]
    fn empty_series_still_writes_a_chart() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(plot_file_name("undated"));
        render_daily_series(&DailySeries::default(), "undated", &path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn gap_days_render_as_separate_segments() {
        let series = DailySeries {
            days: vec![
                (day(date!(2024-01-01)), Some(0.4)),
                (day(date!(2024-01-02)), None),
                (day(date!(2024-01-03)), Some(-0.2)),
                (day(date!(2024-01-04)), Some(0.1)),
            ],
        };
        assert_eq!(series.segments().len(), 2);

        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(plot_file_name("rust"));
        render_daily_series(&series, "rust", &path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn single_day_series_renders() {
        let series = DailySeries { days: vec![(day(date!(2024-05-05)), Some(0.9))] };
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("one.png");
        render_daily_series(&series, "one", &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn file_names_are_deterministic() {
        assert_eq!(plot_file_name("rust"), "rust_sentiment_scores.png");
        assert_eq!(plot_file_name("AskReddit"), "AskReddit_sentiment_scores.png");
        assert_eq!(plot_file_name("a/b"), "a_b_sentiment_scores.png");
    }
}
