use anyhow::Result;
use std::fs;
use std::path::Path;
use tabstat::{AnalysisPipeline, CliConfig, Computation, LocalStorage, Outcome, StatsEngine};
use tempfile::TempDir;

const TIPS_CSV: &str = "day,total_bill,tip\n\
Sun,16.99,1.01\n\
Sun,10.34,1.66\n\
Mon,21.01,3.50\n\
Mon,23.68,3.31\n";

fn run_plot(
    computation: Computation,
    variables: &str,
) -> Result<(TempDir, std::path::PathBuf, Outcome)> {
    let temp_dir = TempDir::new()?;
    let csv_path = temp_dir.path().join("tips.csv");
    fs::write(&csv_path, TIPS_CSV)?;
    let plot_dir = temp_dir.path().join("plots").join("images");

    let config = CliConfig {
        csv_file: csv_path.to_str().unwrap().to_string(),
        computation,
        variables: Some(variables.to_string()),
        plot_dir: plot_dir.to_str().unwrap().to_string(),
        verbose: false,
        monitor: false,
    };
    let storage = LocalStorage::new(".".to_string());
    let engine = StatsEngine::new(AnalysisPipeline::new(storage, config));
    let outcome = engine.run()?;
    Ok((temp_dir, plot_dir, outcome))
}

fn saved_chart(plot_dir: &Path, prefix: &str) -> std::path::PathBuf {
    fs::read_dir(plot_dir)
        .expect("plot directory exists")
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .find(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(prefix) && name.ends_with(".png"))
        })
        .expect("chart file saved")
}

#[test]
fn test_histogram_creates_plot_dir_and_png() -> Result<()> {
    let (_guard, plot_dir, outcome) = run_plot(Computation::HistogramPlot, "total_bill")?;

    // The nested directory did not exist before the run.
    let chart = saved_chart(&plot_dir, "histogram_plot_total_bill_");
    let bytes = fs::read(&chart)?;
    assert_eq!(&bytes[..4], &[0x89, b'P', b'N', b'G']);

    let Outcome::Plot { filename } = outcome else {
        panic!("expected a plot outcome");
    };
    assert!(filename.starts_with("histogram_plot_total_bill_"));
    Ok(())
}

#[test]
fn test_scatter_plot_file_name_flattens_the_pair() -> Result<()> {
    let (_guard, plot_dir, outcome) = run_plot(Computation::ScatterPlot, "total_bill,tip")?;

    saved_chart(&plot_dir, "scatter_plot_total_bill_tip_");
    assert!(matches!(outcome, Outcome::Plot { .. }));
    Ok(())
}

#[test]
fn test_groupby_average_plot_writes_bar_chart() -> Result<()> {
    let (_guard, plot_dir, _) = run_plot(Computation::GroupbyAveragePlot, "day,tip")?;
    let chart = saved_chart(&plot_dir, "groupby_average_plot_day_tip_");
    assert!(fs::metadata(chart)?.len() > 0);
    Ok(())
}

#[test]
fn test_two_variables_plot_writes_line_chart() -> Result<()> {
    let (_guard, plot_dir, _) = run_plot(Computation::TwoVariablesPlot, "total_bill,tip")?;
    saved_chart(&plot_dir, "two_variables_plot_total_bill_tip_");
    Ok(())
}
