use anyhow::Result;
use std::fs;
use tabstat::core::Pipeline;
use tabstat::{AnalysisPipeline, CliConfig, Computation, LocalStorage, Outcome, StatsEngine};
use tempfile::TempDir;

const TIPS_CSV: &str = "day,total_bill,tip,size\n\
Sun,16.99,1.01,2\n\
Sun,10.34,1.66,3\n\
Mon,21.01,3.50,3\n\
Mon,23.68,3.31,2\n\
Tue,24.59,3.61,4\n";

fn write_fixture(dir: &TempDir) -> String {
    let path = dir.path().join("tips.csv");
    fs::write(&path, TIPS_CSV).unwrap();
    path.to_str().unwrap().to_string()
}

fn config(
    csv_file: &str,
    computation: Computation,
    variables: Option<&str>,
    plot_dir: &str,
) -> CliConfig {
    CliConfig {
        csv_file: csv_file.to_string(),
        computation,
        variables: variables.map(|v| v.to_string()),
        plot_dir: plot_dir.to_string(),
        verbose: false,
        monitor: false,
    }
}

fn pipeline(
    csv_file: &str,
    computation: Computation,
    variables: Option<&str>,
) -> AnalysisPipeline<LocalStorage, CliConfig> {
    let storage = LocalStorage::new(".".to_string());
    AnalysisPipeline::new(storage, config(csv_file, computation, variables, "unused"))
}

#[test]
fn test_end_to_end_describe() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let csv_file = write_fixture(&temp_dir);

    let storage = LocalStorage::new(".".to_string());
    let plot_dir = temp_dir.path().join("plots");
    let config = config(
        &csv_file,
        Computation::Describe,
        None,
        plot_dir.to_str().unwrap(),
    );
    let engine = StatsEngine::new(AnalysisPipeline::new(storage, config));

    assert_eq!(engine.run()?, Outcome::Text);
    // Text computations never touch the plot directory.
    assert!(!plot_dir.exists());
    Ok(())
}

#[test]
fn test_mean_matches_hand_computed_value() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let csv_file = write_fixture(&temp_dir);

    let p = pipeline(&csv_file, Computation::Mean, Some("tip"));
    let frame = p.extract()?;
    let computed = p.compute(&frame)?;

    assert_eq!(computed.lines[0], "Computation: Mean on variable: tip");
    let reported: f64 = computed.lines[1].parse()?;
    assert!((reported - 2.618).abs() < 1e-9);
    Ok(())
}

#[test]
fn test_total_rows_excludes_header() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let csv_file = write_fixture(&temp_dir);

    let p = pipeline(&csv_file, Computation::TotalRows, None);
    let frame = p.extract()?;
    let computed = p.compute(&frame)?;

    assert_eq!(computed.lines, vec!["5".to_string()]);
    Ok(())
}

#[test]
fn test_columns_json_round_trips() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let csv_file = write_fixture(&temp_dir);

    let p = pipeline(&csv_file, Computation::Columns, None);
    let frame = p.extract()?;
    let computed = p.compute(&frame)?;

    let parsed: Vec<serde_json::Value> = serde_json::from_str(&computed.lines[0])?;
    assert_eq!(parsed.len(), 4);
    assert_eq!(parsed[0]["name"], "day");
    assert_eq!(parsed[0]["type"], "object");
    assert_eq!(parsed[3]["name"], "size");
    assert_eq!(parsed[3]["type"], "int64");
    Ok(())
}

#[test]
fn test_missing_values_and_info_agree_on_null_counts() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("gaps.csv");
    fs::write(&path, "a,b\n1,\nNA,y\n3,z\n")?;
    let csv_file = path.to_str().unwrap();

    let p = pipeline(csv_file, Computation::MissingValues, None);
    let frame = p.extract()?;
    let computed = p.compute(&frame)?;
    assert_eq!(computed.lines[1], "a  1");
    assert_eq!(computed.lines[2], "b  1");

    let p = pipeline(csv_file, Computation::Info, None);
    let computed = p.compute(&frame)?;
    assert!(computed.lines.join("\n").contains("2 non-null"));
    Ok(())
}

#[test]
fn test_unknown_column_fails_the_run() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let csv_file = write_fixture(&temp_dir);

    let storage = LocalStorage::new(".".to_string());
    let config = config(&csv_file, Computation::Mean, Some("nope"), "unused");
    let engine = StatsEngine::new(AnalysisPipeline::new(storage, config));

    assert!(engine.run().is_err());
    Ok(())
}

#[test]
fn test_unreadable_csv_fails_the_run() {
    let storage = LocalStorage::new(".".to_string());
    let config = config("/no/such/file.csv", Computation::Info, None, "unused");
    let engine = StatsEngine::new(AnalysisPipeline::new(storage, config));

    assert!(engine.run().is_err());
}
