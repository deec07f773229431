use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

use listing_cleaner::{CleanerError, Cleaner, Config, Table};

const SAMPLE: &str = "tests/resources/listings_sample.csv";

fn sample_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(SAMPLE)
}

fn cleaner_writing_to(output: &Path) -> Cleaner {
    let mut config = Config::default();
    config.output.path = output.to_path_buf();
    Cleaner::new(config).unwrap()
}

/// Every rendered cell of `column`, in row order
fn column(table: &Table, name: &str) -> Vec<String> {
    table
        .column(name)
        .unwrap_or_else(|| panic!("column {name} missing from {:?}", table.headers()))
        .into_iter()
        .map(|v| v.render().into_owned())
        .collect()
}

/// The sample file with one cell replaced
fn sample_with(dir: &Path, from: &str, to: &str) -> PathBuf {
    let content = fs::read_to_string(sample_path()).unwrap().replacen(from, to, 1);
    let path = dir.join("input.csv");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_full_clean_of_sample() -> Result<()> {
    let temp_dir = tempdir()?;
    let output = temp_dir.path().join("cleaned_dataset.csv");

    let written = cleaner_writing_to(&output).clean_all(&sample_path())?;
    assert_eq!(written, output);

    let table = Table::from_path(&output)?;
    assert_eq!(table.len(), 7);
    assert_eq!(
        table.headers(),
        &[
            "index",
            "Job Title",
            "Salary Estimate",
            "Job Description",
            "Company Rating",
            "Company Name",
            "Company Location",
            "Headquarters Location",
            "Number of Employees",
            "Date Founded",
            "Type of Ownership",
            "Industry",
            "Sector",
            "Revenue (USD)",
            "Competitors",
            "Quality Score",
        ]
    );

    assert_eq!(
        column(&table, "Salary Estimate"),
        vec![
            "$154,000.00",
            "$103,000.00",
            "$105,000.00",
            "$115,500.00",
            "$76,500.00",
            "$100,000.00",
            "$125,000.00"
        ]
    );
    assert_eq!(
        column(&table, "Company Name"),
        vec![
            "Healthfirst",
            "ManTech",
            "Stealth Startup",
            "Acme Analytics",
            "Globex",
            "Umbrella Labs",
            "Vandelay Industries"
        ]
    );
    assert_eq!(
        column(&table, "Headquarters Location"),
        vec!["New York", "Herndon", "Unknown", "London", "Boston", "San Francisco", "Austin"]
    );
    assert_eq!(
        column(&table, "Number of Employees"),
        vec![
            "1001-5000 Employees",
            "5001-10000 Employees",
            "Unknown",
            "10000+ Employees",
            "51-200 Employees",
            "201-500 Employees",
            "Unknown"
        ]
    );
    assert_eq!(
        column(&table, "Revenue (USD)"),
        vec![
            "Unknown",
            "$1,000,000,000-$2,000,000,000",
            "Unknown",
            "$10,000,000,000+",
            "<$1,000,000",
            "$500,000,000 to $1,000,000,000",
            "$100,000,000-$500,000,000"
        ]
    );
    assert_eq!(
        column(&table, "Quality Score"),
        vec!["10.0", "3.59", "1.59", "5.04", "0.0", "2.47", "6.62"]
    );

    Ok(())
}

#[test]
fn test_untransformed_columns_are_preserved() -> Result<()> {
    let temp_dir = tempdir()?;
    let output = temp_dir.path().join("out.csv");
    cleaner_writing_to(&output).clean_all(&sample_path())?;

    let input = Table::from_path(&sample_path())?;
    let table = Table::from_path(&output)?;

    // Location is not part of the full clean
    assert_eq!(column(&table, "Company Location"), column(&input, "Location"));
    assert_eq!(column(&table, "Job Description"), column(&input, "Job Description"));
    assert_eq!(column(&table, "Industry")[0], "Insurance Carriers");
    assert_eq!(column(&table, "Company Rating")[1], "4.2");
    Ok(())
}

#[test]
fn test_no_sentinel_survives() -> Result<()> {
    let temp_dir = tempdir()?;
    let output = temp_dir.path().join("out.csv");
    cleaner_writing_to(&output).clean_all(&sample_path())?;

    let table = Table::from_path(&output)?;
    for row in table.rows() {
        for cell in row {
            assert_ne!(cell.render(), "-1");
        }
    }

    // The unrated row: rating, founding year and buckets all read Unknown
    let unrated: Vec<String> = table.rows()[2].iter().map(|v| v.render().into_owned()).collect();
    assert_eq!(unrated[4], "Unknown");
    assert_eq!(unrated[9], "Unknown");
    assert_eq!(unrated[14], "Unknown");
    Ok(())
}

#[test]
fn test_report_describes_run() -> Result<()> {
    let temp_dir = tempdir()?;
    let output = temp_dir.path().join("out.csv");
    let report = cleaner_writing_to(&output).run(&sample_path(), &output)?;

    assert_eq!(report.rows, 7);
    assert_eq!(report.input_sha256.len(), 64);
    assert_eq!(
        report.stages.iter().map(|s| s.stage.as_str()).collect::<Vec<_>>(),
        vec!["salary", "headquarters", "name", "size", "revenue", "score", "rename", "sentinel"]
    );
    assert!(report.finished_at >= report.started_at);

    let report_path = temp_dir.path().join("report.json");
    report.write_json(&report_path)?;
    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&report_path)?)?;
    assert_eq!(json["rows"], 7);
    assert_eq!(json["stages"].as_array().map(|s| s.len()), Some(8));
    Ok(())
}

#[test]
fn test_intermediate_snapshots() -> Result<()> {
    let temp_dir = tempdir()?;
    let snapshots = temp_dir.path().join("stages");
    let mut config = Config::default();
    config.output.path = temp_dir.path().join("out.csv");
    config.output.intermediate_dir = Some(snapshots.clone());

    Cleaner::new(config)?.clean_all(&sample_path())?;

    for stage in ["salary", "headquarters", "name", "size", "revenue", "score", "rename", "sentinel"] {
        assert!(
            snapshots.join(format!("{stage}_cleaned_dataset.csv")).exists(),
            "missing snapshot for {stage}"
        );
    }
    assert!(!snapshots.join("location_cleaned_dataset.csv").exists());

    // The salary snapshot has cleaned salaries but raw headquarters
    let salary = Table::from_path(&snapshots.join("salary_cleaned_dataset.csv"))?;
    assert_eq!(column(&salary, "Salary Estimate")[0], "$154,000.00");
    assert_eq!(column(&salary, "Headquarters")[0], "New York, NY");
    Ok(())
}

#[test]
fn test_malformed_headquarters_aborts_without_output() -> Result<()> {
    let temp_dir = tempdir()?;
    let input = sample_with(temp_dir.path(), "\"Herndon, VA\"", "Herndon");
    let output = temp_dir.path().join("out.csv");

    let err = cleaner_writing_to(&output).run(&input, &output).unwrap_err();
    assert!(matches!(err, CleanerError::Parse { ref column, .. } if column == "Headquarters"));
    assert!(!output.exists());
    assert!(!temp_dir.path().join(".out.csv.partial").exists());
    Ok(())
}

#[test]
fn test_failed_run_keeps_previous_output() -> Result<()> {
    let temp_dir = tempdir()?;
    let input = sample_with(temp_dir.path(), "51 to 200 employees", "51 to 200 staff");
    let output = temp_dir.path().join("out.csv");
    fs::write(&output, "previous run\n")?;

    let err = cleaner_writing_to(&output).run(&input, &output).unwrap_err();
    assert!(matches!(err, CleanerError::Parse { ref column, .. } if column == "Size"));
    assert_eq!(fs::read_to_string(&output)?, "previous run\n");
    Ok(())
}

#[test]
fn test_missing_column_fails_before_any_stage() -> Result<()> {
    let temp_dir = tempdir()?;
    let input = temp_dir.path().join("input.csv");
    fs::write(
        &input,
        "Salary Estimate,Rating,Company Name,Headquarters,Size\n$30K-$60K,4.0,Acme,\"Boston, MA\",1 to 50 employees\n",
    )?;
    let snapshots = temp_dir.path().join("stages");
    let mut config = Config::default();
    config.output.path = temp_dir.path().join("out.csv");
    config.output.intermediate_dir = Some(snapshots.clone());

    let err = Cleaner::new(config)?.clean_all(&input).unwrap_err();
    assert!(matches!(
        err,
        CleanerError::MissingColumn { ref stage, ref column } if stage == "revenue" && column == "Revenue"
    ));
    assert!(!temp_dir.path().join("out.csv").exists());
    assert!(!snapshots.join("salary_cleaned_dataset.csv").exists());
    Ok(())
}

#[test]
fn test_location_stage_runs_standalone() -> Result<()> {
    let temp_dir = tempdir()?;
    let output = temp_dir.path().join("location.csv");
    let cleaner = cleaner_writing_to(&temp_dir.path().join("unused.csv"));

    let report = cleaner.run_stage("location", &sample_path(), &output)?;
    assert_eq!(report.stage, "location");
    assert_eq!(report.rows, 7);

    let table = Table::from_path(&output)?;
    assert_eq!(
        column(&table, "Location"),
        vec!["NY", "VA", "", "MA", "MA", "CA", "TX"]
    );
    // Only the location column is touched
    assert_eq!(column(&table, "Headquarters")[0], "New York, NY");
    assert_eq!(table.headers()[6], "Location");
    Ok(())
}

#[test]
fn test_unknown_stage_is_rejected() -> Result<()> {
    let temp_dir = tempdir()?;
    let output = temp_dir.path().join("out.csv");
    let err = cleaner_writing_to(&output)
        .run_stage("geocode", &sample_path(), &output)
        .unwrap_err();
    assert!(matches!(err, CleanerError::UnknownStage(ref name) if name == "geocode"));
    assert!(!output.exists());
    Ok(())
}
