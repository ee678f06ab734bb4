//! End-to-end runs against temporary directories.

use cnai_csv::{run, CatalogFormat, ConvertOptions, RunError};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const DUMP: &str = "\
..cnai 2
..capabilities full
.subnetwork ONRM_RootMo,SubNetwork=RNC01
.utctime 2018-03-01 10:00:00
.domain RNC
.set RNC01
rncId=1
userLabel=\"Main, north\"
.set RNC02
rncId=2
userLabel=plain
.domain UtranCell
.set Cell1
cId=11
comment=say \"hi\"
.set Cell2
cId=12
comment=
..end
";

fn write_dump(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

fn convert(input: &Path, options: ConvertOptions) -> cnai_csv::RunOutcome {
    run(input, &options).unwrap()
}

fn read_table(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let header = reader.headers().unwrap().iter().map(String::from).collect();
    let rows = reader
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect();
    (header, rows)
}

#[test]
fn test_discovery_mode_tables() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_dump(input.path(), "dump.txt", DUMP);

    let outcome = convert(
        &input.path().join("dump.txt"),
        ConvertOptions {
            output_dir: Some(out.path().to_path_buf()),
            ..ConvertOptions::default()
        },
    );

    assert_eq!(outcome.summary.files_parsed, 1);
    assert_eq!(outcome.summary.stats.entities_flushed, 4);

    let (header, rows) = read_table(&out.path().join("RNC.csv"));
    assert_eq!(
        header,
        ["FILNAME", "DATETIME", "capabilities", "subnetwork", "domain", "set", "rncId", "userLabel"]
    );
    // RNC02 is closed by ".set Cell1" after the switch to UtranCell
    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows[0],
        [
            "dump.txt",
            "2018-03-01 10:00:00",
            "full",
            "ONRM_RootMo,SubNetwork=RNC01",
            "RNC",
            "RNC01",
            "1",
            "Main, north",
        ]
    );

    let (header, rows) = read_table(&out.path().join("UtranCell.csv"));
    assert_eq!(&header[6..], ["rncId", "userLabel"]);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0][5], "RNC02");
    assert_eq!(rows[1][5], "Cell1");
    assert_eq!(&rows[1][6..], ["", ""]);
}

#[test]
fn test_quoted_values_round_trip() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_dump(
        input.path(),
        "dump.txt",
        ".domain Cell\n.set C1\na=x,y\nb=say \"hi\"\nc=\"wrapped\"\nd=\"a,\"b\"\"\n..end\n",
    );

    convert(
        input.path(),
        ConvertOptions {
            output_dir: Some(out.path().to_path_buf()),
            ..ConvertOptions::default()
        },
    );

    let (_, rows) = read_table(&out.path().join("Cell.csv"));
    assert_eq!(&rows[0][6..], ["x,y", "say \"hi\"", "wrapped", "a,\"b\""]);
}

#[test]
fn test_filter_mode() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let config = input.path().join("params.cfg");
    fs::write(&config, "MoA:paramX,paramY\n").unwrap();
    write_dump(
        input.path(),
        "dump.txt",
        ".domain MoA\n.set A1\nextra=1\nparamY=y\nparamX=x\n.set A2\nparamX=x2\nzz=0\n\
         .domain MoB\n.set B1\np=1\nq=2\n..end\n",
    );

    let outcome = convert(
        &input.path().join("dump.txt"),
        ConvertOptions {
            output_dir: Some(out.path().to_path_buf()),
            parameter_file: Some(config),
            ..ConvertOptions::default()
        },
    );

    assert!(!out.path().join("MoB.csv").exists());
    let text = fs::read_to_string(out.path().join("MoA.csv")).unwrap();
    assert_eq!(text, "FILNAME,DATETIME,paramX,paramY\ndump.txt,,x,y\n");
    // A2 is closed by ".set B1" under MoB, then B1 by the end marker
    assert_eq!(outcome.summary.stats.entities_discarded, 2);
}

#[test]
fn test_malformed_filter_aborts_before_parsing() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let config = input.path().join("params.cfg");
    fs::write(&config, "MoA:paramX\nbroken line\n").unwrap();
    write_dump(input.path(), "dump.txt", DUMP);

    let err = run(
        &input.path().join("dump.txt"),
        &ConvertOptions {
            output_dir: Some(out.path().to_path_buf()),
            parameter_file: Some(config),
            ..ConvertOptions::default()
        },
    )
    .unwrap_err();

    assert!(matches!(err, RunError::Filter(_)));
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
}

#[test]
fn test_invalid_output_directory() {
    let input = TempDir::new().unwrap();
    write_dump(input.path(), "dump.txt", DUMP);

    let err = run(
        &input.path().join("dump.txt"),
        &ConvertOptions {
            output_dir: Some(input.path().join("missing")),
            ..ConvertOptions::default()
        },
    )
    .unwrap_err();

    assert!(matches!(err, RunError::Output(_)));
}

#[test]
fn test_directory_run_shares_tables() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_dump(input.path(), "a.txt", ".utctime T1\n.domain RNC\n.set E1\nx=1\ny=2\n..end\n");
    write_dump(input.path(), "b.txt", ".domain RNC\n.set F1\ny=3\nx=4\n..end\n");

    let outcome = convert(
        input.path(),
        ConvertOptions {
            output_dir: Some(out.path().to_path_buf()),
            ..ConvertOptions::default()
        },
    );

    assert_eq!(outcome.summary.files_parsed, 2);
    let (header, rows) = read_table(&out.path().join("RNC.csv"));
    assert_eq!(&header[6..], ["x", "y"]);
    assert_eq!(rows[0][0], "a.txt");
    // Timestamp carries over into the second file
    assert_eq!(rows[1][..2], ["b.txt", "T1"]);
    assert_eq!(&rows[1][6..], ["4", "3"]);
}

#[test]
fn test_unterminated_file_does_not_leak_entity() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_dump(input.path(), "a.txt", ".domain RNC\n.set E1\nx=1\ny=2\n.set E2\nx=9\ny=8\n");
    write_dump(input.path(), "b.txt", ".domain RNC\n.set F1\nx=3\ny=4\n..end\n");

    let outcome = convert(
        input.path(),
        ConvertOptions {
            output_dir: Some(out.path().to_path_buf()),
            ..ConvertOptions::default()
        },
    );

    assert_eq!(outcome.summary.files_parsed, 2);
    assert_eq!(outcome.summary.stats.entities_flushed, 2);
    let (_, rows) = read_table(&out.path().join("RNC.csv"));
    assert_eq!(
        rows,
        [
            ["a.txt", "", "", "", "RNC", "E1", "1", "2"],
            ["b.txt", "", "", "", "RNC", "F1", "3", "4"],
        ]
    );
}

#[test]
fn test_extract_parameters_to_stdout() {
    let input = TempDir::new().unwrap();
    write_dump(input.path(), "dump.txt", DUMP);

    let outcome = convert(
        input.path(),
        ConvertOptions {
            extract_parameters: true,
            meta_fields: true,
            ..ConvertOptions::default()
        },
    );

    let catalog = outcome.catalog.unwrap();
    assert_eq!(
        catalog,
        "RNC:FILENAME,DATETIME,rncId,userLabel\nUtranCell:FILENAME,DATETIME,rncId,userLabel,cId,comment\n"
    );
}

#[test]
fn test_extract_parameters_to_directory() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_dump(input.path(), "dump.txt", DUMP);

    let outcome = convert(
        input.path(),
        ConvertOptions {
            output_dir: Some(out.path().to_path_buf()),
            extract_parameters: true,
            catalog_format: CatalogFormat::Json,
            ..ConvertOptions::default()
        },
    );

    assert!(outcome.catalog.is_none());
    assert!(!out.path().join("RNC.csv").exists());
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.path().join("parameters.txt")).unwrap()).unwrap();
    assert_eq!(json["RNC"], serde_json::json!(["rncId", "userLabel"]));
}
