use std::fs;
use std::path::Path;

use pricelist_tools::aggregate::{self, AggregateOutcome};
use pricelist_tools::io::excel_read;
use pricelist_tools::model::CellValue;
use pricelist_tools::{ToolError, search};
use rust_xlsxwriter::Workbook;
use tempfile::tempdir;

enum Cell<'a> {
    Text(&'a str),
    Number(f64),
}

fn write_price_list(path: &Path, sheets: &[(&str, &[&[Cell<'_>]])]) {
    let mut workbook = Workbook::new();
    for (name, rows) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name).expect("sheet named");
        for (row_idx, row) in rows.iter().enumerate() {
            for (col_idx, cell) in row.iter().enumerate() {
                match cell {
                    Cell::Text(value) => worksheet
                        .write_string(row_idx as u32, col_idx as u16, *value)
                        .expect("string written"),
                    Cell::Number(value) => worksheet
                        .write_number(row_idx as u32, col_idx as u16, *value)
                        .expect("number written"),
                };
            }
        }
    }
    workbook.save(path).expect("workbook saved");
}

#[test]
fn aggregation_tags_rows_with_provenance_and_unions_columns() {
    let temp_dir = tempdir().expect("temporary directory");
    let source_dir = temp_dir.path().join("price-lists");
    fs::create_dir(&source_dir).expect("source directory created");

    write_price_list(
        &source_dir.join("A.xlsx"),
        &[(
            "Sheet1",
            &[
                &[Cell::Text("item"), Cell::Text("price")],
                &[Cell::Text("bolt"), Cell::Number(10.0)],
            ],
        )],
    );
    write_price_list(
        &source_dir.join("B.xlsx"),
        &[(
            "Hardware",
            &[
                &[Cell::Text("item"), Cell::Text("supplier")],
                &[Cell::Text("washer"), Cell::Text("Acme")],
                &[Cell::Text("nut"), Cell::Text("Fasteners Ltd")],
            ],
        )],
    );

    let output = temp_dir.path().join("aggregated_pricelist.xlsx");
    let outcome = aggregate::run(&source_dir, &output).expect("aggregation succeeded");

    let AggregateOutcome::Written(summary) = outcome else {
        panic!("expected a written table");
    };
    assert_eq!(summary.rows, 3);
    assert_eq!(summary.sheets_read, 2);
    assert_eq!(summary.files_found, 2);

    let table = excel_read::read_aggregate(&output).expect("aggregate read back");
    assert_eq!(table.payload_columns, vec!["item", "price", "supplier"]);
    assert_eq!(table.rows.len(), 3);

    let first = &table.rows[0];
    assert_eq!(first.source_file, "A.xlsx");
    assert_eq!(first.sheet_name, "Sheet1");
    assert_eq!(first.row_number, 2);
    assert_eq!(first.values[0], CellValue::Text("bolt".to_string()));
    assert_eq!(first.values[1], CellValue::Number(10.0));
    assert_eq!(first.values[2], CellValue::Empty);

    let last = &table.rows[2];
    assert_eq!(last.source_file, "B.xlsx");
    assert_eq!(last.sheet_name, "Hardware");
    assert_eq!(last.row_number, 3);
    assert_eq!(last.values[1], CellValue::Empty);
    assert_eq!(last.values[2], CellValue::Text("Fasteners Ltd".to_string()));
}

#[test]
fn roundtrip_search_finds_a_string_present_in_one_cell() {
    let temp_dir = tempdir().expect("temporary directory");
    let source_dir = temp_dir.path().join("price-lists");
    fs::create_dir(&source_dir).expect("source directory created");

    write_price_list(
        &source_dir.join("A.xlsx"),
        &[(
            "Sheet1",
            &[
                &[Cell::Text("item"), Cell::Text("price")],
                &[Cell::Text("bolt"), Cell::Number(10.0)],
                &[Cell::Text("washer"), Cell::Number(4.0)],
            ],
        )],
    );

    let output = temp_dir.path().join("aggregated_pricelist.xlsx");
    aggregate::run(&source_dir, &output).expect("aggregation succeeded");

    let results = search::run("BOLT", &output).expect("search succeeded");
    assert_eq!(results.matches.len(), 1);

    let row = &results.matches[0];
    assert_eq!(row.source_file, "A.xlsx");
    assert_eq!(row.sheet_name, "Sheet1");
    assert_eq!(row.row_number, 2);
    assert_eq!(results.display_columns, vec!["item"]);

    let rendered = search::render_results(&results, false);
    assert!(rendered.contains("Match in 'A.xlsx', sheet 'Sheet1', row 2"));
    assert!(rendered.contains("  item: bolt"));
}

#[test]
fn unreadable_files_and_sheets_are_skipped_not_fatal() {
    let temp_dir = tempdir().expect("temporary directory");
    let source_dir = temp_dir.path().join("price-lists");
    fs::create_dir(&source_dir).expect("source directory created");

    fs::write(source_dir.join("broken.xlsx"), b"this is not a workbook")
        .expect("broken file written");
    write_price_list(
        &source_dir.join("good.xlsx"),
        &[
            (
                "Prices",
                &[
                    &[Cell::Text("item")],
                    &[Cell::Text("bolt")],
                ],
            ),
            // Header only, no data rows: skipped but counted.
            ("Empty", &[&[Cell::Text("item")]]),
        ],
    );

    let output = temp_dir.path().join("aggregated_pricelist.xlsx");
    let outcome = aggregate::run(&source_dir, &output).expect("aggregation succeeded");

    let AggregateOutcome::Written(summary) = outcome else {
        panic!("expected a written table");
    };
    assert_eq!(summary.rows, 1);
    assert_eq!(summary.files_found, 2);
    assert_eq!(summary.sheets_read, 1);
    assert_eq!(summary.sheets_skipped, 1);

    let table = excel_read::read_aggregate(&output).expect("aggregate read back");
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0].source_file, "good.xlsx");
}

#[test]
fn empty_source_directory_is_a_clean_no_op() {
    let temp_dir = tempdir().expect("temporary directory");
    let source_dir = temp_dir.path().join("price-lists");
    fs::create_dir(&source_dir).expect("source directory created");

    let output = temp_dir.path().join("aggregated_pricelist.xlsx");
    let outcome = aggregate::run(&source_dir, &output).expect("aggregation succeeded");

    assert_eq!(outcome, AggregateOutcome::NoSourceFiles);
    assert!(!output.exists());
}

#[test]
fn search_before_aggregation_reports_the_prerequisite() {
    let temp_dir = tempdir().expect("temporary directory");
    let missing = temp_dir.path().join("aggregated_pricelist.xlsx");

    let error = search::run("bolt", &missing).expect_err("search must fail");
    assert!(matches!(error, ToolError::MissingAggregate(_)));
    assert!(error.to_string().contains("run the `aggregate` command first"));
}

#[test]
fn search_without_matches_reports_no_results() {
    let temp_dir = tempdir().expect("temporary directory");
    let source_dir = temp_dir.path().join("price-lists");
    fs::create_dir(&source_dir).expect("source directory created");

    write_price_list(
        &source_dir.join("A.xlsx"),
        &[(
            "Sheet1",
            &[&[Cell::Text("item")], &[Cell::Text("bolt")]],
        )],
    );

    let output = temp_dir.path().join("aggregated_pricelist.xlsx");
    aggregate::run(&source_dir, &output).expect("aggregation succeeded");

    let results = search::run("unobtainium", &output).expect("search succeeded");
    assert!(results.matches.is_empty());
    assert_eq!(search::render_results(&results, false), "No results found.\n");
}

#[test]
fn multi_sheet_files_contribute_every_sheet() {
    let temp_dir = tempdir().expect("temporary directory");
    let source_dir = temp_dir.path().join("price-lists");
    fs::create_dir(&source_dir).expect("source directory created");

    write_price_list(
        &source_dir.join("catalogue.xlsx"),
        &[
            (
                "Bolts",
                &[
                    &[Cell::Text("item"), Cell::Text("price")],
                    &[Cell::Text("M6"), Cell::Number(10.0)],
                ],
            ),
            (
                "Washers",
                &[
                    &[Cell::Text("item"), Cell::Text("price")],
                    &[Cell::Text("M6 washer"), Cell::Number(2.0)],
                    &[Cell::Text("M8 washer"), Cell::Number(3.0)],
                ],
            ),
        ],
    );

    let output = temp_dir.path().join("aggregated_pricelist.xlsx");
    let outcome = aggregate::run(&source_dir, &output).expect("aggregation succeeded");

    let AggregateOutcome::Written(summary) = outcome else {
        panic!("expected a written table");
    };
    assert_eq!(summary.rows, 3);
    assert_eq!(summary.sheets_read, 2);

    let table = excel_read::read_aggregate(&output).expect("aggregate read back");
    let sheet_names: Vec<&str> = table.rows.iter().map(|row| row.sheet_name.as_str()).collect();
    assert_eq!(sheet_names, vec!["Bolts", "Washers", "Washers"]);
    assert_eq!(table.rows[2].row_number, 3);
}
