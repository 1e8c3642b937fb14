// tests/template_populate.rs
use std::fs;

use labscan::config::options::ParseOptions;
use labscan::template::RowMatch;
use labscan::{process_text, Diagnostic, Template};

fn sheet(csv: &str) -> Template {
    Template::from_rows(labscan::csv::parse_rows(csv, ',')).unwrap()
}

const TWO_DATES: &str = "\
Test 01/02/23 05/03/23
Units
Range
";

#[test]
fn ambiguous_rows_are_skipped_not_guessed() {
    let t = sheet("Test,Unit,A,B\nALP (bone),U/L,,\nALP (liver),U/L,,\nALT,U/L,,\n");
    let text = join(TWO_DATES, "ALP 120 130\nALT 30 L9\n");

    let r = process_text(&text, &t, &ParseOptions::default()).unwrap();

    assert_eq!(
        r.diagnostics,
        vec![Diagnostic::AmbiguousRow {
            test: "ALP".into(),
            rows: vec!["ALP (bone)".into(), "ALP (liver)".into()],
        }]
    );
    assert_eq!(r.template.rows()[0].cells, vec![String::new(), String::new()]);
    assert_eq!(r.template.rows()[1].cells, vec![String::new(), String::new()]);
    assert_eq!(r.template.cell("ALT", "05/03/23"), Some("L9"));
}

#[test]
fn single_substring_hit_is_used() {
    let t = sheet("Test,Unit,A,B\nBili.Total (umol/L),umol/L,,\n");
    assert_eq!(t.find_row("Bili.Total"), RowMatch::Substring(0));

    let text = join(TWO_DATES, "Bilirubin Total 12 14\n");
    let r = process_text(&text, &t, &ParseOptions::default()).unwrap();
    assert_eq!(r.template.cell("Bili.Total", "01/02/23"), Some("12"));
    assert!(r.diagnostics.is_empty());
}

#[test]
fn more_dates_than_columns_reports_and_keeps_in_range_values() {
    let t = sheet("Test,Unit,Only\nUrea,mmol/L,\n");
    let text = join(TWO_DATES, "Urea 5.1 6.2\n");

    let r = process_text(&text, &t, &ParseOptions::default()).unwrap();

    assert_eq!(r.template.date_columns(), ["01/02/23"]);
    assert_eq!(r.template.cell("Urea", "01/02/23"), Some("5.1"));
    assert_eq!(
        r.diagnostics,
        vec![Diagnostic::DatesExceedColumns { dates: 2, columns: 1 }]
    );
}

#[test]
fn populate_leaves_the_loaded_template_untouched() {
    let t = sheet("Test,Unit,A,B\nSodium,mmol/L,,\n");
    let before = t.clone();
    let text = join(TWO_DATES, "Sodium 140 141\n");

    let r = process_text(&text, &t, &ParseOptions::default()).unwrap();

    assert_eq!(t, before);
    assert_ne!(r.template, before);
}

#[test]
fn existing_cells_without_new_values_survive() {
    let t = sheet("Test,Unit,A,B\nSodium,mmol/L,old-a,old-b\n");
    let text = join(TWO_DATES, "Sodium 140\n");

    let r = process_text(&text, &t, &ParseOptions::default()).unwrap();
    let row = &r.template.rows()[0];
    assert_eq!(row.cells, vec!["140".to_string(), "old-b".to_string()]);
}

#[test]
fn tsv_template_loads_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("sheet.tsv");
    fs::write(&p, "Test\tUnit\tD1\nPotassium\tmmol/L\t\n").unwrap();

    let t = Template::load(&p).unwrap();
    assert_eq!(t.headers(), vec!["Test", "Unit", "D1"]);
    assert_eq!(t.rows()[0].test, "Potassium");
}

fn workbook_fixture() -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/template.xlsx")
}

#[test]
fn workbook_template_reads_the_blood_tests_sheet() {
    let t = Template::load(&workbook_fixture()).unwrap();
    assert_eq!(t.headers(), vec!["Test", "Unit", "Date 1", "Date 2", "Date 3"]);
    let tests: Vec<&str> = t.rows().iter().map(|r| r.test.as_str()).collect();
    assert_eq!(tests, vec!["Sodium", "Potassium", "Calcium", "eGFR", "Albumin"]);
    // Numeric cells come through as their printed text.
    assert_eq!(t.cell("Albumin", "Date 1"), Some("38"));
}

#[test]
fn workbook_template_feeds_populate() {
    let t = Template::load_with(&workbook_fixture(), "Blood Tests").unwrap();
    let text = join(TWO_DATES, "Sodium 140 H142\n");
    let r = process_text(&text, &t, &ParseOptions::default()).unwrap();
    assert_eq!(r.template.cell("Sodium", "05/03/23"), Some("H142"));
    assert_eq!(r.template.date_columns(), ["01/02/23", "05/03/23", "Date 3"]);
}

#[test]
fn workbook_sheet_must_exist_and_look_like_a_template() {
    let missing = Template::load_with(&workbook_fixture(), "Haematology").unwrap_err();
    assert!(matches!(missing, labscan::Error::Template(ref m) if m.contains("Haematology")));

    // The notes sheet has no Test header.
    let notes = Template::load_with(&workbook_fixture(), "Notes").unwrap_err();
    assert!(matches!(notes, labscan::Error::Template(_)));
}

#[test]
fn missing_workbook_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Template::load(&dir.path().join("PathologyPro_Template.xlsx")).unwrap_err();
    assert!(matches!(err, labscan::Error::Io { .. }));
}

#[test]
fn template_without_test_column_is_rejected() {
    let err = Template::from_rows(labscan::csv::parse_rows("Name,Unit,D1\n", ',')).unwrap_err();
    assert!(matches!(err, labscan::Error::Template(_)));
}

fn join(a: &str, b: &str) -> String {
    format!("{a}{b}")
}
