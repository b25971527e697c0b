#![cfg(feature = "xlsx")]

mod common;

use calamine::Data;
use fishbone::xlsx::{read_workbook_bytes, rows_from_grid, write_xlsx};
use fishbone::{Cell, Diagram, NodeUpdate};

fn sample() -> Diagram {
    let mut d = Diagram::seeded(31);
    d.set_problem_statement("Why did the pump fail?");
    d.load_template();
    let cat = d.state().categories[0].id.clone();
    let cause = d.add_cause(&cat).unwrap();
    d.update_cause(&cat, &cause, NodeUpdate::name("Training"));
    let sub = d.add_subcause(&cat, &cause).unwrap();
    d.update_subcause(&cat, &cause, &sub, NodeUpdate::comment("new hires only"));
    d
}

#[test]
fn xlsx_bytes_roundtrip() {
    common::init_tracing();
    let d = sample();
    let bytes = d.export_xlsx().unwrap();
    assert!(bytes.starts_with(b"PK"));

    let mut e = Diagram::seeded(32);
    e.import_xlsx_bytes(bytes).unwrap();
    assert_eq!(e.state().problem_statement, "Why did the pump fail?");
    assert_eq!(common::without_ids(e.state()), common::without_ids(d.state()));
}

#[test]
fn written_sheet_has_headers_and_sentinel() {
    let rows = sample().export_rows();
    let bytes = write_xlsx(&rows).unwrap();
    let back = read_workbook_bytes(bytes).unwrap();
    assert_eq!(back.len(), rows.len());
    assert!(back[0].is_problem_statement());
    assert_eq!(back[0].cause, "Why did the pump fail?");
    assert_eq!(back[1].category, "People");
    assert_eq!(back[1].x, rows[1].x);
}

#[test]
fn garbage_bytes_fail_without_mutation() {
    let mut d = sample();
    let before = d.state().clone();
    let rev = d.revision();
    let err = d.import_xlsx_bytes(b"not a workbook".to_vec()).unwrap_err();
    assert_eq!(err.code(), "read_failed");
    assert_eq!(d.state(), &before);
    assert_eq!(d.revision(), rev);
}

#[test]
fn unsupported_extension_rejected() {
    let mut d = Diagram::seeded(33);
    let err = d.import_path("diagram.csv").unwrap_err();
    assert_eq!(err.code(), "unsupported_format");
}

#[test]
fn path_roundtrip() {
    let d = sample();
    let path = std::env::temp_dir().join(format!("fishbone-{}.xlsx", std::process::id()));
    d.export_path(&path).unwrap();
    let mut e = Diagram::seeded(34);
    e.import_path(&path).unwrap();
    let _ = std::fs::remove_file(&path);
    assert_eq!(common::without_ids(e.state()), common::without_ids(d.state()));
}

fn s(v: &str) -> Data {
    Data::String(v.to_string())
}

#[test]
fn headers_are_matched_by_name() {
    let grid = vec![
        vec![s(" Sub Cause "), s("CATEGORY"), s("Comment"), s("x"), s("Y"), s("Spine X"), s("Cause")],
        vec![s("Worn seal"), s("Machines"), s("check weekly"), Data::Int(10), Data::Float(20.5), Data::Empty, s("Wear")],
    ];
    let rows = rows_from_grid(grid.iter().map(|r| r.as_slice())).unwrap();
    assert_eq!(rows.len(), 1);
    let r = &rows[0];
    assert_eq!(r.category, "Machines");
    assert_eq!(r.cause, "Wear");
    assert_eq!(r.subcause, "Worn seal");
    assert_eq!(r.comments, "check weekly");
    assert_eq!(r.x, Cell::Number(10.0));
    assert_eq!(r.y, Cell::Number(20.5));
    assert_eq!(r.spine_x, Cell::Empty);
}

#[test]
fn missing_category_column() {
    let grid = vec![vec![s("Cause"), s("X")], vec![s("a"), Data::Float(1.0)]];
    let err = rows_from_grid(grid.iter().map(|r| r.as_slice())).unwrap_err();
    assert_eq!(err.code(), "missing_column");
}
