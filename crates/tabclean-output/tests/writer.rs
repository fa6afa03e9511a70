use std::fs;

use tabclean_model::{Column, ColumnType, Delimiter, Table, Value};
use tabclean_output::{OutputError, write_delimited, write_table};

fn sample_table() -> Table {
    Table::new(vec![
        Column::new(
            "id",
            ColumnType::Integer,
            vec![Value::Int(1), Value::Int(2), Value::Int(3)],
        ),
        Column::new(
            "score",
            ColumnType::Float,
            vec![Value::Float(2.5), Value::Missing, Value::Float(4.0)],
        ),
        Column::new(
            "ok",
            ColumnType::Bool,
            vec![Value::Bool(true), Value::Bool(false), Value::Missing],
        ),
        Column::new(
            "note",
            ColumnType::Text,
            vec![Value::from("plain"), Value::from("has, comma"), Value::Missing],
        ),
    ])
    .unwrap()
}

fn render(table: &Table, delimiter: Delimiter) -> String {
    let mut buffer = Vec::new();
    write_delimited(table, delimiter, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}

#[test]
fn comma_output_quotes_when_needed() {
    insta::assert_snapshot!(render(&sample_table(), Delimiter::Comma), @r#"
    id,score,ok,note
    1,2.5,True,plain
    2,,False,"has, comma"
    3,4.0,,
    "#);
}

#[test]
fn tab_output_leaves_commas_alone() {
    assert_eq!(
        render(&sample_table(), Delimiter::Tab),
        "id\tscore\tok\tnote\n1\t2.5\tTrue\tplain\n2\t\tFalse\thas, comma\n3\t4.0\t\t\n"
    );
}

#[test]
fn write_table_picks_delimiter_from_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("out.tsv");

    let delimiter = write_table(&sample_table(), &path).unwrap();

    assert_eq!(delimiter, Delimiter::Tab);
    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.starts_with("id\tscore\tok\tnote\n"));
    // Only the destination remains; the staging file was renamed.
    assert_eq!(fs::read_dir(path.parent().unwrap()).unwrap().count(), 1);
}

#[test]
fn header_only_table_writes_header() {
    let table = Table::new(vec![
        Column::new("a", ColumnType::Text, Vec::new()),
        Column::new("b", ColumnType::Text, Vec::new()),
    ])
    .unwrap();
    assert_eq!(render(&table, Delimiter::Comma), "a,b\n");
}

#[test]
fn unwritable_destination_is_a_write_error() {
    let dir = tempfile::tempdir().unwrap();
    // A regular file cannot act as a parent directory.
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "x").unwrap();
    let path = blocker.join("out.csv");

    let result = write_table(&sample_table(), &path);

    assert!(matches!(result, Err(OutputError::CreateDir { .. })));
    assert!(!path.exists());
}

#[test]
fn overwrites_existing_destination() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    fs::write(&path, "stale").unwrap();

    write_table(&sample_table(), &path).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.starts_with("id,score,ok,note\n"));
}
