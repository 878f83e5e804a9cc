//! End-to-end runs through the file-based driver.

use std::fs;
use std::path::PathBuf;

use maze_escape::Error;

fn scratch(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("maze-escape-{}-{name}", std::process::id()))
}

#[test]
fn full_pipeline_writes_query_distances() {
    let input = scratch("pipeline-in");
    let output = scratch("pipeline-out");
    // 0-1-2-3 chain plus a directed edge 3 -> 4; query 4, 3, and isolated 5
    fs::write(&input, "6 4\n0 1 0\n1 2 0\n2 3 0\n3 4 1\n0\n3 4 3 5\n0\n").unwrap();

    maze_escape::run(3, &input, &output).unwrap();
    assert_eq!(fs::read_to_string(&output).unwrap(), "4 3 -1\n");

    fs::remove_file(&input).unwrap();
    fs::remove_file(&output).unwrap();
}

#[test]
fn blocked_vertices_appear_unreachable_downstream() {
    let input = scratch("blocked-in");
    let output = scratch("blocked-out");
    fs::write(&input, "4 3\n0 1 0\n1 2 0\n2 3 0\n0\n2 3 2\n1 2\n").unwrap();

    maze_escape::run(2, &input, &output).unwrap();
    assert_eq!(fs::read_to_string(&output).unwrap(), "-1 2\n");

    fs::remove_file(&input).unwrap();
    fs::remove_file(&output).unwrap();
}

#[test]
fn unreadable_input_aborts_the_group() {
    let output = scratch("missing-out");
    let error = maze_escape::run(4, &scratch("does-not-exist"), &output).unwrap_err();
    assert!(matches!(error, Error::Read { .. }), "got {error:?}");
}

#[test]
fn malformed_input_aborts_the_group() {
    let input = scratch("malformed-in");
    let output = scratch("malformed-out");
    fs::write(&input, "3 1\n0 9 0\n0\n0\n0\n").unwrap();

    let error = maze_escape::run(2, &input, &output).unwrap_err();
    assert!(matches!(error, Error::Parse(_)), "got {error:?}");

    fs::remove_file(&input).unwrap();
}
