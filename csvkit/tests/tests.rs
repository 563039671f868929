//! Integration tests for the csvkit-rs tool suite.

extern crate cli_test_dir;

use cli_test_dir::*;

#[test]
fn csvcut_selects_columns_by_index() {
    let testdir = TestDir::new("csvcut", "csvcut_selects_columns_by_index");
    let output = testdir
        .cmd()
        .arg("-c")
        .arg("1,3")
        .output_with_stdin(
            "\
a,b,c
1,2,3
",
        )
        .expect_success();
    assert_eq!(output.stdout_str(), "a,c\n1,3\n");
}

#[test]
fn csvcut_excludes_columns_by_name() {
    let testdir = TestDir::new("csvcut", "csvcut_excludes_columns_by_name");
    let output = testdir
        .cmd()
        .arg("-C")
        .arg("b")
        .output_with_stdin(
            "\
a,b,c
1,2,3
",
        )
        .expect_success();
    assert_eq!(output.stdout_str(), "a,c\n1,3\n");
}

#[test]
fn csvgrep_regex_keeps_matching_rows() {
    let testdir = TestDir::new("csvgrep", "csvgrep_regex_keeps_matching_rows");
    let output = testdir
        .cmd()
        .args(&["-c", "3", "-r", "^(3|9)$"])
        .output_with_stdin(
            "\
a,b,c
1,2,3
",
        )
        .expect_success();
    assert_eq!(output.stdout_str(), "a,b,c\n1,2,3\n");
}

#[test]
fn csvgrep_invert_match_drops_matching_rows() {
    let testdir = TestDir::new("csvgrep", "csvgrep_invert_match_drops_matching_rows");
    let output = testdir
        .cmd()
        .args(&["-c", "3", "-r", "^3$", "-i"])
        .output_with_stdin(
            "\
a,b,c
1,2,3
4,5,6
",
        )
        .expect_success();
    assert_eq!(output.stdout_str(), "a,b,c\n4,5,6\n");
}

#[test]
fn csvsort_numeric_ignore_case_is_stable_on_ties() {
    let testdir = TestDir::new("csvsort", "csvsort_numeric_ignore_case_is_stable_on_ties");
    let output = testdir
        .cmd()
        .args(&["-c", "1", "-i"])
        .output_with_stdin(
            "\
a,b,c
100,2003-01-01,a
20,2002-01-01,b
20,2001-01-01,c
3,2009-01-01,d
100,2003-01-01,A
",
        )
        .expect_success();
    assert_eq!(
        output.stdout_str(),
        "\
a,b,c
3,2009-01-01,d
20,2002-01-01,b
20,2001-01-01,c
100,2003-01-01,a
100,2003-01-01,A
"
    );
}

#[test]
fn csvstack_groups_inputs_with_labeled_column() {
    let testdir = TestDir::new("csvstack", "csvstack_groups_inputs_with_labeled_column");
    testdir.create_file("dummy.csv", "a,b,c\n1,2,3\n");
    testdir.create_file("dummy2.csv", "a,b,c\n1,2,3\n");
    let output = testdir
        .cmd()
        .args(&["-g", "asd,sdf", "-n", "foo", "dummy.csv", "dummy2.csv"])
        .expect_success();
    assert_eq!(
        output.stdout_str(),
        "\
foo,a,b,c
asd,1,2,3
sdf,1,2,3
"
    );
}

#[test]
fn csvstat_count_reports_row_count_only() {
    let testdir = TestDir::new("csvstat", "csvstat_count_reports_row_count_only");
    let mut input = "a,b\n".to_string();
    for i in 0..1575 {
        input.push_str(&format!("{},{}\n", i, i * 2));
    }
    let output = testdir.cmd().arg("--count").output_with_stdin(&input).expect_success();
    assert_eq!(output.stdout_str(), "1575\n");
}

#[test]
fn csvjson_infers_boolean_and_numeric_columns() {
    let testdir = TestDir::new("csvjson", "csvjson_infers_boolean_and_numeric_columns");
    let output = testdir
        .cmd()
        .output_with_stdin(
            "\
a,b,c
1,2,3
",
        )
        .expect_success();
    assert_eq!(output.stdout_str().trim(), r#"[{"a":true,"b":2.0,"c":3.0}]"#);
}

#[test]
fn csvjson_duplicate_key_is_a_value_error() {
    let testdir = TestDir::new("csvjson", "csvjson_duplicate_key_is_a_value_error");
    let output = testdir
        .cmd()
        .args(&["-k", "a"])
        .output_with_stdin(
            "\
a,b
1,x
1,y
",
        )
        .expect("could not run csvjson");
    assert!(!output.status.success());
    assert!(output.stderr_str().contains("ValueError"));
}

#[test]
fn maxfieldsize_reports_the_exact_diagnostic() {
    let testdir = TestDir::new("csvcut", "maxfieldsize_reports_the_exact_diagnostic");
    let output = testdir
        .cmd()
        .arg("--maxfieldsize")
        .arg("13")
        .output_with_stdin(
            "\
a
abcdefghijklmn
",
        )
        .expect("could not run csvcut");
    assert!(!output.status.success());
    assert_eq!(
        output.stderr_str().lines().next().unwrap(),
        "FieldSizeLimitError: CSV contains a field longer than the maximum length of 13 characters on line 2."
    );
}

#[test]
fn csvclean_dry_run_reports_ragged_lines_without_writing_files() {
    let testdir = TestDir::new("csvclean", "csvclean_dry_run_reports_ragged_lines_without_writing_files");
    testdir.create_file("bad.csv", "a,b,c\n1,2,3\n4,5\n");
    let output = testdir.cmd().args(&["-n", "bad.csv"]).expect_success();
    assert!(output.stderr_str().contains("Line 3"));
    assert!(!testdir.path("bad_out.csv").exists());
    assert!(!testdir.path("bad_err.csv").exists());
}
