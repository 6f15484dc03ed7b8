//! Tests for CLI parsing and input handling

use super::*;
use crate::engine::{ExecutionOutput, ExecutionStats, ItemFailure};
use crate::error::Error;
use clap::{CommandFactory, Parser};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn test_cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn test_parse_run_command() {
    let cli = Cli::try_parse_from([
        "optable",
        "--api",
        "infomaniak",
        "run",
        "dns_record",
        "list",
        "--input-json",
        r#"{"zone": "a.ch"}"#,
        "--return-all",
        "--offset",
        "100",
        "--continue-on-error",
        "--format",
        "pretty",
    ])
    .unwrap();

    assert_eq!(cli.api.as_deref(), Some("infomaniak"));
    assert_eq!(cli.format, OutputFormat::Pretty);
    match cli.command {
        Commands::Run {
            resource,
            operation,
            input_json,
            return_all,
            continue_on_error,
            limit,
            offset,
            full_response,
            ..
        } => {
            assert_eq!(resource, "dns_record");
            assert_eq!(operation, "list");
            assert_eq!(input_json.as_deref(), Some(r#"{"zone": "a.ch"}"#));
            assert!(return_all);
            assert!(continue_on_error);
            assert!(!full_response);
            assert_eq!(limit, None);
            assert_eq!(offset, Some(100));
        }
        other => panic!("Expected run command, got {other:?}"),
    }
}

#[test]
fn test_input_sources_conflict() {
    let result = Cli::try_parse_from([
        "optable",
        "run",
        "dns_zone",
        "get",
        "--input-json",
        "{}",
        "--input",
        "items.json",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_parse_describe_command() {
    let cli = Cli::try_parse_from(["optable", "describe", "mailbox", "get", "-a", "infomaniak"])
        .unwrap();
    assert!(matches!(
        cli.command,
        Commands::Describe { ref resource, ref operation } if resource == "mailbox" && operation == "get"
    ));
    assert_eq!(cli.format, OutputFormat::Json);
}

// ============================================================================
// Input Parsing Tests
// ============================================================================

#[test]
fn test_parse_input_single_object() {
    assert_eq!(
        parse_input(r#"{"zone": "a.ch"}"#).unwrap(),
        vec![json!({"zone": "a.ch"})]
    );
}

#[test]
fn test_parse_input_array() {
    assert_eq!(
        parse_input(r#"[{"zone": "a.ch"}, {"zone": "b.ch"}]"#).unwrap(),
        vec![json!({"zone": "a.ch"}), json!({"zone": "b.ch"})]
    );
}

#[test]
fn test_parse_input_json_lines() {
    let input = "{\"zone\": \"a.ch\"}\n\n{\"zone\": \"b.ch\"}\n";
    assert_eq!(
        parse_input(input).unwrap(),
        vec![json!({"zone": "a.ch"}), json!({"zone": "b.ch"})]
    );
}

#[test]
fn test_parse_input_empty() {
    assert!(parse_input("  \n").unwrap().is_empty());
}

#[test]
fn test_parse_input_errors() {
    let err = parse_input("{\"zone\": \"a.ch\"}\n{broken").unwrap_err();
    assert!(err.to_string().contains("line 2"), "{err}");

    let err = parse_input("[1, 2]").unwrap_err();
    assert!(err.to_string().contains("not a JSON object"), "{err}");
}

// ============================================================================
// Exit Status Tests
// ============================================================================

#[test]
fn test_check_failures_passes_clean_run() {
    let output = ExecutionOutput {
        records: vec![json!({"id": 1})],
        ..Default::default()
    };
    assert!(check_failures(&output).is_ok());
}

#[test]
fn test_check_failures_reports_failed_items() {
    let output = ExecutionOutput {
        records: vec![json!({"id": 1})],
        failures: vec![ItemFailure {
            item: 1,
            error: Error::missing_path_param("zone"),
        }],
        stats: ExecutionStats {
            items_succeeded: 2,
            items_failed: 1,
            ..Default::default()
        },
    };

    let err = check_failures(&output).unwrap_err();
    assert!(matches!(err, Error::ItemsFailed { failed: 1, total: 3 }));
    assert_eq!(err.to_string(), "1 of 3 items failed");
}
