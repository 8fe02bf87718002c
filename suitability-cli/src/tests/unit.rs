//! Focused unit tests covering score CLI configuration and reporting.

use super::helpers::{Workspace, write_utf8};
use super::*;
use camino::Utf8PathBuf;
use rstest::rstest;
use suitability_core::ConfigurationError;
use suitability_data::RunError;

fn workspace_args(workspace: &Workspace) -> ScoreArgs {
    ScoreArgs {
        data_dir: Some(workspace.data_dir()),
        out_dir: Some(workspace.out_dir()),
        presets: Some(workspace.presets()),
        only: None,
        grid: Some(TargetGrid::Inputs),
    }
}

#[rstest]
fn score_config_falls_back_to_project_defaults() {
    let config = ScoreConfig::try_from(ScoreArgs::default()).expect("defaults should build");
    assert_eq!(config.data_dir, Utf8PathBuf::from("data"));
    assert_eq!(config.out_dir, Utf8PathBuf::from("out/suitability"));
    assert_eq!(config.presets, Utf8PathBuf::from("web/config/presets.json"));
    assert_eq!(config.only, None);
    assert_eq!(config.grid, TargetGrid::Global);
}

#[rstest]
#[case::ordered("C,A", &["C", "A"])]
#[case::spaced(" B , C ", &["B", "C"])]
#[case::blanks(",,A,", &["A"])]
fn selections_split_on_commas(#[case] raw: &str, #[case] expected: &[&str]) {
    let args = ScoreArgs {
        only: Some(raw.to_owned()),
        ..ScoreArgs::default()
    };
    let config = ScoreConfig::try_from(args).expect("selection should parse");
    let only = config.only.expect("selection present");
    assert_eq!(only, expected);
}

#[rstest]
#[case::empty("")]
#[case::commas(" , ,")]
fn empty_selections_are_rejected(#[case] raw: &str) {
    let args = ScoreArgs {
        only: Some(raw.to_owned()),
        ..ScoreArgs::default()
    };
    let err = ScoreConfig::try_from(args).expect_err("empty selection should error");
    match err {
        CliError::EmptySelection { field } => assert_eq!(field, ARG_ONLY),
        other => panic!("expected EmptySelection, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "data_dir": 42 }));

    let err = config_from_layers_for_test(composer.layers())
        .expect_err("invalid config layer should map to CliError::Configuration");
    match err {
        CliError::Configuration(_) => {}
        other => panic!("expected CliError::Configuration, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_honours_precedence() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({
            "out_dir": "from-file/out",
            "data_dir": "from-file/data",
            "grid": "inputs",
            "only": "A",
        }),
        None,
    );
    composer.push_environment(json!({
        "data_dir": "from-env/data",
        "only": "B",
    }));
    composer.push_cli(json!({ "only": "C,A" }));

    let config =
        config_from_layers_for_test(composer.layers()).expect("merged config should build");
    assert_eq!(config.data_dir, Utf8PathBuf::from("from-env/data"));
    assert_eq!(config.out_dir, Utf8PathBuf::from("from-file/out"));
    assert_eq!(config.presets, Utf8PathBuf::from("web/config/presets.json"));
    assert_eq!(config.only, Some(vec!["C".to_owned(), "A".to_owned()]));
    assert_eq!(config.grid, TargetGrid::Inputs);
}

#[rstest]
fn missing_preset_documents_abort_before_scoring() {
    let workspace = Workspace::new();
    workspace.write_factors();
    let mut stdout = Vec::new();

    let err = run_score_with(workspace_args(&workspace), &mut stdout)
        .expect_err("missing presets should error");
    match err {
        CliError::Run(source) => assert!(matches!(
            *source,
            RunError::Presets(ConfigurationError::MissingDocument { .. })
        )),
        other => panic!("expected Run, found {other:?}"),
    }
    assert!(stdout.is_empty());
    assert!(!workspace.out_dir().as_std_path().exists());
}

#[rstest]
fn input_grids_require_at_least_one_factor() {
    let workspace = Workspace::new();
    workspace.write_presets();
    let mut stdout = Vec::new();

    let err = run_score_with(workspace_args(&workspace), &mut stdout)
        .expect_err("no inputs should error");
    match err {
        CliError::NoInputs { data_dir } => assert_eq!(data_dir, workspace.data_dir()),
        other => panic!("expected NoInputs, found {other:?}"),
    }
}

#[rstest]
fn reports_are_printed_as_json() {
    let workspace = Workspace::new();
    workspace.write_factors();
    workspace.write_presets();
    let mut stdout = Vec::new();

    run_score_with(workspace_args(&workspace), &mut stdout).expect("run should succeed");

    let report: serde_json::Value =
        serde_json::from_slice(&stdout).expect("stdout should hold a JSON report");
    let presets = report
        .get("presets")
        .and_then(serde_json::Value::as_array)
        .expect("presets array");
    let statuses: Vec<(&str, &str)> = presets
        .iter()
        .map(|entry| {
            (
                entry.get("preset").and_then(serde_json::Value::as_str).expect("id"),
                entry.get("status").and_then(serde_json::Value::as_str).expect("status"),
            )
        })
        .collect();
    assert_eq!(
        statuses,
        vec![("A", "written"), ("B", "written"), ("C", "written")]
    );
}

#[rstest]
fn malformed_preset_documents_are_configuration_errors() {
    let workspace = Workspace::new();
    workspace.write_factors();
    write_utf8(&workspace.presets(), b"{ not json");
    let mut stdout = Vec::new();

    let err = run_score_with(workspace_args(&workspace), &mut stdout)
        .expect_err("malformed presets should error");
    match err {
        CliError::Run(source) => assert!(matches!(
            *source,
            RunError::Presets(ConfigurationError::Malformed { .. })
        )),
        other => panic!("expected Run, found {other:?}"),
    }
}
