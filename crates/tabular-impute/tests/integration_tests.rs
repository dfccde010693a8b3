//! Integration tests for the imputation blocks.
//!
//! These tests drive the blocks through the public `Block` interface the way
//! a pipeline would.

use polars::prelude::*;
use pretty_assertions::assert_eq;
use tabular_impute::table::missing_count;
use tabular_impute::{
    Block, ConstantImputer, ImputeError, RunMode, RunSpec, Statistic, StatisticImputer,
    StatisticImputerConfig, TableInput, load_block,
};

// ============================================================================
// Helper Functions
// ============================================================================

fn nan_rows() -> Vec<Vec<f64>> {
    vec![
        vec![1.0, f64::NAN, 1.0],
        vec![f64::NAN, 2.0, 2.0],
        vec![3.0, 3.0, f64::NAN],
    ]
}

fn grouped_rows() -> Vec<Vec<f64>> {
    vec![
        vec![1.0, 1.0],
        vec![1.0, 1.0],
        vec![2.0, 1.0],
        vec![2.0, 1.0],
        vec![2.0, 1.0],
        vec![f64::NAN, 1.0],
        vec![1.0, 2.0],
        vec![1.0, 2.0],
        vec![1.0, 2.0],
        vec![2.0, 2.0],
        vec![2.0, 2.0],
        vec![f64::NAN, 2.0],
    ]
}

fn passengers() -> DataFrame {
    df![
        "Pclass" => [1i64, 1, 1, 2, 2, 2, 3, 3],
        "Sex" => [Some("male"), Some("female"), None, Some("female"), Some("female"), Some("male"), None, Some("male")],
        "Age" => [Some(40.0), None, Some(30.0), Some(20.0), None, Some(26.0), None, Some(18.0)],
        "Fare" => [Some(80.0), Some(70.0), None, Some(20.0), Some(10.0), None, Some(8.0), Some(7.0)],
    ]
    .unwrap()
}

fn values_f64(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
    df.column(name).unwrap().f64().unwrap().into_iter().collect()
}

fn run(block: &dyn Block, x: impl Into<TableInput>) -> DataFrame {
    let (df, _, _) = block.run(&RunSpec::default(), x.into(), None, None).unwrap();
    df
}

// ============================================================================
// ConstantImputer
// ============================================================================

#[test]
fn test_constant_fill_example() {
    let df = run(&ConstantImputer::new(0), nan_rows());

    let expected = df![
        "0" => [1.0, 0.0, 3.0],
        "1" => [0.0, 2.0, 3.0],
        "2" => [1.0, 2.0, 0.0],
    ]
    .unwrap();
    assert!(df.equals_missing(&expected));
}

#[test]
fn test_constant_fill_keeps_present_cells() {
    let input = passengers().drop("Sex").unwrap();
    let df = run(&ConstantImputer::new(-1.0), &input);

    assert_eq!(missing_count(&df.select(["Age", "Fare"]).unwrap()), 0);
    let before = values_f64(&input, "Age");
    let after = values_f64(&df, "Age");
    for (b, a) in before.iter().zip(&after) {
        match b {
            Some(v) => assert_eq!(a, &Some(*v)),
            None => assert_eq!(a, &Some(-1.0)),
        }
    }
}

// ============================================================================
// StatisticImputer: global
// ============================================================================

#[test]
fn test_mean_fill_matches_column_mean() {
    let input = passengers().drop("Sex").unwrap();
    let df = run(&StatisticImputer::new("mean", None).unwrap(), &input);

    let present: Vec<f64> = values_f64(&input, "Fare").into_iter().flatten().collect();
    let mean = present.iter().sum::<f64>() / present.len() as f64;

    let fare = values_f64(&df, "Fare");
    assert_eq!(fare[2], Some(mean));
    assert_eq!(fare[5], Some(mean));
}

#[test]
fn test_every_statistic_on_numeric_columns() {
    for stat in Statistic::ALL {
        let imputer = StatisticImputer::new(stat.as_str(), None).unwrap();
        let df = run(&imputer, nan_rows());
        // three values per column, two present: std/var are defined
        assert_eq!(missing_count(&df), 0, "{stat}");
    }
}

// ============================================================================
// StatisticImputer: grouped
// ============================================================================

#[test]
fn test_grouped_median_example() {
    let df = run(&StatisticImputer::new("median", Some("1")).unwrap(), grouped_rows());

    assert_eq!(
        values_f64(&df, "0"),
        vec![
            Some(1.0),
            Some(1.0),
            Some(2.0),
            Some(2.0),
            Some(2.0),
            Some(2.0),
            Some(1.0),
            Some(1.0),
            Some(1.0),
            Some(2.0),
            Some(2.0),
            Some(1.0),
        ]
    );
}

#[test]
fn test_grouped_fill_per_group() {
    let input = passengers();
    let config = StatisticImputerConfig::builder()
        .method(Statistic::Mode)
        .groupby("Pclass")
        .build()
        .unwrap();
    let df = run(&StatisticImputer::from_config(config).unwrap(), &input);

    // group 1 Age [40, 30], tie -> 30; group 2 Age [20, 26], tie -> 20
    // group 3 Age [18] -> 18
    let age = values_f64(&df, "Age");
    assert_eq!(age[1], Some(30.0));
    assert_eq!(age[4], Some(20.0));
    assert_eq!(age[6], Some(18.0));

    let sex = df.column("Sex").unwrap().as_materialized_series().clone();
    let sex = sex.str().unwrap();
    assert_eq!(sex.get(2), Some("female"));
    assert_eq!(sex.get(6), Some("male"));

    // key column unchanged
    assert!(
        df.column("Pclass")
            .unwrap()
            .as_materialized_series()
            .equals(input.column("Pclass").unwrap().as_materialized_series())
    );
}

#[test]
fn test_grouped_mean_uses_input_values() {
    let df = df![
        "g" => ["a", "a", "a", "b", "b"],
        "x" => [Some(1.0), None, Some(5.0), None, Some(4.0)],
        "y" => [None, Some(2.0), Some(4.0), Some(6.0), None],
    ]
    .unwrap();

    let filled = run(&StatisticImputer::new("mean", Some("g")).unwrap(), df);
    assert_eq!(
        values_f64(&filled, "x"),
        vec![Some(1.0), Some(3.0), Some(5.0), Some(4.0), Some(4.0)]
    );
    assert_eq!(
        values_f64(&filled, "y"),
        vec![Some(3.0), Some(2.0), Some(4.0), Some(6.0), Some(6.0)]
    );
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_second_application_is_noop() {
    let imputer = StatisticImputer::new("median", Some("Pclass")).unwrap();
    let once = run(&imputer, passengers().drop("Sex").unwrap());
    let twice = run(&imputer, &once);
    assert!(twice.equals_missing(&once));

    let constant = ConstantImputer::new("none");
    let once = run(&constant, passengers().select(["Sex"]).unwrap());
    let twice = run(&constant, &once);
    assert!(twice.equals_missing(&once));
}

#[test]
fn test_unsupported_method_leaves_input_untouched() {
    let input = passengers();
    let snapshot = input.clone();

    let err = StatisticImputer::new("median", None)
        .unwrap()
        .run(&RunSpec::default(), (&input).into(), None, None)
        .unwrap_err();

    assert!(err.is_unsupported());
    assert!(matches!(
        err,
        ImputeError::UnsupportedOperation { ref column, .. } if column == "Sex"
    ));
    assert!(input.equals_missing(&snapshot));
}

#[test]
fn test_all_missing_group_stays_missing() {
    let df = df![
        "g" => [1i64, 1, 2, 2],
        "x" => [Some(5.0), None, None, None],
    ]
    .unwrap();

    let filled = run(&StatisticImputer::new("mean", Some("g")).unwrap(), df);
    assert_eq!(
        values_f64(&filled, "x"),
        vec![Some(5.0), Some(5.0), None, None]
    );
}

// ============================================================================
// Block Contract
// ============================================================================

#[test]
fn test_invoke_honors_disable_mask() {
    let config = StatisticImputerConfig::builder()
        .disable_mask([RunMode::Test])
        .build()
        .unwrap();
    let imputer = StatisticImputer::from_config(config).unwrap();
    let y = Series::new("label".into(), &[1i32, 0, 1]);

    let (skipped, y_out, _) = imputer
        .invoke(&RunSpec::new(RunMode::Test), nan_rows().into(), Some(y.clone()), None)
        .unwrap();
    assert_eq!(missing_count(&skipped), 3);
    assert!(y_out.unwrap().equals(&y));

    let (filled, _, _) = imputer
        .invoke(&RunSpec::new(RunMode::Train), nan_rows().into(), None, None)
        .unwrap();
    assert_eq!(missing_count(&filled), 0);
}

#[test]
fn test_series_input() {
    let series = Series::new("score".into(), &[Some(2.0), None, Some(4.0)]);
    let df = run(&StatisticImputer::new("max", None).unwrap(), series);
    assert_eq!(values_f64(&df, "score"), vec![Some(2.0), Some(4.0), Some(4.0)]);
}

#[test]
fn test_dump_and_load_round_trip() {
    let blocks: Vec<Box<dyn Block>> = vec![
        Box::new(ConstantImputer::new("missing")),
        Box::new(StatisticImputer::new("var", Some("Pclass")).unwrap()),
    ];

    for block in blocks {
        let dump = block.dump().unwrap();
        let loaded = load_block(&dump).unwrap();
        assert_eq!(loaded.dump().unwrap(), dump);
        assert_eq!(loaded.config(), block.config());
    }
}

#[test]
fn test_loaded_block_behaves_like_source() {
    let built = StatisticImputer::new("median", Some("1")).unwrap();
    let loaded = load_block(&built.dump().unwrap()).unwrap();

    let a = run(&built, grouped_rows());
    let b = run(loaded.as_ref(), grouped_rows());
    assert!(a.equals_missing(&b));
}

#[test]
fn test_error_serializes_with_code() {
    let err = StatisticImputer::new("geometric", None).unwrap_err();
    let json = serde_json::to_value(&err).unwrap();
    assert_eq!(json["code"], "UNSUPPORTED_OPERATION");
    assert!(json["message"].as_str().unwrap().contains("geometric"));
}
