//! Scenario tests for nested splitting and reconciliation.

use std::collections::BTreeSet;

use icu_model::{Dataset, FoldCoordinates, RunMode, Segment, Split, SplitAssignment};
use icu_split::{NestedSplitter, reconcile};
use polars::prelude::*;

fn stay_ids(n: i64) -> Series {
    Series::new("stay_id".into(), (1..=n).collect::<Vec<i64>>())
}

fn id_set(series: &Series) -> BTreeSet<i64> {
    series.i64().unwrap().into_no_null_iter().collect()
}

fn plain(rep: usize, fold: usize, seed: u64) -> SplitAssignment {
    let coords = FoldCoordinates::new(5, rep, 5, fold, seed).unwrap();
    NestedSplitter::new(coords, RunMode::Regression)
        .split(&stay_ids(100), None)
        .unwrap()
}

#[test]
fn hundred_subjects_five_by_five() {
    let split = plain(0, 0, 42);

    assert_eq!(split.test.len(), 20);
    assert_eq!(split.train.len() + split.val.len(), 80);
    assert_eq!(split.train.len(), 64);
    assert_eq!(split.val.len(), 16);
}

#[test]
fn repetitions_have_disjoint_test_sets() {
    let tests: Vec<BTreeSet<i64>> = (0..5).map(|rep| id_set(&plain(rep, 0, 42).test)).collect();

    for a in 0..5 {
        for b in (a + 1)..5 {
            assert!(tests[a].is_disjoint(&tests[b]), "repetitions {a} and {b} overlap");
        }
    }
    let union: BTreeSet<i64> = tests.into_iter().flatten().collect();
    assert_eq!(union, (1..=100).collect());
}

#[test]
fn repeated_calls_are_identical() {
    for rep in 0..5 {
        for fold in 0..5 {
            assert!(plain(rep, fold, 1337).equals(&plain(rep, fold, 1337)));
        }
    }
}

#[test]
fn inner_folds_share_the_test_set() {
    let test = id_set(&plain(2, 0, 42).test);
    for fold in 1..5 {
        assert_eq!(id_set(&plain(2, fold, 42).test), test);
    }
}

#[test]
fn debug_mode_subsample_is_stable() {
    let coords = FoldCoordinates::new(2, 0, 2, 0, 7).unwrap();
    let splitter = NestedSplitter::new(coords, RunMode::Regression).with_debug(true);

    let first = splitter.split(&stay_ids(1000), None).unwrap();
    let second = splitter.split(&stay_ids(1000), None).unwrap();

    assert_eq!(first.len(), 10);
    assert!(first.equals(&second));
    assert!(first.is_disjoint().unwrap());
}

#[test]
fn reconciled_static_has_one_row_per_assigned_subject() {
    let ages: Vec<f64> = (1..=100).map(|i| i as f64).collect();
    let mut dataset = Dataset::new();
    dataset.insert(
        Segment::Static,
        DataFrame::new(vec![stay_ids(100).into_column(), Column::new("age".into(), ages)]).unwrap(),
    );

    let split = plain(0, 0, 42);
    let data = reconcile(&dataset, &split, "stay_id").unwrap();

    for (name, ids) in split.iter() {
        let table = &data[&name][&Segment::Static];
        let rows: Vec<i64> = table
            .column("stay_id")
            .unwrap()
            .i64()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(rows.len(), ids.len());
        assert!(rows.windows(2).all(|w| w[0] < w[1]), "{name} not sorted");
        assert_eq!(rows.iter().copied().collect::<BTreeSet<_>>(), id_set(ids));
    }
    assert_eq!(data[&Split::Test][&Segment::Static].height(), 20);
}

#[test]
fn stratification_applies_to_inner_folds() {
    // 10% positive: every tenth subject
    let ids = stay_ids(200);
    let labels = Series::new(
        "label".into(),
        (1..=200).map(|id| i32::from(id % 10 == 0)).collect::<Vec<i32>>(),
    );
    let positives = |series: &Series| id_set(series).iter().filter(|id| *id % 10 == 0).count();

    for rep in 0..5 {
        for fold in 0..5 {
            let coords = FoldCoordinates::new(5, rep, 5, fold, 42).unwrap();
            let split = NestedSplitter::new(coords, RunMode::Classification)
                .split(&ids, Some(&labels))
                .unwrap();

            let dev_positives = 20 - positives(&split.test);
            let val_positives = positives(&split.val);
            assert!(
                val_positives == dev_positives / 5 || val_positives == dev_positives.div_ceil(5),
                "rep {rep} fold {fold}: {val_positives} of {dev_positives} positives in val"
            );
            assert_eq!(positives(&split.train) + val_positives, dev_positives);
        }
    }
}
