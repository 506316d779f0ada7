//! Per-split materialisation of segment tables.
//!
//! Each segment is right-joined against a split's subject ids on the
//! identifier column and sorted by (subject id, original row position), so
//! the result is in ascending subject order with intra-subject order (e.g.
//! the time index of the dynamic segment) preserved.

use icu_model::{Dataset, Segment, Split, SplitAssignment, SplitData};
use polars::prelude::*;

use crate::error::{Result, SplitError};

const ROW_INDEX: &str = "__icu_row_nr";

/// Restrict every segment of `dataset` to every split of `assignment`.
pub fn reconcile(
    dataset: &Dataset,
    assignment: &SplitAssignment,
    group: &str,
) -> Result<SplitData> {
    let mut split_data = SplitData::new();

    for (split, ids) in assignment.iter() {
        let mut segments = Dataset::new();
        for (segment, table) in dataset {
            let reconciled = reconcile_segment(table, ids, group, *segment, split)?;
            tracing::debug!(
                split = %split,
                segment = %segment,
                subjects = ids.len(),
                rows = reconciled.height(),
                "Reconciled segment"
            );
            segments.insert(*segment, reconciled);
        }
        split_data.insert(split, segments);
    }

    Ok(split_data)
}

/// Restrict one segment table to the subjects in `ids`.
///
/// Subjects absent from an authoritative segment (Static, Outcome) are a
/// [`SplitError::DataIntegrity`]. Subjects absent from the dynamic segment
/// keep the right-join fill: a single row with every other column missing.
pub fn reconcile_segment(
    table: &DataFrame,
    ids: &Series,
    group: &str,
    segment: Segment,
    split: Split,
) -> Result<DataFrame> {
    let id_dtype = table
        .column(group)
        .map_err(|_| SplitError::MissingColumn {
            segment,
            column: group.to_string(),
        })?
        .dtype()
        .clone();

    let mut keys = ids.cast(&id_dtype)?;
    keys.rename(group.into());
    let keys = DataFrame::new(vec![keys.into_column()])?;

    let missing = count_missing(table, &keys, group)?;
    if missing > 0 {
        if segment.is_authoritative() {
            return Err(SplitError::DataIntegrity {
                segment,
                split,
                missing,
            });
        }
        tracing::warn!(
            segment = %segment,
            split = %split,
            missing,
            "Subjects without rows in segment; filled with missing values"
        );
    }

    let columns: Vec<Expr> = table
        .get_column_names()
        .into_iter()
        .map(|name| col(name.clone()))
        .collect();

    let reconciled = table
        .with_row_index(ROW_INDEX.into(), None)?
        .lazy()
        .join(
            keys.lazy(),
            [col(group)],
            [col(group)],
            JoinArgs::new(JoinType::Right),
        )
        .sort_by_exprs(
            [col(group), col(ROW_INDEX)],
            SortMultipleOptions::default()
                .with_maintain_order(true)
                .with_nulls_last(true),
        )
        .select(columns)
        .collect()?;

    Ok(reconciled)
}

/// Number of `keys` rows whose subject has no row in `table`.
fn count_missing(table: &DataFrame, keys: &DataFrame, group: &str) -> Result<usize> {
    let missing = keys
        .clone()
        .lazy()
        .join(
            table.clone().lazy().select([col(group)]),
            [col(group)],
            [col(group)],
            JoinArgs::new(JoinType::Anti),
        )
        .collect()?;
    Ok(missing.height())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn static_table() -> DataFrame {
        df!(
            "stay_id" => [5i64, 3, 1, 4, 2],
            "age" => [50.0, 30.0, 10.0, 40.0, 20.0],
        )
        .unwrap()
    }

    fn dynamic_table() -> DataFrame {
        df!(
            "stay_id" => [2i64, 1, 2, 1, 3, 2],
            "time" => [0i64, 0, 1, 1, 0, 2],
            "hr" => [80.0, 70.0, 81.0, 71.0, 90.0, 82.0],
        )
        .unwrap()
    }

    fn ids(values: Vec<i64>) -> Series {
        Series::new("stay_id".into(), values)
    }

    #[test]
    fn test_static_rows_sorted_by_id() {
        let out = reconcile_segment(
            &static_table(),
            &ids(vec![4, 1, 5]),
            "stay_id",
            Segment::Static,
            Split::Train,
        )
        .unwrap();

        let stay: Vec<i64> = out
            .column("stay_id")
            .unwrap()
            .i64()
            .unwrap()
            .into_no_null_iter()
            .collect();
        let age: Vec<f64> = out
            .column("age")
            .unwrap()
            .f64()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(stay, vec![1, 4, 5]);
        assert_eq!(age, vec![10.0, 40.0, 50.0]);
    }

    #[test]
    fn test_dynamic_preserves_time_order() {
        let out = reconcile_segment(
            &dynamic_table(),
            &ids(vec![2, 1]),
            "stay_id",
            Segment::Dynamic,
            Split::Val,
        )
        .unwrap();

        let stay: Vec<i64> = out
            .column("stay_id")
            .unwrap()
            .i64()
            .unwrap()
            .into_no_null_iter()
            .collect();
        let time: Vec<i64> = out
            .column("time")
            .unwrap()
            .i64()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(stay, vec![1, 1, 2, 2, 2]);
        assert_eq!(time, vec![0, 1, 0, 1, 2]);
    }

    #[test]
    fn test_column_order_restored() {
        let out = reconcile_segment(
            &dynamic_table(),
            &ids(vec![3]),
            "stay_id",
            Segment::Dynamic,
            Split::Test,
        )
        .unwrap();
        let names: Vec<String> = out
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        assert_eq!(names, ["stay_id", "time", "hr"]);
    }

    #[test]
    fn test_missing_subject_in_static_is_integrity_error() {
        let result = reconcile_segment(
            &static_table(),
            &ids(vec![1, 9]),
            "stay_id",
            Segment::Static,
            Split::Test,
        );
        assert!(matches!(
            result,
            Err(SplitError::DataIntegrity {
                segment: Segment::Static,
                split: Split::Test,
                missing: 1
            })
        ));
    }

    #[test]
    fn test_missing_count_ignores_id_dtype_and_repeated_rows() {
        // dynamic has several rows for subject 2; ids arrive as Int32
        let ids = Series::new("stay_id".into(), [2i32, 7, 1, 8, 9]);
        let keys = ids.cast(&DataType::Int64).unwrap().into_frame();

        assert_eq!(count_missing(&dynamic_table(), &keys, "stay_id").unwrap(), 3);

        let result = reconcile_segment(
            &static_table(),
            &ids,
            "stay_id",
            Segment::Outcome,
            Split::Val,
        );
        assert!(matches!(
            result,
            Err(SplitError::DataIntegrity { missing: 3, .. })
        ));
    }

    #[test]
    fn test_missing_subject_in_dynamic_is_filled() {
        let out = reconcile_segment(
            &dynamic_table(),
            &ids(vec![3, 9]),
            "stay_id",
            Segment::Dynamic,
            Split::Train,
        )
        .unwrap();

        assert_eq!(out.height(), 2);
        assert_eq!(out.column("hr").unwrap().null_count(), 1);
    }

    #[test]
    fn test_missing_group_column() {
        let result = reconcile_segment(
            &static_table(),
            &ids(vec![1]),
            "patient_id",
            Segment::Static,
            Split::Train,
        );
        assert!(matches!(result, Err(SplitError::MissingColumn { .. })));
    }

    #[test]
    fn test_reconcile_all_splits() {
        let mut dataset = Dataset::new();
        dataset.insert(Segment::Static, static_table());
        let assignment = SplitAssignment {
            train: ids(vec![5, 2, 1]),
            val: ids(vec![3]),
            test: ids(vec![4]),
        };

        let data = reconcile(&dataset, &assignment, "stay_id").unwrap();
        assert_eq!(data.len(), 3);
        assert_eq!(data[&Split::Train][&Segment::Static].height(), 3);
        assert_eq!(data[&Split::Val][&Segment::Static].height(), 1);
        assert_eq!(data[&Split::Test][&Segment::Static].height(), 1);
    }
}
