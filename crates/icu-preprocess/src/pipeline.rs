//! The preprocessing run.

use std::path::Path;
use std::sync::Arc;

use icu_cache::{CacheKey, CacheStore, fingerprint};
use icu_ingest::load_dataset;
use icu_model::{ConfigError, Dataset, Segment, SplitData};
use icu_split::{NestedSplitter, SplitError, reconcile};
use polars::prelude::*;

use crate::config::PreprocessConfig;
use crate::error::{PipelineError, Result};
use crate::preprocessor::{ImputationModel, Preprocessor};

const ROW_INDEX: &str = "__icu_row_nr";

/// Load, split, reconcile and preprocess one fold of the data in `data_dir`.
///
/// The configuration is derived and validated before anything is read, so
/// configuration errors never depend on the state of the disk. With
/// `load_cache` a cached result is returned as is; a cache miss falls through
/// to the full computation. With `generate_cache` the preprocessed result is
/// written to `<data_dir>/cache`.
///
/// `imputation_model` is bound to the preprocessor if it supports it.
pub fn preprocess_data(
    data_dir: &Path,
    config: &PreprocessConfig,
    preprocessor: &mut dyn Preprocessor,
    imputation_model: Option<Arc<dyn ImputationModel>>,
) -> Result<SplitData> {
    let span = tracing::info_span!(
        "preprocess",
        seed = config.seed,
        repetition = config.repetition_index,
        fold = config.fold_index
    );
    let _guard = span.enter();

    let config = config.derive();
    config.validate()?;

    tracing::info!("Using preprocessor: {}", preprocessor.name());
    if let Some(binding) = preprocessor.imputation_binding() {
        binding.set_imputation_model(imputation_model);
    } else if let Some(model) = imputation_model {
        tracing::warn!(
            preprocessor = preprocessor.name(),
            model = model.name(),
            "Preprocessor does not support imputation models; ignoring"
        );
    }

    let digest = fingerprint(
        &preprocessor.to_cache_string(),
        &config.file_names,
        &config.vars,
        config.debug,
    )?;
    let key = CacheKey::new(config.seed, config.repetition_index, config.fold_index, digest);
    let store = CacheStore::new(data_dir).with_overwrite(config.overwrite_cache);

    if config.load_cache {
        match store.load(&key) {
            Ok(data) => return Ok(data),
            Err(e) if e.is_miss() => tracing::info!(
                "No cached data found in {}, loading raw features",
                store.path_for(&key).display()
            ),
            Err(e) => return Err(e.into()),
        }
    }

    tracing::info!("Loading data from directory {}", data_dir.display());
    let dataset = load_dataset(data_dir, &config.file_names)?;

    tracing::info!("Generating splits");
    let group = config.vars.group()?;
    let ids = subject_ids(&dataset, config.file_names.subject_source()?, group)?;

    let labels = match config.vars.label()? {
        Some(label) if config.run_mode.allows_stratification() => {
            let outcome = dataset
                .get(&Segment::Outcome)
                .ok_or(ConfigError::MissingSegment {
                    segment: Segment::Outcome,
                })?;
            Some(subject_labels(outcome, &ids, group, label)?)
        }
        _ => None,
    };

    let assignment = NestedSplitter::new(config.coordinates(), config.run_mode)
        .with_debug(config.debug)
        .split(&ids, labels.as_ref())?;
    let data = reconcile(&dataset, &assignment, group)?;

    let expected = layout(&data);
    let data = preprocessor.apply(data, &config.vars)?;
    let found = layout(&data);
    if found != expected {
        return Err(PipelineError::ShapeMismatch {
            name: preprocessor.name().to_string(),
            expected: expected.join(", "),
            found: found.join(", "),
        });
    }

    if config.generate_cache {
        store.save(&key, &data)?;
    } else {
        tracing::info!("Cache will not be saved");
    }

    tracing::info!("Finished preprocessing");
    Ok(data)
}

/// Per-subject stratification labels aligned to `ids`.
///
/// A subject's label is the maximum of its `label` values in the outcome
/// table. Subjects without any outcome row get a missing label.
pub fn subject_labels(
    outcome: &DataFrame,
    ids: &Series,
    group: &str,
    label: &str,
) -> Result<Series> {
    let missing_column = |column: &str| SplitError::MissingColumn {
        segment: Segment::Outcome,
        column: column.to_string(),
    };
    let id_dtype = outcome
        .column(group)
        .map_err(|_| missing_column(group))?
        .dtype()
        .clone();
    if outcome.column(label).is_err() {
        return Err(missing_column(label).into());
    }

    let per_subject = outcome
        .clone()
        .lazy()
        .group_by([col(group)])
        .agg([col(label).max()]);

    let mut keys = ids.cast(&id_dtype)?;
    keys.rename(group.into());

    let labels = DataFrame::new(vec![keys.into_column()])?
        .with_row_index(ROW_INDEX.into(), None)?
        .lazy()
        .join(
            per_subject,
            [col(group)],
            [col(group)],
            JoinArgs::new(JoinType::Left),
        )
        .sort_by_exprs([col(ROW_INDEX)], SortMultipleOptions::default())
        .select([col(label)])
        .collect()?;

    Ok(labels.column(label)?.as_materialized_series().clone())
}

/// Distinct subject ids of the `source` segment in order of first appearance.
fn subject_ids(dataset: &Dataset, source: Segment, group: &str) -> Result<Series> {
    let table = dataset
        .get(&source)
        .ok_or(ConfigError::MissingSegment { segment: source })?;
    let ids = table
        .column(group)
        .map_err(|_| SplitError::MissingColumn {
            segment: source,
            column: group.to_string(),
        })?
        .as_materialized_series()
        .drop_nulls()
        .unique_stable()?;

    tracing::debug!(segment = %source, subjects = ids.len(), "Collected subject ids");
    Ok(ids)
}

fn layout(data: &SplitData) -> Vec<String> {
    data.iter()
        .flat_map(|(split, segments)| {
            segments
                .keys()
                .map(move |segment| format!("{split}/{segment}"))
        })
        .collect()
}
