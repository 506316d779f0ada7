//! Preprocessor capability.
//!
//! The orchestrator only needs two things from a preprocessor: a transform
//! over the split data and a string describing its state for the cache key.
//! Binding a pretrained imputation model is an optional extra capability,
//! discovered through [`Preprocessor::imputation_binding`].

use std::fmt;
use std::sync::Arc;

use icu_model::{SplitData, VariableMap};

use crate::error::Result;

/// A pretrained model used to fill missing values.
pub trait ImputationModel: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    /// Identity of the model as it should appear in cache keys.
    fn cache_identity(&self) -> String {
        self.name().to_string()
    }
}

/// Preprocessors that can use a pretrained imputation model.
pub trait ImputationBinding {
    fn set_imputation_model(&mut self, model: Option<Arc<dyn ImputationModel>>);
}

/// Feature transformation applied to every split after reconciliation.
pub trait Preprocessor {
    fn name(&self) -> &str;

    /// Transform the split data.
    ///
    /// Called exactly once per run. The result must keep the split and
    /// segment layout of `data`.
    fn apply(&mut self, data: SplitData, vars: &VariableMap) -> Result<SplitData>;

    /// State that changes the output of [`apply`](Self::apply).
    ///
    /// Part of the cache fingerprint: two preprocessors with equal cache
    /// strings must produce equal output.
    fn to_cache_string(&self) -> String;

    /// Imputation model binding, if supported.
    fn imputation_binding(&mut self) -> Option<&mut dyn ImputationBinding> {
        None
    }
}

/// Returns the split data unchanged.
#[derive(Debug, Clone, Default)]
pub struct PassthroughPreprocessor {
    use_static_features: bool,
    imputation_model: Option<Arc<dyn ImputationModel>>,
}

impl PassthroughPreprocessor {
    pub fn new(use_static_features: bool) -> Self {
        Self {
            use_static_features,
            imputation_model: None,
        }
    }

    pub fn use_static_features(&self) -> bool {
        self.use_static_features
    }

    pub fn imputation_model(&self) -> Option<&Arc<dyn ImputationModel>> {
        self.imputation_model.as_ref()
    }
}

impl Preprocessor for PassthroughPreprocessor {
    fn name(&self) -> &str {
        "passthrough"
    }

    fn apply(&mut self, data: SplitData, _vars: &VariableMap) -> Result<SplitData> {
        Ok(data)
    }

    fn to_cache_string(&self) -> String {
        let model = self
            .imputation_model
            .as_ref()
            .map_or_else(|| "none".to_string(), |model| model.cache_identity());
        format!(
            "{}(use_static_features={}, imputation_model={})",
            self.name(),
            self.use_static_features,
            model
        )
    }

    fn imputation_binding(&mut self) -> Option<&mut dyn ImputationBinding> {
        Some(self)
    }
}

impl ImputationBinding for PassthroughPreprocessor {
    fn set_imputation_model(&mut self, model: Option<Arc<dyn ImputationModel>>) {
        self.imputation_model = model;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Mean;

    impl ImputationModel for Mean {
        fn name(&self) -> &str {
            "mean"
        }
    }

    #[test]
    fn test_cache_string_tracks_state() {
        let mut preprocessor = PassthroughPreprocessor::new(true);
        let plain = preprocessor.to_cache_string();
        assert_eq!(
            plain,
            "passthrough(use_static_features=true, imputation_model=none)"
        );

        preprocessor
            .imputation_binding()
            .unwrap()
            .set_imputation_model(Some(Arc::new(Mean)));
        assert_eq!(
            preprocessor.to_cache_string(),
            "passthrough(use_static_features=true, imputation_model=mean)"
        );

        assert_ne!(
            PassthroughPreprocessor::new(false).to_cache_string(),
            plain
        );
    }

    #[test]
    fn test_apply_returns_input() {
        let mut preprocessor = PassthroughPreprocessor::new(true);
        let out = preprocessor
            .apply(SplitData::new(), &VariableMap::new())
            .unwrap();
        assert!(out.is_empty());
    }
}
