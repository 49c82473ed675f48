//! A regression session: the loaded data, its split and scaling, the current
//! model and the store it persists to.
//!
//! Startup shuffles the observations, drops one if the count is odd, fits
//! min-max stats on everything that remains and halves the result into a
//! testing set (first half) and a training set (second half). After that the
//! session answers commands:
//!
//! | Command | Needs a model | Effect |
//! |---|---|---|
//! | [`train`](Session::train) | no | replaces the model on success |
//! | [`test`](Session::test) | yes | loss on the testing half |
//! | [`save`](Session::save) | yes | writes model and stats to the store |
//! | [`load`](Session::load) | no | replaces the model with the stored one |
//! | [`predict`](Session::predict) | yes | price for a square footage |
//! | [`prediction_line`](Session::prediction_line) | yes | samples of the fitted line |
//!
//! Every failing command leaves the session as it was.

use crate::backend::{Backend, Tensor1D};
use crate::config::RegressionConfig;
use crate::dataset::{shuffle_even, split_halves, InMemoryDataset, Observation, SplitDataset};
use crate::error::{RegressionError, Result};
use crate::evaluation::evaluate;
use crate::loader::{DataSource, FEATURE_COLUMN, LABEL_COLUMN};
use crate::loss::MSELoss;
use crate::model::linear::{LinearModel, LinearParams, LinearRegression};
use crate::model::{Fitted, InferenceModel};
use crate::optimizer::SGD;
use crate::predict::{Prediction, Predictor};
use crate::preprocessing::{
    FittedMinMaxScaler, FittedTransformer, MinMaxScaler, NormalizationStats, Transformer,
};
use crate::storage::{ModelArtifactsInfo, ModelStore, SavedModel};
use crate::trainer::{EpochReport, Trainer, TrainingHistory, TrainingResult};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Where the current model came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelStatus {
    Untrained,
    /// `saved` holds the save timestamp (ms since the Unix epoch) once saved.
    Trained { saved: Option<u64> },
    Loaded { date_saved: u64 },
}

/// Fitted model with the scalers it was trained under.
#[derive(Clone)]
struct ActiveModel<B: Backend> {
    model: LinearModel<B, Fitted>,
    feature: FittedMinMaxScaler<B>,
    label: FittedMinMaxScaler<B>,
}

impl<B: Backend> ActiveModel<B> {
    fn predictor(&self) -> Predictor<'_, B, LinearModel<B, Fitted>> {
        Predictor::new(&self.model, self.feature.stats(), self.label.stats())
    }
}

type SessionTrainer<B> = Trainer<B, MSELoss, SGD<B>, LinearRegression<B>, LinearParams<B>>;

pub struct Session<B: Backend, S: ModelStore> {
    config: RegressionConfig,
    store: S,
    rng: StdRng,
    split: SplitDataset,
    dropped: Option<Observation>,
    feature_scaler: FittedMinMaxScaler<B>,
    label_scaler: FittedMinMaxScaler<B>,
    training: InMemoryDataset,
    active: Option<ActiveModel<B>>,
    status: ModelStatus,
    history: Option<TrainingHistory>,
}

/// Session on the default CPU backend.
#[cfg(feature = "cpu")]
pub type CpuSession<S> = Session<crate::backend::CpuBackend, S>;

fn normalized<B: Backend>(
    observations: &[Observation],
    feature: &FittedMinMaxScaler<B>,
    label: &FittedMinMaxScaler<B>,
) -> Result<InMemoryDataset> {
    InMemoryDataset::from_observations(
        observations,
        |x| feature.normalize_value(x),
        |y| label.normalize_value(y),
    )
}

/// Rejects the first observation with a non-finite field, by 1-based position.
fn check_finite(observations: &[Observation]) -> Result<()> {
    for (i, o) in observations.iter().enumerate() {
        for (column, value) in [(FEATURE_COLUMN, o.feature), (LABEL_COLUMN, o.label)] {
            if !value.is_finite() {
                return Err(RegressionError::MalformedRow {
                    row: i + 1,
                    column: column.to_string(),
                    value: value.to_string(),
                });
            }
        }
    }
    Ok(())
}

impl<B: Backend, S: ModelStore> Session<B, S> {
    /// Runs the startup pipeline over already-loaded observations.
    ///
    /// # Errors
    /// - invalid configuration
    /// - fewer than two observations
    /// - a non-finite feature or label
    /// - a column whose min equals its max
    pub fn start(
        mut observations: Vec<Observation>,
        config: RegressionConfig,
        store: S,
    ) -> Result<Self> {
        config.validate()?;
        check_finite(&observations)?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let dropped = shuffle_even(&mut observations, &mut rng);
        if observations.len() < 2 {
            return Err(RegressionError::EmptyDataset(format!(
                "need at least 2 observations, got {}",
                observations.len()
            )));
        }

        let features = Tensor1D::<B>::new(observations.iter().map(|o| o.feature).collect());
        let labels = Tensor1D::<B>::new(observations.iter().map(|o| o.label).collect());
        let feature_scaler = MinMaxScaler::<B>::new(FEATURE_COLUMN).fit(&features)?;
        let label_scaler = MinMaxScaler::<B>::new(LABEL_COLUMN).fit(&labels)?;

        let split = split_halves(&observations)?;
        let training = normalized(&split.training, &feature_scaler, &label_scaler)?;

        let (n_train, n_test) = split.sizes();
        info!(
            "split {} observations: {} training, {} testing",
            observations.len(),
            n_train,
            n_test
        );
        info!(
            "{} range [{}, {}], {} range [{}, {}]",
            FEATURE_COLUMN,
            feature_scaler.stats().min,
            feature_scaler.stats().max,
            LABEL_COLUMN,
            label_scaler.stats().min,
            label_scaler.stats().max
        );

        Ok(Self {
            config,
            store,
            rng,
            split,
            dropped,
            feature_scaler,
            label_scaler,
            training,
            active: None,
            status: ModelStatus::Untrained,
            history: None,
        })
    }

    /// Loads observations from `source`, then runs [`start`](Self::start).
    pub fn from_source(source: &DataSource, config: RegressionConfig, store: S) -> Result<Self> {
        let observations = source.load()?;
        Self::start(observations, config, store)
    }

    /// Trains a fresh model on the training half.
    ///
    /// `on_epoch_end` runs after every epoch. The current model is replaced
    /// only when training completes.
    pub fn train<F>(&mut self, on_epoch_end: F) -> Result<TrainingResult>
    where
        F: FnMut(&EpochReport<'_, LinearRegression<B>>),
    {
        let optimizer = SGD::new(self.config.learning_rate);
        let mut builder = SessionTrainer::<B>::builder(MSELoss, optimizer)
            .batch_size(self.config.batch_size)
            .max_epochs(self.config.epochs)
            .validation_split(self.config.validation_split)
            .shuffle(self.config.shuffle_each_epoch)
            .verbose(self.config.verbose);
        if self.config.seed.is_some() {
            builder = builder.seed(self.rng.random());
        }
        let trainer = builder.build();

        let (model, history) =
            trainer.fit_with_callback(LinearRegression::<B>::new(1), &self.training, on_epoch_end)?;
        let result = history
            .result()
            .ok_or_else(|| RegressionError::InvalidParameter("training ran no epochs".into()))?;
        let weights = model.weights();
        if !result.loss.is_finite()
            || !result.val_loss.map_or(true, f64::is_finite)
            || weights.iter().any(|w| !w.is_finite())
        {
            warn!("training diverged, keeping the previous model");
            return Err(RegressionError::Diverged(format!(
                "loss = {}, val_loss = {:?}, weights = {:?}",
                result.loss, result.val_loss, weights
            )));
        }

        info!("trained: loss = {}, val_loss = {:?}", result.loss, result.val_loss);
        self.active = Some(ActiveModel {
            model,
            feature: self.feature_scaler.clone(),
            label: self.label_scaler.clone(),
        });
        self.status = ModelStatus::Trained { saved: None };
        self.history = Some(history);
        Ok(result)
    }

    /// MSE of the current model on the testing half, in normalized units.
    pub fn test(&self) -> Result<f64> {
        let active = self.active()?;
        let testing = normalized(&self.split.testing, &active.feature, &active.label)?;
        let loss = evaluate::<B, _, _, _>(&active.model, &testing, &MSELoss)?;
        info!("test loss = {}", loss);
        Ok(loss)
    }

    /// Persists the current model and its stats under the configured key.
    pub fn save(&mut self) -> Result<ModelArtifactsInfo> {
        let active = self.active()?;
        let saved = SavedModel {
            params: active.model.extract_params(),
            feature_stats: active.feature.extract_params(),
            label_stats: active.label.extract_params(),
        };
        let info = self.store.save(&self.config.storage_key, &saved)?;
        if let ModelStatus::Trained { saved } = &mut self.status {
            *saved = Some(info.date_saved);
        }
        Ok(info)
    }

    /// Replaces the current model with the one stored under the configured key.
    pub fn load(&mut self) -> Result<ModelArtifactsInfo> {
        let key = &self.config.storage_key;
        let Some((saved, info)) = self.store.load(key)? else {
            warn!("no saved model under '{}'", key);
            return Err(RegressionError::ModelNotFound(key.clone()));
        };

        let active = ActiveModel {
            model: LinearModel::<B, Fitted>::from_params(saved.params)?,
            feature: FittedMinMaxScaler::from_params(saved.feature_stats)?,
            label: FittedMinMaxScaler::from_params(saved.label_stats)?,
        };
        info!("loaded model '{}' saved at {}", key, info.date_saved);
        self.active = Some(active);
        self.status = ModelStatus::Loaded {
            date_saved: info.date_saved,
        };
        Ok(info)
    }

    /// Predicts the price for text input such as `"2080"`.
    pub fn predict(&self, input: &str) -> Result<Prediction> {
        self.active()?.predictor().predict_str(input)
    }

    /// `points` samples of the fitted line as `(square_feet, price)` pairs.
    pub fn prediction_line(&self, points: usize) -> Result<Vec<(f64, f64)>> {
        Ok(self.active()?.predictor().line(points))
    }

    /// Feature and label stats of the loaded data.
    pub fn stats(&self) -> (NormalizationStats, NormalizationStats) {
        (self.feature_scaler.stats(), self.label_scaler.stats())
    }

    /// `(training, testing)` sizes.
    pub fn split_sizes(&self) -> (usize, usize) {
        self.split.sizes()
    }

    /// Raw observations of both halves, in shuffled order.
    pub fn split(&self) -> &SplitDataset {
        &self.split
    }

    /// Observation removed to make the count even, if any.
    pub fn dropped(&self) -> Option<Observation> {
        self.dropped
    }

    pub fn status(&self) -> ModelStatus {
        self.status
    }

    pub fn has_model(&self) -> bool {
        self.active.is_some()
    }

    /// Current model weights, if any.
    pub fn weights(&self) -> Option<Vec<f64>> {
        self.active.as_ref().map(|a| a.model.weights())
    }

    /// Per-epoch losses of the most recent training run.
    pub fn history(&self) -> Option<&TrainingHistory> {
        self.history.as_ref()
    }

    pub fn config(&self) -> &RegressionConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn active(&self) -> Result<&ActiveModel<B>> {
        self.active.as_ref().ok_or(RegressionError::ModelNotReady)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;
    use crate::storage::MemoryStore;

    fn observations(n: usize) -> Vec<Observation> {
        (0..n)
            .map(|i| {
                let sqft = 500.0 + 10.0 * i as f64;
                Observation::new(sqft, 150.0 * sqft + 20_000.0)
            })
            .collect()
    }

    fn session(n: usize) -> CpuSession<MemoryStore> {
        let config = RegressionConfig::default().with_seed(42);
        Session::start(observations(n), config, MemoryStore::new()).unwrap()
    }

    #[test]
    fn test_start_split_and_stats() {
        let s = session(101);
        assert_eq!(s.split_sizes(), (50, 50));
        assert!(s.dropped().is_some());

        let (feature, label) = s.stats();
        assert!(feature.max > feature.min);
        assert!(label.max > label.min);
        assert_eq!(s.status(), ModelStatus::Untrained);
        assert!(!s.has_model());
    }

    #[test]
    fn test_stats_cover_both_halves() {
        let s = session(100);
        let (feature, _) = s.stats();
        let all: Vec<f64> = s
            .split
            .training
            .iter()
            .chain(&s.split.testing)
            .map(|o| o.feature)
            .collect();
        let min = all.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = all.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        assert_eq!((feature.min, feature.max), (min, max));
    }

    #[test]
    fn test_commands_need_a_model() {
        let mut s = session(20);
        assert!(matches!(s.test(), Err(RegressionError::ModelNotReady)));
        assert!(matches!(s.save(), Err(RegressionError::ModelNotReady)));
        assert!(matches!(s.predict("1000"), Err(RegressionError::ModelNotReady)));
        assert!(matches!(s.prediction_line(10), Err(RegressionError::ModelNotReady)));
        assert!(s.store().list_models().unwrap().is_empty());
    }

    #[test]
    fn test_load_without_saved_model() {
        let mut s = session(20);
        let err = s.load().unwrap_err();
        assert!(
            matches!(err, RegressionError::ModelNotFound(ref key) if key == "house-price-regression")
        );
        assert_eq!(s.status(), ModelStatus::Untrained);
    }

    #[test]
    fn test_train_updates_status_and_history() {
        let mut s = session(200);
        let mut epochs = 0;
        let result = s.train(|_| epochs += 1).unwrap();

        assert_eq!(epochs, 20);
        assert!(result.val_loss.is_some());
        assert_eq!(s.history().unwrap().epochs(), 20);
        assert_eq!(s.status(), ModelStatus::Trained { saved: None });

        let info = s.save().unwrap();
        assert_eq!(
            s.status(),
            ModelStatus::Trained {
                saved: Some(info.date_saved)
            }
        );
    }

    #[test]
    fn test_failed_training_keeps_previous_model() {
        let mut s = session(200);
        s.train(|_| {}).unwrap();
        let before = s.weights();

        s.config.batch_size = 0;
        assert!(s.train(|_| {}).is_err());
        assert_eq!(s.weights(), before);
    }

    #[test]
    fn test_diverging_training_keeps_previous_model() {
        let mut s = session(200);
        s.train(|_| {}).unwrap();
        let before = s.weights();
        let prediction = s.predict("1500").unwrap();

        s.config.learning_rate = 1e300;
        let err = s.train(|_| {}).unwrap_err();
        assert!(matches!(err, RegressionError::Diverged(_)), "{err}");
        assert_eq!(s.weights(), before);
        assert_eq!(s.status(), ModelStatus::Trained { saved: None });

        s.save().unwrap();
        s.load().unwrap();
        assert_eq!(s.predict("1500").unwrap(), prediction);
    }

    #[test]
    fn test_non_finite_observation_rejected() {
        let mut data = observations(10);
        data[3].label = f64::NAN;
        let config = RegressionConfig::default().with_seed(3);
        let err = CpuSession::start(data, config, MemoryStore::new())
            .err()
            .unwrap();
        assert!(matches!(
            err,
            RegressionError::MalformedRow { row: 4, ref column, .. } if column == "price"
        ));

        let mut data = observations(10);
        data[0].feature = f64::INFINITY;
        let config = RegressionConfig::default().with_seed(3);
        let err = CpuSession::start(data, config, MemoryStore::new())
            .err()
            .unwrap();
        assert!(matches!(
            err,
            RegressionError::MalformedRow { row: 1, ref column, .. } if column == "sqft_living"
        ));
    }

    #[test]
    fn test_seeded_sessions_match() {
        let mut a = session(120);
        let mut b = session(120);
        assert_eq!(a.split, b.split);
        a.train(|_| {}).unwrap();
        b.train(|_| {}).unwrap();
        assert_eq!(a.weights(), b.weights());
    }

    #[test]
    fn test_unshuffled_training_repeats() {
        let config = RegressionConfig::default()
            .with_seed(9)
            .with_shuffle_each_epoch(false)
            .with_prediction_line_points(12);
        let mut s = CpuSession::start(observations(150), config, MemoryStore::new()).unwrap();

        s.train(|_| {}).unwrap();
        let first = s.weights();
        s.train(|_| {}).unwrap();
        assert_eq!(s.weights(), first);

        let line = s.prediction_line(s.config().prediction_line_points).unwrap();
        assert_eq!(line.len(), 12);
        assert!(line.windows(2).all(|w| w[1].0 > w[0].0 && w[1].1 >= w[0].1));
    }

    #[test]
    fn test_too_few_observations() {
        let config = RegressionConfig::default().with_seed(1);
        let err = CpuSession::start(observations(1), config, MemoryStore::new())
            .err()
            .unwrap();
        assert!(matches!(err, RegressionError::EmptyDataset(_)));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = RegressionConfig::default().with_learning_rate(-1.0);
        let started = Session::<CpuBackend, _>::start(observations(10), config, MemoryStore::new());
        assert!(started.is_err());
    }
}
