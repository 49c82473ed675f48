use crate::{
    backend::{Backend, Scalar, Tensor1D, Tensor2D},
    dataset::{Dataset, InMemoryDataset},
    error::{RegressionError, Result},
    loss::Loss,
    model::{ParamOps, TrainableModel},
    optimizer::Optimizer,
};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Loss values of the final epoch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    pub loss: f64,
    /// `None` when training ran without a validation split.
    pub val_loss: Option<f64>,
}

/// Per-epoch loss series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingHistory {
    pub loss: Vec<f64>,
    /// Empty when training ran without a validation split.
    pub val_loss: Vec<f64>,
}

impl TrainingHistory {
    pub fn epochs(&self) -> usize {
        self.loss.len()
    }

    /// Final-epoch values, `None` if no epoch has run.
    pub fn result(&self) -> Option<TrainingResult> {
        let loss = *self.loss.last()?;
        Some(TrainingResult {
            loss,
            val_loss: self.val_loss.last().copied(),
        })
    }
}

/// Passed to the progress callback after every epoch.
pub struct EpochReport<'a, M> {
    /// Zero-based.
    pub epoch: usize,
    pub loss: f64,
    pub val_loss: Option<f64>,
    /// Model after this epoch's updates.
    pub model: &'a M,
}

/// Orchestrates the training loop for a `TrainableModel`.
///
/// Combines a loss function and an optimizer. The trailing
/// `validation_split` fraction of the training data is held out before any
/// shuffling; the rest is reshuffled at the start of each epoch when
/// `shuffle` is on.
pub struct Trainer<B, L, O, M, P>
where
    B: Backend,
    L: Loss<B>,
    M: TrainableModel<B, Params = P, Gradients = P>,
    O: Optimizer<B, P>,
{
    pub(crate) batch_size: usize,
    pub(crate) max_epochs: usize,
    pub(crate) verbose: bool,
    pub(crate) validation_split: f64,
    pub(crate) shuffle: bool,
    pub(crate) seed: Option<u64>,
    pub(crate) loss_fn: L,
    pub(crate) optimizer: O,
    _phantom_backend: PhantomData<B>,
    _phantom_model: PhantomData<M>,
}

/// Fluent builder for a `Trainer`.
///
/// Defaults:
/// - `batch_size`: 32
/// - `max_epochs`: 20
/// - `validation_split`: 0.2
/// - `shuffle`: true
/// - `seed`: none (OS entropy)
/// - `verbose`: false
pub struct TrainerBuilder<B, L, O, M, P>
where
    B: Backend,
    L: Loss<B>,
    M: TrainableModel<B, Params = P, Gradients = P>,
    O: Optimizer<B, P>,
{
    batch_size: usize,
    max_epochs: usize,
    verbose: bool,
    validation_split: f64,
    shuffle: bool,
    seed: Option<u64>,
    loss_fn: L,
    optimizer: O,
    _phantom_backend: PhantomData<B>,
    _phantom_model: PhantomData<M>,
}

impl<B, L, O, M, P> TrainerBuilder<B, L, O, M, P>
where
    B: Backend,
    L: Loss<B>,
    M: TrainableModel<B, Params = P, Gradients = P>,
    O: Optimizer<B, P>,
{
    pub fn new(loss_fn: L, optimizer: O) -> Self {
        Self {
            batch_size: 32,
            max_epochs: 20,
            verbose: false,
            validation_split: 0.2,
            shuffle: true,
            seed: None,
            loss_fn,
            optimizer,
            _phantom_backend: PhantomData,
            _phantom_model: PhantomData,
        }
    }

    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    pub fn max_epochs(mut self, epochs: usize) -> Self {
        self.max_epochs = epochs;
        self
    }

    /// When `true`, per-epoch losses are logged at `info` instead of `debug`.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn validation_split(mut self, split: f64) -> Self {
        self.validation_split = split;
        self
    }

    pub fn shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> Trainer<B, L, O, M, P> {
        Trainer {
            batch_size: self.batch_size,
            max_epochs: self.max_epochs,
            verbose: self.verbose,
            validation_split: self.validation_split,
            shuffle: self.shuffle,
            seed: self.seed,
            loss_fn: self.loss_fn,
            optimizer: self.optimizer,
            _phantom_backend: PhantomData,
            _phantom_model: PhantomData,
        }
    }
}

impl<B, L, O, M, P> Trainer<B, L, O, M, P>
where
    B: Backend,
    L: Loss<B, Target = Tensor1D<B>, Prediction = Tensor1D<B>>,
    M: TrainableModel<
        B,
        Input = Tensor2D<B>,
        Prediction = L::Prediction,
        Params = P,
        Gradients = P,
    >,
    O: Optimizer<B, P>,
    P: ParamOps<B>,
{
    /// Trains `model` on `dataset` for `max_epochs` epochs.
    ///
    /// # Errors
    /// - `batch_size` or `max_epochs` is zero
    /// - the validation split is outside `[0, 1)` or leaves no training samples
    pub fn fit(&self, model: M, dataset: &InMemoryDataset) -> Result<(M::Output, TrainingHistory)> {
        self.fit_with_callback(model, dataset, |_| {})
    }

    /// Like [`fit`](Self::fit), invoking `on_epoch_end` after every epoch.
    pub fn fit_with_callback<F>(
        &self,
        mut model: M,
        dataset: &InMemoryDataset,
        mut on_epoch_end: F,
    ) -> Result<(M::Output, TrainingHistory)>
    where
        F: FnMut(&EpochReport<'_, M>),
    {
        if self.batch_size == 0 {
            return Err(RegressionError::InvalidParameter(
                "batch_size must be at least 1".into(),
            ));
        }
        if self.max_epochs == 0 {
            return Err(RegressionError::InvalidParameter(
                "max_epochs must be at least 1".into(),
            ));
        }

        let (train, validation) = dataset.split_tail(self.validation_split)?;
        debug!(
            "training on {} samples, validating on {}",
            train.n_samples(),
            validation.as_ref().map_or(0, |v| v.n_samples())
        );
        let validation = validation.map(|v| v.to_tensors::<B>());

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let mut history = TrainingHistory::default();
        for epoch in 0..self.max_epochs {
            let loss = if self.shuffle {
                self.run_epoch(&mut model, &train.shuffled(&mut rng))?
            } else {
                self.run_epoch(&mut model, &train)?
            };

            let val_loss = validation
                .as_ref()
                .map(|(x, y)| self.loss_fn.loss(&model.forward(x), y).to_f64());

            if !loss.is_finite() {
                warn!("epoch {}: loss is not finite ({})", epoch, loss);
            }
            match (self.verbose, val_loss) {
                (true, Some(v)) => info!("Epoch {}: loss = {}, val_loss = {}", epoch, loss, v),
                (true, None) => info!("Epoch {}: loss = {}", epoch, loss),
                (false, Some(v)) => debug!("Epoch {}: loss = {}, val_loss = {}", epoch, loss, v),
                (false, None) => debug!("Epoch {}: loss = {}", epoch, loss),
            }

            history.loss.push(loss);
            if let Some(v) = val_loss {
                history.val_loss.push(v);
            }
            on_epoch_end(&EpochReport {
                epoch,
                loss,
                val_loss,
                model: &model,
            });
        }

        Ok((model.into_fitted(), history))
    }

    /// One pass of mini-batch updates. Returns the sample-weighted mean of
    /// the batch losses, each measured before its update.
    fn run_epoch<D: Dataset>(&self, model: &mut M, dataset: &D) -> Result<f64> {
        let n_total = dataset
            .len()
            .ok_or_else(|| RegressionError::InvalidParameter("dataset length unknown".into()))?;
        if n_total == 0 {
            return Err(RegressionError::EmptyDataset("no training samples".into()));
        }

        let mut total_loss = Scalar::<B>::new(0.0);
        for batch_result in dataset.batches::<B>(self.batch_size) {
            let (batch_x, batch_y) = batch_result
                .map_err(|e| RegressionError::Io(format!("failed to load batch: {:?}", e)))?;
            let batch_n = Scalar::<B>::new(batch_y.len() as f64);

            let preds = model.forward(&batch_x);
            total_loss = total_loss + self.loss_fn.loss(&preds, &batch_y) * batch_n;

            let grad_preds = self.loss_fn.grad_wrt_prediction(&preds, &batch_y);
            let grads = model.backward(&batch_x, &grad_preds);
            let new_params = self.optimizer.step(model.params(), &grads);
            model.update_params(&new_params);
        }

        Ok((total_loss / Scalar::<B>::new(n_total as f64)).to_f64())
    }
}

impl<B, L, O, M, P> Trainer<B, L, O, M, P>
where
    B: Backend,
    L: Loss<B>,
    M: TrainableModel<B, Params = P, Gradients = P>,
    O: Optimizer<B, P>,
{
    /// Equivalent to `TrainerBuilder::new(...)`.
    pub fn builder(loss_fn: L, optimizer: O) -> TrainerBuilder<B, L, O, M, P> {
        TrainerBuilder::new(loss_fn, optimizer)
    }
}
