/// Marker type for a model that is **not yet trained**.
///
/// `LinearModel<B, Unfitted>` implements [`TrainableModel`](super::TrainableModel)
/// only, so an untrained model cannot be asked for predictions.
#[derive(Debug, Clone, Copy)]
pub struct Unfitted;

/// Marker type for a **trained** model.
///
/// `LinearModel<B, Fitted>` implements [`InferenceModel`](super::InferenceModel)
/// and carries only inference parameters: no optimizer state, loss function or
/// training hyperparameters.
#[derive(Debug, Clone, Copy)]
pub struct Fitted;
