//! Rolling forecasts with one-step sequence models.
//!
//! A [`SequenceModel`] maps a window of the last `n_input` rows to the next
//! row. [`generate_predictions`] feeds each prediction back into the window
//! to forecast several steps ahead.

mod linear;
mod rolling;
mod window;

pub use linear::LinearSequenceModel;
pub use rolling::{generate_predictions, generate_univariate_predictions, SequenceModel};
pub use window::SequenceWindow;
