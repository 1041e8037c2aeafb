//! Whole-dataset evaluation and prediction

use super::core::Trainer;
use crate::autograd::Tape;
use crate::data::ArrayDataset;
use crate::model::Model;
use crate::nn::Mode;
use crate::train::Logs;
use crate::{Error, Result};
use ndarray::Array2;

impl<M: Model> Trainer<M> {
    /// Model output for `inputs` in inference mode
    pub fn predict(&self, inputs: &Array2<f32>) -> Result<Array2<f32>> {
        if inputs.nrows() == 0 {
            return Err(Error::EmptyDataset);
        }
        let tape = Tape::inference();
        let x = tape.constant(inputs.clone());
        Ok(self.model.forward(&tape, &x, Mode::Inference)?.into_array())
    }

    /// Reset metrics, then run [`eval_step`](Trainer::eval_step) over every batch
    pub fn evaluate(&mut self, data: &ArrayDataset, batch_size: usize) -> Result<Logs> {
        let batches = data.batches(batch_size, None)?;
        self.reset_metrics();
        let mut logs = Logs::new();
        for batch in &batches {
            logs = self.eval_step(batch)?;
        }
        Ok(logs)
    }
}
