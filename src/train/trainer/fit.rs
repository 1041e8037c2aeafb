//! Multi-epoch training loop

use super::core::Trainer;
use super::result::History;
use crate::data::ArrayDataset;
use crate::model::Model;
use crate::train::callback::{CallbackAction, CallbackContext};
use crate::train::{FitOptions, Logs};
use crate::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;

impl<M: Model> Trainer<M> {
    /// Train for `options.epochs` epochs with callbacks
    ///
    /// Each epoch resets the metrics, runs [`train_step`](Trainer::train_step)
    /// over every (optionally shuffled) batch and snapshots the logs. With
    /// `validation` data the metrics are reset again and
    /// [`eval_step`](Trainer::eval_step) results are added with a `val_`
    /// prefix. A callback returning [`CallbackAction::Stop`] ends training
    /// after the current event.
    ///
    /// # Example
    ///
    /// ```
    /// use paso::data::synthetic::{blobs, BlobSpec};
    /// use paso::model::Sequential;
    /// use paso::nn::{Activation, Dense};
    /// use paso::optim::Adam;
    /// use paso::train::{FitOptions, SparseCategoricalCrossentropy, Trainer};
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let data = blobs(BlobSpec::default(), 1).unwrap();
    /// let (train, val) = data.split_validation(0.2).unwrap();
    /// let mut rng = StdRng::seed_from_u64(1);
    /// let model = Sequential::new("clf").add(Dense::new("out", 4, 3, Activation::Softmax, &mut rng));
    /// let mut trainer = Trainer::builder(model)
    ///     .optimizer(Adam::default_params(0.01))
    ///     .loss(SparseCategoricalCrossentropy::default())
    ///     .build()
    ///     .unwrap();
    ///
    /// let history = trainer.fit(&train, Some(&val), &FitOptions::new(2, 32)).unwrap();
    /// assert_eq!(history.len(), 2);
    /// assert!(history.epochs[1].contains_key("val_loss"));
    /// ```
    pub fn fit(
        &mut self,
        train: &ArrayDataset,
        validation: Option<&ArrayDataset>,
        options: &FitOptions,
    ) -> Result<History> {
        options.validate()?;
        let start = Instant::now();
        let mut rng = StdRng::seed_from_u64(options.seed);
        let steps_per_epoch = train.num_batches(options.batch_size);
        let mut history = History::default();
        let mut global_step = 0;

        tracing::info!(
            model = self.model.name(),
            samples = train.len(),
            epochs = options.epochs,
            batch_size = options.batch_size,
            "fit starting"
        );

        let mut ctx = CallbackContext {
            max_epochs: options.epochs,
            steps_per_epoch,
            lr: self.lr(),
            ..CallbackContext::default()
        };
        if self.callbacks.on_train_begin(&ctx) == CallbackAction::Stop {
            history.stopped_early = true;
        }

        for epoch in 0..options.epochs {
            if history.stopped_early {
                break;
            }
            ctx.epoch = epoch;
            ctx.step = 0;
            ctx.lr = self.lr();
            ctx.logs = Logs::new();
            match self.callbacks.on_epoch_begin(&ctx) {
                CallbackAction::Stop => {
                    history.stopped_early = true;
                    break;
                }
                CallbackAction::SkipEpoch => continue,
                CallbackAction::Continue => {}
            }

            let batches = train.batches(options.batch_size, options.shuffle.then_some(&mut rng))?;
            self.reset_metrics();
            for (step, batch) in batches.iter().enumerate() {
                ctx.logs = self.train_step(batch)?;
                global_step += 1;
                ctx.step = step + 1;
                ctx.global_step = global_step;
                ctx.elapsed_secs = start.elapsed().as_secs_f64();
                if step % self.config.log_interval == 0 {
                    tracing::debug!(epoch, step, loss = ctx.logs.get("loss").copied(), "batch");
                }
                match self.callbacks.on_batch_end(&ctx) {
                    CallbackAction::Continue => {}
                    CallbackAction::SkipEpoch => break,
                    CallbackAction::Stop => {
                        history.stopped_early = true;
                        break;
                    }
                }
            }
            let mut epoch_logs = self.logs();

            if let Some(val) = validation {
                let val_logs = self.evaluate(val, options.batch_size)?;
                epoch_logs.extend(val_logs.into_iter().map(|(k, v)| (format!("val_{k}"), v)));
            }

            ctx.logs = epoch_logs.clone();
            ctx.elapsed_secs = start.elapsed().as_secs_f64();
            history.epochs.push(epoch_logs);
            if self.callbacks.on_epoch_end(&ctx) == CallbackAction::Stop {
                history.stopped_early = true;
            }
        }

        history.elapsed_secs = start.elapsed().as_secs_f64();
        ctx.elapsed_secs = history.elapsed_secs;
        self.callbacks.on_train_end(&ctx);
        tracing::info!(
            model = self.model.name(),
            epochs = history.len(),
            stopped_early = history.stopped_early,
            "fit finished"
        );
        Ok(history)
    }
}
