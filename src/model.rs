//! Owned, lazily-initialized handle for an expensive model capability.
//!
//! The pipeline keeps one handle per model for the life of the process; the
//! initializer runs on first use and the built model is reused afterwards.

use std::fmt;
use std::sync::OnceLock;

use crate::error::{SummarizerError, SummarizerResult};

type Initializer<M> = Box<dyn Fn() -> SummarizerResult<M>>;

pub struct LazyModel<M> {
    name: &'static str,
    cell: OnceLock<M>,
    init: Initializer<M>,
}

impl<M> LazyModel<M> {
    pub fn new(name: &'static str, init: impl Fn() -> SummarizerResult<M> + 'static) -> Self {
        LazyModel {
            name,
            cell: OnceLock::new(),
            init: Box::new(init),
        }
    }

    /// A handle whose model is already built.
    pub fn ready(name: &'static str, model: M) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(model);
        LazyModel {
            name,
            cell,
            init: Box::new(move || {
                Err(SummarizerError::Config(format!(
                    "model `{name}` has no initializer"
                )))
            }),
        }
    }

    /// Returns the model, building it on first call. A failed build is not
    /// cached, so the next call tries again.
    pub fn get(&self) -> SummarizerResult<&M> {
        if let Some(model) = self.cell.get() {
            return Ok(model);
        }
        tracing::info!(model = self.name, "loading model");
        let model = (self.init)()?;
        Ok(self.cell.get_or_init(move || model))
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<M> fmt::Debug for LazyModel<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyModel")
            .field("name", &self.name)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}
