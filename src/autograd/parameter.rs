//! Trainable parameters with stable identity

use ndarray::Array2;
use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_PARAM_ID: AtomicUsize = AtomicUsize::new(0);

/// Process-unique identifier of a [`Parameter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParamId(usize);

impl ParamId {
    fn next() -> Self {
        Self(NEXT_PARAM_ID.fetch_add(1, Ordering::Relaxed))
    }
}

struct ParamInner {
    id: ParamId,
    name: String,
    value: RefCell<Array2<f32>>,
}

/// A trainable weight array shared between a layer and the optimizer.
///
/// Cloning a `Parameter` clones the handle: both clones see the same data and
/// report the same [`ParamId`]. Optimizers key their per-parameter state on
/// that id.
#[derive(Clone)]
pub struct Parameter {
    inner: Rc<ParamInner>,
}

impl Parameter {
    /// Create a new parameter with a fresh id
    pub fn new(name: impl Into<String>, value: Array2<f32>) -> Self {
        Self {
            inner: Rc::new(ParamInner {
                id: ParamId::next(),
                name: name.into(),
                value: RefCell::new(value),
            }),
        }
    }

    /// Create a zero-initialized parameter
    pub fn zeros(name: impl Into<String>, rows: usize, cols: usize) -> Self {
        Self::new(name, Array2::zeros((rows, cols)))
    }

    pub fn id(&self) -> ParamId {
        self.inner.id
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Borrow the current value
    pub fn value(&self) -> Ref<'_, Array2<f32>> {
        self.inner.value.borrow()
    }

    /// Copy of the current value
    pub fn to_array(&self) -> Array2<f32> {
        self.inner.value.borrow().clone()
    }

    pub fn shape(&self) -> (usize, usize) {
        self.inner.value.borrow().dim()
    }

    /// Number of scalar weights
    pub fn len(&self) -> usize {
        self.inner.value.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replace the value. The new array must keep the shape.
    pub fn assign(&self, value: Array2<f32>) -> crate::Result<()> {
        let current = self.shape();
        if value.dim() != current {
            return Err(crate::Error::shape(
                "assign",
                &[current.0, current.1],
                value.shape(),
            ));
        }
        *self.inner.value.borrow_mut() = value;
        Ok(())
    }

    /// Mutate the value in place
    pub(crate) fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut Array2<f32>),
    {
        f(&mut self.inner.value.borrow_mut());
    }

    /// Whether two handles point at the same parameter
    pub fn same_as(&self, other: &Parameter) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parameter")
            .field("id", &self.inner.id)
            .field("name", &self.inner.name)
            .field("shape", &self.shape())
            .finish()
    }
}
