//! Operator factory.
//!
//! Flip operators carry no parameters, so one shared instance per axis is
//! handed to every caller. They live in a process-wide cache that starts
//! empty, is filled on first request and is never cleared. Resize depends on
//! its scale factor and is built fresh on every call; only stateless kinds
//! may ever be cached here.

use super::error::Result;
use super::operator::ImageOperator;
use super::operators::{FlipOperator, ResizeOperator};
use super::params::{FlipAxis, OperatorKind, OperatorParams, ResizeOptions};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex, PoisonError};

/// Shared handle to an operator.
pub type SharedOperator = Arc<dyn ImageOperator>;

static FLIP_CACHE: LazyLock<Mutex<HashMap<FlipAxis, SharedOperator>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// Build an operator of the given kind.
///
/// `params` is only read by [`OperatorKind::Resize`] (key `scale`, default
/// 1.0). Flips return the cached singleton for their axis.
pub fn create(kind: OperatorKind, params: Option<&OperatorParams>) -> Result<SharedOperator> {
    match kind {
        OperatorKind::FlipHorizontal => Ok(flip(FlipAxis::Horizontal)),
        OperatorKind::FlipVertical => Ok(flip(FlipAxis::Vertical)),
        OperatorKind::Resize => create_resize(ResizeOptions::from_params(params)?),
    }
}

/// Like [`create`], with the kind given by name (e.g. `"flip_vertical"`).
pub fn create_by_name(name: &str, params: Option<&OperatorParams>) -> Result<SharedOperator> {
    create(name.parse()?, params)
}

/// A new resize operator; never cached.
pub fn create_resize(options: ResizeOptions) -> Result<SharedOperator> {
    let op = ResizeOperator::new(options)?;
    tracing::debug!(scale = op.scale(), "created resize operator");
    Ok(Arc::new(op))
}

/// The shared flip operator for `axis`, constructed on first use.
pub fn flip(axis: FlipAxis) -> SharedOperator {
    // The map holds no cross-entry invariant, so a poisoned lock is still usable.
    let mut cache = FLIP_CACHE.lock().unwrap_or_else(PoisonError::into_inner);
    let op = cache.entry(axis).or_insert_with(|| {
        tracing::debug!(?axis, "created flip operator");
        Arc::new(FlipOperator::new(axis))
    });
    Arc::clone(op)
}

/// Serializable description of a factory-built operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum OperatorSpec {
    Resize {
        #[serde(default = "default_scale")]
        scale: f64,
    },
    FlipHorizontal,
    FlipVertical,
}

fn default_scale() -> f64 {
    ResizeOptions::default().scale
}

impl OperatorSpec {
    pub fn kind(&self) -> OperatorKind {
        match self {
            OperatorSpec::Resize { .. } => OperatorKind::Resize,
            OperatorSpec::FlipHorizontal => OperatorKind::FlipHorizontal,
            OperatorSpec::FlipVertical => OperatorKind::FlipVertical,
        }
    }

    pub fn build(&self) -> Result<SharedOperator> {
        match *self {
            OperatorSpec::Resize { scale } => create_resize(ResizeOptions::new(scale)?),
            OperatorSpec::FlipHorizontal => Ok(flip(FlipAxis::Horizontal)),
            OperatorSpec::FlipVertical => Ok(flip(FlipAxis::Vertical)),
        }
    }
}
