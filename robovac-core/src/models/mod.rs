//! Compiled-in model descriptors.

mod t2080;
mod t2193;
mod t2276;
mod t2278;
mod t2320;

use crate::model::ModelDescriptor;

/// Every model known at compile time, in registration order.
pub fn builtin() -> Vec<ModelDescriptor> {
    vec![
        t2080::descriptor(),
        t2193::descriptor(),
        t2276::descriptor(),
        t2278::descriptor(),
        t2320::descriptor(),
    ]
}
