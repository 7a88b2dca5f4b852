//! Disposal capability
//!
//! A constructed value may optionally expose a single no-argument "release
//! resources" operation. The capability is the [`Dispose`] trait; the hook
//! is captured as an erased function at registration time through the
//! `add_disposable` entry points, so the engine never has to probe live
//! values for it.

use std::any::type_name;

use crate::error::BoxedError;
use crate::registration::SharedInstance;

/// Optional capability: release resources held by a constructed service.
///
/// Hooks run in reverse construction order when the container is disposed;
/// a failure from one hook is collected and does not stop the remaining
/// hooks from running.
pub trait Dispose: Send + Sync {
    /// Release held resources, returning the failure if any.
    fn dispose(&self) -> std::result::Result<(), BoxedError>;
}

/// Erased disposal hook stored on a [`Registration`](crate::registration::Registration).
pub(crate) type DisposeFn =
    Box<dyn Fn(&SharedInstance) -> std::result::Result<(), BoxedError> + Send + Sync>;

/// Capture the `Dispose` capability of `T` as an erased hook.
pub(crate) fn dispose_hook<T: Dispose + 'static>() -> DisposeFn {
    Box::new(|instance| match instance.clone().downcast::<T>() {
        Ok(value) => value.dispose(),
        Err(_) => Err(format!(
            "disposal hook for {} received a foreign instance",
            type_name::<T>()
        )
        .into()),
    })
}
