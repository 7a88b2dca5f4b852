//! Typed constructor contract
//!
//! The engine consumes constructors as arbitrary-arity callables whose
//! parameter types are exactly the services they depend on and whose result
//! is either one service value or one value plus a failure value. Rust has
//! no runtime signature inspection, so the two shapes are captured by two
//! traits implemented over `Fn` arities 0 through 8:
//!
//! - [`Construct`] for `Fn(Arc<D1>, .., Arc<Dn>) -> S`
//! - [`TryConstruct`] for `Fn(Arc<D1>, .., Arc<Dn>) -> Result<S, E>`
//!
//! Both derive the ordered [`DependencyToken`] list from the parameter
//! types at registration time (the registration-time type descriptor that
//! replaces reflection) and erase into the positional form stored on a
//! [`Registration`](crate::registration::Registration).

use std::any::type_name;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::key::DependencyToken;
use crate::registration::{ErasedConstructor, SharedInstance};

/// A constructor producing exactly one service value.
///
/// Dependencies are declared through the parameter list; each parameter is
/// the shared handle of an unnamed registration. Closures need explicit
/// parameter types (`|repo: Arc<Repository>| ...`) for the compiler to pick
/// the arity.
pub trait Construct<Args>: Send + Sync + 'static {
    /// The produced service type.
    type Service: Send + Sync + 'static;

    /// Ordered dependency tokens derived from the parameter list.
    fn inputs() -> Vec<DependencyToken>;

    /// Erase into the positional constructor form stored on a registration.
    fn erase(self) -> ErasedConstructor;
}

/// A constructor producing one service value plus a failure value.
///
/// The failure type is any ordinary error; a non-empty failure aborts
/// compilation wrapped in a construction-failed error naming the service.
pub trait TryConstruct<Args>: Send + Sync + 'static {
    /// The produced service type.
    type Service: Send + Sync + 'static;

    /// Ordered dependency tokens derived from the parameter list.
    fn inputs() -> Vec<DependencyToken>;

    /// Erase into the positional constructor form stored on a registration.
    fn erase(self) -> ErasedConstructor;
}

/// Pull the dependency at `slot` out of the positional argument list.
///
/// Slots are filled by the invoker in declared input order, so a mismatch
/// here is an engine invariant break, not a user error.
fn take_dependency<T: Send + Sync + 'static>(
    args: &[SharedInstance],
    slot: usize,
) -> Result<Arc<T>> {
    let value = args.get(slot).ok_or_else(|| {
        Error::internal(format!(
            "dependency slot {slot} ({}) was not supplied",
            type_name::<T>()
        ))
    })?;
    value.clone().downcast::<T>().map_err(|_| {
        Error::internal(format!(
            "dependency slot {slot} does not hold a {}",
            type_name::<T>()
        ))
    })
}

macro_rules! impl_construct {
    ($($slot:tt => $dep:ident),*) => {
        impl<F, S, $($dep),*> Construct<($($dep,)*)> for F
        where
            F: Fn($(Arc<$dep>),*) -> S + Send + Sync + 'static,
            S: Send + Sync + 'static,
            $($dep: Send + Sync + 'static,)*
        {
            type Service = S;

            fn inputs() -> Vec<DependencyToken> {
                vec![$(DependencyToken::of::<$dep>()),*]
            }

            fn erase(self) -> ErasedConstructor {
                Box::new(move |_args: &[SharedInstance]| {
                    let service = (self)($(take_dependency::<$dep>(_args, $slot)?),*);
                    Ok(Arc::new(service) as SharedInstance)
                })
            }
        }

        impl<F, S, E, $($dep),*> TryConstruct<($($dep,)*)> for F
        where
            F: Fn($(Arc<$dep>),*) -> std::result::Result<S, E> + Send + Sync + 'static,
            S: Send + Sync + 'static,
            E: std::error::Error + Send + Sync + 'static,
            $($dep: Send + Sync + 'static,)*
        {
            type Service = S;

            fn inputs() -> Vec<DependencyToken> {
                vec![$(DependencyToken::of::<$dep>()),*]
            }

            fn erase(self) -> ErasedConstructor {
                Box::new(move |_args: &[SharedInstance]| {
                    match (self)($(take_dependency::<$dep>(_args, $slot)?),*) {
                        Ok(service) => Ok(Arc::new(service) as SharedInstance),
                        Err(source) => Err(Error::construction(
                            type_name::<S>(),
                            Box::new(source),
                        )),
                    }
                })
            }
        }
    };
}

impl_construct!();
impl_construct!(0 => D0);
impl_construct!(0 => D0, 1 => D1);
impl_construct!(0 => D0, 1 => D1, 2 => D2);
impl_construct!(0 => D0, 1 => D1, 2 => D2, 3 => D3);
impl_construct!(0 => D0, 1 => D1, 2 => D2, 3 => D3, 4 => D4);
impl_construct!(0 => D0, 1 => D1, 2 => D2, 3 => D3, 4 => D4, 5 => D5);
impl_construct!(0 => D0, 1 => D1, 2 => D2, 3 => D3, 4 => D4, 5 => D5, 6 => D6);
impl_construct!(0 => D0, 1 => D1, 2 => D2, 3 => D3, 4 => D4, 5 => D5, 6 => D6, 7 => D7);
