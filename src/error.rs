//! Error types for the callable container.

/// The error returned when calling an empty [`SmallFn`](crate::SmallFn).
///
/// Reported synchronously at the call site; the container is left unchanged
/// (still empty) by the failed attempt and can be engaged afterwards with
/// [`SmallFn::set`](crate::SmallFn::set).
///
/// # Examples
///
/// ```
/// use smallfn::{SmallFn, UnboundCall};
///
/// let mut f: SmallFn<(), i32> = SmallFn::empty();
/// assert_eq!(f.call(()), Err(UnboundCall));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnboundCall;

impl core::fmt::Display for UnboundCall {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("attempted to call an empty callable container")
    }
}

impl core::error::Error for UnboundCall {}
