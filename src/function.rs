//! The user-facing callable container.

use core::marker::PhantomData;

use smallfn_internals::RawSlot;

use crate::callable::Callable;
use crate::error::UnboundCall;

/// A type-erased, small-buffer-optimized callable container with the call
/// signature `Args -> R`.
///
/// `Args` is the argument tuple type and `R` the exact result type:
/// `SmallFn<(i32,), i32>` holds anything callable as `i32 -> i32`. Any
/// closure, `fn` pointer, or function item satisfying
/// [`Callable<Args, Output = R>`](Callable) plus `Clone + 'static` can be
/// stored; callables that fit the container's two-word buffer are held
/// inline without heap allocation.
///
/// A container is either *engaged* or *empty*. All value-semantic
/// operations are supported in both states: [`Clone`], [`SmallFn::take`],
/// [`SmallFn::swap`], [`SmallFn::set`], [`SmallFn::clear`]. Calling an
/// empty container returns [`UnboundCall`] instead of panicking.
///
/// # Examples
///
/// ```
/// use smallfn::SmallFn;
///
/// let mut total = 0;
/// let mut tally = SmallFn::new(move |x: i32| {
///     total += x;
///     total
/// });
///
/// assert_eq!(tally.call((4,)), Ok(4));
/// assert_eq!(tally.call((5,)), Ok(9));
///
/// // Clones carry independent state
/// let mut branch = tally.clone();
/// assert_eq!(branch.call((1,)), Ok(10));
/// assert_eq!(tally.call((1,)), Ok(10));
/// ```
pub struct SmallFn<Args, R> {
    /// The type-erased storage for the held callable.
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long
    /// as this struct exists:
    ///
    /// 1. If the slot is engaged, its payload is the concrete callable type
    ///    `F` that `invoke` was instantiated with.
    /// 2. `invoke` is `Some` if and only if the slot is engaged; the two
    ///    fields are set and cleared together.
    slot: RawSlot,
    /// The invocation trampoline: a direct function pointer specific to the
    /// held callable's concrete type and this signature, bypassing the
    /// slot's dispatch table on every call.
    invoke: Option<unsafe fn(&mut RawSlot, Args) -> R>,
    /// Marker making the container behave as `fn(Args) -> R` with respect
    /// to variance.
    _signature: PhantomData<fn(Args) -> R>,
}

impl<Args, R> SmallFn<Args, R> {
    /// Creates an empty container. No allocation happens.
    ///
    /// # Examples
    ///
    /// ```
    /// use smallfn::SmallFn;
    ///
    /// let f: SmallFn<(i32,), i32> = SmallFn::empty();
    /// assert!(!f.is_engaged());
    /// ```
    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            slot: RawSlot::empty(),
            invoke: None,
            _signature: PhantomData,
        }
    }

    /// Creates a container holding `callable`.
    ///
    /// The callable's argument types and result type must match the
    /// container's signature exactly; mismatches are compile errors. The
    /// callable is stored inline if it fits the container's two-word buffer
    /// with compatible alignment, and behind a single heap allocation
    /// otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use smallfn::SmallFn;
    ///
    /// let a = 2;
    /// let mut f = SmallFn::new(move |b: i32| a + b);
    /// assert_eq!(f.call((3,)), Ok(5));
    /// ```
    #[inline]
    #[must_use]
    pub fn new<F>(callable: F) -> Self
    where
        F: Callable<Args, Output = R> + Clone + 'static,
    {
        Self {
            slot: RawSlot::new(callable),
            invoke: Some(invoke_erased::<F, Args>),
            _signature: PhantomData,
        }
    }

    /// Returns whether the container currently holds a callable.
    #[inline]
    #[must_use]
    pub fn is_engaged(&self) -> bool {
        self.slot.is_engaged()
    }

    /// Invokes the held callable with the given argument tuple.
    ///
    /// Returns [`UnboundCall`] if the container is empty; the container is
    /// left unchanged by the failed attempt.
    ///
    /// # Examples
    ///
    /// ```
    /// use smallfn::{SmallFn, UnboundCall};
    ///
    /// let mut f = SmallFn::new(|a: i32, b: i32| a * b);
    /// assert_eq!(f.call((6, 7)), Ok(42));
    ///
    /// f.clear();
    /// assert_eq!(f.call((6, 7)), Err(UnboundCall));
    /// ```
    #[inline]
    pub fn call(&mut self, args: Args) -> Result<R, UnboundCall> {
        debug_assert_eq!(self.invoke.is_some(), self.slot.is_engaged());
        match self.invoke {
            // SAFETY:
            // 1. `invoke` is `Some`, so by the field invariant the slot is
            //    engaged with the concrete callable type this trampoline
            //    was instantiated with.
            Some(invoke) => Ok(unsafe { invoke(&mut self.slot, args) }),
            None => Err(UnboundCall),
        }
    }

    /// Replaces the held callable with `callable`.
    ///
    /// The replacement is fully constructed before the previous state is
    /// released: if building it panics, the container retains its prior
    /// state. Resetting to empty is deliberately a separate operation, see
    /// [`SmallFn::clear`].
    #[inline]
    pub fn set<F>(&mut self, callable: F)
    where
        F: Callable<Args, Output = R> + Clone + 'static,
    {
        *self = Self::new(callable);
    }

    /// Destroys the held callable, leaving the container empty. A no-op on
    /// an empty container.
    #[inline]
    pub fn clear(&mut self) {
        self.slot.clear();
        self.invoke = None;
    }

    /// Moves the held callable out, leaving this container empty.
    ///
    /// The returned container is behaviorally identical to `self` before
    /// the call; the callable itself is relocated, not cloned.
    ///
    /// # Examples
    ///
    /// ```
    /// use smallfn::SmallFn;
    ///
    /// let mut f = SmallFn::new(|| "hi");
    /// let mut moved = f.take();
    ///
    /// assert!(!f.is_engaged());
    /// assert_eq!(moved.call(()), Ok("hi"));
    /// ```
    #[inline]
    #[must_use]
    pub fn take(&mut self) -> Self {
        Self {
            slot: self.slot.take(),
            invoke: self.invoke.take(),
            _signature: PhantomData,
        }
    }

    /// Exchanges the contents of two containers.
    ///
    /// Works for any combination of engaged and empty operands. Self-swap
    /// is not representable: the two exclusive references cannot alias.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        self.slot.swap(&mut other.slot);
        core::mem::swap(&mut self.invoke, &mut other.invoke);
    }

    /// Returns whether the held callable is stored inline in the
    /// container's buffer, or `None` if the container is empty.
    #[inline]
    #[must_use]
    pub fn stored_inline(&self) -> Option<bool> {
        self.slot.stored_inline()
    }
}

/// Invokes the payload of concrete type `F` held in `slot`.
///
/// One instance of this function is monomorphized per (callable type,
/// signature) pair and stored in the container as a plain function pointer.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `slot` is engaged with a payload of type `F`.
unsafe fn invoke_erased<F, Args>(slot: &mut RawSlot, args: Args) -> F::Output
where
    F: Callable<Args> + 'static,
{
    // SAFETY:
    // 1. Guaranteed by the caller
    let callable: &mut F = unsafe { slot.payload_mut::<F>() };
    callable.invoke(args)
}

impl<Args, R> Clone for SmallFn<Args, R> {
    /// Duplicates the container, cloning the held callable (and therefore
    /// its captured state) into a fully independent copy. An empty
    /// container clones to an empty container.
    #[inline]
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.duplicate(),
            invoke: self.invoke,
            _signature: PhantomData,
        }
    }
}

impl<Args, R> Default for SmallFn<Args, R> {
    /// Equivalent to [`SmallFn::empty`].
    #[inline]
    fn default() -> Self {
        Self::empty()
    }
}

impl<Args, R> core::fmt::Debug for SmallFn<Args, R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut debug = f.debug_struct("SmallFn");
        match self.slot.payload_type_name() {
            Some(name) => debug
                .field("callable", &name)
                .field("inline", &self.slot.stored_inline().unwrap_or(false)),
            None => debug.field("callable", &"<empty>"),
        }
        .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;
    use alloc::string::String;

    use super::*;

    #[test]
    fn test_empty_container() {
        let mut f: SmallFn<(), u32> = SmallFn::empty();
        assert!(!f.is_engaged());
        assert_eq!(f.stored_inline(), None);
        assert_eq!(f.call(()), Err(UnboundCall));
        // The failed call leaves the container empty and re-engageable
        assert!(!f.is_engaged());
        f.set(|| 3);
        assert_eq!(f.call(()), Ok(3));
    }

    #[test]
    fn test_capture_free_closure_is_inline() {
        let mut f = SmallFn::new(|x: u32| x + 1);
        assert_eq!(f.stored_inline(), Some(true));
        assert_eq!(f.call((41,)), Ok(42));
    }

    #[test]
    fn test_fn_pointer() {
        fn double(x: u32) -> u32 {
            x * 2
        }
        let mut f = SmallFn::new(double);
        assert_eq!(f.call((21,)), Ok(42));
    }

    #[test]
    fn test_large_capture_goes_to_heap() {
        let table = [3u64, 5, 7, 11, 13];
        let mut f = SmallFn::new(move |i: usize| table[i]);
        assert_eq!(f.stored_inline(), Some(false));
        assert_eq!(f.call((2,)), Ok(7));
    }

    #[test]
    fn test_set_replaces_callable() {
        let mut f = SmallFn::new(|x: i32| x + 1);
        assert_eq!(f.call((1,)), Ok(2));
        f.set(|x: i32| x * 10);
        assert_eq!(f.call((1,)), Ok(10));
    }

    #[test]
    fn test_clear_then_call_fails() {
        let mut f = SmallFn::new(|| String::from("gone"));
        f.clear();
        assert!(!f.is_engaged());
        assert_eq!(f.call(()), Err(UnboundCall));
    }

    #[test]
    fn test_take_moves_state() {
        let mut count = 0u32;
        let mut f = SmallFn::new(move |step: u32| {
            count += step;
            count
        });
        assert_eq!(f.call((2,)), Ok(2));

        let mut moved = f.take();
        assert!(!f.is_engaged());
        // The accumulated state moved with the callable
        assert_eq!(moved.call((3,)), Ok(5));
        assert_eq!(f.call((3,)), Err(UnboundCall));
    }

    #[test]
    fn test_swap_round_trip() {
        let mut f = SmallFn::new(|| 1);
        let mut g = SmallFn::new(|| 2);
        f.swap(&mut g);
        assert_eq!(f.call(()), Ok(2));
        assert_eq!(g.call(()), Ok(1));
        f.swap(&mut g);
        assert_eq!(f.call(()), Ok(1));
        assert_eq!(g.call(()), Ok(2));
    }

    #[test]
    fn test_swap_with_empty() {
        let mut f = SmallFn::new(|| 1);
        let mut g: SmallFn<(), i32> = SmallFn::empty();
        f.swap(&mut g);
        assert_eq!(f.call(()), Err(UnboundCall));
        assert_eq!(g.call(()), Ok(1));
    }

    #[test]
    fn test_debug_output() {
        let engaged = SmallFn::new(|x: i32| x);
        let empty: SmallFn<(i32,), i32> = SmallFn::empty();
        assert!(format!("{engaged:?}").contains("SmallFn"));
        assert!(format!("{empty:?}").contains("<empty>"));
    }

    #[test]
    fn test_send_sync() {
        static_assertions::assert_not_impl_any!(SmallFn<(), ()>: Send, Sync);
    }
}
