//! Vtable for type-erased slot operations.
//!
//! This module contains the [`SlotVtable`] which enables destroying, cloning,
//! and relocating a slot payload after its concrete type `T` has been erased.
//! The vtable stores function pointers that dispatch to the correct typed
//! implementations.
//!
//! This module encapsulates the fields of [`SlotVtable`] so they cannot be
//! accessed directly. This visibility restriction guarantees the safety
//! invariant: **the vtable's type parameter must match the actual payload
//! type stored in the associated [`SlotStorage`]**.
//!
//! # Safety Invariant
//!
//! This invariant is maintained because vtables are created as `&'static`
//! references via [`SlotVtable::new`], which pairs the function pointers with
//! a specific type `T` at compile time. All slots holding the same concrete
//! payload type share the identical `&'static` instance, so pointer equality
//! of vtable references doubles as a cheap same-type check.

use core::any::TypeId;
use core::ptr::NonNull;

use crate::slot::storage::{SlotStorage, fits_inline};

/// Vtable for type-erased slot operations.
///
/// Contains function pointers for performing lifecycle operations on a slot
/// payload without knowing its concrete type at compile time.
///
/// # Safety Invariant
///
/// The fields `destroy`, `clone_into`, and `relocate` are guaranteed to point
/// to the functions defined below instantiated with the payload type `T` that
/// was used to create this [`SlotVtable`], and `inline` is guaranteed to
/// equal `fits_inline::<T>()` for that same `T`.
pub(crate) struct SlotVtable {
    /// Gets the [`TypeId`] of the payload type that was used to create this
    /// [`SlotVtable`].
    type_id: fn() -> TypeId,
    /// Gets the [`core::any::type_name`] of the payload type that was used
    /// to create this [`SlotVtable`].
    type_name: fn() -> &'static str,
    /// Whether the payload type is stored inline in the buffer rather than
    /// behind a heap pointer.
    inline: bool,
    /// Destroys the payload held in the storage.
    destroy: unsafe fn(NonNull<SlotStorage>),
    /// Clones the payload held in the source storage into the destination
    /// storage.
    clone_into: unsafe fn(NonNull<SlotStorage>, NonNull<SlotStorage>),
    /// Moves the payload from the source storage into the destination
    /// storage without running its destructor.
    relocate: unsafe fn(NonNull<SlotStorage>, NonNull<SlotStorage>),
}

impl SlotVtable {
    /// Creates the [`SlotVtable`] for the payload type `T`.
    ///
    /// Every call with the same `T` returns a reference to the identical
    /// `&'static` instance.
    pub(super) const fn new<T: Clone + 'static>() -> &'static Self {
        const {
            &Self {
                type_id: TypeId::of::<T>,
                type_name: core::any::type_name::<T>,
                inline: fits_inline::<T>(),
                destroy: destroy::<T>,
                clone_into: clone_into::<T>,
                relocate: relocate::<T>,
            }
        }
    }

    /// Gets the [`TypeId`] of the payload type that was used to create this
    /// [`SlotVtable`].
    #[inline]
    pub(super) fn type_id(&self) -> TypeId {
        (self.type_id)()
    }

    /// Gets the [`core::any::type_name`] of the payload type that was used
    /// to create this [`SlotVtable`].
    #[inline]
    pub(super) fn type_name(&self) -> &'static str {
        (self.type_name)()
    }

    /// Whether payloads of this vtable's type are stored inline in the
    /// buffer rather than behind a heap pointer.
    #[inline]
    pub(super) fn stored_inline(&self) -> bool {
        self.inline
    }

    /// Destroys the payload held in `storage`.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `storage` points to a [`SlotStorage`] engaged with the payload
    ///    type of this [`SlotVtable`], and no other reference to it is live.
    /// 2. The storage is treated as unengaged afterwards: the payload is not
    ///    accessed or destroyed again.
    #[inline]
    pub(super) unsafe fn destroy(&self, storage: NonNull<SlotStorage>) {
        // SAFETY: We know that `self.destroy` points to the function
        // `destroy::<T>` below for the payload type `T` of this vtable. That
        // function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        unsafe { (self.destroy)(storage) };
    }

    /// Clones the payload held in `src` into `dst`.
    ///
    /// If the payload's `Clone` implementation panics, `dst` is left
    /// unengaged and `src` is left untouched.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `src` points to a [`SlotStorage`] engaged with the payload type of
    ///    this [`SlotVtable`].
    /// 2. `dst` points to an unengaged [`SlotStorage`] distinct from `src`,
    ///    and no other reference to it is live.
    #[inline]
    pub(super) unsafe fn clone_into(&self, dst: NonNull<SlotStorage>, src: NonNull<SlotStorage>) {
        // SAFETY: We know that `self.clone_into` points to the function
        // `clone_into::<T>` below for the payload type `T` of this vtable.
        // That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        unsafe { (self.clone_into)(dst, src) };
    }

    /// Moves the payload from `src` into `dst` without running its
    /// destructor.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `src` points to a [`SlotStorage`] engaged with the payload type of
    ///    this [`SlotVtable`], and no other reference to it is live.
    /// 2. `dst` points to an unengaged [`SlotStorage`] distinct from `src`,
    ///    and no other reference to it is live.
    /// 3. `src` is treated as unengaged afterwards: its payload is not
    ///    accessed or destroyed through it again.
    #[inline]
    pub(super) unsafe fn relocate(&self, dst: NonNull<SlotStorage>, src: NonNull<SlotStorage>) {
        // SAFETY: We know that `self.relocate` points to the function
        // `relocate::<T>` below for the payload type `T` of this vtable.
        // That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        // 3. Guaranteed by the caller
        unsafe { (self.relocate)(dst, src) };
    }
}

/// Destroys the payload of type `T` held in `storage`.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `storage` points to a [`SlotStorage`] engaged with a payload of type
///    `T`, and no other reference to it is live.
/// 2. The storage is treated as unengaged afterwards: the payload is not
///    accessed or destroyed again.
unsafe fn destroy<T>(mut storage: NonNull<SlotStorage>) {
    // SAFETY: the caller guarantees the pointee is live and no other
    // reference to it exists (1.).
    let storage: &mut SlotStorage = unsafe { storage.as_mut() };
    // SAFETY:
    // 1. Guaranteed by the caller
    // 2. Guaranteed by the caller
    unsafe { storage.destroy::<T>() };
}

/// Clones the payload of type `T` held in `src` into `dst`.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `src` points to a [`SlotStorage`] engaged with a payload of type `T`.
/// 2. `dst` points to an unengaged [`SlotStorage`] distinct from `src`, and
///    no other reference to it is live.
unsafe fn clone_into<T: Clone>(mut dst: NonNull<SlotStorage>, src: NonNull<SlotStorage>) {
    // SAFETY: the caller guarantees the pointee is live (1.), and shared
    // access is sufficient to read the payload.
    let src: &SlotStorage = unsafe { src.as_ref() };
    // SAFETY:
    // 1. Guaranteed by the caller
    let payload: &T = unsafe { src.payload_ref::<T>() };
    let duplicate = payload.clone();
    // SAFETY: the caller guarantees the pointee is valid and no other
    // reference to it exists (2.).
    let dst: &mut SlotStorage = unsafe { dst.as_mut() };
    // SAFETY:
    // 1. `dst` is unengaged, guaranteed by the caller (2.)
    unsafe { dst.store(duplicate) };
}

/// Moves the payload of type `T` from `src` into `dst` without running its
/// destructor.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `src` points to a [`SlotStorage`] engaged with a payload of type `T`,
///    and no other reference to it is live.
/// 2. `dst` points to an unengaged [`SlotStorage`] distinct from `src`, and
///    no other reference to it is live.
/// 3. `src` is treated as unengaged afterwards: its payload is not accessed
///    or destroyed through it again.
unsafe fn relocate<T>(mut dst: NonNull<SlotStorage>, mut src: NonNull<SlotStorage>) {
    // SAFETY: the caller guarantees the pointee is valid and no other
    // reference to it exists (2.).
    let dst: &mut SlotStorage = unsafe { dst.as_mut() };
    // SAFETY: the caller guarantees the pointee is live, distinct from
    // `dst`, and no other reference to it exists (1., 2.).
    let src: &mut SlotStorage = unsafe { src.as_mut() };
    // SAFETY:
    // 1. Guaranteed by the caller
    // 2. Guaranteed by the caller
    // 3. Guaranteed by the caller
    unsafe { SlotStorage::relocate::<T>(dst, src) };
}
