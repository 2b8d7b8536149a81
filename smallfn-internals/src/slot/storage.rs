//! Raw payload storage and the per-type inline/heap strategies.
//!
//! This module encapsulates the bytes of [`SlotStorage`], ensuring they are
//! only manipulated through the typed operations defined here. This
//! visibility restriction guarantees the safety invariant: **the buffer is
//! only ever interpreted through the strategy selected for the payload type
//! that was stored into it**.
//!
//! # Storage Strategies
//!
//! Two mutually exclusive strategies exist for a payload type `T`, selected
//! at compile time by [`fits_inline`]:
//!
//! - *Inline*: `T` is written directly into the buffer bytes and dropped in
//!   place. No allocation happens.
//! - *Heap*: `T` is boxed, and the buffer holds the single owning `*mut T`.
//!
//! Every operation in this module branches on the same `const` predicate, so
//! a buffer engaged under one strategy can never be read under the other.

use alloc::boxed::Box;
use core::mem::MaybeUninit;

/// Returns whether a payload of type `T` qualifies for inline storage.
///
/// Both conditions are required:
///
/// - `T` fits in the buffer: `size_of::<T>() <= size_of::<SlotStorage>()`.
/// - The buffer's alignment is an integer multiple of `T`'s alignment, so a
///   `T` placed at the start of the buffer is always properly aligned.
///
/// Relocating a value in Rust is a plain byte copy for every type, so no
/// type is excluded on move-safety grounds. Types failing either condition
/// are heap-managed instead.
pub(super) const fn fits_inline<T>() -> bool {
    size_of::<T>() <= size_of::<SlotStorage>()
        && align_of::<SlotStorage>() % align_of::<T>() == 0
}

/// Raw storage for a slot payload: two machine words of possibly
/// uninitialized memory.
///
/// Holds either a small payload placed directly in the bytes (inline
/// strategy) or a single owning pointer to a heap allocation (heap
/// strategy). The bytes carry no tag; which interpretation applies is
/// determined entirely by the vtable associated with the storage in
/// [`RawSlot`](super::raw::RawSlot).
#[repr(C)]
pub(super) struct SlotStorage {
    /// The buffer bytes.
    ///
    /// # Safety
    ///
    /// The following safety invariants are upheld by the operations in this
    /// module:
    ///
    /// 1. After [`SlotStorage::store::<T>`](SlotStorage::store) the buffer
    ///    holds a live `T` (inline strategy) or an owning `*mut T` obtained
    ///    from [`Box::into_raw`] (heap strategy).
    /// 2. The buffer is only read back under the same strategy and type `T`
    ///    it was stored with.
    words: MaybeUninit<[usize; 2]>,
}

impl SlotStorage {
    /// Creates a fresh, unengaged storage buffer.
    pub(super) const fn uninit() -> Self {
        Self {
            words: MaybeUninit::uninit(),
        }
    }

    /// Writes `payload` into this storage under the strategy selected by
    /// [`fits_inline::<T>`](fits_inline).
    ///
    /// The heap strategy allocates; the inline strategy does not.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The storage is currently unengaged: it is freshly created, or its
    ///    previous payload has already been destroyed or relocated away.
    pub(super) unsafe fn store<T>(&mut self, payload: T) {
        if fits_inline::<T>() {
            let dst: *mut T = self.words.as_mut_ptr().cast::<T>();
            // SAFETY: `fits_inline::<T>()` guarantees the buffer is large
            // enough and properly aligned for a `T`, and the caller
            // guarantees no live payload is being overwritten.
            unsafe { dst.write(payload) };
        } else {
            let heap: *mut T = Box::into_raw(Box::new(payload));
            let dst: *mut *mut T = self.words.as_mut_ptr().cast::<*mut T>();
            // SAFETY: a thin pointer always fits in the two-word buffer, and
            // the caller guarantees no live payload is being overwritten.
            unsafe { dst.write(heap) };
        }
    }

    /// Returns a shared reference to the live payload.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The storage is engaged with a payload of type `T`, stored via
    ///    [`SlotStorage::store::<T>`](SlotStorage::store).
    pub(super) unsafe fn payload_ref<T>(&self) -> &T {
        if fits_inline::<T>() {
            let ptr: *const T = self.words.as_ptr().cast::<T>();
            // SAFETY: the inline strategy keeps a live, properly aligned `T`
            // at the start of the buffer (guaranteed by the caller).
            unsafe { &*ptr }
        } else {
            let src: *const *mut T = self.words.as_ptr().cast::<*mut T>();
            // SAFETY: the heap strategy keeps an initialized owning pointer
            // in the buffer (guaranteed by the caller).
            let heap: *mut T = unsafe { src.read() };
            // SAFETY: the pointer came from `Box::into_raw` and the pointee
            // is live for as long as the storage is engaged.
            unsafe { &*heap }
        }
    }

    /// Returns an exclusive reference to the live payload.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The storage is engaged with a payload of type `T`, stored via
    ///    [`SlotStorage::store::<T>`](SlotStorage::store).
    pub(super) unsafe fn payload_mut<T>(&mut self) -> &mut T {
        if fits_inline::<T>() {
            let ptr: *mut T = self.words.as_mut_ptr().cast::<T>();
            // SAFETY: the inline strategy keeps a live, properly aligned `T`
            // at the start of the buffer (guaranteed by the caller), and we
            // hold exclusive access to the storage.
            unsafe { &mut *ptr }
        } else {
            let src: *const *mut T = self.words.as_ptr().cast::<*mut T>();
            // SAFETY: the heap strategy keeps an initialized owning pointer
            // in the buffer (guaranteed by the caller).
            let heap: *mut T = unsafe { src.read() };
            // SAFETY: the pointer came from `Box::into_raw`, the pointee is
            // live, and exclusive access follows from our exclusive access
            // to the owning storage.
            unsafe { &mut *heap }
        }
    }

    /// Destroys the live payload, ending the storage's engaged state.
    ///
    /// The inline strategy drops the payload in place; the heap strategy
    /// reconstitutes and drops the owning [`Box`].
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The storage is engaged with a payload of type `T`, stored via
    ///    [`SlotStorage::store::<T>`](SlotStorage::store).
    /// 2. The storage is treated as unengaged afterwards: the payload is
    ///    not accessed or destroyed again.
    pub(super) unsafe fn destroy<T>(&mut self) {
        if fits_inline::<T>() {
            let ptr: *mut T = self.words.as_mut_ptr().cast::<T>();
            // SAFETY: the inline strategy keeps a live `T` at the start of
            // the buffer (1.), and the caller will not touch it again (2.).
            unsafe { ptr.drop_in_place() };
        } else {
            let src: *const *mut T = self.words.as_ptr().cast::<*mut T>();
            // SAFETY: the heap strategy keeps an initialized owning pointer
            // in the buffer (1.).
            let heap: *mut T = unsafe { src.read() };
            // SAFETY: the pointer came from `Box::into_raw` and has not been
            // freed (1.); ownership is transferred back here exactly once
            // because the caller will not use the storage again (2.).
            let boxed: Box<T> = unsafe { Box::from_raw(heap) };
            drop(boxed);
        }
    }

    /// Moves the payload from `src` into `dst`, ending `src`'s engaged
    /// state without running the payload's destructor.
    ///
    /// The inline strategy byte-copies the `T` itself; the heap strategy
    /// copies the owning pointer, leaving the pointee untouched.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `src` is engaged with a payload of type `T`, stored via
    ///    [`SlotStorage::store::<T>`](SlotStorage::store).
    /// 2. `dst` is currently unengaged.
    /// 3. `src` is treated as unengaged afterwards: its payload is not
    ///    accessed or destroyed through it again.
    pub(super) unsafe fn relocate<T>(dst: &mut Self, src: &mut Self) {
        if fits_inline::<T>() {
            let from: *const T = src.words.as_ptr().cast::<T>();
            let to: *mut T = dst.words.as_mut_ptr().cast::<T>();
            // SAFETY: `src` holds a live `T` (1.), `dst` has room for one
            // and holds nothing live (2.), and the two buffers are distinct
            // borrows so the ranges cannot overlap. Ownership of the `T`
            // transfers to `dst` because `src` is dead afterwards (3.).
            unsafe { core::ptr::copy_nonoverlapping(from, to, 1) };
        } else {
            let from: *const *mut T = src.words.as_ptr().cast::<*mut T>();
            // SAFETY: the heap strategy keeps an initialized owning pointer
            // in `src`'s buffer (1.).
            let heap: *mut T = unsafe { from.read() };
            let to: *mut *mut T = dst.words.as_mut_ptr().cast::<*mut T>();
            // SAFETY: `dst` holds nothing live (2.); ownership of the
            // allocation transfers with the pointer because `src` is dead
            // afterwards (3.).
            unsafe { to.write(heap) };
        }
    }
}
