#![no_std]
#![forbid(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::missing_docs_in_private_items,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
#![allow(rustdoc::private_intra_doc_links)]
//! Internal implementation crate for [`smallfn`].
//!
//! # Overview
//!
//! This crate contains the low-level, type-erased storage machinery that
//! powers the [`smallfn`] callable container. It provides a fixed-size slot
//! that holds an arbitrary payload either inline (small-buffer optimization)
//! or behind a single owning heap pointer, with all lifecycle operations
//! dispatched through a hand-rolled vtable.
//!
//! **This crate is an implementation detail.** No semantic versioning
//! guarantees are provided. Users should depend on the [`smallfn`] crate, not
//! this one.
//!
//! # Architecture
//!
//! The crate is organized around one type hierarchy in the [`slot`] module:
//!
//! - [`RawSlot`]: Owned, type-erased container handle, a two-word storage
//!   buffer paired with an optional vtable reference. `None` means the slot
//!   is empty.
//! - `SlotStorage`: The raw buffer, holding either an inline payload or an
//!   owning pointer to a heap allocation. Which interpretation applies is
//!   decided per payload type at compile time; the buffer carries no tag.
//! - `SlotVtable`: Function pointers for type-erased destroy, clone, and
//!   relocate operations, one `&'static` instance per concrete payload type.
//!
//! # Safety Strategy
//!
//! Type erasure requires careful handling to maintain Rust's type safety
//! guarantees. Once a payload of type `T` has been written into a
//! `SlotStorage`, the only record of `T` is the vtable reference stored
//! beside it, so the vtable's function pointers must always match the payload
//! actually present in the buffer.
//!
//! This crate maintains safety through:
//!
//! - **Module-based encapsulation**: The storage bytes and the vtable
//!   reference are module-private, so the pairing established at construction
//!   time cannot be broken from outside.
//! - **Compile-time strategy selection**: The inline-vs-heap decision is a
//!   `const` predicate of the payload type. Every typed operation branches on
//!   the same predicate, so the two interpretations of the buffer can never
//!   be mixed.
//! - **Documented vtable contracts**: Each vtable operation specifies exactly
//!   when it can be safely called, and every call site discharges those
//!   requirements point by point.
//!
//! [`smallfn`]: https://docs.rs/smallfn/latest/smallfn/
//! [`RawSlot`]: slot::RawSlot

extern crate alloc;

mod slot;

pub use slot::RawSlot;
