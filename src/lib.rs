#![cfg_attr(not(doc), no_std)]
#![deny(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    clippy::as_ptr_cast_mut,
    clippy::ptr_as_ptr,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
// Make docs.rs generate better docs
#![cfg_attr(docsrs, feature(doc_cfg))]

//! A small-buffer-optimized, type-erased callable container.
//!
//! ## Overview
//!
//! This crate provides [`SmallFn`], a single concrete container type that can
//! hold any callable value (closures, `fn` pointers, stateful captures)
//! behind one uniform call interface, without using `Box<dyn FnMut>`.
//! Callables small enough to fit a fixed two-word buffer are stored inline
//! with no heap allocation; larger or over-aligned callables transparently
//! fall back to a single heap allocation.
//!
//! ## Quick Example
//!
//! ```
//! use smallfn::SmallFn;
//!
//! let a = 2;
//! let mut f = SmallFn::new(move |b: i32| a + b);
//!
//! assert!(f.is_engaged());
//! assert_eq!(f.call((3,)), Ok(5));
//! ```
//!
//! ## Core Concepts
//!
//! A [`SmallFn<Args, R>`] is parameterized by an argument *tuple* type and a
//! result type, the Rust encoding of a call signature: `SmallFn<(i32,), i32>`
//! holds anything callable as `i32 -> i32`, and invocation passes the
//! arguments as a tuple: `f.call((3,))`.
//!
//! The container has full value semantics:
//!
//! - **Clone** duplicates the held callable, producing a fully independent
//!   copy (captured state is cloned, never shared).
//! - **Move** is native Rust move; [`SmallFn::take`] is the in-place variant
//!   that leaves the source empty and observable.
//! - **[`SmallFn::swap`]** exchanges the contents of two containers, engaged
//!   or empty.
//! - **[`SmallFn::set`]** replaces the held callable and [`SmallFn::clear`]
//!   resets to empty; the two are deliberately distinct operations.
//!
//! A container is either *engaged* (holding a callable) or *empty*. Calling
//! an empty container is not a crash: [`SmallFn::call`] returns
//! [`Err(UnboundCall)`](UnboundCall) and leaves the container unchanged.
//!
//! Signature mismatches are compile errors, not runtime errors: construction
//! requires a callable whose argument types and result type match the
//! container's signature exactly, via the [`Callable`] trait.
//!
//! ## Storage
//!
//! Whether a callable is stored inline is decided per concrete type at
//! compile time: it must fit in two machine words and be no more strictly
//! aligned than the buffer. Capture-free closures and `fn` pointers always
//! qualify. Everything else is placed behind a single owning heap pointer,
//! and the container's behavior is identical either way. Lifecycle
//! operations (clone, relocate, destroy) dispatch through one shared
//! `&'static` operations table per concrete callable type; invocation goes
//! through a direct per-signature function pointer, skipping the table
//! entirely.
//!
//! For implementation details, see the [`smallfn-internals`] crate.
//!
//! [`smallfn-internals`]: smallfn_internals

extern crate alloc;

mod callable;
mod error;
mod function;

pub use callable::Callable;
pub use error::UnboundCall;
pub use function::SmallFn;
