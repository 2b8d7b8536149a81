//! Module containing the type-erased payload slot

mod raw;
mod storage;
mod vtable;

pub use self::raw::RawSlot;
