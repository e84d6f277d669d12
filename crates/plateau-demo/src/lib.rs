#![forbid(unsafe_code)]

//! Demo applications built on Plateau and the in-memory host.
//!
//! Each module exposes `assemble`, which registers cells and factories on a
//! scope, and `map`, which roots the scope and mounts the top-level view.

pub mod counter;
pub mod todo;
