//! Optional extensions to [`Target`](super::Target).
//!
//! Each extension is a trait with `Target` as a supertrait, paired with a
//! `support_` method on `Target` which returns `None` by default. Backends opt
//! in by implementing the extension and returning `Some(self)`. When the
//! extension is missing, the protocol core answers the packets that depend on
//! it with a "not supported" reply.

pub mod monitor;
