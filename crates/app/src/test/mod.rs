//! Test support.


pub(crate) use fixtures::*;
