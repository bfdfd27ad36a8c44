//! Difference-driven block selection and the compositing it drives.

pub(crate) mod base;
pub(crate) mod composite;
pub(crate) mod diff;
pub(crate) mod grid;
pub(crate) mod observer;
pub(crate) mod select;
