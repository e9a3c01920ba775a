//! Filesystem-backed services around the compositor.

pub mod font;
