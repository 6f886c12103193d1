//! Text renderings of realized trees
//!
//! Formats read trees only through the cursor traits, so any parser engine that implements
//! [Cursor](crate::cursor::Cursor) can be rendered.

pub mod treeviz;

pub use treeviz::{to_treeviz_str, to_treeviz_str_with_params};
