//! # Simple Filters
//!
//! A small image-filtering library: load and save raster images, copy, flip,
//! resize, recolor, geometric-blend and caption them, plus reusable
//! [`ImageOperator`](imaging::ImageOperator)s built by a factory.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Pixel operations, file I/O, text overlay, the operator trait and factory |
//! | [`config`] | `pipeline.toml` loading and validation for the demonstration run |
//! | [`stages`] | Configured stages turned into operators (smooth, shear, flips, resize) |
//! | [`pipeline`] | The demonstration run: per-stage variants and the cumulative sequence |
//! | [`output`] | CLI output formatting of run reports |
//!
//! # Design Decisions
//!
//! ## Operators Are Shared, Immutable Values
//!
//! Every operator holds only its construction parameters, so it is handed
//! out as `Arc<dyn ImageOperator>` and can be applied from any thread. The
//! factory keeps one process-wide instance per flip axis; a resize operator
//! carries a scale and is built fresh on each request.
//!
//! ## Destinations Are All-or-Nothing
//!
//! [`ImageOperator::apply`](imaging::ImageOperator::apply) accepts an
//! optional caller-allocated destination. Its size is checked before any
//! pixel work, and it is only overwritten once the result is complete, so a
//! failed call leaves the caller's buffer as it was.
//!
//! ## Format From Extension
//!
//! [`imaging::save`] picks the encoder from the lowercased file extension:
//! `png` writes PNG, everything else writes JPEG. Loading sniffs the content
//! instead, so a mislabelled file still decodes.

pub mod config;
pub mod imaging;
pub mod output;
pub mod pipeline;
pub mod stages;

#[cfg(test)]
pub(crate) mod test_helpers;
