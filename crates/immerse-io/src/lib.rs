#![warn(missing_docs)]

//! Mask output for immerse.
//!
//! A solver reads the immersed-boundary flag `iibm` and the mask `ep1` at
//! startup. [`MaskSink`] is the seam between mask generation and whatever
//! container format the solver uses; [`RawSink`] writes plain binary arrays
//! with a JSON descriptor.

pub mod error;
pub mod sink;

pub use error::{IoError, Result};
pub use sink::{Descriptor, MaskDescriptor, MaskSink, RawSink, Variable};
