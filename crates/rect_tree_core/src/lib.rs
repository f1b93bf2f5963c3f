#![deny(
    rust_2018_compatibility,
    rust_2018_idioms,
    nonstandard_style,
    unused,
    future_incompatible
)]
#![warn(clippy::doc_markdown)]

//! The core data types for adaptive rectangular trees:
//! - `Diti`: a bit-interleaved composite coordinate, and the `DitiCodec` that does arithmetic on it
//! - `DomainBox`: the mapping between tree coordinates and real domain points
//! - `vec3`: small vector math over `[f64; 3]`

pub mod axis;
pub mod diti;
pub mod domain;
pub mod error;
pub mod vec3;

pub use axis::{Direction, SignedAxis};
pub use diti::{deinterleave, interleave, Diti, DitiCodec, DEFAULT_BITS, MAX_BITS, MAX_DIMENSION};
pub use domain::{drpt_distance_inf, drpt_midpoint, rrpt_is_nan, DomainBox};
pub use error::CodecError;
pub use vec3::Vec3;

pub mod prelude {
    pub use super::{
        drpt_distance_inf, drpt_midpoint, rrpt_is_nan, CodecError, Direction, Diti, DitiCodec,
        DomainBox, SignedAxis, Vec3,
    };
}
