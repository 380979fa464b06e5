pub mod config;
pub mod decode;
pub mod lattice;

pub use config::Config;
pub use decode::{decode, DecodedPath};
pub use lattice::{Lattice, LatticeError, LatticeSpec, LatticeState};
