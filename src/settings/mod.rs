//! Configuration loading for the `fadrec` binary.
//!
//! `load` layers default files, `--config` files, `FADREC_*` environment
//! variables and command-line flags, then validates the result into a
//! [`ResolvedConfig`].

mod loader;
mod raw;
mod resolved;
mod sources;
mod util;

pub use loader::load;
pub use resolved::ResolvedConfig;
