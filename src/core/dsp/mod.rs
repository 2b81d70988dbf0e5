//! Numerical building blocks: spectra, recursive filters, sine fitting

mod filter;
mod sinefit;
mod spectrum;

pub use filter::Filter;
pub use sinefit::{sine_fit, SineWave};
pub use spectrum::Spectrum;
