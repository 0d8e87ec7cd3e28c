//! Interval sieving for prime gap searches.
//!
//! Given a large anchor `N` and a window length `gap`, [`IntervalSieve`] marks every member of
//! `[N, N + gap]` that has a prime factor up to some limit. The unmarked survivors are the only
//! candidates worth a full primality test.

mod bitvec;
mod config;
mod eratosthenes;
mod error;
mod estimate;
mod factors;
mod interval;
mod primorial;
mod residue;
mod segmented;
mod survivors;
mod traits;
mod trial_division;
mod util;


pub use bitvec::*;
pub use config::*;
pub use eratosthenes::*;
pub use error::*;
pub use estimate::*;
pub use factors::*;
pub use interval::*;
pub use primorial::*;
pub use residue::residue;
pub use segmented::*;
pub use survivors::*;
pub use traits::*;
pub use trial_division::*;
