//! Data layer for mixed logit discrete choice models.
//!
//! A mixed logit likelihood is simulated by drawing many taste vectors `beta`
//! from a random-coefficients distribution and averaging the multinomial logit
//! probability of each person's observed choice. This crate provides the
//! pieces that loop evaluates over and over:
//!
//! - raw column-oriented tables of attributes, decisions and choice-set sizes
//!   (`table` module),
//! - a validated ragged index from people to their alternatives, plus the
//!   shuffled person order and per-choice counts used by the sampler
//!   (`dcm_table` module),
//! - numerically stable logit probabilities for a single `beta`, and for many
//!   draws in parallel (`choice` module),
//! - parameter layouts of the taste distributions (`distribution` module).
//!
//! Drawing `beta` and optimizing the simulated likelihood are left to the
//! caller.
//!
//! # Quick start
//!
//! ```no_run
//! use mixlogit::distribution::ConstantDistribution;
//! use mixlogit::table::Table;
//! use mixlogit::DcmTable;
//! use nalgebra::DVector;
//! use rand::rngs::SmallRng;
//! use rand::SeedableRng;
//!
//! // Person 0 picks between two alternatives, person 1 between three.
//! let attributes = Table::from_points(
//!     2,
//!     &[1.0, 0.0, 0.0, 1.0, 1.0, 1.0, 0.0, 0.0, 2.0, 0.0],
//! )
//! .expect("whole points");
//! let decisions = Table::from_column(&[1.0, 3.0]);
//! let num_alternatives = Table::from_column(&[2.0, 3.0]);
//!
//! let mut rng = SmallRng::seed_from_u64(1234);
//! let table = DcmTable::init(
//!     attributes,
//!     &[2],
//!     decisions,
//!     num_alternatives,
//!     ConstantDistribution::default(),
//!     &mut rng,
//! )
//! .expect("consistent tables");
//!
//! let beta = DVector::from_vec(vec![1.0, 0.0]);
//! println!("P(choice of person 1) = {}", table.choice_probability(1, &beta));
//! ```

pub mod choice;
pub mod dcm_table;
pub mod distribution;
pub mod error;
pub mod options;
pub mod random;
pub mod table;

pub use dcm_table::{DcmTable, DcmTableBuilder};
pub use distribution::Distribution;
pub use error::{DcmError, Result};
pub use options::{DcmOptions, DEFAULT_EXPONENT_SHIFT};
pub use table::Table;
