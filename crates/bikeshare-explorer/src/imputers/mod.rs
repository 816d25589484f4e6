//! Imputation module for handling missing values.
//!
//! Trip files leave user type, gender and birth year blank now and then;
//! these are filled with the column mode before any statistics run.

mod statistical;

pub use statistical::StatisticalImputer;
