//! Synthetic employee fixture
//!
//! - `employee` - the immutable [`Employee`] record and its random factory
//! - `generator` - reproducible roster-sized batches of employees
//! - `session` - scoped population of the `employees` table

pub mod employee;
pub mod generator;
pub mod session;

pub use employee::{employee_from_random, Employee};
pub use generator::{generate, DEFAULT_ROSTER};
pub use session::FixtureSession;
