use super::employee::{employee_from_random, Employee};
use rand::Rng;

/// Names used when no roster is supplied
pub const DEFAULT_ROSTER: [&str; 8] = [
    "Alice", "Bob", "Charlie", "Dana", "Evaan", "Frank", "Gina", "Harry",
];

/// One employee per name, in order, drawing from `rng` sequentially
pub fn generate<S, R>(names: &[S], rng: &mut R) -> Vec<Employee>
where
    S: AsRef<str>,
    R: Rng + ?Sized,
{
    names
        .iter()
        .map(|name| employee_from_random(name.as_ref(), &mut *rng))
        .collect()
}
