use rand::Rng;

/// Lowest salary a generated employee can have
pub const BASE_SALARY: f64 = 50_000.0;

/// Width of the salary band above [`BASE_SALARY`]
pub const SALARY_SPAN: f64 = 100_000.0;

const SALARY_STEP: f64 = 1_000.0;

/// One synthetic employee
#[derive(Debug, Clone, PartialEq)]
pub struct Employee {
    name: String,
    salary: f64,
}

impl Employee {
    pub fn new(name: impl Into<String>, salary: f64) -> Self {
        Self {
            name: name.into(),
            salary,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn salary(&self) -> f64 {
        self.salary
    }
}

/// Build an employee with a salary drawn from `rng`.
///
/// Exactly one draw is taken. The draw is rounded to the nearest thousand
/// (ties to even) and offset by [`BASE_SALARY`], so the result is a multiple
/// of 1000 in `[50_000, 150_000)`. Draws are capped half a step below the
/// span so rounding can never reach the upper bound.
pub fn employee_from_random<R: Rng + ?Sized>(name: impl Into<String>, rng: &mut R) -> Employee {
    let draw: f64 = rng.random_range(0.0..SALARY_SPAN - SALARY_STEP / 2.0);
    let rounded = (draw / SALARY_STEP).round_ties_even() * SALARY_STEP;
    Employee::new(name, BASE_SALARY + rounded)
}
