//! A solver-agnostic representation of a linear program.
//!
//! The problem is always a minimisation of the form:
//!
//! ```text
//! minimise    c1*x1 + c2*x2 + ...
//! subject to  row_min <= a1*x1 + a2*x2 + ... <= row_max   (for each row)
//!             col_min <= x <= col_max                     (for each column)
//! ```
//!
//! The interface deliberately mirrors that of the HiGHS row-wise problem builder, so that bounds
//! are given as ranges (e.g. `0.0..`, `..=0.0` or `rhs..=rhs`).
use std::ops::{Bound, RangeBounds};

/// A decision variable (column) in a [`LinearProgram`].
///
/// This does **not** hold the variable's value; it refers to a particular column of the problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Variable(usize);

impl Variable {
    /// The index of the column in the problem
    pub fn index(self) -> usize {
        self.0
    }
}

/// A column of the problem: one decision variable
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Coefficient of the variable in the objective
    pub cost: f64,
    /// Lower bound (may be `-inf`)
    pub lower: f64,
    /// Upper bound (may be `inf`)
    pub upper: f64,
}

/// A linear constraint.
///
/// Often a row will impose only a lower or an upper bound, with the other set to infinity or minus
/// infinity. Equality constraints have equal bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Lower bound for the row activity
    pub lower: f64,
    /// Upper bound for the row activity
    pub upper: f64,
    /// Non-zero coefficients for the row
    pub terms: Vec<(Variable, f64)>,
}

impl Row {
    /// Evaluate the row activity (i.e. sum of coefficients times values)
    pub fn activity(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|(var, coeff)| coeff * values[var.0])
            .sum()
    }

    /// How far the activity lies outside the row bounds (zero if the row is satisfied)
    pub fn violation(&self, values: &[f64]) -> f64 {
        let activity = self.activity(values);
        (self.lower - activity).max(activity - self.upper).max(0.0)
    }
}

/// Convert a range into a pair of lower and upper bounds
fn to_bounds<R: RangeBounds<f64>>(range: &R) -> (f64, f64) {
    let lower = match range.start_bound() {
        Bound::Included(x) | Bound::Excluded(x) => *x,
        Bound::Unbounded => f64::NEG_INFINITY,
    };
    let upper = match range.end_bound() {
        Bound::Included(x) | Bound::Excluded(x) => *x,
        Bound::Unbounded => f64::INFINITY,
    };

    (lower, upper)
}

/// A linear minimisation problem built up row by row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearProgram {
    columns: Vec<Column>,
    rows: Vec<Row>,
}

impl LinearProgram {
    /// Add a new variable to the problem.
    ///
    /// # Arguments
    ///
    /// * `cost` - The variable's coefficient in the objective
    /// * `bounds` - The range of values the variable may take
    pub fn add_column<R: RangeBounds<f64>>(&mut self, cost: f64, bounds: R) -> Variable {
        let (lower, upper) = to_bounds(&bounds);
        self.columns.push(Column { cost, lower, upper });

        Variable(self.columns.len() - 1)
    }

    /// Add a new constraint to the problem.
    ///
    /// # Arguments
    ///
    /// * `bounds` - The range of values the row activity may take
    /// * `terms` - The variables in the row with their coefficients
    pub fn add_row<R, I>(&mut self, bounds: R, terms: I)
    where
        R: RangeBounds<f64>,
        I: IntoIterator<Item = (Variable, f64)>,
    {
        let (lower, upper) = to_bounds(&bounds);
        let terms: Vec<_> = terms.into_iter().collect();
        for (var, _) in &terms {
            assert!(var.0 < self.columns.len(), "Row refers to unknown variable");
        }

        self.rows.push(Row {
            lower,
            upper,
            terms,
        });
    }

    /// The problem's variables
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// The problem's constraints
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// The number of variables
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// The number of constraints
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Evaluate the objective for the given column values
    pub fn objective_value(&self, values: &[f64]) -> f64 {
        assert_eq!(values.len(), self.columns.len(), "Wrong number of values");
        self.columns
            .iter()
            .zip(values)
            .map(|(col, value)| col.cost * value)
            .sum()
    }
}
