//! # Variables
//!
//! `Variable` is the leaf of the expression algebra. It does not own its value: it reads a
//! shared cell that belongs to a `VariableSource`. This lets one compute a general solution
//! once, e.g. `X = a + b*c`, and then obtain new numbers by writing new values into the
//! sources and calling `evaluate()` again, without repeating the algebra. A typical use is a
//! circuit simulation where the admittance matrix keeps its structure while sources and
//! admittances change with time.
//!
//! Only `VariableSource` can write the cell; every `Variable` obtained from it is read-only.
//! The cell lives as long as the longest holder (the source or any derived variable).
//! Cells are `Rc<Cell<_>>`, so variables are confined to one thread.
use crate::symbolic::complex_core::{
    ComplexCore, IMAGINARY_ONE, NEGATIVE_IMAGINARY_ONE, NEGATIVE_ONE, ONE, ZERO,
};
use num_complex::Complex64;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Read-only leaf holding a reference to a shared complex value.
#[derive(Clone)]
pub struct Variable {
    label: Option<Rc<str>>,
    cell: Rc<Cell<Complex64>>,
}

impl Variable {
    /// A constant leaf with its own private cell - nobody can change its value
    pub fn constant(value: Complex64) -> Self {
        Variable {
            label: None,
            cell: Rc::new(Cell::new(value)),
        }
    }

    pub fn one() -> Self {
        Variable::constant(ONE)
    }

    pub fn negative_one() -> Self {
        Variable::constant(NEGATIVE_ONE)
    }

    pub fn zero() -> Self {
        Variable::constant(ZERO)
    }

    pub fn imaginary_one() -> Self {
        Variable::constant(IMAGINARY_ONE)
    }

    pub fn negative_imaginary_one() -> Self {
        Variable::constant(NEGATIVE_IMAGINARY_ONE)
    }

    /// current value of the shared cell (a copy)
    pub fn value(&self) -> Complex64 {
        self.cell.get()
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn is_pure_real(&self) -> bool {
        self.value().is_pure_real()
    }

    pub fn is_pure_imaginary(&self) -> bool {
        self.value().is_pure_imaginary()
    }

    /// true if both variables read the same cell
    pub fn shares_cell_with(&self, other: &Variable) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }
}

/// Two variables are equal when they carry the same label and read the same cell.
impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label && self.shares_cell_with(other)
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Variable")
            .field("label", &self.label())
            .field("value", &self.value())
            .finish()
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.label() {
            Some(label) => write!(f, "{}", label),
            None => write!(f, "{}", self.value().to_pretty_string()),
        }
    }
}

/// Owner of a value cell: the only place the value of a `Variable` can be set.
#[derive(Debug)]
pub struct VariableSource {
    variable: Variable,
}

impl VariableSource {
    /// unlabeled source holding zero
    pub fn new() -> Self {
        VariableSource::with_value(ZERO)
    }

    pub fn with_value(value: Complex64) -> Self {
        VariableSource {
            variable: Variable::constant(value),
        }
    }

    pub fn labeled(label: &str, value: Complex64) -> Self {
        VariableSource {
            variable: Variable {
                label: Some(Rc::from(label)),
                cell: Rc::new(Cell::new(value)),
            },
        }
    }

    pub fn value(&self) -> Complex64 {
        self.variable.value()
    }

    /// writes a new value; every variable derived from this source sees it immediately
    pub fn set_value(&self, value: Complex64) {
        self.variable.cell.set(value);
    }

    pub fn label(&self) -> Option<&str> {
        self.variable.label()
    }

    /// read-only view on the value of this source
    pub fn variable(&self) -> Variable {
        self.variable.clone()
    }
}

impl Default for VariableSource {
    fn default() -> Self {
        VariableSource::new()
    }
}
