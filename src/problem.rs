use rand::Rng;
use serde::{Deserialize, Serialize};

pub const MAX_OPERAND: u32 = 100;

/// The four drilled operations, in the order a quiz walks through them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, strum_macros::Display,
)]
#[strum(serialize_all = "lowercase")]
pub enum Operation {
    #[serde(rename = "+")]
    Addition,
    #[serde(rename = "-")]
    Subtraction,
    #[serde(rename = "*")]
    Multiplication,
    #[serde(rename = "/")]
    Division,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Addition,
        Operation::Subtraction,
        Operation::Multiplication,
        Operation::Division,
    ];

    pub fn symbol(&self) -> char {
        match self {
            Operation::Addition => '+',
            Operation::Subtraction => '-',
            Operation::Multiplication => '*',
            Operation::Division => '/',
        }
    }

    /// Smallest right-hand operand the generator will draw.
    pub fn min_operand_b(&self) -> u32 {
        match self {
            Operation::Division => 1,
            _ => 0,
        }
    }

    /// Exact result; `None` only for a zero divisor.
    pub fn apply(&self, a: u32, b: u32) -> Option<f64> {
        let (a, b) = (a as f64, b as f64);
        match self {
            Operation::Addition => Some(a + b),
            Operation::Subtraction => Some(a - b),
            Operation::Multiplication => Some(a * b),
            Operation::Division if b == 0.0 => None,
            Operation::Division => Some(a / b),
        }
    }
}

/// A single arithmetic question with its expected answer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Problem {
    operand_a: u32,
    operand_b: u32,
    operation: Operation,
    correct_answer: f64,
}

impl Problem {
    /// Refuses to build a division by zero.
    pub fn new(operand_a: u32, operand_b: u32, operation: Operation) -> Option<Self> {
        let correct_answer = operation.apply(operand_a, operand_b)?;
        Some(Self {
            operand_a,
            operand_b,
            operation,
            correct_answer,
        })
    }

    pub fn operand_a(&self) -> u32 {
        self.operand_a
    }

    pub fn operand_b(&self) -> u32 {
        self.operand_b
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn correct_answer(&self) -> f64 {
        self.correct_answer
    }

    pub fn expression(&self) -> String {
        format_expression(self.operand_a, self.operand_b, self.operation)
    }
}

pub fn format_expression(a: u32, b: u32, operation: Operation) -> String {
    format!("{} {} {}", a, operation.symbol(), b)
}

/// Draw a random problem for `operation`.
///
/// Division samples its divisor from `1..=100`, so in practice this never
/// returns `None`; callers still treat `None` as a skipped problem.
pub fn generate_problem<R: Rng + ?Sized>(operation: Operation, rng: &mut R) -> Option<Problem> {
    let a = rng.gen_range(0..=MAX_OPERAND);
    let b = rng.gen_range(operation.min_operand_b()..=MAX_OPERAND);
    Problem::new(a, b, operation)
}
