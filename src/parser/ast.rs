//! Abstract Syntax Tree definitions for the pipeline DSL

use std::fmt;

use crate::collection::Value;

/// A parsed pipeline: stages applied left to right
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    pub stages: Vec<Stage>,
}

/// One `name(args...)` step
#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    pub name: String,
    pub args: Vec<Arg>,
}

impl Stage {
    /// Stage name lowercased with underscores removed, so `sortByDesc`,
    /// `sort_by_desc` and `SORTBYDESC` are the same stage
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }
}

/// Lowercase `name` and drop underscores
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.args.is_empty() {
            let args: Vec<String> = self.args.iter().map(|a| a.to_string()).collect();
            write!(f, "({})", args.join(", "))?;
        }
        Ok(())
    }
}

/// Stage argument
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// JSON-like literal; arrays and objects become collections
    Literal(Value),
    /// Bare or dotted field name
    Field(String),
    Condition(ConditionExpr),
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Literal(value) => write!(f, "{}", value),
            Arg::Field(name) => write!(f, "{}", name),
            Arg::Condition(expr) => write!(f, "{}", expr),
        }
    }
}

// ============================================================================
// Conditions
// ============================================================================

/// Condition expression with optional logical operators
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionExpr {
    pub condition: Condition,
    pub next: Option<(LogicalOp, Box<ConditionExpr>)>,
}

impl ConditionExpr {
    /// Conditions and the operators joining them, in source order
    pub fn chain(&self) -> Vec<(Option<LogicalOp>, &Condition)> {
        let mut out = vec![(None, &self.condition)];
        let mut cursor = &self.next;
        while let Some((op, expr)) = cursor {
            out.push((Some(*op), &expr.condition));
            cursor = &expr.next;
        }
        out
    }
}

impl fmt::Display for ConditionExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.condition)?;
        if let Some((op, next)) = &self.next {
            write!(f, " {} {}", op, next)?;
        }
        Ok(())
    }
}

/// Single condition
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub operator: CompareOp,
    pub value: Value,
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.operator, self.value)
    }
}

/// Logical operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalOp::And => write!(f, "and"),
            LogicalOp::Or => write!(f, "or"),
        }
    }
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Like,
    Contains,
    Matches,
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareOp::Equal => write!(f, "="),
            CompareOp::NotEqual => write!(f, "!="),
            CompareOp::GreaterThan => write!(f, ">"),
            CompareOp::GreaterThanOrEqual => write!(f, ">="),
            CompareOp::LessThan => write!(f, "<"),
            CompareOp::LessThanOrEqual => write!(f, "<="),
            CompareOp::Like => write!(f, "like"),
            CompareOp::Contains => write!(f, "contains"),
            CompareOp::Matches => write!(f, "matches"),
        }
    }
}
