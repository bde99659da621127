use std::fmt;
use std::str::FromStr;

use jolt_types::{OperatorCategory, Span};

use crate::LowerError;

/// Binary operators handled by the operation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    BitAnd,
    BitOr,
    BitXor,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    Shl,
    Shr,
    UShr,
}

impl BinaryOp {
    pub const ALL: [BinaryOp; 12] = [
        BinaryOp::BitAnd,
        BinaryOp::BitOr,
        BinaryOp::BitXor,
        BinaryOp::Lt,
        BinaryOp::Le,
        BinaryOp::Gt,
        BinaryOp::Ge,
        BinaryOp::Eq,
        BinaryOp::Ne,
        BinaryOp::Shl,
        BinaryOp::Shr,
        BinaryOp::UShr,
    ];

    pub fn token(self) -> &'static str {
        match self {
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::UShr => ">>>",
        }
    }

    pub fn category(self) -> OperatorCategory {
        match self {
            BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor => OperatorCategory::Bitwise,
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
                OperatorCategory::Relational
            }
            BinaryOp::Eq | BinaryOp::Ne => OperatorCategory::Equality,
            BinaryOp::Shl | BinaryOp::Shr | BinaryOp::UShr => OperatorCategory::Shift,
        }
    }

    /// Parse a surface token. Arithmetic, logical and type-test operators are rejected; the
    /// latter two have dedicated entry points.
    pub fn from_token(token: &str, span: Span) -> Result<Self, LowerError> {
        let op = match token {
            "&" => BinaryOp::BitAnd,
            "|" => BinaryOp::BitOr,
            "^" => BinaryOp::BitXor,
            "<" => BinaryOp::Lt,
            "<=" => BinaryOp::Le,
            ">" => BinaryOp::Gt,
            ">=" => BinaryOp::Ge,
            "==" => BinaryOp::Eq,
            "!=" => BinaryOp::Ne,
            "<<" => BinaryOp::Shl,
            ">>" => BinaryOp::Shr,
            ">>>" => BinaryOp::UShr,
            _ => {
                return Err(LowerError::UnsupportedOperator {
                    token: token.to_string(),
                    span,
                })
            }
        };
        Ok(op)
    }
}

impl FromStr for BinaryOp {
    type Err = LowerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BinaryOp::from_token(s, Span::default())
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Short-circuiting logical operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    pub fn token(self) -> &'static str {
        match self {
            LogicalOp::And => "&&",
            LogicalOp::Or => "||",
        }
    }

    /// The left-operand value that decides the result without evaluating the right operand.
    pub fn short_circuit_value(self) -> bool {
        match self {
            LogicalOp::And => false,
            LogicalOp::Or => true,
        }
    }

    pub fn from_token(token: &str, span: Span) -> Result<Self, LowerError> {
        match token {
            "&&" => Ok(LogicalOp::And),
            "||" => Ok(LogicalOp::Or),
            _ => Err(LowerError::UnsupportedOperator {
                token: token.to_string(),
                span,
            }),
        }
    }
}

impl FromStr for LogicalOp {
    type Err = LowerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogicalOp::from_token(s, Span::default())
    }
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}
