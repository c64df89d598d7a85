//! Expression trees handed to the SQL generator
//!
//! An [`Expr`] describes a predicate, an assignment list, a sort key or a
//! projection over the members of one entity (the *statement parameter*).
//! Anything computed outside that entity is captured as an already evaluated
//! [`Expr::Constant`]; the generator never evaluates user code.
//!
//! Trees are usually built through the typed constructors in [`typed`], but can
//! also be assembled directly or deserialized from JSON:
//!
//! ```
//! use sqlcraft::expr::Expr;
//!
//! let adult = Expr::member("Age").ge(18).and(Expr::member("Age").le(65));
//! let json = serde_json::to_string(&adult).unwrap();
//! let back: Expr = serde_json::from_str(&json).unwrap();
//! assert_eq!(adult, back);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod eval;
pub mod typed;
pub mod value;

pub use typed::{Assignments, Field, Operand, Predicate, Projection, TextField};
pub use value::{Value, ValueError, ValueKind};

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    /// A value captured from outside the statement.
    Constant(Value),

    /// A member of the statement parameter, by member name.
    Member(String),

    Binary(BinaryExpr),

    Unary(UnaryExpr),

    MethodCall(MethodCall),

    /// Member initializer: `new T { A = .., B = .. }`.
    MemberInit(Vec<MemberBinding>),

    /// Anonymous projection: `new { x.A, x.B }`.
    New(Vec<Expr>),
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub operand: Box<Expr>,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct MethodCall {
    pub target: Box<Expr>,
    pub method: Method,
    pub args: Vec<Expr>,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct MemberBinding {
    pub member: String,
    pub value: Expr,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    AndAlso,
    OrElse,
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOp {
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Equal
                | BinaryOp::NotEqual
                | BinaryOp::GreaterThan
                | BinaryOp::GreaterThanOrEqual
                | BinaryOp::LessThan
                | BinaryOp::LessThanOrEqual
        )
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinaryOp::Add | BinaryOp::Subtract | BinaryOp::Multiply | BinaryOp::Divide
        )
    }

    /// SQL spelling of comparison and arithmetic operators.
    pub fn sql_symbol(self) -> &'static str {
        match self {
            BinaryOp::AndAlso => "AND",
            BinaryOp::OrElse => "OR",
            BinaryOp::Equal => "=",
            BinaryOp::NotEqual => "<>",
            BinaryOp::GreaterThan => ">",
            BinaryOp::GreaterThanOrEqual => ">=",
            BinaryOp::LessThan => "<",
            BinaryOp::LessThanOrEqual => "<=",
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    /// Type conversion wrapper; transparent to every compiler.
    Convert,
    Not,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    Contains,
    StartsWith,
    EndsWith,
    Equals,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Contains => "Contains",
            Method::StartsWith => "StartsWith",
            Method::EndsWith => "EndsWith",
            Method::Equals => "Equals",
        };
        f.write_str(name)
    }
}

impl Expr {
    pub fn member(name: impl Into<String>) -> Self {
        Expr::Member(name.into())
    }

    pub fn constant(value: impl Into<Value>) -> Self {
        Expr::Constant(value.into())
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::Binary(BinaryExpr {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::Unary(UnaryExpr {
            op,
            operand: Box::new(operand),
        })
    }

    pub fn call(target: Expr, method: Method, args: Vec<Expr>) -> Self {
        Expr::MethodCall(MethodCall {
            target: Box::new(target),
            method,
            args,
        })
    }

    pub fn convert(self) -> Self {
        Expr::unary(UnaryOp::Convert, self)
    }

    pub fn eq(self, value: impl Into<Value>) -> Self {
        Expr::binary(BinaryOp::Equal, self, Expr::constant(value))
    }

    pub fn ne(self, value: impl Into<Value>) -> Self {
        Expr::binary(BinaryOp::NotEqual, self, Expr::constant(value))
    }

    pub fn gt(self, value: impl Into<Value>) -> Self {
        Expr::binary(BinaryOp::GreaterThan, self, Expr::constant(value))
    }

    pub fn ge(self, value: impl Into<Value>) -> Self {
        Expr::binary(BinaryOp::GreaterThanOrEqual, self, Expr::constant(value))
    }

    pub fn lt(self, value: impl Into<Value>) -> Self {
        Expr::binary(BinaryOp::LessThan, self, Expr::constant(value))
    }

    pub fn le(self, value: impl Into<Value>) -> Self {
        Expr::binary(BinaryOp::LessThanOrEqual, self, Expr::constant(value))
    }

    pub fn and(self, other: Expr) -> Self {
        Expr::binary(BinaryOp::AndAlso, self, other)
    }

    pub fn or(self, other: Expr) -> Self {
        Expr::binary(BinaryOp::OrElse, self, other)
    }

    pub fn not(self) -> Self {
        Expr::unary(UnaryOp::Not, self)
    }

    /// Strip any number of [`UnaryOp::Convert`] wrappers.
    pub fn unwrap_convert(&self) -> &Expr {
        let mut current = self;
        while let Expr::Unary(UnaryExpr {
            op: UnaryOp::Convert,
            operand,
        }) = current
        {
            current = operand;
        }
        current
    }

    /// The member name if this node is a (possibly converted) member access.
    pub fn as_member(&self) -> Option<&str> {
        match self.unwrap_convert() {
            Expr::Member(name) => Some(name),
            _ => None,
        }
    }

    /// The captured value if this node is a (possibly converted) constant.
    pub fn as_constant(&self) -> Option<&Value> {
        match self.unwrap_convert() {
            Expr::Constant(value) => Some(value),
            _ => None,
        }
    }

    /// Short node description for error messages.
    pub fn shape(&self) -> String {
        match self {
            Expr::Constant(v) => format!("constant {}", v.type_name()),
            Expr::Member(m) => format!("member `{}`", m),
            Expr::Binary(b) => format!("binary {:?}", b.op),
            Expr::Unary(u) => format!("unary {:?}", u.op),
            Expr::MethodCall(c) => format!("call {}()", c.method),
            Expr::MemberInit(_) => "member initializer".to_string(),
            Expr::New(_) => "projection".to_string(),
        }
    }
}
