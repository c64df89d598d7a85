//! Typed expression constructors
//!
//! Entities expose their members as `Field<Entity, ValueType>` constants. Building
//! predicates and assignments through fields keeps the value side type-checked and
//! ties every tree to the entity it will be compiled against.
//!
//! ```
//! use sqlcraft::expr::{Assignments, Field, Operand, TextField};
//!
//! struct User;
//! const AGE: Field<User, i32> = Field::new("Age");
//! const NAME: Field<User, String> = Field::new("UserName");
//!
//! let pred = AGE.ge(18).and(NAME.starts_with("bo"));
//! let set = Assignments::<User>::new()
//!     .set(AGE, Operand::column(AGE) + Operand::value(1))
//!     .set_value(NAME, "bob".to_string());
//! # let _ = (pred, set);
//! ```

use super::{BinaryOp, Expr, MemberBinding, Method, UnaryOp, Value};
use std::marker::PhantomData;
use std::ops::{Add, Div, Mul, Sub};

/// A member of entity `E` holding values of type `V`.
pub struct Field<E, V> {
    member: &'static str,
    _marker: PhantomData<fn() -> (E, V)>,
}

impl<E, V> Clone for Field<E, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E, V> Copy for Field<E, V> {}

impl<E, V> std::fmt::Debug for Field<E, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Field({})", self.member)
    }
}

impl<E, V> Field<E, V> {
    pub const fn new(member: &'static str) -> Self {
        Self {
            member,
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.member
    }

    pub fn expr(&self) -> Expr {
        Expr::member(self.member)
    }
}

impl<E, V: Into<Value>> Field<E, V> {
    fn compare(self, op: BinaryOp, value: V) -> Predicate<E> {
        Predicate::from_expr(Expr::binary(op, self.expr(), Expr::Constant(value.into())))
    }

    pub fn eq(self, value: V) -> Predicate<E> {
        self.compare(BinaryOp::Equal, value)
    }

    pub fn ne(self, value: V) -> Predicate<E> {
        self.compare(BinaryOp::NotEqual, value)
    }

    pub fn gt(self, value: V) -> Predicate<E> {
        self.compare(BinaryOp::GreaterThan, value)
    }

    pub fn ge(self, value: V) -> Predicate<E> {
        self.compare(BinaryOp::GreaterThanOrEqual, value)
    }

    pub fn lt(self, value: V) -> Predicate<E> {
        self.compare(BinaryOp::LessThan, value)
    }

    pub fn le(self, value: V) -> Predicate<E> {
        self.compare(BinaryOp::LessThanOrEqual, value)
    }

    /// `member.Equals(value)`; compiles the same as [`Field::eq`].
    pub fn equals(self, value: V) -> Predicate<E> {
        Predicate::from_expr(Expr::call(
            self.expr(),
            Method::Equals,
            vec![Expr::Constant(value.into())],
        ))
    }

    /// `values.Contains(member)`: list membership.
    pub fn is_in<I>(self, values: I) -> Predicate<E>
    where
        I: IntoIterator<Item = V>,
    {
        let list = Value::List(values.into_iter().map(Into::into).collect());
        Predicate::from_expr(Expr::call(
            Expr::Constant(list),
            Method::Contains,
            vec![self.expr()],
        ))
    }
}

impl<E> Field<E, bool> {
    /// The member itself used as a condition.
    pub fn is_true(self) -> Predicate<E> {
        Predicate::from_expr(self.expr())
    }
}

/// String-match methods, available on text fields only.
pub trait TextField<E> {
    fn contains(self, needle: &str) -> Predicate<E>;
    fn starts_with(self, prefix: &str) -> Predicate<E>;
    fn ends_with(self, suffix: &str) -> Predicate<E>;
}

fn text_call<E>(member: &'static str, method: Method, arg: &str) -> Predicate<E> {
    Predicate::from_expr(Expr::call(
        Expr::member(member),
        method,
        vec![Expr::constant(arg)],
    ))
}

impl<E> TextField<E> for Field<E, String> {
    fn contains(self, needle: &str) -> Predicate<E> {
        text_call(self.member, Method::Contains, needle)
    }

    fn starts_with(self, prefix: &str) -> Predicate<E> {
        text_call(self.member, Method::StartsWith, prefix)
    }

    fn ends_with(self, suffix: &str) -> Predicate<E> {
        text_call(self.member, Method::EndsWith, suffix)
    }
}

impl<E> TextField<E> for Field<E, Option<String>> {
    fn contains(self, needle: &str) -> Predicate<E> {
        text_call(self.member, Method::Contains, needle)
    }

    fn starts_with(self, prefix: &str) -> Predicate<E> {
        text_call(self.member, Method::StartsWith, prefix)
    }

    fn ends_with(self, suffix: &str) -> Predicate<E> {
        text_call(self.member, Method::EndsWith, suffix)
    }
}

/// A boolean condition over entity `E`.
pub struct Predicate<E> {
    expr: Expr,
    _marker: PhantomData<fn() -> E>,
}

impl<E> Clone for Predicate<E> {
    fn clone(&self) -> Self {
        Self::from_expr(self.expr.clone())
    }
}

impl<E> std::fmt::Debug for Predicate<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Predicate").field(&self.expr).finish()
    }
}

impl<E> Predicate<E> {
    /// Wrap an untyped tree. The caller vouches that it ranges over `E`.
    pub fn from_expr(expr: Expr) -> Self {
        Self {
            expr,
            _marker: PhantomData,
        }
    }

    pub fn and(self, other: Predicate<E>) -> Self {
        Self::from_expr(Expr::binary(BinaryOp::AndAlso, self.expr, other.expr))
    }

    pub fn or(self, other: Predicate<E>) -> Self {
        Self::from_expr(Expr::binary(BinaryOp::OrElse, self.expr, other.expr))
    }

    pub fn not(self) -> Self {
        Self::from_expr(Expr::unary(UnaryOp::Not, self.expr))
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn into_expr(self) -> Expr {
        self.expr
    }
}

/// Right-hand side of an assignment: a value, a column, or arithmetic over both.
pub struct Operand<E> {
    expr: Expr,
    _marker: PhantomData<fn() -> E>,
}

impl<E> Clone for Operand<E> {
    fn clone(&self) -> Self {
        Self::from_expr(self.expr.clone())
    }
}

impl<E> Operand<E> {
    fn from_expr(expr: Expr) -> Self {
        Self {
            expr,
            _marker: PhantomData,
        }
    }

    pub fn value(value: impl Into<Value>) -> Self {
        Self::from_expr(Expr::constant(value))
    }

    pub fn column<V>(field: Field<E, V>) -> Self {
        Self::from_expr(field.expr())
    }

    fn combine(self, op: BinaryOp, rhs: Operand<E>) -> Self {
        Self::from_expr(Expr::binary(op, self.expr, rhs.expr))
    }

    pub fn into_expr(self) -> Expr {
        self.expr
    }
}

impl<E, V> From<Field<E, V>> for Operand<E> {
    fn from(field: Field<E, V>) -> Self {
        Operand::column(field)
    }
}

impl<E> Add for Operand<E> {
    type Output = Operand<E>;

    fn add(self, rhs: Self) -> Self::Output {
        self.combine(BinaryOp::Add, rhs)
    }
}

impl<E> Sub for Operand<E> {
    type Output = Operand<E>;

    fn sub(self, rhs: Self) -> Self::Output {
        self.combine(BinaryOp::Subtract, rhs)
    }
}

impl<E> Mul for Operand<E> {
    type Output = Operand<E>;

    fn mul(self, rhs: Self) -> Self::Output {
        self.combine(BinaryOp::Multiply, rhs)
    }
}

impl<E> Div for Operand<E> {
    type Output = Operand<E>;

    fn div(self, rhs: Self) -> Self::Output {
        self.combine(BinaryOp::Divide, rhs)
    }
}

/// A member initializer over entity `E`, in binding order.
pub struct Assignments<E> {
    bindings: Vec<MemberBinding>,
    _marker: PhantomData<fn() -> E>,
}

impl<E> Default for Assignments<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Assignments<E> {
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
            _marker: PhantomData,
        }
    }

    pub fn set<V>(mut self, field: Field<E, V>, value: impl Into<Operand<E>>) -> Self {
        self.bindings.push(MemberBinding {
            member: field.name().to_string(),
            value: value.into().expr,
        });
        self
    }

    pub fn set_value<V: Into<Value>>(self, field: Field<E, V>, value: V) -> Self {
        self.set(field, Operand::value(value))
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn into_expr(self) -> Expr {
        Expr::MemberInit(self.bindings)
    }
}

/// An ordered member projection over entity `E`.
pub struct Projection<E> {
    members: Vec<Expr>,
    _marker: PhantomData<fn() -> E>,
}

impl<E> Projection<E> {
    pub fn of<V>(field: Field<E, V>) -> Self {
        Self {
            members: vec![field.expr()],
            _marker: PhantomData,
        }
    }

    pub fn and<V>(mut self, field: Field<E, V>) -> Self {
        self.members.push(field.expr());
        self
    }

    pub fn into_expr(self) -> Expr {
        Expr::New(self.members)
    }
}

impl<E, V> From<Field<E, V>> for Projection<E> {
    fn from(field: Field<E, V>) -> Self {
        Projection::of(field)
    }
}
