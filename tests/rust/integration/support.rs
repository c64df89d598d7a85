//! In-memory executor for the emitted MySQL subset
//!
//! Understands exactly the statement shapes `SqlBuilder` renders (single table,
//! backtick identifiers, `@` placeholders), so tests can run real terminals
//! without a database.

use async_trait::async_trait;
use regex::Regex;
use sqlcraft::expr::eval::compare_values;
use sqlcraft::expr::Value;
use sqlcraft::query::{Connection, ExecutorError, Row, SqlExecutor};
use sqlcraft::sql_generator::ParameterBag;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
enum Tok {
    Ident(String),
    Param(String),
    Word(String),
    Num(i64),
    Sym(&'static str),
}

fn tokenize(sql: &str) -> Result<Vec<Tok>, ExecutorError> {
    let chars: Vec<char> = sql.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
        } else if c == '`' {
            let end = chars[i + 1..]
                .iter()
                .position(|&c| c == '`')
                .ok_or_else(|| ExecutorError::new("unterminated identifier"))?;
            tokens.push(Tok::Ident(chars[i + 1..i + 1 + end].iter().collect()));
            i += end + 2;
        } else if c == '@' || c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            i += 1;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let text: String = chars[start..i].iter().collect();
            tokens.push(if c == '@' {
                Tok::Param(text)
            } else {
                Tok::Word(text.to_ascii_uppercase())
            });
        } else if c.is_ascii_digit() {
            let start = i;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            let text: String = chars[start..i].iter().collect();
            tokens.push(Tok::Num(text.parse().map_err(|_| ExecutorError::new("bad number"))?));
        } else {
            let two: String = chars[i..(i + 2).min(chars.len())].iter().collect();
            let sym = match two.as_str() {
                "<>" => Some("<>"),
                ">=" => Some(">="),
                "<=" => Some("<="),
                _ => None,
            };
            if let Some(sym) = sym {
                tokens.push(Tok::Sym(sym));
                i += 2;
                continue;
            }
            let sym = match c {
                '=' => "=",
                '<' => "<",
                '>' => ">",
                '(' => "(",
                ')' => ")",
                ',' => ",",
                '+' => "+",
                '-' => "-",
                '*' => "*",
                '/' => "/",
                other => return Err(ExecutorError::new(format!("unexpected `{}`", other))),
            };
            tokens.push(Tok::Sym(sym));
            i += 1;
        }
    }
    Ok(tokens)
}

#[derive(Debug, Clone)]
enum Cond {
    And(Box<Cond>, Box<Cond>),
    Or(Box<Cond>, Box<Cond>),
    Not(Box<Cond>),
    Const(bool),
    Cmp(String, &'static str, String),
    Is(String, bool, String),
    Like(String, String),
    In(String, Vec<String>),
}

#[derive(Debug, Clone)]
enum Operand {
    Column(String),
    Param(String),
    Arith(Box<Operand>, &'static str, Box<Operand>),
}

#[derive(Debug, Clone)]
enum Field {
    Column(String),
    Aggregate(String, String),
}

#[derive(Debug)]
enum Statement {
    Select {
        fields: Option<Vec<Field>>,
        table: String,
        filter: Option<Cond>,
        order: Vec<(String, bool)>,
        limit: Option<(usize, usize)>,
    },
    Count {
        table: String,
        filter: Option<Cond>,
    },
    LastInsertId,
    Insert {
        table: String,
        columns: Vec<String>,
        values: Vec<String>,
    },
    Update {
        table: String,
        set: Vec<(String, Operand)>,
        filter: Option<Cond>,
    },
    Delete {
        table: String,
        filter: Option<Cond>,
    },
}

struct Parser {
    tokens: Vec<Tok>,
    pos: usize,
}

fn unexpected(what: &str, tok: Option<&Tok>) -> ExecutorError {
    ExecutorError::new(format!("expected {}, found {:?}", what, tok))
}

impl Parser {
    fn peek(&self) -> Option<&Tok> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Tok> {
        let tok = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        tok
    }

    fn is_word(&self, word: &str) -> bool {
        matches!(self.peek(), Some(Tok::Word(w)) if w == word)
    }

    fn eat_word(&mut self, word: &str) -> bool {
        if self.is_word(word) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_sym(&mut self, sym: &str) -> bool {
        if matches!(self.peek(), Some(Tok::Sym(s)) if *s == sym) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn word(&mut self, word: &str) -> Result<(), ExecutorError> {
        if self.eat_word(word) {
            Ok(())
        } else {
            Err(unexpected(word, self.peek()))
        }
    }

    fn sym(&mut self, sym: &str) -> Result<(), ExecutorError> {
        if self.eat_sym(sym) {
            Ok(())
        } else {
            Err(unexpected(sym, self.peek()))
        }
    }

    fn ident(&mut self) -> Result<String, ExecutorError> {
        match self.next() {
            Some(Tok::Ident(name)) => Ok(name),
            other => Err(unexpected("identifier", other.as_ref())),
        }
    }

    fn param(&mut self) -> Result<String, ExecutorError> {
        match self.next() {
            Some(Tok::Param(name)) => Ok(name),
            other => Err(unexpected("parameter", other.as_ref())),
        }
    }

    fn number(&mut self) -> Result<i64, ExecutorError> {
        match self.next() {
            Some(Tok::Num(n)) => Ok(n),
            other => Err(unexpected("number", other.as_ref())),
        }
    }

    fn statement(&mut self) -> Result<Statement, ExecutorError> {
        let statement = if self.eat_word("SELECT") {
            self.select()?
        } else if self.eat_word("INSERT") {
            self.word("INTO")?;
            let table = self.ident()?;
            self.sym("(")?;
            let columns = self.list(Self::ident)?;
            self.word("VALUES")?;
            self.sym("(")?;
            let values = self.list(Self::param)?;
            Statement::Insert {
                table,
                columns,
                values,
            }
        } else if self.eat_word("UPDATE") {
            let table = self.ident()?;
            self.word("SET")?;
            let mut set = Vec::new();
            loop {
                let column = self.ident()?;
                self.sym("=")?;
                set.push((column, self.operand()?));
                if !self.eat_sym(",") {
                    break;
                }
            }
            Statement::Update {
                table,
                set,
                filter: self.filter()?,
            }
        } else if self.eat_word("DELETE") {
            self.word("FROM")?;
            let table = self.ident()?;
            Statement::Delete {
                table,
                filter: self.filter()?,
            }
        } else {
            return Err(unexpected("statement", self.peek()));
        };
        match self.peek() {
            None => Ok(statement),
            Some(tok) => Err(unexpected("end of statement", Some(tok))),
        }
    }

    /// Comma-separated items up to and including `)`.
    fn list<T>(&mut self, item: fn(&mut Self) -> Result<T, ExecutorError>) -> Result<Vec<T>, ExecutorError> {
        let mut items = vec![item(self)?];
        while self.eat_sym(",") {
            items.push(item(self)?);
        }
        self.sym(")")?;
        Ok(items)
    }

    fn select(&mut self) -> Result<Statement, ExecutorError> {
        if self.eat_word("LAST_INSERT_ID") {
            self.sym("(")?;
            self.sym(")")?;
            self.word("ID")?;
            return Ok(Statement::LastInsertId);
        }
        if self.eat_word("COUNT") {
            self.sym("(")?;
            self.sym("*")?;
            self.sym(")")?;
            self.word("FROM")?;
            let table = self.ident()?;
            return Ok(Statement::Count {
                table,
                filter: self.filter()?,
            });
        }

        let fields = if self.eat_sym("*") {
            None
        } else {
            let mut fields = Vec::new();
            loop {
                match self.next() {
                    Some(Tok::Ident(column)) => fields.push(Field::Column(column)),
                    Some(Tok::Word(function)) => {
                        self.sym("(")?;
                        let column = self.ident()?;
                        self.sym(")")?;
                        fields.push(Field::Aggregate(function, column));
                    }
                    other => return Err(unexpected("field", other.as_ref())),
                }
                if !self.eat_sym(",") {
                    break;
                }
            }
            Some(fields)
        };
        self.word("FROM")?;
        let table = self.ident()?;
        let filter = self.filter()?;

        let mut order = Vec::new();
        if self.eat_word("ORDER") {
            self.word("BY")?;
            loop {
                let column = self.ident()?;
                let descending = if self.eat_word("DESC") {
                    true
                } else {
                    self.word("ASC")?;
                    false
                };
                order.push((column, descending));
                if !self.eat_sym(",") {
                    break;
                }
            }
        }

        let limit = if self.eat_word("LIMIT") {
            let first = self.number()? as usize;
            if self.eat_sym(",") {
                Some((first, self.number()? as usize))
            } else {
                Some((0, first))
            }
        } else {
            None
        };

        Ok(Statement::Select {
            fields,
            table,
            filter,
            order,
            limit,
        })
    }

    fn filter(&mut self) -> Result<Option<Cond>, ExecutorError> {
        if self.eat_word("WHERE") {
            Ok(Some(self.or_cond()?))
        } else {
            Ok(None)
        }
    }

    fn or_cond(&mut self) -> Result<Cond, ExecutorError> {
        let mut left = self.and_cond()?;
        while self.eat_word("OR") {
            left = Cond::Or(Box::new(left), Box::new(self.and_cond()?));
        }
        Ok(left)
    }

    fn and_cond(&mut self) -> Result<Cond, ExecutorError> {
        let mut left = self.unary_cond()?;
        while self.eat_word("AND") {
            left = Cond::And(Box::new(left), Box::new(self.unary_cond()?));
        }
        Ok(left)
    }

    fn unary_cond(&mut self) -> Result<Cond, ExecutorError> {
        if self.eat_word("NOT") {
            return Ok(Cond::Not(Box::new(self.unary_cond()?)));
        }
        if self.eat_sym("(") {
            let inner = self.or_cond()?;
            self.sym(")")?;
            return Ok(inner);
        }
        if let Some(Tok::Num(left)) = self.peek().cloned() {
            self.pos += 1;
            self.sym("=")?;
            let right = self.number()?;
            return Ok(Cond::Const(left == right));
        }

        let column = self.ident()?;
        if self.eat_word("IS") {
            let negated = self.eat_word("NOT");
            return Ok(Cond::Is(column, negated, self.param()?));
        }
        if self.eat_word("LIKE") {
            return Ok(Cond::Like(column, self.param()?));
        }
        if self.eat_word("IN") {
            self.sym("(")?;
            return Ok(Cond::In(column, self.list(Self::param)?));
        }
        let op = match self.next() {
            Some(Tok::Sym(op @ ("=" | "<>" | ">" | ">=" | "<" | "<="))) => op,
            other => return Err(unexpected("comparison", other.as_ref())),
        };
        Ok(Cond::Cmp(column, op, self.param()?))
    }

    fn operand(&mut self) -> Result<Operand, ExecutorError> {
        let mut left = self.operand_term()?;
        while let Some(Tok::Sym(op @ ("+" | "-" | "*" | "/"))) = self.peek().cloned() {
            self.pos += 1;
            left = Operand::Arith(Box::new(left), op, Box::new(self.operand_term()?));
        }
        Ok(left)
    }

    fn operand_term(&mut self) -> Result<Operand, ExecutorError> {
        match self.next() {
            Some(Tok::Ident(column)) => Ok(Operand::Column(column)),
            Some(Tok::Param(name)) => Ok(Operand::Param(name)),
            Some(Tok::Sym("(")) => {
                let inner = self.operand()?;
                self.sym(")")?;
                Ok(inner)
            }
            other => Err(unexpected("operand", other.as_ref())),
        }
    }
}

fn parse(sql: &str) -> Result<Statement, ExecutorError> {
    Parser {
        tokens: tokenize(sql)?,
        pos: 0,
    }
    .statement()
}

fn param(params: &ParameterBag, name: &str) -> Result<Value, ExecutorError> {
    params
        .get(name)
        .cloned()
        .ok_or_else(|| ExecutorError::new(format!("unbound parameter {}", name)))
}

fn like_regex(pattern: &str) -> Regex {
    let mut re = String::from("^");
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    re.push_str(&regex::escape(&escaped.to_string()));
                }
            }
            '%' => re.push_str(".*"),
            '_' => re.push('.'),
            other => re.push_str(&regex::escape(&other.to_string())),
        }
    }
    re.push('$');
    Regex::new(&re).expect("LIKE pattern translates to a valid regex")
}

fn eval(cond: &Cond, row: &Row, params: &ParameterBag) -> Result<Option<bool>, ExecutorError> {
    let column = |name: &str| row.get(name).cloned().unwrap_or(Value::Null);
    Ok(match cond {
        Cond::And(a, b) => match (eval(a, row, params)?, eval(b, row, params)?) {
            (Some(false), _) | (_, Some(false)) => Some(false),
            (Some(true), Some(true)) => Some(true),
            _ => None,
        },
        Cond::Or(a, b) => match (eval(a, row, params)?, eval(b, row, params)?) {
            (Some(true), _) | (_, Some(true)) => Some(true),
            (Some(false), Some(false)) => Some(false),
            _ => None,
        },
        Cond::Not(inner) => eval(inner, row, params)?.map(|b| !b),
        Cond::Const(b) => Some(*b),
        Cond::Is(name, negated, p) => {
            let bound = param(params, p)?;
            let is = if bound.is_null() {
                column(name).is_null()
            } else {
                compare_values(&column(name), &bound) == Some(Ordering::Equal)
            };
            Some(is != *negated)
        }
        Cond::Like(name, p) => match (column(name), param(params, p)?) {
            (Value::Text(text), Value::Text(pattern)) => Some(like_regex(&pattern).is_match(&text)),
            _ => None,
        },
        Cond::In(name, ps) => {
            let value = column(name);
            if value.is_null() {
                None
            } else {
                let mut found = false;
                for p in ps {
                    found |= compare_values(&value, &param(params, p)?) == Some(Ordering::Equal);
                }
                Some(found)
            }
        }
        Cond::Cmp(name, op, p) => compare_values(&column(name), &param(params, p)?).map(|ord| {
            match *op {
                "=" => ord == Ordering::Equal,
                "<>" => ord != Ordering::Equal,
                ">" => ord == Ordering::Greater,
                ">=" => ord != Ordering::Less,
                "<" => ord == Ordering::Less,
                _ => ord != Ordering::Greater,
            }
        }),
    })
}

fn arith(op: &str, a: Value, b: Value) -> Value {
    match (a, b) {
        (Value::Int(a), Value::Int(b)) => match op {
            "+" => Value::Int(a + b),
            "-" => Value::Int(a - b),
            "*" => Value::Int(a * b),
            _ if b == 0 => Value::Null,
            _ => Value::Float(a as f64 / b as f64),
        },
        (a, b) => {
            let (Some(a), Some(b)) = (as_float(&a), as_float(&b)) else {
                return Value::Null;
            };
            Value::Float(match op {
                "+" => a + b,
                "-" => a - b,
                "*" => a * b,
                _ => a / b,
            })
        }
    }
}

fn as_float(value: &Value) -> Option<f64> {
    match value {
        Value::Int(i) => Some(*i as f64),
        Value::Float(f) => Some(*f),
        _ => None,
    }
}

fn operand_value(operand: &Operand, row: &Row, params: &ParameterBag) -> Result<Value, ExecutorError> {
    Ok(match operand {
        Operand::Column(name) => row.get(name).cloned().unwrap_or(Value::Null),
        Operand::Param(p) => param(params, p)?,
        Operand::Arith(a, op, b) => arith(
            op,
            operand_value(a, row, params)?,
            operand_value(b, row, params)?,
        ),
    })
}

#[derive(Default)]
struct Table {
    identity: Option<String>,
    rows: Vec<Row>,
}

#[derive(Default)]
struct Store {
    tables: HashMap<String, Table>,
    next_id: i64,
    last_insert_id: Option<i64>,
    statements: Vec<String>,
}

impl Store {
    fn table(&mut self, name: &str) -> Result<&mut Table, ExecutorError> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| ExecutorError::new(format!("Table '{}' doesn't exist", name)))
    }

    fn matching(
        &mut self,
        name: &str,
        filter: &Option<Cond>,
        params: &ParameterBag,
    ) -> Result<Vec<usize>, ExecutorError> {
        let table = self.table(name)?;
        let mut indexes = Vec::new();
        for (i, row) in table.rows.iter().enumerate() {
            let keep = match filter {
                Some(cond) => eval(cond, row, params)? == Some(true),
                None => true,
            };
            if keep {
                indexes.push(i);
            }
        }
        Ok(indexes)
    }

    fn run(&mut self, sql: &str, params: &ParameterBag) -> Result<Outcome, ExecutorError> {
        self.statements.push(sql.to_string());
        match parse(sql)? {
            Statement::LastInsertId => Ok(Outcome::Scalar(
                self.last_insert_id.map(Value::Int).unwrap_or(Value::Null),
            )),
            Statement::Count { table, filter } => {
                let n = self.matching(&table, &filter, params)?.len();
                Ok(Outcome::Scalar(Value::Int(n as i64)))
            }
            Statement::Select {
                fields,
                table,
                filter,
                order,
                limit,
            } => {
                let indexes = self.matching(&table, &filter, params)?;
                let source = &self.table(&table)?.rows;
                let mut rows: Vec<Row> = indexes.iter().map(|&i| source[i].clone()).collect();
                rows.sort_by(|a, b| {
                    for (column, descending) in &order {
                        let ord = compare_values(
                            a.get(column).unwrap_or(&Value::Null),
                            b.get(column).unwrap_or(&Value::Null),
                        )
                        .unwrap_or(Ordering::Equal);
                        let ord = if *descending { ord.reverse() } else { ord };
                        if ord != Ordering::Equal {
                            return ord;
                        }
                    }
                    Ordering::Equal
                });
                if let Some((offset, count)) = limit {
                    rows = rows.into_iter().skip(offset).take(count).collect();
                }
                project(rows, fields)
            }
            Statement::Insert {
                table,
                columns,
                values,
            } => {
                let mut row = Row::new();
                for (column, p) in columns.iter().zip(&values) {
                    row.insert(column.clone(), param(params, p)?);
                }
                self.next_id += 1;
                let id = self.next_id;
                let target = self.table(&table)?;
                if let Some(identity) = target.identity.clone() {
                    row.insert(identity, id);
                }
                target.rows.push(row);
                self.last_insert_id = Some(id);
                Ok(Outcome::Affected(1))
            }
            Statement::Update { table, set, filter } => {
                let indexes = self.matching(&table, &filter, params)?;
                let target = self.table(&table)?;
                for &i in &indexes {
                    let current = target.rows[i].clone();
                    for (column, operand) in &set {
                        let value = operand_value(operand, &current, params)?;
                        target.rows[i].insert(column.clone(), value);
                    }
                }
                Ok(Outcome::Affected(indexes.len() as u64))
            }
            Statement::Delete { table, filter } => {
                let indexes = self.matching(&table, &filter, params)?;
                let target = self.table(&table)?;
                let mut i = 0;
                target.rows.retain(|_| {
                    let keep = !indexes.contains(&i);
                    i += 1;
                    keep
                });
                Ok(Outcome::Affected(indexes.len() as u64))
            }
        }
    }
}

fn project(rows: Vec<Row>, fields: Option<Vec<Field>>) -> Result<Outcome, ExecutorError> {
    let Some(fields) = fields else {
        return Ok(Outcome::Rows(rows));
    };
    if let [Field::Aggregate(function, column)] = fields.as_slice() {
        let values: Vec<Value> = rows
            .iter()
            .filter_map(|r| r.get(column).cloned())
            .filter(|v| !v.is_null())
            .collect();
        return match function.as_str() {
            "MAX" => Ok(Outcome::Scalar(
                values
                    .into_iter()
                    .max_by(|a, b| compare_values(a, b).unwrap_or(Ordering::Equal))
                    .unwrap_or(Value::Null),
            )),
            "SUM" => Ok(Outcome::Scalar(
                values
                    .into_iter()
                    .reduce(|a, b| arith("+", a, b))
                    .unwrap_or(Value::Null),
            )),
            "DISTINCT" => {
                let mut distinct: Vec<Value> = Vec::new();
                for v in values {
                    if !distinct.contains(&v) {
                        distinct.push(v);
                    }
                }
                Ok(Outcome::Rows(
                    distinct
                        .into_iter()
                        .map(|v| Row::new().with(column.clone(), v))
                        .collect(),
                ))
            }
            other => Err(ExecutorError::new(format!("unknown function {}", other))),
        };
    }
    let projected = rows
        .into_iter()
        .map(|row| {
            fields
                .iter()
                .map(|f| match f {
                    Field::Column(c) => Ok((c.clone(), row.get(c).cloned().unwrap_or(Value::Null))),
                    Field::Aggregate(f, _) => {
                        Err(ExecutorError::new(format!("{} mixed with columns", f)))
                    }
                })
                .collect::<Result<Row, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Outcome::Rows(projected))
}

enum Outcome {
    Rows(Vec<Row>),
    Scalar(Value),
    Affected(u64),
}

impl Outcome {
    fn affected(self) -> Result<u64, ExecutorError> {
        match self {
            Outcome::Affected(n) => Ok(n),
            _ => Err(ExecutorError::new("statement returns rows")),
        }
    }

    fn rows(self) -> Result<Vec<Row>, ExecutorError> {
        match self {
            Outcome::Rows(rows) => Ok(rows),
            Outcome::Scalar(value) => Ok(vec![Row::new().with("value", value)]),
            Outcome::Affected(_) => Err(ExecutorError::new("statement returns no rows")),
        }
    }

    fn scalar(self) -> Result<Option<Value>, ExecutorError> {
        match self {
            Outcome::Scalar(value) => Ok(Some(value)),
            Outcome::Rows(rows) => Ok(rows
                .into_iter()
                .next()
                .and_then(|row| row.columns().next().map(|(_, v)| v.clone()))),
            Outcome::Affected(_) => Err(ExecutorError::new("statement returns no rows")),
        }
    }
}

#[derive(Clone, Default)]
pub struct MemoryExecutor {
    store: Arc<Mutex<Store>>,
}

impl MemoryExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(self, name: &str, identity: Option<&str>, rows: Vec<Row>) -> Self {
        {
            let mut store = self.store.lock().unwrap();
            store.next_id = store.next_id.max(rows.len() as i64);
            store.tables.insert(
                name.to_string(),
                Table {
                    identity: identity.map(str::to_string),
                    rows,
                },
            );
        }
        self
    }

    pub fn rows(&self, table: &str) -> Vec<Row> {
        self.store
            .lock()
            .unwrap()
            .tables
            .get(table)
            .map(|t| t.rows.clone())
            .unwrap_or_default()
    }

    pub fn statements(&self) -> Vec<String> {
        self.store.lock().unwrap().statements.clone()
    }

    fn run(&self, sql: &str, params: &ParameterBag) -> Result<Outcome, ExecutorError> {
        self.store.lock().unwrap().run(sql, params)
    }
}

#[async_trait]
impl SqlExecutor for MemoryExecutor {
    async fn execute(&self, sql: &str, params: &ParameterBag) -> Result<u64, ExecutorError> {
        self.run(sql, params)?.affected()
    }

    async fn query(&self, sql: &str, params: &ParameterBag) -> Result<Vec<Row>, ExecutorError> {
        self.run(sql, params)?.rows()
    }

    async fn query_scalar(
        &self,
        sql: &str,
        params: &ParameterBag,
    ) -> Result<Option<Value>, ExecutorError> {
        self.run(sql, params)?.scalar()
    }

    async fn connect(&self) -> Result<Box<dyn Connection>, ExecutorError> {
        Ok(Box::new(MemoryConnection {
            executor: self.clone(),
        }))
    }
}

struct MemoryConnection {
    executor: MemoryExecutor,
}

#[async_trait]
impl Connection for MemoryConnection {
    async fn execute(&mut self, sql: &str, params: &ParameterBag) -> Result<u64, ExecutorError> {
        self.executor.run(sql, params)?.affected()
    }

    async fn query_scalar(
        &mut self,
        sql: &str,
        params: &ParameterBag,
    ) -> Result<Option<Value>, ExecutorError> {
        self.executor.run(sql, params)?.scalar()
    }
}
