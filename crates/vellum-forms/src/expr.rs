//! Predicate language for custom validation rules
//!
//! Custom rules are small boolean expressions over the field's own value and
//! the other values of the form. They are parsed into an [`Expr`] tree and
//! evaluated without access to anything outside the form.
//!
//! ```text
//! or         := and ("||" and)*
//! and        := unary ("&&" unary)*
//! unary      := "!" unary | comparison
//! comparison := operand (op operand)?
//! op         := "==" | "!=" | "<" | "<=" | ">" | ">=" | "in" | "not in"
//! operand    := number | string | true | false | null | "[" list "]"
//!             | value | value.length | fields.<id> | fields.<id>.length
//!             | "(" or ")"
//! ```

use crate::state::FormState;
use nom::{
	IResult, Parser,
	branch::alt,
	bytes::complete::{tag, take_while},
	character::complete::{alpha1, alphanumeric1, char, digit1, multispace0, multispace1, satisfy},
	combinator::{all_consuming, map, map_opt, not, opt, recognize, value},
	multi::{fold_many0, many0, many0_count, separated_list0},
	sequence::{delimited, pair, preceded, terminated},
};
use serde_json::{Number, Value};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
	#[error("Parse error at position {position}: {message}")]
	Parse { position: usize, message: String },

	#[error("Type error: {0}")]
	Type(String),
}

pub type ExpressionResult<T> = Result<T, ExpressionError>;

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
	Eq,
	Ne,
	Lt,
	Le,
	Gt,
	Ge,
	In,
	NotIn,
}

/// Parsed predicate expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
	Literal(Value),
	List(Vec<Expr>),
	/// The value of the field being validated
	Value,
	/// Length of the field's value
	ValueLength,
	/// Value of another field, by api id
	Field(String),
	FieldLength(String),
	Not(Box<Expr>),
	And(Box<Expr>, Box<Expr>),
	Or(Box<Expr>, Box<Expr>),
	Compare {
		op: CompareOp,
		lhs: Box<Expr>,
		rhs: Box<Expr>,
	},
}

/// Values an expression can read.
#[derive(Debug, Clone, Copy)]
pub struct EvalContext<'a> {
	pub value: &'a Value,
	pub fields: &'a FormState,
}

impl<'a> EvalContext<'a> {
	pub fn new(value: &'a Value, fields: &'a FormState) -> Self {
		Self { value, fields }
	}
}

// ============================================================================
// Nom Parsers
// ============================================================================

type ParseError<'a> = nom::error::Error<&'a str>;

fn ws<'a, O, F>(inner: F) -> impl Parser<&'a str, Output = O, Error = ParseError<'a>>
where
	F: Parser<&'a str, Output = O, Error = ParseError<'a>>,
{
	delimited(multispace0, inner, multispace0)
}

fn is_ident_char(c: char) -> bool {
	c.is_alphanumeric() || c == '_'
}

/// A reserved word not followed by an identifier character.
fn keyword<'a>(word: &'static str) -> impl Parser<&'a str, Output = &'a str, Error = ParseError<'a>> {
	terminated(tag(word), not(satisfy(is_ident_char)))
}

fn identifier(input: &str) -> IResult<&str, &str> {
	recognize(pair(
		alt((alpha1, tag("_"))),
		many0_count(alt((alphanumeric1, tag("_")))),
	))
	.parse(input)
}

fn number_literal(input: &str) -> IResult<&str, Expr> {
	map_opt(
		recognize((opt(char('-')), digit1, opt(pair(char('.'), digit1)))),
		|text: &str| {
			let number = match text.parse::<i64>() {
				Ok(n) => Number::from(n),
				Err(_) => Number::from_f64(text.parse::<f64>().ok()?)?,
			};
			Some(Expr::Literal(Value::Number(number)))
		},
	)
	.parse(input)
}

fn string_literal(input: &str) -> IResult<&str, Expr> {
	map(
		alt((
			delimited(char('"'), take_while(|c| c != '"'), char('"')),
			delimited(char('\''), take_while(|c| c != '\''), char('\'')),
		)),
		|s: &str| Expr::Literal(Value::String(s.to_string())),
	)
	.parse(input)
}

fn keyword_literal(input: &str) -> IResult<&str, Expr> {
	alt((
		value(Expr::Literal(Value::Bool(true)), keyword("true")),
		value(Expr::Literal(Value::Bool(false)), keyword("false")),
		value(Expr::Literal(Value::Null), keyword("null")),
	))
	.parse(input)
}

fn list_literal(input: &str) -> IResult<&str, Expr> {
	map(
		delimited(
			ws(char('[')),
			separated_list0(ws(char(',')), or_expr),
			ws(char(']')),
		),
		Expr::List,
	)
	.parse(input)
}

/// `value`, `value.length`, `fields.<id>` or `fields.<id>.length`
fn path(input: &str) -> IResult<&str, Expr> {
	map_opt(
		pair(identifier, many0(preceded(char('.'), identifier))),
		|(root, rest): (&str, Vec<&str>)| match (root, rest.as_slice()) {
			("value", []) => Some(Expr::Value),
			("value", ["length"]) => Some(Expr::ValueLength),
			("fields", [id]) => Some(Expr::Field(id.to_string())),
			("fields", [id, "length"]) => Some(Expr::FieldLength(id.to_string())),
			_ => None,
		},
	)
	.parse(input)
}

fn parenthesized(input: &str) -> IResult<&str, Expr> {
	delimited(ws(char('(')), or_expr, ws(char(')'))).parse(input)
}

fn operand(input: &str) -> IResult<&str, Expr> {
	ws(alt((
		parenthesized,
		list_literal,
		number_literal,
		string_literal,
		keyword_literal,
		path,
	)))
	.parse(input)
}

fn compare_op(input: &str) -> IResult<&str, CompareOp> {
	ws(alt((
		value(CompareOp::Eq, tag("==")),
		value(CompareOp::Ne, tag("!=")),
		value(CompareOp::Le, tag("<=")),
		value(CompareOp::Ge, tag(">=")),
		value(CompareOp::Lt, tag("<")),
		value(CompareOp::Gt, tag(">")),
		value(CompareOp::NotIn, (keyword("not"), multispace1, keyword("in"))),
		value(CompareOp::In, keyword("in")),
	)))
	.parse(input)
}

fn comparison(input: &str) -> IResult<&str, Expr> {
	map(
		pair(operand, opt(pair(compare_op, operand))),
		|(lhs, rhs)| match rhs {
			Some((op, rhs)) => Expr::Compare {
				op,
				lhs: Box::new(lhs),
				rhs: Box::new(rhs),
			},
			None => lhs,
		},
	)
	.parse(input)
}

fn unary(input: &str) -> IResult<&str, Expr> {
	alt((
		map(preceded(ws(char('!')), unary), |e| Expr::Not(Box::new(e))),
		comparison,
	))
	.parse(input)
}

fn and_expr(input: &str) -> IResult<&str, Expr> {
	let (input, first) = unary(input)?;
	fold_many0(
		preceded(ws(tag("&&")), unary),
		move || first.clone(),
		|acc, next| Expr::And(Box::new(acc), Box::new(next)),
	)
	.parse(input)
}

fn or_expr(input: &str) -> IResult<&str, Expr> {
	let (input, first) = and_expr(input)?;
	fold_many0(
		preceded(ws(tag("||")), and_expr),
		move || first.clone(),
		|acc, next| Expr::Or(Box::new(acc), Box::new(next)),
	)
	.parse(input)
}

/// Deepest grouping or negation nesting a predicate may use.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Longest predicate source accepted, in bytes.
pub const MAX_SOURCE_LEN: usize = 4096;

/// Rejects sources the recursive parser and evaluator cannot handle within a
/// bounded stack. Brackets and parentheses open a level; each `!` adds one
/// until the operand it applies to ends at `&&`, `||`, `,` or a closing
/// bracket.
fn check_limits(source: &str) -> ExpressionResult<()> {
	if source.len() > MAX_SOURCE_LEN {
		return Err(ExpressionError::Parse {
			position: MAX_SOURCE_LEN,
			message: format!("expression longer than {MAX_SOURCE_LEN} bytes"),
		});
	}

	// Negations pending in each open group.
	let mut groups: Vec<usize> = vec![0];
	let mut quote: Option<char> = None;
	let mut chars = source.char_indices().peekable();
	while let Some((position, c)) = chars.next() {
		if let Some(q) = quote {
			if c == q {
				quote = None;
			}
			continue;
		}
		match c {
			'"' | '\'' => quote = Some(c),
			'(' | '[' => groups.push(0),
			')' | ']' => {
				if groups.len() > 1 {
					groups.pop();
				}
			}
			'!' if chars.peek().is_none_or(|(_, next)| *next != '=') => {
				if let Some(pending) = groups.last_mut() {
					*pending += 1;
				}
			}
			',' => {
				if let Some(pending) = groups.last_mut() {
					*pending = 0;
				}
			}
			'&' | '|' if chars.peek().is_some_and(|(_, next)| *next == c) => {
				chars.next();
				if let Some(pending) = groups.last_mut() {
					*pending = 0;
				}
			}
			_ => {}
		}
		let depth = groups.len() - 1 + groups.iter().sum::<usize>();
		if depth > MAX_NESTING_DEPTH {
			return Err(ExpressionError::Parse {
				position,
				message: format!("expression nested deeper than {MAX_NESTING_DEPTH} levels"),
			});
		}
	}
	Ok(())
}

/// Parses a predicate.
///
/// # Examples
///
/// ```
/// use vellum_forms::expr::{CompareOp, Expr, parse};
/// use serde_json::json;
///
/// let expr = parse("value.length >= 8").unwrap();
/// assert_eq!(
///     expr,
///     Expr::Compare {
///         op: CompareOp::Ge,
///         lhs: Box::new(Expr::ValueLength),
///         rhs: Box::new(Expr::Literal(json!(8))),
///     }
/// );
///
/// assert!(parse("value >").is_err());
/// ```
pub fn parse(source: &str) -> ExpressionResult<Expr> {
	check_limits(source)?;
	match all_consuming(ws(or_expr)).parse(source) {
		Ok((_, expr)) => Ok(expr),
		Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
			let position = source.len() - e.input.len();
			let message = if e.input.is_empty() {
				"unexpected end of expression".to_string()
			} else {
				format!("unexpected input '{}'", e.input.chars().take(16).collect::<String>())
			};
			Err(ExpressionError::Parse { position, message })
		}
		Err(nom::Err::Incomplete(_)) => Err(ExpressionError::Parse {
			position: source.len(),
			message: "incomplete expression".to_string(),
		}),
	}
}

// ============================================================================
// Evaluation
// ============================================================================

/// Truthiness of a value: `null`, `false`, `0`, `""`, `[]` and `{}` are false.
pub fn truthy(value: &Value) -> bool {
	match value {
		Value::Null => false,
		Value::Bool(b) => *b,
		Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
		Value::String(s) => !s.is_empty(),
		Value::Array(items) => !items.is_empty(),
		Value::Object(map) => !map.is_empty(),
	}
}

fn length_of(value: &Value) -> ExpressionResult<Value> {
	let len = match value {
		Value::Null => 0,
		Value::String(s) => s.chars().count(),
		Value::Array(items) => items.len(),
		Value::Object(map) => map.len(),
		other => {
			return Err(ExpressionError::Type(format!(
				"cannot take the length of {}",
				type_name(other)
			)));
		}
	};
	Ok(Value::from(len))
}

fn type_name(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "a list",
		Value::Object(_) => "an object",
	}
}

fn loosely_equal(a: &Value, b: &Value) -> bool {
	match (a, b) {
		(Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
		_ => a == b,
	}
}

fn contains(haystack: &Value, needle: &Value) -> ExpressionResult<bool> {
	match (haystack, needle) {
		(Value::Array(items), _) => Ok(items.iter().any(|item| loosely_equal(item, needle))),
		(Value::String(text), Value::String(part)) => Ok(text.contains(part.as_str())),
		(Value::Object(map), Value::String(key)) => Ok(map.contains_key(key)),
		(other, _) => Err(ExpressionError::Type(format!(
			"cannot test membership in {}",
			type_name(other)
		))),
	}
}

fn order(op: CompareOp, lhs: &Value, rhs: &Value) -> ExpressionResult<bool> {
	let (Some(a), Some(b)) = (lhs.as_f64(), rhs.as_f64()) else {
		return Err(ExpressionError::Type(format!(
			"cannot order {} and {}",
			type_name(lhs),
			type_name(rhs)
		)));
	};
	Ok(match op {
		CompareOp::Lt => a < b,
		CompareOp::Le => a <= b,
		CompareOp::Gt => a > b,
		_ => a >= b,
	})
}

impl Expr {
	/// Evaluates the expression to a JSON value.
	pub fn eval(&self, ctx: &EvalContext<'_>) -> ExpressionResult<Value> {
		match self {
			Expr::Literal(v) => Ok(v.clone()),
			Expr::List(items) => items
				.iter()
				.map(|item| item.eval(ctx))
				.collect::<ExpressionResult<Vec<_>>>()
				.map(Value::Array),
			Expr::Value => Ok(ctx.value.clone()),
			Expr::ValueLength => length_of(ctx.value),
			Expr::Field(id) => Ok(ctx.fields.get(id).cloned().unwrap_or(Value::Null)),
			Expr::FieldLength(id) => length_of(ctx.fields.get(id).unwrap_or(&Value::Null)),
			Expr::Not(inner) => Ok(Value::Bool(!truthy(&inner.eval(ctx)?))),
			Expr::And(lhs, rhs) => {
				let result = truthy(&lhs.eval(ctx)?) && truthy(&rhs.eval(ctx)?);
				Ok(Value::Bool(result))
			}
			Expr::Or(lhs, rhs) => {
				let result = truthy(&lhs.eval(ctx)?) || truthy(&rhs.eval(ctx)?);
				Ok(Value::Bool(result))
			}
			Expr::Compare { op, lhs, rhs } => {
				let lhs = lhs.eval(ctx)?;
				let rhs = rhs.eval(ctx)?;
				let result = match op {
					CompareOp::Eq => loosely_equal(&lhs, &rhs),
					CompareOp::Ne => !loosely_equal(&lhs, &rhs),
					CompareOp::In => contains(&rhs, &lhs)?,
					CompareOp::NotIn => !contains(&rhs, &lhs)?,
					CompareOp::Lt | CompareOp::Le | CompareOp::Gt | CompareOp::Ge => {
						order(*op, &lhs, &rhs)?
					}
				};
				Ok(Value::Bool(result))
			}
		}
	}

	/// Evaluates the expression and reduces the result to a boolean.
	pub fn test(&self, ctx: &EvalContext<'_>) -> ExpressionResult<bool> {
		self.eval(ctx).map(|v| truthy(&v))
	}
}

/// Parses and evaluates `source` in one step.
///
/// # Examples
///
/// ```
/// use vellum_forms::{EvalContext, FormState};
/// use vellum_forms::expr::evaluate;
/// use serde_json::json;
///
/// let state: FormState = [("plan".to_string(), json!("pro"))].into_iter().collect();
/// let value = json!(12);
/// let ctx = EvalContext::new(&value, &state);
///
/// assert_eq!(evaluate("value > 10 && fields.plan in ['pro', 'team']", &ctx), Ok(true));
/// assert!(evaluate("value < 'ten'", &ctx).is_err());
/// ```
pub fn evaluate(source: &str, ctx: &EvalContext<'_>) -> ExpressionResult<bool> {
	parse(source)?.test(ctx)
}
