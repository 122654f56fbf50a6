//! Predicate expressions over document fields.
//!
//! # Responsibility
//! - Describe filters as a typed expression tree.
//! - Compile filters and ordering keys to parameterized SQL fragments.
//!
//! # Invariants
//! - Field paths are validated before they reach SQL; values are always bound.
//! - The path `id` addresses the primary key column, not the JSON body.

use crate::store::{StoreError, StoreResult};
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::types::Value as SqlValue;
use serde_json::Value;

static FIELD_PATH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$")
        .expect("valid field path regex")
});

const ID_FIELD: &str = "id";

/// Comparison applied between a field and a bound value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CompareOp {
    fn sql(self) -> &'static str {
        match self {
            // `IS` keeps equality null-safe.
            Self::Eq => "IS",
            Self::Ne => "IS NOT",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
        }
    }

    fn is_ordering(self) -> bool {
        !matches!(self, Self::Eq | Self::Ne)
    }
}

/// Filter evaluated per document to decide inclusion in a result set.
///
/// ```
/// use litecrud_core::Filter;
///
/// let affordable_keyboards = Filter::contains("name", "Keyboard").and(Filter::lte("price", 300));
/// # let _ = affordable_keyboards;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Compare {
        field: String,
        op: CompareOp,
        value: Value,
    },
    /// Substring match on a text field.
    Contains { field: String, needle: String },
    IsNull { field: String },
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Box<Filter>),
}

impl Filter {
    pub fn compare(field: impl Into<String>, op: CompareOp, value: impl Into<Value>) -> Self {
        Self::Compare {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Eq, value)
    }

    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Ne, value)
    }

    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Gt, value)
    }

    pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Gte, value)
    }

    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Lt, value)
    }

    pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Lte, value)
    }

    pub fn contains(field: impl Into<String>, needle: impl Into<String>) -> Self {
        Self::Contains {
            field: field.into(),
            needle: needle.into(),
        }
    }

    pub fn is_null(field: impl Into<String>) -> Self {
        Self::IsNull {
            field: field.into(),
        }
    }

    /// Combines two filters; nested `And` groups are flattened.
    pub fn and(self, other: Filter) -> Self {
        match self {
            Self::And(mut parts) => {
                parts.push(other);
                Self::And(parts)
            }
            first => Self::And(vec![first, other]),
        }
    }

    /// Combines two filters; nested `Or` groups are flattened.
    pub fn or(self, other: Filter) -> Self {
        match self {
            Self::Or(mut parts) => {
                parts.push(other);
                Self::Or(parts)
            }
            first => Self::Or(vec![first, other]),
        }
    }

    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Appends this filter as a SQL boolean expression to `sql`.
    pub(crate) fn write_sql(&self, sql: &mut String, binds: &mut Vec<SqlValue>) -> StoreResult<()> {
        match self {
            Self::Compare { field, op, value } => {
                let bound = scalar_to_sql(field, value)?;
                if op.is_ordering() && bound == SqlValue::Null {
                    return Err(StoreError::InvalidExpression(format!(
                        "field `{field}` cannot be compared with null using `{}`",
                        op.sql()
                    )));
                }
                write_field(sql, binds, field)?;
                sql.push(' ');
                sql.push_str(op.sql());
                sql.push_str(" ?");
                binds.push(bound);
            }
            Self::Contains { field, needle } => {
                sql.push_str("instr(");
                write_field(sql, binds, field)?;
                sql.push_str(", ?) > 0");
                binds.push(SqlValue::Text(needle.clone()));
            }
            Self::IsNull { field } => {
                write_field(sql, binds, field)?;
                sql.push_str(" IS NULL");
            }
            Self::And(parts) => write_group(sql, binds, parts, " AND ", "1 = 1")?,
            Self::Or(parts) => write_group(sql, binds, parts, " OR ", "0 = 1")?,
            Self::Not(inner) => {
                sql.push_str("NOT (");
                inner.write_sql(sql, binds)?;
                sql.push(')');
            }
        }
        Ok(())
    }
}

/// Appends the SQL expression selecting `field` from a document row.
pub(crate) fn write_field(
    sql: &mut String,
    binds: &mut Vec<SqlValue>,
    field: &str,
) -> StoreResult<()> {
    if !FIELD_PATH_RE.is_match(field) {
        return Err(StoreError::InvalidExpression(format!(
            "invalid field path `{field}`"
        )));
    }

    if field == ID_FIELD {
        sql.push_str("id");
    } else {
        sql.push_str("json_extract(body, ?)");
        binds.push(SqlValue::Text(format!("$.{field}")));
    }
    Ok(())
}

fn write_group(
    sql: &mut String,
    binds: &mut Vec<SqlValue>,
    parts: &[Filter],
    separator: &str,
    empty: &str,
) -> StoreResult<()> {
    if parts.is_empty() {
        sql.push_str(empty);
        return Ok(());
    }

    sql.push('(');
    for (index, part) in parts.iter().enumerate() {
        if index > 0 {
            sql.push_str(separator);
        }
        part.write_sql(sql, binds)?;
    }
    sql.push(')');
    Ok(())
}

fn scalar_to_sql(field: &str, value: &Value) -> StoreResult<SqlValue> {
    match value {
        Value::Null => Ok(SqlValue::Null),
        // json_extract yields 0/1 for JSON booleans.
        Value::Bool(flag) => Ok(SqlValue::Integer(i64::from(*flag))),
        Value::Number(number) => match (number.as_i64(), number.as_f64()) {
            (Some(integer), _) => Ok(SqlValue::Integer(integer)),
            (None, Some(real)) => Ok(SqlValue::Real(real)),
            (None, None) => Err(StoreError::InvalidExpression(format!(
                "number `{number}` for field `{field}` is out of range"
            ))),
        },
        Value::String(text) => Ok(SqlValue::Text(text.clone())),
        Value::Array(_) | Value::Object(_) => Err(StoreError::InvalidExpression(format!(
            "field `{field}` can only be compared with scalar values"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::{CompareOp, Filter};
    use crate::store::StoreError;
    use rusqlite::types::Value as SqlValue;
    use serde_json::json;

    fn compile(filter: &Filter) -> (String, Vec<SqlValue>) {
        let mut sql = String::new();
        let mut binds = Vec::new();
        filter
            .write_sql(&mut sql, &mut binds)
            .expect("filter should compile");
        (sql, binds)
    }

    #[test]
    fn comparison_binds_path_and_value() {
        let (sql, binds) = compile(&Filter::gt("price", 100));
        assert_eq!(sql, "json_extract(body, ?) > ?");
        assert_eq!(
            binds,
            vec![SqlValue::Text("$.price".to_string()), SqlValue::Integer(100)]
        );
    }

    #[test]
    fn id_field_targets_primary_key_column() {
        let (sql, binds) = compile(&Filter::compare("id", CompareOp::Lte, 3));
        assert_eq!(sql, "id <= ?");
        assert_eq!(binds, vec![SqlValue::Integer(3)]);
    }

    #[test]
    fn combinators_flatten_and_nest() {
        let filter = Filter::gte("price", 10.5)
            .and(Filter::contains("name", "pad"))
            .and(Filter::is_null("deleted_at").negate());
        let (sql, binds) = compile(&filter);
        assert_eq!(
            sql,
            "(json_extract(body, ?) >= ? AND instr(json_extract(body, ?), ?) > 0 AND NOT (json_extract(body, ?) IS NULL))"
        );
        assert_eq!(binds.len(), 5);
        assert_eq!(binds[1], SqlValue::Real(10.5));
    }

    #[test]
    fn empty_groups_compile_to_constants() {
        assert_eq!(compile(&Filter::And(Vec::new())).0, "1 = 1");
        assert_eq!(compile(&Filter::Or(Vec::new())).0, "0 = 1");
    }

    #[test]
    fn booleans_and_nulls_use_null_safe_equality() {
        let (sql, binds) = compile(&Filter::eq("active", true).or(Filter::ne("note", json!(null))));
        assert_eq!(sql, "(json_extract(body, ?) IS ? OR json_extract(body, ?) IS NOT ?)");
        assert_eq!(binds[1], SqlValue::Integer(1));
        assert_eq!(binds[3], SqlValue::Null);
    }

    #[test]
    fn rejects_malformed_expressions() {
        let mut sql = String::new();
        let mut binds = Vec::new();

        let bad_path = Filter::eq("price'); DROP TABLE documents; --", 1);
        assert!(matches!(
            bad_path.write_sql(&mut sql, &mut binds),
            Err(StoreError::InvalidExpression(_))
        ));

        let array_value = Filter::eq("tags", json!(["a"]));
        assert!(matches!(
            array_value.write_sql(&mut sql, &mut binds),
            Err(StoreError::InvalidExpression(_))
        ));

        let null_ordering = Filter::gt("price", json!(null));
        assert!(matches!(
            null_ordering.write_sql(&mut sql, &mut binds),
            Err(StoreError::InvalidExpression(_))
        ));
    }
}
