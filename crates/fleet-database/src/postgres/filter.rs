//! Translation of [`FilterField`] lists into SQL `WHERE` clauses.

use sqlx::{Postgres, QueryBuilder};

use fleet_core::error::AppError;
use fleet_core::result::AppResult;
use fleet_core::types::{FilterField, FilterOp, FilterValue};

/// Append `WHERE ... AND ...` for `filters` to `builder`.
///
/// Column names must appear in `allowed`; values are always bound.
/// Text comparisons cast the column to `text` so enum columns compare
/// against bound strings.
pub(crate) fn push_filters(
    builder: &mut QueryBuilder<'_, Postgres>,
    filters: &[FilterField],
    allowed: &[&str],
) -> AppResult<()> {
    for (index, filter) in filters.iter().enumerate() {
        let column = allowed
            .iter()
            .find(|c| **c == filter.field)
            .ok_or_else(|| AppError::validation(format!("Unknown filter field '{}'", filter.field)))?;

        builder.push(if index == 0 { " WHERE " } else { " AND " });

        match (filter.op, &filter.value) {
            (FilterOp::IsNull, _) | (FilterOp::Eq, FilterValue::Null) => {
                builder.push(*column).push(" IS NULL");
            }
            (FilterOp::IsNotNull, _) | (FilterOp::Ne, FilterValue::Null) => {
                builder.push(*column).push(" IS NOT NULL");
            }
            (FilterOp::In, FilterValue::StringList(values)) => {
                builder
                    .push(*column)
                    .push("::text = ANY(")
                    .push_bind(values.clone())
                    .push(")");
            }
            (op, FilterValue::String(value)) => {
                builder
                    .push(*column)
                    .push("::text ")
                    .push(sql_operator(op)?)
                    .push(" ")
                    .push_bind(value.clone());
            }
            (op, FilterValue::Integer(value)) if !is_pattern(op) => {
                builder
                    .push(*column)
                    .push(" ")
                    .push(sql_operator(op)?)
                    .push(" ")
                    .push_bind(*value);
            }
            (op @ (FilterOp::Eq | FilterOp::Ne), FilterValue::Boolean(value)) => {
                builder
                    .push(*column)
                    .push(" ")
                    .push(sql_operator(op)?)
                    .push(" ")
                    .push_bind(*value);
            }
            (op, value) => {
                return Err(AppError::validation(format!(
                    "Operator {op:?} cannot be applied to {value:?} on '{}'",
                    filter.field
                )));
            }
        }
    }
    Ok(())
}

fn is_pattern(op: FilterOp) -> bool {
    matches!(op, FilterOp::Like | FilterOp::ILike)
}

fn sql_operator(op: FilterOp) -> AppResult<&'static str> {
    Ok(match op {
        FilterOp::Eq => "=",
        FilterOp::Ne => "<>",
        FilterOp::Gt => ">",
        FilterOp::Gte => ">=",
        FilterOp::Lt => "<",
        FilterOp::Lte => "<=",
        FilterOp::Like => "LIKE",
        FilterOp::ILike => "ILIKE",
        FilterOp::In | FilterOp::IsNull | FilterOp::IsNotNull => {
            return Err(AppError::validation(format!("Operator {op:?} needs a list or no value")));
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(filters: &[FilterField]) -> AppResult<String> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM vehicles");
        push_filters(&mut builder, filters, &["id", "name", "brand", "year"])?;
        Ok(builder.sql().to_string())
    }

    #[test]
    fn test_renders_bound_conditions() {
        let sql = render(&[
            FilterField::contains("brand", "hon"),
            FilterField::new("year", FilterOp::Gte, FilterValue::Integer(2000)),
        ])
        .unwrap();
        assert_eq!(
            sql,
            "SELECT * FROM vehicles WHERE brand::text ILIKE $1 AND year >= $2"
        );
    }

    #[test]
    fn test_rejects_unknown_column() {
        let err = render(&[FilterField::eq("password_hash", "x")]).unwrap_err();
        assert_eq!(err.kind, fleet_core::error::ErrorKind::Validation);
    }

    #[test]
    fn test_null_checks() {
        let sql = render(&[FilterField::new("name", FilterOp::IsNull, FilterValue::Null)]).unwrap();
        assert!(sql.ends_with("WHERE name IS NULL"));
    }
}
