//! Query model shared by every data store.
//!
//! A [`Query`] describes a read the way the backend's query builder does:
//! a projection, equality/membership filters, a case-insensitive pattern
//! match across several columns, an ordering and a limit. [`Query::to_params`]
//! renders it into PostgREST query parameters.

use serde::Serialize;

use super::Table;

/// A single filter predicate. Filters in one query are ANDed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Filter {
    /// `column = value`
    Eq { column: String, value: String },
    /// `column IN (values)`
    In { column: String, values: Vec<String> },
    /// Any of `columns` contains `term`, case-insensitively
    AnyContains { columns: Vec<String>, term: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Query {
    pub table: Table,
    pub columns: Vec<String>,
    pub filters: Vec<Filter>,
    pub order: Option<Order>,
    pub limit: Option<usize>,
}

impl Query {
    /// Start a query selecting every column of `table`.
    pub fn from(table: Table) -> Self {
        Self {
            table,
            columns: Vec::new(),
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    /// Restrict the projection. Accepts a comma-separated column list.
    pub fn select(mut self, columns: &str) -> Self {
        self.columns = columns
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty() && *c != "*")
            .map(String::from)
            .collect();
        self
    }

    pub fn eq(mut self, column: &str, value: impl Into<String>) -> Self {
        self.filters.push(Filter::Eq {
            column: column.to_string(),
            value: value.into(),
        });
        self
    }

    pub fn in_list<I, S>(mut self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters.push(Filter::In {
            column: column.to_string(),
            values: values.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Case-insensitive substring match on any of `columns`.
    pub fn any_contains(mut self, columns: &[&str], term: impl Into<String>) -> Self {
        self.filters.push(Filter::AnyContains {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            term: term.into(),
        });
        self
    }

    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        self.order = Some(Order {
            column: column.to_string(),
            ascending,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Value of the first equality filter on `column`, if any.
    pub fn eq_value(&self, column: &str) -> Option<&str> {
        self.filters.iter().find_map(|f| match f {
            Filter::Eq { column: c, value } if c == column => Some(value.as_str()),
            _ => None,
        })
    }

    /// Render as PostgREST query parameters.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();

        let select = if self.columns.is_empty() {
            "*".to_string()
        } else {
            self.columns.join(",")
        };
        params.push(("select".to_string(), select));

        for filter in &self.filters {
            match filter {
                Filter::Eq { column, value } => {
                    params.push((column.clone(), format!("eq.{value}")));
                }
                Filter::In { column, values } => {
                    let list: Vec<String> = values.iter().map(|v| quote_value(v)).collect();
                    params.push((column.clone(), format!("in.({})", list.join(","))));
                }
                Filter::AnyContains { columns, term } => {
                    let pattern = quote_value(&format!("*{term}*"));
                    let branches: Vec<String> = columns
                        .iter()
                        .map(|c| format!("{c}.ilike.{pattern}"))
                        .collect();
                    params.push(("or".to_string(), format!("({})", branches.join(","))));
                }
            }
        }

        if let Some(order) = &self.order {
            let direction = if order.ascending { "asc" } else { "desc" };
            params.push(("order".to_string(), format!("{}.{direction}", order.column)));
        }

        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }

        params
    }

    /// Params joined as a query string (unencoded), for logs and tests.
    pub fn to_query_string(&self) -> String {
        self.to_params()
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Quote a value for use inside a PostgREST list or logic tree when it
/// contains reserved characters.
fn quote_value(value: &str) -> String {
    let reserved = value
        .chars()
        .any(|c| matches!(c, ',' | '(' | ')' | '"' | '\\' | ':'));
    if !reserved {
        return value.to_string();
    }
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}
