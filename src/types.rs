//! Typed request vocabulary shared by the domain clients.

use serde_json::{json, Value};

/// Comparison operator for a row filter condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Like,
}

impl Operator {
    /// Wire representation of the operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Like => "LIKE",
        }
    }
}

/// One row filter condition.
///
/// Transmitted as a `["column", "operator", "value"]` triple inside the
/// `filter` query parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: String,
    pub operator: Operator,
    pub value: String,
}

impl Condition {
    pub fn new(column: impl Into<String>, operator: Operator, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            operator,
            value: value.into(),
        }
    }

    fn to_wire(&self) -> Value {
        json!([self.column, self.operator.as_str(), self.value])
    }
}

/// Serialize a condition list into the `filter` parameter value.
pub(crate) fn conditions_to_wire(conditions: &[Condition]) -> String {
    Value::Array(conditions.iter().map(Condition::to_wire).collect()).to_string()
}

/// Sort direction for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// One sort key, transmitted as a `["column", "ASC"]` pair under the
/// `order` parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Sorting {
    pub column: String,
    pub direction: SortDirection,
}

impl Sorting {
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }

    fn to_wire(&self) -> Value {
        json!([self.column, self.direction.as_str()])
    }
}

/// Paging and ordering options for read operations.
///
/// Unset fields transmit as empty strings, which the backend treats as
/// "no ordering" and "no paging window".
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    pub sort: Vec<Sorting>,
    pub start: Option<u64>,
    pub limit: Option<u64>,
}

impl QueryOptions {
    pub(crate) fn order_wire(&self) -> String {
        if self.sort.is_empty() {
            String::new()
        } else {
            Value::Array(self.sort.iter().map(Sorting::to_wire).collect()).to_string()
        }
    }

    pub(crate) fn start_wire(&self) -> String {
        self.start.map(|v| v.to_string()).unwrap_or_default()
    }

    pub(crate) fn limit_wire(&self) -> String {
        self.limit.map(|v| v.to_string()).unwrap_or_default()
    }
}

/// Optional protection settings for a share link.
///
/// Unset fields transmit as empty strings.
#[derive(Debug, Clone, Default)]
pub struct ShareLinkOptions {
    /// Password the link consumer must present.
    pub password: Option<String>,
    /// Expiry timestamp (backend-defined format).
    pub expires: Option<String>,
    /// Custom alias replacing the generated link id.
    pub alias: Option<String>,
}

/// One file for a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// File name reported to the backend.
    pub file_name: String,
    /// Raw file content.
    pub content: Vec<u8>,
    /// MIME type; the backend sniffs the content when absent.
    pub content_type: Option<String>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content,
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Join row ids into the comma-separated wire form used by share links.
pub(crate) fn rows_to_wire(rows: &[u64]) -> String {
    rows.iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_wire_form() {
        let conditions = vec![
            Condition::new("name", Operator::Eq, "Test"),
            Condition::new("age", Operator::Ge, "18"),
        ];
        assert_eq!(
            conditions_to_wire(&conditions),
            r#"[["name","=","Test"],["age",">=","18"]]"#
        );
    }

    #[test]
    fn test_operator_wire_strings() {
        assert_eq!(Operator::Eq.as_str(), "=");
        assert_eq!(Operator::Ne.as_str(), "!=");
        assert_eq!(Operator::Like.as_str(), "LIKE");
    }

    #[test]
    fn test_query_options_defaults_to_empty_strings() {
        let options = QueryOptions::default();
        assert_eq!(options.order_wire(), "");
        assert_eq!(options.start_wire(), "");
        assert_eq!(options.limit_wire(), "");
    }

    #[test]
    fn test_query_options_wire_forms() {
        let options = QueryOptions {
            sort: vec![Sorting::new("created", SortDirection::Desc)],
            start: Some(10),
            limit: Some(25),
        };
        assert_eq!(options.order_wire(), r#"[["created","DESC"]]"#);
        assert_eq!(options.start_wire(), "10");
        assert_eq!(options.limit_wire(), "25");
    }

    #[test]
    fn test_rows_to_wire() {
        assert_eq!(rows_to_wire(&[1, 2, 3]), "1,2,3");
        assert_eq!(rows_to_wire(&[42]), "42");
        assert_eq!(rows_to_wire(&[]), "");
    }
}
