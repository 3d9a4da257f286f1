//! Statically declared request parameters and URI construction.
//!
//! Every request type implements [`ApiRequest`] and declares, field by
//! field, whether a value is a path segment, a query parameter or a filter
//! clause. [`build_uri`] turns those declarations and a path template into a
//! fully qualified URL without performing any I/O.
//!
//! # Example
//!
//! ```
//! use cloudfoundry_rs::client::{build_uri, ApiRequest, Parameters};
//! use url::Url;
//!
//! struct ListRoutes {
//!     app_id: String,
//!     hosts: Option<Vec<String>>,
//! }
//!
//! impl ApiRequest for ListRoutes {
//!     fn parameters(&self, params: &mut Parameters) {
//!         params
//!             .path("app_id", &self.app_id)
//!             .filter_in("host", self.hosts.as_deref());
//!     }
//! }
//!
//! let root = Url::parse("https://api.example.com").unwrap();
//! let request = ListRoutes { app_id: "abc".into(), hosts: Some(vec!["www".into()]) };
//! let uri = build_uri(&root, "/v2/apps/{app_id}/routes", &request).unwrap();
//! assert_eq!(uri.as_str(), "https://api.example.com/v2/apps/abc/routes?q=host+IN+www");
//! ```

use std::fmt::{self, Display};

use url::Url;

use crate::{Error, Result};

/// Name of the query parameter that carries filter clauses.
pub const FILTER_PARAMETER: &str = "q";

/// Token joining filter clauses.
pub const FILTER_CONJUNCTION: &str = ";";

/// A request value whose fields map onto URI parameters.
pub trait ApiRequest {
    /// Declare this request's path, query and filter parameters.
    ///
    /// Declaration order is rendering order.
    fn parameters(&self, params: &mut Parameters);

    /// Reject malformed requests before any network I/O.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

impl ApiRequest for () {
    fn parameters(&self, _params: &mut Parameters) {}
}

/// How a sequence-valued query parameter is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiValue {
    /// `key=a&key=b`
    Repeated,
    /// `key=a,b`
    CommaJoined,
}

/// Comparison operator of a filter clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterOperator {
    /// `field:value`
    Eq,
    /// `field>value`
    Gt,
    /// `field<value`
    Lt,
    /// `field>=value`
    Ge,
    /// `field<=value`
    Le,
    /// `field IN a,b`
    In,
}

impl FilterOperator {
    /// The operator as written in a filter expression.
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Eq => ":",
            FilterOperator::Gt => ">",
            FilterOperator::Lt => "<",
            FilterOperator::Ge => ">=",
            FilterOperator::Le => "<=",
            FilterOperator::In => " IN ",
        }
    }
}

impl Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
struct QueryParameter {
    name: &'static str,
    values: Vec<String>,
    style: MultiValue,
}

#[derive(Debug, Clone)]
struct FilterClause {
    field: &'static str,
    operator: FilterOperator,
    values: Vec<String>,
}

impl Display for FilterClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.field, self.operator, self.values.join(","))
    }
}

/// Collected parameter declarations for one request.
///
/// Absent values (`None`) are not recorded at all. Explicitly empty
/// sequences are recorded and rendered (see [`Parameters::filter_in`] and
/// [`Parameters::query_list`]).
#[derive(Debug, Clone, Default)]
pub struct Parameters {
    path: Vec<(&'static str, String)>,
    query: Vec<QueryParameter>,
    filters: Vec<FilterClause>,
}

impl Parameters {
    /// Create an empty declaration set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a path segment. An empty value counts as missing.
    pub fn path(&mut self, name: &'static str, value: impl AsRef<str>) -> &mut Self {
        let value = value.as_ref();
        if !value.is_empty() {
            self.path.push((name, value.to_string()));
        }
        self
    }

    /// Declare a single-valued query parameter.
    pub fn query<V: Display>(&mut self, name: &'static str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.query.push(QueryParameter {
                name,
                values: vec![value.to_string()],
                style: MultiValue::Repeated,
            });
        }
        self
    }

    /// Declare a sequence-valued query parameter.
    ///
    /// An explicitly empty slice renders `name=` for
    /// [`MultiValue::CommaJoined`] and nothing for [`MultiValue::Repeated`].
    pub fn query_list<V: Display>(
        &mut self,
        name: &'static str,
        values: Option<&[V]>,
        style: MultiValue,
    ) -> &mut Self {
        if let Some(values) = values {
            self.query.push(QueryParameter {
                name,
                values: values.iter().map(ToString::to_string).collect(),
                style,
            });
        }
        self
    }

    /// Declare a single-valued filter clause.
    pub fn filter<V: Display>(
        &mut self,
        field: &'static str,
        operator: FilterOperator,
        value: Option<V>,
    ) -> &mut Self {
        if let Some(value) = value {
            self.filters.push(FilterClause {
                field,
                operator,
                values: vec![value.to_string()],
            });
        }
        self
    }

    /// Declare an `IN` filter clause.
    ///
    /// An explicitly empty slice renders `field IN ` with no values, which
    /// matches nothing on the server.
    pub fn filter_in<V: Display>(&mut self, field: &'static str, values: Option<&[V]>) -> &mut Self {
        if let Some(values) = values {
            self.filters.push(FilterClause {
                field,
                operator: FilterOperator::In,
                values: values.iter().map(ToString::to_string).collect(),
            });
        }
        self
    }

    fn path_value(&self, name: &str) -> Option<&str> {
        self.path
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Rendered query pairs, in declaration order, with the filter
    /// expression last.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();

        for parameter in &self.query {
            match parameter.style {
                MultiValue::Repeated => pairs.extend(
                    parameter
                        .values
                        .iter()
                        .map(|v| (parameter.name.to_string(), v.clone())),
                ),
                MultiValue::CommaJoined => {
                    pairs.push((parameter.name.to_string(), parameter.values.join(",")))
                }
            }
        }

        if !self.filters.is_empty() {
            let expression = self
                .filters
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(FILTER_CONJUNCTION);
            pairs.push((FILTER_PARAMETER.to_string(), expression));
        }

        pairs
    }
}

/// Resolve `template` against `root` using the parameters `request` declares.
///
/// Placeholders in the template are written `{name}` and must each occupy a
/// whole path segment; a brace anywhere else is a validation error. A
/// placeholder without a declared value is a validation error.
pub fn build_uri<Q: ApiRequest + ?Sized>(root: &Url, template: &str, request: &Q) -> Result<Url> {
    request.validate()?;

    let mut params = Parameters::new();
    request.parameters(&mut params);

    let mut url = root.clone();
    url.set_query(None);
    url.set_fragment(None);
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| Error::Validation(format!("API root is not a base URL: {root}")))?;
        segments.pop_if_empty();

        for segment in template.split('/').filter(|s| !s.is_empty()) {
            match placeholder(segment) {
                Some(name) => {
                    let value = params.path_value(name).ok_or_else(|| {
                        Error::Validation(format!("{name} must be specified"))
                    })?;
                    segments.push(value);
                }
                None if segment.contains(['{', '}']) => {
                    return Err(Error::Validation(format!(
                        "malformed path template segment: {segment}"
                    )));
                }
                None => {
                    segments.push(segment);
                }
            }
        }
    }

    let pairs = params.query_pairs();
    if !pairs.is_empty() {
        url.query_pairs_mut().extend_pairs(pairs);
    }

    Ok(url)
}

fn placeholder(segment: &str) -> Option<&str> {
    segment.strip_prefix('{')?.strip_suffix('}')
}
