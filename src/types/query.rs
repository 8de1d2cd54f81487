//! Query string accumulation for GET requests.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::error::{require, ValidationError};

/// Characters escaped inside a query key or value.
///
/// Parentheses, `@`, `:`, `,` and `/` stay literal.
const QUERY_COMPONENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b';')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b']')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Percent-encode a single query component.
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, QUERY_COMPONENT).to_string()
}

/// Render one value as-is, or several as a parenthesised `or` disjunction.
pub(crate) fn disjunction<I, S>(values: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let values: Vec<String> = values.into_iter().map(|v| v.as_ref().to_string()).collect();
    match values.len() {
        0 => None,
        1 => values.into_iter().next(),
        _ => Some(format!("({})", values.join(" or "))),
    }
}

/// Builder accumulating `key=value` pairs into a query string.
///
/// Both key and value are required: blank input fails immediately and is
/// never silently skipped.
///
/// # Examples
///
/// ```rust
/// use integrations_mailgun::types::QueryStringBuilder;
///
/// let mut query = QueryStringBuilder::new();
/// query.append("limit", "25")?.append("event", "delivered")?;
///
/// assert_eq!(query.count(), 2);
/// assert_eq!(query.build()?, "?limit=25&event=delivered");
/// # Ok::<(), integrations_mailgun::error::ValidationError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct QueryStringBuilder {
    buffer: String,
    pairs: Vec<(String, String)>,
}

impl QueryStringBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pair, percent-encoding key and value.
    ///
    /// # Errors
    ///
    /// [`ValidationError::MissingField`] if the key or value is blank.
    pub fn append(
        &mut self,
        key: &str,
        value: impl AsRef<str>,
    ) -> Result<&mut Self, ValidationError> {
        let value = value.as_ref();
        require("query key", key)?;
        require(key, value)?;

        self.buffer.push(if self.pairs.is_empty() { '?' } else { '&' });
        self.buffer.push_str(&encode_component(key));
        self.buffer.push('=');
        self.buffer.push_str(&encode_component(value));
        self.pairs.push((key.to_string(), value.to_string()));
        Ok(self)
    }

    /// Number of pairs appended so far.
    pub fn count(&self) -> usize {
        self.pairs.len()
    }

    /// Returns true if nothing was appended.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// The appended pairs before encoding, in order.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// First unencoded value appended under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Render the accumulated string, including the leading `?`.
    ///
    /// # Errors
    ///
    /// [`ValidationError::InvalidOperation`] if nothing was appended.
    pub fn build(&self) -> Result<String, ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::invalid_operation(
                "query string has no parameters",
            ));
        }
        Ok(self.buffer.clone())
    }

    /// Render without the leading `?`, for callers that join it to a path
    /// themselves.
    pub fn build_bare(&self) -> Result<String, ValidationError> {
        self.build().map(|query| query[1..].to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(7)]
    fn test_separator_counts(#[case] n: usize) {
        let mut query = QueryStringBuilder::new();
        for i in 0..n {
            query.append(&format!("k{i}"), format!("v{i}")).unwrap();
        }

        let rendered = query.build().unwrap();
        assert_eq!(query.count(), n);
        assert!(rendered.starts_with('?'));
        assert_eq!(rendered.matches('&').count(), n - 1);
        assert_eq!(rendered.matches('=').count(), n);
    }

    #[test]
    fn test_blank_key_or_value_rejected() {
        let mut query = QueryStringBuilder::new();
        assert!(matches!(
            query.append(" ", "value"),
            Err(ValidationError::MissingField { .. })
        ));
        assert_eq!(
            query.append("subject", "").unwrap_err(),
            ValidationError::missing_field("subject")
        );
        assert_eq!(query.count(), 0);
    }

    #[test]
    fn test_build_empty_fails() {
        let query = QueryStringBuilder::new();
        assert!(matches!(
            query.build(),
            Err(ValidationError::InvalidOperation { .. })
        ));
        assert!(query.build_bare().is_err());
    }

    #[test]
    fn test_percent_encoding() {
        let mut query = QueryStringBuilder::new();
        query
            .append("subject", "50% off & more")
            .unwrap()
            .append("event", "(clicked or opened)")
            .unwrap()
            .append("recipient", "a+b@example.com")
            .unwrap();

        assert_eq!(
            query.build().unwrap(),
            "?subject=50%25%20off%20%26%20more&event=(clicked%20or%20opened)&recipient=a%2Bb@example.com"
        );
        assert_eq!(query.get("event"), Some("(clicked or opened)"));
        assert_eq!(query.pairs()[0], ("subject".to_string(), "50% off & more".to_string()));
    }

    #[test]
    fn test_disjunction() {
        assert_eq!(disjunction(Vec::<&str>::new()), None);
        assert_eq!(disjunction(["clicked"]), Some("clicked".to_string()));
        assert_eq!(
            disjunction(["clicked", "opened", "failed"]),
            Some("(clicked or opened or failed)".to_string())
        );
    }

    #[test]
    fn test_build_bare() {
        let mut query = QueryStringBuilder::new();
        query.append("start", "1").unwrap().append("end", "2").unwrap();
        assert_eq!(query.build_bare().unwrap(), "start=1&end=2");
    }
}
