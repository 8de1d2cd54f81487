//! Inbound routing rules.

use std::fmt;
use url::Url;

use super::{EmailAddress, FormContent, FormPayload};
use crate::error::{require, ValidationError};

/// The single predicate a route evaluates against incoming mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteFilter {
    /// Match a MIME header against a regular expression.
    MatchHeader {
        /// Header name.
        name: String,
        /// Pattern the header value must match.
        pattern: String,
    },
    /// Match the envelope recipient against a regular expression.
    MatchRecipient {
        /// Pattern the recipient must match.
        pattern: String,
    },
    /// Match every message not matched by another route.
    CatchAll,
}

/// A double-quoted argument with `\` and `"` escaped.
struct Quoted<'a>(&'a str);

impl fmt::Display for Quoted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"")?;
        for c in self.0.chars() {
            if matches!(c, '"' | '\\') {
                f.write_str("\\")?;
            }
            write!(f, "{}", c)?;
        }
        f.write_str("\"")
    }
}

impl fmt::Display for RouteFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteFilter::MatchHeader { name, pattern } => {
                write!(f, "match_header({}, {})", Quoted(name), Quoted(pattern))
            }
            RouteFilter::MatchRecipient { pattern } => {
                write!(f, "match_recipient({})", Quoted(pattern))
            }
            RouteFilter::CatchAll => f.write_str("catch_all()"),
        }
    }
}

/// What a route does with a matched message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAction {
    /// Forward to an email address or an HTTP(S) endpoint.
    Forward(String),
    /// Store the message, optionally notifying a URL.
    Store(Option<String>),
    /// Stop evaluating lower-priority routes.
    Stop,
}

impl fmt::Display for RouteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteAction::Forward(target) => write!(f, "forward({})", Quoted(target)),
            RouteAction::Store(Some(notify)) => write!(f, "store(notify={})", Quoted(notify)),
            RouteAction::Store(None) => f.write_str("store()"),
            RouteAction::Stop => f.write_str("stop()"),
        }
    }
}

fn check_http_url(field: &str, value: &str) -> Result<(), ValidationError> {
    let url = Url::parse(value)
        .map_err(|e| ValidationError::malformed(field, format!("'{}': {}", value, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(ValidationError::malformed(
            field,
            format!("unsupported scheme '{}'", scheme),
        )),
    }
}

/// A route for `POST /routes`.
///
/// The filter is set once; a second call to [`match_header`](Self::match_header),
/// [`match_recipient`](Self::match_recipient), or [`catch_all`](Self::catch_all)
/// fails. Actions accumulate in call order.
///
/// # Examples
///
/// ```rust
/// use integrations_mailgun::types::{FormPayload, Route};
///
/// let mut route = Route::new();
/// route
///     .match_recipient(".*@support.example.com")?
///     .forward("https://example.com/inbound")?
///     .stop();
///
/// let form = route.to_form_content()?;
/// assert_eq!(form.get("expression"), Some("match_recipient(\".*@support.example.com\")"));
/// assert_eq!(form.get_all("action").len(), 2);
/// # Ok::<(), integrations_mailgun::error::ValidationError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Route {
    filter: Option<RouteFilter>,
    actions: Vec<RouteAction>,
    priority: Option<u32>,
    description: Option<String>,
}

impl Route {
    /// Create an empty route.
    pub fn new() -> Self {
        Self::default()
    }

    fn set_filter(&mut self, filter: RouteFilter) -> Result<&mut Self, ValidationError> {
        if self.filter.is_some() {
            return Err(ValidationError::invalid_operation("expression already set"));
        }
        self.filter = Some(filter);
        Ok(self)
    }

    /// Match messages whose `name` header matches `pattern`.
    pub fn match_header(&mut self, name: &str, pattern: &str) -> Result<&mut Self, ValidationError> {
        require("header", name)?;
        require("pattern", pattern)?;
        self.set_filter(RouteFilter::MatchHeader {
            name: name.to_string(),
            pattern: pattern.to_string(),
        })
    }

    /// Match messages whose recipient matches `pattern`.
    pub fn match_recipient(&mut self, pattern: &str) -> Result<&mut Self, ValidationError> {
        require("pattern", pattern)?;
        self.set_filter(RouteFilter::MatchRecipient {
            pattern: pattern.to_string(),
        })
    }

    /// Match every message.
    pub fn catch_all(&mut self) -> Result<&mut Self, ValidationError> {
        self.set_filter(RouteFilter::CatchAll)
    }

    /// Forward to an email address or an `http`/`https` URL.
    pub fn forward(&mut self, target: &str) -> Result<&mut Self, ValidationError> {
        require("forward", target)?;
        let target = target.trim();
        let normalized = if target.starts_with("http://") || target.starts_with("https://") {
            check_http_url("forward", target)?;
            target.to_string()
        } else {
            EmailAddress::parse(target)?.address().to_string()
        };
        self.actions.push(RouteAction::Forward(normalized));
        Ok(self)
    }

    /// Store the message and notify `notify_url` when it arrives.
    pub fn store(&mut self, notify_url: Option<&str>) -> Result<&mut Self, ValidationError> {
        let notify = match notify_url {
            Some(url) => {
                require("notify", url)?;
                let url = url.trim();
                check_http_url("notify", url)?;
                Some(url.to_string())
            }
            None => None,
        };
        self.actions.push(RouteAction::Store(notify));
        Ok(self)
    }

    /// Stop evaluating lower-priority routes.
    pub fn stop(&mut self) -> &mut Self {
        self.actions.push(RouteAction::Stop);
        self
    }

    /// Set the priority; lower values are evaluated first.
    pub fn priority(&mut self, priority: i32) -> Result<&mut Self, ValidationError> {
        if priority < 0 {
            return Err(ValidationError::out_of_range("priority", "must not be negative"));
        }
        self.priority = Some(priority as u32);
        Ok(self)
    }

    /// Set a free-text description.
    pub fn description(&mut self, description: &str) -> Result<&mut Self, ValidationError> {
        require("description", description)?;
        self.description = Some(description.to_string());
        Ok(self)
    }

    /// The filter, if set.
    pub fn filter(&self) -> Option<&RouteFilter> {
        self.filter.as_ref()
    }

    /// Rendered filter expression, if set.
    pub fn expression(&self) -> Option<String> {
        self.filter.as_ref().map(ToString::to_string)
    }

    /// Actions in call order.
    pub fn actions(&self) -> &[RouteAction] {
        &self.actions
    }
}

impl FormPayload for Route {
    fn to_form_content(&self) -> Result<FormContent, ValidationError> {
        let expression = self
            .expression()
            .ok_or_else(|| ValidationError::missing_field("expression"))?;
        if self.actions.is_empty() {
            return Err(ValidationError::missing_field("action"));
        }

        let mut form = FormContent::new();
        form.push_opt("description", self.description.as_deref());
        form.push("priority", self.priority.unwrap_or(0).to_string());
        form.push("expression", expression);
        for action in &self.actions {
            form.push("action", action.to_string());
        }
        Ok(form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::header_then_recipient(0, 1)]
    #[case::recipient_then_catch_all(1, 2)]
    #[case::catch_all_twice(2, 2)]
    #[case::header_twice(0, 0)]
    fn test_filter_set_once(#[case] first: usize, #[case] second: usize) {
        fn apply(route: &mut Route, which: usize) -> Result<(), ValidationError> {
            match which {
                0 => route.match_header("subject", ".*urgent.*").map(|_| ()),
                1 => route.match_recipient(".*@example.com").map(|_| ()),
                _ => route.catch_all().map(|_| ()),
            }
        }

        let mut route = Route::new();
        apply(&mut route, first).unwrap();
        let err = apply(&mut route, second).unwrap_err();
        assert_eq!(err, ValidationError::invalid_operation("expression already set"));
    }

    #[test]
    fn test_actions_accumulate() {
        let mut route = Route::new();
        route.catch_all().unwrap();
        route
            .forward("ops@example.com")
            .unwrap()
            .forward("https://example.com/hook")
            .unwrap()
            .store(Some("https://example.com/stored"))
            .unwrap()
            .store(None)
            .unwrap()
            .stop();

        assert_eq!(route.actions().len(), 5);
        let form = route.to_form_content().unwrap();
        assert_eq!(
            form.get_all("action"),
            vec![
                "forward(\"ops@example.com\")",
                "forward(\"https://example.com/hook\")",
                "store(notify=\"https://example.com/stored\")",
                "store()",
                "stop()",
            ]
        );
    }

    #[test]
    fn test_form_order() {
        let mut route = Route::new();
        route
            .description("Support inbox")
            .unwrap()
            .priority(5)
            .unwrap()
            .match_header("subject", "support")
            .unwrap()
            .stop();

        let form = route.to_form_content().unwrap();
        assert_eq!(form.keys(), vec!["description", "priority", "expression", "action"]);
        assert_eq!(form.get("priority"), Some("5"));
        assert_eq!(form.get("expression"), Some("match_header(\"subject\", \"support\")"));
    }

    #[test]
    fn test_quotes_and_backslashes_escaped() {
        let mut route = Route::new();
        route
            .match_header("subject", r#"say "hi"\s+now"#)
            .unwrap()
            .stop();
        assert_eq!(
            route.expression().as_deref(),
            Some(r#"match_header("subject", "say \"hi\"\\s+now")"#)
        );

        let mut route = Route::new();
        route.match_recipient(r#"^"quoted"@example\.com$"#).unwrap();
        assert_eq!(
            route.expression().as_deref(),
            Some(r#"match_recipient("^\"quoted\"@example\\.com$")"#)
        );
    }

    #[test]
    fn test_url_targets_kept_as_given() {
        let mut route = Route::new();
        route
            .forward(" https://example.com ")
            .unwrap()
            .store(Some("https://example.com"))
            .unwrap();
        assert_eq!(
            route.actions(),
            &[
                RouteAction::Forward("https://example.com".to_string()),
                RouteAction::Store(Some("https://example.com".to_string())),
            ]
        );
    }

    #[test]
    fn test_negative_priority() {
        let mut route = Route::new();
        assert!(matches!(
            route.priority(-1),
            Err(ValidationError::OutOfRange { .. })
        ));
        route.priority(0).unwrap();
    }

    #[test]
    fn test_invalid_forward_targets() {
        let mut route = Route::new();
        assert!(matches!(
            route.forward("not an address"),
            Err(ValidationError::Malformed { .. })
        ));
        assert!(matches!(
            route.forward("https://"),
            Err(ValidationError::Malformed { .. })
        ));
        assert!(matches!(
            route.store(Some("ftp://example.com/x")),
            Err(ValidationError::Malformed { .. })
        ));
        assert!(route.actions().is_empty());
    }

    #[test]
    fn test_render_requires_expression_and_action() {
        let mut route = Route::new();
        route.stop();
        assert_eq!(
            route.to_form_content().unwrap_err(),
            ValidationError::missing_field("expression")
        );

        let mut route = Route::new();
        route.catch_all().unwrap();
        assert_eq!(
            route.to_form_content().unwrap_err(),
            ValidationError::missing_field("action")
        );
    }
}
