//! HTTP request types for the Mailgun API.

use serde_json::Value;

use crate::types::{FileAttachment, FormContent};

/// HTTP methods used by the Mailgun API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// GET request
    GET,
    /// POST request
    POST,
    /// PUT request
    PUT,
    /// DELETE request
    DELETE,
}

impl HttpMethod {
    /// Method name as sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::DELETE => "DELETE",
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::GET => reqwest::Method::GET,
            HttpMethod::POST => reqwest::Method::POST,
            HttpMethod::PUT => reqwest::Method::PUT,
            HttpMethod::DELETE => reqwest::Method::DELETE,
        }
    }
}

/// Body of a Mailgun request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// No body.
    Empty,
    /// `application/x-www-form-urlencoded` pairs.
    Form(FormContent),
    /// `application/json` document.
    Json(Value),
    /// `multipart/form-data` with text fields and file parts.
    Multipart {
        /// Text fields, in order.
        form: FormContent,
        /// Parts sent under the `attachment` field.
        attachments: Vec<FileAttachment>,
        /// Parts sent under the `inline` field.
        inline: Vec<FileAttachment>,
    },
}

impl RequestBody {
    /// Short label for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            RequestBody::Empty => "empty",
            RequestBody::Form(_) => "form",
            RequestBody::Json(_) => "json",
            RequestBody::Multipart { .. } => "multipart",
        }
    }
}

/// A request to the Mailgun API, relative to the configured base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct MailgunRequest {
    method: HttpMethod,
    path: String,
    query: Option<String>,
    body: RequestBody,
}

impl MailgunRequest {
    /// Create a request with an empty body.
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            body: RequestBody::Empty,
        }
    }

    /// Create a new GET request.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use integrations_mailgun::http::MailgunRequest;
    ///
    /// let request = MailgunRequest::get("/mg.example.com/events").with_query("limit=25");
    /// assert_eq!(
    ///     request.url("https://api.mailgun.net/v3"),
    ///     "https://api.mailgun.net/v3/mg.example.com/events?limit=25"
    /// );
    /// ```
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::GET, path)
    }

    /// Create a new POST request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::POST, path)
    }

    /// Create a new PUT request.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::PUT, path)
    }

    /// Create a new DELETE request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::DELETE, path)
    }

    /// Attach a query string, with or without its leading `?`.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        let query = query.into();
        let query = query.trim_start_matches('?');
        self.query = (!query.is_empty()).then(|| query.to_string());
        self
    }

    /// Send `form` URL-encoded.
    pub fn with_form(mut self, form: FormContent) -> Self {
        self.body = RequestBody::Form(form);
        self
    }

    /// Send `json` as the body.
    pub fn with_json(mut self, json: Value) -> Self {
        self.body = RequestBody::Json(json);
        self
    }

    /// Send `form` as multipart together with file parts.
    pub fn with_multipart(
        mut self,
        form: FormContent,
        attachments: Vec<FileAttachment>,
        inline: Vec<FileAttachment>,
    ) -> Self {
        self.body = RequestBody::Multipart {
            form,
            attachments,
            inline,
        };
        self
    }

    /// The HTTP method.
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Path relative to the base URL.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query string without the leading `?`.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// The body.
    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    /// Take the body out of the request.
    pub fn into_body(self) -> RequestBody {
        self.body
    }

    /// Absolute URL for `base_url`.
    pub fn url(&self, base_url: &str) -> String {
        let mut url = format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            self.path.trim_start_matches('/')
        );
        if let Some(query) = &self.query {
            url.push('?');
            url.push_str(query);
        }
        url
    }
}
