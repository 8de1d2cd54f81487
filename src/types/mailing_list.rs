//! Mailing lists and their members.

use serde_json::Value;

use super::{to_yes_no, AccessLevel, EmailAddress, FormContent, FormPayload};
use crate::error::{require, ValidationError};

/// A mailing list for `POST /lists`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailingList {
    address: EmailAddress,
    name: Option<String>,
    description: Option<String>,
    access_level: Option<AccessLevel>,
}

impl MailingList {
    /// Create a list reachable at `address`.
    pub fn new(address: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            address: EmailAddress::parse(address)?,
            name: None,
            description: None,
            access_level: None,
        })
    }

    /// Set the display name.
    pub fn with_name(mut self, name: &str) -> Result<Self, ValidationError> {
        require("name", name)?;
        self.name = Some(name.to_string());
        Ok(self)
    }

    /// Set the description.
    pub fn with_description(mut self, description: &str) -> Result<Self, ValidationError> {
        require("description", description)?;
        self.description = Some(description.to_string());
        Ok(self)
    }

    /// Set who may post to the list.
    pub fn with_access_level(mut self, access_level: AccessLevel) -> Self {
        self.access_level = Some(access_level);
        self
    }

    /// The list address.
    pub fn address(&self) -> &EmailAddress {
        &self.address
    }
}

impl FormPayload for MailingList {
    fn to_form_content(&self) -> Result<FormContent, ValidationError> {
        let mut form = FormContent::new();
        form.push("address", self.address.address());
        form.push_opt("name", self.name.as_deref());
        form.push_opt("description", self.description.as_deref());
        form.push_opt("access_level", self.access_level.map(|a| a.as_str()));
        Ok(form)
    }
}

/// A member for `POST /lists/{list}/members`.
///
/// # Examples
///
/// ```rust
/// use integrations_mailgun::types::{FormPayload, Member};
/// use serde_json::json;
///
/// let member = Member::new("bob@example.com")?
///     .with_name("Bob")?
///     .with_vars(json!({"plan": "pro"}))?
///     .subscribed(true);
///
/// let form = member.to_form_content()?;
/// assert_eq!(form.get("vars"), Some(r#"{"plan":"pro"}"#));
/// assert_eq!(form.get("subscribed"), Some("yes"));
/// # Ok::<(), integrations_mailgun::error::ValidationError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    address: EmailAddress,
    name: Option<String>,
    vars: Option<Value>,
    subscribed: Option<bool>,
    upsert: Option<bool>,
}

impl Member {
    /// Create a member with the given address.
    pub fn new(address: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            address: EmailAddress::parse(address)?,
            name: None,
            vars: None,
            subscribed: None,
            upsert: None,
        })
    }

    /// Set the display name.
    pub fn with_name(mut self, name: &str) -> Result<Self, ValidationError> {
        require("name", name)?;
        self.name = Some(name.to_string());
        Ok(self)
    }

    /// Attach custom variables; must be a JSON object.
    pub fn with_vars(mut self, vars: Value) -> Result<Self, ValidationError> {
        if !vars.is_object() {
            return Err(ValidationError::malformed("vars", "must be a JSON object"));
        }
        self.vars = Some(vars);
        Ok(self)
    }

    /// Set the subscription state.
    pub fn subscribed(mut self, subscribed: bool) -> Self {
        self.subscribed = Some(subscribed);
        self
    }

    /// Update the member if it already exists.
    pub fn upsert(mut self, upsert: bool) -> Self {
        self.upsert = Some(upsert);
        self
    }

    /// The member address.
    pub fn address(&self) -> &EmailAddress {
        &self.address
    }
}

impl FormPayload for Member {
    fn to_form_content(&self) -> Result<FormContent, ValidationError> {
        let mut form = FormContent::new();
        form.push("address", self.address.address());
        form.push_opt("name", self.name.as_deref());
        form.push_opt("vars", self.vars.as_ref().map(Value::to_string));
        form.push_opt("subscribed", self.subscribed.map(to_yes_no));
        form.push_opt("upsert", self.upsert.map(to_yes_no));
        Ok(form)
    }
}
