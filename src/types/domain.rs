//! Sending domain and SMTP credential requests.

use once_cell::sync::Lazy;
use regex::Regex;
use std::net::Ipv4Addr;

use super::{to_yes_no, FormContent, FormPayload, SpamAction};
use crate::error::{require, ValidationError};

/// Shortest accepted SMTP password.
pub const MIN_PASSWORD_LENGTH: usize = 5;

/// Longest accepted SMTP password.
pub const MAX_PASSWORD_LENGTH: usize = 32;

static HOSTNAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z][A-Za-z0-9-]{0,61}[A-Za-z0-9]$",
    )
    .expect("hostname pattern is valid")
});

fn check_password(field: &str, password: &str) -> Result<(), ValidationError> {
    require(field, password)?;
    let len = password.chars().count();
    if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&len) {
        return Err(ValidationError::out_of_range(
            field,
            format!(
                "length must be between {} and {} characters",
                MIN_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH
            ),
        ));
    }
    Ok(())
}

/// DKIM key sizes Mailgun can generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DkimKeySize {
    /// 1024-bit key.
    Bits1024,
    /// 2048-bit key.
    Bits2048,
}

impl DkimKeySize {
    /// Key size in bits.
    pub fn bits(&self) -> u16 {
        match self {
            DkimKeySize::Bits1024 => 1024,
            DkimKeySize::Bits2048 => 2048,
        }
    }
}

impl TryFrom<u16> for DkimKeySize {
    type Error = ValidationError;

    fn try_from(bits: u16) -> Result<Self, Self::Error> {
        match bits {
            1024 => Ok(DkimKeySize::Bits1024),
            2048 => Ok(DkimKeySize::Bits2048),
            other => Err(ValidationError::out_of_range(
                "dkim_key_size",
                format!("{} is not 1024 or 2048", other),
            )),
        }
    }
}

/// A new sending domain for `POST /domains`.
///
/// # Examples
///
/// ```rust
/// use integrations_mailgun::types::{DomainRequest, FormPayload, SpamAction};
///
/// let mut domain = DomainRequest::new("mg.example.com")?;
/// domain.spam_action(SpamAction::Tag).add_ip("192.0.2.10")?;
///
/// let form = domain.to_form_content()?;
/// assert_eq!(form.get("name"), Some("mg.example.com"));
/// assert_eq!(form.get("spam_action"), Some("tag"));
/// # Ok::<(), integrations_mailgun::error::ValidationError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainRequest {
    name: String,
    smtp_password: Option<String>,
    spam_action: Option<SpamAction>,
    wildcard: Option<bool>,
    force_dkim_authority: Option<bool>,
    dkim_key_size: Option<DkimKeySize>,
    ips: Vec<Ipv4Addr>,
}

impl DomainRequest {
    /// Create a request for the domain `name`.
    ///
    /// # Errors
    ///
    /// [`ValidationError::MissingField`] if blank, [`ValidationError::Malformed`]
    /// if it is not a valid hostname.
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        require("name", name)?;
        let name = name.trim();
        if !HOSTNAME.is_match(name) {
            return Err(ValidationError::malformed(
                "name",
                format!("'{}' is not a valid domain name", name),
            ));
        }
        Ok(Self {
            name: name.to_ascii_lowercase(),
            smtp_password: None,
            spam_action: None,
            wildcard: None,
            force_dkim_authority: None,
            dkim_key_size: None,
            ips: Vec::new(),
        })
    }

    /// Domain name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the password of the default SMTP login.
    pub fn smtp_password(&mut self, password: &str) -> Result<&mut Self, ValidationError> {
        check_password("smtp_password", password)?;
        self.smtp_password = Some(password.to_string());
        Ok(self)
    }

    /// Set the spam handling policy.
    pub fn spam_action(&mut self, action: SpamAction) -> &mut Self {
        self.spam_action = Some(action);
        self
    }

    /// Accept mail for every subdomain.
    pub fn wildcard(&mut self, wildcard: bool) -> &mut Self {
        self.wildcard = Some(wildcard);
        self
    }

    /// Make this domain the DKIM authority for itself.
    pub fn force_dkim_authority(&mut self, force: bool) -> &mut Self {
        self.force_dkim_authority = Some(force);
        self
    }

    /// Set the DKIM key size in bits (1024 or 2048).
    pub fn dkim_key_size(&mut self, bits: u16) -> Result<&mut Self, ValidationError> {
        self.dkim_key_size = Some(DkimKeySize::try_from(bits)?);
        Ok(self)
    }

    /// Add a dedicated IP to assign to the domain.
    pub fn add_ip(&mut self, ip: &str) -> Result<&mut Self, ValidationError> {
        require("ips", ip)?;
        let ip: Ipv4Addr = ip.trim().parse().map_err(|_| {
            ValidationError::malformed("ips", format!("'{}' is not an IPv4 address", ip))
        })?;
        if !self.ips.contains(&ip) {
            self.ips.push(ip);
        }
        Ok(self)
    }

    /// Dedicated IPs in insertion order.
    pub fn ips(&self) -> &[Ipv4Addr] {
        &self.ips
    }
}

impl FormPayload for DomainRequest {
    fn to_form_content(&self) -> Result<FormContent, ValidationError> {
        let mut form = FormContent::new();
        form.push("name", self.name.as_str());
        form.push_opt("smtp_password", self.smtp_password.as_deref());
        form.push_opt("spam_action", self.spam_action.map(|a| a.as_str()));
        form.push_opt("wildcard", self.wildcard.map(to_yes_no));
        form.push_opt("force_dkim_authority", self.force_dkim_authority.map(to_yes_no));
        form.push_opt("dkim_key_size", self.dkim_key_size.map(|k| k.bits().to_string()));
        if !self.ips.is_empty() {
            form.push(
                "ips",
                self.ips
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(","),
            );
        }
        Ok(form)
    }
}

/// SMTP credentials for `POST /domains/{domain}/credentials`, or a password
/// change for `PUT /domains/{domain}/credentials/{login}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainCredentialRequest {
    login: Option<String>,
    password: String,
}

impl DomainCredentialRequest {
    /// Credentials for a new SMTP login.
    ///
    /// # Errors
    ///
    /// [`ValidationError::MissingField`] if either value is blank,
    /// [`ValidationError::OutOfRange`] if the password is not 5 to 32
    /// characters long.
    pub fn new(login: &str, password: &str) -> Result<Self, ValidationError> {
        require("login", login)?;
        check_password("password", password)?;
        Ok(Self {
            login: Some(login.to_string()),
            password: password.to_string(),
        })
    }

    /// A password change for an existing login.
    pub fn password_only(password: &str) -> Result<Self, ValidationError> {
        check_password("password", password)?;
        Ok(Self {
            login: None,
            password: password.to_string(),
        })
    }

    /// The login, absent for password changes.
    pub fn login(&self) -> Option<&str> {
        self.login.as_deref()
    }

    /// The password.
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl FormPayload for DomainCredentialRequest {
    fn to_form_content(&self) -> Result<FormContent, ValidationError> {
        let mut form = FormContent::new();
        form.push_opt("login", self.login.as_deref());
        form.push("password", self.password.as_str());
        Ok(form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("secret")]
    #[case("12345")]
    #[case("abcdefghijklmnopqrstuvwxyz012345")]
    fn test_valid_credentials(#[case] password: &str) {
        let credential = DomainCredentialRequest::new("alice", password).unwrap();

        let form = credential.to_form_content().unwrap();
        assert_eq!(form.get("login"), Some("alice"));
        assert_eq!(form.get("password"), Some(password));
        assert_eq!(
            credential.to_json().unwrap(),
            json!({"login": "alice", "password": password})
        );
    }

    #[rstest]
    #[case("1234")]
    #[case("abcdefghijklmnopqrstuvwxyz0123456")]
    fn test_password_length_out_of_range(#[case] password: &str) {
        assert!(matches!(
            DomainCredentialRequest::new("alice", password),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            DomainCredentialRequest::password_only(password),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[rstest]
    #[case("", "secret")]
    #[case("   ", "secret")]
    #[case("alice", "")]
    #[case("alice", " \t ")]
    fn test_blank_credentials(#[case] login: &str, #[case] password: &str) {
        assert!(matches!(
            DomainCredentialRequest::new(login, password),
            Err(ValidationError::MissingField { .. })
        ));
    }

    #[test]
    fn test_password_only_omits_login() {
        let update = DomainCredentialRequest::password_only("new-secret").unwrap();
        let form = update.to_form_content().unwrap();
        assert_eq!(form.keys(), vec!["password"]);
        assert_eq!(update.login(), None);
    }

    #[rstest]
    #[case("localhost")]
    #[case("-bad.example.com")]
    #[case("exa mple.com")]
    #[case("example..com")]
    fn test_invalid_domain_names(#[case] name: &str) {
        assert!(matches!(
            DomainRequest::new(name),
            Err(ValidationError::Malformed { .. })
        ));
    }

    #[test]
    fn test_blank_domain_name() {
        assert!(matches!(
            DomainRequest::new(""),
            Err(ValidationError::MissingField { .. })
        ));
    }

    #[test]
    fn test_domain_form_content() {
        let mut domain = DomainRequest::new("MG.Example.com").unwrap();
        domain
            .smtp_password("supersecret")
            .unwrap()
            .spam_action(SpamAction::Block)
            .wildcard(true)
            .force_dkim_authority(false)
            .dkim_key_size(2048)
            .unwrap()
            .add_ip("192.0.2.1")
            .unwrap()
            .add_ip("192.0.2.2")
            .unwrap();

        let form = domain.to_form_content().unwrap();
        assert_eq!(
            form.keys(),
            vec![
                "name",
                "smtp_password",
                "spam_action",
                "wildcard",
                "force_dkim_authority",
                "dkim_key_size",
                "ips",
            ]
        );
        assert_eq!(form.get("name"), Some("mg.example.com"));
        assert_eq!(form.get("wildcard"), Some("yes"));
        assert_eq!(form.get("force_dkim_authority"), Some("no"));
        assert_eq!(form.get("dkim_key_size"), Some("2048"));
        assert_eq!(form.get("ips"), Some("192.0.2.1,192.0.2.2"));
    }

    #[test]
    fn test_domain_field_errors() {
        let mut domain = DomainRequest::new("mg.example.com").unwrap();
        assert!(matches!(
            domain.add_ip("300.1.1.1"),
            Err(ValidationError::Malformed { .. })
        ));
        assert!(matches!(
            domain.dkim_key_size(4096),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            domain.smtp_password("abc"),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert_eq!(domain.to_form_content().unwrap().keys(), vec!["name"]);
    }
}
