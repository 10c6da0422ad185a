// Parameter registry: the three inputs this tool collects (panel URL,
// configuration token, overwrite consent) together with their CLI codes
// and validation rules. Pure data and pure functions, no I/O here.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// A validation rule. Returns `Ok(())` when the candidate is acceptable,
/// otherwise a human-readable reason.
pub type Validator = fn(&str) -> Result<(), String>;

/// Short option codes, shared by the registry and the `clap` schema.
pub const PANEL_URL_SHORT: char = 'p';
pub const TOKEN_SHORT: char = 't';
pub const OVERWRITE_SHORT: char = 'o';

/// Required length of a configuration token.
pub const TOKEN_LENGTH: usize = 32;

static FQDN_URL_REGEX: OnceLock<Regex> = OnceLock::new();
static IPV4_URL_REGEX: OnceLock<Regex> = OnceLock::new();

fn fqdn_url_regex() -> &'static Regex {
    FQDN_URL_REGEX.get_or_init(|| {
        Regex::new(r"^https?://(?:[a-zA-Z0-9-]+\.)+[a-zA-Z]{2,64}/?$").expect("Invalid FQDN regex")
    })
}

fn ipv4_url_regex() -> &'static Regex {
    IPV4_URL_REGEX.get_or_init(|| {
        let octet = r"(?:25[0-5]|2[0-4][0-9]|1[0-9]{2}|[1-9]?[0-9])";
        Regex::new(&format!(
            r"^(?:https?://)?{o}\.{o}\.{o}\.{o}(?::[0-9]{{1,5}})?/?$",
            o = octet
        ))
        .expect("Invalid IPv4 regex")
    })
}

/// Accepts `http(s)://` fully qualified domains and IPv4 addresses.
pub fn validate_panel_url(value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err("the panel URL is required".into());
    }
    if fqdn_url_regex().is_match(value) || ipv4_url_regex().is_match(value) {
        Ok(())
    } else {
        Err(format!(
            "'{}' is neither a fully qualified domain (e.g. https://panel.example.com) nor an IPv4 address",
            value
        ))
    }
}

/// Accepts tokens of exactly [`TOKEN_LENGTH`] characters.
pub fn validate_token(value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err("the configuration token is required".into());
    }
    let len = value.chars().count();
    if len != TOKEN_LENGTH {
        return Err(format!(
            "the configuration token must be exactly {} characters long (got {})",
            TOKEN_LENGTH, len
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKey {
    PanelUrl,
    Token,
    Overwrite,
}

/// Whether a parameter holds free text or a yes/no flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Text,
    Flag,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Text(String),
    Flag(bool),
}

/// Rejection of a candidate value, naming the parameter it was meant for.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{parameter}: {reason}")]
pub struct ValidationError {
    pub parameter: &'static str,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct Parameter {
    pub key: ParamKey,
    /// Display name used in prompts and error messages.
    pub name: &'static str,
    pub short: char,
    pub long: &'static str,
    pub kind: ParamKind,
    pub validator: Option<Validator>,
    pub value: Option<ParamValue>,
}

impl Parameter {
    /// Run this parameter's rules against `candidate` without storing it.
    pub fn check(&self, candidate: &ParamValue) -> Result<(), ValidationError> {
        let reject = |reason: String| ValidationError {
            parameter: self.name,
            reason,
        };
        match (self.kind, candidate) {
            (ParamKind::Text, ParamValue::Text(text)) => match self.validator {
                Some(validate) => validate(text).map_err(reject),
                None => Ok(()),
            },
            (ParamKind::Flag, ParamValue::Flag(_)) => Ok(()),
            (ParamKind::Text, ParamValue::Flag(_)) => Err(reject("expected a text value".into())),
            (ParamKind::Flag, ParamValue::Text(_)) => Err(reject("expected a yes/no value".into())),
        }
    }
}

/// Ordered set of the tool's parameters. The order is the prompt order.
#[derive(Debug, Clone)]
pub struct Registry {
    params: [Parameter; 3],
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Registry {
            params: [
                Parameter {
                    key: ParamKey::PanelUrl,
                    name: "Panel URL",
                    short: PANEL_URL_SHORT,
                    long: "panel-url",
                    kind: ParamKind::Text,
                    validator: Some(validate_panel_url),
                    value: None,
                },
                Parameter {
                    key: ParamKey::Token,
                    name: "Configuration token",
                    short: TOKEN_SHORT,
                    long: "token",
                    kind: ParamKind::Text,
                    validator: Some(validate_token),
                    value: None,
                },
                Parameter {
                    key: ParamKey::Overwrite,
                    name: "Overwrite existing configuration",
                    short: OVERWRITE_SHORT,
                    long: "overwrite",
                    kind: ParamKind::Flag,
                    validator: None,
                    value: None,
                },
            ],
        }
    }

    fn index(key: ParamKey) -> usize {
        match key {
            ParamKey::PanelUrl => 0,
            ParamKey::Token => 1,
            ParamKey::Overwrite => 2,
        }
    }

    pub fn get(&self, key: ParamKey) -> &Parameter {
        &self.params[Self::index(key)]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter()
    }

    /// Validate and store a value. On rejection the previous value is kept.
    pub fn set(&mut self, key: ParamKey, value: ParamValue) -> Result<(), ValidationError> {
        let param = &mut self.params[Self::index(key)];
        param.check(&value)?;
        param.value = Some(value);
        Ok(())
    }

    pub fn is_supplied(&self, key: ParamKey) -> bool {
        self.get(key).value.is_some()
    }

    pub fn text(&self, key: ParamKey) -> Option<&str> {
        match &self.get(key).value {
            Some(ParamValue::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Unset flags read as `false`.
    pub fn flag(&self, key: ParamKey) -> bool {
        matches!(self.get(key).value, Some(ParamValue::Flag(true)))
    }

    /// Panel URL and token, re-checked against their validators.
    ///
    /// Values only enter the registry through [`Registry::set`], so this
    /// fails only when one of them was never collected.
    pub fn credentials(&self) -> Result<(&str, &str), ValidationError> {
        let panel_url = self.required_text(ParamKey::PanelUrl)?;
        let token = self.required_text(ParamKey::Token)?;
        Ok((panel_url, token))
    }

    fn required_text(&self, key: ParamKey) -> Result<&str, ValidationError> {
        let param = self.get(key);
        let text = self.text(key).unwrap_or_default();
        param.check(&ParamValue::Text(text.to_string()))?;
        Ok(text)
    }
}
