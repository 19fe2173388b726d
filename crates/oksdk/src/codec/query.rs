use std::collections::BTreeMap;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

/// Characters left untouched by `encodeURIComponent`.
pub const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn encode_uri_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// Launch parameters parsed from a location search or fragment.
///
/// A name without `=` is kept with an undefined value, which is distinct
/// from an empty one: `access_token=` counts as present when deciding
/// whether to redirect, `access_token` alone does not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(BTreeMap<String, Option<String>>);

impl QueryParams {
    /// Splits on `&`, then on `=`. Only the value half is URL-decoded (`+`
    /// is a space); names are taken literally. A leading `?` or `#` is
    /// dropped and later duplicates win.
    pub fn parse(source: &str) -> Self {
        let source = source
            .strip_prefix('?')
            .or_else(|| source.strip_prefix('#'))
            .unwrap_or(source);

        let mut params = BTreeMap::new();
        for pair in source.split('&').filter(|pair| !pair.is_empty()) {
            let mut parts = pair.split('=');
            let name = parts.next().unwrap_or_default();
            let value = parts.next().map(decode_value);
            params.insert(name.to_string(), value);
        }
        Self(params)
    }

    /// The value of `name` when it is present and non-empty.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|value| !value.is_empty())
    }

    /// The value of `name` when it appeared with an `=`, possibly empty.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(|value| value.as_deref())
    }

    /// Whether `name` appeared with an `=`, even with an empty value.
    pub fn is_defined(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn decode_value(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}
