use crate::codec::encode_uri_component;

/// Marker the platform frame looks for in posted messages.
pub const UI_MESSAGE_PREFIX: &str = "__FAPI__";

/// A platform UI method invocation posted to the parent frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiLayerCall {
    method: String,
    args: Vec<Option<String>>,
}

impl UiLayerCall {
    pub fn new(method: impl Into<String>, args: Vec<Option<String>>) -> Self {
        Self {
            method: method.into(),
            args,
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn args(&self) -> &[Option<String>] {
        &self.args
    }

    /// Method and arguments percent-encoded and joined with `$`; absent
    /// arguments leave an empty slot.
    pub fn message(&self) -> String {
        let parts: Vec<String> = std::iter::once(Some(self.method.as_str()))
            .chain(self.args.iter().map(Option::as_deref))
            .map(|part| part.map(encode_uri_component).unwrap_or_default())
            .collect();
        format!("{UI_MESSAGE_PREFIX}{}", parts.join("$"))
    }
}
