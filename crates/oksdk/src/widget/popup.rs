use serde::{Deserialize, Serialize};

/// Size and offset of the screen area the app window occupies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenMetrics {
    pub width: f64,
    pub height: f64,
    pub left: f64,
    pub top: f64,
}

/// Popup window requested by the app. Missing `left`/`top` centre the popup
/// on the screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopupConfig {
    pub name: String,
    pub width: f64,
    pub height: f64,
    pub left: Option<f64>,
    pub top: Option<f64>,
    /// Extra `window.open` features appended verbatim.
    pub options: Option<String>,
}

/// Arguments for opening the popup window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopupWindow {
    pub name: String,
    pub features: String,
}

impl PopupConfig {
    pub fn new(name: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            left: None,
            top: None,
            options: None,
        }
    }

    /// `opened_at_ms` makes the window name unique per opening.
    pub fn window(&self, screen: &ScreenMetrics, opened_at_ms: u128) -> PopupWindow {
        let left = self
            .left
            .unwrap_or(screen.width / 2.0 - self.width / 2.0 + screen.left);
        let top = self
            .top
            .unwrap_or(screen.height / 2.0 - self.height / 2.0 + screen.top);

        let mut features = format!(
            "width={},height={},top={top},left={left}",
            self.width, self.height
        );
        if let Some(options) = self.options.as_deref().filter(|o| !o.is_empty()) {
            features.push(',');
            features.push_str(options);
        }

        PopupWindow {
            name: format!("{}{opened_at_ms}", self.name),
            features,
        }
    }
}
