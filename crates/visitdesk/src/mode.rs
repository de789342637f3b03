use serde::{Deserialize, Serialize};

/// Which flow a client gets: the student kiosk or the staff dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppMode {
    #[default]
    Kiosk,
    Teacher,
}

impl AppMode {
    /// Reads the first `mode` parameter of a URL query string. Only
    /// `teacher` selects the dashboard; anything else is the kiosk.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mode = query
            .split('&')
            .filter_map(|pair| pair.split_once('=').or(Some((pair, ""))))
            .find(|(key, _)| *key == "mode")
            .map(|(_, value)| value);

        match mode {
            Some("teacher") => AppMode::Teacher,
            _ => AppMode::Kiosk,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AppMode::Kiosk => "kiosk",
            AppMode::Teacher => "teacher",
        }
    }
}
