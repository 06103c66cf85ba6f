//! Desktop / mobile view selection.

use axum::http::{HeaderMap, header};
use serde::Serialize;

/// User-agent fragments that mark a mobile browser
const MOBILE_MARKERS: [&str; 8] = [
    "mobile",
    "android",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "iemobile",
    "opera mini",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    Mobile,
    Desktop,
}

/// Which layout and template set a page renders with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewVariant {
    pub device: DeviceKind,
    pub layout: &'static str,
    pub prefix: &'static str,
}

impl ViewVariant {
    pub const MOBILE: ViewVariant = ViewVariant {
        device: DeviceKind::Mobile,
        layout: "main",
        prefix: "",
    };

    pub const DESKTOP: ViewVariant = ViewVariant {
        device: DeviceKind::Desktop,
        layout: "desktop/main",
        prefix: "desktop/",
    };

    /// `?device=mobile|desktop` wins over the user agent
    pub fn detect(user_agent: Option<&str>, device_override: Option<&str>) -> Self {
        match device_override {
            Some("mobile") => return Self::MOBILE,
            Some("desktop") => return Self::DESKTOP,
            _ => {}
        }

        let ua = user_agent.unwrap_or_default().to_ascii_lowercase();
        if MOBILE_MARKERS.iter().any(|marker| ua.contains(marker)) {
            Self::MOBILE
        } else {
            Self::DESKTOP
        }
    }

    pub fn from_headers(headers: &HeaderMap, device_override: Option<&str>) -> Self {
        let user_agent = headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok());
        Self::detect(user_agent, device_override)
    }

    /// Template name for a page, e.g. `desktop/main-page`
    pub fn template(&self, page: &str) -> String {
        format!("{}{}", self.prefix, page)
    }
}
