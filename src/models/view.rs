// src/models/view.rs
// DOCUMENTATION: Presentation state a client drives
// PURPOSE: Tab selection, toast and upload drop-zone as explicit enums.
// Toast and drop-zone transitions are driven client side.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteTab {
    #[default]
    Amenities,
    Gallery,
    Rates,
    Assistant,
    Contact,
}

#[derive(Debug, Clone, Serialize)]
pub struct TabInfo {
    pub id: SiteTab,
    pub label: &'static str,
    pub icon: &'static str,
}

/// Tabs in navigation order
pub static SITE_TABS: [TabInfo; 5] = [
    TabInfo {
        id: SiteTab::Amenities,
        label: "Amenities",
        icon: "Sparkles",
    },
    TabInfo {
        id: SiteTab::Gallery,
        label: "Gallery",
        icon: "Camera",
    },
    TabInfo {
        id: SiteTab::Rates,
        label: "Rates",
        icon: "DollarSign",
    },
    TabInfo {
        id: SiteTab::Assistant,
        label: "AI Planner",
        icon: "Bot",
    },
    TabInfo {
        id: SiteTab::Contact,
        label: "Contact",
        icon: "MapPin",
    },
];

/// How long a toast stays up unless dismissed
#[allow(dead_code)]
pub const TOAST_DURATION_MS: u64 = 4000;

#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ToastState {
    #[default]
    Hidden,
    Visible {
        kind: ToastKind,
        message: String,
        remaining_ms: u64,
    },
}

#[allow(dead_code)]
impl ToastState {
    /// A new toast replaces whatever is showing
    pub fn show(kind: ToastKind, message: impl Into<String>) -> Self {
        ToastState::Visible {
            kind,
            message: message.into(),
            remaining_ms: TOAST_DURATION_MS,
        }
    }

    pub fn tick(self, delta_ms: u64) -> Self {
        match self {
            ToastState::Visible {
                kind,
                message,
                remaining_ms,
            } if remaining_ms > delta_ms => ToastState::Visible {
                kind,
                message,
                remaining_ms: remaining_ms - delta_ms,
            },
            _ => ToastState::Hidden,
        }
    }

    pub fn dismiss(self) -> Self {
        ToastState::Hidden
    }
}

/// Upload drop zone
/// DOCUMENTATION: Drops are ignored while an upload is in flight
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropZoneState {
    #[default]
    Idle,
    DragHover,
    Uploading { percent: u8 },
}

#[allow(dead_code)]
impl DropZoneState {
    pub fn drag_enter(self) -> Self {
        match self {
            DropZoneState::Idle => DropZoneState::DragHover,
            other => other,
        }
    }

    pub fn drag_leave(self) -> Self {
        match self {
            DropZoneState::DragHover => DropZoneState::Idle,
            other => other,
        }
    }

    pub fn drop_file(self) -> Self {
        match self {
            DropZoneState::Idle | DropZoneState::DragHover => {
                DropZoneState::Uploading { percent: 0 }
            }
            other => other,
        }
    }

    pub fn progress(self, percent: u8) -> Self {
        match self {
            DropZoneState::Uploading { percent: current } => DropZoneState::Uploading {
                percent: current.max(percent.min(100)),
            },
            other => other,
        }
    }

    /// Upload settled, either way
    pub fn finish(self) -> Self {
        DropZoneState::Idle
    }
}
