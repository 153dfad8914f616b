use ratatui::layout::Rect;
use serde::{Deserialize, Serialize};

use super::{Component, ComponentContext};
use crate::theme;
use crate::ui::{UiFrame, ellipsize};

/// Signed-in user as handed over by the host. Never fetched or validated here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub name: String,
    pub role: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: "guest".to_string(),
            role: "member".to_string(),
        }
    }
}

impl Profile {
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
        }
    }

    /// Status bar text, e.g. `SIGNED IN AS ALEX · ENGINEER`.
    pub fn banner(&self) -> String {
        format!(
            "SIGNED IN AS {} · {}",
            self.name.to_uppercase(),
            self.role.to_uppercase()
        )
    }
}

#[derive(Debug)]
pub struct ProfileCardComponent {
    profile: Profile,
}

impl ProfileCardComponent {
    pub fn new(profile: Profile) -> Self {
        Self { profile }
    }
}

impl Component for ProfileCardComponent {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &ComponentContext) {
        let width = area.width as usize;
        let rows = [
            ("Name", self.profile.name.as_str()),
            ("Role", self.profile.role.as_str()),
        ];
        for (i, (label, value)) in rows.into_iter().enumerate() {
            let y = area.y + 1 + i as u16 * 2;
            frame.set_string(area.x + 1, y, label, theme::muted());
            let value = ellipsize(value, width.saturating_sub(8));
            frame.set_string(area.x + 7, y, &value, theme::header());
        }
    }
}
