//! Element location for text- and role-addressed controls.
//!
//! The target application is consumed purely through its visible UI surface, so
//! selectors compile to JavaScript query expressions evaluated in the page. Text
//! and role selectors resolve to the first *visible* match, mirroring how a
//! human (or a Playwright `get_by_*` call) picks repeated controls.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Selector for locating an interactive control
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selector {
    /// Exact visible text content (e.g. a card title or sidebar entry)
    Text(String),
    /// Role-addressed control with an accessible name
    Role {
        /// ARIA role / element name (e.g. "button")
        role: String,
        /// Accessible name (visible label)
        name: String,
    },
    /// Raw CSS selector (e.g. the generic answer "label" elements)
    Css(String),
}

impl Selector {
    /// Create a text selector
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Create a button selector by accessible name
    #[must_use]
    pub fn button(name: impl Into<String>) -> Self {
        Self::Role {
            role: "button".to_string(),
            name: name.into(),
        }
    }

    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Expression evaluating to the first matching element, or `undefined`.
    ///
    /// Text and role selectors skip detached elements (`offsetParent === null`)
    /// and scan innermost-first so a wrapping container never shadows the
    /// actual control.
    #[must_use]
    pub fn find_expr(&self) -> String {
        match self {
            Self::Text(t) => format!(
                "Array.from(document.querySelectorAll('*')).reverse().find(el => \
                 el.textContent.trim() === {t:?} && el.offsetParent !== null)"
            ),
            Self::Role { role, name } => format!(
                "Array.from(document.querySelectorAll('{role}, [role=\"{role}\"]')).find(el => \
                 el.textContent.trim() === {name:?} && el.offsetParent !== null)"
            ),
            Self::Css(s) => format!("document.querySelector({s:?})"),
        }
    }

    /// Script returning `true` when a matching element is visible
    #[must_use]
    pub fn visible_script(&self) -> String {
        format!(
            "(() => {{ const el = {}; return !!el && el.offsetParent !== null; }})()",
            self.find_expr()
        )
    }

    /// Script clicking the first match; returns `false` when nothing matches
    #[must_use]
    pub fn click_script(&self) -> String {
        format!(
            "(() => {{ const el = {}; if (!el) return false; el.click(); return true; }})()",
            self.find_expr()
        )
    }

    /// Script counting matches (used for diagnostics)
    #[must_use]
    pub fn count_script(&self) -> String {
        match self {
            Self::Text(t) => format!(
                "Array.from(document.querySelectorAll('*')).filter(el => \
                 el.textContent.trim() === {t:?}).length"
            ),
            Self::Role { role, name } => format!(
                "Array.from(document.querySelectorAll('{role}, [role=\"{role}\"]')).filter(el => \
                 el.textContent.trim() === {name:?}).length"
            ),
            Self::Css(s) => format!("document.querySelectorAll({s:?}).length"),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(t) => write!(f, "text {t:?}"),
            Self::Role { role, name } => write!(f, "{role} {name:?}"),
            Self::Css(s) => write!(f, "css {s:?}"),
        }
    }
}
