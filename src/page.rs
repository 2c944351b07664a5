//! Headless model of the dashboard markup.
//!
//! Holds exactly the elements and attributes the controllers read or write:
//! nav links, content sections, stat cards, quick-action buttons, the
//! notification stack, live regions, focus and history.

use crate::notifications::NotificationKind;
use crate::scheduler::TimerId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_SECTION: &str = "dashboard";

const SECTIONS: [(&str, &str); 5] = [
    ("dashboard", "Dashboard"),
    ("prenotazioni", "Prenotazioni"),
    ("camere", "Camere"),
    ("pulizie", "Pulizie"),
    ("ospiti", "Ospiti"),
];

const STAT_CARDS: [(&str, &str); 4] = [
    ("Camere Occupate", "Camere attualmente occupate"),
    ("Check-in Oggi", "Arrivi previsti per oggi"),
    ("Camere da Pulire", "Camere in attesa di pulizia"),
    ("Incasso Oggi", "Incasso della giornata"),
];

pub const QUICK_ACTION_LABELS: [&str; 4] = [
    "Nuova Prenotazione",
    "Check-in Ospite",
    "Check-out Ospite",
    "Manutenzione",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

/// Element an event was dispatched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
pub enum Target {
    MobileMenu,
    Navbar,
    NavLink(usize),
    ActionButton(usize),
    Notification(NodeId),
    StatCard(usize),
    Content,
}

impl Target {
    pub fn is_inside_navbar(self) -> bool {
        matches!(self, Self::MobileMenu | Self::Navbar | Self::NavLink(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuToggle {
    pub active: bool,
    pub aria_expanded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavLink {
    pub href: String,
    pub label: String,
    pub active: bool,
}

impl NavLink {
    /// Section id the link points at, without the leading `#`.
    pub fn target_section(&self) -> &str {
        self.href.strip_prefix('#').unwrap_or(&self.href)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    pub text: String,
    pub tabindex: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub heading: Option<Heading>,
    pub active: bool,
    pub opacity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatCard {
    pub label: String,
    pub value: String,
    pub tooltip: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonContent {
    pub text: String,
    pub html: String,
}

impl ButtonContent {
    pub fn plain(text: &str) -> Self {
        Self {
            text: text.to_owned(),
            html: text.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionButton {
    pub content: ButtonContent,
    pub original: Option<ButtonContent>,
    pub disabled: bool,
}

impl ActionButton {
    pub fn label(&self) -> &str {
        self.content.text.trim()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationNode {
    pub id: NodeId,
    pub message: String,
    pub kind: NotificationKind,
    /// Exit animation running; removal is already scheduled.
    pub leaving: bool,
    #[serde(skip)]
    pub auto_dismiss: Option<TimerId>,
    #[serde(skip)]
    pub exit: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveRegion {
    pub id: NodeId,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tooltip {
    pub target: Target,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "target", rename_all = "snake_case")]
pub enum Focus {
    #[default]
    None,
    NavLink(usize),
    Heading(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub pathname: String,
    pub hash: String,
}

impl Location {
    pub fn parse(url: &str) -> Self {
        let (path, hash) = match url.find('#') {
            Some(at) => (&url[..at], &url[at..]),
            None => (url, ""),
        };
        Self {
            pathname: if path.is_empty() { "/".to_owned() } else { path.to_owned() },
            hash: if hash == "#" { String::new() } else { hash.to_owned() },
        }
    }

    /// Pathname followed by the fragment, e.g. `/#camere`.
    pub fn path(&self) -> String {
        format!("{}{}", self.pathname, self.hash)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryState {
    pub section: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub url: String,
    pub state: Option<HistoryState>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    pub entries: Vec<HistoryEntry>,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub menu_toggle: Option<MenuToggle>,
    pub nav_menu_open: bool,
    pub nav_links: Vec<NavLink>,
    pub sections: Vec<Section>,
    pub stat_cards: Vec<StatCard>,
    pub datetime: Option<String>,
    pub action_buttons: Vec<ActionButton>,
    pub notifications: Option<Vec<NotificationNode>>,
    pub live_regions: Vec<LiveRegion>,
    pub tooltip: Option<Tooltip>,
    pub scroll_locked: bool,
    pub focus: Focus,
    pub viewport_width: u32,
    pub hidden: bool,
    pub location: Location,
    pub history: History,
    next_node: u64,
}

impl Page {
    /// The stock dashboard markup, loaded at `url`.
    pub fn hotel_dashboard(url: &str, viewport_width: u32) -> Self {
        let sections = SECTIONS
            .iter()
            .map(|(id, title)| Section {
                id: (*id).to_owned(),
                heading: Some(Heading {
                    text: (*title).to_owned(),
                    tabindex: None,
                }),
                active: *id == DEFAULT_SECTION,
                opacity: 1.0,
            })
            .collect();
        let nav_links = SECTIONS
            .iter()
            .map(|(id, title)| NavLink {
                href: format!("#{id}"),
                label: (*title).to_owned(),
                active: *id == DEFAULT_SECTION,
            })
            .collect();
        let stat_cards = STAT_CARDS
            .iter()
            .map(|(label, tooltip)| StatCard {
                label: (*label).to_owned(),
                value: String::new(),
                tooltip: Some((*tooltip).to_owned()),
            })
            .collect();
        let action_buttons = QUICK_ACTION_LABELS
            .iter()
            .map(|label| ActionButton {
                content: ButtonContent::plain(label),
                original: None,
                disabled: false,
            })
            .collect();

        let location = Location::parse(url);
        let history = History {
            entries: vec![HistoryEntry {
                url: location.path(),
                state: None,
            }],
            index: 0,
        };

        Self {
            menu_toggle: Some(MenuToggle {
                active: false,
                aria_expanded: false,
            }),
            nav_menu_open: false,
            nav_links,
            sections,
            stat_cards,
            datetime: Some(String::new()),
            action_buttons,
            notifications: None,
            live_regions: Vec::new(),
            tooltip: None,
            scroll_locked: false,
            focus: Focus::None,
            viewport_width,
            hidden: false,
            location,
            history,
            next_node: 1,
        }
    }

    pub fn allocate_node(&mut self) -> NodeId {
        let id = NodeId(self.next_node);
        self.next_node += 1;
        id
    }

    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.id == id)
    }

    pub fn section_mut(&mut self, id: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|section| section.id == id)
    }

    pub fn active_sections(&self) -> Vec<&str> {
        self.sections
            .iter()
            .filter(|section| section.active)
            .map(|section| section.id.as_str())
            .collect()
    }

    pub fn active_links(&self) -> Vec<&str> {
        self.nav_links
            .iter()
            .filter(|link| link.active)
            .map(|link| link.href.as_str())
            .collect()
    }

    pub fn notification(&self, id: NodeId) -> Option<&NotificationNode> {
        self.notifications
            .as_ref()
            .and_then(|stack| stack.iter().find(|node| node.id == id))
    }

    pub fn notification_mut(&mut self, id: NodeId) -> Option<&mut NotificationNode> {
        self.notifications
            .as_mut()
            .and_then(|stack| stack.iter_mut().find(|node| node.id == id))
    }

    /// Whether `target` names an element present on the page. Notifications
    /// always count, so repeated clicks on a dismissed one stay harmless.
    pub fn has_target(&self, target: Target) -> bool {
        match target {
            Target::MobileMenu => self.menu_toggle.is_some(),
            Target::NavLink(index) => index < self.nav_links.len(),
            Target::ActionButton(index) => index < self.action_buttons.len(),
            Target::StatCard(index) => index < self.stat_cards.len(),
            Target::Navbar | Target::Content | Target::Notification(_) => true,
        }
    }

    pub fn notification_count(&self) -> usize {
        self.notifications.as_ref().map_or(0, Vec::len)
    }

    /// Fragment without `#`, or the default section when there is none.
    pub fn section_from_url(&self) -> String {
        match self.location.hash.strip_prefix('#') {
            Some(hash) if !hash.is_empty() => hash.to_owned(),
            _ => DEFAULT_SECTION.to_owned(),
        }
    }

    pub fn push_state(&mut self, state: HistoryState, url: &str) {
        self.history.entries.truncate(self.history.index + 1);
        self.history.entries.push(HistoryEntry {
            url: url.to_owned(),
            state: Some(state),
        });
        self.history.index = self.history.entries.len() - 1;
        self.location = Location::parse(url);
    }

    /// Steps back one entry. Returns the entry's state when a move happened.
    pub fn history_back(&mut self) -> Option<Option<HistoryState>> {
        if self.history.index == 0 {
            return None;
        }
        self.history.index -= 1;
        Some(self.enter_history_entry())
    }

    pub fn history_forward(&mut self) -> Option<Option<HistoryState>> {
        if self.history.index + 1 >= self.history.entries.len() {
            return None;
        }
        self.history.index += 1;
        Some(self.enter_history_entry())
    }

    fn enter_history_entry(&mut self) -> Option<HistoryState> {
        let entry = &self.history.entries[self.history.index];
        let state = entry.state.clone();
        self.location = Location::parse(&entry.url);
        state
    }
}
