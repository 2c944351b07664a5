//! Wires the page, the scheduler and both controllers together and routes
//! browser events and fired timers to them.

use crate::config::Timings;
use crate::errors::StorageError;
use crate::hotel::{AppTask, HotelApp};
use crate::models::{AppData, Stats, StatsPatch};
use crate::navigation::{NavTask, NavigationManager};
use crate::notifications::{self, NoticeTask};
use crate::page::{Page, Target};
use crate::scheduler::Scheduler;
use crate::storage::Storage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Page and timer queue, lent to a controller for the length of one call.
#[derive(Debug)]
pub struct Host<'a> {
    pub page: &'a mut Page,
    pub scheduler: &'a mut Scheduler<Task>,
}

impl<'a> Host<'a> {
    pub fn new(page: &'a mut Page, scheduler: &'a mut Scheduler<Task>) -> Self {
        Self { page, scheduler }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    App(AppTask),
    Nav(NavTask),
    Notice(NoticeTask),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: String,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub meta: bool,
}

impl KeyEvent {
    pub fn plain(key: &str) -> Self {
        Self {
            key: key.to_owned(),
            ..Self::default()
        }
    }

    pub fn ctrl(key: &str) -> Self {
        Self {
            key: key.to_owned(),
            ctrl: true,
            meta: false,
        }
    }
}

/// Browser events the dashboard reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    Click {
        target: Target,
    },
    KeyDown {
        #[serde(default)]
        target: Option<Target>,
        key: KeyEvent,
    },
    MouseEnter {
        target: Target,
    },
    MouseLeave {
        target: Target,
    },
    Resize {
        width: u32,
    },
    OrientationChange {
        width: u32,
    },
    VisibilityChange {
        hidden: bool,
    },
    HistoryBack,
    HistoryForward,
    BeforeUnload,
}

#[derive(Debug)]
pub struct Dashboard {
    page: Page,
    scheduler: Scheduler<Task>,
    app: HotelApp,
    nav: NavigationManager,
}

impl Dashboard {
    /// Builds both controllers against `page` and shows the section named
    /// by the page URL.
    pub fn start(
        mut page: Page,
        storage: Box<dyn Storage>,
        timings: Timings,
        seed: Option<u64>,
        origin: DateTime<Utc>,
    ) -> Self {
        let mut scheduler = Scheduler::new(origin);
        let mut nav = NavigationManager::new(timings);
        let app = {
            let mut host = Host::new(&mut page, &mut scheduler);
            let app = HotelApp::new(&mut host, storage, timings, seed);
            let initial = host.page.section_from_url();
            nav.navigate_to_section(&mut host, &initial);
            app
        };

        Self {
            page,
            scheduler,
            app,
            nav,
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn app(&self) -> &HotelApp {
        &self.app
    }

    pub fn nav(&self) -> &NavigationManager {
        &self.nav
    }

    pub fn scheduler(&self) -> &Scheduler<Task> {
        &self.scheduler
    }

    pub fn snapshot(&self) -> AppData {
        self.app.snapshot()
    }

    pub fn current_section(&self) -> String {
        self.nav.current_section(&self.page)
    }

    pub fn is_menu_open(&self) -> bool {
        self.nav.is_menu_open(&self.page)
    }

    pub fn open_section(&mut self, section_id: &str) -> bool {
        let mut host = Host::new(&mut self.page, &mut self.scheduler);
        self.nav.open_section(&mut host, section_id)
    }

    pub fn update_stats(&mut self, patch: &StatsPatch) -> Result<Stats, StorageError> {
        let mut host = Host::new(&mut self.page, &mut self.scheduler);
        self.app.update_stats(&mut host, patch)?;
        Ok(self.app.data().stats.clone())
    }

    pub fn save(&mut self) -> Result<(), StorageError> {
        let mut host = Host::new(&mut self.page, &mut self.scheduler);
        self.app.save_data(&mut host)
    }

    pub fn dispatch(&mut self, event: Event) {
        let mut host = Host::new(&mut self.page, &mut self.scheduler);
        match event {
            Event::Click { target } => {
                match target {
                    Target::MobileMenu => self.nav.toggle_mobile_menu(&mut host),
                    Target::NavLink(index) => self.nav.on_link_click(&mut host, index),
                    Target::ActionButton(index) => self.app.handle_quick_action(&mut host, index),
                    Target::Notification(id) => {
                        notifications::dismiss(&mut host, id);
                    }
                    Target::Navbar | Target::StatCard(_) | Target::Content => {}
                }
                self.nav.on_document_click(&mut host, target);
            }
            Event::KeyDown { target, key } => {
                if let Some(Target::NavLink(index)) = target {
                    self.nav.on_link_keydown(&mut host, index, &key.key);
                }
                self.app.handle_keydown(&mut host, &mut self.nav, &key);
                self.nav.on_document_keydown(&mut host, &key);
            }
            Event::MouseEnter { target } => self.app.on_mouse_enter(&mut host, target),
            Event::MouseLeave { target } => self.app.on_mouse_leave(&mut host, target),
            Event::Resize { width } => self.nav.on_resize(&mut host, width),
            Event::OrientationChange { width } => self.nav.on_orientation_change(&mut host, width),
            Event::VisibilityChange { hidden } => self.app.on_visibility_change(&mut host, hidden),
            Event::HistoryBack => {
                if let Some(state) = host.page.history_back() {
                    self.nav.on_popstate(&mut host, state);
                }
            }
            Event::HistoryForward => {
                if let Some(state) = host.page.history_forward() {
                    self.nav.on_popstate(&mut host, state);
                }
            }
            Event::BeforeUnload => self.app.on_before_unload(&mut host),
        }
    }

    /// Moves virtual time forward, running every task that falls due,
    /// including ones scheduled by tasks fired along the way.
    pub fn advance(&mut self, by: Duration) {
        let target = self.scheduler.elapsed() + by;
        while let Some((timer, task)) = self.scheduler.pop_due(target) {
            debug!(?timer, ?task, "timer fired");
            let mut host = Host::new(&mut self.page, &mut self.scheduler);
            match task {
                Task::App(task) => self.app.handle(&mut host, task),
                Task::Nav(task) => self.nav.handle(&mut host, task),
                Task::Notice(task) => notifications::handle(&mut host, task),
            }
        }
        self.scheduler.settle(target);
    }

    /// Tears the application controller down: clock stopped, state flushed.
    pub fn shutdown(&mut self) {
        let mut host = Host::new(&mut self.page, &mut self.scheduler);
        self.app.destroy(&mut host);
    }
}
