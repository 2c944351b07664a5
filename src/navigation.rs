//! Section switching, mobile menu and keyboard navigation.

use crate::config::Timings;
use crate::page::{DEFAULT_SECTION, Focus, HistoryState, LiveRegion, NodeId, Page, Target};
use crate::runtime::{Host, KeyEvent, Task};
use crate::scheduler::TimerId;
use tracing::{debug, info, warn};

const MENU_OPEN_ANNOUNCEMENT: &str = "Menu aperto";
const MENU_CLOSED_ANNOUNCEMENT: &str = "Menu chiuso";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavTask {
    HideSections,
    ShowSection(String),
    FadeIn(String),
    ReleaseFocus(String),
    RemoveAnnouncement(NodeId),
    ResizeSettled,
    OrientationSettled,
}

#[derive(Debug)]
pub struct NavigationManager {
    timings: Timings,
    // Timers of the section transition in flight; a new request cancels them.
    transition: Vec<TimerId>,
    resize_timer: Option<TimerId>,
}

impl NavigationManager {
    pub fn new(timings: Timings) -> Self {
        Self {
            timings,
            transition: Vec::new(),
            resize_timer: None,
        }
    }

    pub fn toggle_mobile_menu(&mut self, host: &mut Host<'_>) {
        let open = !host.page.nav_menu_open;
        let Some(toggle) = host.page.menu_toggle.as_mut() else {
            debug!("no mobile menu toggle on page");
            return;
        };
        toggle.active = open;
        toggle.aria_expanded = open;
        host.page.nav_menu_open = open;
        host.page.scroll_locked = open;
        self.announce_menu_state(host, open);
    }

    pub fn close_mobile_menu(&mut self, host: &mut Host<'_>) {
        host.page.nav_menu_open = false;
        if let Some(toggle) = host.page.menu_toggle.as_mut() {
            toggle.active = false;
            toggle.aria_expanded = false;
        }
        host.page.scroll_locked = false;
    }

    fn announce_menu_state(&mut self, host: &mut Host<'_>, open: bool) {
        let id = host.page.allocate_node();
        let text = if open {
            MENU_OPEN_ANNOUNCEMENT
        } else {
            MENU_CLOSED_ANNOUNCEMENT
        };
        host.page.live_regions.push(LiveRegion {
            id,
            text: text.to_owned(),
        });
        host.scheduler.schedule(
            self.timings.announcement,
            Task::Nav(NavTask::RemoveAnnouncement(id)),
        );
    }

    pub fn is_menu_open(&self, page: &Page) -> bool {
        page.nav_menu_open
    }

    /// Clicks anywhere outside the navbar close an open menu.
    pub fn on_document_click(&mut self, host: &mut Host<'_>, target: Target) {
        if !target.is_inside_navbar() && host.page.nav_menu_open {
            self.close_mobile_menu(host);
        }
    }

    pub fn on_document_keydown(&mut self, host: &mut Host<'_>, key: &KeyEvent) {
        if key.key == "Escape" && host.page.nav_menu_open {
            self.close_mobile_menu(host);
        }
    }

    pub fn on_link_click(&mut self, host: &mut Host<'_>, index: usize) {
        let Some(link) = host.page.nav_links.get(index) else {
            debug!(index, "click on unknown nav link");
            return;
        };
        let section = link.target_section().to_owned();
        self.navigate_to_section(host, &section);

        if host.page.viewport_width <= self.timings.mobile_breakpoint {
            self.close_mobile_menu(host);
        }
    }

    pub fn open_section(&mut self, host: &mut Host<'_>, section_id: &str) -> bool {
        self.navigate_to_section(host, section_id)
    }

    /// Starts the fade transition to `section_id`. Unknown ids leave the
    /// current section in place and return `false`.
    pub fn navigate_to_section(&mut self, host: &mut Host<'_>, section_id: &str) -> bool {
        if host.page.section(section_id).is_none() {
            warn!(section = section_id, "navigation to unknown section ignored");
            return false;
        }
        info!(section = section_id, "navigating");

        for timer in self.transition.drain(..) {
            host.scheduler.cancel(timer);
        }
        for section in &mut host.page.sections {
            section.opacity = 0.0;
        }

        let hide = host.scheduler.schedule(
            self.timings.section_fade_out,
            Task::Nav(NavTask::HideSections),
        );
        let show = host.scheduler.schedule(
            self.timings.section_show,
            Task::Nav(NavTask::ShowSection(section_id.to_owned())),
        );
        self.transition.extend([hide, show]);
        true
    }

    fn show_section(&mut self, host: &mut Host<'_>, section_id: &str) {
        if host.page.section(section_id).is_none() {
            return;
        }
        for section in &mut host.page.sections {
            section.active = section.id == section_id;
        }
        let fade_in = host.scheduler.schedule(
            self.timings.section_fade_in,
            Task::Nav(NavTask::FadeIn(section_id.to_owned())),
        );
        self.transition.push(fade_in);

        update_history(host, section_id);
        update_active_nav_link(host, section_id);
        self.manage_focus(host, section_id);
    }

    fn manage_focus(&mut self, host: &mut Host<'_>, section_id: &str) {
        let Some(heading) = host
            .page
            .section_mut(section_id)
            .and_then(|section| section.heading.as_mut())
        else {
            return;
        };
        heading.tabindex = Some(-1);
        host.page.focus = Focus::Heading(section_id.to_owned());
        host.scheduler.schedule(
            self.timings.focus_release,
            Task::Nav(NavTask::ReleaseFocus(section_id.to_owned())),
        );
    }

    /// Back/forward: the section recorded in history state, else the URL
    /// fragment, else the dashboard.
    pub fn on_popstate(&mut self, host: &mut Host<'_>, state: Option<HistoryState>) {
        let section = state
            .map(|state| state.section)
            .unwrap_or_else(|| host.page.section_from_url());
        self.navigate_to_section(host, &section);
    }

    /// Arrow/Home/End focus movement across nav links. Returns whether the
    /// key was consumed.
    pub fn on_link_keydown(&mut self, host: &mut Host<'_>, index: usize, key: &str) -> bool {
        let count = host.page.nav_links.len();
        if count == 0 || index >= count {
            return false;
        }
        let target = match key {
            "ArrowRight" | "ArrowDown" => (index + 1) % count,
            "ArrowLeft" | "ArrowUp" => {
                if index == 0 {
                    count - 1
                } else {
                    index - 1
                }
            }
            "Home" => 0,
            "End" => count - 1,
            _ => return false,
        };
        host.page.focus = Focus::NavLink(target);
        true
    }

    pub fn on_resize(&mut self, host: &mut Host<'_>, width: u32) {
        host.page.viewport_width = width;
        if let Some(timer) = self.resize_timer.take() {
            host.scheduler.cancel(timer);
        }
        self.resize_timer = Some(host.scheduler.schedule(
            self.timings.resize_debounce,
            Task::Nav(NavTask::ResizeSettled),
        ));
    }

    pub fn on_orientation_change(&mut self, host: &mut Host<'_>, width: u32) {
        host.page.viewport_width = width;
        host.scheduler.schedule(
            self.timings.orientation_settle,
            Task::Nav(NavTask::OrientationSettled),
        );
    }

    fn is_desktop(&self, host: &Host<'_>) -> bool {
        host.page.viewport_width > self.timings.mobile_breakpoint
    }

    /// Id of the active section, or the dashboard when none is active.
    pub fn current_section(&self, page: &Page) -> String {
        page.sections
            .iter()
            .find(|section| section.active)
            .map_or_else(|| DEFAULT_SECTION.to_owned(), |section| section.id.clone())
    }

    pub fn handle(&mut self, host: &mut Host<'_>, task: NavTask) {
        match task {
            NavTask::HideSections => {
                for section in &mut host.page.sections {
                    section.active = false;
                }
            }
            NavTask::ShowSection(id) => self.show_section(host, &id),
            NavTask::FadeIn(id) => {
                if let Some(section) = host.page.section_mut(&id) {
                    section.opacity = 1.0;
                }
            }
            NavTask::ReleaseFocus(id) => {
                if let Some(heading) = host
                    .page
                    .section_mut(&id)
                    .and_then(|section| section.heading.as_mut())
                {
                    heading.tabindex = None;
                }
            }
            NavTask::RemoveAnnouncement(id) => {
                host.page.live_regions.retain(|region| region.id != id);
            }
            NavTask::ResizeSettled => {
                self.resize_timer = None;
                if self.is_desktop(host) {
                    if host.page.nav_menu_open {
                        self.close_mobile_menu(host);
                    }
                    host.page.scroll_locked = false;
                }
            }
            NavTask::OrientationSettled => {
                if self.is_desktop(host) && host.page.nav_menu_open {
                    self.close_mobile_menu(host);
                }
            }
        }
    }
}

fn update_history(host: &mut Host<'_>, section_id: &str) {
    let path = if section_id == DEFAULT_SECTION {
        "/".to_owned()
    } else {
        format!("/#{section_id}")
    };
    if host.page.location.path() != path {
        host.page.push_state(
            HistoryState {
                section: section_id.to_owned(),
            },
            &path,
        );
    }
}

fn update_active_nav_link(host: &mut Host<'_>, section_id: &str) {
    for link in &mut host.page.nav_links {
        link.active = link.target_section() == section_id;
    }
}
