//! Application state controller: owns the hotel data, keeps the stat cards
//! and clock current, and answers quick actions and shortcuts.

use crate::config::Timings;
use crate::errors::StorageError;
use crate::models::{AppData, StatsPatch};
use crate::navigation::NavigationManager;
use crate::notifications::{self, NotificationKind};
use crate::page::{ActionButton, ButtonContent, Target, Tooltip};
use crate::runtime::{Host, KeyEvent, Task};
use crate::sample;
use crate::scheduler::TimerId;
use crate::storage::{STORAGE_KEY, Storage};
use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use tracing::{debug, error, info, warn};

pub const LOADING_TEXT: &str = "Caricamento...";
pub const SAVE_ERROR_MESSAGE: &str = "Errore nel salvataggio dati";
pub const SAVED_MESSAGE: &str = "Dati salvati";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuickAction {
    NewBooking,
    CheckinGuest,
    CheckoutGuest,
    Maintenance,
    Unknown,
}

impl QuickAction {
    /// Maps a button's visible label to its action.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Nuova Prenotazione" => Self::NewBooking,
            "Check-in Ospite" => Self::CheckinGuest,
            "Check-out Ospite" => Self::CheckoutGuest,
            "Manutenzione" => Self::Maintenance,
            _ => Self::Unknown,
        }
    }

    pub fn notice(self) -> (&'static str, NotificationKind) {
        match self {
            Self::NewBooking => ("Funzione prenotazione in sviluppo", NotificationKind::Info),
            Self::CheckinGuest => ("Funzione check-in in sviluppo", NotificationKind::Info),
            Self::CheckoutGuest => ("Funzione check-out in sviluppo", NotificationKind::Info),
            Self::Maintenance => ("Funzione manutenzione in sviluppo", NotificationKind::Info),
            Self::Unknown => ("Azione non riconosciuta", NotificationKind::Warning),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppTask {
    ClockTick,
    QuickActionDone { button: usize, action: QuickAction },
}

#[derive(Debug)]
pub struct HotelApp {
    data: AppData,
    storage: Box<dyn Storage>,
    timings: Timings,
    seed: Option<u64>,
    clock_timer: Option<TimerId>,
    action_timers: Vec<TimerId>,
    listening: bool,
}

impl HotelApp {
    /// Loads saved state (or sample data), renders it, starts the clock and
    /// prepares the buttons and notification container.
    pub fn new(
        host: &mut Host<'_>,
        storage: Box<dyn Storage>,
        timings: Timings,
        seed: Option<u64>,
    ) -> Self {
        let mut app = Self {
            data: AppData::default(),
            storage,
            timings,
            seed,
            clock_timer: None,
            action_timers: Vec::new(),
            listening: true,
        };
        app.load_data(host);
        app.setup_periodic_updates(host);
        app.initialize_components(host);
        notifications::ensure_container(host);
        info!(rooms = app.data.rooms.len(), "hotel app ready");
        app
    }

    pub fn data(&self) -> &AppData {
        &self.data
    }

    pub fn snapshot(&self) -> AppData {
        self.data.clone()
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn clock_timer(&self) -> Option<TimerId> {
        self.clock_timer
    }

    fn load_data(&mut self, host: &mut Host<'_>) {
        match self.storage.get_item(STORAGE_KEY) {
            Ok(Some(raw)) => match AppData::from_saved(&raw) {
                Ok(data) => {
                    info!("loaded saved dashboard state");
                    self.data = data;
                }
                Err(err) => {
                    warn!("error loading saved data: {err}");
                    self.initialize_default_data(host);
                }
            },
            Ok(None) => self.initialize_default_data(host),
            Err(err) => {
                warn!("error reading storage: {err}");
                self.initialize_default_data(host);
            }
        }

        self.update_ui(host);
    }

    fn initialize_default_data(&mut self, host: &Host<'_>) {
        let generated = sample::generate(host.scheduler.now(), self.seed);
        info!(seed = ?self.seed, "generated sample data");
        self.data.rooms = generated.rooms;
        self.data.bookings = generated.bookings;
        self.data.guests = generated.guests;
        self.data.cleaning_tasks = generated.cleaning_tasks;
    }

    /// Writes the whole state under the storage key. A failure is logged and
    /// shown to the user; it is not retried.
    pub fn save_data(&mut self, host: &mut Host<'_>) -> Result<(), StorageError> {
        let result = serde_json::to_string(&self.data)
            .map_err(StorageError::from)
            .and_then(|payload| self.storage.set_item(STORAGE_KEY, &payload));
        if let Err(err) = &result {
            error!("error saving data: {err}");
            self.notify(host, SAVE_ERROR_MESSAGE, NotificationKind::Error);
        }
        result
    }

    /// Merges `patch` into the stats, re-renders and persists.
    pub fn update_stats(
        &mut self,
        host: &mut Host<'_>,
        patch: &StatsPatch,
    ) -> Result<(), StorageError> {
        self.data.stats.merge(patch);
        self.update_ui(host);
        self.save_data(host)
    }

    pub fn update_ui(&mut self, host: &mut Host<'_>) {
        self.update_stat_cards(host);
        self.update_datetime(host);
    }

    fn update_stat_cards(&self, host: &mut Host<'_>) {
        let stats = &self.data.stats;
        let values = [
            stats.occupied_rooms.to_string(),
            stats.checkins_today.to_string(),
            stats.rooms_to_clean.to_string(),
            format_revenue(stats.today_revenue),
        ];
        for (card, value) in host.page.stat_cards.iter_mut().zip(values) {
            card.value = value;
        }
    }

    fn update_datetime(&self, host: &mut Host<'_>) {
        let now = host.scheduler.now().with_timezone(&Local);
        if let Some(datetime) = host.page.datetime.as_mut() {
            *datetime = format_datetime(&now);
        }
    }

    fn initialize_components(&mut self, host: &mut Host<'_>) {
        for button in &mut host.page.action_buttons {
            button.original = Some(button.content.clone());
        }
    }

    fn setup_periodic_updates(&mut self, host: &mut Host<'_>) {
        if let Some(timer) = self.clock_timer.take() {
            host.scheduler.cancel(timer);
        }
        self.clock_timer = Some(
            host.scheduler
                .schedule_repeating(self.timings.clock_period, Task::App(AppTask::ClockTick)),
        );
    }

    fn pause_updates(&mut self, host: &mut Host<'_>) {
        if let Some(timer) = self.clock_timer.take() {
            host.scheduler.cancel(timer);
            debug!("clock paused");
        }
    }

    pub fn handle_quick_action(&mut self, host: &mut Host<'_>, index: usize) {
        if !self.listening {
            return;
        }
        let Some(button) = host.page.action_buttons.get_mut(index) else {
            debug!(index, "click on unknown action button");
            return;
        };
        if button.disabled {
            return;
        }
        let action = QuickAction::from_label(button.label());
        set_button_loading(button, true);
        let timer = host.scheduler.schedule(
            self.timings.quick_action_delay,
            Task::App(AppTask::QuickActionDone {
                button: index,
                action,
            }),
        );
        self.action_timers
            .retain(|pending| host.scheduler.is_pending(*pending));
        self.action_timers.push(timer);
    }

    pub fn execute_quick_action(&mut self, host: &mut Host<'_>, action: QuickAction) {
        let (message, kind) = action.notice();
        self.notify(host, message, kind);
    }

    fn notify(&self, host: &mut Host<'_>, message: &str, kind: NotificationKind) {
        notifications::show(
            host,
            message,
            kind,
            self.timings.notification_duration,
            self.timings.notification_exit,
        );
    }

    /// Ctrl/Cmd shortcuts. Returns whether the key was consumed.
    pub fn handle_keydown(
        &mut self,
        host: &mut Host<'_>,
        nav: &mut NavigationManager,
        key: &KeyEvent,
    ) -> bool {
        if !self.listening || !(key.ctrl || key.meta) {
            return false;
        }
        match key.key.as_str() {
            "1" => {
                nav.open_section(host, "dashboard");
            }
            "2" => {
                nav.open_section(host, "prenotazioni");
            }
            "3" => {
                nav.open_section(host, "camere");
            }
            "s" => {
                if self.save_data(host).is_ok() {
                    self.notify(host, SAVED_MESSAGE, NotificationKind::Success);
                }
            }
            _ => return false,
        }
        true
    }

    /// Hidden pages stop the clock and flush state; visible pages restart it.
    pub fn on_visibility_change(&mut self, host: &mut Host<'_>, hidden: bool) {
        host.page.hidden = hidden;
        if !self.listening {
            return;
        }
        if hidden {
            self.pause_updates(host);
            let _ = self.save_data(host);
        } else {
            self.update_datetime(host);
            self.setup_periodic_updates(host);
            debug!("clock resumed");
        }
    }

    pub fn on_before_unload(&mut self, host: &mut Host<'_>) {
        if self.listening {
            let _ = self.save_data(host);
        }
    }

    pub fn on_mouse_enter(&mut self, host: &mut Host<'_>, target: Target) {
        if !self.listening {
            return;
        }
        let text = match target {
            Target::StatCard(index) => host
                .page
                .stat_cards
                .get(index)
                .and_then(|card| card.tooltip.clone()),
            _ => None,
        };
        if let Some(text) = text {
            host.page.tooltip = Some(Tooltip { target, text });
        }
    }

    pub fn on_mouse_leave(&mut self, host: &mut Host<'_>, target: Target) {
        if host.page.tooltip.as_ref().is_some_and(|tip| tip.target == target) {
            host.page.tooltip = None;
        }
    }

    pub fn handle(&mut self, host: &mut Host<'_>, task: AppTask) {
        if !self.listening {
            return;
        }
        match task {
            AppTask::ClockTick => self.update_datetime(host),
            AppTask::QuickActionDone { button, action } => {
                self.execute_quick_action(host, action);
                if let Some(button) = host.page.action_buttons.get_mut(button) {
                    set_button_loading(button, false);
                }
            }
        }
    }

    /// Cancels the clock and pending quick actions, then flushes state. Later
    /// events and timers are ignored.
    pub fn destroy(&mut self, host: &mut Host<'_>) {
        if !self.listening {
            return;
        }
        self.pause_updates(host);
        for timer in self.action_timers.drain(..) {
            host.scheduler.cancel(timer);
        }
        for button in &mut host.page.action_buttons {
            set_button_loading(button, false);
        }
        self.listening = false;
        let _ = self.save_data(host);
        info!("hotel app destroyed");
    }
}

fn set_button_loading(button: &mut ActionButton, loading: bool) {
    if loading {
        button.disabled = true;
        button.content = ButtonContent {
            text: LOADING_TEXT.to_owned(),
            html: format!(r#"<div class="loading"></div> {LOADING_TEXT}"#),
        };
    } else {
        button.disabled = false;
        if let Some(original) = &button.original {
            button.content = original.clone();
        }
    }
}

/// Euro amount with `.` thousands separators, e.g. `€2.450`.
pub fn format_revenue(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    format!("€{grouped}")
}

/// `d/m/yyyy - HH:MM:SS`, the Italian short date and time.
pub fn format_datetime<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    at.format("%-d/%-m/%Y - %H:%M:%S").to_string()
}
