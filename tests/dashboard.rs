use chrono::{DateTime, Local, Utc};
use hotel_dashboard::config::Timings;
use hotel_dashboard::hotel::{format_datetime, LOADING_TEXT, SAVED_MESSAGE, SAVE_ERROR_MESSAGE};
use hotel_dashboard::models::{AppData, RoomType, StatsPatch};
use hotel_dashboard::notifications::NotificationKind;
use hotel_dashboard::page::{ButtonContent, Focus, NodeId, Page, Target};
use hotel_dashboard::runtime::KeyEvent;
use hotel_dashboard::storage::STORAGE_KEY;
use hotel_dashboard::{Dashboard, Event, FileStorage, MemoryStorage, Storage};
use std::time::Duration;

const SEED: u64 = 42;

fn origin() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-03-14T08:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

fn start_on(url: &str, storage: &MemoryStorage) -> Dashboard {
    Dashboard::start(
        Page::hotel_dashboard(url, 1280),
        Box::new(storage.clone()),
        Timings::default(),
        Some(SEED),
        origin(),
    )
}

fn start(storage: &MemoryStorage) -> Dashboard {
    start_on("/", storage)
}

/// Starts a dashboard and lets the initial section transition finish.
fn settled(storage: &MemoryStorage) -> Dashboard {
    let mut dashboard = start(storage);
    dashboard.advance(Duration::from_secs(1));
    dashboard
}

fn click(dashboard: &mut Dashboard, target: Target) {
    dashboard.dispatch(Event::Click { target });
}

fn key(dashboard: &mut Dashboard, key: KeyEvent) {
    dashboard.dispatch(Event::KeyDown { target: None, key });
}

fn messages(dashboard: &Dashboard) -> Vec<(String, NotificationKind)> {
    dashboard
        .page()
        .notifications
        .iter()
        .flatten()
        .map(|node| (node.message.clone(), node.kind))
        .collect()
}

fn last_notification(dashboard: &Dashboard) -> NodeId {
    dashboard
        .page()
        .notifications
        .as_ref()
        .and_then(|stack| stack.last())
        .map(|node| node.id)
        .unwrap()
}

#[test]
fn fresh_start_generates_fifty_rooms_and_renders_stats() {
    let storage = MemoryStorage::new();
    let dashboard = settled(&storage);
    let data = dashboard.snapshot();

    assert_eq!(data.rooms.len(), 50);
    for room in &data.rooms {
        assert!((101..=150).contains(&room.number));
        let expected = match room.number {
            101..=120 => RoomType::Standard,
            121..=140 => RoomType::Deluxe,
            _ => RoomType::Suite,
        };
        assert_eq!(room.room_type, expected);
    }
    assert_eq!(data.bookings.len(), 2);
    assert_eq!(data.guests.len(), 2);
    assert_eq!(data.cleaning_tasks.len(), 2);

    let values: Vec<&str> = dashboard
        .page()
        .stat_cards
        .iter()
        .map(|card| card.value.as_str())
        .collect();
    assert_eq!(values, vec!["24", "8", "12", "€2.450"]);
    assert_eq!(dashboard.current_section(), "dashboard");
    assert_eq!(dashboard.page().notification_count(), 0);
    assert!(dashboard.page().notifications.is_some());
}

#[test]
fn saved_state_survives_a_reload() {
    let storage = MemoryStorage::new();
    let mut first = settled(&storage);
    first.update_stats(&StatsPatch {
        checkins_today: Some(3),
        ..StatsPatch::default()
    })
    .unwrap();
    let saved = first.snapshot();

    let second = Dashboard::start(
        Page::hotel_dashboard("/", 1280),
        Box::new(storage.clone()),
        Timings::default(),
        // A different seed proves nothing was regenerated.
        Some(SEED + 1),
        origin(),
    );
    assert_eq!(second.snapshot(), saved);
    assert_eq!(second.page().stat_cards[1].value, "3");
}

#[test]
fn corrupt_or_non_object_storage_regenerates_sample_data() {
    for raw in ["{ not json", "[1, 2, 3]", "\"text\""] {
        let mut storage = MemoryStorage::new();
        storage.set_item(STORAGE_KEY, raw).unwrap();
        let dashboard = start(&storage);
        assert_eq!(dashboard.snapshot().rooms.len(), 50, "payload {raw}");
    }
}

#[test]
fn corrupt_data_file_is_replaced_on_next_save() {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("hotel_dashboard_corrupt_{}_{}.json", std::process::id(), nanos));
    std::fs::write(&path, b"{ nope").unwrap();

    let mut dashboard = Dashboard::start(
        Page::hotel_dashboard("/", 1280),
        Box::new(FileStorage::new(&path)),
        Timings::default(),
        Some(SEED),
        origin(),
    );
    assert_eq!(dashboard.snapshot().rooms.len(), 50);

    dashboard.save().unwrap();
    dashboard.save().unwrap();
    assert_eq!(dashboard.page().notification_count(), 0);

    let stored = FileStorage::new(&path).get_item(STORAGE_KEY).unwrap().unwrap();
    assert_eq!(AppData::from_saved(&stored).unwrap(), dashboard.snapshot());
    let _ = std::fs::remove_file(&path);
}

#[test]
fn partial_saved_state_keeps_defaults_for_missing_keys() {
    let mut storage = MemoryStorage::new();
    storage
        .set_item(
            STORAGE_KEY,
            r#"{"stats":{"occupiedRooms":5,"checkinsToday":1,"roomsToClean":2,"todayRevenue":100}}"#,
        )
        .unwrap();
    let dashboard = start(&storage);
    let data = dashboard.snapshot();

    assert_eq!(data.stats.occupied_rooms, 5);
    assert_eq!(data.rooms, AppData::default().rooms);
    assert_eq!(dashboard.page().stat_cards[3].value, "€100");
}

#[test]
fn update_stats_merges_renders_and_persists() {
    let storage = MemoryStorage::new();
    let mut dashboard = settled(&storage);

    let stats = dashboard
        .update_stats(&StatsPatch {
            today_revenue: Some(12_500),
            ..StatsPatch::default()
        })
        .unwrap();

    assert_eq!(stats.today_revenue, 12_500);
    assert_eq!(stats.occupied_rooms, 24);
    assert_eq!(dashboard.page().stat_cards[3].value, "€12.500");
    let stored = storage.get_item(STORAGE_KEY).unwrap().unwrap();
    assert_eq!(AppData::from_saved(&stored).unwrap(), dashboard.snapshot());
}

#[test]
fn storage_quota_failure_raises_error_notification() {
    let storage = MemoryStorage::with_quota(16);
    let mut dashboard = settled(&storage);

    key(&mut dashboard, KeyEvent::ctrl("s"));

    assert_eq!(
        messages(&dashboard),
        vec![(SAVE_ERROR_MESSAGE.to_owned(), NotificationKind::Error)]
    );
    assert!(dashboard.save().is_err());
    assert_eq!(storage.get_item(STORAGE_KEY).unwrap(), None);
}

#[test]
fn quick_action_shows_loading_then_notifies() {
    let storage = MemoryStorage::new();
    let mut dashboard = settled(&storage);

    click(&mut dashboard, Target::ActionButton(0));
    let button = &dashboard.page().action_buttons[0];
    assert!(button.disabled);
    assert_eq!(button.label(), LOADING_TEXT);
    assert!(button.content.html.contains(r#"class="loading""#));

    // A second click while loading is ignored.
    click(&mut dashboard, Target::ActionButton(0));

    dashboard.advance(Duration::from_millis(999));
    assert!(dashboard.page().action_buttons[0].disabled);
    assert_eq!(dashboard.page().notification_count(), 0);

    dashboard.advance(Duration::from_millis(1));
    let button = &dashboard.page().action_buttons[0];
    assert!(!button.disabled);
    assert_eq!(button.label(), "Nuova Prenotazione");
    assert_eq!(
        messages(&dashboard),
        vec![(
            "Funzione prenotazione in sviluppo".to_owned(),
            NotificationKind::Info
        )]
    );
}

#[test]
fn unknown_quick_action_warns() {
    let storage = MemoryStorage::new();
    let mut page = Page::hotel_dashboard("/", 1280);
    page.action_buttons[3].content = ButtonContent::plain("Pulizia Straordinaria");
    let mut dashboard = Dashboard::start(
        page,
        Box::new(storage),
        Timings::default(),
        Some(SEED),
        origin(),
    );

    click(&mut dashboard, Target::ActionButton(3));
    dashboard.advance(Duration::from_secs(1));

    assert_eq!(
        messages(&dashboard),
        vec![("Azione non riconosciuta".to_owned(), NotificationKind::Warning)]
    );
    assert_eq!(
        dashboard.page().action_buttons[3].label(),
        "Pulizia Straordinaria"
    );
}

#[test]
fn notifications_auto_dismiss_after_duration_and_exit() {
    let storage = MemoryStorage::new();
    let mut dashboard = settled(&storage);
    key(&mut dashboard, KeyEvent::ctrl("s"));
    let id = last_notification(&dashboard);

    dashboard.advance(Duration::from_millis(4999));
    assert!(!dashboard.page().notification(id).unwrap().leaving);
    dashboard.advance(Duration::from_millis(1));
    assert!(dashboard.page().notification(id).unwrap().leaving);
    dashboard.advance(Duration::from_millis(300));
    assert!(dashboard.page().notification(id).is_none());
}

#[test]
fn notification_exit_follows_configured_timing() {
    let storage = MemoryStorage::new();
    let timings = Timings {
        notification_exit: Duration::from_millis(600),
        ..Timings::default()
    };
    let mut dashboard = Dashboard::start(
        Page::hotel_dashboard("/", 1280),
        Box::new(storage),
        timings,
        Some(SEED),
        origin(),
    );
    dashboard.advance(Duration::from_secs(1));
    key(&mut dashboard, KeyEvent::ctrl("s"));
    let id = last_notification(&dashboard);

    click(&mut dashboard, Target::Notification(id));
    dashboard.advance(Duration::from_millis(599));
    assert!(dashboard.page().notification(id).is_some());
    dashboard.advance(Duration::from_millis(1));
    assert!(dashboard.page().notification(id).is_none());
}

#[test]
fn clicking_a_notification_removes_exactly_that_one() {
    let storage = MemoryStorage::new();
    let mut dashboard = settled(&storage);
    key(&mut dashboard, KeyEvent::ctrl("s"));
    let first = last_notification(&dashboard);
    key(&mut dashboard, KeyEvent::ctrl("s"));
    let second = last_notification(&dashboard);

    click(&mut dashboard, Target::Notification(first));
    click(&mut dashboard, Target::Notification(first));
    dashboard.advance(Duration::from_millis(300));

    assert!(dashboard.page().notification(first).is_none());
    assert!(dashboard.page().notification(second).is_some());
    assert_eq!(dashboard.page().notification_count(), 1);

    click(&mut dashboard, Target::Notification(first));
    assert_eq!(dashboard.page().notification_count(), 1);
}

#[test]
fn ctrl_shortcuts_navigate_and_save() {
    let storage = MemoryStorage::new();
    let mut dashboard = settled(&storage);

    key(&mut dashboard, KeyEvent::ctrl("2"));
    dashboard.advance(Duration::from_millis(250));
    assert_eq!(dashboard.current_section(), "prenotazioni");

    key(
        &mut dashboard,
        KeyEvent {
            key: "3".into(),
            ctrl: false,
            meta: true,
        },
    );
    dashboard.advance(Duration::from_millis(250));
    assert_eq!(dashboard.current_section(), "camere");

    key(&mut dashboard, KeyEvent::ctrl("1"));
    dashboard.advance(Duration::from_millis(250));
    assert_eq!(dashboard.current_section(), "dashboard");

    // Without the modifier the digits do nothing.
    key(&mut dashboard, KeyEvent::plain("2"));
    dashboard.advance(Duration::from_millis(250));
    assert_eq!(dashboard.current_section(), "dashboard");

    assert_eq!(storage.get_item(STORAGE_KEY).unwrap(), None);
    key(&mut dashboard, KeyEvent::ctrl("s"));
    assert!(storage.get_item(STORAGE_KEY).unwrap().is_some());
    assert_eq!(
        messages(&dashboard),
        vec![(SAVED_MESSAGE.to_owned(), NotificationKind::Success)]
    );
}

#[test]
fn nav_link_click_activates_section_link_and_focus() {
    let storage = MemoryStorage::new();
    let mut dashboard = settled(&storage);

    click(&mut dashboard, Target::NavLink(2));
    dashboard.advance(Duration::from_millis(150));
    assert!(dashboard.page().active_sections().is_empty());
    dashboard.advance(Duration::from_millis(50));

    let page = dashboard.page();
    assert_eq!(page.active_sections(), vec!["camere"]);
    assert_eq!(page.active_links(), vec!["#camere"]);
    assert_eq!(page.location.path(), "/#camere");
    assert_eq!(page.focus, Focus::Heading("camere".into()));
    assert_eq!(
        page.section("camere").unwrap().heading.as_ref().unwrap().tabindex,
        Some(-1)
    );

    dashboard.advance(Duration::from_millis(100));
    let section = dashboard.page().section("camere").unwrap();
    assert_eq!(section.opacity, 1.0);
    assert_eq!(section.heading.as_ref().unwrap().tabindex, None);
}

#[test]
fn rapid_navigation_leaves_one_active_section() {
    let storage = MemoryStorage::new();
    let mut dashboard = settled(&storage);

    click(&mut dashboard, Target::NavLink(1));
    dashboard.advance(Duration::from_millis(180));
    click(&mut dashboard, Target::NavLink(4));
    dashboard.advance(Duration::from_secs(1));

    assert_eq!(dashboard.page().active_sections(), vec!["ospiti"]);
    assert_eq!(dashboard.page().active_links(), vec!["#ospiti"]);
}

#[test]
fn history_back_and_forward_follow_visited_sections() {
    let storage = MemoryStorage::new();
    let mut dashboard = settled(&storage);

    click(&mut dashboard, Target::NavLink(2));
    dashboard.advance(Duration::from_millis(500));
    click(&mut dashboard, Target::NavLink(4));
    dashboard.advance(Duration::from_millis(500));

    dashboard.dispatch(Event::HistoryBack);
    dashboard.advance(Duration::from_millis(500));
    assert_eq!(dashboard.current_section(), "camere");

    dashboard.dispatch(Event::HistoryBack);
    dashboard.advance(Duration::from_millis(500));
    assert_eq!(dashboard.current_section(), "dashboard");

    dashboard.dispatch(Event::HistoryForward);
    dashboard.advance(Duration::from_millis(500));
    assert_eq!(dashboard.current_section(), "camere");
}

#[test]
fn start_opens_the_section_in_the_url_fragment() {
    let storage = MemoryStorage::new();
    let mut dashboard = start_on("/#pulizie", &storage);
    dashboard.advance(Duration::from_millis(250));
    assert_eq!(dashboard.page().active_sections(), vec!["pulizie"]);
    assert_eq!(dashboard.page().active_links(), vec!["#pulizie"]);
}

#[test]
fn menu_toggle_twice_restores_attributes_and_announces() {
    let storage = MemoryStorage::new();
    let mut dashboard = settled(&storage);

    click(&mut dashboard, Target::MobileMenu);
    assert!(dashboard.is_menu_open());
    assert!(dashboard.page().scroll_locked);
    click(&mut dashboard, Target::MobileMenu);

    let page = dashboard.page();
    assert!(!dashboard.is_menu_open());
    assert!(!page.scroll_locked);
    let toggle = page.menu_toggle.as_ref().unwrap();
    assert!(!toggle.active);
    assert!(!toggle.aria_expanded);
    let texts: Vec<&str> = page.live_regions.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(texts, vec!["Menu aperto", "Menu chiuso"]);

    dashboard.advance(Duration::from_secs(1));
    assert!(dashboard.page().live_regions.is_empty());
}

#[test]
fn outside_click_and_escape_close_the_menu() {
    let storage = MemoryStorage::new();
    let mut dashboard = settled(&storage);

    click(&mut dashboard, Target::MobileMenu);
    click(&mut dashboard, Target::Navbar);
    assert!(dashboard.is_menu_open());
    click(&mut dashboard, Target::Content);
    assert!(!dashboard.is_menu_open());

    click(&mut dashboard, Target::MobileMenu);
    key(&mut dashboard, KeyEvent::plain("Escape"));
    assert!(!dashboard.is_menu_open());
}

#[test]
fn arrow_keys_move_focus_between_links() {
    let storage = MemoryStorage::new();
    let mut dashboard = settled(&storage);

    dashboard.dispatch(Event::KeyDown {
        target: Some(Target::NavLink(4)),
        key: KeyEvent::plain("ArrowRight"),
    });
    assert_eq!(dashboard.page().focus, Focus::NavLink(0));
    dashboard.dispatch(Event::KeyDown {
        target: Some(Target::NavLink(0)),
        key: KeyEvent::plain("End"),
    });
    assert_eq!(dashboard.page().focus, Focus::NavLink(4));
}

#[test]
fn hiding_the_page_pauses_clock_and_saves() {
    let storage = MemoryStorage::new();
    let mut dashboard = settled(&storage);
    assert!(dashboard.app().clock_timer().is_some());
    assert_eq!(dashboard.scheduler().len(), 1);

    dashboard.dispatch(Event::VisibilityChange { hidden: true });
    assert!(dashboard.app().clock_timer().is_none());
    assert!(dashboard.scheduler().is_empty());
    assert!(storage.get_item(STORAGE_KEY).unwrap().is_some());

    dashboard.dispatch(Event::VisibilityChange { hidden: false });
    dashboard.dispatch(Event::VisibilityChange { hidden: false });
    assert!(dashboard.app().clock_timer().is_some());
    assert_eq!(dashboard.scheduler().len(), 1);
}

#[test]
fn clock_refreshes_every_thirty_seconds() {
    let storage = MemoryStorage::new();
    let mut dashboard = start(&storage);
    let initial = format_datetime(&origin().with_timezone(&Local));
    assert_eq!(dashboard.page().datetime.as_deref(), Some(initial.as_str()));

    dashboard.advance(Duration::from_secs(29));
    assert_eq!(dashboard.page().datetime.as_deref(), Some(initial.as_str()));

    dashboard.advance(Duration::from_secs(1));
    let later = origin() + chrono::Duration::seconds(30);
    let expected = format_datetime(&later.with_timezone(&Local));
    assert_eq!(dashboard.page().datetime.as_deref(), Some(expected.as_str()));
}

#[test]
fn stat_card_hover_shows_and_hides_tooltip() {
    let storage = MemoryStorage::new();
    let mut dashboard = settled(&storage);

    dashboard.dispatch(Event::MouseEnter {
        target: Target::StatCard(0),
    });
    assert_eq!(
        dashboard.page().tooltip.as_ref().map(|tip| tip.text.as_str()),
        Some("Camere attualmente occupate")
    );

    dashboard.dispatch(Event::MouseLeave {
        target: Target::StatCard(0),
    });
    assert!(dashboard.page().tooltip.is_none());
}

#[test]
fn shutdown_stops_timers_saves_and_ignores_later_events() {
    let storage = MemoryStorage::new();
    let mut dashboard = settled(&storage);
    click(&mut dashboard, Target::ActionButton(0));
    assert!(dashboard.page().action_buttons[0].disabled);

    dashboard.shutdown();
    assert!(!dashboard.app().is_listening());
    assert!(dashboard.app().clock_timer().is_none());
    assert!(dashboard.scheduler().is_empty());
    assert!(storage.get_item(STORAGE_KEY).unwrap().is_some());
    assert!(!dashboard.page().action_buttons[0].disabled);
    assert_eq!(dashboard.page().action_buttons[0].label(), "Nuova Prenotazione");

    dashboard.advance(Duration::from_secs(2));
    assert_eq!(dashboard.page().notification_count(), 0);

    click(&mut dashboard, Target::ActionButton(1));
    key(&mut dashboard, KeyEvent::ctrl("s"));
    assert!(!dashboard.page().action_buttons[1].disabled);
    assert_eq!(dashboard.page().notification_count(), 0);

    // A second shutdown is harmless.
    dashboard.shutdown();
}

#[test]
fn before_unload_flushes_state() {
    let storage = MemoryStorage::new();
    let mut dashboard = settled(&storage);
    dashboard.dispatch(Event::BeforeUnload);
    let stored = storage.get_item(STORAGE_KEY).unwrap().unwrap();
    assert_eq!(AppData::from_saved(&stored).unwrap(), dashboard.snapshot());
}
