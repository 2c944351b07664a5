use crate::models::{AppData, BookingStatus, Cleanliness, Priority, RoomStatus, TaskStatus};
use crate::notifications::NotificationKind;
use crate::page::{Focus, Page};
use std::fmt::Write;

pub fn render_index(page: &Page, data: &AppData) -> String {
    INDEX_HTML.replace("{{APP}}", &render_app(page, data))
}

/// Markup of the `#app` container; the page script swaps it in on refresh.
pub fn render_app(page: &Page, data: &AppData) -> String {
    let mut html = String::new();
    html.push_str(&render_navbar(page));
    if let Some(datetime) = &page.datetime {
        let _ = write!(
            html,
            r#"<div id="current-datetime" class="datetime">{}</div>"#,
            escape_html(datetime)
        );
    }
    html.push_str(r#"<main class="content">"#);
    for section in &page.sections {
        let class = if section.active {
            "content-section active"
        } else {
            "content-section"
        };
        let _ = write!(
            html,
            r#"<section id="{id}" class="{class}" style="opacity: {opacity}">"#,
            id = escape_html(&section.id),
            opacity = section.opacity,
        );
        if let Some(heading) = &section.heading {
            let tabindex = heading
                .tabindex
                .map(|value| format!(r#" tabindex="{value}""#))
                .unwrap_or_default();
            let focused = if page.focus == Focus::Heading(section.id.clone()) {
                r#" data-focus="true""#
            } else {
                ""
            };
            let _ = write!(
                html,
                "<h1{tabindex}{focused}>{}</h1>",
                escape_html(&heading.text)
            );
        }
        html.push_str(&render_section_body(&section.id, page, data));
        html.push_str("</section>");
    }
    html.push_str("</main>");
    html.push_str(&render_notifications(page));
    for region in &page.live_regions {
        let _ = write!(
            html,
            r#"<div aria-live="polite" aria-atomic="true" class="sr-only">{}</div>"#,
            escape_html(&region.text)
        );
    }
    if let Some(tooltip) = &page.tooltip {
        let _ = write!(
            html,
            r#"<div class="tooltip" role="tooltip">{}</div>"#,
            escape_html(&tooltip.text)
        );
    }
    if page.scroll_locked {
        html.push_str(r#"<style>body { overflow: hidden; }</style>"#);
    }
    html
}

fn render_navbar(page: &Page) -> String {
    let mut html = String::from(r#"<nav class="navbar" data-target="navbar"><span class="brand">Hotel Manager</span>"#);
    if let Some(toggle) = &page.menu_toggle {
        let _ = write!(
            html,
            r#"<button id="mobile-menu" class="menu-toggle{active}" data-target="mobile_menu" aria-expanded="{expanded}" aria-label="Menu">&#9776;</button>"#,
            active = if toggle.active { " active" } else { "" },
            expanded = toggle.aria_expanded,
        );
    }
    let _ = write!(
        html,
        r#"<ul class="nav-menu{}">"#,
        if page.nav_menu_open { " active" } else { "" }
    );
    for (index, link) in page.nav_links.iter().enumerate() {
        let focused = if page.focus == Focus::NavLink(index) {
            r#" data-focus="true""#
        } else {
            ""
        };
        let _ = write!(
            html,
            r#"<li><a class="nav-link{active}" href="{href}" data-target="nav_link" data-index="{index}"{focused}>{label}</a></li>"#,
            active = if link.active { " active" } else { "" },
            href = escape_html(&link.href),
            label = escape_html(&link.label),
        );
    }
    html.push_str("</ul></nav>");
    html
}

fn render_section_body(section_id: &str, page: &Page, data: &AppData) -> String {
    let mut html = String::new();
    match section_id {
        "dashboard" => {
            html.push_str(r#"<div class="stats-grid">"#);
            for (index, card) in page.stat_cards.iter().enumerate() {
                let _ = write!(
                    html,
                    r#"<div class="stat-card" data-target="stat_card" data-index="{index}"><h3>{value}</h3><p>{label}</p></div>"#,
                    value = escape_html(&card.value),
                    label = escape_html(&card.label),
                );
            }
            html.push_str(r#"</div><div class="quick-actions">"#);
            for (index, button) in page.action_buttons.iter().enumerate() {
                // Button html is produced by the controller, never by users.
                let _ = write!(
                    html,
                    r#"<button class="action-btn" data-target="action_button" data-index="{index}"{disabled}>{content}</button>"#,
                    disabled = if button.disabled { " disabled" } else { "" },
                    content = button.content.html,
                );
            }
            html.push_str("</div>");
        }
        "prenotazioni" => {
            html.push_str("<table><thead><tr><th>Codice</th><th>Ospite</th><th>Camera</th><th>Arrivo</th><th>Partenza</th><th>Stato</th></tr></thead><tbody>");
            for booking in &data.bookings {
                let status = match booking.status {
                    BookingStatus::Confirmed => "confermata",
                    BookingStatus::CheckedIn => "in casa",
                    BookingStatus::CheckedOut => "partito",
                    BookingStatus::Cancelled => "cancellata",
                };
                let _ = write!(
                    html,
                    "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                    escape_html(&booking.id),
                    escape_html(&booking.guest_name),
                    booking.room_number,
                    booking.check_in.format("%d/%m/%Y"),
                    booking.check_out.format("%d/%m/%Y"),
                    status,
                );
            }
            html.push_str("</tbody></table>");
        }
        "camere" => {
            html.push_str(r#"<div class="rooms-grid">"#);
            for room in &data.rooms {
                let status = match room.status {
                    RoomStatus::Occupied => "occupata",
                    RoomStatus::Available => "libera",
                };
                let cleanliness = match room.cleanliness {
                    Cleanliness::Clean => "pulita",
                    Cleanliness::Dirty => "da pulire",
                    Cleanliness::InProgress => "in pulizia",
                };
                let _ = write!(
                    html,
                    r#"<div class="room room-{status}"><strong>{number}</strong><span>{kind}</span><span>{cleanliness}</span></div>"#,
                    number = room.number,
                    kind = room.room_type.label(),
                );
            }
            html.push_str("</div>");
        }
        "pulizie" => {
            html.push_str("<table><thead><tr><th>Camera</th><th>Priorità</th><th>Assegnata a</th><th>Stato</th><th>Minuti</th></tr></thead><tbody>");
            for task in &data.cleaning_tasks {
                let status = match task.status {
                    TaskStatus::Pending => "in attesa",
                    TaskStatus::InProgress => "in corso",
                    TaskStatus::Completed => "completata",
                };
                let priority = match task.priority {
                    Priority::Low => "bassa",
                    Priority::Medium => "media",
                    Priority::High => "alta",
                };
                let _ = write!(
                    html,
                    "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                    task.room_number,
                    priority,
                    escape_html(&task.assigned_to),
                    status,
                    task.estimated_time,
                );
            }
            html.push_str("</tbody></table>");
        }
        "ospiti" => {
            html.push_str("<table><thead><tr><th>Nome</th><th>Email</th><th>Telefono</th><th>Preferenze</th><th>VIP</th></tr></thead><tbody>");
            for guest in &data.guests {
                let _ = write!(
                    html,
                    "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                    escape_html(&guest.name),
                    escape_html(&guest.email),
                    escape_html(&guest.phone),
                    escape_html(&guest.preferences.join(", ")),
                    if guest.vip { "★" } else { "" },
                );
            }
            html.push_str("</tbody></table>");
        }
        _ => {}
    }
    html
}

fn render_notifications(page: &Page) -> String {
    let Some(stack) = &page.notifications else {
        return String::new();
    };
    let mut html = String::from(r#"<div id="notification-container">"#);
    for node in stack {
        let _ = write!(
            html,
            r#"<div class="notification notification-{kind}{leaving}" data-target="notification" data-index="{index}" style="border-left-color: var({accent})"><span>{message}</span><button aria-label="Chiudi">&times;</button></div>"#,
            index = node.id.0,
            kind = kind_class(node.kind),
            leaving = if node.leaving { " leaving" } else { "" },
            accent = node.kind.accent_var(),
            message = escape_html(&node.message),
        );
    }
    html.push_str("</div>");
    html
}

fn kind_class(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::Info => "info",
        NotificationKind::Success => "success",
        NotificationKind::Warning => "warning",
        NotificationKind::Error => "error",
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="it">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Hotel Manager</title>
  <style>
    :root {
      --primary-color: #1f3a5f;
      --secondary-color: #3d7ea6;
      --accent-color: #d64545;
      --success-color: #2d7a4b;
      --warning-color: #e0a526;
      --gray-800: #2b2a28;
      --white: #ffffff;
      --shadow-lg: 0 16px 40px rgba(31, 58, 95, 0.18);
    }

    * { box-sizing: border-box; }

    body {
      margin: 0;
      font-family: "Segoe UI", "Trebuchet MS", sans-serif;
      background: #f4f6f9;
      color: var(--gray-800);
    }

    .navbar {
      display: flex;
      align-items: center;
      gap: 24px;
      padding: 14px 24px;
      background: var(--primary-color);
      color: var(--white);
    }

    .brand { font-weight: 700; }
    .nav-menu { display: flex; gap: 8px; list-style: none; margin: 0; padding: 0; }
    .nav-link { color: #d9e4f0; text-decoration: none; padding: 8px 12px; border-radius: 8px; }
    .nav-link.active { background: rgba(255, 255, 255, 0.16); color: var(--white); }
    .menu-toggle { display: none; background: none; border: none; color: var(--white); font-size: 24px; }

    .datetime { padding: 8px 24px; color: #5f5c57; font-size: 0.9rem; }
    .content { padding: 24px; }
    .content-section { display: none; transition: opacity 150ms ease; }
    .content-section.active { display: block; }

    .stats-grid, .quick-actions, .rooms-grid {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
      gap: 16px;
      margin-bottom: 24px;
    }

    .stat-card, .room {
      background: var(--white);
      border-radius: 12px;
      padding: 16px;
      box-shadow: var(--shadow-lg);
    }

    .stat-card h3 { margin: 0 0 6px; font-size: 1.8rem; color: var(--primary-color); }
    .room { display: grid; gap: 4px; }
    .room-occupata { border-left: 4px solid var(--accent-color); }
    .room-libera { border-left: 4px solid var(--success-color); }

    .action-btn {
      border: none;
      border-radius: 999px;
      padding: 14px 18px;
      background: var(--secondary-color);
      color: var(--white);
      font-weight: 600;
      cursor: pointer;
    }

    .action-btn:disabled { opacity: 0.7; cursor: progress; }
    .loading {
      display: inline-block;
      width: 14px;
      height: 14px;
      border: 2px solid rgba(255, 255, 255, 0.4);
      border-top-color: var(--white);
      border-radius: 50%;
      animation: spin 800ms linear infinite;
    }

    table { width: 100%; border-collapse: collapse; background: var(--white); }
    th, td { padding: 10px 12px; text-align: left; border-bottom: 1px solid #e4e8ee; }

    #notification-container {
      position: fixed;
      top: 80px;
      right: 20px;
      z-index: 2000;
      max-width: 400px;
    }

    .notification {
      display: flex;
      align-items: center;
      justify-content: space-between;
      background: var(--white);
      border-left: 4px solid;
      padding: 16px;
      margin-bottom: 12px;
      border-radius: 8px;
      box-shadow: var(--shadow-lg);
      animation: slideInRight 0.3s ease-out;
      cursor: pointer;
    }

    .notification.leaving { animation: slideOutRight 0.3s ease-out forwards; }
    .notification button { background: none; border: none; font-size: 18px; cursor: pointer; margin-left: 12px; }

    .tooltip {
      position: fixed;
      bottom: 24px;
      left: 50%;
      transform: translateX(-50%);
      background: var(--gray-800);
      color: var(--white);
      padding: 8px 12px;
      border-radius: 4px;
      font-size: 12px;
      z-index: 1000;
      pointer-events: none;
      white-space: nowrap;
    }

    .sr-only {
      position: absolute;
      width: 1px;
      height: 1px;
      overflow: hidden;
      clip: rect(0, 0, 0, 0);
    }

    @keyframes slideInRight {
      from { transform: translateX(100%); opacity: 0; }
      to { transform: translateX(0); opacity: 1; }
    }

    @keyframes slideOutRight {
      from { transform: translateX(0); opacity: 1; }
      to { transform: translateX(100%); opacity: 0; }
    }

    @keyframes spin { to { transform: rotate(360deg); } }

    @media (max-width: 767px) {
      .menu-toggle { display: block; }
      .nav-menu { display: none; position: absolute; top: 56px; left: 0; right: 0; flex-direction: column; background: var(--primary-color); padding: 12px; }
      .nav-menu.active { display: flex; }
    }
  </style>
  <script>
    const targetOf = (element) => {
      const node = element && element.closest ? element.closest('[data-target]') : null;
      if (!node) {
        return { kind: 'content' };
      }
      const kind = node.dataset.target;
      return node.dataset.index === undefined ? { kind } : { kind, index: Number(node.dataset.index) };
    };

    const refresh = async () => {
      const res = await fetch('/fragment');
      if (!res.ok) {
        return;
      }
      document.getElementById('app').innerHTML = await res.text();
      const focused = document.querySelector('[data-focus="true"]');
      if (focused && document.activeElement !== focused) {
        focused.focus();
      }
    };

    const send = async (event) => {
      await fetch('/api/events', {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify(event),
        keepalive: true
      });
      await refresh();
    };

    document.addEventListener('click', (event) => {
      const target = targetOf(event.target);
      if (target.kind === 'nav_link' || target.kind === 'mobile_menu') {
        event.preventDefault();
      }
      send({ type: 'click', target }).catch(() => {});
    });

    document.addEventListener('keydown', (event) => {
      const shortcut = (event.ctrlKey || event.metaKey) && ['1', '2', '3', 's'].includes(event.key);
      const navigation = ['ArrowRight', 'ArrowDown', 'ArrowLeft', 'ArrowUp', 'Home', 'End', 'Escape'].includes(event.key);
      if (!shortcut && !navigation) {
        return;
      }
      const target = targetOf(event.target);
      if (shortcut || target.kind === 'nav_link') {
        event.preventDefault();
      }
      send({
        type: 'key_down',
        target: target.kind === 'content' ? null : target,
        key: { key: event.key, ctrl: event.ctrlKey, meta: event.metaKey }
      }).catch(() => {});
    });

    document.addEventListener('mouseover', (event) => {
      const target = targetOf(event.target);
      if (target.kind === 'stat_card' && !(event.relatedTarget && event.relatedTarget.closest && event.relatedTarget.closest('[data-target="stat_card"]'))) {
        send({ type: 'mouse_enter', target }).catch(() => {});
      }
    });

    document.addEventListener('mouseout', (event) => {
      const target = targetOf(event.target);
      if (target.kind === 'stat_card' && !(event.relatedTarget && event.relatedTarget.closest && event.relatedTarget.closest('[data-target="stat_card"]'))) {
        send({ type: 'mouse_leave', target }).catch(() => {});
      }
    });

    window.addEventListener('resize', () => {
      send({ type: 'resize', width: window.innerWidth }).catch(() => {});
    });

    window.addEventListener('orientationchange', () => {
      send({ type: 'orientation_change', width: window.innerWidth }).catch(() => {});
    });

    document.addEventListener('visibilitychange', () => {
      send({ type: 'visibility_change', hidden: document.hidden }).catch(() => {});
    });

    window.addEventListener('beforeunload', () => {
      fetch('/api/events', {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify({ type: 'before_unload' }),
        keepalive: true
      });
    });

    window.addEventListener('DOMContentLoaded', () => {
      send({ type: 'resize', width: window.innerWidth }).catch(() => {});
      setInterval(() => refresh().catch(() => {}), 1000);
    });
  </script>
</head>
<body>
  <div id="app">{{APP}}</div>
</body>
</html>
"#;
