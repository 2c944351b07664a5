use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub occupied_rooms: u32,
    pub checkins_today: u32,
    pub rooms_to_clean: u32,
    pub today_revenue: u64,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            occupied_rooms: 24,
            checkins_today: 8,
            rooms_to_clean: 12,
            today_revenue: 2450,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupied_rooms: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkins_today: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rooms_to_clean: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub today_revenue: Option<u64>,
}

impl Stats {
    pub fn merge(&mut self, patch: &StatsPatch) {
        if let Some(value) = patch.occupied_rooms {
            self.occupied_rooms = value;
        }
        if let Some(value) = patch.checkins_today {
            self.checkins_today = value;
        }
        if let Some(value) = patch.rooms_to_clean {
            self.rooms_to_clean = value;
        }
        if let Some(value) = patch.today_revenue {
            self.today_revenue = value;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    Standard,
    Deluxe,
    Suite,
}

impl RoomType {
    pub fn for_number(number: u32) -> Self {
        if number <= 120 {
            Self::Standard
        } else if number <= 140 {
            Self::Deluxe
        } else {
            Self::Suite
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Deluxe => "Deluxe",
            Self::Suite => "Suite",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    Occupied,
    Available,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cleanliness {
    Clean,
    Dirty,
    InProgress,
}

impl Cleanliness {
    pub const ALL: [Cleanliness; 3] = [Self::Clean, Self::Dirty, Self::InProgress];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: u32,
    pub number: u32,
    #[serde(rename = "type")]
    pub room_type: RoomType,
    pub status: RoomStatus,
    pub cleanliness: Cleanliness,
    pub last_cleaned: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Confirmed,
    CheckedIn,
    CheckedOut,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub guest_name: String,
    pub room_number: u32,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub status: BookingStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub preferences: Vec<String>,
    pub vip: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleaningKind {
    CheckoutCleaning,
    MaintenanceCleaning,
    DailyCleaning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleaningTask {
    pub id: String,
    pub room_number: u32,
    #[serde(rename = "type")]
    pub kind: CleaningKind,
    pub priority: Priority,
    pub assigned_to: String,
    pub status: TaskStatus,
    pub estimated_time: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppData {
    pub stats: Stats,
    pub rooms: Vec<Room>,
    pub bookings: Vec<Booking>,
    pub guests: Vec<Guest>,
    pub cleaning_tasks: Vec<CleaningTask>,
}

impl AppData {
    pub fn from_saved(raw: &str) -> Result<Self, serde_json::Error> {
        let parsed: Value = serde_json::from_str(raw)?;
        let Value::Object(saved) = parsed else {
            return Err(serde::de::Error::custom("saved state is not a JSON object"));
        };

        let mut merged = match serde_json::to_value(Self::default())? {
            Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        for (key, value) in saved {
            merged.insert(key, value);
        }

        serde_json::from_value(Value::Object(merged))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_type_follows_number_ranges() {
        assert_eq!(RoomType::for_number(101), RoomType::Standard);
        assert_eq!(RoomType::for_number(120), RoomType::Standard);
        assert_eq!(RoomType::for_number(121), RoomType::Deluxe);
        assert_eq!(RoomType::for_number(140), RoomType::Deluxe);
        assert_eq!(RoomType::for_number(141), RoomType::Suite);
    }

    #[test]
    fn stats_patch_only_touches_present_fields() {
        let mut stats = Stats::default();
        stats.merge(&StatsPatch {
            today_revenue: Some(9000),
            ..StatsPatch::default()
        });
        assert_eq!(stats.today_revenue, 9000);
        assert_eq!(stats.occupied_rooms, 24);
        assert_eq!(stats.checkins_today, 8);
    }

    #[test]
    fn saved_payload_keeps_default_for_missing_keys() {
        let data = AppData::from_saved(r#"{"stats":{"occupiedRooms":1,"checkinsToday":2,"roomsToClean":3,"todayRevenue":4}}"#)
            .expect("valid payload");
        assert_eq!(data.stats.occupied_rooms, 1);
        assert!(data.rooms.is_empty());
        assert!(data.cleaning_tasks.is_empty());
    }

    #[test]
    fn saved_payload_must_be_an_object() {
        assert!(AppData::from_saved("42").is_err());
        assert!(AppData::from_saved("not json").is_err());
    }

    #[test]
    fn persisted_layout_uses_camel_case_and_snake_case_enums() {
        let task = CleaningTask {
            id: "CT9".into(),
            room_number: 110,
            kind: CleaningKind::CheckoutCleaning,
            priority: Priority::High,
            assigned_to: "Maria".into(),
            status: TaskStatus::InProgress,
            estimated_time: 45,
            created_at: DateTime::parse_from_rfc3339("2026-01-05T10:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
        };
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["roomNumber"], 110);
        assert_eq!(json["type"], "checkout_cleaning");
        assert_eq!(json["status"], "in_progress");
        assert_eq!(json["assignedTo"], "Maria");
    }
}
