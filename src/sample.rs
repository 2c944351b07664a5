use crate::models::{
    AppData, Booking, BookingStatus, CleaningKind, CleaningTask, Cleanliness, Guest, Priority,
    Room, RoomStatus, RoomType, Stats, TaskStatus,
};
use chrono::{DateTime, Duration, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub const FIRST_ROOM: u32 = 101;
pub const LAST_ROOM: u32 = 150;

const LAST_CLEANED_WINDOW_MS: i64 = 3 * 86_400_000;

/// Builds a full sample state. Stats keep their defaults.
pub fn generate(now: DateTime<Utc>, seed: Option<u64>) -> AppData {
    let mut rng = match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    AppData {
        stats: Stats::default(),
        rooms: sample_rooms(&mut rng, now),
        bookings: sample_bookings(now),
        guests: sample_guests(),
        cleaning_tasks: sample_cleaning_tasks(now),
    }
}

pub fn sample_rooms<R: Rng>(rng: &mut R, now: DateTime<Utc>) -> Vec<Room> {
    (FIRST_ROOM..=LAST_ROOM)
        .map(|number| Room {
            id: number,
            number,
            room_type: RoomType::for_number(number),
            status: if rng.gen_bool(0.5) {
                RoomStatus::Occupied
            } else {
                RoomStatus::Available
            },
            cleanliness: Cleanliness::ALL[rng.gen_range(0..Cleanliness::ALL.len())],
            last_cleaned: now - Duration::milliseconds(rng.gen_range(0..LAST_CLEANED_WINDOW_MS)),
        })
        .collect()
}

pub fn sample_bookings(now: DateTime<Utc>) -> Vec<Booking> {
    let today = now.date_naive();
    vec![
        Booking {
            id: "BK001".into(),
            guest_name: "Mario Rossi".into(),
            room_number: 101,
            check_in: today,
            check_out: today + Duration::days(3),
            status: BookingStatus::Confirmed,
        },
        Booking {
            id: "BK002".into(),
            guest_name: "Anna Verdi".into(),
            room_number: 102,
            check_in: today,
            check_out: today + Duration::days(2),
            status: BookingStatus::CheckedIn,
        },
    ]
}

pub fn sample_guests() -> Vec<Guest> {
    vec![
        Guest {
            id: "G001".into(),
            name: "Mario Rossi".into(),
            email: "mario.rossi@email.com".into(),
            phone: "+39 123 456 7890".into(),
            preferences: vec!["quiet_room".into(), "high_floor".into()],
            vip: false,
        },
        Guest {
            id: "G002".into(),
            name: "Anna Verdi".into(),
            email: "anna.verdi@email.com".into(),
            phone: "+39 098 765 4321".into(),
            preferences: vec!["city_view".into(), "late_checkout".into()],
            vip: true,
        },
    ]
}

pub fn sample_cleaning_tasks(now: DateTime<Utc>) -> Vec<CleaningTask> {
    vec![
        CleaningTask {
            id: "CT001".into(),
            room_number: 103,
            kind: CleaningKind::CheckoutCleaning,
            priority: Priority::High,
            assigned_to: "Maria".into(),
            status: TaskStatus::Pending,
            estimated_time: 45,
            created_at: now,
        },
        CleaningTask {
            id: "CT002".into(),
            room_number: 104,
            kind: CleaningKind::MaintenanceCleaning,
            priority: Priority::Medium,
            assigned_to: "Giulia".into(),
            status: TaskStatus::InProgress,
            estimated_time: 30,
            created_at: now - Duration::hours(1),
        },
    ]
}
