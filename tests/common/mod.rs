#![allow(dead_code)]

use linked_views::{Record, RecordId, RecordStore};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const GENDERS: [&str; 3] = ["Male", "Female", "Other"];
pub const PLATFORMS: [&str; 6] = [
    "Facebook",
    "Instagram",
    "LinkedIn",
    "TikTok",
    "X (Twitter)",
    "YouTube",
];

/// Number of records whose screen time sits apart from the rest.
pub const OUTLIERS: usize = 12;

pub fn record(i: usize) -> Record {
    Record {
        id: RecordId(i as u32),
        age: 30.0,
        daily_screen_time: 5.0,
        sleep_quality: 5.0,
        stress_level: 5.0,
        days_without_social_media: 3.0,
        exercise_frequency: 2.0,
        happiness_index: 5.0,
        gender: "Male".to_string(),
        social_media_platform: "Facebook".to_string(),
    }
}

/// 100 survey rows: `Stress_Level` cycles 1..=10, `Gender` cycles over three
/// labels, and the first [`OUTLIERS`] rows spend 10 hours on screens while
/// everybody else stays under 8.
pub fn synthetic_records(n: usize, seed: u64) -> Vec<Record> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|i| Record {
            id: RecordId(i as u32),
            age: rng.random_range(16..=49) as f64,
            daily_screen_time: if i < OUTLIERS {
                10.0
            } else {
                (rng.random_range(10..=75) as f64) / 10.0
            },
            sleep_quality: rng.random_range(1..=10) as f64,
            stress_level: (i % 10 + 1) as f64,
            days_without_social_media: rng.random_range(0..=9) as f64,
            exercise_frequency: rng.random_range(0..=7) as f64,
            happiness_index: rng.random_range(1..=10) as f64,
            gender: GENDERS[i % 3].to_string(),
            social_media_platform: PLATFORMS[rng.random_range(0..PLATFORMS.len())].to_string(),
        })
        .collect()
}

pub fn synthetic_store() -> RecordStore {
    RecordStore::new(synthetic_records(100, 42))
}

pub fn outlier_ids() -> Vec<RecordId> {
    (0..OUTLIERS as u32).map(RecordId).collect()
}
