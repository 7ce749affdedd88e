#[cfg(feature = "polars")]
use linked_views::polars_source::load_csv;
#[cfg(feature = "polars")]
use linked_views::{Dashboard, RecordId, RecordStore};
#[cfg(feature = "polars")]
use polars::prelude::*;

#[cfg(feature = "polars")]
fn survey_frame() -> DataFrame {
    df!(
        "User_ID" => &["U001", "U002", "U003"],
        "Age" => &[44i64, 30, 23],
        "Gender" => &["Male", "Other", "Female"],
        "Daily_Screen_Time" => &[3.1, 5.1, 7.4],
        "Sleep_Quality" => &[7i64, 7, 6],
        "Stress_Level" => &[6i64, 8, 7],
        "Days_Without_Social_Media" => &[2i64, 5, 1],
        "Exercise_Frequency" => &[5i64, 3, 3],
        "Social_Media_Platform" => &["Facebook", "LinkedIn", "YouTube"],
        "Happiness_Index" => &[10i64, 10, 6]
    )
    .unwrap()
}

#[test]
#[cfg(feature = "polars")]
fn test_store_from_dataframe_casts_integer_columns() {
    let store = RecordStore::from_dataframe(&survey_frame()).unwrap();
    assert_eq!(store.len(), 3);

    let second = store.get(RecordId(1)).unwrap();
    assert_eq!(second.age, 30.0);
    assert_eq!(second.daily_screen_time, 5.1);
    assert_eq!(second.gender, "Other");
    assert_eq!(second.social_media_platform, "LinkedIn");
}

#[test]
#[cfg(feature = "polars")]
fn test_missing_column_is_reported() {
    let df = survey_frame().drop("Stress_Level").unwrap();
    let err = RecordStore::from_dataframe(&df).unwrap_err();
    assert!(format!("{:#}", err).contains("Stress_Level"));
}

#[test]
#[cfg(feature = "polars")]
fn test_load_csv_feeds_a_dashboard() {
    let path = std::env::temp_dir().join(format!("linked_views_{}.csv", std::process::id()));
    std::fs::write(
        &path,
        "User_ID,Age,Gender,Daily_Screen_Time,Sleep_Quality,Stress_Level,Days_Without_Social_Media,Exercise_Frequency,Social_Media_Platform,Happiness_Index\n\
         U001,44,Male,3.1,7,6,2,5,Facebook,10\n\
         U002,30,Other,5.1,7,8,5,3,LinkedIn,10\n\
         U003,23,Other,7.4,6,7,1,3,YouTube,6\n\
         U004,36,Female,5.7,7,8,1,1,TikTok,8\n",
    )
    .unwrap();

    let store = load_csv(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(store.len(), 4);

    let dash = Dashboard::with_defaults(store);
    let stress = dash.histogram("bar4").unwrap();
    let total: usize = stress.aggregation().bins.iter().map(|b| b.total_count()).sum();
    assert_eq!(total, 4);
}

#[test]
#[cfg(feature = "polars")]
fn test_load_csv_missing_file() {
    assert!(load_csv("/definitely/not/here.csv").is_err());
}
