mod common;

use linked_views::data_types::{ALL_CATEGORY, BinKey, DashboardConfig, HistogramConfig};
use linked_views::rendering::JsonSceneWriter;
use linked_views::widgets::BrushState;
use linked_views::{
    BrushRegion, ChannelConstraint, ChannelName, Dashboard, Field, Grouping, GroupingField,
    LinkedView, RecordId, RecordStore,
};
use std::thread;

fn dashboard() -> Dashboard {
    Dashboard::with_defaults(common::synthetic_store())
}

/// Rectangle around the column of screen-time outliers in the scatter plot.
fn outlier_region(dash: &Dashboard) -> BrushRegion {
    let scatter = dash.scatter();
    let (x, _) = scatter.position(RecordId(0)).unwrap();
    let h = scatter.layout().plot_height();
    BrushRegion::rect((x - 2.0, -1.0), (x + 2.0, h + 1.0))
}

fn assert_every_histogram_selects(dash: &Dashboard, expected: usize) {
    for h in dash.histograms() {
        let selected: usize = h.aggregation().bins.iter().map(|b| b.total_selected()).sum();
        assert_eq!(selected, expected, "histogram {}", h.mount());
    }
}

#[test]
fn test_default_dashboard_layout() {
    let dash = dashboard();
    assert_eq!(dash.histograms().len(), 7);
    assert_eq!(dash.histogram("bar1").unwrap().binning().field, Field::Age);
    assert!(dash.histogram_for(Field::HappinessIndex).is_some());
    assert!(dash.combined().is_unconstrained());
    assert_eq!(dash.grouping(), Grouping::All);

    for name in ["bar1", "Scatter", "Bubble", "Gender", "Social_Media_Platform"] {
        assert!(dash.selection().has_channel(&ChannelName::new(name)), "{}", name);
    }
}

#[test]
fn test_scatter_brush_propagates_to_every_histogram() {
    let mut dash = dashboard();
    let region = outlier_region(&dash);
    dash.brush_scatter(Some(region));
    assert_eq!(dash.combined().len(), common::OUTLIERS);

    for grouping in ["", "Gender", "Social_Media_Platform"] {
        dash.set_grouping(grouping);
        assert_every_histogram_selects(&dash, common::OUTLIERS);
    }

    let screen = dash.histogram_for(Field::DailyScreenTime).unwrap();
    let ten = screen
        .aggregation()
        .bins
        .iter()
        .find(|b| b.key.as_value() == Some(10.0))
        .unwrap();
    assert_eq!(ten.total_selected(), common::OUTLIERS);
}

#[test]
fn test_clearing_brush_restores_counts() {
    let mut dash = dashboard();
    dash.set_grouping("Gender");
    let region = outlier_region(&dash);
    dash.brush_scatter(Some(region));
    dash.brush_scatter(None);

    assert!(dash.combined().is_unconstrained());
    assert_eq!(dash.scatter().brush_state(), BrushState::Unbrushed);
    for h in dash.histograms() {
        for bin in &h.aggregation().bins {
            for counts in bin.per_category.values() {
                assert_eq!(counts.selected_count, counts.count);
            }
        }
    }
}

#[test]
fn test_brushes_from_two_widgets_intersect() {
    let mut dash = dashboard();
    let region = outlier_region(&dash);
    dash.brush_scatter(Some(region));

    let stress = dash.histogram("bar4").unwrap();
    let x = stress.key_position(&BinKey::Value(1.0)).unwrap();
    assert!(dash.brush("bar4", Some(BrushRegion::x_range(x - 2.0, x + 2.0))));

    // outliers are ids 0..12; stress 1 holds ids 0, 10, 20, ...
    let mut ids: Vec<u32> = dash.combined().ids().iter().map(|id| id.0).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![0, 10]);

    assert!(!dash.brush("nowhere", None));
}

fn with_extra_histogram(config: HistogramConfig) -> Dashboard {
    let mut dashboard_config = DashboardConfig::default();
    dashboard_config.histograms.push(config);
    dashboard_config.validate().unwrap();
    Dashboard::new(common::synthetic_store(), dashboard_config)
}

fn brush_key(dash: &mut Dashboard, mount: &str, key: BinKey) {
    let x = dash.histogram(mount).unwrap().key_position(&key).unwrap();
    assert!(dash.brush(mount, Some(BrushRegion::x_range(x - 2.0, x + 2.0))));
}

#[test]
fn test_gender_histogram_brush_survives_checkbox_toggle() {
    let mut dash = with_extra_histogram(HistogramConfig::new("bar8", Field::Gender, 1.0, false));
    brush_key(&mut dash, "bar8", BinKey::Label("Male".to_string()));
    let males = dash.store().ids_where(|r| r.gender == "Male");
    assert_eq!(dash.combined().len(), males.len());

    dash.toggle_category(GroupingField::Gender, "Female", false);
    assert_eq!(**dash.combined().ids(), males);
    let bar = dash.histogram("bar8").unwrap();
    assert!(matches!(bar.brush_state(), BrushState::Brushed(_)));
    assert!(matches!(
        dash.selection().channel(&ChannelName::new("Gender")),
        ChannelConstraint::Only(_)
    ));
}

#[test]
fn test_two_histograms_of_one_field_intersect() {
    let mut dash = with_extra_histogram(HistogramConfig::new("bar9", Field::StressLevel, 1.0, false));
    brush_key(&mut dash, "bar4", BinKey::Value(2.0));
    assert_eq!(dash.combined().len(), 10);

    brush_key(&mut dash, "bar9", BinKey::Value(5.0));
    assert!(dash.combined().is_empty());
    assert!(!dash.combined().is_unconstrained());

    dash.brush("bar9", None);
    assert_eq!(dash.combined().len(), 10);
}

#[test]
fn test_grouping_keeps_other_channels() {
    let mut dash = dashboard();
    let region = outlier_region(&dash);
    dash.brush_scatter(Some(region));

    assert_eq!(dash.set_grouping("Gender"), Grouping::By(GroupingField::Gender));
    assert_eq!(dash.combined().len(), common::OUTLIERS);
    assert!(matches!(dash.scatter().brush_state(), BrushState::Brushed(_)));

    assert_eq!(dash.set_grouping("Favourite_Colour"), Grouping::All);
    let bar = dash.histogram("bar1").unwrap();
    assert_eq!(bar.aggregation().categories, vec![ALL_CATEGORY.to_string()]);
    assert_eq!(dash.combined().len(), common::OUTLIERS);
}

#[test]
fn test_category_toggle_round_trip() {
    let mut dash = dashboard();
    dash.set_grouping("Gender");
    let before = dash.histogram("bar4").unwrap().aggregation().clone();

    dash.toggle_category(GroupingField::Gender, "Other", false);
    let others = dash.store().ids_where(|r| r.gender == "Other").len();
    assert_eq!(dash.combined().len(), dash.store().len() - others);
    let filtered = dash.histogram("bar4").unwrap().aggregation();
    for bin in &filtered.bins {
        assert_eq!(bin.get("Other").count, 0);
    }
    assert!(dash
        .category_options(GroupingField::Gender)
        .contains(&("Other".to_string(), false)));

    dash.toggle_category(GroupingField::Gender, "Other", true);
    assert!(dash.combined().is_unconstrained());
    assert_eq!(
        *dash.selection().channel(&ChannelName::new("Gender")),
        ChannelConstraint::Unconstrained
    );
    assert_eq!(dash.histogram("bar4").unwrap().aggregation(), &before);
}

#[test]
fn test_unchecking_everything_selects_nothing() {
    let mut dash = dashboard();
    for (label, _) in dash.category_options(GroupingField::Gender) {
        dash.toggle_category(GroupingField::Gender, &label, false);
    }
    assert!(dash.combined().is_empty());
    assert!(!dash.combined().is_unconstrained());

    dash.toggle_category(GroupingField::Gender, "Male", true);
    let males = dash.store().ids_where(|r| r.gender == "Male");
    assert_eq!(**dash.combined().ids(), males);
}

#[test]
fn test_unknown_category_is_ignored() {
    let mut dash = dashboard();
    dash.toggle_category(GroupingField::SocialMediaPlatform, "MySpace", false);
    assert!(dash.combined().is_unconstrained());
    assert!(dash
        .category_options(GroupingField::SocialMediaPlatform)
        .iter()
        .all(|(_, checked)| *checked));
}

#[test]
fn test_unlisted_gender_label_can_be_filtered() {
    let records = (0..6)
        .map(|i| {
            let mut r = common::record(i);
            r.gender = common::GENDERS[i % 3].to_string();
            if i == 5 {
                r.gender = "Nonbinary".to_string();
            }
            r
        })
        .collect();
    let mut dash = Dashboard::with_defaults(RecordStore::new(records));

    let labels: Vec<String> = dash
        .category_options(GroupingField::Gender)
        .into_iter()
        .map(|(label, _)| label)
        .collect();
    assert_eq!(labels, vec!["Male", "Female", "Other", "Nonbinary"]);

    dash.toggle_category(GroupingField::Gender, "Nonbinary", false);
    assert_eq!(dash.combined().len(), 5);
    assert!(!dash.combined().ids().contains(&RecordId(5)));

    // stacking keeps the fixed labels
    dash.set_grouping("Gender");
    let categories = &dash.histogram("bar1").unwrap().aggregation().categories;
    assert_eq!(categories, &vec!["Male", "Female", "Other"]);
}

#[test]
fn test_color_field_selection() {
    let mut dash = dashboard();
    assert_eq!(dash.set_color_field("Happiness_Index"), Field::HappinessIndex);
    assert_eq!(dash.bubble().color_field(), Field::HappinessIndex);
    assert_eq!(dash.set_color_field("Gender"), Field::HappinessIndex);
    assert_eq!(dash.set_color_field("Nope"), Field::HappinessIndex);
}

#[test]
fn test_render_all_is_idempotent() {
    let mut dash = dashboard();
    dash.set_grouping("Gender");
    let region = outlier_region(&dash);
    dash.brush_scatter(Some(region));

    let mut first = JsonSceneWriter::new();
    dash.render_all(&mut first);
    let mut second = JsonSceneWriter::new();
    dash.render_all(&mut second);

    assert_eq!(first.draw_count(), 9);
    assert_eq!(first.mounts().count(), 9);
    assert_eq!(first.to_json_string().unwrap(), second.to_json_string().unwrap());

    let scatter = first.frame("scatter").unwrap();
    assert_eq!(scatter["kind"], "scatter");
}

#[test]
fn test_custom_config_drives_widgets() {
    let config = DashboardConfig::from_json_str(
        r#"{ "histograms": [ { "mount": "only", "field": "Sleep_Quality", "bin_width": 2.0 } ] }"#,
    )
    .unwrap();
    let dash = Dashboard::new(common::synthetic_store(), config);
    assert_eq!(dash.histograms().len(), 1);
    assert_eq!(dash.scatter().mount(), "scatter");
    assert!(dash.selection().has_channel(&ChannelName::new("only")));
}

#[test]
fn test_shared_dashboard_across_threads() {
    let shared = dashboard().into_shared();
    let region = outlier_region(&shared.read());

    let writer = {
        let shared = shared.clone();
        thread::spawn(move || {
            for _ in 0..10 {
                let mut dash = shared.write();
                dash.brush_scatter(Some(region));
                dash.brush_scatter(None);
            }
            shared.write().brush_scatter(Some(region));
        })
    };
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let shared = shared.clone();
            thread::spawn(move || {
                for _ in 0..10 {
                    let dash = shared.read();
                    let combined = dash.combined().len();
                    let selected = dash.histograms()[0].aggregation().total_selected();
                    // broadcast completes under the same lock as the update
                    assert_eq!(selected, combined);
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for r in readers {
        r.join().unwrap();
    }
    assert_eq!(shared.read().combined().len(), common::OUTLIERS);
}
