//! Property tests for the query engine's algebraic guarantees.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use rackview_model::{
    BackupStatus, Environment, FieldKey, Filter, HardwareType, PatchStatus, Server, SortKey,
};
use rackview_query::{SortOptions, apply_filters_and_search, apply_sort};

fn base_server(index: usize, name: String, company: String, location: String) -> Server {
    Server {
        id: format!("srv-{index}"),
        server_name: name,
        operating_system: "Ubuntu 22.04".to_string(),
        hardware_type: HardwareType::Virtualized,
        company,
        server_type: Environment::Production,
        location,
        system_admin: "j.doe".to_string(),
        backup_admin: "b.ops".to_string(),
        hardware_admin: "h.ops".to_string(),
        description: String::new(),
        domain: "acme.internal".to_string(),
        maintenance_window: String::new(),
        ip_address: "10.0.0.1".to_string(),
        application_zone: "web".to_string(),
        operational_zone: "dmz".to_string(),
        backup: BackupStatus::Yes,
        tags: vec![],
        created_at: Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0).unwrap(),
        updated_by: "seed".to_string(),
        cores: 8,
        ram_gb: 32,
        storage_gb: 500,
        cluster: String::new(),
        application: "webshop".to_string(),
        patch_status: PatchStatus::Current,
        last_patch_date: None,
        cpu_load_trend: vec![],
        alarm_count: 0,
    }
}

fn arb_records() -> impl Strategy<Value = Vec<Server>> {
    let row = (
        "[A-Z]{3}-[0-9]{2}",
        prop::sample::select(vec!["Acme", "Globex", "Initech"]),
        prop::sample::select(vec!["Frankfurt", "Berlin", "Vienna"]),
    );
    prop::collection::vec(row, 0..12).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(index, (name, company, location))| {
                base_server(index, name, company.to_string(), location.to_string())
            })
            .collect()
    })
}

fn arb_filters() -> impl Strategy<Value = Vec<Filter>> {
    let single = (
        prop::sample::select(vec![
            FieldKey::ServerName,
            FieldKey::Company,
            FieldKey::Location,
        ]),
        "[a-zA-Z]{0,3}",
    )
        .prop_map(|(key, value)| Filter::new(key, value));
    prop::collection::vec(single, 0..3)
}

proptest! {
    /// Filtering an already-filtered set with the same arguments changes nothing.
    #[test]
    fn filter_and_search_are_idempotent(
        records in arb_records(),
        filters in arb_filters(),
        search in "[a-z]{0,3}",
    ) {
        let once = apply_filters_and_search(&records, &filters, &search);
        let twice = apply_filters_and_search(&once, &filters, &search);
        prop_assert_eq!(once, twice);
    }

    /// Adding a filter never grows the result set.
    #[test]
    fn adding_a_filter_never_grows_the_result(
        records in arb_records(),
        filters in arb_filters(),
        extra_value in "[a-z]{1,3}",
    ) {
        let baseline = apply_filters_and_search(&records, &filters, "");

        let mut extended = filters.clone();
        extended.push(Filter::new(FieldKey::Company, extra_value));
        let narrowed = apply_filters_and_search(&records, &extended, "");

        prop_assert!(narrowed.len() <= baseline.len());
    }

    /// Sorting with no keys returns the input unchanged.
    #[test]
    fn empty_sort_is_identity(records in arb_records()) {
        let sorted = apply_sort(&records, &[], SortOptions::default());
        prop_assert_eq!(sorted, records);
    }

    /// Sorting is a permutation: same elements, possibly different order.
    #[test]
    fn sort_preserves_the_element_set(records in arb_records()) {
        let sorted = apply_sort(
            &records,
            &[SortKey::asc(FieldKey::ServerName)],
            SortOptions::default(),
        );
        prop_assert_eq!(sorted.len(), records.len());

        let mut before: Vec<String> = records.iter().map(|s| s.id.clone()).collect();
        let mut after: Vec<String> = sorted.iter().map(|s| s.id.clone()).collect();
        before.sort();
        after.sort();
        prop_assert_eq!(before, after);
    }
}
