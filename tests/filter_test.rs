//! Filter laws over the fixture set

mod common;

use common::{report, sample_contracts};
use service_records::analytics::AggregationEngine;
use service_records::filter::{FilterEngine, FilterPredicates};
use service_records::lifecycle::LifecycleTable;
use service_records::models::{Dimension, RecordKind};

#[test]
fn test_all_sentinels_are_identity() {
    let records = sample_contracts();
    let predicates = FilterPredicates::default()
        .with_facility("all")
        .with_supplier("all")
        .with_category("")
        .with_status("all")
        .with_date_range("", "")
        .with_search("");

    assert!(predicates.is_empty());
    assert_eq!(FilterEngine::filter(&records, &predicates), records);

    let predicates = predicates.with_category("all").with_search("all");
    assert!(predicates.is_empty());
    assert_eq!(FilterEngine::filter(&records, &predicates), records);
}

#[test]
fn test_distribution_values_select_the_records_they_count() {
    let records = vec![
        report("r-1", " North", "2024-01-05"),
        report("r-2", "North ", "2024-01-06"),
        report("r-3", "South", "2024-01-07"),
    ];
    let engine = AggregationEngine::new(RecordKind::Report, &LifecycleTable::default());

    for entry in engine.distribution(&records, Dimension::Facility) {
        let selected = FilterEngine::filter(&records, &FilterPredicates::default().with_facility(entry.value.clone()));
        assert_eq!(selected.len() as u64, entry.count, "facility {:?}", entry.value);
    }
}

#[test]
fn test_filters_compose() {
    let records = sample_contracts();
    for facility in ["North Clinic", "South Clinic", "East Hospital", "Nowhere"] {
        for status in ["NEW", "APPROVED", "CONTRACTED", "DELIVERED", "REJECTED"] {
            let stepwise = FilterEngine::filter(
                &FilterEngine::filter(&records, &FilterPredicates::default().with_facility(facility)),
                &FilterPredicates::default().with_status(status),
            );
            let combined = FilterEngine::filter(
                &records,
                &FilterPredicates::default()
                    .with_facility(facility)
                    .with_status(status),
            );
            let reversed = FilterEngine::filter(
                &FilterEngine::filter(&records, &FilterPredicates::default().with_status(status)),
                &FilterPredicates::default().with_facility(facility),
            );

            assert_eq!(stepwise, combined);
            assert_eq!(reversed, combined);
        }
    }
}

#[test]
fn test_filter_does_not_mutate_input() {
    let records = sample_contracts();
    let before = records.clone();
    let filtered = FilterEngine::filter(&records, &FilterPredicates::default().with_supplier("Equipa"));

    assert_eq!(filtered.len(), 2);
    assert_eq!(records, before);
}

#[test]
fn test_conjunction_of_predicates() {
    let records = sample_contracts();
    let predicates = FilterPredicates::default()
        .with_supplier("MedSupply")
        .with_date_range("2024-02-01", "2024-02-29")
        .with_search("lease");

    let ids: Vec<_> = FilterEngine::filter(&records, &predicates)
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, vec!["CT-003"]);
}

#[test]
fn test_search_covers_reference_numbers() {
    let records = sample_contracts();
    let matched = FilterEngine::filter(&records, &FilterPredicates::default().with_search("2024/00"));
    assert_eq!(matched.len(), 4);
}
