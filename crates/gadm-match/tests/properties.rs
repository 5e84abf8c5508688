//! Property tests for the matching invariants.

use gadm_match::{find_matches, run};
use gadm_model::{Query, ReferenceTable, ReferenceTableRepository, TableKey};
use proptest::prelude::*;

const WORDS: &[&str] = &[
    "New", "York", "City", "San", "Jose", "Santa", "Cruz", "Mexico", "Ciudad", "de", "Paris",
    "Saint", "Denis",
];
const SCOPES: &[&str] = &["USA", "MEX", "FRA", ""];

fn name() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(WORDS), 0..4).prop_map(|words| words.join(" "))
}

fn record() -> impl Strategy<Value = (String, String)> {
    (prop::sample::select(SCOPES), name()).prop_map(|(scope, name)| (scope.to_string(), name))
}

fn table(level: u8) -> impl Strategy<Value = ReferenceTable> {
    prop::collection::vec(record(), 0..12).prop_map(move |records| {
        if level == 0 {
            let headers = vec!["GID_0".to_string(), "NAME_0".to_string()];
            let rows = records
                .into_iter()
                .map(|(scope, name)| vec![scope, name])
                .collect();
            return ReferenceTable::new(headers, rows);
        }
        let headers = vec![
            "GID_0".to_string(),
            format!("GID_{level}"),
            format!("NAME_{level}"),
        ];
        let rows = records
            .into_iter()
            .enumerate()
            .map(|(idx, (scope, name))| vec![scope.clone(), format!("{scope}.{idx}"), name])
            .collect();
        ReferenceTable::new(headers, rows)
    })
}

fn repository() -> impl Strategy<Value = ReferenceTableRepository> {
    (table(0), table(1), table(0)).prop_map(|(a, b, c)| {
        vec![
            (TableKey::new("36", 0), a),
            (TableKey::new("36", 1), b),
            (TableKey::new("41", 0), c),
        ]
        .into_iter()
        .collect()
    })
}

fn query() -> impl Strategy<Value = Query> {
    (name(), prop::option::of(prop::sample::select(SCOPES))).prop_map(|(text, scope)| Query {
        text,
        scope: scope.map(str::to_string),
    })
}

proptest! {
    #[test]
    fn raising_the_threshold_only_removes_matches(
        table in table(0),
        text in name(),
        low in 0u8..=100,
        high in 0u8..=100,
    ) {
        let (low, high) = (low.min(high), low.max(high));
        let loose = find_matches(&text, &table, 0, "41", low, None);
        let strict = find_matches(&text, &table, 0, "41", high, None);
        prop_assert!(strict.len() <= loose.len());
        for hit in &strict {
            prop_assert!(loose.contains(hit));
        }
    }

    #[test]
    fn scoped_matches_come_only_from_the_scope(
        table in table(0),
        text in name(),
        scope in prop::sample::select(vec!["USA", "MEX", "FRA"]),
    ) {
        let scoped = find_matches(&text, &table, 0, "41", 0, Some(scope));
        prop_assert!(scoped.iter().all(|m| m.gid_0 == scope));

        let unscoped = find_matches(&text, &table, 0, "41", 0, None);
        prop_assert_eq!(unscoped.len(), table.len());
    }

    #[test]
    fn run_output_is_grouped_and_ranked(
        tables in repository(),
        queries in prop::collection::vec(query(), 0..5),
        threshold in 0u8..=100,
    ) {
        let result = run(&queries, &tables, threshold);
        prop_assert!(result.is_ranked());
        prop_assert!(result.iter().all(|m| m.score >= threshold));
    }

    #[test]
    fn tables_without_level_columns_never_match(
        table in table(1),
        text in name(),
        threshold in 0u8..=100,
    ) {
        prop_assert!(find_matches(&text, &table, 0, "41", threshold, None).is_empty());
        prop_assert!(find_matches(&text, &table, 2, "41", threshold, None).is_empty());
    }

    #[test]
    fn run_is_idempotent(
        tables in repository(),
        queries in prop::collection::vec(query(), 0..5),
        threshold in 0u8..=100,
    ) {
        prop_assert_eq!(run(&queries, &tables, threshold), run(&queries, &tables, threshold));
    }
}
