use proptest::prelude::*;

use scrub_core::{profile_columns, standardize_formats};
use scrub_model::{Dataset, Record, Value};

fn column_dataset(column: &str, values: Vec<String>) -> Dataset {
    Dataset::from_records(
        values
            .into_iter()
            .map(|value| {
                [(column.to_string(), Value::Text(value))]
                    .into_iter()
                    .collect::<Record>()
            })
            .collect(),
    )
}

fn date_token() -> impl Strategy<Value = String> {
    (
        1900u32..2100,
        1u32..=12,
        1u32..=28,
        prop::sample::select(vec!['-', '.', '/']),
        0u8..3,
    )
        .prop_map(|(year, month, day, sep, order)| match order {
            0 => format!("{year}{sep}{month}{sep}{day}"),
            1 => format!("{day}{sep}{month}{sep}{year}"),
            _ => format!("{month}{sep}{day}{sep}{year}"),
        })
}

fn email_token() -> impl Strategy<Value = String> {
    ("[a-zA-Z]{1,8}", "[a-zA-Z]{1,8}", "[a-z]{2,3}", 0usize..3)
        .prop_map(|(local, host, tld, pad)| {
            format!("{}{local}@{host}.{tld}{}", " ".repeat(pad), " ".repeat(pad))
        })
}

proptest! {
    #[test]
    fn date_standardization_is_idempotent(values in prop::collection::vec(date_token(), 1..8)) {
        let mut dataset = column_dataset("d", values);
        let profiles = profile_columns(&dataset, 100);
        standardize_formats(&mut dataset, &profiles);
        let once = dataset.clone();
        let changed = standardize_formats(&mut dataset, &profiles);
        prop_assert_eq!(changed, 0);
        prop_assert_eq!(dataset.records(), once.records());
    }

    #[test]
    fn email_standardization_is_idempotent(values in prop::collection::vec(email_token(), 1..8)) {
        let mut dataset = column_dataset("e", values);
        let profiles = profile_columns(&dataset, 100);
        standardize_formats(&mut dataset, &profiles);
        let once = dataset.clone();
        let changed = standardize_formats(&mut dataset, &profiles);
        prop_assert_eq!(changed, 0);
        prop_assert_eq!(dataset.records(), once.records());
    }
}
