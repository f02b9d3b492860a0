//! Facet counts over a list of equipment records.

use std::collections::HashMap;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::equipment::EquipmentRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FacetField {
    PrimaryType,
    Make,
    Model,
    RentToPurchase,
    BuyItNow,
}

impl FacetField {
    pub const ALL: [FacetField; 5] = [
        FacetField::PrimaryType,
        FacetField::Make,
        FacetField::Model,
        FacetField::RentToPurchase,
        FacetField::BuyItNow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FacetField::PrimaryType => "primaryType",
            FacetField::Make => "make",
            FacetField::Model => "model",
            FacetField::RentToPurchase => "rentToPurchase",
            FacetField::BuyItNow => "buyItNow",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum FacetOriginalValue {
    String(String),
    Bool(bool),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetItem {
    pub display_string: String,
    pub original_value: FacetOriginalValue,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FacetSet {
    pub primary_type: Vec<FacetItem>,
    pub make: Vec<FacetItem>,
    pub model: Vec<FacetItem>,
    pub rent_to_purchase: Vec<FacetItem>,
    pub buy_it_now: Vec<FacetItem>,
}

impl FacetSet {
    pub fn get(&self, field: FacetField) -> &[FacetItem] {
        match field {
            FacetField::PrimaryType => &self.primary_type,
            FacetField::Make => &self.make,
            FacetField::Model => &self.model,
            FacetField::RentToPurchase => &self.rent_to_purchase,
            FacetField::BuyItNow => &self.buy_it_now,
        }
    }

    pub fn is_empty(&self) -> bool {
        FacetField::ALL.iter().all(|field| self.get(*field).is_empty())
    }
}

/// Counts values in first-seen order so that equal counts keep encounter order.
struct OrderedCounter<K> {
    index: HashMap<K, usize>,
    counts: Vec<(K, u64)>,
}

impl<K: Eq + Hash + Clone> OrderedCounter<K> {
    fn new() -> Self {
        Self { index: HashMap::new(), counts: Vec::new() }
    }

    fn add(&mut self, key: Option<&K>) {
        let Some(key) = key else { return };
        match self.index.get(key) {
            Some(&i) => self.counts[i].1 += 1,
            None => {
                self.index.insert(key.clone(), self.counts.len());
                self.counts.push((key.clone(), 1));
            }
        }
    }

    fn into_sorted(self) -> Vec<(K, u64)> {
        let mut counts = self.counts;
        // stable: ties stay in insertion order
        counts.sort_by_key(|(_k, count)| u64::MAX - *count);
        counts
    }
}

fn string_facet(counter: OrderedCounter<String>) -> Vec<FacetItem> {
    counter
        .into_sorted()
        .into_iter()
        .map(|(value, count)| FacetItem {
            display_string: value.clone(),
            original_value: FacetOriginalValue::String(value),
            count,
        })
        .collect()
}

fn bool_facet(counter: OrderedCounter<bool>) -> Vec<FacetItem> {
    counter
        .into_sorted()
        .into_iter()
        .map(|(value, count)| FacetItem {
            display_string: value.to_string(),
            original_value: FacetOriginalValue::Bool(value),
            count,
        })
        .collect()
}

pub fn compute_facets(records: &[EquipmentRecord]) -> FacetSet {
    let mut primary_type = OrderedCounter::new();
    let mut make = OrderedCounter::new();
    let mut model = OrderedCounter::new();
    let mut rent_to_purchase = OrderedCounter::new();
    let mut buy_it_now = OrderedCounter::new();

    for record in records {
        primary_type.add(record.primary_type.as_ref());
        make.add(record.make.as_ref());
        model.add(record.model.as_ref());
        rent_to_purchase.add(record.rent_to_purchase.as_ref());
        buy_it_now.add(record.buy_it_now.as_ref());
    }

    FacetSet {
        primary_type: string_facet(primary_type),
        make: string_facet(make),
        model: string_facet(model),
        rent_to_purchase: bool_facet(rent_to_purchase),
        buy_it_now: bool_facet(buy_it_now),
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn typed(id: &str, primary_type: Option<&str>) -> EquipmentRecord {
        let mut record = EquipmentRecord::new(id);
        record.primary_type = primary_type.map(str::to_string);
        record
    }

    fn counts(items: &[FacetItem]) -> Vec<(String, u64)> {
        items.iter().map(|i| (i.display_string.clone(), i.count)).collect()
    }

    #[test]
    fn counts_types_descending() {
        let records = vec![
            typed("1", Some("Excavator")),
            typed("2", Some("Excavator")),
            typed("3", Some("Forklift")),
        ];
        let facets = compute_facets(&records);
        assert_eq!(
            facets.primary_type,
            vec![
                FacetItem {
                    display_string: "Excavator".to_string(),
                    original_value: FacetOriginalValue::String("Excavator".to_string()),
                    count: 2,
                },
                FacetItem {
                    display_string: "Forklift".to_string(),
                    original_value: FacetOriginalValue::String("Forklift".to_string()),
                    count: 1,
                },
            ]
        );
    }

    #[test]
    fn ties_keep_first_encounter_order() {
        let records = vec![
            typed("1", Some("Skid Steer")),
            typed("2", Some("Boom Lift")),
            typed("3", Some("Telehandler")),
            typed("4", Some("Telehandler")),
            typed("5", Some("Boom Lift")),
        ];
        let facets = compute_facets(&records);
        assert_eq!(
            counts(&facets.primary_type),
            vec![
                ("Boom Lift".to_string(), 2),
                ("Telehandler".to_string(), 2),
                ("Skid Steer".to_string(), 1),
            ]
        );
    }

    #[test]
    fn absent_values_are_not_counted() {
        let mut flagged = typed("1", None);
        flagged.buy_it_now = Some(true);
        flagged.rent_to_purchase = Some(false);
        let records = vec![flagged, typed("2", None), typed("3", Some("Dozer"))];

        let facets = compute_facets(&records);
        assert_eq!(counts(&facets.primary_type), vec![("Dozer".to_string(), 1)]);
        assert!(facets.make.is_empty());
        assert_eq!(facets.buy_it_now[0].original_value, FacetOriginalValue::Bool(true));
        assert_eq!(counts(&facets.rent_to_purchase), vec![("false".to_string(), 1)]);
    }

    #[test]
    fn empty_input_yields_empty_facets() {
        let facets = compute_facets(&[]);
        assert!(facets.is_empty());
        for field in FacetField::ALL {
            assert!(facets.get(field).is_empty(), "{}", field.as_str());
        }
    }

    fn arb_name() -> impl Strategy<Value = Option<&'static str>> {
        prop::option::of(prop::sample::select(vec!["A", "B", "C", "D"]))
    }

    fn arb_record() -> impl Strategy<Value = EquipmentRecord> {
        (arb_name(), arb_name(), arb_name(), prop::option::of(any::<bool>()), prop::option::of(any::<bool>()))
            .prop_map(|(t, mk, md, rtp, bin)| {
                let mut record = EquipmentRecord::new("x");
                record.primary_type = t.map(str::to_string);
                record.make = mk.map(str::to_string);
                record.model = md.map(str::to_string);
                record.rent_to_purchase = rtp;
                record.buy_it_now = bin;
                record
            })
    }

    proptest! {
        #[test]
        fn counts_sum_to_records_with_field(records in prop::collection::vec(arb_record(), 0..40)) {
            let facets = compute_facets(&records);
            let total = |items: &[FacetItem]| items.iter().map(|i| i.count).sum::<u64>();

            prop_assert_eq!(total(&facets.primary_type), records.iter().filter(|r| r.primary_type.is_some()).count() as u64);
            prop_assert_eq!(total(&facets.make), records.iter().filter(|r| r.make.is_some()).count() as u64);
            prop_assert_eq!(total(&facets.model), records.iter().filter(|r| r.model.is_some()).count() as u64);
            prop_assert_eq!(total(&facets.rent_to_purchase), records.iter().filter(|r| r.rent_to_purchase.is_some()).count() as u64);
            prop_assert_eq!(total(&facets.buy_it_now), records.iter().filter(|r| r.buy_it_now.is_some()).count() as u64);

            for field in FacetField::ALL {
                let items = facets.get(field);
                prop_assert!(items.windows(2).all(|w| w[0].count >= w[1].count));
            }
        }
    }
}
