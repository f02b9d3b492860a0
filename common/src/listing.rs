//! Listing pipeline: facets over the raw records, then filter, sort and paginate.

use serde::{Deserialize, Serialize};

use crate::equipment::EquipmentRecord;
use crate::facets::{FacetSet, compute_facets};
use crate::filter::filter_records;
use crate::listing_params::ListingParams;
use crate::pagination::{PageToken, PaginationState};
use crate::sort::{SortKey, sort_records};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingPage {
    pub facets: FacetSet,
    pub items: Vec<EquipmentRecord>,
    /// Records matching the selection, across all pages.
    pub total_items: usize,
    pub pagination: PaginationState,
    pub page_window: Vec<PageToken>,
    pub sort: SortKey,
}

#[derive(Debug, Clone, Copy)]
pub struct ListingPipeline {
    pub page_size: usize,
}

impl ListingPipeline {
    pub fn new(page_size: usize) -> Self {
        Self { page_size: page_size.max(1) }
    }

    pub fn run(&self, records: &[EquipmentRecord], params: &ListingParams) -> ListingPage {
        let facets = compute_facets(records);
        let filtered = filter_records(records, &params.selection);
        let mut sorted = sort_records(&filtered, params.sort);

        let total_items = sorted.len();
        let pagination = PaginationState::for_items(params.page, total_items, self.page_size);
        let range = pagination.item_range(self.page_size, total_items);
        sorted.truncate(range.end);
        let items = sorted.split_off(range.start);

        ListingPage {
            facets,
            items,
            total_items,
            page_window: pagination.window(),
            pagination,
            sort: params.sort,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::equipment::RentalRate;
    use crate::pagination::PageToken::{Ellipsis, Page};

    fn machine(i: usize) -> EquipmentRecord {
        let mut record = EquipmentRecord::new(format!("m-{i}"));
        record.primary_type = Some(if i % 2 == 0 { "Excavator" } else { "Forklift" }.to_string());
        record.distance_meters = Some(i as f64 * 100.0);
        record.rental_rate = Some(RentalRate::Flat(1000.0 + i as f64));
        record
    }

    #[test]
    fn facets_cover_unfiltered_records() {
        let records: Vec<_> = (0..10).map(machine).collect();
        let params = ListingParams::from_query_pairs([("category", "Forklift")]);
        let page = ListingPipeline::new(12).run(&records, &params);

        assert_eq!(page.total_items, 5);
        assert!(page.items.iter().all(|r| r.primary_type.as_deref() == Some("Forklift")));
        assert_eq!(page.facets.primary_type.len(), 2);
        assert_eq!(page.facets.primary_type[0].count, 5);
        assert!(!page.pagination.should_render());
    }

    #[test]
    fn pages_through_sorted_results() {
        let records: Vec<_> = (0..100).rev().map(machine).collect();
        let params = ListingParams::from_query_pairs([("sort", "rate-desc"), ("page", "8")]);
        let page = ListingPipeline::new(10).run(&records, &params);

        assert_eq!(page.total_items, 100);
        assert_eq!(page.pagination, PaginationState { current_page: 8, total_pages: 10 });
        assert_eq!(page.items.len(), 10);
        assert_eq!(page.items[0].id, "m-29");
        assert_eq!(page.items[9].id, "m-20");
        assert_eq!(page.page_window, vec![Page(1), Ellipsis, Page(6), Page(7), Page(8), Page(9), Page(10)]);
        assert_eq!(page.sort, SortKey::RateDesc);
    }

    #[test]
    fn page_past_the_end_is_clamped_to_last_page() {
        let records: Vec<_> = (0..25).map(machine).collect();
        let params = ListingParams::default().with_page(40);
        let page = ListingPipeline::new(10).run(&records, &params);

        assert_eq!(page.pagination.current_page, 3);
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.items[0].id, "m-20");
    }

    #[test]
    fn empty_input_gives_empty_page() {
        let page = ListingPipeline::new(10).run(&[], &ListingParams::default());
        assert!(page.items.is_empty());
        assert!(page.facets.is_empty());
        assert_eq!(page.total_items, 0);
        assert!(page.page_window.is_empty());
    }
}
