//! Listing pipeline shared by products and orders: filter, stable sort,
//! fixed-size pagination.

use std::cmp::Ordering;

use serde::Serialize;

use crate::errors::ServiceError;

/// Page size for every listing endpoint.
pub const PER_PAGE: usize = 20;

/// A filter predicate over one record. Predicates AND together.
pub type Filter<T> = Box<dyn Fn(&T) -> bool>;

/// A resolved sort comparator. `None` leaves the filtered sequence in file
/// order.
pub type SortCmp<T> = fn(&T, &T) -> Ordering;

/// One page of results plus pagination metadata.
#[derive(Clone, Debug, Serialize)]
pub struct Page<T> {
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub data: Vec<T>,
}

/// Produce one page from the full record sequence.
///
/// Sorting must stay stable: records with equal sort keys keep their
/// relative file order. An out-of-range page fails `NotFound`, except that
/// page 1 of an empty filtered set is an empty success (the upper-bound
/// check only applies when there is at least one page).
pub fn paginate<T>(
    records: Vec<T>,
    filters: &[Filter<T>],
    sort: Option<SortCmp<T>>,
    page: usize,
) -> Result<Page<T>, ServiceError> {
    let mut records: Vec<T> = records
        .into_iter()
        .filter(|r| filters.iter().all(|f| f(r)))
        .collect();

    if let Some(cmp) = sort {
        records.sort_by(cmp);
    }

    let total_items = records.len();
    let total_pages = total_items.div_ceil(PER_PAGE);
    if page < 1 || (total_pages > 0 && page > total_pages) {
        return Err(ServiceError::NotFound("page not found".into()));
    }

    let data: Vec<T> = records
        .into_iter()
        .skip((page - 1) * PER_PAGE)
        .take(PER_PAGE)
        .collect();

    Ok(Page {
        page,
        per_page: PER_PAGE,
        total_items,
        total_pages,
        has_next: page < total_pages,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: usize) -> Vec<u64> {
        (1..=n as u64).collect()
    }

    #[test]
    fn total_pages_is_ceiling_of_count() {
        for (n, pages) in [(0usize, 0usize), (1, 1), (20, 1), (21, 2), (40, 2), (41, 3)] {
            let page = paginate(items(n), &[], None, 1).expect("page 1 always valid");
            assert_eq!(page.total_pages, pages, "n = {n}");
            assert_eq!(page.total_items, n);
        }
    }

    #[test]
    fn page_past_the_end_is_not_found() {
        let err = paginate(items(21), &[], None, 3).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        assert!(matches!(paginate(items(5), &[], None, 0), Err(ServiceError::NotFound(_))));
    }

    #[test]
    fn empty_set_accepts_page_one() {
        let page = paginate(Vec::<u64>::new(), &[], None, 1).expect("empty page 1");
        assert_eq!(page.total_pages, 0);
        assert!(page.data.is_empty());
        assert!(!page.has_next);
    }

    #[test]
    fn has_next_compares_page_index_not_remaining_items() {
        // full last page: 40 items, page 2 of 2
        let page = paginate(items(40), &[], None, 2).expect("page 2");
        assert_eq!(page.data.len(), 20);
        assert!(!page.has_next);

        let page = paginate(items(40), &[], None, 1).expect("page 1");
        assert!(page.has_next);
    }

    #[test]
    fn slicing_is_half_open() {
        let page = paginate(items(45), &[], None, 3).expect("page 3");
        assert_eq!(page.data, (41..=45).collect::<Vec<u64>>());
    }

    #[test]
    fn filters_and_together() {
        let filters: Vec<Filter<u64>> = vec![
            Box::new(|n: &u64| *n > 10),
            Box::new(|n: &u64| *n % 2 == 0),
        ];
        let page = paginate(items(30), &filters, None, 1).expect("page 1");
        assert_eq!(page.data, vec![12, 14, 16, 18, 20, 22, 24, 26, 28, 30]);
        assert_eq!(page.total_items, 10);
    }

    #[test]
    fn sort_is_stable_on_equal_keys() {
        // sort by the first component only; second component records input order
        let records = vec![(2u64, 'a'), (1, 'b'), (2, 'c'), (1, 'd'), (2, 'e')];
        let cmp: SortCmp<(u64, char)> = |a, b| a.0.cmp(&b.0);
        let page = paginate(records, &[], Some(cmp), 1).expect("page 1");
        assert_eq!(page.data, vec![(1, 'b'), (1, 'd'), (2, 'a'), (2, 'c'), (2, 'e')]);
    }

    #[test]
    fn no_sort_keeps_file_order() {
        let records = vec![3u64, 1, 2];
        let page = paginate(records, &[], None, 1).expect("page 1");
        assert_eq!(page.data, vec![3, 1, 2]);
    }
}
