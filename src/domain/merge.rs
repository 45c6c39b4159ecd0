//! Positional merge of leaf products into the flattened tree
//!
//! Anchors are recorded before any product is inserted. Every insertion
//! shifts the rows after it, so each anchor is corrected by the number of
//! products already spliced in by earlier leaves.

use super::category::{FlatEntry, ProductRecord};

/// Splice each leaf's products in right after the leaf's own row.
///
/// `fetched` must be in anchor order (the order the flattener recorded
/// them). Empty product lists leave `entries` untouched. Returns the number
/// of product rows inserted.
pub fn merge_products<I>(entries: &mut Vec<FlatEntry>, fetched: I) -> usize
where
    I: IntoIterator<Item = (usize, Vec<ProductRecord>)>,
{
    let mut offset = 0;
    for (anchor, products) in fetched {
        if products.is_empty() {
            continue;
        }
        let insert_at = anchor + 1 + offset;
        let inserted = products.len();
        entries.splice(insert_at..insert_at, products.into_iter().map(FlatEntry::from));
        offset += inserted;
    }
    offset
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::PLACEHOLDER_RANK;
    use proptest::prelude::*;

    fn row(id: u64, level: u32) -> FlatEntry {
        FlatEntry {
            id: Some(id),
            name: format!("c{id}"),
            level,
        }
    }

    fn products(ids: &[u64]) -> Vec<ProductRecord> {
        ids.iter().map(|&id| ProductRecord::new(id, format!("p{id}"))).collect()
    }

    fn ids(entries: &[FlatEntry]) -> Vec<u64> {
        entries.iter().filter_map(|e| e.id).collect()
    }

    #[test]
    fn test_offsets_accumulate_across_leaves() {
        let mut entries = vec![row(1, 1), row(2, 2), row(3, 2), row(4, 2)];

        let inserted = merge_products(
            &mut entries,
            vec![(1, products(&[100, 101])), (2, products(&[200])), (3, products(&[300, 301, 302]))],
        );

        assert_eq!(inserted, 6);
        assert_eq!(
            ids(&entries),
            vec![1, 2, 100, 101, 3, 200, 4, 300, 301, 302]
        );
        assert_eq!(entries[2].level, PLACEHOLDER_RANK);
    }

    #[test]
    fn test_empty_fetch_is_a_no_op() {
        let mut entries = vec![row(1, 1), row(2, 2), row(3, 2)];
        let before = entries.clone();

        let inserted = merge_products(&mut entries, vec![(1, vec![]), (2, vec![])]);

        assert_eq!(inserted, 0);
        assert_eq!(entries, before);
    }

    #[test]
    fn test_empty_leaf_between_filled_leaves() {
        let mut entries = vec![row(1, 1), row(2, 2), row(3, 2), row(4, 2)];

        merge_products(
            &mut entries,
            vec![(1, products(&[10])), (2, vec![]), (3, products(&[30]))],
        );

        assert_eq!(ids(&entries), vec![1, 2, 10, 3, 4, 30]);
    }

    proptest! {
        #[test]
        fn prop_each_anchor_is_followed_by_its_products(
            counts in prop::collection::vec(0usize..6, 1..12)
        ) {
            // Root row followed by one leaf row per count.
            let mut entries = vec![row(0, 1)];
            entries.extend((1..=counts.len() as u64).map(|id| row(id, 2)));
            let original = entries.clone();

            let fetched: Vec<_> = counts
                .iter()
                .enumerate()
                .map(|(i, &count)| {
                    let base = 1000 * (i as u64 + 1);
                    (i + 1, products(&(base..base + count as u64).collect::<Vec<_>>()))
                })
                .collect();
            let expected_products = fetched.clone();

            let inserted = merge_products(&mut entries, fetched);
            prop_assert_eq!(inserted, counts.iter().sum::<usize>());
            prop_assert_eq!(entries.len(), original.len() + inserted);

            let mut cursor = 1;
            for (i, (_, leaf_products)) in expected_products.iter().enumerate() {
                prop_assert_eq!(&entries[cursor], &original[i + 1]);
                cursor += 1;
                for product in leaf_products {
                    prop_assert_eq!(entries[cursor].id, Some(product.id));
                    cursor += 1;
                }
            }
            prop_assert_eq!(cursor, entries.len());
        }
    }
}
