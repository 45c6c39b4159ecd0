//! Tree flattening
//!
//! Turns one root category into its pre-order row sequence plus the list of
//! leaves whose products must be fetched. Each subtree is flattened on its
//! own and spliced into its parent's result, so no accumulator is shared
//! across recursive calls.

use super::category::{CategoryNode, FlatEntry, PendingFetch};

/// Pre-order rows of one subtree and the leaves anchored in them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flattened {
    pub entries: Vec<FlatEntry>,
    pub pending: Vec<PendingFetch>,
}

impl Flattened {
    /// Append a flattened sibling subtree, rebasing its anchors onto `self`
    fn extend(&mut self, subtree: Self) {
        let base = self.entries.len();
        self.entries.extend(subtree.entries);
        self.pending
            .extend(subtree.pending.into_iter().map(|mut fetch| {
                fetch.anchor += base;
                fetch
            }));
    }
}

/// Flatten `root` in strict pre-order, depth counted from 1.
///
/// Only nodes without children are leaves. An interior node that also
/// carries a shard is never fetched. A leaf is scheduled when it has an id
/// and a non-empty shard.
pub fn flatten_category(root: &CategoryNode) -> Flattened {
    flatten_subtree(root, 1)
}

fn flatten_subtree(node: &CategoryNode, level: u32) -> Flattened {
    let mut flat = Flattened {
        entries: vec![FlatEntry::category(node, level)],
        pending: Vec::new(),
    };

    if node.is_leaf() {
        if let Some(category_id) = node.id.filter(|_| !node.shard.is_empty()) {
            flat.pending.push(PendingFetch {
                anchor: 0,
                category_id,
                shard: node.shard.clone(),
            });
        }
        return flat;
    }

    for child in &node.children {
        flat.extend(flatten_subtree(child, level + 1));
    }
    flat
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn node(id: u64, name: &str, shard: &str, children: Vec<CategoryNode>) -> CategoryNode {
        CategoryNode {
            id: Some(id),
            name: name.to_string(),
            shard: shard.to_string(),
            children,
        }
    }

    fn names(flat: &Flattened) -> Vec<(&str, u32)> {
        flat.entries
            .iter()
            .map(|e| (e.name.as_str(), e.level))
            .collect()
    }

    #[test]
    fn test_pre_order_with_depths() {
        let root = node(
            1,
            "A",
            "",
            vec![
                node(2, "B", "", vec![node(3, "C", "s3", vec![]), node(4, "D", "s4", vec![])]),
                node(5, "E", "s5", vec![]),
            ],
        );

        let flat = flatten_category(&root);

        assert_eq!(
            names(&flat),
            vec![("A", 1), ("B", 2), ("C", 3), ("D", 3), ("E", 2)]
        );
        let anchors: Vec<_> = flat.pending.iter().map(|p| (p.anchor, p.category_id)).collect();
        assert_eq!(anchors, vec![(2, 3), (3, 4), (4, 5)]);
    }

    #[test]
    fn test_interior_shard_is_ignored() {
        let root = node(1, "A", "root-shard", vec![node(2, "B", "", vec![])]);

        let flat = flatten_category(&root);

        assert_eq!(flat.entries.len(), 2);
        assert!(flat.pending.is_empty());
    }

    #[test]
    fn test_leaf_with_empty_shard_is_not_scheduled() {
        let flat = flatten_category(&node(77, "Lonely", "", vec![]));
        assert_eq!(names(&flat), vec![("Lonely", 1)]);
        assert_eq!(flat.pending.len(), 0);
    }

    #[test]
    fn test_leaf_without_id_is_not_scheduled() {
        let leaf = CategoryNode {
            id: None,
            name: "NoId".to_string(),
            shard: "s1".to_string(),
            children: vec![],
        };
        let flat = flatten_category(&node(1, "A", "", vec![leaf]));
        assert_eq!(flat.entries.len(), 2);
        assert!(flat.pending.is_empty());
    }

    #[test]
    fn test_root_leaf_is_scheduled_at_anchor_zero() {
        let flat = flatten_category(&node(9, "Solo", "s9", vec![]));
        assert_eq!(
            flat.pending,
            vec![PendingFetch {
                anchor: 0,
                category_id: 9,
                shard: "s9".to_string(),
            }]
        );
    }

    fn arb_tree() -> impl Strategy<Value = CategoryNode> {
        let leaf = (any::<u16>(), prop::bool::ANY).prop_map(|(id, sharded)| CategoryNode {
            id: Some(u64::from(id)),
            name: format!("n{id}"),
            shard: if sharded { "s".to_string() } else { String::new() },
            children: vec![],
        });
        leaf.prop_recursive(4, 48, 5, |inner| {
            (any::<u16>(), prop::collection::vec(inner, 1..5)).prop_map(|(id, children)| {
                CategoryNode {
                    id: Some(u64::from(id)),
                    name: format!("n{id}"),
                    shard: String::new(),
                    children,
                }
            })
        })
    }

    fn count_nodes(node: &CategoryNode) -> usize {
        1 + node.children.iter().map(count_nodes).sum::<usize>()
    }

    proptest! {
        #[test]
        fn prop_every_node_precedes_its_subtree(root in arb_tree()) {
            let flat = flatten_category(&root);
            prop_assert_eq!(flat.entries.len(), count_nodes(&root));

            // In pre-order, each row's level is at most one deeper than the previous row.
            prop_assert_eq!(flat.entries[0].level, 1);
            for pair in flat.entries.windows(2) {
                prop_assert!(pair[1].level <= pair[0].level + 1);
            }
        }

        #[test]
        fn prop_anchors_point_at_scheduled_leaves(root in arb_tree()) {
            let flat = flatten_category(&root);
            let mut previous = None;
            for fetch in &flat.pending {
                let row = &flat.entries[fetch.anchor];
                prop_assert_eq!(row.id, Some(fetch.category_id));
                prop_assert!(previous.is_none_or(|p| p < fetch.anchor));
                previous = Some(fetch.anchor);
            }
        }
    }
}
