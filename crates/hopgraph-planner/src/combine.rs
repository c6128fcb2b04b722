//! Bounded Cartesian products over per-mention entity candidate lists.

use hopgraph_core::EntityId;

/// All combinations drawing one entity per input list, outer-to-inner in
/// list order: the first list varies slowest. No deduplication beyond the
/// caller's truncation; an empty input (or any empty list) has no
/// combinations.
pub fn combine_entities(entity_ids: &[Vec<EntityId>]) -> Vec<Vec<EntityId>> {
    if entity_ids.is_empty() {
        return Vec::new();
    }

    let mut combs: Vec<Vec<EntityId>> = vec![Vec::new()];
    for list in entity_ids {
        let mut next = Vec::with_capacity(combs.len() * list.len());
        for prefix in &combs {
            for entity in list {
                let mut comb = Vec::with_capacity(prefix.len() + 1);
                comb.extend_from_slice(prefix);
                comb.push(entity.clone());
                next.push(comb);
            }
        }
        combs = next;
    }
    combs
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ids(names: &[&str]) -> Vec<EntityId> {
        names.iter().map(|n| EntityId::new(*n)).collect()
    }

    #[test]
    fn two_by_three_yields_six_outer_major() {
        let lists = vec![ids(&["A", "B"]), ids(&["x", "y", "z"])];
        let combs = combine_entities(&lists);
        let rendered: Vec<String> = combs
            .iter()
            .map(|c| c.iter().map(|e| e.as_str()).collect::<Vec<_>>().join(""))
            .collect();
        assert_eq!(rendered, vec!["Ax", "Ay", "Az", "Bx", "By", "Bz"]);
    }

    #[test]
    fn empty_inputs_have_no_combinations() {
        assert!(combine_entities(&[]).is_empty());
        assert!(combine_entities(&[ids(&["A"]), Vec::new()]).is_empty());
    }

    #[test]
    fn single_list_is_identity() {
        let lists = vec![ids(&["A", "B"])];
        let combs = combine_entities(&lists);
        assert_eq!(combs, vec![ids(&["A"]), ids(&["B"])]);
    }

    proptest! {
        #[test]
        fn length_is_product_of_list_lengths(
            sizes in proptest::collection::vec(0usize..5, 1..4)
        ) {
            let lists: Vec<Vec<EntityId>> = sizes
                .iter()
                .enumerate()
                .map(|(i, &n)| (0..n).map(|j| EntityId::new(format!("Q{i}_{j}"))).collect())
                .collect();
            let combs = combine_entities(&lists);
            let expected: usize = sizes.iter().product();
            prop_assert_eq!(combs.len(), expected);
            for comb in &combs {
                prop_assert_eq!(comb.len(), lists.len());
            }
        }

        #[test]
        fn order_is_lexicographic_in_list_indexes(
            a in 1usize..4, b in 1usize..4
        ) {
            let lists = vec![
                (0..a).map(|i| EntityId::new(format!("A{i}"))).collect::<Vec<_>>(),
                (0..b).map(|i| EntityId::new(format!("B{i}"))).collect::<Vec<_>>(),
            ];
            let combs = combine_entities(&lists);
            for (n, comb) in combs.iter().enumerate() {
                let expect_first = n / b;
                let expect_second = n % b;
                prop_assert_eq!(comb[0].as_str(), format!("A{expect_first}"));
                prop_assert_eq!(comb[1].as_str(), format!("B{expect_second}"));
            }
        }
    }
}
