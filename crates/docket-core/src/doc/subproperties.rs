//! Nesting of dotted names (`opts.foo.bar`) into `properties` trees.

use rustc_hash::FxHashMap;

use crate::model::Param;

/// Result of nesting a flat list of items.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Nested {
    pub items: Vec<Param>,
    /// Dotted names whose parent is missing. They stay top-level.
    pub orphans: Vec<String>,
}

/// Fold items with dotted names under the item named by their prefix. The
/// order of the input does not matter: children may come before parents.
/// Nested items are renamed to the last segment of their name.
pub(crate) fn nest(items: Vec<Param>) -> Nested {
    let names: Vec<String> = items
        .iter()
        .map(|item| item.name.clone().unwrap_or_default())
        .collect();

    let mut index: FxHashMap<&str, usize> = FxHashMap::default();
    for (idx, name) in names.iter().enumerate() {
        index.entry(name.as_str()).or_insert(idx);
    }

    let parents: Vec<Option<usize>> = names
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let (prefix, _) = name.rsplit_once('.')?;
            index.get(prefix).copied().filter(|parent| *parent != idx)
        })
        .collect();

    let mut orphans = Vec::new();
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); items.len()];
    let mut roots = Vec::new();
    for (idx, parent) in parents.iter().enumerate() {
        match parent {
            Some(parent) => children[*parent].push(idx),
            None => {
                if names[idx].contains('.') && !names[idx].starts_with('.') {
                    orphans.push(names[idx].clone());
                }
                roots.push(idx);
            }
        }
    }

    let mut slots: Vec<Option<Param>> = items.into_iter().map(Some).collect();
    let items = roots
        .into_iter()
        .filter_map(|idx| build(idx, &mut slots, &children, false))
        .collect();
    Nested { items, orphans }
}

fn build(
    idx: usize,
    slots: &mut [Option<Param>],
    children: &[Vec<usize>],
    nested: bool,
) -> Option<Param> {
    let mut item = slots[idx].take()?;
    if nested {
        let short = item
            .name
            .as_deref()
            .and_then(|name| name.rsplit('.').next())
            .map(str::to_string);
        item.name = short;
    }
    for child in &children[idx] {
        if let Some(child) = build(*child, slots, children, true) {
            item.properties.push(child);
        }
    }
    Some(item)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[Param]) -> Vec<&str> {
        items.iter().filter_map(|p| p.name.as_deref()).collect()
    }

    #[test]
    fn nests_dotted_names() {
        let nested = nest(vec![
            Param::new("opts"),
            Param::new("opts.foo"),
            Param::new("opts.foo.bar"),
            Param::new("other"),
        ]);
        assert_eq!(names(&nested.items), vec!["opts", "other"]);
        assert_eq!(names(&nested.items[0].properties), vec!["foo"]);
        assert_eq!(names(&nested.items[0].properties[0].properties), vec!["bar"]);
        assert!(nested.orphans.is_empty());
    }

    #[test]
    fn children_before_parents() {
        let nested = nest(vec![Param::new("opts.foo"), Param::new("opts")]);
        assert_eq!(names(&nested.items), vec!["opts"]);
        assert_eq!(names(&nested.items[0].properties), vec!["foo"]);
    }

    #[test]
    fn parentless_names_stay_top_level() {
        let nested = nest(vec![Param::new("foo.one"), Param::new("bar")]);
        assert_eq!(names(&nested.items), vec!["foo.one", "bar"]);
        assert_eq!(nested.orphans, vec!["foo.one".to_string()]);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn shape(items: &[Param]) -> Vec<(String, usize)> {
            let mut out = Vec::new();
            for item in items {
                out.push((item.name.clone().unwrap_or_default(), item.properties.len()));
                out.extend(shape(&item.properties));
            }
            out.sort();
            out
        }

        proptest! {
            /// The resulting tree does not depend on the input order.
            #[test]
            fn nesting_is_order_independent(order in Just(vec![
                "a", "a.b", "a.b.c", "a.d", "e", "e.f",
            ]).prop_shuffle()) {
                let shuffled = nest(order.iter().map(|n| Param::new(*n)).collect());
                let sorted = nest(
                    ["a", "a.b", "a.b.c", "a.d", "e", "e.f"].iter().map(|n| Param::new(*n)).collect(),
                );
                prop_assert_eq!(shape(&shuffled.items), shape(&sorted.items));
                prop_assert_eq!(shuffled.items.len(), 2);
            }
        }
    }
}
