//! Events fired by methods, directly or through other methods of the class.

use indexmap::IndexSet;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::model::{Class, Member, TagName};

pub(crate) fn process_fires(class: &mut Class) {
    let methods: FxHashMap<&str, &Member> = class
        .members
        .iter()
        .filter(|m| m.tagname == TagName::Method)
        .map(|m| (m.name.as_str(), m))
        .collect();

    let detected: Vec<(usize, Vec<String>)> = class
        .members
        .iter()
        .enumerate()
        .filter(|(_, m)| m.tagname == TagName::Method && !m.explicit_fires)
        .map(|(idx, m)| {
            let mut visited = FxHashSet::default();
            let mut fires = IndexSet::new();
            collect(m, &methods, &mut visited, &mut fires);
            (idx, fires.into_iter().collect::<Vec<_>>())
        })
        .filter(|(_, fires)| !fires.is_empty())
        .collect();

    for (idx, fires) in detected {
        let member = &mut class.members[idx];
        member.fires = fires;
        member.autodetected.fires = true;
    }
}

/// Explicitly documented events stop the walk; otherwise events fired in
/// the body plus those of every called method.
fn collect<'a>(
    method: &'a Member,
    methods: &FxHashMap<&str, &'a Member>,
    visited: &mut FxHashSet<&'a str>,
    fires: &mut IndexSet<String>,
) {
    if !visited.insert(method.name.as_str()) {
        return;
    }
    if method.explicit_fires {
        fires.extend(method.fires.iter().cloned());
        return;
    }
    fires.extend(method.code.fires.iter().cloned());
    for called in &method.code.method_calls {
        if let Some(&next) = methods.get(called.as_str()) {
            collect(next, methods, visited, fires);
        }
    }
}
