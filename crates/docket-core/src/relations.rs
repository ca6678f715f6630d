//! Class registry with inheritance-aware member lookup.
//!
//! Classes live in a vector in registration order. Parent and mixin links
//! are resolved to indices once, when the registry is built. Lookups through
//! the inheritance chain are memoized per class, together with the id,
//! name, tagname and static flag each member had when it was indexed.
//!
//! Mutation through [`Relations::class_mut`] or [`Relations::member_mut`]
//! keeps the memo. Renaming a member or changing its tagname or static flag
//! leaves lookups answering from the old index until
//! [`Relations::refresh_member_ids`] or
//! [`Relations::refresh_all_member_ids`] is called.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

use crate::error::{DocsError, Result};
use crate::model::{Class, Member, TagName};
use crate::warnings::{WarningKind, Warnings};

/// Classes that are referenced everywhere but never documented.
const BUILTIN_PARENTS: &[&str] = &["Ext.Base", "Object"];

/// Position of a member in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberRef {
    pub class: usize,
    pub member: usize,
}

/// A member as it was when the lookup index was built.
#[derive(Debug, Clone)]
struct Indexed {
    r: MemberRef,
    name: String,
    tagname: TagName,
    r#static: bool,
    local_static: bool,
}

impl Indexed {
    fn new(r: MemberRef, member: &Member) -> Self {
        Self {
            r,
            name: member.name.clone(),
            tagname: member.tagname,
            r#static: member.r#static,
            local_static: member.is_local_static(),
        }
    }
}

/// Member id to the member winning under that id.
type MemberMap = IndexMap<String, Indexed>;

/// Memoized lookup tables of one class.
#[derive(Debug, Default)]
struct MemberIndex {
    visible: MemberMap,
    local: Vec<Indexed>,
}

/// Filter for [`ClassView::find_members`]. Unset fields match anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemberQuery<'a> {
    pub name: Option<&'a str>,
    pub tagname: Option<TagName>,
    pub r#static: Option<bool>,
    /// Only members declared by the class itself.
    pub local: bool,
}

impl<'a> MemberQuery<'a> {
    pub fn named(name: &'a str) -> Self {
        Self {
            name: Some(name),
            ..Self::default()
        }
    }

    pub fn tagname(mut self, tagname: TagName) -> Self {
        self.tagname = Some(tagname);
        self
    }

    pub fn statics(mut self, r#static: bool) -> Self {
        self.r#static = Some(r#static);
        self
    }

    pub fn local(mut self) -> Self {
        self.local = true;
        self
    }

    fn matches(&self, member: &Indexed) -> bool {
        self.name.is_none_or(|name| member.name == name)
            && self.tagname.is_none_or(|tagname| member.tagname == tagname)
            && self.r#static.is_none_or(|s| member.r#static == s)
    }
}

/// The aggregated class registry.
#[derive(Debug, Default)]
pub struct Relations {
    classes: Vec<Class>,
    /// Class names and alternate names to indices.
    index: FxHashMap<String, usize>,
    /// Names of classes folded away during aggregation.
    ignored: FxHashSet<String>,
    parents: Vec<Option<usize>>,
    mixins: Vec<Vec<usize>>,
    memo: RefCell<FxHashMap<usize, Rc<MemberIndex>>>,
    /// Winning member to the members it shadows.
    overrides: RefCell<FxHashMap<MemberRef, Vec<MemberRef>>>,
}

impl Relations {
    /// Build the registry, resolving parents and mixins.
    ///
    /// References to classes outside the registry are reported as warnings
    /// and treated as external. A class reaching itself through `extends`
    /// or `mixins` is an error.
    pub fn build(
        classes: Vec<Class>,
        ignored: FxHashSet<String>,
        warnings: &mut Warnings,
    ) -> Result<Self> {
        let mut index = FxHashMap::default();
        for (idx, class) in classes.iter().enumerate() {
            index.entry(class.name.clone()).or_insert(idx);
        }
        for (idx, class) in classes.iter().enumerate() {
            for alt in &class.alternate_class_names {
                index.entry(alt.clone()).or_insert(idx);
            }
        }

        let mut parents = Vec::with_capacity(classes.len());
        let mut mixins = Vec::with_capacity(classes.len());
        for class in &classes {
            let file = class.files.first();
            let parent = class.extends.as_deref().and_then(|name| {
                let found = index.get(name).copied();
                if found.is_none() && !BUILTIN_PARENTS.contains(&name) {
                    warnings.warn(
                        WarningKind::Extend,
                        format!("Class {} extends unknown class {}", class.name, name),
                        file,
                    );
                }
                found
            });
            parents.push(parent);

            let resolved = class
                .mixins
                .iter()
                .filter_map(|name| {
                    let found = index.get(name).copied();
                    if found.is_none() {
                        warnings.warn(
                            WarningKind::Mixin,
                            format!("Class {} mixes in unknown class {}", class.name, name),
                            file,
                        );
                    }
                    found
                })
                .collect();
            mixins.push(resolved);
        }

        let relations = Self {
            classes,
            index,
            ignored,
            parents,
            mixins,
            memo: RefCell::default(),
            overrides: RefCell::default(),
        };
        relations.check_cycles()?;
        tracing::debug!(classes = relations.classes.len(), "built class relations");
        Ok(relations)
    }

    /// Depth-first search over parent and mixin edges.
    fn check_cycles(&self) -> Result<()> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            New,
            Active,
            Done,
        }

        fn visit(relations: &Relations, idx: usize, marks: &mut [Mark], path: &mut Vec<usize>) -> Result<()> {
            match marks[idx] {
                Mark::Done => return Ok(()),
                Mark::Active => {
                    let start = path.iter().position(|&i| i == idx).unwrap_or(0);
                    let mut chain: Vec<String> = path[start..]
                        .iter()
                        .map(|&i| relations.classes[i].name.clone())
                        .collect();
                    chain.push(relations.classes[idx].name.clone());
                    return Err(DocsError::CircularInheritance { chain });
                }
                Mark::New => {}
            }

            marks[idx] = Mark::Active;
            path.push(idx);
            for next in relations.parents[idx].iter().chain(&relations.mixins[idx]) {
                visit(relations, *next, marks, path)?;
            }
            path.pop();
            marks[idx] = Mark::Done;
            Ok(())
        }

        let mut marks = vec![Mark::New; self.classes.len()];
        let mut path = Vec::new();
        for idx in 0..self.classes.len() {
            visit(self, idx, &mut marks, &mut path)?;
        }
        Ok(())
    }

    /// Class by name or alternate name.
    pub fn get(&self, name: &str) -> Option<ClassView<'_>> {
        self.index.get(name).map(|&idx| self.view(idx))
    }

    /// Whether `name` was folded away: an absorbed override, an alternate
    /// name duplicate or an `@ignore`d class.
    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignored.contains(name)
    }

    pub fn ignore(&mut self, name: impl Into<String>) {
        self.ignored.insert(name.into());
    }

    /// All classes in registration order.
    pub fn iter(&self) -> impl Iterator<Item = ClassView<'_>> {
        (0..self.classes.len()).map(|idx| self.view(idx))
    }

    pub fn classes(&self) -> &[Class] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn into_classes(self) -> Vec<Class> {
        self.classes
    }

    /// Mutable access to a class. Memoized lookups are kept.
    pub fn class_mut(&mut self, name: &str) -> Result<&mut Class> {
        let idx = self.index.get(name).copied().ok_or_else(|| DocsError::UnknownClass {
            name: name.to_string(),
        })?;
        Ok(&mut self.classes[idx])
    }

    pub fn member(&self, r: MemberRef) -> &Member {
        &self.classes[r.class].members[r.member]
    }

    /// Mutable access to a member. Memoized lookups are kept.
    pub fn member_mut(&mut self, r: MemberRef) -> &mut Member {
        &mut self.classes[r.class].members[r.member]
    }

    fn lookup(&self, r: MemberRef) -> Option<&Member> {
        self.classes.get(r.class)?.members.get(r.member)
    }

    /// Recompute the ids of one class's members and rebuild the lookup
    /// index.
    pub fn refresh_member_ids(&mut self, name: &str) -> Result<()> {
        for member in &mut self.class_mut(name)?.members {
            member.refresh_id();
        }
        self.invalidate();
        Ok(())
    }

    pub fn refresh_all_member_ids(&mut self) {
        self.invalidate();
        for member in self.classes.iter_mut().flat_map(|c| c.members.iter_mut()) {
            member.refresh_id();
        }
    }

    /// Members shadowed by `r`, as recorded by lookups so far.
    pub fn overrides(&self, r: MemberRef) -> Vec<&Member> {
        self.overrides
            .borrow()
            .get(&r)
            .map(|shadowed| shadowed.iter().filter_map(|&s| self.lookup(s)).collect())
            .unwrap_or_default()
    }

    /// Serialize every class for downstream renderers. Each member carries
    /// the members it overrides.
    pub fn export(&self) -> serde_json::Result<serde_json::Value> {
        for idx in 0..self.classes.len() {
            self.member_map(idx);
        }

        let mut exported = Vec::with_capacity(self.classes.len());
        for (class_idx, class) in self.classes.iter().enumerate() {
            let mut value = serde_json::to_value(class)?;
            if let Some(members) = value.get_mut("members").and_then(|m| m.as_array_mut()) {
                for (member_idx, member) in members.iter_mut().enumerate() {
                    let r = MemberRef {
                        class: class_idx,
                        member: member_idx,
                    };
                    let shadowed: Vec<OverrideRef<'_>> = self
                        .overrides(r)
                        .into_iter()
                        .map(|m| OverrideRef {
                            owner: &m.owner,
                            id: &m.id,
                        })
                        .collect();
                    if shadowed.is_empty() {
                        continue;
                    }
                    if let Some(object) = member.as_object_mut() {
                        object.insert("overrides".to_string(), serde_json::to_value(shadowed)?);
                    }
                }
            }
            exported.push(value);
        }
        Ok(serde_json::Value::Array(exported))
    }

    fn view(&self, idx: usize) -> ClassView<'_> {
        ClassView {
            relations: self,
            idx,
        }
    }

    fn invalidate(&mut self) {
        self.memo.get_mut().clear();
        self.overrides.get_mut().clear();
    }

    /// All members visible in a class: parent first, then mixins, then
    /// local members, later ones winning by id.
    fn member_map(&self, idx: usize) -> Rc<MemberIndex> {
        if let Some(index) = self.memo.borrow().get(&idx) {
            return Rc::clone(index);
        }

        let mut map = MemberMap::new();
        if let Some(parent) = self.parents[idx] {
            for (id, entry) in self.member_map(parent).visible.iter() {
                if !entry.local_static {
                    map.insert(id.clone(), entry.clone());
                }
            }
        }
        for &mixin in &self.mixins[idx] {
            for (id, entry) in self.member_map(mixin).visible.iter() {
                if !entry.local_static {
                    self.shadow(&mut map, id, entry.clone());
                }
            }
        }
        let mut local = Vec::with_capacity(self.classes[idx].members.len());
        for (member_idx, member) in self.classes[idx].members.iter().enumerate() {
            let r = MemberRef {
                class: idx,
                member: member_idx,
            };
            let entry = Indexed::new(r, member);
            local.push(entry.clone());
            self.shadow(&mut map, &member.id, entry);
        }

        let index = Rc::new(MemberIndex {
            visible: map,
            local,
        });
        self.memo.borrow_mut().insert(idx, Rc::clone(&index));
        index
    }

    fn shadow(&self, map: &mut MemberMap, id: &str, winner: Indexed) {
        if let Some(loser) = map.get(id) {
            if loser.r != winner.r {
                let mut overrides = self.overrides.borrow_mut();
                let shadowed = overrides.entry(winner.r).or_default();
                if !shadowed.contains(&loser.r) {
                    shadowed.push(loser.r);
                }
            }
        }
        map.insert(id.to_string(), winner);
    }
}

#[derive(Serialize)]
struct OverrideRef<'a> {
    owner: &'a str,
    id: &'a str,
}

/// Read-only handle on one registered class.
#[derive(Debug, Clone, Copy)]
pub struct ClassView<'a> {
    relations: &'a Relations,
    idx: usize,
}

impl<'a> ClassView<'a> {
    pub fn class(&self) -> &'a Class {
        &self.relations.classes[self.idx]
    }

    pub fn name(&self) -> &'a str {
        &self.class().name
    }

    pub fn index(&self) -> usize {
        self.idx
    }

    /// Parent class, when it is in the registry.
    pub fn parent(&self) -> Option<ClassView<'a>> {
        self.relations.parents[self.idx].map(|idx| self.relations.view(idx))
    }

    /// Mixins found in the registry, in declaration order.
    pub fn mixins(&self) -> Vec<ClassView<'a>> {
        self.relations.mixins[self.idx]
            .iter()
            .map(|&idx| self.relations.view(idx))
            .collect()
    }

    /// Whether this class is `name` or descends from it through `extends`.
    pub fn inherits_from(&self, name: &str) -> bool {
        let mut current = Some(*self);
        while let Some(view) = current {
            if view.class().answers_to(name) {
                return true;
            }
            current = view.parent();
        }
        false
    }

    /// Members matching the query, inherited ones included unless
    /// `query.local` is set. Order follows first appearance in the chain.
    pub fn find_members(&self, query: &MemberQuery<'_>) -> Vec<&'a Member> {
        let relations = self.relations;
        self.find_member_refs(query)
            .into_iter()
            .filter_map(|r| relations.lookup(r))
            .collect()
    }

    pub fn find_member_refs(&self, query: &MemberQuery<'_>) -> Vec<MemberRef> {
        let index = self.relations.member_map(self.idx);
        if query.local {
            return index
                .local
                .iter()
                .filter(|entry| query.matches(entry))
                .map(|entry| entry.r)
                .collect();
        }
        index
            .visible
            .values()
            .filter(|entry| query.matches(entry))
            .map(|entry| entry.r)
            .collect()
    }
}
