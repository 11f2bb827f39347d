//! Multi-select state for one view.
//!
//! Selection is transient: it is never persisted and is not an attribute of
//! any permission or role. Groups are passed in by member ids, so the tracker
//! works the same whichever grouping produced them.

use std::collections::HashSet;

use crate::grouping::Group;
use crate::model::Permission;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: HashSet<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `id`; returns whether it is now selected
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    /// All selected: deselect every member. Otherwise: select every member.
    /// Empty groups are a no-op. Returns whether the group is now fully selected.
    pub fn toggle_group<I, S>(&mut self, members: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let members: Vec<S> = members.into_iter().collect();
        if members.is_empty() {
            return false;
        }
        if self.all_selected(&members) {
            for m in &members {
                self.ids.remove(m.as_ref());
            }
            false
        } else {
            for m in &members {
                self.ids.insert(m.as_ref().to_string());
            }
            true
        }
    }

    /// `toggle_group` over a derived group's members
    pub fn toggle_group_of(&mut self, group: &Group) -> bool {
        self.toggle_group(group.permissions.iter().map(|p| p.id.as_str()))
    }

    /// Non-empty and every member selected
    pub fn is_group_selected<I, S>(&self, members: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let members: Vec<S> = members.into_iter().collect();
        !members.is_empty() && self.all_selected(&members)
    }

    /// Some, but not all, members selected
    pub fn is_group_partially_selected<I, S>(&self, members: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let (mut hit, mut miss) = (false, false);
        for m in members {
            if self.ids.contains(m.as_ref()) {
                hit = true;
            } else {
                miss = true;
            }
            if hit && miss {
                return true;
            }
        }
        false
    }

    #[inline]
    pub fn is_selected(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Drop `id` from the selection if present
    pub fn remove(&mut self, id: &str) -> bool {
        self.ids.remove(id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Selected permissions, in the order of `permissions`
    pub fn selected_in<'a>(&self, permissions: &'a [Permission]) -> Vec<&'a Permission> {
        permissions.iter().filter(|p| self.ids.contains(&p.id)).collect()
    }

    fn all_selected<S: AsRef<str>>(&self, members: &[S]) -> bool {
        members.iter().all(|m| self.ids.contains(m.as_ref()))
    }
}
