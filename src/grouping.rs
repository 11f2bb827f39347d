//! Grouping engine: pure views over a permission collection.
//!
//! A grouping partitions permissions by a key-extraction function. Groups come
//! back ordered by key and each group is ordered by permission name, both using
//! [`collate`]. Nothing is cached: every call re-derives from its input.

use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::debug;

use crate::config::ActionFallback;
use crate::constants::{NAME_DELIMITER, UNCATEGORIZED};
use crate::model::Permission;

/// A named subset of permissions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub key: String,
    pub permissions: Vec<Permission>,
}

impl Group {
    /// Member ids in display order
    pub fn ids(&self) -> Vec<&str> {
        self.permissions.iter().map(|p| p.id.as_str()).collect()
    }
}

/// Ordered mapping of group key to sorted permissions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Groups(Vec<Group>);

impl Groups {
    pub fn get(&self, key: &str) -> Option<&Group> {
        self.0.iter().find(|g| g.key == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|g| g.key.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Group> {
        self.0.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total permissions across all groups
    pub fn permission_count(&self) -> usize {
        self.0.iter().map(|g| g.permissions.len()).sum()
    }

    pub fn into_vec(self) -> Vec<Group> {
        self.0
    }
}

impl<'a> IntoIterator for &'a Groups {
    type Item = &'a Group;
    type IntoIter = std::slice::Iter<'a, Group>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Locale-style ordering: letters compare ignoring case and common Latin
/// diacritics first ("Éditer" sorts with "editer"), then unaccented before
/// accented, then lowercase before uppercase.
///
/// Approximates a locale-aware comparison without pulling in ICU data.
pub fn collate(a: &str, b: &str) -> Ordering {
    let base = |s: &str| s.chars().flat_map(char::to_lowercase).map(strip_diacritic).collect::<Vec<_>>();
    let lower = |s: &str| s.chars().flat_map(char::to_lowercase).collect::<Vec<_>>();
    base(a)
        .cmp(&base(b))
        .then_with(|| lower(a).cmp(&lower(b)))
        .then_with(|| b.cmp(a))
}

/// Base letter of a lowercase Latin-1 / Latin Extended-A accented letter
fn strip_diacritic(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => 'c',
        'ď' | 'đ' => 'd',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => 'e',
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => 'g',
        'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => 'i',
        'ł' | 'ľ' | 'ĺ' | 'ļ' => 'l',
        'ñ' | 'ń' | 'ň' | 'ņ' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => 'o',
        'ŕ' | 'ř' | 'ŗ' => 'r',
        'ś' | 'ŝ' | 'ş' | 'š' => 's',
        'ţ' | 'ť' | 'ŧ' => 't',
        'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => 'u',
        'ý' | 'ÿ' | 'ŷ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        c => c,
    }
}

/// Partition permissions by `key`, ordering groups by key and members by name
pub fn group_by<'a, I, F>(permissions: I, key: F) -> Groups
where
    I: IntoIterator<Item = &'a Permission>,
    F: Fn(&Permission) -> String,
{
    let mut buckets: HashMap<String, Vec<Permission>> = HashMap::new();
    for p in permissions {
        buckets.entry(key(p)).or_default().push(p.clone());
    }
    let mut groups: Vec<Group> = buckets
        .into_iter()
        .map(|(key, mut permissions)| {
            // stable: equal names keep input order
            permissions.sort_by(|a, b| collate(&a.name, &b.name));
            Group { key, permissions }
        })
        .collect();
    groups.sort_by(|a, b| collate(&a.key, &b.key));
    debug!(groups = groups.len(), "derived permission groups");
    Groups(groups)
}

/// Action key: the segment after the last delimiter in `name`
pub fn action_key(p: &Permission, fallback: &ActionFallback) -> String {
    match p.name.rsplit_once(NAME_DELIMITER) {
        Some((_, action)) => action.to_string(),
        None => match fallback {
            ActionFallback::BareName => p.name.clone(),
            ActionFallback::Sentinel(s) => s.clone(),
        },
    }
}

/// Category key: the explicit category, else `uncategorized`
pub fn category_key(p: &Permission, uncategorized: &str) -> String {
    p.category().unwrap_or(uncategorized).to_string()
}

/// Group by action suffix; undelimited names group under their full name
pub fn group_by_action<'a, I>(permissions: I) -> Groups
where
    I: IntoIterator<Item = &'a Permission>,
{
    group_by_action_with(permissions, &ActionFallback::BareName)
}

pub fn group_by_action_with<'a, I>(permissions: I, fallback: &ActionFallback) -> Groups
where
    I: IntoIterator<Item = &'a Permission>,
{
    group_by(permissions, |p| action_key(p, fallback))
}

/// Group by explicit category; missing or blank categories go to "Uncategorized"
pub fn group_by_category<'a, I>(permissions: I) -> Groups
where
    I: IntoIterator<Item = &'a Permission>,
{
    group_by_category_with(permissions, UNCATEGORIZED)
}

pub fn group_by_category_with<'a, I>(permissions: I, uncategorized: &str) -> Groups
where
    I: IntoIterator<Item = &'a Permission>,
{
    group_by(permissions, |p| category_key(p, uncategorized))
}

/// Case-insensitive substring search over name, description and category.
/// An empty (or blank) query matches everything.
pub fn filter<'a>(permissions: &'a [Permission], query: &str) -> impl Iterator<Item = &'a Permission> {
    let needle = query.trim().to_lowercase();
    permissions.iter().filter(move |p| {
        needle.is_empty()
            || p.name.to_lowercase().contains(&needle)
            || p.description.to_lowercase().contains(&needle)
            || p.category().map(|c| c.to_lowercase().contains(&needle)).unwrap_or(false)
    })
}
