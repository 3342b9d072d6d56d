use serde::Serialize;

/// A named, ordered run of items rendered together.
///
/// Group order is chosen by whoever builds the groups. A group with no items
/// is valid but contributes nothing when displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group<T> {
    pub name: String,
    pub items: Vec<T>,
}

impl<T> Group<T> {
    pub fn new(name: impl Into<String>, items: Vec<T>) -> Self {
        Group {
            name: name.into(),
            items,
        }
    }

    pub fn empty(name: impl Into<String>) -> Self {
        Group::new(name, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Total number of items across a sequence of groups
pub fn total_items<T>(groups: &[Group<T>]) -> usize {
    groups.iter().map(Group::len).sum()
}
