use crate::model::InstanceId;

/// Ordered set of selected instance ids.
///
/// Insertion order is kept so the first selected instance can act as the
/// anchor of group moves and the target of scroll-rotate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    ids: Vec<InstanceId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn contains(&self, id: &InstanceId) -> bool {
        self.ids.contains(id)
    }

    /// The anchor of the selection.
    pub fn first(&self) -> Option<&InstanceId> {
        self.ids.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &InstanceId> {
        self.ids.iter()
    }

    pub fn to_vec(&self) -> Vec<InstanceId> {
        self.ids.clone()
    }

    /// Replaces the selection with a single id.
    pub fn select_only(&mut self, id: InstanceId) {
        self.ids.clear();
        self.ids.push(id);
    }

    pub fn insert(&mut self, id: InstanceId) {
        if !self.contains(&id) {
            self.ids.push(id);
        }
    }

    /// Adds the id if absent, removes it if present.
    pub fn toggle(&mut self, id: InstanceId) {
        if let Some(pos) = self.ids.iter().position(|s| *s == id) {
            self.ids.remove(pos);
        } else {
            self.ids.push(id);
        }
    }

    pub fn remove(&mut self, id: &InstanceId) {
        self.ids.retain(|s| s != id);
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn replace(&mut self, ids: impl IntoIterator<Item = InstanceId>) {
        self.ids.clear();
        for id in ids {
            self.insert(id);
        }
    }

    pub fn retain(&mut self, keep: impl FnMut(&InstanceId) -> bool) {
        self.ids.retain(keep);
    }
}
