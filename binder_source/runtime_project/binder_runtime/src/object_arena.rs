use binder_ids::ObjectID;

use crate::scene::SceneObject;

/// Generational slot storage for scene objects.
///
/// Slot 0 is never handed out, so `ObjectID::nil()` never resolves. Removing
/// an object bumps the slot's generation; IDs held by bindings for the removed
/// object stop resolving even after the slot is reused.
pub struct ObjectArena {
    objects: Vec<Option<SceneObject>>,
    generations: Vec<u32>,
    free_indices: Vec<usize>,
}

impl ObjectArena {
    pub fn new() -> Self {
        Self::with_capacity(1)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let mut objects = Vec::with_capacity(capacity.saturating_add(1));
        let mut generations = Vec::with_capacity(capacity.saturating_add(1));
        objects.push(None);
        generations.push(0);
        Self {
            objects,
            generations,
            free_indices: Vec::new(),
        }
    }

    /// Store the object built by `make` and return its ID.
    ///
    /// `make` receives the ID up front so the object can carry it.
    pub fn insert_with(&mut self, make: impl FnOnce(ObjectID) -> SceneObject) -> ObjectID {
        if let Some(index) = self.free_indices.pop() {
            let id = ObjectID::from_parts(index as u32, self.generations[index]);
            self.objects[index] = Some(make(id));
            return id;
        }

        let index = self.objects.len();
        let id = ObjectID::from_parts(index as u32, 0);
        self.objects.push(Some(make(id)));
        self.generations.push(0);
        id
    }

    #[inline]
    fn slot(&self, id: ObjectID) -> Option<usize> {
        let index = id.index() as usize;
        (index != 0 && index < self.objects.len() && self.generations[index] == id.generation())
            .then_some(index)
    }

    pub fn get(&self, id: ObjectID) -> Option<&SceneObject> {
        self.objects[self.slot(id)?].as_ref()
    }

    pub fn get_mut(&mut self, id: ObjectID) -> Option<&mut SceneObject> {
        let index = self.slot(id)?;
        self.objects[index].as_mut()
    }

    pub fn remove(&mut self, id: ObjectID) -> Option<SceneObject> {
        let index = self.slot(id)?;
        let removed = self.objects[index].take()?;
        self.generations[index] = self.generations[index].wrapping_add(1);
        self.free_indices.push(index);
        Some(removed)
    }

    pub fn contains(&self, id: ObjectID) -> bool {
        self.get(id).is_some()
    }

    /// Live objects in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter().skip(1).filter_map(Option::as_ref)
    }

    pub fn clear(&mut self) {
        self.objects.truncate(1);
        self.generations.truncate(1);
        self.free_indices.clear();
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

impl Default for ObjectArena {
    fn default() -> Self {
        Self::new()
    }
}
