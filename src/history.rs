//! Undo/redo for document edits.
//!
//! Every mutating operation that should be reversible records one [`Edit`]
//! describing how to replay and how to revert it. Continuous gestures (a drag)
//! record a single edit on commit, not one per frame.

use crate::document::Document;
use crate::element::Element;

/// Oldest edits are evicted beyond this depth.
pub const MAX_DEPTH: usize = 128;

/// One reversible step, with enough context to replay it in either direction.
#[derive(Clone, Debug)]
pub enum Edit {
    Insert {
        layer_id: u32,
        index: usize,
        element: Element,
    },
    Remove {
        layer_id: u32,
        index: usize,
        element: Element,
    },
    Update {
        layer_id: u32,
        index: usize,
        before: Element,
        after: Element,
    },
    Reorder {
        layer_id: u32,
        from: usize,
        to: usize,
    },
}

impl Edit {
    /// Replay the edit forward. Returns false when the document no longer
    /// matches what the edit expects.
    fn apply(&self, document: &mut Document) -> bool {
        match self {
            Edit::Insert {
                layer_id,
                index,
                element,
            } => document.insert_element(*layer_id, *index, element.clone()),
            Edit::Remove { element, .. } => document.remove_element(element.id).is_some(),
            Edit::Update {
                layer_id,
                index,
                after,
                ..
            } => document.replace_element_at(*layer_id, *index, after.clone()),
            Edit::Reorder { layer_id, from, to } => document.move_element(*layer_id, *from, *to),
        }
    }

    /// Replay the edit backward.
    fn revert(&self, document: &mut Document) -> bool {
        match self {
            Edit::Insert { element, .. } => document.remove_element(element.id).is_some(),
            Edit::Remove {
                layer_id,
                index,
                element,
            } => document.insert_element(*layer_id, *index, element.clone()),
            Edit::Update {
                layer_id,
                index,
                before,
                ..
            } => document.replace_element_at(*layer_id, *index, before.clone()),
            Edit::Reorder { layer_id, from, to } => document.move_element(*layer_id, *to, *from),
        }
    }
}

/// Bounded two-stack history.
#[derive(Clone, Debug, Default)]
pub struct History {
    undo: Vec<Edit>,
    redo: Vec<Edit>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fresh edit. Any redo branch is discarded, and the oldest edit
    /// falls off once the stack is full.
    pub fn record(&mut self, edit: Edit) {
        self.redo.clear();
        if self.undo.len() == MAX_DEPTH {
            self.undo.remove(0);
        }
        self.undo.push(edit);
    }

    /// Revert the most recent edit. An edit that no longer applies (the
    /// document was replaced underneath it) is dropped and reported as false.
    pub fn undo(&mut self, document: &mut Document) -> bool {
        match self.undo.pop() {
            Some(edit) => {
                if edit.revert(document) {
                    self.redo.push(edit);
                    true
                } else {
                    false
                }
            }
            None => false,
        }
    }

    /// Reapply the most recently undone edit.
    pub fn redo(&mut self, document: &mut Document) -> bool {
        match self.redo.pop() {
            Some(edit) => {
                if edit.apply(document) {
                    self.undo.push(edit);
                    true
                } else {
                    false
                }
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.undo.len()
    }

    /// Forget everything, e.g. after loading a new document.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ShapeData;
    use crate::geometry::Transform;

    fn shape(id: u32) -> Element {
        Element::shape(
            id,
            "Shape",
            ShapeData::rectangle(),
            Transform::new(0.0, 0.0, 20.0, 20.0),
        )
    }

    #[test]
    fn test_undo_redo_insert() {
        let mut doc = Document::new(100, 100);
        let layer = doc.active_layer;
        let mut history = History::new();

        let element = shape(doc.allocate_id());
        let index = doc.push_element(layer, element.clone()).unwrap();
        history.record(Edit::Insert {
            layer_id: layer,
            index,
            element,
        });

        assert!(history.undo(&mut doc));
        assert_eq!(doc.element_count(), 0);
        assert!(history.redo(&mut doc));
        assert_eq!(doc.element_count(), 1);
    }

    #[test]
    fn test_record_clears_redo_branch() {
        let mut doc = Document::new(100, 100);
        let layer = doc.active_layer;
        let mut history = History::new();

        let first = shape(doc.allocate_id());
        let index = doc.push_element(layer, first.clone()).unwrap();
        history.record(Edit::Insert {
            layer_id: layer,
            index,
            element: first,
        });
        assert!(history.undo(&mut doc));
        assert!(history.can_redo());

        let second = shape(doc.allocate_id());
        let index = doc.push_element(layer, second.clone()).unwrap();
        history.record(Edit::Insert {
            layer_id: layer,
            index,
            element: second,
        });
        assert!(!history.can_redo());
    }

    #[test]
    fn test_depth_is_bounded() {
        let mut doc = Document::new(100, 100);
        let layer = doc.active_layer;
        let mut history = History::new();

        for _ in 0..(MAX_DEPTH + 10) {
            let element = shape(doc.allocate_id());
            let index = doc.push_element(layer, element.clone()).unwrap();
            history.record(Edit::Insert {
                layer_id: layer,
                index,
                element,
            });
        }
        assert_eq!(history.depth(), MAX_DEPTH);
    }

    #[test]
    fn test_stale_edit_is_dropped() {
        let mut doc = Document::new(100, 100);
        let layer = doc.active_layer;
        let mut history = History::new();

        let element = shape(doc.allocate_id());
        let index = doc.push_element(layer, element.clone()).unwrap();
        history.record(Edit::Insert {
            layer_id: layer,
            index,
            element,
        });

        // Replace the document; the recorded id no longer exists.
        doc = Document::new(100, 100);
        assert!(!history.undo(&mut doc));
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_reorder_restores_order() {
        let mut doc = Document::new(100, 100);
        let layer = doc.active_layer;
        let mut history = History::new();

        let a = doc.allocate_id();
        let b = doc.allocate_id();
        doc.push_element(layer, shape(a));
        doc.push_element(layer, shape(b));

        let (layer_id, from, to) = doc.reorder_element(a, 1).unwrap();
        history.record(Edit::Reorder { layer_id, from, to });
        assert_eq!(doc.layers[0].elements[1].id, a);

        assert!(history.undo(&mut doc));
        assert_eq!(doc.layers[0].elements[0].id, a);
    }
}
