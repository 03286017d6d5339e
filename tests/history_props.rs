//! Property tests for history integrity
//!
//! Random interleavings of recorded edits (creates, deletes, patches, drags,
//! reorders) must unwind cleanly: undoing everything restores the exact
//! starting document, and redoing everything reproduces the exact final one.

use easel_engine::{Editor, ElementPatch};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    AddShape(u8, f32, f32),
    AddText(String, f32, f32),
    AddImage(f32, f32),
    Delete(usize),
    Patch(usize, f32, bool),
    Drag(usize, f32, f32),
    Reorder(usize, usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (any::<u8>(), 0.0f32..800.0, 0.0f32..600.0)
            .prop_map(|(kind, x, y)| Op::AddShape(kind, x, y)),
        ("[a-z]{0,12}", 0.0f32..800.0, 0.0f32..600.0)
            .prop_map(|(content, x, y)| Op::AddText(content, x, y)),
        (0.0f32..800.0, 0.0f32..600.0).prop_map(|(x, y)| Op::AddImage(x, y)),
        any::<usize>().prop_map(Op::Delete),
        (any::<usize>(), -400.0f32..400.0, any::<bool>())
            .prop_map(|(pick, x, recolor)| Op::Patch(pick, x, recolor)),
        (any::<usize>(), 0.0f32..800.0, 0.0f32..600.0)
            .prop_map(|(pick, x, y)| Op::Drag(pick, x, y)),
        (any::<usize>(), any::<usize>()).prop_map(|(pick, index)| Op::Reorder(pick, index)),
    ]
}

/// Ids of every element currently in the document, paint order.
fn existing_ids(ed: &Editor) -> Vec<u32> {
    ed.document()
        .layers
        .iter()
        .flat_map(|l| l.elements.iter().map(|e| e.id))
        .collect()
}

fn pick_id(ed: &Editor, pick: usize) -> Option<u32> {
    let ids = existing_ids(ed);
    if ids.is_empty() {
        None
    } else {
        Some(ids[pick % ids.len()])
    }
}

fn apply_op(ed: &mut Editor, op: &Op) {
    match op {
        Op::AddShape(kind, x, y) => {
            let kinds = ["rect", "ellipse", "line", "polygon"];
            ed.add_shape(kinds[*kind as usize % kinds.len()], *x, *y)
                .unwrap();
        }
        Op::AddText(content, x, y) => {
            ed.add_text(content, *x, *y).unwrap();
        }
        Op::AddImage(x, y) => {
            ed.add_image("blob:prop", *x, *y).unwrap();
        }
        Op::Delete(pick) => {
            if let Some(id) = pick_id(ed, *pick) {
                ed.delete_element(id);
            }
        }
        Op::Patch(pick, x, recolor) => {
            if let Some(id) = pick_id(ed, *pick) {
                let patch = ElementPatch {
                    x: Some(*x),
                    fill: recolor.then(|| "#3366cc".to_string()),
                    ..ElementPatch::default()
                };
                ed.apply_patch(id, &patch).unwrap();
            }
        }
        Op::Drag(pick, x, y) => {
            if let Some(id) = pick_id(ed, *pick) {
                if ed.select(id) && ed.begin_transform() {
                    ed.update_transform(*x, *y, 80.0, 60.0);
                    ed.commit_transform();
                }
            }
        }
        Op::Reorder(pick, index) => {
            if let Some(id) = pick_id(ed, *pick) {
                ed.reorder_element(id, *index % 16);
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn undo_all_restores_initial_document(ops in prop::collection::vec(op_strategy(), 0..32)) {
        let mut ed = Editor::new(800, 600);
        let initial = ed.save_json().unwrap();

        for op in &ops {
            apply_op(&mut ed, op);
        }
        let final_state = ed.save_json().unwrap();

        while ed.undo() {}
        prop_assert_eq!(ed.save_json().unwrap(), initial);

        while ed.redo() {}
        prop_assert_eq!(ed.save_json().unwrap(), final_state);
    }

    #[test]
    fn undo_depth_never_exceeds_recorded_edits(ops in prop::collection::vec(op_strategy(), 0..32)) {
        let mut ed = Editor::new(800, 600);
        for op in &ops {
            apply_op(&mut ed, op);
        }

        let mut undone = 0;
        while ed.undo() {
            undone += 1;
        }
        // Every op records at most one edit.
        prop_assert!(undone <= ops.len());
    }
}
