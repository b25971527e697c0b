mod common;

use fishbone::commands::TEMPLATE_CATEGORIES;
use fishbone::{
    CategoryUpdate, Command, Diagram, DiagramConfig, DiagramError, NodeId, NodeKind, NodeUpdate,
    Outcome,
};
use std::collections::HashSet;

fn seeded() -> Diagram {
    common::init_tracing();
    Diagram::seeded(7)
}

#[test]
fn new_diagram_is_empty_with_default_statement() {
    let d = seeded();
    assert!(d.state().categories.is_empty());
    assert_eq!(d.state().problem_statement, "Problem Statement");
    assert_eq!(d.node_count(), 0);
}

#[test]
fn template_load_on_empty_diagram() {
    let mut d = seeded();
    d.load_template();
    let names: Vec<&str> = d.state().categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["People", "Process", "Materials", "Machines", "Measurements", "Environment"]);
    assert_eq!(names.len(), TEMPLATE_CATEGORIES.len());
    assert!(d.state().categories.iter().all(|c| c.causes.is_empty()));
}

#[test]
fn template_load_generates_fresh_ids_and_keeps_statement() {
    let mut d = seeded();
    d.set_problem_statement("Why did X fail?");
    d.load_template();
    let first: HashSet<NodeId> = common::all_ids(d.state()).into_iter().collect();
    d.load_template();
    let second: HashSet<NodeId> = common::all_ids(d.state()).into_iter().collect();
    assert_eq!(first.len(), 6);
    assert_eq!(second.len(), 6);
    assert!(first.is_disjoint(&second), "template reused ids");
    assert_eq!(d.state().problem_statement, "Why did X fail?");
}

#[test]
fn empty_problem_statement_is_allowed() {
    let mut d = seeded();
    assert!(d.set_problem_statement(""));
    assert_eq!(d.state().problem_statement, "");
}

#[test]
fn clear_is_idempotent() {
    let mut d = seeded();
    d.set_problem_statement("Leaking valve");
    d.load_template();
    assert_eq!(d.apply(Command::ClearDiagram).unwrap(), Outcome::Replaced);
    let after_first = d.state().clone();
    let rev = d.revision();
    assert_eq!(d.apply(Command::ClearDiagram).unwrap(), Outcome::Unchanged);
    assert_eq!(d.state(), &after_first);
    assert_eq!(d.revision(), rev);
    assert!(after_first.categories.is_empty());
    assert_eq!(after_first.problem_statement, "Problem Statement");
}

#[test]
fn add_category_defaults() {
    let mut d = seeded();
    let a = d.add_category();
    let b = d.add_category();
    assert_ne!(a, b);
    let layout = d.layout().clone();
    let cats = &d.state().categories;
    assert_eq!(cats[0].name, "New Category");
    assert_eq!(cats[0].spine_x, Some(layout.default_spine_x(0)));
    assert_eq!(cats[1].spine_x, Some(layout.default_spine_x(1)));
    let (x0, y0, x1, y1) = layout.placement_bounds();
    for c in cats {
        assert!(c.x >= x0 && c.x <= x1 && c.y >= y0 && c.y <= y1);
    }
}

#[test]
fn update_category_merges_partial_fields() {
    let mut d = seeded();
    let id = d.add_category();
    let before = d.state().category(&id).unwrap().clone();
    assert!(d.update_category(&id, CategoryUpdate::name("People")));
    let after = d.state().category(&id).unwrap();
    assert_eq!(after.name, "People");
    assert_eq!((after.x, after.y), (before.x, before.y));
    assert!(d.update_category(
        &id,
        CategoryUpdate {
            comment: Some("staffing".into()),
            ..Default::default()
        }
    ));
    assert_eq!(d.state().category(&id).unwrap().comment, "staffing");
}

#[test]
fn unknown_id_update_is_noop() {
    let mut d = seeded();
    d.load_template();
    let before = d.state().clone();
    let rev = d.revision();
    let out = d
        .apply(Command::UpdateCategory {
            id: NodeId::from("missing"),
            updates: CategoryUpdate::name("X"),
        })
        .unwrap();
    assert_eq!(out, Outcome::Unchanged);
    assert_eq!(d.state(), &before);
    assert_eq!(d.revision(), rev, "state mutated on miss");
}

#[test]
fn unknown_ids_are_noops_for_every_scoped_command() {
    let mut d = seeded();
    let cat = d.add_category();
    let cause = d.add_cause(&cat).unwrap();
    let before = d.state().clone();
    let ghost = NodeId::from("ghost");
    assert!(!d.delete_category(&ghost));
    assert_eq!(d.add_cause(&ghost), None);
    assert!(!d.update_cause(&cat, &ghost, NodeUpdate::name("x")));
    assert!(!d.update_cause(&ghost, &cause, NodeUpdate::name("x")));
    assert!(!d.delete_cause(&ghost, &cause));
    assert_eq!(d.add_subcause(&cat, &ghost), None);
    assert_eq!(d.add_subcause(&ghost, &cause), None);
    assert!(!d.update_subcause(&cat, &cause, &ghost, NodeUpdate::name("x")));
    assert!(!d.delete_subcause(&cat, &cause, &ghost));
    assert_eq!(d.state(), &before);
}

#[test]
fn strict_mode_reports_not_found() {
    let mut d = Diagram::with_config(DiagramConfig::seeded(1).strict(true));
    let cat = d.add_category();
    let rev = d.revision();
    let err = d
        .apply(Command::AddSubcause {
            category_id: cat.clone(),
            cause_id: NodeId::from("nope"),
        })
        .unwrap_err();
    match &err {
        DiagramError::NotFound { kind, id } => {
            assert_eq!(*kind, NodeKind::Cause);
            assert_eq!(id.as_str(), "nope");
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert_eq!(err.code(), "not_found");
    assert_eq!(d.revision(), rev);
    let err = d.apply(Command::DeleteCategory { id: NodeId::from("x") }).unwrap_err();
    assert!(matches!(err, DiagramError::NotFound { kind: NodeKind::Category, .. }));
}

#[test]
fn delete_category_removes_subtree() {
    let mut d = seeded();
    let keep = d.add_category();
    let cat = d.add_category();
    let c1 = d.add_cause(&cat).unwrap();
    let c2 = d.add_cause(&cat).unwrap();
    d.add_subcause(&cat, &c1).unwrap();
    d.add_subcause(&cat, &c1).unwrap();
    d.add_subcause(&cat, &c2).unwrap();
    let total = d.node_count();
    let out = d.apply(Command::DeleteCategory { id: cat.clone() }).unwrap();
    // 2 causes + 3 subcauses + the category
    assert_eq!(out, Outcome::Removed(6));
    assert_eq!(d.node_count(), total - 6);
    assert!(d.state().category(&cat).is_none());
    assert!(d.state().category(&keep).is_some());
}

#[test]
fn delete_cause_removes_its_subcauses() {
    let mut d = seeded();
    let cat = d.add_category();
    let cause = d.add_cause(&cat).unwrap();
    for _ in 0..4 {
        d.add_subcause(&cat, &cause).unwrap();
    }
    let out = d
        .apply(Command::DeleteCause {
            category_id: cat.clone(),
            cause_id: cause.clone(),
        })
        .unwrap();
    assert_eq!(out, Outcome::Removed(5));
    assert_eq!(d.node_count(), 1);
}

#[test]
fn children_keep_insertion_order() {
    let mut d = seeded();
    let cat = d.add_category();
    let ids: Vec<NodeId> = (0..5).map(|_| d.add_cause(&cat).unwrap()).collect();
    let got: Vec<NodeId> = d.state().category(&cat).unwrap().causes.iter().map(|c| c.id.clone()).collect();
    assert_eq!(got, ids);
    d.delete_cause(&cat, &ids[2]);
    let got: Vec<&NodeId> = d.state().category(&cat).unwrap().causes.iter().map(|c| &c.id).collect();
    assert_eq!(got, vec![&ids[0], &ids[1], &ids[3], &ids[4]]);
}

#[test]
fn new_children_land_near_parent() {
    let mut d = seeded();
    let cat = d.add_category();
    d.update_category(&cat, CategoryUpdate::position(600.0, 200.0));
    let cause = d.add_cause(&cat).unwrap();
    let sub = d.add_subcause(&cat, &cause).unwrap();
    let layout = d.layout().clone();
    let c = d.state().cause(&cat, &cause).unwrap();
    assert!((c.x - 600.0).abs() <= layout.cause_spread && (c.y - 200.0).abs() <= layout.cause_spread);
    let s = d.state().subcause(&cat, &cause, &sub).unwrap();
    assert!((s.x - c.x).abs() <= layout.subcause_spread && (s.y - c.y).abs() <= layout.subcause_spread);
    assert_eq!(s.name, "New Subcause");
    assert_eq!(c.name, "New Cause");
}

#[test]
fn non_finite_coordinates_are_ignored() {
    let mut d = seeded();
    let cat = d.add_category();
    let cause = d.add_cause(&cat).unwrap();
    let before = d.state().cause(&cat, &cause).unwrap().clone();
    let changed = d.update_cause(
        &cat,
        &cause,
        NodeUpdate {
            name: Some("Training".into()),
            x: Some(f32::NAN),
            y: Some(f32::INFINITY),
            comment: None,
        },
    );
    assert!(changed);
    let after = d.state().cause(&cat, &cause).unwrap();
    assert_eq!(after.name, "Training");
    assert_eq!((after.x, after.y), (before.x, before.y));
}

#[test]
fn load_from_data_replaces_wholesale() {
    let mut d = seeded();
    d.load_template();
    let mut other = Diagram::seeded(99);
    other.set_problem_statement("Imported");
    let cat = other.add_category();
    other.add_cause(&cat);
    let snapshot = other.state().clone();
    assert_eq!(d.apply(Command::LoadFromData(snapshot.clone())).unwrap(), Outcome::Replaced);
    assert_eq!(d.state(), &snapshot);
}

#[test]
fn commands_deserialize_from_wire_shape() {
    let mut d = seeded();
    let cat = d.add_category();
    let v = serde_json::json!({
        "type": "UPDATE_CATEGORY",
        "payload": { "id": cat.as_str(), "updates": { "name": "Machines", "spineX": 5000.0 } }
    });
    let cmd: Command = serde_json::from_value(v).unwrap();
    assert_eq!(d.apply(cmd).unwrap(), Outcome::Updated);
    let c = d.state().category(&cat).unwrap();
    assert_eq!(c.name, "Machines");
    assert_eq!(c.spine_x, Some(d.layout().spine_range().1));

    let add: Command = serde_json::from_value(serde_json::json!({
        "type": "ADD_CAUSE", "payload": { "categoryId": cat.as_str() }
    }))
    .unwrap();
    assert!(matches!(d.apply(add).unwrap(), Outcome::Created(_)));

    let clear: Command = serde_json::from_value(serde_json::json!({ "type": "CLEAR_DIAGRAM" })).unwrap();
    assert_eq!(clear, Command::ClearDiagram);
    assert_eq!(clear.name(), "CLEAR_DIAGRAM");
}

#[test]
fn revision_bumps_only_on_change() {
    let mut d = seeded();
    let r0 = d.revision();
    let cat = d.add_category();
    assert_eq!(d.revision(), r0 + 1);
    assert!(!d.update_category(&cat, CategoryUpdate::name("New Category")));
    assert_eq!(d.revision(), r0 + 1);
    assert!(d.update_category(&cat, CategoryUpdate::name("Process")));
    assert_eq!(d.revision(), r0 + 2);
}
