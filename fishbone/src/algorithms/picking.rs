use crate::model::NodePath;
use crate::{Diagram, Pick};

/// Nearest node within `tol`, deepest level winning ties; spine handles only
/// when no node is in reach.
pub fn pick_impl(d: &Diagram, x: f32, y: f32, tol: f32) -> Option<Pick> {
    if !(x.is_finite() && y.is_finite() && tol.is_finite()) || tol < 0.0 {
        return None;
    }
    let tol2 = tol * tol;
    let d2 = |px: f32, py: f32| (px - x) * (px - x) + (py - y) * (py - y);

    // Nodes first
    let mut best: Option<(NodePath, f32)> = None;
    let mut consider = |path: NodePath, dist2: f32| {
        if dist2 <= tol2 && best.as_ref().map_or(true, |(_, bd)| dist2 <= *bd) {
            best = Some((path, dist2));
        }
    };
    for cat in &d.state.categories {
        consider(
            NodePath::Category {
                category: cat.id.clone(),
            },
            d2(cat.x, cat.y),
        );
        for cause in &cat.causes {
            consider(
                NodePath::Cause {
                    category: cat.id.clone(),
                    cause: cause.id.clone(),
                },
                d2(cause.x, cause.y),
            );
            for sub in &cause.subcauses {
                consider(
                    NodePath::Subcause {
                        category: cat.id.clone(),
                        cause: cause.id.clone(),
                        subcause: sub.id.clone(),
                    },
                    d2(sub.x, sub.y),
                );
            }
        }
    }
    if let Some((path, dist2)) = best {
        return Some(Pick::Node {
            path,
            dist: dist2.sqrt(),
        });
    }

    // Spine handles
    let layout = &d.config.layout;
    let mut best_spine: Option<(usize, f32)> = None;
    for (i, cat) in d.state.categories.iter().enumerate() {
        let sx = layout.resolve_spine_x(cat.spine_x, i);
        let dist2 = d2(sx, layout.spine_y);
        if dist2 <= tol2 && best_spine.map_or(true, |(_, bd)| dist2 < bd) {
            best_spine = Some((i, dist2));
        }
    }
    best_spine.map(|(i, dist2)| Pick::Spine {
        category: d.state.categories[i].id.clone(),
        dist: dist2.sqrt(),
    })
}
