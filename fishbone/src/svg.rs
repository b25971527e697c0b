use crate::geometry::layout::LayoutConfig;
use crate::model::DiagramState;

/// Path data for the skeleton: spine first, then per category its spine
/// connector, cause connectors and subcause connectors, in tree order.
pub fn to_svg_paths_impl(state: &DiagramState, layout: &LayoutConfig) -> Vec<String> {
    let mut paths = Vec::with_capacity(1 + state.node_count());
    let (x0, _) = layout.spine_range();
    let sy = layout.spine_y;
    paths.push(format!("M {} {} L {} {}", x0, sy, layout.canvas_width - layout.head_width, sy));
    for (i, cat) in state.categories.iter().enumerate() {
        let sx = layout.resolve_spine_x(cat.spine_x, i);
        paths.push(format!("M {} {} L {} {}", cat.x, cat.y, sx, sy));
        for cause in &cat.causes {
            paths.push(format!("M {} {} L {} {}", cause.x, cause.y, cat.x, cat.y));
            for sub in &cause.subcauses {
                paths.push(format!("M {} {} L {} {}", sub.x, sub.y, cause.x, cause.y));
            }
        }
    }
    paths
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn to_svg_document_impl(state: &DiagramState, layout: &LayoutConfig) -> String {
    let mut out = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 {} {}\">\n",
        layout.canvas_width, layout.canvas_height
    );
    for d in to_svg_paths_impl(state, layout) {
        out.push_str(&format!("<path d=\"{}\" fill=\"none\" stroke=\"black\"/>\n", d));
    }
    let head_x = layout.canvas_width - layout.head_width;
    out.push_str(&format!(
        "<text x=\"{}\" y=\"{}\">{}</text>\n",
        head_x,
        layout.spine_y,
        escape(&state.problem_statement)
    ));
    for cat in &state.categories {
        out.push_str(&format!("<text x=\"{}\" y=\"{}\">{}</text>\n", cat.x, cat.y, escape(&cat.name)));
        for cause in &cat.causes {
            out.push_str(&format!(
                "<text x=\"{}\" y=\"{}\">{}</text>\n",
                cause.x,
                cause.y,
                escape(&cause.name)
            ));
            for sub in &cause.subcauses {
                out.push_str(&format!(
                    "<text x=\"{}\" y=\"{}\">{}</text>\n",
                    sub.x,
                    sub.y,
                    escape(&sub.name)
                ));
            }
        }
    }
    out.push_str("</svg>\n");
    out
}
