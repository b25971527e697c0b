use fishbone::{CategoryUpdate, Diagram, NodeUpdate};
use std::time::Instant;

fn build_diagram(categories: usize, causes: usize, subcauses: usize) -> Diagram {
    let mut d = Diagram::seeded(0xF15B);
    for i in 0..categories {
        let cat = d.add_category();
        d.update_category(&cat, CategoryUpdate::name(format!("Category {}", i)));
        for j in 0..causes {
            let Some(cause) = d.add_cause(&cat) else { continue };
            d.update_cause(&cat, &cause, NodeUpdate::name(format!("Cause {}.{}", i, j)));
            for k in 0..subcauses {
                if let Some(sub) = d.add_subcause(&cat, &cause) {
                    d.update_subcause(&cat, &cause, &sub, NodeUpdate::name(format!("Sub {}.{}.{}", i, j, k)));
                }
            }
        }
    }
    d
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let mut categories = 6usize;
    let mut causes = 20usize;
    let mut subcauses = 10usize;
    let mut iters = 50usize;
    let mut assert_ms: Option<f64> = None;
    for a in &args[1..] {
        if let Some(val)=a.strip_prefix("--categories=") { if let Ok(v)=val.parse() { categories=v; } }
        else if let Some(val)=a.strip_prefix("--causes=") { if let Ok(v)=val.parse() { causes=v; } }
        else if let Some(val)=a.strip_prefix("--subcauses=") { if let Ok(v)=val.parse() { subcauses=v; } }
        else if let Some(val)=a.strip_prefix("--iters=") { if let Ok(v)=val.parse() { iters=v; } }
        else if let Some(val)=a.strip_prefix("--assert-ms=") { if let Ok(v)=val.parse() { assert_ms=Some(v); } }
    }

    let t0 = Instant::now();
    let mut d = build_diagram(categories, causes, subcauses);
    let build_ms = t0.elapsed().as_secs_f64() * 1000.0;
    let nodes = d.node_count();

    let mut total_rows = 0usize;
    let t1 = Instant::now();
    for _ in 0..iters {
        let rows = d.export_rows();
        total_rows += rows.len();
        if let Err(e) = d.import_rows(&rows) {
            eprintln!("FAIL: import error {}", e);
            std::process::exit(1);
        }
    }
    let rows_ms = t1.elapsed().as_secs_f64() * 1000.0 / iters.max(1) as f64;
    if d.node_count() != nodes {
        eprintln!("FAIL: node count drifted {} -> {}", nodes, d.node_count());
        std::process::exit(1);
    }

    #[cfg(feature = "xlsx")]
    let xlsx_ms = {
        let t2 = Instant::now();
        for _ in 0..iters {
            let bytes = match d.export_xlsx() {
                Ok(b) => b,
                Err(e) => { eprintln!("FAIL: export error {}", e); std::process::exit(1); }
            };
            if let Err(e) = d.import_xlsx_bytes(bytes) {
                eprintln!("FAIL: import error {}", e);
                std::process::exit(1);
            }
        }
        t2.elapsed().as_secs_f64() * 1000.0 / iters.max(1) as f64
    };
    #[cfg(not(feature = "xlsx"))]
    let xlsx_ms = 0.0f64;

    println!("nodes={} iters={} rows={} build_ms={:.3} rows_roundtrip_ms={:.4} xlsx_roundtrip_ms={:.4}", nodes, iters, total_rows, build_ms, rows_ms, xlsx_ms);
    if let Some(th) = assert_ms { if rows_ms > th { eprintln!("FAIL: rows round-trip {:.4} ms > threshold {:.3} ms", rows_ms, th); std::process::exit(1); } }
}
