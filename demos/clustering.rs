//! Weighted DBSCAN over the built-in 19-point demo set.
//!
//! Run with `RUST_LOG=debug` to see pipeline and heap events.

use kdscan::{cluster, io, synth, Dbscan};

fn main() {
    env_logger::init();

    let mut points = synth::special_points();
    let engine = Dbscan::new(5.0, 3);
    let cores = engine.fit(&mut points).expect("valid parameters");

    println!("=== DBSCAN (radius=5, min_points=3) ===");
    for (i, label) in cluster::labels(&points).iter().enumerate() {
        let tag = match label {
            Some(id) => format!("cluster {id}"),
            None => "NOISE".to_string(),
        };
        println!(
            "  point {:2} ({:4.1}, {:4.1}) w={:.1} => {}{}",
            i,
            points[i].x(),
            points[i].y(),
            points[i].weight(),
            tag,
            if points[i].is_core() { " (core)" } else { "" },
        );
    }

    println!("\n=== core records with neighbors (x,y,weight) ===");
    let mut out = Vec::new();
    io::write_clusters(&mut out, &points, &cores).expect("in-memory write");
    print!("{}", String::from_utf8(out).expect("utf-8 records"));
}
