//! CLI command implementations.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::engine::{CancelToken, FanoutParams, QueryEngine, RecommendParams};
use crate::graph::{build_snapshot, BuildReport, GraphSnapshot};
use crate::types::{Distance, GraphResult, Relationship, StudentId};

/// A point-in-time export from the persistence layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    /// Every valid student id.
    pub students: Vec<StudentId>,
    /// Follow relationships in any status.
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

/// Read a dataset from a JSON file.
pub fn load_dataset(path: &Path) -> GraphResult<Dataset> {
    let data = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

/// Read a dataset and build its snapshot.
pub fn load_snapshot(path: &Path) -> GraphResult<(GraphSnapshot, BuildReport)> {
    let dataset = load_dataset(path)?;
    Ok(build_snapshot(&dataset.students, &dataset.relationships))
}

fn timeout_token(timeout_ms: Option<u64>) -> CancelToken {
    match timeout_ms {
        Some(ms) => CancelToken::new().with_timeout(Duration::from_millis(ms)),
        None => CancelToken::never(),
    }
}

fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_default()
    );
}

/// Snapshot and build statistics.
pub fn cmd_stats(path: &Path, json: bool) -> GraphResult<()> {
    let (snapshot, report) = load_snapshot(path)?;

    let max_out = snapshot
        .vertices()
        .iter()
        .map(|&id| snapshot.out_degree(id))
        .max()
        .unwrap_or(0);
    let isolated = snapshot
        .vertices()
        .iter()
        .filter(|&&id| snapshot.out_degree(id) == 0)
        .count();

    if json {
        print_json(&serde_json::json!({
            "file": path.display().to_string(),
            "built_at": snapshot.built_at(),
            "vertices": snapshot.vertex_count(),
            "edges": snapshot.edge_count(),
            "max_out_degree": max_out,
            "no_outgoing": isolated,
            "build": report,
        }));
    } else {
        println!("File: {}", path.display());
        println!("Built at: {}", format_timestamp(snapshot.built_at()));
        println!("Students: {}", snapshot.vertex_count());
        println!("Accepted edges: {}", snapshot.edge_count());
        println!("Max out-degree: {}", max_out);
        println!("Following nobody: {}", isolated);
        println!("Records: {}", report.total());
        println!("  Not accepted: {}", report.not_accepted);
        println!("  Unknown student: {}", report.unknown_vertex);
        println!("  Invalid weight: {}", report.invalid_weight);
        println!("  Self-loops: {}", report.self_loops);
        println!("  Duplicates collapsed: {}", report.duplicates_collapsed);
    }
    Ok(())
}

/// Shortest weighted distance between two students.
pub fn cmd_distance(
    path: &Path,
    source: StudentId,
    target: StudentId,
    max_weight: Option<u64>,
    json: bool,
) -> GraphResult<()> {
    let (snapshot, _) = load_snapshot(path)?;
    let distance = QueryEngine::new().shortest_distance(&snapshot, source, target, max_weight)?;

    if json {
        print_json(&serde_json::json!({
            "source": source,
            "target": target,
            "distance": distance,
        }));
    } else {
        println!("Distance {} -> {}: {}", source, target, distance);
    }
    Ok(())
}

/// Shortest path between two students.
pub fn cmd_path(path: &Path, source: StudentId, target: StudentId, json: bool) -> GraphResult<()> {
    let (snapshot, _) = load_snapshot(path)?;
    let ids = QueryEngine::new().shortest_path(&snapshot, source, target)?;

    if json {
        print_json(&serde_json::json!({
            "source": source,
            "target": target,
            "path": ids,
        }));
    } else if ids.is_empty() {
        println!("No path from {} to {}", source, target);
    } else {
        println!("Path: {}", format_path(&ids));
    }
    Ok(())
}

/// Degrees of separation between two students.
pub fn cmd_degrees(
    path: &Path,
    source: StudentId,
    target: StudentId,
    json: bool,
) -> GraphResult<()> {
    let (snapshot, _) = load_snapshot(path)?;
    let degrees = QueryEngine::new().degrees_of_separation(&snapshot, source, target)?;

    if json {
        print_json(&serde_json::json!({
            "source": source,
            "target": target,
            "degrees": degrees,
        }));
    } else {
        match degrees {
            Some(d) => println!("Degrees of separation {} -> {}: {}", source, target, d),
            None => println!("{} and {} are not connected", source, target),
        }
    }
    Ok(())
}

/// Distance, path and degrees in one result.
pub fn cmd_connection(
    path: &Path,
    source: StudentId,
    target: StudentId,
    timeout_ms: Option<u64>,
    json: bool,
) -> GraphResult<()> {
    let (snapshot, _) = load_snapshot(path)?;
    let token = timeout_token(timeout_ms);
    let result = QueryEngine::new().connection(&snapshot, source, target, &token)?;

    if json {
        print_json(&result);
    } else {
        println!("Connection {} -> {}", result.source, result.target);
        println!("  Distance: {}", result.distance);
        match result.degrees {
            Some(d) => {
                println!("  Degrees: {}", d);
                println!("  Path: {}", format_path(&result.path));
            }
            None => println!("  Path: none"),
        }
    }
    Ok(())
}

/// Bounded fan-out from one student.
pub fn cmd_fanout(
    path: &Path,
    params: FanoutParams,
    timeout_ms: Option<u64>,
    json: bool,
) -> GraphResult<()> {
    let (snapshot, _) = load_snapshot(path)?;
    let token = timeout_token(timeout_ms);
    let result = QueryEngine::new().fan_out(&snapshot, params, &token)?;

    if json {
        print_json(&result);
    } else {
        println!(
            "Reachable from {}: {} students",
            result.source,
            result.reached.len()
        );
        for r in &result.reached {
            println!("  {:>8}  distance {:>6}  hops {}", r.vertex, r.distance, r.hops);
        }
    }
    Ok(())
}

/// Connection recommendations for one student.
pub fn cmd_recommend(
    path: &Path,
    params: RecommendParams,
    timeout_ms: Option<u64>,
    json: bool,
) -> GraphResult<()> {
    let (snapshot, _) = load_snapshot(path)?;
    let token = timeout_token(timeout_ms);
    let recs = QueryEngine::new().recommend(&snapshot, params, &token)?;

    if json {
        let items: Vec<serde_json::Value> = recs
            .iter()
            .map(|r| {
                serde_json::json!({
                    "student": r.vertex,
                    "distance": Distance::Reachable(r.distance),
                    "hops": r.hops,
                })
            })
            .collect();
        print_json(&items);
    } else if recs.is_empty() {
        println!("No recommendations for {}", params.source);
    } else {
        println!("Recommendations for {}:", params.source);
        for r in &recs {
            println!("  {:>8}  distance {:>6}  hops {}", r.vertex, r.distance, r.hops);
        }
    }
    Ok(())
}

/// Students the given student does not follow.
pub fn cmd_suggest(path: &Path, source: StudentId, limit: usize, json: bool) -> GraphResult<()> {
    let (snapshot, _) = load_snapshot(path)?;
    let mut ids = QueryEngine::new().non_connections(&snapshot, source)?;
    let total = ids.len();
    ids.truncate(limit);

    if json {
        print_json(&serde_json::json!({
            "source": source,
            "total": total,
            "students": ids,
        }));
    } else {
        println!("{} does not follow {} students", source, total);
        for id in &ids {
            println!("  {}", id);
        }
    }
    Ok(())
}

fn format_path(ids: &[StudentId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

fn format_timestamp(micros: u64) -> String {
    let secs = (micros / 1_000_000) as i64;
    let dt = chrono::DateTime::from_timestamp(secs, 0);
    match dt {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => format!("{} us", micros),
    }
}
