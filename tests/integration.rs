use std::process::Command;

use serde_json::Value;

fn storygraph(args: &[&str]) -> Value {
    let output = Command::new(env!("CARGO_BIN_EXE_storygraph"))
        .args(args)
        .output()
        .expect("Failed to execute storygraph");

    assert!(
        output.status.success(),
        "storygraph exited with error: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}

#[test]
fn lays_out_story_graph_with_force_directed() {
    let report = storygraph(&["layout", "--input", "tests/fixtures/story.json"]);

    assert_eq!(report["info"]["algorithm"], "force_directed");
    assert_eq!(report["info"]["node_count"], 6);
    // The castle -> dungeon edge is kept but never resolved
    assert_eq!(report["info"]["edge_count"], 6);

    let nodes = report["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 6);
    for node in nodes {
        assert!(node["x"].as_f64().unwrap().is_finite());
        assert!(node["y"].as_f64().unwrap().is_finite());
        assert_eq!(node["fixed"], false);
    }
}

#[test]
fn circular_layout_is_stable_after_one_tick() {
    let report = storygraph(&[
        "layout",
        "--input",
        "tests/fixtures/story.json",
        "--algorithm",
        "circular",
    ]);

    assert_eq!(report["info"]["algorithm"], "circular");
    assert_eq!(report["info"]["is_stable"], true);
    assert_eq!(report["info"]["tick_count"], 1);

    for node in report["nodes"].as_array().unwrap() {
        let (x, y) = (node["x"].as_f64().unwrap(), node["y"].as_f64().unwrap());
        assert!(((x * x + y * y).sqrt() - 100.0).abs() < 1e-2);
        assert_eq!(node["fixed"], true);
    }
}

#[test]
fn render_prints_culled_draw_commands() {
    let report = storygraph(&[
        "render",
        "--input",
        "tests/fixtures/story.json",
        "--config",
        "tests/fixtures/circular.yaml",
        "--algorithm",
        "circular",
    ]);

    // Fitted camera shows everything
    assert_eq!(report["stats"]["nodes"], 6);
    assert_eq!(report["stats"]["edges"], 5);

    let commands = report["commands"].as_array().unwrap();
    let texts: Vec<&str> = commands
        .iter()
        .filter(|c| c["op"] == "text")
        .filter_map(|c| c["text"].as_str())
        .collect();
    assert!(texts.contains(&"Aria Vale"));
    assert!(texts.contains(&"prophecy"));
    assert!(texts.contains(&"wields"));

    let aria_fill = commands
        .iter()
        .find(|c| c["op"] == "circle")
        .map(|c| c["fill"].clone())
        .unwrap();
    assert_eq!(aria_fill, "#FF0000");
}

#[test]
fn unsupported_algorithm_fails_with_message() {
    let output = Command::new(env!("CARGO_BIN_EXE_storygraph"))
        .args([
            "layout",
            "--input",
            "tests/fixtures/story.json",
            "--algorithm",
            "spring_embedder",
        ])
        .output()
        .expect("Failed to execute storygraph");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("spring_embedder"), "stderr: {stderr}");
}

#[test]
fn missing_input_file_fails() {
    let output = Command::new(env!("CARGO_BIN_EXE_storygraph"))
        .args(["layout", "--input", "tests/fixtures/nope.json"])
        .output()
        .expect("Failed to execute storygraph");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("nope.json"));
}
