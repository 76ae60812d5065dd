use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use model_edit::document::{Container, DocumentRoot};
use model_edit::{
    backup_path, AssetDocument, Color, Customization, Customizer, CustomizerConfig, MatchStrategy,
    ScaleFactor,
};
use serde_json::{json, Value};

fn document_json() -> Value {
    json!({
        "asset": { "version": "2.0", "generator": "fixture" },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": [
            { "name": "sofa", "children": [1, 2], "scale": [0.5, 0.5, 0.5] },
            { "name": "cushion", "mesh": 0, "translation": [0.0, 0.4, 0.0] },
            { "name": "frame", "mesh": 0, "rotation": [0.0, 0.0, 0.0, 1.0] }
        ],
        "meshes": [{
            "primitives": [{ "attributes": { "POSITION": 0 }, "material": 0 }],
            "extras": { "source": "scan" }
        }],
        "materials": [
            {
                "name": "fabric",
                "pbrMetallicRoughness": {
                    "baseColorFactor": [0.8, 0.8, 0.8, 1.0],
                    "metallicFactor": 0.0,
                    "roughnessFactor": 1.0,
                    "baseColorTexture": { "index": 0 }
                },
                "normalTexture": { "index": 0, "scale": 0.5 }
            },
            { "name": "legacy", "extensions": { "KHR_materials_unlit": {} } }
        ],
        "accessors": [{
            "bufferView": 0,
            "componentType": 5126,
            "count": 3,
            "type": "VEC3",
            "min": [0.0, 0.0, 0.0],
            "max": [1.0, 1.0, 0.0]
        }],
        "bufferViews": [{ "buffer": 0, "byteOffset": 0, "byteLength": 36 }],
        "buffers": [{ "byteLength": 36 }],
        "animations": [{
            "channels": [{ "sampler": 0, "target": { "node": 1, "path": "translation" } }],
            "samplers": [{ "input": 0, "output": 0 }]
        }],
        "extensionsUsed": ["KHR_materials_unlit"]
    })
}

fn bin_chunk() -> Vec<u8> {
    [0.0f32, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0]
        .iter()
        .flat_map(|f| f.to_le_bytes())
        .collect()
}

fn write_glb(dir: &Path) -> PathBuf {
    let root: DocumentRoot = serde_json::from_value(document_json()).unwrap();
    let document = AssetDocument::new(root, Container::Binary { bin: Some(bin_chunk()) });
    let path = dir.join("sofa.glb");
    fs::write(&path, document.to_vec().unwrap()).unwrap();
    path
}

fn load_json(path: &Path) -> Value {
    let document = AssetDocument::load(path).unwrap();
    serde_json::to_value(&document.root).unwrap()
}

fn load_bin(path: &Path) -> Vec<u8> {
    match AssetDocument::load(path).unwrap().container() {
        Container::Binary { bin: Some(bin) } => bin.clone(),
        other => panic!("unexpected container {:?}", other),
    }
}

#[test]
fn round_trip_without_edits_preserves_everything() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_glb(dir.path());

    let document = AssetDocument::load(&path).unwrap();
    document.save(&path).unwrap();

    assert_eq!(load_json(&path), document_json());
    assert_eq!(load_bin(&path), bin_chunk());
}

#[test]
fn color_scale_and_texture_in_one_request() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_glb(dir.path());
    let original = fs::read(&path).unwrap();

    let customization = Customization::new(
        Some("#3366CC".parse::<Color>().unwrap()),
        Some(ScaleFactor::parse("2").unwrap()),
        Some("Worn brown leather".to_owned()),
    );
    let report = Customizer::default().customize(&path, &customization).unwrap();
    assert_eq!(report.applied.len(), 3);
    assert!(report.created_backup);

    let edited = load_json(&path);
    let pbr = &edited["materials"][0]["pbrMetallicRoughness"];
    assert_eq!(
        pbr["baseColorFactor"],
        json!([51.0 / 255.0, 102.0 / 255.0, 204.0 / 255.0, 1.0])
    );
    // "leather" comes before "worn brown leather" in the table.
    assert_eq!(pbr["roughnessFactor"], json!(0.7));
    assert_eq!(pbr["metallicFactor"], json!(0.1));
    assert_eq!(pbr["baseColorTexture"], json!({ "index": 0 }));
    assert_eq!(edited["materials"][1], document_json()["materials"][1]);

    assert_eq!(edited["nodes"][0]["scale"], json!([1.0, 1.0, 1.0]));
    assert_eq!(edited["nodes"][1]["scale"], json!([2.0, 2.0, 2.0]));
    assert_eq!(edited["nodes"][2]["rotation"], json!([0.0, 0.0, 0.0, 1.0]));

    for key in ["accessors", "bufferViews", "buffers", "meshes", "animations", "extensionsUsed"] {
        assert_eq!(edited[key], document_json()[key], "{key}");
    }
    assert_eq!(load_bin(&path), bin_chunk());
    assert_eq!(fs::read(backup_path(&path)).unwrap(), original);
}

#[test]
fn scaling_compounds_across_requests() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_glb(dir.path());
    let customizer = Customizer::default();

    for factor in ["2", "1.5"] {
        let customization = Customization::new(None, Some(ScaleFactor::parse(factor).unwrap()), None);
        customizer.customize(&path, &customization).unwrap();
    }

    let edited = load_json(&path);
    assert_eq!(edited["nodes"][0]["scale"], json!([1.5, 1.5, 1.5]));
    assert_eq!(edited["nodes"][1]["scale"], json!([3.0, 3.0, 3.0]));
}

#[test]
fn backup_keeps_the_original_across_requests() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_glb(dir.path());
    let original = fs::read(&path).unwrap();
    let customizer = Customizer::default();

    let red = Customization::new(Some(Color::new(255, 0, 0)), None, None);
    assert!(customizer.customize(&path, &red).unwrap().created_backup);
    let blue = Customization::new(Some(Color::new(0, 0, 255)), None, None);
    assert!(!customizer.customize(&path, &blue).unwrap().created_backup);

    assert_eq!(fs::read(backup_path(&path)).unwrap(), original);
    assert_eq!(
        load_json(&path)["materials"][0]["pbrMetallicRoughness"]["baseColorFactor"],
        json!([0.0, 0.0, 1.0, 1.0])
    );
}

#[test]
fn longest_key_strategy_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_glb(dir.path());
    let customizer = Customizer::new(CustomizerConfig {
        match_strategy: MatchStrategy::LongestKey,
        ..Default::default()
    });

    let customization = Customization::new(None, None, Some("a soft velvet red floral cushion".to_owned()));
    customizer.customize(&path, &customization).unwrap();

    let pbr = &load_json(&path)["materials"][0]["pbrMetallicRoughness"];
    assert_eq!(pbr["roughnessFactor"], json!(0.9));
    assert_eq!(pbr["metallicFactor"], json!(0.05));
}

#[test]
fn concurrent_requests_on_one_asset_do_not_lose_edits() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_glb(dir.path());
    let customizer = Arc::new(Customizer::default());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let customizer = customizer.clone();
            let path = path.clone();
            thread::spawn(move || {
                let customization = Customization::new(None, Some(ScaleFactor::new(2.0).unwrap()), None);
                customizer.customize(&path, &customization).unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(load_json(&path)["nodes"][1]["scale"], json!([256.0, 256.0, 256.0]));
}
