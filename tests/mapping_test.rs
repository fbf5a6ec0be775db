//! Tests for the shipped mapping file and mapping-driven building.

use std::path::PathBuf;

use marref_jsonld::{build, flatten, prune, ConvertError, MappingSpec, RecordField, RecordNode};
use serde_json::json;

fn shipped_mapping() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config/mappings/marref.yaml")
}

#[test]
fn test_shipped_mapping_matches_builtin() {
    let loaded = MappingSpec::load_from_file(shipped_mapping()).expect("Failed to load mapping");

    assert_eq!(loaded, MappingSpec::marref());
}

#[test]
fn test_missing_mapping_file() {
    let result = MappingSpec::load_from_file("config/mappings/does-not-exist.yaml");

    match result {
        Err(ConvertError::Mapping(msg)) => assert!(msg.contains("Failed to read mapping file")),
        other => panic!("expected mapping error, got {:?}", other),
    }
}

#[test]
fn test_everything_empty_keeps_only_constants() {
    let record = RecordNode::new()
        .with_field(RecordField::new("comments").with_text(""))
        .with_field(RecordField::new("mmpidmissing").with_text("MMP00001"))
        .with_field(RecordField::new("organism"));

    let doc = prune(build(&flatten(&record), &MappingSpec::marref()));

    assert_eq!(
        doc,
        json!({"@context": "http://schema.org", "@type": ["BioChemEntity", "Sample"]})
    );
}

#[test]
fn test_pruning_twice_is_stable_on_real_output() {
    let record = RecordNode::new()
        .with_field(RecordField::new("mmpid").with_text("MMP1").with_url("http://mmp/1"))
        .with_field(RecordField::new("geolocnamegaz").with_text("Norway"))
        .with_field(RecordField::new("organism").with_text("X"));

    let once = prune(build(&flatten(&record), &MappingSpec::marref()));

    assert_eq!(prune(once.clone()), once);
    assert_eq!(
        once["additionalProperty"][0]["valueReference"],
        json!([{"@type": "CategoryCode", "name": "Norway"}])
    );
    assert_eq!(
        once["additionalProperty"][1],
        json!({
            "@type": "PropertyValue",
            "name": "Organism",
            "value": "X",
            "valueReference": [{"@type": "CategoryCode", "name": "X"}]
        })
    );
}
