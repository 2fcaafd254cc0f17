mod common;

use serde_json::json;

use kwai_api::schema::{SchemaError, SchemaRegistry};
use kwai_api::TransformError;

fn member_document(attributes: serde_json::Value) -> serde_json::Value {
    json!({
        "data": {
            "type": "members",
            "id": "3",
            "attributes": attributes,
            "relationships": { "person": { "data": { "type": "persons", "id": "5" } } }
        }
    })
}

#[test]
fn member_without_license_number_is_rejected() {
    let raw = member_document(json!({
        "license_end_date": "2027-01-31",
        "active": true,
        "competition": false
    }));

    let err = common::transformer().transform_document("members", raw).unwrap_err();
    let TransformError::Validation(err) = err else {
        panic!("expected validation error, got {:?}", err);
    };
    assert_eq!(err.paths(), vec!["data.attributes.license_number"]);
}

#[test]
fn every_violation_is_reported() {
    let raw = json!({
        "data": {
            "type": "members",
            "id": "3",
            "attributes": { "license_number": 12, "active": "yes", "competition": false }
        }
    });

    let err = common::transformer().validate("members", raw).unwrap_err();
    let TransformError::Validation(err) = err else {
        panic!("expected validation error, got {:?}", err);
    };
    assert!(err.contains_path("data.attributes.license_number"));
    assert!(err.contains_path("data.attributes.license_end_date"));
    assert!(err.contains_path("data.attributes.active"));
    assert!(err.contains_path("data.relationships.person"));
}

#[test]
fn wrong_resource_type_is_rejected() {
    let raw = json!({ "data": { "type": "countries", "id": "1", "attributes": { "name": "U11", "active": true } } });

    let err = common::transformer().validate("teams", raw).unwrap_err();
    let TransformError::Validation(err) = err else {
        panic!("expected validation error, got {:?}", err);
    };
    assert!(err.contains_path("data.type"));
}

#[test]
fn envelope_must_have_data() {
    let err = common::transformer().validate("teams", json!({ "meta": { "count": 0 } })).unwrap_err();
    assert!(matches!(err, TransformError::Validation(ref e) if e.contains_path("data")));
}

#[test]
fn defaults_are_filled_in_before_mapping() {
    let raw = json!({
        "data": {
            "type": "teams",
            "id": "1",
            "attributes": { "name": "U11", "active": true },
            "relationships": { "team_members": { "data": [] } }
        }
    });

    let document = common::transformer().validate("teams", raw).unwrap();
    let resource = document.resource().unwrap();
    assert_eq!(resource.attributes.get("remark"), Some(&json!("")));
}

#[test]
fn descriptors_load_from_yaml() {
    let yaml = r#"
- type: locations
  attributes:
    - name: name
      kind: string
    - name: postal_code
      kind: string
      required: false
  relationships:
    - name: country
      cardinality: one
      target: countries
"#;
    let mut registry = SchemaRegistry::kwai();
    let before = registry.len();
    assert_eq!(registry.load_yaml_str(yaml).unwrap(), 1);
    assert_eq!(registry.len(), before + 1);

    let transformer = kwai_api::Transformer::new(std::sync::Arc::new(registry));
    let raw = json!({
        "data": {
            "type": "locations",
            "id": "9",
            "attributes": { "name": "Sportcentrum" },
            "relationships": { "country": { "data": { "type": "countries", "id": "81" } } }
        },
        "included": [common::japan()]
    });
    let object = transformer.transform_document("locations", raw).unwrap().into_single().unwrap();
    let json = object.to_json();
    assert_eq!(json["name"], "Sportcentrum");
    assert_eq!(json["country"]["name"], "Japan");
}

#[test]
fn descriptor_files_need_a_known_extension() {
    let mut registry = SchemaRegistry::new();
    let err = registry.load_file("descriptors.toml").unwrap_err();
    assert!(matches!(err, SchemaError::Invalid(_)));
}

fn training_document(relationships: serde_json::Value, texts: serde_json::Value) -> serde_json::Value {
    json!({
        "data": {
            "type": "trainings",
            "id": "20",
            "attributes": {
                "event": { "start_date": "2026-03-04 19:00:00", "end_date": "2026-03-04 20:30:00" },
                "remark": "",
                "texts": texts
            },
            "relationships": relationships
        }
    })
}

#[test]
fn training_relationships_are_required() {
    let raw = training_document(json!({}), json!([]));

    let err = common::transformer().validate("trainings", raw).unwrap_err();
    let TransformError::Validation(err) = err else {
        panic!("expected validation error, got {:?}", err);
    };
    assert_eq!(
        err.paths(),
        vec!["data.relationships.teams", "data.relationships.definition", "data.relationships.coaches"]
    );
}

#[test]
fn training_texts_need_the_original_summary() {
    let relationships = json!({
        "teams": { "data": [] },
        "definition": { "data": null },
        "coaches": { "data": [] }
    });
    let text = json!({ "locale": "nl", "format": "md", "title": "Training", "summary": "", "original_content": null });

    let err = common::transformer()
        .validate("trainings", training_document(relationships.clone(), json!([text.clone()])))
        .unwrap_err();
    assert!(matches!(err, TransformError::Validation(ref e)
        if e.paths() == vec!["data.attributes.texts.0.original_summary"]));

    let mut complete = text;
    complete["original_summary"] = json!("");
    assert!(common::transformer()
        .validate("trainings", training_document(relationships, json!([complete])))
        .is_ok());
}
