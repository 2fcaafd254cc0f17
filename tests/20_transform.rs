mod common;

use chrono::NaiveDate;
use serde_json::json;

use kwai_api::models::{NewsItem, Team, TrainingDefinition};
use kwai_api::{DomainValue, Transformed};

#[test]
fn team_maps_to_domain_object() {
    let object = common::transformer()
        .transform_document("teams", common::empty_team_document())
        .unwrap()
        .into_single()
        .unwrap();

    assert_eq!(
        object.to_json(),
        json!({ "id": "1", "name": "U11", "active": true, "remark": "", "members": [] })
    );
}

#[test]
fn included_resources_are_dereferenced() {
    let object = common::transformer()
        .transform_document("teams", common::team_with_member_document())
        .unwrap()
        .into_single()
        .unwrap();

    let json = object.to_json();
    let member = &json["members"][0];
    assert_eq!(member["id"], "7");
    assert_eq!(member["nationality"]["name"], "Japan");
    assert_eq!(member["license"], json!({ "number": "JUDO-0001", "endDate": "2027-12-31" }));
    assert_eq!(member["activeInClub"], true);
}

#[test]
fn unresolved_to_one_is_null() {
    let raw = json!({
        "data": {
            "type": "teams",
            "id": "1",
            "attributes": { "name": "U11", "active": true },
            "relationships": { "team_members": { "data": [{ "type": "team_members", "id": "7" }] } }
        },
        "included": [common::team_member("7", Some("81"))]
    });

    let object = common::transformer().transform_document("teams", raw).unwrap().into_single().unwrap();
    let members = object.get("members").and_then(DomainValue::as_list).unwrap();
    assert_eq!(members.len(), 1);
    assert!(members[0].as_resource().unwrap().get("nationality").unwrap().is_null());
}

#[test]
fn unresolved_to_many_items_are_skipped() {
    let raw = json!({
        "data": {
            "type": "teams",
            "id": "1",
            "attributes": { "name": "U11", "active": true },
            "relationships": {
                "team_members": { "data": [{ "type": "team_members", "id": "7" }, { "type": "team_members", "id": "8" }] }
            }
        },
        "included": [common::team_member("8", None)]
    });

    let json = common::transformer().transform_document("teams", raw).unwrap().into_single().unwrap().to_json();
    assert_eq!(json["members"].as_array().map(Vec::len), Some(1));
    assert_eq!(json["members"][0]["id"], "8");
}

#[test]
fn collection_has_page_meta() {
    let transformed = common::transformer()
        .transform_document("teams", common::team_collection_document())
        .unwrap();
    assert!(transformed.is_collection());

    let page = transformed.into_page().unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page.meta.count, 2);
    assert_eq!(page.meta.limit, 10);
    // The second team had no remark
    assert_eq!(page.items[1].to_json()["remark"], "");
}

#[test]
fn missing_meta_defaults_to_zero() {
    let raw = json!({ "data": [] });
    let page = common::transformer().transform_document("teams", raw).unwrap().into_page().unwrap();
    assert!(page.is_empty());
    assert_eq!((page.meta.count, page.meta.offset, page.meta.limit), (0, 0, 0));
}

#[test]
fn typed_team_from_document() {
    let team = common::transformer()
        .transform::<Team>(common::team_with_member_document())
        .unwrap()
        .into_single()
        .unwrap();

    assert_eq!(team.id.as_deref(), Some("1"));
    assert_eq!(team.members.len(), 1);
    let member = &team.members[0];
    assert_eq!(member.license.end_date, NaiveDate::from_ymd_opt(2027, 12, 31).unwrap());
    assert_eq!(member.nationality.as_ref().map(|c| c.iso3.as_str()), Some("JPN"));
}

#[test]
fn news_item_dates_and_side_loaded_application() {
    let raw = json!({
        "data": {
            "type": "news_items",
            "id": "12",
            "attributes": {
                "publish_date": "2026-05-01 10:00:00",
                "texts": [{
                    "locale": "nl",
                    "format": "md",
                    "title": "Kampioenen",
                    "summary": "Twee titels",
                    "content": null
                }]
            },
            "relationships": { "application": { "data": { "type": "applications", "id": "2" } } }
        },
        "included": [{ "type": "applications", "id": "2", "attributes": { "name": "news", "title": "Nieuws" } }]
    });

    let item = match common::transformer().transform::<NewsItem>(raw).unwrap() {
        Transformed::Single(item) => item,
        Transformed::Collection(_) => panic!("expected a single news item"),
    };
    assert_eq!(item.priority, 0);
    assert!(!item.enabled);
    assert_eq!(item.publish_date.to_rfc3339(), "2026-05-01T10:00:00+00:00");
    assert_eq!(item.texts[0].title, "Kampioenen");
    assert_eq!(item.application.map(|a| a.title), Some("Nieuws".to_string()));
}

#[test]
fn definition_uses_team_summary() {
    let raw = json!({
        "data": {
            "type": "training_definitions",
            "id": "4",
            "attributes": {
                "name": "Competitie",
                "description": "Wedstrijdtraining",
                "weekday": 3,
                "start_time": "19:00",
                "end_time": "20:30",
                "active": true,
                "location": "Dojo"
            },
            "relationships": { "team": { "data": { "type": "teams", "id": "1" } } }
        },
        "included": [{ "type": "teams", "id": "1", "attributes": { "name": "U11" } }]
    });

    let definition = common::transformer()
        .transform::<TrainingDefinition>(raw)
        .unwrap()
        .into_single()
        .unwrap();
    assert_eq!(definition.start_time.format("%H:%M").to_string(), "19:00");
    assert_eq!(definition.team.map(|t| t.name), Some("U11".to_string()));
}

#[test]
fn member_is_mapped_through_person_and_contact() {
    let raw = json!({
        "data": {
            "type": "members",
            "id": "3",
            "attributes": {
                "license_number": "JUDO-0003",
                "license_end_date": "2026-12-31",
                "active": true,
                "competition": true
            },
            "relationships": { "person": { "data": { "type": "persons", "id": "5" } } }
        },
        "included": [
            common::japan(),
            {
                "type": "contacts",
                "id": "6",
                "attributes": {
                    "emails": ["jigoro@kwai.be"],
                    "tel": "",
                    "mobile": "",
                    "address": "Kodokan 1",
                    "postal_code": "112-0003",
                    "city": "Tokyo",
                    "county": ""
                },
                "relationships": { "country": { "data": { "type": "countries", "id": "81" } } }
            },
            {
                "type": "persons",
                "id": "5",
                "attributes": {
                    "first_name": "Jigoro",
                    "last_name": "Kano",
                    "gender": 1,
                    "birthdate": "1960-10-28"
                },
                "relationships": {
                    "contact": { "data": { "type": "contacts", "id": "6" } },
                    "nationality": { "data": { "type": "countries", "id": "81" } }
                }
            }
        ]
    });

    let member = common::transformer()
        .transform::<kwai_api::models::Member>(raw)
        .unwrap()
        .into_single()
        .unwrap();

    let person = member.person.unwrap();
    assert_eq!(person.nationality.map(|c| c.name), Some("Japan".to_string()));
    let contact = person.contact.unwrap();
    assert_eq!(contact.emails, vec!["jigoro@kwai.be".to_string()]);
    assert_eq!(contact.country.map(|c| c.iso2), Some("JP".to_string()));
}
