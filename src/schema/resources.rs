//! Built-in descriptors for the kwai resource kinds.

use serde_json::json;

use super::descriptor::{AttributeSpec as A, FieldKind, RelationshipSpec as R, ResourceDescriptor};

pub fn all() -> Vec<ResourceDescriptor> {
    vec![
        countries(),
        teams(),
        team_summary(),
        team_members(),
        members(),
        persons(),
        contacts(),
        applications(),
        news_items(),
        pages(),
        training_definitions(),
        training_definition_summary(),
        trainings(),
        training_coaches(),
        coaches(),
        user_accounts(),
        user_invitations(),
    ]
}

/// `created_at` and `updated_at` as sent in the resource meta
fn traceable(descriptor: ResourceDescriptor) -> ResourceDescriptor {
    descriptor
        .meta(A::datetime("created_at").nullable().optional())
        .meta(A::datetime("updated_at").nullable().optional())
}

fn texts() -> FieldKind {
    FieldKind::Array(Box::new(FieldKind::Object(vec![
        A::string("locale"),
        A::string("format"),
        A::string("title"),
        A::string("summary"),
        A::string("content").nullable().optional(),
        A::string("original_summary").optional(),
        A::string("original_content").nullable().optional(),
    ])))
}

/// Coaches always get the original text next to the rendered one
fn training_texts() -> FieldKind {
    FieldKind::Array(Box::new(FieldKind::Object(vec![
        A::string("locale"),
        A::string("format"),
        A::string("title"),
        A::string("summary"),
        A::string("content").nullable().optional(),
        A::string("original_summary"),
        A::string("original_content").nullable(),
    ])))
}

pub fn countries() -> ResourceDescriptor {
    ResourceDescriptor::new("countries")
        .attribute(A::string("iso_2"))
        .attribute(A::string("iso_3"))
        .attribute(A::string("name"))
}

pub fn teams() -> ResourceDescriptor {
    ResourceDescriptor::new("teams")
        .attribute(A::string("name"))
        .attribute(A::boolean("active"))
        .attribute(A::string("remark").default_value(json!("")))
        .relationship(R::many("team_members", "team_members").field("members"))
}

/// Teams side-loaded next to trainings and definitions only carry a name
pub fn team_summary() -> ResourceDescriptor {
    ResourceDescriptor::new("teams").named("teams.summary").attribute(A::string("name"))
}

pub fn team_members() -> ResourceDescriptor {
    ResourceDescriptor::new("team_members")
        .attribute(A::boolean("active").default_value(json!(true)))
        .attribute(A::string("first_name"))
        .attribute(A::string("last_name"))
        .attribute(A::string("license_number").field("license.number"))
        .attribute(A::date("license_end_date").field("license.endDate"))
        .attribute(A::integer("gender"))
        .attribute(A::date("birthdate"))
        .attribute(A::boolean("active_in_club").default_value(json!(false)))
        .relationship(R::one("nationality", "countries"))
}

pub fn members() -> ResourceDescriptor {
    traceable(
        ResourceDescriptor::new("members")
            .attribute(A::string("uuid").optional())
            .attribute(A::string("license_number").field("license.number"))
            .attribute(A::date("license_end_date").field("license.endDate"))
            .attribute(A::string("remark").default_value(json!("")))
            .attribute(A::boolean("active"))
            .attribute(A::boolean("competition"))
            .relationship(R::one("person", "persons").required()),
    )
}

pub fn persons() -> ResourceDescriptor {
    traceable(
        ResourceDescriptor::new("persons")
            .attribute(A::string("first_name"))
            .attribute(A::string("last_name"))
            .attribute(A::integer("gender"))
            .attribute(A::date("birthdate"))
            .attribute(A::string("remark").default_value(json!("")))
            .relationship(R::one("contact", "contacts"))
            .relationship(R::one("nationality", "countries")),
    )
}

pub fn contacts() -> ResourceDescriptor {
    traceable(
        ResourceDescriptor::new("contacts")
            .attribute(A::array("emails", FieldKind::String).default_value(json!([])))
            .attribute(A::string("tel"))
            .attribute(A::string("mobile"))
            .attribute(A::string("address"))
            .attribute(A::string("postal_code"))
            .attribute(A::string("city"))
            .attribute(A::string("county"))
            .attribute(A::string("remark").default_value(json!("")))
            .relationship(R::one("country", "countries")),
    )
}

/// Applications are side-loaded with `name` and `title` only, the rest is optional
pub fn applications() -> ResourceDescriptor {
    ResourceDescriptor::new("applications")
        .attribute(A::string("name"))
        .attribute(A::string("title"))
        .attribute(A::string("short_description").optional())
        .attribute(A::string("description").optional())
        .attribute(A::string("remark").optional())
        .attribute(A::boolean("news").optional())
        .attribute(A::boolean("events").optional())
        .attribute(A::boolean("pages").optional())
        .attribute(A::integer("weight").optional())
}

pub fn news_items() -> ResourceDescriptor {
    ResourceDescriptor::new("news_items")
        .attribute(A::integer("priority").default_value(json!(0)))
        .attribute(A::datetime("publish_date"))
        .attribute(A::datetime("end_date").nullable().optional())
        .attribute(A::boolean("enabled").default_value(json!(false)))
        .attribute(A::string("remark").default_value(json!("")))
        .attribute(A::datetime("promotion_end_date").nullable().optional())
        .attribute(A::new("texts", texts()))
        .relationship(R::one("application", "applications"))
}

pub fn pages() -> ResourceDescriptor {
    ResourceDescriptor::new("pages")
        .attribute(A::boolean("enabled").default_value(json!(false)))
        .attribute(A::integer("priority").default_value(json!(0)))
        .attribute(A::string("remark").default_value(json!("")))
        .attribute(A::new("texts", texts()))
        .relationship(R::one("application", "applications"))
}

pub fn training_definitions() -> ResourceDescriptor {
    ResourceDescriptor::new("training_definitions")
        .attribute(A::string("name"))
        .attribute(A::string("description"))
        .attribute(A::integer("weekday"))
        .attribute(A::time("start_time"))
        .attribute(A::time("end_time"))
        .attribute(A::string("timezone").optional())
        .attribute(A::boolean("active"))
        .attribute(A::string("location"))
        .attribute(A::string("remark").nullable().optional())
        .relationship(R::one("team", "teams").schema("teams.summary"))
}

pub fn training_definition_summary() -> ResourceDescriptor {
    ResourceDescriptor::new("training_definitions")
        .named("training_definitions.summary")
        .attribute(A::string("name"))
}

/// The `coaches` attribute holds the per training flags, the `coaches`
/// relationship the coach resources. The relationship is mapped to
/// `coachResources` so both survive.
pub fn trainings() -> ResourceDescriptor {
    ResourceDescriptor::new("trainings")
        .attribute(A::object(
            "event",
            vec![
                A::datetime("start_date"),
                A::datetime("end_date"),
                A::string("location").default_value(json!("")),
                A::boolean("cancelled").default_value(json!(false)),
                A::boolean("active").default_value(json!(true)),
            ],
        ))
        .attribute(A::string("remark").default_value(json!("")))
        .attribute(A::new("texts", training_texts()).default_value(json!([])))
        .attribute(
            A::array(
                "coaches",
                FieldKind::Object(vec![
                    A::string("id"),
                    A::boolean("head"),
                    A::boolean("present"),
                    A::boolean("payed"),
                ]),
            )
            .default_value(json!([])),
        )
        .attribute(A::datetime("created_at").nullable().optional())
        .attribute(A::datetime("updated_at").nullable().optional())
        .relationship(R::many("teams", "teams").schema("teams.summary").required())
        .relationship(
            R::one("definition", "training_definitions")
                .schema("training_definitions.summary")
                .required(),
        )
        .relationship(R::many("coaches", "training_coaches").field("coachResources").required())
}

pub fn training_coaches() -> ResourceDescriptor {
    ResourceDescriptor::new("training_coaches").attribute(A::string("name"))
}

pub fn coaches() -> ResourceDescriptor {
    ResourceDescriptor::new("coaches")
        .attribute(A::string("name"))
        .attribute(A::string("remark").optional())
}

pub fn user_accounts() -> ResourceDescriptor {
    ResourceDescriptor::new("user_accounts")
        .attribute(A::string("email"))
        .attribute(A::string("first_name"))
        .attribute(A::string("last_name"))
        .attribute(A::string("remark").default_value(json!("")))
        .attribute(A::datetime("last_login").nullable().optional())
        .attribute(A::datetime("last_unsuccessful_login").nullable().optional())
        .attribute(A::boolean("revoked").default_value(json!(false)))
        .attribute(A::boolean("admin").default_value(json!(false)))
}

pub fn user_invitations() -> ResourceDescriptor {
    traceable(
        ResourceDescriptor::new("user_invitations")
            .attribute(A::string("email"))
            .attribute(A::string("first_name"))
            .attribute(A::string("last_name"))
            .attribute(A::string("remark").default_value(json!("")))
            .attribute(A::datetime("mailed_at").nullable().optional())
            .attribute(A::datetime("expired_at").nullable().optional())
            .attribute(A::datetime("confirmed_at").nullable().optional())
            .attribute(A::boolean("revoked").default_value(json!(false))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn descriptor_names_are_unique() {
        let descriptors = all();
        let names: HashSet<_> = descriptors.iter().map(|d| d.name.clone()).collect();
        assert_eq!(names.len(), descriptors.len());
    }

    #[test]
    fn team_members_map_into_license() {
        let descriptor = team_members();
        assert_eq!(descriptor.find_attribute("license_number").unwrap().domain_field(), "license.number");
        assert_eq!(descriptor.find_attribute("license_end_date").unwrap().domain_field(), "license.endDate");
    }

    #[test]
    fn summaries_share_the_resource_type() {
        assert_eq!(team_summary().resource_type, "teams");
        assert_eq!(training_definition_summary().resource_type, "training_definitions");
    }
}
