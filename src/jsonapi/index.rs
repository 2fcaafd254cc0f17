use std::collections::HashMap;

use super::document::{ResourceIdentifier, ResourceObject};

/// Lookup table over a document's `included` array, keyed by type and id.
///
/// Built in a single pass; a later resource with the same (type, id) replaces
/// an earlier one. Included resources without an id can't be referenced and are
/// left out. The index borrows the document and lives for one transform call.
#[derive(Debug, Default)]
pub struct ResourceIndex<'a> {
    by_type: HashMap<&'a str, HashMap<&'a str, Entry<'a>>>,
}

#[derive(Debug, Clone, Copy)]
struct Entry<'a> {
    position: usize,
    resource: &'a ResourceObject,
}

impl<'a> ResourceIndex<'a> {
    pub fn build(included: &'a [ResourceObject]) -> Self {
        let mut by_type: HashMap<&'a str, HashMap<&'a str, Entry<'a>>> = HashMap::new();

        for (position, resource) in included.iter().enumerate() {
            let Some(id) = resource.id.as_deref() else {
                tracing::debug!("Skipping included '{}' resource without id", resource.resource_type);
                continue;
            };
            by_type
                .entry(resource.resource_type.as_str())
                .or_default()
                .insert(id, Entry { position, resource });
        }

        Self { by_type }
    }

    pub fn get(&self, resource_type: &str, id: &str) -> Option<&'a ResourceObject> {
        self.entry(resource_type, id).map(|entry| entry.resource)
    }

    /// Resolve an identifier. Identifiers without id never resolve.
    pub fn resolve(&self, identifier: &ResourceIdentifier) -> Option<&'a ResourceObject> {
        let id = identifier.id.as_deref()?;
        self.get(&identifier.resource_type, id)
    }

    /// Position of the resolved resource within the `included` array.
    pub fn position(&self, identifier: &ResourceIdentifier) -> Option<usize> {
        let id = identifier.id.as_deref()?;
        self.entry(&identifier.resource_type, id).map(|entry| entry.position)
    }

    pub fn len(&self) -> usize {
        self.by_type.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn types(&self) -> impl Iterator<Item = &&'a str> {
        self.by_type.keys()
    }

    fn entry(&self, resource_type: &str, id: &str) -> Option<&Entry<'a>> {
        self.by_type.get(resource_type)?.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resource(resource_type: &str, id: Option<&str>, name: &str) -> ResourceObject {
        let mut r = ResourceObject::new(resource_type, id.map(String::from));
        r.attributes.insert("name".into(), json!(name));
        r
    }

    #[test]
    fn buckets_by_type_then_id() {
        let included = vec![
            resource("team_members", Some("1"), "Jigoro Kano"),
            resource("countries", Some("1"), "Japan"),
        ];
        let index = ResourceIndex::build(&included);

        assert_eq!(index.len(), 2);
        assert_eq!(index.get("countries", "1").unwrap().attributes["name"], json!("Japan"));
        assert_eq!(index.get("team_members", "1").unwrap().attributes["name"], json!("Jigoro Kano"));
        assert!(index.get("countries", "2").is_none());
        assert!(index.get("teams", "1").is_none());
    }

    #[test]
    fn last_write_wins_on_duplicates() {
        let included = vec![
            resource("countries", Some("1"), "Nippon"),
            resource("countries", Some("1"), "Japan"),
        ];
        let index = ResourceIndex::build(&included);

        assert_eq!(index.len(), 1);
        assert_eq!(index.get("countries", "1").unwrap().attributes["name"], json!("Japan"));
        assert_eq!(index.position(&ResourceIdentifier::new("countries", Some("1".into()))), Some(1));
    }

    #[test]
    fn resources_without_id_are_not_indexed() {
        let included = vec![resource("countries", None, "Nowhere")];
        let index = ResourceIndex::build(&included);

        assert!(index.is_empty());
        assert!(index.resolve(&ResourceIdentifier::new("countries", None)).is_none());
    }
}
