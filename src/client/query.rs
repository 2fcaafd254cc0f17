use url::Url;

/// Query string for list endpoints.
///
/// Pagination parameters are only sent when they are non-zero, the backend
/// treats a missing offset or limit as "no pagination".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(self, offset: u64) -> Self {
        if offset == 0 {
            return self;
        }
        self.param("page[offset]", offset)
    }

    pub fn limit(self, limit: u64) -> Self {
        if limit == 0 {
            return self;
        }
        self.param("page[limit]", limit)
    }

    /// `filter[name]=value`
    pub fn filter(self, name: &str, value: impl ToString) -> Self {
        self.param(&format!("filter[{}]", name), value)
    }

    pub fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.pairs.push((key.to_string(), value.to_string()));
        self
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn apply(&self, url: &mut Url) {
        if !self.pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(self.pairs.iter());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_pagination_is_not_sent() {
        let query = QueryParams::new().offset(0).limit(0);
        assert!(query.is_empty());
    }

    #[test]
    fn pagination_and_filters() {
        let query = QueryParams::new().offset(20).limit(10).filter("team", "noteq:3");
        assert_eq!(query.get("page[offset]"), Some("20"));
        assert_eq!(query.get("page[limit]"), Some("10"));
        assert_eq!(query.get("filter[team]"), Some("noteq:3"));

        let mut url = Url::parse("http://localhost:8000/api/v1/teams/members").unwrap();
        query.apply(&mut url);
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs, query.pairs().to_vec());
    }
}
