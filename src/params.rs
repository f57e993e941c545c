//! Query-string and form-body parameters that drive a render.

use url::form_urlencoded;

pub const CSV_PARAM: &str = "csv";
pub const ID_PARAM: &str = "id";
pub const ORIGIN_CSV_FIELD: &str = "origin_csv";
pub const ORIGIN_ID_FIELD: &str = "origin_id";

/// The (locator, identifier) pair taken from the page URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pub csv: String,
    pub id: Option<String>,
}

impl QueryParams {
    pub fn new(csv: impl Into<String>, id: Option<String>) -> Self {
        Self { csv: csv.into(), id }
    }

    /// Read `csv` and `id` from a raw query string (without the leading `?`).
    pub fn from_query(query: Option<&str>) -> Self {
        let mut csv = None;
        let mut id = None;
        if let Some(qs) = query {
            for (key, value) in form_urlencoded::parse(qs.as_bytes()) {
                match &*key {
                    CSV_PARAM if csv.is_none() => csv = Some(value.into_owned()),
                    ID_PARAM if id.is_none() => id = Some(value.into_owned()),
                    _ => {}
                }
            }
        }
        Self {
            csv: csv.unwrap_or_default(),
            id,
        }
    }

    /// Both a locator and an identifier are present and non-empty.
    pub fn is_complete(&self) -> bool {
        !self.csv.is_empty() && self.id.as_deref().map_or(false, |id| !id.is_empty())
    }

    pub fn id_str(&self) -> &str {
        self.id.as_deref().unwrap_or("")
    }

    /// Relative URL (`?csv=..&id=..`) that reloads the page with these parameters.
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        serializer.append_pair(CSV_PARAM, &self.csv);
        serializer.append_pair(ID_PARAM, self.id_str());
        format!("?{}", serializer.finish())
    }
}

/// A submitted lookup form: the candidate pair plus the page it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupSubmission {
    pub csv: String,
    pub id: String,
    pub origin: QueryParams,
}

impl LookupSubmission {
    /// Parse an `application/x-www-form-urlencoded` body (or a GET query string).
    pub fn from_form(body: &str) -> Self {
        let mut submission = LookupSubmission::default();
        let mut origin_id = None;
        for (key, value) in form_urlencoded::parse(body.trim().as_bytes()) {
            match &*key {
                CSV_PARAM => submission.csv = value.into_owned(),
                ID_PARAM => submission.id = value.into_owned(),
                ORIGIN_CSV_FIELD => submission.origin.csv = value.into_owned(),
                ORIGIN_ID_FIELD => origin_id = Some(value.into_owned()),
                _ => {}
            }
        }
        submission.origin.id = origin_id.filter(|id| !id.is_empty());
        submission
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_params() {
        let params = QueryParams::from_query(None);
        assert_eq!(params.csv, "");
        assert_eq!(params.id, None);
        assert!(!params.is_complete());

        let params = QueryParams::from_query(Some("csv=data.csv"));
        assert_eq!(params.csv, "data.csv");
        assert!(!params.is_complete());

        let params = QueryParams::from_query(Some("csv=data.csv&id="));
        assert_eq!(params.id.as_deref(), Some(""));
        assert!(!params.is_complete());
    }

    #[test]
    fn test_decodes_percent_and_plus() {
        let params = QueryParams::from_query(Some(
            "csv=https%3A%2F%2Fexample.org%2Fd01%E9%8A%85_s1.csv&id=%E4%B8%AD%E9%8A%85000651&id=other",
        ));
        assert_eq!(params.csv, "https://example.org/d01銅_s1.csv");
        assert_eq!(params.id.as_deref(), Some("中銅000651"));

        let params = QueryParams::from_query(Some("csv=my+file.csv&id=A+1"));
        assert_eq!(params.csv, "my file.csv");
        assert_eq!(params.id_str(), "A 1");
    }

    #[test]
    fn test_query_string_reparses() {
        let params = QueryParams::new("dir/a b.csv", Some("故玉002103".to_string()));
        let qs = params.to_query_string();
        assert!(qs.starts_with("?csv="));
        assert_eq!(QueryParams::from_query(Some(&qs[1..])), params);
    }

    #[test]
    fn test_lookup_submission() {
        let form = LookupSubmission::from_form("csv=+local.csv+&id=A1&origin_csv=old.csv&origin_id=B2");
        assert_eq!(form.csv, " local.csv ");
        assert_eq!(form.id, "A1");
        assert_eq!(form.origin, QueryParams::new("old.csv", Some("B2".to_string())));

        let form = LookupSubmission::from_form("csv=x.csv&id=&origin_csv=&origin_id=");
        assert_eq!(form.id, "");
        assert!(!form.origin.is_complete());
        assert_eq!(form.origin.id, None);
    }
}
