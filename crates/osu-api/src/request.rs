//! Description of one API call

use serde_json::{Map, Value};

use crate::shape::Shape;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    One(String),
    /// Sent as repeated `key[]=value` pairs
    Many(Vec<String>),
}

/// Method, path, parameters and decode shape of a single request.
///
/// `context` holds request inputs the upstream omits from its response; the
/// dispatcher merges them into the JSON (where `shape` says) before decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub method: Method,
    /// Path relative to the API base, without a leading `/`
    pub path: String,
    pub query: Vec<(String, QueryValue)>,
    pub body: Option<Value>,
    pub shape: Shape,
    pub context: Map<String, Value>,
}

impl RequestSpec {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            shape: Shape::Plain,
            context: Map::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query
            .push((key.to_string(), QueryValue::One(value.to_string())));
        self
    }

    pub fn query_list<I, V>(mut self, key: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        let values = values.into_iter().map(|v| v.to_string()).collect();
        self.query.push((key.to_string(), QueryValue::Many(values)));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn shape(mut self, shape: Shape) -> Self {
        self.shape = shape;
        self
    }

    pub fn context(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.context.insert(key.to_string(), value.into());
        self
    }

    /// Query parameters as flat pairs, lists expanded to `key[]`.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for (key, value) in &self.query {
            match value {
                QueryValue::One(v) => pairs.push((key.clone(), v.clone())),
                QueryValue::Many(values) => {
                    let list_key = format!("{key}[]");
                    pairs.extend(values.iter().map(|v| (list_key.clone(), v.clone())));
                }
            }
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_expand_to_bracketed_keys() {
        let spec = RequestSpec::get("beatmaps")
            .query("mode", "osu")
            .query_list("ids", [75, 129]);

        assert_eq!(
            spec.query_pairs(),
            vec![
                ("mode".to_string(), "osu".to_string()),
                ("ids[]".to_string(), "75".to_string()),
                ("ids[]".to_string(), "129".to_string()),
            ]
        );
    }

    #[test]
    fn empty_list_sends_nothing() {
        let spec = RequestSpec::get("beatmaps").query_list("ids", Vec::<u64>::new());
        assert!(spec.query_pairs().is_empty());
    }

    #[test]
    fn builder_defaults() {
        let spec = RequestSpec::post("beatmaps/1/attributes")
            .json(serde_json::json!({"ruleset": "osu"}))
            .context("beatmap_id", 1);

        assert_eq!(spec.method, Method::Post);
        assert_eq!(spec.shape, Shape::Plain);
        assert_eq!(spec.context["beatmap_id"], 1);
        assert_eq!(reqwest::Method::from(spec.method), reqwest::Method::POST);
    }
}
