use serde_json::Value;
use std::collections::BTreeMap;

/// A predicate inside the `*[...]` filter
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// `path == $param`
    Eq { path: String, value: Value },
    /// `defined(path)`
    Defined(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ordering {
    pub path: String,
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slice {
    /// `[n]`, yields a single document or null
    Index(usize),
    /// `[start...end]`, end exclusive
    Range(usize, usize),
}

/// Structured read query against one document type.
///
/// Rendered to the CMS query language by [`Query::to_groq`]; kept structured
/// so the in-memory source can evaluate the same query.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub doc_type: String,
    pub filters: Vec<Filter>,
    pub order: Vec<Ordering>,
    pub slice: Option<Slice>,
    pub projection: Vec<String>,
    /// Skip the CDN and any response cache
    pub fresh: bool,
}

impl Query {
    pub fn new(doc_type: impl Into<String>) -> Self {
        Self {
            doc_type: doc_type.into(),
            filters: Vec::new(),
            order: Vec::new(),
            slice: None,
            projection: Vec::new(),
            fresh: false,
        }
    }

    pub fn eq(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Eq { path: path.into(), value: value.into() });
        self
    }

    pub fn defined(mut self, path: impl Into<String>) -> Self {
        self.filters.push(Filter::Defined(path.into()));
        self
    }

    pub fn order_by(mut self, path: impl Into<String>, direction: Direction) -> Self {
        self.order.push(Ordering { path: path.into(), direction });
        self
    }

    pub fn first(mut self) -> Self {
        self.slice = Some(Slice::Index(0));
        self
    }

    pub fn range(mut self, start: usize, end: usize) -> Self {
        self.slice = Some(Slice::Range(start, end));
        self
    }

    pub fn project<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projection = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn fresh(mut self) -> Self {
        self.fresh = true;
        self
    }

    pub fn is_single(&self) -> bool {
        matches!(self.slice, Some(Slice::Index(_)))
    }

    /// Render the query string and its bound parameters (`$p0`, `$p1`, ...).
    pub fn to_groq(&self) -> (String, BTreeMap<String, Value>) {
        let mut params = BTreeMap::new();
        let mut predicates = vec![format!("_type == {}", quote(&self.doc_type))];

        for filter in &self.filters {
            match filter {
                Filter::Eq { path, value } => {
                    let name = format!("p{}", params.len());
                    predicates.push(format!("{path} == ${name}"));
                    params.insert(name, value.clone());
                }
                Filter::Defined(path) => predicates.push(format!("defined({path})")),
            }
        }

        let mut groq = format!("*[{}]", predicates.join(" && "));

        if !self.order.is_empty() {
            let clauses: Vec<String> = self
                .order
                .iter()
                .map(|o| {
                    let dir = match o.direction {
                        Direction::Asc => "asc",
                        Direction::Desc => "desc",
                    };
                    format!("{} {}", o.path, dir)
                })
                .collect();
            groq.push_str(&format!(" | order({})", clauses.join(", ")));
        }

        match self.slice {
            Some(Slice::Index(i)) => groq.push_str(&format!("[{i}]")),
            Some(Slice::Range(start, end)) => groq.push_str(&format!("[{start}...{end}]")),
            None => {}
        }

        if !self.projection.is_empty() {
            groq.push_str(&format!(" {{{}}}", self.projection.join(", ")));
        }

        (groq, params)
    }

    /// Stable key for response caching
    pub fn cache_key(&self) -> String {
        let (groq, params) = self.to_groq();
        let params = serde_json::to_string(&params).unwrap_or_default();
        format!("{groq}#{params}")
    }
}

fn quote(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{s}\""))
}
