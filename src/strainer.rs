use crate::content::{ContentItem, ContentKind, ContentStore};
use crate::error::{TracingSink, Warning, WarningSink};
use crate::query::ParsedQuery;
use crate::select::EngineAdapter;
use std::collections::HashSet;
use std::fmt::{Debug, Formatter};

/// One query facade over every loaded content item.
///
/// Content goes in with [add_text](Self::add_text), [add_html](Self::add_html) and [add_json](Self::add_json). Queries
/// run against every item whose kind the query's grammar accepts, in insertion order, and never fail: anything that
/// goes wrong means fewer results, plus a [Warning] for the sink.
///
/// ```
/// use strainer::Strainer;
///
/// let mut strainer = Strainer::silent();
/// strainer.add_html(r#"<p class="price">Price: $25,000</p>"#);
/// strainer.add_text("Price: $31,000");
///
/// assert_eq!(strainer.query(-1, r"\$([\d,]+)"), ["25,000", "31,000"]);
/// assert_eq!(strainer.query(0, "css:.price >> substring-after('$')"), ["25,000"]);
/// assert_eq!(strainer.select(1, "css:.price"), "");
/// ```
pub struct Strainer {
    store: ContentStore,
    sink: Option<Box<dyn WarningSink>>,
}

impl Strainer {
    /// A facade that reports warnings through [tracing].
    pub fn new() -> Self {
        Self::with_sink(TracingSink)
    }

    pub fn with_sink(sink: impl WarningSink + 'static) -> Self {
        Self {
            store: ContentStore::default(),
            sink: Some(Box::new(sink)),
        }
    }

    /// A facade that doesn't report warnings anywhere. Results are the same as with any other sink.
    pub fn silent() -> Self {
        Self {
            store: ContentStore::default(),
            sink: None,
        }
    }

    pub fn add_text(&mut self, text: impl Into<String>) {
        self.add_item(ContentItem::new(text, ContentKind::Text));
    }

    pub fn add_html(&mut self, html: impl Into<String>) {
        self.add_item(ContentItem::new(html, ContentKind::Html));
    }

    /// Adds a JSON document. It isn't parsed until a `json:` query runs; invalid JSON just never matches.
    pub fn add_json(&mut self, json: impl Into<String>) {
        self.add_item(ContentItem::new(json, ContentKind::Json));
    }

    /// Adds an already-tagged item.
    pub fn add_item(&mut self, item: ContentItem) {
        tracing::debug!(kind = %item.kind(), len = item.payload().len(), "adding content");
        self.store.push(item);
    }

    pub fn content_count(&self) -> usize {
        self.store.len()
    }

    pub fn clear(&mut self) {
        self.store.clear();
    }

    pub fn items(&self) -> &[ContentItem] {
        self.store.items()
    }

    /// Runs `query` against every compatible item, and concatenates what they find.
    ///
    /// `index` then picks from the concatenation: `-1` keeps everything, `n >= 0` keeps only the n-th result (or
    /// nothing, if there are fewer), and any other negative keeps nothing.
    pub fn query(&self, index: i64, query: &str) -> Vec<String> {
        let parsed = ParsedQuery::parse(query);
        let adapter = EngineAdapter::from(parsed.kind);

        let mut found = Vec::new();
        for (item_idx, item) in self.store.items().iter().enumerate() {
            if !parsed.kind.accepts(item.kind()) {
                tracing::debug!(item = item_idx, grammar = %parsed.kind, content = %item.kind(), "skipping incompatible item");
                continue;
            }
            match adapter.extract(parsed.expression, item.payload()) {
                Ok(results) => {
                    tracing::debug!(item = item_idx, grammar = %parsed.kind, count = results.len(), "matched");
                    found.extend(results);
                }
                Err(error) => self.warn(Warning::Extract {
                    grammar: parsed.kind,
                    item: item_idx,
                    error,
                }),
            }
        }
        self.pick(index, found)
    }

    fn pick(&self, index: i64, mut found: Vec<String>) -> Vec<String> {
        match usize::try_from(index) {
            Ok(idx) if idx < found.len() => vec![found.swap_remove(idx)],
            Ok(_) => {
                self.warn(Warning::IndexOutOfRange {
                    index,
                    available: found.len(),
                });
                Vec::new()
            }
            Err(_) if index == -1 => found,
            Err(_) => {
                self.warn(Warning::InvalidIndex(index));
                Vec::new()
            }
        }
    }

    /// The first result of [query](Self::query), if it passes [default_valid]; otherwise `""`.
    pub fn select(&self, index: i64, query: &str) -> String {
        self.select_where(index, query, default_valid)
    }

    pub fn select_where<F>(&self, index: i64, query: &str, valid: F) -> String
    where
        F: Fn(&str) -> bool,
    {
        match self.query(index, query).into_iter().next() {
            Some(first) if valid(&first) => first,
            _ => String::new(),
        }
    }

    /// The results of the first query that finds something, all of which pass [default_valid].
    pub fn select_first(&self, queries: &[(i64, &str)]) -> Vec<String> {
        self.select_first_where(queries, default_valid)
    }

    pub fn select_first_where<F>(&self, queries: &[(i64, &str)], valid: F) -> Vec<String>
    where
        F: Fn(&str) -> bool,
    {
        for &(index, query) in queries {
            let found = self.query(index, query);
            if !found.is_empty() && found.iter().all(|text| valid(text)) {
                return found;
            }
        }
        Vec::new()
    }

    /// Every passing result of every query, without duplicates, in the order first seen.
    pub fn select_many(&self, queries: &[(i64, &str)]) -> Vec<String> {
        self.select_many_where(queries, default_valid)
    }

    pub fn select_many_where<F>(&self, queries: &[(i64, &str)], valid: F) -> Vec<String>
    where
        F: Fn(&str) -> bool,
    {
        let mut seen = HashSet::new();
        let mut union = Vec::new();
        for &(index, query) in queries {
            for text in self.query(index, query) {
                if valid(&text) && seen.insert(text.clone()) {
                    union.push(text);
                }
            }
        }
        union
    }

    /// Runs each query on its own. The output lines up with `queries`, one list per query.
    pub fn query_batch(&self, queries: &[(i64, &str)]) -> Vec<Vec<String>> {
        queries.iter().map(|&(index, query)| self.query(index, query)).collect()
    }

    fn warn(&self, warning: Warning) {
        if let Some(sink) = &self.sink {
            sink.warn(&warning);
        }
    }
}

impl Default for Strainer {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Strainer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Strainer")
            .field("items", &self.store.items())
            .field("has_sink", &self.sink.is_some())
            .finish()
    }
}

/// The validity check the non-`_where` combinators use: anything that isn't blank.
pub fn default_valid(text: &str) -> bool {
    !text.trim().is_empty()
}
