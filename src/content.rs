use std::fmt::{Display, Formatter};

/// The type tag of a loaded [ContentItem].
///
/// The tag decides which grammars may run against the item; see [crate::GrammarKind::accepts].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContentKind {
    Text,
    Html,
    Json,
}

impl Display for ContentKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ContentKind::Text => "text",
            ContentKind::Html => "html",
            ContentKind::Json => "json",
        };
        f.write_str(name)
    }
}

/// One loaded unit of content. Items never change once created.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ContentItem {
    payload: String,
    kind: ContentKind,
}

impl ContentItem {
    pub fn new(payload: impl Into<String>, kind: ContentKind) -> Self {
        Self {
            payload: payload.into(),
            kind,
        }
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn kind(&self) -> ContentKind {
        self.kind
    }
}

/// Append-only, insertion-ordered collection of [ContentItem]s.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct ContentStore {
    items: Vec<ContentItem>,
}

impl ContentStore {
    pub fn push(&mut self, item: ContentItem) {
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn keeps_insertion_order() {
        let mut store = ContentStore::default();
        store.push(ContentItem::new("one", ContentKind::Json));
        store.push(ContentItem::new("two", ContentKind::Text));
        store.push(ContentItem::new("three", ContentKind::Html));

        let payloads: Vec<_> = store.items().iter().map(ContentItem::payload).collect();
        assert_eq!(payloads, ["one", "two", "three"]);
        assert_eq!(store.items()[1].kind(), ContentKind::Text);
    }

    #[test]
    fn clear_empties() {
        let mut store = ContentStore::default();
        store.push(ContentItem::new("one", ContentKind::Text));
        assert_eq!(store.len(), 1);
        store.clear();
        assert_eq!(store.len(), 0);
        assert!(store.items().is_empty());
    }
}
