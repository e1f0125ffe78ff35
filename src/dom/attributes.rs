//! Element attribute storage.
//!
//! Attributes keep document order. Names are stored lowercase and every
//! lookup is ASCII case-insensitive, so `CLASS` and `class` are the same
//! attribute. An attribute that is present with an empty value is distinct
//! from one that is absent.

/// A single `name="value"` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Lowercased attribute name.
    pub name: String,
    /// Decoded attribute value.
    pub value: String,
}

/// Ordered attribute list of one element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<Attribute>);

impl Attributes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of `name`, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|attr| attr.name.eq_ignore_ascii_case(name))
            .map(|attr| attr.value.as_str())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|attr| attr.name.eq_ignore_ascii_case(name))
    }

    /// Set `name` to `value`, replacing an existing value in place or
    /// appending a new attribute.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        if let Some(attr) = self
            .0
            .iter_mut()
            .find(|attr| attr.name.eq_ignore_ascii_case(name))
        {
            attr.value = value;
        } else {
            self.0.push(Attribute {
                name: name.to_ascii_lowercase(),
                value,
            });
        }
    }

    /// Append `name` only when it is not already present.
    ///
    /// Returns `false` for a duplicate, which the parser reports.
    pub fn insert_new(&mut self, name: &str, value: impl Into<String>) -> bool {
        if self.contains(name) {
            return false;
        }
        self.0.push(Attribute {
            name: name.to_ascii_lowercase(),
            value: value.into(),
        });
        true
    }

    /// Remove `name`, returning its previous value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let index = self
            .0
            .iter()
            .position(|attr| attr.name.eq_ignore_ascii_case(name))?;
        Some(self.0.remove(index).value)
    }

    /// Drop every attribute for which `keep` returns `false`.
    pub fn retain(&mut self, mut keep: impl FnMut(&Attribute) -> bool) {
        self.0.retain(|attr| keep(attr));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whitespace-separated tokens of the `class` attribute.
    pub fn class_list(&self) -> impl Iterator<Item = &str> {
        self.get("class").unwrap_or_default().split_whitespace()
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Attributes {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let mut attrs = Self::new();
        for (name, value) in iter {
            let name: String = name.into();
            attrs.insert_new(&name, value);
        }
        attrs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let mut attrs = Attributes::new();
        attrs.set("CLASS", "a b");
        assert_eq!(attrs.get("class"), Some("a b"));
        assert_eq!(attrs.iter().next().map(|a| a.name.as_str()), Some("class"));
    }

    #[test]
    fn test_empty_value_is_not_absent() {
        let attrs: Attributes = [("hidden", "")].into_iter().collect();
        assert!(attrs.contains("hidden"));
        assert_eq!(attrs.get("hidden"), Some(""));
        assert_eq!(attrs.get("id"), None);
    }

    #[test]
    fn test_insert_new_keeps_first() {
        let mut attrs = Attributes::new();
        assert!(attrs.insert_new("id", "first"));
        assert!(!attrs.insert_new("ID", "second"));
        assert_eq!(attrs.get("id"), Some("first"));
    }

    #[test]
    fn test_class_list() {
        let attrs: Attributes = [("class", "  page  caption\tfoo ")].into_iter().collect();
        let classes: Vec<&str> = attrs.class_list().collect();
        assert_eq!(classes, vec!["page", "caption", "foo"]);
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut attrs: Attributes = [("a", "1"), ("b", "2"), ("c", "3")].into_iter().collect();
        assert_eq!(attrs.remove("b"), Some("2".to_string()));
        let names: Vec<&str> = attrs.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
    }
}
