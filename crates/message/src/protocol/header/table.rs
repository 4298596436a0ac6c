//! Ordered, case-insensitive, case-preserving header storage.
//!
//! A [`HeaderTable`] keeps two maps: the lower-cased name to the canonical
//! spelling it was registered with, and the canonical spelling to its values.
//! All mutators take `&self` and return a new table. Value lists are held
//! behind a shared pointer, so deriving a table only copies the entries that
//! actually change.

use indexmap::IndexMap;
use serde_json::Value;
use triomphe::Arc;

use crate::protocol::MessageError;
use crate::protocol::header::validator;
use crate::protocol::header::values::{HeaderValues, coerce_admissible, filter_values};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderTable {
    /// normalized name -> canonical name
    names: IndexMap<String, String>,
    /// canonical name -> values, never empty
    entries: IndexMap<String, Arc<Vec<String>>>,
}

#[inline]
fn normalize(name: &str) -> String {
    name.to_ascii_lowercase()
}

impl HeaderTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from `(name, values)` pairs.
    ///
    /// Each pair goes through the same checks as [`set`](Self::set); the first
    /// invalid pair aborts the whole construction.
    pub fn try_from_pairs<I, N, V>(pairs: I) -> Result<Self, MessageError>
    where
        I: IntoIterator<Item = (N, V)>,
        N: AsRef<str>,
        V: Into<HeaderValues>,
    {
        let mut table = Self::new();
        for (name, values) in pairs {
            table.insert_replacing(name.as_ref(), values.into())?;
        }
        Ok(table)
    }

    /// Builds a table from a JSON object of `name -> string | number | [string | number]`.
    pub fn try_from_json(value: &Value) -> Result<Self, MessageError> {
        let Value::Object(map) = value else {
            return Err(MessageError::invalid_header_value("headers must be given as an object"));
        };

        let mut table = Self::new();
        for (name, values) in map {
            table.insert_replacing(name, coerce_admissible(values)?)?;
        }
        Ok(table)
    }

    /// Returns a table where `name` holds exactly `values`.
    ///
    /// An existing entry matching `name` case-insensitively is dropped, and the
    /// new spelling of `name` becomes the canonical one.
    pub fn set(&self, name: &str, values: impl Into<HeaderValues>) -> Result<Self, MessageError> {
        let mut table = self.clone();
        table.insert_replacing(name, values.into())?;
        Ok(table)
    }

    /// Returns a table where `values` are appended to the entry for `name`.
    ///
    /// The spelling registered first is kept for display.
    pub fn add(&self, name: &str, values: impl Into<HeaderValues>) -> Result<Self, MessageError> {
        validator::validate_name(name)?;
        let values = filter_values(values.into())?;

        let mut table = self.clone();
        match table.names.get(&normalize(name)) {
            Some(canonical) => {
                // the name map and entry map always move together
                if let Some(existing) = table.entries.get_mut(canonical) {
                    Arc::make_mut(existing).extend(values);
                }
            }
            None => {
                table.names.insert(normalize(name), name.to_owned());
                table.entries.insert(name.to_owned(), Arc::new(values));
            }
        }
        Ok(table)
    }

    /// Returns a table without any entry matching `name`.
    #[must_use]
    pub fn remove(&self, name: &str) -> Self {
        let mut table = self.clone();
        table.take(name);
        table
    }

    /// Values for `name`, or an empty slice.
    pub fn get(&self, name: &str) -> &[String] {
        self.canonical_name(name)
            .and_then(|canonical| self.entries.get(canonical))
            .map(|values| values.as_slice())
            .unwrap_or_default()
    }

    /// Values for `name` joined by a bare comma, or an empty string.
    pub fn get_line(&self, name: &str) -> String {
        self.get(name).join(",")
    }

    pub fn has(&self, name: &str) -> bool {
        self.names.contains_key(&normalize(name))
    }

    /// The spelling `name` was registered with.
    pub fn canonical_name(&self, name: &str) -> Option<&str> {
        self.names.get(&normalize(name)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(canonical name, values)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Copies the table into a plain `canonical name -> values` map.
    pub fn to_map(&self) -> IndexMap<String, Vec<String>> {
        self.entries.iter().map(|(name, values)| (name.clone(), values.to_vec())).collect()
    }

    /// Like [`set`](Self::set) for a single value produced by the crate itself,
    /// such as a `Host` computed from a parsed URI, which can't fail validation.
    #[must_use]
    pub(crate) fn replace_trusted(&self, name: &str, value: String) -> Self {
        debug_assert!(validator::is_token(name) && validator::is_valid_value(&value));

        let mut table = self.clone();
        table.take(name);
        table.names.insert(normalize(name), name.to_owned());
        table.entries.insert(name.to_owned(), Arc::new(vec![value]));
        table
    }

    fn insert_replacing(&mut self, name: &str, values: HeaderValues) -> Result<(), MessageError> {
        validator::validate_name(name)?;
        let values = filter_values(values)?;

        self.take(name);
        self.names.insert(normalize(name), name.to_owned());
        self.entries.insert(name.to_owned(), Arc::new(values));
        Ok(())
    }

    fn take(&mut self, name: &str) -> Option<Arc<Vec<String>>> {
        let canonical = self.names.shift_remove(&normalize(name))?;
        self.entries.shift_remove(&canonical)
    }
}

impl<'a> IntoIterator for &'a HeaderTable {
    type Item = (&'a str, &'a [String]);
    type IntoIter = Box<dyn Iterator<Item = Self::Item> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_and_get_case_insensitive() {
        let table = HeaderTable::new().set("X-Foo", ["Foo", "Bar"]).unwrap();

        assert_eq!(table.get("x-foo"), ["Foo", "Bar"]);
        assert_eq!(table.get("X-FOO"), ["Foo", "Bar"]);
        assert_eq!(table.get_line("X-Foo"), "Foo,Bar");
        assert!(table.has("x-FoO"));
        assert_eq!(table.canonical_name("x-foo"), Some("X-Foo"));
    }

    #[test]
    fn absent_name() {
        let table = HeaderTable::new();
        assert!(table.get("Accept").is_empty());
        assert_eq!(table.get_line("Accept"), "");
        assert!(!table.has("Accept"));
    }

    #[test]
    fn set_replaces_spelling_and_values() {
        let table = HeaderTable::new().set("content-type", "text/plain").unwrap();
        let table = table.set("Content-Type", "text/html").unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.canonical_name("CONTENT-TYPE"), Some("Content-Type"));
        assert_eq!(table.get("content-type"), ["text/html"]);
    }

    #[test]
    fn add_keeps_first_spelling() {
        let table = HeaderTable::new().add("X-Trace", "a").unwrap();
        let table = table.add("x-trace", ["b", "c"]).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.canonical_name("X-TRACE"), Some("X-Trace"));
        assert_eq!(table.get_line("x-trace"), "a,b,c");
    }

    #[test]
    fn receiver_is_untouched() {
        let original = HeaderTable::new().set("Accept", "text/plain").unwrap();
        let added = original.add("accept", "text/html").unwrap();
        let removed = original.remove("ACCEPT");

        assert_eq!(original.get("Accept"), ["text/plain"]);
        assert_eq!(added.get("Accept"), ["text/plain", "text/html"]);
        assert!(!removed.has("Accept"));
    }

    #[test]
    fn set_then_remove_restores_count() {
        let table = HeaderTable::new().set("Accept", "*/*").unwrap().set("Host", "example.com").unwrap();
        let before = table.len();

        let round_trip = table.set("X-Temp", ["1", "2"]).unwrap().remove("x-temp");

        assert!(!round_trip.has("X-Temp"));
        assert_eq!(round_trip.len(), before);
        assert_eq!(round_trip, table);
    }

    #[test]
    fn remove_absent_is_noop() {
        let table = HeaderTable::new().set("Accept", "*/*").unwrap();
        assert_eq!(table.remove("Host"), table);
    }

    #[test]
    fn case_variants_agree_after_mutations() {
        let table = HeaderTable::new()
            .set("Set-Cookie", "a=1")
            .unwrap()
            .add("SET-COOKIE", "b=2")
            .unwrap()
            .remove("set-cookie")
            .add("sEt-CoOkIe", "c=3")
            .unwrap();

        for name in ["set-cookie", "SET-COOKIE", "Set-Cookie", "sEt-CoOkIe"] {
            assert!(table.has(name));
            assert_eq!(table.get(name), ["c=3"]);
        }
        assert_eq!(table.canonical_name("set-cookie"), Some("sEt-CoOkIe"));
    }

    #[test]
    fn invalid_input_leaves_table_unchanged() {
        let table = HeaderTable::new().set("Accept", "*/*").unwrap();

        assert!(matches!(table.set("Bad Name", "x"), Err(MessageError::InvalidHeaderName { .. })));
        assert!(matches!(table.add("Accept", "x\r\ny: z"), Err(MessageError::InvalidHeaderValue { .. })));
        assert!(matches!(table.set("Accept", Vec::<String>::new()), Err(MessageError::InvalidHeaderValue { .. })));
        assert_eq!(table.get("accept"), ["*/*"]);
    }

    #[test]
    fn numbers_are_stored_as_strings() {
        let table = HeaderTable::new().set("Content-Length", 1024_u64).unwrap();
        assert_eq!(table.get("content-length"), ["1024"]);
    }

    #[test]
    fn iteration_follows_insertion_order() {
        let table = HeaderTable::new()
            .set("A", "1")
            .unwrap()
            .set("B", "2")
            .unwrap()
            .set("C", "3")
            .unwrap()
            .set("a", "4")
            .unwrap();

        let names: Vec<_> = table.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["B", "C", "a"]);
    }

    #[test]
    fn bulk_from_pairs() {
        let table = HeaderTable::try_from_pairs([("Accept", "*/*"), ("Host", "example.com")]).unwrap();
        assert_eq!(table.len(), 2);

        let result = HeaderTable::try_from_pairs([("Accept", "*/*"), ("Bad Name", "x")]);
        assert!(matches!(result, Err(MessageError::InvalidHeaderName { .. })));
    }

    #[test]
    fn bulk_from_json() {
        let table = HeaderTable::try_from_json(&json!({
            "Accept": ["text/html", "text/plain"],
            "Content-Length": 12,
        }))
        .unwrap();

        assert_eq!(table.get_line("accept"), "text/html,text/plain");
        assert_eq!(table.get("content-length"), ["12"]);
    }

    #[test]
    fn bulk_from_json_keeps_given_order() {
        let value: serde_json::Value = serde_json::from_str(r#"{"Zeta": "z", "Alpha": "a", "Mid": "m"}"#).unwrap();
        let table = HeaderTable::try_from_json(&value).unwrap();
        let names: Vec<_> = table.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["Zeta", "Alpha", "Mid"]);

        // the later spelling of a name wins
        let value: serde_json::Value = serde_json::from_str(r#"{"zeta": "first", "Alpha": "a", "Zeta": "again"}"#).unwrap();
        let table = HeaderTable::try_from_json(&value).unwrap();
        let names: Vec<_> = table.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["Alpha", "Zeta"]);
        assert_eq!(table.get("ZETA"), ["again"]);
    }

    #[test]
    fn bulk_from_json_is_atomic() {
        for value in [
            json!({"Accept": "*/*", "X-Flag": true}),
            json!({"Accept": "*/*", "X-Bad": "a\nb"}),
            json!({"Accept": "*/*", "X-Obj": {"a": 1}}),
            json!(["Accept"]),
        ] {
            assert!(HeaderTable::try_from_json(&value).is_err(), "{value} should be rejected");
        }
    }
}
