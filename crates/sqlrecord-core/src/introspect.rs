//! Field introspector.
//!
//! Walks a record's fields in declaration order (or override order), skips
//! positions before an offset, applies the exposure policy, and hands the
//! surviving fields to one of several aggregate views.
//!
//! The offset counts every declared field, exposed or not. With fields
//! `[_rev, id, name]`, offset `1` starts at `id` and offset `2` at `name`.

use std::collections::HashMap;

use crate::config::IntrospectConfig;
use crate::encode;
use crate::entity::Record;
use crate::error::Result;
use crate::exposure::FieldSource;
use crate::field::{Column, Field};
use crate::value::Value;

/// Produces field views of records.
#[derive(Debug, Clone, Default)]
pub struct Introspector {
    config: IntrospectConfig,
}

impl Introspector {
    /// Create an introspector with the given configuration.
    pub fn new(config: IntrospectConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &IntrospectConfig {
        &self.config
    }

    /// Exposed fields at or after `offset`, in order, unencoded.
    pub(crate) fn exposed<R: Record + ?Sized>(&self, record: &R, offset: usize) -> Vec<Field> {
        let source = FieldSource::of(record);
        let from_override = source.is_override();
        let debug = self.config.debug;

        let mut exposed = Vec::new();
        let named = source.fields().iter().filter(|field| !field.name.is_empty());
        for (position, field) in named.enumerate() {
            if position < offset {
                if debug {
                    tracing::debug!(
                        field = field.name,
                        position,
                        offset,
                        "Skipping field before offset"
                    );
                }
                continue;
            }
            if !source.exposes(field.name) {
                if debug {
                    tracing::debug!(field = field.name, "Excluding metadata field");
                }
                continue;
            }
            exposed.push(field.clone());
        }

        tracing::trace!(
            record = std::any::type_name::<R>(),
            offset,
            from_override,
            count = exposed.len(),
            "Introspected record fields"
        );
        exposed
    }

    /// Ordered `(name, value)` pairs before encoding.
    pub fn raw_fields<R: Record + ?Sized>(
        &self,
        record: &R,
        offset: usize,
    ) -> Vec<(&'static str, Value)> {
        self.exposed(record, offset)
            .into_iter()
            .map(Field::into_pair)
            .collect()
    }

    /// Names and declared shapes of the exposed fields.
    pub fn columns<R: Record + ?Sized>(&self, record: &R, offset: usize) -> Vec<Column> {
        self.exposed(record, offset).iter().map(Column::from).collect()
    }

    /// Ordered `(name, encoded value)` pairs.
    ///
    /// Fails if any composite value cannot be encoded; the error names the
    /// offending field.
    pub fn fields<R: Record + ?Sized>(
        &self,
        record: &R,
        offset: usize,
    ) -> Result<Vec<(&'static str, Value)>> {
        self.exposed(record, offset)
            .into_iter()
            .map(|field| self.encode_field(field))
            .collect()
    }

    /// `name -> encoded value` mapping. A repeated name keeps its last value.
    pub fn fields_as_map<R: Record + ?Sized>(
        &self,
        record: &R,
        offset: usize,
    ) -> Result<HashMap<&'static str, Value>> {
        let mut map = HashMap::new();
        for field in self.exposed(record, offset) {
            let (name, value) = self.encode_field(field)?;
            map.insert(name, value);
        }
        Ok(map)
    }

    fn encode_field(&self, field: Field) -> Result<(&'static str, Value)> {
        let name = field.name;
        if self.config.debug && encode::is_encoded_composite(&field.value) {
            tracing::debug!(
                field = name,
                kind = field.value.type_name(),
                "Encoding composite field"
            );
        }
        let value = encode::encode(field.value).map_err(|e| e.in_field(name))?;
        Ok((name, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::OperationState;
    use crate::error::{Error, ErrorKind};
    use crate::field::FieldShape;
    use std::collections::BTreeMap;

    struct Profile {
        state: OperationState,
        fields: Vec<Field>,
        curated: Option<Vec<Field>>,
    }

    impl Profile {
        fn new(fields: Vec<Field>) -> Self {
            Self {
                state: OperationState::default(),
                fields,
                curated: None,
            }
        }
    }

    impl Record for Profile {
        fn declared_fields(&self) -> Vec<Field> {
            self.fields.clone()
        }

        fn exposed_override(&self) -> Option<Vec<Field>> {
            self.curated.clone()
        }

        fn state(&self) -> &OperationState {
            &self.state
        }

        fn state_mut(&mut self) -> &mut OperationState {
            &mut self.state
        }
    }

    fn sample() -> Profile {
        Profile::new(vec![
            Field::new("_rev", 3_i64),
            Field::new("id", 10_i64),
            Field::new("internal_flags", 0_i64),
            Field::new("name", "Ada"),
            Field::new("tags", vec!["x", "y"]),
        ])
    }

    fn names(pairs: &[(&'static str, Value)]) -> Vec<&'static str> {
        pairs.iter().map(|(n, _)| *n).collect()
    }

    #[test]
    fn test_fields_exclude_metadata_in_order() {
        let fields = Introspector::default().fields(&sample(), 0).unwrap();
        assert_eq!(names(&fields), vec!["id", "name", "tags"]);
        assert_eq!(fields[2].1, Value::Text("x,y".to_string()));
    }

    #[test]
    fn test_offset_counts_hidden_positions() {
        let introspector = Introspector::default();
        let record = sample();
        let at = |offset| names(&introspector.fields(&record, offset).unwrap());
        assert_eq!(at(1), vec!["id", "name", "tags"]);
        assert_eq!(at(2), vec!["name", "tags"]);
        assert_eq!(at(4), vec!["tags"]);
        assert!(introspector.fields(&record, 5).unwrap().is_empty());
        assert!(introspector.fields(&record, 100).unwrap().is_empty());
    }

    #[test]
    fn test_unnamed_fields_are_dropped_without_consuming_a_position() {
        let record = Profile::new(vec![
            Field::new("", 1_i64),
            Field::new("id", 2_i64),
            Field::new("name", "n"),
        ]);
        let fields = Introspector::default().fields(&record, 1).unwrap();
        assert_eq!(names(&fields), vec!["name"]);
    }

    #[test]
    fn test_raw_fields_are_not_encoded() {
        let raw = Introspector::default().raw_fields(&sample(), 0);
        assert_eq!(raw[2].1, Value::from(vec!["x", "y"]));
    }

    #[test]
    fn test_columns_report_shapes() {
        let cols = Introspector::default().columns(&sample(), 0);
        let shapes: Vec<_> = cols.iter().map(|c| (c.name, c.shape)).collect();
        assert_eq!(
            shapes,
            vec![
                ("id", FieldShape::Integer),
                ("name", FieldShape::Text),
                ("tags", FieldShape::TextList),
            ]
        );
    }

    #[test]
    fn test_fields_as_map_last_write_wins() {
        let record = Profile::new(vec![
            Field::new("id", 1_i64),
            Field::new("name", "first"),
            Field::new("name", "second"),
        ]);
        let map = Introspector::default().fields_as_map(&record, 0).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["name"], Value::from("second"));

        let ordered = Introspector::default().fields(&record, 0).unwrap();
        assert_eq!(names(&ordered), vec!["id", "name", "name"]);
    }

    #[test]
    fn test_override_replaces_declared_order_and_prefix_rule() {
        let mut record = sample();
        record.curated = Some(vec![
            Field::new("name", "Ada"),
            Field::new("_rev", 3_i64),
            Field::new("id", 10_i64),
        ]);
        let fields = Introspector::default().fields(&record, 0).unwrap();
        assert_eq!(names(&fields), vec!["name", "_rev", "id"]);
        let tail = Introspector::default().fields(&record, 2).unwrap();
        assert_eq!(names(&tail), vec!["id"]);
    }

    #[test]
    fn test_empty_record_yields_nothing() {
        let record = Profile::new(Vec::new());
        assert!(Introspector::default().fields(&record, 0).unwrap().is_empty());
        let map = Introspector::default().fields_as_map(&record, 0).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn test_encoding_error_names_field() {
        let mut prefs = BTreeMap::new();
        prefs.insert("ratio".to_string(), Value::Double(f64::INFINITY));
        let record = Profile::new(vec![Field::new("id", 1_i64), Field::new("prefs", prefs)]);

        let err = Introspector::default().fields(&record, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Encoding);
        match err {
            Error::Encoding(e) => assert_eq!(e.field, Some("prefs")),
            other => panic!("unexpected error: {other}"),
        }
        assert!(Introspector::default().fields_as_map(&record, 0).is_err());
    }

    #[test]
    fn test_debug_config_does_not_change_output() {
        let quiet = Introspector::default().fields(&sample(), 0).unwrap();
        let loud = Introspector::new(IntrospectConfig::new().debug(true))
            .fields(&sample(), 0)
            .unwrap();
        assert_eq!(quiet, loud);
    }

    mod capture {
        use std::sync::{Arc, Mutex};

        use tracing::field::{Field, Visit};
        use tracing::{Event, Subscriber};
        use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

        /// Collects the message of every event it sees.
        #[derive(Clone, Default)]
        pub(super) struct Messages(Arc<Mutex<Vec<String>>>);

        struct MessageVisitor(Option<String>);

        impl Visit for MessageVisitor {
            fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
                if field.name() == "message" {
                    self.0 = Some(format!("{value:?}"));
                }
            }
        }

        impl<S: Subscriber> Layer<S> for Messages {
            fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
                let mut visitor = MessageVisitor(None);
                event.record(&mut visitor);
                if let Some(message) = visitor.0 {
                    self.0.lock().unwrap().push(message);
                }
            }
        }

        /// Run `f` with a capturing subscriber and return the messages seen.
        pub(super) fn messages(f: impl FnOnce()) -> Vec<String> {
            let messages = Messages::default();
            let subscriber = tracing_subscriber::registry().with(messages.clone());
            tracing::subscriber::with_default(subscriber, f);
            messages.0.lock().unwrap().clone()
        }
    }

    fn with_composite() -> Profile {
        let mut prefs = BTreeMap::new();
        prefs.insert("theme".to_string(), Value::from("dark"));
        let mut record = sample();
        record.fields.push(Field::new("prefs", prefs));
        record
    }

    #[test]
    fn test_debug_config_emits_diagnostic_events() {
        let record = with_composite();
        let loud = Introspector::new(IntrospectConfig::new().debug(true));
        let seen = capture::messages(|| {
            loud.fields(&record, 1).unwrap();
        });
        let has = |message: &str| seen.iter().any(|m| m == message);
        assert!(has("Skipping field before offset"), "{seen:?}");
        assert!(has("Excluding metadata field"), "{seen:?}");
        assert!(has("Encoding composite field"), "{seen:?}");
        assert!(has("Introspected record fields"), "{seen:?}");
    }

    #[test]
    fn test_quiet_config_emits_only_the_summary() {
        let record = with_composite();
        let quiet = Introspector::default();
        let seen = capture::messages(|| {
            quiet.fields(&record, 1).unwrap();
        });
        assert_eq!(seen, vec!["Introspected record fields".to_string()]);
    }
}
