//! Field aggregation.
//!
//! Computes derived fields on an item from one or more source fields. Each
//! [`AggregationRule`] names a target field, a mode and an ordered list of
//! sources; the aggregator gathers the values of every eligible source on the
//! item and combines them according to the mode.
//!
//! # Algorithm
//!
//! 1. Skip the rule if its target is not a field of the index
//! 2. Keep the sources that apply to the item's datasource and exist on the item
//! 3. Combine their values in source order, then value order
//! 4. Coerce the result into the target type; values that cannot be coerced are
//!    skipped with a warning
//! 5. Set the target field only if at least one value remains

use std::{fmt, str::FromStr};

use tracing::{debug, warn};

use crate::{
    AggregationRule, Field, FieldType, FieldValue, Index, IndexError, Item, Numeric,
};

/// Separator placed between values by [`AggregationMode::Concatenation`].
pub const CONCAT_SEPARATOR: &str = "\n\n";

/// How the values of the source fields are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregationMode {
    /// Every value, in order.
    Union,
    /// All values as text joined into one value.
    Concatenation,
    /// Numeric sum of all values.
    Sum,
    /// Number of values.
    Count,
    /// Largest numeric value.
    Maximum,
    /// Smallest numeric value.
    Minimum,
    /// The first value encountered.
    First,
    /// The last value encountered.
    Last,
}

impl AggregationMode {
    /// Every aggregation mode.
    pub const ALL: [Self; 8] = [
        Self::Union,
        Self::Concatenation,
        Self::Sum,
        Self::Count,
        Self::Maximum,
        Self::Minimum,
        Self::First,
        Self::Last,
    ];

    /// Returns the canonical configuration name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Union => "union",
            Self::Concatenation => "concat",
            Self::Sum => "sum",
            Self::Count => "count",
            Self::Maximum => "max",
            Self::Minimum => "min",
            Self::First => "first",
            Self::Last => "last",
        }
    }
}

impl fmt::Display for AggregationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AggregationMode {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "union" => Ok(Self::Union),
            "concat" | "concatenation" => Ok(Self::Concatenation),
            "sum" => Ok(Self::Sum),
            "count" => Ok(Self::Count),
            "max" | "maximum" => Ok(Self::Maximum),
            "min" | "minimum" => Ok(Self::Minimum),
            "first" => Ok(Self::First),
            "last" => Ok(Self::Last),
            _ => Err(IndexError::InvalidAggregationMode(s.to_string())),
        }
    }
}

/// A value skipped during aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationWarning {
    /// The item being processed.
    pub item_id: String,
    /// The derived field.
    pub field_id: String,
    /// The source the value came from, `None` for computed values.
    pub source: Option<String>,
    /// Text rendering of the skipped value.
    pub value: String,
    /// Why the value was skipped.
    pub reason: String,
}

impl fmt::Display for AggregationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item {}: field {}", self.item_id, self.field_id)?;
        if let Some(source) = &self.source {
            write!(f, " (from {source})")?;
        }
        write!(f, ": skipped {:?}: {}", self.value, self.reason)
    }
}

/// What happened to the derived field of one rule on one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationStatus {
    /// The derived field was set with this many values.
    Set(usize),
    /// No source contributed a usable value; the item is unchanged.
    NoValues,
    /// The derived field is not part of the index; the item is unchanged.
    NotIndexed,
}

/// Result of applying one rule to one item.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationOutcome {
    /// What happened to the derived field.
    pub status: AggregationStatus,
    /// Values skipped along the way.
    pub warnings: Vec<AggregationWarning>,
}

impl AggregationOutcome {
    /// An outcome without warnings.
    fn status(status: AggregationStatus) -> Self {
        Self {
            status,
            warnings: Vec::new(),
        }
    }
}

/// Summary of a batch run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregationReport {
    /// Number of items processed.
    pub items: usize,
    /// Number of derived fields set.
    pub fields_set: usize,
    /// Number of rule applications that left the item unchanged.
    pub skipped: usize,
    /// Every value skipped, in processing order.
    pub warnings: Vec<AggregationWarning>,
}

/// The values of one source field that applies to the item.
struct Contribution<'a> {
    /// Combined id of the source.
    source: String,
    /// Type of the source field on the item.
    field_type: FieldType,
    /// The field's values.
    values: &'a [FieldValue],
}

/// A combined value together with the source it came from.
struct Combined {
    /// Source id, `None` for computed values.
    source: Option<String>,
    /// The value.
    value: FieldValue,
}

impl Combined {
    /// A value computed from several sources.
    fn computed(value: FieldValue) -> Self {
        Self {
            source: None,
            value,
        }
    }
}

/// Applies the aggregation rules of an index to items.
#[derive(Debug, Clone, Copy)]
pub struct Aggregator<'a> {
    /// The index whose rules are applied.
    index: &'a Index,
}

impl<'a> Aggregator<'a> {
    /// Creates an aggregator, validating the index's rules first.
    pub fn new(index: &'a Index) -> Result<Self, IndexError> {
        index.validate()?;
        Ok(Self { index })
    }

    /// Applies one rule to an item.
    pub fn aggregate(&self, item: &mut Item, rule: &AggregationRule) -> AggregationOutcome {
        let Some(def) = self.index.field(&rule.field_id) else {
            debug!(item = %item.id, field = %rule.field_id, "aggregated field not indexed, skipping");
            return AggregationOutcome::status(AggregationStatus::NotIndexed);
        };

        let contributions: Vec<Contribution<'_>> = rule
            .sources
            .iter()
            .filter(|source| source.applies_to(item.datasource()))
            .filter_map(|source| {
                let field = item.field(&source.field)?;
                (!field.is_empty()).then(|| Contribution {
                    source: source.to_string(),
                    field_type: field.field_type(),
                    values: field.values(),
                })
            })
            .collect();

        if contributions.is_empty() {
            return AggregationOutcome::status(AggregationStatus::NoValues);
        }

        let mut warnings = Vec::new();
        let mut skip = |source: Option<String>, value: String, reason: String| {
            let warning = AggregationWarning {
                item_id: item.id.clone(),
                field_id: rule.field_id.clone(),
                source,
                value,
                reason,
            };
            warn!(
                item = %warning.item_id,
                field = %warning.field_id,
                source = ?warning.source,
                value = %warning.value,
                reason = %warning.reason,
                "skipping value during aggregation"
            );
            warnings.push(warning);
        };

        let (combined, default_type) = combine(rule.mode, &contributions, &mut skip);
        drop(contributions);
        let target = def
            .field_type
            .unwrap_or(default_type)
            .resolve(&self.index.supported_types);

        let mut values = Vec::with_capacity(combined.len());
        for Combined { source, value } in combined {
            match value.coerce(target) {
                Ok(value) => values.push(value),
                Err(err) => skip(source, err.value, format!("not convertible to {target}")),
            }
        }

        if values.is_empty() {
            return AggregationOutcome {
                status: AggregationStatus::NoValues,
                warnings,
            };
        }

        let count = values.len();
        item.set_field(Field::from_conforming(&rule.field_id, target, values));
        AggregationOutcome {
            status: AggregationStatus::Set(count),
            warnings,
        }
    }

    /// Applies every rule of the index to an item, in rule order.
    pub fn aggregate_item(&self, item: &mut Item) -> Vec<AggregationOutcome> {
        self.index
            .rules
            .iter()
            .map(|rule| self.aggregate(item, rule))
            .collect()
    }

    /// Applies every rule to a batch of items.
    pub fn aggregate_items(&self, items: &mut [Item]) -> AggregationReport {
        let mut report = AggregationReport::default();
        for item in items {
            report.items += 1;
            for outcome in self.aggregate_item(item) {
                match outcome.status {
                    AggregationStatus::Set(_) => report.fields_set += 1,
                    AggregationStatus::NoValues | AggregationStatus::NotIndexed => {
                        report.skipped += 1;
                    }
                }
                report.warnings.extend(outcome.warnings);
            }
        }
        report
    }
}

/// Combines contributions per mode, returning the values and the mode's default type.
///
/// `contributions` is never empty.
fn combine(
    mode: AggregationMode,
    contributions: &[Contribution<'_>],
    skip: &mut impl FnMut(Option<String>, String, String),
) -> (Vec<Combined>, FieldType) {
    let first_type = contributions
        .first()
        .map_or(FieldType::String, |c| c.field_type);

    match mode {
        AggregationMode::Union => {
            let values = contributions
                .iter()
                .flat_map(|c| {
                    c.values.iter().map(|value| Combined {
                        source: Some(c.source.clone()),
                        value: value.clone(),
                    })
                })
                .collect();
            let uniform = contributions.iter().all(|c| c.field_type == first_type);
            let ty = if uniform { first_type } else { FieldType::String };
            (values, ty)
        }
        AggregationMode::Concatenation => {
            let text = contributions
                .iter()
                .flat_map(|c| c.values.iter().map(FieldValue::to_text))
                .collect::<Vec<_>>()
                .join(CONCAT_SEPARATOR);
            (vec![Combined::computed(FieldValue::Text(text))], FieldType::Text)
        }
        AggregationMode::Count => {
            let count: usize = contributions.iter().map(|c| c.values.len()).sum();
            let count = i64::try_from(count).unwrap_or(i64::MAX);
            (
                vec![Combined::computed(FieldValue::Integer(count))],
                FieldType::Integer,
            )
        }
        AggregationMode::Sum => {
            let numbers = numbers(contributions, skip);
            let sum = sum(&numbers);
            (vec![Combined::computed(sum.into_value())], sum.field_type())
        }
        AggregationMode::Maximum | AggregationMode::Minimum => {
            let numbers = numbers(contributions, skip);
            let pick = numbers.into_iter().reduce(|best, n| {
                let better = if mode == AggregationMode::Maximum {
                    n.as_f64() > best.as_f64()
                } else {
                    n.as_f64() < best.as_f64()
                };
                if better { n } else { best }
            });
            let ty = match pick {
                Some(Numeric::Integer(_)) if first_type.is_numeric() => first_type,
                _ => FieldType::Decimal,
            };
            let values = pick
                .map(|n| vec![Combined::computed(n.into_value())])
                .unwrap_or_default();
            (values, ty)
        }
        AggregationMode::First => {
            let first = contributions.first().and_then(|c| {
                c.values.first().map(|value| {
                    (
                        Combined {
                            source: Some(c.source.clone()),
                            value: value.clone(),
                        },
                        c.field_type,
                    )
                })
            });
            single(first)
        }
        AggregationMode::Last => {
            let last = contributions.last().and_then(|c| {
                c.values.last().map(|value| {
                    (
                        Combined {
                            source: Some(c.source.clone()),
                            value: value.clone(),
                        },
                        c.field_type,
                    )
                })
            });
            single(last)
        }
    }
}

/// Wraps an optional single pick, typed after the field it came from.
fn single(pick: Option<(Combined, FieldType)>) -> (Vec<Combined>, FieldType) {
    match pick {
        Some((combined, ty)) => (vec![combined], ty),
        None => (Vec::new(), FieldType::String),
    }
}

/// Casts every contributed value to a number, reporting the ones that cannot be cast.
fn numbers(
    contributions: &[Contribution<'_>],
    skip: &mut impl FnMut(Option<String>, String, String),
) -> Vec<Numeric> {
    let mut numbers = Vec::new();
    for c in contributions {
        for value in c.values {
            match value.as_number() {
                Some(n) => numbers.push(n),
                None => skip(
                    Some(c.source.clone()),
                    value.to_text(),
                    String::from("not a number"),
                ),
            }
        }
    }
    numbers
}

/// Sums numbers, staying integral while every term is an integer and nothing overflows.
///
/// An empty list sums to integer zero.
fn sum(numbers: &[Numeric]) -> Numeric {
    let integral = numbers.iter().try_fold(0_i64, |acc, n| match n {
        Numeric::Integer(i) => acc.checked_add(*i),
        Numeric::Decimal(_) => None,
    });
    match integral {
        Some(total) => Numeric::Integer(total),
        None => Numeric::Decimal(numbers.iter().map(|n| n.as_f64()).sum()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FieldDef, SourceRef, tokenize};

    fn def(id: &str, ty: Option<FieldType>, datasource: Option<&str>) -> FieldDef {
        FieldDef {
            id: id.into(),
            label: None,
            datasource: datasource.map(str::to_string),
            field_type: ty,
        }
    }

    fn rule(field_id: &str, mode: AggregationMode, sources: &[&str]) -> AggregationRule {
        AggregationRule {
            field_id: field_id.into(),
            label: None,
            mode,
            sources: sources.iter().map(|s| s.parse().unwrap()).collect(),
        }
    }

    fn index(fields: Vec<FieldDef>, rules: Vec<AggregationRule>) -> Index {
        Index {
            id: "test".into(),
            fields,
            rules,
            supported_types: FieldType::ALL.to_vec(),
        }
    }

    fn field(name: &str, ty: FieldType, values: Vec<FieldValue>) -> Field {
        let (field, rejected) = Field::with_values(name, ty, values);
        assert!(rejected.is_empty());
        field
    }

    fn strings(values: &[&str]) -> Vec<FieldValue> {
        values.iter().map(|v| FieldValue::String((*v).into())).collect()
    }

    fn ints(values: &[i64]) -> Vec<FieldValue> {
        values.iter().map(|v| FieldValue::Integer(*v)).collect()
    }

    #[test]
    fn mode_names() {
        assert_eq!("concatenation".parse::<AggregationMode>().unwrap(), AggregationMode::Concatenation);
        assert_eq!("MAX".parse::<AggregationMode>().unwrap(), AggregationMode::Maximum);
        for mode in AggregationMode::ALL {
            assert_eq!(mode.to_string().parse::<AggregationMode>().unwrap(), mode);
        }
        assert!("median".parse::<AggregationMode>().is_err());
    }

    #[test]
    fn union_keeps_order_without_dedup() {
        let rule = rule("all", AggregationMode::Union, &["a", "b"]);
        let index = index(
            vec![
                def("a", Some(FieldType::String), None),
                def("b", Some(FieldType::String), None),
                def("all", None, None),
            ],
            vec![rule.clone()],
        );
        let aggregator = Aggregator::new(&index).unwrap();
        let mut item = Item::new("1", None)
            .with_field(field("a", FieldType::String, strings(&["x", "y"])))
            .with_field(field("b", FieldType::String, strings(&["z", "x"])));

        let outcome = aggregator.aggregate(&mut item, &rule);
        assert_eq!(outcome.status, AggregationStatus::Set(4));
        assert_eq!(item.values("all"), strings(&["x", "y", "z", "x"]).as_slice());
        assert_eq!(item.field("all").unwrap().field_type(), FieldType::String);
    }

    #[test]
    fn union_of_mixed_types_falls_back_to_string() {
        let rule = rule("all", AggregationMode::Union, &["a", "n"]);
        let index = index(
            vec![
                def("a", Some(FieldType::Text), None),
                def("n", Some(FieldType::Integer), None),
                def("all", None, None),
            ],
            vec![rule.clone()],
        );
        let aggregator = Aggregator::new(&index).unwrap();
        let mut item = Item::new("1", None)
            .with_field(field("a", FieldType::Text, vec![FieldValue::Text("x".into())]))
            .with_field(field("n", FieldType::Integer, ints(&[5])));

        aggregator.aggregate(&mut item, &rule);
        assert_eq!(item.values("all"), strings(&["x", "5"]).as_slice());
    }

    #[test]
    fn concatenation_joins_with_blank_line() {
        let rule = rule("text", AggregationMode::Concatenation, &["a", "b"]);
        let index = index(
            vec![
                def("a", Some(FieldType::String), None),
                def("b", Some(FieldType::String), None),
                def("text", None, None),
            ],
            vec![rule.clone()],
        );
        let aggregator = Aggregator::new(&index).unwrap();
        let mut item = Item::new("1", None)
            .with_field(field("a", FieldType::String, strings(&["foo", "bar"])))
            .with_field(field("b", FieldType::String, strings(&["baz"])));

        aggregator.aggregate(&mut item, &rule);
        assert_eq!(
            item.values("text"),
            &[FieldValue::Text("foo\n\nbar\n\nbaz".into())]
        );
    }

    /// Sources for the numeric rules; `baz` belongs to another datasource.
    const NUMERIC_SOURCES: [&str; 3] = ["entity:node/foo", "entity:node/bar", "entity:user/baz"];

    fn numeric_setup() -> (Index, Item) {
        let rules = vec![
            rule("sum", AggregationMode::Sum, &NUMERIC_SOURCES),
            rule("max", AggregationMode::Maximum, &NUMERIC_SOURCES),
            rule("min", AggregationMode::Minimum, &NUMERIC_SOURCES),
            rule("count", AggregationMode::Count, &NUMERIC_SOURCES),
        ];
        let index = index(
            vec![
                def("foo", Some(FieldType::Integer), Some("entity:node")),
                def("bar", Some(FieldType::Integer), Some("entity:node")),
                def("baz", Some(FieldType::Integer), Some("entity:user")),
                def("sum", None, None),
                def("max", None, None),
                def("min", None, None),
                def("count", None, None),
            ],
            rules,
        );
        let item = Item::new("node/1", Some("entity:node"))
            .with_field(field("foo", FieldType::Integer, ints(&[2, 4])))
            .with_field(field("bar", FieldType::Integer, ints(&[16])))
            .with_field(field("baz", FieldType::Integer, ints(&[7])));
        (index, item)
    }

    #[test]
    fn numeric_modes() {
        let (index, mut item) = numeric_setup();
        let aggregator = Aggregator::new(&index).unwrap();
        let outcomes = aggregator.aggregate_item(&mut item);

        assert!(outcomes.iter().all(|o| o.status == AggregationStatus::Set(1)));
        assert_eq!(item.values("sum"), &[FieldValue::Integer(22)]);
        assert_eq!(item.values("max"), &[FieldValue::Integer(16)]);
        assert_eq!(item.values("min"), &[FieldValue::Integer(2)]);
        assert_eq!(item.values("count"), &[FieldValue::Integer(3)]);
    }

    #[test]
    fn unindexed_target_leaves_item_unchanged() {
        let rule = rule("ghost", AggregationMode::Union, &["a"]);
        let index = index(vec![def("a", Some(FieldType::String), None)], vec![rule.clone()]);
        let aggregator = Aggregator::new(&index).unwrap();
        let mut item =
            Item::new("1", None).with_field(field("a", FieldType::String, strings(&["x"])));
        let before = item.clone();

        let outcome = aggregator.aggregate(&mut item, &rule);
        assert_eq!(outcome.status, AggregationStatus::NotIndexed);
        assert_eq!(item, before);
    }

    #[test]
    fn no_values_adds_no_field() {
        let rule = rule("all", AggregationMode::Union, &["a"]);
        let index = index(
            vec![def("a", Some(FieldType::String), None), def("all", None, None)],
            vec![rule.clone()],
        );
        let aggregator = Aggregator::new(&index).unwrap();
        let mut item = Item::new("1", None);

        let outcome = aggregator.aggregate(&mut item, &rule);
        assert_eq!(outcome.status, AggregationStatus::NoValues);
        assert!(item.field("all").is_none());
    }

    #[test]
    fn sum_skips_non_numeric_values() {
        let rule = rule("total", AggregationMode::Sum, &["a"]);
        let index = index(
            vec![def("a", Some(FieldType::String), None), def("total", None, None)],
            vec![rule.clone()],
        );
        let aggregator = Aggregator::new(&index).unwrap();
        let mut item =
            Item::new("7", None).with_field(field("a", FieldType::String, strings(&["3", "abc"])));

        let outcome = aggregator.aggregate(&mut item, &rule);
        assert_eq!(item.values("total"), &[FieldValue::Integer(3)]);
        assert_eq!(outcome.warnings.len(), 1);
        let warning = &outcome.warnings[0];
        assert_eq!(warning.item_id, "7");
        assert_eq!(warning.source.as_deref(), Some("a"));
        assert_eq!(warning.value, "abc");
    }

    #[test]
    fn sum_without_numbers_is_zero() {
        let rule = rule("total", AggregationMode::Sum, &["a"]);
        let index = index(
            vec![def("a", Some(FieldType::String), None), def("total", None, None)],
            vec![rule.clone()],
        );
        let aggregator = Aggregator::new(&index).unwrap();
        let mut item =
            Item::new("1", None).with_field(field("a", FieldType::String, strings(&["x"])));

        aggregator.aggregate(&mut item, &rule);
        assert_eq!(item.values("total"), &[FieldValue::Integer(0)]);
    }

    #[test]
    fn fractional_sum_is_decimal() {
        let rule = rule("total", AggregationMode::Sum, &["a"]);
        let index = index(
            vec![def("a", Some(FieldType::Decimal), None), def("total", None, None)],
            vec![rule.clone()],
        );
        let aggregator = Aggregator::new(&index).unwrap();
        let mut item = Item::new("1", None).with_field(field(
            "a",
            FieldType::Decimal,
            vec![FieldValue::Decimal(1.25), FieldValue::Decimal(2.0)],
        ));

        aggregator.aggregate(&mut item, &rule);
        assert_eq!(item.values("total"), &[FieldValue::Decimal(3.25)]);
    }

    #[test]
    #[allow(clippy::cast_precision_loss)]
    fn overflowing_sum_becomes_decimal() {
        let rule = rule("total", AggregationMode::Sum, &["a", "b"]);
        let index = index(
            vec![
                def("a", Some(FieldType::Integer), None),
                def("b", Some(FieldType::Integer), None),
                def("total", None, None),
            ],
            vec![rule.clone()],
        );
        let aggregator = Aggregator::new(&index).unwrap();
        let mut item = Item::new("1", None)
            .with_field(field("a", FieldType::Integer, ints(&[1])))
            .with_field(field("b", FieldType::Integer, ints(&[i64::MAX])));

        let outcome = aggregator.aggregate(&mut item, &rule);
        assert_eq!(outcome.status, AggregationStatus::Set(1));
        assert!(outcome.warnings.is_empty());
        assert_eq!(item.field("total").unwrap().field_type(), FieldType::Decimal);
        assert_eq!(item.values("total"), &[FieldValue::Decimal(i64::MAX as f64)]);
    }

    #[test]
    fn decimal_maximum_is_not_truncated() {
        let max = rule("max", AggregationMode::Maximum, &["i", "d"]);
        let min = rule("min", AggregationMode::Minimum, &["i", "d"]);
        let index = index(
            vec![
                def("i", Some(FieldType::Integer), None),
                def("d", Some(FieldType::Decimal), None),
                def("max", None, None),
                def("min", None, None),
            ],
            vec![max, min],
        );
        let aggregator = Aggregator::new(&index).unwrap();
        let mut item = Item::new("1", None)
            .with_field(field("i", FieldType::Integer, ints(&[1])))
            .with_field(field("d", FieldType::Decimal, vec![FieldValue::Decimal(2.5)]));

        let outcomes = aggregator.aggregate_item(&mut item);
        assert!(outcomes.iter().all(|o| o.warnings.is_empty()));
        assert_eq!(item.values("max"), &[FieldValue::Decimal(2.5)]);
        assert_eq!(item.values("min"), &[FieldValue::Integer(1)]);
    }

    #[test]
    fn max_without_numbers_sets_nothing() {
        let rule = rule("top", AggregationMode::Maximum, &["a"]);
        let index = index(
            vec![def("a", Some(FieldType::String), None), def("top", None, None)],
            vec![rule.clone()],
        );
        let aggregator = Aggregator::new(&index).unwrap();
        let mut item =
            Item::new("1", None).with_field(field("a", FieldType::String, strings(&["x", "y"])));

        let outcome = aggregator.aggregate(&mut item, &rule);
        assert_eq!(outcome.status, AggregationStatus::NoValues);
        assert_eq!(outcome.warnings.len(), 2);
        assert!(item.field("top").is_none());
    }

    #[test]
    fn first_and_last() {
        let first = rule("first", AggregationMode::First, &["a", "b"]);
        let last = rule("last", AggregationMode::Last, &["a", "b"]);
        let index = index(
            vec![
                def("a", Some(FieldType::String), None),
                def("b", Some(FieldType::Integer), None),
                def("first", None, None),
                def("last", None, None),
            ],
            vec![first, last],
        );
        let aggregator = Aggregator::new(&index).unwrap();
        let mut item = Item::new("1", None)
            .with_field(field("a", FieldType::String, strings(&["x", "y"])))
            .with_field(field("b", FieldType::Integer, ints(&[1, 9])));

        aggregator.aggregate_item(&mut item);
        assert_eq!(item.values("first"), strings(&["x"]).as_slice());
        assert_eq!(item.values("last"), &[FieldValue::Integer(9)]);
    }

    #[test]
    fn declared_type_coerces_and_warns() {
        let rule = rule("nums", AggregationMode::Union, &["a"]);
        let index = index(
            vec![
                def("a", Some(FieldType::String), None),
                def("nums", Some(FieldType::Integer), None),
            ],
            vec![rule.clone()],
        );
        let aggregator = Aggregator::new(&index).unwrap();
        let mut item =
            Item::new("1", None).with_field(field("a", FieldType::String, strings(&["1", "two"])));

        let outcome = aggregator.aggregate(&mut item, &rule);
        assert_eq!(item.values("nums"), &[FieldValue::Integer(1)]);
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].to_string().contains("two"));
    }

    #[test]
    fn tokenized_sources_concatenate_as_text() {
        let rule = rule("all", AggregationMode::Concatenation, &["body"]);
        let index = index(
            vec![
                def("body", Some(FieldType::TokenizedText), None),
                def("all", None, None),
            ],
            vec![rule.clone()],
        );
        let aggregator = Aggregator::new(&index).unwrap();
        let mut item = Item::new("1", None).with_field(field(
            "body",
            FieldType::TokenizedText,
            vec![FieldValue::Tokens(tokenize("foo  bar"))],
        ));

        aggregator.aggregate(&mut item, &rule);
        assert_eq!(item.values("all"), &[FieldValue::Text("foo bar".into())]);
    }

    #[test]
    fn unknown_source_fails_validation() {
        let index = index(
            vec![def("all", None, None)],
            vec![rule("all", AggregationMode::Union, &["missing"])],
        );
        assert_eq!(
            Aggregator::new(&index).unwrap_err(),
            IndexError::UnknownSourceField {
                field: "all".into(),
                reference: SourceRef::general("missing").to_string(),
            }
        );
    }

    #[test]
    fn batch_isolates_items() {
        let rule = rule("total", AggregationMode::Sum, &["a"]);
        let index = index(
            vec![def("a", Some(FieldType::String), None), def("total", None, None)],
            vec![rule],
        );
        let aggregator = Aggregator::new(&index).unwrap();
        let mut items = vec![
            Item::new("1", None).with_field(field("a", FieldType::String, strings(&["bad"]))),
            Item::new("2", None).with_field(field("a", FieldType::String, strings(&["5"]))),
            Item::new("3", None),
        ];

        let report = aggregator.aggregate_items(&mut items);
        assert_eq!(report.items, 3);
        assert_eq!(report.fields_set, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(items[1].values("total"), &[FieldValue::Integer(5)]);
    }
}
