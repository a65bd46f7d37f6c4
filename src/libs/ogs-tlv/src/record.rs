//! Field records
//!
//! A `Record` holds one value per field of its layout. Absent fields
//! keep their default value but are neither encoded nor reported by the
//! accessors. Derived fields are recomputed on every encode from the
//! current values of the fields they depend on, so a record stays
//! consistent after any mutation.

use bytes::Bytes;

use crate::cursor::{BitWriter, Cursor};
use crate::error::FieldError;
use crate::layout::{Kind, Layout, Plan, Rule};

/// Field value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Uint(u64),
    Bytes(Bytes),
    List(Vec<u64>),
}

impl Value {
    fn uint(&self) -> u64 {
        match self {
            Value::Uint(v) => *v,
            _ => 0,
        }
    }

    fn size_bits(&self, kind: Kind) -> usize {
        match (kind, self) {
            (Kind::Uint(bits), _) => bits as usize,
            (Kind::Bytes(len), _) => len * 8,
            (Kind::Rest, Value::Bytes(b)) => b.len() * 8,
            (Kind::List(bits), Value::List(items)) => items.len() * bits as usize,
            _ => 0,
        }
    }
}

/// Context supplied by whatever encloses a record
pub trait Parent {
    /// Bytes the parent serializes after the record and counts in its
    /// length field
    fn tail_len(&self) -> usize {
        0
    }

    /// Value for a `ValueRule::Parent` field
    fn value(&self, _key: &str) -> Option<u64> {
        None
    }
}

/// Parent for free-standing records
pub struct NoParent;

impl Parent for NoParent {}

/// Decoded or constructed field values of one layout
#[derive(Debug, Clone)]
pub struct Record {
    layout: &'static Layout,
    values: Vec<Value>,
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.layout, other.layout) && self.values == other.values
    }
}

impl Eq for Record {}

impl Record {
    /// Fresh record with every field at its default.
    pub fn new(layout: &'static Layout) -> Self {
        let values = layout
            .fields
            .iter()
            .map(|f| match f.kind {
                Kind::Uint(_) => Value::Uint(f.default),
                Kind::Bytes(len) => Value::Bytes(Bytes::from(vec![0u8; len])),
                Kind::Rest => Value::Bytes(Bytes::new()),
                Kind::List(_) => Value::List(Vec::new()),
            })
            .collect();
        Self { layout, values }
    }

    /// Fresh record with the given integer fields assigned.
    pub fn with(layout: &'static Layout, fields: &[(&str, u64)]) -> Result<Self, FieldError> {
        let mut record = Self::new(layout);
        for (name, value) in fields {
            record.set(name, *value)?;
        }
        Ok(record)
    }

    pub fn layout(&self) -> &'static Layout {
        self.layout
    }

    pub fn name(&self) -> &'static str {
        self.layout.name
    }

    fn plan(&self) -> Result<&'static Plan, FieldError> {
        Ok(self.layout.plan()?)
    }

    fn index(&self, name: &str) -> Result<usize, FieldError> {
        self.layout
            .index_of(name)
            .ok_or_else(|| FieldError::UnknownField(format!("{}.{}", self.layout.name, name)))
    }

    fn present_at(&self, plan: &Plan, values: &[Value], i: usize) -> bool {
        match &plan.gates[i] {
            Some(gate) => gate.eval(|j| values[j].uint()),
            None => true,
        }
    }

    /// Whether the named field is present under the current flag values.
    pub fn is_present(&self, name: &str) -> bool {
        match (self.plan(), self.index(name)) {
            (Ok(plan), Ok(i)) => self.present_at(plan, &self.values, i),
            _ => false,
        }
    }

    fn present_value(&self, name: &str) -> Option<&Value> {
        let plan = self.plan().ok()?;
        let i = self.index(name).ok()?;
        self.present_at(plan, &self.values, i)
            .then(|| &self.values[i])
    }

    /// Integer value of a present field
    pub fn get(&self, name: &str) -> Option<u64> {
        match self.present_value(name)? {
            Value::Uint(v) => Some(*v),
            _ => None,
        }
    }

    pub fn get_bytes(&self, name: &str) -> Option<&Bytes> {
        match self.present_value(name)? {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn get_list(&self, name: &str) -> Option<&[u64]> {
        match self.present_value(name)? {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    fn assignable(&self, name: &str) -> Result<usize, FieldError> {
        let i = self.index(name)?;
        let def = &self.layout.fields[i];
        if def.value.is_some() {
            return Err(FieldError::Derived(def.name));
        }
        Ok(i)
    }

    /// Assign an integer field; derived fields refuse assignment.
    pub fn set(&mut self, name: &str, value: u64) -> Result<(), FieldError> {
        let i = self.assignable(name)?;
        let def = &self.layout.fields[i];
        if !matches!(def.kind, Kind::Uint(_)) {
            return Err(FieldError::Kind(def.name));
        }
        if !def.accepts(value) {
            return Err(FieldError::OutOfRange {
                field: def.name,
                value,
            });
        }
        self.values[i] = Value::Uint(value);
        Ok(())
    }

    pub fn set_bytes(&mut self, name: &str, value: impl Into<Bytes>) -> Result<(), FieldError> {
        let i = self.assignable(name)?;
        let def = &self.layout.fields[i];
        let value = value.into();
        match def.kind {
            Kind::Bytes(len) if len != value.len() => {
                return Err(FieldError::BadLength {
                    field: def.name,
                    expected: len,
                    actual: value.len(),
                })
            }
            Kind::Bytes(_) | Kind::Rest => {}
            _ => return Err(FieldError::Kind(def.name)),
        }
        self.values[i] = Value::Bytes(value);
        Ok(())
    }

    pub fn set_list(&mut self, name: &str, items: Vec<u64>) -> Result<(), FieldError> {
        let i = self.assignable(name)?;
        let def = &self.layout.fields[i];
        if !matches!(def.kind, Kind::List(_)) {
            return Err(FieldError::Kind(def.name));
        }
        if let Some(bad) = items.iter().find(|v| !def.accepts(**v)) {
            return Err(FieldError::OutOfRange {
                field: def.name,
                value: *bad,
            });
        }
        self.values[i] = Value::List(items);
        Ok(())
    }

    fn covered_bits(&self, plan: &Plan, values: &[Value], from: usize) -> usize {
        (from..values.len())
            .filter(|i| self.present_at(plan, values, *i))
            .map(|i| values[i].size_bits(self.layout.fields[i].kind))
            .sum()
    }

    /// Values with every derived field recomputed.
    fn resolved(&self, parent: &dyn Parent) -> Result<Vec<Value>, FieldError> {
        let plan = self.plan()?;
        let mut values = self.values.clone();
        for &i in &plan.order {
            let def = &self.layout.fields[i];
            let value = match plan.rules[i] {
                Some(Rule::LengthOf { from }) => {
                    let covered = from
                        .map(|f| self.covered_bits(plan, &values, f) / 8)
                        .unwrap_or(0);
                    (covered + parent.tail_len()) as u64
                }
                Some(Rule::CountOf(t)) => match &values[t] {
                    Value::List(items) => items.len() as u64,
                    _ => 0,
                },
                Some(Rule::Parent(key)) => parent.value(key).unwrap_or(0),
                None => continue,
            };
            if value > def.max_value() {
                return Err(FieldError::OutOfRange {
                    field: def.name,
                    value,
                });
            }
            values[i] = Value::Uint(value);
        }
        Ok(values)
    }

    /// Recompute derived fields in place so accessors reflect them.
    pub fn refresh(&mut self, parent: &dyn Parent) -> Result<(), FieldError> {
        self.values = self.resolved(parent)?;
        Ok(())
    }

    /// Serialize the present fields, recomputing derived values first.
    pub fn encode(&self, parent: &dyn Parent, w: &mut BitWriter) -> Result<(), FieldError> {
        let plan = self.plan()?;
        let values = self.resolved(parent)?;
        for (i, def) in self.layout.fields.iter().enumerate() {
            if !self.present_at(plan, &values, i) {
                continue;
            }
            match (def.kind, &values[i]) {
                (Kind::Uint(bits), Value::Uint(v)) => w.put_bits(*v, bits)?,
                (Kind::Bytes(len), Value::Bytes(b)) => {
                    if b.len() != len {
                        return Err(FieldError::BadLength {
                            field: def.name,
                            expected: len,
                            actual: b.len(),
                        });
                    }
                    w.put_slice(b)?
                }
                (Kind::Rest, Value::Bytes(b)) => w.put_slice(b)?,
                (Kind::List(bits), Value::List(items)) => {
                    for item in items {
                        w.put_bits(*item, bits)?;
                    }
                }
                _ => return Err(FieldError::Kind(def.name)),
            }
        }
        Ok(())
    }

    /// Serialize to a standalone byte string.
    pub fn to_bytes(&self, parent: &dyn Parent) -> Result<Bytes, FieldError> {
        let mut w = BitWriter::new();
        self.encode(parent, &mut w)?;
        Ok(w.finish()?.freeze())
    }

    /// Decode the layout's fields from the cursor. Values are taken as
    /// read, derived fields included; trailing data is left unread.
    pub fn decode(layout: &'static Layout, cur: &mut Cursor) -> Result<Record, FieldError> {
        let plan = layout.plan()?;
        let mut record = Record::new(layout);
        for (i, def) in layout.fields.iter().enumerate() {
            if !record.present_at(plan, &record.values, i) {
                continue;
            }
            let value = match def.kind {
                Kind::Uint(bits) => {
                    let v = cur.read_bits(bits)?;
                    if !def.accepts(v) {
                        return Err(FieldError::OutOfRange {
                            field: def.name,
                            value: v,
                        });
                    }
                    Value::Uint(v)
                }
                Kind::Bytes(len) => Value::Bytes(cur.read_bytes(len)?),
                Kind::Rest => Value::Bytes(cur.read_rest()?),
                Kind::List(bits) => {
                    let count = plan.counts[i]
                        .map(|c| record.values[c].uint())
                        .unwrap_or(0);
                    let mut items = Vec::new();
                    for _ in 0..count {
                        items.push(cur.read_bits(bits)?);
                    }
                    Value::List(items)
                }
            };
            record.values[i] = value;
        }
        Ok(record)
    }

    /// Bytes announced by the length field beyond the fields it covers.
    pub fn tail_len(&self) -> Result<usize, FieldError> {
        let plan = self.plan()?;
        let i = plan
            .length
            .ok_or_else(|| FieldError::UnknownField(format!("{}.<length>", self.layout.name)))?;
        let declared = self.values[i].uint();
        let covered = match plan.rules[i] {
            Some(Rule::LengthOf { from: Some(from) }) => {
                self.covered_bits(plan, &self.values, from) / 8
            }
            _ => 0,
        };
        (declared as usize)
            .checked_sub(covered)
            .ok_or(FieldError::Length {
                field: self.layout.fields[i].name,
                value: declared,
            })
    }

    /// Encoded size in bytes under the current values.
    pub fn size(&self) -> usize {
        match self.plan() {
            Ok(plan) => self.covered_bits(plan, &self.values, 0) / 8,
            Err(_) => 0,
        }
    }
}
