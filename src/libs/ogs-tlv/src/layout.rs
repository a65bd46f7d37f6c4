//! Declarative field layouts
//!
//! A layout is an ordered list of field descriptors. Derived fields
//! (lengths, counts, values supplied by the enclosing message) and
//! conditional presence are declared as explicit rules naming other
//! fields of the same layout. Names are resolved and the rule graph is
//! checked for cycles once, the first time the layout is used.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::error::LayoutError;

/// Wire representation of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Unsigned big-endian integer of the given bit width
    Uint(u8),
    /// Fixed-length byte string
    Bytes(usize),
    /// Byte string running to the end of the enclosing window
    Rest,
    /// Repeated integers of the given bit width; the element count
    /// comes from a `CountOf` field declared earlier
    List(u8),
}

/// How a derived field obtains its value on encode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueRule {
    /// Byte length of the fields from `from` to the end of the layout,
    /// plus whatever the parent serializes after the record
    LengthOf { from: Option<&'static str> },
    /// Number of elements in the named list field
    CountOf(&'static str),
    /// Value provided by the parent context under this key
    Parent(&'static str),
}

/// Conditional presence of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Present when the flag is non-zero
    IfSet(&'static str),
    /// Present when the flag is zero
    IfClear(&'static str),
    /// Present when any of the flags is non-zero
    IfAny(&'static [&'static str]),
    /// Present when any bit of `mask` is set in the flag
    IfBits { flag: &'static str, mask: u64 },
    /// Present when `flag & mask == value`
    IfMasked {
        flag: &'static str,
        mask: u64,
        value: u64,
    },
}

impl Presence {
    fn flags(&self) -> Vec<&'static str> {
        match *self {
            Presence::IfSet(f) | Presence::IfClear(f) => vec![f],
            Presence::IfAny(fs) => fs.to_vec(),
            Presence::IfBits { flag, .. } | Presence::IfMasked { flag, .. } => vec![flag],
        }
    }
}

/// A single field descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: Kind,
    pub value: Option<ValueRule>,
    pub presence: Option<Presence>,
    /// Inclusive range accepted on decode and assignment
    pub range: Option<(u64, u64)>,
    /// Initial value of integer fields in a fresh record
    pub default: u64,
}

impl FieldDef {
    const fn of(name: &'static str, kind: Kind) -> Self {
        Self {
            name,
            kind,
            value: None,
            presence: None,
            range: None,
            default: 0,
        }
    }

    pub const fn uint(name: &'static str, bits: u8) -> Self {
        Self::of(name, Kind::Uint(bits))
    }

    pub const fn bytes(name: &'static str, len: usize) -> Self {
        Self::of(name, Kind::Bytes(len))
    }

    pub const fn rest(name: &'static str) -> Self {
        Self::of(name, Kind::Rest)
    }

    pub const fn list(name: &'static str, bits: u8) -> Self {
        Self::of(name, Kind::List(bits))
    }

    pub const fn with_default(self, default: u64) -> Self {
        Self { default, ..self }
    }

    pub const fn derived(self, rule: ValueRule) -> Self {
        Self {
            value: Some(rule),
            ..self
        }
    }

    pub const fn present(self, presence: Presence) -> Self {
        Self {
            presence: Some(presence),
            ..self
        }
    }

    pub const fn range(self, min: u64, max: u64) -> Self {
        Self {
            range: Some((min, max)),
            ..self
        }
    }

    /// Largest value the field width can carry
    pub fn max_value(&self) -> u64 {
        match self.kind {
            Kind::Uint(64) | Kind::List(64) => u64::MAX,
            Kind::Uint(bits) | Kind::List(bits) => (1u64 << bits) - 1,
            Kind::Bytes(_) | Kind::Rest => 0,
        }
    }

    /// Check an integer against the field width and declared range.
    pub fn accepts(&self, value: u64) -> bool {
        if value > self.max_value() {
            return false;
        }
        match self.range {
            Some((min, max)) => (min..=max).contains(&value),
            None => true,
        }
    }
}

/// Derived value rule with names resolved to field indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Rule {
    LengthOf { from: Option<usize> },
    CountOf(usize),
    Parent(&'static str),
}

/// Presence rule with names resolved to field indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Gate {
    IfSet(usize),
    IfClear(usize),
    IfAny(Vec<usize>),
    IfBits(usize, u64),
    IfMasked(usize, u64, u64),
}

impl Gate {
    pub(crate) fn eval(&self, uint: impl Fn(usize) -> u64) -> bool {
        match self {
            Gate::IfSet(i) => uint(*i) != 0,
            Gate::IfClear(i) => uint(*i) == 0,
            Gate::IfAny(flags) => flags.iter().any(|i| uint(*i) != 0),
            Gate::IfBits(i, mask) => uint(*i) & mask != 0,
            Gate::IfMasked(i, mask, value) => uint(*i) & mask == *value,
        }
    }
}

/// Resolved form of a layout, built once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub(crate) rules: Vec<Option<Rule>>,
    pub(crate) gates: Vec<Option<Gate>>,
    /// For each list field, the index of its count field
    pub(crate) counts: Vec<Option<usize>>,
    /// Derived fields in dependency order
    pub(crate) order: Vec<usize>,
    /// Index of the length field, if any
    pub(crate) length: Option<usize>,
}

impl Plan {
    fn build(layout: &Layout) -> Result<Plan, LayoutError> {
        let name = layout.name;
        let fields = layout.fields;

        let mut index = HashMap::new();
        for (i, f) in fields.iter().enumerate() {
            if index.insert(f.name, i).is_some() {
                return Err(LayoutError::DuplicateField {
                    layout: name,
                    field: f.name,
                });
            }
            if let Kind::Uint(bits) | Kind::List(bits) = f.kind {
                if bits == 0 || bits > 64 {
                    return Err(LayoutError::InvalidWidth {
                        layout: name,
                        field: f.name,
                        bits,
                    });
                }
            }
        }
        let resolve = |field: &'static str, target: &'static str| {
            index
                .get(target)
                .copied()
                .ok_or(LayoutError::UnknownReference {
                    layout: name,
                    field,
                    target,
                })
        };
        let expect_uint = |i: usize, field: &'static str| match fields[i].kind {
            Kind::Uint(_) => Ok(()),
            _ => Err(LayoutError::InvalidRule {
                layout: name,
                field,
            }),
        };

        let mut rules = vec![None; fields.len()];
        let mut gates = vec![None; fields.len()];
        let mut counts = vec![None; fields.len()];
        let mut length = None;

        for (i, f) in fields.iter().enumerate() {
            if let Some(rule) = f.value {
                expect_uint(i, f.name)?;
                rules[i] = Some(match rule {
                    ValueRule::LengthOf { from } => {
                        if length.replace(i).is_some() {
                            return Err(LayoutError::InvalidRule {
                                layout: name,
                                field: f.name,
                            });
                        }
                        Rule::LengthOf {
                            from: from.map(|t| resolve(f.name, t)).transpose()?,
                        }
                    }
                    ValueRule::CountOf(target) => {
                        let t = resolve(f.name, target)?;
                        if !matches!(fields[t].kind, Kind::List(_)) || t < i {
                            return Err(LayoutError::InvalidRule {
                                layout: name,
                                field: f.name,
                            });
                        }
                        counts[t] = Some(i);
                        Rule::CountOf(t)
                    }
                    ValueRule::Parent(key) => Rule::Parent(key),
                });
            }

            if let Some(presence) = f.presence {
                let mut flags = Vec::new();
                for flag in presence.flags() {
                    let j = resolve(f.name, flag)?;
                    if j >= i {
                        return Err(LayoutError::ForwardPresence {
                            layout: name,
                            field: f.name,
                            flag,
                        });
                    }
                    expect_uint(j, f.name)?;
                    flags.push(j);
                }
                gates[i] = Some(match presence {
                    Presence::IfSet(_) => Gate::IfSet(flags[0]),
                    Presence::IfClear(_) => Gate::IfClear(flags[0]),
                    Presence::IfAny(_) => Gate::IfAny(flags),
                    Presence::IfBits { mask, .. } => Gate::IfBits(flags[0], mask),
                    Presence::IfMasked { mask, value, .. } => {
                        Gate::IfMasked(flags[0], mask, value)
                    }
                });
            }
        }

        for (i, f) in fields.iter().enumerate() {
            if matches!(f.kind, Kind::List(_)) && counts[i].is_none() {
                return Err(LayoutError::MissingCount {
                    layout: name,
                    field: f.name,
                });
            }
        }

        // deps[i]: fields whose value must be known before the value
        // (derived fields) or the size (everything else) of field i is.
        // A list's size comes from its elements, never from its count.
        let mut deps: Vec<Vec<usize>> = vec![Vec::new(); fields.len()];
        for i in 0..fields.len() {
            if let Some(gate) = &gates[i] {
                deps[i].extend(match gate {
                    Gate::IfSet(j) | Gate::IfClear(j) => vec![*j],
                    Gate::IfAny(js) => js.clone(),
                    Gate::IfBits(j, _) | Gate::IfMasked(j, _, _) => vec![*j],
                });
            }
            match rules[i] {
                Some(Rule::LengthOf { from: Some(from) }) => deps[i].extend(from..fields.len()),
                Some(Rule::CountOf(t)) => deps[i].push(t),
                _ => {}
            }
        }
        let order = topo_order(&deps).map_err(|i| LayoutError::Cycle {
            layout: name,
            field: fields[i].name,
        })?;
        let order = order.into_iter().filter(|i| rules[*i].is_some()).collect();

        Ok(Plan {
            rules,
            gates,
            counts,
            order,
            length,
        })
    }
}

/// Kahn's algorithm; on a cycle returns a field that is part of it.
fn topo_order(deps: &[Vec<usize>]) -> Result<Vec<usize>, usize> {
    let n = deps.len();
    let mut pending: Vec<usize> = deps.iter().map(Vec::len).collect();
    let mut users: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (i, ds) in deps.iter().enumerate() {
        for d in ds {
            users[*d].push(i);
        }
    }
    let mut ready: Vec<usize> = (0..n).filter(|i| pending[*i] == 0).collect();
    let mut order = Vec::with_capacity(n);
    while let Some(i) = ready.pop() {
        order.push(i);
        for u in &users[i] {
            pending[*u] -= 1;
            if pending[*u] == 0 {
                ready.push(*u);
            }
        }
    }
    if order.len() < n {
        let stuck = (0..n).find(|i| pending[*i] > 0).unwrap_or(0);
        return Err(stuck);
    }
    Ok(order)
}

/// A named, statically declared field layout
#[derive(Debug)]
pub struct Layout {
    pub name: &'static str,
    pub fields: &'static [FieldDef],
    plan: OnceLock<Result<Plan, LayoutError>>,
}

impl Layout {
    pub const fn new(name: &'static str, fields: &'static [FieldDef]) -> Self {
        Self {
            name,
            fields,
            plan: OnceLock::new(),
        }
    }

    /// Resolved plan; the first call validates the declaration.
    pub fn plan(&self) -> Result<&Plan, LayoutError> {
        self.plan
            .get_or_init(|| Plan::build(self))
            .as_ref()
            .map_err(Clone::clone)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}
