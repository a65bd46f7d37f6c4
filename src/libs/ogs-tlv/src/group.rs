//! IE groups and conformance checking
//!
//! A group is the ordered IE list of a message body or of a grouped IE.
//! Its `GroupSpec` declares which IEs are expected, either as an ordered
//! list of slots walked in lockstep with the input (GTPv0/GTPv1) or as
//! mandatory/optional key sets (GTPv2/PFCP).

use std::collections::BTreeSet;

use bytes::{Bytes, BytesMut};

use crate::cursor::Cursor;
use crate::error::{CodecError, CodecResult, MissingIe};
use crate::ie::{peek_tag, Ie, IeFormat, IeKey};
use crate::registry::{PayloadDef, Registry};

/// Strict decoding reports missing mandatory IEs as an error; lenient
/// decoding records them and carries on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeMode {
    Strict,
    Lenient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Need {
    Mandatory,
    Optional,
}

/// Position in an ordered IE list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub tag: u16,
    pub name: &'static str,
    pub need: Need,
    /// Slot may match several consecutive IEs
    pub repeat: bool,
}

impl Slot {
    pub const fn mandatory(tag: u16, name: &'static str) -> Self {
        Self {
            tag,
            name,
            need: Need::Mandatory,
            repeat: false,
        }
    }

    pub const fn optional(tag: u16, name: &'static str) -> Self {
        Self {
            tag,
            name,
            need: Need::Optional,
            repeat: false,
        }
    }

    pub const fn repeated(self) -> Self {
        Self {
            repeat: true,
            ..self
        }
    }
}

/// Keyed IE declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    pub key: IeKey,
    pub name: &'static str,
}

impl Entry {
    pub const fn new(tag: u16, instance: u8, name: &'static str) -> Self {
        Self {
            key: IeKey::new(tag, instance),
            name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conformance {
    /// IEs appear in slot order; one match per slot unless repeatable
    Ordered(&'static [Slot]),
    /// IEs in any order, keyed by tag and instance
    Keyed {
        mandatory: &'static [Entry],
        optional: &'static [Entry],
    },
}

/// Expected content of a message body or grouped IE
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupSpec {
    pub name: &'static str,
    pub conformance: Conformance,
}

impl GroupSpec {
    pub const fn ordered(name: &'static str, slots: &'static [Slot]) -> Self {
        Self {
            name,
            conformance: Conformance::Ordered(slots),
        }
    }

    pub const fn keyed(
        name: &'static str,
        mandatory: &'static [Entry],
        optional: &'static [Entry],
    ) -> Self {
        Self {
            name,
            conformance: Conformance::Keyed {
                mandatory,
                optional,
            },
        }
    }

    /// Declared IE name for a key, if any
    pub fn ie_name(&self, key: IeKey) -> Option<&'static str> {
        match self.conformance {
            Conformance::Ordered(slots) => slots
                .iter()
                .find(|s| s.tag == key.tag)
                .map(|s| s.name),
            Conformance::Keyed {
                mandatory,
                optional,
            } => mandatory
                .iter()
                .chain(optional)
                .find(|e| e.key == key)
                .map(|e| e.name),
        }
    }

    /// Keys declared more than once
    pub(crate) fn duplicate_key(&self) -> Option<IeKey> {
        let Conformance::Keyed {
            mandatory,
            optional,
        } = self.conformance
        else {
            return None;
        };
        let mut seen = BTreeSet::new();
        mandatory
            .iter()
            .chain(optional)
            .find(|e| !seen.insert(e.key))
            .map(|e| e.key)
    }
}

/// Decode state shared across the nested groups of one message
pub struct DecodeCtx<'a> {
    pub mode: DecodeMode,
    registry: &'a Registry,
    /// Message-scoped payload overrides, consulted before the registry
    scope: &'a [(IeKey, PayloadDef)],
    missing: Vec<MissingIe>,
}

impl<'a> DecodeCtx<'a> {
    pub fn new(
        mode: DecodeMode,
        registry: &'a Registry,
        scope: &'a [(IeKey, PayloadDef)],
    ) -> Self {
        Self {
            mode,
            registry,
            scope,
            missing: Vec::new(),
        }
    }

    /// Payload class for an IE key: message scope first, then the
    /// registry's instance-specific and any-instance entries.
    pub fn resolve(&self, key: IeKey) -> Option<PayloadDef> {
        self.scope
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, def)| *def)
            .or_else(|| self.registry.resolve(key))
    }

    pub(crate) fn mark(&self) -> usize {
        self.missing.len()
    }

    /// Forget missing IEs recorded since `mark`.
    pub(crate) fn rewind(&mut self, mark: usize) {
        self.missing.truncate(mark);
    }

    fn report(&mut self, spec: &GroupSpec, missing: Vec<MissingIe>) -> CodecResult<()> {
        if missing.is_empty() {
            return Ok(());
        }
        match self.mode {
            DecodeMode::Strict => Err(CodecError::MandatoryIeMissing(missing)),
            DecodeMode::Lenient => {
                for m in &missing {
                    log::warn!("{}: missing mandatory IE {} ({})", spec.name, m.name, m.key);
                }
                self.missing.extend(missing);
                Ok(())
            }
        }
    }

    pub fn into_missing(self) -> Vec<MissingIe> {
        self.missing
    }
}

/// Ordered list of IEs
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Group {
    pub ies: Vec<Ie>,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, ie: Ie) -> Self {
        self.ies.push(ie);
        self
    }

    pub fn push(&mut self, ie: Ie) {
        self.ies.push(ie);
    }

    pub fn len(&self) -> usize {
        self.ies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ie> {
        self.ies.iter()
    }

    /// First IE with the given effective tag and instance
    pub fn get(&self, tag: u16, instance: u8) -> Option<&Ie> {
        let key = IeKey::new(tag, instance);
        self.ies.iter().find(|ie| ie.key() == key)
    }

    pub fn get_mut(&mut self, tag: u16, instance: u8) -> Option<&mut Ie> {
        let key = IeKey::new(tag, instance);
        self.ies.iter_mut().find(|ie| ie.key() == key)
    }

    /// All IEs with the given effective tag, any instance
    pub fn get_all(&self, tag: u16) -> impl Iterator<Item = &Ie> {
        self.ies.iter().filter(move |ie| ie.effective_tag() == tag)
    }

    /// Remove and return the first IE with the given tag and instance.
    pub fn remove(&mut self, tag: u16, instance: u8) -> Option<Ie> {
        let key = IeKey::new(tag, instance);
        let pos = self.ies.iter().position(|ie| ie.key() == key)?;
        Some(self.ies.remove(pos))
    }

    pub fn encode<F: IeFormat>(&self, buf: &mut BytesMut) -> CodecResult<()> {
        for ie in &self.ies {
            ie.encode::<F>(buf)?;
        }
        Ok(())
    }

    pub fn to_bytes<F: IeFormat>(&self) -> CodecResult<Bytes> {
        let mut buf = BytesMut::new();
        self.encode::<F>(&mut buf)?;
        Ok(buf.freeze())
    }

    /// Decode IEs until the cursor's window is exhausted, checking them
    /// against `spec`.
    pub fn decode<F: IeFormat>(
        cur: &mut Cursor,
        spec: &'static GroupSpec,
        ctx: &mut DecodeCtx<'_>,
    ) -> CodecResult<Group> {
        let mut group = Group::new();
        let missing = match spec.conformance {
            Conformance::Ordered(slots) => group.decode_ordered::<F>(cur, spec, slots, ctx)?,
            Conformance::Keyed { mandatory, .. } => {
                group.decode_rest::<F>(cur, spec, ctx)?;
                let seen: BTreeSet<IeKey> = group.ies.iter().map(Ie::key).collect();
                mandatory
                    .iter()
                    .filter(|e| !seen.contains(&e.key))
                    .map(|e| MissingIe {
                        container: spec.name,
                        key: e.key,
                        name: e.name,
                    })
                    .collect()
            }
        };
        ctx.report(spec, missing)?;
        Ok(group)
    }

    fn decode_ordered<F: IeFormat>(
        &mut self,
        cur: &mut Cursor,
        spec: &'static GroupSpec,
        slots: &'static [Slot],
        ctx: &mut DecodeCtx<'_>,
    ) -> CodecResult<Vec<MissingIe>> {
        let mut missing = Vec::new();
        let mut matched = false;
        let mut i = 0;
        while i < slots.len() {
            let slot = &slots[i];
            if !cur.is_empty() && peek_tag::<F>(cur)? == slot.tag {
                let (ie, _) = Ie::decode::<F>(cur, Some(slot.tag), ctx)?;
                self.ies.push(ie);
                if slot.repeat {
                    matched = true;
                    continue;
                }
                i += 1;
                continue;
            }
            if slot.need == Need::Mandatory && !matched {
                missing.push(MissingIe {
                    container: spec.name,
                    key: IeKey::new(slot.tag, 0),
                    name: slot.name,
                });
            }
            matched = false;
            i += 1;
        }
        self.decode_rest::<F>(cur, spec, ctx)?;
        Ok(missing)
    }

    fn decode_rest<F: IeFormat>(
        &mut self,
        cur: &mut Cursor,
        spec: &'static GroupSpec,
        ctx: &mut DecodeCtx<'_>,
    ) -> CodecResult<()> {
        while !cur.is_empty() {
            let (ie, _) = Ie::decode::<F>(cur, None, ctx)?;
            if spec.ie_name(ie.key()).is_none() {
                log::trace!("{}: undeclared IE {}", spec.name, ie.key());
            }
            self.ies.push(ie);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{FieldDef, Layout};
    use crate::test_util::Simple;

    static COUNTER: Layout = Layout::new("Counter", &[FieldDef::uint("counter", 16)]);

    static ORDERED: GroupSpec = GroupSpec::ordered(
        "Ordered",
        &[
            Slot::mandatory(1, "Counter"),
            Slot::optional(20, "Address").repeated(),
            Slot::mandatory(30, "Name"),
        ],
    );

    static INNER: GroupSpec = GroupSpec::keyed("Inner", &[Entry::new(20, 0, "Address")], &[]);

    static KEYED: GroupSpec = GroupSpec::keyed(
        "Keyed",
        &[Entry::new(40, 0, "Inner"), Entry::new(30, 0, "Name")],
        &[Entry::new(30, 1, "Alias")],
    );

    fn registry() -> Registry {
        Registry::builder("group test")
            .ie(1, PayloadDef::Fields(&COUNTER))
            .ie(40, PayloadDef::Grouped(&INNER))
            .build()
            .unwrap()
    }

    fn decode(
        spec: &'static GroupSpec,
        mode: DecodeMode,
        data: &[u8],
    ) -> CodecResult<(Group, Vec<MissingIe>)> {
        let reg = registry();
        let mut ctx = DecodeCtx::new(mode, &reg, &[]);
        let group = Group::decode::<Simple>(&mut Cursor::from_slice(data), spec, &mut ctx)?;
        Ok((group, ctx.into_missing()))
    }

    #[test]
    fn test_ordered_walk_with_repeat() {
        let data = [1, 0, 5, 20, 0, 1, 0xA, 20, 0, 1, 0xB, 30, 0, 1, b'x'];
        let (group, missing) = decode(&ORDERED, DecodeMode::Strict, &data).unwrap();
        assert!(missing.is_empty());
        assert_eq!(group.len(), 4);
        assert_eq!(group.get_all(20).count(), 2);
        assert_eq!(group.get(1, 0).unwrap().record().unwrap().get("counter"), Some(5));
    }

    #[test]
    fn test_ordered_missing_mandatory() {
        let data = [20, 0, 1, 0xA, 30, 0, 1, b'x'];
        let err = decode(&ORDERED, DecodeMode::Strict, &data).unwrap_err();
        match err {
            CodecError::MandatoryIeMissing(missing) => {
                assert_eq!(missing.len(), 1);
                assert_eq!(missing[0].name, "Counter");
            }
            other => panic!("unexpected {other:?}"),
        }

        let (group, missing) = decode(&ORDERED, DecodeMode::Lenient, &data).unwrap();
        assert_eq!(group.len(), 2);
        assert_eq!(missing.len(), 1);
    }

    #[test]
    fn test_ordered_out_of_order_ies_kept() {
        // Name before Counter: Counter slot skipped, then Name matched,
        // Counter picked up as a free-standing IE
        let data = [30, 0, 1, b'x', 1, 0, 7];
        let (group, missing) = decode(&ORDERED, DecodeMode::Lenient, &data).unwrap();
        assert_eq!(group.len(), 2);
        assert_eq!(missing[0].key, IeKey::new(1, 0));
        assert!(group.get(1, 0).unwrap().record().is_some());
    }

    #[test]
    fn test_keyed_any_order() {
        let data = [30, 0, 1, b'x', 40, 0, 4, 20, 0, 1, 0xA, 30, 0, 0];
        let (group, missing) = decode(&KEYED, DecodeMode::Strict, &data).unwrap();
        assert!(missing.is_empty());
        assert_eq!(group.len(), 3);
        let inner = group.get(40, 0).unwrap().group().unwrap();
        assert_eq!(inner.get(20, 0).unwrap().raw_value().unwrap().as_ref(), &[0xA]);
    }

    #[test]
    fn test_nested_missing_propagates() {
        // Inner group without its mandatory Address
        let data = [30, 0, 1, b'x', 40, 0, 4, 21, 0, 1, 0xA];
        let err = decode(&KEYED, DecodeMode::Strict, &data).unwrap_err();
        assert!(matches!(err, CodecError::MandatoryIeMissing(ref m) if m[0].container == "Inner"));

        let (group, missing) = decode(&KEYED, DecodeMode::Lenient, &data).unwrap();
        assert!(group.get(40, 0).unwrap().group().is_some());
        assert_eq!(missing.len(), 1);
    }

    #[test]
    fn test_nested_structural_fault_falls_back_to_raw() {
        // Inner window holds a truncated IE
        let data = [30, 0, 1, b'x', 40, 0, 3, 20, 0, 5];
        let (group, missing) = decode(&KEYED, DecodeMode::Strict, &data).unwrap();
        assert!(missing.is_empty());
        assert_eq!(
            group.get(40, 0).unwrap().raw_value().unwrap().as_ref(),
            &[20, 0, 5]
        );
    }

    #[test]
    fn test_truncated_top_level_ie() {
        let data = [30, 0, 4, b'x'];
        assert!(matches!(
            decode(&KEYED, DecodeMode::Strict, &data),
            Err(CodecError::BufferTooShort { .. })
        ));
    }

    #[test]
    fn test_accessors() {
        let mut group = Group::new()
            .with(Ie::raw(30, vec![1]))
            .with(Ie::raw(30, vec![2]).with_instance(1));
        assert_eq!(group.get(30, 1).unwrap().raw_value().unwrap().as_ref(), &[2]);
        assert!(group.remove(30, 0).is_some());
        assert!(group.get(30, 0).is_none());
        assert_eq!(group.len(), 1);
    }

    #[test]
    fn test_duplicate_key_detected() {
        static DUP: GroupSpec = GroupSpec::keyed(
            "Dup",
            &[Entry::new(1, 0, "A")],
            &[Entry::new(1, 0, "B")],
        );
        assert_eq!(DUP.duplicate_key(), Some(IeKey::new(1, 0)));
        assert_eq!(KEYED.duplicate_key(), None);
    }
}
