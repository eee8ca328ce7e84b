//! Per-relation maximum report.

use std::fmt;
use std::io::{self, Write};

use smallvec::SmallVec;

use crate::index::RelationIndex;
use crate::name::Name;

/// Line written when no relation has a positive maximum.
pub const EMPTY_REPORT: &str = "none";

/// One relation type with the destinations that hold its maximum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportGroup {
    /// Relation type.
    pub relation: Name,
    /// Destinations whose live count equals `count`, ascending.
    pub destinations: SmallVec<[Name; 4]>,
    /// The relation's maximum live count.
    pub count: usize,
}

impl ReportGroup {
    /// Write the group with names as raw bytes.
    pub fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(self.relation.as_bytes())?;
        for destination in &self.destinations {
            out.write_all(b" ")?;
            out.write_all(destination.as_bytes())?;
        }
        write!(out, " {};", self.count)
    }
}

impl fmt::Display for ReportGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.relation)?;
        for destination in &self.destinations {
            write!(f, " {destination}")?;
        }
        write!(f, " {};", self.count)
    }
}

/// Snapshot of every relation's maximum, ordered by relation name.
///
/// Displays as the protocol line: `none`, or `rel dst... count;` groups
/// separated by a single space.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    groups: Vec<ReportGroup>,
}

impl Report {
    /// Walk the index in ascending order and collect the leaders of every
    /// relation with a positive maximum.
    #[must_use]
    pub fn generate(index: &RelationIndex) -> Self {
        let groups = index
            .relations()
            .filter(|(_, relation)| relation.maximum() > 0)
            .map(|(name, relation)| ReportGroup {
                relation: name.clone(),
                destinations: relation.leaders().cloned().collect(),
                count: relation.maximum(),
            })
            .collect();
        Self { groups }
    }

    /// Groups in ascending relation order.
    #[must_use]
    pub fn groups(&self) -> &[ReportGroup] {
        &self.groups
    }

    /// Write the protocol line, without the trailing newline.
    ///
    /// Names are written byte for byte. `Display` goes through lossy UTF-8
    /// and is only meant for logs.
    pub fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        if self.groups.is_empty() {
            return out.write_all(EMPTY_REPORT.as_bytes());
        }
        for (i, group) in self.groups.iter().enumerate() {
            if i > 0 {
                out.write_all(b" ")?;
            }
            group.write_to(out)?;
        }
        Ok(())
    }

    /// Check if this is the sentinel report.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.groups.is_empty() {
            return f.write_str(EMPTY_REPORT);
        }
        for (i, group) in self.groups.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{group}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::EntityRegistry;

    fn n(name: &str) -> Name {
        Name::from(name)
    }

    #[test]
    fn test_empty_index_reports_none() {
        let report = Report::generate(&RelationIndex::new());
        assert!(report.is_empty());
        assert_eq!(report.to_string(), "none");
    }

    #[test]
    fn test_groups_are_ordered() {
        let mut registry = EntityRegistry::new();
        for name in ["a", "b", "c", "d"] {
            registry.add(&n(name));
        }
        let mut index = RelationIndex::new();
        index.add_edge(&registry, &n("a"), &n("d"), &n("zeta"));
        index.add_edge(&registry, &n("a"), &n("c"), &n("alpha"));
        index.add_edge(&registry, &n("a"), &n("b"), &n("alpha"));
        index.add_edge(&registry, &n("d"), &n("b"), &n("zeta"));
        index.add_edge(&registry, &n("c"), &n("b"), &n("zeta"));

        let report = Report::generate(&index);
        assert_eq!(report.groups().len(), 2);
        assert_eq!(report.to_string(), "alpha b c 1; zeta b 2;");
    }

    #[test]
    fn test_group_display() {
        let group = ReportGroup {
            relation: n("friend_of"),
            destinations: [n("bob"), n("carol")].into_iter().collect(),
            count: 3,
        };
        assert_eq!(group.to_string(), "friend_of bob carol 3;");
    }

    #[test]
    fn test_write_to_keeps_raw_bytes() {
        let mut registry = EntityRegistry::new();
        let latin1 = Name::from(&b"\xe9t\xe9"[..]);
        registry.add(&n("a"));
        registry.add(&latin1);
        let mut index = RelationIndex::new();
        index.add_edge(&registry, &n("a"), &latin1, &n("r"));

        let mut out = Vec::new();
        Report::generate(&index).write_to(&mut out).unwrap();
        assert_eq!(out, b"r \xe9t\xe9 1;");

        let mut out = Vec::new();
        Report::default().write_to(&mut out).unwrap();
        assert_eq!(out, b"none");
    }
}
