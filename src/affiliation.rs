use rustc_hash::FxHashMap;

use crate::{GroupId, SubjectId};

/// Reporting labels of individuals: which group an individual belongs to when
/// it differs from the group whose stream recorded the contest, and which
/// strain a group is made of.
///
/// Affiliations never influence ratings.
#[derive(Debug, Clone, Default)]
pub struct Affiliations {
    group_overrides: FxHashMap<SubjectId, GroupId>,
    strains: FxHashMap<GroupId, String>,
}

impl Affiliations {
    pub fn new() -> Affiliations {
        Affiliations::default()
    }

    pub fn override_group(
        &mut self,
        subject: impl Into<SubjectId>,
        group: impl Into<GroupId>,
    ) -> &mut Self {
        self.group_overrides.insert(subject.into(), group.into());
        self
    }

    pub fn strain(&mut self, group: impl Into<GroupId>, strain: impl Into<String>) -> &mut Self {
        self.strains.insert(group.into(), strain.into());
        self
    }

    /// Group of `subject`, falling back to `default` (the group of the stream
    /// in which it was seen).
    pub fn group_of(&self, subject: &SubjectId, default: &GroupId) -> GroupId {
        self.group_overrides
            .get(subject)
            .unwrap_or(default)
            .clone()
    }

    pub fn strain_of(&self, group: &GroupId) -> Option<&str> {
        self.strains.get(group).map(String::as_str)
    }

    pub fn has_strains(&self) -> bool {
        !self.strains.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_takes_precedence() {
        let mut affiliations = Affiliations::new();
        affiliations
            .override_group("3.1", "cage2")
            .strain("cage2", "C57BL/6J");

        let cage1 = GroupId::from("cage1");
        assert_eq!(
            affiliations.group_of(&SubjectId::from("3.1"), &cage1),
            GroupId::from("cage2")
        );
        assert_eq!(affiliations.group_of(&SubjectId::from("3.2"), &cage1), cage1);
        assert_eq!(
            affiliations.strain_of(&GroupId::from("cage2")),
            Some("C57BL/6J")
        );
        assert_eq!(affiliations.strain_of(&cage1), None);
    }
}
