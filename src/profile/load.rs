//! Resolves `source_profile` references between sections.
//!
//! A profile that some other profile names as its `source_profile` becomes a complex profile
//! owning those profiles as targets. A profile with neither dependents nor a `source_profile`
//! is a single profile. Chains may be arbitrarily deep: a profile can be the target of one
//! complex profile and the base of another.
//!
//! Cycles (`a -> b -> a`) are not detected. Every profile on a cycle has a dependent, so each
//! one becomes a complex profile targeting its dependents, and none of them is a single.

use std::collections::HashMap;
use std::convert::TryFrom;

use tracing::{debug, trace};

use crate::error::LoadError;
use crate::ini::Section;
use crate::profile::{ComplexProfileItem, ProfileItem, RawProfileSet};
use crate::role_arn::RoleArn;

mod keys {
    pub const AWS_ACCOUNT_ID: &str = "aws_account_id";
    pub const ROLE_ARN: &str = "role_arn";
    pub const ROLE_NAME: &str = "role_name";
    pub const SOURCE_PROFILE: &str = "source_profile";
}

/// `[profile foo]` and `[foo]` both name the profile `foo`.
fn profile_name(section_name: &str) -> &str {
    const KEYWORD: &str = "profile";

    let keyword = section_name.get(..KEYWORD.len());
    let rest = section_name.get(KEYWORD.len()..).unwrap_or_default();
    match keyword {
        Some(k) if k.eq_ignore_ascii_case(KEYWORD) && rest.starts_with(char::is_whitespace) => {
            rest.trim_start()
        }
        _ => section_name,
    }
}

impl TryFrom<&Section> for ProfileItem {
    type Error = LoadError;

    fn try_from(section: &Section) -> Result<Self, Self::Error> {
        let line = section.start_line;
        let mut params = section.params.clone();
        params.remove(keys::SOURCE_PROFILE);
        let role_arn = params.remove(keys::ROLE_ARN);
        let mut aws_account_id = params.remove(keys::AWS_ACCOUNT_ID);
        let mut role_name = params.remove(keys::ROLE_NAME);

        if let Some(role_arn) = role_arn {
            if aws_account_id.is_some() || role_name.is_some() {
                return Err(LoadError::ConflictingRoleArn { line });
            }

            let arn = RoleArn::parse(&role_arn).ok_or(LoadError::InvalidRoleArn { line })?;
            aws_account_id = Some(arn.aws_account_id);
            role_name = Some(arn.role_name);
        }

        let aws_account_id = aws_account_id
            .filter(|id| !id.is_empty())
            .ok_or(LoadError::MissingAccountId { line })?;

        Ok(ProfileItem {
            name: profile_name(&section.name).to_string(),
            aws_account_id,
            role_name,
            params,
        })
    }
}

/// Dependents of each `source_profile` name, in the order the names were first referenced.
#[derive(Default)]
struct Dependents {
    by_source: HashMap<String, Vec<ProfileItem>>,
    sources: Vec<String>,
}

impl Dependents {
    fn add(&mut self, source: &str, item: ProfileItem) {
        if let Some(items) = self.by_source.get_mut(source) {
            items.push(item);
        } else {
            self.sources.push(source.to_string());
            self.by_source.insert(source.to_string(), vec![item]);
        }
    }

    fn take(&mut self, source: &str) -> Option<Vec<ProfileItem>> {
        self.by_source.remove(source)
    }

    /// Names still referenced but never taken.
    fn into_undefined(self) -> Vec<String> {
        let Dependents {
            by_source,
            sources,
        } = self;
        sources
            .into_iter()
            .filter(|s| by_source.contains_key(s))
            .collect()
    }
}

/// Partitions `sections` into single and complex profiles.
pub fn load_profiles(sections: &[Section]) -> Result<RawProfileSet, LoadError> {
    let mut dependents = Dependents::default();
    let mut items = Vec::with_capacity(sections.len());
    for section in sections {
        let item = ProfileItem::try_from(section)?;
        let source = section.param(keys::SOURCE_PROFILE);
        trace!(
            "profile loaded. name:{}, source_profile:{:?}",
            item.name,
            source
        );

        if let Some(source) = source {
            dependents.add(source, item.clone());
        }
        items.push((item, source.is_none()));
    }

    let mut profiles = RawProfileSet::default();
    for (item, is_root) in items {
        if let Some(targets) = dependents.take(&item.name) {
            profiles.complexes.push(ComplexProfileItem {
                base: item,
                targets,
            });
        } else if is_root {
            profiles.singles.push(item);
        }
    }

    let undefined = dependents.into_undefined();
    if !undefined.is_empty() {
        return Err(LoadError::UndefinedSourceProfiles { names: undefined });
    }

    debug!(
        "profiles resolved. singles:{}, complexes:{}",
        profiles.singles.len(),
        profiles.complexes.len()
    );
    Ok(profiles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn section(name: &str, start_line: usize, params: &[(&str, &str)]) -> Section {
        Section {
            name: name.to_string(),
            start_line,
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    fn item(name: &str, aws_account_id: &str, role_name: Option<&str>) -> ProfileItem {
        ProfileItem {
            name: name.to_string(),
            aws_account_id: aws_account_id.to_string(),
            role_name: role_name.map(|s| s.to_string()),
            params: BTreeMap::new(),
        }
    }

    fn names<'a>(items: impl Iterator<Item = &'a ProfileItem>) -> Vec<&'a str> {
        items.map(|p| p.name()).collect()
    }

    #[test]
    fn strips_profile_keyword() {
        assert_eq!(profile_name("profile foo"), "foo");
        assert_eq!(profile_name("PROFILE  foo"), "foo");
        assert_eq!(profile_name("Profile\tfoo bar"), "foo bar");
        assert_eq!(profile_name("profilefoo"), "profilefoo");
        assert_eq!(profile_name("profile"), "profile");
        assert_eq!(profile_name("foo"), "foo");
        assert_eq!(profile_name("pro"), "pro");
        assert_eq!(profile_name("Base2/Role1"), "Base2/Role1");
    }

    #[test]
    fn loads_single_and_complex_profiles() {
        let sections = vec![
            section(
                "profile target1-1",
                1,
                &[
                    ("aws_account_id", "111122223334"),
                    ("role_name", "role1"),
                    ("source_profile", "base1"),
                ],
            ),
            section(
                "target1-2",
                5,
                &[
                    ("role_arn", "arn:aws:iam::111122223335:role/role2"),
                    ("source_profile", "base1"),
                ],
            ),
            section("base1", 10, &[("aws_account_id", "111100003333")]),
            section("base2", 13, &[("aws_account_id", "222200001111")]),
            section(
                "profile targetex",
                16,
                &[("aws_account_id", "333300001112"), ("role_name", "roleex")],
            ),
            section(
                "target2-1",
                21,
                &[
                    ("aws_account_id", "222200001112"),
                    ("role_name", "role3"),
                    ("source_profile", "base2"),
                ],
            ),
        ];
        let profiles = load_profiles(&sections).unwrap();

        assert_eq!(
            profiles.singles,
            vec![item("targetex", "333300001112", Some("roleex"))]
        );
        assert_eq!(
            profiles.complexes[0],
            ComplexProfileItem {
                base: item("base1", "111100003333", None),
                targets: vec![
                    item("target1-1", "111122223334", Some("role1")),
                    item("target1-2", "111122223335", Some("role2")),
                ],
            }
        );
        assert_eq!(profiles.complexes[1].name(), "base2");
        assert_eq!(names(profiles.complexes[1].targets()), vec!["target2-1"]);
        assert_eq!(profiles.complexes.len(), 2);
    }

    #[test]
    fn passes_other_params_through() {
        let sections = vec![section(
            "profile marketingadmin",
            8,
            &[
                ("role_arn", "arn:aws:iam::123456789012:role/marketingadmin"),
                ("color", "ffaaee"),
                ("region", "ap-northeast-1"),
            ],
        )];
        let profiles = load_profiles(&sections).unwrap();
        let single = &profiles.singles[0];

        assert_eq!(single.name(), "marketingadmin");
        assert_eq!(single.aws_account_id(), "123456789012");
        assert_eq!(single.role_name(), Some("marketingadmin"));
        assert_eq!(single.param("color"), Some("ffaaee"));
        assert_eq!(single.region(), Some("ap-northeast-1"));
        assert_eq!(single.param("role_arn"), None);
    }

    #[test]
    fn fails_when_role_arn_conflicts() {
        let sections = vec![section(
            "aaaa",
            1,
            &[
                ("role_arn", "arn:aws:iam::123456789012:role/marketingadmin"),
                ("aws_account_id", "123456789012"),
                ("role_name", "marketingadmin"),
            ],
        )];
        let e = load_profiles(&sections).unwrap_err();

        assert_eq!(e, LoadError::ConflictingRoleArn { line: 1 });
        assert_eq!(
            e.to_string(),
            "The profile includes both `role_arn` and either `aws_account_id` or `role_name`."
        );
    }

    #[test]
    fn fails_when_role_arn_conflicts_with_role_name_only() {
        let sections = vec![
            section("ok", 1, &[("aws_account_id", "1"), ("role_name", "r")]),
            section(
                "bbbb",
                4,
                &[
                    ("role_arn", "arn:aws:iam::123456789012:role/a"),
                    ("role_name", "b"),
                ],
            ),
        ];
        assert_eq!(
            load_profiles(&sections).unwrap_err(),
            LoadError::ConflictingRoleArn { line: 4 }
        );
    }

    #[test]
    fn fails_when_role_arn_is_invalid() {
        let sections = vec![section(
            "invalid-role-arn",
            1,
            &[("role_arn", "arn:role/any")],
        )];
        let e = load_profiles(&sections).unwrap_err();

        assert_eq!(e, LoadError::InvalidRoleArn { line: 1 });
        assert_eq!(
            e.to_string(),
            "The profile includes invalid `role_arn` parameter."
        );
    }

    #[test]
    fn fails_when_aws_account_id_is_missing() {
        let sections = vec![section(
            "unknown-aws-account-id",
            7,
            &[("role_name", "some_role"), ("source_profile", "baseProfile")],
        )];
        let e = load_profiles(&sections).unwrap_err();

        assert_eq!(e, LoadError::MissingAccountId { line: 7 });
        assert_eq!(e.line(), Some(7));
        assert_eq!(
            e.to_string(),
            "The profile doesn't specify an AWS account ID."
        );
    }

    #[test]
    fn role_arn_without_account_id_is_missing_account_id() {
        let sections = vec![section(
            "blank-account",
            3,
            &[("role_arn", "arn:aws:iam:::role/x")],
        )];
        let e = load_profiles(&sections).unwrap_err();

        assert_eq!(e, LoadError::MissingAccountId { line: 3 });
    }

    #[test]
    fn lists_every_undefined_source_profile() {
        let sections = vec![
            section(
                "a",
                1,
                &[("aws_account_id", "1"), ("source_profile", "missing1")],
            ),
            section("b", 4, &[("aws_account_id", "2")]),
            section(
                "c",
                6,
                &[("aws_account_id", "3"), ("source_profile", "missing2")],
            ),
            section(
                "d",
                9,
                &[("aws_account_id", "4"), ("source_profile", "missing1")],
            ),
            section("e", 12, &[("aws_account_id", "5"), ("source_profile", "b")]),
        ];
        let e = load_profiles(&sections).unwrap_err();

        assert_eq!(
            e,
            LoadError::UndefinedSourceProfiles {
                names: vec!["missing1".to_string(), "missing2".to_string()],
            }
        );
        assert_eq!(
            e.to_string(),
            "The following profiles are referenced as `source_profile` but not defined: missing1, missing2"
        );
    }

    #[test]
    fn resolves_deep_chains_with_siblings() {
        // root -> parent -> child -> grandchild, with siblings on every level.
        let sections = vec![
            section("root", 1, &[("aws_account_id", "000000000000")]),
            section(
                "parent",
                3,
                &[("aws_account_id", "111111111111"), ("source_profile", "root")],
            ),
            section(
                "parent-sibling",
                6,
                &[
                    ("aws_account_id", "111111111112"),
                    ("role_name", "sibling"),
                    ("source_profile", "root"),
                ],
            ),
            section(
                "child",
                10,
                &[
                    ("aws_account_id", "222222222222"),
                    ("role_name", "child"),
                    ("source_profile", "parent"),
                ],
            ),
            section(
                "grandchild",
                14,
                &[
                    ("role_arn", "arn:aws:iam::333333333333:role/grandchild"),
                    ("source_profile", "child"),
                ],
            ),
            section(
                "child-sibling",
                17,
                &[
                    ("aws_account_id", "222222222223"),
                    ("role_name", "child-sibling"),
                    ("source_profile", "parent"),
                ],
            ),
            section(
                "grandchild-sibling",
                21,
                &[
                    ("aws_account_id", "333333333334"),
                    ("role_name", "grandchild-sibling"),
                    ("source_profile", "child"),
                ],
            ),
            section(
                "standalone",
                25,
                &[("aws_account_id", "999999999999"), ("role_name", "alone")],
            ),
        ];
        let profiles = load_profiles(&sections).unwrap();

        assert_eq!(names(profiles.singles.iter()), vec!["standalone"]);
        assert_eq!(
            profiles
                .complexes
                .iter()
                .map(|c| (c.name(), names(c.targets())))
                .collect::<Vec<_>>(),
            vec![
                ("root", vec!["parent", "parent-sibling"]),
                ("parent", vec!["child", "child-sibling"]),
                ("child", vec!["grandchild", "grandchild-sibling"]),
            ]
        );
    }

    #[test]
    fn base_defined_after_its_targets() {
        let sections = vec![
            section(
                "target",
                1,
                &[
                    ("aws_account_id", "1"),
                    ("role_name", "r"),
                    ("source_profile", "profile-base"),
                ],
            ),
            section("profile profile-base", 5, &[("aws_account_id", "2")]),
        ];
        let profiles = load_profiles(&sections).unwrap();

        assert!(profiles.singles.is_empty());
        assert_eq!(profiles.complexes[0].name(), "profile-base");
        assert_eq!(names(profiles.complexes[0].targets()), vec!["target"]);
    }

    #[test]
    fn cycles_become_complexes_of_each_other() {
        let sections = vec![
            section("a", 1, &[("aws_account_id", "1"), ("source_profile", "b")]),
            section("b", 3, &[("aws_account_id", "2"), ("source_profile", "a")]),
            section("c", 5, &[("aws_account_id", "3"), ("source_profile", "c")]),
        ];
        let profiles = load_profiles(&sections).unwrap();

        assert!(profiles.singles.is_empty());
        assert_eq!(
            profiles
                .complexes
                .iter()
                .map(|c| (c.name(), names(c.targets())))
                .collect::<Vec<_>>(),
            vec![("a", vec!["b"]), ("b", vec!["a"]), ("c", vec!["c"])]
        );
    }
}
