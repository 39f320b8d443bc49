//! Shared build environment consistency
//!
//! Targets sharing a build environment link against the same compiled
//! engine binaries, so every environment-sensitive field must hold the same
//! value in each of them. The [`SharedEnvironmentValidator`] compares two
//! finalized configurations; the [`SharedEnvironmentPlanner`] applies a
//! [`MismatchPolicy`] across a whole set of targets.

use std::fmt;
use std::str::FromStr;

use buildcfg_meta::{BuildEnvironment, FieldValue, GroupId, parse_field};
use serde::Serialize;
use tracing::warn;

use crate::config::{ResolutionStage, TargetConfiguration};
use crate::error::{Error, Result};

/// One environment-sensitive field whose values differ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldMismatch {
    pub group: GroupId,
    pub field: &'static str,
    pub value_a: FieldValue,
    pub value_b: FieldValue,
}

/// Outcome of comparing two targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsistencyReport {
    pub target_a: String,
    pub target_b: String,
    pub mismatches: Vec<FieldMismatch>,
}

impl ConsistencyReport {
    /// Whether the two targets may share a build environment.
    pub fn is_consistent(&self) -> bool {
        self.mismatches.is_empty()
    }
}

impl fmt::Display for ConsistencyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_consistent() {
            return write!(f, "{} and {} are consistent", self.target_a, self.target_b);
        }
        writeln!(
            f,
            "{} and {} differ in {} field(s):",
            self.target_a,
            self.target_b,
            self.mismatches.len()
        )?;
        for m in &self.mismatches {
            writeln!(
                f,
                "  {}.{}: {} vs {}",
                m.group, m.field, m.value_a, m.value_b
            )?;
        }
        Ok(())
    }
}

/// Compares environment-sensitive fields of two finalized configurations.
#[derive(Debug, Clone, Copy, Default)]
pub struct SharedEnvironmentValidator;

impl SharedEnvironmentValidator {
    pub fn new() -> Self {
        Self
    }

    /// Compare every environment-sensitive field of every group.
    ///
    /// Both configurations must be finalized. Neither is modified.
    pub fn validate<A, B>(&self, a: &A, b: &B) -> Result<ConsistencyReport>
    where
        A: TargetConfiguration + ?Sized,
        B: TargetConfiguration + ?Sized,
    {
        a.require_stage(ResolutionStage::Finalized, "validate")?;
        b.require_stage(ResolutionStage::Finalized, "validate")?;

        let mut mismatches = Vec::new();
        for (group, descriptor) in a.registry().environment_sensitive() {
            let value_a = a.lookup(group, descriptor.name)?;
            let value_b = b.lookup(group, descriptor.name)?;
            if value_a != value_b {
                mismatches.push(FieldMismatch {
                    group,
                    field: descriptor.name,
                    value_a,
                    value_b,
                });
            }
        }

        Ok(ConsistencyReport {
            target_a: a.identity().name().to_string(),
            target_b: b.identity().name().to_string(),
            mismatches,
        })
    }
}

/// What to do when targets that asked to share an environment disagree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MismatchPolicy {
    /// Any mismatch is a hard error.
    #[default]
    Error,
    /// Mismatching targets are moved to unique environments.
    ForceUnique,
}

impl FromStr for MismatchPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(MismatchPolicy::Error),
            "force-unique" | "forceunique" => Ok(MismatchPolicy::ForceUnique),
            _ => Err(buildcfg_meta::Error::UnknownVariant {
                kind: "mismatch policy",
                value: s.to_string(),
            }
            .into()),
        }
    }
}

/// Why a target needs its own build environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UniqueReason {
    /// The target's `build_environment` is `Unique`.
    Requested,
    /// The target disagrees with the shared reference.
    Inconsistent(ConsistencyReport),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UniqueTarget {
    pub name: String,
    pub reason: UniqueReason,
}

/// Assignment of targets to the shared environment or unique ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnvironmentPlan {
    /// Target every shared target was compared against.
    pub reference: Option<String>,
    pub shared: Vec<String>,
    pub unique: Vec<UniqueTarget>,
}

impl EnvironmentPlan {
    pub fn is_unique(&self, name: &str) -> bool {
        self.unique.iter().any(|u| u.name == name)
    }
}

/// Decides which targets can share the build environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct SharedEnvironmentPlanner {
    policy: MismatchPolicy,
    validator: SharedEnvironmentValidator,
}

impl SharedEnvironmentPlanner {
    pub fn new(policy: MismatchPolicy) -> Self {
        Self {
            policy,
            validator: SharedEnvironmentValidator,
        }
    }

    pub fn policy(&self) -> MismatchPolicy {
        self.policy
    }

    /// Plan environments for `configs`.
    ///
    /// Targets requesting a unique environment are listed as such. The first
    /// shared target becomes the reference every other shared target is
    /// validated against. Configurations are never modified.
    pub fn plan<C: TargetConfiguration>(&self, configs: &[C]) -> Result<EnvironmentPlan> {
        let mut plan = EnvironmentPlan::default();
        let mut reference: Option<&C> = None;

        for config in configs {
            let name = config.identity().name().to_string();
            let environment: BuildEnvironment =
                parse_field("build_environment", &config.root("build_environment")?)?;
            if environment == BuildEnvironment::Unique {
                plan.unique.push(UniqueTarget {
                    name,
                    reason: UniqueReason::Requested,
                });
                continue;
            }

            let Some(shared_with) = reference else {
                config.require_stage(ResolutionStage::Finalized, "plan")?;
                plan.reference = Some(name.clone());
                plan.shared.push(name);
                reference = Some(config);
                continue;
            };

            let report = self.validator.validate(shared_with, config)?;
            if report.is_consistent() {
                plan.shared.push(name);
                continue;
            }

            match self.policy {
                MismatchPolicy::Error => {
                    return Err(Error::InconsistentEnvironment {
                        report: Box::new(report),
                    });
                }
                MismatchPolicy::ForceUnique => {
                    warn!(
                        target_name = %name,
                        reference = %report.target_a,
                        mismatches = report.mismatches.len(),
                        "Target forced into a unique build environment"
                    );
                    plan.unique.push(UniqueTarget {
                        name,
                        reason: UniqueReason::Inconsistent(report),
                    });
                }
            }
        }
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MutableConfiguration, ValueOrigin};
    use crate::preset::TargetTypePresetApplier;
    use buildcfg_meta::{FieldRegistry, HostContext, Platform, TargetIdentity, TargetType};

    fn seeded(name: &str) -> MutableConfiguration {
        let identity = TargetIdentity::builder()
            .name(name)
            .platform(Platform::Win64)
            .build()
            .unwrap();
        MutableConfiguration::seed(
            FieldRegistry::builtin(),
            identity,
            HostContext::new(Platform::Win64, false),
        )
    }

    fn finalized(name: &str, edit: impl FnOnce(&mut MutableConfiguration)) -> MutableConfiguration {
        let mut config = seeded(name);
        edit(&mut config);
        config.advance(ResolutionStage::Resolved);
        TargetTypePresetApplier
            .apply(&mut config, TargetType::Game)
            .unwrap();
        config
    }

    #[test]
    fn identical_targets_are_consistent() {
        let a = finalized("GameA", |_| {});
        let b = finalized("GameB", |_| {});
        let report = SharedEnvironmentValidator.validate(&a, &b).unwrap();
        assert!(report.is_consistent());
        assert_eq!(report.target_a, "GameA");
        assert_eq!(report.target_b, "GameB");
    }

    #[test]
    fn local_fields_are_ignored() {
        let a = finalized("GameA", |c| {
            c.set("use_unity_build", false.into(), ValueOrigin::CommandLine)
                .unwrap();
        });
        let b = finalized("GameB", |_| {});
        assert!(SharedEnvironmentValidator.validate(&a, &b).unwrap().is_consistent());
    }

    #[test]
    fn extension_group_mismatch_is_reported() {
        let a = finalized("GameA", |c| {
            c.set_in(GroupId::Android, "minimum_sdk_version", FieldValue::Int(29), ValueOrigin::ConfigFile)
                .unwrap();
        });
        let b = finalized("GameB", |_| {});
        let report = SharedEnvironmentValidator.validate(&a, &b).unwrap();
        assert_eq!(
            report.mismatches,
            vec![FieldMismatch {
                group: GroupId::Android,
                field: "minimum_sdk_version",
                value_a: FieldValue::Int(29),
                value_b: FieldValue::Int(26),
            }]
        );
        assert!(report.to_string().contains("android.minimum_sdk_version: 29 vs 26"));
    }

    #[test]
    fn unfinalized_input_is_refused() {
        let a = finalized("GameA", |_| {});
        let b = seeded("GameB");
        assert!(matches!(
            SharedEnvironmentValidator.validate(&a, &b),
            Err(Error::Stage { .. })
        ));
    }

    #[test]
    fn policy_parses_from_cli_spelling() {
        assert_eq!("force-unique".parse::<MismatchPolicy>().unwrap(), MismatchPolicy::ForceUnique);
        assert_eq!("Error".parse::<MismatchPolicy>().unwrap(), MismatchPolicy::Error);
        assert!("ignore".parse::<MismatchPolicy>().is_err());
    }
}
