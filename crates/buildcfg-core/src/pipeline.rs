//! End-to-end configuration pipeline
//!
//! For each target: resolve against the config files and its command line,
//! apply caller overrides, apply the type preset, then project. Several
//! targets can be built at once on scoped threads; they share only
//! read-only state.

use std::sync::Arc;
use std::thread;

use buildcfg_meta::{FieldValue, GroupId, TargetIdentity, TargetType};
use tracing::{debug, info};

use crate::config::{ConfigResolver, ValueOrigin};
use crate::error::{Error, Result};
use crate::preset::TargetTypePresetApplier;
use crate::projection::{ImmutableConfiguration, ReadOnlyProjector};
use crate::source::{CommandLine, ConfigFileSource, LayeredSources};

/// A value set programmatically by whoever requests the build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerOverride {
    pub group: GroupId,
    pub field: String,
    pub value: FieldValue,
}

/// Everything needed to build one target's configuration.
#[derive(Debug, Clone)]
pub struct TargetRequest {
    pub identity: TargetIdentity,
    pub target_type: TargetType,
    pub command_line: CommandLine,
    pub overrides: Vec<CallerOverride>,
}

impl TargetRequest {
    pub fn new(identity: TargetIdentity, target_type: TargetType) -> Self {
        Self {
            identity,
            target_type,
            command_line: CommandLine::default(),
            overrides: Vec::new(),
        }
    }

    pub fn with_command_line(mut self, command_line: CommandLine) -> Self {
        self.command_line = command_line;
        self
    }

    /// Set a root field, outranking every other source.
    pub fn with_override(self, field: &str, value: FieldValue) -> Self {
        self.with_override_in(GroupId::Target, field, value)
    }

    pub fn with_override_in(mut self, group: GroupId, field: &str, value: FieldValue) -> Self {
        self.overrides.push(CallerOverride {
            group,
            field: field.to_string(),
            value,
        });
        self
    }
}

/// Resolver, preset applier and projector wired to one config-file source.
#[derive(Clone)]
pub struct ConfigPipeline {
    resolver: ConfigResolver,
    config: Arc<dyn ConfigFileSource>,
    presets: TargetTypePresetApplier,
    projector: ReadOnlyProjector,
}

impl ConfigPipeline {
    pub fn new(resolver: ConfigResolver, config: Arc<dyn ConfigFileSource>) -> Self {
        Self {
            resolver,
            config,
            presets: TargetTypePresetApplier,
            projector: ReadOnlyProjector,
        }
    }

    pub fn resolver(&self) -> &ConfigResolver {
        &self.resolver
    }

    /// Build one target's finalized, projected configuration.
    pub fn build(&self, request: &TargetRequest) -> Result<ImmutableConfiguration> {
        let sources = LayeredSources::new(self.config.as_ref(), &request.command_line);
        let mut config =
            self.resolver
                .resolve(&request.identity, request.target_type, &sources)?;

        for caller in &request.overrides {
            config.set_in(
                caller.group,
                &caller.field,
                caller.value.clone(),
                ValueOrigin::Caller,
            )?;
        }
        if !request.overrides.is_empty() {
            debug!(
                target_name = request.identity.name(),
                count = request.overrides.len(),
                "Applied caller overrides"
            );
        }

        self.presets.apply(&mut config, request.target_type)?;
        let projected = self.projector.project(config)?;
        info!(
            target_name = request.identity.name(),
            target_type = %request.target_type,
            platform = %request.identity.platform(),
            "Target configuration finalized"
        );
        Ok(projected)
    }

    /// Build several targets concurrently, one scoped thread per target.
    ///
    /// Results come back in request order; one target failing does not stop
    /// the others.
    pub fn build_many(&self, requests: &[TargetRequest]) -> Vec<Result<ImmutableConfiguration>> {
        thread::scope(|scope| {
            let handles: Vec<_> = requests
                .iter()
                .map(|request| (request, scope.spawn(move || self.build(request))))
                .collect();

            handles
                .into_iter()
                .map(|(request, handle)| {
                    handle.join().unwrap_or_else(|_| {
                        Err(Error::WorkerPanicked {
                            target: request.identity.name().to_string(),
                        })
                    })
                })
                .collect()
        })
    }
}

impl std::fmt::Debug for ConfigPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigPipeline")
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}
