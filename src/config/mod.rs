//! Runtime configuration for debugging features.
//!
//! A host supplies a [`PartialFsmConfig`] and an [`Environment`];
//! [`resolve_config`] fills every missing field with the environment's
//! default. Development defaults favour observability, production defaults
//! switch output off and keep no log.

use crate::diagram::DiagramDirection;
use crate::log::LogCapacity;
use crate::machine::StateOverride;
use serde::{Deserialize, Serialize};
use std::env;

/// Whether the host runs in development or production.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Detect the environment from `FSM_ENV`, then `APP_ENV`.
    ///
    /// Anything other than `production`/`prod` is treated as development.
    pub fn from_env() -> Self {
        env::var("FSM_ENV")
            .or_else(|_| env::var("APP_ENV"))
            .map(|value| Self::parse(&value))
            .unwrap_or_default()
    }

    fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

/// Fully resolved configuration.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FsmConfig {
    /// When set, the machine is forced into this state.
    pub state_override: Option<StateOverride>,
    /// Clear the log before applying a configured override.
    pub reset_debug_log_on_override: bool,
    /// Append a `reset` record holding the cleared log.
    pub record_reset_data_to_debug_log: bool,
    pub debug_log_capacity: LogCapacity,
    /// Store record data as a JSON string instead of structured JSON.
    pub stringify_log_transition_data: bool,
    /// Drop updates whose data equals the current data.
    pub filter_repeat_updates: bool,
    pub record_filtered_updates_to_debug_log: bool,
    /// Emit rejected transitions as warnings.
    pub output_transition_rejection_to_console: bool,
    pub output_debug_log: bool,
    pub output_state_diagram_definition: bool,
    pub state_diagram_direction: DiagramDirection,
}

impl FsmConfig {
    /// Defaults for the given environment.
    pub fn defaults(environment: Environment) -> Self {
        let dev = environment.is_development();
        Self {
            state_override: None,
            reset_debug_log_on_override: true,
            record_reset_data_to_debug_log: dev,
            debug_log_capacity: if dev {
                LogCapacity::Unbounded
            } else {
                LogCapacity::Bounded(0)
            },
            stringify_log_transition_data: !dev,
            filter_repeat_updates: true,
            record_filtered_updates_to_debug_log: false,
            output_transition_rejection_to_console: dev,
            output_debug_log: dev,
            output_state_diagram_definition: dev,
            state_diagram_direction: DiagramDirection::TB,
        }
    }
}

/// A configuration where every field is optional.
///
/// Deserializes from the same camelCase JSON as [`FsmConfig`], so hosts can
/// pass configuration straight through from their own settings.
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialFsmConfig {
    pub state_override: Option<StateOverride>,
    pub reset_debug_log_on_override: Option<bool>,
    pub record_reset_data_to_debug_log: Option<bool>,
    pub debug_log_capacity: Option<LogCapacity>,
    pub stringify_log_transition_data: Option<bool>,
    pub filter_repeat_updates: Option<bool>,
    pub record_filtered_updates_to_debug_log: Option<bool>,
    pub output_transition_rejection_to_console: Option<bool>,
    pub output_debug_log: Option<bool>,
    pub output_state_diagram_definition: Option<bool>,
    pub state_diagram_direction: Option<DiagramDirection>,
}

impl PartialFsmConfig {
    /// Fields set in `other` win over fields set in `self`.
    pub fn overlay(self, other: PartialFsmConfig) -> Self {
        Self {
            state_override: other.state_override.or(self.state_override),
            reset_debug_log_on_override: other
                .reset_debug_log_on_override
                .or(self.reset_debug_log_on_override),
            record_reset_data_to_debug_log: other
                .record_reset_data_to_debug_log
                .or(self.record_reset_data_to_debug_log),
            debug_log_capacity: other.debug_log_capacity.or(self.debug_log_capacity),
            stringify_log_transition_data: other
                .stringify_log_transition_data
                .or(self.stringify_log_transition_data),
            filter_repeat_updates: other.filter_repeat_updates.or(self.filter_repeat_updates),
            record_filtered_updates_to_debug_log: other
                .record_filtered_updates_to_debug_log
                .or(self.record_filtered_updates_to_debug_log),
            output_transition_rejection_to_console: other
                .output_transition_rejection_to_console
                .or(self.output_transition_rejection_to_console),
            output_debug_log: other.output_debug_log.or(self.output_debug_log),
            output_state_diagram_definition: other
                .output_state_diagram_definition
                .or(self.output_state_diagram_definition),
            state_diagram_direction: other
                .state_diagram_direction
                .or(self.state_diagram_direction),
        }
    }
}

impl From<&FsmConfig> for PartialFsmConfig {
    fn from(config: &FsmConfig) -> Self {
        Self {
            state_override: config.state_override.clone(),
            reset_debug_log_on_override: Some(config.reset_debug_log_on_override),
            record_reset_data_to_debug_log: Some(config.record_reset_data_to_debug_log),
            debug_log_capacity: Some(config.debug_log_capacity),
            stringify_log_transition_data: Some(config.stringify_log_transition_data),
            filter_repeat_updates: Some(config.filter_repeat_updates),
            record_filtered_updates_to_debug_log: Some(
                config.record_filtered_updates_to_debug_log,
            ),
            output_transition_rejection_to_console: Some(
                config.output_transition_rejection_to_console,
            ),
            output_debug_log: Some(config.output_debug_log),
            output_state_diagram_definition: Some(config.output_state_diagram_definition),
            state_diagram_direction: Some(config.state_diagram_direction),
        }
    }
}

/// Fill every unset field of `partial` with the environment default.
///
/// # Example
///
/// ```rust
/// use fsm_graph::config::{resolve_config, Environment, PartialFsmConfig};
/// use fsm_graph::log::LogCapacity;
///
/// let partial = PartialFsmConfig {
///     output_debug_log: Some(true),
///     ..Default::default()
/// };
/// let config = resolve_config(partial, Environment::Production);
///
/// assert!(config.output_debug_log);
/// assert!(!config.output_state_diagram_definition);
/// assert_eq!(config.debug_log_capacity, LogCapacity::Bounded(0));
/// ```
pub fn resolve_config(partial: PartialFsmConfig, environment: Environment) -> FsmConfig {
    let defaults = FsmConfig::defaults(environment);
    FsmConfig {
        state_override: partial.state_override.or(defaults.state_override),
        reset_debug_log_on_override: partial
            .reset_debug_log_on_override
            .unwrap_or(defaults.reset_debug_log_on_override),
        record_reset_data_to_debug_log: partial
            .record_reset_data_to_debug_log
            .unwrap_or(defaults.record_reset_data_to_debug_log),
        debug_log_capacity: partial
            .debug_log_capacity
            .unwrap_or(defaults.debug_log_capacity),
        stringify_log_transition_data: partial
            .stringify_log_transition_data
            .unwrap_or(defaults.stringify_log_transition_data),
        filter_repeat_updates: partial
            .filter_repeat_updates
            .unwrap_or(defaults.filter_repeat_updates),
        record_filtered_updates_to_debug_log: partial
            .record_filtered_updates_to_debug_log
            .unwrap_or(defaults.record_filtered_updates_to_debug_log),
        output_transition_rejection_to_console: partial
            .output_transition_rejection_to_console
            .unwrap_or(defaults.output_transition_rejection_to_console),
        output_debug_log: partial
            .output_debug_log
            .unwrap_or(defaults.output_debug_log),
        output_state_diagram_definition: partial
            .output_state_diagram_definition
            .unwrap_or(defaults.output_state_diagram_definition),
        state_diagram_direction: partial
            .state_diagram_direction
            .unwrap_or(defaults.state_diagram_direction),
    }
}

/// Which side effects a configuration change calls for.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct ConfigChanges {
    /// A new, different override was supplied.
    pub state_override: bool,
    pub output_debug_log: bool,
    pub debug_log_capacity: bool,
    pub output_state_diagram_definition: bool,
    pub state_diagram_direction: bool,
}

impl ConfigChanges {
    /// Compare two resolved configurations field by field.
    pub fn between(previous: &FsmConfig, next: &FsmConfig) -> Self {
        Self {
            state_override: next.state_override.is_some()
                && next.state_override != previous.state_override,
            output_debug_log: previous.output_debug_log != next.output_debug_log,
            debug_log_capacity: previous.debug_log_capacity != next.debug_log_capacity,
            output_state_diagram_definition: previous.output_state_diagram_definition
                != next.output_state_diagram_definition,
            state_diagram_direction: previous.state_diagram_direction
                != next.state_diagram_direction,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::State;
    use serde_json::json;

    #[test]
    fn development_defaults_favour_observability() {
        let config = resolve_config(PartialFsmConfig::default(), Environment::Development);

        assert!(config.output_debug_log);
        assert!(config.output_state_diagram_definition);
        assert!(config.output_transition_rejection_to_console);
        assert!(!config.stringify_log_transition_data);
        assert!(config.record_reset_data_to_debug_log);
        assert_eq!(config.debug_log_capacity, LogCapacity::Unbounded);
        assert_eq!(config.state_diagram_direction, DiagramDirection::TB);
        assert!(config.state_override.is_none());
    }

    #[test]
    fn production_defaults_disable_output() {
        let config = resolve_config(PartialFsmConfig::default(), Environment::Production);

        assert!(!config.output_debug_log);
        assert!(!config.output_state_diagram_definition);
        assert!(!config.output_transition_rejection_to_console);
        assert!(config.stringify_log_transition_data);
        assert_eq!(config.debug_log_capacity, LogCapacity::Bounded(0));
    }

    #[test]
    fn explicit_values_win_over_defaults() {
        let partial = PartialFsmConfig {
            debug_log_capacity: Some(LogCapacity::Bounded(3)),
            state_diagram_direction: Some(DiagramDirection::LR),
            output_debug_log: Some(false),
            ..Default::default()
        };
        let config = resolve_config(partial, Environment::Development);

        assert_eq!(config.debug_log_capacity, LogCapacity::Bounded(3));
        assert_eq!(config.state_diagram_direction, DiagramDirection::LR);
        assert!(!config.output_debug_log);
        assert!(config.output_state_diagram_definition);
    }

    #[test]
    fn overlay_prefers_newer_fields() {
        let base = PartialFsmConfig::from(&FsmConfig::defaults(Environment::Development));
        let merged = base.overlay(PartialFsmConfig {
            output_debug_log: Some(false),
            ..Default::default()
        });

        assert_eq!(merged.output_debug_log, Some(false));
        assert_eq!(merged.output_state_diagram_definition, Some(true));
    }

    #[test]
    fn partial_deserializes_from_camel_case_json() {
        let partial: PartialFsmConfig = serde_json::from_value(json!({
            "debugLogCapacity": { "bounded": 1 },
            "stateDiagramDirection": "LR",
            "stateOverride": { "state": "s3" }
        }))
        .unwrap();

        assert_eq!(partial.debug_log_capacity, Some(LogCapacity::Bounded(1)));
        assert_eq!(partial.state_diagram_direction, Some(DiagramDirection::LR));
        assert_eq!(
            partial.state_override.map(|o| o.state),
            Some(State::declared("s3"))
        );
        assert!(partial.output_debug_log.is_none());
    }

    #[test]
    fn changes_are_detected_per_field() {
        let previous = FsmConfig::defaults(Environment::Development);
        let mut next = previous.clone();
        assert!(ConfigChanges::between(&previous, &next).is_empty());

        next.debug_log_capacity = LogCapacity::Bounded(1);
        next.state_diagram_direction = DiagramDirection::LR;
        let changes = ConfigChanges::between(&previous, &next);

        assert!(changes.debug_log_capacity);
        assert!(changes.state_diagram_direction);
        assert!(!changes.output_debug_log);
        assert!(!changes.output_state_diagram_definition);
        assert!(!changes.state_override);
    }

    #[test]
    fn clearing_an_override_is_not_an_override_change() {
        let mut previous = FsmConfig::defaults(Environment::Development);
        previous.state_override = Some(StateOverride::new(State::declared("a")));
        let next = FsmConfig::defaults(Environment::Development);

        assert!(!ConfigChanges::between(&previous, &next).state_override);
        assert!(ConfigChanges::between(&next, &previous).state_override);
    }

    #[test]
    fn environment_parsing() {
        assert_eq!(Environment::parse("production"), Environment::Production);
        assert_eq!(Environment::parse(" PROD "), Environment::Production);
        assert_eq!(Environment::parse("staging"), Environment::Development);
        assert_eq!(Environment::default(), Environment::Development);
    }
}
