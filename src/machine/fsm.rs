//! The machine a host drives: validator, debug log and output channels.

use super::outcome::{CurrentState, StateOverride, TransitionOutcome};
use super::validator::{Rejection, TransitionValidator};
use crate::config::{resolve_config, ConfigChanges, Environment, FsmConfig, PartialFsmConfig};
use crate::core::{State, TransitionRecord, TransitionResult, TransitionType};
use crate::graph::StateGraph;
use crate::log::{present_debug_log, DebugLogRow, DebugLogStore};
use crate::observe::{Broadcast, SubscriptionHandle};
use serde_json::Value;

/// A running state machine with its debugging instrumentation.
///
/// Every request returns a [`TransitionOutcome`]; invalid requests are
/// recorded and reported, never raised.
///
/// # Example
///
/// ```rust
/// use fsm_graph::config::{Environment, PartialFsmConfig};
/// use fsm_graph::core::{State, TransitionResult};
/// use fsm_graph::graph::StateGraph;
/// use fsm_graph::machine::Fsm;
/// use fsm_graph::transition_map;
/// use serde_json::json;
///
/// let graph = StateGraph::new(
///     ["Closed", "Open"],
///     transition_map! {
///         Init => [Closed],
///         Closed => [Open],
///         Open => [Closed, Terminate],
///     },
/// )
/// .unwrap();
/// let mut fsm = Fsm::new(graph, PartialFsmConfig::default(), Environment::Development);
///
/// assert!(fsm.attempt_transition("Closed", json!({ "locked": true })).is_success());
/// let outcome = fsm.attempt_transition("Terminate", json!(null));
/// assert_eq!(outcome.result, TransitionResult::IllegalChangeNotAdjacent);
/// assert_eq!(fsm.current_state(), &State::declared("Closed"));
/// assert_eq!(fsm.debug_log().len(), 3);
/// ```
#[derive(Debug)]
pub struct Fsm {
    validator: TransitionValidator,
    data: Value,
    environment: Environment,
    config: FsmConfig,
    log: DebugLogStore,
    current_state_output: Broadcast<CurrentState>,
    debug_log_output: Broadcast<Option<Vec<TransitionRecord>>>,
    diagram_output: Broadcast<Option<String>>,
    destroyed: bool,
}

impl Fsm {
    /// Start a machine in `Init`, recording the `init` transition.
    ///
    /// A configured `state_override` is applied straight away.
    pub fn new(graph: StateGraph, partial: PartialFsmConfig, environment: Environment) -> Self {
        let config = resolve_config(partial, environment);
        let mut fsm = Self {
            validator: TransitionValidator::new(graph),
            data: Value::Null,
            environment,
            log: DebugLogStore::new(config.debug_log_capacity),
            config,
            current_state_output: Broadcast::new(),
            debug_log_output: Broadcast::with_replay(),
            diagram_output: Broadcast::with_replay(),
            destroyed: false,
        };

        fsm.record(TransitionRecord::new(
            None,
            State::Init,
            TransitionType::Init,
            TransitionResult::Success,
            TransitionResult::Success.as_str(),
            Value::Null,
        ));
        fsm.publish_diagram();

        if let Some(state_override) = fsm.config.state_override.clone() {
            let reset_log = fsm.config.reset_debug_log_on_override;
            fsm.override_state(state_override, reset_log);
        }

        tracing::debug!(
            environment = ?environment,
            states = fsm.graph().declared_states().len(),
            "State machine created"
        );
        fsm
    }

    /// Move to `target` if the graph has an edge from the current state.
    pub fn attempt_transition(
        &mut self,
        target: impl Into<State>,
        data: Value,
    ) -> TransitionOutcome {
        let target = target.into();
        let from = self.current_state().clone();

        match self.validator.apply(target.clone()) {
            Ok(_) => {
                tracing::debug!(from = %from, to = %target, "Transition applied");
                self.data = data.clone();
                self.record(TransitionRecord::new(
                    Some(from),
                    target,
                    TransitionType::Change,
                    TransitionResult::Success,
                    TransitionResult::Success.as_str(),
                    data,
                ));
                self.state_changed();
                self.outcome(TransitionResult::Success, TransitionResult::Success.as_str())
            }
            Err(rejection) => self.reject(from, target, TransitionType::Change, rejection, data),
        }
    }

    /// Force the machine into any known state, ignoring adjacency.
    ///
    /// With `reset_log` the debug log is cleared first, and when
    /// `record_reset_data_to_debug_log` is on a `reset` record holding the
    /// cleared entries precedes the `override` record.
    pub fn override_state(
        &mut self,
        state_override: StateOverride,
        reset_log: bool,
    ) -> TransitionOutcome {
        let StateOverride { state: target, data } = state_override;
        let from = self.current_state().clone();

        if let Err(rejection) = self.validator.force(target.clone()) {
            return self.reject(from, target, TransitionType::Override, rejection, data);
        }

        if reset_log {
            let cleared = self.log.snapshot();
            self.log.clear();
            if self.config.record_reset_data_to_debug_log {
                let cleared = serde_json::to_value(&cleared).unwrap_or(Value::Null);
                self.record(TransitionRecord::new(
                    Some(from.clone()),
                    from.clone(),
                    TransitionType::Reset,
                    TransitionResult::Reset,
                    "Debug log reset",
                    cleared,
                ));
            }
        }

        tracing::info!(from = %from, to = %target, reset_log, "State overridden");
        self.data = data.clone();
        self.record(TransitionRecord::new(
            Some(from),
            target,
            TransitionType::Override,
            TransitionResult::Override,
            TransitionResult::Override.as_str(),
            data,
        ));
        self.state_changed();
        self.outcome(TransitionResult::Override, TransitionResult::Override.as_str())
    }

    /// Replace the current state's data without changing state.
    pub fn update_state(&mut self, data: Value) -> TransitionOutcome {
        let current = self.current_state().clone();

        if self.config.filter_repeat_updates && data == self.data {
            let message = format!("Update to \"{current}\" filtered: data unchanged");
            tracing::debug!(state = %current, "Repeat update filtered");
            if self.config.record_filtered_updates_to_debug_log {
                self.record(TransitionRecord::new(
                    Some(current.clone()),
                    current,
                    TransitionType::Update,
                    TransitionResult::RepeatUpdateFiltered,
                    message.clone(),
                    data,
                ));
            }
            return self.outcome(TransitionResult::RepeatUpdateFiltered, message);
        }

        self.data = data.clone();
        self.record(TransitionRecord::new(
            Some(current.clone()),
            current,
            TransitionType::Update,
            TransitionResult::Success,
            TransitionResult::Success.as_str(),
            data,
        ));
        self.notify_current_state();
        self.outcome(TransitionResult::Success, TransitionResult::Success.as_str())
    }

    pub fn current_state(&self) -> &State {
        self.validator.current()
    }

    pub fn current_data(&self) -> &Value {
        &self.data
    }

    pub fn current(&self) -> CurrentState {
        CurrentState {
            state: self.current_state().clone(),
            data: self.data.clone(),
        }
    }

    pub fn graph(&self) -> &StateGraph {
        self.validator.graph()
    }

    pub fn config(&self) -> &FsmConfig {
        &self.config
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Retained records, oldest first.
    pub fn debug_log(&self) -> Vec<TransitionRecord> {
        self.log.snapshot()
    }

    /// Retained records as display rows, newest first.
    pub fn debug_log_rows(&self, keys: &[&str]) -> Vec<DebugLogRow> {
        present_debug_log(&self.log.snapshot(), keys)
    }

    /// The current diagram, if diagram output is enabled.
    pub fn diagram_definition(&self) -> Option<String> {
        self.config
            .output_state_diagram_definition
            .then(|| self.render_diagram())
    }

    /// Called on every state change and data update made after subscribing.
    pub fn subscribe_current_state<F>(&mut self, observer: F) -> SubscriptionHandle
    where
        F: FnMut(&CurrentState) + Send + 'static,
    {
        self.current_state_output.subscribe(observer)
    }

    /// Called with the whole log after each append while debug-log output
    /// is on, and with `None` when it is switched off.
    pub fn subscribe_debug_log<F>(&mut self, observer: F) -> SubscriptionHandle
    where
        F: FnMut(&Option<Vec<TransitionRecord>>) + Send + 'static,
    {
        self.debug_log_output.subscribe(observer)
    }

    /// Called with the rendered diagram after each state change while
    /// diagram output is on, and with `None` when it is switched off.
    pub fn subscribe_diagram_definition<F>(&mut self, observer: F) -> SubscriptionHandle
    where
        F: FnMut(&Option<String>) + Send + 'static,
    {
        self.diagram_output.subscribe(observer)
    }

    /// Cancel a subscription on whichever channel holds it.
    pub fn unsubscribe(&mut self, handle: &SubscriptionHandle) -> bool {
        self.current_state_output.unsubscribe(handle)
            || self.debug_log_output.unsubscribe(handle)
            || self.diagram_output.unsubscribe(handle)
    }

    /// Merge `partial` over the current configuration and apply whatever
    /// changed. Refused in production.
    pub fn update_config(&mut self, partial: PartialFsmConfig) -> ConfigChanges {
        if !self.environment.is_development() {
            tracing::warn!("Configuration updates are ignored in production");
            return ConfigChanges::default();
        }

        let previous = self.config.clone();
        let merged = PartialFsmConfig::from(&previous).overlay(partial);
        self.config = resolve_config(merged, self.environment);
        let changes = ConfigChanges::between(&previous, &self.config);

        if changes.state_override {
            if let Some(state_override) = self.config.state_override.clone() {
                let reset_log = self.config.reset_debug_log_on_override;
                self.override_state(state_override, reset_log);
            }
        }

        if changes.debug_log_capacity {
            self.log.set_capacity(self.config.debug_log_capacity);
        }
        if changes.output_debug_log || changes.debug_log_capacity {
            if self.config.output_debug_log {
                self.publish_debug_log();
            } else if changes.output_debug_log {
                self.debug_log_output.publish(None);
                self.debug_log_output.forget_last();
            }
        }

        if changes.output_state_diagram_definition {
            if self.config.output_state_diagram_definition {
                self.publish_diagram();
            } else {
                self.diagram_output.publish(None);
                self.diagram_output.forget_last();
            }
        } else if changes.state_diagram_direction {
            self.publish_diagram();
        }

        if !changes.is_empty() {
            tracing::info!(?changes, "Configuration updated");
        }
        changes
    }

    /// Close every output channel. Safe to call more than once.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.current_state_output.close();
        self.debug_log_output.close();
        self.diagram_output.close();
        self.destroyed = true;
        tracing::debug!("State machine destroyed");
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn reject(
        &mut self,
        from: State,
        target: State,
        transition_type: TransitionType,
        rejection: Rejection,
        data: Value,
    ) -> TransitionOutcome {
        let Rejection { result, message } = rejection;

        if result == TransitionResult::InternalError {
            tracing::error!(from = %from, to = %target, "{message}");
        } else if self.config.output_transition_rejection_to_console {
            tracing::warn!(from = %from, to = %target, result = %result, "{message}");
        }

        self.record(TransitionRecord::new(
            Some(from),
            target,
            transition_type,
            result,
            message.clone(),
            data,
        ));
        self.outcome(result, message)
    }

    fn record(&mut self, mut record: TransitionRecord) {
        if self.config.stringify_log_transition_data {
            record.data = Value::String(record.data.to_string());
        }
        self.log.append(record);
        if self.config.output_debug_log {
            self.publish_debug_log();
        }
    }

    fn outcome(&self, result: TransitionResult, message: impl Into<String>) -> TransitionOutcome {
        TransitionOutcome {
            result,
            state: self.current_state().clone(),
            message: message.into(),
        }
    }

    fn state_changed(&mut self) {
        self.notify_current_state();
        self.publish_diagram();
    }

    fn notify_current_state(&mut self) {
        let current = self.current();
        self.current_state_output.publish(current);
    }

    fn publish_debug_log(&mut self) {
        self.debug_log_output.publish(Some(self.log.snapshot()));
    }

    fn publish_diagram(&mut self) {
        if self.config.output_state_diagram_definition {
            let diagram = self.render_diagram();
            self.diagram_output.publish(Some(diagram));
        }
    }

    fn render_diagram(&self) -> String {
        self.graph()
            .render_diagram(self.current_state(), self.config.state_diagram_direction)
    }
}
