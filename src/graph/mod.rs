//! Topology registry with lazy materialization.
//!
//! A [`Graph`] owns everything it has learned about a model: the catalog of
//! state types it can resolve by name, whether each state type has been
//! loaded, and the ordered transitions declared by each loaded type. Every
//! graph owns its registries; nothing is shared between instances.

mod error;
mod plan;

pub use error::LoadError;

use self::plan::LoadPlan;
use crate::config::Config;
use crate::core::{LoadStrategy, StateType};
use crate::transition::{TargetRef, Transition};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Load status of a state type or a transition set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LoadStatus {
    #[default]
    Unloaded,
    Loaded,
}

/// Registry of state types and their outgoing transitions.
#[derive(Debug)]
pub struct Graph {
    config: Config,
    catalog: HashMap<&'static str, StateType>,
    state_status: HashMap<&'static str, LoadStatus>,
    transition_status: HashMap<&'static str, LoadStatus>,
    transitions: HashMap<&'static str, Vec<Arc<Transition>>>,
}

impl Graph {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            catalog: HashMap::new(),
            state_status: HashMap::new(),
            transition_status: HashMap::new(),
            transitions: HashMap::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Make a state type resolvable by name without loading it.
    pub fn declare(&mut self, state_type: StateType) -> Result<(), LoadError> {
        match self.catalog.get(state_type.name()) {
            Some(known) if *known == state_type => Ok(()),
            Some(_) => Err(LoadError::NameConflict {
                name: state_type.name().to_string(),
            }),
            None => {
                self.catalog.insert(state_type.name(), state_type);
                Ok(())
            }
        }
    }

    /// Look up a declared state type by name.
    pub fn resolve(&self, name: &str) -> Result<StateType, LoadError> {
        self.catalog
            .get(name)
            .copied()
            .ok_or_else(|| LoadError::UnknownStateType {
                name: name.to_string(),
            })
    }

    /// Resolve a transition target into a declared state type.
    pub fn resolve_target(&self, target: &TargetRef) -> Result<StateType, LoadError> {
        match target {
            TargetRef::Type(state_type) => Ok(*state_type),
            TargetRef::Name(name) => self.resolve(name),
        }
    }

    pub fn state_status(&self, state_type: &StateType) -> LoadStatus {
        self.status_of(&self.state_status, state_type)
    }

    pub fn state_loaded(&self, state_type: &StateType) -> bool {
        self.state_status(state_type) == LoadStatus::Loaded
    }

    /// Load a state type.
    ///
    /// Does nothing when the type is already loaded. Otherwise the type is
    /// declared and marked loaded; `Eager` and `Connected` go on to load its
    /// transitions with the neighbour strategy. A failed load changes nothing.
    pub fn load_state_type(
        &mut self,
        state_type: StateType,
        strategy: LoadStrategy,
    ) -> Result<(), LoadError> {
        if self.state_loaded(&state_type) {
            return Ok(());
        }

        let mut plan = LoadPlan::default();
        plan.load_state(self, state_type)?;
        match strategy {
            LoadStrategy::Lazy => {}
            LoadStrategy::Eager => plan.load_transitions(self, state_type, LoadStrategy::Lazy)?,
            LoadStrategy::Connected => {
                plan.load_transitions(self, state_type, LoadStrategy::Connected)?
            }
        }

        self.commit(plan, strategy);
        Ok(())
    }

    pub fn transitions_status(&self, state_type: &StateType) -> LoadStatus {
        self.status_of(&self.transition_status, state_type)
    }

    pub fn transitions_loaded(&self, state_type: &StateType) -> bool {
        self.transitions_status(state_type) == LoadStatus::Loaded
    }

    /// Load the transitions declared by a state type.
    ///
    /// The declaration is read exactly once; later calls do nothing. With
    /// `Eager` every target state type is loaded too, and with `Connected`
    /// the walk continues through the targets' own transitions. Nothing is
    /// registered unless the whole load succeeds.
    pub fn load_transitions(
        &mut self,
        state_type: StateType,
        strategy: LoadStrategy,
    ) -> Result<(), LoadError> {
        if self.transitions_loaded(&state_type) {
            return Ok(());
        }

        let mut plan = LoadPlan::default();
        plan.load_transitions(self, state_type, strategy)?;

        self.commit(plan, strategy);
        Ok(())
    }

    /// Loaded transitions of a state type, in declaration order.
    ///
    /// Empty when the transitions have not been loaded.
    pub fn transitions_for(&self, state_type: &StateType) -> &[Arc<Transition>] {
        self.transitions
            .get(state_type.name())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Names of every loaded state type, sorted.
    pub fn loaded_state_types(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self
            .state_status
            .iter()
            .filter(|(_, status)| **status == LoadStatus::Loaded)
            .map(|(name, _)| *name)
            .collect();
        names.sort_unstable();
        names
    }

    fn commit(&mut self, plan: LoadPlan, strategy: LoadStrategy) {
        self.catalog.extend(plan.declared);

        for state_type in plan.states {
            self.state_status
                .insert(state_type.name(), LoadStatus::Loaded);
            debug!(
                model = %self.config.id(),
                state = state_type.name(),
                ?strategy,
                "State type loaded"
            );
        }

        for (state_type, declared) in plan.transitions {
            debug!(
                model = %self.config.id(),
                state = state_type.name(),
                count = declared.len(),
                ?strategy,
                "Transitions loaded"
            );
            self.transitions.insert(
                state_type.name(),
                declared.into_iter().map(Arc::new).collect(),
            );
            self.transition_status
                .insert(state_type.name(), LoadStatus::Loaded);
        }
    }

    fn status_of(
        &self,
        statuses: &HashMap<&'static str, LoadStatus>,
        state_type: &StateType,
    ) -> LoadStatus {
        match self.catalog.get(state_type.name()) {
            Some(known) if known == state_type => statuses
                .get(state_type.name())
                .copied()
                .unwrap_or_default(),
            _ => LoadStatus::Unloaded,
        }
    }
}
