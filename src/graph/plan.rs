//! Staging area for graph loads.
//!
//! A load is first planned against a read-only graph and only committed
//! once every declaration, source and target has been checked, so a failed
//! load leaves the registries exactly as they were.

use super::{Graph, LoadError};
use crate::core::{LoadStrategy, StateType};
use crate::transition::{TargetRef, Transition};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub(super) struct LoadPlan {
    pub(super) declared: HashMap<&'static str, StateType>,
    pub(super) states: Vec<StateType>,
    pub(super) transitions: Vec<(StateType, Vec<Transition>)>,
}

impl LoadPlan {
    /// Stage a catalog entry, rejecting a name already taken by another type.
    pub(super) fn declare(
        &mut self,
        graph: &Graph,
        state_type: StateType,
    ) -> Result<(), LoadError> {
        let known = graph
            .catalog
            .get(state_type.name())
            .or_else(|| self.declared.get(state_type.name()));
        match known {
            Some(known) if *known == state_type => Ok(()),
            Some(_) => Err(LoadError::NameConflict {
                name: state_type.name().to_string(),
            }),
            None => {
                self.declared.insert(state_type.name(), state_type);
                Ok(())
            }
        }
    }

    /// Resolve a target against the graph's catalog and the staged entries.
    pub(super) fn resolve(
        &self,
        graph: &Graph,
        target: &TargetRef,
    ) -> Result<StateType, LoadError> {
        match target {
            TargetRef::Type(state_type) => Ok(*state_type),
            TargetRef::Name(name) => match self.declared.get(&**name) {
                Some(state_type) => Ok(*state_type),
                None => graph.resolve(name),
            },
        }
    }

    pub(super) fn load_state(
        &mut self,
        graph: &Graph,
        state_type: StateType,
    ) -> Result<(), LoadError> {
        self.declare(graph, state_type)?;
        if !graph.state_loaded(&state_type) && !self.states.contains(&state_type) {
            self.states.push(state_type);
        }
        Ok(())
    }

    /// Stage the transitions of `root` and, depending on `strategy`, of
    /// everything they lead to.
    ///
    /// Walks with an explicit worklist rather than recursion.
    pub(super) fn load_transitions(
        &mut self,
        graph: &Graph,
        root: StateType,
        strategy: LoadStrategy,
    ) -> Result<(), LoadError> {
        let neighbours = strategy.for_neighbours();
        let mut pending = vec![root];

        while let Some(state_type) = pending.pop() {
            if graph.transitions_loaded(&state_type) || self.plans_transitions(&state_type) {
                continue;
            }

            self.declare(graph, state_type)?;
            let declared = state_type.declared_transitions();
            for transition in &declared {
                if transition.source_type() != state_type {
                    return Err(LoadError::SourceMismatch {
                        declared_by: state_type.name().to_string(),
                        transition: transition.to_string(),
                    });
                }
                if let Some(target) = transition.target_type() {
                    self.declare(graph, target)?;
                }
            }

            let targets: Vec<TargetRef> = declared.iter().map(|t| t.target().clone()).collect();
            self.transitions.push((state_type, declared));

            let Some(next) = neighbours else {
                continue;
            };
            for target in &targets {
                let target = self.resolve(graph, target)?;
                self.load_state(graph, target)?;
                if next == LoadStrategy::Connected {
                    pending.push(target);
                }
            }
        }

        Ok(())
    }

    fn plans_transitions(&self, state_type: &StateType) -> bool {
        self.transitions
            .iter()
            .any(|(planned, _)| planned == state_type)
    }
}
