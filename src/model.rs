//! Host-side component lifecycle: add, edit, duplicate, remove, evaluate.
//!
//! The engine itself is stateless; `SystemModel` owns the editable snapshot
//! and keeps ids unique for the lifetime of a session.

use crate::components::array::{ASSIGNED_MPPT_ID, SELECTED_PANEL_ID};
use crate::components::{Component, ComponentId, ComponentType};
use crate::config::SystemInputs;
use crate::engine::{self, Evaluation};
use crate::project::{PROJECT_VERSION, ProjectError, ProjectFile};

/// Errors raised by edits against a [`SystemModel`].
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ModelError {
    #[error("no component with id \"{0}\"")]
    UnknownComponent(ComponentId),
    #[error("{kind} has no property \"{field}\"")]
    UnknownField { kind: ComponentType, field: String },
}

/// An editable system: ordered components plus global assumptions.
#[derive(Debug, Clone, Default)]
pub struct SystemModel {
    components: Vec<Component>,
    inputs: SystemInputs,
    // Last sequence number handed out; never decreases.
    seq: u64,
}

impl SystemModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a model from a loaded project, advancing the id counter past
    /// every numeric id suffix already in use.
    pub fn from_project(project: ProjectFile) -> Self {
        let seq = project
            .components
            .iter()
            .filter_map(|c| id_suffix(&c.id))
            .max()
            .unwrap_or(0);
        Self {
            components: project.components,
            inputs: project.system_inputs,
            seq,
        }
    }

    pub fn to_project(&self) -> ProjectFile {
        ProjectFile {
            version: PROJECT_VERSION,
            components: self.components.clone(),
            system_inputs: self.inputs.clone(),
        }
    }

    /// Components in stored order.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn component(&self, id: &ComponentId) -> Option<&Component> {
        self.components.iter().find(|c| &c.id == id)
    }

    pub fn inputs(&self) -> &SystemInputs {
        &self.inputs
    }

    pub fn set_inputs(&mut self, inputs: SystemInputs) {
        self.inputs = inputs;
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Appends a component of `kind` with its default properties.
    pub fn add(&mut self, kind: ComponentType) -> ComponentId {
        let n = self.next_seq();
        let id = ComponentId::new(format!("{}-{n}", kind.slug()));
        let name = format!("{} {n}", kind.label());
        log::debug!("add {kind} as {id}");
        self.components.push(Component::new(id.clone(), kind, name));
        id
    }

    /// Adds a component and applies `props` on top of its defaults.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::UnknownField` if any field is not declared by
    /// `kind`. The component is not added in that case.
    pub fn add_with(
        &mut self,
        kind: ComponentType,
        name: &str,
        props: &[(&str, &str)],
    ) -> Result<ComponentId, ModelError> {
        if let Some((field, _)) = props.iter().find(|(f, _)| !kind.fields().contains(f)) {
            return Err(ModelError::UnknownField {
                kind,
                field: (*field).to_string(),
            });
        }
        let id = self.add(kind);
        let component = self.get_mut(&id)?;
        component.name = name.to_string();
        for (field, value) in props {
            component
                .properties
                .insert((*field).to_string(), (*value).to_string());
        }
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns `ModelError::UnknownComponent` if `id` is not present.
    pub fn rename(&mut self, id: &ComponentId, name: &str) -> Result<(), ModelError> {
        self.get_mut(id)?.name = name.to_string();
        Ok(())
    }

    /// Stores `value` as the raw text of `field`.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::UnknownComponent` for a missing id and
    /// `ModelError::UnknownField` for a field the kind does not declare.
    pub fn set_property(
        &mut self,
        id: &ComponentId,
        field: &str,
        value: &str,
    ) -> Result<(), ModelError> {
        let component = self.get_mut(id)?;
        if !component.kind.fields().contains(&field) {
            return Err(ModelError::UnknownField {
                kind: component.kind,
                field: field.to_string(),
            });
        }
        log::debug!("set {id}.{field} = {value:?}");
        component
            .properties
            .insert(field.to_string(), value.to_string());
        Ok(())
    }

    /// Clones a component under a fresh id, appending it at the end.
    ///
    /// An array configuration's copy keeps its panel selection but starts
    /// unassigned.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::UnknownComponent` if `id` is not present.
    pub fn duplicate(&mut self, id: &ComponentId) -> Result<ComponentId, ModelError> {
        let mut copy = self
            .component(id)
            .cloned()
            .ok_or_else(|| ModelError::UnknownComponent(id.clone()))?;
        let n = self.next_seq();
        copy.id = ComponentId::new(format!("{}-{n}", copy.kind.slug()));
        copy.name = format!("{} (copy)", copy.name);
        if copy.kind == ComponentType::ArrayConfig {
            copy.properties
                .insert(ASSIGNED_MPPT_ID.to_string(), String::new());
        }
        log::debug!("duplicate {id} as {}", copy.id);
        let new_id = copy.id.clone();
        self.components.push(copy);
        Ok(new_id)
    }

    /// Removes a component and clears array references that named it.
    ///
    /// Arrays fed by a removed controller stay in place, unassigned.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::UnknownComponent` if `id` is not present.
    pub fn remove(&mut self, id: &ComponentId) -> Result<Component, ModelError> {
        let pos = self
            .components
            .iter()
            .position(|c| &c.id == id)
            .ok_or_else(|| ModelError::UnknownComponent(id.clone()))?;
        let removed = self.components.remove(pos);

        let mut cleared = 0;
        for c in self
            .components
            .iter_mut()
            .filter(|c| c.kind == ComponentType::ArrayConfig)
        {
            for field in [SELECTED_PANEL_ID, ASSIGNED_MPPT_ID] {
                if ComponentId::from_reference(c.property(field)).as_ref() == Some(id) {
                    c.properties.insert(field.to_string(), String::new());
                    cleared += 1;
                }
            }
        }
        log::debug!("remove {id}, cleared {cleared} reference(s)");
        Ok(removed)
    }

    /// Runs the engine on the current snapshot.
    pub fn evaluate(&self) -> Evaluation {
        engine::evaluate(&self.components, &self.inputs)
    }

    /// Replaces the whole model from JSON text.
    ///
    /// # Errors
    ///
    /// Returns a `ProjectError` if the payload does not parse; the current
    /// state is left untouched.
    pub fn load_json_str(&mut self, json: &str) -> Result<(), ProjectError> {
        let project = ProjectFile::from_json_str(json)?;
        let seq = self.seq;
        *self = Self::from_project(project);
        // ids minted earlier in this session stay retired
        self.seq = self.seq.max(seq);
        log::debug!("loaded {} component(s)", self.components.len());
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `ProjectError::Json` if serialization fails.
    pub fn to_json_string(&self) -> Result<String, ProjectError> {
        self.to_project().to_json_string()
    }

    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    fn get_mut(&mut self, id: &ComponentId) -> Result<&mut Component, ModelError> {
        self.components
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| ModelError::UnknownComponent(id.clone()))
    }
}

/// Numeric suffix after the last `-` of an id, if any.
fn id_suffix(id: &ComponentId) -> Option<u64> {
    id.as_str().rsplit_once('-')?.1.parse().ok()
}
