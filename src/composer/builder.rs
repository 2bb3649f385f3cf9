use super::TRACING_TARGET;
use crate::component::{
    Component, ComponentId, ComponentLoader, ComponentSource, normalize_locator,
};
use crate::definition::NodeSpec;
use crate::error::{ConfigurationError, FlowError, ValidationError};
use crate::model::{
    CompositionState, Controller, Element, ElementArena, ElementId, find_controller_index,
};
use indexmap::IndexMap;

const ROOT_COMPONENT: &str = "root";

/// Builds the element tree of a flow, depth first, instantiating components
/// wherever a process group references one.
pub(super) struct TreeBuilder<'a> {
    flow_name: &'a str,
    source: &'a ComponentSource,
    controllers: &'a [Controller],
    loader: ComponentLoader<'a>,
    arena: &'a mut ElementArena,
}

impl<'a> TreeBuilder<'a> {
    pub(super) fn new(
        flow_name: &'a str,
        source: &'a ComponentSource,
        controllers: &'a [Controller],
        loader: ComponentLoader<'a>,
        arena: &'a mut ElementArena,
    ) -> Self {
        Self {
            flow_name,
            source,
            controllers,
            loader,
            arena,
        }
    }

    /// Builds every root canvas element into `root`.
    pub(super) fn build_canvas(
        &mut self,
        canvas: &[NodeSpec],
        root: &mut IndexMap<String, ElementId>,
    ) -> Result<(), FlowError> {
        if let ComponentSource::Batch(specs) = self.source {
            self.loader.load_batch(specs)?;
        }

        for spec in canvas {
            let mut element = Element::from_spec(spec, self.flow_name)?;
            element.src_component_name = ROOT_COMPONENT.to_string();

            if root.contains_key(&element.name) {
                return Err(ValidationError::DuplicateRootElement(element.name).into());
            }
            let name = element.name.clone();
            let is_group = element.is_process_group();
            let id = self.arena.push(element);
            root.insert(name, id);

            if is_group {
                self.compose_group(id)?;
            }
        }
        Ok(())
    }

    /// Resolves, validates and recursively composes one process group.
    fn compose_group(&mut self, group_id: ElementId) -> Result<(), FlowError> {
        let group_element = &mut self.arena[group_id];
        let group_name = group_element.name.clone();
        let child_parent_path = group_element.path();
        let Some(group) = group_element.as_process_group_mut() else {
            return Ok(());
        };
        group.state = CompositionState::Loading;
        let component_path = group
            .component_path
            .as_deref()
            .map(normalize_locator)
            .ok_or_else(|| ValidationError::MissingComponentPath(group_name.clone()))?;

        tracing::debug!(
            target: TRACING_TARGET,
            group = %group_name,
            component_path = %component_path,
            "Loading ProcessGroup"
        );

        let not_found = |builder: &Self| ValidationError::ComponentNotFound {
            component_path: component_path.clone(),
            group: group_name.clone(),
            origin: builder.origin_of(group_id),
        };

        match self.source {
            ComponentSource::Directory(dir) => {
                if self.loader.load_from_dir(dir, &component_path)?.is_none() {
                    return Err(not_found(self).into());
                }
            }
            ComponentSource::Batch(_) => {}
            ComponentSource::Unset => {
                return Err(ConfigurationError::NoComponentSource(component_path.clone()).into());
            }
        }

        let component = self
            .loader
            .cache()
            .find_by_path(&component_path)?
            .and_then(|id| Some((id, self.loader.cache().get(id)?.clone())));
        let Some((component_id, component)) = component else {
            return Err(not_found(self).into());
        };

        self.bind_requirements(group_id, component_id, &component)?;

        for spec in &component.process_group {
            let mut child = Element::from_spec(spec, &child_parent_path)?;
            child.parent = Some(group_id);
            child.src_component_name = component.name.clone();

            let child_name = child.name.clone();
            let child_path = child
                .as_process_group()
                .map(|pg| pg.component_path.as_deref().map(normalize_locator));

            let duplicate = self.arena[group_id]
                .as_process_group()
                .is_some_and(|pg| pg.children.contains_key(&child_name));
            if duplicate {
                return Err(ValidationError::DuplicateElement {
                    name: child_name,
                    component: component.source_file.clone(),
                }
                .into());
            }
            let child_id = self.arena.push(child);
            if let Some(pg) = self.arena[group_id].as_process_group_mut() {
                pg.children.insert(child_name, child_id);
            }

            if let Some(child_path) = child_path {
                if let Some(child_path) = child_path.as_deref() {
                    if child_path == component_path {
                        return Err(ValidationError::SelfReference(component_path).into());
                    }
                    if let Some(chain) = self.find_cycle(group_id, child_path) {
                        return Err(ValidationError::CircularReference {
                            component_path,
                            chain,
                        }
                        .into());
                    }
                }
                self.compose_group(child_id)?;
            }
        }

        self.loader.mark_used(component_id);
        if let Some(pg) = self.arena[group_id].as_process_group_mut() {
            pg.state = CompositionState::Composed;
        }
        tracing::debug!(
            target: TRACING_TARGET,
            group = %group_name,
            component = %component.name,
            "Composed ProcessGroup"
        );
        Ok(())
    }

    /// Checks required controllers and variables, binding each required controller.
    fn bind_requirements(
        &mut self,
        group_id: ElementId,
        component_id: ComponentId,
        component: &Component,
    ) -> Result<(), FlowError> {
        let group_element = &mut self.arena[group_id];
        group_element.src_component_name = component.name.clone();
        let Some(group) = group_element.as_process_group_mut() else {
            return Ok(());
        };
        group.component = Some(component_id);

        for (key, required_type) in &component.required_controllers {
            let controller_name = group.controllers.get(key).ok_or_else(|| {
                ValidationError::MissingRequiredController {
                    key: key.clone(),
                    component: component.source_file.clone(),
                }
            })?;
            let index = find_controller_index(self.controllers, controller_name)?.ok_or_else(
                || ValidationError::UnknownController {
                    key: key.clone(),
                    controller: controller_name.clone(),
                    component: component.source_file.clone(),
                },
            )?;
            let provided = &self.controllers[index].config.package_id;
            if provided != required_type {
                return Err(ValidationError::ControllerTypeMismatch {
                    provided: provided.clone(),
                    required: required_type.clone(),
                    component: component.source_file.clone(),
                }
                .into());
            }
            group.bound_controllers.insert(key.clone(), index);
        }

        if let Some(var) = component
            .required_vars
            .iter()
            .find(|v| !group.vars.contains_key(v.as_str()))
        {
            return Err(ValidationError::MissingRequiredVar {
                var: var.clone(),
                component: component.source_file.clone(),
            }
            .into());
        }

        group.state = CompositionState::Validated;
        Ok(())
    }

    /// Walks the ancestors of `parent`, returning the component chain if any of
    /// them already instantiates `component_path`.
    fn find_cycle(&self, parent: ElementId, component_path: &str) -> Option<Vec<String>> {
        let mut chain = Vec::new();
        let mut current = Some(parent);
        while let Some(id) = current {
            let element = &self.arena[id];
            if let Some(path) = element
                .as_process_group()
                .and_then(|pg| pg.component_path.as_deref())
                .map(normalize_locator)
            {
                let matched = path == component_path;
                chain.push(path);
                if matched {
                    chain.reverse();
                    chain.push(component_path.to_string());
                    return Some(chain);
                }
            }
            current = element.parent();
        }
        None
    }

    /// The source of the component that declared `id`, or `root`.
    fn origin_of(&self, id: ElementId) -> String {
        self.arena[id]
            .parent()
            .and_then(|parent| self.arena[parent].as_process_group())
            .and_then(|pg| pg.component)
            .and_then(|c| self.loader.cache().get(c))
            .map(|c| c.source_file.clone())
            .unwrap_or_else(|| ROOT_COMPONENT.to_string())
    }
}
