//! Variable resolution: renders global variables, service properties and
//! processor properties in place.

use crate::component::ComponentCache;
use crate::error::{ConfigurationError, FlowError};
use crate::model::{
    Controller, ElementArena, ElementId, ElementKind, FlowDefinition, FlowState, PackageConfig,
    RESERVED_WORDS,
};
use crate::template::{Context, ControllerIds, EnvLookup, Helpers, Template, Value};
use indexmap::IndexMap;

pub const TRACING_TARGET: &str = "flowlib::resolver";

/// Renders every template of a composed flow.
///
/// Resolution runs in two stages so a deployer can materialize controllers in
/// between: [`Resolver::resolve_services`] handles globals and controllers,
/// [`Resolver::resolve_elements`] handles reporting tasks and the element tree,
/// both of which may look up controller ids.
pub struct Resolver<'e> {
    env: &'e dyn EnvLookup,
}

impl<'e> Resolver<'e> {
    pub fn new(env: &'e dyn EnvLookup) -> Self {
        Self { env }
    }

    /// Runs both stages.
    pub fn resolve(&self, flow: &mut FlowDefinition) -> Result<(), FlowError> {
        self.resolve_services(flow)?;
        self.resolve_elements(flow)
    }

    pub fn resolve_services(&self, flow: &mut FlowDefinition) -> Result<(), FlowError> {
        expect_state(flow, FlowState::Composed, "resolve services of")?;

        if let Some(reserved) = RESERVED_WORDS
            .iter()
            .find(|w| flow.global_vars.contains_key(**w))
        {
            tracing::warn!(
                target: TRACING_TARGET,
                name = %reserved,
                "'env' and 'controller' are reserved words and should not be set inside of globals"
            );
        }

        let no_controllers = ControllerIds::new();
        let helpers = Helpers::new(self.env, &no_controllers);
        let empty = Context::new();
        let mut globals = IndexMap::with_capacity(flow.global_vars.len());
        for (name, value) in &flow.global_vars {
            globals.insert(name.clone(), render_value(value, &empty, &helpers)?);
        }
        flow.global_vars = globals;

        let context = Context::from(&flow.global_vars);
        for controller in &mut flow.controllers {
            tracing::debug!(target: TRACING_TARGET, controller = %controller.name, "Resolving controller");
            render_properties(&mut controller.config, &context, &helpers)?;
        }

        flow.state = FlowState::ServicesResolved;
        Ok(())
    }

    pub fn resolve_elements(&self, flow: &mut FlowDefinition) -> Result<(), FlowError> {
        expect_state(flow, FlowState::ServicesResolved, "resolve elements of")?;

        let FlowDefinition {
            global_vars,
            controllers,
            reporting_tasks,
            components,
            arena,
            root,
            ..
        } = flow;

        let globals = Context::from(&*global_vars);
        let root_ids = controller_ids(controllers);
        let root_helpers = Helpers::new(self.env, &root_ids);

        for task in reporting_tasks.iter_mut() {
            tracing::debug!(target: TRACING_TARGET, task = %task.name, "Resolving reporting task");
            render_properties(&mut task.config, &globals, &root_helpers)?;
        }

        let mut walker = ElementWalker {
            env: self.env,
            globals: &globals,
            controllers: controllers.as_slice(),
            components: &*components,
            arena,
        };
        for id in root.values().copied() {
            walker.resolve_root_element(id, &root_helpers)?;
        }

        flow.state = FlowState::Resolved;
        Ok(())
    }
}

struct ElementWalker<'a> {
    env: &'a dyn EnvLookup,
    globals: &'a Context,
    controllers: &'a [Controller],
    components: &'a ComponentCache,
    arena: &'a mut ElementArena,
}

impl ElementWalker<'_> {
    fn resolve_root_element(&mut self, id: ElementId, helpers: &Helpers<'_>) -> Result<(), FlowError> {
        match &mut self.arena[id].kind {
            ElementKind::Processor(processor) => {
                render_properties(&mut processor.config, self.globals, helpers)
            }
            ElementKind::ProcessGroup(_) => self.resolve_group(id),
            ElementKind::InputPort | ElementKind::OutputPort => Ok(()),
        }
    }

    /// Builds the group's context and renders its direct processors, then descends.
    fn resolve_group(&mut self, id: ElementId) -> Result<(), FlowError> {
        let element = &self.arena[id];
        let Some(group) = element.as_process_group() else {
            return Ok(());
        };
        tracing::debug!(target: TRACING_TARGET, group = %element.path(), "Resolving ProcessGroup");

        let controller_ids: ControllerIds = group
            .bound_controllers
            .iter()
            .map(|(key, index)| {
                let id = self.controllers.get(*index).and_then(|c| c.id.get().cloned());
                (key.clone(), id)
            })
            .collect();
        let helpers = Helpers::new(self.env, &controller_ids);

        let mut context = self.globals.clone();
        if let Some(component) = group.component.and_then(|c| self.components.get(c)) {
            context.extend(&component.defaults);
        }
        for (name, value) in &group.vars {
            let rendered = render_value(value, &context, &helpers)?;
            context.insert(name.clone(), rendered);
        }

        let children: Vec<ElementId> = group.children.values().copied().collect();
        for child in children {
            match &mut self.arena[child].kind {
                ElementKind::Processor(processor) => {
                    render_properties(&mut processor.config, &context, &helpers)?;
                }
                ElementKind::ProcessGroup(_) => self.resolve_group(child)?,
                ElementKind::InputPort | ElementKind::OutputPort => {}
            }
        }
        Ok(())
    }
}

fn expect_state(
    flow: &FlowDefinition,
    expected: FlowState,
    operation: &'static str,
) -> Result<(), FlowError> {
    if flow.state != expected {
        return Err(ConfigurationError::InvalidState {
            operation,
            state: flow.state.to_string(),
        }
        .into());
    }
    Ok(())
}

fn controller_ids(controllers: &[Controller]) -> ControllerIds {
    controllers
        .iter()
        .map(|c| (c.name.clone(), c.id.get().cloned()))
        .collect()
}

/// Only string values are templates; other scalars pass through.
fn render_value(value: &Value, context: &Context, helpers: &Helpers<'_>) -> Result<Value, FlowError> {
    match value {
        Value::String(source) => Ok(Value::String(
            Template::parse(source)?.render(context, helpers),
        )),
        other => Ok(other.clone()),
    }
}

fn render_properties(
    config: &mut PackageConfig,
    context: &Context,
    helpers: &Helpers<'_>,
) -> Result<(), FlowError> {
    for value in config.properties.values_mut() {
        *value = Template::parse(value.as_str())?.render(context, helpers);
    }
    Ok(())
}
