use super::FlowArtifact;
use crate::error::FlowError;
use crate::model::{Controller, FlowDefinition};
use crate::resolver::Resolver;
use crate::template::EnvLookup;

const TRACING_TARGET: &str = "flowlib::deploy";

/// The external collaborator that materializes a flow against a live engine.
pub trait Deployer {
    /// Creates the controllers and returns `(name, engine id)` for each one created.
    fn materialize_controllers(
        &mut self,
        controllers: &[Controller],
    ) -> Result<Vec<(String, String)>, FlowError>;

    /// Materializes the resolved and validated flow.
    fn deploy(&mut self, artifact: &FlowArtifact) -> Result<(), FlowError>;
}

/// Drives a composed flow through resolution into `deployer`.
///
/// Services are resolved first so that the controller ids handed back by the
/// deployer are visible to `controller(...)` lookups in element properties.
pub fn deploy_flow(
    flow: &mut FlowDefinition,
    env: &dyn EnvLookup,
    deployer: &mut dyn Deployer,
) -> Result<FlowArtifact, FlowError> {
    let resolver = Resolver::new(env);
    resolver.resolve_services(flow)?;

    let ids = deployer.materialize_controllers(&flow.controllers)?;
    for (name, id) in ids {
        tracing::debug!(target: TRACING_TARGET, controller = %name, id = %id, "Controller materialized");
        flow.assign_controller_id(&name, id)?;
    }

    resolver.resolve_elements(flow)?;
    flow.validate()?;

    let artifact = FlowArtifact::from_flow(flow);
    tracing::info!(target: TRACING_TARGET, flow = %flow.name, "Deploying flow");
    deployer.deploy(&artifact)?;
    Ok(artifact)
}
