//! Auxiliary gateway clients layered on the script provider.
//!
//! Some integrations need a second client object on top of the loaded
//! namespace, built from extra vendor scripts and an authorization the SDK
//! script alone does not carry. A [`GatewayConnector`] describes that
//! setup; [`connect_gateway`] drives it against a live session and parks
//! the resulting handle in the script state as the auxiliary instance,
//! where every descendant reads the same one.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::BridgeError;
use crate::script::{AuxiliaryHandle, ScriptAction, ScriptSession, ScriptState};

/// Builds an auxiliary client once the SDK script is available.
#[async_trait]
pub trait GatewayConnector: Send + Sync {
	/// Extra script URLs to load before connecting. Loaded in order.
	fn required_scripts(&self) -> Vec<String> {
		Vec::new()
	}

	/// Creates the client from the resolved script state.
	async fn connect(&self, state: &ScriptState) -> Result<AuxiliaryHandle, BridgeError>;
}

/// Connects `connector` through `session` and stores the handle.
///
/// Waits for the script load to settle first. A rejected load or a failed
/// vendor script surfaces as [`BridgeError::GatewayConnection`]; calling
/// this on a deferred provider that never started loading is a
/// configuration mistake.
pub async fn connect_gateway(
	session: &ScriptSession,
	connector: &dyn GatewayConnector,
) -> Result<AuxiliaryHandle, BridgeError> {
	if session.state().is_initial() {
		return Err(BridgeError::Configuration(
			"cannot connect a gateway before loading starts; mount the provider or \
			 dispatch a pending status first"
				.to_string(),
		));
	}

	let settled = session
		.wait_for(|state| state.is_resolved() || state.is_rejected())
		.await;
	if settled.is_rejected() {
		return Err(BridgeError::GatewayConnection(format!(
			"script load rejected: {}",
			settled.error_message()
		)));
	}

	let loader = session.loader();
	for url in connector.required_scripts() {
		loader
			.load_custom_script(&url, &BTreeMap::new())
			.await
			.map_err(|load_error| BridgeError::GatewayConnection(load_error.to_string()))?;
	}

	let handle = connector.connect(&settled).await?;
	session.dispatch(ScriptAction::SetAuxiliaryInstance(Some(handle.clone())));
	Ok(handle)
}
