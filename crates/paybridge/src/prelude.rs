//! One-stop imports for embedding code.
//!
//! ```
//! use paybridge::prelude::*;
//! ```

pub use paybridge_sdk::widget::IntoHandler;
pub use paybridge_sdk::{
	Container, Document, DocumentScriptLoader, Handler, LoadOptions, LoadScriptError, Namespace,
	ScriptId, ScriptLoader, WidgetError, WidgetFactory, WidgetHandle, WidgetKind, WidgetProps,
};

pub use crate::callback::ErrorSink;
pub use crate::card_fields::{CardFieldKind, CardFieldsSession, FieldRegistry};
pub use crate::context::ContextScope;
pub use crate::error::BridgeError;
pub use crate::gateway::{GatewayConnector, connect_gateway};
pub use crate::hooks::{use_card_fields, use_loading_state, use_script_session};
pub use crate::memo::DeepMemo;
pub use crate::proxy::ProxyProps;
pub use crate::script::{
	AuxiliaryHandle, LoadingStatus, ScriptAction, ScriptProvider, ScriptSession, ScriptState,
};
pub use crate::widget::{MountOutcome, WidgetController};
