use crate::hos::{IpcService, ServiceCtx};
use std::any::{Any, TypeId};

/// Service manager front end. `get_service_instance` is generated at build
/// time from every dispatchable service under `hos::services`.
pub struct UserInterface;

include!(concat!(env!("OUT_DIR"), "/user_interface.rs"));

impl UserInterface {
    /// Typed wrapper over the generated dispatch function
    pub fn get_service<T: Any>(
        context: &mut ServiceCtx,
        parameter: Option<Box<dyn Any>>,
    ) -> Option<Box<dyn IpcService>> {
        Self::get_service_instance(TypeId::of::<T>(), context, parameter)
    }
}
