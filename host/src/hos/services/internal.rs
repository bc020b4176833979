use crate::hos::{IpcService, ServiceCtx};
use ipcgen_macros::service;
use std::any::Any;

/// Lives in a private module that the dispatcher's parent can still see.
#[service("internal")]
pub struct Internal;

impl Internal {
    pub fn new(_context: &mut ServiceCtx) -> Self {
        Internal
    }
}

impl IpcService for Internal {
    fn name(&self) -> &str {
        "internal"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hos::services::sm::UserInterface;
    use std::any::TypeId;

    #[test]
    fn test_sibling_private_module_is_dispatched() {
        let mut context = ServiceCtx::new(1);
        let service =
            UserInterface::get_service_instance(TypeId::of::<Internal>(), &mut context, None)
                .unwrap();
        assert_eq!(service.name(), "internal");
        assert!(service.as_any().is::<Internal>());
    }
}
