use crate::hos::{IpcService, ServiceCtx};
use ipcgen_macros::service;
use std::any::Any;

#[service("time:u")]
#[derive(Debug)]
pub struct StaticService {
    pub origin: &'static str,
}

impl StaticService {
    pub fn new(_context: &ServiceCtx) -> Self {
        Self { origin: "new" }
    }

    /// Same shape as `new`; declared second, so never picked.
    pub fn fallback(_context: &ServiceCtx) -> Self {
        Self { origin: "fallback" }
    }

    /// Two parameters but no context, so not a payload constructor.
    pub fn between(_start: u64, _end: u64) -> Self {
        Self { origin: "between" }
    }
}

impl IpcService for StaticService {
    fn name(&self) -> &str {
        "time:u"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Has a constructor, but no marker.
pub struct SteadyClock;

impl SteadyClock {
    pub fn new(_context: &ServiceCtx) -> Self {
        SteadyClock
    }
}

/// Marked, but its constructor does not take the service context.
#[service("time:s")]
pub struct SystemClock {
    pub epoch: u64,
}

impl SystemClock {
    pub fn new(epoch: u64) -> Self {
        Self { epoch }
    }
}

#[allow(dead_code)]
mod detail {
    use crate::hos::ServiceCtx;
    use ipcgen_macros::service;

    /// Private to `time`, so the dispatcher cannot name it.
    #[service("time:p")]
    pub struct Hidden;

    impl Hidden {
        pub fn new(_context: &ServiceCtx) -> Self {
            Hidden
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hos::services::sm::UserInterface;
    use std::any::TypeId;

    #[test]
    fn test_service_in_private_module_is_not_dispatched() {
        let mut context = ServiceCtx::new(1);
        let hidden = TypeId::of::<detail::Hidden>();
        assert!(UserInterface::get_service_instance(hidden, &mut context, None).is_none());
    }

    #[test]
    fn test_constructor_without_context_is_not_a_payload_shape() {
        let mut context = ServiceCtx::new(1);
        let parameter: Box<dyn Any> = Box::new(3u64);
        let service =
            UserInterface::get_service::<StaticService>(&mut context, Some(parameter)).unwrap();
        let service = service.as_any().downcast_ref::<StaticService>().unwrap();
        assert_eq!(service.origin, "new");
        assert_eq!(StaticService::between(1, 2).origin, "between");
    }
}
