use std::any::Any;

pub mod kernel;
pub mod services;

/// Per-session state handed to every service constructor
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceCtx {
    pub process_id: u64,
    pub sessions: u32,
}

impl ServiceCtx {
    pub fn new(process_id: u64) -> Self {
        Self {
            process_id,
            sessions: 0,
        }
    }
}

pub trait IpcService {
    fn name(&self) -> &str;

    fn as_any(&self) -> &dyn Any;
}
