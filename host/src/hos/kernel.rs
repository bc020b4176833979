use super::ServiceCtx;
use ipcgen_macros::service;

/// Marked, but lives outside `hos::services` and is never dispatched.
#[service("kernel")]
#[derive(Debug)]
pub struct KernelObject {
    pub owner: u64,
}

impl KernelObject {
    pub fn new(context: &mut ServiceCtx) -> Self {
        Self {
            owner: context.process_id,
        }
    }
}
