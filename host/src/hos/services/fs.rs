use crate::hos::{IpcService, ServiceCtx};
use ipcgen_macros::service;
use std::any::Any;

/// Only constructible with a mount name.
#[service("fsp-srv", 8)]
#[derive(Debug)]
pub struct FileSystemProxy {
    pub mount: String,
    pub owner: ServiceCtx,
}

impl FileSystemProxy {
    pub fn open(context: ServiceCtx, mount: String) -> Self {
        Self {
            mount,
            owner: context,
        }
    }
}

impl IpcService for FileSystemProxy {
    fn name(&self) -> &str {
        "fsp-srv"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[service("fsp-ldr")]
#[derive(Debug)]
pub struct SaveDataReader {
    pub size: usize,
}

impl SaveDataReader {
    pub fn read(_context: &ServiceCtx, buffer: &mut Vec<u8>) -> Self {
        buffer.truncate(4);
        Self { size: buffer.len() }
    }
}

impl IpcService for SaveDataReader {
    fn name(&self) -> &str {
        "fsp-ldr"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// No one- or two-argument constructor, so it never gets a rule.
#[service("fsp-pr")]
pub struct ProgramRegistry;

impl ProgramRegistry {
    pub fn new(_context: &ServiceCtx, _program: u64, _storage: u8) -> Self {
        ProgramRegistry
    }
}
