pub mod types;

use self::types::UserId;
use crate::hos::{IpcService, ServiceCtx};
use ipcgen_macros::service;
use std::any::Any;

#[service("acc:u0")]
#[derive(Debug)]
pub struct AccountService {
    pub user: Option<UserId>,
    pub session: u32,
}

impl AccountService {
    pub fn new(context: &mut ServiceCtx) -> Self {
        context.sessions += 1;
        Self {
            user: None,
            session: context.sessions,
        }
    }

    pub fn with_user(context: &ServiceCtx, user: UserId) -> Self {
        Self {
            user: Some(user),
            session: context.sessions,
        }
    }
}

impl IpcService for AccountService {
    fn name(&self) -> &str {
        "acc:u0"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Generic services cannot be named by a `TypeId` guard.
#[service("acc:aa")]
pub struct ApplicationManager<T> {
    pub inner: T,
}

impl<T> ApplicationManager<T> {
    pub fn new(_context: &mut ServiceCtx, inner: T) -> Self {
        Self { inner }
    }
}
